//! Reference text extraction.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// A handle to an independent text extractor.
pub trait ReferenceExtractor {
    /// Extract the raw text of one 1-indexed page.
    fn extract(&self, pdf: &Path, page: u32) -> Result<String>;
}

/// Extracts page text with poppler's `pdftotext`.
#[derive(Debug, Clone)]
pub struct Pdftotext {
    program: PathBuf,
    attempts: u32,
}

impl Default for Pdftotext {
    fn default() -> Self {
        Self {
            program: PathBuf::from("pdftotext"),
            attempts: 10,
        }
    }
}

impl Pdftotext {
    /// Use `pdftotext` from `PATH` with ten attempts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific executable.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the number of attempts (at least one).
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    fn run_once(&self, pdf: &Path, page: u32) -> std::result::Result<String, String> {
        let page = page.to_string();
        let output = Command::new(&self.program)
            .args(["-nopgbrk", "-f", &page, "-l", &page])
            .arg(pdf)
            .arg("-")
            .output()
            .map_err(|e| e.to_string())?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            })
        }
    }
}

impl ReferenceExtractor for Pdftotext {
    fn extract(&self, pdf: &Path, page: u32) -> Result<String> {
        let mut last_error = String::new();
        for attempt in 1..=self.attempts {
            match self.run_once(pdf, page) {
                Ok(text) => return Ok(text),
                Err(e) => {
                    log::warn!(
                        "{}: page {}: {} attempt {}/{} failed: {}",
                        pdf.display(),
                        page,
                        self.program.display(),
                        attempt,
                        self.attempts,
                        e
                    );
                    last_error = e;
                }
            }
        }
        Err(Error::external(
            self.program.display().to_string(),
            last_error,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let extractor = Pdftotext::new();
        assert_eq!(extractor.attempts, 10);
        assert_eq!(extractor.program, PathBuf::from("pdftotext"));
        assert_eq!(Pdftotext::new().with_attempts(0).attempts, 1);
    }

    #[test]
    fn test_missing_program_exhausts_attempts() {
        let extractor = Pdftotext::new()
            .with_program("/nonexistent/pdftotext")
            .with_attempts(2);
        let result = extractor.extract(Path::new("doc.pdf"), 1);
        assert!(matches!(result, Err(Error::ExternalTool { .. })));
    }
}
