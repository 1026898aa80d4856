//! Conversion through an external program.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

use super::RmlConverter;

/// Runs `<program> [args...] <rml-file> <output-pdf>`.
///
/// The RML is written to a temporary file that is removed afterwards.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandConverter {
    /// Create a converter for a program.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument passed before the file paths.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// The configured program.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl RmlConverter for CommandConverter {
    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("converter")
    }

    fn convert(&self, rml: &str, output: &Path) -> Result<()> {
        let mut input = tempfile::Builder::new()
            .prefix("pdfair-")
            .suffix(".rml")
            .tempfile()?;
        input.write_all(rml.as_bytes())?;
        input.flush()?;

        log::debug!(
            "Running {} on {} -> {}",
            self.program.display(),
            input.path().display(),
            output.display()
        );

        let result = Command::new(&self.program)
            .args(&self.args)
            .arg(input.path())
            .arg(output)
            .output()
            .map_err(|e| Error::external(self.name(), e.to_string()))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            return Err(Error::external(
                self.name(),
                if stderr.is_empty() {
                    result.status.to_string()
                } else {
                    stderr
                },
            ));
        }

        if !output.exists() {
            return Err(Error::Render(format!(
                "{} reported success but wrote no file at {}",
                self.name(),
                output.display()
            )));
        }

        log::info!("PDF converted to {}", output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_program() {
        assert_eq!(CommandConverter::new("/usr/local/bin/rml2pdf").name(), "rml2pdf");
    }

    #[test]
    fn test_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let converter = CommandConverter::new("/nonexistent/rml2pdf");
        let result = converter.convert("<document/>", &dir.path().join("out.pdf"));
        assert!(matches!(result, Err(Error::ExternalTool { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_copies_through_shell() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.pdf");
        let converter = CommandConverter::new("sh")
            .with_arg("-c")
            .with_arg("cp \"$0\" \"$1\"");

        converter.convert("<document/>", &output).unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "<document/>");
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let converter = CommandConverter::new("sh")
            .with_arg("-c")
            .with_arg("echo broken rml >&2; exit 3");

        match converter.convert("<document/>", &dir.path().join("out.pdf")) {
            Err(Error::ExternalTool { tool, message }) => {
                assert_eq!(tool, "sh");
                assert_eq!(message, "broken rml");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_success_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let converter = CommandConverter::new("sh").with_arg("-c").with_arg("true");
        assert!(matches!(
            converter.convert("<document/>", &dir.path().join("out.pdf")),
            Err(Error::Render(_))
        ));
    }
}
