//! Error types for pdfair library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfair operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while assembling, rendering or evaluating documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The layout-analysis result or a detection file is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The metadata catalog could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The source PDF could not be read.
    #[error("PDF reading error: {0}")]
    Pdf(String),

    /// A page reports dimensions that cannot be transformed.
    #[error("Page {page} has invalid size {width}x{height}")]
    InvalidPageSize {
        /// 1-indexed page number
        page: u32,
        /// Reported width
        width: f32,
        /// Reported height
        height: f32,
    },

    /// The n-gram window size is unusable.
    #[error("Invalid n-gram window size: {0}")]
    InvalidWindow(usize),

    /// An evaluation step was called out of order or on unusable input.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// An external tool failed; carries its diagnostic output.
    #[error("{tool} failed: {message}")]
    ExternalTool {
        /// Tool name
        tool: String,
        /// Diagnostic text reported by the tool
        message: String,
    },

    /// Reading an operator answer failed.
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// A page selection string could not be parsed.
    #[error("Invalid page selection '{selection}': {reason}")]
    InvalidPageSelection {
        /// The selection as given
        selection: String,
        /// What is wrong with it
        reason: String,
    },

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error during rendering (HTML, RML, visual diff).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
        }
    }
}

impl Error {
    /// Build an [`Error::ExternalTool`] from a tool name and its stderr.
    pub fn external(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ExternalTool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );

        let err = Error::external("pdftotext", "Syntax Error: Couldn't read xref table");
        assert_eq!(
            err.to_string(),
            "pdftotext failed: Syntax Error: Couldn't read xref table"
        );
    }

    #[test]
    fn test_invalid_page_size_display() {
        let err = Error::InvalidPageSize {
            page: 2,
            width: 0.0,
            height: 842.0,
        };
        assert_eq!(err.to_string(), "Page 2 has invalid size 0x842");
    }

    #[test]
    fn test_invalid_page_selection_display() {
        let err = Error::InvalidPageSelection {
            selection: "0-3".into(),
            reason: "pages are numbered from 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid page selection '0-3': pages are numbered from 1"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
