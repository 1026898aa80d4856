//! Page-description to PDF conversion.
//!
//! Turning RML into a tagged PDF is left to an external renderer. This module
//! defines the seam and a converter that shells out to a configured program.
//!
//! # Example
//!
//! ```no_run
//! use pdfair::convert::{CommandConverter, RmlConverter};
//! use std::path::Path;
//!
//! fn main() -> pdfair::Result<()> {
//!     let converter = CommandConverter::new("rml2pdf");
//!     converter.convert("<!DOCTYPE document SYSTEM \"rml_1_0.dtd\">...", Path::new("out.pdf"))?;
//!     Ok(())
//! }
//! ```

mod command;

pub use command::CommandConverter;

use crate::error::Result;
use std::path::Path;

/// Trait for RML to PDF converters.
///
/// A failed conversion aborts the document: a partially written page
/// description cannot be salvaged.
pub trait RmlConverter: Send + Sync {
    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Render `rml` into a PDF at `output`.
    fn convert(&self, rml: &str, output: &Path) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Keeps the last document instead of rendering it.
    #[derive(Default)]
    struct Capture(Mutex<Option<String>>);

    impl RmlConverter for Capture {
        fn name(&self) -> &str {
            "capture"
        }

        fn convert(&self, rml: &str, _output: &Path) -> Result<()> {
            if let Ok(mut last) = self.0.lock() {
                *last = Some(rml.to_string());
            }
            Ok(())
        }
    }

    #[test]
    fn test_converter_as_trait_object() {
        let capture = Capture::default();
        let converter: &dyn RmlConverter = &capture;
        converter.convert("<document/>", Path::new("out.pdf")).unwrap();
        assert_eq!(converter.name(), "capture");
        assert_eq!(
            capture.0.lock().unwrap().as_deref(),
            Some("<document/>")
        );
    }
}
