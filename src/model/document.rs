//! Document-level types.

use super::Page;
use crate::error::{Error, Result};
use crate::layout::AnalyzedPage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An assembled source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Source name used in diagnostics (usually the PDF file name)
    pub source: String,

    /// Resolved document metadata
    pub metadata: Metadata,

    /// Pages in the document
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document.
    pub fn new(source: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            source: source.into(),
            metadata,
            pages: Vec::new(),
        }
    }

    /// Build a document from layout-analysis pages.
    ///
    /// Pages are numbered from 1 in input order. A page without a usable
    /// size fails the whole document.
    pub fn from_analysis(
        source: impl Into<String>,
        pages: Vec<AnalyzedPage>,
        metadata: Metadata,
    ) -> Result<Self> {
        let mut doc = Self::new(source, metadata);
        for (i, analyzed) in pages.into_iter().enumerate() {
            let page = analyzed.into_page(i as u32 + 1)?;
            doc.add_page(page);
        }
        log::debug!("{}: assembled {} pages", doc.source, doc.page_count());
        Ok(doc)
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Get a mutable page by number (1-indexed).
    pub fn get_page_mut(&mut self, page_num: u32) -> Option<&mut Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get_mut((page_num - 1) as usize)
    }

    /// Get a page or fail with [`Error::PageOutOfRange`].
    pub fn page(&self, page_num: u32) -> Result<&Page> {
        self.get_page(page_num)
            .ok_or(Error::PageOutOfRange(page_num, self.page_count()))
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// A resolved metadata value: either concrete text or the `Undefined` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Field {
    /// A concrete value
    Value(String),
    /// No source supplied a value
    Undefined,
}

impl Field {
    /// Sentinel text for undefined fields.
    pub const UNDEFINED: &'static str = "Undefined";

    /// Build a field from an optional value, treating blank text as absent.
    pub fn from_option(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => Field::Value(v),
            _ => Field::Undefined,
        }
    }

    /// The text emitted for this field.
    pub fn as_str(&self) -> &str {
        match self {
            Field::Value(v) => v,
            Field::Undefined => Self::UNDEFINED,
        }
    }

    /// Check if this is the sentinel.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Field::Undefined)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        if s == Self::UNDEFINED {
            Field::Undefined
        } else {
            Field::Value(s)
        }
    }
}

impl From<Field> for String {
    fn from(field: Field) -> Self {
        match field {
            Field::Value(v) => v,
            Field::Undefined => Field::UNDEFINED.to_string(),
        }
    }
}

/// Metadata attribute names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    /// Document title
    Title,
    /// Author or publishing body
    Author,
    /// Subject or description
    Subject,
    /// Application that created the original
    Creator,
    /// Application that produced the PDF
    Producer,
    /// Creation or publication date, kept as text
    CreationDate,
    /// Last modification time
    ModificationDate,
}

impl MetadataField {
    /// All fields in resolution order.
    pub const ALL: [MetadataField; 7] = [
        MetadataField::Title,
        MetadataField::Author,
        MetadataField::Subject,
        MetadataField::Creator,
        MetadataField::Producer,
        MetadataField::CreationDate,
        MetadataField::ModificationDate,
    ];

    /// Human-readable label used when prompting.
    pub fn label(&self) -> &'static str {
        match self {
            MetadataField::Title => "Title",
            MetadataField::Author => "Author",
            MetadataField::Subject => "Subject",
            MetadataField::Creator => "Creator",
            MetadataField::Producer => "Producer",
            MetadataField::CreationDate => "Creation date",
            MetadataField::ModificationDate => "Modification date",
        }
    }

    /// Machine key used in descriptive output fields.
    pub fn key(&self) -> &'static str {
        match self {
            MetadataField::Title => "title",
            MetadataField::Author => "author",
            MetadataField::Subject => "subject",
            MetadataField::Creator => "creator",
            MetadataField::Producer => "producer",
            MetadataField::CreationDate => "creation_date",
            MetadataField::ModificationDate => "modification_date",
        }
    }
}

/// Resolved document metadata. No field is ever null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Field,

    /// Document author
    pub author: Field,

    /// Document subject
    pub subject: Field,

    /// Creator application
    pub creator: Field,

    /// PDF producer
    pub producer: Field,

    /// Creation date, emitted verbatim
    pub creation_date: Field,

    /// Last modification date
    pub modification_date: DateTime<Utc>,
}

impl Metadata {
    /// Metadata with every field undefined, modified now.
    pub fn undefined() -> Self {
        Self {
            title: Field::Undefined,
            author: Field::Undefined,
            subject: Field::Undefined,
            creator: Field::Undefined,
            producer: Field::Undefined,
            creation_date: Field::Undefined,
            modification_date: Utc::now(),
        }
    }

    /// Text value of a field as emitted by the renderers.
    pub fn value(&self, field: MetadataField) -> String {
        match field {
            MetadataField::Title => self.title.to_string(),
            MetadataField::Author => self.author.to_string(),
            MetadataField::Subject => self.subject.to_string(),
            MetadataField::Creator => self.creator.to_string(),
            MetadataField::Producer => self.producer.to_string(),
            MetadataField::CreationDate => self.creation_date.to_string(),
            MetadataField::ModificationDate => self.modification_date.to_rfc3339(),
        }
    }

    /// Descriptive `(key, value)` pairs for every attribute except the title.
    pub fn descriptive_fields(&self) -> Vec<(&'static str, String)> {
        MetadataField::ALL
            .iter()
            .filter(|f| **f != MetadataField::Title)
            .map(|f| (f.key(), self.value(*f)))
            .collect()
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::undefined()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{AnalyzedElement, AnalyzedPage};
    use crate::model::BoundingBox;

    #[test]
    fn test_document_new() {
        let doc = Document::new("a.pdf", Metadata::undefined());
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
        assert!(doc.get_page(0).is_none());
        assert!(matches!(doc.page(1), Err(Error::PageOutOfRange(1, 0))));
    }

    #[test]
    fn test_from_analysis_numbers_pages() {
        let pages = vec![
            AnalyzedPage::new(595.0, 842.0),
            AnalyzedPage::new(612.0, 792.0).with_element(AnalyzedElement::new(
                "text",
                "Hello",
                BoundingBox::new(10.0, 10.0, 100.0, 20.0),
            )),
        ];
        let doc = Document::from_analysis("a.pdf", pages, Metadata::undefined()).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.get_page(2).unwrap().number, 2);
        assert_eq!(doc.get_page(2).unwrap().elements.len(), 1);
    }

    #[test]
    fn test_from_analysis_rejects_empty_page_size() {
        let pages = vec![AnalyzedPage::new(0.0, 842.0)];
        let result = Document::from_analysis("a.pdf", pages, Metadata::undefined());
        assert!(matches!(
            result,
            Err(Error::InvalidPageSize { page: 1, .. })
        ));
    }

    #[test]
    fn test_field_sentinel() {
        assert_eq!(Field::Undefined.to_string(), "Undefined");
        assert_eq!(Field::from_option(Some("  ".into())), Field::Undefined);
        assert_eq!(
            Field::from_option(Some("Nota".into())),
            Field::Value("Nota".into())
        );
        assert_eq!(Field::from("Undefined".to_string()), Field::Undefined);
    }

    #[test]
    fn test_descriptive_fields_skip_title() {
        let mut metadata = Metadata::undefined();
        metadata.author = Field::Value("Ministerie".into());
        let fields = metadata.descriptive_fields();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[0], ("author", "Ministerie".to_string()));
        assert_eq!(fields[1], ("subject", "Undefined".to_string()));
        assert_eq!(fields[5].0, "modification_date");
    }
}
