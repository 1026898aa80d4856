//! Metadata resolution.
//!
//! Merges metadata from several sources into one [`Metadata`] record. Sources
//! are consulted in priority order; the first one that has a non-blank value
//! for a field wins and later sources never overwrite it. Fields no source
//! supplies are handed to a [`MissingFieldResolver`].

mod catalog;
mod pdf_info;
mod resolver;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Field, Metadata, MetadataField};

pub use catalog::{CatalogRow, MetadataCatalog};
pub use pdf_info::{from_info_dict, read_native};
pub use resolver::{ForcedResolver, MissingFieldResolver, PromptResolver, RunMode};

/// Metadata as supplied by one source. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Document title
    pub title: Option<String>,
    /// Author or publishing body
    pub author: Option<String>,
    /// Subject or description
    pub subject: Option<String>,
    /// Creating application
    pub creator: Option<String>,
    /// Producing application
    pub producer: Option<String>,
    /// Creation date as the source wrote it
    pub creation_date: Option<String>,
    /// Last modification time
    pub modification_date: Option<DateTime<Utc>>,
}

impl SourceMetadata {
    /// Create an all-absent record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the producer.
    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = Some(producer.into());
        self
    }

    /// Text value of a field, `None` when absent or blank.
    ///
    /// The modification date is not a text field and always yields `None`.
    pub fn get(&self, field: MetadataField) -> Option<&str> {
        let value = match field {
            MetadataField::Title => self.title.as_deref(),
            MetadataField::Author => self.author.as_deref(),
            MetadataField::Subject => self.subject.as_deref(),
            MetadataField::Creator => self.creator.as_deref(),
            MetadataField::Producer => self.producer.as_deref(),
            MetadataField::CreationDate => self.creation_date.as_deref(),
            MetadataField::ModificationDate => None,
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Check if no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.modification_date.is_none()
            && MetadataField::ALL.iter().all(|f| self.get(*f).is_none())
    }
}

/// Resolves one [`Metadata`] record per document.
pub struct MetadataResolver<R = Box<dyn MissingFieldResolver>> {
    fallback: R,
}

impl MetadataResolver {
    /// Create a resolver whose fallback follows the run mode.
    pub fn for_mode(mode: RunMode) -> Self {
        Self::new(mode.resolver())
    }
}

impl<R: MissingFieldResolver> MetadataResolver<R> {
    /// Create a resolver with an explicit fallback strategy.
    pub fn new(fallback: R) -> Self {
        Self { fallback }
    }

    /// Consume the resolver and return its fallback strategy.
    pub fn into_inner(self) -> R {
        self.fallback
    }

    /// Merge `sources` (highest priority first) and fill the gaps.
    ///
    /// A missing modification date is set to the current time and never
    /// handed to the fallback.
    pub fn resolve(&mut self, sources: &[&SourceMetadata]) -> Result<Metadata> {
        let mut field = |f: MetadataField| -> Result<Field> {
            match sources.iter().find_map(|s| s.get(f)) {
                Some(v) => Ok(Field::Value(v.to_string())),
                None => self.fallback.resolve(f),
            }
        };

        let title = field(MetadataField::Title)?;
        let author = field(MetadataField::Author)?;
        let subject = field(MetadataField::Subject)?;
        let creator = field(MetadataField::Creator)?;
        let producer = field(MetadataField::Producer)?;
        let creation_date = field(MetadataField::CreationDate)?;

        let modification_date = sources
            .iter()
            .find_map(|s| s.modification_date)
            .unwrap_or_else(Utc::now);

        Ok(Metadata {
            title,
            author,
            subject,
            creator,
            producer,
            creation_date,
            modification_date,
        })
    }

    /// Resolve metadata for a PDF: `external` first, then the file's own Info dictionary.
    ///
    /// A file whose metadata cannot be read counts as a source with no values.
    pub fn resolve_pdf(
        &mut self,
        pdf: &Path,
        external: Option<&SourceMetadata>,
    ) -> Result<Metadata> {
        let native = match read_native(pdf) {
            Ok(native) => native,
            Err(e) => {
                log::warn!(
                    "{}: could not read embedded metadata, treating all fields as absent: {}",
                    pdf.display(),
                    e
                );
                SourceMetadata::default()
            }
        };

        let mut sources: Vec<&SourceMetadata> = Vec::with_capacity(2);
        sources.extend(external);
        sources.push(&native);
        self.resolve(&sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records which fields were requested.
    #[derive(Default)]
    struct Recording {
        asked: Vec<MetadataField>,
    }

    impl MissingFieldResolver for Recording {
        fn resolve(&mut self, field: MetadataField) -> Result<Field> {
            self.asked.push(field);
            Ok(Field::Value(format!("asked {}", field.key())))
        }
    }

    #[test]
    fn test_forced_mode_fills_every_field() {
        let mut resolver = MetadataResolver::for_mode(RunMode::Forced);
        let metadata = resolver.resolve(&[]).unwrap();
        assert_eq!(metadata.title, Field::Undefined);
        assert_eq!(metadata.author, Field::Undefined);
        assert_eq!(metadata.subject, Field::Undefined);
        assert_eq!(metadata.creator, Field::Undefined);
        assert_eq!(metadata.producer, Field::Undefined);
        assert_eq!(metadata.creation_date, Field::Undefined);
    }

    #[test]
    fn test_earlier_source_wins() {
        let external = SourceMetadata::new()
            .with_title("Besluit Woo-verzoek")
            .with_producer("");
        let native = SourceMetadata::new()
            .with_title("scan0001")
            .with_author("Ministerie")
            .with_producer("Scanner");

        let mut resolver = MetadataResolver::new(ForcedResolver);
        let metadata = resolver.resolve(&[&external, &native]).unwrap();
        assert_eq!(metadata.title.as_str(), "Besluit Woo-verzoek");
        assert_eq!(metadata.author.as_str(), "Ministerie");
        // Blank external value counts as absent.
        assert_eq!(metadata.producer.as_str(), "Scanner");
        assert!(metadata.subject.is_undefined());
    }

    #[test]
    fn test_fallback_only_for_missing_fields() {
        let native = SourceMetadata::new().with_title("T").with_subject("S");
        let mut resolver = MetadataResolver::new(Recording::default());
        let metadata = resolver.resolve(&[&native]).unwrap();

        assert_eq!(metadata.author.as_str(), "asked author");
        let asked = resolver.into_inner().asked;
        assert_eq!(
            asked,
            vec![
                MetadataField::Author,
                MetadataField::Creator,
                MetadataField::Producer,
                MetadataField::CreationDate
            ]
        );
    }

    #[test]
    fn test_modification_date_from_source_or_now() {
        let date = DateTime::parse_from_rfc3339("2024-01-15T10:30:45Z")
            .unwrap()
            .with_timezone(&Utc);
        let native = SourceMetadata {
            modification_date: Some(date),
            ..Default::default()
        };
        let mut resolver = MetadataResolver::new(ForcedResolver);
        assert_eq!(
            resolver.resolve(&[&native]).unwrap().modification_date,
            date
        );

        let before = Utc::now();
        let metadata = resolver.resolve(&[]).unwrap();
        assert!(metadata.modification_date >= before);
    }

    #[test]
    fn test_unreadable_pdf_is_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("broken.pdf");
        std::fs::write(&pdf, b"not a pdf").unwrap();

        let external = SourceMetadata::new().with_title("From catalog");
        let mut resolver = MetadataResolver::new(ForcedResolver);
        let metadata = resolver.resolve_pdf(&pdf, Some(&external)).unwrap();
        assert_eq!(metadata.title.as_str(), "From catalog");
        assert!(metadata.author.is_undefined());
    }

    #[test]
    fn test_source_metadata_is_empty() {
        assert!(SourceMetadata::new().is_empty());
        assert!(SourceMetadata::new().with_title(" ").is_empty());
        assert!(!SourceMetadata::new().with_author("A").is_empty());
    }
}
