//! External per-document metadata from a CSV catalog.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

use super::SourceMetadata;

/// One catalog row. Column names follow the open-government export, with
/// short names accepted as well.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRow {
    /// Document identifier, matched against the PDF's file stem
    #[serde(alias = "dc_identifier")]
    pub id: String,
    /// Title (`dc_title`)
    #[serde(default, alias = "dc_title")]
    pub title: Option<String>,
    /// Publishing body (`dc_publisher_name`)
    #[serde(default, alias = "dc_publisher_name")]
    pub author: Option<String>,
    /// Description (`dc_description`)
    #[serde(default, alias = "dc_description")]
    pub subject: Option<String>,
    /// Creating application
    #[serde(default)]
    pub creator: Option<String>,
    /// Producing application
    #[serde(default)]
    pub producer: Option<String>,
    /// Publication date (`foi_publishedDate`)
    #[serde(default, alias = "foi_publishedDate")]
    pub creation_date: Option<String>,
}

impl From<CatalogRow> for SourceMetadata {
    fn from(row: CatalogRow) -> Self {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        SourceMetadata {
            title: present(row.title),
            author: present(row.author),
            subject: present(row.subject),
            creator: present(row.creator),
            producer: present(row.producer),
            creation_date: present(row.creation_date),
            modification_date: None,
        }
    }
}

/// Metadata for many documents, keyed by document identifier.
#[derive(Debug, Clone, Default)]
pub struct MetadataCatalog {
    entries: HashMap<String, SourceMetadata>,
}

impl MetadataCatalog {
    /// Load a catalog from a CSV file with a header row.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let catalog = Self::from_reader(std::fs::File::open(path)?)?;
        log::info!("Loaded {} catalog entries from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Load a catalog from any CSV source with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let mut entries = HashMap::new();
        for row in csv.deserialize::<CatalogRow>() {
            let row = row?;
            let id = row.id.trim().to_string();
            if entries.insert(id.clone(), row.into()).is_some() {
                log::warn!("Duplicate catalog id {}, keeping the last row", id);
            }
        }
        Ok(Self { entries })
    }

    /// Metadata for a document identifier.
    pub fn get(&self, id: &str) -> Option<&SourceMetadata> {
        self.entries.get(id)
    }

    /// Number of documents in the catalog.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
