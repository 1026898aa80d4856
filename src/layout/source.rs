//! Layout-analysis result loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{BoundingBox, Category, LayoutElement, Page};

/// A handle to a layout-analysis engine.
///
/// Implementations are constructed by the caller and passed in; nothing in
/// this crate keeps an analyzer alive between documents.
pub trait LayoutSource {
    /// Analyse a PDF and return its pages in page order.
    fn analyze(&self, pdf: &Path) -> Result<Vec<AnalyzedPage>>;
}

/// Top-level shape of an exported analysis result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutExport {
    /// Pages in page order
    pub pages: Vec<AnalyzedPage>,
}

/// One page record as produced by the analysis engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedPage {
    /// Page width in analysis space
    pub width: f32,

    /// Page height in analysis space
    pub height: f32,

    /// Detected regions
    #[serde(default, alias = "elements")]
    pub layouts: Vec<AnalyzedElement>,
}

impl AnalyzedPage {
    /// Create an empty page record.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            layouts: Vec::new(),
        }
    }

    /// Append a region.
    pub fn with_element(mut self, element: AnalyzedElement) -> Self {
        self.layouts.push(element);
        self
    }

    /// Convert into a model page with the given 1-indexed number.
    pub fn into_page(self, number: u32) -> Result<Page> {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if !usable(self.width) || !usable(self.height) {
            return Err(Error::InvalidPageSize {
                page: number,
                width: self.width,
                height: self.height,
            });
        }

        let mut page = Page::new(number, self.width, self.height);
        for el in self.layouts {
            page.add_element(el.into_element());
        }
        Ok(page)
    }
}

/// One region record as produced by the analysis engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedElement {
    /// Open-ended category name (`text`, `title`, `list`, `figure`, ...)
    pub category_name: String,

    /// Recognised text
    #[serde(default)]
    pub text: Option<String>,

    /// Region bounds
    pub bounding_box: BoundingBox,

    /// Reading-order key
    #[serde(default)]
    pub reading_order: Option<i64>,
}

impl AnalyzedElement {
    /// Create a region record without reading order.
    pub fn new(category_name: impl Into<String>, text: impl Into<String>, bb: BoundingBox) -> Self {
        Self {
            category_name: category_name.into(),
            text: Some(text.into()),
            bounding_box: bb,
            reading_order: None,
        }
    }

    /// Set the reading-order key.
    pub fn with_reading_order(mut self, order: i64) -> Self {
        self.reading_order = Some(order);
        self
    }

    fn into_element(self) -> LayoutElement {
        LayoutElement {
            category: Category::from_name(&self.category_name),
            text: self.text.unwrap_or_default(),
            bounding_box: self.bounding_box,
            reading_order: self.reading_order,
            is_header: false,
        }
    }
}

/// A [`LayoutSource`] backed by an exported JSON analysis result.
#[derive(Debug, Clone)]
pub struct JsonLayoutFile {
    path: PathBuf,
}

impl JsonLayoutFile {
    /// Use the export at `path` regardless of which PDF is analysed.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse an export from a JSON string.
    pub fn parse_str(json: &str) -> Result<Vec<AnalyzedPage>> {
        let export: LayoutExport = serde_json::from_str(json)?;
        Ok(export.pages)
    }
}

impl LayoutSource for JsonLayoutFile {
    fn analyze(&self, pdf: &Path) -> Result<Vec<AnalyzedPage>> {
        log::debug!(
            "Loading layout analysis for {} from {}",
            pdf.display(),
            self.path.display()
        );
        let json = fs::read_to_string(&self.path)?;
        Self::parse_str(&json)
    }
}
