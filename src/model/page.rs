//! Page-level types.

use serde::{Deserialize, Serialize};

/// A single analysed page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in analysis space
    pub width: f32,

    /// Page height in analysis space
    pub height: f32,

    /// Detected regions, in the order the analysis engine produced them
    pub elements: Vec<LayoutElement>,
}

impl Page {
    /// Create a new page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            elements: Vec::new(),
        }
    }

    /// Create a new page with A4 size in points.
    pub fn a4(number: u32) -> Self {
        Self::new(number, 595.0, 842.0)
    }

    /// Add an element to the page.
    pub fn add_element(&mut self, element: LayoutElement) {
        self.elements.push(element);
    }

    /// Builder variant of [`Page::add_element`].
    pub fn with_element(mut self, element: LayoutElement) -> Self {
        self.add_element(element);
        self
    }

    /// Check if the page has no regions.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the number of regions on the page.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Text of all header regions in input order, separated by blank lines.
    pub fn header_text(&self) -> String {
        self.elements
            .iter()
            .filter(|e| e.is_header)
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// One detected region on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutElement {
    /// Semantic category
    pub category: Category,

    /// Recognised text, possibly empty
    pub text: String,

    /// Region bounds in analysis space
    pub bounding_box: BoundingBox,

    /// Reading-order key, absent for legacy flows
    pub reading_order: Option<i64>,

    /// Set by header detection only
    #[serde(default)]
    pub is_header: bool,
}

impl LayoutElement {
    /// Create a new element without reading order.
    pub fn new(category: Category, text: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self {
            category,
            text: text.into(),
            bounding_box,
            reading_order: None,
            is_header: false,
        }
    }

    /// Set the reading-order key.
    pub fn with_reading_order(mut self, order: i64) -> Self {
        self.reading_order = Some(order);
        self
    }

    /// Flag the element as a page header.
    pub fn as_header(mut self) -> Self {
        self.is_header = true;
        self
    }
}

/// Axis-aligned box with its origin at the upper-left corner, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Upper-left x
    pub ulx: f32,
    /// Upper-left y
    pub uly: f32,
    /// Box width
    pub width: f32,
    /// Box height
    pub height: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(ulx: f32, uly: f32, width: f32, height: f32) -> Self {
        Self {
            ulx,
            uly,
            width,
            height,
        }
    }

    /// Lower-right x.
    pub fn lrx(&self) -> f32 {
        self.ulx + self.width
    }

    /// Lower-right y (the bottom edge).
    pub fn lry(&self) -> f32 {
        self.uly + self.height
    }

    /// Box centre.
    pub fn centroid(&self) -> (f32, f32) {
        ((self.ulx + self.lrx()) / 2.0, (self.uly + self.lry()) / 2.0)
    }

    /// Uniformly scale every coordinate.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            ulx: self.ulx * factor,
            uly: self.uly * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// Semantic category of a region.
///
/// The analysis engine reports an open-ended category name; only `text`,
/// `title` and `list` carry structure, everything else is kept by name so
/// diagnostics can report it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Body text (`text`)
    Paragraph,
    /// Section heading (`title`)
    Heading,
    /// List region, kept as one block (`list`)
    List,
    /// Figures, tables, lines and anything else
    Unhandled(String),
}

impl Category {
    /// Classify an analysis category name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "text" => Category::Paragraph,
            "title" => Category::Heading,
            "list" => Category::List,
            other => Category::Unhandled(other.to_string()),
        }
    }

    /// The analysis category name.
    pub fn name(&self) -> &str {
        match self {
            Category::Paragraph => "text",
            Category::Heading => "title",
            Category::List => "list",
            Category::Unhandled(name) => name,
        }
    }

    /// Check if the category produces a content block.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Category::Unhandled(_))
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Category::from_name(&name)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_new() {
        let page = Page::new(1, 612.0, 792.0);
        assert_eq!(page.number, 1);
        assert_eq!(page.dimensions(), (612.0, 792.0));
        assert!(page.is_empty());
    }

    #[test]
    fn test_category_from_name() {
        assert_eq!(Category::from_name("text"), Category::Paragraph);
        assert_eq!(Category::from_name("title"), Category::Heading);
        assert_eq!(Category::from_name("list"), Category::List);
        let figure = Category::from_name("figure");
        assert_eq!(figure, Category::Unhandled("figure".into()));
        assert_eq!(figure.name(), "figure");
        assert!(!figure.is_structural());
    }

    #[test]
    fn test_bounding_box_geometry() {
        let bb = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(bb.lrx(), 40.0);
        assert_eq!(bb.lry(), 60.0);
        assert_eq!(bb.centroid(), (25.0, 40.0));
        assert_eq!(bb.scaled(0.5), BoundingBox::new(5.0, 10.0, 15.0, 20.0));
    }

    #[test]
    fn test_header_text() {
        let bb = BoundingBox::default();
        let page = Page::a4(1)
            .with_element(LayoutElement::new(Category::Paragraph, "Ministerie", bb).as_header())
            .with_element(LayoutElement::new(Category::Paragraph, "Body", bb))
            .with_element(LayoutElement::new(Category::Paragraph, "Kenmerk", bb).as_header());
        assert_eq!(page.header_text(), "Ministerie\n\nKenmerk");
    }

    #[test]
    fn test_element_serde_uses_category_name() {
        let el = LayoutElement::new(Category::Heading, "Besluit", BoundingBox::default());
        let json = serde_json::to_string(&el).unwrap();
        assert!(json.contains("\"category\":\"title\""));
    }
}
