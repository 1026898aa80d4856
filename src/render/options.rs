//! Rendering options and configuration.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};
use crate::layout::{OrderPolicy, PageSize};

/// Options for rendering a document.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Target page size for frame-based output
    pub page_size: PageSize,

    /// Document language tag (e.g., "nl-NL")
    pub language: String,

    /// Output file name written into the RML document header
    pub filename: String,

    /// TrueType fonts registered before rendering
    pub fonts: Vec<FontRegistration>,

    /// Face used for paragraphs and lists
    pub body_font: String,

    /// Face used for headings
    pub heading_font: String,

    /// Font size for both paragraph styles
    pub font_size: f32,

    /// Ordering policy for regions on a page
    pub order: OrderPolicy,

    /// Order pages on the rayon pool
    pub parallel: bool,

    /// Page selection
    pub page_selection: PageSelection,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the document language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the output file name recorded in the RML header.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Register an additional TrueType font.
    pub fn with_font(mut self, face: impl Into<String>, file: impl Into<String>) -> Self {
        self.fonts.push(FontRegistration {
            face: face.into(),
            file: file.into(),
        });
        self
    }

    /// Set the body and heading faces.
    pub fn with_faces(mut self, body: impl Into<String>, heading: impl Into<String>) -> Self {
        self.body_font = body.into();
        self.heading_font = heading.into();
        self
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set the ordering policy.
    pub fn with_order(mut self, order: OrderPolicy) -> Self {
        self.order = order;
        self
    }

    /// Enable or disable parallel page ordering.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }

    /// Primary language subtag ("nl" for "nl-NL").
    pub fn primary_language(&self) -> &str {
        self.language
            .split(['-', '_'])
            .next()
            .unwrap_or(&self.language)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            language: "nl-NL".to_string(),
            filename: "output.pdf".to_string(),
            fonts: vec![
                FontRegistration::new("Helvetica", "font/Helvetica.ttf"),
                FontRegistration::new("Helvetica-Bold", "font/HelveticaBold.ttf"),
            ],
            body_font: "Helvetica".to_string(),
            heading_font: "Helvetica-Bold".to_string(),
            font_size: 9.0,
            order: OrderPolicy::ReadingOrder,
            parallel: false,
            page_selection: PageSelection::All,
        }
    }
}

/// A TrueType font registered in the RML document initialisation block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRegistration {
    /// Face name referenced by styles
    pub face: String,
    /// Path to the `.ttf` file
    pub file: String,
}

impl FontRegistration {
    /// Create a font registration.
    pub fn new(face: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            face: face.into(),
            file: file.into(),
        }
    }
}

/// Page selection for rendering and evaluation.
#[derive(Debug, Clone, Default)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Selected page numbers of a document with `page_count` pages.
    pub fn resolve(&self, page_count: u32) -> Vec<u32> {
        (1..=page_count).filter(|p| self.includes(*p)).collect()
    }

    /// Parse a selection such as `"3"`, `"2-5"` or `"1,4,7-9"`.
    ///
    /// Pages are numbered from 1, the numbering shared by the layout export
    /// and the reference extractor. A lone range becomes [`PageSelection::Range`];
    /// anything else becomes a sorted, deduplicated [`PageSelection::Pages`].
    pub fn parse(selection: &str) -> Result<Self> {
        let selection = selection.trim();
        if selection.is_empty() || selection.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        let invalid = |reason: String| Error::InvalidPageSelection {
            selection: selection.to_string(),
            reason,
        };
        let page = |text: &str| -> Result<u32> {
            match text.trim().parse::<u32>() {
                Ok(0) => Err(invalid("pages are numbered from 1".into())),
                Ok(p) => Ok(p),
                Err(_) => Err(invalid(format!("'{}' is not a page number", text.trim()))),
            }
        };

        let mut ranges = Vec::new();
        for part in selection.split(',') {
            let (first, last) = match part.split_once('-') {
                Some((a, b)) => (page(a)?, page(b)?),
                None => {
                    let p = page(part)?;
                    (p, p)
                }
            };
            if first > last {
                return Err(invalid(format!("range {}-{} runs backwards", first, last)));
            }
            ranges.push((part.contains('-'), first..=last));
        }

        if let [(true, range)] = ranges.as_slice() {
            return Ok(PageSelection::Range(range.clone()));
        }
        let mut pages: Vec<u32> = ranges.into_iter().flat_map(|(_, r)| r).collect();
        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}
