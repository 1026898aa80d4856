//! Page-header detection support.
//!
//! The detector runs on page images rendered at a different resolution than
//! the layout analysis, so element boxes are rescaled before the centroid test.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Page;

/// A detected header box in detector pixel space, corners `(x1, y1)` and `(x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionBox {
    /// Left edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
    /// Right edge
    pub x2: f32,
    /// Bottom edge
    pub y2: f32,
}

impl DetectionBox {
    /// Create a new detection box.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Check whether a point lies inside the box, edges included.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }

    fn area(&self) -> f32 {
        (self.x2 - self.x1) * (self.y2 - self.y1)
    }

    /// Intersection over union with another box.
    pub fn iou(&self, other: &DetectionBox) -> f32 {
        let w = (self.x2.min(other.x2) - self.x1.max(other.x1)).max(0.0);
        let h = (self.y2.min(other.y2) - self.y1.max(other.y1)).max(0.0);
        let inter = w * h;
        inter / (self.area() + other.area() - inter + 1e-6)
    }
}

/// A handle to a header-detection model.
pub trait HeaderDetector {
    /// Detect header boxes on one 1-indexed page of a PDF.
    fn detect(&self, pdf: &Path, page: u32) -> Result<Vec<DetectionBox>>;
}

/// A [`HeaderDetector`] backed by precomputed detections.
///
/// The file maps page numbers to box lists:
/// `{"1": [{"x1": 0, "y1": 0, "x2": 600, "y2": 90}]}`.
#[derive(Debug, Clone, Default)]
pub struct JsonHeaderDetections {
    pages: HashMap<u32, Vec<DetectionBox>>,
}

impl JsonHeaderDetections {
    /// Load detections from a JSON file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let json = fs::read_to_string(&path)?;
        log::debug!("Loaded header detections from {}", path.display());
        Self::parse_str(&json)
    }

    /// Parse detections from a JSON string.
    pub fn parse_str(json: &str) -> Result<Self> {
        let pages = serde_json::from_str(json)?;
        Ok(Self { pages })
    }
}

impl HeaderDetector for JsonHeaderDetections {
    fn detect(&self, _pdf: &Path, page: u32) -> Result<Vec<DetectionBox>> {
        Ok(self.pages.get(&page).cloned().unwrap_or_default())
    }
}

fn default_confidence_threshold() -> f32 {
    0.25
}

/// Raw detector rows for one page image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPageDetections {
    /// Width of the rendered page image
    pub image_width: u32,
    /// Height of the rendered page image
    pub image_height: u32,
    /// `[x1, y1, x2, y2, confidence, class]` rows in detector input space
    #[serde(default)]
    pub rows: Vec<[f32; 6]>,
}

/// A [`HeaderDetector`] over unprocessed model output.
///
/// Rows are letterbox-mapped back onto each page image and filtered with
/// [`postprocess`] before use:
///
/// ```
/// use std::path::Path;
/// use pdfair::layout::{HeaderDetector, RawHeaderDetections};
///
/// let raw = RawHeaderDetections::parse_str(r#"{
///     "input_width": 640, "input_height": 640,
///     "pages": {"1": {"image_width": 1280, "image_height": 640,
///                     "rows": [[0, 160, 640, 200, 0.9, 0]]}}
/// }"#).unwrap();
/// let boxes = raw.detect(Path::new("doc.pdf"), 1).unwrap();
/// assert_eq!(boxes.len(), 1);
/// assert_eq!(boxes[0].x2, 1280.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHeaderDetections {
    /// Detector input width
    pub input_width: u32,
    /// Detector input height
    pub input_height: u32,
    /// Rows below this confidence are dropped
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    /// Rows per 1-indexed page
    #[serde(default)]
    pub pages: HashMap<u32, RawPageDetections>,
}

impl RawHeaderDetections {
    /// Load raw detections from a JSON file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let json = fs::read_to_string(&path)?;
        log::debug!("Loaded raw header detections from {}", path.display());
        Self::parse_str(&json)
    }

    /// Parse raw detections from a JSON string.
    pub fn parse_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl HeaderDetector for RawHeaderDetections {
    fn detect(&self, _pdf: &Path, page: u32) -> Result<Vec<DetectionBox>> {
        let Some(raw) = self.pages.get(&page) else {
            return Ok(Vec::new());
        };
        let letterbox = Letterbox::fit(
            raw.image_width,
            raw.image_height,
            self.input_width,
            self.input_height,
        );
        let boxes = postprocess(&raw.rows, &letterbox, self.confidence_threshold);
        log::debug!(
            "Page {}: {} of {} raw detection(s) kept",
            page,
            boxes.len(),
            raw.rows.len()
        );
        Ok(boxes)
    }
}

/// Flags page elements whose centre falls inside a detected header box.
#[derive(Debug, Clone, Copy)]
pub struct HeaderMarker {
    /// Resolution the layout analysis boxes are expressed in
    pub layout_dpi: f32,
    /// Resolution the detector saw the page at
    pub detection_dpi: f32,
}

impl Default for HeaderMarker {
    fn default() -> Self {
        Self {
            layout_dpi: 108.0,
            detection_dpi: 72.0,
        }
    }
}

impl HeaderMarker {
    /// Create a marker with the default resolutions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout analysis resolution.
    pub fn with_layout_dpi(mut self, dpi: f32) -> Self {
        self.layout_dpi = dpi;
        self
    }

    /// Set the detector resolution.
    pub fn with_detection_dpi(mut self, dpi: f32) -> Self {
        self.detection_dpi = dpi;
        self
    }

    /// Factor from layout space into detector space.
    pub fn scale(&self) -> f32 {
        self.detection_dpi / self.layout_dpi
    }

    /// Set `is_header` on every element of `page` and return how many were flagged.
    ///
    /// Flags from a previous run are cleared first.
    pub fn mark(&self, page: &mut Page, boxes: &[DetectionBox]) -> usize {
        let scale = self.scale();
        let mut marked = 0;
        for element in &mut page.elements {
            let (x, y) = element.bounding_box.scaled(scale).centroid();
            element.is_header = boxes.iter().any(|b| b.contains(x, y));
            if element.is_header {
                marked += 1;
            }
        }
        log::debug!("Page {}: {} header element(s)", page.number, marked);
        marked
    }
}

/// One raw detector output row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Box in detector input space
    pub bbox: DetectionBox,
    /// Objectness score
    pub confidence: f32,
    /// Class index; the header model has a single class
    pub class: f32,
}

impl Detection {
    /// Build from a `[x1, y1, x2, y2, confidence, class]` row.
    pub fn from_row(row: [f32; 6]) -> Self {
        Self {
            bbox: DetectionBox::new(row[0], row[1], row[2], row[3]),
            confidence: row[4],
            class: row[5],
        }
    }
}

/// Aspect-preserving resize of a page image into the detector input, padded evenly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Source image width
    pub image_width: f32,
    /// Source image height
    pub image_height: f32,
    /// Resize ratio applied to both axes
    pub ratio: f32,
    /// Horizontal padding on each side
    pub pad_x: f32,
    /// Vertical padding on each side
    pub pad_y: f32,
}

impl Letterbox {
    /// Fit an image into a detector input of `input_width` by `input_height`.
    pub fn fit(image_width: u32, image_height: u32, input_width: u32, input_height: u32) -> Self {
        let (iw, ih) = (image_width as f32, image_height as f32);
        let ratio = (input_height as f32 / ih).min(input_width as f32 / iw);
        let unpad_w = (iw * ratio).round();
        let unpad_h = (ih * ratio).round();
        Self {
            image_width: iw,
            image_height: ih,
            ratio,
            pad_x: (input_width as f32 - unpad_w) / 2.0,
            pad_y: (input_height as f32 - unpad_h) / 2.0,
        }
    }

    /// Map a box from detector input space back onto the source image.
    pub fn unmap(&self, b: &DetectionBox) -> DetectionBox {
        let x = |v: f32| ((v - self.pad_x) / self.ratio).clamp(0.0, self.image_width);
        let y = |v: f32| ((v - self.pad_y) / self.ratio).clamp(0.0, self.image_height);
        DetectionBox::new(x(b.x1), y(b.y1), x(b.x2), y(b.y2))
    }
}

/// Turn raw detector rows into header boxes on the source image.
///
/// Empty rows and rows under `confidence_threshold` are dropped; the rest are
/// mapped back through the letterbox, then any box touching a more confident
/// kept box is suppressed.
pub fn postprocess(
    raw: &[[f32; 6]],
    letterbox: &Letterbox,
    confidence_threshold: f32,
) -> Vec<DetectionBox> {
    let mut detections: Vec<Detection> = raw
        .iter()
        .filter(|row| row.iter().any(|&v| v != 0.0))
        .map(|&row| Detection::from_row(row))
        .filter(|d| d.confidence >= confidence_threshold)
        .map(|d| Detection {
            bbox: letterbox.unmap(&d.bbox),
            ..d
        })
        .collect();

    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<DetectionBox> = Vec::new();
    for d in detections {
        if kept.iter().all(|k| k.iou(&d.bbox) <= 0.0) {
            kept.push(d.bbox);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, Category, LayoutElement};

    fn element(ulx: f32, uly: f32, w: f32, h: f32) -> LayoutElement {
        LayoutElement::new(Category::Paragraph, "x", BoundingBox::new(ulx, uly, w, h))
    }

    #[test]
    fn test_mark_scales_to_detection_space() {
        // Centroid (150, 75) at 108 dpi is (100, 50) at 72 dpi.
        let mut page = Page::new(1, 1240.0, 1754.0)
            .with_element(element(100.0, 50.0, 100.0, 50.0))
            .with_element(element(100.0, 900.0, 100.0, 50.0));
        let boxes = [DetectionBox::new(90.0, 40.0, 110.0, 60.0)];

        let marked = HeaderMarker::new().mark(&mut page, &boxes);
        assert_eq!(marked, 1);
        assert!(page.elements[0].is_header);
        assert!(!page.elements[1].is_header);
    }

    #[test]
    fn test_mark_resets_previous_flags() {
        let mut page = Page::a4(1).with_element(element(0.0, 700.0, 10.0, 10.0).as_header());
        assert_eq!(HeaderMarker::new().mark(&mut page, &[]), 0);
        assert!(!page.elements[0].is_header);
    }

    #[test]
    fn test_json_detections() {
        let detections =
            JsonHeaderDetections::parse_str(r#"{"2": [{"x1": 0, "y1": 0, "x2": 10, "y2": 10}]}"#)
                .unwrap();
        let pdf = Path::new("doc.pdf");
        assert_eq!(detections.detect(pdf, 2).unwrap().len(), 1);
        assert!(detections.detect(pdf, 1).unwrap().is_empty());
    }

    #[test]
    fn test_raw_detections_mark_headers() {
        // A 1240x1754 layout page rendered at 72 dpi is 827x1169.
        let raw = RawHeaderDetections::parse_str(
            r#"{
                "input_width": 640, "input_height": 640,
                "pages": {"1": {"image_width": 827, "image_height": 1169, "rows": [
                    [0, 0, 0, 0, 0, 0],
                    [100, 0, 540, 60, 0.8, 0],
                    [100, 600, 540, 640, 0.1, 0]
                ]}}
            }"#,
        )
        .unwrap();
        assert_eq!(raw.confidence_threshold, 0.25);

        let pdf = Path::new("doc.pdf");
        assert!(raw.detect(pdf, 2).unwrap().is_empty());
        let boxes = raw.detect(pdf, 1).unwrap();
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].y1, 0.0);

        let mut page = Page::new(1, 1240.0, 1754.0)
            .with_element(element(100.0, 10.0, 1000.0, 40.0))
            .with_element(element(100.0, 800.0, 1000.0, 40.0));
        assert_eq!(HeaderMarker::new().mark(&mut page, &boxes), 1);
        assert!(page.elements[0].is_header);
    }

    #[test]
    fn test_letterbox_fit() {
        let lb = Letterbox::fit(1280, 640, 640, 640);
        assert_eq!(lb.ratio, 0.5);
        assert_eq!(lb.pad_x, 0.0);
        assert_eq!(lb.pad_y, 160.0);

        let b = lb.unmap(&DetectionBox::new(0.0, 160.0, 640.0, 480.0));
        assert_eq!(b, DetectionBox::new(0.0, 0.0, 1280.0, 640.0));
    }

    #[test]
    fn test_postprocess_filters_and_suppresses() {
        let lb = Letterbox::fit(640, 640, 640, 640);
        let raw = [
            [0.0; 6],
            [10.0, 10.0, 100.0, 50.0, 0.6, 0.0],
            [20.0, 20.0, 120.0, 60.0, 0.9, 0.0],
            [300.0, 300.0, 400.0, 350.0, 0.1, 0.0],
            [500.0, 10.0, 700.0, 50.0, 0.5, 0.0],
        ];
        let boxes = postprocess(&raw, &lb, 0.25);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0], DetectionBox::new(20.0, 20.0, 120.0, 60.0));
        // Clipped to the image width.
        assert_eq!(boxes[1], DetectionBox::new(500.0, 10.0, 640.0, 50.0));
    }
}
