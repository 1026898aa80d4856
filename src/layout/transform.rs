//! Mapping from analysis space to target page space.
//!
//! Analysis space has its origin at the upper-left corner with y growing
//! downward. Target space (RML frames) has its origin at the lower-left
//! corner with y growing upward, so the frame is anchored on the region's
//! bottom edge.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{BoundingBox, Page};

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Width in points
    pub width: f32,
    /// Height in points
    pub height: f32,
}

impl PageSize {
    /// A4 in points, rounded the way RML page sizes are written.
    pub const A4: PageSize = PageSize {
        width: 595.0,
        height: 842.0,
    };

    /// Letter in points.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    /// Create a new page size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// A positioned rectangle in target space (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    /// Frame width
    pub width: f32,
    /// Frame height
    pub height: f32,
}

/// Maps boxes from one analysed page into a target page.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateTransformer {
    source: PageSize,
    target: PageSize,
}

impl CoordinateTransformer {
    /// Create a transformer between two page sizes.
    ///
    /// Both axes are scaled independently, so differing aspect ratios
    /// stretch rather than letterbox.
    pub fn new(source: PageSize, target: PageSize) -> Result<Self> {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if !usable(source.width) || !usable(source.height) {
            return Err(Error::InvalidPageSize {
                page: 0,
                width: source.width,
                height: source.height,
            });
        }
        Ok(Self { source, target })
    }

    /// Create a transformer for a model page.
    pub fn for_page(page: &Page, target: PageSize) -> Result<Self> {
        Self::new(PageSize::new(page.width, page.height), target).map_err(|_| {
            Error::InvalidPageSize {
                page: page.number,
                width: page.width,
                height: page.height,
            }
        })
    }

    /// Horizontal scale factor.
    pub fn scale_x(&self) -> f32 {
        self.target.width / self.source.width
    }

    /// Vertical scale factor.
    pub fn scale_y(&self) -> f32 {
        self.target.height / self.source.height
    }

    /// Map a box into target space.
    pub fn transform(&self, bb: &BoundingBox) -> Frame {
        // Divide before multiplying so full-page boxes land exactly on the target edges.
        let sx = |v: f32| v / self.source.width * self.target.width;
        let sy = |v: f32| v / self.source.height * self.target.height;

        Frame {
            x: sx(bb.ulx),
            y: self.target.height - sy(bb.lry()),
            width: sx(bb.width),
            height: sy(bb.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transformer(w: f32, h: f32) -> CoordinateTransformer {
        CoordinateTransformer::new(PageSize::new(w, h), PageSize::A4).unwrap()
    }

    #[test]
    fn test_full_page_maps_to_full_target() {
        let t = transformer(1240.0, 1754.0);
        let frame = t.transform(&BoundingBox::new(0.0, 0.0, 1240.0, 1754.0));
        assert_eq!(
            frame,
            Frame {
                x: 0.0,
                y: 0.0,
                width: 595.0,
                height: 842.0
            }
        );
    }

    #[test]
    fn test_vertical_flip() {
        let t = transformer(1000.0, 1000.0);

        let bottom = t.transform(&BoundingBox::new(0.0, 990.0, 100.0, 10.0));
        assert!(bottom.y.abs() < 1e-3);

        let top = t.transform(&BoundingBox::new(0.0, 0.0, 100.0, 10.0));
        assert!((top.y + top.height - 842.0).abs() < 1e-3);
        assert!((top.y - (842.0 - 8.42)).abs() < 1e-3);
    }

    #[test]
    fn test_non_uniform_scale() {
        let t = CoordinateTransformer::new(PageSize::new(100.0, 200.0), PageSize::new(50.0, 50.0))
            .unwrap();
        assert_eq!(t.scale_x(), 0.5);
        assert_eq!(t.scale_y(), 0.25);

        let frame = t.transform(&BoundingBox::new(20.0, 40.0, 20.0, 40.0));
        assert_eq!(frame.x, 10.0);
        assert_eq!(frame.width, 10.0);
        assert_eq!(frame.height, 10.0);
        assert_eq!(frame.y, 50.0 - 20.0);
    }

    #[test]
    fn test_rejects_degenerate_source() {
        assert!(CoordinateTransformer::new(PageSize::new(0.0, 10.0), PageSize::A4).is_err());

        let page = Page::new(4, 10.0, -1.0);
        assert!(matches!(
            CoordinateTransformer::for_page(&page, PageSize::A4),
            Err(Error::InvalidPageSize { page: 4, .. })
        ));
    }
}
