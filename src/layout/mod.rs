//! Layout-analysis ingestion and per-page assembly.
//!
//! Converts the analysis engine's per-page regions into [`Page`](crate::model::Page)s,
//! computes emission order and maps region boxes into target page space.

mod headers;
mod options;
mod order;
mod source;
mod transform;

pub use headers::{
    postprocess, Detection, DetectionBox, HeaderDetector, HeaderMarker, JsonHeaderDetections,
    Letterbox, RawHeaderDetections, RawPageDetections,
};
pub use options::AssembleOptions;
pub use order::{OrderPolicy, PageOrder, ReadingOrderAssembler};
pub use source::{AnalyzedElement, AnalyzedPage, JsonLayoutFile, LayoutExport, LayoutSource};
pub use transform::{CoordinateTransformer, Frame, PageSize};
