//! Document model types for layout-analysis content.
//!
//! This module defines the representation that bridges the layout-analysis
//! result and the structural renderers. Pages are built once and only
//! annotated afterwards (header flags); emission order is computed on read.

mod document;
mod page;

pub use document::{Document, Field, Metadata, MetadataField};
pub use page::{BoundingBox, Category, LayoutElement, Page};
