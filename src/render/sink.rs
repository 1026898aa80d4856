//! Shared document traversal driving backend-specific sinks.
//!
//! Every output format walks the document the same way: pages in order,
//! regions in emission order, one call per region classified by category.
//! A backend only decides what each call writes.

use std::fmt;

use crate::error::Result;
use crate::layout::{
    AssembleOptions, CoordinateTransformer, Frame, OrderPolicy, PageSize, ReadingOrderAssembler,
};
use crate::model::{Category, Document, LayoutElement, Page};

use super::{PageSelection, RenderOptions, RenderStats};

/// Identifies one region: zero-based page index and the region's input index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId {
    /// Zero-based page index
    pub page: u32,
    /// Index of the region in the page's input order
    pub element: usize,
}

impl RegionId {
    /// Create a region identifier.
    pub fn new(page: u32, element: usize) -> Self {
        Self { page, element }
    }

    /// Identifier of the region's frame (`p0f3`).
    pub fn frame_name(&self) -> String {
        format!("p{}f{}", self.page, self.element)
    }

    /// Identifier of the content block bound to the frame (`p0ff3`).
    pub fn content_name(&self) -> String {
        format!("p{}ff{}", self.page, self.element)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.frame_name())
    }
}

/// One region handed to a sink.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    /// Region identifier
    pub id: RegionId,
    /// Region text, possibly empty
    pub text: &'a str,
    /// The source element
    pub element: &'a LayoutElement,
}

/// Receives a document in emission order.
///
/// Only the three content callbacks are required; the rest default to no-ops.
pub trait StructureSink {
    /// Page size frames are positioned in. Sinks returning `None` receive no frames.
    fn target_page_size(&self) -> Option<PageSize> {
        None
    }

    /// Called once before the first page.
    fn begin_document(&mut self, doc: &Document) {
        let _ = doc;
    }

    /// Called before the first region of a page.
    fn begin_page(&mut self, page: &Page) {
        let _ = page;
    }

    /// A region's position in target space. Called before the region's content.
    fn frame(&mut self, id: RegionId, frame: &Frame) {
        let _ = (id, frame);
    }

    /// A paragraph region.
    fn paragraph(&mut self, block: &Block<'_>);

    /// A heading region.
    fn heading(&mut self, block: &Block<'_>);

    /// A list region, as one unsplit block.
    fn list(&mut self, block: &Block<'_>);

    /// A region with no structural role.
    fn unhandled(&mut self, block: &Block<'_>, category: &str) {
        let _ = (block, category);
    }

    /// Called after the last region of a page.
    fn end_page(&mut self, page: &Page) {
        let _ = page;
    }

    /// Called once after the last page.
    fn end_document(&mut self, doc: &Document) {
        let _ = doc;
    }
}

/// Walks a document and drives a [`StructureSink`].
#[derive(Debug, Clone, Default)]
pub struct Traversal {
    assembler: ReadingOrderAssembler,
    pages: PageSelection,
}

impl Traversal {
    /// Create a traversal over all pages with the given ordering.
    pub fn new(options: AssembleOptions) -> Self {
        Self {
            assembler: ReadingOrderAssembler::new(options),
            pages: PageSelection::All,
        }
    }

    /// Create a traversal from render options.
    pub fn from_options(options: &RenderOptions) -> Self {
        Self::new(
            AssembleOptions::new()
                .with_policy(options.order)
                .with_parallel(options.parallel),
        )
        .with_pages(options.page_selection.clone())
    }

    /// Create a sequential traversal for a single policy.
    pub fn with_policy(policy: OrderPolicy) -> Self {
        Self::new(AssembleOptions::new().with_policy(policy))
    }

    /// Restrict the traversal to selected pages.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Walk `doc`, feeding `sink`.
    ///
    /// Fails only when a page cannot be mapped into the sink's target space;
    /// unhandled categories are logged and skipped.
    pub fn run<S: StructureSink + ?Sized>(&self, doc: &Document, sink: &mut S) -> Result<RenderStats> {
        let mut stats = RenderStats::new();
        let target = sink.target_page_size();
        let orders = self.assembler.assemble(doc);

        sink.begin_document(doc);
        for (page, order) in doc.pages.iter().zip(&orders) {
            if !self.pages.includes(page.number) {
                continue;
            }

            let transformer = target
                .map(|t| CoordinateTransformer::for_page(page, t))
                .transpose()?;
            let page_index = page.number.saturating_sub(1);

            sink.begin_page(page);
            for &idx in &order.indices {
                let element = &page.elements[idx];
                let block = Block {
                    id: RegionId::new(page_index, idx),
                    text: &element.text,
                    element,
                };

                if let Some(t) = &transformer {
                    sink.frame(block.id, &t.transform(&element.bounding_box));
                    stats.add_frame();
                }

                match &element.category {
                    Category::Paragraph => {
                        sink.paragraph(&block);
                        stats.add_paragraph();
                    }
                    Category::Heading => {
                        sink.heading(&block);
                        stats.add_heading();
                    }
                    Category::List => {
                        sink.list(&block);
                        stats.add_list();
                    }
                    Category::Unhandled(name) => {
                        log::warn!(
                            "{}: page {}: skipping region {} with unhandled category '{}'",
                            doc.source,
                            page.number,
                            idx,
                            name
                        );
                        sink.unhandled(&block, name);
                        stats.add_unhandled(name);
                        continue;
                    }
                }
                stats.count_text(block.text);
            }
            sink.end_page(page);
            stats.add_page();
        }
        sink.end_document(doc);

        log::debug!(
            "{}: traversed {} pages, {} blocks, {} skipped",
            doc.source,
            stats.page_count,
            stats.block_count(),
            stats.unhandled_count()
        );
        Ok(stats)
    }
}
