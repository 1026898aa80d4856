//! Markdown rendering of assembled regions.
//!
//! This is the text a reader of the tagged output would get, which makes it
//! the generated side of a fidelity evaluation.

use crate::error::Result;
use crate::layout::OrderPolicy;
use crate::model::{Document, Page};

use super::{Block, PageSelection, RenderOptions, RenderResult, StructureSink, Traversal};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    Ok(to_markdown_with_stats(doc, options)?.content)
}

/// Convert a document to Markdown with statistics.
pub fn to_markdown_with_stats(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let mut sink = MarkdownSink::new();
    let stats = Traversal::from_options(options).run(doc, &mut sink)?;
    Ok(RenderResult::new(sink.finish(), doc.metadata.clone(), stats))
}

/// Generated text of one page, split into body and detected headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageText {
    /// Markdown of the non-header regions, top of page first
    pub body: String,
    /// Header region text, separated by blank lines
    pub header: String,
}

impl PageText {
    /// Header text followed by the body.
    pub fn combined(&self) -> String {
        if self.header.is_empty() {
            return self.body.clone();
        }
        format!("{}\n{}", self.header, self.body)
    }
}

/// Build the generated text of a page the way the evaluation reads it:
/// headers are pulled out and the remaining regions are read top to bottom.
pub fn page_text(doc: &Document, page_number: u32) -> Result<PageText> {
    let page = doc.page(page_number)?;
    let mut sink = MarkdownSink::new();
    Traversal::with_policy(OrderPolicy::TopToBottom)
        .with_pages(PageSelection::Pages(vec![page_number]))
        .run(doc, &mut sink)?;

    Ok(PageText {
        body: sink.finish(),
        header: page.header_text(),
    })
}

/// Collects one Markdown line per block.
#[derive(Debug, Default)]
pub struct MarkdownSink {
    pages: Vec<String>,
    lines: Vec<String>,
}

impl MarkdownSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the Markdown; pages are separated by a blank line and pages
    /// without blocks are left out.
    pub fn finish(mut self) -> String {
        if !self.lines.is_empty() {
            self.pages.push(self.lines.join("\n"));
        }
        self.pages.join("\n\n")
    }
}

impl StructureSink for MarkdownSink {
    fn paragraph(&mut self, block: &Block<'_>) {
        // Two trailing spaces keep the line break inside a paragraph.
        self.lines.push(format!("{}  ", block.text));
    }

    fn heading(&mut self, block: &Block<'_>) {
        self.lines.push(format!("## {}", block.text));
    }

    fn list(&mut self, block: &Block<'_>) {
        self.lines.push(format!("- {}", block.text));
    }

    fn end_page(&mut self, _page: &Page) {
        let lines = std::mem::take(&mut self.lines);
        if !lines.is_empty() {
            self.pages.push(lines.join("\n"));
        }
    }
}
