//! Rendering of assembled documents.
//!
//! One [`Traversal`] walks the document; the HTML, RML and Markdown sinks
//! decide what each region becomes.

mod html;
mod markdown;
mod options;
mod result;
mod rml;
mod sink;

pub use html::{to_html, to_html_with_stats, HtmlSink};
pub use markdown::{page_text, to_markdown, to_markdown_with_stats, MarkdownSink, PageText};
pub use options::{FontRegistration, PageSelection, RenderOptions};
pub use result::{RenderResult, RenderStats};
pub use rml::{to_rml, to_rml_with_stats, Overflow, RmlSink};
pub use sink::{Block, RegionId, StructureSink, Traversal};
