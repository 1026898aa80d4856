//! Flowing-markup (XHTML) rendering.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::error::Result;
use crate::model::Document;

use super::{Block, RenderOptions, RenderResult, StructureSink, Traversal};

/// Convert a document to accessible XHTML.
pub fn to_html(doc: &Document, options: &RenderOptions) -> Result<String> {
    Ok(to_html_with_stats(doc, options)?.content)
}

/// Convert a document to accessible XHTML with statistics.
pub fn to_html_with_stats(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let mut sink = HtmlSink::new(options);
    let stats = Traversal::from_options(options).run(doc, &mut sink)?;
    Ok(RenderResult::new(sink.finish(), doc.metadata.clone(), stats))
}

/// Builds an XHTML 1.0 Strict document.
///
/// Blocks are appended in emission order; no geometry is used.
pub struct HtmlSink {
    language: String,
    output: String,
}

impl HtmlSink {
    /// Create a sink for the given options.
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            language: options.primary_language().to_string(),
            output: String::new(),
        }
    }

    /// Return the finished document.
    pub fn finish(self) -> String {
        self.output
    }

    fn block(&mut self, tag: &str, text: &str) {
        self.output.push_str(&format!("    <{tag}>{}</{tag}>\n", encode_text(text)));
    }

    fn meta(&mut self, name: &str, content: &str) {
        self.output.push_str(&format!(
            "    <meta name=\"{}\" content=\"{}\" />\n",
            encode_double_quoted_attribute(name),
            encode_double_quoted_attribute(content)
        ));
    }
}

impl StructureSink for HtmlSink {
    fn begin_document(&mut self, doc: &Document) {
        let lang = encode_double_quoted_attribute(&self.language).into_owned();
        let title = doc.metadata.title.to_string();

        self.output
            .push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        self.output.push_str(
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \
             \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">\n",
        );
        self.output.push_str(&format!(
            "<html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"{lang}\" lang=\"{lang}\">\n"
        ));
        self.output.push_str("  <head>\n");
        self.output
            .push_str(&format!("    <title>{}</title>\n", encode_text(&title)));
        self.output.push_str("    <meta charset=\"UTF-8\" />\n");
        self.meta("viewport", "width=device-width, initial-scale=1");
        for (name, value) in doc.metadata.descriptive_fields() {
            self.meta(name, &value);
        }
        self.output.push_str("  </head>\n");
        self.output.push_str("  <body>\n");
        self.block("h1", &title);
    }

    fn paragraph(&mut self, block: &Block<'_>) {
        self.block("p", block.text);
    }

    fn heading(&mut self, block: &Block<'_>) {
        self.block("h2", block.text);
    }

    fn list(&mut self, block: &Block<'_>) {
        self.block("p", block.text);
    }

    fn end_document(&mut self, _doc: &Document) {
        self.output.push_str("  </body>\n");
        self.output.push_str("</html>\n");
    }
}
