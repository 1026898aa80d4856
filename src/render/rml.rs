//! Frame-based page layout rendering (ReportLab RML).
//!
//! Every region gets an absolutely positioned frame in the page template; the
//! story then binds each content block to its frame by identifier.

use html_escape::{encode_double_quoted_attribute as attr, encode_text};

use crate::error::Result;
use crate::layout::{Frame, PageSize};
use crate::model::{Document, Page};

use super::{Block, RegionId, RenderOptions, RenderResult, StructureSink, Traversal};

const DOCTYPE: &str = "<!DOCTYPE document SYSTEM \"rml_1_0.dtd\">";

/// Convert a document to RML.
pub fn to_rml(doc: &Document, options: &RenderOptions) -> Result<String> {
    Ok(to_rml_with_stats(doc, options)?.content)
}

/// Convert a document to RML with statistics.
pub fn to_rml_with_stats(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let mut sink = RmlSink::new(options.clone());
    let stats = Traversal::from_options(options).run(doc, &mut sink)?;
    Ok(RenderResult::new(sink.finish(), doc.metadata.clone(), stats))
}

/// What a content block does when its text does not fit the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    /// Let the text run past the frame
    Allow,
    /// Scale the text down to fit
    Shrink,
}

impl Overflow {
    fn as_str(self) -> &'static str {
        match self {
            Overflow::Allow => "overflow",
            Overflow::Shrink => "shrink",
        }
    }
}

/// Builds an RML document.
pub struct RmlSink {
    options: RenderOptions,
    header: String,
    frames: String,
    story: String,
}

impl RmlSink {
    /// Create a sink for the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            header: String::new(),
            frames: String::new(),
            story: String::new(),
        }
    }

    /// Assemble the finished document.
    pub fn finish(self) -> String {
        let o = &self.options;
        let mut out = String::with_capacity(
            self.header.len() + self.frames.len() + self.story.len() + 512,
        );
        out.push_str(DOCTYPE);
        out.push('\n');
        out.push_str(&self.header);
        out.push_str(&self.frames);
        out.push_str("    </pageTemplate>\n");
        out.push_str("  </template>\n");

        out.push_str("  <stylesheet>\n");
        for (name, face) in [("h1", &o.heading_font), ("para", &o.body_font)] {
            out.push_str(&format!(
                "    <paraStyle name=\"{}\" fontName=\"{}\" fontSize=\"{}\" />\n",
                name,
                attr(face),
                o.font_size
            ));
        }
        out.push_str("  </stylesheet>\n");

        out.push_str("  <story>\n");
        out.push_str(&self.story);
        out.push_str("  </story>\n");
        out.push_str("</document>\n");
        out
    }

    fn content(&mut self, id: RegionId, kind: BlockKind, text: &str) {
        let (overflow, tag, tag_type, face) = match kind {
            BlockKind::Heading => (Overflow::Allow, "h1", "H1", &self.options.heading_font),
            BlockKind::Body => (Overflow::Shrink, "para", "P", &self.options.body_font),
        };
        let block = format!(
            "    <keepInFrame onOverflow=\"{}\" id=\"{}\" frame=\"{}\">\
             <{tag} tagType=\"{tag_type}\" style=\"{tag}\"><font face=\"{}\">{}</font></{tag}>\
             </keepInFrame>\n",
            overflow.as_str(),
            id.content_name(),
            id.frame_name(),
            attr(face),
            encode_text(text),
        );
        self.story.push_str(&block);
    }
}

#[derive(Debug, Clone, Copy)]
enum BlockKind {
    Heading,
    Body,
}

impl StructureSink for RmlSink {
    fn target_page_size(&self) -> Option<PageSize> {
        Some(self.options.page_size)
    }

    fn begin_document(&mut self, doc: &Document) {
        let o = &self.options;
        let m = &doc.metadata;
        let mut header = String::new();

        header.push_str(&format!(
            "<document filename=\"{}\" compression=\"0\" invariant=\"1\" tagged=\"1\">\n",
            attr(&o.filename)
        ));
        header.push_str("  <docinit>\n");
        for font in &o.fonts {
            header.push_str(&format!(
                "    <registerTTFont faceName=\"{}\" fileName=\"{}\" />\n",
                attr(&font.face),
                attr(&font.file)
            ));
        }
        header.push_str("  </docinit>\n");
        header.push_str(&format!(
            "  <template pageSize=\"({},{})\" title=\"{}\" subject=\"{}\" author=\"{}\" lang=\"{}\">\n",
            o.page_size.width,
            o.page_size.height,
            attr(m.title.as_str()),
            attr(m.subject.as_str()),
            attr(m.author.as_str()),
            attr(&o.language)
        ));
        header.push_str("    <pageTemplate id=\"main\">\n");
        self.header = header;
    }

    fn frame(&mut self, id: RegionId, frame: &Frame) {
        self.frames.push_str(&format!(
            "      <frame id=\"{}\" x1=\"{}\" y1=\"{}\" width=\"{}\" height=\"{}\" />\n",
            id.frame_name(),
            frame.x,
            frame.y,
            frame.width,
            frame.height
        ));
    }

    fn paragraph(&mut self, block: &Block<'_>) {
        self.content(block.id, BlockKind::Body, block.text);
    }

    fn heading(&mut self, block: &Block<'_>) {
        self.content(block.id, BlockKind::Heading, block.text);
    }

    fn list(&mut self, block: &Block<'_>) {
        self.content(block.id, BlockKind::Body, block.text);
    }

    fn end_page(&mut self, _page: &Page) {
        self.story.push_str("    <nextPage />\n");
    }
}
