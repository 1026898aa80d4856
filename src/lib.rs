//! # pdfair
//!
//! Turns layout-analysis output for a PDF into accessible structured
//! documents, and measures how much of the original text survives.
//!
//! This library takes the regions a layout-analysis engine found on each
//! page, orders them for reading, and emits either tagged XHTML or an RML
//! page description that an RML renderer turns into a tagged PDF. A separate
//! evaluator compares the generated text with text extracted independently
//! from the source PDF.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfair::{JsonLayoutFile, Pdfair};
//!
//! fn main() -> pdfair::Result<()> {
//!     let result = Pdfair::new()
//!         .forced()
//!         .assemble("document.pdf", &JsonLayoutFile::new("document.layout.json"))?;
//!
//!     std::fs::write("document.html", result.to_html()?)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Reading order**: analysis reading order with a stable tie-break, or top-to-bottom
//! - **Two outputs**: flowing XHTML and positioned RML frames
//! - **Metadata**: external catalog, embedded Info dictionary, then prompt or `Undefined`
//! - **Header detection**: running headers are moved to the front of evaluation text
//! - **Evaluation**: n-gram fidelity with paragraph-border awareness and a visual diff

pub mod convert;
pub mod error;
pub mod eval;
pub mod layout;
pub mod metadata;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use convert::{CommandConverter, RmlConverter};
pub use error::{Error, Result};
pub use eval::{
    evaluate_document, evaluate_extracted_page, evaluate_page, EvalOptions, Evaluation,
    FidelityEvaluator, MissDirection, PageEvaluation, Pdftotext, ReferenceExtractor, Visualizer,
};
pub use layout::{
    AssembleOptions, CoordinateTransformer, DetectionBox, Frame, HeaderDetector, HeaderMarker,
    JsonHeaderDetections, JsonLayoutFile, LayoutSource, OrderPolicy, PageSize,
    ReadingOrderAssembler,
};
pub use metadata::{MetadataCatalog, MetadataResolver, RunMode, SourceMetadata};
pub use model::{
    BoundingBox, Category, Document, Field, LayoutElement, Metadata, MetadataField, Page,
};
pub use render::{PageSelection, RenderOptions, RenderResult, RenderStats};

use std::path::Path;

/// Assemble a document without prompting: missing metadata becomes `Undefined`.
///
/// # Example
///
/// ```no_run
/// use pdfair::{assemble_file, JsonLayoutFile};
///
/// let doc = assemble_file("document.pdf", &JsonLayoutFile::new("layout.json")).unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn assemble_file<P: AsRef<Path>>(pdf: P, source: &dyn LayoutSource) -> Result<Document> {
    Ok(Pdfair::new().forced().assemble(pdf, source)?.document)
}

/// Convert a PDF and its exported layout analysis to XHTML.
///
/// # Example
///
/// ```no_run
/// let html = pdfair::to_html("document.pdf", "layout.json").unwrap();
/// std::fs::write("document.html", html).unwrap();
/// ```
pub fn to_html<P: AsRef<Path>, L: AsRef<Path>>(pdf: P, layout: L) -> Result<String> {
    let doc = assemble_file(pdf, &JsonLayoutFile::new(layout.as_ref()))?;
    render::to_html(&doc, &RenderOptions::default())
}

/// Convert a PDF and its exported layout analysis to RML.
pub fn to_rml<P: AsRef<Path>, L: AsRef<Path>>(pdf: P, layout: L) -> Result<String> {
    let pdf = pdf.as_ref();
    let doc = assemble_file(pdf, &JsonLayoutFile::new(layout.as_ref()))?;
    let options = RenderOptions::default().with_filename(file_name(pdf));
    render::to_rml(&doc, &options)
}

/// Builder for assembling and rendering documents.
///
/// # Example
///
/// ```no_run
/// use pdfair::{CommandConverter, JsonLayoutFile, MetadataCatalog, Pdfair};
///
/// let catalog = MetadataCatalog::from_csv("catalog.csv")?;
/// let mut builder = Pdfair::new().forced().with_language("nl-NL");
/// if let Some(row) = catalog.get("doc-42") {
///     builder = builder.with_metadata(row.clone());
/// }
/// builder
///     .assemble("doc-42.pdf", &JsonLayoutFile::new("doc-42.json"))?
///     .to_pdf(&CommandConverter::new("rml2pdf"), "doc-42.tagged.pdf")?;
/// # Ok::<(), pdfair::Error>(())
/// ```
pub struct Pdfair {
    mode: RunMode,
    resolver: Option<MetadataResolver>,
    external: Option<SourceMetadata>,
    detector: Option<Box<dyn HeaderDetector>>,
    marker: HeaderMarker,
    render_options: RenderOptions,
}

impl Pdfair {
    /// Create a new builder; missing metadata is asked for on the terminal.
    pub fn new() -> Self {
        Self {
            mode: RunMode::default(),
            resolver: None,
            external: None,
            detector: None,
            marker: HeaderMarker::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Never prompt; missing metadata becomes `Undefined`.
    pub fn forced(mut self) -> Self {
        self.mode = RunMode::Forced;
        self
    }

    /// Select how missing metadata is resolved.
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Use a caller-built resolver instead of one derived from the run mode.
    pub fn with_resolver(mut self, resolver: MetadataResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Metadata that takes priority over the PDF's own Info dictionary.
    pub fn with_metadata(mut self, metadata: SourceMetadata) -> Self {
        self.external = Some(metadata);
        self
    }

    /// Mark running headers with a detector.
    pub fn with_header_detector(mut self, detector: impl HeaderDetector + 'static) -> Self {
        self.detector = Some(Box::new(detector));
        self
    }

    /// Set the resolutions used to match detections against layout boxes.
    pub fn with_header_marker(mut self, marker: HeaderMarker) -> Self {
        self.marker = marker;
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Set the document language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_language(language);
        self
    }

    /// Set the target page size for positioned output.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.render_options = self.render_options.with_page_size(size);
        self
    }

    /// Enable parallel page ordering.
    pub fn parallel(mut self) -> Self {
        self.render_options = self.render_options.with_parallel(true);
        self
    }

    /// Analyse `pdf`, resolve its metadata and build the document.
    pub fn assemble<P: AsRef<Path>>(self, pdf: P, source: &dyn LayoutSource) -> Result<PdfairResult> {
        let pdf = pdf.as_ref();
        let name = file_name(pdf);

        let pages = source.analyze(pdf)?;
        let mut resolver = self
            .resolver
            .unwrap_or_else(|| MetadataResolver::for_mode(self.mode));
        let metadata = resolver.resolve_pdf(pdf, self.external.as_ref())?;
        let mut document = Document::from_analysis(name.clone(), pages, metadata)?;

        if let Some(detector) = &self.detector {
            mark_headers(&mut document, pdf, detector.as_ref(), &self.marker);
        }

        log::info!("{}: assembled {} pages", name, document.page_count());
        Ok(PdfairResult {
            document,
            render_options: self.render_options.with_filename(name),
        })
    }
}

impl Default for Pdfair {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of assembling a document.
pub struct PdfairResult {
    /// The assembled document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl PdfairResult {
    /// Convert to XHTML.
    pub fn to_html(&self) -> Result<String> {
        render::to_html(&self.document, &self.render_options)
    }

    /// Convert to RML.
    pub fn to_rml(&self) -> Result<String> {
        render::to_rml(&self.document, &self.render_options)
    }

    /// Convert to RML with statistics.
    pub fn to_rml_with_stats(&self) -> Result<RenderResult> {
        render::to_rml_with_stats(&self.document, &self.render_options)
    }

    /// Render RML and hand it to `converter`, writing a PDF at `output`.
    pub fn to_pdf<P: AsRef<Path>>(&self, converter: &dyn RmlConverter, output: P) -> Result<RenderStats> {
        let result = self.to_rml_with_stats()?;
        converter.convert(&result.content, output.as_ref())?;
        Ok(result.stats)
    }

    /// Evaluate text fidelity of the selected pages against `pdf`.
    pub fn evaluate<P: AsRef<Path>>(
        &self,
        pdf: P,
        extractor: &dyn ReferenceExtractor,
        options: &EvalOptions,
    ) -> Result<Vec<PageEvaluation>> {
        evaluate_document(&self.document, pdf.as_ref(), extractor, options)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Get the render options.
    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }
}

fn mark_headers(doc: &mut Document, pdf: &Path, detector: &dyn HeaderDetector, marker: &HeaderMarker) {
    let source = doc.source.clone();
    for page in &mut doc.pages {
        match detector.detect(pdf, page.number) {
            Ok(boxes) => {
                let marked = marker.mark(page, &boxes);
                log::debug!("{}: page {}: {} header regions", source, page.number, marked);
            }
            Err(e) => log::warn!(
                "{}: page {}: header detection failed, no headers marked: {}",
                source,
                page.number,
                e
            ),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
