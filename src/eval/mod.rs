//! Text-fidelity evaluation.
//!
//! Compares the text a tagged document would yield with text extracted
//! independently from the source PDF, using n-gram overlap. Reference tokens
//! keep their line positions so that n-grams broken by paragraph gaps can be
//! told apart from real omissions.

mod border;
mod evaluator;
mod extract;
mod ngram;
mod options;
mod token;
mod visualize;

pub use border::classify_borders;
pub use evaluator::{Evaluation, FidelityEvaluator};
pub use extract::{Pdftotext, ReferenceExtractor};
pub use ngram::NgramIndex;
pub use options::{EvalOptions, MissDirection};
pub use token::{tokenize_flat, tokenize_positioned, Border, Token, MAX_MISSING};
pub use visualize::{Visualizer, RAMP};

use crate::error::Result;
use crate::model::Document;
use crate::render::{page_text, PageText};

/// Evaluation of one page together with the generated text it was based on.
#[derive(Debug, Clone)]
pub struct PageEvaluation {
    /// 1-indexed page number
    pub page: u32,
    /// Generated text, split into body and headers
    pub text: PageText,
    /// Comparison result
    pub evaluation: Evaluation,
}

impl PageEvaluation {
    /// Render the side-by-side view.
    ///
    /// The view shades reference tokens, so the reference side is scored for
    /// it even when the evaluation only checked the generated side.
    pub fn visualize(&self, source: &str) -> Result<String> {
        if self.evaluation.reference_scored() {
            return Ok(Visualizer::new().render(&self.evaluation, &self.text, source, self.page));
        }
        let mut evaluation = self.evaluation.clone();
        evaluation.score_reference()?;
        Ok(Visualizer::new().render(&evaluation, &self.text, source, self.page))
    }
}

/// Evaluate one page of an assembled document against its reference text.
///
/// The generated side is the page's header text followed by the remaining
/// regions read top to bottom.
pub fn evaluate_page(
    doc: &Document,
    page: u32,
    reference: &str,
    options: &EvalOptions,
) -> Result<PageEvaluation> {
    let text = page_text(doc, page)?;
    let evaluation = FidelityEvaluator::evaluate(options, reference, &text.combined())?;
    log::info!(
        "{}: page {}: coverage {:.1}% at n={}",
        doc.source,
        page,
        evaluation.coverage() * 100.0,
        evaluation.n
    );
    Ok(PageEvaluation {
        page,
        text,
        evaluation,
    })
}

/// Extract the reference text of one page with `extractor` and evaluate it.
///
/// A page whose extraction fails is evaluated against empty reference text.
pub fn evaluate_extracted_page<E: ReferenceExtractor + ?Sized>(
    doc: &Document,
    pdf: &std::path::Path,
    page: u32,
    extractor: &E,
    options: &EvalOptions,
) -> Result<PageEvaluation> {
    let reference = extractor.extract(pdf, page).unwrap_or_else(|e| {
        log::warn!(
            "{}: page {}: no reference text, continuing with empty text: {}",
            doc.source,
            page,
            e
        );
        String::new()
    });
    evaluate_page(doc, page, &reference, options)
}

/// Evaluate every selected page, extracting reference text with `extractor`.
pub fn evaluate_document<E: ReferenceExtractor + ?Sized>(
    doc: &Document,
    pdf: &std::path::Path,
    extractor: &E,
    options: &EvalOptions,
) -> Result<Vec<PageEvaluation>> {
    options
        .pages
        .resolve(doc.page_count())
        .into_iter()
        .map(|page| evaluate_extracted_page(doc, pdf, page, extractor, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{BoundingBox, Category, LayoutElement, Metadata, Page};
    use crate::render::PageSelection;
    use std::path::Path;

    struct Fixed(Option<&'static str>);

    impl ReferenceExtractor for Fixed {
        fn extract(&self, _pdf: &Path, _page: u32) -> Result<String> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| Error::external("fixed", "no text"))
        }
    }

    fn doc() -> Document {
        let bb = |uly: f32| BoundingBox::new(0.0, uly, 100.0, 10.0);
        let page = Page::a4(1)
            .with_element(LayoutElement::new(Category::Paragraph, "tweede alinea hier", bb(300.0)))
            .with_element(LayoutElement::new(Category::Paragraph, "kop van pagina", bb(5.0)).as_header())
            .with_element(LayoutElement::new(Category::Heading, "eerste titel", bb(100.0)));
        let mut doc = Document::new("a.pdf", Metadata::undefined());
        doc.add_page(page);
        doc.add_page(Page::a4(2));
        doc
    }

    #[test]
    fn test_evaluate_page_uses_header_aware_text() {
        let options = EvalOptions::new().with_window(2);
        let result = evaluate_page(
            &doc(),
            1,
            "kop van pagina\n\neerste titel\ntweede alinea hier",
            &options,
        )
        .unwrap();
        assert!(result.evaluation.missing_generated.is_empty());
        assert_eq!(result.text.header, "kop van pagina");
        assert_eq!(result.evaluation.coverage(), 1.0);
    }

    #[test]
    fn test_evaluate_document_tolerates_failed_extraction() {
        let options = EvalOptions::new().with_pages(PageSelection::Pages(vec![1]));
        let results = evaluate_document(&doc(), Path::new("a.pdf"), &Fixed(None), &options).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].evaluation.reference.is_empty());
        assert!(results[0]
            .visualize("a.pdf")
            .unwrap()
            .contains("Evaluation of page 1 of a.pdf"));
    }

    #[test]
    fn test_evaluate_extracted_page() {
        let options = EvalOptions::new().with_window(2);
        let failed = evaluate_extracted_page(&doc(), Path::new("a.pdf"), 1, &Fixed(None), &options)
            .unwrap();
        assert!(failed.evaluation.reference.is_empty());
        assert_eq!(failed.evaluation.coverage(), 0.0);

        let found = evaluate_extracted_page(
            &doc(),
            Path::new("a.pdf"),
            1,
            &Fixed(Some("kop van pagina eerste titel tweede alinea hier")),
            &options,
        )
        .unwrap();
        assert_eq!(found.page, 1);
        assert_eq!(found.evaluation.coverage(), 1.0);
    }

    #[test]
    fn test_evaluate_document_all_pages() {
        let results =
            evaluate_document(&doc(), Path::new("a.pdf"), &Fixed(Some("x")), &EvalOptions::new())
                .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].page, 2);
    }
}
