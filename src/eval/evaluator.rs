//! Step-wise fidelity evaluation.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{
    classify_borders, tokenize_flat, tokenize_positioned, EvalOptions, MissDirection, NgramIndex,
    Token,
};

/// Outcome of comparing generated text with a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Window size used
    pub n: usize,
    /// Reference tokens with borders and, when scored, miss counts
    pub reference: Vec<Token>,
    /// Generated tokens with, when scored, miss counts
    pub generated: Vec<Token>,
    /// Generated n-grams absent from the reference, sorted
    pub missing_generated: Vec<String>,
    /// Reference n-grams absent from the generated text, sorted
    pub missing_reference: Vec<String>,
    /// Distinct generated n-grams that were checked
    pub scored_generated: usize,
    /// Distinct reference n-grams that were checked
    pub scored_reference: usize,
}

impl Evaluation {
    /// Share of checked n-grams found on the other side; 1.0 when nothing was checked.
    pub fn coverage(&self) -> f64 {
        let scored = self.scored_generated + self.scored_reference;
        if scored == 0 {
            return 1.0;
        }
        let missing = self.missing_generated.len() + self.missing_reference.len();
        (scored - missing) as f64 / scored as f64
    }

    /// Total misses recorded on reference tokens.
    pub fn reference_misses(&self) -> u32 {
        self.reference.iter().map(|t| t.missing_count).sum()
    }

    /// Total misses recorded on generated tokens.
    pub fn generated_misses(&self) -> u32 {
        self.generated.iter().map(|t| t.missing_count).sum()
    }

    /// Check if reference n-grams were checked.
    pub fn reference_scored(&self) -> bool {
        self.scored_reference > 0
    }

    /// Score reference n-grams against the generated text.
    ///
    /// Recomputes reference miss counts, `missing_reference` and
    /// `scored_reference` from the stored tokens. Generated-side results are
    /// left as they were.
    pub fn score_reference(&mut self) -> Result<()> {
        let ref_index = NgramIndex::build(&self.reference, self.n)?;
        let gen_index = NgramIndex::build(&self.generated, self.n)?;

        self.reference.iter_mut().for_each(|t| t.missing_count = 0);
        self.missing_reference.clear();
        for ngram in ref_index.missing_from(&gen_index) {
            credit(&mut self.reference, &ref_index, ngram);
            self.missing_reference.push(ngram.to_string());
        }
        self.scored_reference = ref_index.len();
        Ok(())
    }
}

/// Runs tokenize, index, border and compare steps in order.
///
/// Each step checks that the steps it depends on have run and fails with
/// [`Error::Precondition`] otherwise.
#[derive(Debug, Clone)]
pub struct FidelityEvaluator {
    n: usize,
    direction: MissDirection,
    reference: Option<Vec<Token>>,
    generated: Option<Vec<Token>>,
    indices: Option<(NgramIndex, NgramIndex)>,
    missing: Option<(Vec<String>, Vec<String>)>,
}

impl FidelityEvaluator {
    /// Create an evaluator. Fails on a zero window.
    pub fn new(options: &EvalOptions) -> Result<Self> {
        if options.n == 0 {
            return Err(Error::InvalidWindow(options.n));
        }
        Ok(Self {
            n: options.n,
            direction: options.direction,
            reference: None,
            generated: None,
            indices: None,
            missing: None,
        })
    }

    /// Run every step on a text pair.
    ///
    /// An empty reference is tolerated: border classification is skipped and
    /// every generated n-gram counts as missing.
    pub fn evaluate(options: &EvalOptions, reference: &str, generated: &str) -> Result<Evaluation> {
        let mut evaluator = Self::new(options)?;
        evaluator.tokenize_reference(reference);
        evaluator.tokenize_generated(generated);
        evaluator.build_indices()?;
        if evaluator.reference_tokens().is_some_and(|t| t.is_empty()) {
            log::warn!("Reference text has no tokens; skipping border classification");
        } else {
            evaluator.classify_borders()?;
        }
        evaluator.compare()?;
        evaluator.finish()
    }

    /// Tokenize the reference with line positions.
    pub fn tokenize_reference(&mut self, text: &str) {
        self.reference = Some(tokenize_positioned(text));
        self.indices = None;
        self.missing = None;
    }

    /// Tokenize the generated text without positions.
    pub fn tokenize_generated(&mut self, text: &str) {
        self.generated = Some(tokenize_flat(text));
        self.indices = None;
        self.missing = None;
    }

    /// Reference tokens, once tokenized.
    pub fn reference_tokens(&self) -> Option<&[Token]> {
        self.reference.as_deref()
    }

    /// Generated tokens, once tokenized.
    pub fn generated_tokens(&self) -> Option<&[Token]> {
        self.generated.as_deref()
    }

    /// Build both n-gram indices.
    pub fn build_indices(&mut self) -> Result<()> {
        let reference = self.reference.as_deref().ok_or_else(|| {
            Error::Precondition("reference n-grams requested before tokenizing the reference".into())
        })?;
        let generated = self.generated.as_deref().ok_or_else(|| {
            Error::Precondition("generated n-grams requested before tokenizing the generated text".into())
        })?;

        self.indices = Some((
            NgramIndex::build(reference, self.n)?,
            NgramIndex::build(generated, self.n)?,
        ));
        Ok(())
    }

    /// Mark borders on the reference tokens.
    pub fn classify_borders(&mut self) -> Result<()> {
        let reference = self.reference.as_mut().ok_or_else(|| {
            Error::Precondition("borders requested before tokenizing the reference".into())
        })?;
        classify_borders(reference, self.n)
    }

    /// Record misses on the scored side(s).
    ///
    /// Every span of a missing n-gram is credited, so a token in several
    /// missing windows accumulates several misses. Running compare again
    /// recomputes counts from zero.
    pub fn compare(&mut self) -> Result<()> {
        let (ref_index, gen_index) = self
            .indices
            .as_ref()
            .ok_or_else(|| Error::Precondition("compare requested before building n-grams".into()))?;
        let (reference, generated) = match (self.reference.as_mut(), self.generated.as_mut()) {
            (Some(r), Some(g)) => (r, g),
            _ => return Err(Error::Precondition("compare requested before tokenizing".into())),
        };

        let mut missing_generated = Vec::new();
        let mut missing_reference = Vec::new();

        if self.direction.scores_generated() {
            generated.iter_mut().for_each(|t| t.missing_count = 0);
            for ngram in gen_index.missing_from(ref_index) {
                credit(generated, gen_index, ngram);
                missing_generated.push(ngram.to_string());
            }
        }
        if self.direction.scores_reference() {
            reference.iter_mut().for_each(|t| t.missing_count = 0);
            for ngram in ref_index.missing_from(gen_index) {
                credit(reference, ref_index, ngram);
                missing_reference.push(ngram.to_string());
            }
        }

        log::debug!(
            "n={}: {} generated and {} reference n-grams missing",
            self.n,
            missing_generated.len(),
            missing_reference.len()
        );
        self.missing = Some((missing_generated, missing_reference));
        Ok(())
    }

    /// Consume the evaluator and return the result.
    pub fn finish(self) -> Result<Evaluation> {
        let (missing_generated, missing_reference) = self
            .missing
            .ok_or_else(|| Error::Precondition("result requested before comparing".into()))?;
        let (ref_index, gen_index) = self
            .indices
            .ok_or_else(|| Error::Precondition("result requested before building n-grams".into()))?;

        let scored_generated = if self.direction.scores_generated() {
            gen_index.len()
        } else {
            0
        };
        let scored_reference = if self.direction.scores_reference() {
            ref_index.len()
        } else {
            0
        };

        Ok(Evaluation {
            n: self.n,
            reference: self.reference.unwrap_or_default(),
            generated: self.generated.unwrap_or_default(),
            missing_generated,
            missing_reference,
            scored_generated,
            scored_reference,
        })
    }
}

fn credit(tokens: &mut [Token], index: &NgramIndex, ngram: &str) {
    for span in index.spans(ngram) {
        for token in &mut tokens[span.clone()] {
            token.add_miss();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Border;

    fn options(n: usize) -> EvalOptions {
        EvalOptions::new().with_window(n)
    }

    fn counts(tokens: &[Token]) -> Vec<u32> {
        tokens.iter().map(|t| t.missing_count).collect()
    }

    #[test]
    fn test_generated_misses() {
        let eval = FidelityEvaluator::evaluate(&options(2), "a b c d", "a b x d").unwrap();
        assert_eq!(eval.missing_generated, vec!["b x", "x d"]);
        assert_eq!(counts(&eval.generated), vec![0, 1, 2, 1]);
        assert!(eval.missing_reference.is_empty());
        assert_eq!(eval.reference_misses(), 0);
    }

    #[test]
    fn test_reference_misses() {
        let opts = options(2).with_direction(MissDirection::ReferenceAgainstGenerated);
        let eval = FidelityEvaluator::evaluate(&opts, "a b c d", "a b x d").unwrap();
        assert_eq!(eval.missing_reference, vec!["b c", "c d"]);
        assert_eq!(counts(&eval.reference), vec![0, 1, 2, 1]);
        assert_eq!(eval.generated_misses(), 0);
    }

    #[test]
    fn test_score_reference_after_generated_pass() {
        let mut eval = FidelityEvaluator::evaluate(&options(2), "a b c d", "a b x d").unwrap();
        assert!(!eval.reference_scored());

        eval.score_reference().unwrap();
        assert!(eval.reference_scored());
        assert_eq!(eval.missing_reference, vec!["b c", "c d"]);
        assert_eq!(counts(&eval.reference), vec![0, 1, 2, 1]);
        // Generated side is untouched.
        assert_eq!(counts(&eval.generated), vec![0, 1, 2, 1]);
        assert_eq!(eval.missing_generated, vec!["b x", "x d"]);

        let both = options(2).with_direction(MissDirection::Both);
        let full = FidelityEvaluator::evaluate(&both, "a b c d", "a b x d").unwrap();
        assert_eq!(eval, full);
    }

    #[test]
    fn test_coverage() {
        let opts = options(2).with_direction(MissDirection::Both);
        let eval = FidelityEvaluator::evaluate(&opts, "a b c d", "a b x d").unwrap();
        // 6 distinct n-grams scored, 2 found on each side.
        assert!((eval.coverage() - 2.0 / 6.0).abs() < 1e-9);

        let same = FidelityEvaluator::evaluate(&opts, "a b c", "A B C").unwrap();
        assert_eq!(same.coverage(), 1.0);
    }

    #[test]
    fn test_empty_reference_is_tolerated() {
        let eval = FidelityEvaluator::evaluate(&options(2), "", "a b c").unwrap();
        assert!(eval.reference.is_empty());
        assert_eq!(eval.missing_generated, vec!["a b", "b c"]);
        assert_eq!(eval.coverage(), 0.0);
    }

    #[test]
    fn test_borders_on_reference() {
        let eval = FidelityEvaluator::evaluate(&options(2), "a b\n\nc d", "a b c d").unwrap();
        let borders: Vec<Border> = eval.reference.iter().map(|t| t.border).collect();
        assert_eq!(borders, vec![Border::Soft, Border::Hard, Border::Hard, Border::Soft]);
    }

    #[test]
    fn test_steps_out_of_order() {
        let mut evaluator = FidelityEvaluator::new(&options(4)).unwrap();
        assert!(matches!(evaluator.build_indices(), Err(Error::Precondition(_))));
        assert!(matches!(evaluator.classify_borders(), Err(Error::Precondition(_))));
        assert!(matches!(evaluator.compare(), Err(Error::Precondition(_))));

        evaluator.tokenize_reference("a b c d e");
        assert!(matches!(evaluator.build_indices(), Err(Error::Precondition(_))));
        evaluator.tokenize_generated("a b c d e");
        assert!(matches!(evaluator.compare(), Err(Error::Precondition(_))));
        assert!(matches!(
            evaluator.clone().finish(),
            Err(Error::Precondition(_))
        ));

        evaluator.build_indices().unwrap();
        evaluator.compare().unwrap();
        assert!(evaluator.finish().unwrap().missing_generated.is_empty());
    }

    #[test]
    fn test_zero_window() {
        assert!(matches!(
            FidelityEvaluator::new(&options(0)),
            Err(Error::InvalidWindow(0))
        ));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let opts = options(3).with_direction(MissDirection::Both);
        let reference = "De minister besluit\n\ntot openbaarmaking van de stukken";
        let generated = "De minister besluit tot gedeeltelijke openbaarmaking";
        let first = FidelityEvaluator::evaluate(&opts, reference, generated).unwrap();
        let second = FidelityEvaluator::evaluate(&opts, reference, generated).unwrap();
        assert_eq!(first, second);
    }
}
