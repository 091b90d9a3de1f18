// Term importance ranking: which terms track view count.
//
// Fits OLS with the TF-IDF matrix as the design matrix and view counts as
// the target, then ranks the vocabulary by coefficient.
//
// The coefficients are correlational, not causal. A high coefficient means
// videos using the term had more views in this sample; it does not mean
// adding the term will earn views. Coefficients are also not standardized or
// regularized, so they mix term frequency scale with "importance". Report
// consumers should present them as a heuristic.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::regression::least_squares;
use crate::error::{AnalysisError, AnalysisResult};
use crate::topics::tfidf::TermMatrix;

/// How strictly the ranker guards against underdetermined fits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitPolicy {
    /// Refuse to fit unless there are more documents than vocabulary terms
    #[default]
    Strict,
    /// Accept fewer documents than terms and return the minimum-norm fit.
    /// The caller takes responsibility for the unstable coefficients.
    MinimumNorm,
}

/// A vocabulary term with its fitted coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTerm {
    pub term: String,
    pub coefficient: f64,
}

/// Per-term OLS coefficients for one fitted corpus. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TermImportance {
    terms: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
    r_squared: f64,
    rank: usize,
}

impl TermImportance {
    /// Number of terms (equals the vocabulary size of the fitted matrix).
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn coefficient(&self, term: &str) -> Option<f64> {
        self.terms
            .iter()
            .position(|t| t == term)
            .map(|i| self.coefficients[i])
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Coefficient of determination on the fitted rows.
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Numerical rank of the centered design matrix.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// All terms, coefficient descending. Ties keep vocabulary order.
    pub fn ranked(&self) -> Vec<RankedTerm> {
        let mut ranked: Vec<RankedTerm> = self
            .terms
            .iter()
            .zip(&self.coefficients)
            .map(|(term, &coefficient)| RankedTerm {
                term: term.clone(),
                coefficient,
            })
            .collect();
        // sort_by is stable
        ranked.sort_by(|a, b| {
            b.coefficient
                .partial_cmp(&a.coefficient)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }

    /// The `n` highest-ranked terms.
    pub fn top(&self, n: usize) -> Vec<RankedTerm> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}

/// Fits term coefficients against a performance metric.
#[derive(Debug, Clone, Default)]
pub struct ImportanceRanker {
    pub policy: FitPolicy,
}

impl ImportanceRanker {
    pub fn new(policy: FitPolicy) -> Self {
        Self { policy }
    }

    /// Fit one coefficient per vocabulary term of `matrix` against
    /// `performance` (one value per document, same row order).
    ///
    /// Fails with `DegenerateInput` when the rows don't line up, the
    /// vocabulary is empty, the target has zero variance, or (under
    /// `FitPolicy::Strict`) there are no more documents than terms.
    pub fn fit(&self, matrix: &TermMatrix, performance: &[f64]) -> AnalysisResult<TermImportance> {
        let documents = matrix.n_documents();
        let terms = matrix.n_terms();

        if documents != performance.len() {
            return Err(AnalysisError::degenerate(format!(
                "{documents} documents but {} performance values",
                performance.len()
            )));
        }
        if terms == 0 {
            return Err(AnalysisError::degenerate("vocabulary is empty"));
        }
        if self.policy == FitPolicy::Strict && documents <= terms {
            return Err(AnalysisError::degenerate(format!(
                "{documents} documents for {terms} terms; need at least {}",
                terms + 1
            )));
        }
        if performance.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::degenerate("performance values must be finite"));
        }
        if performance.iter().all(|&v| v == performance[0]) {
            return Err(AnalysisError::degenerate(
                "performance values have zero variance",
            ));
        }

        if documents <= terms {
            warn!(
                documents,
                terms, "Fitting an underdetermined model; coefficients are minimum-norm"
            );
        }

        let fit = least_squares(&matrix.to_dense(), performance);

        info!(
            terms,
            documents,
            rank = fit.rank,
            r_squared = fit.r_squared,
            "Fitted term importance"
        );

        Ok(TermImportance {
            terms: matrix.vocabulary().to_vec(),
            coefficients: fit.coefficients,
            intercept: fit.intercept,
            r_squared: fit.r_squared,
            rank: fit.rank,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topics::normalize::NormalizedDocument;
    use crate::topics::tfidf::TfIdfVectorizer;
    use crate::topics::traits::Vectorizer;

    fn matrix(texts: &[&str]) -> TermMatrix {
        let docs: Vec<NormalizedDocument> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| NormalizedDocument {
                source_id: i,
                text: t.to_string(),
            })
            .collect();
        TfIdfVectorizer::default().fit_transform(&docs)
    }

    #[test]
    fn test_strict_rejects_underdetermined() {
        let m = matrix(&["alpha beta gamma", "delta epsilon"]);
        let err = ImportanceRanker::default().fit(&m, &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateInput { .. }));
    }

    #[test]
    fn test_zero_variance_rejected_under_any_policy() {
        let m = matrix(&["alpha", "beta", "alpha beta", "beta"]);
        let err = ImportanceRanker::new(FitPolicy::MinimumNorm)
            .fit(&m, &[5.0, 5.0, 5.0, 5.0])
            .unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateInput { .. }));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let m = matrix(&["alpha", "beta", "gamma"]);
        assert!(ImportanceRanker::default().fit(&m, &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_ties_keep_vocabulary_order() {
        let importance = TermImportance {
            terms: vec!["b".into(), "a".into(), "c".into()],
            coefficients: vec![1.0, 2.0, 1.0],
            intercept: 0.0,
            r_squared: 1.0,
            rank: 2,
        };
        let order: Vec<String> = importance.ranked().into_iter().map(|r| r.term).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }
}
