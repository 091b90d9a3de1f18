// Term ranking pipeline: records -> documents -> TF-IDF -> OLS -> title.
//
// Each stage consumes the previous stage's immutable output:
// 1. Normalize title + tags into one document per record
// 2. Fit the TF-IDF vocabulary and term matrix
// 3. Fit term coefficients against view count
// 4. Compose a suggested title from the top-ranked terms
//
// The embedding space is trained separately (see `train_embeddings`); it
// does not feed the ranking.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::VideoRecord;
use crate::embeddings::index::corpus_from_records;
use crate::embeddings::{EmbeddingSpace, Word2VecParams};
use crate::error::AnalysisResult;
use crate::scoring::importance::{FitPolicy, ImportanceRanker, RankedTerm, TermImportance};
use crate::title::{compose, SuggestedTitle};
use crate::topics::normalize::{document_text, NormalizedDocument};
use crate::topics::stopwords::StopWordSet;
use crate::topics::tfidf::{TermMatrix, TfIdfVectorizer};
use crate::topics::traits::Vectorizer;

/// Knobs for one ranking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub stop_words: StopWordSet,
    pub fit_policy: FitPolicy,
    /// How many top terms go into the suggested title
    pub top_terms: usize,
    pub base_title: String,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            stop_words: StopWordSet::Builtin,
            fit_policy: FitPolicy::Strict,
            top_terms: 10,
            base_title: "Dragon Ball Sparkling Gameplay".to_string(),
        }
    }
}

/// Everything one ranking run produces, ready for display or JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub documents: usize,
    pub vocabulary: usize,
    /// Every vocabulary term, coefficient descending
    pub ranked_terms: Vec<RankedTerm>,
    pub intercept: f64,
    pub r_squared: f64,
    pub suggested_title: SuggestedTitle,
}

impl AnalysisReport {
    /// The first `n` ranked terms.
    pub fn top_terms(&self, n: usize) -> &[RankedTerm] {
        &self.ranked_terms[..n.min(self.ranked_terms.len())]
    }
}

/// One normalized title+tags document per record, in record order.
pub fn build_documents(records: &[VideoRecord]) -> Vec<NormalizedDocument> {
    records
        .iter()
        .enumerate()
        .map(|(source_id, r)| NormalizedDocument {
            source_id,
            text: document_text(&r.title, r.tags.as_deref()),
        })
        .collect()
}

/// Vectorize `records` and fit term coefficients against their view counts.
pub fn rank_terms(
    records: &[VideoRecord],
    stop_words: StopWordSet,
    policy: FitPolicy,
) -> AnalysisResult<(TermMatrix, TermImportance)> {
    let documents = build_documents(records);
    let vectorizer = TfIdfVectorizer {
        stop_words,
        ..Default::default()
    };
    let matrix = vectorizer.fit_transform(&documents);
    let views: Vec<f64> = records.iter().map(|r| r.view_count as f64).collect();
    let importance = ImportanceRanker::new(policy).fit(&matrix, &views)?;
    Ok((matrix, importance))
}

/// Run the full ranking pipeline.
pub fn run(records: &[VideoRecord], options: &AnalysisOptions) -> AnalysisResult<AnalysisReport> {
    let (matrix, importance) = rank_terms(records, options.stop_words, options.fit_policy)?;
    let ranked_terms = importance.ranked();

    let keywords: Vec<&str> = ranked_terms
        .iter()
        .take(options.top_terms)
        .map(|t| t.term.as_str())
        .collect();
    let suggested_title = compose(&options.base_title, &keywords);

    info!(
        documents = matrix.n_documents(),
        vocabulary = matrix.n_terms(),
        title = %suggested_title,
        "Analysis complete"
    );

    Ok(AnalysisReport {
        documents: matrix.n_documents(),
        vocabulary: matrix.n_terms(),
        ranked_terms,
        intercept: importance.intercept(),
        r_squared: importance.r_squared(),
        suggested_title,
    })
}

/// Train the embedding space over every title and tag string in `records`.
pub fn train_embeddings(
    records: &[VideoRecord],
    params: &Word2VecParams,
) -> AnalysisResult<EmbeddingSpace> {
    let corpus = corpus_from_records(records);
    EmbeddingSpace::train(&corpus, params)
}
