// Vectorizer trait — swap-ready abstraction.
//
// The ranking stage only needs a TermMatrix; how the weights are computed is
// up to the implementation. The default is TF-IDF.

use super::normalize::NormalizedDocument;
use super::tfidf::TermMatrix;

/// Trait for turning a corpus of normalized documents into a term matrix.
///
/// Fitting fixes the vocabulary to exactly the terms seen in `documents`.
pub trait Vectorizer {
    /// Learn the vocabulary and weights from `documents` and return one row
    /// per document, in input order.
    fn fit_transform(&self, documents: &[NormalizedDocument]) -> TermMatrix;
}
