// TF-IDF term matrix construction.
//
// Each normalized title+tags string is one document. Weights are raw term
// counts times a smoothed inverse document frequency, and every row is
// scaled to unit L2 length:
//
//   idf(t) = ln((1 + n) / (1 + df(t))) + 1
//
// The smoothing keeps a one-document corpus well defined: df = n = 1 gives
// idf = 1 for every term.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::{debug, info};

use super::normalize::NormalizedDocument;
use super::stopwords::StopWordSet;
use super::traits::Vectorizer;

/// Sparse document-term weights plus the vocabulary they index into.
///
/// Every input document has a row (possibly empty). Columns are positions in
/// `vocabulary`, which is sorted lexically and closed over the fitted corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct TermMatrix {
    vocabulary: Vec<String>,
    idf: Vec<f64>,
    rows: Vec<Vec<(usize, f64)>>,
}

impl TermMatrix {
    /// The fitted vocabulary, in column order.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn n_documents(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.vocabulary.len()
    }

    /// Column index of `term`, if it is in the vocabulary.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|t| t.as_str().cmp(term))
            .ok()
    }

    /// Inverse document frequency of `term`.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.term_index(term).map(|i| self.idf[i])
    }

    /// Non-zero `(column, weight)` entries of one document, column-ascending.
    pub fn row(&self, document: usize) -> &[(usize, f64)] {
        self.rows.get(document).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Weight of `term` in `document`; 0.0 when absent.
    pub fn weight(&self, document: usize, term: &str) -> f64 {
        let Some(col) = self.term_index(term) else {
            return 0.0;
        };
        self.row(document)
            .binary_search_by_key(&col, |&(c, _)| c)
            .map(|pos| self.row(document)[pos].1)
            .unwrap_or(0.0)
    }

    /// The terms present in `document` with their weights, highest first.
    pub fn document_terms(&self, document: usize) -> Vec<(&str, f64)> {
        let mut terms: Vec<(&str, f64)> = self
            .row(document)
            .iter()
            .map(|&(col, w)| (self.vocabulary[col].as_str(), w))
            .collect();
        terms.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        terms
    }

    /// Number of documents with a non-zero weight for `term`.
    pub fn document_frequency(&self, term: &str) -> usize {
        (0..self.n_documents())
            .filter(|&d| self.weight(d, term) > 0.0)
            .count()
    }

    /// Dense `n_documents x n_terms` copy, for the regression fit.
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| {
                let mut dense = vec![0.0; self.vocabulary.len()];
                for &(col, w) in row {
                    dense[col] = w;
                }
                dense
            })
            .collect()
    }
}

/// TF-IDF vectorizer with stop word exclusion.
pub struct TfIdfVectorizer {
    /// Words excluded before weighting
    pub stop_words: StopWordSet,
    /// Shortest token kept (shorter tokens are dropped)
    pub min_token_len: usize,
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self {
            stop_words: StopWordSet::Builtin,
            min_token_len: 2,
        }
    }
}

impl TfIdfVectorizer {
    fn tokenize<'a>(&self, text: &'a str, stop_words: &HashSet<String>) -> Vec<&'a str> {
        text.split_whitespace()
            .filter(|t| t.chars().count() >= self.min_token_len)
            .filter(|t| !stop_words.contains(*t))
            .collect()
    }
}

impl Vectorizer for TfIdfVectorizer {
    fn fit_transform(&self, documents: &[NormalizedDocument]) -> TermMatrix {
        let stop_words = self.stop_words.words();
        let tokenized: Vec<Vec<&str>> = documents
            .iter()
            .map(|doc| self.tokenize(&doc.text, &stop_words))
            .collect();

        let vocabulary: Vec<String> = tokenized
            .iter()
            .flatten()
            .copied()
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        // Document frequency per column
        let mut df = vec![0usize; vocabulary.len()];
        for tokens in &tokenized {
            let unique: HashSet<usize> = tokens.iter().map(|t| index[t]).collect();
            for col in unique {
                df[col] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let rows: Vec<Vec<(usize, f64)>> = tokenized
            .iter()
            .map(|tokens| {
                let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
                for t in tokens {
                    *counts.entry(index[t]).or_insert(0) += 1;
                }
                let mut row: Vec<(usize, f64)> = counts
                    .into_iter()
                    .map(|(col, count)| (col, count as f64 * idf[col]))
                    .collect();
                let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, w) in &mut row {
                        *w /= norm;
                    }
                }
                row
            })
            .collect();

        let empty_rows = rows.iter().filter(|r| r.is_empty()).count();
        if empty_rows > 0 {
            debug!(empty_rows, "Documents with no terms after stop word removal");
        }
        info!(
            documents = documents.len(),
            vocabulary = vocabulary.len(),
            "Built TF-IDF term matrix"
        );

        TermMatrix {
            vocabulary,
            idf,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<NormalizedDocument> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| NormalizedDocument {
                source_id: i,
                text: t.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_vocabulary_sorted_and_stop_words_dropped() {
        let matrix = TfIdfVectorizer::default().fit_transform(&docs(&[
            "the zebra and the apple",
            "a mango",
        ]));
        assert_eq!(matrix.vocabulary(), &["apple", "mango", "zebra"]);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let matrix =
            TfIdfVectorizer::default().fit_transform(&docs(&["cat cat dog", "dog bird"]));
        for d in 0..matrix.n_documents() {
            let norm: f64 = matrix.row(d).iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_single_document_corpus_has_unit_idf() {
        let matrix = TfIdfVectorizer::default().fit_transform(&docs(&["solo run speed"]));
        for term in matrix.vocabulary() {
            assert!((matrix.idf(term).unwrap() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_document_gets_empty_row() {
        let matrix = TfIdfVectorizer::default().fit_transform(&docs(&["music live", "", "the"]));
        assert_eq!(matrix.n_documents(), 3);
        assert!(matrix.row(1).is_empty());
        assert!(matrix.row(2).is_empty());
    }

    #[test]
    fn test_short_tokens_dropped() {
        let matrix = TfIdfVectorizer::default().fit_transform(&docs(&["x 4k ok"]));
        assert_eq!(matrix.vocabulary(), &["4k", "ok"]);
    }
}
