// Frozen embedding space and nearest-neighbour queries.
//
// The space is trained once per run and then only read. Queries compare
// unit-normalized vectors, so cosine similarity is a plain dot product.

use std::collections::HashMap;

use super::word2vec::{self, Word2VecParams};
use crate::dataset::VideoRecord;
use crate::error::{AnalysisError, AnalysisResult};
use crate::topics::normalize::{normalize, normalize_field};

/// Token -> vector mapping with a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct EmbeddingSpace {
    words: Vec<String>,
    index: HashMap<String, usize>,
    vectors: Vec<Vec<f32>>,
    unit: Vec<Vec<f32>>,
    vector_size: usize,
}

impl EmbeddingSpace {
    /// Train a space over `sentences` (each a sequence of tokens).
    pub fn train(sentences: &[Vec<String>], params: &Word2VecParams) -> AnalysisResult<Self> {
        let (words, vectors) = word2vec::train(sentences, params)?;
        Self::from_vectors(words, vectors)
    }

    /// Build a space from precomputed vectors.
    ///
    /// All vectors must share one non-zero length and words must be unique.
    pub fn from_vectors(words: Vec<String>, vectors: Vec<Vec<f32>>) -> AnalysisResult<Self> {
        if words.is_empty() {
            return Err(AnalysisError::EmptyCorpus);
        }
        if words.len() != vectors.len() {
            return Err(AnalysisError::InvalidParameter {
                name: "vectors",
                reason: format!("{} words but {} vectors", words.len(), vectors.len()),
            });
        }
        let vector_size = vectors[0].len();
        if vector_size == 0 || vectors.iter().any(|v| v.len() != vector_size) {
            return Err(AnalysisError::InvalidParameter {
                name: "vector_size",
                reason: "vectors must share one non-zero length".to_string(),
            });
        }

        let mut index = HashMap::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            if index.insert(word.clone(), i).is_some() {
                return Err(AnalysisError::InvalidParameter {
                    name: "words",
                    reason: format!("duplicate token '{word}'"),
                });
            }
        }

        let unit = vectors.iter().map(|v| unit_vector(v)).collect();

        Ok(Self {
            words,
            index,
            vectors,
            unit,
            vector_size,
        })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn vector_size(&self) -> usize {
        self.vector_size
    }

    /// Tokens in vocabulary order (most frequent first when trained).
    pub fn vocabulary(&self) -> &[String] {
        &self.words
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Raw (unnormalized) vector for `token`.
    pub fn vector(&self, token: &str) -> Option<&[f32]> {
        self.index.get(token).map(|&i| self.vectors[i].as_slice())
    }

    fn lookup(&self, token: &str) -> AnalysisResult<usize> {
        self.index
            .get(token)
            .copied()
            .ok_or_else(|| AnalysisError::UnknownToken(token.to_string()))
    }

    /// Cosine similarity between two tokens. Symmetric.
    pub fn similarity(&self, a: &str, b: &str) -> AnalysisResult<f32> {
        let ia = self.lookup(a)?;
        let ib = self.lookup(b)?;
        Ok(cosine_unit(&self.unit[ia], &self.unit[ib]))
    }

    /// The `k` tokens most similar to `seed`, excluding the seed, highest
    /// similarity first. Equal scores keep vocabulary order.
    ///
    /// Neighbourhoods are not symmetric: `b` may be in `a`'s top-k while `a`
    /// is not in `b`'s.
    pub fn most_similar(&self, seed: &str, k: usize) -> AnalysisResult<Vec<(String, f32)>> {
        let seed_idx = self.lookup(seed)?;
        let seed_vec = &self.unit[seed_idx];

        let mut scored: Vec<(usize, f32)> = self
            .unit
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != seed_idx)
            .map(|(i, v)| (i, cosine_unit(seed_vec, v)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, score)| (self.words[i].clone(), score))
            .collect())
    }
}

fn unit_vector(v: &[f32]) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm < f32::EPSILON {
        vec![0.0; v.len()]
    } else {
        v.iter().map(|x| x / norm).collect()
    }
}

fn cosine_unit(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Build the embedding corpus: one sentence per normalized title and one per
/// normalized tag string, split on whitespace.
pub fn corpus_from_records(records: &[VideoRecord]) -> Vec<Vec<String>> {
    let titles = records.iter().map(|r| normalize(&r.title));
    let tags = records.iter().map(|r| normalize_field(r.tags.as_deref()));
    titles
        .chain(tags)
        .map(|text| text.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space(entries: &[(&str, [f32; 2])]) -> EmbeddingSpace {
        EmbeddingSpace::from_vectors(
            entries.iter().map(|(w, _)| w.to_string()).collect(),
            entries.iter().map(|(_, v)| v.to_vec()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_most_similar_excludes_seed_and_orders() {
        let s = space(&[("a", [1.0, 0.0]), ("b", [0.9, 0.1]), ("c", [0.0, 1.0])]);
        let top = s.most_similar("a", 5).unwrap();
        let words: Vec<&str> = top.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["b", "c"]);
        assert!(top[0].1 >= top[1].1);
    }

    #[test]
    fn test_unknown_seed() {
        let s = space(&[("a", [1.0, 0.0]), ("b", [0.0, 1.0])]);
        assert_eq!(
            s.most_similar("zzz", 3).unwrap_err(),
            AnalysisError::UnknownToken("zzz".to_string())
        );
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let s = space(&[("a", [1.0, 0.0]), ("z", [0.0, 0.0])]);
        assert_eq!(s.similarity("a", "z").unwrap(), 0.0);
    }

    #[test]
    fn test_duplicate_words_rejected() {
        let err = EmbeddingSpace::from_vectors(
            vec!["a".into(), "a".into()],
            vec![vec![1.0], vec![2.0]],
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidParameter { .. }));
    }

    #[test]
    fn test_corpus_skips_empty_tags() {
        let records = vec![
            VideoRecord::new("Cat, Video!", None, 10),
            VideoRecord::new("Dog", Some("pets animals"), 5),
        ];
        let corpus = corpus_from_records(&records);
        assert_eq!(
            corpus,
            vec![
                vec!["cat".to_string(), "video".to_string()],
                vec!["dog".to_string()],
                vec!["pets".to_string(), "animals".to_string()],
            ]
        );
    }
}
