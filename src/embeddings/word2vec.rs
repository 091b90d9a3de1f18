// word2vec training with negative sampling.
//
// Learns one dense vector per token from the local contexts it appears in.
// Both CBOW (predict a word from the mean of its context) and skip-gram
// (predict each context word from the word) are supported; CBOW is the
// default. Training is single-threaded and driven by one seeded RNG, so the
// same sentences and params always produce the same vectors.
//
// Every token seen at least once gets a vector. Rare tags are often the most
// meaningful ones in video metadata, so there is no minimum-count cut.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AnalysisError, AnalysisResult};

/// Exponent applied to counts when building the negative sampling table.
const UNIGRAM_POWER: f64 = 0.75;

/// Which prediction task the vectors are trained on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Architecture {
    #[default]
    Cbow,
    SkipGram,
}

/// Training knobs. Fixed for the lifetime of the trained space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word2VecParams {
    /// Embedding dimensionality
    pub vector_size: usize,
    /// Maximum distance between a word and a context word
    pub window: usize,
    /// Passes over the corpus
    pub epochs: usize,
    /// Noise words drawn per positive example
    pub negative: usize,
    /// Starting learning rate
    pub alpha: f32,
    /// Learning rate reached at the end of training
    pub min_alpha: f32,
    /// Frequent-word downsampling threshold (0 disables)
    pub sample: f64,
    pub seed: u64,
    pub architecture: Architecture,
}

impl Default for Word2VecParams {
    fn default() -> Self {
        Self {
            vector_size: 100,
            window: 5,
            epochs: 5,
            negative: 5,
            alpha: 0.025,
            min_alpha: 0.0001,
            sample: 1e-3,
            seed: 1,
            architecture: Architecture::Cbow,
        }
    }
}

impl Word2VecParams {
    pub fn validate(&self) -> AnalysisResult<()> {
        let positive = [
            ("vector_size", self.vector_size),
            ("window", self.window),
            ("epochs", self.epochs),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(AnalysisError::InvalidParameter {
                    name,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        let alpha_ok = self.alpha > 0.0 && self.min_alpha >= 0.0 && self.min_alpha <= self.alpha;
        if !alpha_ok {
            return Err(AnalysisError::InvalidParameter {
                name: "alpha",
                reason: format!(
                    "need 0 <= min_alpha ({}) <= alpha ({}) and alpha > 0",
                    self.min_alpha, self.alpha
                ),
            });
        }
        if self.sample < 0.0 {
            return Err(AnalysisError::InvalidParameter {
                name: "sample",
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

/// Token vocabulary ordered by descending frequency, ties by first occurrence.
#[derive(Debug, Clone)]
pub(crate) struct Vocab {
    pub words: Vec<String>,
    pub counts: Vec<u64>,
    pub index: HashMap<String, usize>,
}

pub(crate) fn build_vocab(sentences: &[Vec<String>]) -> Vocab {
    let mut first_seen: Vec<String> = Vec::new();
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for token in sentences.iter().flatten() {
        let count = counts.entry(token.as_str()).or_insert(0);
        if *count == 0 {
            first_seen.push(token.clone());
        }
        *count += 1;
    }

    // stable sort keeps first-occurrence order among equal counts
    first_seen.sort_by(|a, b| counts[b.as_str()].cmp(&counts[a.as_str()]));

    let word_counts: Vec<u64> = first_seen.iter().map(|w| counts[w.as_str()]).collect();
    let index = first_seen
        .iter()
        .enumerate()
        .map(|(i, w)| (w.clone(), i))
        .collect();

    Vocab {
        words: first_seen,
        counts: word_counts,
        index,
    }
}

/// Cumulative unigram^0.75 distribution for drawing noise words.
struct NegativeTable {
    cumulative: Vec<f64>,
}

impl NegativeTable {
    fn new(counts: &[u64]) -> Self {
        let mut total = 0.0;
        let cumulative = counts
            .iter()
            .map(|&c| {
                total += (c as f64).powf(UNIGRAM_POWER);
                total
            })
            .collect();
        Self { cumulative }
    }

    fn sample(&self, rng: &mut StdRng) -> usize {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let r = rng.random::<f64>() * total;
        self.cumulative
            .partition_point(|&c| c <= r)
            .min(self.cumulative.len() - 1)
    }
}

/// Probability of keeping each occurrence of a word under downsampling.
fn keep_probabilities(counts: &[u64], sample: f64) -> Vec<f64> {
    if sample <= 0.0 {
        return vec![1.0; counts.len()];
    }
    let total: u64 = counts.iter().sum();
    let threshold = sample * total as f64;
    counts
        .iter()
        .map(|&c| {
            let c = c as f64;
            ((c / threshold).sqrt() + 1.0) * (threshold / c)
        })
        .map(|p| p.min(1.0))
        .collect()
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// State shared by every update step in one training run.
struct Trainer<'a> {
    params: &'a Word2VecParams,
    table: NegativeTable,
    rng: StdRng,
    syn0: Vec<Vec<f32>>,
    syn1neg: Vec<Vec<f32>>,
}

impl Trainer<'_> {
    /// One positive target plus `negative` noise targets against hidden
    /// vector `hidden`. Accumulates the hidden-layer gradient into `grad`.
    fn negative_sampling(
        &mut self,
        hidden: &[f32],
        target: usize,
        alpha: f32,
        grad: &mut [f32],
    ) {
        for d in 0..=self.params.negative {
            let (word, label) = if d == 0 {
                (target, 1.0)
            } else {
                let noise = self.table.sample(&mut self.rng);
                if noise == target {
                    continue;
                }
                (noise, 0.0)
            };
            let out = &mut self.syn1neg[word];
            let g = (label - sigmoid(dot(hidden, out.as_slice()))) * alpha;
            for (acc, o) in grad.iter_mut().zip(out.iter()) {
                *acc += g * o;
            }
            for (o, h) in out.iter_mut().zip(hidden) {
                *o += g * h;
            }
        }
    }

    fn train_sentence(&mut self, sentence: &[usize], alpha: f32) {
        let dim = self.params.vector_size;
        let window = self.params.window;
        for pos in 0..sentence.len() {
            let reduced = self.rng.random_range(0..window);
            let span = window - reduced;
            let start = pos.saturating_sub(span);
            let end = (pos + span + 1).min(sentence.len());
            let context: Vec<usize> = (start..end)
                .filter(|&i| i != pos)
                .map(|i| sentence[i])
                .collect();
            if context.is_empty() {
                continue;
            }
            let word = sentence[pos];

            match self.params.architecture {
                Architecture::Cbow => {
                    let mut hidden = vec![0.0_f32; dim];
                    for &c in &context {
                        for (h, v) in hidden.iter_mut().zip(&self.syn0[c]) {
                            *h += v;
                        }
                    }
                    let inv = 1.0 / context.len() as f32;
                    hidden.iter_mut().for_each(|h| *h *= inv);

                    let mut grad = vec![0.0_f32; dim];
                    self.negative_sampling(&hidden, word, alpha, &mut grad);
                    for &c in &context {
                        for (v, g) in self.syn0[c].iter_mut().zip(&grad) {
                            *v += g;
                        }
                    }
                }
                Architecture::SkipGram => {
                    for &c in &context {
                        let hidden = self.syn0[c].clone();
                        let mut grad = vec![0.0_f32; dim];
                        self.negative_sampling(&hidden, word, alpha, &mut grad);
                        for (v, g) in self.syn0[c].iter_mut().zip(&grad) {
                            *v += g;
                        }
                    }
                }
            }
        }
    }
}

/// Train vectors for every token in `sentences`.
///
/// Returns the vocabulary (frequency order) and one raw vector per word.
pub fn train(
    sentences: &[Vec<String>],
    params: &Word2VecParams,
) -> AnalysisResult<(Vec<String>, Vec<Vec<f32>>)> {
    params.validate()?;

    let vocab = build_vocab(sentences);
    if vocab.words.is_empty() {
        return Err(AnalysisError::EmptyCorpus);
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let dim = params.vector_size;
    let syn0: Vec<Vec<f32>> = (0..vocab.words.len())
        .map(|_| {
            (0..dim)
                .map(|_| (rng.random::<f32>() - 0.5) / dim as f32)
                .collect()
        })
        .collect();

    let mut trainer = Trainer {
        params,
        table: NegativeTable::new(&vocab.counts),
        rng,
        syn0,
        syn1neg: vec![vec![0.0; dim]; vocab.words.len()],
    };

    let keep = keep_probabilities(&vocab.counts, params.sample);
    let encoded: Vec<Vec<usize>> = sentences
        .iter()
        .map(|s| s.iter().map(|t| vocab.index[t.as_str()]).collect())
        .collect();

    let total_words: u64 = vocab.counts.iter().sum();
    let planned = (total_words * params.epochs as u64) as f64;
    let mut processed: u64 = 0;

    for epoch in 0..params.epochs {
        for sentence in &encoded {
            let progress = processed as f64 / planned;
            let alpha = (params.alpha - (params.alpha - params.min_alpha) * progress as f32)
                .max(params.min_alpha);

            let kept: Vec<usize> = sentence
                .iter()
                .copied()
                .filter(|&w| keep[w] >= 1.0 || keep[w] >= trainer.rng.random::<f64>())
                .collect();
            trainer.train_sentence(&kept, alpha);
            processed += sentence.len() as u64;
        }
        debug!(epoch, "Finished embedding epoch");
    }

    info!(
        vocabulary = vocab.words.len(),
        dim,
        epochs = params.epochs,
        "Trained word embeddings"
    );

    Ok((vocab.words, trainer.syn0))
}
