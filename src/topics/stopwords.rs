// Stop word sets for term extraction.
//
// The English list comes from the `stop-words` crate built with its `nltk`
// feature: articles, pronouns, auxiliaries, prepositions and conjunctions
// only, so content words like "new" or "show" stay rankable. Entries are
// passed through the same normalizer as the documents, which turns
// contractions such as "you're" into the "youre" token the vectorizer sees.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use stop_words::{get, LANGUAGE};

use super::normalize::normalize;

/// Which stop word list the vectorizer excludes before weighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopWordSet {
    /// English function words
    #[default]
    Builtin,
    /// No exclusion at all
    None,
}

impl StopWordSet {
    /// Parse a config value (`builtin`, `none`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "builtin" => Some(Self::Builtin),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    /// Materialize the set as normalized words.
    pub fn words(self) -> HashSet<String> {
        match self {
            Self::None => HashSet::new(),
            Self::Builtin => get(LANGUAGE::English)
                .iter()
                .map(|w| normalize(w))
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }
}
