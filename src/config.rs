use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::embeddings::Word2VecParams;
use crate::topics::stopwords::StopWordSet;

/// Default location of the collector's JSON export.
pub const DEFAULT_DATA_PATH: &str = "./output/trending_videos.json";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. CLI flags
/// override anything set here.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON export of the video metadata table
    pub data_path: PathBuf,
    /// Base title the suggested title is built on
    pub base_title: String,
    /// How many ranked terms go into the suggested title
    pub top_terms: usize,
    pub stop_words: StopWordSet,
    /// Embedding training knobs (vector size, window, epochs, seed)
    pub embedding: Word2VecParams,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every value has a default; a value that is set but unparseable is an
    /// error rather than being silently ignored.
    pub fn load() -> Result<Self> {
        let defaults = Word2VecParams::default();

        Ok(Self {
            data_path: env::var("TITLECRAFT_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH)),
            base_title: env::var("TITLECRAFT_BASE_TITLE")
                .unwrap_or_else(|_| "Dragon Ball Sparkling Gameplay".to_string()),
            top_terms: parse_var("TITLECRAFT_TOP_TERMS", 10)?,
            stop_words: parse_stop_words("TITLECRAFT_STOP_WORDS")?,
            embedding: Word2VecParams {
                vector_size: parse_var("TITLECRAFT_VECTOR_SIZE", defaults.vector_size)?,
                window: parse_var("TITLECRAFT_WINDOW", defaults.window)?,
                epochs: parse_var("TITLECRAFT_EPOCHS", defaults.epochs)?,
                seed: parse_var("TITLECRAFT_SEED", defaults.seed)?,
                ..defaults
            },
        })
    }

    /// Check that the dataset file exists.
    /// Call this before any command that reads the table.
    pub fn require_data(&self) -> Result<()> {
        if !self.data_path.exists() {
            anyhow::bail!(
                "Dataset not found: {}\n\
                 Export the collected video table as JSON, then pass --input \
                 or set TITLECRAFT_DATA_PATH.",
                self.data_path.display()
            );
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{name} must be a number (got {raw:?}): {e}")),
        Err(_) => Ok(default),
    }
}

fn parse_stop_words(name: &str) -> Result<StopWordSet> {
    match env::var(name) {
        Ok(raw) => StopWordSet::parse(&raw)
            .with_context(|| format!("{name} must be builtin or none (got {raw:?})")),
        Err(_) => Ok(StopWordSet::Builtin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns its variable name so parallel tests never race.

    #[test]
    fn test_parse_var_default_when_unset() {
        env::remove_var("TITLECRAFT_TEST_UNSET_COUNT");
        assert_eq!(parse_var("TITLECRAFT_TEST_UNSET_COUNT", 7usize).unwrap(), 7);
    }

    #[test]
    fn test_parse_var_trims_value() {
        env::set_var("TITLECRAFT_TEST_PADDED_COUNT", " 42 ");
        assert_eq!(parse_var("TITLECRAFT_TEST_PADDED_COUNT", 0usize).unwrap(), 42);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("TITLECRAFT_TEST_BAD_COUNT", "lots");
        let err = parse_var("TITLECRAFT_TEST_BAD_COUNT", 10usize).unwrap_err();
        assert!(err.to_string().contains("TITLECRAFT_TEST_BAD_COUNT must be a number"));
    }

    #[test]
    fn test_parse_var_rejects_negative_for_unsigned() {
        env::set_var("TITLECRAFT_TEST_NEGATIVE_SEED", "-1");
        assert!(parse_var("TITLECRAFT_TEST_NEGATIVE_SEED", 1u64).is_err());
    }

    #[test]
    fn test_stop_words_default_and_valid() {
        env::remove_var("TITLECRAFT_TEST_UNSET_STOP");
        assert_eq!(
            parse_stop_words("TITLECRAFT_TEST_UNSET_STOP").unwrap(),
            StopWordSet::Builtin
        );
        env::set_var("TITLECRAFT_TEST_NONE_STOP", "None");
        assert_eq!(
            parse_stop_words("TITLECRAFT_TEST_NONE_STOP").unwrap(),
            StopWordSet::None
        );
    }

    #[test]
    fn test_stop_words_rejects_unknown_set() {
        env::set_var("TITLECRAFT_TEST_BAD_STOP", "klingon");
        let err = parse_stop_words("TITLECRAFT_TEST_BAD_STOP").unwrap_err();
        assert!(err.to_string().contains("must be builtin or none"));
    }
}
