// Titlecraft: keyword ranking and title suggestions from video metadata.
//
// This is the library root. Each module corresponds to a stage of the
// analysis pipeline or to the thin layer that loads and displays data.

pub mod config;
pub mod dataset;
pub mod embeddings;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod schedule;
pub mod scoring;
pub mod title;
pub mod topics;

pub use error::{AnalysisError, AnalysisResult};
