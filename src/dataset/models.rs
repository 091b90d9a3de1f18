// Data types for the video metadata table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One validated row of the metadata table. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub title: String,
    /// Free text or a space-joined tag list; `None` when the video had no tags
    pub tags: Option<String>,
    pub view_count: u64,
    /// Publish time, used only by the upload scheduler
    pub published_at: Option<DateTime<Utc>>,
}

impl VideoRecord {
    pub fn new(title: impl Into<String>, tags: Option<&str>, view_count: u64) -> Self {
        Self {
            title: title.into(),
            tags: tags.map(str::to_string),
            view_count,
            published_at: None,
        }
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }
}

/// A row as exported by the collector, before validation.
///
/// Column names match the collector's export. Every field is loosely typed
/// because the export mixes strings, numbers, lists and nulls.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVideoRow {
    #[serde(rename = "Title", default)]
    pub title: Option<serde_json::Value>,
    #[serde(rename = "Tags", default)]
    pub tags: Option<serde_json::Value>,
    #[serde(rename = "View Count", default)]
    pub view_count: Option<serde_json::Value>,
    #[serde(rename = "Published At", default)]
    pub published_at: Option<serde_json::Value>,
}
