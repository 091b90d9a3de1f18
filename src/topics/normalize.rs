// Text normalization for titles and tags.
//
// Lowercases and drops every character that is neither alphanumeric nor
// whitespace. Punctuation is removed, not replaced, so "lo-fi" becomes "lofi".

use serde::{Deserialize, Serialize};

/// A title+tags document ready for vectorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    /// Index of the source record in the slice the document was built from
    pub source_id: usize,
    /// Lowercase, alphanumeric-and-whitespace-only text
    pub text: String,
}

/// Normalize free text: lowercase, keep alphanumerics and whitespace only.
///
/// Idempotent: normalizing already-normalized text returns it unchanged.
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Normalize an optional field. Missing values become the empty string.
pub fn normalize_field(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// Build the vectorizer document for one record: normalized title, a space,
/// then normalized tags.
pub fn document_text(title: &str, tags: Option<&str>) -> String {
    format!("{} {}", normalize(title), normalize_field(tags))
}
