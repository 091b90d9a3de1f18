// Suggested title assembly.
//
// The composer never reorders or truncates keywords; callers pass exactly
// the keywords they want, in the order they want them.

use serde::{Deserialize, Serialize};

/// Separator between the base title and the keyword list.
pub const KEYWORD_DELIMITER: &str = ": ";
/// Separator between keywords.
pub const KEYWORD_SEPARATOR: &str = " | ";

/// A base title plus the keywords appended to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedTitle {
    pub base: String,
    pub keywords: Vec<String>,
    pub rendered: String,
}

/// Combine `base` with `keywords`: `"base: k1 | k2"`, or just `base` when
/// there are no keywords.
pub fn compose<S: AsRef<str>>(base: &str, keywords: &[S]) -> SuggestedTitle {
    let keywords: Vec<String> = keywords.iter().map(|k| k.as_ref().to_string()).collect();
    let rendered = if keywords.is_empty() {
        base.to_string()
    } else {
        format!(
            "{base}{KEYWORD_DELIMITER}{}",
            keywords.join(KEYWORD_SEPARATOR)
        )
    };
    SuggestedTitle {
        base: base.to_string(),
        keywords,
        rendered,
    }
}

impl std::fmt::Display for SuggestedTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.rendered)
    }
}
