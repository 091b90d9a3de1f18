// Loading and validating the metadata table.
//
// This is the filtering step that sits in front of the analysis core: it
// coerces `View Count` to an integer and drops rows where that fails, so the
// core only ever sees well-typed records. Text fields are lenient: a missing
// or non-string title or tag field becomes empty rather than an error.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::models::{RawVideoRow, VideoRecord};

/// Read a JSON array of collector rows from `path` and validate it.
pub fn load_records(path: &Path) -> Result<Vec<VideoRecord>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;
    parse_records(&json).with_context(|| format!("Invalid dataset {}", path.display()))
}

/// Parse a JSON array of collector rows and validate it.
pub fn parse_records(json: &str) -> Result<Vec<VideoRecord>> {
    let rows: Vec<RawVideoRow> =
        serde_json::from_str(json).context("Expected a JSON array of video rows")?;
    Ok(validate_rows(rows))
}

/// Keep rows with a usable view count; coerce the rest of each row.
pub fn validate_rows(rows: Vec<RawVideoRow>) -> Vec<VideoRecord> {
    let total = rows.len();
    let records: Vec<VideoRecord> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let Some(view_count) = row.view_count.as_ref().and_then(coerce_count) else {
                warn!(row = i, value = ?row.view_count, "Dropping row with unusable view count");
                return None;
            };
            Some(VideoRecord {
                title: text_field(row.title.as_ref()).unwrap_or_default(),
                tags: text_field(row.tags.as_ref()),
                view_count,
                published_at: row.published_at.as_ref().and_then(parse_timestamp),
            })
        })
        .collect();

    info!(
        rows = total,
        kept = records.len(),
        dropped = total - records.len(),
        "Loaded video table"
    );
    records
}

/// Coerce a JSON value into a non-negative integer count.
///
/// Accepts integers, non-negative finite floats (truncated) and strings
/// holding either.
pub fn coerce_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(float_count)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_count))
        }
        _ => None,
    }
}

fn float_count(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0).then_some(f as u64)
}

/// Strings pass through, string lists are space-joined, anything else is
/// treated as missing.
fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            Some(parts.join(" "))
        }
        _ => None,
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            debug!(value = raw, error = %e, "Ignoring unparseable publish time");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_count_variants() {
        assert_eq!(coerce_count(&json!(120)), Some(120));
        assert_eq!(coerce_count(&json!(12.9)), Some(12));
        assert_eq!(coerce_count(&json!(" 42 ")), Some(42));
        assert_eq!(coerce_count(&json!("1e3")), Some(1000));
        assert_eq!(coerce_count(&json!(-5)), None);
        assert_eq!(coerce_count(&json!("n/a")), None);
        assert_eq!(coerce_count(&json!(null)), None);
    }

    #[test]
    fn test_text_field_leniency() {
        assert_eq!(text_field(Some(&json!(["a", "b"]))).as_deref(), Some("a b"));
        assert_eq!(text_field(Some(&json!(7))), None);
        assert_eq!(text_field(None), None);
    }
}
