//! Top-downloads feed loading.
//!
//! The feed is an opaque export of marketplace records. Only its shape is
//! checked; records are ordered by download count for display.
use crate::error::PreconditionError;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// One marketplace record, read leniently: fields of an unexpected type fall
/// back instead of failing the run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedRecord {
    pub slug: String,
    pub display_name: Option<String>,
    pub downloads: u64,
    pub summary: Option<String>,
}

impl FeedRecord {
    pub fn from_value(item: &Value) -> Self {
        let downloads = item
            .get("stats")
            .and_then(|stats| stats.get("downloads"))
            .and_then(|value| value.as_u64().or_else(|| value.as_f64().map(|n| n as u64)))
            .unwrap_or(0);
        Self {
            slug: item.get("slug").and_then(text_of).unwrap_or_default(),
            display_name: item.get("displayName").and_then(text_of),
            downloads,
            summary: item.get("summary").and_then(text_of),
        }
    }

    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.slug)
    }
}

/// Strings as-is, null as absent, anything else in its JSON form.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Load the feed file and sort it by downloads, highest first.
pub fn load_top_downloads(path: &Path) -> Result<Vec<FeedRecord>> {
    if !path.is_file() {
        return Err(PreconditionError::MissingFeed(path.to_path_buf()).into());
    }
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let records = parse_top_downloads(&bytes)?;
    if records.is_empty() {
        tracing::warn!(feed = %path.display(), "top-downloads feed has no records");
    }
    Ok(records)
}

/// Accept either a bare list or an object whose `items` field is the list.
/// Only the list shape is checked.
pub fn parse_top_downloads(bytes: &[u8]) -> Result<Vec<FeedRecord>, PreconditionError> {
    let payload: Value = serde_json::from_slice(bytes)
        .map_err(|err| PreconditionError::FeedShape(format!("invalid JSON: {err}")))?;
    let items = match payload {
        Value::Object(mut object) => object
            .remove("items")
            .unwrap_or_else(|| Value::Array(Vec::new())),
        other => other,
    };
    let Value::Array(items) = items else {
        return Err(PreconditionError::FeedShape(
            "expected list in `items`".to_string(),
        ));
    };
    let mut records: Vec<FeedRecord> = items.iter().map(FeedRecord::from_value).collect();
    records.sort_by(|a, b| b.downloads.cmp(&a.downloads));
    Ok(records)
}
