//! Context extraction from skill documents.
//!
//! A handful of ordered pattern rules pull a capability label, a domain label
//! and a title out of the front matter and the first `#` heading. Every rule
//! degrades to a fallback literal instead of failing.
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeMap;

pub const FALLBACK_TITLE: &str = "This capability";
pub const FALLBACK_DOMAIN: &str = "this domain";

const FRONT_MATTER_OPEN: &str = "---\n";
const FRONT_MATTER_CLOSE: &str = "\n---\n";

/// Read-only view of the hints a document carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionContext {
    pub capability: String,
    pub domain: String,
    pub title: String,
}

/// Compiled extraction rules.
pub struct ContextExtractor {
    quoted: Regex,
    domain: Regex,
    title: Regex,
}

impl ContextExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            quoted: Regex::new(r#""([^"]+)""#).context("compile capability rule")?,
            domain: Regex::new(r"(?i)\bfor\s+(.+?)\.\s*(Use|Trigger|$)")
                .context("compile domain rule")?,
            title: Regex::new(r"(?m)^#\s+(.+)$").context("compile title rule")?,
        })
    }

    pub fn extract(&self, text: &str) -> ExtractionContext {
        let front_matter = parse_front_matter(text);
        let description = front_matter
            .get("description")
            .map(String::as_str)
            .unwrap_or_default();

        let title = self
            .title(text)
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());
        let capability = self
            .capability(description)
            .unwrap_or_else(|| title.clone());
        let domain = self
            .domain(description)
            .unwrap_or_else(|| FALLBACK_DOMAIN.to_string());

        ExtractionContext {
            capability,
            domain,
            title,
        }
    }

    /// First double-quoted phrase in the description.
    pub fn capability(&self, description: &str) -> Option<String> {
        let caps = self.quoted.captures(description)?;
        Some(caps.get(1)?.as_str().trim().to_string())
    }

    /// Phrase after "for" up to a sentence that starts with Use/Trigger, or the end.
    pub fn domain(&self, description: &str) -> Option<String> {
        let caps = self.domain.captures(description)?;
        Some(caps.get(1)?.as_str().trim().to_string())
    }

    /// Text of the first level-1 heading anywhere in the document.
    pub fn title(&self, text: &str) -> Option<String> {
        let caps = self.title.captures(text)?;
        Some(caps.get(1)?.as_str().trim().to_string())
    }
}

/// Parse the leading `---` delimited key/value block.
///
/// Lines without a `:` are skipped. A missing opening or closing delimiter
/// yields an empty map.
pub fn parse_front_matter(text: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    let Some(rest) = text.strip_prefix(FRONT_MATTER_OPEN) else {
        return out;
    };
    let Some(end) = rest.find(FRONT_MATTER_CLOSE) else {
        return out;
    };
    for line in rest[..end].lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        out.insert(
            key.trim().to_string(),
            value.trim().trim_matches('"').to_string(),
        );
    }
    out
}
