//! Content fingerprints that ignore per-instance identifiers.
use crate::util::sha256_hex;
use anyhow::{Context, Result};
use regex::Regex;

const NAME_PLACEHOLDER: &str = "name: <normalized>";
const INSTANCE_PLACEHOLDER: &str = "uXXXX-";

pub struct Fingerprinter {
    name_line: Regex,
    instance_token: Regex,
    whitespace: Regex,
}

impl Fingerprinter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            name_line: Regex::new(r"(?m)^name:\s*.+$").context("compile name rule")?,
            instance_token: Regex::new(r"\bu\d{4}[-_]").context("compile instance rule")?,
            whitespace: Regex::new(r"\s+").context("compile whitespace rule")?,
        })
    }

    /// Replace `name:` lines and `uNNNN-` tokens with placeholders, then
    /// collapse whitespace.
    pub fn normalize(&self, text: &str) -> String {
        let text = self.name_line.replace_all(text, NAME_PLACEHOLDER);
        let text = self.instance_token.replace_all(&text, INSTANCE_PLACEHOLDER);
        self.whitespace.replace_all(text.trim(), " ").into_owned()
    }

    /// SHA-256 hex digest of the normalized text.
    pub fn fingerprint(&self, text: &str) -> String {
        sha256_hex(self.normalize(text).as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprinter() -> Fingerprinter {
        Fingerprinter::new().expect("compile fingerprinter")
    }

    #[test]
    fn normalize_replaces_name_lines_and_instance_tokens() {
        let text = "---\nname: u0042-log-triage\ndescription: see u1234_helper and u99-x\n---\n\n# Title\n";
        assert_eq!(
            fingerprinter().normalize(text),
            "--- name: <normalized> description: see uXXXX-helper and u99-x --- # Title"
        );
    }

    #[test]
    fn indented_name_is_not_a_name_line() {
        let normalized = fingerprinter().normalize("  name: keep me");
        assert_eq!(normalized, "name: keep me");
        let normalized = fingerprinter().normalize("xname: keep me");
        assert_eq!(normalized, "xname: keep me");
    }

    #[test]
    fn instance_token_needs_word_boundary() {
        assert_eq!(fingerprinter().normalize("au1234-x"), "au1234-x");
        assert_eq!(fingerprinter().normalize("(u1234-x)"), "(uXXXX-x)");
    }

    #[test]
    fn fingerprint_ignores_identifiers_and_whitespace() {
        let fp = fingerprinter();
        let a = "---\nname: alpha\n---\n# Skill u0001-core\n\nBody   text\n";
        let b = "---\nname: beta\n---\n# Skill u0002_core\nBody text";
        assert_eq!(fp.fingerprint(a), fp.fingerprint(b));
        assert_eq!(fp.fingerprint(a).len(), 64);
    }

    #[test]
    fn fingerprint_detects_content_changes() {
        let fp = fingerprinter();
        assert_ne!(
            fp.fingerprint("name: a\nBody one"),
            fp.fingerprint("name: a\nBody two")
        );
    }
}
