//! Audit configuration.
//!
//! Section headings, profile labels and rubric markers are plain data loaded
//! once and handed to each component at construction, so two runs with
//! different rubric versions never share state.
use crate::synth::SectionKind;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path};

/// Current schema version for audit config files.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

const DEFAULT_EXPECTED_DOCUMENTS: usize = 10_000;

fn default_schema_version() -> u32 {
    CONFIG_SCHEMA_VERSION
}

fn default_expected_documents() -> Option<usize> {
    Some(DEFAULT_EXPECTED_DOCUMENTS)
}

fn default_profile_labels() -> Vec<String> {
    [
        "baseline-delivery",
        "speed-optimized",
        "risk-and-compliance-first",
        "cost-and-throughput-optimized",
        "incident-and-escalation-mode",
    ]
    .iter()
    .map(|label| label.to_string())
    .collect()
}

/// Root config for an audit run.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub paths: AuditPaths,
    /// `None` disables the corpus size precondition.
    #[serde(default = "default_expected_documents")]
    pub expected_documents: Option<usize>,
    #[serde(default)]
    pub headings: SectionHeadings,
    #[serde(default = "default_profile_labels")]
    pub profile_labels: Vec<String>,
    #[serde(default)]
    pub markers: RubricMarkers,
    #[serde(default)]
    pub report: ReportSettings,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            paths: AuditPaths::default(),
            expected_documents: default_expected_documents(),
            headings: SectionHeadings::default(),
            profile_labels: default_profile_labels(),
            markers: RubricMarkers::default(),
            report: ReportSettings::default(),
        }
    }
}

/// Root-relative locations of the corpus and the produced artifacts.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct AuditPaths {
    pub shards_root: String,
    pub top_downloads_feed: String,
    pub rubric_report: String,
    pub scorecard: String,
    pub redundancy_plan: String,
}

impl Default for AuditPaths {
    fn default() -> Self {
        Self {
            shards_root: "skills/generated/shards".to_string(),
            top_downloads_feed: "reports/clawhub-top-downloads.json".to_string(),
            rubric_report: "reports/clawhub-benchmark-rubric.md".to_string(),
            scorecard: "skills/state/skills-utility-scorecard.json".to_string(),
            redundancy_plan: "skills/state/skills-redundancy-resolution-plan.json".to_string(),
        }
    }
}

/// Titles of the nine synthesized sections (rendered as `## <title>`).
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct SectionHeadings {
    pub why: String,
    pub when: String,
    pub trigger_checklist: String,
    pub cadence: String,
    pub examples: String,
    pub anti_patterns: String,
    pub output_contract: String,
    pub validation_gates: String,
    pub handoff_contract: String,
}

impl Default for SectionHeadings {
    fn default() -> Self {
        Self {
            why: "Why This Skill Exists".to_string(),
            when: "When To Use".to_string(),
            trigger_checklist: "Trigger Checklist".to_string(),
            cadence: "Operational Cadence (Day / Week / Month)".to_string(),
            examples: "Practical Usage Examples".to_string(),
            anti_patterns: "Anti-Patterns (Do Not Use)".to_string(),
            output_contract: "Output Contract".to_string(),
            validation_gates: "Validation Gates".to_string(),
            handoff_contract: "Handoff Contract".to_string(),
        }
    }
}

impl SectionHeadings {
    pub fn title(&self, kind: SectionKind) -> &str {
        match kind {
            SectionKind::Why => &self.why,
            SectionKind::When => &self.when,
            SectionKind::TriggerChecklist => &self.trigger_checklist,
            SectionKind::Cadence => &self.cadence,
            SectionKind::Examples => &self.examples,
            SectionKind::AntiPatterns => &self.anti_patterns,
            SectionKind::OutputContract => &self.output_contract,
            SectionKind::ValidationGates => &self.validation_gates,
            SectionKind::HandoffContract => &self.handoff_contract,
        }
    }

    /// The full level-2 heading line for a section.
    pub fn line(&self, kind: SectionKind) -> String {
        format!("## {}", self.title(kind))
    }
}

/// Literal markers the rubric looks for besides headings.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct RubricMarkers {
    pub min_why_words: usize,
    pub cadence_keywords: Vec<String>,
    pub expected_output: String,
    pub anti_pattern: String,
    /// Matched case-insensitively.
    pub determinism: String,
    /// Matched case-insensitively as a whole word.
    pub trigger_word: String,
}

impl Default for RubricMarkers {
    fn default() -> Self {
        Self {
            min_why_words: 12,
            cadence_keywords: vec![
                "Daily".to_string(),
                "Weekly".to_string(),
                "Monthly".to_string(),
            ],
            expected_output: "Expected output".to_string(),
            anti_pattern: "Do **not**".to_string(),
            determinism: "determin".to_string(),
            trigger_word: "trigger".to_string(),
        }
    }
}

/// Knobs for the rendered Markdown report.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSettings {
    pub top_n: usize,
    pub summary_max_chars: usize,
    pub feed_endpoint: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_n: 15,
            summary_max_chars: 120,
            feed_endpoint: "https://wry-manatee-359.convex.site/api/v1/skills?sort=downloads&dir=desc&nonSuspiciousOnly=true&limit=50".to_string(),
        }
    }
}

/// Build the default config used when no config file is supplied.
pub fn default_config() -> AuditConfig {
    AuditConfig::default()
}

/// Render a pretty JSON config stub.
pub fn config_stub() -> Result<String> {
    serde_json::to_string_pretty(&default_config()).context("serialize config stub")
}

/// Load a config file from disk without validating it.
pub fn load_config(path: &Path) -> Result<AuditConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: AuditConfig =
        serde_json::from_slice(&bytes).context("parse audit config JSON")?;
    Ok(config)
}

/// Load `path` when given, otherwise the defaults, and validate the result.
pub fn resolve_config(path: Option<&Path>) -> Result<AuditConfig> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => default_config(),
    };
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &AuditConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported audit config schema_version {}",
            config.schema_version
        ));
    }

    let paths = &config.paths;
    for (label, rel) in [
        ("paths.shards_root", &paths.shards_root),
        ("paths.top_downloads_feed", &paths.top_downloads_feed),
        ("paths.rubric_report", &paths.rubric_report),
        ("paths.scorecard", &paths.scorecard),
        ("paths.redundancy_plan", &paths.redundancy_plan),
    ] {
        validate_relative_path(rel, label)?;
    }

    let mut seen = BTreeSet::new();
    for kind in SectionKind::ALL {
        let title = config.headings.title(kind).trim();
        if title.is_empty() {
            return Err(anyhow!("heading for {} must be non-empty", kind.key()));
        }
        if !seen.insert(title) {
            return Err(anyhow!("duplicate section heading {title:?}"));
        }
    }

    if config.profile_labels.is_empty() {
        return Err(anyhow!("profile_labels must list at least one label"));
    }
    if config
        .profile_labels
        .iter()
        .any(|label| label.trim().is_empty())
    {
        return Err(anyhow!("profile_labels entries must be non-empty"));
    }

    let markers = &config.markers;
    for (label, value) in [
        ("markers.expected_output", &markers.expected_output),
        ("markers.anti_pattern", &markers.anti_pattern),
        ("markers.determinism", &markers.determinism),
        ("markers.trigger_word", &markers.trigger_word),
    ] {
        if value.is_empty() {
            return Err(anyhow!("{label} must be non-empty"));
        }
    }
    Ok(())
}

fn validate_relative_path(rel: &str, label: &str) -> Result<()> {
    let path = Path::new(rel);
    if rel.trim().is_empty() {
        return Err(anyhow!("{label} must be non-empty"));
    }
    if path.is_absolute() || has_parent_components(path) {
        return Err(anyhow!(
            "{label} must be a relative path without '..' (got {rel:?})"
        ));
    }
    Ok(())
}

fn has_parent_components(path: &Path) -> bool {
    path.components()
        .any(|component| matches!(component, Component::ParentDir))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
