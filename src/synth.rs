//! Deterministic section synthesis.
//!
//! Missing sections are appended in a fixed order; text already present is
//! never rewritten. Each step returns a new [`Document`] value.
use crate::config::SectionHeadings;
use crate::extract::ExtractionContext;

/// One of the nine sections every upgraded skill carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKind {
    Why,
    When,
    TriggerChecklist,
    Cadence,
    Examples,
    AntiPatterns,
    OutputContract,
    ValidationGates,
    HandoffContract,
}

impl SectionKind {
    /// Append order.
    pub const ALL: [SectionKind; 9] = [
        SectionKind::Why,
        SectionKind::When,
        SectionKind::TriggerChecklist,
        SectionKind::Cadence,
        SectionKind::Examples,
        SectionKind::AntiPatterns,
        SectionKind::OutputContract,
        SectionKind::ValidationGates,
        SectionKind::HandoffContract,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SectionKind::Why => "why",
            SectionKind::When => "when",
            SectionKind::TriggerChecklist => "trigger_checklist",
            SectionKind::Cadence => "cadence",
            SectionKind::Examples => "examples",
            SectionKind::AntiPatterns => "anti_patterns",
            SectionKind::OutputContract => "output_contract",
            SectionKind::ValidationGates => "validation_gates",
            SectionKind::HandoffContract => "handoff_contract",
        }
    }

    /// Key used in the scorecard's `sections_added` tally.
    pub fn counter_key(self) -> &'static str {
        match self {
            SectionKind::Why => "why_section_added",
            SectionKind::When => "when_section_added",
            SectionKind::TriggerChecklist => "trigger_checklist_added",
            SectionKind::Cadence => "cadence_added",
            SectionKind::Examples => "examples_added",
            SectionKind::AntiPatterns => "anti_patterns_added",
            SectionKind::OutputContract => "output_contract_added",
            SectionKind::ValidationGates => "validation_gates_added",
            SectionKind::HandoffContract => "handoff_contract_added",
        }
    }
}

/// Immutable skill document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn contains_heading(&self, heading_line: &str) -> bool {
        self.text.contains(heading_line)
    }

    /// Return a copy with `heading` and `body` appended, or `None` when the
    /// heading already appears anywhere in the text.
    pub fn with_section(&self, heading_line: &str, body: &str) -> Option<Document> {
        if self.contains_heading(heading_line) {
            return None;
        }
        let mut text = String::with_capacity(self.text.len() + heading_line.len() + body.len() + 4);
        text.push_str(&self.text);
        if !text.ends_with('\n') {
            text.push('\n');
        }
        text.push('\n');
        text.push_str(heading_line);
        text.push('\n');
        text.push_str(body.trim());
        text.push('\n');
        Some(Document { text })
    }
}

/// Result of upgrading one document.
#[derive(Debug, Clone)]
pub struct Upgrade {
    pub document: Document,
    pub added: Vec<SectionKind>,
}

impl Upgrade {
    pub fn changed(&self) -> bool {
        !self.added.is_empty()
    }
}

pub struct SectionSynthesizer {
    headings: SectionHeadings,
}

impl SectionSynthesizer {
    pub fn new(headings: SectionHeadings) -> Self {
        Self { headings }
    }

    pub fn upgrade(&self, document: &Document, ctx: &ExtractionContext) -> Upgrade {
        let mut current = document.clone();
        let mut added = Vec::new();
        for kind in SectionKind::ALL {
            let heading = self.headings.line(kind);
            if let Some(next) = current.with_section(&heading, &section_body(kind, ctx)) {
                current = next;
                added.push(kind);
            }
        }
        Upgrade {
            document: current,
            added,
        }
    }
}

/// Body template for a section, filled from the extraction context.
pub fn section_body(kind: SectionKind, ctx: &ExtractionContext) -> String {
    let capability = &ctx.capability;
    let domain = &ctx.domain;
    match kind {
        SectionKind::Why => format!(
            "This skill operationalizes **{capability}** for {domain}. \
             It exists to produce reliable, policy-compliant outputs under production constraints \
             and to reduce ambiguity in downstream execution."
        ),
        SectionKind::When => format!(
            "Use this when a request in **{domain}** depends on **{capability}** outcomes with explicit acceptance criteria. \
             Do not use for unconstrained ideation; route discovery work before invoking this execution skill."
        ),
        SectionKind::TriggerChecklist => format!(
            "- [ ] The request explicitly needs **{capability}** outcomes (not generic brainstorming).\n\
             - [ ] Inputs are sufficient to execute in **{domain}** with measurable acceptance criteria.\n\
             - [ ] A downstream consumer is identified for the output artifacts (operator/orchestrator/audit log).\n\
             - [ ] If any item is false, route to discovery/scoping first instead of invoking this skill."
        ),
        SectionKind::Cadence => format!(
            "- **Daily:** Run when new {} signals arrive or when active decisions depend on this capability.\n\
             - **Weekly:** Review thresholds, drift, and failure telemetry; calibrate decision rules and retry policy.\n\
             - **Monthly:** Re-baseline deterministic expectations, archive evidence, and refresh approval/handoff assumptions.",
            domain.to_lowercase()
        ),
        SectionKind::Examples => format!(
            "1. **Incident stabilization in {domain}**\n   \
             - Input: noisy upstream payload requiring {} normalization/assessment.\n   \
             - Expected output: schema-valid artifact bundle + scorecard + explicit next-hop routing hint.\n   \
             - Handoff: orchestrator receives deterministic result package for gated downstream execution.\n\
             2. **Planned delivery quality check**\n   \
             - Input: scheduled batch with known baseline and acceptance metrics.\n   \
             - Expected output: pass/fail gate results, variance notes, and publish/no-publish recommendation.\n   \
             - Handoff: operator receives execution summary with risk/confidence and approval requirements.",
            capability.to_lowercase()
        ),
        SectionKind::AntiPatterns => "- Do **not** use for open-ended ideation where success metrics and contracts are undefined.\n\
             - Do **not** bypass schema/policy gates to force output publication under time pressure.\n\
             - Do **not** treat non-deterministic or partial outputs as release-ready artifacts.\n\
             - Do **not** invoke this skill when a different capability family is the true bottleneck."
            .to_string(),
        SectionKind::OutputContract => "- `primary_artifact_bundle` (structured-report, consumer=orchestrator, guaranteed=true)\n\
             - `execution_scorecard` (scorecard, consumer=operator, guaranteed=true)\n\
             - `handoff_packet` (machine-readable, consumer=downstream-skill, guaranteed=true)"
            .to_string(),
        SectionKind::ValidationGates => "1. **schema-contract-check** \u{2014} Required inputs are present and schema-valid (on fail: block).\n\
             2. **determinism-check** \u{2014} Stable output under repeated runs on identical input (on fail: escalate).\n\
             3. **policy-approval-check** \u{2014} Required approvals and policy constraints satisfied (on fail: block publish)."
            .to_string(),
        SectionKind::HandoffContract => format!(
            "- Produces: `{capability}` execution artifacts + scorecard + risk/confidence metadata.\n\
             - Consumes: validated upstream payloads that satisfy schema and policy checks.\n\
             - Downstream routing hint: route only to declared consumers with gate/approval context attached."
        ),
    }
}

#[cfg(test)]
#[path = "synth_tests.rs"]
mod tests;
