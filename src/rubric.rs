//! Seven-criterion rubric evaluation.
use crate::config::{AuditConfig, RubricMarkers, SectionHeadings};
use crate::synth::SectionKind;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Clarity,
    TriggerPrecision,
    OperationalCadence,
    PracticalExamples,
    AntiPatterns,
    DeterministicOutputs,
    ValidationAndHandoff,
}

impl Criterion {
    pub const ALL: [Criterion; 7] = [
        Criterion::Clarity,
        Criterion::TriggerPrecision,
        Criterion::OperationalCadence,
        Criterion::PracticalExamples,
        Criterion::AntiPatterns,
        Criterion::DeterministicOutputs,
        Criterion::ValidationAndHandoff,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Criterion::Clarity => "clarity",
            Criterion::TriggerPrecision => "trigger_precision",
            Criterion::OperationalCadence => "operational_cadence",
            Criterion::PracticalExamples => "practical_examples",
            Criterion::AntiPatterns => "anti_patterns",
            Criterion::DeterministicOutputs => "deterministic_outputs",
            Criterion::ValidationAndHandoff => "validation_and_handoff",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Criterion::Clarity => "Has clear purpose context (`Why This Skill Exists`) and a concrete use scope (`When To Use`).",
            Criterion::TriggerPrecision => "Has practical, operator-friendly trigger checklist to decide invocation quickly.",
            Criterion::OperationalCadence => "Includes day/week/month operating cadence guidance.",
            Criterion::PracticalExamples => "Includes concrete examples with input, expected output, and handoff intent.",
            Criterion::AntiPatterns => "Includes explicit anti-patterns / non-goals to prevent misuse.",
            Criterion::DeterministicOutputs => "Defines output contract and deterministic constraints.",
            Criterion::ValidationAndHandoff => "Defines validation gates and handoff contract for downstream routing.",
        }
    }

    /// Criterion key to definition, in rubric order.
    pub fn definitions() -> BTreeMap<Criterion, &'static str> {
        Criterion::ALL
            .iter()
            .map(|criterion| (*criterion, criterion.description()))
            .collect()
    }
}

/// Pass/fail for every criterion of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComplianceVector(BTreeMap<Criterion, bool>);

impl ComplianceVector {
    fn from_fn(mut check: impl FnMut(Criterion) -> bool) -> Self {
        Self(
            Criterion::ALL
                .iter()
                .map(|criterion| (*criterion, check(*criterion)))
                .collect(),
        )
    }

    pub fn passed(&self, criterion: Criterion) -> bool {
        self.0.get(&criterion).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, bool)> + '_ {
        self.0.iter().map(|(criterion, ok)| (*criterion, *ok))
    }

    pub fn passed_count(&self) -> usize {
        self.0.values().filter(|ok| **ok).count()
    }
}

pub struct Rubric {
    headings: SectionHeadings,
    markers: RubricMarkers,
    section_lines: BTreeMap<SectionKind, Regex>,
    next_section: Regex,
    word: Regex,
    trigger_word: Regex,
    determinism: Regex,
}

impl Rubric {
    pub fn new(config: &AuditConfig) -> Result<Self> {
        let mut section_lines = BTreeMap::new();
        for kind in SectionKind::ALL {
            let title = regex::escape(config.headings.title(kind));
            let regex = Regex::new(&format!(r"(?m)^##\s+{title}\s*$"))
                .with_context(|| format!("compile heading rule for {}", kind.key()))?;
            section_lines.insert(kind, regex);
        }
        let trigger = regex::escape(&config.markers.trigger_word);
        let determinism = regex::escape(&config.markers.determinism);
        Ok(Self {
            headings: config.headings.clone(),
            markers: config.markers.clone(),
            section_lines,
            next_section: Regex::new(r"(?m)^##\s+").context("compile section rule")?,
            word: Regex::new(r"\w+").context("compile word rule")?,
            trigger_word: Regex::new(&format!(r"(?i)\b{trigger}\b"))
                .context("compile trigger rule")?,
            determinism: Regex::new(&format!("(?i){determinism}"))
                .context("compile determinism rule")?,
        })
    }

    pub fn evaluate(&self, text: &str) -> ComplianceVector {
        ComplianceVector::from_fn(|criterion| self.check(criterion, text))
    }

    pub fn check(&self, criterion: Criterion, text: &str) -> bool {
        let has = |kind: SectionKind| text.contains(&self.headings.line(kind));
        let markers = &self.markers;
        match criterion {
            Criterion::Clarity => {
                has(SectionKind::Why)
                    && has(SectionKind::When)
                    && self.section_word_count(text, SectionKind::Why) >= markers.min_why_words
            }
            Criterion::TriggerPrecision => {
                has(SectionKind::When)
                    && (has(SectionKind::TriggerChecklist) || self.trigger_word.is_match(text))
            }
            Criterion::OperationalCadence => {
                has(SectionKind::Cadence)
                    && markers
                        .cadence_keywords
                        .iter()
                        .all(|keyword| text.contains(keyword.as_str()))
            }
            Criterion::PracticalExamples => {
                has(SectionKind::Examples) && text.contains(markers.expected_output.as_str())
            }
            Criterion::AntiPatterns => {
                has(SectionKind::AntiPatterns) && text.contains(markers.anti_pattern.as_str())
            }
            Criterion::DeterministicOutputs => {
                has(SectionKind::OutputContract) && self.determinism.is_match(text)
            }
            Criterion::ValidationAndHandoff => {
                has(SectionKind::ValidationGates) && has(SectionKind::HandoffContract)
            }
        }
    }

    /// Count `\w+` tokens between a section's heading line and the next
    /// level-2 heading. Zero when the heading line is absent.
    pub fn section_word_count(&self, text: &str, kind: SectionKind) -> usize {
        let Some(heading) = self
            .section_lines
            .get(&kind)
            .and_then(|regex| regex.find(text))
        else {
            return 0;
        };
        let rest = &text[heading.end()..];
        let body = match self.next_section.find(rest) {
            Some(next) => &rest[..next.start()],
            None => rest,
        };
        self.word.find_iter(body).count()
    }
}

#[cfg(test)]
#[path = "rubric_tests.rs"]
mod tests;
