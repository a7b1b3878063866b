//! Corpus-wide aggregation of compliance vectors.
use crate::rubric::{ComplianceVector, Criterion};
use crate::synth::Upgrade;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-criterion pass counts and coverage for one evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateScorecard {
    pub count: usize,
    pub passed: BTreeMap<Criterion, usize>,
    pub coverage: BTreeMap<Criterion, f64>,
    pub composite: f64,
}

impl AggregateScorecard {
    pub fn coverage_of(&self, criterion: Criterion) -> f64 {
        self.coverage.get(&criterion).copied().unwrap_or(0.0)
    }
}

/// Reduce per-document vectors into a scorecard. Empty input scores zero.
pub fn aggregate<'a, I>(vectors: I) -> AggregateScorecard
where
    I: IntoIterator<Item = &'a ComplianceVector>,
{
    let mut passed: BTreeMap<Criterion, usize> =
        Criterion::ALL.iter().map(|criterion| (*criterion, 0)).collect();
    let mut count = 0usize;
    for vector in vectors {
        count += 1;
        for (criterion, ok) in vector.iter() {
            if ok {
                *passed.entry(criterion).or_insert(0) += 1;
            }
        }
    }

    let coverage = passed
        .iter()
        .map(|(criterion, n)| (*criterion, ratio(*n, count)))
        .collect();
    let total_passed: usize = passed.values().sum();
    let composite = ratio(total_passed, count * Criterion::ALL.len());

    AggregateScorecard {
        count,
        passed,
        coverage,
        composite,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

/// Post-edit minus baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorecardDelta {
    pub composite: f64,
    pub coverage: BTreeMap<Criterion, f64>,
}

impl ScorecardDelta {
    pub fn between(baseline: &AggregateScorecard, post_edit: &AggregateScorecard) -> Self {
        Self {
            composite: post_edit.composite - baseline.composite,
            coverage: Criterion::ALL
                .iter()
                .map(|criterion| {
                    (
                        *criterion,
                        post_edit.coverage_of(*criterion) - baseline.coverage_of(*criterion),
                    )
                })
                .collect(),
        }
    }
}

/// Tally of rewritten files and synthesized sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditSummary {
    pub files_modified: usize,
    pub sections_added: BTreeMap<String, usize>,
}

impl EditSummary {
    pub fn record(&mut self, upgrade: &Upgrade) {
        if !upgrade.changed() {
            return;
        }
        self.files_modified += 1;
        for kind in &upgrade.added {
            *self
                .sections_added
                .entry(kind.counter_key().to_string())
                .or_insert(0) += 1;
        }
    }

    pub fn added(&self, counter_key: &str) -> usize {
        self.sections_added.get(counter_key).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScorecardScope {
    pub root: String,
    pub scan_path: String,
    pub files: usize,
}

/// The persisted before/after scorecard artifact.
#[derive(Debug, Clone, Serialize)]
pub struct Scorecard {
    pub generated_at_epoch_ms: u128,
    pub scope: ScorecardScope,
    pub rubric: BTreeMap<Criterion, String>,
    pub baseline: AggregateScorecard,
    pub post_edit: AggregateScorecard,
    pub delta: ScorecardDelta,
    pub edits: EditSummary,
}

impl Scorecard {
    pub fn new(
        generated_at_epoch_ms: u128,
        scope: ScorecardScope,
        baseline: AggregateScorecard,
        post_edit: AggregateScorecard,
        edits: EditSummary,
    ) -> Self {
        let delta = ScorecardDelta::between(&baseline, &post_edit);
        Self {
            generated_at_epoch_ms,
            scope,
            rubric: Criterion::definitions()
                .into_iter()
                .map(|(criterion, text)| (criterion, text.to_string()))
                .collect(),
            baseline,
            post_edit,
            delta,
            edits,
        }
    }
}
