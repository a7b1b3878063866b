//! End-to-end audit runs over a skill corpus.
//!
//! A run discovers the corpus, checks preconditions, scores it, appends the
//! missing sections, scores it again and plans duplicate cleanup. Every
//! precondition is checked before the first document is rewritten.
use crate::cluster::{ClusterEngine, ClusterInput, RedundancyPlan};
use crate::config::AuditConfig;
use crate::corpus::{write_atomic, Corpus, CorpusDocument};
use crate::extract::ContextExtractor;
use crate::feed::load_top_downloads;
use crate::report::{self, ReportInputs};
use crate::rubric::Rubric;
use crate::scorecard::{aggregate, AggregateScorecard, EditSummary, Scorecard, ScorecardScope};
use crate::synth::{Document, SectionSynthesizer, Upgrade};
use crate::util::{display_path, now_epoch_ms};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct AuditOptions {
    /// Compute everything in memory and leave the tree untouched.
    pub dry_run: bool,
}

/// Machine-readable summary printed after an audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditSummary {
    pub skills_scanned: usize,
    pub files_modified: usize,
    pub baseline_composite: f64,
    pub post_composite: f64,
    pub duplicate_clusters: usize,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct AuditRun {
    pub scorecard: Scorecard,
    pub plan: RedundancyPlan,
    pub report: String,
    pub summary: AuditSummary,
}

pub struct Auditor {
    config: AuditConfig,
    extractor: ContextExtractor,
    synthesizer: SectionSynthesizer,
    rubric: Rubric,
    clusters: ClusterEngine,
}

impl Auditor {
    pub fn new(config: AuditConfig) -> Result<Self> {
        Ok(Self {
            extractor: ContextExtractor::new()?,
            synthesizer: SectionSynthesizer::new(config.headings.clone()),
            rubric: Rubric::new(&config)?,
            clusters: ClusterEngine::new(config.profile_labels.clone())?,
            config,
        })
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn shards_root(&self, root: &Path) -> PathBuf {
        root.join(&self.config.paths.shards_root)
    }

    /// Discover and read the corpus, enforcing the expected size.
    pub fn load_corpus(&self, root: &Path) -> Result<Corpus> {
        Corpus::load(
            root,
            &self.shards_root(root),
            self.config.expected_documents,
        )
    }

    pub fn score<'a, I>(&self, texts: I) -> AggregateScorecard
    where
        I: IntoIterator<Item = &'a str>,
    {
        let vectors: Vec<_> = texts
            .into_iter()
            .map(|text| self.rubric.evaluate(text))
            .collect();
        aggregate(&vectors)
    }

    /// Extract hints from `text` and append whatever sections it lacks.
    pub fn upgrade(&self, text: &str) -> Upgrade {
        let ctx = self.extractor.extract(text);
        self.synthesizer.upgrade(&Document::new(text), &ctx)
    }

    pub fn redundancy_plan(
        &self,
        root: &Path,
        documents: &[CorpusDocument],
        generated_at_epoch_ms: u128,
    ) -> RedundancyPlan {
        let inputs = documents.iter().map(|doc| ClusterInput {
            location: &doc.location,
            text: doc.text.as_str(),
        });
        let scan_root = display_path(&self.shards_root(root), Some(root));
        self.clusters.plan(inputs, &scan_root, generated_at_epoch_ms)
    }

    pub fn run(&self, root: &Path, options: AuditOptions) -> Result<AuditRun> {
        let corpus = self.load_corpus(root)?;
        let feed_path = root.join(&self.config.paths.top_downloads_feed);
        let top_skills = load_top_downloads(&feed_path)?;
        if corpus.is_empty() {
            tracing::warn!(root = %root.display(), "no skills discovered");
        }

        let baseline = self.score(corpus.texts());

        let mut edits = EditSummary::default();
        let mut upgraded = Vec::with_capacity(corpus.len());
        for doc in &corpus.documents {
            let upgrade = self.upgrade(&doc.text);
            edits.record(&upgrade);
            if upgrade.changed() {
                tracing::debug!(
                    skill = %doc.location.dir,
                    sections = upgrade.added.len(),
                    "sections appended"
                );
                if !options.dry_run {
                    write_atomic(&doc.location.file, upgrade.document.text())?;
                }
            }
            upgraded.push(CorpusDocument {
                location: doc.location.clone(),
                text: upgrade.document.into_text(),
            });
        }

        let documents = if options.dry_run {
            upgraded
        } else {
            corpus.reload()?.documents
        };
        let post_edit = self.score(documents.iter().map(|doc| doc.text.as_str()));

        let generated_at_epoch_ms = now_epoch_ms()?;
        let plan = self.redundancy_plan(root, &documents, generated_at_epoch_ms);
        let scan_path = plan.scan_root.clone();
        let scorecard = Scorecard::new(
            generated_at_epoch_ms,
            ScorecardScope {
                root: root.display().to_string(),
                scan_path: scan_path.clone(),
                files: documents.len(),
            },
            baseline,
            post_edit,
            edits,
        );
        let report = report::render(&ReportInputs {
            generated_at_epoch_ms,
            scan_path: &scan_path,
            top_skills: &top_skills,
            scorecard: &scorecard,
            plan: &plan,
            settings: &self.config.report,
        });

        let summary = AuditSummary {
            skills_scanned: documents.len(),
            files_modified: scorecard.edits.files_modified,
            baseline_composite: round6(scorecard.baseline.composite),
            post_composite: round6(scorecard.post_edit.composite),
            duplicate_clusters: plan.summary.total_duplicate_slug_clusters,
            dry_run: options.dry_run,
        };
        tracing::info!(
            skills = summary.skills_scanned,
            modified = summary.files_modified,
            baseline = summary.baseline_composite,
            post = summary.post_composite,
            "audit scored"
        );

        let run = AuditRun {
            scorecard,
            plan,
            report,
            summary,
        };
        if !options.dry_run {
            self.write_artifacts(root, &run)?;
        }
        Ok(run)
    }

    /// Persist the scorecard, redundancy plan and Markdown report.
    pub fn write_artifacts(&self, root: &Path, run: &AuditRun) -> Result<()> {
        let paths = &self.config.paths;
        write_json(&root.join(&paths.scorecard), &run.scorecard)?;
        write_json(&root.join(&paths.redundancy_plan), &run.plan)?;
        write_text(&root.join(&paths.rubric_report), &run.report)?;
        Ok(())
    }
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value)
        .with_context(|| format!("serialize {}", path.display()))?;
    text.push('\n');
    write_text(path, &text)
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Round to six decimal places from the exact binary value, the way a
/// decimal formatter does, so near-halfway composites are not pushed up.
fn round6(value: f64) -> f64 {
    format!("{value:.6}").parse().unwrap_or(value)
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
