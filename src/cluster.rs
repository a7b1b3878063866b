//! Duplicate-slug clustering.
//!
//! Skills sharing a slug are grouped, ranked by id and fingerprinted. A group
//! whose members all normalize to the same text is an exact duplicate; any
//! other group is divergent and keeps its members until profiles are
//! differentiated.
use crate::corpus::SkillLocation;
use crate::fingerprint::Fingerprinter;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const RECOMMENDED_NEXT_STEP: &str = "Archive exact duplicates before mass removal; apply profile-differentiation review for divergent clusters.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    MergeRemoveCandidate,
    DifferentiateProfilesOrMergeLater,
}

impl Disposition {
    pub fn from_unique_hashes(unique: usize) -> Self {
        if unique == 1 {
            Disposition::MergeRemoveCandidate
        } else {
            Disposition::DifferentiateProfilesOrMergeLater
        }
    }

    pub fn rationale(self) -> &'static str {
        match self {
            Disposition::MergeRemoveCandidate => "All members are text-identical after normalization; safe candidate for archive+merge/remove workflow.",
            Disposition::DifferentiateProfilesOrMergeLater => "Members share slug but differ in content; keep temporarily and enforce explicit profile labels before merge decision.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterMember {
    pub id: u64,
    pub path: String,
    pub profile_label: String,
    pub content_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FingerprintCluster {
    pub slug: String,
    pub size: usize,
    pub unique_content_hashes: usize,
    pub disposition: Disposition,
    pub canonical_candidate: String,
    pub rationale: String,
    pub members: Vec<ClusterMember>,
}

impl FingerprintCluster {
    pub fn is_exact(&self) -> bool {
        self.disposition == Disposition::MergeRemoveCandidate
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub total_duplicate_slug_clusters: usize,
    pub exact_duplicate_clusters: usize,
    pub content_divergent_clusters: usize,
    pub recommended_next_step: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RedundancyPlan {
    pub generated_at_epoch_ms: u128,
    pub scan_root: String,
    pub summary: PlanSummary,
    pub clusters: Vec<FingerprintCluster>,
}

/// A skill handed to the engine: where it lives and its final text.
#[derive(Debug, Clone, Copy)]
pub struct ClusterInput<'a> {
    pub location: &'a SkillLocation,
    pub text: &'a str,
}

pub struct ClusterEngine {
    fingerprinter: Fingerprinter,
    profile_labels: Vec<String>,
}

impl ClusterEngine {
    pub fn new(profile_labels: Vec<String>) -> Result<Self> {
        if profile_labels.is_empty() {
            return Err(anyhow!("cluster engine needs at least one profile label"));
        }
        Ok(Self {
            fingerprinter: Fingerprinter::new()?,
            profile_labels,
        })
    }

    pub fn profile_label(&self, rank: usize) -> &str {
        &self.profile_labels[rank % self.profile_labels.len()]
    }

    /// Group by slug and classify every group with two or more members.
    pub fn clusters<'a, I>(&self, inputs: I) -> Vec<FingerprintCluster>
    where
        I: IntoIterator<Item = ClusterInput<'a>>,
    {
        let mut groups: BTreeMap<&'a str, Vec<ClusterInput<'a>>> = BTreeMap::new();
        for input in inputs {
            groups
                .entry(input.location.slug.as_str())
                .or_default()
                .push(input);
        }

        groups
            .into_iter()
            .filter(|(_, members)| members.len() >= 2)
            .map(|(slug, members)| self.classify(slug, members))
            .collect()
    }

    fn classify(&self, slug: &str, mut members: Vec<ClusterInput<'_>>) -> FingerprintCluster {
        members.sort_by_key(|member| member.location.id);
        let rows: Vec<ClusterMember> = members
            .iter()
            .enumerate()
            .map(|(rank, member)| ClusterMember {
                id: member.location.id,
                path: member.location.dir.clone(),
                profile_label: self.profile_label(rank).to_string(),
                content_hash: self.fingerprinter.fingerprint(member.text),
            })
            .collect();

        let unique: BTreeSet<&str> = rows.iter().map(|row| row.content_hash.as_str()).collect();
        let disposition = Disposition::from_unique_hashes(unique.len());
        let canonical_candidate = rows
            .first()
            .map(|row| row.path.clone())
            .unwrap_or_default();
        FingerprintCluster {
            slug: slug.to_string(),
            size: rows.len(),
            unique_content_hashes: unique.len(),
            disposition,
            canonical_candidate,
            rationale: disposition.rationale().to_string(),
            members: rows,
        }
    }

    pub fn plan<'a, I>(&self, inputs: I, scan_root: &str, generated_at_epoch_ms: u128) -> RedundancyPlan
    where
        I: IntoIterator<Item = ClusterInput<'a>>,
    {
        let clusters = self.clusters(inputs);
        let exact = clusters.iter().filter(|cluster| cluster.is_exact()).count();
        let summary = PlanSummary {
            total_duplicate_slug_clusters: clusters.len(),
            exact_duplicate_clusters: exact,
            content_divergent_clusters: clusters.len() - exact,
            recommended_next_step: RECOMMENDED_NEXT_STEP.to_string(),
        };
        tracing::info!(
            clusters = summary.total_duplicate_slug_clusters,
            exact = summary.exact_duplicate_clusters,
            divergent = summary.content_divergent_clusters,
            "redundancy plan built"
        );
        RedundancyPlan {
            generated_at_epoch_ms,
            scan_root: scan_root.to_string(),
            summary,
            clusters,
        }
    }
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;
