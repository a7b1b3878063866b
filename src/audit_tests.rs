use super::*;
use crate::config::default_config;
use crate::error::PreconditionError;
use crate::rubric::Criterion;
use tempfile::TempDir;

const SHARDS: &str = "skills/generated/shards";
const FEED: &str = r#"{"items": [{"slug": "gog", "displayName": "Gog", "stats": {"downloads": 3}}]}"#;

fn write_skill(root: &Path, shard: &str, dir: &str, text: &str) -> PathBuf {
    let skill_dir = root.join(SHARDS).join(shard).join(dir);
    fs::create_dir_all(&skill_dir).expect("create skill dir");
    let path = skill_dir.join("SKILL.md");
    fs::write(&path, text).expect("write skill");
    path
}

fn fixture(expected: usize) -> (TempDir, Auditor) {
    let temp = tempfile::tempdir().expect("create temp dir");
    let root = temp.path();
    write_skill(
        root,
        "shard-00",
        "0001-triage",
        "---\nname: u0001-triage\ndescription: Runs \"Log Triage\" for SRE teams. Use daily.\n---\n# Triage\n",
    );
    write_skill(
        root,
        "shard-00",
        "0002-triage",
        "---\nname: u0002-triage\ndescription: Runs \"Log Triage\" for SRE teams. Use daily.\n---\n# Triage\n",
    );
    write_skill(root, "shard-01", "0003-report", "# Report\n");
    let feed = root.join(default_config().paths.top_downloads_feed);
    fs::create_dir_all(feed.parent().expect("feed parent")).expect("create reports");
    fs::write(&feed, FEED).expect("write feed");

    let mut config = default_config();
    config.expected_documents = Some(expected);
    (temp, Auditor::new(config).expect("build auditor"))
}

#[test]
fn run_upgrades_every_document_and_writes_artifacts() {
    let (temp, auditor) = fixture(3);
    let root = temp.path();
    let run = auditor.run(root, AuditOptions::default()).expect("audit");

    assert_eq!(run.summary.skills_scanned, 3);
    assert_eq!(run.summary.files_modified, 3);
    assert_eq!(run.summary.post_composite, 1.0);
    assert!(run.summary.baseline_composite < run.summary.post_composite);
    assert_eq!(run.summary.duplicate_clusters, 1);
    assert_eq!(run.plan.summary.exact_duplicate_clusters, 1);
    assert_eq!(run.plan.scan_root, SHARDS);
    assert_eq!(run.scorecard.edits.added("handoff_contract_added"), 3);
    for criterion in Criterion::ALL {
        assert_eq!(run.scorecard.post_edit.coverage_of(criterion), 1.0);
    }

    let paths = &auditor.config().paths;
    assert!(root.join(&paths.scorecard).is_file());
    assert!(root.join(&paths.redundancy_plan).is_file());
    let report = fs::read_to_string(root.join(&paths.rubric_report)).expect("report");
    assert_eq!(report, run.report);

    let upgraded =
        fs::read_to_string(root.join(SHARDS).join("shard-01/0003-report/SKILL.md")).expect("read");
    assert!(upgraded.starts_with("# Report\n\n## Why This Skill Exists\n"));
}

#[test]
fn second_run_modifies_nothing() {
    let (temp, auditor) = fixture(3);
    auditor.run(temp.path(), AuditOptions::default()).expect("first");
    let run = auditor.run(temp.path(), AuditOptions::default()).expect("second");
    assert_eq!(run.summary.files_modified, 0);
    assert_eq!(
        run.scorecard.baseline.composite,
        run.scorecard.post_edit.composite
    );
}

#[test]
fn dry_run_scores_in_memory_and_writes_nothing() {
    let (temp, auditor) = fixture(3);
    let root = temp.path();
    let skill = root.join(SHARDS).join("shard-01/0003-report/SKILL.md");
    let run = auditor
        .run(root, AuditOptions { dry_run: true })
        .expect("dry run");
    assert_eq!(run.summary.files_modified, 3);
    assert_eq!(run.summary.post_composite, 1.0);
    assert_eq!(fs::read_to_string(skill).expect("read"), "# Report\n");
    assert!(!root.join(&auditor.config().paths.scorecard).exists());
}

#[test]
fn size_mismatch_stops_before_rewriting() {
    let (temp, auditor) = fixture(4);
    let root = temp.path();
    let err = auditor
        .run(root, AuditOptions::default())
        .expect_err("size mismatch");
    assert!(matches!(
        err.downcast_ref::<PreconditionError>(),
        Some(PreconditionError::CorpusSize {
            expected: 4,
            found: 3,
            ..
        })
    ));
    let skill = root.join(SHARDS).join("shard-01/0003-report/SKILL.md");
    assert_eq!(fs::read_to_string(skill).expect("read"), "# Report\n");
}

#[test]
fn missing_feed_stops_before_rewriting() {
    let (temp, auditor) = fixture(3);
    let root = temp.path();
    fs::remove_file(root.join(&auditor.config().paths.top_downloads_feed)).expect("remove feed");
    let err = auditor
        .run(root, AuditOptions::default())
        .expect_err("missing feed");
    assert!(matches!(
        err.downcast_ref::<PreconditionError>(),
        Some(PreconditionError::MissingFeed(_))
    ));
    let skill = root.join(SHARDS).join("shard-01/0003-report/SKILL.md");
    assert_eq!(fs::read_to_string(skill).expect("read"), "# Report\n");
}

#[test]
fn score_of_empty_corpus_is_zero() {
    let auditor = Auditor::new(default_config()).expect("build auditor");
    let card = auditor.score(std::iter::empty());
    assert_eq!(card.count, 0);
    assert_eq!(card.composite, 0.0);
}

#[test]
fn round6_keeps_six_places() {
    assert_eq!(round6(0.1234564), 0.123456);
    assert_eq!(round6(0.1234566), 0.123457);
}

#[test]
fn round6_uses_exact_binary_value_near_halfway() {
    // Each literal is stored slightly off its decimal halfway point.
    assert_eq!(round6(5e-7), 0.0);
    assert_eq!(round6(0.1234565), 0.123456);
    assert_eq!(round6(0.4999995), 0.499999);
    assert_eq!(round6(1.0000005), 1.000001);
}
