//! Shared test infrastructure for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const SHARDS: &str = "skills/generated/shards";
pub const FEED: &str = "reports/clawhub-top-downloads.json";
pub const SCORECARD: &str = "skills/state/skills-utility-scorecard.json";
pub const PLAN: &str = "skills/state/skills-redundancy-resolution-plan.json";
pub const REPORT: &str = "reports/clawhub-benchmark-rubric.md";

/// A temporary repository root holding a generated skill corpus.
pub struct CorpusFixture {
    pub dir: TempDir,
}

impl Default for CorpusFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusFixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// The standard three-skill corpus: one exact duplicate pair plus a
    /// bare document, and a two-record feed.
    pub fn standard() -> Self {
        let fixture = Self::new();
        fixture.write_skill(
            "shard-00",
            "0001-triage",
            "---\nname: u0001-triage\ndescription: Runs \"Log Triage\" for SRE teams. Use daily.\n---\n# Triage\n",
        );
        fixture.write_skill(
            "shard-00",
            "0002-triage",
            "---\nname: u0002-triage\ndescription: Runs \"Log Triage\" for SRE teams. Use daily.\n---\n# Triage\n",
        );
        fixture.write_skill("shard-01", "0003-report", "# Report\n");
        fixture.write_feed(
            r#"{"items": [
                {"slug": "small", "stats": {"downloads": 2}, "summary": "Small"},
                {"slug": "gog", "displayName": "Gog", "stats": {"downloads": 90}, "summary": "Google\nWorkspace"}
            ]}"#,
        );
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn skill_path(&self, shard: &str, dir: &str) -> PathBuf {
        self.root().join(SHARDS).join(shard).join(dir).join("SKILL.md")
    }

    pub fn write_skill(&self, shard: &str, dir: &str, text: &str) -> PathBuf {
        let path = self.skill_path(shard, dir);
        fs::create_dir_all(path.parent().expect("skill dir")).expect("create skill dir");
        fs::write(&path, text).expect("write skill");
        path
    }

    pub fn write_feed(&self, json: &str) {
        let path = self.root().join(FEED);
        fs::create_dir_all(path.parent().expect("feed dir")).expect("create feed dir");
        fs::write(path, json).expect("write feed");
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.root().join(rel)).expect("read fixture file")
    }

    /// Run `skillaudit <command> --root <fixture> <extra...>`.
    pub fn run(&self, command: &str, extra: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_skillaudit"));
        cmd.arg(command).arg("--root").arg(self.root()).args(extra);
        cmd.env_remove("RUST_LOG");
        cmd.output().expect("run skillaudit")
    }
}

pub fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "skillaudit failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("parse stdout JSON")
}
