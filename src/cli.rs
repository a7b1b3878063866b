//! CLI argument parsing for skill audits.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "skillaudit",
    version,
    about = "Benchmark, upgrade and deduplicate generated SKILL.md documents",
    after_help = "Commands:\n  audit --root <dir>    Score, upgrade, rescore and plan duplicate cleanup\n  score --root <dir>    Print the current rubric scorecard (read-only)\n  dedupe --root <dir>   Print the redundancy plan (read-only)\n  config                Print the default configuration\n\nExamples:\n  skillaudit audit --root . --dry-run\n  skillaudit score --root . --expect 3\n  skillaudit dedupe --root . --out /tmp/plan.json\n\nExit codes:\n  1  I/O or configuration failure\n  2  corpus or feed precondition failed (nothing was rewritten)",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Audit(AuditArgs),
    Score(ScoreArgs),
    Dedupe(DedupeArgs),
    /// Print the default audit configuration
    Config,
}

/// Inputs shared by every command that reads the corpus.
#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    /// Repository root the configured paths are relative to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Audit config JSON (defaults apply when omitted)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Required number of SKILL.md files; overrides the config value
    #[arg(long, value_name = "N")]
    pub expect: Option<usize>,
}

#[derive(Parser, Debug)]
#[command(about = "Score, upgrade and rescore the corpus, then plan duplicate cleanup")]
pub struct AuditArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Compute everything in memory and write nothing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Print the rubric scorecard for the current corpus")]
pub struct ScoreArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,
}

#[derive(Parser, Debug)]
#[command(about = "Print the duplicate-slug redundancy plan")]
pub struct DedupeArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Write the plan here instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}
