use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use skill_audit::audit::{write_json, AuditOptions, Auditor};
use skill_audit::cli::{AuditArgs, Command, CorpusArgs, DedupeArgs, RootArgs, ScoreArgs};
use skill_audit::config::{config_stub, resolve_config};
use skill_audit::error::{PreconditionError, PRECONDITION_EXIT_CODE};
use skill_audit::util::now_epoch_ms;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();
    let args = RootArgs::parse();

    let result = match args.command {
        Command::Audit(args) => run_audit(args),
        Command::Score(args) => run_score(args),
        Command::Dedupe(args) => run_dedupe(args),
        Command::Config => run_config(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            if err.downcast_ref::<PreconditionError>().is_some() {
                ExitCode::from(PRECONDITION_EXIT_CODE)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn auditor_for(args: &CorpusArgs) -> Result<Auditor> {
    let mut config = resolve_config(args.config.as_deref())?;
    if let Some(expect) = args.expect {
        config.expected_documents = Some(expect);
    }
    Auditor::new(config)
}

fn run_audit(args: AuditArgs) -> Result<()> {
    let auditor = auditor_for(&args.corpus)?;
    let run = auditor.run(
        &args.corpus.root,
        AuditOptions {
            dry_run: args.dry_run,
        },
    )?;
    print_json(&run.summary)
}

fn run_score(args: ScoreArgs) -> Result<()> {
    let auditor = auditor_for(&args.corpus)?;
    let corpus = auditor.load_corpus(&args.corpus.root)?;
    print_json(&auditor.score(corpus.texts()))
}

fn run_dedupe(args: DedupeArgs) -> Result<()> {
    let auditor = auditor_for(&args.corpus)?;
    let root = &args.corpus.root;
    let corpus = auditor.load_corpus(root)?;
    let plan = auditor.redundancy_plan(root, &corpus.documents, now_epoch_ms()?);
    match args.out {
        Some(path) => write_json(&path, &plan),
        None => print_json(&plan),
    }
}

fn run_config() -> Result<()> {
    println!("{}", config_stub()?);
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
