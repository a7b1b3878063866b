//! Structural failures that abort a run before any document is touched.
use std::path::PathBuf;
use thiserror::Error;

/// Exit code used when a run stops on a [`PreconditionError`].
pub const PRECONDITION_EXIT_CODE: u8 = 2;

#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("expected {expected} SKILL.md files under {root}, found {found}")]
    CorpusSize {
        root: String,
        expected: usize,
        found: usize,
    },

    #[error("missing benchmark source: {}", .0.display())]
    MissingFeed(PathBuf),

    #[error("unexpected top-downloads payload format: {0}")]
    FeedShape(String),

    #[error("skill directory {0:?} is not named <integer-id>-<slug>")]
    MalformedLocation(String),
}
