//! Audit, upgrade and deduplicate generated skill documents.
pub mod audit;
pub mod cli;
pub mod cluster;
pub mod config;
pub mod corpus;
pub mod error;
pub mod extract;
pub mod feed;
pub mod fingerprint;
pub mod report;
pub mod rubric;
pub mod scorecard;
pub mod synth;
pub mod util;
