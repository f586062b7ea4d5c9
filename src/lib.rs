//! Converts VectorBase PopBio search exports into SCAN Darwin Core
//! occurrence files.
//!
//! The pipeline normalizes each raw record against a template of expected
//! fields, filters out records that must not be published, optionally
//! samples, and runs the field extractors. Data anomalies are collected
//! rather than raised; the staged output is committed only when none were
//! found.

pub mod apis;
pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod idempotency;
pub mod infra;
pub mod logging;
pub mod observability;
pub mod parser;
pub mod pipeline;
pub mod survey;
pub mod types;
pub mod vocabulary;

pub use config::Settings;
pub use error::{Result, ScanError};
pub use pipeline::{Pipeline, RunOutcome, RunReport};
pub use types::{DwcTerm, NormalizedRecord, RawRecord};
pub use vocabulary::Vocabulary;
