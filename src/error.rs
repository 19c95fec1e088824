//! Error taxonomy for the aggregation engine.
//!
//! Fatal structural faults (`RefLoadError`, `AlignError`) get their own
//! types so callers can match on them; `RecordParseError` is recovered
//! locally by the decoder and never needs to escape a worker.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefLoadError {
    #[error("could not open reference file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed reference json in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("suburb {suburb:?} has unknown state code {digit:?}")]
    UnknownState { suburb: String, digit: String },
}

#[derive(Debug, Error)]
pub enum AlignError {
    #[error(
        "worker {worker}: could not find a record boundary at or after byte {offset} in {path}"
    )]
    BoundaryNotFound {
        worker: usize,
        offset: u64,
        path: PathBuf,
    },
    #[error("could not locate the terminal record boundary near end-of-file in {path}")]
    TailNotFound { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    RefLoad(#[from] RefLoadError),
    #[error(transparent)]
    Align(#[from] AlignError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
