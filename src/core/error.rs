// src/core/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias used across the scanning engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that escape a scanner and reach the caller.
///
/// Per-item probe failures never show up here: they are folded into the
/// scanner loop as `ProbeOutcome::Miss` or `ProbeOutcome::Error`. Only the
/// environmental failures listed below abort a run.
#[derive(Error, Debug)]
pub enum Error {
    // ===== Scanner Errors =====
    #[error("Failed to enumerate network connections: {0}")]
    ConnectionTable(String),

    #[error("DNS resolution failed for {name}: {cause}")]
    Resolver { name: String, cause: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Scan task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Dispatch(#[from] crate::core::dispatch::DispatchError),

    // ===== Configuration Errors =====
    #[error("Failed to load configuration: {0}")]
    ConfigLoad(String),

    #[error("Invalid configuration value: {field} - {message}")]
    ConfigInvalid { field: String, message: String },

    // ===== Report Errors =====
    #[error("Failed to write report: {path}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
