// src/core/mod.rs

// The scanning engine. Everything here is independent of the terminal UI.

/// Shared data structures: host records, alerts, scan results.
pub mod models;

/// Engine error type.
pub mod error;

/// Settings file and defaults.
pub mod config;

/// URL and domain normalization.
pub mod target;

/// Wordlist loading for the enumerators.
pub mod wordlist;

/// Bounded network operations (DNS, HTTP, WHOIS, connection table) and the
/// classification of their outcomes.
pub mod probe;

/// The four scanners and their shared contract.
pub mod scanner;

/// Known-hosts store behind new-device alerts.
pub mod novelty;

/// Device statistics and risk score.
pub mod risk;

/// Rolling scan history and report export.
pub mod history;

/// Command phrase parsing.
pub mod dispatch;

/// Orchestration of scanner runs.
pub mod service;
