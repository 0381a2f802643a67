// src/core/history.rs

//! Rolling scan history and JSON report export.

use crate::core::error::{Error, Result};
use crate::core::models::{CompletedScan, ScanRecord};
use chrono::Local;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::info;

pub const REPORT_FILE: &str = "security_report.json";

/// Bounded, oldest-first record of scan runs.
#[derive(Debug, Clone)]
pub struct ScanHistory {
    entries: VecDeque<ScanRecord>,
    capacity: usize,
}

impl ScanHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn record(&mut self, entry: ScanRecord) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// The newest `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<ScanRecord> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    /// Runs per `HH:MM:SS` over the newest `n` entries, in first-seen order.
    pub fn activity(&self, n: usize) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for entry in self.recent(n) {
            let label = entry.timestamp.format("%H:%M:%S").to_string();
            match counts.iter_mut().find(|(l, _)| *l == label) {
                Some((_, count)) => *count += 1,
                None => counts.push((label, 1)),
            }
        }
        counts
    }
}

/// Builds the export document for a list of completed scans.
pub fn render_report(scans: &[CompletedScan]) -> serde_json::Value {
    serde_json::json!({
        "generated_at": Local::now().to_rfc3339(),
        "scans": scans.iter().map(CompletedScan::report).collect::<Vec<_>>(),
    })
}

/// Writes the export document to `dir/security_report.json`.
pub fn write_report(scans: &[CompletedScan], dir: &Path) -> Result<PathBuf> {
    let path = dir.join(REPORT_FILE);
    let body = serde_json::to_string_pretty(&render_report(scans))?;
    std::fs::create_dir_all(dir).map_err(|source| Error::ReportWrite { path: path.clone(), source })?;
    std::fs::write(&path, body).map_err(|source| Error::ReportWrite { path: path.clone(), source })?;
    info!(path = %path.display(), scans = scans.len(), "Report written.");
    Ok(path)
}
