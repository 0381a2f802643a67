// src/core/scanner/directory_scanner.rs

use super::{probe_all, CancelToken, Scanner};
use crate::core::error::Result;
use crate::core::models::{ScanResult, EMPTY_WORDLIST, NO_DIRECTORIES};
use crate::core::probe::{classify_status, HttpProbe, ProbeOutcome};
use crate::core::target::ScanTarget;
use crate::core::wordlist::{as_path_segment, WordlistSource};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const NAME: &str = "Directory Enumeration";

/// Requests `url + path` for each wordlist entry and records interesting
/// status codes. Failed requests are skipped, never retried.
pub struct DirectoryEnumerator {
    url: ScanTarget,
    wordlist: WordlistSource,
    http: Arc<dyn HttpProbe>,
    concurrency: usize,
    cancel: CancelToken,
    created_at: DateTime<Local>,
}

impl DirectoryEnumerator {
    pub fn new(url: &str, wordlist: WordlistSource, http: Arc<dyn HttpProbe>) -> Self {
        Self {
            url: ScanTarget::url(url),
            wordlist,
            http,
            concurrency: 1,
            cancel: CancelToken::new(),
            created_at: Local::now(),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

#[async_trait]
impl Scanner for DirectoryEnumerator {
    fn name(&self) -> &'static str {
        NAME
    }

    fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    fn target(&self) -> Option<String> {
        Some(self.url.to_string())
    }

    async fn run(&self) -> Result<ScanResult> {
        let paths: Vec<String> = self.wordlist.load().iter().map(|e| as_path_segment(e)).collect();
        if paths.is_empty() {
            warn!(url = %self.url, "Directory wordlist missing or empty.");
            return Ok(ScanResult::Placeholder(EMPTY_WORDLIST.to_string()));
        }
        info!(url = %self.url, candidates = paths.len(), "Starting directory enumeration.");

        let outcomes = probe_all(paths, self.concurrency, &self.cancel, |path| async move {
            let target = format!("{}{}", self.url, path);
            let outcome = classify_status(self.http.status(&target).await);
            (target, outcome)
        })
        .await;

        let found: Vec<String> = outcomes
            .into_iter()
            .filter_map(|(target, outcome)| match outcome {
                ProbeOutcome::Hit(code) => Some(format!("{target} ({code})")),
                ProbeOutcome::Miss => None,
                ProbeOutcome::Error(cause) => {
                    debug!(url = %target, error = %cause, "Probe failed, skipping.");
                    None
                }
            })
            .collect();

        info!(url = %self.url, found = found.len(), "Directory enumeration finished.");
        Ok(ScanResult::from_findings(found, NO_DIRECTORIES))
    }
}
