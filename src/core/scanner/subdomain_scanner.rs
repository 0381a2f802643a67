// src/core/scanner/subdomain_scanner.rs

use super::{probe_all, CancelToken, Scanner};
use crate::core::error::{Error, Result};
use crate::core::models::{ScanResult, EMPTY_WORDLIST, NO_SUBDOMAINS};
use crate::core::probe::{classify_lookup, DnsProbe, ProbeOutcome};
use crate::core::target::ScanTarget;
use crate::core::wordlist::WordlistSource;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const NAME: &str = "Subdomain Enumeration";

/// Brute-forces `label.domain` A records from a wordlist.
pub struct SubdomainEnumerator {
    domain: ScanTarget,
    wordlist: WordlistSource,
    dns: Arc<dyn DnsProbe>,
    concurrency: usize,
    cancel: CancelToken,
    created_at: DateTime<Local>,
}

impl SubdomainEnumerator {
    pub fn new(domain: &str, wordlist: WordlistSource, dns: Arc<dyn DnsProbe>) -> Self {
        Self {
            domain: ScanTarget::domain(domain),
            wordlist,
            dns,
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

    pub fn domain(&self) -> &str {
        self.domain.as_str()
    }
}

#[async_trait]
impl Scanner for SubdomainEnumerator {
    fn name(&self) -> &'static str {
        NAME
    }

    fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    fn target(&self) -> Option<String> {
        Some(self.domain.to_string())
    }

    async fn run(&self) -> Result<ScanResult> {
        let labels = self.wordlist.load();
        if labels.is_empty() {
            warn!(domain = %self.domain, "Subdomain wordlist missing or empty.");
            return Ok(ScanResult::Placeholder(EMPTY_WORDLIST.to_string()));
        }
        info!(domain = %self.domain, candidates = labels.len(), "Starting subdomain enumeration.");

        let fqdns: Vec<String> = labels.iter().map(|label| format!("{label}.{}", self.domain)).collect();
        let outcomes = probe_all(fqdns, self.concurrency, &self.cancel, |fqdn| async move {
            let outcome = classify_lookup(self.dns.lookup_ipv4(&fqdn).await);
            (fqdn, outcome)
        })
        .await;

        let mut found = Vec::new();
        for (fqdn, outcome) in outcomes {
            match outcome {
                ProbeOutcome::Hit(addrs) => {
                    debug!(name = %fqdn, addresses = ?addrs, "Subdomain resolved.");
                    found.push(fqdn);
                }
                ProbeOutcome::Miss => {}
                ProbeOutcome::Error(cause) => {
                    warn!(name = %fqdn, error = %cause, "Unexpected resolver failure, aborting enumeration.");
                    return Err(Error::Resolver { name: fqdn, cause });
                }
            }
        }

        info!(domain = %self.domain, found = found.len(), "Subdomain enumeration finished.");
        Ok(ScanResult::from_findings(found, NO_SUBDOMAINS))
    }
}
