// src/core/scanner/lookup_scanner.rs

use super::Scanner;
use crate::core::error::Result;
use crate::core::models::ScanResult;
use crate::core::probe::whois::WhoisRecord;
use crate::core::probe::{DnsProbe, WhoisProbe};
use crate::core::target::ScanTarget;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{info, warn};

pub const NAME: &str = "NSLookup & WHOIS";

/// Forward DNS plus WHOIS for one target.
///
/// The two halves are independent: each one's failure becomes a line in the
/// report and never suppresses the other.
pub struct NslookupWhoisLookup {
    target: ScanTarget,
    dns: Arc<dyn DnsProbe>,
    whois: Arc<dyn WhoisProbe>,
    created_at: DateTime<Local>,
}

impl NslookupWhoisLookup {
    pub fn new(target: &str, dns: Arc<dyn DnsProbe>, whois: Arc<dyn WhoisProbe>) -> Self {
        Self { target: ScanTarget::domain(target), dns, whois, created_at: Local::now() }
    }

    async fn nslookup(&self) -> Vec<String> {
        let target = self.target.as_str();
        match self.dns.lookup_ipv4(target).await {
            Ok(addrs) if !addrs.is_empty() => {
                vec![format!("NSLookup Result for {target}:"), format!("  - IP Address: {}", addrs[0])]
            }
            Ok(_) => vec![format!("NSLookup failed: no IPv4 address for {target}")],
            Err(e) => {
                warn!(target, error = %e, "Forward lookup failed.");
                vec![format!("NSLookup failed: {e}")]
            }
        }
    }

    async fn whois(&self) -> Vec<String> {
        let target = self.target.as_str();
        let raw = match self.whois.query(target).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(target, error = %e, "WHOIS query failed.");
                return vec![format!("WHOIS failed: {e}")];
            }
        };

        let record = WhoisRecord::parse(&raw);
        if !record.has_data() {
            warn!(target, "WHOIS answer carried no registration data.");
            return vec![format!("WHOIS failed: no registration data for {target}")];
        }

        vec![
            "WHOIS Information:".to_string(),
            format!("  - Registrar: {}", record.registrar_display()),
            format!("  - Creation Date: {}", record.created_display()),
            format!("  - Last Updated: {}", record.updated_display()),
            format!("  - Name Servers: {}", record.name_servers_display()),
        ]
    }
}

#[async_trait]
impl Scanner for NslookupWhoisLookup {
    fn name(&self) -> &'static str {
        NAME
    }

    fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    fn target(&self) -> Option<String> {
        Some(self.target.to_string())
    }

    async fn run(&self) -> Result<ScanResult> {
        info!(target = %self.target, "Starting NSLookup & WHOIS.");
        let (mut lines, whois_lines) = tokio::join!(self.nslookup(), self.whois());
        lines.extend(whois_lines);
        Ok(ScanResult::Findings(lines))
    }
}
