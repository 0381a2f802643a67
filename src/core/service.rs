// src/core/service.rs

//! Orchestrates scanner runs and owns the state that outlives a single run.

use crate::core::config::Config;
use crate::core::dispatch::{self, Tool};
use crate::core::error::Result;
use crate::core::history::{self, ScanHistory};
use crate::core::models::{Alert, CompletedScan, HostRecord, NetworkSnapshot, ScanRecord, ScanResult};
use crate::core::novelty::KnownHosts;
use crate::core::probe::{
    ConnectionSource, DnsProbe, HickoryDns, HttpProbe, ProcNetConnections, ReqwestProbe, TcpWhois, WhoisProbe,
};
use crate::core::risk::{self, DeviceStats};
use crate::core::scanner::{
    CancelToken, DirectoryEnumerator, NetworkScanner, NslookupWhoisLookup, Scanner, SubdomainEnumerator,
};
use crate::core::wordlist::WordlistSource;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

const SUMMARY_HISTORY: usize = 10;
const ACTIVITY_WINDOW: usize = 20;

/// The transports the scanners run on.
#[derive(Clone)]
pub struct Probes {
    pub dns: Arc<dyn DnsProbe>,
    pub http: Arc<dyn HttpProbe>,
    pub whois: Arc<dyn WhoisProbe>,
    pub connections: Arc<dyn ConnectionSource>,
}

impl Probes {
    /// Real network-backed probes configured from `config`.
    pub fn live(config: &Config) -> Result<Self> {
        Ok(Self {
            dns: Arc::new(HickoryDns::new(config.dns_timeout())),
            http: Arc::new(ReqwestProbe::new(config.http_timeout(), &config.user_agent)?),
            whois: Arc::new(TcpWhois::new(config.whois_timeout())),
            connections: Arc::new(ProcNetConnections),
        })
    }
}

/// Dashboard figures derived from the latest network scan.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub hosts: Vec<HostRecord>,
    pub alerts: Vec<Alert>,
    pub device_stats: DeviceStats,
    pub risk_score: u8,
    pub history: Vec<ScanRecord>,
    pub activity: Vec<(String, usize)>,
}

pub struct ScanService {
    config: Config,
    probes: Probes,
    known_hosts: Arc<KnownHosts>,
    history: Mutex<ScanHistory>,
    completed: Mutex<Vec<CompletedScan>>,
    last_network: Mutex<Option<NetworkSnapshot>>,
    cancel: Mutex<CancelToken>,
    // Network scans run one at a time.
    network_gate: tokio::sync::Mutex<()>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScanService {
    pub fn new(config: Config, probes: Probes, known_hosts: Arc<KnownHosts>) -> Self {
        let history = ScanHistory::new(config.history_capacity);
        Self {
            config,
            probes,
            known_hosts,
            history: Mutex::new(history),
            completed: Mutex::new(Vec::new()),
            last_network: Mutex::new(None),
            cancel: Mutex::new(CancelToken::new()),
            network_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn known_hosts(&self) -> &Arc<KnownHosts> {
        &self.known_hosts
    }

    /// Stops running enumerations; they return their partial results.
    pub fn cancel_running(&self) {
        let mut token = lock(&self.cancel);
        token.cancel();
        *token = CancelToken::new();
        info!("Running enumerations cancelled.");
    }

    fn cancel_token(&self) -> CancelToken {
        lock(&self.cancel).clone()
    }

    /// Runs any scanner and files the result in the history.
    pub async fn execute(&self, scanner: &dyn Scanner) -> Result<CompletedScan> {
        let result = scanner.run().await.inspect_err(|e| {
            warn!(scanner = scanner.name(), error = %e, "Scan failed.");
        })?;

        let completed = CompletedScan {
            name: scanner.name().to_string(),
            target: scanner.target(),
            timestamp: scanner.created_at(),
            result,
        };

        lock(&self.history).record(completed.record());
        if let ScanResult::Hosts(snapshot) = &completed.result {
            *lock(&self.last_network) = Some(snapshot.clone());
        }
        lock(&self.completed).push(completed.clone());
        Ok(completed)
    }

    pub async fn network_scan(&self) -> Result<CompletedScan> {
        let _gate = self.network_gate.lock().await;
        let scanner = NetworkScanner::new(
            self.probes.connections.clone(),
            self.probes.dns.clone(),
            self.known_hosts.clone(),
        )
        .with_concurrency(self.config.concurrency);
        self.execute(&scanner).await
    }

    pub async fn subdomain_scan(&self, domain: &str, wordlist: Option<PathBuf>) -> Result<CompletedScan> {
        let source = WordlistSource::subdomains(wordlist.or_else(|| self.config.subdomain_wordlist.clone()));
        let scanner = SubdomainEnumerator::new(domain, source, self.probes.dns.clone())
            .with_concurrency(self.config.concurrency)
            .with_cancel(self.cancel_token());
        self.execute(&scanner).await
    }

    pub async fn directory_scan(&self, url: &str, wordlist: Option<PathBuf>) -> Result<CompletedScan> {
        let source = WordlistSource::directories(wordlist.or_else(|| self.config.directory_wordlist.clone()));
        let scanner = DirectoryEnumerator::new(url, source, self.probes.http.clone())
            .with_concurrency(self.config.concurrency)
            .with_cancel(self.cancel_token());
        self.execute(&scanner).await
    }

    pub async fn lookup(&self, target: &str) -> Result<CompletedScan> {
        let scanner = NslookupWhoisLookup::new(target, self.probes.dns.clone(), self.probes.whois.clone());
        self.execute(&scanner).await
    }

    /// Parses a command phrase and runs the scanner it names.
    pub async fn dispatch(&self, phrase: &str) -> Result<CompletedScan> {
        let command = dispatch::parse(phrase)?;
        info!(keyword = command.keyword, target = ?command.target, "Dispatching command.");
        let target = command.target.as_deref().unwrap_or_default();
        match command.tool {
            Tool::Network => self.network_scan().await,
            Tool::Subdomain => self.subdomain_scan(target, None).await,
            Tool::Directory => self.directory_scan(target, None).await,
            Tool::Lookup => self.lookup(target).await,
        }
    }

    pub fn summary(&self) -> Summary {
        let snapshot = lock(&self.last_network).clone().unwrap_or_default();
        let device_stats = risk::device_stats(&snapshot.hosts);
        let risk_score = risk::risk_score(snapshot.alerts.len(), &device_stats);
        let history = lock(&self.history);
        Summary {
            hosts: snapshot.hosts,
            alerts: snapshot.alerts,
            device_stats,
            risk_score,
            history: history.recent(SUMMARY_HISTORY),
            activity: history.activity(ACTIVITY_WINDOW),
        }
    }

    pub fn completed_scans(&self) -> Vec<CompletedScan> {
        lock(&self.completed).clone()
    }

    pub fn export_report(&self, dir: &Path) -> Result<PathBuf> {
        history::write_report(&self.completed_scans(), dir)
    }
}
