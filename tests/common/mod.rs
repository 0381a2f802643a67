// tests/common/mod.rs

//! In-memory probes for driving the scanners without a network.

#![allow(dead_code)]

use async_trait::async_trait;
use reconwatch::core::config::Config;
use reconwatch::core::error::{Error, Result};
use reconwatch::core::probe::{ConnectionSource, DnsProbe, HttpProbe, LookupFailure, WhoisProbe};
use reconwatch::core::service::Probes;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Resolves only the names it was given; everything else is NXDOMAIN.
/// Reverse lookups are counted, along with the most that were in flight at once.
#[derive(Default)]
pub struct StubDns {
    pub forward: HashMap<String, std::result::Result<Vec<Ipv4Addr>, LookupFailure>>,
    pub reverse: HashMap<IpAddr, String>,
    pub reverse_delay: Option<Duration>,
    pub reverse_calls: AtomicUsize,
    pub reverse_in_flight: AtomicUsize,
    pub reverse_peak: AtomicUsize,
}

impl StubDns {
    pub fn resolving(names: &[(&str, Ipv4Addr)]) -> Self {
        Self {
            forward: names.iter().map(|(n, ip)| (n.to_string(), Ok(vec![*ip]))).collect(),
            ..Self::default()
        }
    }

    pub fn with_failure(mut self, name: &str, failure: LookupFailure) -> Self {
        self.forward.insert(name.to_string(), Err(failure));
        self
    }

    pub fn with_reverse_delay(mut self, delay: Duration) -> Self {
        self.reverse_delay = Some(delay);
        self
    }

    pub fn with_ptr(mut self, ip: &str, hostname: &str) -> Self {
        self.reverse.insert(ip.parse().unwrap(), hostname.to_string());
        self
    }
}

#[async_trait]
impl DnsProbe for StubDns {
    async fn lookup_ipv4(&self, name: &str) -> std::result::Result<Vec<Ipv4Addr>, LookupFailure> {
        self.forward.get(name).cloned().unwrap_or(Err(LookupFailure::NxDomain))
    }

    async fn reverse(&self, ip: IpAddr) -> std::result::Result<String, LookupFailure> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.reverse_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.reverse_peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.reverse_delay {
            tokio::time::sleep(delay).await;
        }
        self.reverse_in_flight.fetch_sub(1, Ordering::SeqCst);
        self.reverse.get(&ip).cloned().ok_or(LookupFailure::NxDomain)
    }
}

/// Answers with a fixed status per URL, 404 otherwise. URLs listed in
/// `stalled` never answer; `stalled_hit` fires when one is first requested.
#[derive(Default)]
pub struct StubHttp {
    pub statuses: HashMap<String, std::result::Result<u16, String>>,
    pub stalled: Vec<String>,
    pub stalled_hit: Arc<Notify>,
}

impl StubHttp {
    pub fn with(mut self, url: &str, status: u16) -> Self {
        self.statuses.insert(url.to_string(), Ok(status));
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.statuses.insert(url.to_string(), Err("connection refused".to_string()));
        self
    }

    pub fn stalling(mut self, url: &str) -> Self {
        self.stalled.push(url.to_string());
        self
    }
}

#[async_trait]
impl HttpProbe for StubHttp {
    async fn status(&self, url: &str) -> std::result::Result<u16, String> {
        if self.stalled.iter().any(|u| u == url) {
            self.stalled_hit.notify_one();
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        self.statuses.get(url).cloned().unwrap_or(Ok(404))
    }
}

pub struct StubWhois(pub std::result::Result<String, String>);

#[async_trait]
impl WhoisProbe for StubWhois {
    async fn query(&self, _domain: &str) -> std::result::Result<String, String> {
        self.0.clone()
    }
}

/// A connection table the test can rewrite between scans.
#[derive(Default)]
pub struct StubConnections {
    pub table: Mutex<Option<Vec<SocketAddr>>>,
}

impl StubConnections {
    pub fn with(addrs: &[&str]) -> Self {
        let table = StubConnections::default();
        table.set(addrs);
        table
    }

    pub fn set(&self, addrs: &[&str]) {
        let parsed = addrs.iter().map(|a| a.parse().unwrap()).collect();
        *self.table.lock().unwrap() = Some(parsed);
    }

    pub fn unreadable(&self) {
        *self.table.lock().unwrap() = None;
    }
}

impl ConnectionSource for StubConnections {
    fn remote_addresses(&self) -> Result<Vec<SocketAddr>> {
        self.table
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::ConnectionTable("permission denied".to_string()))
    }
}

pub const REGISTRY_ANSWER: &str = "\
Domain Name: EXAMPLE.TEST
Registrar: Example Registrar, Inc.
Creation Date: 1995-08-14T04:00:00Z
Updated Date: 2024-08-14T07:01:34Z
Name Server: A.IANA-SERVERS.NET
Name Server: B.IANA-SERVERS.NET
";

pub fn probes(
    dns: StubDns,
    http: StubHttp,
    whois: StubWhois,
    connections: Arc<StubConnections>,
) -> Probes {
    Probes { dns: Arc::new(dns), http: Arc::new(http), whois: Arc::new(whois), connections }
}

pub fn test_config() -> Config {
    Config { concurrency: 4, ..Config::default() }
}
