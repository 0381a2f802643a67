// src/core/scanner/network_scanner.rs

use super::{probe_all, CancelToken, Scanner};
use crate::core::error::{Error, Result};
use crate::core::models::{DeviceType, HostRecord, NetworkSnapshot, ScanResult};
use crate::core::novelty::KnownHosts;
use crate::core::probe::{ConnectionSource, DnsProbe};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, info};

pub const NAME: &str = "Network Scanner";
const UNKNOWN_HOST: &str = "Unknown";

/// Hostname keywords per device type, checked in order.
const DEVICE_KEYWORDS: &[(&[&str], DeviceType)] = &[
    (&["iphone", "android"], DeviceType::Phone),
    (&["printer"], DeviceType::Printer),
    (&["tv", "iot"], DeviceType::Iot),
];

/// Discovers remote peers from the local connection table.
pub struct NetworkScanner {
    connections: Arc<dyn ConnectionSource>,
    dns: Arc<dyn DnsProbe>,
    known_hosts: Arc<KnownHosts>,
    concurrency: usize,
    created_at: DateTime<Local>,
}

impl NetworkScanner {
    pub fn new(connections: Arc<dyn ConnectionSource>, dns: Arc<dyn DnsProbe>, known_hosts: Arc<KnownHosts>) -> Self {
        Self { connections, dns, known_hosts, concurrency: 1, created_at: Local::now() }
    }

    /// Reverse lookups in flight at once.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    async fn resolve(&self, ip: IpAddr) -> String {
        match self.dns.reverse(ip).await {
            Ok(name) => name,
            Err(e) => {
                debug!(%ip, error = %e, "Reverse lookup failed.");
                UNKNOWN_HOST.to_string()
            }
        }
    }
}

/// Case-insensitive keyword match on the hostname.
pub fn guess_device_type(hostname: &str) -> DeviceType {
    let host = hostname.to_lowercase();
    DEVICE_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| host.contains(k)))
        .map(|(_, device)| *device)
        .unwrap_or(DeviceType::Computer)
}

#[async_trait]
impl Scanner for NetworkScanner {
    fn name(&self) -> &'static str {
        NAME
    }

    fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    async fn run(&self) -> Result<ScanResult> {
        info!("Starting network scan.");

        let connections = self.connections.clone();
        let remotes = tokio::task::spawn_blocking(move || connections.remote_addresses())
            .await
            .map_err(|e| Error::Task(e.to_string()))??;

        // One lookup per distinct peer, in first-seen order.
        let mut seen = HashSet::new();
        let ips: Vec<IpAddr> = remotes.iter().map(|addr| addr.ip()).filter(|ip| seen.insert(*ip)).collect();

        let hosts: Vec<HostRecord> = probe_all(ips, self.concurrency, &CancelToken::new(), |ip| async move {
            let hostname = self.resolve(ip).await;
            let device_type = guess_device_type(&hostname);
            HostRecord::new(ip.to_string(), hostname, device_type)
        })
        .await;

        let alerts = self.known_hosts.observe(hosts.iter().map(|h| h.ip.as_str()));

        info!(connections = remotes.len(), hosts = hosts.len(), alerts = alerts.len(), "Network scan finished.");
        Ok(ScanResult::Hosts(NetworkSnapshot { hosts, alerts }))
    }
}
