// src/core/models.rs

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

// --- Placeholder texts ---
// A scanner never returns an empty sequence; these single-line notices stand in
// for "ran, found nothing" so it reads differently from "did not run".

pub const EMPTY_WORDLIST: &str = "Wordlist not found or empty";
pub const NO_SUBDOMAINS: &str = "No subdomains found";
pub const NO_DIRECTORIES: &str = "No directories found";
pub const NO_CONNECTIONS: &str = "No active connections found";

// --- Network Scanner Models ---

/// Coarse device class guessed from a reverse-DNS hostname.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceType {
    Computer,
    Phone,
    Printer,
    Iot,
}

/// One remote peer seen in the local connection table.
///
/// Identity is the IP: two connections to the same peer collapse into one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    pub ip: String,
    pub hostname: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub mac: String,
    pub status: String,
}

impl HostRecord {
    pub fn new(ip: impl Into<String>, hostname: impl Into<String>, device_type: DeviceType) -> Self {
        Self {
            ip: ip.into(),
            hostname: hostname.into(),
            device_type,
            mac: "Unknown".to_string(),
            status: "Active".to_string(),
        }
    }
}

/// A "new device" notification, emitted once per unseen IP per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub message: String,
}

impl Alert {
    pub fn new_device(ip: &str) -> Self {
        Self { message: format!("New device detected: {ip}") }
    }
}

/// Hosts discovered by one network scan plus the alerts it raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub hosts: Vec<HostRecord>,
    pub alerts: Vec<Alert>,
}

// --- Scan Results ---

/// What a single scanner invocation produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ScanResult {
    /// Ordered human-readable findings.
    Findings(Vec<String>),
    /// Network discovery output.
    Hosts(NetworkSnapshot),
    /// The scan ran but had nothing to report.
    Placeholder(String),
}

impl ScanResult {
    /// Wraps findings, substituting `empty_notice` when there are none.
    pub fn from_findings(findings: Vec<String>, empty_notice: &str) -> Self {
        if findings.is_empty() {
            Self::Placeholder(empty_notice.to_string())
        } else {
            Self::Findings(findings)
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }

    /// Renders the result as the display sequence. Never empty.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Findings(lines) => lines.clone(),
            Self::Placeholder(notice) => vec![notice.clone()],
            Self::Hosts(snapshot) if snapshot.hosts.is_empty() => vec![NO_CONNECTIONS.to_string()],
            Self::Hosts(snapshot) => snapshot
                .hosts
                .iter()
                .map(|h| format!("{} ({}) [{}] {} / {}", h.ip, h.hostname, h.device_type, h.mac, h.status))
                .collect(),
        }
    }

    pub fn hosts(&self) -> &[HostRecord] {
        match self {
            Self::Hosts(snapshot) => &snapshot.hosts,
            _ => &[],
        }
    }

    pub fn alerts(&self) -> &[Alert] {
        match self {
            Self::Hosts(snapshot) => &snapshot.alerts,
            _ => &[],
        }
    }
}

// --- History / Report Models ---

/// Name and start time of one scan run, kept in the rolling history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub name: String,
    pub timestamp: DateTime<Local>,
}

/// A finished scan with everything needed to export it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedScan {
    pub name: String,
    pub target: Option<String>,
    pub timestamp: DateTime<Local>,
    pub result: ScanResult,
}

impl CompletedScan {
    pub fn record(&self) -> ScanRecord {
        ScanRecord { name: self.name.clone(), timestamp: self.timestamp }
    }

    /// JSON representation used by the exported report.
    pub fn report(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "target": self.target,
            "timestamp": self.timestamp.to_rfc3339(),
            "results": self.result.lines(),
            "alerts": self.result.alerts().iter().map(|a| a.message.as_str()).collect::<Vec<_>>(),
        })
    }
}
