// src/core/probe/whois.rs

//! WHOIS over TCP/43 and parsing of the free-form registry answer.

use super::WhoisProbe;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, warn};

pub const IANA_WHOIS: &str = "whois.iana.org";
const WHOIS_PORT: u16 = 43;
const MAX_REFERRALS: usize = 2;
const NOT_AVAILABLE: &str = "N/A";

static RE_FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([A-Za-z][A-Za-z0-9 /_.\-]*?)\s*:\s*(.*?)\s*$").unwrap());

// Registry spellings for each field, lowercase.
const REGISTRAR_KEYS: &[&str] = &["registrar", "sponsoring registrar", "registrar name", "registrar organization"];
const CREATED_KEYS: &[&str] = &[
    "creation date",
    "created",
    "created on",
    "registered on",
    "registration time",
    "domain registration date",
    "registered",
];
const UPDATED_KEYS: &[&str] = &[
    "updated date",
    "last updated",
    "last-update",
    "last modified",
    "last-modified",
    "changed",
    "modified",
];
const NAME_SERVER_KEYS: &[&str] = &["name server", "name servers", "nserver", "nameserver", "nameservers"];
const REFERRAL_KEYS: &[&str] = &["refer", "whois", "registrar whois server"];

/// WHOIS client speaking the plain text protocol.
///
/// Starts at IANA and follows referrals down to the registry and then the
/// registrar, keeping the deepest answer that still carries registration data.
/// The root answer only describes the TLD and is never returned.
pub struct TcpWhois {
    root_server: String,
    timeout: Duration,
}

impl TcpWhois {
    pub fn new(timeout: Duration) -> Self {
        Self::with_root(IANA_WHOIS, timeout)
    }

    /// Starts from `root_server` (`host` or `host:port`) instead of IANA.
    pub fn with_root(root_server: &str, timeout: Duration) -> Self {
        Self { root_server: root_server.to_lowercase(), timeout }
    }

    async fn ask(&self, server: &str, query: &str) -> Result<String, String> {
        debug!(server, query, "Querying WHOIS server.");
        let (host, port) = split_server(server);
        let io = async {
            let mut stream = TcpStream::connect((host, port)).await?;
            stream.write_all(format!("{query}\r\n").as_bytes()).await?;
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf).await?;
            Ok::<_, std::io::Error>(buf)
        };
        match tokio::time::timeout(self.timeout, io).await {
            Ok(Ok(bytes)) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Ok(Err(e)) => Err(format!("{server}: {e}")),
            Err(_) => Err(format!("{server}: timed out")),
        }
    }
}

/// `host:port` when a numeric port is given, the WHOIS port otherwise.
fn split_server(server: &str) -> (&str, u16) {
    match server.rsplit_once(':') {
        Some((host, port)) => match port.parse() {
            Ok(port) => (host, port),
            Err(_) => (server, WHOIS_PORT),
        },
        None => (server, WHOIS_PORT),
    }
}

#[async_trait]
impl WhoisProbe for TcpWhois {
    async fn query(&self, domain: &str) -> Result<String, String> {
        let root = self.ask(&self.root_server, domain).await?;
        let mut visited = vec![self.root_server.clone()];
        let mut cursor = root;
        let mut answer: Option<String> = None;
        let mut last_error: Option<String> = None;

        for _ in 0..MAX_REFERRALS {
            let Some(next) = referral(&cursor) else { break };
            if visited.contains(&next) {
                break;
            }
            match self.ask(&next, domain).await {
                Ok(deeper) if WhoisRecord::parse(&deeper).has_data() => {
                    answer = Some(deeper.clone());
                    cursor = deeper;
                }
                Ok(_) => {
                    debug!(server = %next, "WHOIS referral answered without registration data.");
                    break;
                }
                Err(e) => {
                    warn!(server = %next, error = %e, "WHOIS referral failed.");
                    last_error = Some(e);
                    break;
                }
            }
            visited.push(next);
        }

        match (answer, last_error) {
            (Some(answer), _) => Ok(answer),
            (None, Some(e)) => Err(e),
            (None, None) => Err(format!("no registration data for {domain}")),
        }
    }
}

fn fields(text: &str) -> HashMap<String, Vec<String>> {
    let mut map: HashMap<String, Vec<String>> = HashMap::new();
    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('%') || trimmed.starts_with('#') || trimmed.starts_with(">>>") {
            continue;
        }
        if let Some(caps) = RE_FIELD.captures(line) {
            let value = caps[2].trim();
            if !value.is_empty() {
                map.entry(caps[1].to_lowercase()).or_default().push(value.to_string());
            }
        }
    }
    map
}

fn first_of(fields: &HashMap<String, Vec<String>>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| fields.get(*k).and_then(|v| v.first().cloned()))
}

fn referral(text: &str) -> Option<String> {
    let fields = fields(text);
    first_of(&fields, REFERRAL_KEYS)
        .map(|server| server.trim_start_matches("whois://").trim_end_matches('/').to_lowercase())
        .filter(|server| server.contains('.') && !server.contains(' '))
}

/// Registration metadata pulled from a WHOIS answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhoisRecord {
    pub registrar: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub name_servers: Vec<String>,
}

impl WhoisRecord {
    /// Keeps the first value of multi-valued date fields.
    pub fn parse(text: &str) -> Self {
        let fields = fields(text);

        let mut name_servers: Vec<String> = Vec::new();
        for key in NAME_SERVER_KEYS {
            for value in fields.get(*key).into_iter().flatten() {
                // Some registries put the glue address after the name.
                let name = value.split_whitespace().next().unwrap_or_default().to_lowercase();
                let name = name.trim_end_matches('.').to_string();
                if !name.is_empty() && !name_servers.contains(&name) {
                    name_servers.push(name);
                }
            }
        }

        Self {
            registrar: first_of(&fields, REGISTRAR_KEYS),
            created: first_of(&fields, CREATED_KEYS),
            updated: first_of(&fields, UPDATED_KEYS),
            name_servers,
        }
    }

    pub fn has_data(&self) -> bool {
        self.registrar.is_some() || self.created.is_some() || self.updated.is_some() || !self.name_servers.is_empty()
    }

    pub fn registrar_display(&self) -> String {
        self.registrar.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn created_display(&self) -> String {
        format_date(self.created.as_deref())
    }

    pub fn updated_display(&self) -> String {
        format_date(self.updated.as_deref())
    }

    pub fn name_servers_display(&self) -> String {
        if self.name_servers.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            self.name_servers.join(", ")
        }
    }
}

/// Renders a registry date as `YYYY-MM-DD HH:MM:SS`; anything else is `N/A`.
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(parse_date)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim().trim_end_matches(" UTC").trim_end_matches(" (UTC)").trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    const DATE_TIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y.%m.%d %H:%M:%S",
        "%d-%b-%Y %H:%M:%S",
    ];
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%b-%Y", "%Y.%m.%d", "%Y/%m/%d", "%d.%m.%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}
