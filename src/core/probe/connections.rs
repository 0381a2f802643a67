// src/core/probe/connections.rs

//! Local connection table enumeration.
//!
//! - Linux: reads /proc/net/{tcp,tcp6,udp,udp6}
//! - elsewhere: parses `netstat -an`

use super::ConnectionSource;
use crate::core::error::{Error, Result};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use tracing::{debug, warn};

const PROC_TABLES: &[(&str, bool)] = &[
    ("/proc/net/tcp", false),
    ("/proc/net/tcp6", true),
    ("/proc/net/udp", false),
    ("/proc/net/udp6", true),
];

/// Reads the kernel's socket tables, falling back to `netstat` off Linux.
#[derive(Debug, Default)]
pub struct ProcNetConnections;

impl ConnectionSource for ProcNetConnections {
    fn remote_addresses(&self) -> Result<Vec<SocketAddr>> {
        if cfg!(target_os = "linux") {
            read_proc_tables()
        } else {
            read_netstat()
        }
    }
}

fn read_proc_tables() -> Result<Vec<SocketAddr>> {
    let mut remotes = Vec::new();
    let mut readable = 0;

    for (path, ipv6) in PROC_TABLES {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                readable += 1;
                remotes.extend(parse_proc_table(&content, *ipv6));
            }
            Err(e) => debug!(path, error = %e, "Socket table not readable."),
        }
    }

    if readable == 0 {
        return Err(Error::ConnectionTable("no /proc/net socket table is readable".to_string()));
    }
    debug!(count = remotes.len(), "Connection table read.");
    Ok(remotes)
}

fn read_netstat() -> Result<Vec<SocketAddr>> {
    let output = std::process::Command::new("netstat")
        .arg("-an")
        .output()
        .map_err(|e| Error::ConnectionTable(format!("failed to run netstat: {e}")))?;
    if !output.status.success() {
        warn!(status = %output.status, "netstat exited with failure.");
        return Err(Error::ConnectionTable(format!("netstat exited with {}", output.status)));
    }
    Ok(parse_netstat(&String::from_utf8_lossy(&output.stdout)))
}

/// Parses one /proc/net table. Rows without a remote endpoint are skipped.
pub fn parse_proc_table(content: &str, ipv6: bool) -> Vec<SocketAddr> {
    content
        .lines()
        .skip(1)
        .filter_map(|line| {
            let remote = line.split_whitespace().nth(2)?;
            let (hex_ip, hex_port) = remote.split_once(':')?;
            let port = u16::from_str_radix(hex_port, 16).ok()?;
            let ip = if ipv6 { parse_hex_ipv6(hex_ip)? } else { parse_hex_ipv4(hex_ip)? };
            if port == 0 && ip.is_unspecified() {
                return None;
            }
            Some(SocketAddr::new(ip, port))
        })
        .collect()
}

fn parse_hex_ipv4(hex: &str) -> Option<IpAddr> {
    // Kernel writes the address in host (little-endian) byte order.
    let value = u32::from_str_radix(hex, 16).ok()?;
    Some(IpAddr::V4(Ipv4Addr::from(value.swap_bytes())))
}

fn parse_hex_ipv6(hex: &str) -> Option<IpAddr> {
    if hex.len() != 32 {
        return None;
    }
    let mut octets = [0u8; 16];
    // Four little-endian 32-bit words.
    for word in 0..4 {
        let chunk = &hex[word * 8..word * 8 + 8];
        let value = u32::from_str_radix(chunk, 16).ok()?.swap_bytes();
        octets[word * 4..word * 4 + 4].copy_from_slice(&value.to_be_bytes());
    }
    let addr = Ipv6Addr::from(octets);
    // IPv4-mapped peers are reported as plain IPv4.
    Some(match addr.to_ipv4_mapped() {
        Some(v4) => IpAddr::V4(v4),
        None => IpAddr::V6(addr),
    })
}

/// Parses `netstat -an` rows (BSD and Windows layouts).
pub fn parse_netstat(output: &str) -> Vec<SocketAddr> {
    output
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            let proto = parts.first()?.to_lowercase();
            if !(proto.starts_with("tcp") || proto.starts_with("udp")) {
                return None;
            }
            // BSD: proto recv-q send-q local foreign [state]; Windows: proto local foreign [state]
            let foreign = if parts.len() >= 5 && parts[1].parse::<u64>().is_ok() { parts[4] } else { *parts.get(2)? };
            parse_netstat_endpoint(foreign)
        })
        .filter(|addr| !(addr.port() == 0 && addr.ip().is_unspecified()))
        .collect()
}

fn parse_netstat_endpoint(endpoint: &str) -> Option<SocketAddr> {
    if let Ok(addr) = endpoint.parse::<SocketAddr>() {
        return Some(addr);
    }
    // BSD style: 192.168.1.10.443 or fe80::1.443
    let (ip, port) = endpoint.rsplit_once('.')?;
    let port = port.parse::<u16>().ok()?;
    let ip = ip.trim_start_matches('[').trim_end_matches(']').split('%').next()?;
    Some(SocketAddr::new(ip.parse().ok()?, port))
}
