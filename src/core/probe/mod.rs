// src/core/probe/mod.rs

//! Single bounded network operations and the classification of their outcome.
//!
//! Each transport sits behind a trait so scanners can be driven by stubs.
//! Transports report raw results; the `classify_*` functions turn those into a
//! `ProbeOutcome` that the scanners fold into their output.

pub mod connections;
pub mod dns;
pub mod http;
pub mod whois;

use async_trait::async_trait;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub use self::connections::ProcNetConnections;
pub use self::dns::HickoryDns;
pub use self::http::ReqwestProbe;
pub use self::whois::TcpWhois;

/// Status codes the directory enumerator records.
pub const HIT_STATUS_CODES: &[u16] = &[200, 301, 302, 403];

/// Result of probing one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome<T> {
    Hit(T),
    Miss,
    Error(String),
}

impl<T> ProbeOutcome<T> {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

/// Why a DNS lookup produced no address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    NoAnswer,
    NxDomain,
    Timeout,
    NoNameservers,
    Other(String),
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAnswer => write!(f, "no answer"),
            Self::NxDomain => write!(f, "name does not exist"),
            Self::Timeout => write!(f, "timed out"),
            Self::NoNameservers => write!(f, "no nameservers available"),
            Self::Other(cause) => write!(f, "{cause}"),
        }
    }
}

/// Expected failures are misses; anything else is an error.
pub fn classify_lookup<T>(result: Result<Vec<T>, LookupFailure>) -> ProbeOutcome<Vec<T>> {
    match result {
        Ok(addrs) if addrs.is_empty() => ProbeOutcome::Miss,
        Ok(addrs) => ProbeOutcome::Hit(addrs),
        Err(LookupFailure::Other(cause)) => ProbeOutcome::Error(cause),
        Err(_) => ProbeOutcome::Miss,
    }
}

/// Interesting status codes are hits, others misses, transport failures errors.
pub fn classify_status(result: Result<u16, String>) -> ProbeOutcome<u16> {
    match result {
        Ok(code) if HIT_STATUS_CODES.contains(&code) => ProbeOutcome::Hit(code),
        Ok(_) => ProbeOutcome::Miss,
        Err(cause) => ProbeOutcome::Error(cause),
    }
}

#[async_trait]
pub trait DnsProbe: Send + Sync {
    /// A-record resolution.
    async fn lookup_ipv4(&self, name: &str) -> Result<Vec<Ipv4Addr>, LookupFailure>;

    /// PTR resolution, returning the first hostname.
    async fn reverse(&self, ip: IpAddr) -> Result<String, LookupFailure>;
}

#[async_trait]
pub trait HttpProbe: Send + Sync {
    /// Issues a GET without following redirects and returns the status code.
    async fn status(&self, url: &str) -> Result<u16, String>;
}

#[async_trait]
pub trait WhoisProbe: Send + Sync {
    /// Returns the raw registry response for `domain`.
    async fn query(&self, domain: &str) -> Result<String, String>;
}

/// Source of the local machine's connection table.
pub trait ConnectionSource: Send + Sync {
    /// Remote endpoints of every connection that has one.
    fn remote_addresses(&self) -> crate::core::error::Result<Vec<SocketAddr>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_dns_failures_are_misses() {
        for failure in [
            LookupFailure::NoAnswer,
            LookupFailure::NxDomain,
            LookupFailure::Timeout,
            LookupFailure::NoNameservers,
        ] {
            assert_eq!(classify_lookup::<Ipv4Addr>(Err(failure)), ProbeOutcome::Miss);
        }
    }

    #[test]
    fn unexpected_dns_failure_is_error() {
        let outcome = classify_lookup::<Ipv4Addr>(Err(LookupFailure::Other("refused".into())));
        assert_eq!(outcome, ProbeOutcome::Error("refused".into()));
    }

    #[test]
    fn resolved_addresses_are_hits() {
        let addr = Ipv4Addr::new(192, 0, 2, 1);
        assert_eq!(classify_lookup(Ok(vec![addr])), ProbeOutcome::Hit(vec![addr]));
        assert_eq!(classify_lookup::<Ipv4Addr>(Ok(vec![])), ProbeOutcome::Miss);
    }

    #[test]
    fn status_classification() {
        for code in [200, 301, 302, 403] {
            assert!(classify_status(Ok(code)).is_hit());
        }
        for code in [204, 307, 401, 404, 500] {
            assert_eq!(classify_status(Ok(code)), ProbeOutcome::Miss);
        }
        assert_eq!(
            classify_status(Err("connection refused".into())),
            ProbeOutcome::Error("connection refused".into())
        );
    }
}
