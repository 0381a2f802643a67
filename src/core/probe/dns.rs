// src/core/probe/dns.rs

use super::{DnsProbe, LookupFailure};
use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::error::ProtoErrorKind;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::TokioAsyncResolver;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tracing::{debug, warn};

/// DNS probe backed by a Tokio hickory resolver.
///
/// Every query is bounded twice: by the resolver's own per-attempt timeout and
/// by an outer `tokio::time::timeout` acting as the lifetime cap.
pub struct HickoryDns {
    resolver: TokioAsyncResolver,
    lifetime: Duration,
}

impl HickoryDns {
    pub fn new(timeout: Duration) -> Self {
        let (config, mut opts) = match hickory_resolver::system_conf::read_system_conf() {
            Ok(conf) => conf,
            Err(e) => {
                warn!(error = %e, "Could not read system resolver config, using defaults.");
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };
        opts.timeout = timeout;
        opts.attempts = 1;

        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
            lifetime: timeout,
        }
    }
}

#[async_trait]
impl DnsProbe for HickoryDns {
    async fn lookup_ipv4(&self, name: &str) -> Result<Vec<Ipv4Addr>, LookupFailure> {
        // A literal resolves to itself; as a query name it would come back NXDOMAIN.
        if let Ok(ip) = name.trim().parse::<Ipv4Addr>() {
            return Ok(vec![ip]);
        }
        debug!(name, "Resolving A record.");
        match tokio::time::timeout(self.lifetime, self.resolver.ipv4_lookup(name)).await {
            Ok(Ok(lookup)) => Ok(lookup.iter().map(|a| a.0).collect()),
            Ok(Err(e)) => Err(classify_resolve_error(&e)),
            Err(_) => Err(LookupFailure::Timeout),
        }
    }

    async fn reverse(&self, ip: IpAddr) -> Result<String, LookupFailure> {
        debug!(%ip, "Reverse lookup.");
        match tokio::time::timeout(self.lifetime, self.resolver.reverse_lookup(ip)).await {
            Ok(Ok(lookup)) => lookup
                .iter()
                .next()
                .map(|ptr| ptr.0.to_utf8().trim_end_matches('.').to_string())
                .ok_or(LookupFailure::NoAnswer),
            Ok(Err(e)) => Err(classify_resolve_error(&e)),
            Err(_) => Err(LookupFailure::Timeout),
        }
    }
}

fn classify_resolve_error(error: &ResolveError) -> LookupFailure {
    match error.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } if *response_code == ResponseCode::NXDomain => {
            LookupFailure::NxDomain
        }
        ResolveErrorKind::NoRecordsFound { .. } => LookupFailure::NoAnswer,
        ResolveErrorKind::Timeout => LookupFailure::Timeout,
        ResolveErrorKind::NoConnections => LookupFailure::NoNameservers,
        ResolveErrorKind::Proto(proto) if matches!(proto.kind(), ProtoErrorKind::Timeout) => LookupFailure::Timeout,
        _ => LookupFailure::Other(error.to_string()),
    }
}
