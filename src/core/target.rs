// src/core/target.rs

//! Target normalization shared by all scanners.
//!
//! Both normalizers are idempotent: feeding their output back in yields the
//! same value.

use std::fmt;
use url::Url;

/// A normalized identity to probe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScanTarget {
    /// `scheme://host[/path]`, never ending in `/`.
    Url(String),
    /// Lowercased host name, no scheme, no path.
    Domain(String),
}

impl ScanTarget {
    pub fn url(raw: &str) -> Self {
        Self::Url(normalize_url(raw))
    }

    pub fn domain(raw: &str) -> Self {
        Self::Domain(normalize_domain(raw))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Url(s) | Self::Domain(s) => s,
        }
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn has_scheme(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Prepends `http://` when no scheme is given and strips trailing slashes.
///
/// Only slashes after the scheme separator are stripped, so degenerate input
/// such as `""` or `"/"` settles on a bare `http://`.
pub fn normalize_url(raw: &str) -> String {
    let value = raw.trim();
    let with_scheme = if has_scheme(value) {
        value.to_string()
    } else {
        format!("http://{value}")
    };
    match with_scheme.split_once("://") {
        Some((scheme, rest)) => format!("{scheme}://{}", rest.trim_end_matches('/')),
        None => with_scheme,
    }
}

/// Reduces a URL or bare domain to a lowercased host name.
pub fn normalize_domain(raw: &str) -> String {
    let value = raw.trim().to_lowercase();

    if has_scheme(&value) {
        if let Some(host) = Url::parse(&value).ok().and_then(|url| url.host_str().map(String::from)) {
            return host;
        }
        return value.trim_end_matches('/').to_string();
    }

    // Anything after the first slash is a path, not part of the name.
    let host = value.split('/').next().unwrap_or_default();
    host.to_string()
}
