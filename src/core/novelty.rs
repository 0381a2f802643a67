// src/core/novelty.rs

//! "New device" detection across network scans.

use crate::core::models::Alert;
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::info;

/// Every host IP observed since the store was created.
///
/// The set only grows. It is the sole memory behind new-device alerts and is
/// shared by all network scans of one service, so it is injected rather than
/// global. The diff and the merge happen under one lock, which keeps
/// overlapping scans from losing updates.
#[derive(Debug, Default)]
pub struct KnownHosts {
    seen: Mutex<HashSet<String>>,
}

impl KnownHosts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an already-known set.
    pub fn seeded<I, S>(ips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { seen: Mutex::new(ips.into_iter().map(Into::into).collect()) }
    }

    /// Alerts for every IP not seen before, then remembers all of them.
    ///
    /// `ips` should already be unique; a repeat inside one call still alerts once.
    pub fn observe<'a, I>(&self, ips: I) -> Vec<Alert>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut alerts = Vec::new();
        for ip in ips {
            if seen.insert(ip.to_string()) {
                alerts.push(Alert::new_device(ip));
            }
        }
        if !alerts.is_empty() {
            info!(new = alerts.len(), known = seen.len(), "New devices detected.");
        }
        alerts
    }

    pub fn contains(&self, ip: &str) -> bool {
        self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).contains(ip)
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unseen_hosts_alert() {
        let known = KnownHosts::new();
        let first = known.observe(["10.0.0.1", "10.0.0.2"]);
        assert_eq!(first.len(), 2);

        let second = known.observe(["10.0.0.1", "10.0.0.3"]);
        assert_eq!(second, vec![Alert::new_device("10.0.0.3")]);

        // Absent from the last run but never forgotten.
        assert!(known.contains("10.0.0.2"));
        assert_eq!(known.len(), 3);
    }

    #[test]
    fn seeded_hosts_do_not_alert() {
        let known = KnownHosts::seeded(["192.168.1.1"]);
        assert!(known.observe(["192.168.1.1"]).is_empty());
    }
}
