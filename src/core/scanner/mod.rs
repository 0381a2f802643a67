// src/core/scanner/mod.rs

// This file acts as the public interface for the `scanner` module.
// It declares the four scanner variants and the contract they share.
pub mod directory_scanner;
pub mod lookup_scanner;
pub mod network_scanner;
pub mod subdomain_scanner;

pub use self::directory_scanner::DirectoryEnumerator;
pub use self::lookup_scanner::NslookupWhoisLookup;
pub use self::network_scanner::NetworkScanner;
pub use self::subdomain_scanner::SubdomainEnumerator;

use crate::core::error::Result;
use crate::core::models::ScanResult;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use futures::stream::{self, StreamExt};
use std::future::Future;
use tokio::sync::watch;

/// The capability every scanner exposes.
///
/// Scanners carry no state across invocations beyond what is injected into
/// them (the known-hosts store for the network scanner).
#[async_trait]
pub trait Scanner: Send + Sync {
    fn name(&self) -> &'static str;

    /// When the scanner was constructed.
    fn created_at(&self) -> DateTime<Local>;

    /// Human-readable description of what is being scanned, if anything.
    fn target(&self) -> Option<String> {
        None
    }

    async fn run(&self) -> Result<ScanResult>;
}

/// Cooperative cancellation for the enumerators' worker pools.
///
/// Once cancelled, no further probes are started and the run returns what it
/// has gathered so far.
#[derive(Debug, Clone)]
pub struct CancelToken {
    sender: std::sync::Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender: std::sync::Arc::new(sender) }
    }
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolves once `cancel` has been called.
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so `wait_for` cannot see a closed channel.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

/// Runs `probe` over `items` with at most `concurrency` in flight.
///
/// Output order follows input order. Stops early on cancellation; whatever was
/// completed by then is returned.
pub(crate) async fn probe_all<I, T, F, Fut>(items: Vec<I>, concurrency: usize, cancel: &CancelToken, probe: F) -> Vec<T>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = T>,
{
    stream::iter(items)
        .map(probe)
        .buffered(concurrency.max(1))
        .take_until(cancel.cancelled())
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn probe_all_preserves_input_order() {
        let items = vec![30u64, 10, 20];
        let out = probe_all(items, 3, &CancelToken::new(), |ms| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            ms
        })
        .await;
        assert_eq!(out, vec![30, 10, 20]);
    }

    #[tokio::test]
    async fn cancelled_before_start_yields_nothing() {
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(cancel.is_cancelled());
        let out = probe_all(vec![1, 2, 3], 2, &cancel, |n| async move { n }).await;
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn cancellation_keeps_partial_results() {
        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        let out = probe_all((0..100u64).collect(), 1, &cancel, move |n| {
            let trigger = trigger.clone();
            async move {
                if n == 2 {
                    trigger.cancel();
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
                n
            }
        })
        .await;
        assert!(out.len() < 100);
        assert_eq!(out[..2], [0u64, 1]);
    }
}
