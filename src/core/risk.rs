// src/core/risk.rs

use crate::core::models::{DeviceType, HostRecord};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

pub type DeviceStats = BTreeMap<DeviceType, usize>;

const ALERT_WEIGHT: usize = 10;
const COMPONENT_CAP: usize = 50;

/// Counts hosts per device type; every type is present, even at zero.
pub fn device_stats(hosts: &[HostRecord]) -> DeviceStats {
    let mut stats: DeviceStats = DeviceType::iter().map(|t| (t, 0)).collect();
    for host in hosts {
        *stats.entry(host.device_type).or_default() += 1;
    }
    stats
}

/// Bounded 0..=100 heuristic: up to 50 from alerts (10 each), up to 50 from
/// the number of devices.
pub fn risk_score(alert_count: usize, stats: &DeviceStats) -> u8 {
    let alerts = alert_count.saturating_mul(ALERT_WEIGHT).min(COMPONENT_CAP);
    let devices = stats.values().fold(0usize, |acc, n| acc.saturating_add(*n)).min(COMPONENT_CAP);
    // Both components are capped at 50, so the sum fits.
    (alerts + devices) as u8
}
