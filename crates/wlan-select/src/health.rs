//! Short-term BSSID exclusion

use std::collections::HashMap;
use std::time::Duration;
use wlan_common::{Bssid, Timestamp};

/// Health state of one BSSID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BssidHealthRecord {
    /// Consecutive failures, saturating at the strike threshold
    pub strikes: u32,
    /// Excluded until this time, absent while selectable
    pub disabled_until: Option<Timestamp>,
    /// Last time a failure was counted
    pub last_touched: Timestamp,
}

impl BssidHealthRecord {
    fn is_excluded(&self, now: Timestamp) -> bool {
        self.disabled_until.is_some_and(|until| now < until)
    }

    fn is_stale(&self, now: Timestamp, expiry: Duration) -> bool {
        match self.disabled_until {
            Some(until) => now >= until,
            None => now.saturating_since(self.last_touched) >= expiry,
        }
    }
}

/// Per-BSSID strike counter with timed exclusion
///
/// Expiry is evaluated against the timestamp passed into each call, so an
/// exclusion lapses on its own without any scheduled cleanup.
#[derive(Debug)]
pub struct BssidHealthTracker {
    records: HashMap<Bssid, BssidHealthRecord>,
    strike_threshold: u32,
    disable_duration: Duration,
}

impl BssidHealthTracker {
    /// Create tracker
    pub fn new(strike_threshold: u32, disable_duration: Duration) -> Self {
        Self {
            records: HashMap::new(),
            strike_threshold: strike_threshold.max(1),
            disable_duration,
        }
    }

    /// Count one failure; returns whether the BSSID is now excluded
    pub fn disable(&mut self, bssid: Bssid, now: Timestamp) -> bool {
        let expiry = self.disable_duration;
        if self
            .records
            .get(&bssid)
            .is_some_and(|r| r.is_stale(now, expiry))
        {
            self.records.remove(&bssid);
        }

        let record = self.records.entry(bssid).or_insert(BssidHealthRecord {
            strikes: 0,
            disabled_until: None,
            last_touched: now,
        });
        record.strikes = (record.strikes + 1).min(self.strike_threshold);
        record.last_touched = now;

        if record.strikes >= self.strike_threshold && record.disabled_until.is_none() {
            record.disabled_until = Some(now.saturating_add(expiry));
            tracing::info!(%bssid, strikes = record.strikes, "BSSID excluded from selection");
        }
        record.is_excluded(now)
    }

    /// Clear strikes and exclusion
    pub fn enable(&mut self, bssid: Bssid) {
        if self.records.remove(&bssid).is_some() {
            tracing::debug!(%bssid, "BSSID re-enabled");
        }
    }

    /// Enable or count a failure
    pub fn set_enabled(&mut self, bssid: Bssid, enabled: bool, now: Timestamp) {
        if enabled {
            self.enable(bssid);
        } else {
            self.disable(bssid, now);
        }
    }

    /// Whether the BSSID is currently excluded
    pub fn is_disabled(&self, bssid: &Bssid, now: Timestamp) -> bool {
        self.records.get(bssid).is_some_and(|r| r.is_excluded(now))
    }

    /// Current record, if any
    pub fn record(&self, bssid: &Bssid) -> Option<BssidHealthRecord> {
        self.records.get(bssid).copied()
    }

    /// Drop lapsed exclusions and strike counts left untouched past the expiry
    pub fn prune(&mut self, now: Timestamp) -> usize {
        let expiry = self.disable_duration;
        let before = self.records.len();
        self.records.retain(|_, r| !r.is_stale(now, expiry));
        before - self.records.len()
    }

    /// Number of tracked BSSIDs
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl Default for BssidHealthTracker {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(5 * 60))
    }
}
