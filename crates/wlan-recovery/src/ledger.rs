//! Rolling record of recently available access points and their failures

use crate::{FailureClass, Target, WatchdogConfig};
use std::collections::{BTreeMap, HashMap, HashSet};
use wlan_common::{Bssid, NetworkProfile, ProfileId, ScanEntry, Ssid};

/// Failure counters for one BSSID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FailureCounts {
    /// Association failures
    pub association: u32,
    /// Authentication failures
    pub authentication: u32,
    /// DHCP failures
    pub dhcp: u32,
}

impl FailureCounts {
    /// Counter for a class
    pub const fn get(&self, class: FailureClass) -> u32 {
        match class {
            FailureClass::Association => self.association,
            FailureClass::Authentication => self.authentication,
            FailureClass::Dhcp => self.dhcp,
        }
    }

    fn increment(&mut self, class: FailureClass) {
        let counter = match class {
            FailureClass::Association => &mut self.association,
            FailureClass::Authentication => &mut self.authentication,
            FailureClass::Dhcp => &mut self.dhcp,
        };
        *counter = counter.saturating_add(1);
    }

    /// Whether any class reached its threshold
    pub fn is_over_threshold(&self, config: &WatchdogConfig) -> bool {
        [FailureClass::Association, FailureClass::Authentication, FailureClass::Dhcp]
            .into_iter()
            .any(|class| self.get(class) >= config.threshold(class))
    }

    /// Sum of all classes
    pub const fn total(&self) -> u32 {
        self.association
            .saturating_add(self.authentication)
            .saturating_add(self.dhcp)
    }
}

/// One recently available BSSID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableNetworkRecord {
    /// Network name last seen for the BSSID
    pub ssid: Ssid,
    /// Scans since last observed
    pub age: u32,
    /// Failure counters
    pub failures: FailureCounts,
    /// Whether its profile has ever connected; `None` when it has no profile
    pub ever_connected: Option<bool>,
}

/// Result of folding one scan batch into the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObserveOutcome {
    /// BSSIDs that were not tracked before this batch
    pub new_bssids: usize,
    /// BSSIDs forgotten because they aged out
    pub evicted: usize,
}

/// Age-bounded map of recently observed BSSIDs
///
/// A record is forgotten, failures included, once its BSSID has been missing
/// from `max_age` consecutive batches.
#[derive(Debug)]
pub struct AvailableNetworkLedger {
    records: HashMap<Bssid, AvailableNetworkRecord>,
    config: WatchdogConfig,
}

impl AvailableNetworkLedger {
    /// Create empty ledger
    pub fn new(config: WatchdogConfig) -> Self {
        Self {
            records: HashMap::new(),
            config,
        }
    }

    /// Thresholds in use
    pub fn config(&self) -> &WatchdogConfig {
        &self.config
    }

    /// Fold a scan batch into the ledger
    pub fn observe(
        &mut self,
        entries: &[ScanEntry],
        profiles: &BTreeMap<ProfileId, NetworkProfile>,
    ) -> ObserveOutcome {
        let mut outcome = ObserveOutcome::default();
        let mut seen = HashSet::with_capacity(entries.len());

        for entry in entries {
            let observation = &entry.observation;
            let ever_connected = entry
                .profile
                .and_then(|id| profiles.get(&id))
                .map(|p| p.has_ever_connected);

            match self.records.get_mut(&observation.bssid) {
                Some(record) => {
                    record.age = 0;
                    record.ssid = observation.ssid.clone();
                    // A second entry for the same BSSID in one batch only upgrades the snapshot
                    if !seen.contains(&observation.bssid) || ever_connected.is_some() {
                        record.ever_connected = ever_connected;
                    }
                }
                None => {
                    tracing::debug!(bssid = %observation.bssid, ssid = %observation.ssid, "tracking new BSSID");
                    self.records.insert(
                        observation.bssid,
                        AvailableNetworkRecord {
                            ssid: observation.ssid.clone(),
                            age: 0,
                            failures: FailureCounts::default(),
                            ever_connected,
                        },
                    );
                    outcome.new_bssids += 1;
                }
            }
            seen.insert(observation.bssid);
        }

        let max_age = self.config.max_age;
        self.records.retain(|bssid, record| {
            if seen.contains(bssid) {
                return true;
            }
            record.age = record.age.saturating_add(1);
            if record.age >= max_age {
                tracing::debug!(%bssid, failures = record.failures.total(), "forgetting aged-out BSSID");
                outcome.evicted += 1;
                false
            } else {
                true
            }
        });

        outcome
    }

    /// Count a failure; returns how many records were incremented
    ///
    /// Targets that match nothing are ignored and never create records.
    pub fn note_failure(&mut self, target: &Target, class: FailureClass) -> usize {
        match target {
            Target::Specific(bssid) => match self.records.get_mut(bssid) {
                Some(record) => {
                    record.failures.increment(class);
                    1
                }
                None => {
                    tracing::debug!(%bssid, %class, "failure for untracked BSSID ignored");
                    0
                }
            },
            Target::AnySsid(ssid) => {
                let mut touched = 0;
                for record in self.records.values_mut().filter(|r| &r.ssid == ssid) {
                    record.failures.increment(class);
                    touched += 1;
                }
                if touched == 0 {
                    tracing::debug!(%ssid, %class, "failure for untracked SSID ignored");
                }
                touched
            }
        }
    }

    /// Reset every failure counter, keeping the records
    pub fn clear_failures(&mut self) {
        for record in self.records.values_mut() {
            record.failures = FailureCounts::default();
        }
    }

    /// Whether every tracked record is over threshold on some class
    ///
    /// False for an empty ledger.
    pub fn all_over_threshold(&self) -> bool {
        !self.records.is_empty()
            && self
                .records
                .values()
                .all(|r| r.failures.is_over_threshold(&self.config))
    }

    /// Whether some tracked record's profile has ever connected
    pub fn any_ever_connected(&self) -> bool {
        self.records.values().any(|r| r.ever_connected == Some(true))
    }

    /// Record for a BSSID
    pub fn get(&self, bssid: &Bssid) -> Option<&AvailableNetworkRecord> {
        self.records.get(bssid)
    }

    /// Tracked records
    pub fn iter(&self) -> impl Iterator<Item = (&Bssid, &AvailableNetworkRecord)> {
        self.records.iter()
    }

    /// Number of tracked BSSIDs
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for AvailableNetworkLedger {
    fn default() -> Self {
        Self::new(WatchdogConfig::default())
    }
}
