//! Single-shot last-resort trigger

use crate::{
    ledger::{AvailableNetworkLedger, ObserveOutcome},
    FailureClass, Target, WatchdogConfig,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use uuid::Uuid;
use wlan_common::{NetworkProfile, ProfileId, ScanEntry};

/// Record of one fired trigger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryTrigger {
    /// Trigger id
    pub id: Uuid,
    /// Wall-clock time the trigger fired
    pub fired_at: DateTime<Utc>,
    /// BSSIDs tracked at the time, all over threshold
    pub tracked: usize,
    /// Failure that tipped the evaluation
    pub last_failure: FailureClass,
}

/// Decides when the neighborhood is unreachable
///
/// Owns the ledger so that failure accounting and trigger evaluation always
/// see the same state.
#[derive(Debug)]
pub struct RecoveryWatchdog {
    ledger: AvailableNetworkLedger,
    /// May still trigger in this arm cycle
    armed: bool,
    /// Associated; suppresses triggering
    associated: bool,
    /// Most recent triggers, bounded by `history_limit`
    history: VecDeque<RecoveryTrigger>,
}

impl RecoveryWatchdog {
    /// Create an armed, disassociated watchdog
    pub fn new(config: WatchdogConfig) -> Self {
        Self {
            ledger: AvailableNetworkLedger::new(config),
            armed: true,
            associated: false,
            history: VecDeque::new(),
        }
    }

    /// Fold a scan batch into the ledger; re-arms when a new BSSID appears
    pub fn observe(
        &mut self,
        entries: &[ScanEntry],
        profiles: &BTreeMap<ProfileId, NetworkProfile>,
    ) -> ObserveOutcome {
        let outcome = self.ledger.observe(entries, profiles);
        if outcome.new_bssids > 0 && !self.armed {
            tracing::info!(new_bssids = outcome.new_bssids, "new access points available, watchdog re-armed");
            self.armed = true;
        }
        outcome
    }

    /// Count a failure and evaluate; returns whether recovery fired
    pub fn note_failure(&mut self, target: &Target, class: FailureClass) -> bool {
        if self.ledger.note_failure(target, class) == 0 {
            return false;
        }
        self.evaluate(class)
    }

    fn evaluate(&mut self, last_failure: FailureClass) -> bool {
        if !self.armed || self.associated {
            return false;
        }
        if !self.ledger.all_over_threshold() {
            return false;
        }
        if !self.ledger.any_ever_connected() {
            tracing::debug!("all access points failing, but none has ever connected");
            return false;
        }

        self.armed = false;
        let trigger = RecoveryTrigger {
            id: Uuid::new_v4(),
            fired_at: Utc::now(),
            tracked: self.ledger.len(),
            last_failure,
        };
        tracing::warn!(
            id = %trigger.id,
            tracked = trigger.tracked,
            %last_failure,
            "all available access points failing, triggering last-resort recovery"
        );
        if self.history.len() >= self.ledger.config().history_limit {
            self.history.pop_front();
        }
        self.history.push_back(trigger);
        true
    }

    /// Association state changed
    ///
    /// Leaving the associated state re-arms the watchdog. Entering it clears
    /// every failure counter, since a connection just succeeded.
    pub fn on_associated_state_changed(&mut self, associated: bool) {
        let was = std::mem::replace(&mut self.associated, associated);
        match (was, associated) {
            (false, true) => {
                if !self.armed {
                    tracing::info!("connected after last-resort recovery");
                }
                self.ledger.clear_failures();
            }
            (true, false) => {
                if !self.armed {
                    tracing::debug!("disassociated, watchdog re-armed");
                }
                self.armed = true;
            }
            _ => {}
        }
    }

    /// Whether a trigger may still fire
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether the device is associated
    pub fn is_associated(&self) -> bool {
        self.associated
    }

    /// The ledger
    pub fn ledger(&self) -> &AvailableNetworkLedger {
        &self.ledger
    }

    /// Most recent triggers, oldest first
    pub fn history(&self) -> &VecDeque<RecoveryTrigger> {
        &self.history
    }

    /// Latest trigger, if any has fired
    pub fn last_trigger(&self) -> Option<&RecoveryTrigger> {
        self.history.back()
    }
}

impl Default for RecoveryWatchdog {
    fn default() -> Self {
        Self::new(WatchdogConfig::default())
    }
}
