//! OpenWLAN Engine - Selection and recovery behind one lock
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      SELECTION ENGINE                        │
//! │                                                              │
//! │   scan batch ──┬──▶ NetworkSelector ──▶ Option<Candidate>    │
//! │                │        │                                    │
//! │                │        └── BssidHealthTracker               │
//! │                │                                             │
//! │                └──▶ RecoveryWatchdog                         │
//! │                         └── AvailableNetworkLedger           │
//! │                                                              │
//! │   connection failure ──▶ ledger counters ──▶ trigger?        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every entry point takes the same mutex, so a trigger evaluation can never
//! interleave with a scan batch being folded into the ledger.

#![warn(missing_docs)]

pub mod config;

pub use config::EngineConfig;

use parking_lot::Mutex;
use std::sync::Arc;
use wlan_common::{
    Bssid, Candidate, Clock, ProfileStore, ScanEntry, SystemClock, WlanResult,
};
use wlan_recovery::{FailureClass, ObserveOutcome, RecoveryTrigger, RecoveryWatchdog, Target};
use wlan_select::{BssidHealthTracker, NetworkSelector, SelectionContext};

/// Mutable state guarded by the engine lock
#[derive(Debug)]
struct EngineState {
    selector: NetworkSelector,
    health: BssidHealthTracker,
    watchdog: RecoveryWatchdog,
}

/// Access point selection and last-resort recovery
pub struct SelectionEngine {
    config: EngineConfig,
    store: Arc<dyn ProfileStore>,
    clock: Arc<dyn Clock>,
    state: Mutex<EngineState>,
}

impl SelectionEngine {
    /// Create engine with an explicit clock
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn ProfileStore>,
        clock: Arc<dyn Clock>,
    ) -> WlanResult<Self> {
        config.validate()?;
        tracing::debug!(?config, "selection engine created");
        let selection = config.selection;
        Ok(Self {
            config,
            store,
            clock,
            state: Mutex::new(EngineState {
                selector: NetworkSelector::new(selection),
                health: BssidHealthTracker::new(
                    selection.bssid_strike_threshold,
                    selection.bssid_disable_duration(),
                ),
                watchdog: RecoveryWatchdog::new(config.watchdog),
            }),
        })
    }

    /// Create engine on the system clock
    pub fn with_store(config: EngineConfig, store: Arc<dyn ProfileStore>) -> WlanResult<Self> {
        Self::new(config, store, Arc::new(SystemClock::new()))
    }

    /// Configuration in use
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Pick at most one candidate from a scan batch
    pub fn select_best_candidate(
        &self,
        entries: &[ScanEntry],
        context: &SelectionContext,
    ) -> Option<Candidate> {
        let now = self.clock.now();
        let mut state = self.state.lock();
        let EngineState {
            selector, health, ..
        } = &mut *state;

        health.prune(now);
        let selected = selector.select(entries, self.store.as_ref(), health, context, now);

        match &selected {
            Some(_) => metrics::counter!("wlan_selection_total").increment(1),
            None => metrics::counter!("wlan_selection_none_total").increment(1),
        }
        selected
    }

    /// Re-enable a BSSID, or count one failure against it
    pub fn enable_bssid(&self, bssid: Bssid, enabled: bool) {
        let now = self.clock.now();
        self.state.lock().health.set_enabled(bssid, enabled, now);
    }

    /// Whether a BSSID is excluded from selection right now
    pub fn is_bssid_disabled(&self, bssid: &Bssid) -> bool {
        let now = self.clock.now();
        self.state.lock().health.is_disabled(bssid, now)
    }

    /// Fold a scan batch into the recovery ledger
    pub fn observe_available_networks(&self, entries: &[ScanEntry]) -> ObserveOutcome {
        let profiles = self.store.snapshot();
        self.state.lock().watchdog.observe(entries, &profiles)
    }

    /// Count a connection failure; returns whether last-resort recovery fired
    pub fn note_connection_failure(&self, target: &Target, class: FailureClass) -> bool {
        let fired = self.state.lock().watchdog.note_failure(target, class);
        if fired {
            metrics::counter!("wlan_recovery_trigger_total").increment(1);
        }
        fired
    }

    /// Association state changed
    pub fn on_associated_state_changed(&self, associated: bool) {
        self.state.lock().watchdog.on_associated_state_changed(associated);
    }

    /// Whether the watchdog may still trigger
    pub fn is_recovery_armed(&self) -> bool {
        self.state.lock().watchdog.is_armed()
    }

    /// Number of BSSIDs in the recovery ledger
    pub fn tracked_networks(&self) -> usize {
        self.state.lock().watchdog.ledger().len()
    }

    /// Most recent triggers, oldest first
    pub fn recovery_history(&self) -> Vec<RecoveryTrigger> {
        self.state.lock().watchdog.history().iter().cloned().collect()
    }

    /// Latest trigger, if any has fired
    pub fn last_recovery_trigger(&self) -> Option<RecoveryTrigger> {
        self.state.lock().watchdog.last_trigger().cloned()
    }
}

impl std::fmt::Debug for SelectionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionEngine")
            .field("config", &self.config)
            .field("now", &self.clock.now())
            .finish_non_exhaustive()
    }
}
