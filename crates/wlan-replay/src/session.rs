//! Recorded sessions and their replay

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use wlan_common::{Bssid, Candidate, InMemoryProfileStore, ManualClock, NetworkProfile, ScanEntry};
use wlan_engine::{EngineConfig, SelectionEngine};
use wlan_recovery::{FailureClass, RecoveryTrigger, Target};
use wlan_select::SelectionContext;

/// A recorded session: saved profiles plus the events seen by the device
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    /// Saved profiles at the start of the session
    #[serde(default)]
    pub profiles: Vec<NetworkProfile>,
    /// Events in order
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One recorded event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Scan results arrived
    Scan(Vec<ScanEntry>),
    /// A connection attempt failed
    Failure {
        /// What the attempt targeted
        target: Target,
        /// How it failed
        class: FailureClass,
    },
    /// Association state changed
    Associated(bool),
    /// Run selection over the latest scan batch
    Select(SelectionContext),
    /// Clear a BSSID's exclusion
    EnableBssid(Bssid),
    /// Count one failure against a BSSID
    DisableBssid(Bssid),
    /// Move the clock forward
    AdvanceMs(u64),
}

/// Observable outcome of one step
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Scan batch folded into the recovery ledger
    Observed {
        /// Step index
        step: usize,
        /// BSSIDs not tracked before
        new_bssids: usize,
        /// BSSIDs that aged out
        evicted: usize,
    },
    /// Selection result
    Selected {
        /// Step index
        step: usize,
        /// Chosen candidate, if any
        candidate: Option<Candidate>,
    },
    /// Last-resort recovery fired
    Triggered {
        /// Step index
        step: usize,
        /// Trigger record
        trigger: RecoveryTrigger,
    },
}

/// Drives a session through a fresh engine on a manual clock
pub struct Replay {
    engine: SelectionEngine,
    clock: Arc<ManualClock>,
    last_scan: Vec<ScanEntry>,
}

impl Replay {
    /// Engine seeded with the session's profiles
    pub fn new(config: EngineConfig, profiles: Vec<NetworkProfile>) -> anyhow::Result<Self> {
        let store = Arc::new(InMemoryProfileStore::with_profiles(profiles));
        let clock = Arc::new(ManualClock::new(0));
        let engine = SelectionEngine::new(config, store, clock.clone())?;
        Ok(Self {
            engine,
            clock,
            last_scan: Vec::new(),
        })
    }

    /// Apply one step; returns the event it produced, if any
    pub fn apply(&mut self, index: usize, step: Step) -> Option<Event> {
        tracing::debug!(step = index, ?step, "replaying");
        match step {
            Step::Scan(entries) => {
                let outcome = self.engine.observe_available_networks(&entries);
                self.last_scan = entries;
                Some(Event::Observed {
                    step: index,
                    new_bssids: outcome.new_bssids,
                    evicted: outcome.evicted,
                })
            }
            Step::Failure { target, class } => {
                if !self.engine.note_connection_failure(&target, class) {
                    return None;
                }
                let trigger = self.engine.last_recovery_trigger()?;
                Some(Event::Triggered {
                    step: index,
                    trigger,
                })
            }
            Step::Associated(associated) => {
                self.engine.on_associated_state_changed(associated);
                None
            }
            Step::Select(context) => Some(Event::Selected {
                step: index,
                candidate: self.engine.select_best_candidate(&self.last_scan, &context),
            }),
            Step::EnableBssid(bssid) => {
                self.engine.enable_bssid(bssid, true);
                None
            }
            Step::DisableBssid(bssid) => {
                self.engine.enable_bssid(bssid, false);
                None
            }
            Step::AdvanceMs(ms) => {
                self.clock.advance(Duration::from_millis(ms));
                None
            }
        }
    }

    /// Replay every step of a session
    pub fn run(config: EngineConfig, session: Session) -> anyhow::Result<Vec<Event>> {
        let mut replay = Self::new(config, session.profiles)?;
        Ok(session
            .steps
            .into_iter()
            .enumerate()
            .filter_map(|(index, step)| replay.apply(index, step))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION: &str = r#"{
        "profiles": [
            {"id": 1, "ssid": "home", "security": "psk", "has_ever_connected": true}
        ],
        "steps": [
            {"scan": [
                {"observation": {"ssid": "home", "bssid": "02:00:00:00:00:01",
                    "frequency": 5180, "rssi": -60, "capabilities": "[WPA2-PSK-CCMP][ESS]"},
                 "profile": 1},
                {"observation": {"ssid": "home", "bssid": "02:00:00:00:00:02",
                    "frequency": 2437, "rssi": -55, "capabilities": "[WPA2-PSK-CCMP][ESS]"},
                 "profile": 1}
            ]},
            {"select": {}},
            {"disable_bssid": "02:00:00:00:00:01"},
            {"disable_bssid": "02:00:00:00:00:01"},
            {"disable_bssid": "02:00:00:00:00:01"},
            {"select": {}},
            {"advance_ms": 300000},
            {"select": {}}
        ]
    }"#;

    fn selected(events: &[Event]) -> Vec<Option<String>> {
        events
            .iter()
            .filter_map(|event| match event {
                Event::Selected { candidate, .. } => {
                    Some(candidate.as_ref().map(|c| c.bssid().to_string()))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_replay_blacklist_session() {
        let session: Session = serde_json::from_str(SESSION).unwrap();
        let events = Replay::run(EngineConfig::default(), session).unwrap();

        assert!(matches!(
            events[0],
            Event::Observed {
                new_bssids: 2,
                evicted: 0,
                ..
            }
        ));
        assert_eq!(
            selected(&events),
            vec![
                Some("02:00:00:00:00:01".to_string()),
                Some("02:00:00:00:00:02".to_string()),
                Some("02:00:00:00:00:01".to_string()),
            ]
        );
    }

    #[test]
    fn test_replay_reports_trigger_once() {
        let mut session: Session = serde_json::from_str(SESSION).unwrap();
        session.steps.truncate(1);
        let bssids = ["02:00:00:00:00:01", "02:00:00:00:00:02"];
        for bssid in bssids {
            for _ in 0..8 {
                session.steps.push(Step::Failure {
                    target: Target::Specific(bssid.parse().unwrap()),
                    class: FailureClass::Dhcp,
                });
            }
        }

        let events = Replay::run(EngineConfig::default(), session).unwrap();
        let triggers: Vec<_> = events
            .iter()
            .filter(|event| matches!(event, Event::Triggered { .. }))
            .collect();
        assert_eq!(triggers.len(), 1);
    }

    #[test]
    fn test_select_without_scan_is_empty() {
        let mut replay = Replay::new(EngineConfig::default(), Vec::new()).unwrap();
        let event = replay.apply(0, Step::Select(SelectionContext::disconnected()));
        assert!(matches!(
            event,
            Some(Event::Selected {
                candidate: None,
                ..
            })
        ));
        assert_eq!(replay.engine.tracked_networks(), 0);
    }
}
