//! OpenWLAN Last-Resort Recovery
//!
//! Tracks which access points were recently available and how often
//! connecting to each of them failed, and raises a single recovery trigger
//! when every one of them looks unreachable.
//!
//! # Trigger Conditions
//!
//! | Condition | Why it must hold |
//! |-----------|------------------|
//! | Every tracked BSSID over threshold on some failure class | No usable network nearby |
//! | Some tracked BSSID has connected before | Failures are not just bad credentials |
//! | Not associated | A working link exists otherwise |
//! | Watchdog armed | At most one trigger per arm cycle |

#![warn(missing_docs)]

pub mod ledger;
pub mod watchdog;

pub use ledger::{AvailableNetworkLedger, AvailableNetworkRecord, FailureCounts, ObserveOutcome};
pub use watchdog::{RecoveryTrigger, RecoveryWatchdog};

use serde::{Deserialize, Serialize};
use std::fmt;
use wlan_common::{Bssid, Ssid, WlanError, WlanResult};

/// Class of connection failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// Association rejected or timed out
    Association,
    /// Authentication failed
    Authentication,
    /// No address obtained
    Dhcp,
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Association => write!(f, "association"),
            Self::Authentication => write!(f, "authentication"),
            Self::Dhcp => write!(f, "dhcp"),
        }
    }
}

/// Which records a failure applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// One access point
    Specific(Bssid),
    /// Every tracked access point of this network
    AnySsid(Ssid),
}

/// Watchdog thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Consecutive scans a BSSID may be missing before it is forgotten
    pub max_age: u32,
    /// Association failures that make a BSSID count as unreachable
    pub association_threshold: u32,
    /// Authentication failures that make a BSSID count as unreachable
    pub authentication_threshold: u32,
    /// DHCP failures that make a BSSID count as unreachable
    pub dhcp_threshold: u32,
    /// Fired triggers kept in memory, oldest dropped first
    pub history_limit: usize,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            max_age: 10,
            association_threshold: 7,
            authentication_threshold: 7,
            dhcp_threshold: 7,
            history_limit: 32,
        }
    }
}

impl WatchdogConfig {
    /// Threshold for a failure class
    pub const fn threshold(&self, class: FailureClass) -> u32 {
        match class {
            FailureClass::Association => self.association_threshold,
            FailureClass::Authentication => self.authentication_threshold,
            FailureClass::Dhcp => self.dhcp_threshold,
        }
    }

    /// Reject zero thresholds and ages
    pub fn validate(&self) -> WlanResult<()> {
        if self.max_age == 0 {
            return Err(WlanError::Config("max_age must be at least 1".into()));
        }
        if self.history_limit == 0 {
            return Err(WlanError::Config("history_limit must be at least 1".into()));
        }
        for class in [FailureClass::Association, FailureClass::Authentication, FailureClass::Dhcp] {
            if self.threshold(class) == 0 {
                return Err(WlanError::Config(format!("{class} threshold must be at least 1")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = WatchdogConfig::default();
        config.validate().unwrap();
        assert_eq!(config.threshold(FailureClass::Dhcp), 7);
        assert_eq!(config.max_age, 10);
    }

    #[test]
    fn test_validate_rejects_zero() {
        let config = WatchdogConfig {
            dhcp_threshold: 0,
            ..WatchdogConfig::default()
        };
        assert!(config.validate().is_err());

        let config = WatchdogConfig {
            history_limit: 0,
            ..WatchdogConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_target_json() {
        let target: Target = serde_json::from_str(r#"{"any_ssid": "home"}"#).unwrap();
        assert_eq!(target, Target::AnySsid(Ssid::try_from("home").unwrap()));

        let target: Target = serde_json::from_str(r#"{"specific": "00:11:22:33:44:55"}"#).unwrap();
        assert!(matches!(target, Target::Specific(_)));

        // Non-UTF-8 network names must come back byte for byte
        let raw = Target::AnySsid(Ssid::new(vec![b'n', 0xfe, 0xff]).unwrap());
        let json = serde_json::to_string(&raw).unwrap();
        assert_eq!(serde_json::from_str::<Target>(&json).unwrap(), raw);
    }
}
