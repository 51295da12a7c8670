//! Access Point Selector
//!
//! Picks at most one access point per scan cycle out of the observed batch.
//!
//! # Pipeline
//!
//! - BSSID exclusion and profile status filtering
//! - Saturated RSSI base score, band bonus and minimum-signal gate
//! - Security class and stickiness bonuses
//! - User connect-choice override
//! - Saved vs. opportunistic tie-break
//! - Hysteresis against the currently associated network

#![warn(missing_docs)]

pub mod health;
pub mod scorer;
pub mod selector;
pub mod tiebreak;

pub use health::{BssidHealthRecord, BssidHealthTracker};
pub use scorer::{CandidateScorer, CurrentNetwork, ScoreBreakdown};
pub use selector::{AssociatedNetwork, NetworkSelector, SelectionContext};
pub use tiebreak::OpportunisticTieBreaker;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use wlan_common::{Band, WlanError, WlanResult};

/// Per-band RSSI thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandThresholds {
    /// Signals above this (dBm) are scored as exactly this
    pub saturation_rssi: i32,
    /// Signals below this (dBm) are never selected
    pub minimum_rssi: i32,
    /// Added once the minimum is met
    pub bonus: i32,
}

impl BandThresholds {
    /// 2.4 GHz defaults
    pub const TWO_GHZ: Self = Self {
        saturation_rssi: -60,
        minimum_rssi: -85,
        bonus: 0,
    };

    /// 5 GHz defaults
    pub const FIVE_GHZ: Self = Self {
        saturation_rssi: -57,
        minimum_rssi: -82,
        bonus: 40,
    };
}

/// Scoring and blacklist parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Added to the saturated RSSI before scaling
    pub rssi_offset: i32,
    /// Points per dB
    pub rssi_slope: i32,
    /// 2.4 GHz thresholds (also used for unknown bands)
    pub two_ghz: BandThresholds,
    /// 5 GHz thresholds
    pub five_ghz: BandThresholds,
    /// PSK and enterprise profiles
    pub security_award: i32,
    /// Passpoint profiles
    pub passpoint_award: i32,
    /// Observation is the associated BSSID
    pub same_bssid_award: i32,
    /// Observation belongs to the associated (or a linked) profile
    pub same_network_award: i32,
    /// Minimum time between evaluations while associated, in milliseconds
    pub min_selection_interval_ms: u64,
    /// Consecutive failures before a BSSID is excluded
    pub bssid_strike_threshold: u32,
    /// How long an excluded BSSID stays excluded, in milliseconds
    pub bssid_disable_duration_ms: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            rssi_offset: 85,
            rssi_slope: 4,
            two_ghz: BandThresholds::TWO_GHZ,
            five_ghz: BandThresholds::FIVE_GHZ,
            security_award: 80,
            passpoint_award: 40,
            same_bssid_award: 24,
            same_network_award: 16,
            min_selection_interval_ms: 10_000,
            bssid_strike_threshold: 3,
            bssid_disable_duration_ms: 5 * 60 * 1000,
        }
    }
}

impl SelectionConfig {
    /// Largest accepted points-per-dB slope
    pub const MAX_RSSI_SLOPE: i32 = 100;
    /// Largest accepted magnitude for the RSSI offset
    pub const MAX_RSSI_OFFSET: i32 = 200;
    /// Largest accepted bonus or award
    pub const MAX_AWARD: i32 = 10_000;

    /// Thresholds for a band
    pub const fn band(&self, band: Band) -> BandThresholds {
        match band {
            Band::FiveGhz => self.five_ghz,
            Band::TwoGhz | Band::Unknown => self.two_ghz,
        }
    }

    /// Minimum interval between evaluations while associated
    pub fn min_selection_interval(&self) -> Duration {
        Duration::from_millis(self.min_selection_interval_ms)
    }

    /// BSSID exclusion duration
    pub fn bssid_disable_duration(&self) -> Duration {
        Duration::from_millis(self.bssid_disable_duration_ms)
    }

    /// Reject parameter combinations that would make scoring meaningless
    pub fn validate(&self) -> WlanResult<()> {
        if !(1..=Self::MAX_RSSI_SLOPE).contains(&self.rssi_slope) {
            return Err(WlanError::Config(format!(
                "rssi_slope must be within 1..={}",
                Self::MAX_RSSI_SLOPE
            )));
        }
        if !(-Self::MAX_RSSI_OFFSET..=Self::MAX_RSSI_OFFSET).contains(&self.rssi_offset) {
            return Err(WlanError::Config(format!(
                "rssi_offset must be within -{0}..={0}",
                Self::MAX_RSSI_OFFSET
            )));
        }
        let awards = [
            ("security_award", self.security_award),
            ("passpoint_award", self.passpoint_award),
            ("same_bssid_award", self.same_bssid_award),
            ("same_network_award", self.same_network_award),
            ("two_ghz.bonus", self.two_ghz.bonus),
            ("five_ghz.bonus", self.five_ghz.bonus),
        ];
        for (name, award) in awards {
            if !(0..=Self::MAX_AWARD).contains(&award) {
                return Err(WlanError::Config(format!(
                    "{name} must be within 0..={}",
                    Self::MAX_AWARD
                )));
            }
        }
        for (name, band) in [("two_ghz", self.two_ghz), ("five_ghz", self.five_ghz)] {
            if !(-150..=0).contains(&band.minimum_rssi) || !(-150..=0).contains(&band.saturation_rssi) {
                return Err(WlanError::Config(format!("{name}: thresholds must be within -150..=0 dBm")));
            }
            if band.saturation_rssi < band.minimum_rssi {
                return Err(WlanError::Config(format!(
                    "{name}: saturation_rssi {} below minimum_rssi {}",
                    band.saturation_rssi, band.minimum_rssi
                )));
            }
        }
        if self.passpoint_award > self.security_award {
            return Err(WlanError::Config(
                "passpoint_award must not exceed security_award".into(),
            ));
        }
        if self.same_network_award > self.same_bssid_award {
            return Err(WlanError::Config(
                "same_network_award must not exceed same_bssid_award".into(),
            ));
        }
        if self.bssid_strike_threshold == 0 {
            return Err(WlanError::Config("bssid_strike_threshold must be at least 1".into()));
        }
        Ok(())
    }
}
