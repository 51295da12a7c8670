//! Candidate scoring with saturated RSSI, band, security and stickiness terms

use crate::SelectionConfig;
use wlan_common::{Bssid, NetworkProfile, ScanObservation, SecurityClass};

/// Score for a single observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBreakdown {
    /// Saturated, scaled RSSI
    pub rssi: i32,
    /// Band bonus
    pub band: i32,
    /// Security class bonus
    pub security: i32,
    /// Same-BSSID or same-network bonus
    pub stickiness: i32,
    /// External score, for externally scored candidates
    pub external: i32,
    /// Sum of the above
    pub total: i32,
}

impl ScoreBreakdown {
    fn finish(mut self) -> Self {
        self.total = [self.band, self.security, self.stickiness, self.external]
            .into_iter()
            .fold(self.rssi, i32::saturating_add);
        self
    }
}

/// The network the device is associated with, resolved against the profile snapshot
#[derive(Debug, Clone, Copy)]
pub struct CurrentNetwork<'a> {
    /// Associated BSSID
    pub bssid: Bssid,
    /// Associated profile, when known
    pub profile: Option<&'a NetworkProfile>,
}

/// Scores observations
#[derive(Debug, Clone)]
pub struct CandidateScorer {
    config: SelectionConfig,
}

impl CandidateScorer {
    /// Create scorer
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    /// Scoring parameters
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Whether the raw signal clears the band minimum
    #[inline]
    pub fn meets_minimum(&self, observation: &ScanObservation) -> bool {
        observation.rssi >= self.config.band(observation.band()).minimum_rssi
    }

    /// RSSI term, clipped at the band saturation ceiling
    #[inline]
    pub fn rssi_score(&self, observation: &ScanObservation) -> i32 {
        let ceiling = self.config.band(observation.band()).saturation_rssi;
        let rssi = observation.rssi.min(ceiling);
        rssi.saturating_add(self.config.rssi_offset)
            .saturating_mul(self.config.rssi_slope)
    }

    /// Band bonus; zero below the band minimum
    #[inline]
    pub fn band_bonus(&self, observation: &ScanObservation) -> i32 {
        if self.meets_minimum(observation) {
            self.config.band(observation.band()).bonus
        } else {
            0
        }
    }

    /// Security class bonus
    #[inline]
    pub fn security_bonus(&self, class: SecurityClass) -> i32 {
        match class {
            SecurityClass::Psk | SecurityClass::Enterprise => self.config.security_award,
            SecurityClass::Passpoint => self.config.passpoint_award,
            SecurityClass::Open => 0,
        }
    }

    /// Stickiness toward the associated network
    pub fn stickiness(
        &self,
        observation: &ScanObservation,
        profile: Option<&NetworkProfile>,
        current: Option<&CurrentNetwork<'_>>,
    ) -> i32 {
        let Some(current) = current else {
            return 0;
        };
        if observation.bssid == current.bssid {
            return self.config.same_bssid_award;
        }
        match (profile, current.profile) {
            (Some(profile), Some(current_profile)) if profile.is_same_network(current_profile) => {
                self.config.same_network_award
            }
            _ => 0,
        }
    }

    /// Score an observation matched to a saved profile
    ///
    /// Returns `None` when the observation fails the minimum-signal gate.
    pub fn score_saved(
        &self,
        observation: &ScanObservation,
        profile: &NetworkProfile,
        current: Option<&CurrentNetwork<'_>>,
    ) -> Option<ScoreBreakdown> {
        if !self.meets_minimum(observation) {
            return None;
        }
        Some(
            ScoreBreakdown {
                rssi: self.rssi_score(observation),
                band: self.band_bonus(observation),
                security: self.security_bonus(profile.security),
                stickiness: self.stickiness(observation, Some(profile), current),
                external: 0,
                total: 0,
            }
            .finish(),
        )
    }

    /// Score an externally scored observation
    ///
    /// The external score replaces the local RSSI, band and security terms.
    pub fn score_external(
        &self,
        observation: &ScanObservation,
        profile: Option<&NetworkProfile>,
        external: i32,
        current: Option<&CurrentNetwork<'_>>,
    ) -> Option<ScoreBreakdown> {
        if !self.meets_minimum(observation) {
            return None;
        }
        Some(
            ScoreBreakdown {
                stickiness: self.stickiness(observation, profile, current),
                external,
                ..ScoreBreakdown::default()
            }
            .finish(),
        )
    }
}

impl Default for CandidateScorer {
    fn default() -> Self {
        Self::new(SelectionConfig::default())
    }
}
