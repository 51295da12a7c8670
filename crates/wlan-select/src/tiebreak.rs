//! Saved vs. opportunistic candidate resolution

use wlan_common::Candidate;

/// Keeps the best candidate of two streams
///
/// Each stream keeps its own highest-scoring candidate; across streams the
/// saved one wins a tie.
#[derive(Debug, Default, Clone)]
pub struct OpportunisticTieBreaker {
    saved: Option<Candidate>,
    opportunistic: Option<Candidate>,
}

impl OpportunisticTieBreaker {
    /// Create empty tie-breaker
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate from the saved stream; `None` is ignored
    pub fn offer_saved(&mut self, candidate: Option<Candidate>) {
        Self::offer(&mut self.saved, candidate);
    }

    /// Offer a candidate from the opportunistic stream; `None` is ignored
    pub fn offer_opportunistic(&mut self, candidate: Option<Candidate>) {
        Self::offer(&mut self.opportunistic, candidate);
    }

    fn offer(slot: &mut Option<Candidate>, candidate: Option<Candidate>) {
        let Some(candidate) = candidate else {
            return;
        };
        match slot {
            Some(held) if held.score() >= candidate.score() => {}
            _ => *slot = Some(candidate),
        }
    }

    /// Best candidate across both streams
    pub fn best(&self) -> Option<&Candidate> {
        match (&self.saved, &self.opportunistic) {
            (Some(saved), Some(opportunistic)) => {
                if opportunistic.score() > saved.score() {
                    Some(opportunistic)
                } else {
                    Some(saved)
                }
            }
            (Some(only), None) | (None, Some(only)) => Some(only),
            (None, None) => None,
        }
    }

    /// Consume and return the best candidate
    pub fn into_best(self) -> Option<Candidate> {
        match (self.saved, self.opportunistic) {
            (Some(saved), Some(opportunistic)) => {
                if opportunistic.score() > saved.score() {
                    Some(opportunistic)
                } else {
                    Some(saved)
                }
            }
            (saved, opportunistic) => saved.or(opportunistic),
        }
    }

    /// Clear both streams
    pub fn reset(&mut self) {
        self.saved = None;
        self.opportunistic = None;
    }
}
