//! Network selector combining filtering, scoring and tie-breaking

use crate::{
    health::BssidHealthTracker,
    scorer::{CandidateScorer, CurrentNetwork, ScoreBreakdown},
    tiebreak::OpportunisticTieBreaker,
    SelectionConfig,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use wlan_common::{
    Bssid, Candidate, NetworkProfile, ProfileId, ProfileStore, ScanEntry, Timestamp,
};

/// Network the device is associated with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedNetwork {
    /// Associated BSSID
    pub bssid: Bssid,
    /// Associated profile, when it is a saved network
    #[serde(default)]
    pub profile: Option<ProfileId>,
}

/// Association context for one selection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionContext {
    /// Current association, `None` while disconnected
    #[serde(default)]
    pub associated: Option<AssociatedNetwork>,
    /// Link is bouncing; no selection is made until it settles
    #[serde(default)]
    pub link_debouncing: bool,
    /// Ignore the minimum re-evaluation interval
    #[serde(default)]
    pub forced: bool,
}

impl SelectionContext {
    /// Context for a disconnected device
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Context for a device associated to `bssid`
    pub fn associated(bssid: Bssid, profile: Option<ProfileId>) -> Self {
        Self {
            associated: Some(AssociatedNetwork { bssid, profile }),
            ..Self::default()
        }
    }

    /// Same context with the interval check bypassed
    pub fn forced(mut self) -> Self {
        self.forced = true;
        self
    }
}

/// One entry that survived filtering
#[derive(Debug, Clone, Copy)]
struct Scored<'a> {
    entry: &'a ScanEntry,
    profile: Option<&'a NetworkProfile>,
    breakdown: ScoreBreakdown,
}

impl Scored<'_> {
    fn is_saved(&self) -> bool {
        self.profile.is_some()
    }

    fn score(&self) -> i32 {
        self.breakdown.total
    }

    fn to_candidate(&self) -> Candidate {
        let observation = self.entry.observation.clone();
        match self.profile {
            Some(profile) => Candidate::Saved {
                observation,
                profile: profile.id,
                score: self.score(),
            },
            None => Candidate::Opportunistic {
                observation,
                score: self.score(),
            },
        }
    }
}

/// Picks at most one access point per scan batch
#[derive(Debug)]
pub struct NetworkSelector {
    scorer: CandidateScorer,
    /// Last evaluation that got past the interval gate
    last_evaluation: Option<Timestamp>,
}

impl NetworkSelector {
    /// Create selector
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            scorer: CandidateScorer::new(config),
            last_evaluation: None,
        }
    }

    /// Scorer in use
    pub fn scorer(&self) -> &CandidateScorer {
        &self.scorer
    }

    /// Time of the last evaluation that ran
    pub fn last_evaluation(&self) -> Option<Timestamp> {
        self.last_evaluation
    }

    /// Select the best candidate in `entries`
    ///
    /// Returns `None` when nothing qualifies, when the link is debouncing, or
    /// when associated and the minimum re-evaluation interval has not
    /// elapsed. While associated the associated network is returned unless
    /// another candidate strictly outscores it.
    pub fn select(
        &mut self,
        entries: &[ScanEntry],
        store: &dyn ProfileStore,
        health: &BssidHealthTracker,
        context: &SelectionContext,
        now: Timestamp,
    ) -> Option<Candidate> {
        if context.link_debouncing {
            tracing::debug!("link debouncing, skipping selection");
            return None;
        }

        if let (Some(_), Some(last)) = (context.associated, self.last_evaluation) {
            let since = now.saturating_since(last);
            if !context.forced && since < self.scorer.config().min_selection_interval() {
                tracing::debug!(since_ms = since.as_millis() as u64, "re-evaluation interval not elapsed");
                return None;
            }
        }
        self.last_evaluation = Some(now);

        let snapshot = store.snapshot();
        let current = context.associated.map(|associated| CurrentNetwork {
            bssid: associated.bssid,
            profile: associated.profile.and_then(|id| snapshot.get(&id)),
        });

        let scored = self.score_entries(entries, &snapshot, health, current.as_ref(), now);
        if scored.is_empty() {
            tracing::debug!(entries = entries.len(), "no candidate passed filtering");
            return None;
        }

        let current_bssid = current.map(|c| c.bssid);
        let best_saved = best_of(scored.iter().filter(|s| s.is_saved()), current_bssid);
        let best_opportunistic = best_of(scored.iter().filter(|s| !s.is_saved()), current_bssid);

        let user_choice = best_saved.and_then(|best| follow_connect_choice(best, &scored, current_bssid));

        let winner = match user_choice {
            Some(chosen) => {
                tracing::info!(
                    profile = ?chosen.profile.map(|p| p.id),
                    bssid = %chosen.entry.observation.bssid,
                    "user connect choice overrides score"
                );
                chosen.to_candidate()
            }
            None => {
                let mut breaker = OpportunisticTieBreaker::new();
                breaker.offer_saved(best_saved.map(Scored::to_candidate));
                breaker.offer_opportunistic(best_opportunistic.map(Scored::to_candidate));
                let winner = breaker.into_best()?;
                self.hold_current(winner, &scored, current_bssid)
            }
        };

        if let Candidate::Saved {
            observation,
            profile,
            score,
        } = &winner
        {
            store.record_candidate(*profile, observation, *score);
        }

        tracing::info!(
            bssid = %winner.bssid(),
            ssid = %winner.observation().ssid,
            score = winner.score(),
            saved = winner.is_saved(),
            "candidate selected"
        );
        Some(winner)
    }

    /// Filter and score every entry
    fn score_entries<'a>(
        &self,
        entries: &'a [ScanEntry],
        snapshot: &'a BTreeMap<ProfileId, NetworkProfile>,
        health: &BssidHealthTracker,
        current: Option<&CurrentNetwork<'_>>,
        now: Timestamp,
    ) -> Vec<Scored<'a>> {
        let mut scored = Vec::with_capacity(entries.len());

        for entry in entries {
            let observation = &entry.observation;
            if health.is_disabled(&observation.bssid, now) {
                tracing::debug!(bssid = %observation.bssid, "skipping excluded BSSID");
                continue;
            }

            let profile = entry
                .profile
                .and_then(|id| snapshot.get(&id))
                .filter(|p| {
                    observation.capabilities.as_str().is_empty()
                        || observation.capabilities.admits(p.security)
                });

            if let Some(profile) = profile {
                if !profile.status.is_enabled() {
                    tracing::debug!(bssid = %observation.bssid, profile = %profile.id, "skipping disabled profile");
                    continue;
                }
            }

            let breakdown = match (profile, entry.external_score) {
                (Some(profile), Some(external)) if profile.use_external_scores => {
                    self.scorer.score_external(observation, Some(profile), external, current)
                }
                (Some(profile), _) => self.scorer.score_saved(observation, profile, current),
                (None, Some(external)) => self.scorer.score_external(observation, None, external, current),
                (None, None) => None,
            };

            match breakdown {
                Some(breakdown) => scored.push(Scored {
                    entry,
                    profile,
                    breakdown,
                }),
                None => tracing::debug!(
                    bssid = %observation.bssid,
                    rssi = observation.rssi,
                    "skipping unscorable observation"
                ),
            }
        }

        scored
    }

    /// Keep the associated network unless `winner` strictly outscores it
    fn hold_current(
        &self,
        winner: Candidate,
        scored: &[Scored<'_>],
        current_bssid: Option<Bssid>,
    ) -> Candidate {
        let Some(current_bssid) = current_bssid else {
            return winner;
        };
        if winner.bssid() == current_bssid {
            return winner;
        }
        let current = best_of(
            scored.iter().filter(|s| s.entry.observation.bssid == current_bssid),
            Some(current_bssid),
        );
        match current {
            Some(current) if winner.score() <= current.score() => {
                tracing::debug!(
                    challenger = %winner.bssid(),
                    challenger_score = winner.score(),
                    current_score = current.score(),
                    "challenger does not exceed associated network"
                );
                current.to_candidate()
            }
            _ => winner,
        }
    }
}

impl Default for NetworkSelector {
    fn default() -> Self {
        Self::new(SelectionConfig::default())
    }
}

/// Highest score; ties go to the associated BSSID, then the stronger signal,
/// then the earlier entry
fn best_of<'s, 'a>(
    scored: impl Iterator<Item = &'s Scored<'a>>,
    current_bssid: Option<Bssid>,
) -> Option<&'s Scored<'a>>
where
    'a: 's,
{
    let key = |s: &Scored<'_>| {
        (
            s.score(),
            Some(s.entry.observation.bssid) == current_bssid,
            s.entry.observation.rssi,
        )
    };

    let mut best: Option<&'s Scored<'a>> = None;
    for candidate in scored {
        match best {
            Some(held) if key(held) >= key(candidate) => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Follow connect-choice links from `start` while the chosen profile is present
fn follow_connect_choice<'s, 'a>(
    start: &'s Scored<'a>,
    scored: &'s [Scored<'a>],
    current_bssid: Option<Bssid>,
) -> Option<&'s Scored<'a>> {
    let mut profile = start.profile?;
    let mut visited = BTreeSet::from([profile.id]);
    let mut chosen = None;

    while let Some(next) = profile.connect_choice {
        if !visited.insert(next) {
            break;
        }
        let Some(target) = best_of(
            scored.iter().filter(|s| s.profile.map(|p| p.id) == Some(next)),
            current_bssid,
        ) else {
            break;
        };
        chosen = Some(target);
        match target.profile {
            Some(p) => profile = p,
            None => break,
        }
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wlan_common::{
        Capabilities, InMemoryProfileStore, ScanObservation, SecurityClass, SelectionStatus, Ssid,
    };

    fn bssid(last: u8) -> Bssid {
        Bssid::new([0x02, 0, 0, 0, 0, last])
    }

    fn obs(last: u8, ssid: &str, frequency: u32, rssi: i32) -> ScanObservation {
        ScanObservation {
            ssid: Ssid::try_from(ssid).unwrap(),
            bssid: bssid(last),
            frequency,
            rssi,
            capabilities: Capabilities::new("[WPA2-PSK-CCMP][ESS]"),
            timestamp: Timestamp::default(),
        }
    }

    fn psk(id: u32, ssid: &str) -> NetworkProfile {
        NetworkProfile::new(ProfileId(id), Ssid::try_from(ssid).unwrap(), SecurityClass::Psk)
    }

    fn at(secs: u64) -> Timestamp {
        Timestamp::from_millis(secs * 1000)
    }

    fn setup() -> (NetworkSelector, InMemoryProfileStore, BssidHealthTracker) {
        let store = InMemoryProfileStore::with_profiles([psk(1, "a"), psk(2, "b"), psk(3, "c")]);
        (NetworkSelector::default(), store, BssidHealthTracker::default())
    }

    #[test]
    fn test_picks_highest_score() {
        let (mut selector, store, health) = setup();
        let entries = vec![
            ScanEntry::saved(obs(1, "a", 2437, -75), ProfileId(1)),
            ScanEntry::saved(obs(2, "b", 5180, -70), ProfileId(2)),
            ScanEntry::saved(obs(3, "c", 2437, -65), ProfileId(3)),
        ];

        let chosen = selector
            .select(&entries, &store, &health, &SelectionContext::disconnected(), at(0))
            .unwrap();
        assert_eq!(chosen.bssid(), bssid(2));
        assert_eq!(chosen.profile(), Some(ProfileId(2)));

        let record = store.candidate(ProfileId(2)).unwrap();
        assert_eq!(record.score, chosen.score());
    }

    #[test]
    fn test_only_candidate_below_minimum_is_not_selected() {
        let (mut selector, store, health) = setup();
        let entries = vec![ScanEntry::saved(obs(1, "a", 2437, -90), ProfileId(1))];

        assert!(selector
            .select(&entries, &store, &health, &SelectionContext::disconnected(), at(0))
            .is_none());
    }

    #[test]
    fn test_excluded_bssid_is_skipped() {
        let (mut selector, store, mut health) = setup();
        let entries = vec![
            ScanEntry::saved(obs(1, "a", 5180, -50), ProfileId(1)),
            ScanEntry::saved(obs(2, "b", 2437, -80), ProfileId(2)),
        ];

        for _ in 0..2 {
            health.disable(bssid(1), at(0));
        }
        let chosen = selector
            .select(&entries, &store, &health, &SelectionContext::disconnected(), at(0))
            .unwrap();
        assert_eq!(chosen.bssid(), bssid(1));

        health.disable(bssid(1), at(0));
        let chosen = selector
            .select(&entries, &store, &health, &SelectionContext::disconnected(), at(1))
            .unwrap();
        assert_eq!(chosen.bssid(), bssid(2));

        health.enable(bssid(1));
        let chosen = selector
            .select(&entries, &store, &health, &SelectionContext::disconnected(), at(2))
            .unwrap();
        assert_eq!(chosen.bssid(), bssid(1));
    }

    #[test]
    fn test_disabled_profile_is_skipped() {
        let (mut selector, store, health) = setup();
        store.set_status(ProfileId(1), SelectionStatus::TemporarilyDisabled);
        let entries = vec![
            ScanEntry::saved(obs(1, "a", 5180, -50), ProfileId(1)),
            ScanEntry::saved(obs(2, "b", 2437, -80), ProfileId(2)),
        ];

        let chosen = selector
            .select(&entries, &store, &health, &SelectionContext::disconnected(), at(0))
            .unwrap();
        assert_eq!(chosen.profile(), Some(ProfileId(2)));
    }

    #[test]
    fn test_unknown_profile_is_treated_as_absent() {
        let (mut selector, store, health) = setup();
        let entries = vec![ScanEntry::saved(obs(1, "z", 5180, -50), ProfileId(42))];
        assert!(selector
            .select(&entries, &store, &health, &SelectionContext::disconnected(), at(0))
            .is_none());

        // Security mismatch between profile and access point also drops the match
        let mut open_ap = obs(2, "a", 5180, -50);
        open_ap.capabilities = Capabilities::new("[ESS]");
        let entries = vec![ScanEntry::saved(open_ap, ProfileId(1))];
        assert!(selector
            .select(&entries, &store, &health, &SelectionContext::disconnected(), at(1))
            .is_none());
    }

    #[test]
    fn test_user_override_beats_score() {
        let (mut selector, store, health) = setup();
        // Scores: b > c > a
        let entries = vec![
            ScanEntry::saved(obs(1, "a", 2437, -80), ProfileId(1)),
            ScanEntry::saved(obs(2, "b", 5180, -55), ProfileId(2)),
            ScanEntry::saved(obs(3, "c", 2437, -65), ProfileId(3)),
        ];

        let chosen = selector
            .select(&entries, &store, &health, &SelectionContext::disconnected(), at(0))
            .unwrap();
        assert_eq!(chosen.profile(), Some(ProfileId(2)));

        // User picks a over everything else in range
        store.set_connect_choice(ProfileId(2), Some(ProfileId(1)));
        store.set_connect_choice(ProfileId(3), Some(ProfileId(1)));

        let chosen = selector
            .select(&entries, &store, &health, &SelectionContext::disconnected(), at(1))
            .unwrap();
        assert_eq!(chosen.profile(), Some(ProfileId(1)));
    }

    #[test]
    fn test_user_override_requires_target_in_batch() {
        let (mut selector, store, health) = setup();
        store.set_connect_choice(ProfileId(2), Some(ProfileId(1)));
        let entries = vec![
            ScanEntry::saved(obs(2, "b", 5180, -55), ProfileId(2)),
            ScanEntry::saved(obs(3, "c", 2437, -65), ProfileId(3)),
        ];

        let chosen = selector
            .select(&entries, &store, &health, &SelectionContext::disconnected(), at(0))
            .unwrap();
        assert_eq!(chosen.profile(), Some(ProfileId(2)));
    }

    #[test]
    fn test_user_override_cycle_terminates() {
        let (mut selector, store, health) = setup();
        store.set_connect_choice(ProfileId(2), Some(ProfileId(1)));
        store.set_connect_choice(ProfileId(1), Some(ProfileId(2)));
        let entries = vec![
            ScanEntry::saved(obs(1, "a", 2437, -80), ProfileId(1)),
            ScanEntry::saved(obs(2, "b", 5180, -55), ProfileId(2)),
        ];

        let chosen = selector
            .select(&entries, &store, &health, &SelectionContext::disconnected(), at(0))
            .unwrap();
        assert_eq!(chosen.profile(), Some(ProfileId(1)));
    }

    #[test]
    fn test_saved_beats_opportunistic_on_tie() {
        let (mut selector, store, health) = setup();
        let saved = ScanEntry::saved(obs(1, "a", 2437, -60), ProfileId(1));
        let saved_score = CandidateScorer::default()
            .score_saved(&saved.observation, &psk(1, "a"), None)
            .unwrap()
            .total;
        let entries = vec![
            ScanEntry::unmatched(obs(9, "free", 2437, -50)).with_external_score(saved_score),
            saved,
        ];

        let chosen = selector
            .select(&entries, &store, &health, &SelectionContext::disconnected(), at(0))
            .unwrap();
        assert!(chosen.is_saved());

        let entries = vec![
            ScanEntry::unmatched(obs(9, "free", 2437, -50)).with_external_score(saved_score + 1),
            ScanEntry::saved(obs(1, "a", 2437, -60), ProfileId(1)),
        ];
        let chosen = selector
            .select(&entries, &store, &health, &SelectionContext::disconnected(), at(1))
            .unwrap();
        assert!(!chosen.is_saved());
        assert_eq!(chosen.bssid(), bssid(9));
    }

    #[test]
    fn test_unmatched_without_score_is_ignored() {
        let (mut selector, store, health) = setup();
        let entries = vec![ScanEntry::unmatched(obs(9, "free", 5180, -40))];
        assert!(selector
            .select(&entries, &store, &health, &SelectionContext::disconnected(), at(0))
            .is_none());
    }

    #[test]
    fn test_maximal_external_score_on_current_bssid() {
        let (mut selector, store, health) = setup();
        let entries = vec![
            ScanEntry::unmatched(obs(9, "cafe", 5180, -60)).with_external_score(i32::MAX),
            ScanEntry::saved(obs(1, "a", 5180, -50), ProfileId(1)),
        ];
        let context = SelectionContext::associated(bssid(9), None);

        let chosen = selector.select(&entries, &store, &health, &context, at(0)).unwrap();
        assert_eq!(chosen.bssid(), bssid(9));
        assert_eq!(chosen.score(), i32::MAX);
        assert!(!chosen.is_saved());
    }

    #[test]
    fn test_external_opt_in_profile_stays_saved() {
        let mut external = psk(4, "ext");
        external.use_external_scores = true;
        let store = InMemoryProfileStore::with_profiles([external, psk(1, "a")]);
        let mut selector = NetworkSelector::default();
        let health = BssidHealthTracker::default();

        let entries = vec![
            ScanEntry::saved(obs(4, "ext", 2437, -70), ProfileId(4)).with_external_score(1_000),
            ScanEntry::saved(obs(1, "a", 5180, -50), ProfileId(1)),
        ];
        let chosen = selector
            .select(&entries, &store, &health, &SelectionContext::disconnected(), at(0))
            .unwrap();
        assert_eq!(chosen.profile(), Some(ProfileId(4)));
        assert_eq!(chosen.score(), 1_000);
    }

    #[test]
    fn test_interval_gate_while_associated() {
        let (mut selector, store, health) = setup();
        let entries = vec![
            ScanEntry::saved(obs(1, "a", 2437, -80), ProfileId(1)),
            ScanEntry::saved(obs(2, "b", 5180, -50), ProfileId(2)),
        ];
        let associated = SelectionContext::associated(bssid(1), Some(ProfileId(1)));

        assert!(selector.select(&entries, &store, &health, &associated, at(0)).is_some());
        assert!(selector.select(&entries, &store, &health, &associated, at(5)).is_none());
        assert!(selector
            .select(&entries, &store, &health, &associated.forced(), at(6))
            .is_some());
        assert!(selector.select(&entries, &store, &health, &associated, at(16)).is_some());

        // Disconnecting always re-evaluates
        assert!(selector
            .select(&entries, &store, &health, &SelectionContext::disconnected(), at(17))
            .is_some());
    }

    #[test]
    fn test_link_debouncing_skips() {
        let (mut selector, store, health) = setup();
        let entries = vec![ScanEntry::saved(obs(2, "b", 5180, -50), ProfileId(2))];
        let context = SelectionContext {
            link_debouncing: true,
            ..SelectionContext::disconnected()
        };
        assert!(selector.select(&entries, &store, &health, &context, at(0)).is_none());
        assert!(selector.last_evaluation().is_none());
    }

    #[test]
    fn test_stickiness_prevents_small_delta_roam() {
        let (mut selector, store, health) = setup();
        // Same band, 4 dB apart: 16 points of RSSI, less than the 24 point same-BSSID bonus
        let entries = vec![
            ScanEntry::saved(obs(1, "a", 2437, -75), ProfileId(1)),
            ScanEntry::saved(obs(2, "b", 2437, -71), ProfileId(2)),
        ];
        let context = SelectionContext::associated(bssid(1), Some(ProfileId(1)));

        let chosen = selector.select(&entries, &store, &health, &context, at(0)).unwrap();
        assert_eq!(chosen.bssid(), bssid(1));

        // 10 dB apart is enough
        let entries = vec![
            ScanEntry::saved(obs(1, "a", 2437, -75), ProfileId(1)),
            ScanEntry::saved(obs(2, "b", 2437, -65), ProfileId(2)),
        ];
        let chosen = selector
            .select(&entries, &store, &health, &context.forced(), at(1))
            .unwrap();
        assert_eq!(chosen.bssid(), bssid(2));
    }

    #[test]
    fn test_equal_challenger_does_not_displace_current() {
        let (mut selector, store, health) = setup();
        // Current is opportunistic and ties with a saved challenger
        let current = obs(9, "free", 2437, -60);
        let challenger = ScanEntry::saved(obs(1, "a", 2437, -60), ProfileId(1));
        let challenger_score = CandidateScorer::default()
            .score_saved(&challenger.observation, &psk(1, "a"), None)
            .unwrap()
            .total;
        let entries = vec![
            ScanEntry::unmatched(current).with_external_score(challenger_score - 24),
            challenger,
        ];
        let context = SelectionContext::associated(bssid(9), None);

        let chosen = selector.select(&entries, &store, &health, &context, at(0)).unwrap();
        assert_eq!(chosen.bssid(), bssid(9));
        assert!(!chosen.is_saved());
    }

    #[test]
    fn test_current_out_of_range_allows_switch() {
        let (mut selector, store, health) = setup();
        let entries = vec![ScanEntry::saved(obs(2, "b", 2437, -80), ProfileId(2))];
        let context = SelectionContext::associated(bssid(1), Some(ProfileId(1)));

        let chosen = selector.select(&entries, &store, &health, &context, at(0)).unwrap();
        assert_eq!(chosen.bssid(), bssid(2));
    }

    #[test]
    fn test_linked_profile_gets_same_network_bonus() {
        let mut a = psk(1, "a");
        a.linked.insert(ProfileId(2));
        let store = InMemoryProfileStore::with_profiles([a, psk(2, "b"), psk(3, "c")]);
        let mut selector = NetworkSelector::default();
        let health = BssidHealthTracker::default();

        // b and c are identical apart from the link to a
        let entries = vec![
            ScanEntry::saved(obs(3, "c", 2437, -70), ProfileId(3)),
            ScanEntry::saved(obs(2, "b", 2437, -70), ProfileId(2)),
        ];
        let context = SelectionContext::associated(bssid(1), Some(ProfileId(1)));
        let chosen = selector.select(&entries, &store, &health, &context, at(0)).unwrap();
        assert_eq!(chosen.profile(), Some(ProfileId(2)));
        assert_eq!(chosen.score(), (-70 + 85) * 4 + 80 + 16);
    }

    #[test]
    fn test_interval_uses_config() {
        let config = SelectionConfig {
            min_selection_interval_ms: 1_000,
            ..SelectionConfig::default()
        };
        let mut selector = NetworkSelector::new(config);
        let store = InMemoryProfileStore::with_profiles([psk(1, "a")]);
        let health = BssidHealthTracker::default();
        let entries = vec![ScanEntry::saved(obs(1, "a", 2437, -60), ProfileId(1))];
        let context = SelectionContext::associated(bssid(1), Some(ProfileId(1)));

        let start = at(0);
        assert!(selector.select(&entries, &store, &health, &context, start).is_some());
        let later = start.saturating_add(Duration::from_millis(1_000));
        assert!(selector.select(&entries, &store, &health, &context, later).is_some());
    }
}
