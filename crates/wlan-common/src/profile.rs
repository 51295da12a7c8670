//! Saved network profiles and the store seam
//!
//! The selection core only ever reads a snapshot of the saved profiles per
//! evaluation and writes back which observation it picked for a profile.
//! [`ProfileStore`] is that seam; [`InMemoryProfileStore`] is the reference
//! implementation used by the engine and tests.

use crate::{ScanObservation, Ssid};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Saved profile identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub u32);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "profile#{}", self.0)
    }
}

/// Security class of a saved profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityClass {
    /// No credentials
    Open,
    /// Pre-shared key
    Psk,
    /// 802.1X enterprise
    Enterprise,
    /// Passpoint / Hotspot 2.0
    Passpoint,
}

/// Per-profile selection status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStatus {
    /// Eligible for selection
    #[default]
    Enabled,
    /// Excluded until the profile store re-enables it
    TemporarilyDisabled,
    /// Excluded until the user re-enables it
    PermanentlyDisabled,
}

impl SelectionStatus {
    /// Whether the profile may be selected
    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// A saved credential set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    /// Identifier
    pub id: ProfileId,
    /// Network name
    pub ssid: Ssid,
    /// Security class
    pub security: SecurityClass,
    /// Created without user action, not persisted
    ///
    /// Tracked for change detection only; selection and recovery ignore it.
    #[serde(default)]
    pub ephemeral: bool,
    /// Has ever completed a connection
    #[serde(default)]
    pub has_ever_connected: bool,
    /// Profile the user chose over this one
    #[serde(default)]
    pub connect_choice: Option<ProfileId>,
    /// Scored by the external scorer instead of the local one
    #[serde(default)]
    pub use_external_scores: bool,
    /// Profiles considered the same physical network
    #[serde(default)]
    pub linked: BTreeSet<ProfileId>,
    /// Selection status
    #[serde(default)]
    pub status: SelectionStatus,
    /// Requires management frame protection
    #[serde(default)]
    pub require_pmf: bool,
}

impl NetworkProfile {
    /// Profile with default flags
    pub fn new(id: ProfileId, ssid: Ssid, security: SecurityClass) -> Self {
        Self {
            id,
            ssid,
            security,
            ephemeral: false,
            has_ever_connected: false,
            connect_choice: None,
            use_external_scores: false,
            linked: BTreeSet::new(),
            status: SelectionStatus::Enabled,
            require_pmf: false,
        }
    }

    /// Whether `other` is this profile or linked to it in either direction
    pub fn is_same_network(&self, other: &NetworkProfile) -> bool {
        self.id == other.id || self.linked.contains(&other.id) || other.linked.contains(&self.id)
    }
}

/// Observation last chosen for a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    /// Chosen observation
    pub observation: ScanObservation,
    /// Score it was chosen with
    pub score: i32,
}

/// Field of a profile that an update changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProfileChange {
    /// SSID
    Ssid,
    /// Security class
    Security,
    /// Ephemeral flag
    Ephemeral,
    /// Has-ever-connected flag
    HasEverConnected,
    /// Connect choice
    ConnectChoice,
    /// External scores opt-in
    UseExternalScores,
    /// Linked profile set
    Linked,
    /// Selection status
    Status,
    /// Management frame protection requirement
    RequirePmf,
}

/// Read/write seam to the saved profile store
pub trait ProfileStore: Send + Sync {
    /// All saved profiles, as of now
    fn snapshot(&self) -> BTreeMap<ProfileId, NetworkProfile>;

    /// One saved profile
    fn profile(&self, id: ProfileId) -> Option<NetworkProfile>;

    /// Record which observation selection picked for a profile
    fn record_candidate(&self, id: ProfileId, observation: &ScanObservation, score: i32);
}

#[derive(Debug)]
struct StoredProfile {
    profile: NetworkProfile,
    candidate: Option<CandidateRecord>,
}

/// In-memory profile store
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<BTreeMap<ProfileId, StoredProfile>>,
}

impl InMemoryProfileStore {
    /// Create empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with profiles
    pub fn with_profiles(profiles: impl IntoIterator<Item = NetworkProfile>) -> Self {
        let store = Self::new();
        for profile in profiles {
            store.insert(profile);
        }
        store
    }

    /// Add or replace a profile, dropping its candidate record
    pub fn insert(&self, profile: NetworkProfile) {
        self.profiles.write().insert(
            profile.id,
            StoredProfile {
                profile,
                candidate: None,
            },
        );
    }

    /// Remove a profile
    pub fn remove(&self, id: ProfileId) -> Option<NetworkProfile> {
        self.profiles.write().remove(&id).map(|s| s.profile)
    }

    /// Update an existing profile and report which fields changed
    ///
    /// Returns `None` when no profile with that id is stored.
    ///
    /// Known limitation: a `require_pmf` change is reported in the returned
    /// set but is not written back, so reading the profile afterwards still
    /// yields the previous value.
    pub fn update(&self, updated: NetworkProfile) -> Option<BTreeSet<ProfileChange>> {
        let mut profiles = self.profiles.write();
        let stored = profiles.get_mut(&updated.id)?;
        let changes = diff(&stored.profile, &updated);

        let previous_pmf = stored.profile.require_pmf;
        stored.profile = updated;
        stored.profile.require_pmf = previous_pmf;

        if !changes.is_empty() {
            tracing::debug!(profile = %stored.profile.id, ?changes, "profile updated");
        }
        Some(changes)
    }

    /// Set selection status
    pub fn set_status(&self, id: ProfileId, status: SelectionStatus) -> bool {
        match self.profiles.write().get_mut(&id) {
            Some(stored) => {
                stored.profile.status = status;
                true
            }
            None => false,
        }
    }

    /// Set connect choice; the user picked `chosen` over `id`
    pub fn set_connect_choice(&self, id: ProfileId, chosen: Option<ProfileId>) -> bool {
        match self.profiles.write().get_mut(&id) {
            Some(stored) => {
                stored.profile.connect_choice = chosen;
                true
            }
            None => false,
        }
    }

    /// Last candidate recorded for a profile
    pub fn candidate(&self, id: ProfileId) -> Option<CandidateRecord> {
        self.profiles.read().get(&id).and_then(|s| s.candidate.clone())
    }

    /// Number of stored profiles
    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn snapshot(&self) -> BTreeMap<ProfileId, NetworkProfile> {
        self.profiles
            .read()
            .iter()
            .map(|(id, s)| (*id, s.profile.clone()))
            .collect()
    }

    fn profile(&self, id: ProfileId) -> Option<NetworkProfile> {
        self.profiles.read().get(&id).map(|s| s.profile.clone())
    }

    fn record_candidate(&self, id: ProfileId, observation: &ScanObservation, score: i32) {
        if let Some(stored) = self.profiles.write().get_mut(&id) {
            stored.candidate = Some(CandidateRecord {
                observation: observation.clone(),
                score,
            });
        }
    }
}

fn diff(old: &NetworkProfile, new: &NetworkProfile) -> BTreeSet<ProfileChange> {
    let mut changes = BTreeSet::new();
    if old.ssid != new.ssid {
        changes.insert(ProfileChange::Ssid);
    }
    if old.security != new.security {
        changes.insert(ProfileChange::Security);
    }
    if old.ephemeral != new.ephemeral {
        changes.insert(ProfileChange::Ephemeral);
    }
    if old.has_ever_connected != new.has_ever_connected {
        changes.insert(ProfileChange::HasEverConnected);
    }
    if old.connect_choice != new.connect_choice {
        changes.insert(ProfileChange::ConnectChoice);
    }
    if old.use_external_scores != new.use_external_scores {
        changes.insert(ProfileChange::UseExternalScores);
    }
    if old.linked != new.linked {
        changes.insert(ProfileChange::Linked);
    }
    if old.status != new.status {
        changes.insert(ProfileChange::Status);
    }
    if old.require_pmf != new.require_pmf {
        changes.insert(ProfileChange::RequirePmf);
    }
    changes
}
