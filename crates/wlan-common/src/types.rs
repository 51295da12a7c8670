//! Value types for scan results and selection candidates

use crate::{ProfileId, SecurityClass, Timestamp, WlanError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access point hardware address (Value Object)
///
/// Displayed and serialized as lowercase colon-separated hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bssid([u8; 6]);

impl Bssid {
    /// Create from raw octets
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Raw octets
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for Bssid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for Bssid {
    type Err = WlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 6];
        let mut parts = s.split(':');
        for octet in octets.iter_mut() {
            let part = parts
                .next()
                .filter(|p| p.len() == 2)
                .ok_or_else(|| WlanError::InvalidBssid(s.to_string()))?;
            *octet = u8::from_str_radix(part, 16)
                .map_err(|_| WlanError::InvalidBssid(s.to_string()))?;
        }
        if parts.next().is_some() {
            return Err(WlanError::InvalidBssid(s.to_string()));
        }
        Ok(Self(octets))
    }
}

impl TryFrom<String> for Bssid {
    type Error = WlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Bssid> for String {
    fn from(bssid: Bssid) -> Self {
        bssid.to_string()
    }
}

/// Network name (Value Object)
///
/// Serialized as a string when the bytes are UTF-8, otherwise as a byte array.
///
/// # Invariants
/// - At most 32 bytes
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "SsidRepr", into = "SsidRepr")]
pub struct Ssid(Vec<u8>);

/// Wire form of [`Ssid`]
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SsidRepr {
    Text(String),
    Bytes(Vec<u8>),
}

impl Ssid {
    /// Maximum SSID length in bytes
    pub const MAX_LEN: usize = 32;

    /// Create from raw bytes with validation
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, WlanError> {
        let bytes = bytes.into();
        if bytes.len() > Self::MAX_LEN {
            return Err(WlanError::InvalidSsid(format!(
                "{} bytes exceeds {}",
                bytes.len(),
                Self::MAX_LEN
            )));
        }
        Ok(Self(bytes))
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Ssid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl TryFrom<String> for Ssid {
    type Error = WlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value.into_bytes())
    }
}

impl TryFrom<&str> for Ssid {
    type Error = WlanError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.as_bytes().to_vec())
    }
}

impl TryFrom<SsidRepr> for Ssid {
    type Error = WlanError;

    fn try_from(repr: SsidRepr) -> Result<Self, Self::Error> {
        match repr {
            SsidRepr::Text(text) => Self::new(text.into_bytes()),
            SsidRepr::Bytes(bytes) => Self::new(bytes),
        }
    }
}

impl From<Ssid> for SsidRepr {
    fn from(ssid: Ssid) -> Self {
        match String::from_utf8(ssid.0) {
            Ok(text) => SsidRepr::Text(text),
            Err(err) => SsidRepr::Bytes(err.into_bytes()),
        }
    }
}

/// Frequency band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    /// 2.4 GHz
    TwoGhz,
    /// 5 GHz
    FiveGhz,
    /// Anything else; scored with the 2.4 GHz thresholds
    Unknown,
}

impl Band {
    /// Band for a center frequency in MHz
    pub const fn from_frequency(mhz: u32) -> Self {
        match mhz {
            2400..=2500 => Self::TwoGhz,
            4900..=5900 => Self::FiveGhz,
            _ => Self::Unknown,
        }
    }
}

/// Security advertised by an access point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApSecurity {
    /// No encryption
    Open,
    /// WEP
    Wep,
    /// WPA/WPA2/WPA3 personal
    Psk,
    /// 802.1X
    Eap,
}

/// Capability descriptor as reported by the scanner, e.g. `[WPA2-PSK-CCMP][ESS]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(String);

impl Capabilities {
    /// Wrap a raw descriptor
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Raw descriptor
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strongest security class the descriptor advertises
    pub fn security(&self) -> ApSecurity {
        if self.0.contains("EAP") {
            ApSecurity::Eap
        } else if self.0.contains("PSK") || self.0.contains("SAE") {
            ApSecurity::Psk
        } else if self.0.contains("WEP") {
            ApSecurity::Wep
        } else {
            ApSecurity::Open
        }
    }

    /// Whether a saved profile of `class` could associate with this access point
    pub fn admits(&self, class: SecurityClass) -> bool {
        match (class, self.security()) {
            (SecurityClass::Open, ApSecurity::Open) => true,
            (SecurityClass::Psk, ApSecurity::Psk | ApSecurity::Wep) => true,
            (SecurityClass::Enterprise | SecurityClass::Passpoint, ApSecurity::Eap) => true,
            _ => false,
        }
    }
}

/// One access point seen in one scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanObservation {
    /// Network name
    pub ssid: Ssid,
    /// Access point address
    pub bssid: Bssid,
    /// Center frequency in MHz
    pub frequency: u32,
    /// Signal strength in dBm
    pub rssi: i32,
    /// Security descriptor
    #[serde(default)]
    pub capabilities: Capabilities,
    /// When the observation was made
    #[serde(default)]
    pub timestamp: Timestamp,
}

impl ScanObservation {
    /// Band of the observation
    #[inline]
    pub fn band(&self) -> Band {
        Band::from_frequency(self.frequency)
    }
}

/// A scan observation as delivered by the scan collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEntry {
    /// The observation
    pub observation: ScanObservation,
    /// Matching saved profile, if any
    #[serde(default)]
    pub profile: Option<ProfileId>,
    /// Externally supplied quality score, if any
    #[serde(default)]
    pub external_score: Option<i32>,
}

impl ScanEntry {
    /// Entry with no profile and no external score
    pub fn unmatched(observation: ScanObservation) -> Self {
        Self {
            observation,
            profile: None,
            external_score: None,
        }
    }

    /// Entry matched to a saved profile
    pub fn saved(observation: ScanObservation, profile: ProfileId) -> Self {
        Self {
            observation,
            profile: Some(profile),
            external_score: None,
        }
    }

    /// Attach an external score
    pub fn with_external_score(mut self, score: i32) -> Self {
        self.external_score = Some(score);
        self
    }
}

/// Result of one selection pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Candidate {
    /// Observation backed by a saved profile
    Saved {
        /// The observation
        observation: ScanObservation,
        /// The profile it matched
        profile: ProfileId,
        /// Computed score
        score: i32,
    },
    /// Observation with no saved profile, scored externally
    Opportunistic {
        /// The observation
        observation: ScanObservation,
        /// External score plus stickiness
        score: i32,
    },
}

impl Candidate {
    /// Underlying observation
    pub fn observation(&self) -> &ScanObservation {
        match self {
            Self::Saved { observation, .. } | Self::Opportunistic { observation, .. } => {
                observation
            }
        }
    }

    /// Final score
    pub fn score(&self) -> i32 {
        match self {
            Self::Saved { score, .. } | Self::Opportunistic { score, .. } => *score,
        }
    }

    /// Profile, for saved candidates
    pub fn profile(&self) -> Option<ProfileId> {
        match self {
            Self::Saved { profile, .. } => Some(*profile),
            Self::Opportunistic { .. } => None,
        }
    }

    /// Address of the candidate
    pub fn bssid(&self) -> Bssid {
        self.observation().bssid
    }

    /// Whether the candidate came from the saved stream
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}
