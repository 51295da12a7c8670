//! OpenWLAN Common - Shared types for access point selection
//!
//! This crate provides the value types every other crate in the workspace
//! speaks in:
//! - Hardware addresses, SSIDs and frequency bands
//! - Scan observations and the candidates derived from them
//! - Saved network profiles and the profile store seam
//! - Monotonic timestamps and injectable clocks
//! - Error handling

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod profile;
pub mod types;

pub use error::*;
pub use profile::*;
pub use types::*;

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic millisecond timestamp
///
/// Only differences between two timestamps from the same [`Clock`] are
/// meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Timestamp from raw milliseconds
    #[inline(always)]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Raw milliseconds value
    #[inline(always)]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Timestamp shifted forward, saturating at the far future
    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(millis))
    }

    /// Time elapsed from `earlier` to `self`, zero if `earlier` is later
    #[inline]
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

/// Source of monotonic time
///
/// Every expiry in the workspace (BSSID exclusion, re-evaluation interval) is
/// computed against a reading from this trait at call time.
pub trait Clock: Send + Sync {
    /// Current monotonic time
    fn now(&self) -> Timestamp;
}

/// Clock backed by [`Instant`], counting from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose zero is now
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let millis = u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX);
        Timestamp(millis)
    }
}

/// Manually driven clock for tests and replays
#[derive(Debug, Default)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    /// Create clock at the given millisecond reading
    pub const fn new(millis: u64) -> Self {
        Self(AtomicU64::new(millis))
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.0.fetch_add(millis, Ordering::Relaxed);
    }

    /// Set an absolute reading
    pub fn set(&self, at: Timestamp) {
        self.0.store(at.as_millis(), Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.0.load(Ordering::Relaxed))
    }
}
