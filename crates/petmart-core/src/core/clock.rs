// crates/petmart-core/src/core/clock.rs
// ============================================================================
// Module: Petmart Time Model
// Description: Timestamps and injectable clocks for marketplace records.
// Purpose: Keep expiry and promotion windows testable without wall-clock reads.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Records carry [`Timestamp`] values in unix seconds which serialize as
//! RFC 3339 strings. Services read the current time through the [`Clock`]
//! trait; [`SystemClock`] is used in production and [`ManualClock`] drives
//! OTP expiry and promotion windows in tests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Point in time measured in whole seconds since the unix epoch (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix seconds.
    #[must_use]
    pub const fn from_unix_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Returns the timestamp as unix seconds.
    #[must_use]
    pub const fn as_unix_seconds(self) -> i64 {
        self.0
    }

    /// Returns a timestamp shifted forward by `seconds` (saturating).
    #[must_use]
    pub const fn plus_seconds(self, seconds: i64) -> Self {
        Self(self.0.saturating_add(seconds))
    }

    /// Returns the number of seconds from `self` until `later` (negative if past).
    #[must_use]
    pub const fn seconds_until(self, later: Self) -> i64 {
        later.0.saturating_sub(self.0)
    }

    /// Formats the timestamp as RFC 3339.
    ///
    /// # Errors
    ///
    /// Returns an error string when the value is outside the representable range.
    pub fn to_rfc3339(self) -> Result<String, String> {
        let datetime =
            OffsetDateTime::from_unix_timestamp(self.0).map_err(|err| err.to_string())?;
        datetime.format(&Rfc3339).map_err(|err| err.to_string())
    }

    /// Parses an RFC 3339 timestamp, truncating sub-second precision.
    ///
    /// # Errors
    ///
    /// Returns an error string when the input is not RFC 3339.
    pub fn parse_rfc3339(value: &str) -> Result<Self, String> {
        let datetime = OffsetDateTime::parse(value, &Rfc3339).map_err(|err| err.to_string())?;
        Ok(Self(datetime.unix_timestamp()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_rfc3339() {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "@{}", self.0),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.to_rfc3339().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse_rfc3339(&text).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Clocks
// ============================================================================

/// Source of the current time for services.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// Clock backed by the operating system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp(OffsetDateTime::now_utc().unix_timestamp())
    }
}

/// Manually advanced clock for deterministic tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    /// Current unix seconds.
    now: AtomicI64,
}

impl ManualClock {
    /// Creates a clock fixed at `start`.
    #[must_use]
    pub const fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicI64::new(start.0),
        }
    }

    /// Moves the clock to `at`.
    pub fn set(&self, at: Timestamp) {
        self.now.store(at.0, Ordering::SeqCst);
    }

    /// Advances the clock by `seconds`.
    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.now.load(Ordering::SeqCst))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
