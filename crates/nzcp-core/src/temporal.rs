//! # Temporal — UTC Verification Clock
//!
//! CWT claims carry NumericDate values (Unix epoch seconds). `Timestamp`
//! wraps them as UTC-only instants with seconds precision, so that claim
//! comparison and error display never involve local timezones.
//!
//! The verification time is always an injected `Timestamp` parameter,
//! never ambient state — a verification call stays a pure function of its
//! inputs and tests are deterministic.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// A UTC timestamp truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// From a Unix epoch value in seconds — the CWT NumericDate form used
    /// by the `exp` and `nbf` claims.
    ///
    /// # Errors
    ///
    /// [`DecodeError::MalformedClaims`] when the value is outside the
    /// representable range.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, DecodeError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| DecodeError::MalformedClaims(format!("timestamp out of range: {secs}")))
    }

    /// The Unix epoch value in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Render as ISO8601 with Z suffix (e.g. `2031-11-02T20:05:30Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision.
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
