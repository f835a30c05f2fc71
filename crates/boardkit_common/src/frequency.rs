//! Clock frequencies.

use serde::Serialize;
use std::fmt;

/// A clock frequency stored in Hertz.
///
/// [`Frequency::from_hz`] rejects zero, negative and non-finite values, so a
/// `Frequency` in hand is always a usable clock rate. Serializes as a bare
/// number of Hertz.
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(into = "f64")]
pub struct Frequency(f64);

/// Errors produced when constructing a [`Frequency`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrequencyError {
    /// The value is not a positive, finite rate.
    #[error("frequency must be positive and finite, got {0} Hz")]
    NotPositive(f64),
}

impl Frequency {
    /// Creates a frequency from a value in Hertz.
    pub fn from_hz(hz: f64) -> Result<Self, FrequencyError> {
        if hz.is_finite() && hz > 0.0 {
            Ok(Self(hz))
        } else {
            Err(FrequencyError::NotPositive(hz))
        }
    }

    /// Returns the frequency in Hertz.
    pub fn hz(&self) -> f64 {
        self.0
    }

    /// Returns the frequency in megahertz.
    pub fn mhz(&self) -> f64 {
        self.0 / 1_000_000.0
    }
}

impl From<Frequency> for f64 {
    fn from(f: Frequency) -> Self {
        f.0
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        if hz >= 1_000_000_000.0 {
            write!(f, "{}GHz", hz / 1_000_000_000.0)
        } else if hz >= 1_000_000.0 {
            write!(f, "{}MHz", hz / 1_000_000.0)
        } else if hz >= 1_000.0 {
            write!(f, "{}kHz", hz / 1_000.0)
        } else {
            write!(f, "{hz}Hz")
        }
    }
}
