// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::ParseEntryError;

const HZ_PER_MHZ: f64 = 1_000_000.0;

/// A frequency in whole hertz.
///
/// Stored as an integer so that repeated stepping through a range does not
/// accumulate floating point drift.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Freq(u64);

impl Freq {
    pub const fn new(hz: u64) -> Self {
        Self(hz)
    }

    /// Convert a value in MHz (fractions allowed) to the nearest hertz.
    pub fn from_mhz(mhz: f64) -> Option<Self> {
        if !mhz.is_finite() || mhz < 0.0 {
            return None;
        }
        let hz = (mhz * HZ_PER_MHZ).round();
        if hz > u64::MAX as f64 {
            return None;
        }
        Some(Self(hz as u64))
    }

    pub fn as_hz(&self) -> u64 {
        self.0
    }

    pub fn as_mhz(&self) -> f64 {
        self.0 as f64 / HZ_PER_MHZ
    }
}

impl Deref for Freq {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u64> for Freq {
    fn from(hz: u64) -> Self {
        Self(hz)
    }
}

/// Formats as MHz with six decimals, the unit used in plan and results files.
impl fmt::Display for Freq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.as_mhz())
    }
}

impl FromStr for Freq {
    type Err = ParseEntryError;

    /// Parse a MHz value as written in the plan file.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        s.parse::<f64>()
            .ok()
            .and_then(Freq::from_mhz)
            .ok_or_else(|| ParseEntryError::Frequency(s.to_string()))
    }
}

/// Receiver demodulation mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    NarrowFm,
    WideFm,
}

impl Mode {
    /// The numeric code used in the plan file.
    pub fn code(&self) -> u8 {
        match self {
            Mode::NarrowFm => 0,
            Mode::WideFm => 1,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::NarrowFm => write!(f, "nbfm"),
            Mode::WideFm => write!(f, "wbfm"),
        }
    }
}

impl FromStr for Mode {
    type Err = ParseEntryError;

    /// An empty field selects narrow FM.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "0" => Ok(Mode::NarrowFm),
            "1" => Ok(Mode::WideFm),
            other => Err(ParseEntryError::Mode(other.to_string())),
        }
    }
}
