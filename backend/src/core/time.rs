//! Time-of-day handling for the simulation
//!
//! The club never looks at a real clock. Every instant comes from the input
//! log as an `HH:MM` string and is kept as minutes since midnight, so all
//! arithmetic (ordering, session length, billing hours) is exact integer math.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const MINUTES_PER_HOUR: u16 = 60;
const MINUTES_PER_DAY: u16 = 24 * MINUTES_PER_HOUR;

/// Errors produced while parsing an `HH:MM` value
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("expected HH:MM, got '{0}'")]
    Malformed(String),

    #[error("time out of range: '{0}'")]
    OutOfRange(String),
}

/// A time of day with minute resolution
///
/// # Example
/// ```
/// use computer_club_core::ClockTime;
///
/// let opens = ClockTime::parse("08:00").unwrap();
/// let arrival = ClockTime::parse("09:41").unwrap();
/// assert!(opens < arrival);
/// assert_eq!(arrival.minutes_since(opens).as_minutes(), 101);
/// assert_eq!(arrival.to_string(), "09:41");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    /// Minutes since midnight (0..1440)
    minutes: u16,
}

impl ClockTime {
    /// Build a time from hours and minutes
    ///
    /// Returns `None` when either component is out of range.
    pub fn from_hm(hours: u16, minutes: u16) -> Option<Self> {
        if hours >= MINUTES_PER_DAY / MINUTES_PER_HOUR || minutes >= MINUTES_PER_HOUR {
            return None;
        }
        Some(Self {
            minutes: hours * MINUTES_PER_HOUR + minutes,
        })
    }

    /// Parse a strict `HH:MM` string (two digits each side of the colon)
    pub fn parse(s: &str) -> Result<Self, TimeParseError> {
        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(TimeParseError::Malformed(s.to_string()));
        }

        let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(TimeParseError::Malformed(s.to_string()));
        }

        let value = |hi: u8, lo: u8| u16::from(hi - b'0') * 10 + u16::from(lo - b'0');
        let hours = value(digits[0], digits[1]);
        let minutes = value(digits[2], digits[3]);

        Self::from_hm(hours, minutes).ok_or_else(|| TimeParseError::OutOfRange(s.to_string()))
    }

    /// Minutes since midnight
    pub fn minutes_since_midnight(&self) -> u16 {
        self.minutes
    }

    pub fn hour(&self) -> u16 {
        self.minutes / MINUTES_PER_HOUR
    }

    pub fn minute(&self) -> u16 {
        self.minutes % MINUTES_PER_HOUR
    }

    /// Elapsed time from `earlier` to `self`
    ///
    /// Saturates at zero if `earlier` is actually later.
    pub fn minutes_since(&self, earlier: ClockTime) -> Minutes {
        Minutes(u32::from(self.minutes.saturating_sub(earlier.minutes)))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl std::str::FromStr for ClockTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// An elapsed duration in whole minutes
///
/// Used for session lengths and per-table accumulated occupancy. Unlike
/// [`ClockTime`] it does not wrap at midnight.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Minutes(u32);

impl Minutes {
    pub const ZERO: Minutes = Minutes(0);

    pub fn new(minutes: u32) -> Self {
        Self(minutes)
    }

    pub fn as_minutes(&self) -> u32 {
        self.0
    }

    /// Whole hours, rounded up
    ///
    /// # Example
    /// ```
    /// use computer_club_core::Minutes;
    ///
    /// assert_eq!(Minutes::new(0).ceil_hours(), 0);
    /// assert_eq!(Minutes::new(1).ceil_hours(), 1);
    /// assert_eq!(Minutes::new(60).ceil_hours(), 1);
    /// assert_eq!(Minutes::new(72).ceil_hours(), 2);
    /// ```
    pub fn ceil_hours(&self) -> u32 {
        self.0.div_ceil(u32::from(MINUTES_PER_HOUR))
    }
}

impl std::ops::Add for Minutes {
    type Output = Minutes;

    fn add(self, rhs: Minutes) -> Minutes {
        Minutes(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Minutes {
    fn add_assign(&mut self, rhs: Minutes) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let per_hour = u32::from(MINUTES_PER_HOUR);
        write!(f, "{:02}:{:02}", self.0 / per_hour, self.0 % per_hour)
    }
}
