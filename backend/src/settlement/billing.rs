//! Session billing
//!
//! A session is charged per started hour: any fraction of an hour costs a
//! full hour, while the table's occupied time records the raw minutes.
//!
//! # Critical Invariants
//!
//! - **Monotonic**: a charge never subtracts from a table's totals
//! - **Additive**: a table's totals equal the sum of its session charges
//! - **Exact**: integer minutes and integer prices only

use crate::core::time::{ClockTime, Minutes};
use serde::{Deserialize, Serialize};

/// What one finished session adds to its table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCharge {
    /// Raw elapsed time, not rounded
    pub duration: Minutes,

    /// `price × ceil(hours)`
    pub revenue: u64,
}

/// Bill a session that ran from `start` to `end`
///
/// # Example
///
/// ```rust
/// use computer_club_core::settlement::bill_session;
/// use computer_club_core::{ClockTime, Minutes};
///
/// let start = ClockTime::parse("08:48").unwrap();
/// let end = ClockTime::parse("10:00").unwrap();
///
/// let charge = bill_session(10, start, end);
/// assert_eq!(charge.duration, Minutes::new(72));
/// assert_eq!(charge.revenue, 20);
/// ```
pub fn bill_session(hourly_price: u64, start: ClockTime, end: ClockTime) -> SessionCharge {
    let duration = end.minutes_since(start);
    SessionCharge {
        duration,
        revenue: hourly_price * u64::from(duration.ceil_hours()),
    }
}
