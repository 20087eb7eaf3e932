//! Settlement Module
//!
//! Turns finished table sessions into revenue and occupied time.
//!
//! Sessions end in three ways, all billed by the same rule:
//! - the client leaves (event 4)
//! - the client moves to another table (event 2)
//! - the club closes with the client still seated
//!
//! # Example
//!
//! ```rust
//! use computer_club_core::settlement;
//! use computer_club_core::ClockTime;
//!
//! let charge = settlement::bill_session(
//!     10,
//!     ClockTime::parse("12:33").unwrap(),
//!     ClockTime::parse("15:52").unwrap(),
//! );
//! assert_eq!(charge.revenue, 40);
//! ```

pub mod billing;

// Re-export public API
pub use billing::{bill_session, SessionCharge};
