//! Core primitives shared by every other module

pub mod time;

pub use time::{ClockTime, Minutes, TimeParseError};
