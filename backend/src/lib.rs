//! Computer Club Core - Rust Engine
//!
//! Deterministic simulation of one day of a computer club, driven entirely
//! by a timestamped event log.
//!
//! # Architecture
//!
//! - **core**: Time-of-day and duration arithmetic
//! - **models**: Domain types (Client, Table, ClubState, event records)
//! - **settlement**: Session billing
//! - **orchestrator**: The event-processing engine and end-of-day settlement
//! - **validation**: Pre-flight checks of the whole input log
//! - **report**: Text and JSON rendering of the day's records
//!
//! # Critical Invariants
//!
//! 1. All times are minutes since midnight, all money is integer
//! 2. The free-table counter always equals the number of unoccupied tables
//! 3. A registered client is either queued or seated, never both
//! 4. Business-rule violations are output records, never errors
//!
//! # Example
//!
//! ```rust
//! use computer_club_core::{report, run_day, validate_log};
//!
//! let input = "\
//! 1
//! 08:00 19:00
//! 10
//! 08:48 1 client1
//! 09:48 2 client1 1
//! 09:52 1 client2
//! 09:53 3 client2
//! 10:00 4 client1
//! ";
//!
//! let log = validate_log(input).unwrap();
//! let day = run_day(log.config, log.events).unwrap();
//! let text = report::render_text(&day);
//!
//! assert!(text.contains("10:00 12 client2 1\n"));
//! assert!(text.ends_with("19:00 11 client2\n19:00\n1 100 09:12\n"));
//! ```

// Module declarations
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod report;
pub mod settlement;
pub mod validation;

// Re-exports for convenience
pub use crate::core::time::{ClockTime, Minutes, TimeParseError};
pub use models::{
    client::Client,
    event::{ClubError, EventKind, EventLog, InputEvent, OutputEvent, ParseError},
    state::{ClubState, StateError},
    table::{Table, TableSummary},
};
pub use orchestrator::{
    run_day, ClubConfig, ComputerClub, ConfigError, DayReport, SimulationError, StepResult,
};
pub use settlement::{bill_session, SessionCharge};
pub use validation::{validate_log, ValidatedLog, ValidationError};
