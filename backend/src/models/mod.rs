//! Domain models for the computer club

pub mod client;
pub mod event;
pub mod state;
pub mod table;

// Re-exports
pub use client::{Client, Placement};
pub use event::{ClubError, EventKind, EventLog, InputEvent, OutputEvent, ParseError};
pub use state::{ClubState, Departure, StateError};
pub use table::{Table, TableSummary};
