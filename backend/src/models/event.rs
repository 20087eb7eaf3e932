//! Incoming and outgoing event records.
//!
//! This module defines the immutable records that flow through the club:
//! - [`InputEvent`]: one parsed line of the input log
//! - [`OutputEvent`]: one record the club emits while processing
//! - [`EventLog`]: the ordered sequence of everything emitted during a day
//!
//! # Event Kinds
//!
//! Incoming kinds come from the log; outgoing kinds are produced by the club:
//! - **1** client arrived, **2** client sat at a table, **3** client is
//!   waiting, **4** client left
//! - **11** client forced out, **12** client seated from the queue,
//!   **13** business-rule error
//!
//! # Example
//!
//! ```rust
//! use computer_club_core::models::{EventKind, InputEvent};
//!
//! let event = InputEvent::parse("09:54 2 client1 1").unwrap();
//! assert_eq!(event.kind(), EventKind::ClientSat);
//! assert_eq!(event.client(), "client1");
//! assert_eq!(event.table(), Some(1));
//! assert_eq!(event.to_string(), "09:54 2 client1 1");
//! ```

use crate::core::time::{ClockTime, TimeParseError};
use crate::models::table::TableSummary;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Numeric event kind as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ClientArrived,
    ClientSat,
    ClientWaiting,
    ClientLeft,
    ClientForcedOut,
    ClientSeated,
    Error,
}

impl EventKind {
    /// Wire code of this kind
    pub fn code(&self) -> u8 {
        match self {
            EventKind::ClientArrived => 1,
            EventKind::ClientSat => 2,
            EventKind::ClientWaiting => 3,
            EventKind::ClientLeft => 4,
            EventKind::ClientForcedOut => 11,
            EventKind::ClientSeated => 12,
            EventKind::Error => 13,
        }
    }

    /// Resolve an incoming wire code
    ///
    /// Only codes 1..=4 may appear in the input log; outgoing codes are
    /// rejected here.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(EventKind::ClientArrived),
            2 => Some(EventKind::ClientSat),
            3 => Some(EventKind::ClientWaiting),
            4 => Some(EventKind::ClientLeft),
            _ => None,
        }
    }

    /// Whether lines of this kind carry a table index
    pub fn requires_table(&self) -> bool {
        matches!(self, EventKind::ClientSat | EventKind::ClientSeated)
    }
}

/// Errors produced while parsing a single event line
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected 3 or 4 space-separated fields, got {0}")]
    FieldCount(usize),

    #[error("invalid time: {0}")]
    Time(#[from] TimeParseError),

    #[error("unknown event id '{0}'")]
    UnknownEventId(String),

    #[error("invalid client name '{0}'")]
    InvalidClientName(String),

    #[error("invalid table index '{0}'")]
    InvalidTable(String),

    #[error("event {0} requires a table index")]
    MissingTable(u8),

    #[error("event {0} does not take a table index")]
    UnexpectedTable(u8),
}

/// Client names are restricted to `[a-z0-9_]`
pub fn is_valid_client_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// One parsed line of the input log
///
/// The verbatim source line is kept so the club can echo it back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    time: ClockTime,
    kind: EventKind,
    client: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    table: Option<usize>,
    #[serde(skip)]
    source: String,
}

impl InputEvent {
    /// Parse one event line
    ///
    /// This is the single syntax check shared by the validator and the
    /// simulator: `HH:MM <id> <name> [<table>]`, single-space separated.
    /// Cross-line rules (ordering, table range) belong to the validator.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split(' ').collect();
        if !(3..=4).contains(&fields.len()) {
            return Err(ParseError::FieldCount(fields.len()));
        }

        let time = ClockTime::parse(fields[0])?;

        let kind = fields[1]
            .parse::<u8>()
            .ok()
            .and_then(EventKind::from_code)
            .ok_or_else(|| ParseError::UnknownEventId(fields[1].to_string()))?;

        let client = fields[2];
        if !is_valid_client_name(client) {
            return Err(ParseError::InvalidClientName(client.to_string()));
        }

        let table = match fields.get(3) {
            Some(raw) => match raw.parse::<usize>() {
                Ok(index) if index > 0 => Some(index),
                _ => return Err(ParseError::InvalidTable(raw.to_string())),
            },
            None => None,
        };

        match (kind.requires_table(), table) {
            (true, None) => return Err(ParseError::MissingTable(kind.code())),
            (false, Some(_)) => return Err(ParseError::UnexpectedTable(kind.code())),
            _ => {}
        }

        Ok(Self {
            time,
            kind,
            client: client.to_string(),
            table,
            source: line.to_string(),
        })
    }

    pub fn time(&self) -> ClockTime {
        self.time
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    /// Target table, present only for [`EventKind::ClientSat`]
    pub fn table(&self) -> Option<usize> {
        self.table
    }

    /// The line this event was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.source.is_empty() {
            return f.write_str(&self.source);
        }
        write!(f, "{} {} {}", self.time, self.kind.code(), self.client)?;
        if let Some(table) = self.table {
            write!(f, " {}", table)?;
        }
        Ok(())
    }
}

/// Business-rule violations reported inline as event 13
///
/// These never abort the run. `Display` yields the literal text written to
/// the output.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClubError {
    #[error("YouShallNotPass")]
    YouShallNotPass,

    #[error("NotOpenYet")]
    NotOpenYet,

    #[error("PlaceIsBusy")]
    PlaceIsBusy,

    #[error("ClientUnknown")]
    ClientUnknown,

    #[error("ICanWaitNoLonger")]
    ICanWaitNoLonger,
}

/// Record emitted by the club, in the order it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputEvent {
    /// The club opened
    Opened { time: ClockTime },

    /// An input line, echoed back
    Incoming { event: InputEvent },

    /// Client left without asking (event 11): queue overflow or closing time
    ClientForcedOut { time: ClockTime, client: String },

    /// A waiting client took a table freed by a departure (event 12)
    ClientSeated {
        time: ClockTime,
        client: String,
        table: usize,
    },

    /// A business rule rejected the incoming event (event 13)
    Error { time: ClockTime, error: ClubError },

    /// The club closed
    Closed { time: ClockTime },

    /// End-of-day figures for one table
    TableSummary(TableSummary),
}

impl OutputEvent {
    /// Event kind for records that carry one on the wire
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            OutputEvent::Incoming { event } => Some(event.kind()),
            OutputEvent::ClientForcedOut { .. } => Some(EventKind::ClientForcedOut),
            OutputEvent::ClientSeated { .. } => Some(EventKind::ClientSeated),
            OutputEvent::Error { .. } => Some(EventKind::Error),
            OutputEvent::Opened { .. }
            | OutputEvent::Closed { .. }
            | OutputEvent::TableSummary { .. } => None,
        }
    }

    /// Time the record refers to, if any
    pub fn time(&self) -> Option<ClockTime> {
        match self {
            OutputEvent::Opened { time }
            | OutputEvent::ClientForcedOut { time, .. }
            | OutputEvent::ClientSeated { time, .. }
            | OutputEvent::Error { time, .. }
            | OutputEvent::Closed { time } => Some(*time),
            OutputEvent::Incoming { event } => Some(event.time()),
            OutputEvent::TableSummary { .. } => None,
        }
    }

    /// Client the record names, if any
    pub fn client(&self) -> Option<&str> {
        match self {
            OutputEvent::Incoming { event } => Some(event.client()),
            OutputEvent::ClientForcedOut { client, .. } => Some(client),
            OutputEvent::ClientSeated { client, .. } => Some(client),
            _ => None,
        }
    }
}

impl fmt::Display for OutputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputEvent::Opened { time } | OutputEvent::Closed { time } => write!(f, "{}", time),
            OutputEvent::Incoming { event } => write!(f, "{}", event),
            OutputEvent::ClientForcedOut { time, client } => {
                write!(f, "{} {} {}", time, EventKind::ClientForcedOut.code(), client)
            }
            OutputEvent::ClientSeated {
                time,
                client,
                table,
            } => write!(
                f,
                "{} {} {} {}",
                time,
                EventKind::ClientSeated.code(),
                client,
                table
            ),
            OutputEvent::Error { time, error } => {
                write!(f, "{} {} {}", time, EventKind::Error.code(), error)
            }
            OutputEvent::TableSummary(summary) => write!(f, "{}", summary),
        }
    }
}

/// Ordered log of everything the club emitted.
///
/// A thin wrapper around `Vec<OutputEvent>` with query helpers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<OutputEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append a record
    pub fn log(&mut self, event: OutputEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[OutputEvent] {
        &self.events
    }

    /// Every business-rule error, in order
    pub fn errors(&self) -> Vec<ClubError> {
        self.events
            .iter()
            .filter_map(|e| match e {
                OutputEvent::Error { error, .. } => Some(*error),
                _ => None,
            })
            .collect()
    }

    /// Records naming a specific client
    pub fn events_for_client(&self, client: &str) -> Vec<&OutputEvent> {
        self.events
            .iter()
            .filter(|e| e.client() == Some(client))
            .collect()
    }

    /// Records of a specific kind
    pub fn events_of_kind(&self, kind: EventKind) -> Vec<&OutputEvent> {
        self.events
            .iter()
            .filter(|e| e.kind() == Some(kind))
            .collect()
    }
}
