//! Pre-flight validation of an input log
//!
//! The whole log is checked before the club opens, so the engine only ever
//! sees well-formed, ordered events:
//! - Header: table count, `HH:MM HH:MM` business hours, hourly price
//! - Every event line parses with [`InputEvent::parse`]
//! - Event times strictly increase
//! - Table indexes do not exceed the table count
//!
//! The first failure aborts validation and carries the offending line
//! verbatim, which is the only diagnostic shown to the user.

use crate::core::time::{ClockTime, TimeParseError};
use crate::models::event::{InputEvent, ParseError};
use crate::orchestrator::{ClubConfig, ConfigError};
use thiserror::Error;
use tracing::debug;

/// Why a header line was rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeaderFault {
    #[error("header is incomplete")]
    Missing,

    #[error("table count must be a positive integer")]
    TableCount,

    #[error("business hours must be 'HH:MM HH:MM'")]
    HoursFormat,

    #[error("invalid business hours: {0}")]
    Hours(#[from] TimeParseError),

    #[error("hourly price must be a positive integer")]
    Price,

    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// Validation failure, always tied to one input line
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid header line '{line}': {fault}")]
    Header { line: String, fault: HeaderFault },

    #[error("invalid event line '{line}': {source}")]
    Event {
        line: String,
        #[source]
        source: ParseError,
    },

    #[error("event line '{line}' is not later than the previous event")]
    OutOfOrder { line: String },

    #[error("event line '{line}' names table {table}, but the club has {tables}")]
    TableOutOfRange {
        line: String,
        table: usize,
        tables: usize,
    },
}

impl ValidationError {
    /// The offending input line, verbatim
    pub fn line(&self) -> &str {
        match self {
            ValidationError::Header { line, .. }
            | ValidationError::Event { line, .. }
            | ValidationError::OutOfOrder { line }
            | ValidationError::TableOutOfRange { line, .. } => line,
        }
    }
}

/// A log that passed validation, ready to be fed to the club
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLog {
    pub config: ClubConfig,
    pub events: Vec<InputEvent>,
}

/// Read the three header lines and build the club configuration
///
/// Blank lines before and between header lines are skipped. When the input
/// ends early the error carries the last line read (empty if none).
pub fn parse_header<'a, I>(lines: &mut I) -> Result<ClubConfig, ValidationError>
where
    I: Iterator<Item = &'a str>,
{
    let mut last = "";
    let mut next_line = |last: &mut &'a str| -> Result<&'a str, ValidationError> {
        match lines.find(|l| !l.trim().is_empty()) {
            Some(line) => {
                *last = line;
                Ok(line)
            }
            None => Err(header_error(*last, HeaderFault::Missing)),
        }
    };

    let tables_line = next_line(&mut last)?;
    let tables = match tables_line.parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => return Err(header_error(tables_line, HeaderFault::TableCount)),
    };

    let hours_line = next_line(&mut last)?;
    let (opens_at, closes_at) =
        parse_hours(hours_line).map_err(|fault| header_error(hours_line, fault))?;

    let price_line = next_line(&mut last)?;
    let hourly_price = match price_line.parse::<u64>() {
        Ok(p) if p > 0 => p,
        _ => return Err(header_error(price_line, HeaderFault::Price)),
    };

    ClubConfig::new(tables, hourly_price, opens_at, closes_at)
        .map_err(|e| header_error(hours_line, e.into()))
}

fn parse_hours(line: &str) -> Result<(ClockTime, ClockTime), HeaderFault> {
    let parts: Vec<&str> = line.split(' ').collect();
    let [opens, closes] = parts.as_slice() else {
        return Err(HeaderFault::HoursFormat);
    };
    Ok((ClockTime::parse(opens)?, ClockTime::parse(closes)?))
}

fn header_error(line: &str, fault: HeaderFault) -> ValidationError {
    ValidationError::Header {
        line: line.to_string(),
        fault,
    }
}

/// Validate a complete input log
///
/// # Example
///
/// ```rust
/// use computer_club_core::validation::validate_log;
///
/// let log = "1\n08:00 19:00\n10\n08:48 1 client1\n08:47 1 client2\n";
/// let err = validate_log(log).unwrap_err();
/// assert_eq!(err.line(), "08:47 1 client2");
/// ```
pub fn validate_log(text: &str) -> Result<ValidatedLog, ValidationError> {
    let mut lines = text.lines();
    let config = parse_header(&mut lines)?;

    let body: Vec<&str> = lines.collect();
    let end = body
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(0, |i| i + 1);

    let mut events = Vec::with_capacity(end);
    let mut previous: Option<ClockTime> = None;

    for line in &body[..end] {
        let event = InputEvent::parse(line).map_err(|source| ValidationError::Event {
            line: line.to_string(),
            source,
        })?;

        if previous.is_some_and(|p| event.time() <= p) {
            return Err(ValidationError::OutOfOrder {
                line: line.to_string(),
            });
        }

        if let Some(table) = event.table().filter(|&t| t > config.tables) {
            return Err(ValidationError::TableOutOfRange {
                line: line.to_string(),
                table,
                tables: config.tables,
            });
        }

        previous = Some(event.time());
        events.push(event);
    }

    debug!(events = events.len(), tables = config.tables, "input log validated");
    Ok(ValidatedLog { config, events })
}
