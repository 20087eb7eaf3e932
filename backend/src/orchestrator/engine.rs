//! Club Engine
//!
//! The event-processing state machine for one day of the club:
//! - Echo each incoming event
//! - Apply the business rules (hours, registry, tables, queue)
//! - Emit derived events (forced departures, queue seating, errors)
//! - Settle everyone still inside at closing time
//!
//! # Architecture
//!
//! ```text
//! open(config)          -> Opened
//! for each input event:
//!   1. echo the line
//!   2. outside opening hours?        -> 13 NotOpenYet
//!   3. dispatch on the event kind    -> state change and/or 11 / 12 / 13
//! close()
//!   4. bill seated clients up to closing time
//!   5. 11 for every remaining client, by name
//!   6. Closed, then one summary per table
//! ```
//!
//! Business-rule violations are ordinary output records. The only `Err`
//! this module returns is [`SimulationError`], which signals an invalid
//! configuration or an internal inconsistency.
//!
//! # Example
//!
//! ```rust
//! use computer_club_core::orchestrator::{ClubConfig, ComputerClub};
//! use computer_club_core::{ClockTime, InputEvent};
//!
//! let config = ClubConfig {
//!     tables: 1,
//!     hourly_price: 10,
//!     opens_at: ClockTime::parse("08:00").unwrap(),
//!     closes_at: ClockTime::parse("19:00").unwrap(),
//! };
//!
//! let mut club = ComputerClub::open(config).unwrap();
//! club.handle(InputEvent::parse("08:48 1 client1").unwrap()).unwrap();
//! club.handle(InputEvent::parse("08:50 2 client1 1").unwrap()).unwrap();
//!
//! let report = club.close().unwrap();
//! assert_eq!(report.total_revenue(), 110);
//! ```

use crate::core::time::ClockTime;
use crate::models::event::{ClubError, EventKind, EventLog, InputEvent, OutputEvent};
use crate::models::state::{ClubState, StateError};
use crate::models::table::TableSummary;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

// ============================================================================
// Configuration Types
// ============================================================================

/// Club configuration, fixed for the whole day
///
/// # Fields
///
/// * `tables` - Number of tables, indexed 1..=tables
/// * `hourly_price` - Price of one started hour at a table
/// * `opens_at` / `closes_at` - Business hours, same calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubConfig {
    pub tables: usize,
    pub hourly_price: u64,
    pub opens_at: ClockTime,
    pub closes_at: ClockTime,
}

/// Configuration rejected at construction
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("table count must be positive")]
    NoTables,

    #[error("hourly price must be positive")]
    ZeroPrice,

    #[error("closing time {closes_at} is before opening time {opens_at}")]
    ClosesBeforeOpening {
        opens_at: ClockTime,
        closes_at: ClockTime,
    },
}

impl ClubConfig {
    /// Build a validated configuration
    pub fn new(
        tables: usize,
        hourly_price: u64,
        opens_at: ClockTime,
        closes_at: ClockTime,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            tables,
            hourly_price,
            opens_at,
            closes_at,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tables == 0 {
            return Err(ConfigError::NoTables);
        }
        if self.hourly_price == 0 {
            return Err(ConfigError::ZeroPrice);
        }
        if self.opens_at > self.closes_at {
            return Err(ConfigError::ClosesBeforeOpening {
                opens_at: self.opens_at,
                closes_at: self.closes_at,
            });
        }
        Ok(())
    }

    /// Whether `time` falls within business hours (both ends inclusive)
    pub fn is_open_at(&self, time: ClockTime) -> bool {
        self.opens_at <= time && time <= self.closes_at
    }
}

// ============================================================================
// Results
// ============================================================================

/// Outcome of processing one input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    /// Time of the processed event
    pub time: ClockTime,

    /// Records emitted for this event, echo included
    pub emitted: usize,

    /// Business rule that rejected the event, if any
    pub rejection: Option<ClubError>,
}

/// Everything the club produced during the day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayReport {
    pub config: ClubConfig,
    pub events: EventLog,
}

impl DayReport {
    /// Per-table figures in ascending table order
    pub fn table_summaries(&self) -> Vec<&TableSummary> {
        self.events
            .events()
            .iter()
            .filter_map(|e| match e {
                OutputEvent::TableSummary(summary) => Some(summary),
                _ => None,
            })
            .collect()
    }

    pub fn total_revenue(&self) -> u64 {
        self.table_summaries().iter().map(|s| s.revenue).sum()
    }
}

/// Simulation error types
///
/// None of these come from client behaviour; business-rule violations are
/// reported through the event log instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("invalid event '{event}': {reason}")]
    InvalidEvent { event: String, reason: String },

    #[error("state inconsistency: {0}")]
    State(#[from] StateError),
}

/// Whether the rules accepted an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Applied,
    Rejected(ClubError),
}

// ============================================================================
// Engine
// ============================================================================

/// One day of the computer club
///
/// Owns the [`ClubState`] exclusively; [`handle`](Self::handle) is the only
/// transition function. [`close`](Self::close) consumes the club, so
/// settlement runs exactly once and no event can follow it.
#[derive(Debug, Clone)]
pub struct ComputerClub {
    config: ClubConfig,
    state: ClubState,
    event_log: EventLog,
}

impl ComputerClub {
    /// Open the club and log the opening time
    ///
    /// # Returns
    ///
    /// * `Ok(ComputerClub)` - Club ready to accept events
    /// * `Err(SimulationError)` - Configuration validation failed
    pub fn open(config: ClubConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut event_log = EventLog::new();
        event_log.log(OutputEvent::Opened {
            time: config.opens_at,
        });

        info!(
            tables = config.tables,
            hourly_price = config.hourly_price,
            opens_at = %config.opens_at,
            closes_at = %config.closes_at,
            "club opened"
        );

        Ok(Self {
            state: ClubState::new(config.tables, config.hourly_price),
            config,
            event_log,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &ClubConfig {
        &self.config
    }

    pub fn state(&self) -> &ClubState {
        &self.state
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    fn log_event(&mut self, event: OutputEvent) {
        self.event_log.log(event);
    }

    // ========================================================================
    // Transition
    // ========================================================================

    /// Process the next input event
    ///
    /// Events must be supplied in log order; the club never reorders them.
    pub fn handle(&mut self, event: InputEvent) -> Result<StepResult, SimulationError> {
        let before = self.event_log.len();
        let time = event.time();
        let kind = event.kind();
        let client = event.client().to_string();
        let table = event.table();

        debug!(%time, code = kind.code(), client = %client, ?table, "processing event");
        self.log_event(OutputEvent::Incoming { event });

        let outcome = if !self.config.is_open_at(time) {
            Outcome::Rejected(ClubError::NotOpenYet)
        } else {
            match kind {
                EventKind::ClientArrived => self.client_arrived(&client)?,
                EventKind::ClientWaiting => self.client_waiting(&client, time)?,
                EventKind::ClientSat => {
                    let table = table.ok_or_else(|| SimulationError::InvalidEvent {
                        event: format!("{} {} {}", time, kind.code(), client),
                        reason: "missing table index".to_string(),
                    })?;
                    self.client_sat(&client, table, time)?
                }
                EventKind::ClientLeft => self.client_left(&client, time)?,
                EventKind::ClientForcedOut | EventKind::ClientSeated | EventKind::Error => {
                    return Err(SimulationError::InvalidEvent {
                        event: format!("{} {} {}", time, kind.code(), client),
                        reason: "outgoing event kind in input".to_string(),
                    });
                }
            }
        };

        let rejection = match outcome {
            Outcome::Applied => None,
            Outcome::Rejected(error) => {
                debug!(%time, client = %client, %error, "event rejected");
                self.log_event(OutputEvent::Error { time, error });
                Some(error)
            }
        };

        #[cfg(debug_assertions)]
        self.state.verify_invariants()?;

        Ok(StepResult {
            time,
            emitted: self.event_log.len() - before,
            rejection,
        })
    }

    /// Event 1: register the client and put them in the queue
    fn client_arrived(&mut self, client: &str) -> Result<Outcome, SimulationError> {
        if self.state.contains(client) {
            return Ok(Outcome::Rejected(ClubError::YouShallNotPass));
        }
        self.state.admit(client)?;
        Ok(Outcome::Applied)
    }

    /// Event 3: the client says they will wait
    ///
    /// An overfull queue turns the client away; waiting while a table is
    /// free is an error. Nobody is seated here either way.
    fn client_waiting(&mut self, client: &str, time: ClockTime) -> Result<Outcome, SimulationError> {
        if !self.state.contains(client) {
            return Ok(Outcome::Rejected(ClubError::ClientUnknown));
        }

        if self.state.queue_len() > self.config.tables {
            self.state.remove_client(client, time)?;
            debug!(%time, client, "queue overflow, client turned away");
            self.log_event(OutputEvent::ClientForcedOut {
                time,
                client: client.to_string(),
            });
            return Ok(Outcome::Applied);
        }

        if self.state.free_tables() > 0 {
            return Ok(Outcome::Rejected(ClubError::ICanWaitNoLonger));
        }

        Ok(Outcome::Applied)
    }

    /// Event 2: the client takes a specific table
    ///
    /// A table the club does not have leaves everything unchanged.
    fn client_sat(
        &mut self,
        client: &str,
        table: usize,
        time: ClockTime,
    ) -> Result<Outcome, SimulationError> {
        if !self.state.contains(client) {
            return Ok(Outcome::Rejected(ClubError::ClientUnknown));
        }

        let Some(target) = self.state.table(table) else {
            debug!(%time, client, table, "no such table, event ignored");
            return Ok(Outcome::Applied);
        };
        if !target.is_free() {
            return Ok(Outcome::Rejected(ClubError::PlaceIsBusy));
        }

        if let Some(charge) = self.state.seat(client, table, time)? {
            debug!(%time, client, revenue = charge.revenue, "client changed tables");
        }
        Ok(Outcome::Applied)
    }

    /// Event 4: the client leaves; the head of the queue inherits the table
    fn client_left(&mut self, client: &str, time: ClockTime) -> Result<Outcome, SimulationError> {
        if !self.state.contains(client) {
            return Ok(Outcome::Rejected(ClubError::ClientUnknown));
        }

        let departure = self.state.remove_client(client, time)?;
        if let Some(charge) = departure.charge {
            debug!(%time, client, revenue = charge.revenue, minutes = charge.duration.as_minutes(), "session closed");
        }

        if let Some(table) = departure.freed_table {
            if let Some(next) = self.state.seat_next_from_queue(table, time)? {
                self.log_event(OutputEvent::ClientSeated {
                    time,
                    client: next,
                    table,
                });
            }
        }

        Ok(Outcome::Applied)
    }

    // ========================================================================
    // End of Day
    // ========================================================================

    /// Close the club and settle the day
    ///
    /// Everyone still inside is billed up to closing time and forced out in
    /// ascending name order, then one summary per table is logged.
    pub fn close(mut self) -> Result<DayReport, SimulationError> {
        let closes_at = self.config.closes_at;

        let remaining = self.state.drain_clients(closes_at)?;
        debug!(remaining = remaining.len(), "settling remaining clients");
        for client in remaining {
            self.log_event(OutputEvent::ClientForcedOut {
                time: closes_at,
                client,
            });
        }

        self.log_event(OutputEvent::Closed { time: closes_at });

        let summaries: Vec<TableSummary> =
            self.state.tables().iter().map(TableSummary::from).collect();
        for summary in summaries {
            self.log_event(OutputEvent::TableSummary(summary));
        }

        #[cfg(debug_assertions)]
        self.state.verify_invariants()?;

        let report = DayReport {
            config: self.config,
            events: self.event_log,
        };
        info!(
            closes_at = %closes_at,
            total_revenue = report.total_revenue(),
            "club closed"
        );
        Ok(report)
    }
}

/// Run a whole day: open, feed every event in order, close
pub fn run_day<I>(config: ClubConfig, events: I) -> Result<DayReport, SimulationError>
where
    I: IntoIterator<Item = InputEvent>,
{
    let mut club = ComputerClub::open(config)?;
    for event in events {
        club.handle(event)?;
    }
    club.close()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> ClockTime {
        ClockTime::parse(s).unwrap()
    }

    fn config(tables: usize) -> ClubConfig {
        ClubConfig::new(tables, 10, at("08:00"), at("19:00")).unwrap()
    }

    fn ev(line: &str) -> InputEvent {
        InputEvent::parse(line).unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(
            ClubConfig::new(0, 10, at("08:00"), at("19:00")),
            Err(ConfigError::NoTables)
        );
        assert_eq!(
            ClubConfig::new(1, 0, at("08:00"), at("19:00")),
            Err(ConfigError::ZeroPrice)
        );
        assert!(matches!(
            ClubConfig::new(1, 10, at("19:00"), at("08:00")),
            Err(ConfigError::ClosesBeforeOpening { .. })
        ));
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let bad = ClubConfig {
            tables: 0,
            hourly_price: 10,
            opens_at: at("08:00"),
            closes_at: at("19:00"),
        };
        assert_eq!(
            ComputerClub::open(bad).unwrap_err(),
            SimulationError::InvalidConfig(ConfigError::NoTables)
        );
    }

    #[test]
    fn test_event_at_closing_time_is_accepted() {
        let mut club = ComputerClub::open(config(1)).unwrap();
        let step = club.handle(ev("19:00 1 late")).unwrap();
        assert_eq!(step.rejection, None);
        assert!(club.state().contains("late"));
    }

    #[test]
    fn test_step_result_counts_echo() {
        let mut club = ComputerClub::open(config(1)).unwrap();
        let step = club.handle(ev("07:59 1 early")).unwrap();
        assert_eq!(step.emitted, 2);
        assert_eq!(step.rejection, Some(ClubError::NotOpenYet));
    }

    #[test]
    fn test_waiting_client_leaving_does_not_seat_anyone() {
        let mut club = ComputerClub::open(config(1)).unwrap();
        club.handle(ev("09:00 1 a")).unwrap();
        club.handle(ev("09:01 2 a 1")).unwrap();
        club.handle(ev("09:02 1 b")).unwrap();
        club.handle(ev("09:03 1 c")).unwrap();
        let step = club.handle(ev("09:04 4 b")).unwrap();

        assert_eq!(step.emitted, 1);
        assert_eq!(club.state().queue().collect::<Vec<_>>(), vec!["c"]);
        assert_eq!(club.state().table(1).unwrap().occupant(), Some("a"));
    }

    #[test]
    fn test_sit_at_missing_table_is_ignored() {
        let mut club = ComputerClub::open(config(1)).unwrap();
        club.handle(ev("09:00 1 a")).unwrap();
        let step = club.handle(ev("09:01 2 a 5")).unwrap();

        assert_eq!(step.emitted, 1);
        assert_eq!(step.rejection, None);
        assert!(club.state().client("a").unwrap().is_waiting());
        assert_eq!(club.state().free_tables(), 1);

        let step = club.handle(ev("09:02 2 a 1")).unwrap();
        assert_eq!(step.rejection, None);
        assert_eq!(club.state().table(1).unwrap().occupant(), Some("a"));
    }

    #[test]
    fn test_close_consumes_and_reports_tables() {
        let mut club = ComputerClub::open(config(2)).unwrap();
        club.handle(ev("09:00 1 a")).unwrap();
        club.handle(ev("09:00 2 a 2")).unwrap();

        let report = club.close().unwrap();
        let summaries = report.table_summaries();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].revenue, 0);
        assert_eq!(summaries[1].revenue, 100);
        assert_eq!(summaries[1].occupied.as_minutes(), 600);
    }
}
