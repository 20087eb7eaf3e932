//! Club State
//!
//! Represents the complete mutable state of the club during one day:
//! the tables, the registry of clients inside, and the waiting queue.
//!
//! Every mutation goes through the methods below so that the registry, the
//! queue and table occupancy never disagree.
//!
//! # Critical Invariants
//!
//! 1. **Free Counter**: `free_tables` equals the number of tables with no occupant
//! 2. **Exclusive Placement**: a registered client is either queued or seated, never both
//! 3. **Back References**: a seated client's table names that client as occupant
//! 4. **Queue Validity**: every queued name is registered, waiting, and queued once

use crate::core::time::ClockTime;
use crate::models::client::{Client, Placement};
use crate::models::table::Table;
use crate::settlement::{bill_session, SessionCharge};
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;
use tracing::trace;

/// Errors raised by state mutations and invariant checks
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("client {0} is already inside")]
    ClientAlreadyPresent(String),

    #[error("client {0} is not inside")]
    ClientNotFound(String),

    #[error("table {0} does not exist")]
    TableNotFound(usize),

    #[error("table {0} is occupied")]
    TableBusy(usize),

    #[error("free table counter is {counted}, but {actual} tables are free")]
    FreeCounterMismatch { counted: usize, actual: usize },

    #[error("queued client {0} is not registered")]
    QueuedClientMissing(String),

    #[error("client {0} is queued while seated")]
    QueuedClientSeated(String),

    #[error("client {0} is queued more than once")]
    DuplicateQueueEntry(String),

    #[error("waiting client {0} is not in the queue")]
    WaitingClientNotQueued(String),

    #[error("client {client} claims table {table}, which does not point back")]
    SeatMismatch { client: String, table: usize },

    #[error("table {table} is held by {client}, who is not seated there")]
    OccupantMismatch { table: usize, client: String },
}

/// What a departure released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Departure {
    /// Table the client was sitting at, now free
    pub freed_table: Option<usize>,

    /// Charge for the session that just ended
    pub charge: Option<SessionCharge>,
}

/// Complete club state
///
/// # Example
///
/// ```rust
/// use computer_club_core::models::ClubState;
/// use computer_club_core::ClockTime;
///
/// let mut state = ClubState::new(2, 10);
/// state.admit("client1").unwrap();
/// assert_eq!(state.queue_len(), 1);
///
/// state.seat("client1", 2, ClockTime::parse("09:00").unwrap()).unwrap();
/// assert_eq!(state.queue_len(), 0);
/// assert_eq!(state.free_tables(), 1);
/// assert!(state.verify_invariants().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ClubState {
    /// Tables, `tables[i]` has id `i + 1`
    tables: Vec<Table>,

    /// Every client currently inside, by name
    clients: HashMap<String, Client>,

    /// Names of waiting clients, head first
    queue: VecDeque<String>,

    /// Number of tables with no occupant
    free_tables: usize,

    hourly_price: u64,
}

impl ClubState {
    /// Create an empty club with `num_tables` free tables
    pub fn new(num_tables: usize, hourly_price: u64) -> Self {
        Self {
            tables: (1..=num_tables).map(Table::new).collect(),
            clients: HashMap::new(),
            queue: VecDeque::new(),
            free_tables: num_tables,
            hourly_price,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn contains(&self, name: &str) -> bool {
        self.clients.contains_key(name)
    }

    pub fn client(&self, name: &str) -> Option<&Client> {
        self.clients.get(name)
    }

    pub fn num_clients(&self) -> usize {
        self.clients.len()
    }

    /// Table by 1-based id
    pub fn table(&self, id: usize) -> Option<&Table> {
        id.checked_sub(1).and_then(|i| self.tables.get(i))
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn num_tables(&self) -> usize {
        self.tables.len()
    }

    pub fn free_tables(&self) -> usize {
        self.free_tables
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Waiting clients, head first
    pub fn queue(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    pub fn hourly_price(&self) -> u64 {
        self.hourly_price
    }

    fn table_mut(&mut self, id: usize) -> Result<&mut Table, StateError> {
        id.checked_sub(1)
            .and_then(|i| self.tables.get_mut(i))
            .ok_or(StateError::TableNotFound(id))
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Register a new client at the tail of the queue
    pub fn admit(&mut self, name: &str) -> Result<(), StateError> {
        if self.clients.contains_key(name) {
            return Err(StateError::ClientAlreadyPresent(name.to_string()));
        }
        self.clients
            .insert(name.to_string(), Client::new(name.to_string()));
        self.queue.push_back(name.to_string());
        trace!(client = name, queue_len = self.queue.len(), "client admitted");
        Ok(())
    }

    /// Seat a registered client at a free table
    ///
    /// A waiting client leaves the queue. A client already seated elsewhere
    /// has that session billed and the old table freed first; the returned
    /// charge describes it.
    pub fn seat(
        &mut self,
        name: &str,
        table: usize,
        at: ClockTime,
    ) -> Result<Option<SessionCharge>, StateError> {
        let placement = self
            .clients
            .get(name)
            .map(Client::placement)
            .ok_or_else(|| StateError::ClientNotFound(name.to_string()))?;

        let target = self.table(table).ok_or(StateError::TableNotFound(table))?;
        if !target.is_free() {
            return Err(StateError::TableBusy(table));
        }

        let previous = match placement {
            Placement::Waiting => {
                self.dequeue(name);
                None
            }
            Placement::Seated { table: old, since } => {
                let charge = bill_session(self.hourly_price, since, at);
                self.table_mut(old)?.close_session(charge);
                self.free_tables += 1;
                Some(charge)
            }
        };

        self.occupy(name, table, at)?;
        Ok(previous)
    }

    /// Remove a client from the club entirely
    ///
    /// A seated client's session is billed and the table freed; a waiting
    /// client simply leaves the queue.
    pub fn remove_client(&mut self, name: &str, at: ClockTime) -> Result<Departure, StateError> {
        let client = self
            .clients
            .remove(name)
            .ok_or_else(|| StateError::ClientNotFound(name.to_string()))?;

        let departure = match client.placement() {
            Placement::Waiting => {
                self.dequeue(name);
                Departure::default()
            }
            Placement::Seated { table, since } => {
                let charge = bill_session(self.hourly_price, since, at);
                self.table_mut(table)?.close_session(charge);
                self.free_tables += 1;
                Departure {
                    freed_table: Some(table),
                    charge: Some(charge),
                }
            }
        };

        trace!(client = name, freed_table = ?departure.freed_table, "client removed");
        Ok(departure)
    }

    /// Give a free table to the client at the head of the queue
    ///
    /// Returns the seated client's name, or `None` if nobody is waiting.
    pub fn seat_next_from_queue(
        &mut self,
        table: usize,
        at: ClockTime,
    ) -> Result<Option<String>, StateError> {
        let target = self.table(table).ok_or(StateError::TableNotFound(table))?;
        if !target.is_free() {
            return Err(StateError::TableBusy(table));
        }

        let Some(name) = self.queue.pop_front() else {
            return Ok(None);
        };
        self.occupy(&name, table, at)?;
        Ok(Some(name))
    }

    /// Close out everyone still inside at `at`
    ///
    /// Seated clients are billed up to `at`. Returns the removed names in
    /// ascending order.
    pub fn drain_clients(&mut self, at: ClockTime) -> Result<Vec<String>, StateError> {
        let mut names: Vec<String> = self.clients.keys().cloned().collect();
        names.sort();

        for name in &names {
            self.remove_client(name, at)?;
        }
        Ok(names)
    }

    fn occupy(&mut self, name: &str, table: usize, at: ClockTime) -> Result<(), StateError> {
        self.table_mut(table)?.occupy(name);
        self.clients
            .get_mut(name)
            .ok_or_else(|| StateError::ClientNotFound(name.to_string()))?
            .sit(table, at);
        self.free_tables -= 1;
        trace!(client = name, table, free_tables = self.free_tables, "table occupied");
        Ok(())
    }

    fn dequeue(&mut self, name: &str) {
        self.queue.retain(|queued| queued != name);
    }

    // ========================================================================
    // Invariant Checking
    // ========================================================================

    /// Check every consistency rule between registry, queue and tables
    pub fn verify_invariants(&self) -> Result<(), StateError> {
        let actual = self.tables.iter().filter(|t| t.is_free()).count();
        if actual != self.free_tables {
            return Err(StateError::FreeCounterMismatch {
                counted: self.free_tables,
                actual,
            });
        }

        let mut seen = HashSet::new();
        for name in &self.queue {
            if !seen.insert(name.as_str()) {
                return Err(StateError::DuplicateQueueEntry(name.clone()));
            }
            match self.clients.get(name) {
                None => return Err(StateError::QueuedClientMissing(name.clone())),
                Some(client) if !client.is_waiting() => {
                    return Err(StateError::QueuedClientSeated(name.clone()))
                }
                Some(_) => {}
            }
        }

        for client in self.clients.values() {
            match client.table() {
                None if !seen.contains(client.name()) => {
                    return Err(StateError::WaitingClientNotQueued(
                        client.name().to_string(),
                    ))
                }
                None => {}
                Some(table) => {
                    if self.table(table).and_then(Table::occupant) != Some(client.name()) {
                        return Err(StateError::SeatMismatch {
                            client: client.name().to_string(),
                            table,
                        });
                    }
                }
            }
        }

        for table in &self.tables {
            if let Some(occupant) = table.occupant() {
                let seated_here = self
                    .clients
                    .get(occupant)
                    .and_then(Client::table)
                    .is_some_and(|t| t == table.id());
                if !seated_here {
                    return Err(StateError::OccupantMismatch {
                        table: table.id(),
                        client: occupant.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}
