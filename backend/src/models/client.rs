//! Client model
//!
//! A client is registered on arrival and forgotten as soon as they leave.
//! While registered, they are either waiting (no table) or seated at exactly
//! one table with a running session.

use crate::core::time::ClockTime;
use serde::{Deserialize, Serialize};

/// Where a registered client currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Placement {
    /// In the waiting queue
    Waiting,

    /// At a table since `since`
    Seated { table: usize, since: ClockTime },
}

/// A client currently inside the club
///
/// # Example
/// ```
/// use computer_club_core::models::Client;
///
/// let client = Client::new("client1".to_string());
/// assert!(client.is_waiting());
/// assert_eq!(client.table(), None);
/// assert_eq!(client.session_start(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    name: String,
    placement: Placement,
}

impl Client {
    /// A freshly arrived client starts out waiting
    pub fn new(name: String) -> Self {
        Self {
            name,
            placement: Placement::Waiting,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn is_waiting(&self) -> bool {
        self.placement == Placement::Waiting
    }

    /// Table the client occupies, `None` while waiting
    pub fn table(&self) -> Option<usize> {
        match self.placement {
            Placement::Seated { table, .. } => Some(table),
            Placement::Waiting => None,
        }
    }

    /// Start of the current session, `None` while waiting
    pub fn session_start(&self) -> Option<ClockTime> {
        match self.placement {
            Placement::Seated { since, .. } => Some(since),
            Placement::Waiting => None,
        }
    }

    pub(crate) fn sit(&mut self, table: usize, since: ClockTime) {
        self.placement = Placement::Seated { table, since };
    }
}
