//! Table model
//!
//! Tables are created once when the club opens and live for the whole day.
//! Their revenue and occupied time only ever grow.

use crate::core::time::Minutes;
use crate::settlement::SessionCharge;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One table of the club, indexed from 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    id: usize,
    occupant: Option<String>,
    occupied: Minutes,
    revenue: u64,
}

impl Table {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            occupant: None,
            occupied: Minutes::ZERO,
            revenue: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Name of the seated client
    pub fn occupant(&self) -> Option<&str> {
        self.occupant.as_deref()
    }

    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    /// Cumulative raw occupied time for the day
    pub fn occupied(&self) -> Minutes {
        self.occupied
    }

    /// Cumulative revenue for the day
    pub fn revenue(&self) -> u64 {
        self.revenue
    }

    pub(crate) fn occupy(&mut self, client: &str) {
        self.occupant = Some(client.to_string());
    }

    /// Add a finished session onto the totals and free the table
    pub(crate) fn close_session(&mut self, charge: SessionCharge) {
        self.occupied += charge.duration;
        self.revenue += charge.revenue;
        self.occupant = None;
    }
}

/// End-of-day figures for one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub table: usize,
    pub revenue: u64,
    pub occupied: Minutes,
}

impl From<&Table> for TableSummary {
    fn from(table: &Table) -> Self {
        TableSummary {
            table: table.id(),
            revenue: table.revenue(),
            occupied: table.occupied(),
        }
    }
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.table, self.revenue, self.occupied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_session_accumulates() {
        let mut table = Table::new(1);
        table.occupy("alice");
        assert!(!table.is_free());

        table.close_session(SessionCharge {
            duration: Minutes::new(72),
            revenue: 20,
        });
        table.occupy("bob");
        table.close_session(SessionCharge {
            duration: Minutes::new(30),
            revenue: 10,
        });

        assert!(table.is_free());
        assert_eq!(table.occupied(), Minutes::new(102));
        assert_eq!(table.revenue(), 30);
    }
}
