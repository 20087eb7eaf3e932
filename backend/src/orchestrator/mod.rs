//! Orchestrator - the club's event-processing engine
//!
//! See `engine.rs` for full implementation.

pub mod engine;

// Re-export main types for convenience
pub use engine::{
    run_day, ClubConfig, ComputerClub, ConfigError, DayReport, SimulationError, StepResult,
};
