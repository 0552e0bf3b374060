//! Agents and the directed relationships between them.
//!
//! Entities never hold references to each other. Links are stored as uids
//! and resolved through the engine.

mod agent;
mod relationship;

pub use agent::*;
pub use relationship::*;
