//! # RePraxis
//!
//! A miniature in-memory fact database. Facts are dotted/banged path
//! sentences such as `astrid.relationships.jordan.reputation!30`, stored as
//! chains of typed nodes under a shared root. Queries are lists of clauses
//! evaluated by unification against the stored facts.

pub mod database;
pub mod error;
pub mod node;
pub mod query;
pub mod sentence;

pub use database::*;
pub use error::{RePraxisError, Result};
pub use node::*;
pub use query::*;
pub use sentence::*;
