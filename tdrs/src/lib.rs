//! # TDRS
//!
//! A social simulation engine. Agents hold stats and traits, directed
//! relationships between them hold their own, and social rules written as
//! RePraxis queries adjust relationship stats whenever the world changes.
//!
//! ## Core Components
//!
//! - **stats**: Numeric values recomputed from a base value and ordered modifiers
//! - **traits**: Tags with modifiers, conflicts and optional durations
//! - **entities**: Agents, relationships and the schemas that create them
//! - **rules**: Social rules gated by fact database queries
//! - **events**: Social events, effect factories and the built-in effects
//! - **engine**: The `SocialEngine` tying everything to a shared fact database
//!
//! ## Design Philosophy
//!
//! - **Facts First**: Every trait and relationship is mirrored as a fact so rules can query it
//! - **Recompute, Don't Patch**: Social rules are re-evaluated from scratch after every change
//! - **Data-Driven**: Worlds load from TOML; effects are plain strings resolved through factories

pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod events;
pub mod rules;
pub mod snapshot;
pub mod stats;
pub mod traits;

pub use config::*;
pub use engine::*;
pub use entities::*;
pub use error::{Result, SocialEngineError};
pub use events::*;
pub use rules::*;
pub use snapshot::*;
pub use stats::*;
pub use traits::*;
