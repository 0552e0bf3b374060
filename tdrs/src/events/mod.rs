//! Social events - named interactions between agents and the effects they trigger.

mod defaults;
mod effects;

pub use defaults::*;
pub use effects::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, SocialEngineError};

/// One possible outcome of an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialEventResponse {
    #[serde(default)]
    pub preconditions: Vec<String>,
    #[serde(default)]
    pub effects: Vec<String>,
    /// Overrides the event description when non-empty.
    #[serde(default)]
    pub description: String,
}

impl SocialEventResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precondition(mut self, clause: impl Into<String>) -> Self {
        self.preconditions.push(clause.into());
        self
    }

    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effects.push(effect.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// An event agents can take part in.
///
/// Roles are variable names such as `?initiator`, bound positionally to the
/// agents passed on dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialEvent {
    pub name: String,
    pub roles: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub responses: Vec<SocialEventResponse>,
}

impl SocialEvent {
    /// Create a new event with no responses.
    pub fn new<I, S>(name: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            roles: roles.into_iter().map(Into::into).collect(),
            description: String::new(),
            responses: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_response(mut self, response: SocialEventResponse) -> Self {
        self.responses.push(response);
        self
    }

    pub fn cardinality(&self) -> usize {
        self.roles.len()
    }

    /// Lookup key, `name/arity`.
    pub fn symbol(&self) -> String {
        event_symbol(&self.name, self.cardinality())
    }
}

/// Build the lookup key for an event name and participant count.
pub fn event_symbol(name: &str, cardinality: usize) -> String {
    format!("{}/{}", name, cardinality)
}

/// Registry of events keyed by symbol.
#[derive(Debug, Clone, Default)]
pub struct SocialEventLibrary {
    events: BTreeMap<String, SocialEvent>,
}

impl SocialEventLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event, replacing any with the same symbol.
    pub fn add_event(&mut self, event: SocialEvent) {
        self.events.insert(event.symbol(), event);
    }

    pub fn get_event(&self, symbol: &str) -> Result<&SocialEvent> {
        self.events
            .get(symbol)
            .ok_or_else(|| SocialEngineError::EventNotFound {
                symbol: symbol.to_string(),
            })
    }

    pub fn has_event(&self, symbol: &str) -> bool {
        self.events.contains_key(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SocialEvent> {
        self.events.values()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
