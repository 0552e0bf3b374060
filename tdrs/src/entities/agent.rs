//! Agents - the characters of the simulation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::stats::{ModifierId, StatManager, StatSchema};
use crate::traits::TraitManager;

use super::RelationshipModifier;

/// Stats and traits given to every agent of a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSchema {
    pub agent_type: String,
    #[serde(default)]
    pub stats: Vec<StatSchema>,
    #[serde(default)]
    pub traits: Vec<String>,
}

impl AgentSchema {
    /// Create a new schema with no stats or traits.
    pub fn new(agent_type: impl Into<String>) -> Self {
        Self {
            agent_type: agent_type.into(),
            stats: Vec::new(),
            traits: Vec::new(),
        }
    }

    pub fn with_stat(mut self, stat: StatSchema) -> Self {
        self.stats.push(stat);
        self
    }

    pub fn with_trait(mut self, trait_id: impl Into<String>) -> Self {
        self.traits.push(trait_id.into());
        self
    }
}

/// A character in the simulation.
#[derive(Debug)]
pub struct Agent {
    uid: String,
    agent_type: String,
    stats: StatManager,
    traits: TraitManager,
    /// Targets of relationships this agent owns.
    outgoing: BTreeSet<String>,
    /// Owners of relationships that target this agent.
    incoming: BTreeSet<String>,
    relationship_modifiers: Vec<RelationshipModifier>,
}

impl Agent {
    /// Create a new agent with no stats or traits.
    pub fn new(uid: impl Into<String>, agent_type: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            agent_type: agent_type.into(),
            stats: StatManager::new(),
            traits: TraitManager::new(),
            outgoing: BTreeSet::new(),
            incoming: BTreeSet::new(),
            relationship_modifiers: Vec::new(),
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn agent_type(&self) -> &str {
        &self.agent_type
    }

    pub fn stats(&self) -> &StatManager {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut StatManager {
        &mut self.stats
    }

    pub fn traits(&self) -> &TraitManager {
        &self.traits
    }

    /// Trait changes go through the engine so facts and modifiers stay in sync.
    pub(crate) fn traits_mut(&mut self) -> &mut TraitManager {
        &mut self.traits
    }

    /// Uids of agents this agent has relationships toward.
    pub fn outgoing_relationships(&self) -> impl Iterator<Item = &str> {
        self.outgoing.iter().map(String::as_str)
    }

    /// Uids of agents that have relationships toward this agent.
    pub fn incoming_relationships(&self) -> impl Iterator<Item = &str> {
        self.incoming.iter().map(String::as_str)
    }

    pub fn relationship_modifiers(&self) -> &[RelationshipModifier] {
        &self.relationship_modifiers
    }

    pub(crate) fn link_outgoing(&mut self, target: &str) {
        self.outgoing.insert(target.to_string());
    }

    pub(crate) fn link_incoming(&mut self, owner: &str) {
        self.incoming.insert(owner.to_string());
    }

    pub(crate) fn unlink_outgoing(&mut self, target: &str) {
        self.outgoing.remove(target);
    }

    pub(crate) fn unlink_incoming(&mut self, owner: &str) {
        self.incoming.remove(owner);
    }

    pub(crate) fn add_relationship_modifier(&mut self, modifier: RelationshipModifier) {
        self.relationship_modifiers.push(modifier);
    }

    pub(crate) fn remove_relationship_modifier(&mut self, id: ModifierId) -> bool {
        let before = self.relationship_modifiers.len();
        self.relationship_modifiers.retain(|m| m.id != id);
        self.relationship_modifiers.len() != before
    }

    /// Age relationship modifiers and drop the expired ones.
    pub(crate) fn tick_relationship_modifiers(&mut self) -> bool {
        for modifier in &mut self.relationship_modifiers {
            modifier.tick();
        }
        let before = self.relationship_modifiers.len();
        self.relationship_modifiers.retain(|m| !m.is_expired());
        self.relationship_modifiers.len() != before
    }
}
