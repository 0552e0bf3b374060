//! Serializable views of the engine state.

use serde::{Deserialize, Serialize};

use crate::engine::SocialEngine;
use crate::entities::{ActiveSocialRuleEntry, Agent, Relationship};
use crate::error::Result;
use crate::stats::{Stat, StatManager};
use crate::traits::{TraitManager, TraitType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSnapshot {
    pub name: String,
    pub base_value: f64,
    pub value: f64,
    pub normalized: f64,
    /// Modifier descriptions in application order.
    pub modifiers: Vec<String>,
}

impl StatSnapshot {
    fn capture(name: &str, stat: &Stat) -> Self {
        Self {
            name: name.to_string(),
            base_value: stat.base_value(),
            value: stat.value(),
            normalized: stat.normalized(),
            modifiers: stat.modifiers().iter().map(|m| m.description()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitSnapshot {
    pub trait_id: String,
    pub trait_type: TraitType,
    pub description: String,
    /// None = permanent trait.
    pub remaining_duration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub uid: String,
    pub agent_type: String,
    pub stats: Vec<StatSnapshot>,
    pub traits: Vec<TraitSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSnapshot {
    pub owner: String,
    pub target: String,
    pub relationship_type: Option<String>,
    pub stats: Vec<StatSnapshot>,
    pub traits: Vec<TraitSnapshot>,
    pub active_social_rules: Vec<ActiveSocialRuleEntry>,
}

/// Point-in-time copy of every agent, relationship and fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub agents: Vec<AgentSnapshot>,
    pub relationships: Vec<RelationshipSnapshot>,
    pub facts: Vec<String>,
}

impl EngineSnapshot {
    /// Capture the current state of an engine.
    pub fn capture(engine: &SocialEngine) -> Self {
        Self {
            agents: engine.agents().map(capture_agent).collect(),
            relationships: engine.relationships().map(capture_relationship).collect(),
            facts: engine.db().sentences(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl SocialEngine {
    /// Capture the current state as an [`EngineSnapshot`].
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot::capture(self)
    }
}

fn capture_agent(agent: &Agent) -> AgentSnapshot {
    AgentSnapshot {
        uid: agent.uid().to_string(),
        agent_type: agent.agent_type().to_string(),
        stats: capture_stats(agent.stats()),
        traits: capture_traits(agent.traits()),
    }
}

fn capture_relationship(relationship: &Relationship) -> RelationshipSnapshot {
    RelationshipSnapshot {
        owner: relationship.owner().to_string(),
        target: relationship.target().to_string(),
        relationship_type: relationship.relationship_type().map(str::to_string),
        stats: capture_stats(relationship.stats()),
        traits: capture_traits(relationship.traits()),
        active_social_rules: relationship.active_social_rules().to_vec(),
    }
}

fn capture_stats(stats: &StatManager) -> Vec<StatSnapshot> {
    stats
        .iter()
        .map(|(name, stat)| StatSnapshot::capture(name, stat))
        .collect()
}

fn capture_traits(traits: &TraitManager) -> Vec<TraitSnapshot> {
    traits
        .iter()
        .map(|instance| TraitSnapshot {
            trait_id: instance.trait_id().to_string(),
            trait_type: instance.definition.trait_type,
            description: instance.description.clone(),
            remaining_duration: instance.remaining_duration,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AgentSchema, RelationshipSchema};
    use crate::stats::{StatModifierData, StatModifierType, StatSchema};
    use crate::traits::Trait;

    #[test]
    fn test_snapshot_captures_world() {
        let mut engine = SocialEngine::new();
        engine.add_trait(
            Trait::new("confident", TraitType::Agent)
                .with_description("[owner] is confident.")
                .with_modifier(StatModifierData::new("Confidence", 10.0, StatModifierType::Flat)),
        );
        engine.add_agent_schema(
            AgentSchema::new("character")
                .with_stat(StatSchema::new("Confidence", 0.0, 0.0, 50.0, true)),
        );
        engine.add_relationship_schema(RelationshipSchema::new("character", "character"));
        engine.add_agent("character", "astrid").unwrap();
        engine.add_agent("character", "jordan").unwrap();
        engine.add_relationship("astrid", "jordan").unwrap();
        engine.add_agent_trait("astrid", "confident", 2, None).unwrap();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.agents.len(), 2);
        assert_eq!(snapshot.relationships.len(), 1);

        let astrid = &snapshot.agents[0];
        assert_eq!(astrid.uid, "astrid");
        assert_eq!(astrid.stats[0].value, 10.0);
        assert!((astrid.stats[0].normalized - 0.2).abs() < 0.0001);
        assert_eq!(astrid.stats[0].modifiers, vec!["Add 10 to Confidence".to_string()]);
        assert_eq!(astrid.traits[0].description, "astrid is confident.");
        assert_eq!(astrid.traits[0].remaining_duration, Some(2));

        assert!(snapshot.facts.contains(&"astrid.traits.confident".to_string()));
        assert!(snapshot.facts.contains(&"astrid.relationships.jordan".to_string()));
    }

    #[test]
    fn test_snapshot_json() {
        let snapshot = SocialEngine::new().snapshot();
        let json = snapshot.to_json().unwrap();
        let parsed: EngineSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
