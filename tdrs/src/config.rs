//! TOML world definitions.
//!
//! A configuration lists the content libraries (traits, rules, events and
//! schemas) plus the starting world (facts, agents and relationships).

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::engine::SocialEngine;
use crate::entities::{AgentSchema, RelationshipModifier, RelationshipSchema};
use crate::error::{Result, SocialEngineError};
use crate::events::SocialEvent;
use crate::rules::SocialRule;
use crate::traits::Trait;

/// An agent created when the world is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEntry {
    pub uid: String,
    pub agent_type: String,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub relationship_modifiers: Vec<RelationshipModifier>,
}

/// A relationship created when the world is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipEntry {
    pub owner: String,
    pub target: String,
    /// Relationship trait set as the relationship type.
    #[serde(default)]
    pub relationship_type: Option<String>,
    #[serde(default)]
    pub traits: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialEngineConfig {
    pub agent_schemas: Vec<AgentSchema>,
    pub relationship_schemas: Vec<RelationshipSchema>,
    pub traits: Vec<Trait>,
    pub social_rules: Vec<SocialRule>,
    pub social_events: Vec<SocialEvent>,
    /// Facts inserted before any agent is created.
    pub facts: Vec<String>,
    pub agents: Vec<AgentEntry>,
    pub relationships: Vec<RelationshipEntry>,
}

impl SocialEngineConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SocialEngineError::Config {
            message: e.to_string(),
        })
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| SocialEngineError::Config {
            message: format!("{}: {}", path.display(), e),
        })
    }
}

impl SocialEngine {
    /// Build an engine and its starting world from a configuration.
    pub fn from_config(config: &SocialEngineConfig) -> Result<Self> {
        let mut engine = SocialEngine::new();

        for definition in &config.traits {
            engine.add_trait(definition.clone());
        }
        for rule in &config.social_rules {
            engine.add_social_rule(rule.clone());
        }
        for event in &config.social_events {
            engine.add_social_event(event.clone());
        }
        for schema in &config.agent_schemas {
            engine.add_agent_schema(schema.clone());
        }
        for schema in &config.relationship_schemas {
            engine.add_relationship_schema(schema.clone());
        }

        for fact in &config.facts {
            engine.db_mut().insert(fact)?;
        }

        for entry in &config.agents {
            engine.add_agent(&entry.agent_type, &entry.uid)?;
            for trait_id in &entry.traits {
                engine.add_agent_trait(&entry.uid, trait_id, -1, None)?;
            }
            for modifier in &entry.relationship_modifiers {
                engine.add_relationship_modifier(&entry.uid, modifier.clone())?;
            }
        }

        for entry in &config.relationships {
            engine.add_relationship(&entry.owner, &entry.target)?;
            if let Some(trait_id) = &entry.relationship_type {
                engine.set_relationship_type(&entry.owner, &entry.target, trait_id)?;
            }
            for trait_id in &entry.traits {
                engine.add_relationship_trait(&entry.owner, &entry.target, trait_id, -1, None)?;
            }
        }

        info!(
            agents = config.agents.len(),
            relationships = config.relationships.len(),
            "world loaded from config"
        );
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: &str = r#"
facts = ["weather!rainy"]

[[agent_schemas]]
agent_type = "character"
stats = [{ stat = "Confidence", base_value = 0.0, min_value = 0.0, max_value = 50.0, is_discrete = true }]

[[relationship_schemas]]
owner_type = "character"
target_type = "character"
stats = [
    { stat = "Friendship", base_value = 0.0, min_value = 0.0, max_value = 50.0, is_discrete = true },
    { stat = "Romance", base_value = 0.0, min_value = 0.0, max_value = 50.0, is_discrete = true },
]

[[traits]]
trait_id = "friendly"
trait_type = "agent"
name = "Friendly"
description = "[owner] is friendly."

[[traits]]
trait_id = "confident"
trait_type = "agent"
name = "Confident"
modifiers = [{ stat = "Confidence", value = 10.0, modifier_type = "flat" }]

[[traits]]
trait_id = "dating"
trait_type = "relationship"
name = "Dating"
description = "[owner] is dating [target]."

[[social_rules]]
rule_id = "friendliness"
description = "[owner] is friendly toward [target]"
preconditions = ["?owner.traits.friendly"]
modifiers = [{ stat = "Friendship", value = 10.0 }]

[[social_events]]
name = "compliment"
roles = ["?initiator", "?target"]
description = "[initiator] complimented [target]"

[[social_events.responses]]
effects = ["AddAgentTrait ?target confident 3"]

[[agents]]
uid = "liza"
agent_type = "character"
traits = ["friendly"]

[[agents]]
uid = "zim"
agent_type = "character"

[[relationships]]
owner = "liza"
target = "zim"
relationship_type = "dating"
"#;

    #[test]
    fn test_parse_config() {
        let config = SocialEngineConfig::from_toml_str(WORLD).unwrap();
        assert_eq!(config.agent_schemas.len(), 1);
        assert_eq!(config.traits.len(), 3);
        assert_eq!(config.social_events[0].responses.len(), 1);
        assert_eq!(config.relationships[0].relationship_type.as_deref(), Some("dating"));
    }

    #[test]
    fn test_build_engine_from_config() {
        let config = SocialEngineConfig::from_toml_str(WORLD).unwrap();
        let mut engine = SocialEngine::from_config(&config).unwrap();

        assert!(engine.db().assert("weather!rainy").unwrap());
        assert!(engine.db().assert("liza.traits.friendly").unwrap());
        assert!(engine.db().assert("liza.relationships.zim.type!dating").unwrap());

        let relationship = engine.relationship("liza", "zim").unwrap();
        assert_eq!(relationship.relationship_type(), Some("dating"));
        assert_eq!(relationship.stats().stat("Friendship").unwrap().value(), 10.0);

        engine.dispatch_event("compliment", &["liza", "zim"]).unwrap();
        let zim = engine.agent("zim").unwrap();
        assert_eq!(zim.stats().stat("Confidence").unwrap().value(), 10.0);
    }

    #[test]
    fn test_empty_config() {
        let config = SocialEngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, SocialEngineConfig::default());
    }

    #[test]
    fn test_invalid_config() {
        let result = SocialEngineConfig::from_toml_str("[[agents]]\nuid = 3");
        assert!(matches!(result, Err(SocialEngineError::Config { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = SocialEngineConfig::from_file("/nonexistent/world.toml");
        assert!(matches!(result, Err(SocialEngineError::Io(_))));
    }
}
