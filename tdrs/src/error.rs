//! Error types for the social engine.

use repraxis::RePraxisError;
use thiserror::Error;

use crate::traits::TraitType;

/// Errors raised by the social engine and its libraries.
#[derive(Debug, Error)]
pub enum SocialEngineError {
    #[error("Fact database error: {0}")]
    Database(#[from] RePraxisError),

    #[error("Agent not found with ID: {uid}")]
    AgentNotFound { uid: String },

    #[error("Agent already exists with ID: {uid}")]
    DuplicateAgent { uid: String },

    #[error("No relationship found from {owner} to {target}")]
    RelationshipNotFound { owner: String, target: String },

    #[error("Relationship already exists from {owner} to {target}")]
    DuplicateRelationship { owner: String, target: String },

    #[error("No schema found for agent type: {agent_type}")]
    AgentSchemaNotFound { agent_type: String },

    #[error("No schema found for relationships from '{owner_type}' to '{target_type}'")]
    RelationshipSchemaNotFound {
        owner_type: String,
        target_type: String,
    },

    #[error("Trait not found for {trait_id}")]
    TraitNotFound { trait_id: String },

    #[error("Trait ({trait_id}) must be of type '{expected}'")]
    TraitTypeMismatch { trait_id: String, expected: TraitType },

    #[error("Could not find stat for {stat}")]
    StatNotFound { stat: String },

    #[error("Social rule not found for {rule_id}")]
    RuleNotFound { rule_id: String },

    #[error("No social event found for: {symbol}")]
    EventNotFound { symbol: String },

    #[error("Cannot find effect factory for: {effect}")]
    EffectFactoryNotFound { effect: String },

    #[error("Invalid arguments for '{effect}': {message}")]
    EffectArgument { effect: String, message: String },

    #[error("Variable {variable} has no binding")]
    UnboundVariable { variable: String },

    #[error("Error encountered while applying effects for '{event}' event: {source}")]
    EventEffect {
        event: String,
        source: Box<SocialEngineError>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for social engine operations.
pub type Result<T> = std::result::Result<T, SocialEngineError>;
