//! Relationships - directed links from an owner agent to a target agent.

use serde::{Deserialize, Serialize};

use crate::stats::{ModifierId, StatManager, StatModifierData, StatSchema};
use crate::traits::TraitManager;

/// Stats and traits given to relationships between two agent types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSchema {
    pub owner_type: String,
    pub target_type: String,
    #[serde(default)]
    pub stats: Vec<StatSchema>,
    #[serde(default)]
    pub traits: Vec<String>,
}

impl RelationshipSchema {
    /// Create a new schema with no stats or traits.
    pub fn new(owner_type: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            owner_type: owner_type.into(),
            target_type: target_type.into(),
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

/// A social rule currently applying to a relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveSocialRuleEntry {
    pub rule_id: String,
    pub description: String,
}

/// A directed relationship from `owner` to `target`.
#[derive(Debug)]
pub struct Relationship {
    owner: String,
    target: String,
    stats: StatManager,
    traits: TraitManager,
    relationship_type: Option<String>,
    active_social_rules: Vec<ActiveSocialRuleEntry>,
    /// Relationship modifiers applied during the last evaluation.
    active_relationship_modifiers: Vec<ModifierId>,
}

impl Relationship {
    /// Create a new relationship with no stats or traits.
    pub fn new(owner: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            target: target.into(),
            stats: StatManager::new(),
            traits: TraitManager::new(),
            relationship_type: None,
            active_social_rules: Vec::new(),
            active_relationship_modifiers: Vec::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn target(&self) -> &str {
        &self.target
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

    pub(crate) fn traits_mut(&mut self) -> &mut TraitManager {
        &mut self.traits
    }

    /// The trait ID of the relationship type, if one is set.
    pub fn relationship_type(&self) -> Option<&str> {
        self.relationship_type.as_deref()
    }

    pub(crate) fn set_relationship_type(&mut self, trait_id: Option<String>) {
        self.relationship_type = trait_id;
    }

    pub fn active_social_rules(&self) -> &[ActiveSocialRuleEntry] {
        &self.active_social_rules
    }

    pub fn active_relationship_modifiers(&self) -> &[ModifierId] {
        &self.active_relationship_modifiers
    }

    /// Forget the previous evaluation, returning what was active.
    pub(crate) fn take_active(&mut self) -> (Vec<ActiveSocialRuleEntry>, Vec<ModifierId>) {
        (
            std::mem::take(&mut self.active_social_rules),
            std::mem::take(&mut self.active_relationship_modifiers),
        )
    }

    pub(crate) fn push_active_rule(&mut self, entry: ActiveSocialRuleEntry) {
        self.active_social_rules.push(entry);
    }

    pub(crate) fn push_active_modifier(&mut self, id: ModifierId) {
        self.active_relationship_modifiers.push(id);
    }

    /// Fill `[owner]` and `[target]` in a description template.
    pub fn render_description(&self, template: &str) -> String {
        template
            .replace("[owner]", &self.owner)
            .replace("[target]", &self.target)
    }
}

/// Which of an agent's relationships a modifier projects onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierDirection {
    /// Relationships that target the agent.
    Incoming,
    /// Relationships the agent owns.
    Outgoing,
}

/// Modifiers an agent projects onto its relationships while preconditions hold.
///
/// Preconditions are queried with `?owner` and `?target` bound to the
/// relationship being evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipModifier {
    #[serde(default)]
    pub id: ModifierId,
    pub description: String,
    pub direction: ModifierDirection,
    #[serde(default)]
    pub preconditions: Vec<String>,
    #[serde(default)]
    pub modifiers: Vec<StatModifierData>,
    /// None = permanent modifier.
    #[serde(default)]
    pub remaining_duration: Option<u32>,
}

impl RelationshipModifier {
    /// Create a new permanent relationship modifier.
    pub fn new(description: impl Into<String>, direction: ModifierDirection) -> Self {
        Self {
            id: ModifierId::new(),
            description: description.into(),
            direction,
            preconditions: Vec::new(),
            modifiers: Vec::new(),
            remaining_duration: None,
        }
    }

    pub fn with_precondition(mut self, clause: impl Into<String>) -> Self {
        self.preconditions.push(clause.into());
        self
    }

    pub fn with_modifier(mut self, modifier: StatModifierData) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Limit the modifier to a number of ticks. Zero or less is permanent.
    pub fn with_duration(mut self, duration: i32) -> Self {
        self.remaining_duration = u32::try_from(duration).ok().filter(|d| *d > 0);
        self
    }

    pub fn tick(&mut self) {
        if let Some(remaining) = self.remaining_duration.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_duration == Some(0)
    }
}
