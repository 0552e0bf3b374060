//! Stat modifiers and where they come from.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModifierId(pub Uuid);

impl ModifierId {
    /// Create a new random modifier ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ModifierId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ModifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a modifier combines with the stat value.
///
/// The discriminant doubles as the default application order, so every
/// flat modifier applies before any percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatModifierType {
    #[default]
    Flat = 100,
    PercentAdd = 200,
    PercentMultiply = 300,
}

impl StatModifierType {
    pub fn default_order(self) -> i32 {
        self as i32
    }
}

/// What attached a modifier. Used to remove modifiers in bulk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierSource {
    /// A trait, by trait ID.
    Trait(String),
    /// A social rule, by rule ID.
    SocialRule(String),
    /// A relationship modifier contributed by an agent.
    RelationshipModifier(ModifierId),
    /// An effect from a social event, by effect name.
    Effect(String),
    Custom(String),
}

impl fmt::Display for ModifierSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModifierSource::Trait(id) => write!(f, "trait:{}", id),
            ModifierSource::SocialRule(id) => write!(f, "rule:{}", id),
            ModifierSource::RelationshipModifier(id) => write!(f, "relationship-modifier:{}", id),
            ModifierSource::Effect(name) => write!(f, "effect:{}", name),
            ModifierSource::Custom(label) => write!(f, "{}", label),
        }
    }
}

/// Template for a modifier, as declared by traits and rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatModifierData {
    pub stat: String,
    pub value: f64,
    #[serde(default)]
    pub modifier_type: StatModifierType,
}

impl StatModifierData {
    /// Create a new modifier template.
    pub fn new(stat: impl Into<String>, value: f64, modifier_type: StatModifierType) -> Self {
        Self {
            stat: stat.into(),
            value,
            modifier_type,
        }
    }

    /// Instantiate a permanent modifier with no source.
    pub fn to_modifier(&self) -> StatModifier {
        StatModifier::new(self.stat.clone(), self.value, self.modifier_type)
    }
}

/// A modifier attached to a stat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatModifier {
    pub id: ModifierId,
    pub stat: String,
    pub value: f64,
    pub modifier_type: StatModifierType,
    /// Lower orders apply first.
    pub order: i32,
    pub source: Option<ModifierSource>,
    /// None = permanent modifier.
    pub remaining_duration: Option<u32>,
}

impl StatModifier {
    /// Create a new permanent modifier ordered by its type.
    pub fn new(stat: impl Into<String>, value: f64, modifier_type: StatModifierType) -> Self {
        Self {
            id: ModifierId::new(),
            stat: stat.into(),
            value,
            modifier_type,
            order: modifier_type.default_order(),
            source: None,
            remaining_duration: None,
        }
    }

    /// Set the source of this modifier.
    pub fn with_source(mut self, source: ModifierSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Limit the modifier to a number of ticks. Zero or less is permanent.
    pub fn with_duration(mut self, duration: i32) -> Self {
        self.remaining_duration = u32::try_from(duration).ok().filter(|d| *d > 0);
        self
    }

    /// Override the application order.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn is_from(&self, source: &ModifierSource) -> bool {
        self.source.as_ref() == Some(source)
    }

    /// Count down one tick.
    pub fn tick(&mut self) {
        if let Some(remaining) = self.remaining_duration.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
    }

    pub fn has_expired(&self) -> bool {
        self.remaining_duration == Some(0)
    }

    /// Human-readable summary, e.g. "Add 10 to Friendship".
    pub fn description(&self) -> String {
        match self.modifier_type {
            StatModifierType::Flat => format!("Add {} to {}", self.value, self.stat),
            StatModifierType::PercentAdd => {
                format!("Add {}% to {}", self.value * 100.0, self.stat)
            }
            StatModifierType::PercentMultiply => {
                format!("Scales {} to {}%", self.stat, self.value * 100.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order_follows_type() {
        let flat = StatModifier::new("Friendship", 1.0, StatModifierType::Flat);
        let percent = StatModifier::new("Friendship", 0.1, StatModifierType::PercentMultiply);
        assert_eq!(flat.order, 100);
        assert_eq!(percent.order, 300);
        assert_eq!(flat.with_order(400).order, 400);
    }

    #[test]
    fn test_duration() {
        let mut modifier = StatModifier::new("Romance", 5.0, StatModifierType::Flat).with_duration(2);
        assert!(!modifier.has_expired());
        modifier.tick();
        modifier.tick();
        assert!(modifier.has_expired());

        let permanent = StatModifier::new("Romance", 5.0, StatModifierType::Flat).with_duration(-1);
        assert!(permanent.remaining_duration.is_none());
        assert!(!permanent.has_expired());
    }

    #[test]
    fn test_description() {
        assert_eq!(
            StatModifier::new("Friendship", 10.0, StatModifierType::Flat).description(),
            "Add 10 to Friendship"
        );
        assert_eq!(
            StatModifier::new("Friendship", 0.5, StatModifierType::PercentAdd).description(),
            "Add 50% to Friendship"
        );
        assert_eq!(
            StatModifier::new("Friendship", 1.5, StatModifierType::PercentMultiply).description(),
            "Scales Friendship to 150%"
        );
    }
}
