//! Traits - tags attached to agents and relationships that carry modifiers.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{Result, SocialEngineError};
use crate::stats::StatModifierData;

/// What a trait may be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitType {
    Agent,
    Relationship,
}

impl fmt::Display for TraitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraitType::Agent => write!(f, "agent"),
            TraitType::Relationship => write!(f, "relationship"),
        }
    }
}

/// A trait definition shared by every holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    pub trait_id: String,
    pub trait_type: TraitType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub modifiers: Vec<StatModifierData>,
    #[serde(default)]
    pub conflicting_traits: BTreeSet<String>,
}

impl Trait {
    /// Create a new trait. The display name defaults to the ID.
    pub fn new(trait_id: impl Into<String>, trait_type: TraitType) -> Self {
        let trait_id = trait_id.into();
        Self {
            name: trait_id.clone(),
            trait_id,
            trait_type,
            description: String::new(),
            modifiers: Vec::new(),
            conflicting_traits: BTreeSet::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_modifier(mut self, modifier: StatModifierData) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_conflict(mut self, trait_id: impl Into<String>) -> Self {
        self.conflicting_traits.insert(trait_id.into());
        self
    }

    /// True if either trait lists the other as conflicting.
    pub fn conflicts_with(&self, other: &Trait) -> bool {
        self.conflicting_traits.contains(&other.trait_id)
            || other.conflicting_traits.contains(&self.trait_id)
    }
}

/// A trait held by an agent or relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitInstance {
    pub definition: Trait,
    /// Description with holder-specific details filled in.
    pub description: String,
    /// None = permanent trait.
    pub remaining_duration: Option<u32>,
}

impl TraitInstance {
    /// Create a new instance. A duration of zero or less is permanent.
    pub fn new(definition: Trait, description: impl Into<String>, duration: i32) -> Self {
        Self {
            definition,
            description: description.into(),
            remaining_duration: u32::try_from(duration).ok().filter(|d| *d > 0),
        }
    }

    pub fn trait_id(&self) -> &str {
        &self.definition.trait_id
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

/// Traits held by a single agent or relationship.
#[derive(Debug, Clone, Default)]
pub struct TraitManager {
    traits: BTreeMap<String, TraitInstance>,
}

impl TraitManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the trait could be added without a duplicate or conflict.
    pub fn can_add_trait(&self, definition: &Trait) -> bool {
        !self.has_trait(&definition.trait_id) && !self.has_conflicting_trait(definition)
    }

    pub fn has_conflicting_trait(&self, definition: &Trait) -> bool {
        self.traits
            .values()
            .any(|instance| instance.definition.conflicts_with(definition))
    }

    /// Add a trait. Returns false if it is already held or conflicts.
    pub fn add_trait(&mut self, definition: &Trait, description: &str, duration: i32) -> bool {
        if !self.can_add_trait(definition) {
            return false;
        }

        self.traits.insert(
            definition.trait_id.clone(),
            TraitInstance::new(definition.clone(), description, duration),
        );
        true
    }

    /// Remove a trait, returning its definition if it was held.
    pub fn remove_trait(&mut self, trait_id: &str) -> Option<Trait> {
        self.traits.remove(trait_id).map(|instance| instance.definition)
    }

    pub fn has_trait(&self, trait_id: &str) -> bool {
        self.traits.contains_key(trait_id)
    }

    pub fn get(&self, trait_id: &str) -> Option<&TraitInstance> {
        self.traits.get(trait_id)
    }

    /// Iterate over held traits in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &TraitInstance> {
        self.traits.values()
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }

    /// Count down timed traits, returning the IDs of those that expired.
    ///
    /// Expired traits are left in place so the caller can undo their effects.
    pub fn tick(&mut self) -> Vec<String> {
        let mut expired = Vec::new();
        for instance in self.traits.values_mut() {
            instance.tick();
            if instance.is_expired() {
                expired.push(instance.trait_id().to_string());
            }
        }
        expired
    }
}

/// Registry of every trait definition known to the engine.
#[derive(Debug, Clone, Default)]
pub struct TraitLibrary {
    traits: BTreeMap<String, Trait>,
}

impl TraitLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trait, replacing any previous definition with the same ID.
    pub fn add_trait(&mut self, definition: Trait) {
        self.traits.insert(definition.trait_id.clone(), definition);
    }

    pub fn get_trait(&self, trait_id: &str) -> Result<&Trait> {
        self.traits
            .get(trait_id)
            .ok_or_else(|| SocialEngineError::TraitNotFound {
                trait_id: trait_id.to_string(),
            })
    }

    pub fn has_trait(&self, trait_id: &str) -> bool {
        self.traits.contains_key(trait_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trait> {
        self.traits.values()
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatModifierType;

    fn shy() -> Trait {
        Trait::new("shy", TraitType::Agent).with_conflict("outgoing")
    }

    fn outgoing() -> Trait {
        Trait::new("outgoing", TraitType::Agent)
    }

    #[test]
    fn test_conflicts_are_symmetric() {
        assert!(shy().conflicts_with(&outgoing()));
        assert!(outgoing().conflicts_with(&shy()));
        assert!(!outgoing().conflicts_with(&Trait::new("kind", TraitType::Agent)));
    }

    #[test]
    fn test_add_trait_rejects_duplicates_and_conflicts() {
        let mut traits = TraitManager::new();
        assert!(traits.add_trait(&outgoing(), "", -1));
        assert!(!traits.add_trait(&outgoing(), "", -1));
        assert!(!traits.add_trait(&shy(), "", -1));
        assert!(traits.has_conflicting_trait(&shy()));

        assert_eq!(traits.remove_trait("outgoing"), Some(outgoing()));
        assert!(traits.add_trait(&shy(), "", -1));
        assert!(traits.remove_trait("outgoing").is_none());
    }

    #[test]
    fn test_timed_traits_expire() {
        let mut traits = TraitManager::new();
        traits.add_trait(&outgoing(), "", 2);
        traits.add_trait(&Trait::new("kind", TraitType::Agent), "", 0);

        assert!(traits.tick().is_empty());
        assert_eq!(traits.tick(), vec!["outgoing".to_string()]);
        assert!(traits.get("kind").unwrap().remaining_duration.is_none());
    }

    #[test]
    fn test_library_lookup() {
        let mut library = TraitLibrary::new();
        library.add_trait(
            Trait::new("confident", TraitType::Agent)
                .with_name("Confident")
                .with_modifier(StatModifierData::new("Confidence", 10.0, StatModifierType::Flat)),
        );

        let confident = library.get_trait("confident").unwrap();
        assert_eq!(confident.name, "Confident");
        assert_eq!(confident.modifiers.len(), 1);
        assert!(matches!(
            library.get_trait("humble"),
            Err(SocialEngineError::TraitNotFound { .. })
        ));
    }
}
