//! Social rules - precondition-gated modifiers on relationships.

use repraxis::DBQuery;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SocialEngineError};
use crate::stats::StatModifierData;

/// A rule applying modifiers to every relationship its preconditions match.
///
/// Preconditions are query clauses run with `?owner` and `?target` bound to
/// the relationship being evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialRule {
    pub rule_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub preconditions: Vec<String>,
    #[serde(default)]
    pub modifiers: Vec<StatModifierData>,
}

impl SocialRule {
    /// Create a new rule with no preconditions or modifiers.
    pub fn new(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            description: String::new(),
            preconditions: Vec::new(),
            modifiers: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_precondition(mut self, clause: impl Into<String>) -> Self {
        self.preconditions.push(clause.into());
        self
    }

    pub fn with_modifier(mut self, modifier: StatModifierData) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// The preconditions as a runnable query.
    pub fn query(&self) -> DBQuery {
        DBQuery::from_clauses(self.preconditions.iter().cloned())
    }
}

/// Social rules in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct SocialRuleLibrary {
    rules: Vec<SocialRule>,
}

impl SocialRuleLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule. A rule with an existing ID replaces it in place.
    pub fn add_rule(&mut self, rule: SocialRule) {
        match self.rules.iter_mut().find(|r| r.rule_id == rule.rule_id) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    pub fn get_rule(&self, rule_id: &str) -> Result<&SocialRule> {
        self.rules
            .iter()
            .find(|r| r.rule_id == rule_id)
            .ok_or_else(|| SocialEngineError::RuleNotFound {
                rule_id: rule_id.to_string(),
            })
    }

    pub fn has_rule(&self, rule_id: &str) -> bool {
        self.rules.iter().any(|r| r.rule_id == rule_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SocialRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatModifierType;

    #[test]
    fn test_library_keeps_insertion_order() {
        let mut library = SocialRuleLibrary::new();
        library.add_rule(SocialRule::new("b"));
        library.add_rule(SocialRule::new("a"));
        library.add_rule(SocialRule::new("b").with_description("replaced"));

        let ids: Vec<_> = library.iter().map(|r| r.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(library.get_rule("b").unwrap().description, "replaced");
    }

    #[test]
    fn test_missing_rule() {
        let library = SocialRuleLibrary::new();
        assert!(!library.has_rule("friendly"));
        assert!(matches!(
            library.get_rule("friendly"),
            Err(SocialEngineError::RuleNotFound { .. })
        ));
    }

    #[test]
    fn test_query_from_preconditions() {
        let rule = SocialRule::new("friendly")
            .with_precondition("?owner.traits.friendly")
            .with_modifier(StatModifierData::new("Friendship", 10.0, StatModifierType::Flat));
        assert_eq!(rule.query().clauses(), &["?owner.traits.friendly".to_string()]);
    }
}
