//! Stats - numeric values recomputed from a base value and modifiers.

mod modifier;

pub use modifier::*;

use repraxis::round_to_significant;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, SocialEngineError};

/// Significant digits kept by stat values.
pub const STAT_ROUND_PRECISION: usize = 3;

pub const DEFAULT_STAT_MIN: f64 = -999_999.0;
pub const DEFAULT_STAT_MAX: f64 = 999_999.0;

/// Payload delivered to stat observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatValueChanged {
    pub value: f64,
}

/// Callback invoked after a stat changes.
pub type StatObserver = Box<dyn FnMut(&StatValueChanged)>;

/// A stat with a base value and ordered modifiers.
///
/// The value is cached and recomputed lazily after any mutation. Every
/// mutation also notifies observers with the recomputed value.
pub struct Stat {
    base_value: f64,
    min_value: f64,
    max_value: f64,
    is_discrete: bool,
    modifiers: Vec<StatModifier>,
    /// (value, normalized); None = dirty.
    cache: Cell<Option<(f64, f64)>>,
    observers: Vec<StatObserver>,
}

impl Stat {
    /// Create a new stat.
    pub fn new(base_value: f64, min_value: f64, max_value: f64, is_discrete: bool) -> Self {
        Self {
            base_value,
            min_value,
            max_value,
            is_discrete,
            modifiers: Vec::new(),
            cache: Cell::new(None),
            observers: Vec::new(),
        }
    }

    /// Create a continuous stat with the default bounds.
    pub fn unbounded(base_value: f64) -> Self {
        Self::new(base_value, DEFAULT_STAT_MIN, DEFAULT_STAT_MAX, false)
    }

    /// Create a stat from its schema entry.
    pub fn from_schema(schema: &StatSchema) -> Self {
        Self::new(
            schema.base_value,
            schema.min_value,
            schema.max_value,
            schema.is_discrete,
        )
    }

    pub fn base_value(&self) -> f64 {
        self.base_value
    }

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn is_discrete(&self) -> bool {
        self.is_discrete
    }

    /// Modifiers in application order.
    pub fn modifiers(&self) -> &[StatModifier] {
        &self.modifiers
    }

    /// The final value after modifiers, clamping and rounding.
    pub fn value(&self) -> f64 {
        self.computed().0
    }

    /// The value mapped onto 0.0 - 1.0 between min and max.
    pub fn normalized(&self) -> f64 {
        self.computed().1
    }

    pub fn set_base_value(&mut self, value: f64) {
        self.base_value = value;
        self.mark_changed();
    }

    pub fn increment_base_value(&mut self, delta: f64) {
        self.set_base_value(self.base_value + delta);
    }

    /// Attach a modifier. Modifiers with equal order keep insertion order.
    pub fn add_modifier(&mut self, modifier: StatModifier) {
        self.modifiers.push(modifier);
        self.modifiers.sort_by_key(|m| m.order);
        self.mark_changed();
    }

    /// Remove a modifier by ID. Returns whether it was present.
    pub fn remove_modifier(&mut self, id: ModifierId) -> bool {
        let Some(index) = self.modifiers.iter().position(|m| m.id == id) else {
            return false;
        };
        self.modifiers.remove(index);
        self.mark_changed();
        true
    }

    /// Remove every modifier from a source. Returns whether any were removed.
    pub fn remove_modifiers_from_source(&mut self, source: &ModifierSource) -> bool {
        let before = self.modifiers.len();
        self.modifiers.retain(|m| !m.is_from(source));

        if self.modifiers.len() == before {
            return false;
        }
        self.mark_changed();
        true
    }

    /// Count down timed modifiers and drop the ones that ran out.
    pub fn tick_modifiers(&mut self) -> bool {
        for modifier in &mut self.modifiers {
            modifier.tick();
        }

        let before = self.modifiers.len();
        self.modifiers.retain(|m| !m.has_expired());

        if self.modifiers.len() == before {
            return false;
        }
        self.mark_changed();
        true
    }

    /// Register a callback run after every change.
    pub fn on_value_changed(&mut self, observer: impl FnMut(&StatValueChanged) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn mark_changed(&mut self) {
        self.cache.set(None);
        let event = StatValueChanged {
            value: self.value(),
        };
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    fn computed(&self) -> (f64, f64) {
        if let Some(cached) = self.cache.get() {
            return cached;
        }
        let computed = self.recalculate();
        self.cache.set(Some(computed));
        computed
    }

    fn recalculate(&self) -> (f64, f64) {
        let mut value = self.base_value;
        let mut percent_add_sum = 0.0;

        for (i, modifier) in self.modifiers.iter().enumerate() {
            match modifier.modifier_type {
                StatModifierType::Flat => value += modifier.value,
                StatModifierType::PercentAdd => {
                    percent_add_sum += modifier.value;

                    // Consecutive percent-add modifiers stack additively.
                    let run_ends = self
                        .modifiers
                        .get(i + 1)
                        .map_or(true, |next| next.modifier_type != StatModifierType::PercentAdd);
                    if run_ends {
                        value *= 1.0 + percent_add_sum;
                        percent_add_sum = 0.0;
                    }
                }
                StatModifierType::PercentMultiply => value *= 1.0 + modifier.value,
            }
        }

        value = value.min(self.max_value).max(self.min_value);

        if self.is_discrete {
            value = value.floor();
        }

        let value = round_to_significant(value, STAT_ROUND_PRECISION);
        let normalized = if self.max_value > self.min_value {
            round_to_significant(
                (value - self.min_value) / (self.max_value - self.min_value),
                STAT_ROUND_PRECISION,
            )
        } else {
            0.0
        };

        (value, normalized)
    }
}

impl fmt::Debug for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stat")
            .field("base_value", &self.base_value)
            .field("value", &self.value())
            .field("min_value", &self.min_value)
            .field("max_value", &self.max_value)
            .field("is_discrete", &self.is_discrete)
            .field("modifiers", &self.modifiers)
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn default_stat_min() -> f64 {
    DEFAULT_STAT_MIN
}

fn default_stat_max() -> f64 {
    DEFAULT_STAT_MAX
}

/// Declares a stat that an agent or relationship starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSchema {
    pub stat: String,
    #[serde(default)]
    pub base_value: f64,
    #[serde(default = "default_stat_min")]
    pub min_value: f64,
    #[serde(default = "default_stat_max")]
    pub max_value: f64,
    #[serde(default)]
    pub is_discrete: bool,
}

impl StatSchema {
    /// Create a new stat schema entry.
    pub fn new(
        stat: impl Into<String>,
        base_value: f64,
        min_value: f64,
        max_value: f64,
        is_discrete: bool,
    ) -> Self {
        Self {
            stat: stat.into(),
            base_value,
            min_value,
            max_value,
            is_discrete,
        }
    }
}

/// The named stats owned by an agent or relationship.
#[derive(Debug, Default)]
pub struct StatManager {
    stats: BTreeMap<String, Stat>,
}

impl StatManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stat, replacing any stat with the same name.
    pub fn add_stat(&mut self, name: impl Into<String>, stat: Stat) {
        self.stats.insert(name.into(), stat);
    }

    pub fn stat(&self, name: &str) -> Result<&Stat> {
        self.stats
            .get(name)
            .ok_or_else(|| SocialEngineError::StatNotFound {
                stat: name.to_string(),
            })
    }

    pub fn stat_mut(&mut self, name: &str) -> Result<&mut Stat> {
        self.stats
            .get_mut(name)
            .ok_or_else(|| SocialEngineError::StatNotFound {
                stat: name.to_string(),
            })
    }

    pub fn has_stat(&self, name: &str) -> bool {
        self.stats.contains_key(name)
    }

    /// Iterate over stats in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Stat)> {
        self.stats.iter().map(|(name, stat)| (name.as_str(), stat))
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Remove every modifier from a source across all stats.
    pub fn remove_modifiers_from_source(&mut self, source: &ModifierSource) -> bool {
        let mut removed = false;
        for stat in self.stats.values_mut() {
            removed |= stat.remove_modifiers_from_source(source);
        }
        removed
    }

    /// Age timed modifiers on every stat.
    pub fn tick_modifiers(&mut self) {
        for stat in self.stats.values_mut() {
            stat.tick_modifiers();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    const TOLERANCE: f64 = 0.0001;

    fn observe(stat: &mut Stat) -> Rc<Cell<f64>> {
        let seen = Rc::new(Cell::new(stat.value()));
        let sink = Rc::clone(&seen);
        stat.on_value_changed(move |change| sink.set(change.value));
        seen
    }

    #[test]
    fn test_discrete_value() {
        let continuous = Stat::new(45.5, 0.0, 100.0, false);
        assert!((continuous.value() - 45.5).abs() < TOLERANCE);

        let discrete = Stat::new(45.5, 0.0, 100.0, true);
        assert_eq!(discrete.value(), 45.0);
    }

    #[test]
    fn test_value_clamped() {
        assert_eq!(Stat::new(123.0, 0.0, 50.0, true).value(), 50.0);
        assert_eq!(Stat::new(-54.0, -50.0, 50.0, true).value(), -50.0);
    }

    #[test]
    fn test_base_value_notifies() {
        let mut compassion = Stat::new(0.0, 0.0, 100.0, true);
        compassion.set_base_value(30.0);
        assert_eq!(compassion.value(), 30.0);

        let seen = observe(&mut compassion);
        assert_eq!(seen.get(), 30.0);

        compassion.set_base_value(63.0);
        assert_eq!(compassion.value(), 63.0);
        assert_eq!(seen.get(), 63.0);

        compassion.increment_base_value(-3.0);
        assert_eq!(seen.get(), 60.0);
    }

    #[test]
    fn test_normalized_value() {
        let mut compassion = Stat::new(0.0, 0.0, 100.0, true);
        assert!(compassion.normalized().abs() < TOLERANCE);

        compassion.set_base_value(30.0);
        assert!((compassion.normalized() - 0.3).abs() < TOLERANCE);

        compassion.set_base_value(63.0);
        assert!((compassion.normalized() - 0.63).abs() < TOLERANCE);

        let mut malice = Stat::new(-54.0, -50.0, 50.0, true);
        assert!(malice.normalized().abs() < TOLERANCE);

        malice.set_base_value(0.0);
        assert!((malice.normalized() - 0.5).abs() < TOLERANCE);

        assert_eq!(Stat::new(5.0, 5.0, 5.0, false).normalized(), 0.0);
    }

    #[test]
    fn test_flat_modifiers() {
        let mut mana = Stat::new(25.0, 0.0, 100.0, false);
        let seen = observe(&mut mana);

        mana.add_modifier(StatModifier::new("mana", -15.0, StatModifierType::Flat));
        assert!((mana.value() - 10.0).abs() < TOLERANCE);

        mana.add_modifier(StatModifier::new("mana", 50.0, StatModifierType::Flat));
        assert!((mana.value() - 60.0).abs() < TOLERANCE);
        assert!((seen.get() - 60.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_percent_add_modifiers_stack() {
        let mut mana = Stat::new(25.0, 0.0, 100.0, false);
        let seen = observe(&mut mana);

        mana.add_modifier(StatModifier::new("mana", -0.15, StatModifierType::PercentAdd));
        assert!((mana.value() - 21.3).abs() < TOLERANCE);

        mana.add_modifier(StatModifier::new("mana", 0.5, StatModifierType::PercentAdd));
        assert!((mana.value() - 33.8).abs() < TOLERANCE);
        assert!((seen.get() - 33.8).abs() < TOLERANCE);
    }

    #[test]
    fn test_percent_multiply_modifiers() {
        let mut mana = Stat::new(25.0, 0.0, 100.0, false);

        mana.add_modifier(StatModifier::new("mana", -0.15, StatModifierType::PercentMultiply));
        assert!((mana.value() - 21.3).abs() < TOLERANCE);

        mana.add_modifier(StatModifier::new("mana", 0.5, StatModifierType::PercentMultiply));
        assert!((mana.value() - 31.9).abs() < TOLERANCE);
    }

    #[test]
    fn test_flat_applies_before_percent() {
        let mut mana = Stat::new(10.0, 0.0, 100.0, false);
        mana.add_modifier(StatModifier::new("mana", 1.0, StatModifierType::PercentMultiply));
        mana.add_modifier(StatModifier::new("mana", 5.0, StatModifierType::Flat));
        assert_eq!(mana.value(), 30.0);
        assert_eq!(mana.modifiers()[0].modifier_type, StatModifierType::Flat);
    }

    #[test]
    fn test_remove_modifiers_from_source() {
        let mut mana = Stat::new(25.0, 0.0, 100.0, false);
        let seen = observe(&mut mana);

        let source_a = ModifierSource::Custom("a".into());
        let source_b = ModifierSource::Custom("b".into());
        let source_c = ModifierSource::Custom("c".into());

        for (value, source) in [
            (-5.0, Some(&source_a)),
            (-10.0, Some(&source_b)),
            (25.0, Some(&source_a)),
            (15.0, None),
            (10.0, Some(&source_b)),
        ] {
            let modifier = StatModifier::new("mana", value, StatModifierType::Flat);
            mana.add_modifier(match source {
                Some(source) => modifier.with_source(source.clone()),
                None => modifier,
            });
        }
        assert_eq!(mana.value(), 60.0);

        assert!(mana.remove_modifiers_from_source(&source_b));
        assert_eq!(mana.value(), 60.0);

        assert!(mana.remove_modifiers_from_source(&source_a));
        assert_eq!(mana.value(), 40.0);
        assert!((seen.get() - 40.0).abs() < TOLERANCE);

        assert!(!mana.remove_modifiers_from_source(&source_c));
    }

    #[test]
    fn test_remove_modifier_return_value() {
        let mut mana = Stat::new(25.0, 0.0, 100.0, false);
        let debuff = StatModifier::new("mana", -0.15, StatModifierType::PercentMultiply);
        let buff = StatModifier::new("mana", 0.5, StatModifierType::PercentMultiply);
        let debuff_id = debuff.id;

        mana.add_modifier(debuff);
        assert!(mana.remove_modifier(debuff_id));
        assert!(!mana.remove_modifier(buff.id));
        assert_eq!(mana.value(), 25.0);
    }

    #[test]
    fn test_timed_modifier_expires() {
        let mut mana = Stat::new(25.0, 0.0, 100.0, false);
        mana.add_modifier(StatModifier::new("mana", 5.0, StatModifierType::Flat).with_duration(2));
        assert_eq!(mana.value(), 30.0);

        assert!(!mana.tick_modifiers());
        assert_eq!(mana.value(), 30.0);
        assert!(mana.tick_modifiers());
        assert_eq!(mana.value(), 25.0);
    }

    #[test]
    fn test_manager_lookup() {
        let mut stats = StatManager::new();
        stats.add_stat("Friendship", Stat::new(0.0, 0.0, 50.0, true));

        assert!(stats.has_stat("Friendship"));
        assert!(stats.stat("Friendship").is_ok());
        assert!(matches!(
            stats.stat("Romance"),
            Err(SocialEngineError::StatNotFound { .. })
        ));
    }
}
