//! Fact nodes - the typed values that make up the fact tree.

mod value;

pub use value::*;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{RePraxisError, Result};

/// Significant digits used for the canonical symbol of float nodes.
pub const FLOAT_SYMBOL_PRECISION: usize = 3;

/// How many children a node may own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NodeCardinality {
    /// No children at all.
    None,
    /// At most one child; inserting a different one replaces it.
    One,
    /// Any number of keyed children.
    #[default]
    Many,
}

/// The kind of value a node carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Variable,
    Symbol,
    Int,
    Float,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Variable => "variable",
            NodeType::Symbol => "symbol",
            NodeType::Int => "int",
            NodeType::Float => "float",
        };
        write!(f, "{}", name)
    }
}

/// The typed payload of a fact node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeValue {
    /// A query variable, named with its leading `?`.
    Variable(String),
    Symbol(String),
    Int(i64),
    Float(f64),
}

impl NodeValue {
    /// Get the kind of this value.
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeValue::Variable(_) => NodeType::Variable,
            NodeValue::Symbol(_) => NodeType::Symbol,
            NodeValue::Int(_) => NodeType::Int,
            NodeValue::Float(_) => NodeType::Float,
        }
    }

    /// Check if this is a query variable.
    pub fn is_variable(&self) -> bool {
        matches!(self, NodeValue::Variable(_))
    }

    /// Canonical string form, used as the child key in the fact tree.
    pub fn symbol(&self) -> String {
        match self {
            NodeValue::Variable(name) | NodeValue::Symbol(name) => name.clone(),
            NodeValue::Int(value) => value.to_string(),
            NodeValue::Float(value) => to_precision(*value, FLOAT_SYMBOL_PRECISION),
        }
    }

    /// Convert to the raw value handed back to callers.
    pub fn to_value(&self) -> Value {
        match self {
            NodeValue::Variable(name) | NodeValue::Symbol(name) => Value::Text(name.clone()),
            NodeValue::Int(value) => Value::Int(*value),
            NodeValue::Float(value) => Value::Float(*value),
        }
    }

    /// Type-then-value equality. Values of different kinds are never equal.
    pub fn equal_to(&self, other: &NodeValue) -> bool {
        match (self, other) {
            (NodeValue::Variable(a), NodeValue::Variable(b)) => a == b,
            (NodeValue::Symbol(a), NodeValue::Symbol(b)) => a == b,
            (NodeValue::Int(a), NodeValue::Int(b)) => a == b,
            (NodeValue::Float(a), NodeValue::Float(b)) => a == b,
            _ => false,
        }
    }

    /// Negation of [`NodeValue::equal_to`].
    pub fn not_equal_to(&self, other: &NodeValue) -> bool {
        !self.equal_to(other)
    }

    pub fn greater_than(&self, other: &NodeValue) -> Result<bool> {
        Ok(self.ordering(other, "gt")? == Ordering::Greater)
    }

    pub fn greater_than_equal_to(&self, other: &NodeValue) -> Result<bool> {
        Ok(self.ordering(other, "gte")? != Ordering::Less)
    }

    pub fn less_than(&self, other: &NodeValue) -> Result<bool> {
        Ok(self.ordering(other, "lt")? == Ordering::Less)
    }

    pub fn less_than_equal_to(&self, other: &NodeValue) -> Result<bool> {
        Ok(self.ordering(other, "lte")? != Ordering::Greater)
    }

    /// Ordering is defined between numbers of either kind and between two
    /// symbols. Everything else, variables included, is a type error.
    fn ordering(&self, other: &NodeValue, operator: &str) -> Result<Ordering> {
        let ordering = match (self, other) {
            (NodeValue::Int(a), NodeValue::Int(b)) => Some(a.cmp(b)),
            (NodeValue::Int(a), NodeValue::Float(b)) => (*a as f64).partial_cmp(b),
            (NodeValue::Float(a), NodeValue::Int(b)) => a.partial_cmp(&(*b as f64)),
            (NodeValue::Float(a), NodeValue::Float(b)) => a.partial_cmp(b),
            (NodeValue::Symbol(a), NodeValue::Symbol(b)) => Some(locale_compare(a, b)),
            _ => None,
        };

        ordering.ok_or_else(|| RePraxisError::NodeType {
            message: format!(
                "{} not defined between nodes of type {} and {}",
                operator,
                self.node_type(),
                other.node_type()
            ),
        })
    }
}

impl fmt::Display for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Case-insensitive comparison where, on a tie, lowercase sorts first.
fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Round to the given number of significant digits, halves away from zero.
pub fn round_to_significant(value: f64, digits: usize) -> f64 {
    if value == 0.0 || !value.is_finite() || digits == 0 {
        return value;
    }

    let magnitude = value.abs().log10().floor() as i32;
    let shift = digits as i32 - 1 - magnitude;
    if shift >= 0 {
        let factor = 10f64.powi(shift);
        (value * factor).round() / factor
    } else {
        let factor = 10f64.powi(-shift);
        (value / factor).round() * factor
    }
}

/// Render a number with a fixed count of significant digits, switching to
/// exponent notation for very large or very small magnitudes.
pub fn to_precision(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return format!("{:.*}", digits - 1, 0.0);
    }

    let rounded = round_to_significant(value, digits);
    let exponent = rounded.abs().log10().floor() as i32;

    if exponent < -6 || exponent >= digits as i32 {
        let mantissa = rounded / 10f64.powi(exponent);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{:.*}e{}{}", digits - 1, mantissa, sign, exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        format!("{:.*}", decimals, rounded)
    }
}

/// A node in the fact tree.
///
/// Children are owned and keyed by symbol. There is no parent pointer;
/// paths are always walked from the root down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactNode {
    value: NodeValue,
    symbol: String,
    cardinality: NodeCardinality,
    children: BTreeMap<String, FactNode>,
}

impl FactNode {
    /// Create a new childless node.
    pub fn new(value: NodeValue, cardinality: NodeCardinality) -> Self {
        let symbol = value.symbol();
        Self {
            value,
            symbol,
            cardinality,
            children: BTreeMap::new(),
        }
    }

    pub fn value(&self) -> &NodeValue {
        &self.value
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn cardinality(&self) -> NodeCardinality {
        self.cardinality
    }

    pub fn node_type(&self) -> NodeType {
        self.value.node_type()
    }

    /// Look up a child by its symbol.
    pub fn child(&self, symbol: &str) -> Option<&FactNode> {
        self.children.get(symbol)
    }

    /// Look up a child by its symbol for mutation.
    pub fn child_mut(&mut self, symbol: &str) -> Option<&mut FactNode> {
        self.children.get_mut(symbol)
    }

    pub fn has_child(&self, symbol: &str) -> bool {
        self.children.contains_key(symbol)
    }

    /// Iterate over children in key order.
    pub fn children(&self) -> impl Iterator<Item = &FactNode> {
        self.children.values()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Attach a child, returning a handle to it.
    ///
    /// Fails for a node that takes no children, and for a ONE node that
    /// already holds a child under a different key.
    pub fn add_child(&mut self, node: FactNode) -> Result<&mut FactNode> {
        match self.cardinality {
            NodeCardinality::None => {
                return Err(RePraxisError::InvalidChild {
                    symbol: node.symbol,
                    reason: format!("node '{}' cannot have children", self.symbol),
                });
            }
            NodeCardinality::One
                if !self.children.is_empty() && !self.children.contains_key(&node.symbol) =>
            {
                return Err(RePraxisError::InvalidChild {
                    symbol: node.symbol,
                    reason: format!("node '{}' already has a child", self.symbol),
                });
            }
            _ => {}
        }

        let key = node.symbol.clone();
        Ok(self.children.entry(key).or_insert(node))
    }

    /// Remove a child by symbol. Returns whether a child was removed.
    pub fn remove_child(&mut self, symbol: &str) -> bool {
        self.children.remove(symbol).is_some()
    }

    /// Drop every child and its subtree.
    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Childless copy of this node, used when inserting parsed templates.
    pub fn detached(&self) -> FactNode {
        FactNode::new(self.value.clone(), self.cardinality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_symbol_precision() {
        assert_eq!(NodeValue::Float(3.14159).symbol(), "3.14");
        assert_eq!(NodeValue::Float(0.5).symbol(), "0.500");
        assert_eq!(NodeValue::Float(1234.5).symbol(), "1.23e+3");
        assert_eq!(NodeValue::Float(-2.5).symbol(), "-2.50");
        assert_eq!(NodeValue::Int(-20).symbol(), "-20");
    }

    #[test]
    fn test_round_to_significant() {
        assert_eq!(round_to_significant(31.875, 3), 31.9);
        assert_eq!(round_to_significant(21.25, 3), 21.3);
        assert_eq!(round_to_significant(60.0, 3), 60.0);
        assert_eq!(round_to_significant(123456.0, 3), 123000.0);
        assert_eq!(round_to_significant(0.0, 3), 0.0);
    }

    #[test]
    fn test_equality_is_type_strict() {
        assert!(NodeValue::Int(1).equal_to(&NodeValue::Int(1)));
        assert!(!NodeValue::Int(1).equal_to(&NodeValue::Float(1.0)));
        assert!(!NodeValue::Symbol("1".into()).equal_to(&NodeValue::Int(1)));
        assert!(NodeValue::Symbol("a".into()).not_equal_to(&NodeValue::Int(1)));
    }

    #[test]
    fn test_numeric_ordering_across_types() {
        let ten = NodeValue::Int(10);
        let ten_and_half = NodeValue::Float(10.5);
        assert!(ten.less_than(&ten_and_half).unwrap());
        assert!(ten_and_half.greater_than_equal_to(&ten).unwrap());
        assert!(ten.less_than_equal_to(&NodeValue::Int(10)).unwrap());
        assert!(!ten.greater_than(&NodeValue::Int(10)).unwrap());
    }

    #[test]
    fn test_symbol_ordering() {
        let apple = NodeValue::Symbol("apple".into());
        let banana = NodeValue::Symbol("Banana".into());
        assert!(apple.less_than(&banana).unwrap());
        assert!(NodeValue::Symbol("a".into())
            .less_than(&NodeValue::Symbol("A".into()))
            .unwrap());
    }

    #[test]
    fn test_invalid_ordering_is_type_error() {
        let symbol = NodeValue::Symbol("jordan".into());
        let variable = NodeValue::Variable("?x".into());
        assert!(matches!(
            symbol.greater_than(&NodeValue::Int(3)),
            Err(RePraxisError::NodeType { .. })
        ));
        assert!(variable.less_than(&variable).is_err());
    }

    #[test]
    fn test_add_child_respects_cardinality() {
        let mut leaf = FactNode::new(NodeValue::Symbol("leaf".into()), NodeCardinality::None);
        assert!(leaf
            .add_child(FactNode::new(NodeValue::Int(1), NodeCardinality::Many))
            .is_err());

        let mut single = FactNode::new(NodeValue::Symbol("hp".into()), NodeCardinality::One);
        single
            .add_child(FactNode::new(NodeValue::Int(1), NodeCardinality::Many))
            .unwrap();
        assert!(single
            .add_child(FactNode::new(NodeValue::Int(2), NodeCardinality::Many))
            .is_err());
        assert!(single.has_child("1"));

        assert!(single.remove_child("1"));
        assert!(!single.remove_child("1"));
    }
}
