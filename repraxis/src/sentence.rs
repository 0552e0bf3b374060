//! Sentence parsing and binding.
//!
//! A sentence is `segment (('.' | '!') segment)*`. A `.` after a segment
//! gives it MANY cardinality and a `!` gives it ONE. The last segment is
//! always MANY. Text inside `[...]` is never split.

use crate::error::{RePraxisError, Result};
use crate::node::{FactNode, NodeCardinality, NodeValue, Value};
use crate::query::Bindings;

/// Parse a sentence into an ordered list of childless nodes.
pub fn parse_sentence(sentence: &str) -> Result<Vec<FactNode>> {
    let mut nodes = Vec::new();
    let mut token = String::new();
    let mut in_literal = false;

    for c in sentence.chars() {
        match c {
            '[' => in_literal = true,
            ']' => in_literal = false,
            '.' | '!' if !in_literal => {
                let cardinality = if c == '!' {
                    NodeCardinality::One
                } else {
                    NodeCardinality::Many
                };
                nodes.push(node_from_string(&token, cardinality));
                token.clear();
            }
            _ => token.push(c),
        }
    }

    if in_literal {
        return Err(RePraxisError::UnterminatedLiteral {
            sentence: sentence.to_string(),
        });
    }

    nodes.push(node_from_string(&token, NodeCardinality::Many));
    Ok(nodes)
}

/// Build a node from one sentence segment.
///
/// `?name` is a variable, then integer and float parses are tried in that
/// order, and anything else is a symbol.
pub fn node_from_string(token: &str, cardinality: NodeCardinality) -> FactNode {
    let value = if token.starts_with('?') {
        NodeValue::Variable(token.to_string())
    } else {
        parse_number(token).unwrap_or_else(|| NodeValue::Symbol(token.to_string()))
    };
    FactNode::new(value, cardinality)
}

/// Convert a caller-supplied raw value into a node value.
///
/// Numeric-looking input becomes a number and everything else becomes a
/// symbol. The result is never a variable.
pub fn node_from_value(value: &Value) -> NodeValue {
    match value {
        Value::Int(value) => NodeValue::Int(*value),
        Value::Float(value) if value.is_finite() => number_value(*value),
        Value::Float(value) => NodeValue::Symbol(value.to_string()),
        Value::Text(text) => {
            parse_number(text.trim()).unwrap_or_else(|| NodeValue::Symbol(text.clone()))
        }
    }
}

fn parse_number(token: &str) -> Option<NodeValue> {
    if token.is_empty() {
        return None;
    }
    if let Ok(value) = token.parse::<i64>() {
        return Some(NodeValue::Int(value));
    }
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(number_value(value)),
        _ => None,
    }
}

/// Integral floats are stored as ints.
fn number_value(value: f64) -> NodeValue {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        NodeValue::Int(value as i64)
    } else {
        NodeValue::Float(value)
    }
}

/// Check if a sentence contains at least one variable.
pub fn has_variables(sentence: &str) -> Result<bool> {
    Ok(parse_sentence(sentence)?
        .iter()
        .any(|node| node.value().is_variable()))
}

/// Substitute bound variables into a sentence.
///
/// Unbound variables are left in place. Symbols that contain a delimiter
/// are wrapped in `[...]` so the result parses back to the same nodes.
/// Floats are the exception: `1234.5` is written as `[1.23e+3]`, which
/// parses back as the int `1230`.
pub fn bind_sentence(sentence: &str, bindings: &Bindings) -> Result<String> {
    let nodes = parse_sentence(sentence)?;
    let mut bound = String::new();

    for (i, node) in nodes.iter().enumerate() {
        let value = match node.value() {
            NodeValue::Variable(name) => bindings.get(name).unwrap_or(node.value()),
            value => value,
        };
        bound.push_str(&escape_symbol(&value.symbol()));

        if i + 1 < nodes.len() {
            bound.push(match node.cardinality() {
                NodeCardinality::One => '!',
                _ => '.',
            });
        }
    }

    Ok(bound)
}

pub(crate) fn escape_symbol(symbol: &str) -> String {
    if symbol.contains(['.', '!']) {
        format!("[{}]", symbol)
    } else {
        symbol.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cardinality() {
        let nodes = parse_sentence("astrid.relationships.jordan.reputation!30").unwrap();
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0].cardinality(), NodeCardinality::Many);
        assert_eq!(nodes[3].symbol(), "reputation");
        assert_eq!(nodes[3].cardinality(), NodeCardinality::One);
        assert_eq!(nodes[4].value(), &NodeValue::Int(30));
        assert_eq!(nodes[4].cardinality(), NodeCardinality::Many);
    }

    #[test]
    fn test_parse_node_kinds() {
        let nodes = parse_sentence("?speaker.-10.[2.5].name").unwrap();
        assert_eq!(nodes[0].value(), &NodeValue::Variable("?speaker".into()));
        assert_eq!(nodes[1].value(), &NodeValue::Int(-10));
        assert_eq!(nodes[2].value(), &NodeValue::Float(2.5));
        assert_eq!(nodes[3].value(), &NodeValue::Symbol("name".into()));
    }

    #[test]
    fn test_parse_literal() {
        let nodes = parse_sentence("toph.fullName![Toph Beifong. Esq!]").unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[2].symbol(), "Toph Beifong. Esq!");
    }

    #[test]
    fn test_unterminated_literal() {
        let result = parse_sentence("toph.fullName![Toph");
        assert!(matches!(
            result,
            Err(RePraxisError::UnterminatedLiteral { .. })
        ));
    }

    #[test]
    fn test_node_from_value() {
        assert_eq!(node_from_value(&Value::from("lee")), NodeValue::Symbol("lee".into()));
        assert_eq!(node_from_value(&Value::from(" 12 ")), NodeValue::Int(12));
        assert_eq!(node_from_value(&Value::from(2.0)), NodeValue::Int(2));
        assert_eq!(node_from_value(&Value::from(2.5)), NodeValue::Float(2.5));
        assert_eq!(node_from_value(&Value::from("?x")), NodeValue::Symbol("?x".into()));
    }

    #[test]
    fn test_bind_sentence() {
        let mut bindings = Bindings::new();
        bindings.insert("?other".into(), NodeValue::Symbol("jordan".into()));
        bindings.insert("?r".into(), NodeValue::Float(1.5));

        let bound =
            bind_sentence("astrid.relationships.?other.reputation!?r", &bindings).unwrap();
        assert_eq!(bound, "astrid.relationships.jordan.reputation![1.50]");

        let partial = bind_sentence("?other.relationships.?x", &bindings).unwrap();
        assert_eq!(partial, "jordan.relationships.?x");
        assert!(has_variables(&partial).unwrap());
    }

    #[test]
    fn test_bind_large_float_reparses_as_int() {
        let mut bindings = Bindings::new();
        bindings.insert("?r".into(), NodeValue::Float(1234.5));

        let bound = bind_sentence("score!?r", &bindings).unwrap();
        assert_eq!(bound, "score![1.23e+3]");
        assert_eq!(parse_sentence(&bound).unwrap()[1].value(), &NodeValue::Int(1230));
    }
}
