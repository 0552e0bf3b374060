//! Query clauses and their evaluation.

use std::fmt;

use crate::database::FactDatabase;
use crate::error::{RePraxisError, Result};
use crate::node::{FactNode, NodeValue};
use crate::sentence::{bind_sentence, has_variables, parse_sentence};

use super::unify::unify_all;
use super::{Bindings, QueryState};

/// Comparison operators available in three-part clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
}

impl Comparator {
    /// Look up a comparator by its clause keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "eq" => Some(Comparator::Eq),
            "neq" => Some(Comparator::Neq),
            "lt" => Some(Comparator::Lt),
            "gt" => Some(Comparator::Gt),
            "lte" => Some(Comparator::Lte),
            "gte" => Some(Comparator::Gte),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Comparator::Eq => "eq",
            Comparator::Neq => "neq",
            Comparator::Lt => "lt",
            Comparator::Gt => "gt",
            Comparator::Lte => "lte",
            Comparator::Gte => "gte",
        }
    }

    /// Apply the comparison to a pair of values.
    pub fn compare(&self, lhs: &NodeValue, rhs: &NodeValue) -> Result<bool> {
        match self {
            Comparator::Eq => Ok(lhs.equal_to(rhs)),
            Comparator::Neq => Ok(lhs.not_equal_to(rhs)),
            Comparator::Lt => lhs.less_than(rhs),
            Comparator::Gt => lhs.greater_than(rhs),
            Comparator::Lte => lhs.less_than_equal_to(rhs),
            Comparator::Gte => lhs.greater_than_equal_to(rhs),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// A single parsed query clause.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpression {
    /// `sentence` - the sentence must hold.
    Assert(String),
    /// `not sentence` - the sentence must never hold.
    Not(String),
    /// `op lhs rhs` - compare two single-node operands.
    Compare {
        comparator: Comparator,
        lhs: String,
        rhs: String,
    },
}

impl QueryExpression {
    /// Classify a clause by its whitespace-separated parts.
    pub fn parse(clause: &str) -> Result<Self> {
        let parts = split_clause(clause);

        match parts.as_slice() {
            [statement] => Ok(QueryExpression::Assert(statement.clone())),
            [keyword, statement] if keyword == "not" => {
                Ok(QueryExpression::Not(statement.clone()))
            }
            [operator, lhs, rhs] => {
                let comparator = Comparator::from_keyword(operator).ok_or_else(|| {
                    RePraxisError::UnknownComparator {
                        operator: operator.clone(),
                        expression: clause.to_string(),
                    }
                })?;
                Ok(QueryExpression::Compare {
                    comparator,
                    lhs: lhs.clone(),
                    rhs: rhs.clone(),
                })
            }
            _ => Err(RePraxisError::UnrecognizedClause {
                expression: clause.to_string(),
            }),
        }
    }

    /// Evaluate this clause against the database, narrowing the state.
    pub fn evaluate(&self, db: &FactDatabase, state: QueryState) -> Result<QueryState> {
        match self {
            QueryExpression::Assert(statement) => evaluate_assert(db, state, statement),
            QueryExpression::Not(statement) => evaluate_not(db, state, statement),
            QueryExpression::Compare {
                comparator,
                lhs,
                rhs,
            } => evaluate_compare(state, *comparator, lhs, rhs),
        }
    }
}

/// Split a clause on whitespace, keeping `[...]` literals whole.
pub fn split_clause(clause: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_literal = false;

    for c in clause.chars() {
        match c {
            '[' => {
                in_literal = true;
                current.push(c);
            }
            ']' => {
                in_literal = false;
                current.push(c);
            }
            c if c.is_whitespace() && !in_literal => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

fn evaluate_assert(db: &FactDatabase, state: QueryState, statement: &str) -> Result<QueryState> {
    if !has_variables(statement)? {
        return Ok(if db.assert(statement)? {
            state
        } else {
            QueryState::failed()
        });
    }

    // Re-asserting each substituted sentence also rejects bindings where a
    // variable repeated within the statement was bound inconsistently.
    let mut valid = Vec::new();
    for bindings in unify_all(db, &state, &[statement])? {
        if db.assert(&bind_sentence(statement, &bindings)?)? {
            valid.push(bindings);
        }
    }

    Ok(QueryState::from_bindings(valid))
}

fn evaluate_not(db: &FactDatabase, state: QueryState, statement: &str) -> Result<QueryState> {
    if !has_variables(statement)? {
        return Ok(if db.assert(statement)? {
            QueryState::failed()
        } else {
            state
        });
    }

    if state.bindings.is_empty() {
        let found = unify_all(db, &state, &[statement])?;
        return Ok(if found.is_empty() {
            state
        } else {
            QueryState::failed()
        });
    }

    let scope = QueryState::new(true, Vec::new());
    let mut valid = Vec::new();
    for bindings in state.bindings {
        let sentence = bind_sentence(statement, &bindings)?;

        let holds = if has_variables(&sentence)? {
            !unify_all(db, &scope, &[sentence.as_str()])?.is_empty()
        } else {
            db.assert(&sentence)?
        };

        if !holds {
            valid.push(bindings);
        }
    }

    Ok(QueryState::from_bindings(valid))
}

fn evaluate_compare(
    state: QueryState,
    comparator: Comparator,
    lhs: &str,
    rhs: &str,
) -> Result<QueryState> {
    let lhs = single_operand(lhs)?;
    let rhs = single_operand(rhs)?;

    // Comparators only filter existing bindings, so with none there is
    // nothing to keep.
    if state.bindings.is_empty() {
        return Ok(QueryState::failed());
    }

    let mut valid = Vec::new();
    for bindings in state.bindings {
        let left = resolve_operand(&lhs, &bindings);
        let right = resolve_operand(&rhs, &bindings);
        if comparator.compare(left, right)? {
            valid.push(bindings);
        }
    }

    Ok(QueryState::from_bindings(valid))
}

fn single_operand(operand: &str) -> Result<FactNode> {
    let [node]: [FactNode; 1] =
        parse_sentence(operand)?
            .try_into()
            .map_err(|_| RePraxisError::TooManyParts {
                operand: operand.to_string(),
            })?;
    Ok(node)
}

fn resolve_operand<'a>(operand: &'a FactNode, bindings: &'a Bindings) -> &'a NodeValue {
    match operand.value() {
        NodeValue::Variable(name) => bindings.get(name).unwrap_or(operand.value()),
        value => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clause_shapes() {
        assert_eq!(
            QueryExpression::parse("a.b.c").unwrap(),
            QueryExpression::Assert("a.b.c".into())
        );
        assert_eq!(
            QueryExpression::parse("not  a.b.c").unwrap(),
            QueryExpression::Not("a.b.c".into())
        );
        assert_eq!(
            QueryExpression::parse("gte ?r 10").unwrap(),
            QueryExpression::Compare {
                comparator: Comparator::Gte,
                lhs: "?r".into(),
                rhs: "10".into(),
            }
        );
    }

    #[test]
    fn test_parse_clause_errors() {
        assert!(matches!(
            QueryExpression::parse("maybe a.b"),
            Err(RePraxisError::UnrecognizedClause { .. })
        ));
        assert!(matches!(
            QueryExpression::parse("approx ?r 10"),
            Err(RePraxisError::UnknownComparator { .. })
        ));
        assert!(matches!(
            QueryExpression::parse("eq ?a ?b ?c"),
            Err(RePraxisError::UnrecognizedClause { .. })
        ));
    }

    #[test]
    fn test_split_keeps_literals() {
        assert_eq!(
            split_clause("eq ?name [Toph Beifong]"),
            vec!["eq", "?name", "[Toph Beifong]"]
        );
    }

    #[test]
    fn test_compare_operand_too_many_parts() {
        let expression = QueryExpression::parse("gte ?r 10.5").unwrap();
        let db = FactDatabase::new();
        let result = expression.evaluate(&db, QueryState::new(true, Vec::new()));
        assert!(matches!(result, Err(RePraxisError::TooManyParts { .. })));
    }

    #[test]
    fn test_compare_constants_without_bindings_fails() {
        let db = FactDatabase::new();
        let holds = QueryExpression::parse("lt 1 2").unwrap();
        let fails = QueryExpression::parse("eq jordan lee").unwrap();

        assert!(!holds.evaluate(&db, QueryState::new(true, Vec::new())).unwrap().success);
        assert!(!fails.evaluate(&db, QueryState::new(true, Vec::new())).unwrap().success);
    }

    #[test]
    fn test_compare_constants_filters_existing_bindings() {
        let db = FactDatabase::new();
        let bindings: Bindings = [("?x".to_string(), NodeValue::Int(5))].into_iter().collect();
        let state = || QueryState::new(true, vec![bindings.clone()]);

        let holds = QueryExpression::parse("lt 1 2").unwrap().evaluate(&db, state()).unwrap();
        assert!(holds.success);
        assert_eq!(holds.bindings, vec![bindings.clone()]);

        let fails = QueryExpression::parse("gt 1 2").unwrap().evaluate(&db, state()).unwrap();
        assert!(!fails.success);
    }

    #[test]
    fn test_compare_variable_without_bindings_fails() {
        let db = FactDatabase::new();
        let expression = QueryExpression::parse("eq ?x 1").unwrap();
        let state = expression
            .evaluate(&db, QueryState::new(true, Vec::new()))
            .unwrap();
        assert!(!state.success);
    }
}
