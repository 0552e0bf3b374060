//! Queries - ordered clause lists evaluated against a fact database.

mod expression;
mod unify;

pub use expression::*;
pub use unify::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

use crate::database::FactDatabase;
use crate::error::Result;
use crate::node::{NodeValue, Value};
use crate::sentence::node_from_value;

/// Variable name (with its leading `?`) to bound node value.
pub type Bindings = BTreeMap<String, NodeValue>;

/// Variable name to raw value, as supplied by and returned to callers.
pub type RawBindings = BTreeMap<String, Value>;

/// Intermediate state threaded through clause evaluation.
///
/// A failed state carries no bindings. A successful state with no bindings
/// succeeded without anything to report.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub success: bool,
    pub bindings: Vec<Bindings>,
}

impl QueryState {
    /// Create a new query state.
    pub fn new(success: bool, bindings: Vec<Bindings>) -> Self {
        Self { success, bindings }
    }

    /// A state that has failed.
    pub fn failed() -> Self {
        Self::new(false, Vec::new())
    }

    /// Succeed with the given bindings, or fail when there are none.
    pub fn from_bindings(bindings: Vec<Bindings>) -> Self {
        if bindings.is_empty() {
            Self::failed()
        } else {
            Self::new(true, bindings)
        }
    }

    /// Convert node bindings into raw values for the caller.
    pub fn to_result(&self) -> QueryResult {
        if !self.success {
            return QueryResult::failed();
        }

        let bindings = self
            .bindings
            .iter()
            .map(|bindings| {
                bindings
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_value()))
                    .collect()
            })
            .collect();

        QueryResult::new(true, bindings)
    }
}

/// The outcome of running a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    success: bool,
    bindings: Vec<RawBindings>,
}

impl QueryResult {
    /// Create a new query result. A failed result never carries bindings.
    pub fn new(success: bool, bindings: Vec<RawBindings>) -> Self {
        let bindings = if success { bindings } else { Vec::new() };
        Self { success, bindings }
    }

    pub fn failed() -> Self {
        Self::new(false, Vec::new())
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn bindings(&self) -> &[RawBindings] {
        &self.bindings
    }

    /// Consume the result, returning the binding sets.
    pub fn into_bindings(self) -> Vec<RawBindings> {
        self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn first(&self) -> Option<&RawBindings> {
        self.bindings.first()
    }

    /// Keep only the named variables in each binding set.
    pub fn limit_to_vars(&self, variables: &[&str]) -> QueryResult {
        if !self.success {
            return QueryResult::failed();
        }
        if variables.is_empty() {
            return QueryResult::new(true, Vec::new());
        }

        let bindings = self
            .bindings
            .iter()
            .map(|bindings| {
                variables
                    .iter()
                    .filter_map(|name| {
                        bindings
                            .get(*name)
                            .map(|value| (name.to_string(), value.clone()))
                    })
                    .collect()
            })
            .collect();

        QueryResult::new(true, bindings)
    }
}

/// An immutable list of query clauses.
///
/// ```
/// use repraxis::{DBQuery, FactDatabase};
///
/// let mut db = FactDatabase::new();
/// db.insert("astrid.relationships.lee.reputation!20").unwrap();
///
/// let query = DBQuery::new()
///     .with_clause("astrid.relationships.?other.reputation!?r")
///     .with_clause("gte ?r 10");
/// assert!(query.run(&db).unwrap().success());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DBQuery {
    clauses: Vec<String>,
}

impl DBQuery {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a query from a list of clauses.
    pub fn from_clauses<I, S>(clauses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            clauses: clauses.into_iter().map(Into::into).collect(),
        }
    }

    /// A new query with one more clause. The receiver is left unchanged.
    pub fn with_clause(&self, clause: impl Into<String>) -> DBQuery {
        let mut clauses = self.clauses.clone();
        clauses.push(clause.into());
        Self { clauses }
    }

    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    /// Run the query with no initial bindings.
    pub fn run(&self, db: &FactDatabase) -> Result<QueryResult> {
        self.run_with_bindings(db, &[])
    }

    /// Run the query starting from caller-supplied binding sets.
    ///
    /// Clauses are evaluated in order and evaluation stops at the first
    /// clause that fails.
    pub fn run_with_bindings(
        &self,
        db: &FactDatabase,
        bindings: &[RawBindings],
    ) -> Result<QueryResult> {
        let initial = bindings
            .iter()
            .map(|raw| {
                raw.iter()
                    .map(|(name, value)| (name.clone(), node_from_value(value)))
                    .collect()
            })
            .collect();

        let mut state = QueryState::new(true, initial);

        for clause in &self.clauses {
            let expression = QueryExpression::parse(clause)?;
            state = expression.evaluate(db, state)?;

            if !state.success {
                trace!(clause = clause.as_str(), "query clause failed");
                break;
            }
        }

        Ok(state.to_result())
    }
}
