//! Unification of sentence patterns against the fact tree.

use crate::database::FactDatabase;
use crate::error::Result;
use crate::node::{FactNode, NodeValue};
use crate::sentence::parse_sentence;

use super::{Bindings, QueryState};

/// Match a sentence pattern against the database.
///
/// Expands breadth-first from the root: a variable token branches into every
/// child of the current position, a concrete token keeps only the child with
/// the same symbol. Only matches that bound at least one variable are
/// returned.
pub fn unify(db: &FactDatabase, sentence: &str) -> Result<Vec<Bindings>> {
    let tokens = parse_sentence(sentence)?;
    let mut frontier: Vec<(Bindings, &FactNode)> = vec![(Bindings::new(), db.root())];

    for token in &tokens {
        let mut next = Vec::new();

        for (bindings, position) in &frontier {
            let position: &FactNode = *position;
            for child in position.children() {
                match token.value() {
                    NodeValue::Variable(name) => {
                        let mut branch = bindings.clone();
                        branch.insert(name.clone(), child.value().clone());
                        next.push((branch, child));
                    }
                    _ if child.symbol() == token.symbol() => {
                        next.push((bindings.clone(), child));
                    }
                    _ => {}
                }
            }
        }

        frontier = next;
    }

    Ok(frontier
        .into_iter()
        .filter(|(bindings, _)| !bindings.is_empty())
        .map(|(bindings, _)| bindings)
        .collect())
}

/// Unify each sentence in turn, joining the results with the bindings
/// accumulated so far.
///
/// Two binding maps join when every shared variable holds equal values;
/// other combinations are dropped. An empty accumulator takes the new
/// bindings as they are.
pub fn unify_all(db: &FactDatabase, state: &QueryState, sentences: &[&str]) -> Result<Vec<Bindings>> {
    let mut possible = state.bindings.clone();

    for sentence in sentences {
        let found = unify(db, sentence)?;

        possible = if possible.is_empty() {
            found
        } else {
            join(&possible, &found)
        };
    }

    possible.retain(|bindings| !bindings.is_empty());
    Ok(possible)
}

fn join(existing: &[Bindings], found: &[Bindings]) -> Vec<Bindings> {
    let mut joined = Vec::new();

    for old in existing {
        for new in found {
            let compatible = new
                .iter()
                .all(|(key, value)| old.get(key).map_or(true, |bound| bound.equal_to(value)));
            if !compatible {
                continue;
            }

            let mut merged = old.clone();
            for (key, value) in new {
                merged.entry(key.clone()).or_insert_with(|| value.clone());
            }
            joined.push(merged);
        }
    }

    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reputation_db() -> FactDatabase {
        let mut db = FactDatabase::new();
        db.insert("astrid.relationships.jordan.reputation!30").unwrap();
        db.insert("astrid.relationships.britt.reputation!-10").unwrap();
        db.insert("astrid.relationships.lee.reputation!20").unwrap();
        db.insert("player.relationships.jordan.reputation!-20").unwrap();
        db
    }

    #[test]
    fn test_unify_binds_every_match() {
        let db = reputation_db();
        let results = unify(&db, "astrid.relationships.?other.reputation!?r").unwrap();

        assert_eq!(results.len(), 3);
        let jordan = results
            .iter()
            .find(|b| b["?other"] == NodeValue::Symbol("jordan".into()))
            .unwrap();
        assert_eq!(jordan["?r"], NodeValue::Int(30));
    }

    #[test]
    fn test_unify_without_variables_yields_nothing() {
        let db = reputation_db();
        assert!(unify(&db, "astrid.relationships.jordan").unwrap().is_empty());
    }

    #[test]
    fn test_unify_all_joins_on_shared_variables() {
        let db = reputation_db();
        let state = QueryState::new(true, Vec::new());
        let results = unify_all(
            &db,
            &state,
            &[
                "?speaker.relationships.?other.reputation!?r0",
                "player.relationships.?other.reputation!?r1",
            ],
        )
        .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .all(|b| b["?other"] == NodeValue::Symbol("jordan".into())));
    }

    #[test]
    fn test_unify_all_respects_existing_bindings() {
        let db = reputation_db();
        let mut bound = Bindings::new();
        bound.insert("?other".into(), NodeValue::Symbol("lee".into()));
        let state = QueryState::new(true, vec![bound]);

        let results =
            unify_all(&db, &state, &["astrid.relationships.?other.reputation!?r"]).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["?r"], NodeValue::Int(20));
    }
}
