//! The fact database - a tree of facts under a single root node.

use tracing::{debug, trace};

use crate::error::{RePraxisError, Result};
use crate::node::{FactNode, NodeCardinality, NodeValue};
use crate::sentence::{escape_symbol, parse_sentence};

/// Symbol of the root node every fact hangs from.
pub const ROOT_SYMBOL: &str = "root";

/// In-memory store of facts.
///
/// Every inserted sentence becomes a chain of nodes below the root, sharing
/// prefixes with the facts already present.
#[derive(Debug, Clone)]
pub struct FactDatabase {
    root: FactNode,
}

impl FactDatabase {
    /// Create a new empty database.
    pub fn new() -> Self {
        Self {
            root: FactNode::new(
                NodeValue::Symbol(ROOT_SYMBOL.to_string()),
                NodeCardinality::Many,
            ),
        }
    }

    /// The root node of the fact tree.
    pub fn root(&self) -> &FactNode {
        &self.root
    }

    /// Insert a fact.
    ///
    /// Inserting below a ONE node that holds a different child replaces that
    /// child. Nothing is modified when the sentence is rejected.
    pub fn insert(&mut self, sentence: &str) -> Result<()> {
        let nodes = parse_sentence(sentence)?;
        reject_variables(&nodes, sentence, "inserted")?;
        self.check_cardinality(&nodes, sentence)?;

        let mut current = &mut self.root;
        for node in &nodes {
            let symbol = node.symbol();
            if current.has_child(symbol) {
                current = current
                    .child_mut(symbol)
                    .ok_or_else(|| RePraxisError::MissingChild {
                        symbol: symbol.to_string(),
                    })?;
            } else {
                if current.cardinality() == NodeCardinality::One {
                    current.clear_children();
                }
                current = current.add_child(node.detached())?;
            }
        }

        debug!(sentence, "inserted fact");
        Ok(())
    }

    /// Existing nodes along the path must keep the cardinality they were
    /// first inserted with.
    fn check_cardinality(&self, nodes: &[FactNode], sentence: &str) -> Result<()> {
        let mut current = &self.root;
        for node in nodes {
            match current.child(node.symbol()) {
                Some(existing) if existing.cardinality() != node.cardinality() => {
                    return Err(RePraxisError::Cardinality {
                        symbol: node.symbol().to_string(),
                        sentence: sentence.to_string(),
                    });
                }
                Some(existing) => current = existing,
                None => break,
            }
        }
        Ok(())
    }

    /// Check if a fact exists.
    pub fn assert(&self, sentence: &str) -> Result<bool> {
        let nodes = parse_sentence(sentence)?;
        reject_variables(&nodes, sentence, "asserted")?;

        let mut current = &self.root;
        for (i, node) in nodes.iter().enumerate() {
            let Some(child) = current.child(node.symbol()) else {
                return Ok(false);
            };
            if i + 1 == nodes.len() {
                return Ok(true);
            }
            if child.cardinality() != node.cardinality() {
                return Ok(false);
            }
            current = child;
        }

        Ok(true)
    }

    /// Delete the last segment of a fact along with its subtree.
    ///
    /// Every segment but the last must exist. Returns whether anything was
    /// removed.
    pub fn delete(&mut self, sentence: &str) -> Result<bool> {
        let nodes = parse_sentence(sentence)?;
        reject_variables(&nodes, sentence, "deleted")?;

        let Some((last, path)) = nodes.split_last() else {
            return Ok(false);
        };

        let mut current = &mut self.root;
        for node in path {
            current = current
                .child_mut(node.symbol())
                .ok_or_else(|| RePraxisError::MissingChild {
                    symbol: node.symbol().to_string(),
                })?;
        }

        let removed = current.remove_child(last.symbol());
        if removed {
            debug!(sentence, "deleted fact");
        } else {
            trace!(sentence, "nothing to delete");
        }
        Ok(removed)
    }

    /// Remove every fact.
    pub fn clear(&mut self) {
        self.root.clear_children();
    }

    /// Every stored fact, one sentence per leaf, in key order.
    pub fn sentences(&self) -> Vec<String> {
        let mut sentences = Vec::new();
        collect_sentences(&self.root, "", &mut sentences);
        sentences
    }

    /// Number of leaf facts.
    pub fn len(&self) -> usize {
        count_leaves(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.child_count() == 0
    }
}

impl Default for FactDatabase {
    fn default() -> Self {
        Self::new()
    }
}

fn reject_variables(nodes: &[FactNode], sentence: &str, action: &str) -> Result<()> {
    if nodes.iter().any(|node| node.value().is_variable()) {
        return Err(RePraxisError::NodeType {
            message: format!(
                "Found variable in sentence '{}'. Sentence cannot contain variables when being {}.",
                sentence, action
            ),
        });
    }
    Ok(())
}

fn collect_sentences(node: &FactNode, prefix: &str, sentences: &mut Vec<String>) {
    let delimiter = match node.cardinality() {
        NodeCardinality::One => "!",
        _ => ".",
    };

    for child in node.children() {
        let segment = escape_symbol(child.symbol());
        let path = if prefix.is_empty() {
            segment
        } else {
            format!("{}{}{}", prefix, delimiter, segment)
        };

        if child.child_count() == 0 {
            sentences.push(path);
        } else {
            collect_sentences(child, &path, sentences);
        }
    }
}

fn count_leaves(node: &FactNode) -> usize {
    node.children()
        .map(|child| {
            if child.child_count() == 0 {
                1
            } else {
                count_leaves(child)
            }
        })
        .sum()
}
