//! Ordered candidate domains.
//!
//! A domain is the finite, ordered sequence of candidates admissible for
//! one logic variable. Order is authoritative: the solver tries the first
//! element first. Domains are never deduplicated; combining two domains for
//! the same variable under a disjunction concatenates them, preserving
//! order and any duplicate trials.

use serde::{Deserialize, Serialize};

use crate::node::{Candidate, NodeRef};

/// Ordered, finite sequence of candidates for one variable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    candidates: Vec<Candidate>,
}

impl Domain {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Domain { candidates }
    }

    /// Build a domain from bare nodes, wrapping each into a candidate.
    pub fn from_nodes(nodes: impl IntoIterator<Item = NodeRef>) -> Self {
        Domain {
            candidates: nodes.into_iter().map(Candidate::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn contains(&self, candidate: &Candidate) -> bool {
        self.candidates.contains(candidate)
    }

    /// Append `other` after the existing candidates, keeping both orders.
    pub fn concat(mut self, other: Domain) -> Self {
        self.candidates.extend(other.candidates);
        self
    }
}

impl From<Vec<Candidate>> for Domain {
    fn from(candidates: Vec<Candidate>) -> Self {
        Domain::new(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeId;

    fn node(id: i64) -> NodeRef {
        NodeRef::new(id, TypeId::from_raw(3))
    }

    #[test]
    fn concat_preserves_order_and_duplicates() {
        let left = Domain::from_nodes([node(1), node(2)]);
        let right = Domain::from_nodes([node(2), node(3)]);
        let combined = left.concat(right);
        let ids: Vec<i64> = combined.iter().map(|c| c.node.id).collect();
        assert_eq!(ids, vec![1, 2, 2, 3]);
    }

    #[test]
    fn empty_domain() {
        let domain = Domain::from_nodes([]);
        assert!(domain.is_empty());
        assert!(!domain.contains(&Candidate::new(node(1))));
    }
}
