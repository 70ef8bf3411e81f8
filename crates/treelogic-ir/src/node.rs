//! Node references, candidates and runtime values.
//!
//! The solver never inspects syntax-tree nodes directly: it manipulates
//! [`NodeRef`] handles handed to it by the surrounding tree subsystem, and
//! wraps them into [`Candidate`] values, optionally decorated with a
//! [`NodeMetadata`] record carried along from the lexical environment.

use serde::{Deserialize, Serialize};

use crate::types::TypeId;

/// Opaque reference to one syntax-tree node instance.
///
/// The identifier is assigned by the owning tree; the engine only ever
/// compares it and threads it through converters and predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    /// Instance identifier, unique within one analysis unit.
    pub id: i64,
    /// Concrete type of the node, as registered in the type table.
    pub ty: TypeId,
}

impl NodeRef {
    pub fn new(id: i64, ty: TypeId) -> Self {
        NodeRef { id, ty }
    }
}

/// Opaque handle on the ambient lexical environment.
///
/// Generated converters and predicates receive it verbatim; the engine
/// attaches it to every relation at construction time and never looks
/// inside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvRef(pub u32);

/// Runtime value for closure arguments and metadata payloads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    Node(NodeRef),
    Env(EnvRef),
    List(Vec<Value>),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }
}

impl From<NodeRef> for Value {
    fn from(node: NodeRef) -> Self {
        Value::Node(node)
    }
}

/// Arbitrary key/value payload attached to a candidate.
///
/// Entries keep their insertion order; two records are equal only when they
/// hold the same entries in the same order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadata {
    entries: Vec<(String, Value)>,
}

impl NodeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.entries.push((key.into(), value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The unit of value a logic variable can be bound to: a node reference
/// plus an optional metadata record.
///
/// A bare node used where a candidate is expected is implicitly wrapped
/// through the [`From`] impl, with no metadata attached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub node: NodeRef,
    pub metadata: Option<NodeMetadata>,
}

impl Candidate {
    pub fn new(node: NodeRef) -> Self {
        Candidate {
            node,
            metadata: None,
        }
    }

    pub fn with_metadata(node: NodeRef, metadata: NodeMetadata) -> Self {
        Candidate {
            node,
            metadata: Some(metadata),
        }
    }
}

impl From<NodeRef> for Candidate {
    fn from(node: NodeRef) -> Self {
        Candidate::new(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_candidate_wrap_has_no_metadata() {
        let node = NodeRef::new(7, TypeId::from_raw(1));
        let cand: Candidate = node.into();
        assert_eq!(cand.node, node);
        assert!(cand.metadata.is_none());
    }

    #[test]
    fn metadata_preserves_entry_order() {
        let md = NodeMetadata::new()
            .with("kind", Value::str("decl"))
            .with("depth", Value::Int(2));
        assert_eq!(md.get("kind"), Some(&Value::str("decl")));
        assert_eq!(md.get("depth"), Some(&Value::Int(2)));
        assert!(md.get("missing").is_none());
    }

    #[test]
    fn candidate_survives_json() {
        let node = NodeRef::new(42, TypeId::from_raw(4));
        let cand = Candidate::with_metadata(node, NodeMetadata::new().with("k", Value::Bool(true)));
        let json = serde_json::to_string(&cand).unwrap();
        let back: Candidate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cand);
    }

    #[test]
    fn candidates_compare_structurally() {
        let node = NodeRef::new(1, TypeId::from_raw(1));
        let a = Candidate::new(node);
        let b = Candidate::new(node);
        assert_eq!(a, b);
        let c = Candidate::with_metadata(node, NodeMetadata::new().with("k", Value::Int(1)));
        assert_ne!(a, c);
    }
}
