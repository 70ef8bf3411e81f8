//! Property signatures and their registry.
//!
//! The node/property subsystem declares one [`PropertySignature`] for every
//! function the engine may reference as a converter, equality test or
//! predicate. Parameter lists are explicit and caller-ordered; the engine
//! never recovers ordering from any implicit declaration source.

use serde::{Deserialize, Serialize};

use crate::types::TypeId;

/// Signature of a property: its owner type, return type and the ordered
/// explicit parameters (the receiver is implicit).
///
/// `uid` is the stable identity key used for generation-key memoization;
/// two signatures with the same uid denote the same property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySignature {
    pub uid: String,
    pub name: String,
    pub owner: TypeId,
    pub returns: TypeId,
    pub params: Vec<TypeId>,
}

impl PropertySignature {
    pub fn new(
        uid: impl Into<String>,
        name: impl Into<String>,
        owner: TypeId,
        returns: TypeId,
        params: Vec<TypeId>,
    ) -> Self {
        PropertySignature {
            uid: uid.into(),
            name: name.into(),
            owner,
            returns,
            params,
        }
    }

    /// Number of explicit parameters, receiver excluded.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Registry of property signatures, looked up by uid.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SignatureRegistry {
    signatures: Vec<PropertySignature>,
}

impl SignatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new property signature.
    pub fn register(&mut self, signature: PropertySignature) {
        self.signatures.push(signature);
    }

    /// Look up a signature by its uid.
    pub fn get(&self, uid: &str) -> Option<&PropertySignature> {
        self.signatures.iter().find(|sig| sig.uid == uid)
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.get(uid).is_some()
    }

    pub fn all(&self) -> &[PropertySignature] {
        &self.signatures
    }
}
