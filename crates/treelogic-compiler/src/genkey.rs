//! Generation keys and the registry memoizing specialized implementations.
//!
//! Every distinct (converter, equality) pair used by a bind and every
//! distinct (property, closure shape) pair used by a predicate needs one
//! specialized relation implementation. The registry deduplicates these by
//! structural [`GenerationKey`], so generated-code size is bounded by the
//! number of distinct combinations actually used, not by the number of
//! call sites. Keys are remembered in first-request order for the
//! downstream emitter.

use std::collections::HashMap;
use std::rc::Rc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use treelogic_ir::{Binder, PredicateImpl, PropertySignature, TypeId};

/// Uid standing in for an absent converter or equality property.
pub const DEFAULT_UID: &str = "Default";

/// Structural identity of one specialized relation implementation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationKey {
    /// One bind implementation per (converter, equality) pair.
    Binder { converter: String, equality: String },
    /// One predicate caller per (property, ordered closure types) pair.
    Predicate {
        property: String,
        closure_types: Vec<TypeId>,
    },
}

impl GenerationKey {
    pub fn binder(converter: Option<&str>, equality: Option<&str>) -> Self {
        GenerationKey::Binder {
            converter: converter.unwrap_or(DEFAULT_UID).to_string(),
            equality: equality.unwrap_or(DEFAULT_UID).to_string(),
        }
    }

    pub fn predicate(property: impl Into<String>, closure_types: Vec<TypeId>) -> Self {
        GenerationKey::Predicate {
            property: property.into(),
            closure_types,
        }
    }
}

/// Code-emission backend: produces one specialized implementation per key.
///
/// The engine treats emitted implementations as opaque handles; in the
/// generated analyzer they are parametrized combinator instantiations, in
/// tests they are plain closures.
pub trait EmissionBackend {
    /// Emit the bind implementation for `key`. Absent signatures mean the
    /// default behavior (identity conversion, structural equality).
    fn emit_binder(
        &mut self,
        key: &GenerationKey,
        converter: Option<&PropertySignature>,
        equality: Option<&PropertySignature>,
    ) -> Result<Binder>;

    /// Emit the predicate caller for `key`.
    fn emit_predicate(
        &mut self,
        key: &GenerationKey,
        property: &PropertySignature,
        debug_image: &str,
    ) -> Result<PredicateImpl>;
}

#[derive(Clone, Debug)]
enum Entry {
    /// Requested during the preparation pass, not yet emitted.
    Requested,
    Binder(Rc<Binder>),
    Predicate(Rc<PredicateImpl>),
}

/// Process-wide cache for one compilation run: at most one emitted
/// implementation per generation key.
#[derive(Debug, Default)]
pub struct GenKeyRegistry {
    order: Vec<GenerationKey>,
    entries: HashMap<GenerationKey, Entry>,
}

impl GenKeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `key` will be needed, without emitting anything yet.
    /// Used by the preparation pass, before signatures are resolvable.
    pub fn request(&mut self, key: GenerationKey) {
        if !self.entries.contains_key(&key) {
            self.order.push(key.clone());
            self.entries.insert(key, Entry::Requested);
        }
    }

    /// The emitted-or-requested keys, in first-request order.
    pub fn keys(&self) -> &[GenerationKey] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Fetch the bind implementation for `key`, emitting it on first use.
    pub fn binder(
        &mut self,
        key: GenerationKey,
        emit: impl FnOnce(&GenerationKey) -> Result<Binder>,
    ) -> Result<Rc<Binder>> {
        if let Some(Entry::Binder(handle)) = self.entries.get(&key) {
            return Ok(Rc::clone(handle));
        }
        let handle = Rc::new(emit(&key)?);
        if !matches!(self.entries.get(&key), Some(Entry::Requested)) {
            self.order.push(key.clone());
        }
        self.entries.insert(key, Entry::Binder(Rc::clone(&handle)));
        Ok(handle)
    }

    /// Fetch the predicate caller for `key`, emitting it on first use.
    pub fn predicate(
        &mut self,
        key: GenerationKey,
        emit: impl FnOnce(&GenerationKey) -> Result<PredicateImpl>,
    ) -> Result<Rc<PredicateImpl>> {
        if let Some(Entry::Predicate(handle)) = self.entries.get(&key) {
            return Ok(Rc::clone(handle));
        }
        let handle = Rc::new(emit(&key)?);
        if !matches!(self.entries.get(&key), Some(Entry::Requested)) {
            self.order.push(key.clone());
        }
        self.entries.insert(key, Entry::Predicate(Rc::clone(&handle)));
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_structural() {
        let a = GenerationKey::binder(Some("conv_1"), None);
        let b = GenerationKey::Binder {
            converter: "conv_1".to_string(),
            equality: DEFAULT_UID.to_string(),
        };
        assert_eq!(a, b);

        let p = GenerationKey::predicate("pred_1", vec![TypeId::from_raw(1)]);
        let q = GenerationKey::predicate("pred_1", vec![TypeId::from_raw(2)]);
        assert_ne!(p, q);
    }

    #[test]
    fn binder_emission_happens_once_per_key() {
        let mut registry = GenKeyRegistry::new();
        let key = GenerationKey::binder(None, None);
        let mut emissions = 0;

        for _ in 0..3 {
            let _ = registry
                .binder(key.clone(), |_| {
                    emissions += 1;
                    Ok(Binder::default())
                })
                .unwrap();
        }
        assert_eq!(emissions, 1);
        assert_eq!(registry.keys(), &[key]);
    }

    #[test]
    fn request_reserves_order_without_emitting() {
        let mut registry = GenKeyRegistry::new();
        let first = GenerationKey::binder(Some("c"), None);
        let second = GenerationKey::binder(None, Some("e"));
        registry.request(first.clone());
        registry.request(second.clone());
        registry.request(first.clone());
        assert_eq!(registry.keys(), &[first.clone(), second.clone()]);

        // Emission fills the reserved slot, order unchanged.
        let mut emissions = 0;
        let _ = registry
            .binder(second.clone(), |_| {
                emissions += 1;
                Ok(Binder::default())
            })
            .unwrap();
        assert_eq!(emissions, 1);
        assert_eq!(registry.keys(), &[first, second]);
    }
}
