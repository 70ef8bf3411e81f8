//! Logic variables and the pool that owns their bindings.
//!
//! A [`VarId`] is a handle into a [`VarPool`]; each evaluation (or node
//! instance) owns its own pool, so variables are never shared between
//! unrelated evaluations. A variable is either unbound or bound to exactly
//! one [`Candidate`]; the solver is the only writer, through the
//! crate-internal bind/unbind operations.

use serde::{Deserialize, Serialize};

use crate::error::SolveError;
use crate::node::Candidate;

/// Handle on one logic variable inside a [`VarPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarId(u32);

impl VarId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    fn raw(self) -> u32 {
        self.0
    }
}

/// Owner of a set of logic variables and their binding state.
#[derive(Clone, Debug, Default)]
pub struct VarPool {
    names: Vec<String>,
    bindings: Vec<Option<Candidate>>,
}

impl VarPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh, unbound variable.
    pub fn fresh(&mut self, name: impl Into<String>) -> VarId {
        let id = VarId(self.names.len() as u32);
        self.names.push(name.into());
        self.bindings.push(None);
        id
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, var: VarId) -> Option<&str> {
        self.names.get(var.index()).map(String::as_str)
    }

    /// Current value of a variable; `None` is the unset marker.
    pub fn value(&self, var: VarId) -> Option<&Candidate> {
        self.bindings.get(var.index()).and_then(Option::as_ref)
    }

    pub fn is_bound(&self, var: VarId) -> bool {
        self.value(var).is_some()
    }

    /// Reset every variable to unbound. Called when the equation that was
    /// binding them is discarded.
    pub fn reset(&mut self) {
        for slot in &mut self.bindings {
            *slot = None;
        }
    }

    pub(crate) fn check(&self, var: VarId) -> Result<(), SolveError> {
        if var.index() < self.bindings.len() {
            Ok(())
        } else {
            Err(SolveError::UnknownVariable {
                index: var.raw(),
                size: self.bindings.len(),
            })
        }
    }

    pub(crate) fn bind(&mut self, var: VarId, value: Candidate) {
        self.bindings[var.index()] = Some(value);
    }

    pub(crate) fn unbind(&mut self, var: VarId) {
        self.bindings[var.index()] = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeRef;
    use crate::types::TypeId;

    #[test]
    fn fresh_variables_start_unbound() {
        let mut pool = VarPool::new();
        let a = pool.fresh("A");
        let b = pool.fresh("B");
        assert!(!pool.is_bound(a));
        assert!(!pool.is_bound(b));
        assert_eq!(pool.name(a), Some("A"));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn reset_clears_all_bindings() {
        let mut pool = VarPool::new();
        let a = pool.fresh("A");
        let b = pool.fresh("B");
        pool.bind(a, Candidate::new(NodeRef::new(1, TypeId::from_raw(3))));
        pool.bind(b, Candidate::new(NodeRef::new(2, TypeId::from_raw(3))));
        assert!(pool.is_bound(a));
        pool.reset();
        assert!(pool.value(a).is_none());
        assert!(pool.value(b).is_none());
    }

    #[test]
    fn out_of_range_variable_is_reported() {
        let mut other = VarPool::new();
        let stray = other.fresh("stray");
        let _ = other.fresh("more");
        let pool = VarPool::new();
        assert!(matches!(
            pool.check(stray),
            Err(SolveError::UnknownVariable { index: 0, size: 0 })
        ));
    }
}
