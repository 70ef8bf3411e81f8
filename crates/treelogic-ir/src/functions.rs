//! Runtime function surface for specialized relation implementations.
//!
//! The code-emission backend produces one [`Binder`] per distinct
//! (converter, equality) pair and one [`PredicateImpl`] per distinct
//! (property, closure shape) pair. Relation construction sites only supply
//! fresh operand values; the handles themselves are shared.

use std::fmt;
use std::rc::Rc;

use crate::node::{Candidate, EnvRef, Value};

/// Conversion function applied to the source candidate of a bind relation.
pub trait ConverterFn {
    fn convert(&self, env: EnvRef, value: &Candidate) -> Candidate;
}

/// Equality test between the target candidate and the derived value of a
/// bind relation. When absent, structural candidate equality applies.
pub trait EqualityFn {
    fn equals(&self, env: EnvRef, lhs: &Candidate, rhs: &Candidate) -> bool;
}

/// Boolean property invoked by a predicate relation.
///
/// The calling convention mirrors the generated predicate callers: the
/// receiver is the first variable's bound candidate, `vars` are the
/// remaining variable candidates, `closure` the values captured at
/// construction, and `env` the ambient environment.
pub trait PredicateFn {
    fn test(&self, receiver: &Candidate, vars: &[Candidate], closure: &[Value], env: EnvRef)
        -> bool;
}

pub type ConverterHandle = Rc<dyn ConverterFn>;
pub type EqualityHandle = Rc<dyn EqualityFn>;
pub type PredicateHandle = Rc<dyn PredicateFn>;

impl<F> ConverterFn for F
where
    F: Fn(EnvRef, &Candidate) -> Candidate,
{
    fn convert(&self, env: EnvRef, value: &Candidate) -> Candidate {
        self(env, value)
    }
}

impl<F> EqualityFn for F
where
    F: Fn(EnvRef, &Candidate, &Candidate) -> bool,
{
    fn equals(&self, env: EnvRef, lhs: &Candidate, rhs: &Candidate) -> bool {
        self(env, lhs, rhs)
    }
}

impl<F> PredicateFn for F
where
    F: Fn(&Candidate, &[Candidate], &[Value], EnvRef) -> bool,
{
    fn test(
        &self,
        receiver: &Candidate,
        vars: &[Candidate],
        closure: &[Value],
        env: EnvRef,
    ) -> bool {
        self(receiver, vars, closure, env)
    }
}

/// Specialized bind implementation: an optional converter plus an optional
/// equality test. The default binder (both absent) propagates the source
/// candidate unchanged and compares structurally.
#[derive(Clone, Default)]
pub struct Binder {
    converter: Option<ConverterHandle>,
    equality: Option<EqualityHandle>,
}

impl Binder {
    pub fn new(converter: Option<ConverterHandle>, equality: Option<EqualityHandle>) -> Self {
        Binder {
            converter,
            equality,
        }
    }

    pub fn has_converter(&self) -> bool {
        self.converter.is_some()
    }

    pub fn has_equality(&self) -> bool {
        self.equality.is_some()
    }

    /// Value the target variable must admit, given the bound source value.
    pub fn derive(&self, env: EnvRef, source: &Candidate) -> Candidate {
        match &self.converter {
            Some(conv) => conv.convert(env, source),
            None => source.clone(),
        }
    }

    /// Does an independently constrained target value admit the derived one?
    pub fn admits(&self, env: EnvRef, target: &Candidate, derived: &Candidate) -> bool {
        match &self.equality {
            Some(eq) => eq.equals(env, target, derived),
            None => target == derived,
        }
    }
}

// Function handles have no useful debug form; show only their presence.
impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("converter", &self.converter.is_some())
            .field("equality", &self.equality.is_some())
            .finish()
    }
}

/// Specialized predicate implementation together with its debug image
/// (`Property.Owner`), used in trace output.
#[derive(Clone)]
pub struct PredicateImpl {
    func: PredicateHandle,
    debug_image: String,
}

impl PredicateImpl {
    pub fn new(func: PredicateHandle, debug_image: impl Into<String>) -> Self {
        PredicateImpl {
            func,
            debug_image: debug_image.into(),
        }
    }

    pub fn debug_image(&self) -> &str {
        &self.debug_image
    }

    pub fn test(
        &self,
        receiver: &Candidate,
        vars: &[Candidate],
        closure: &[Value],
        env: EnvRef,
    ) -> bool {
        self.func.test(receiver, vars, closure, env)
    }
}

impl fmt::Debug for PredicateImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateImpl")
            .field("debug_image", &self.debug_image)
            .finish()
    }
}
