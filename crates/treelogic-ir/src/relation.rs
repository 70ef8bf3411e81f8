//! The relation variant tree.
//!
//! A [`Relation`] is one node of the constraint graph; a fully built tree
//! wrapped in an [`Equation`] is ready to solve. Relations are immutable
//! once built: re-solving with different structure requires rebuilding the
//! tree through the lowering pass.

use std::rc::Rc;

use crate::domain::Domain;
use crate::error::SolveError;
use crate::functions::{Binder, PredicateImpl};
use crate::node::{Candidate, EnvRef, Value};
use crate::variable::{VarId, VarPool};

/// Operand of a bind relation: a logic variable, or a value fixed at
/// construction time (a bare node implicitly wrapped into a candidate).
#[derive(Clone, Debug)]
pub enum BindOperand {
    Var(VarId),
    Value(Candidate),
}

impl From<VarId> for BindOperand {
    fn from(var: VarId) -> Self {
        BindOperand::Var(var)
    }
}

impl From<Candidate> for BindOperand {
    fn from(value: Candidate) -> Self {
        BindOperand::Value(value)
    }
}

/// One node of the constraint graph.
#[derive(Clone, Debug)]
pub enum Relation {
    /// Restrict `var` to the ordered candidates of `domain`.
    Domain { var: VarId, domain: Domain },
    /// Relate `from` to `to` through a specialized binder.
    Bind {
        from: BindOperand,
        to: BindOperand,
        binder: Rc<Binder>,
        env: EnvRef,
    },
    /// Require a boolean property to hold over the bound variables.
    Predicate {
        pred: Rc<PredicateImpl>,
        vars: Vec<VarId>,
        closure: Vec<Value>,
        env: EnvRef,
    },
    /// Satisfied iff every child is satisfied under one shared assignment.
    All(Vec<Relation>),
    /// Satisfied iff some child is; children are tried in listed order.
    Any(Vec<Relation>),
    /// Always satisfied, binds nothing.
    True,
    /// Never satisfied.
    False,
}

impl Relation {
    /// Check the structural invariants the lowering pass guarantees:
    /// every referenced variable belongs to `pool` and every predicate has
    /// at least one variable argument.
    pub fn validate(&self, pool: &VarPool) -> Result<(), SolveError> {
        match self {
            Relation::Domain { var, .. } => pool.check(*var),
            Relation::Bind { from, to, .. } => {
                for operand in [from, to] {
                    if let BindOperand::Var(var) = operand {
                        pool.check(*var)?;
                    }
                }
                Ok(())
            }
            Relation::Predicate { pred, vars, .. } => {
                if vars.is_empty() {
                    return Err(SolveError::PredicateWithoutVariables {
                        property: pred.debug_image().to_string(),
                    });
                }
                vars.iter().try_for_each(|var| pool.check(*var))
            }
            Relation::All(children) | Relation::Any(children) => {
                children.iter().try_for_each(|child| child.validate(pool))
            }
            Relation::True | Relation::False => Ok(()),
        }
    }
}

/// A fully built relation tree, ready to solve.
///
/// Building an equation does not touch any variable; solving it is the only
/// operation with observable binding effects.
#[derive(Clone, Debug)]
pub struct Equation {
    root: Relation,
}

impl Equation {
    pub fn new(root: Relation) -> Self {
        Equation { root }
    }

    pub fn relation(&self) -> &Relation {
        &self.root
    }
}

impl From<Relation> for Equation {
    fn from(root: Relation) -> Self {
        Equation::new(root)
    }
}
