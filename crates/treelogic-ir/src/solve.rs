//! Backtracking search over a relation tree.
//!
//! [`solve`] performs a depth-first search over every logic variable
//! reachable from the equation. Conjunctions are explored left to right
//! under one shared partial assignment; domain leaves are the choice
//! points, tried in domain order. The first complete solution is committed
//! and no alternatives are explored afterwards; on failure every binding
//! made during the search is rolled back, so an unsatisfiable solve leaves
//! no observable state behind.
//!
//! The search is continuation-based: each relation is satisfied against the
//! list of goals remaining to its right, so a failure deep in the remainder
//! backtracks into the nearest enclosing choice point, exactly one
//! candidate at a time.

use crate::error::SolveError;
use crate::node::Candidate;
use crate::relation::{BindOperand, Equation, Relation};
use crate::variable::{VarId, VarPool};

/// Solve `equation` against the variables of `pool`.
///
/// Returns `Ok(true)` and leaves the winning bindings in place when a
/// solution exists; returns `Ok(false)` with every touched variable back to
/// unbound when none does. Unsatisfiability is a normal negative result,
/// never an error; `Err` only reports structural invariant violations that
/// a correct lowering pass can never produce.
pub fn solve(pool: &mut VarPool, equation: &Equation) -> Result<bool, SolveError> {
    equation.relation().validate(pool)?;
    let mut search = Search {
        pool,
        trail: Vec::new(),
    };
    let satisfied = search.satisfy(&[equation.relation()]);
    if !satisfied {
        search.unwind(0);
    }
    Ok(satisfied)
}

struct Search<'a> {
    pool: &'a mut VarPool,
    /// Variables bound since the start of the search, in binding order.
    trail: Vec<VarId>,
}

impl Search<'_> {
    /// Satisfy every goal in `goals`, left to right, under the current
    /// partial assignment.
    fn satisfy(&mut self, goals: &[&Relation]) -> bool {
        let Some((first, rest)) = goals.split_first() else {
            return true;
        };
        match first {
            Relation::True => self.satisfy(rest),
            Relation::False => false,

            Relation::All(children) => {
                let mut sub: Vec<&Relation> = children.iter().collect();
                sub.extend_from_slice(rest);
                self.satisfy(&sub)
            }

            Relation::Any(children) => {
                for child in children {
                    let mark = self.trail.len();
                    let mut sub: Vec<&Relation> = vec![child];
                    sub.extend_from_slice(rest);
                    if self.satisfy(&sub) {
                        return true;
                    }
                    self.unwind(mark);
                }
                false
            }

            Relation::Domain { var, domain } => {
                // A variable constrained earlier on the current path keeps
                // its value; the domain then acts as a membership test.
                if let Some(current) = self.pool.value(*var) {
                    return domain.contains(current) && self.satisfy(rest);
                }
                for candidate in domain.iter() {
                    let mark = self.trail.len();
                    let candidate = candidate.clone();
                    self.bind(*var, candidate);
                    if self.satisfy(rest) {
                        return true;
                    }
                    self.unwind(mark);
                }
                false
            }

            Relation::Bind {
                from,
                to,
                binder,
                env,
            } => {
                // The source must be bound by the time the walk reaches the
                // relation; an unbound source means its effective domain was
                // empty on this path.
                let Some(source) = self.operand_value(from) else {
                    return false;
                };
                let derived = binder.derive(*env, &source);
                match to {
                    BindOperand::Value(target) => {
                        binder.admits(*env, target, &derived) && self.satisfy(rest)
                    }
                    BindOperand::Var(var) => {
                        if let Some(target) = self.pool.value(*var) {
                            let target = target.clone();
                            return binder.admits(*env, &target, &derived) && self.satisfy(rest);
                        }
                        let mark = self.trail.len();
                        self.bind(*var, derived);
                        if self.satisfy(rest) {
                            true
                        } else {
                            self.unwind(mark);
                            false
                        }
                    }
                }
            }

            Relation::Predicate {
                pred,
                vars,
                closure,
                env,
            } => {
                let mut values = Vec::with_capacity(vars.len());
                for var in vars {
                    match self.pool.value(*var) {
                        Some(candidate) => values.push(candidate.clone()),
                        None => return false,
                    }
                }
                let Some((receiver, others)) = values.split_first() else {
                    return false;
                };
                pred.test(receiver, others, closure, *env) && self.satisfy(rest)
            }
        }
    }

    fn operand_value(&self, operand: &BindOperand) -> Option<Candidate> {
        match operand {
            BindOperand::Var(var) => self.pool.value(*var).cloned(),
            BindOperand::Value(candidate) => Some(candidate.clone()),
        }
    }

    fn bind(&mut self, var: VarId, value: Candidate) {
        self.pool.bind(var, value);
        self.trail.push(var);
    }

    /// Undo every binding made since `mark`.
    fn unwind(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some(var) = self.trail.pop() {
                self.pool.unbind(var);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;
    use crate::node::NodeRef;
    use crate::types::TypeId;

    fn node(id: i64) -> NodeRef {
        NodeRef::new(id, TypeId::from_raw(3))
    }

    #[test]
    fn true_relation_is_satisfiable_and_binds_nothing() {
        let mut pool = VarPool::new();
        let a = pool.fresh("A");
        let eq = Equation::new(Relation::True);
        assert_eq!(solve(&mut pool, &eq), Ok(true));
        assert!(pool.value(a).is_none());
    }

    #[test]
    fn false_relation_is_unsatisfiable() {
        let mut pool = VarPool::new();
        let eq = Equation::new(Relation::False);
        assert_eq!(solve(&mut pool, &eq), Ok(false));
    }

    #[test]
    fn variable_without_domain_fails_at_runtime_only() {
        let mut pool = VarPool::new();
        let a = pool.fresh("A");
        // Predicate over an unbound variable: empty effective domain.
        let eq = Equation::new(Relation::All(vec![Relation::Predicate {
            pred: std::rc::Rc::new(crate::functions::PredicateImpl::new(
                std::rc::Rc::new(
                    |_: &crate::node::Candidate,
                     _: &[crate::node::Candidate],
                     _: &[crate::node::Value],
                     _: crate::node::EnvRef| true,
                ),
                "always_true.Node",
            )),
            vars: vec![a],
            closure: vec![],
            env: crate::node::EnvRef::default(),
        }]));
        assert_eq!(solve(&mut pool, &eq), Ok(false));
        assert!(pool.value(a).is_none());
    }

    #[test]
    fn foreign_variable_is_an_invariant_violation() {
        let mut other = VarPool::new();
        let stray = other.fresh("stray");
        let mut pool = VarPool::new();
        let eq = Equation::new(Relation::Domain {
            var: stray,
            domain: Domain::from_nodes([node(1)]),
        });
        assert!(matches!(
            solve(&mut pool, &eq),
            Err(SolveError::UnknownVariable { .. })
        ));
    }
}
