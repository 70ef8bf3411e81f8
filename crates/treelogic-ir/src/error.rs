//! Error types for the relation model and solver.

use thiserror::Error;

/// Misuse of the type table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("Unknown type id {id}")]
    UnknownType { id: u32 },
    #[error("A root node type is already defined")]
    RootAlreadyDefined,
    #[error("No root node type has been registered")]
    NoRootNode,
    #[error("Type {name} is not a node type")]
    NotANodeType { name: String },
}

/// Internal invariant violation detected while solving.
///
/// These never arise from user input: a relation tree produced by the
/// checked lowering pass cannot trigger them. Unsatisfiability is *not* an
/// error; `solve` reports it as an ordinary `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("Logic variable #{index} is not part of the variable pool (size {size})")]
    UnknownVariable { index: u32, size: usize },
    #[error("Predicate relation for {property} has no variable arguments")]
    PredicateWithoutVariables { property: String },
}
