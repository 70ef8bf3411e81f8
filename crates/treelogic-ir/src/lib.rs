//! # TreeLogic IR
//!
//! Relation model and backtracking solver for the treelogic constraint
//! engine.
//!
//! This crate is the runtime half of the engine: the data model for logic
//! variables, candidates, domains and relation trees, plus the search
//! procedure that finds a consistent variable assignment or proves none
//! exists. The static half (lowering property bodies into relation trees,
//! type checking, generation-key memoization) lives in
//! `treelogic-compiler`.
//!
//! ## Overview
//!
//! A semantic equation attaches logic variables to syntax-tree nodes and
//! relates them through a small set of combinators:
//!
//! - **Domain**: restrict a variable to an ordered, finite candidate set
//! - **Bind**: relate two variables through optional conversion and
//!   equality properties
//! - **Predicate**: require a boolean property to hold over bound values
//! - **All** / **Any**: conjunction and ordered disjunction
//! - **True** / **False**: the trivial relations
//!
//! [`solve`] walks the committed tree depth-first, trying domain candidates
//! in order and backtracking on the first failing conjunct. The first
//! complete solution is committed into the [`VarPool`]; a failed solve
//! rolls every touched variable back to unbound. Only the first solution is
//! ever produced; exploring alternatives requires rebuilding the equation.
//!
//! ## Example
//!
//! ```rust
//! use treelogic_ir::{Domain, Equation, NodeRef, Relation, TypeTable, VarPool, solve};
//!
//! let mut types = TypeTable::new();
//! let root = types.add_root_node("Node").unwrap();
//!
//! let mut pool = VarPool::new();
//! let a = pool.fresh("A");
//!
//! let eq = Equation::new(Relation::Domain {
//!     var: a,
//!     domain: Domain::from_nodes([NodeRef::new(1, root), NodeRef::new(2, root)]),
//! });
//!
//! assert_eq!(solve(&mut pool, &eq), Ok(true));
//! assert_eq!(pool.value(a).unwrap().node.id, 1);
//! ```
//!
//! ## Architecture
//!
//! The crate is organized into focused modules:
//! - **node**: node references, candidates, metadata and runtime values
//! - **types**: the node/scalar type table with subtype matching
//! - **signature**: property signatures and their registry
//! - **variable**: logic variables and the pool owning their bindings
//! - **domain**: ordered candidate domains
//! - **functions**: the specialized converter/equality/predicate handles
//! - **relation**: the relation variant tree and equations
//! - **solve**: the backtracking search
//! - **metadata**: source locations for diagnostics
//! - **error**: error types

pub mod domain;
pub mod error;
pub mod functions;
pub mod metadata;
pub mod node;
pub mod relation;
pub mod signature;
pub mod solve;
pub mod types;
pub mod variable;

pub use domain::Domain;
pub use error::{SolveError, TypeError};
pub use functions::{
    Binder, ConverterFn, ConverterHandle, EqualityFn, EqualityHandle, PredicateFn,
    PredicateHandle, PredicateImpl,
};
pub use metadata::{SourceLocation, SourceSpan};
pub use node::{Candidate, EnvRef, NodeMetadata, NodeRef, Value};
pub use relation::{BindOperand, Equation, Relation};
pub use signature::{PropertySignature, SignatureRegistry};
pub use solve::solve;
pub use types::{TypeId, TypeTable};
pub use variable::{VarId, VarPool};
