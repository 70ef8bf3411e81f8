//! # TreeLogic Compiler
//!
//! Lowering, static checking and generation-key memoization for the
//! treelogic constraint engine.
//!
//! This crate is the build-time half of the engine. A property body builds
//! a [`LogicExpr`] tree with the combinators (`Bind`, `Predicate`,
//! `Domain`, `Any`, `All`, `LogicTrue`, `LogicFalse`); this crate turns it
//! into a `treelogic_ir::Relation` tree, validating every referenced
//! signature on the way, and hands the code-emission backend exactly one
//! generation request per distinct (converter, equality) or (property,
//! closure shape) combination used anywhere in the program.
//!
//! # Compilation Pipeline
//!
//! Lowering is an explicit two-pass pipeline over one
//! [`CompilerContext`]:
//!
//! 1. **Preparation**: [`passes::collect_generation_keys`] records the
//!    bind generation keys across every property body, before signatures
//!    are resolvable.
//! 2. **Checked lowering**: [`lower_equation`] (or [`lower_batch`])
//!    type-checks each body against the now-complete signature registry
//!    and produces solvable equations. Static errors abort only the
//!    offending relation and accumulate as diagnostics on the context.
//!
//! [`CompilerContext::finalize`] ends the run and yields the emission
//! report: the distinct generation keys in first-use order plus the
//! collected diagnostics.
//!
//! # Quick Start
//!
//! ```rust
//! use treelogic_compiler::{lower_equation, CompilerContext, LogicExpr, Operand};
//! use treelogic_ir::{solve, NodeRef, SignatureRegistry, TypeTable, VarPool};
//!
//! # struct NullBackend;
//! # impl treelogic_compiler::EmissionBackend for NullBackend {
//! #     fn emit_binder(
//! #         &mut self,
//! #         _: &treelogic_compiler::GenerationKey,
//! #         _: Option<&treelogic_ir::PropertySignature>,
//! #         _: Option<&treelogic_ir::PropertySignature>,
//! #     ) -> anyhow::Result<treelogic_ir::Binder> {
//! #         Ok(treelogic_ir::Binder::default())
//! #     }
//! #     fn emit_predicate(
//! #         &mut self,
//! #         _: &treelogic_compiler::GenerationKey,
//! #         _: &treelogic_ir::PropertySignature,
//! #         _: &str,
//! #     ) -> anyhow::Result<treelogic_ir::PredicateImpl> {
//! #         unreachable!()
//! #     }
//! # }
//! let mut types = TypeTable::new();
//! let root = types.add_root_node("Node").unwrap();
//!
//! let mut ctx = CompilerContext::new(types, SignatureRegistry::new(), Box::new(NullBackend));
//! let mut pool = VarPool::new();
//! let var = pool.fresh("V");
//!
//! let body = LogicExpr::domain(
//!     var,
//!     Operand::NodeList {
//!         element: root,
//!         nodes: vec![NodeRef::new(1, root), NodeRef::new(2, root)],
//!     },
//! );
//!
//! let equation = lower_equation(&mut ctx, "resolve", &body).unwrap();
//! assert_eq!(solve(&mut pool, &equation), Ok(true));
//! assert_eq!(pool.value(var).unwrap().node.id, 1);
//! ```

pub mod ast;
pub mod context;
pub mod diagnostics;
pub mod genkey;
pub mod lower;
pub mod operand;
pub mod passes;

#[cfg(test)]
mod tests;

use anyhow::Result;
use treelogic_ir::Equation;

pub use ast::LogicExpr;
pub use context::{CompilationReport, CompilerContext};
pub use diagnostics::{Diagnostic, DiagnosticLevel, DiagnosticSink};
pub use genkey::{EmissionBackend, GenKeyRegistry, GenerationKey, DEFAULT_UID};
pub use operand::{Operand, TypedValue};

/// Lower one property body into a solvable equation.
///
/// `property` names the enclosing property for diagnostics. On a static
/// error the offending relation's construction is aborted, the diagnostic
/// stays on the context, and `Err` is returned for this body only.
pub fn lower_equation(
    ctx: &mut CompilerContext,
    property: &str,
    body: &LogicExpr,
) -> Result<Equation> {
    lower::lower_expr(ctx, property, body).map(Equation::new)
}

/// Lower a batch of property bodies, continuing past failures so one run
/// surfaces as many static errors as possible.
pub fn lower_batch<'a>(
    ctx: &mut CompilerContext,
    bodies: impl IntoIterator<Item = (&'a str, &'a LogicExpr)>,
) -> Vec<(String, Result<Equation>)> {
    bodies
        .into_iter()
        .map(|(property, body)| (property.to_string(), lower_equation(ctx, property, body)))
        .collect()
}
