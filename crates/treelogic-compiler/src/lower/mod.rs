//! Checked lowering from builder expressions to relation trees.

mod bind;
mod domain;
mod logic_ops;
mod predicate;

use anyhow::{anyhow, Result};
use treelogic_ir::Relation;

use crate::ast::LogicExpr;
use crate::context::CompilerContext;
use crate::diagnostics::Diagnostic;

pub(crate) use bind::lower_bind;
pub(crate) use domain::lower_domain;
pub(crate) use logic_ops::{lower_all, lower_any};
pub(crate) use predicate::lower_predicate;

/// Dispatch one builder expression to its lowering function.
pub(crate) fn lower_expr(
    ctx: &mut CompilerContext,
    property: &str,
    expr: &LogicExpr,
) -> Result<Relation> {
    match expr {
        LogicExpr::Bind {
            from,
            to,
            converter,
            equality,
        } => lower_bind(
            ctx,
            property,
            from,
            to,
            converter.as_deref(),
            equality.as_deref(),
        ),
        LogicExpr::Predicate {
            property: pred_property,
            args,
        } => lower_predicate(ctx, property, pred_property, args),
        LogicExpr::Domain { var, domain } => lower_domain(ctx, property, var, domain),
        LogicExpr::Any(children) => lower_any(ctx, property, children),
        LogicExpr::All(children) => lower_all(ctx, property, children),
        LogicExpr::True => Ok(Relation::True),
        LogicExpr::False => Ok(Relation::False),
    }
}

/// Report a static type error against the enclosing property and abort
/// construction of the offending relation.
pub(crate) fn reject(
    ctx: &mut CompilerContext,
    property: &str,
    message: String,
) -> anyhow::Error {
    ctx.report(
        Diagnostic::error(&message).with_related(format!("in property '{}'", property), None),
    );
    anyhow!(message)
}
