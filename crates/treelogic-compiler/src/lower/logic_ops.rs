//! Lowering of the conjunction and disjunction combinators.
//!
//! These are structural: each child is lowered in turn, and a failing
//! child aborts construction of the whole enclosing relation (it is one
//! relation tree). Sibling property bodies are unaffected; batch lowering
//! keeps going.

use anyhow::Result;
use treelogic_ir::Relation;

use crate::ast::LogicExpr;
use crate::context::CompilerContext;
use crate::lower::lower_expr;

/// Lower `Any(relations)`: ordered disjunction.
pub(crate) fn lower_any(
    ctx: &mut CompilerContext,
    property: &str,
    children: &[LogicExpr],
) -> Result<Relation> {
    Ok(Relation::Any(lower_children(ctx, property, children)?))
}

/// Lower `All(relations)`: conjunction.
pub(crate) fn lower_all(
    ctx: &mut CompilerContext,
    property: &str,
    children: &[LogicExpr],
) -> Result<Relation> {
    Ok(Relation::All(lower_children(ctx, property, children)?))
}

fn lower_children(
    ctx: &mut CompilerContext,
    property: &str,
    children: &[LogicExpr],
) -> Result<Vec<Relation>> {
    children
        .iter()
        .map(|child| lower_expr(ctx, property, child))
        .collect()
}
