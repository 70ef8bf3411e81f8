//! Pass 1: generation-key collection.
//!
//! Bind keys only involve property uids, so they can be recorded before
//! any type information exists; this is what lets the backend start laying
//! out specialized bind implementations while signatures are still being
//! resolved. Predicate keys depend on closure argument types and are
//! registered during checked lowering instead.

use crate::ast::LogicExpr;
use crate::context::CompilerContext;
use crate::genkey::GenerationKey;

/// Walk every property body and record the bind generation keys needed
/// across the whole program.
pub fn collect_generation_keys(ctx: &mut CompilerContext, bodies: &[&LogicExpr]) {
    for body in bodies {
        visit(ctx, body);
    }
}

fn visit(ctx: &mut CompilerContext, expr: &LogicExpr) {
    match expr {
        LogicExpr::Bind {
            converter, equality, ..
        } => {
            ctx.request_key(GenerationKey::binder(
                converter.as_deref(),
                equality.as_deref(),
            ));
        }
        LogicExpr::Any(children) | LogicExpr::All(children) => {
            for child in children {
                visit(ctx, child);
            }
        }
        LogicExpr::Predicate { .. }
        | LogicExpr::Domain { .. }
        | LogicExpr::True
        | LogicExpr::False => {}
    }
}
