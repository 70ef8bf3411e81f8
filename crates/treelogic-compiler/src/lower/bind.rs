//! Lowering of the bind combinator.

use anyhow::Result;
use treelogic_ir::{BindOperand, Candidate, PropertySignature, Relation};

use crate::context::CompilerContext;
use crate::lower::reject;
use crate::operand::{resolve_operand, Operand, TypedValue};
use crate::passes::type_checking::{check_converter, check_equality};

/// Lower `Bind(from, to, converter?, equality?)`.
///
/// The generation key for the (converter, equality) pair was already
/// requested by the preparation pass; this step performs the type checks
/// that had to wait for resolved signatures, then fetches the memoized
/// bind implementation and supplies the operand values.
pub(crate) fn lower_bind(
    ctx: &mut CompilerContext,
    property: &str,
    from: &Operand,
    to: &Operand,
    converter: Option<&str>,
    equality: Option<&str>,
) -> Result<Relation> {
    let conv_sig = signature_for(ctx, property, converter, "converter")?;
    if let Some(sig) = &conv_sig {
        check_converter(ctx.types(), sig).map_err(|msg| reject(ctx, property, msg))?;
    }

    let eq_sig = signature_for(ctx, property, equality, "equality")?;
    if let Some(sig) = &eq_sig {
        check_equality(ctx.types(), sig).map_err(|msg| reject(ctx, property, msg))?;
    }

    let lhs = bind_operand(ctx, property, from)?;
    let rhs = bind_operand(ctx, property, to)?;

    let binder = ctx.binder_for(conv_sig.as_ref(), eq_sig.as_ref())?;
    Ok(Relation::Bind {
        from: lhs,
        to: rhs,
        binder,
        env: ctx.environment(),
    })
}

fn signature_for(
    ctx: &mut CompilerContext,
    property: &str,
    uid: Option<&str>,
    role: &str,
) -> Result<Option<PropertySignature>> {
    let Some(uid) = uid else {
        return Ok(None);
    };
    match ctx.signatures().get(uid) {
        Some(sig) => Ok(Some(sig.clone())),
        None => Err(reject(
            ctx,
            property,
            format!("Unknown {} property '{}' passed to bind", role, uid),
        )),
    }
}

/// An operand of a bind must be a logic variable or a node-compatible
/// value; bare nodes are implicitly wrapped into candidates.
fn bind_operand(
    ctx: &mut CompilerContext,
    property: &str,
    operand: &Operand,
) -> Result<BindOperand> {
    let resolved = resolve_operand(ctx, operand).map_err(|msg| reject(ctx, property, msg))?;
    match resolved {
        TypedValue::LogicVar(var) => Ok(BindOperand::Var(var)),
        TypedValue::Candidate(candidate) => Ok(BindOperand::Value(candidate)),
        TypedValue::Node(node) => {
            let root = ctx
                .types()
                .root_node()
                .map_err(|e| reject(ctx, property, e.to_string()))?;
            if !ctx.types().matches(node.ty, root) {
                let image = resolved.type_image(ctx);
                return Err(reject(
                    ctx,
                    property,
                    format!(
                        "Operands to a logic bind operator should be either a logic variable or a node, got {}",
                        image
                    ),
                ));
            }
            Ok(BindOperand::Value(Candidate::from(node)))
        }
        other => {
            let image = other.type_image(ctx);
            Err(reject(
                ctx,
                property,
                format!(
                    "Operands to a logic bind operator should be either a logic variable or a node, got {}",
                    image
                ),
            ))
        }
    }
}
