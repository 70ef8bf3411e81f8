//! Lowering of the predicate combinator.

use anyhow::Result;
use treelogic_ir::{Relation, TypeId, Value, VarId};

use crate::context::CompilerContext;
use crate::lower::reject;
use crate::operand::{resolve_operand, CollectionItems, Operand, TypedValue};
use crate::passes::type_checking::check_predicate_property;

/// Lower `Predicate(property, *args)`.
///
/// Arguments are partitioned into variable arguments (a mandatory,
/// contiguous prefix of logic variables) and closure arguments (everything
/// after). Each position is checked against the property's receiver and
/// parameter types; the specialized caller is fetched from the registry,
/// keyed by the property uid and the closure argument types.
pub(crate) fn lower_predicate(
    ctx: &mut CompilerContext,
    property: &str,
    pred_uid: &str,
    args: &[Operand],
) -> Result<Relation> {
    let sig = match ctx.signatures().get(pred_uid) {
        Some(sig) => sig.clone(),
        None => {
            return Err(reject(
                ctx,
                property,
                format!("Unknown property '{}' passed to predicate", pred_uid),
            ))
        }
    };
    check_predicate_property(ctx.types(), &sig).map_err(|msg| reject(ctx, property, msg))?;

    let mut resolved = Vec::with_capacity(args.len());
    for arg in args {
        resolved.push(resolve_operand(ctx, arg).map_err(|msg| reject(ctx, property, msg))?);
    }

    // Receiver plus explicit parameters, in calling order.
    let expected = 1 + sig.arity();
    if resolved.len() != expected {
        return Err(reject(
            ctx,
            property,
            format!(
                "Predicate on '{}' expects {} arguments, got {}",
                sig.name,
                expected,
                resolved.len()
            ),
        ));
    }

    let (vars, closure_values, closure_types) =
        partition_arguments(ctx, property, &sig.name, &resolved)?;

    let root = ctx
        .types()
        .root_node()
        .map_err(|e| reject(ctx, property, e.to_string()))?;
    let prop_types: Vec<TypeId> = std::iter::once(sig.owner)
        .chain(sig.params.iter().copied())
        .collect();

    for (i, (arg, param_ty)) in resolved.iter().zip(prop_types.iter()).enumerate() {
        match arg {
            TypedValue::LogicVar(_) => {
                if !ctx.types().matches(*param_ty, root) {
                    let image = type_name(ctx, *param_ty);
                    let root_image = type_name(ctx, root);
                    return Err(reject(
                        ctx,
                        property,
                        format!(
                            "Argument #{} of predicate is a logic variable, the corresponding \
                             property formal has type {}, but should be a descendent of {}",
                            i, image, root_image
                        ),
                    ));
                }
            }
            other => {
                let arg_ty = other.value_type();
                let assignable =
                    arg_ty.is_some_and(|ty| ctx.types().matches(ty, *param_ty));
                if !assignable {
                    let got = other.type_image(ctx);
                    let want = type_name(ctx, *param_ty);
                    return Err(reject(
                        ctx,
                        property,
                        format!(
                            "Argument #{} of predicate has type {}, should be {}",
                            i, got, want
                        ),
                    ));
                }
            }
        }
    }

    let debug_image = format!("{}.{}", sig.name, type_name(ctx, sig.owner));
    let pred = ctx.predicate_for(&sig, closure_types, &debug_image)?;
    Ok(Relation::Predicate {
        pred,
        vars,
        closure: closure_values,
        env: ctx.environment(),
    })
}

/// Split arguments into the variable prefix and the closure suffix,
/// rejecting interleavings and empty variable prefixes.
fn partition_arguments(
    ctx: &mut CompilerContext,
    property: &str,
    pred_name: &str,
    resolved: &[TypedValue],
) -> Result<(Vec<VarId>, Vec<Value>, Vec<TypeId>)> {
    let mut vars = Vec::new();
    let mut closure_values = Vec::new();
    let mut closure_types = Vec::new();

    for arg in resolved {
        match arg {
            TypedValue::LogicVar(var) => {
                if !closure_values.is_empty() {
                    return Err(reject(
                        ctx,
                        property,
                        "Logic variable expressions should be grouped at the beginning, and \
                         should not appear after non logic variable expressions"
                            .to_string(),
                    ));
                }
                vars.push(*var);
            }
            other => {
                let Some(ty) = other.value_type() else {
                    return Err(reject(
                        ctx,
                        property,
                        format!("Untypable closure argument in predicate on '{}'", pred_name),
                    ));
                };
                closure_types.push(ty);
                closure_values.push(closure_value(other));
            }
        }
    }

    if vars.is_empty() {
        return Err(reject(
            ctx,
            property,
            "Predicate instantiation should have at least one logic variable expression"
                .to_string(),
        ));
    }

    Ok((vars, closure_values, closure_types))
}

fn closure_value(arg: &TypedValue) -> Value {
    match arg {
        TypedValue::Node(node) => Value::Node(*node),
        TypedValue::Candidate(candidate) => Value::Node(candidate.node),
        TypedValue::Scalar { value, .. } => value.clone(),
        TypedValue::Collection { items, .. } => match items {
            CollectionItems::Nodes(nodes) => {
                Value::List(nodes.iter().copied().map(Value::Node).collect())
            }
            CollectionItems::Candidates(candidates) => {
                Value::List(candidates.iter().map(|c| Value::Node(c.node)).collect())
            }
        },
        // Partitioning never forwards a logic variable here.
        TypedValue::LogicVar(_) => Value::Bool(false),
    }
}

fn type_name(ctx: &CompilerContext, ty: TypeId) -> String {
    ctx.types()
        .name(ty)
        .map(str::to_string)
        .unwrap_or_else(|_| format!("<type #{}>", ty.raw()))
}
