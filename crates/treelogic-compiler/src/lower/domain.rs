//! Lowering of the domain combinator.

use anyhow::Result;
use treelogic_ir::{Domain, Relation};

use crate::context::CompilerContext;
use crate::lower::reject;
use crate::operand::{resolve_operand, CollectionItems, Operand, TypedValue};

/// Lower `Domain(var, domain)`.
///
/// The domain operand must resolve to a finite collection whose elements
/// are node-compatible or already candidate-shaped; bare node elements are
/// wrapped into candidates. An empty collection is accepted: domain
/// emptiness is a runtime outcome, not a construction-time error.
pub(crate) fn lower_domain(
    ctx: &mut CompilerContext,
    property: &str,
    var: &Operand,
    domain: &Operand,
) -> Result<Relation> {
    let var = match resolve_operand(ctx, var).map_err(|msg| reject(ctx, property, msg))? {
        TypedValue::LogicVar(var) => var,
        other => {
            let image = other.type_image(ctx);
            return Err(reject(
                ctx,
                property,
                format!("Expected a logic variable as domain subject, got {}", image),
            ));
        }
    };

    let resolved = resolve_operand(ctx, domain).map_err(|msg| reject(ctx, property, msg))?;
    let (element, items) = match resolved {
        TypedValue::Collection { element, items, .. } => (element, items),
        other => {
            let image = other.type_image(ctx);
            return Err(reject(
                ctx,
                property,
                format!(
                    "Type given to domain must be a collection type, got {}",
                    image
                ),
            ));
        }
    };

    let domain = match items {
        CollectionItems::Candidates(candidates) => Domain::new(candidates),
        CollectionItems::Nodes(nodes) => {
            let root = ctx
                .types()
                .root_node()
                .map_err(|e| reject(ctx, property, e.to_string()))?;
            if !ctx.types().matches(element, root) {
                let image = type_name(ctx, element);
                return Err(reject(
                    ctx,
                    property,
                    format!(
                        "Domain elements must derive from the root node type, got {}",
                        image
                    ),
                ));
            }
            Domain::from_nodes(nodes)
        }
    };

    Ok(Relation::Domain { var, domain })
}

fn type_name(ctx: &CompilerContext, ty: treelogic_ir::TypeId) -> String {
    ctx.types()
        .name(ty)
        .map(str::to_string)
        .unwrap_or_else(|_| format!("<type #{}>", ty.raw()))
}
