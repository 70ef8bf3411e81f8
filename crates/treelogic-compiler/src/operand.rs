//! Operand expressions and their typed resolution.
//!
//! This is the engine's slice of the typed-expression construction
//! context: each [`Operand`] appearing in a combinator call resolves to a
//! [`TypedValue`], on which the static checks run. Collection operands
//! carry an explicit, caller-supplied element type; resolving one derives
//! the memoized collection type from the table.

use treelogic_ir::{Candidate, NodeRef, TypeId, Value, VarId};

use crate::context::CompilerContext;

/// An operand of a combinator call, as written in a property body.
#[derive(Clone, Debug)]
pub enum Operand {
    /// Reference to a logic variable of the current evaluation.
    Var(VarId),
    /// A bare node value.
    Node(NodeRef),
    /// An already candidate-shaped value.
    Candidate(Candidate),
    /// A collection of bare nodes with its declared element type.
    NodeList { element: TypeId, nodes: Vec<NodeRef> },
    /// A collection of candidate-shaped values.
    CandidateList { candidates: Vec<Candidate> },
    /// A scalar value with its type.
    Scalar { value: Value, ty: TypeId },
}

impl From<VarId> for Operand {
    fn from(var: VarId) -> Self {
        Operand::Var(var)
    }
}

impl From<NodeRef> for Operand {
    fn from(node: NodeRef) -> Self {
        Operand::Node(node)
    }
}

impl From<Candidate> for Operand {
    fn from(candidate: Candidate) -> Self {
        Operand::Candidate(candidate)
    }
}

/// Elements of a resolved collection operand.
#[derive(Clone, Debug)]
pub enum CollectionItems {
    Nodes(Vec<NodeRef>),
    Candidates(Vec<Candidate>),
}

/// A typed value, as the static checks see it.
#[derive(Clone, Debug)]
pub enum TypedValue {
    LogicVar(VarId),
    Node(NodeRef),
    Candidate(Candidate),
    Collection {
        ty: TypeId,
        element: TypeId,
        items: CollectionItems,
    },
    Scalar {
        value: Value,
        ty: TypeId,
    },
}

impl TypedValue {
    /// The value's type, for assignability checks and messages. Logic
    /// variables have no value type; candidates are typed by their node.
    pub fn value_type(&self) -> Option<TypeId> {
        match self {
            TypedValue::LogicVar(_) => None,
            TypedValue::Node(node) => Some(node.ty),
            TypedValue::Candidate(candidate) => Some(candidate.node.ty),
            TypedValue::Collection { ty, .. } => Some(*ty),
            TypedValue::Scalar { ty, .. } => Some(*ty),
        }
    }

    /// Human-readable type image for diagnostics.
    pub fn type_image(&self, ctx: &CompilerContext) -> String {
        match self {
            TypedValue::LogicVar(_) => "LogicVar".to_string(),
            _ => match self.value_type() {
                Some(ty) => ctx
                    .types()
                    .name(ty)
                    .map(str::to_string)
                    .unwrap_or_else(|_| format!("<type #{}>", ty.raw())),
                None => "<untyped>".to_string(),
            },
        }
    }
}

/// Resolve an operand to its typed value.
///
/// Needs the context mutably because resolving a collection operand derives
/// (and memoizes) its collection type.
pub fn resolve_operand(ctx: &mut CompilerContext, operand: &Operand) -> Result<TypedValue, String> {
    match operand {
        Operand::Var(var) => Ok(TypedValue::LogicVar(*var)),
        Operand::Node(node) => Ok(TypedValue::Node(*node)),
        Operand::Candidate(candidate) => Ok(TypedValue::Candidate(candidate.clone())),
        Operand::NodeList { element, nodes } => {
            let ty = ctx
                .types_mut()
                .collection_of(*element)
                .map_err(|e| e.to_string())?;
            Ok(TypedValue::Collection {
                ty,
                element: *element,
                items: CollectionItems::Nodes(nodes.clone()),
            })
        }
        Operand::CandidateList { candidates } => {
            let element = ctx.types().root_node().map_err(|e| e.to_string())?;
            let ty = ctx
                .types_mut()
                .collection_of(element)
                .map_err(|e| e.to_string())?;
            Ok(TypedValue::Collection {
                ty,
                element,
                items: CollectionItems::Candidates(candidates.clone()),
            })
        }
        Operand::Scalar { value, ty } => Ok(TypedValue::Scalar {
            value: value.clone(),
            ty: *ty,
        }),
    }
}
