//! Node and scalar types with subtype matching.
//!
//! This is the engine's view of the surrounding tree-node type system: a
//! table of caller-registered types supporting the subtype queries the
//! lowering pass needs. Node types form a single-inheritance hierarchy under
//! one root; collection types are derived on demand and memoized by the
//! structural identity of their element type, so requesting `list of T`
//! twice yields the same [`TypeId`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identifier of a type registered in a [`TypeTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(u32);

impl TypeId {
    /// Build a `TypeId` from its raw index. Only meaningful together with
    /// the table that produced it; mainly useful in tests.
    pub fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum TypeKind {
    Scalar,
    Node { parent: Option<TypeId> },
    Collection { element: TypeId },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct TypeDecl {
    name: String,
    kind: TypeKind,
}

/// Registry of every type the engine can talk about.
///
/// A fresh table starts with the builtin scalars (`Bool`, `Int`, `String`);
/// node types are added by the caller in declaration order, starting with
/// the root node type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeTable {
    types: Vec<TypeDecl>,
    root: Option<TypeId>,
    bool_ty: TypeId,
    int_ty: TypeId,
    string_ty: TypeId,
    /// Structural cache: element type to its derived collection type.
    collections: HashMap<TypeId, TypeId>,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTable {
    pub fn new() -> Self {
        let mut table = TypeTable {
            types: Vec::new(),
            root: None,
            bool_ty: TypeId(0),
            int_ty: TypeId(0),
            string_ty: TypeId(0),
            collections: HashMap::new(),
        };
        table.bool_ty = table.push("Bool", TypeKind::Scalar);
        table.int_ty = table.push("Int", TypeKind::Scalar);
        table.string_ty = table.push("String", TypeKind::Scalar);
        table
    }

    fn push(&mut self, name: impl Into<String>, kind: TypeKind) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeDecl {
            name: name.into(),
            kind,
        });
        id
    }

    /// Register the root node type. There can be only one per table.
    pub fn add_root_node(&mut self, name: impl Into<String>) -> Result<TypeId, TypeError> {
        if self.root.is_some() {
            return Err(TypeError::RootAlreadyDefined);
        }
        let id = self.push(name, TypeKind::Node { parent: None });
        self.root = Some(id);
        Ok(id)
    }

    /// Register a node type deriving from `parent`.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        parent: TypeId,
    ) -> Result<TypeId, TypeError> {
        let decl = self.decl(parent)?;
        if !matches!(decl.kind, TypeKind::Node { .. }) {
            return Err(TypeError::NotANodeType {
                name: decl.name.clone(),
            });
        }
        Ok(self.push(
            name,
            TypeKind::Node {
                parent: Some(parent),
            },
        ))
    }

    /// Derive (or retrieve) the collection type over `element`.
    ///
    /// The result is memoized by the element's structural identity, so every
    /// call site asking for the same element type shares one derived type.
    pub fn collection_of(&mut self, element: TypeId) -> Result<TypeId, TypeError> {
        self.decl(element)?;
        if let Some(&id) = self.collections.get(&element) {
            return Ok(id);
        }
        let name = format!("[{}]", self.name(element)?);
        let id = self.push(name, TypeKind::Collection { element });
        self.collections.insert(element, id);
        Ok(id)
    }

    fn decl(&self, id: TypeId) -> Result<&TypeDecl, TypeError> {
        self.types
            .get(id.0 as usize)
            .ok_or(TypeError::UnknownType { id: id.0 })
    }

    pub fn name(&self, id: TypeId) -> Result<&str, TypeError> {
        Ok(&self.decl(id)?.name)
    }

    /// The root node type, if one has been registered.
    pub fn root_node(&self) -> Result<TypeId, TypeError> {
        self.root.ok_or(TypeError::NoRootNode)
    }

    pub fn bool_type(&self) -> TypeId {
        self.bool_ty
    }

    pub fn int_type(&self) -> TypeId {
        self.int_ty
    }

    pub fn string_type(&self) -> TypeId {
        self.string_ty
    }

    pub fn is_node(&self, id: TypeId) -> bool {
        matches!(
            self.types.get(id.0 as usize).map(|d| &d.kind),
            Some(TypeKind::Node { .. })
        )
    }

    pub fn is_collection(&self, id: TypeId) -> bool {
        matches!(
            self.types.get(id.0 as usize).map(|d| &d.kind),
            Some(TypeKind::Collection { .. })
        )
    }

    /// Element type of a collection type, `None` for anything else.
    pub fn element_type(&self, id: TypeId) -> Option<TypeId> {
        match self.types.get(id.0 as usize).map(|d| &d.kind) {
            Some(TypeKind::Collection { element }) => Some(*element),
            _ => None,
        }
    }

    /// Reflexive-transitive subtype test: does a value of type `sub` fit
    /// where `sup` is expected?
    ///
    /// Scalars and collections only match themselves (collections are
    /// memoized, so structural equality collapses to id equality); node
    /// types match any ancestor in their inheritance chain.
    pub fn matches(&self, sub: TypeId, sup: TypeId) -> bool {
        if sub == sup {
            return true;
        }
        let mut current = sub;
        loop {
            match self.types.get(current.0 as usize).map(|d| &d.kind) {
                Some(TypeKind::Node {
                    parent: Some(parent),
                }) => {
                    if *parent == sup {
                        return true;
                    }
                    current = *parent;
                }
                _ => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_hierarchy() -> (TypeTable, TypeId, TypeId, TypeId) {
        let mut table = TypeTable::new();
        let root = table.add_root_node("Node").unwrap();
        let expr = table.add_node("Expr", root).unwrap();
        let call = table.add_node("CallExpr", expr).unwrap();
        (table, root, expr, call)
    }

    #[test]
    fn subtype_chain_matches_transitively() {
        let (table, root, expr, call) = node_hierarchy();
        assert!(table.matches(call, expr));
        assert!(table.matches(call, root));
        assert!(table.matches(expr, root));
        assert!(!table.matches(root, call));
        assert!(!table.matches(table.bool_type(), root));
    }

    #[test]
    fn single_root_enforced() {
        let (mut table, _, _, _) = node_hierarchy();
        assert!(matches!(
            table.add_root_node("Other"),
            Err(TypeError::RootAlreadyDefined)
        ));
    }

    #[test]
    fn collection_types_are_memoized_structurally() {
        let (mut table, root, expr, _) = node_hierarchy();
        let list_a = table.collection_of(expr).unwrap();
        let list_b = table.collection_of(expr).unwrap();
        assert_eq!(list_a, list_b);
        assert_ne!(list_a, table.collection_of(root).unwrap());
        assert!(table.is_collection(list_a));
        assert_eq!(table.element_type(list_a), Some(expr));
    }

    #[test]
    fn collections_do_not_inherit() {
        let (mut table, root, expr, _) = node_hierarchy();
        let list_expr = table.collection_of(expr).unwrap();
        let list_root = table.collection_of(root).unwrap();
        assert!(!table.matches(list_expr, list_root));
    }
}
