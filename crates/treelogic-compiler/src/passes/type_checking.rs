//! Signature checks shared by the lowering modules.
//!
//! These run during pass 2, once every referenced property signature is
//! known. Each failed check is a static type error: the caller reports it
//! and aborts construction of the offending relation only.

use treelogic_ir::{PropertySignature, TypeTable};

/// A converter must belong to, and return, a subtype of the root node
/// type.
pub fn check_converter(types: &TypeTable, sig: &PropertySignature) -> Result<(), String> {
    let root = types.root_node().map_err(|e| e.to_string())?;
    let root_name = types.name(root).map_err(|e| e.to_string())?;
    if !types.matches(sig.returns, root) {
        return Err(format!(
            "The property passed to bind must return a subtype of {}",
            root_name
        ));
    }
    if !types.matches(sig.owner, root) {
        return Err(format!(
            "The property passed to bind must belong to a subtype of {}",
            root_name
        ));
    }
    Ok(())
}

/// An equality property must return boolean, belong to a subtype of the
/// root node type, and take exactly one explicit parameter of its
/// receiver's type.
pub fn check_equality(types: &TypeTable, sig: &PropertySignature) -> Result<(), String> {
    let root = types.root_node().map_err(|e| e.to_string())?;
    if sig.returns != types.bool_type() {
        return Err("Equality property must return boolean".to_string());
    }
    if !types.matches(sig.owner, root) {
        let root_name = types.name(root).map_err(|e| e.to_string())?;
        return Err(format!(
            "The equality property passed to bind must belong to a subtype of {}",
            root_name
        ));
    }
    if sig.arity() != 1 {
        return Err(format!(
            "Expected 1 argument for the equality property, got {}",
            sig.arity()
        ));
    }
    if sig.params[0] != sig.owner {
        return Err("Self and first argument should be of the same type".to_string());
    }
    Ok(())
}

/// A predicate property must return boolean and be defined on (or
/// inherited into) the node hierarchy.
pub fn check_predicate_property(types: &TypeTable, sig: &PropertySignature) -> Result<(), String> {
    let root = types.root_node().map_err(|e| e.to_string())?;
    if sig.returns != types.bool_type() {
        return Err(format!(
            "The property passed to predicate must return a boolean, got {}",
            types
                .name(sig.returns)
                .map(str::to_string)
                .unwrap_or_else(|_| "<unknown>".to_string())
        ));
    }
    if !types.matches(sig.owner, root) {
        let root_name = types.name(root).map_err(|e| e.to_string())?;
        return Err(format!(
            "The property passed to predicate must belong to a subtype of {}",
            root_name
        ));
    }
    Ok(())
}
