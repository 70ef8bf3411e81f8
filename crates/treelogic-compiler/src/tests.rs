//! Unit tests for the lowering pass and the generation-key registry.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use treelogic_ir::{
    Binder, Candidate, EnvRef, PredicateImpl, PropertySignature, SignatureRegistry, TypeId,
    TypeTable, Value, VarPool,
};

use crate::genkey::{EmissionBackend, GenerationKey};
use crate::passes::collect_generation_keys;
use crate::{lower_batch, lower_equation, CompilerContext, LogicExpr, Operand};

#[derive(Clone, Default)]
struct EmissionCounts {
    binders: Rc<RefCell<usize>>,
    predicates: Rc<RefCell<usize>>,
}

struct CountingBackend {
    counts: EmissionCounts,
}

impl EmissionBackend for CountingBackend {
    fn emit_binder(
        &mut self,
        _key: &GenerationKey,
        _converter: Option<&PropertySignature>,
        _equality: Option<&PropertySignature>,
    ) -> Result<Binder> {
        *self.counts.binders.borrow_mut() += 1;
        Ok(Binder::default())
    }

    fn emit_predicate(
        &mut self,
        _key: &GenerationKey,
        _property: &PropertySignature,
        debug_image: &str,
    ) -> Result<PredicateImpl> {
        *self.counts.predicates.borrow_mut() += 1;
        Ok(PredicateImpl::new(
            Rc::new(|_: &Candidate, _: &[Candidate], _: &[Value], _: EnvRef| true),
            debug_image,
        ))
    }
}

struct Fixture {
    ctx: CompilerContext,
    pool: VarPool,
    counts: EmissionCounts,
    root: TypeId,
    expr: TypeId,
}

fn fixture() -> Fixture {
    let mut types = TypeTable::new();
    let root = types.add_root_node("Node").unwrap();
    let expr = types.add_node("Expr", root).unwrap();
    let bool_ty = types.bool_type();
    let int_ty = types.int_type();

    let mut signatures = SignatureRegistry::new();
    signatures.register(PropertySignature::new("conv", "designated_type", expr, expr, vec![]));
    signatures.register(PropertySignature::new("eq_ok", "matches", expr, bool_ty, vec![expr]));
    signatures.register(PropertySignature::new(
        "bad_eq_ret",
        "bad_matches",
        expr,
        expr,
        vec![expr],
    ));
    signatures.register(PropertySignature::new("is_even", "is_even", root, bool_ty, vec![]));
    signatures.register(PropertySignature::new(
        "with_arg",
        "at_depth",
        root,
        bool_ty,
        vec![int_ty],
    ));
    signatures.register(PropertySignature::new(
        "non_bool",
        "score",
        root,
        int_ty,
        vec![],
    ));

    let counts = EmissionCounts::default();
    let ctx = CompilerContext::new(
        types,
        signatures,
        Box::new(CountingBackend {
            counts: counts.clone(),
        }),
    );
    Fixture {
        ctx,
        pool: VarPool::new(),
        counts,
        root,
        expr,
    }
}

fn int_operand(ctx: &CompilerContext, n: i64) -> Operand {
    Operand::Scalar {
        value: Value::Int(n),
        ty: ctx.types().int_type(),
    }
}

#[test]
fn equality_returning_non_boolean_is_rejected() {
    let mut f = fixture();
    let a = f.pool.fresh("A");
    let b = f.pool.fresh("B");
    let body = LogicExpr::bind_with(a, b, None, Some("bad_eq_ret"));

    let result = lower_equation(&mut f.ctx, "resolve", &body);
    assert!(result.is_err());
    assert_eq!(f.ctx.diagnostics().error_count(), 1);
    assert!(f.ctx.diagnostics().all()[0]
        .message
        .contains("must return boolean"));
}

#[test]
fn closure_argument_before_variable_argument_is_rejected() {
    let mut f = fixture();
    let a = f.pool.fresh("A");
    let scalar = int_operand(&f.ctx, 3);
    let body = LogicExpr::pred("with_arg", vec![scalar, Operand::Var(a)]);

    let result = lower_equation(&mut f.ctx, "resolve", &body);
    assert!(result.is_err());
    assert!(f.ctx.diagnostics().all()[0]
        .message
        .contains("grouped at the beginning"));
}

#[test]
fn predicate_needs_at_least_one_variable() {
    let mut f = fixture();
    let node = treelogic_ir::NodeRef::new(1, f.expr);
    let scalar = int_operand(&f.ctx, 3);
    let body = LogicExpr::pred("with_arg", vec![Operand::Node(node), scalar]);

    let result = lower_equation(&mut f.ctx, "resolve", &body);
    assert!(result.is_err());
    assert!(f.ctx.diagnostics().all()[0]
        .message
        .contains("at least one logic variable"));
}

#[test]
fn non_collection_domain_is_rejected() {
    let mut f = fixture();
    let a = f.pool.fresh("A");
    let scalar = int_operand(&f.ctx, 3);
    let body = LogicExpr::domain(a, scalar);

    let result = lower_equation(&mut f.ctx, "resolve", &body);
    assert!(result.is_err());
    assert!(f.ctx.diagnostics().all()[0]
        .message
        .contains("must be a collection type"));
}

#[test]
fn variable_argument_against_scalar_parameter_is_rejected() {
    let mut f = fixture();
    let a = f.pool.fresh("A");
    let b = f.pool.fresh("B");
    // Second formal of 'with_arg' is Int; a logic variable cannot fill it.
    let body = LogicExpr::pred("with_arg", vec![Operand::Var(a), Operand::Var(b)]);

    let result = lower_equation(&mut f.ctx, "resolve", &body);
    assert!(result.is_err());
    assert!(f.ctx.diagnostics().all()[0]
        .message
        .contains("is a logic variable"));
}

#[test]
fn non_boolean_predicate_property_is_rejected() {
    let mut f = fixture();
    let a = f.pool.fresh("A");
    let body = LogicExpr::pred("non_bool", vec![Operand::Var(a)]);

    let result = lower_equation(&mut f.ctx, "resolve", &body);
    assert!(result.is_err());
    assert!(f.ctx.diagnostics().all()[0]
        .message
        .contains("must return a boolean"));
}

#[test]
fn unknown_predicate_property_is_rejected() {
    let mut f = fixture();
    let a = f.pool.fresh("A");
    let body = LogicExpr::pred("missing", vec![Operand::Var(a)]);

    assert!(lower_equation(&mut f.ctx, "resolve", &body).is_err());
    assert!(f.ctx.diagnostics().all()[0]
        .message
        .contains("Unknown property"));
}

#[test]
fn bind_rejects_scalar_operands() {
    let mut f = fixture();
    let a = f.pool.fresh("A");
    let scalar = int_operand(&f.ctx, 3);
    let body = LogicExpr::bind_with(scalar, Operand::Var(a), None, None);

    let result = lower_equation(&mut f.ctx, "resolve", &body);
    assert!(result.is_err());
    assert!(f.ctx.diagnostics().all()[0]
        .message
        .contains("should be either a logic variable or a node"));
}

#[test]
fn failed_relation_does_not_abort_the_batch() {
    let mut f = fixture();
    let a = f.pool.fresh("A");
    let bad = LogicExpr::domain(a, int_operand(&f.ctx, 3));
    let good = LogicExpr::domain(
        a,
        Operand::NodeList {
            element: f.expr,
            nodes: vec![treelogic_ir::NodeRef::new(1, f.expr)],
        },
    );

    let results = lower_batch(
        &mut f.ctx,
        vec![("broken", &bad), ("fine", &good)],
    );
    assert_eq!(results.len(), 2);
    assert!(results[0].1.is_err());
    assert!(results[1].1.is_ok());
    assert_eq!(f.ctx.diagnostics().error_count(), 1);
}

#[test]
fn preparation_pass_records_binder_keys_in_order() {
    let mut f = fixture();
    let a = f.pool.fresh("A");
    let b = f.pool.fresh("B");
    let converted = LogicExpr::bind_with(a, b, Some("conv"), None);
    let plain = LogicExpr::all(vec![LogicExpr::bind(a, b), LogicExpr::bind(b, a)]);

    collect_generation_keys(&mut f.ctx, &[&converted, &plain]);

    assert_eq!(
        f.ctx.generation_keys(),
        &[
            GenerationKey::binder(Some("conv"), None),
            GenerationKey::binder(None, None),
        ]
    );
    // Nothing emitted yet.
    assert_eq!(*f.counts.binders.borrow(), 0);

    // Checked lowering emits once per distinct key, not per call site.
    for body in [&converted, &plain] {
        lower_equation(&mut f.ctx, "resolve", body).unwrap();
    }
    assert_eq!(*f.counts.binders.borrow(), 2);
}

#[test]
fn predicate_keys_distinguish_closure_shapes() {
    let mut f = fixture();
    let a = f.pool.fresh("A");
    let no_closure = LogicExpr::pred("is_even", vec![Operand::Var(a)]);
    let with_closure =
        LogicExpr::pred("with_arg", vec![Operand::Var(a), int_operand(&f.ctx, 2)]);

    for body in [&no_closure, &with_closure, &no_closure, &with_closure] {
        lower_equation(&mut f.ctx, "resolve", body).unwrap();
    }

    // Two distinct keys, each emitted exactly once.
    assert_eq!(*f.counts.predicates.borrow(), 2);
    assert_eq!(f.ctx.generation_keys().len(), 2);
}

#[test]
fn finalize_reports_keys_and_diagnostics() {
    let mut f = fixture();
    let a = f.pool.fresh("A");
    let good = LogicExpr::bind(a, a);
    let bad = LogicExpr::domain(a, int_operand(&f.ctx, 3));

    lower_equation(&mut f.ctx, "resolve", &good).unwrap();
    let _ = lower_equation(&mut f.ctx, "lookup", &bad);

    let report = f.ctx.finalize();
    assert_eq!(report.keys, vec![GenerationKey::binder(None, None)]);
    assert!(report.has_errors());
    assert_eq!(report.diagnostics.len(), 1);
}

#[test]
fn lowered_root_node_operand_is_wrapped_into_a_candidate() {
    let mut f = fixture();
    let a = f.pool.fresh("A");
    let node = treelogic_ir::NodeRef::new(9, f.root);
    let body = LogicExpr::bind(a, Operand::Node(node));

    let equation = lower_equation(&mut f.ctx, "resolve", &body).unwrap();
    match equation.relation() {
        treelogic_ir::Relation::Bind { to, .. } => match to {
            treelogic_ir::BindOperand::Value(candidate) => {
                assert_eq!(candidate.node, node);
                assert!(candidate.metadata.is_none());
            }
            other => panic!("expected a wrapped candidate, got {:?}", other),
        },
        other => panic!("expected a bind relation, got {:?}", other),
    }
}
