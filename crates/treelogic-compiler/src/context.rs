//! Compilation context: the explicit state handle for one run.
//!
//! Every lowering and generation call threads a [`CompilerContext`] rather
//! than reaching into shared global state. The context is created at the
//! start of a compilation run, accumulates diagnostics and generation keys
//! while property bodies are lowered, and is consumed by
//! [`finalize`](CompilerContext::finalize), which yields the report the
//! downstream code emitter works from.

use std::rc::Rc;

use anyhow::Result;
use treelogic_ir::{Binder, EnvRef, PredicateImpl, PropertySignature, SignatureRegistry, TypeId, TypeTable};

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::genkey::{EmissionBackend, GenKeyRegistry, GenerationKey};

/// Central state for one compilation run.
///
/// # Lifecycle
///
/// 1. Create with [`CompilerContext::new`], supplying the type table, the
///    property signatures and the emission backend
/// 2. Run the preparation pass over every property body
///    ([`passes::collect_generation_keys`](crate::passes::collect_generation_keys))
/// 3. Lower each body ([`lower_equation`](crate::lower_equation))
/// 4. [`finalize`](CompilerContext::finalize) to obtain the emission report
pub struct CompilerContext {
    types: TypeTable,
    signatures: SignatureRegistry,
    genkeys: GenKeyRegistry,
    backend: Box<dyn EmissionBackend>,
    sink: DiagnosticSink,
    env: EnvRef,
}

impl CompilerContext {
    pub fn new(
        types: TypeTable,
        signatures: SignatureRegistry,
        backend: Box<dyn EmissionBackend>,
    ) -> Self {
        CompilerContext {
            types,
            signatures,
            genkeys: GenKeyRegistry::new(),
            backend,
            sink: DiagnosticSink::new(),
            env: EnvRef::default(),
        }
    }

    /// Set the ambient lexical environment threaded into generated
    /// converters and predicates.
    pub fn with_environment(mut self, env: EnvRef) -> Self {
        self.env = env;
        self
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub(crate) fn types_mut(&mut self) -> &mut TypeTable {
        &mut self.types
    }

    pub fn signatures(&self) -> &SignatureRegistry {
        &self.signatures
    }

    pub fn environment(&self) -> EnvRef {
        self.env
    }

    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.sink
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.sink.add(diagnostic);
    }

    pub fn generation_keys(&self) -> &[GenerationKey] {
        self.genkeys.keys()
    }

    pub(crate) fn request_key(&mut self, key: GenerationKey) {
        self.genkeys.request(key);
    }

    /// Bind implementation for the given converter/equality pair, emitted
    /// at most once per distinct key.
    pub(crate) fn binder_for(
        &mut self,
        converter: Option<&PropertySignature>,
        equality: Option<&PropertySignature>,
    ) -> Result<Rc<Binder>> {
        let key = GenerationKey::binder(
            converter.map(|sig| sig.uid.as_str()),
            equality.map(|sig| sig.uid.as_str()),
        );
        let backend = &mut self.backend;
        self.genkeys
            .binder(key, |key| backend.emit_binder(key, converter, equality))
    }

    /// Predicate caller for the given property and closure shape, emitted
    /// at most once per distinct key.
    pub(crate) fn predicate_for(
        &mut self,
        property: &PropertySignature,
        closure_types: Vec<TypeId>,
        debug_image: &str,
    ) -> Result<Rc<PredicateImpl>> {
        let key = GenerationKey::predicate(property.uid.clone(), closure_types);
        let backend = &mut self.backend;
        self.genkeys
            .predicate(key, |key| backend.emit_predicate(key, property, debug_image))
    }

    /// End the compilation run: the registry and diagnostics become the
    /// emission report, the context is gone.
    pub fn finalize(self) -> CompilationReport {
        CompilationReport {
            keys: self.genkeys.keys().to_vec(),
            diagnostics: self.sink.into_diagnostics(),
        }
    }
}

/// What one compilation run produced: the distinct generation keys in
/// first-use order, plus every collected diagnostic.
#[derive(Debug, Clone)]
pub struct CompilationReport {
    pub keys: Vec<GenerationKey>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level == crate::diagnostics::DiagnosticLevel::Error)
    }
}
