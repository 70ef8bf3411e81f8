//! Compilation passes.
//!
//! Lowering is an explicit two-pass pipeline: pass 1
//! ([`collect_generation_keys`]) walks every property body and records the
//! generation keys binds will need, before property signatures are
//! resolvable; pass 2 (the checked lowering in [`crate::lower`]) runs once
//! the signature registry is complete.

mod prepare;
pub mod type_checking;

pub use prepare::collect_generation_keys;
