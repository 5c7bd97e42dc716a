//! Scopes, bindings and the declaration pass.
//!
//! The binder walks a `Program` once and produces a [`ModuleGraph`]: an
//! arena of scopes (addressed by `ScopeId`) and bindings (addressed by
//! `BindingId`). The graph also owns the outputs the checker fills in while
//! normalizing: the per-function call ledgers and throwable accumulators.
//!
//! Operators and control-flow constructs are ordinary bindings in the
//! predefined global scope (see `globals`), so the checker resolves `+` the
//! same way it resolves a user function.

pub mod annotations;
pub mod binder;
pub mod binding;
pub mod calls;
pub mod error;
pub mod globals;
pub mod graph;
pub mod scope;

pub use binder::{BindResult, bind_program};
pub use binding::{Binding, BindingFlags, BindingId};
pub use calls::{CallArgument, CallDescriptor};
pub use error::ScopeError;
pub use graph::{LedgerCheckpoint, ModuleGraph, NamedTypeOptions};
pub use scope::{Scope, ScopeId, ScopeKind};
