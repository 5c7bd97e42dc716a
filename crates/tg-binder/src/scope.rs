//! Scope records.

use crate::binding::BindingId;
use crate::calls::CallDescriptor;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tg_ast::NodeId;
use tg_solver::{TypeDatabase, TypeId};

/// Index into `ModuleGraph::scopes`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Predefined operators and named intrinsic types.
    Global,
    /// Top level of the program. Treated as a function: the module body is
    /// the implicit top-level function.
    Module,
    Function,
    Block,
    Class,
}

impl ScopeKind {
    /// Scopes that own a call ledger and host named types.
    pub const fn is_function_like(self) -> bool {
        matches!(self, ScopeKind::Global | ScopeKind::Module | ScopeKind::Function)
    }
}

#[derive(Clone, Debug)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    /// Node that created the scope (`None` for the global and module scopes).
    pub node: Option<NodeId>,
    /// Bindings in declaration order. Two names may share a binding.
    pub bindings: IndexMap<String, BindingId>,
    /// Named types visible from this scope down.
    pub types: FxHashMap<String, TypeId>,
    /// Calls resolved while this was the nearest function scope, in
    /// traversal order.
    pub calls: Vec<CallDescriptor>,
    /// Thrown types merged into this scope, without duplicates.
    pub throwable: Vec<TypeId>,
}

impl Scope {
    pub fn new(parent: Option<ScopeId>, kind: ScopeKind, node: Option<NodeId>) -> Self {
        Self {
            parent,
            kind,
            node,
            bindings: IndexMap::new(),
            types: FxHashMap::default(),
            calls: Vec::new(),
            throwable: Vec::new(),
        }
    }

    pub fn binding(&self, name: &str) -> Option<BindingId> {
        self.bindings.get(name).copied()
    }

    /// The accumulated throwable as one union type.
    pub fn throwable_type(&self, types: &dyn TypeDatabase) -> Option<TypeId> {
        if self.throwable.is_empty() {
            return None;
        }
        Some(types.union(self.throwable.clone()))
    }
}
