//! The module graph: scope and binding arenas plus the checker's outputs.
//!
//! Scopes are stored in a flat arena and linked through `parent`, so every
//! query is a walk up from a `ScopeId`. Nothing here depends on traversal
//! order; the checker can ask about any scope at any time.

use crate::binding::{Binding, BindingId};
use crate::calls::CallDescriptor;
use crate::error::ScopeError;
use crate::globals;
use crate::scope::{Scope, ScopeId, ScopeKind};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tg_ast::NodeId;
use tg_common::Span;
use tg_common::limits::MAX_SCOPE_WALK_ITERATIONS;
use tg_solver::{TypeData, TypeDatabase, TypeId, format_type};
use tracing::trace;

/// Options for [`ModuleGraph::create_named_type`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NamedTypeOptions {
    /// Create the literal type whose text is the name, narrowing this
    /// primitive (`string`, `number` or `boolean`), instead of looking the
    /// name up.
    pub is_literal_of: Option<TypeId>,
}

/// Ledger and accumulator lengths of every scope at one point in time,
/// plus the binding arena length and the refinement log length.
///
/// Ledgers and the binding arena only grow while a statement is checked, so
/// truncating back to these lengths discards exactly what the statement
/// appended. Binding refinements are undone from the log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerCheckpoint {
    calls: Vec<usize>,
    throwable: Vec<usize>,
    bindings: usize,
    refinements: usize,
}

/// A binding's type and throwable before a refinement overwrote them.
#[derive(Clone, Copy, Debug)]
struct Refinement {
    binding: BindingId,
    ty: TypeId,
    throwable: Option<TypeId>,
}

#[derive(Debug)]
pub struct ModuleGraph {
    pub scopes: Vec<Scope>,
    pub bindings: Vec<Binding>,
    /// Scope created by a node (functions, blocks, classes, `for` bodies).
    pub node_scope_ids: FxHashMap<NodeId, ScopeId>,
    /// Identifier positions by start offset.
    positions: BTreeMap<u32, (Span, BindingId)>,
    refinements: Vec<Refinement>,
    global: ScopeId,
    module: ScopeId,
}

impl ModuleGraph {
    /// Create a graph holding the predefined global scope and an empty
    /// module scope beneath it.
    pub fn new(types: &dyn TypeDatabase) -> Self {
        let mut graph = Self {
            scopes: Vec::new(),
            bindings: Vec::new(),
            node_scope_ids: FxHashMap::default(),
            positions: BTreeMap::new(),
            refinements: Vec::new(),
            global: ScopeId(0),
            module: ScopeId(0),
        };
        graph.global = graph.new_scope(None, ScopeKind::Global, None);
        globals::define_globals(&mut graph, types);
        graph.module = graph.new_scope(Some(graph.global), ScopeKind::Module, None);
        graph
    }

    pub fn global_scope(&self) -> ScopeId {
        self.global
    }

    pub fn module_scope(&self) -> ScopeId {
        self.module
    }

    pub fn new_scope(
        &mut self,
        parent: Option<ScopeId>,
        kind: ScopeKind,
        node: Option<NodeId>,
    ) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(parent, kind, node));
        if let Some(node) = node {
            self.node_scope_ids.insert(node, id);
        }
        trace!(scope = id.0, ?kind, "new scope");
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.0 as usize]
    }

    pub fn binding_mut(&mut self, id: BindingId) -> &mut Binding {
        &mut self.bindings[id.0 as usize]
    }

    /// Overwrite a binding's type and throwable, keeping the old values so a
    /// [`rollback`](Self::rollback) can restore them.
    pub fn refine_binding(&mut self, id: BindingId, ty: TypeId, throwable: Option<TypeId>) {
        let binding = &mut self.bindings[id.0 as usize];
        self.refinements.push(Refinement {
            binding: id,
            ty: binding.ty,
            throwable: binding.throwable,
        });
        binding.ty = ty;
        binding.throwable = throwable;
    }

    /// Scope created by `node`, if the declaration pass recorded one.
    pub fn scope_of_node(&self, node: NodeId) -> Option<ScopeId> {
        self.node_scope_ids.get(&node).copied()
    }

    /// Parent chain starting at `scope` (inclusive).
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), |&s| self.scope(s).parent)
            .take(MAX_SCOPE_WALK_ITERATIONS)
    }

    // ---- declaration ----

    /// Declare `binding` in its scope under its name.
    pub fn declare(&mut self, binding: Binding) -> Result<BindingId, ScopeError> {
        let id = BindingId(self.bindings.len() as u32);
        let (scope, name, span) = (binding.scope, binding.name.clone(), binding.span);
        self.bindings.push(binding);
        if let Err(err) = self.bind_name(scope, &name, id, span) {
            self.bindings.pop();
            return Err(err);
        }
        Ok(id)
    }

    /// Make `id` visible in `scope` under `name` as well.
    pub fn bind_name(
        &mut self,
        scope: ScopeId,
        name: &str,
        id: BindingId,
        span: Span,
    ) -> Result<(), ScopeError> {
        let bindings = &mut self.scope_mut(scope).bindings;
        if bindings.contains_key(name) {
            return Err(ScopeError::Duplicate {
                name: name.to_string(),
                span,
            });
        }
        bindings.insert(name.to_string(), id);
        Ok(())
    }

    // ---- resolution ----

    /// Find the binding `name` refers to from `scope`, walking outward.
    pub fn resolve_binding(
        &self,
        name: &str,
        span: Span,
        scope: ScopeId,
    ) -> Result<BindingId, ScopeError> {
        self.ancestors(scope)
            .find_map(|s| self.scope(s).binding(name))
            .ok_or_else(|| ScopeError::Unresolved {
                name: name.to_string(),
                span,
            })
    }

    /// Nearest enclosing scope of exactly `kind`, starting at `scope`.
    pub fn nearest_scope_of_kind(&self, kind: ScopeKind, scope: ScopeId) -> Option<ScopeId> {
        self.ancestors(scope).find(|&s| self.scope(s).kind == kind)
    }

    /// Nearest function-like scope (function, module or global): the owner
    /// of the call ledger for code in `scope`.
    pub fn nearest_function_scope(&self, scope: ScopeId) -> ScopeId {
        self.ancestors(scope)
            .find(|&s| self.scope(s).kind.is_function_like())
            .unwrap_or(self.global)
    }

    /// Scope where named types for code in `scope` are created.
    pub fn nearest_type_scope(&self, scope: ScopeId) -> ScopeId {
        self.nearest_function_scope(scope)
    }

    /// Look a named type up from `scope`, walking outward.
    pub fn resolve_type(&self, name: &str, scope: ScopeId) -> Option<TypeId> {
        self.ancestors(scope)
            .find_map(|s| self.scope(s).types.get(name).copied())
    }

    /// Get the type called `name`.
    ///
    /// With `is_literal_of` the literal type spelled `name` is created (and
    /// registered in `type_scope`); otherwise the name must already denote a
    /// type visible from `type_scope`.
    pub fn create_named_type(
        &mut self,
        types: &dyn TypeDatabase,
        name: &str,
        type_scope: ScopeId,
        options: NamedTypeOptions,
        span: Span,
    ) -> Result<TypeId, ScopeError> {
        let unknown = || ScopeError::UnknownType {
            name: name.to_string(),
            span,
        };
        let Some(base) = options.is_literal_of else {
            return self.resolve_type(name, type_scope).ok_or_else(unknown);
        };
        let literal = match base {
            TypeId::STRING => types.literal_string(name),
            TypeId::NUMBER => types.literal_number(name.parse::<f64>().map_err(|_| unknown())?),
            TypeId::BOOLEAN => match name {
                "true" => types.literal_boolean(true),
                "false" => types.literal_boolean(false),
                _ => return Err(unknown()),
            },
            _ => return Err(unknown()),
        };
        let key = format_type(types, literal);
        Ok(*self.scope_mut(type_scope).types.entry(key).or_insert(literal))
    }

    // ---- checker outputs ----

    /// Append `call` to the ledger of the nearest function scope of
    /// `scope`; returns that scope.
    pub fn record_call(&mut self, scope: ScopeId, call: CallDescriptor) -> ScopeId {
        let owner = self.nearest_function_scope(scope);
        self.scope_mut(owner).calls.push(call);
        owner
    }

    /// Add `ty` (possibly a union) to the throwable accumulator of `scope`.
    pub fn merge_into_throwable(&mut self, types: &dyn TypeDatabase, ty: TypeId, scope: ScopeId) {
        let members = match types.lookup(ty) {
            Some(TypeData::Union(members)) => members,
            _ => vec![ty],
        };
        let throwable = &mut self.scope_mut(scope).throwable;
        for member in members {
            if !throwable.contains(&member) {
                throwable.push(member);
            }
        }
    }

    /// Union of everything thrown directly in `function_scope` or in the
    /// block scopes nested in it (not in nested functions).
    pub fn collect_throwable(
        &self,
        types: &dyn TypeDatabase,
        function_scope: ScopeId,
    ) -> Option<TypeId> {
        let thrown: Vec<TypeId> = self
            .scopes
            .iter()
            .enumerate()
            .filter(|(i, _)| self.nearest_function_scope(ScopeId(*i as u32)) == function_scope)
            .flat_map(|(_, scope)| scope.throwable.iter().copied())
            .collect();
        if thrown.is_empty() {
            None
        } else {
            Some(types.union(thrown))
        }
    }

    /// All recorded calls, grouped by ledger in scope order.
    pub fn calls(&self) -> impl Iterator<Item = (ScopeId, &CallDescriptor)> + '_ {
        self.scopes
            .iter()
            .enumerate()
            .flat_map(|(i, scope)| scope.calls.iter().map(move |c| (ScopeId(i as u32), c)))
    }

    pub fn checkpoint(&self) -> LedgerCheckpoint {
        LedgerCheckpoint {
            calls: self.scopes.iter().map(|s| s.calls.len()).collect(),
            throwable: self.scopes.iter().map(|s| s.throwable.len()).collect(),
            bindings: self.bindings.len(),
            refinements: self.refinements.len(),
        }
    }

    /// Drop every ledger entry, thrown type and binding added since
    /// `checkpoint`, and undo the binding refinements made after it.
    pub fn rollback(&mut self, checkpoint: &LedgerCheckpoint) {
        while self.refinements.len() > checkpoint.refinements {
            let Some(undo) = self.refinements.pop() else {
                break;
            };
            let binding = &mut self.bindings[undo.binding.0 as usize];
            binding.ty = undo.ty;
            binding.throwable = undo.throwable;
        }

        let kept = checkpoint.bindings;
        for (i, scope) in self.scopes.iter_mut().enumerate() {
            if let Some(&len) = checkpoint.calls.get(i) {
                scope.calls.truncate(len);
            }
            if let Some(&len) = checkpoint.throwable.get(i) {
                scope.throwable.truncate(len);
            }
            if self.bindings.len() > kept {
                scope.bindings.retain(|_, id| (id.0 as usize) < kept);
            }
        }
        if self.bindings.len() > kept {
            trace!(dropped = self.bindings.len() - kept, "bindings rolled back");
            self.bindings.truncate(kept);
            self.positions.retain(|_, (_, id)| (id.0 as usize) < kept);
        }
    }

    // ---- positions ----

    /// Remember that the identifier at `span` refers to `binding`.
    pub fn record_position(&mut self, span: Span, binding: BindingId) {
        self.positions.insert(span.start, (span, binding));
    }

    /// Binding referenced by the identifier covering `offset`.
    pub fn binding_at(&self, offset: u32) -> Option<BindingId> {
        self.positions
            .range(..=offset)
            .next_back()
            .filter(|(_, (span, _))| span.contains(offset))
            .map(|(_, &(_, binding))| binding)
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }
}

#[cfg(test)]
#[path = "../tests/graph_tests.rs"]
mod tests;
