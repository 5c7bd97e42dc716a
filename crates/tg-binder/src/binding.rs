//! Bindings: named entities declared in a scope.

use crate::scope::ScopeId;
use bitflags::bitflags;
use tg_common::Span;
use tg_solver::TypeId;

/// Index into `ModuleGraph::bindings`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindingId(pub u32);

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BindingFlags: u8 {
        /// Declared with `const`; its initializer's literal type is kept.
        const CONST = 1 << 0;
        /// Type comes from an annotation and is never refined.
        const ANNOTATED = 1 << 1;
        const PARAMETER = 1 << 2;
        /// Predefined operator or control-flow binding.
        const BUILTIN = 1 << 3;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub name: String,
    /// Current type. Un-annotated variables start as `unknown` and are
    /// refined from their initializer.
    pub ty: TypeId,
    /// Union of types a call to this binding may throw.
    pub throwable: Option<TypeId>,
    pub span: Span,
    pub flags: BindingFlags,
    /// Scope the binding was declared in.
    pub scope: ScopeId,
}

impl Binding {
    pub fn new(name: impl Into<String>, ty: TypeId, span: Span, scope: ScopeId) -> Self {
        Self {
            name: name.into(),
            ty,
            throwable: None,
            span,
            flags: BindingFlags::empty(),
            scope,
        }
    }

    pub fn with_flags(mut self, flags: BindingFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Whether the declaration pass left the type for inference to fill in.
    pub fn is_placeholder(&self) -> bool {
        self.ty == TypeId::UNKNOWN && !self.flags.contains(BindingFlags::ANNOTATED)
    }
}
