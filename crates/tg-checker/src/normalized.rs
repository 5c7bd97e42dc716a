//! The value a node normalizes to.

use tg_binder::{BindingId, CallArgument, ModuleGraph};
use tg_solver::TypeId;

/// Result of normalizing a node.
///
/// References (identifiers, declarators, function and class expressions)
/// keep their binding so later passes can narrow it; synthesized calls
/// produce plain values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Normalized {
    Value(TypeId),
    Binding(BindingId),
}

impl Normalized {
    /// Type of the result; for a binding, its current type.
    pub fn type_id(self, graph: &ModuleGraph) -> TypeId {
        match self {
            Normalized::Value(ty) => ty,
            Normalized::Binding(id) => graph.binding(id).ty,
        }
    }

    pub fn binding(self) -> Option<BindingId> {
        match self {
            Normalized::Binding(id) => Some(id),
            Normalized::Value(_) => None,
        }
    }
}

impl From<Normalized> for CallArgument {
    fn from(value: Normalized) -> Self {
        match value {
            Normalized::Value(ty) => CallArgument::Type(ty),
            Normalized::Binding(id) => CallArgument::Binding(id),
        }
    }
}

impl From<TypeId> for Normalized {
    fn from(ty: TypeId) -> Self {
        Normalized::Value(ty)
    }
}
