//! Call descriptors: the normalized record of one resolved call.

use crate::binding::BindingId;
use crate::graph::ModuleGraph;
use smallvec::SmallVec;
use tg_common::Span;
use tg_solver::TypeId;

/// One argument of a recorded call: a computed type, or a binding when the
/// argument was a bare reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallArgument {
    Type(TypeId),
    Binding(BindingId),
}

impl CallArgument {
    pub fn type_id(self, graph: &ModuleGraph) -> TypeId {
        match self {
            CallArgument::Type(ty) => ty,
            CallArgument::Binding(id) => graph.binding(id).ty,
        }
    }
}

/// A resolved call. Immutable once appended to a ledger.
#[derive(Clone, Debug, PartialEq)]
pub struct CallDescriptor {
    pub target: BindingId,
    pub arguments: SmallVec<[CallArgument; 3]>,
    /// Explicit generic arguments handed to the unifier. Member access
    /// passes its two arguments here as well.
    pub generic_arguments: Option<SmallVec<[CallArgument; 3]>>,
    pub span: Span,
    /// Name the target was resolved under (`+`, `if`, `.`, or the callee's
    /// name for genuine calls).
    pub operator: String,
}
