//! The uniform call shape shared by every desugared node.
//!
//! Control-flow statements, operators, member access, `new` and genuine
//! calls all end here: resolve the target, check it is callable, unify its
//! signature with the argument types, append a descriptor to the ledger of
//! the nearest function scope and return the unifier's result.

use crate::error::CheckError;
use crate::normalize::Normalizer;
use crate::normalized::Normalized;
use smallvec::SmallVec;
use tg_binder::{BindingId, CallArgument, CallDescriptor, ScopeId};
use tg_common::Span;
use tg_solver::{InvocationError, TypeId, compute_invocation_type, format_type, is_callable};
use tracing::trace;

pub(crate) type Arguments = SmallVec<[Normalized; 3]>;

/// Who is being called.
#[derive(Clone, Copy, Debug)]
pub(crate) enum CallTarget<'n> {
    /// Operator or control-flow keyword, looked up by name at the call
    /// site so user code can shadow it.
    Operator(&'n str),
    /// Callee of a call expression, already resolved.
    Callee(BindingId),
}

#[derive(Debug)]
pub(crate) struct CallShape<'n> {
    pub target: CallTarget<'n>,
    pub arguments: Arguments,
    /// Also pass the argument types as explicit generic arguments (member
    /// access instantiates `.` per object/key pair).
    pub generic: bool,
    pub span: Span,
}

impl<'n> CallShape<'n> {
    pub fn operator(name: &'n str, span: Span, arguments: Arguments) -> Self {
        Self {
            target: CallTarget::Operator(name),
            arguments,
            generic: false,
            span,
        }
    }

    pub fn callee(target: BindingId, span: Span, arguments: Arguments) -> Self {
        Self {
            target: CallTarget::Callee(target),
            arguments,
            generic: false,
            span,
        }
    }

    pub fn with_generic_arguments(mut self) -> Self {
        self.generic = true;
        self
    }
}

impl Normalizer<'_> {
    /// Resolve, unify and record one call made from `scope`.
    pub(crate) fn complete_call(
        &mut self,
        shape: CallShape<'_>,
        scope: ScopeId,
    ) -> Result<Normalized, CheckError> {
        let types = self.types;
        let span = shape.span;
        let (target, synthesized) = match shape.target {
            CallTarget::Operator(name) => (self.graph.resolve_binding(name, span, scope)?, true),
            CallTarget::Callee(id) => (id, false),
        };
        let callee = self.graph.binding(target).ty;
        let operator = self.graph.binding(target).name.clone();

        let graph = &*self.graph;
        let arg_types: SmallVec<[TypeId; 3]> = shape
            .arguments
            .iter()
            .map(|arg| arg.type_id(graph))
            .collect();

        let result = if is_callable(types, callee) {
            let generic_args = shape.generic.then_some(arg_types.as_slice());
            compute_invocation_type(types, callee, &arg_types, generic_args, span)
                .map_err(|err| CheckError::invocation(err, span))?
        } else if synthesized {
            return Err(CheckError::InvalidCallable {
                name: operator,
                found: format_type(types, callee),
                span,
            });
        } else if callee == TypeId::UNKNOWN {
            // Calling a binding whose type is not inferred yet (an
            // un-annotated parameter): nothing to unify against.
            TypeId::UNKNOWN
        } else {
            return Err(CheckError::invocation(
                InvocationError::NotCallable {
                    found: format_type(types, callee),
                },
                span,
            ));
        };

        trace!(
            %operator,
            args = arg_types.len(),
            result = %format_type(types, result),
            %span,
            "call resolved"
        );
        let arguments: SmallVec<[CallArgument; 3]> =
            shape.arguments.into_iter().map(Into::into).collect();
        let descriptor = CallDescriptor {
            target,
            generic_arguments: shape.generic.then(|| arguments.clone()),
            arguments,
            span,
            operator,
        };
        self.graph.record_call(scope, descriptor);
        Ok(Normalized::Value(result))
    }
}
