//! Checker errors and their conversion to diagnostics.

use tg_binder::ScopeError;
use tg_common::Span;
use tg_common::diagnostics::{Diagnostic, diagnostic_codes};
use tg_solver::InvocationError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    /// A name, operator or control-flow keyword with no visible binding (or
    /// an annotation naming an unknown type).
    #[error(transparent)]
    Scope(#[from] ScopeError),

    /// Unification failure, propagated unchanged from the solver.
    #[error("{error} at {span}")]
    Invocation {
        #[source]
        error: InvocationError,
        span: Span,
    },

    #[error("expression nested deeper than {limit} levels at {span}")]
    RecursionLimit { limit: u32, span: Span },

    /// A synthesized call resolved to a binding that is not callable. The
    /// predefined operator bindings are always callable, so this means the
    /// scope graph was built wrong.
    #[error("internal: target '{name}' of type '{found}' is not callable at {span}")]
    InvalidCallable {
        name: String,
        found: String,
        span: Span,
    },

    /// The declaration pass did not record a scope the checker needs.
    #[error("internal: no scope recorded for {node} at {span}")]
    MissingScope { node: &'static str, span: Span },

    /// A node kind the leaf inferencer cannot type.
    #[error("internal: unexpected {node} at {span}")]
    UnexpectedNode { node: &'static str, span: Span },
}

impl CheckError {
    pub fn invocation(error: InvocationError, span: Span) -> Self {
        CheckError::Invocation { error, span }
    }

    /// Whether the error is a checker defect rather than a problem in the
    /// checked program.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            CheckError::InvalidCallable { .. }
                | CheckError::MissingScope { .. }
                | CheckError::UnexpectedNode { .. }
        )
    }

    pub fn span(&self) -> Span {
        match self {
            CheckError::Scope(err) => err.span(),
            CheckError::Invocation { span, .. }
            | CheckError::RecursionLimit { span, .. }
            | CheckError::InvalidCallable { span, .. }
            | CheckError::MissingScope { span, .. }
            | CheckError::UnexpectedNode { span, .. } => *span,
        }
    }

    pub fn to_diagnostic(&self, file: &str) -> Diagnostic {
        let span = self.span();
        let at = |code: u32, args: &[&str]| -> Diagnostic {
            Diagnostic::from_code(file, span.start, span.len(), code, args)
        };
        match self {
            CheckError::Scope(ScopeError::Unresolved { name, .. }) => {
                at(diagnostic_codes::CANNOT_FIND_NAME, &[name.as_str()])
            }
            CheckError::Scope(ScopeError::UnknownType { name, .. }) => {
                at(diagnostic_codes::CANNOT_FIND_TYPE, &[name.as_str()])
            }
            CheckError::Scope(ScopeError::Duplicate { name, .. }) => {
                at(diagnostic_codes::DUPLICATE_IDENTIFIER, &[name.as_str()])
            }
            CheckError::Invocation { error, .. } => invocation_diagnostic(error, at),
            CheckError::Scope(ScopeError::TooDeep { limit, .. })
            | CheckError::RecursionLimit { limit, .. } => {
                at(diagnostic_codes::EXPRESSION_TOO_DEEP, &[limit.to_string().as_str()])
            }
            CheckError::InvalidCallable { .. }
            | CheckError::MissingScope { .. }
            | CheckError::UnexpectedNode { .. } => {
                at(diagnostic_codes::INTERNAL_ERROR, &[self.to_string().as_str()])
            }
        }
    }
}

fn invocation_diagnostic(
    error: &InvocationError,
    at: impl Fn(u32, &[&str]) -> Diagnostic,
) -> Diagnostic {
    match error {
        InvocationError::NotCallable { found } => {
            at(diagnostic_codes::NOT_CALLABLE, &[found.as_str()])
        }
        InvocationError::ArityMismatch { min, max, got } => {
            let expected = if min == max {
                min.to_string()
            } else {
                format!("{min}-{max}")
            };
            at(
                diagnostic_codes::EXPECTED_ARGUMENTS,
                &[expected.as_str(), got.to_string().as_str()],
            )
        }
        InvocationError::ArgumentMismatch {
            expected, actual, ..
        } => at(
            diagnostic_codes::ARGUMENT_NOT_ASSIGNABLE,
            &[actual.as_str(), expected.as_str()],
        ),
        InvocationError::ConstraintViolation {
            actual, constraint, ..
        } => at(
            diagnostic_codes::TYPE_ARGUMENT_CONSTRAINT,
            &[actual.as_str(), constraint.as_str()],
        ),
        InvocationError::UnknownProperty { property, object } => {
            at(
                diagnostic_codes::PROPERTY_DOES_NOT_EXIST,
                &[property.as_str(), object.as_str()],
            )
        }
        InvocationError::InvalidIndex { index } => {
            at(diagnostic_codes::INVALID_INDEX_TYPE, &[index.as_str()])
        }
    }
}

#[cfg(test)]
#[path = "../tests/error_tests.rs"]
mod tests;
