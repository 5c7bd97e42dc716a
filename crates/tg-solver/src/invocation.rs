//! Invocation type computation (the unifier).
//!
//! Given a callee type and argument types, compute the type the call
//! produces:
//!
//! 1. Check arity against the signature (optional parameters may be
//!    omitted).
//! 2. For generics, bind type parameters: explicit generic arguments first
//!    (positional), then candidates collected structurally from the
//!    arguments. Several candidates for one parameter are widened and the
//!    widest one wins.
//! 3. Check constraints, then each argument against its instantiated
//!    parameter.
//! 4. Instantiate the return type, evaluating deferred indexed accesses.

use crate::callable::{CallableSignature, as_callable};
use crate::format::format_type;
use crate::instantiate::{Substitution, contains_type_parameters, instantiate};
use crate::intern::TypeDatabase;
use crate::relations::is_assignable;
use crate::types::{TypeData, TypeId};
use crate::widening::widen_literal;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tg_common::Span;
use tg_common::limits::MAX_RELATION_DEPTH;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvocationError {
    #[error("type '{found}' is not callable")]
    NotCallable { found: String },

    #[error("{}", arity_message(*min, *max, *got))]
    ArityMismatch { min: usize, max: usize, got: usize },

    #[error(
        "argument {index} of type '{actual}' is not assignable to parameter of type '{expected}'"
    )]
    ArgumentMismatch {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("type '{actual}' does not satisfy the constraint '{constraint}' of '{param}'")]
    ConstraintViolation {
        param: String,
        actual: String,
        constraint: String,
    },

    #[error("property '{property}' does not exist on type '{object}'")]
    UnknownProperty { property: String, object: String },

    #[error("type '{index}' cannot be used as an index type")]
    InvalidIndex { index: String },
}

fn arity_message(min: usize, max: usize, got: usize) -> String {
    if min == max {
        format!("expected {min} arguments, got {got}")
    } else {
        format!("expected {min} to {max} arguments, got {got}")
    }
}

type Candidates = FxHashMap<TypeId, SmallVec<[TypeId; 4]>>;

/// Compute the result type of invoking `callee` with `args`.
///
/// `generic_args` binds the callee's type parameters positionally before
/// inference; the property-access operator uses it to instantiate itself per
/// (object, key) pair. `span` is only used for tracing.
pub fn compute_invocation_type(
    db: &dyn TypeDatabase,
    callee: TypeId,
    args: &[TypeId],
    generic_args: Option<&[TypeId]>,
    span: Span,
) -> Result<TypeId, InvocationError> {
    let Some(signature) = as_callable(db, callee) else {
        return Err(InvocationError::NotCallable {
            found: format_type(db, callee),
        });
    };
    trace!(
        callee = %format_type(db, callee),
        args = args.len(),
        generic = signature.is_generic(),
        %span,
        "compute_invocation_type"
    );

    let min = signature.required_count();
    let max = signature.params.len();
    if args.len() < min || args.len() > max {
        return Err(InvocationError::ArityMismatch {
            min,
            max,
            got: args.len(),
        });
    }

    let subst = if signature.is_generic() {
        infer_substitution(db, &signature, args, generic_args)?
    } else {
        Substitution::default()
    };

    for (index, (param, &arg)) in signature.params.iter().zip(args).enumerate() {
        let expected = instantiate(db, param.type_id, &subst)?;
        if !is_assignable(db, arg, expected) {
            return Err(InvocationError::ArgumentMismatch {
                index,
                expected: format_type(db, expected),
                actual: format_type(db, arg),
            });
        }
    }

    let result = instantiate(db, signature.return_type, &subst)?;
    trace!(result = %format_type(db, result), "invocation resolved");
    Ok(result)
}

fn infer_substitution(
    db: &dyn TypeDatabase,
    signature: &CallableSignature,
    args: &[TypeId],
    generic_args: Option<&[TypeId]>,
) -> Result<Substitution, InvocationError> {
    let mut subst = Substitution::default();
    if let Some(explicit) = generic_args {
        for (&param, &arg) in signature.type_params.iter().zip(explicit) {
            subst.insert(param, arg);
        }
    }

    let mut candidates = Candidates::default();
    for (param, &arg) in signature.params.iter().zip(args) {
        collect_candidates(db, param.type_id, arg, &signature.type_params, &mut candidates, 0);
    }

    for &type_param in &signature.type_params {
        if subst.contains_key(&type_param) {
            continue;
        }
        let chosen = match candidates.get(&type_param) {
            Some(found) if !found.is_empty() => choose_candidate(db, found),
            _ => constraint_of(db, type_param).unwrap_or(TypeId::UNKNOWN),
        };
        subst.insert(type_param, chosen);
    }

    for &type_param in &signature.type_params {
        let Some(constraint) = constraint_of(db, type_param) else {
            continue;
        };
        let constraint = instantiate(db, constraint, &subst)?;
        let actual = subst.get(&type_param).copied().unwrap_or(TypeId::UNKNOWN);
        if !is_assignable(db, actual, constraint) {
            return Err(InvocationError::ConstraintViolation {
                param: format_type(db, type_param),
                actual: format_type(db, actual),
                constraint: format_type(db, constraint),
            });
        }
    }

    Ok(subst)
}

fn constraint_of(db: &dyn TypeDatabase, type_param: TypeId) -> Option<TypeId> {
    match db.lookup(type_param) {
        Some(TypeData::TypeParameter(info)) => info.constraint,
        _ => None,
    }
}

/// Walk `param` and `arg` in parallel, recording what each type parameter
/// lines up with.
fn collect_candidates(
    db: &dyn TypeDatabase,
    param: TypeId,
    arg: TypeId,
    type_params: &[TypeId],
    candidates: &mut Candidates,
    depth: u32,
) {
    if depth > MAX_RELATION_DEPTH {
        return;
    }
    if type_params.contains(&param) {
        candidates.entry(param).or_default().push(arg);
        return;
    }
    if !contains_type_parameters(db, param) {
        return;
    }
    let next = depth + 1;
    match (db.lookup(param), db.lookup(arg)) {
        (Some(TypeData::Object(param_shape)), Some(TypeData::Object(arg_shape))) => {
            for prop in &param_shape.properties {
                if let Some(found) = arg_shape.property(prop.name) {
                    collect_candidates(db, prop.type_id, found.type_id, type_params, candidates, next);
                }
            }
        }
        (Some(TypeData::Function(param_fn)), Some(TypeData::Function(arg_fn))) => {
            for (p, a) in param_fn.params.iter().zip(&arg_fn.params) {
                collect_candidates(db, p.type_id, a.type_id, type_params, candidates, next);
            }
            collect_candidates(
                db,
                param_fn.return_type,
                arg_fn.return_type,
                type_params,
                candidates,
                next,
            );
        }
        (Some(TypeData::Union(members)), _) => {
            for member in members {
                collect_candidates(db, member, arg, type_params, candidates, next);
            }
        }
        _ => {}
    }
}

/// Pick the binding for a type parameter. A single candidate is taken as
/// is; several candidates are widened first. The widest candidate (the one
/// every other candidate is assignable to) wins; without one the first
/// candidate is used and the argument check reports the mismatch.
fn choose_candidate(db: &dyn TypeDatabase, candidates: &[TypeId]) -> TypeId {
    if let [single] = candidates {
        return *single;
    }
    let widened: SmallVec<[TypeId; 4]> = candidates.iter().map(|&c| widen_literal(db, c)).collect();
    widened
        .iter()
        .copied()
        .find(|&c| widened.iter().all(|&other| is_assignable(db, other, c)))
        .unwrap_or(widened[0])
}

#[cfg(test)]
#[path = "../tests/invocation_tests.rs"]
mod tests;
