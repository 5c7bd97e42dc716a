//! Assignability.
//!
//! Only what the unifier needs: identity, top/bottom types, literal to
//! primitive, unions on either side, structural width subtyping for objects
//! and parameter-contravariant functions. Variance rules for generics are not
//! modelled; two distinct generic types are never related.

use crate::intern::TypeDatabase;
use crate::types::{FunctionShape, ObjectShape, TypeData, TypeId};
use tg_common::limits::MAX_RELATION_DEPTH;

/// Whether a value of type `source` may be used where `target` is expected.
pub fn is_assignable(db: &dyn TypeDatabase, source: TypeId, target: TypeId) -> bool {
    is_assignable_at(db, source, target, 0)
}

fn is_assignable_at(db: &dyn TypeDatabase, source: TypeId, target: TypeId, depth: u32) -> bool {
    if source == target {
        return true;
    }
    if depth > MAX_RELATION_DEPTH {
        return false;
    }
    if target == TypeId::MIXED || target == TypeId::UNKNOWN || source == TypeId::NEVER {
        return true;
    }
    // `unknown` marks a type not inferred yet (unannotated parameters); it
    // is compatible in both directions.
    if source == TypeId::UNKNOWN {
        return true;
    }
    if target == TypeId::VOID && source == TypeId::UNDEFINED {
        return true;
    }

    let (Some(source_data), Some(target_data)) = (db.lookup(source), db.lookup(target)) else {
        return false;
    };

    if let TypeData::Union(members) = &source_data {
        return members
            .iter()
            .all(|&m| is_assignable_at(db, m, target, depth + 1));
    }
    if let TypeData::Union(members) = &target_data {
        return members
            .iter()
            .any(|&m| is_assignable_at(db, source, m, depth + 1));
    }

    match (source_data, target_data) {
        (TypeData::Literal(value), _) => value.base_type() == target,
        (TypeData::TypeParameter(info), _) => info
            .constraint
            .is_some_and(|c| is_assignable_at(db, c, target, depth + 1)),
        (TypeData::Object(source_shape), TypeData::Object(target_shape)) => {
            is_object_assignable(db, &source_shape, &target_shape, depth)
        }
        (TypeData::Function(source_fn), TypeData::Function(target_fn)) => {
            is_function_assignable(db, &source_fn, &target_fn, depth)
        }
        _ => false,
    }
}

/// Width subtyping: every property the target requires exists on the source
/// with an assignable type.
fn is_object_assignable(
    db: &dyn TypeDatabase,
    source: &ObjectShape,
    target: &ObjectShape,
    depth: u32,
) -> bool {
    target.properties.iter().all(|required| {
        source
            .property(required.name)
            .is_some_and(|p| is_assignable_at(db, p.type_id, required.type_id, depth + 1))
    })
}

fn is_function_assignable(
    db: &dyn TypeDatabase,
    source: &FunctionShape,
    target: &FunctionShape,
    depth: u32,
) -> bool {
    if source.required_count() > target.params.len() {
        return false;
    }
    let params_ok = source
        .params
        .iter()
        .zip(&target.params)
        .all(|(s, t)| is_assignable_at(db, t.type_id, s.type_id, depth + 1));
    params_ok && is_assignable_at(db, source.return_type, target.return_type, depth + 1)
}

#[cfg(test)]
#[path = "../tests/relations_tests.rs"]
mod tests;
