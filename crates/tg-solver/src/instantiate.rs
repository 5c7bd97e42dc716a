//! Type-parameter substitution.
//!
//! Instantiating a generic replaces its type parameters and then evaluates
//! any indexed access `T[K]` whose operands became concrete. That last step
//! is how the property-access operator resolves: its result type is
//! `T[K]`, which only becomes a property type once `T` and `K` are known.

use crate::format::{format_number, format_type};
use crate::intern::TypeDatabase;
use crate::invocation::InvocationError;
use crate::types::{LiteralValue, PropertyInfo, TypeData, TypeId};
use rustc_hash::FxHashMap;
use tg_common::limits::MAX_RELATION_DEPTH;

/// Type parameter id to replacement.
pub type Substitution = FxHashMap<TypeId, TypeId>;

pub fn instantiate(
    db: &dyn TypeDatabase,
    type_id: TypeId,
    subst: &Substitution,
) -> Result<TypeId, InvocationError> {
    instantiate_at(db, type_id, subst, 0)
}

fn instantiate_at(
    db: &dyn TypeDatabase,
    type_id: TypeId,
    subst: &Substitution,
    depth: u32,
) -> Result<TypeId, InvocationError> {
    if depth > MAX_RELATION_DEPTH || type_id.is_intrinsic() {
        return Ok(type_id);
    }
    let Some(data) = db.lookup(type_id) else {
        return Ok(type_id);
    };
    let next = depth + 1;
    Ok(match data {
        TypeData::Intrinsic(_) | TypeData::Literal(_) => type_id,
        TypeData::TypeParameter(_) => subst.get(&type_id).copied().unwrap_or(type_id),
        TypeData::Object(shape) => {
            let mut properties = Vec::with_capacity(shape.properties.len());
            for prop in shape.properties {
                let ty = instantiate_at(db, prop.type_id, subst, next)?;
                properties.push(PropertyInfo::new(prop.name, ty));
            }
            db.object(properties)
        }
        TypeData::Function(mut shape) => {
            for param in &mut shape.params {
                param.type_id = instantiate_at(db, param.type_id, subst, next)?;
            }
            let return_type = instantiate_at(db, shape.return_type, subst, next)?;
            db.function(shape.params, return_type)
        }
        TypeData::Generic(generic) => {
            let subordinate = instantiate_at(db, generic.subordinate, subst, next)?;
            db.generic(generic.type_params, subordinate)
        }
        TypeData::Union(members) => {
            let mut mapped = Vec::with_capacity(members.len());
            for member in members {
                mapped.push(instantiate_at(db, member, subst, next)?);
            }
            db.union(mapped)
        }
        TypeData::IndexedAccess { object, index } => {
            let object = instantiate_at(db, object, subst, next)?;
            let index = instantiate_at(db, index, subst, next)?;
            evaluate_indexed_access(db, object, index)?
        }
    })
}

/// Whether `type_id` mentions a type parameter anywhere.
pub fn contains_type_parameters(db: &dyn TypeDatabase, type_id: TypeId) -> bool {
    contains_type_parameters_at(db, type_id, 0)
}

fn contains_type_parameters_at(db: &dyn TypeDatabase, type_id: TypeId, depth: u32) -> bool {
    if depth > MAX_RELATION_DEPTH || type_id.is_intrinsic() {
        return false;
    }
    let next = depth + 1;
    match db.lookup(type_id) {
        Some(TypeData::TypeParameter(_)) => true,
        Some(TypeData::Object(shape)) => shape
            .properties
            .iter()
            .any(|p| contains_type_parameters_at(db, p.type_id, next)),
        Some(TypeData::Function(shape)) => {
            shape
                .params
                .iter()
                .any(|p| contains_type_parameters_at(db, p.type_id, next))
                || contains_type_parameters_at(db, shape.return_type, next)
        }
        Some(TypeData::Generic(generic)) => {
            contains_type_parameters_at(db, generic.subordinate, next)
        }
        Some(TypeData::Union(members)) => members
            .iter()
            .any(|&m| contains_type_parameters_at(db, m, next)),
        Some(TypeData::IndexedAccess { object, index }) => {
            contains_type_parameters_at(db, object, next)
                || contains_type_parameters_at(db, index, next)
        }
        Some(TypeData::Intrinsic(_)) | Some(TypeData::Literal(_)) | None => false,
    }
}

/// Evaluate `object[index]`.
///
/// Stays deferred while either side mentions a type parameter. Unions on
/// either side distribute.
pub fn evaluate_indexed_access(
    db: &dyn TypeDatabase,
    object: TypeId,
    index: TypeId,
) -> Result<TypeId, InvocationError> {
    if contains_type_parameters(db, object) || contains_type_parameters(db, index) {
        return Ok(db.indexed_access(object, index));
    }
    if object == TypeId::UNKNOWN || index == TypeId::UNKNOWN {
        return Ok(TypeId::UNKNOWN);
    }

    if let Some(TypeData::Union(members)) = db.lookup(object) {
        let mut results = Vec::with_capacity(members.len());
        for member in members {
            results.push(evaluate_indexed_access(db, member, index)?);
        }
        return Ok(db.union(results));
    }

    let Some(TypeData::Object(shape)) = db.lookup(object) else {
        return Err(InvocationError::UnknownProperty {
            property: format_type(db, index),
            object: format_type(db, object),
        });
    };

    let key = match db.lookup(index) {
        Some(TypeData::Literal(LiteralValue::String(atom))) => atom,
        Some(TypeData::Literal(LiteralValue::Number(n))) => db.intern_string(&format_number(n.0)),
        Some(TypeData::Intrinsic(_)) if index == TypeId::STRING || index == TypeId::NUMBER => {
            let all = shape.properties.iter().map(|p| p.type_id).collect();
            return Ok(db.union2(db.union(all), TypeId::UNDEFINED));
        }
        Some(TypeData::Union(members)) => {
            let mut results = Vec::with_capacity(members.len());
            for member in members {
                results.push(evaluate_indexed_access(db, object, member)?);
            }
            return Ok(db.union(results));
        }
        _ => {
            return Err(InvocationError::InvalidIndex {
                index: format_type(db, index),
            });
        }
    };

    shape
        .property(key)
        .map(|p| p.type_id)
        .ok_or_else(|| InvocationError::UnknownProperty {
            property: db.resolve_atom(key).to_string(),
            object: format_type(db, object),
        })
}

#[cfg(test)]
#[path = "../tests/instantiate_tests.rs"]
mod tests;
