//! Literal widening.

use crate::intern::TypeDatabase;
use crate::types::{TypeData, TypeId};

/// Widen literal types to their primitive (`1` to `number`); unions are
/// widened member-wise. Other types are returned unchanged.
pub fn widen_literal(db: &dyn TypeDatabase, type_id: TypeId) -> TypeId {
    match db.lookup(type_id) {
        Some(TypeData::Literal(value)) => value.base_type(),
        Some(TypeData::Union(members)) => {
            let widened = members.into_iter().map(|m| widen_literal(db, m)).collect();
            db.union(widened)
        }
        _ => type_id,
    }
}
