//! Callable classification.
//!
//! A type is callable when it is a function type, or a generic whose
//! subordinate is a function type. Every callable check in the workspace
//! goes through [`as_callable`]; a new callable kind only needs to be added
//! here.

use crate::intern::TypeDatabase;
use crate::types::{ParamInfo, TypeData, TypeId};

/// The signature of a callable type, with the generic's type parameters
/// (empty for plain functions).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallableSignature {
    pub type_params: Vec<TypeId>,
    pub params: Vec<ParamInfo>,
    pub return_type: TypeId,
}

impl CallableSignature {
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    pub fn required_count(&self) -> usize {
        self.params.iter().filter(|p| !p.optional).count()
    }
}

/// Extract the signature of a callable type.
pub fn as_callable(db: &dyn TypeDatabase, type_id: TypeId) -> Option<CallableSignature> {
    match db.lookup(type_id)? {
        TypeData::Function(shape) => Some(CallableSignature {
            type_params: Vec::new(),
            params: shape.params,
            return_type: shape.return_type,
        }),
        TypeData::Generic(generic) => match db.lookup(generic.subordinate)? {
            TypeData::Function(shape) => Some(CallableSignature {
                type_params: generic.type_params,
                params: shape.params,
                return_type: shape.return_type,
            }),
            _ => None,
        },
        _ => None,
    }
}

pub fn is_callable(db: &dyn TypeDatabase, type_id: TypeId) -> bool {
    as_callable(db, type_id).is_some()
}

/// Whether `type_id` is an object type (the only shape `new` may produce).
pub fn is_object_type(db: &dyn TypeDatabase, type_id: TypeId) -> bool {
    matches!(db.lookup(type_id), Some(TypeData::Object(_)))
}

#[cfg(test)]
#[path = "../tests/callable_tests.rs"]
mod tests;
