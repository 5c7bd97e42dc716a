//! Type interning.
//!
//! `TypeDatabase` is the seam the binder and checker program against;
//! `TypeInterner` is the in-memory implementation. The interner uses
//! interior mutability because all checking is single-threaded and every
//! consumer only holds a shared reference.

use crate::types::{
    FunctionShape, GenericShape, IntrinsicKind, LiteralValue, ObjectShape, OrderedFloat,
    ParamInfo, PropertyInfo, TypeData, TypeId, TypeParamInfo,
};
use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::sync::Arc;
use tg_common::{Atom, Interner};

pub trait TypeDatabase {
    /// Intern `data`, returning the existing id for structurally equal data.
    fn intern(&self, data: TypeData) -> TypeId;

    fn lookup(&self, id: TypeId) -> Option<TypeData>;

    fn intern_string(&self, text: &str) -> Atom;

    fn resolve_atom(&self, atom: Atom) -> Arc<str>;

    /// Create a type parameter distinct from every other one, even one with
    /// the same name and constraint.
    fn fresh_type_param(&self, name: &str, constraint: Option<TypeId>) -> TypeId;

    fn literal_number(&self, value: f64) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::Number(OrderedFloat(value))))
    }

    fn literal_string(&self, value: &str) -> TypeId {
        let atom = self.intern_string(value);
        self.intern(TypeData::Literal(LiteralValue::String(atom)))
    }

    fn literal_boolean(&self, value: bool) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::Boolean(value)))
    }

    /// Object type; properties are sorted, later duplicates win.
    fn object(&self, properties: Vec<PropertyInfo>) -> TypeId {
        let mut by_name: FxHashMap<Atom, TypeId> = FxHashMap::default();
        for prop in properties {
            by_name.insert(prop.name, prop.type_id);
        }
        let mut properties: Vec<PropertyInfo> = by_name
            .into_iter()
            .map(|(name, type_id)| PropertyInfo::new(name, type_id))
            .collect();
        properties.sort_by_key(|p| p.name);
        self.intern(TypeData::Object(ObjectShape { properties }))
    }

    /// The empty object type `{ }`.
    fn empty_object(&self) -> TypeId {
        self.intern(TypeData::Object(ObjectShape::default()))
    }

    fn function(&self, params: Vec<ParamInfo>, return_type: TypeId) -> TypeId {
        self.intern(TypeData::Function(FunctionShape {
            params,
            return_type,
        }))
    }

    /// Generic wrapper; with no type parameters the subordinate is returned
    /// unchanged.
    fn generic(&self, type_params: Vec<TypeId>, subordinate: TypeId) -> TypeId {
        if type_params.is_empty() {
            return subordinate;
        }
        self.intern(TypeData::Generic(GenericShape {
            type_params,
            subordinate,
        }))
    }

    fn indexed_access(&self, object: TypeId, index: TypeId) -> TypeId {
        self.intern(TypeData::IndexedAccess { object, index })
    }

    /// Union of `members`: nested unions are flattened, duplicates and
    /// `never` dropped, and `mixed` absorbs everything.
    fn union(&self, members: Vec<TypeId>) -> TypeId {
        let mut flat: IndexSet<TypeId> = IndexSet::new();
        let mut pending: Vec<TypeId> = members.into_iter().rev().collect();
        while let Some(member) = pending.pop() {
            if member == TypeId::NEVER {
                continue;
            }
            if member == TypeId::MIXED {
                return TypeId::MIXED;
            }
            match self.lookup(member) {
                Some(TypeData::Union(inner)) => pending.extend(inner.into_iter().rev()),
                _ => {
                    flat.insert(member);
                }
            }
        }
        match flat.len() {
            0 => TypeId::NEVER,
            1 => flat[0],
            _ => {
                let mut members: Vec<TypeId> = flat.into_iter().collect();
                members.sort();
                self.intern(TypeData::Union(members))
            }
        }
    }

    fn union2(&self, a: TypeId, b: TypeId) -> TypeId {
        self.union(vec![a, b])
    }
}

#[derive(Debug)]
pub struct TypeInterner {
    types: RefCell<Vec<TypeData>>,
    map: RefCell<FxHashMap<TypeData, TypeId>>,
    atoms: RefCell<Interner>,
    next_type_param: Cell<u32>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    /// Create an interner with the intrinsics pre-registered at their fixed
    /// `TypeId`s.
    pub fn new() -> Self {
        let interner = Self {
            types: RefCell::new(Vec::new()),
            map: RefCell::new(FxHashMap::default()),
            atoms: RefCell::new(Interner::new()),
            next_type_param: Cell::new(0),
        };
        for kind in IntrinsicKind::ALL {
            let id = interner.intern(TypeData::Intrinsic(kind));
            debug_assert_eq!(id, kind.type_id());
        }
        interner
    }

    /// Number of distinct types interned so far.
    pub fn len(&self) -> usize {
        self.types.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.borrow().is_empty()
    }
}

impl TypeDatabase for TypeInterner {
    fn intern(&self, data: TypeData) -> TypeId {
        if let Some(&id) = self.map.borrow().get(&data) {
            return id;
        }
        let mut types = self.types.borrow_mut();
        let id = TypeId(types.len() as u32);
        types.push(data.clone());
        self.map.borrow_mut().insert(data, id);
        id
    }

    fn lookup(&self, id: TypeId) -> Option<TypeData> {
        self.types.borrow().get(id.0 as usize).cloned()
    }

    fn intern_string(&self, text: &str) -> Atom {
        self.atoms.borrow_mut().intern(text)
    }

    fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        self.atoms.borrow().resolve(atom)
    }

    fn fresh_type_param(&self, name: &str, constraint: Option<TypeId>) -> TypeId {
        let id = self.next_type_param.get();
        self.next_type_param.set(id + 1);
        let name = self.intern_string(name);
        self.intern(TypeData::TypeParameter(TypeParamInfo {
            id,
            name,
            constraint,
        }))
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
