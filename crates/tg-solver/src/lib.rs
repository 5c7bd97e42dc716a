//! Type representation and call unification.
//!
//! Types are interned (`TypeId` comparison is O(1)). The solver knows
//! nothing about syntax: the checker hands it a callee type and argument
//! types and gets back the invocation's result type.
//!
//! - `types`: `TypeData` and its shapes
//! - `intern`: the `TypeDatabase` trait and the `TypeInterner`
//! - `callable`: the single "is callable" predicate
//! - `relations`: assignability
//! - `instantiate`: type-parameter substitution and deferred indexed access
//! - `invocation`: `compute_invocation_type`, the unifier entry point

pub mod callable;
pub mod format;
pub mod instantiate;
pub mod intern;
pub mod invocation;
pub mod relations;
pub mod types;
pub mod widening;

pub use callable::{CallableSignature, as_callable, is_callable, is_object_type};
pub use format::format_type;
pub use instantiate::{
    Substitution, contains_type_parameters, evaluate_indexed_access, instantiate,
};
pub use intern::{TypeDatabase, TypeInterner};
pub use invocation::{InvocationError, compute_invocation_type};
pub use relations::is_assignable;
pub use types::{
    FunctionShape, GenericShape, IntrinsicKind, LiteralValue, ObjectShape, OrderedFloat,
    ParamInfo, PropertyInfo, TypeData, TypeId, TypeParamInfo,
};
pub use widening::widen_literal;
