//! Predefined global scope.
//!
//! Control-flow constructs and operators are modelled as callables so the
//! checker can treat `a + b`, `if (c)` and `f(x)` alike. Each gets a binding
//! in the global scope; user code may shadow any of them.

use crate::binding::{Binding, BindingFlags};
use crate::graph::ModuleGraph;
use tg_common::Span;
use tg_solver::{IntrinsicKind, ParamInfo, TypeDatabase, TypeId};
use tracing::debug;

/// Signature shapes shared by several operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Signature {
    /// `(mixed) => void`: `if`, `while`, `do-while`
    Condition,
    /// `(mixed, mixed, mixed) => void`
    For,
    /// `<T>(T) => void`
    Throw,
    /// `<T>(T) => T`
    Return,
    /// `<T>(T, T) => T`
    Assign,
    /// `(number, number) => number`
    Arithmetic,
    /// `(number, number?) => number`; the unary form omits the second operand.
    Minus,
    /// `<T: number | string>(T, T?) => T`
    Plus,
    /// `<T: number | string>(T, T) => T`
    PlusAssign,
    /// `(mixed, mixed) => boolean`
    Equality,
    /// `<T: number | string>(T, T) => boolean`
    Relational,
    /// `<A, B>(A, B) => A | B`
    Either,
    /// `(mixed) => boolean`
    Not,
    /// `(mixed) => string`
    TypeOf,
    /// `(mixed) => undefined`
    Void,
    /// `(number) => number`: `~`, `++`, `--`
    NumericUnary,
    /// `<T, K: number | string>(T, K) => T[K]`
    Member,
    /// `<A, B>(mixed, A, B) => A | B`
    Conditional,
    /// `<T: { }>(T) => T`
    New,
    /// `(number | string, { }) => boolean`
    In,
}

const OPERATORS: &[(&str, Signature)] = &[
    ("if", Signature::Condition),
    ("while", Signature::Condition),
    ("do-while", Signature::Condition),
    ("for", Signature::For),
    ("throw", Signature::Throw),
    ("return", Signature::Return),
    ("=", Signature::Assign),
    ("+", Signature::Plus),
    ("-", Signature::Minus),
    ("*", Signature::Arithmetic),
    ("/", Signature::Arithmetic),
    ("%", Signature::Arithmetic),
    ("**", Signature::Arithmetic),
    ("&", Signature::Arithmetic),
    ("|", Signature::Arithmetic),
    ("^", Signature::Arithmetic),
    ("<<", Signature::Arithmetic),
    (">>", Signature::Arithmetic),
    (">>>", Signature::Arithmetic),
    ("+=", Signature::PlusAssign),
    ("-=", Signature::Arithmetic),
    ("*=", Signature::Arithmetic),
    ("/=", Signature::Arithmetic),
    ("%=", Signature::Arithmetic),
    ("**=", Signature::Arithmetic),
    ("&=", Signature::Arithmetic),
    ("|=", Signature::Arithmetic),
    ("^=", Signature::Arithmetic),
    ("<<=", Signature::Arithmetic),
    (">>=", Signature::Arithmetic),
    (">>>=", Signature::Arithmetic),
    ("&&=", Signature::Either),
    ("||=", Signature::Either),
    ("??=", Signature::Either),
    ("==", Signature::Equality),
    ("!=", Signature::Equality),
    ("===", Signature::Equality),
    ("!==", Signature::Equality),
    ("instanceof", Signature::Equality),
    ("<", Signature::Relational),
    (">", Signature::Relational),
    ("<=", Signature::Relational),
    (">=", Signature::Relational),
    ("&&", Signature::Either),
    ("||", Signature::Either),
    ("??", Signature::Either),
    ("!", Signature::Not),
    ("delete", Signature::Not),
    ("typeof", Signature::TypeOf),
    ("void", Signature::Void),
    ("~", Signature::NumericUnary),
    ("++", Signature::NumericUnary),
    ("--", Signature::NumericUnary),
    (".", Signature::Member),
    ("?:", Signature::Conditional),
    ("new", Signature::New),
    ("in", Signature::In),
];

/// Populate the graph's global scope with the named intrinsic types and the
/// operator bindings.
pub(crate) fn define_globals(graph: &mut ModuleGraph, types: &dyn TypeDatabase) {
    let global = graph.global_scope();
    let type_table = &mut graph.scope_mut(global).types;
    for kind in IntrinsicKind::ALL {
        type_table.insert(kind.name().to_string(), kind.type_id());
    }

    for &(name, signature) in OPERATORS {
        let ty = signature_type(types, signature);
        let binding = Binding::new(name, ty, Span::dummy(), global).with_flags(BindingFlags::BUILTIN);
        // The table has no duplicate names, so this cannot fail.
        if let Err(err) = graph.declare(binding) {
            debug!(%err, "skipping predefined binding");
        }
    }
    debug!(operators = OPERATORS.len(), "global scope defined");
}

fn signature_type(types: &dyn TypeDatabase, signature: Signature) -> TypeId {
    let req = ParamInfo::required;
    let number_or_string = || types.union2(TypeId::NUMBER, TypeId::STRING);
    match signature {
        Signature::Condition => types.function(vec![req(TypeId::MIXED)], TypeId::VOID),
        Signature::For => types.function(
            vec![req(TypeId::MIXED), req(TypeId::MIXED), req(TypeId::MIXED)],
            TypeId::VOID,
        ),
        Signature::Throw => {
            let t = types.fresh_type_param("T", None);
            types.generic(vec![t], types.function(vec![req(t)], TypeId::VOID))
        }
        Signature::Return => {
            let t = types.fresh_type_param("T", None);
            types.generic(vec![t], types.function(vec![req(t)], t))
        }
        Signature::Assign => {
            let t = types.fresh_type_param("T", None);
            types.generic(vec![t], types.function(vec![req(t), req(t)], t))
        }
        Signature::Arithmetic => types.function(
            vec![req(TypeId::NUMBER), req(TypeId::NUMBER)],
            TypeId::NUMBER,
        ),
        Signature::Minus => types.function(
            vec![req(TypeId::NUMBER), ParamInfo::optional(TypeId::NUMBER)],
            TypeId::NUMBER,
        ),
        Signature::Plus => {
            let t = types.fresh_type_param("T", Some(number_or_string()));
            types.generic(
                vec![t],
                types.function(vec![req(t), ParamInfo::optional(t)], t),
            )
        }
        Signature::PlusAssign => {
            let t = types.fresh_type_param("T", Some(number_or_string()));
            types.generic(vec![t], types.function(vec![req(t), req(t)], t))
        }
        Signature::Equality => types.function(
            vec![req(TypeId::MIXED), req(TypeId::MIXED)],
            TypeId::BOOLEAN,
        ),
        Signature::Relational => {
            let t = types.fresh_type_param("T", Some(number_or_string()));
            types.generic(
                vec![t],
                types.function(vec![req(t), req(t)], TypeId::BOOLEAN),
            )
        }
        Signature::Either => {
            let a = types.fresh_type_param("A", None);
            let b = types.fresh_type_param("B", None);
            types.generic(
                vec![a, b],
                types.function(vec![req(a), req(b)], types.union2(a, b)),
            )
        }
        Signature::Not => types.function(vec![req(TypeId::MIXED)], TypeId::BOOLEAN),
        Signature::TypeOf => types.function(vec![req(TypeId::MIXED)], TypeId::STRING),
        Signature::Void => types.function(vec![req(TypeId::MIXED)], TypeId::UNDEFINED),
        Signature::NumericUnary => types.function(vec![req(TypeId::NUMBER)], TypeId::NUMBER),
        Signature::Member => {
            let t = types.fresh_type_param("T", None);
            let k = types.fresh_type_param("K", Some(number_or_string()));
            types.generic(
                vec![t, k],
                types.function(vec![req(t), req(k)], types.indexed_access(t, k)),
            )
        }
        Signature::Conditional => {
            let a = types.fresh_type_param("A", None);
            let b = types.fresh_type_param("B", None);
            types.generic(
                vec![a, b],
                types.function(
                    vec![req(TypeId::MIXED), req(a), req(b)],
                    types.union2(a, b),
                ),
            )
        }
        Signature::New => {
            let t = types.fresh_type_param("T", Some(types.empty_object()));
            types.generic(vec![t], types.function(vec![req(t)], t))
        }
        Signature::In => types.function(
            vec![req(number_or_string()), req(types.empty_object())],
            TypeId::BOOLEAN,
        ),
    }
}

#[cfg(test)]
#[path = "../tests/globals_tests.rs"]
mod tests;
