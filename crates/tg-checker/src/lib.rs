//! Call/expression normalizer for the typegraph checker.
//!
//! Every statement and expression is reduced to one shape: a resolved
//! target binding, a list of argument types and the result type the unifier
//! computes for them. Operators (`+`, `.`, `?:`) and control flow (`if`,
//! `for`, `throw`) are calls to bindings in the predefined global scope, so
//! they go through exactly the same path as user calls.
//!
//! - `normalize`: the dispatcher ([`Normalizer`])
//! - `call_shape`: resolve, unify and record one call
//! - `leaf`: types of literals and other non-call nodes
//! - `statements`: the statement driver with per-statement rollback
//!
//! Each resolved call is appended to the ledger of the nearest function
//! scope in the [`ModuleGraph`](tg_binder::ModuleGraph); thrown types are
//! merged into the scope's throwable accumulator.

mod call_shape;
pub mod error;
pub mod leaf;
pub mod normalize;
pub mod normalized;
pub mod statements;

pub use error::CheckError;
pub use leaf::{LeafInferencer, LiteralInferencer};
pub use normalize::Normalizer;
pub use normalized::Normalized;
pub use statements::{
    CheckResult, CheckerOptions, bind_and_check, check_program, check_program_with,
};
