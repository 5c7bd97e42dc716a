//! AST consumed by the typegraph binder and checker.
//!
//! The tree is produced by an external parser. It mirrors the ESTree/Babel
//! node kinds the checker understands as one closed enum (`NodeKind`), so
//! every consumer matches exhaustively. Programs can be built in code with
//! [`AstBuilder`] or loaded from JSON with [`Program::from_json`].

pub mod builder;
pub mod node;
pub mod type_annotation;

pub use builder::{AstBuilder, FunctionParts};
pub use node::{
    Class, ClassProperty, DeclarationKind, Function, Node, NodeId, NodeKind, ObjectProperty,
    Param, Program,
};
pub use type_annotation::TypeAnnotation;
