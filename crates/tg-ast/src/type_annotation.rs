//! Type annotations attached to declarations.
//!
//! Annotations are syntax only; the binder lowers them to solver types by
//! resolving names through the nearest type scope.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum TypeAnnotation {
    /// A named type: a keyword (`number`, `mixed`, ...), an alias, a class,
    /// or a type parameter in scope.
    Named { name: String },
    NumberLiteral { value: f64 },
    StringLiteral { value: String },
    BooleanLiteral { value: bool },
    Object { properties: Vec<(String, TypeAnnotation)> },
    Function {
        #[serde(default)]
        type_params: Vec<String>,
        params: Vec<TypeAnnotation>,
        return_type: Box<TypeAnnotation>,
    },
    Union { types: Vec<TypeAnnotation> },
}

impl TypeAnnotation {
    pub fn named(name: impl Into<String>) -> Self {
        TypeAnnotation::Named { name: name.into() }
    }

    pub fn object<K: Into<String>>(
        properties: impl IntoIterator<Item = (K, TypeAnnotation)>,
    ) -> Self {
        TypeAnnotation::Object {
            properties: properties.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn function(params: Vec<TypeAnnotation>, return_type: TypeAnnotation) -> Self {
        TypeAnnotation::Function {
            type_params: Vec::new(),
            params,
            return_type: Box::new(return_type),
        }
    }

    pub fn union(types: Vec<TypeAnnotation>) -> Self {
        TypeAnnotation::Union { types }
    }
}
