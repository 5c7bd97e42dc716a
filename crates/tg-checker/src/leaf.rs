//! Leaf inference: types of nodes that are not calls.

use crate::error::CheckError;
use crate::normalize::Normalizer;
use tg_ast::{Node, NodeKind};
use tg_binder::{NamedTypeOptions, ScopeId};
use tg_solver::{PropertyInfo, TypeId, widen_literal};

/// Types the node kinds the normalizer does not desugar.
///
/// `cx` is the running normalizer, so nested expressions (object property
/// values, template substitutions) are normalized and their calls recorded
/// like any other.
pub trait LeafInferencer {
    fn infer_leaf(
        &self,
        node: &Node,
        type_scope: ScopeId,
        scope: ScopeId,
        cx: &mut Normalizer<'_>,
    ) -> Result<TypeId, CheckError>;
}

/// Default inferencer: literal types for literals, structural types for
/// object and array literals.
#[derive(Clone, Copy, Debug, Default)]
pub struct LiteralInferencer;

impl LeafInferencer for LiteralInferencer {
    fn infer_leaf(
        &self,
        node: &Node,
        type_scope: ScopeId,
        scope: ScopeId,
        cx: &mut Normalizer<'_>,
    ) -> Result<TypeId, CheckError> {
        let types = cx.types();
        let ty = match &node.kind {
            NodeKind::NumericLiteral { value } => types.literal_number(*value),
            NodeKind::StringLiteral { value } => types.literal_string(value),
            NodeKind::BooleanLiteral { value } => types.literal_boolean(*value),
            NodeKind::NullLiteral => cx.graph_mut().create_named_type(
                types,
                "null",
                type_scope,
                NamedTypeOptions::default(),
                node.span,
            )?,
            NodeKind::TemplateLiteral { expressions } => {
                for expression in expressions {
                    cx.normalize(expression, scope)?;
                }
                TypeId::STRING
            }
            // `this` is not modelled.
            NodeKind::ThisExpression => TypeId::UNKNOWN,
            NodeKind::ObjectExpression { properties } => {
                let mut shape = Vec::with_capacity(properties.len());
                for property in properties {
                    let value = cx.normalize_type(&property.value, scope)?;
                    let name = types.intern_string(&property.key);
                    shape.push(PropertyInfo::new(name, widen_literal(types, value)));
                }
                types.object(shape)
            }
            // Arrays are objects keyed by index, plus `length`.
            NodeKind::ArrayExpression { elements } => {
                let mut shape = Vec::with_capacity(elements.len() + 1);
                for (index, element) in elements.iter().enumerate() {
                    let value = cx.normalize_type(element, scope)?;
                    let name = types.intern_string(&index.to_string());
                    shape.push(PropertyInfo::new(name, widen_literal(types, value)));
                }
                shape.push(PropertyInfo::new(types.intern_string("length"), TypeId::NUMBER));
                types.object(shape)
            }
            other => {
                return Err(CheckError::UnexpectedNode {
                    node: other.name(),
                    span: node.span,
                });
            }
        };
        Ok(ty)
    }
}

#[cfg(test)]
#[path = "../tests/leaf_tests.rs"]
mod tests;
