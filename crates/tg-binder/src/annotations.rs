//! Lowering of type annotations to solver types.

use crate::error::ScopeError;
use crate::graph::ModuleGraph;
use crate::scope::ScopeId;
use tg_ast::TypeAnnotation;
use tg_common::Span;
use tg_common::limits::MAX_ANNOTATION_DEPTH;
use tg_solver::{ParamInfo, PropertyInfo, TypeDatabase, TypeId};
use tracing::warn;

/// Resolves annotation names from one scope. Type parameters introduced by
/// function annotations (`<T>(T) => T`) shadow scope names while their
/// annotation is lowered.
pub struct AnnotationLowering<'a> {
    graph: &'a ModuleGraph,
    types: &'a dyn TypeDatabase,
    scope: ScopeId,
    span: Span,
    locals: Vec<(String, TypeId)>,
}

impl<'a> AnnotationLowering<'a> {
    pub fn new(
        graph: &'a ModuleGraph,
        types: &'a dyn TypeDatabase,
        scope: ScopeId,
        span: Span,
    ) -> Self {
        Self {
            graph,
            types,
            scope,
            span,
            locals: Vec::new(),
        }
    }

    pub fn lower(&mut self, annotation: &TypeAnnotation) -> Result<TypeId, ScopeError> {
        self.lower_at(annotation, 0)
    }

    fn lower_at(&mut self, annotation: &TypeAnnotation, depth: u32) -> Result<TypeId, ScopeError> {
        if depth > MAX_ANNOTATION_DEPTH {
            warn!(span = %self.span, "annotation nested too deeply, using unknown");
            return Ok(TypeId::UNKNOWN);
        }
        let types = self.types;
        let next = depth + 1;
        Ok(match annotation {
            TypeAnnotation::Named { name } => self.resolve_name(name)?,
            TypeAnnotation::NumberLiteral { value } => types.literal_number(*value),
            TypeAnnotation::StringLiteral { value } => types.literal_string(value),
            TypeAnnotation::BooleanLiteral { value } => types.literal_boolean(*value),
            TypeAnnotation::Object { properties } => {
                let mut lowered = Vec::with_capacity(properties.len());
                for (key, value) in properties {
                    let ty = self.lower_at(value, next)?;
                    lowered.push(PropertyInfo::new(types.intern_string(key), ty));
                }
                types.object(lowered)
            }
            TypeAnnotation::Function {
                type_params,
                params,
                return_type,
            } => {
                let mark = self.locals.len();
                let mut fresh = Vec::with_capacity(type_params.len());
                for name in type_params {
                    let param = types.fresh_type_param(name, None);
                    self.locals.push((name.clone(), param));
                    fresh.push(param);
                }
                let result = self.lower_function(params, return_type, next);
                self.locals.truncate(mark);
                types.generic(fresh, result?)
            }
            TypeAnnotation::Union { types: members } => {
                let mut lowered = Vec::with_capacity(members.len());
                for member in members {
                    lowered.push(self.lower_at(member, next)?);
                }
                types.union(lowered)
            }
        })
    }

    fn lower_function(
        &mut self,
        params: &[TypeAnnotation],
        return_type: &TypeAnnotation,
        depth: u32,
    ) -> Result<TypeId, ScopeError> {
        let mut lowered = Vec::with_capacity(params.len());
        for param in params {
            lowered.push(ParamInfo::required(self.lower_at(param, depth)?));
        }
        let ret = self.lower_at(return_type, depth)?;
        Ok(self.types.function(lowered, ret))
    }

    fn resolve_name(&self, name: &str) -> Result<TypeId, ScopeError> {
        if let Some(&(_, ty)) = self.locals.iter().rev().find(|(n, _)| n == name) {
            return Ok(ty);
        }
        self.graph
            .resolve_type(name, self.scope)
            .ok_or_else(|| ScopeError::UnknownType {
                name: name.to_string(),
                span: self.span,
            })
    }
}

/// Lower `annotation` as seen from `scope`.
pub fn lower_annotation(
    graph: &ModuleGraph,
    types: &dyn TypeDatabase,
    annotation: &TypeAnnotation,
    scope: ScopeId,
    span: Span,
) -> Result<TypeId, ScopeError> {
    AnnotationLowering::new(graph, types, scope, span).lower(annotation)
}
