//! The normalizer: every node to a binding, a value, or a recorded call.
//!
//! Dispatch is one exhaustive match over `NodeKind`. Each arm falls into
//! one of four shapes:
//!
//! - references (identifiers, function and class nodes) resolve to their
//!   binding and record nothing;
//! - declarators resolve the declared binding and, with an initializer,
//!   synthesize an `=` call;
//! - control flow, operators, member access, `new` and calls build a
//!   [`CallShape`] and go through [`Normalizer::complete_call`];
//! - everything else is handed to the [`LeafInferencer`].
//!
//! Only the test of `if`/`while`/`for` is normalized here. Bodies are the
//! statement driver's business.

use crate::call_shape::{Arguments, CallShape};
use crate::error::CheckError;
use crate::leaf::LeafInferencer;
use crate::normalized::Normalized;
use smallvec::smallvec;
use tg_ast::{Node, NodeKind};
use tg_binder::{Binding, BindingFlags, BindingId, ModuleGraph, NamedTypeOptions, ScopeId};
use tg_common::Span;
use tg_common::limits::{MAX_EXPR_NORMALIZE_DEPTH, STACK_GROW_SIZE, STACK_RED_ZONE};
use tg_solver::{
    TypeDatabase, TypeId, compute_invocation_type, format_type, is_callable, is_object_type,
    widen_literal,
};
use tracing::trace;

pub struct Normalizer<'a> {
    pub(crate) graph: &'a mut ModuleGraph,
    pub(crate) types: &'a dyn TypeDatabase,
    leaf: &'a dyn LeafInferencer,
    depth: u32,
    max_depth: u32,
}

impl<'a> Normalizer<'a> {
    pub fn new(
        graph: &'a mut ModuleGraph,
        types: &'a dyn TypeDatabase,
        leaf: &'a dyn LeafInferencer,
    ) -> Self {
        Self {
            graph,
            types,
            leaf,
            depth: 0,
            max_depth: MAX_EXPR_NORMALIZE_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn graph(&self) -> &ModuleGraph {
        &*self.graph
    }

    pub fn graph_mut(&mut self) -> &mut ModuleGraph {
        &mut *self.graph
    }

    pub fn types(&self) -> &'a dyn TypeDatabase {
        self.types
    }

    /// Normalize `node` as seen from `scope`.
    pub fn normalize(&mut self, node: &Node, scope: ScopeId) -> Result<Normalized, CheckError> {
        if self.depth >= self.max_depth {
            return Err(CheckError::RecursionLimit {
                limit: self.max_depth,
                span: node.span,
            });
        }
        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.dispatch(node, scope)
        });
        self.depth -= 1;
        result
    }

    /// Normalize and keep only the type.
    pub fn normalize_type(&mut self, node: &Node, scope: ScopeId) -> Result<TypeId, CheckError> {
        let normalized = self.normalize(node, scope)?;
        Ok(normalized.type_id(self.graph))
    }

    fn dispatch(&mut self, node: &Node, scope: ScopeId) -> Result<Normalized, CheckError> {
        let span = node.span;
        match &node.kind {
            NodeKind::ExpressionStatement { expression } => self.normalize(expression, scope),

            NodeKind::Identifier { name } => {
                let id = self.graph.resolve_binding(name, span, scope)?;
                self.graph.record_position(span, id);
                Ok(Normalized::Binding(id))
            }
            NodeKind::FunctionDeclaration(_)
            | NodeKind::FunctionExpression(_)
            | NodeKind::ArrowFunctionExpression(_)
            | NodeKind::ClassDeclaration(_)
            | NodeKind::ClassExpression(_) => {
                let id = self.graph.resolve_binding(&node.binding_key(), span, scope)?;
                Ok(Normalized::Binding(id))
            }

            NodeKind::VariableDeclarator { id, init, .. } => {
                self.declarator(node, id, init.as_deref(), scope)
            }

            NodeKind::IfStatement { test, .. } => self.condition("if", test, span, scope),
            NodeKind::WhileStatement { test, .. } => self.condition("while", test, span, scope),
            NodeKind::DoWhileStatement { test, .. } => {
                self.condition("do-while", test, span, scope)
            }
            NodeKind::ForStatement { test, body, .. } => {
                self.for_loop(test.as_deref(), body, span, scope)
            }
            NodeKind::ThrowStatement { argument } => {
                let thrown = self.normalize(argument, scope)?;
                let thrown_type = thrown.type_id(self.graph);
                self.graph
                    .merge_into_throwable(self.types, thrown_type, scope);
                let shape = CallShape::operator("throw", span, smallvec![thrown]);
                self.complete_call(shape, scope)
            }
            NodeKind::ReturnStatement { argument } => {
                let value = match argument {
                    Some(argument) => self.normalize(argument, scope)?,
                    None => Normalized::Value(TypeId::UNDEFINED),
                };
                self.complete_call(CallShape::operator("return", span, smallvec![value]), scope)
            }

            NodeKind::UnaryExpression { operator, argument }
            | NodeKind::UpdateExpression {
                operator, argument, ..
            } => {
                let operand = self.normalize(argument, scope)?;
                self.complete_call(CallShape::operator(operator, span, smallvec![operand]), scope)
            }
            NodeKind::BinaryExpression {
                operator,
                left,
                right,
            }
            | NodeKind::LogicalExpression {
                operator,
                left,
                right,
            }
            | NodeKind::AssignmentExpression {
                operator,
                left,
                right,
            } => {
                let left = self.normalize(left, scope)?;
                let right = self.normalize(right, scope)?;
                self.complete_call(CallShape::operator(operator, span, smallvec![left, right]), scope)
            }
            NodeKind::MemberExpression {
                object,
                property,
                computed,
            } => self.member(object, property, *computed, span, scope),
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                let test = self.normalize(test, scope)?;
                let consequent = self.normalize(consequent, scope)?;
                let alternate = self.normalize(alternate, scope)?;
                let shape = CallShape::operator("?:", span, smallvec![test, consequent, alternate]);
                self.complete_call(shape, scope)
            }
            NodeKind::CallExpression { callee, arguments } => {
                self.call(callee, arguments, span, scope)
            }
            NodeKind::NewExpression { callee, arguments } => {
                self.construct(callee, arguments, span, scope)
            }

            NodeKind::BlockStatement { .. }
            | NodeKind::EmptyStatement
            | NodeKind::VariableDeclaration { .. }
            | NodeKind::NumericLiteral { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::BooleanLiteral { .. }
            | NodeKind::NullLiteral
            | NodeKind::TemplateLiteral { .. }
            | NodeKind::ThisExpression
            | NodeKind::ObjectExpression { .. }
            | NodeKind::ArrayExpression { .. } => {
                let type_scope = self.graph.nearest_type_scope(scope);
                let leaf = self.leaf;
                let ty = leaf.infer_leaf(node, type_scope, scope, self)?;
                Ok(Normalized::Value(ty))
            }
        }
    }

    fn normalize_all(&mut self, nodes: &[Node], scope: ScopeId) -> Result<Arguments, CheckError> {
        let mut out = Arguments::with_capacity(nodes.len());
        for node in nodes {
            out.push(self.normalize(node, scope)?);
        }
        Ok(out)
    }

    /// Type named `name` as seen from `scope` (`mixed`, `undefined`, ...).
    fn named_type(&mut self, name: &str, scope: ScopeId, span: Span) -> Result<TypeId, CheckError> {
        let type_scope = self.graph.nearest_type_scope(scope);
        let ty = self.graph.create_named_type(
            self.types,
            name,
            type_scope,
            NamedTypeOptions::default(),
            span,
        )?;
        Ok(ty)
    }

    fn declarator(
        &mut self,
        node: &Node,
        id: &Node,
        init: Option<&Node>,
        scope: ScopeId,
    ) -> Result<Normalized, CheckError> {
        let Some(name) = id.identifier_name() else {
            return Err(CheckError::UnexpectedNode {
                node: id.kind.name(),
                span: id.span,
            });
        };
        let declared = self.graph.resolve_binding(name, id.span, scope)?;
        self.graph.record_position(id.span, declared);
        let Some(init) = init else {
            return Ok(Normalized::Binding(declared));
        };
        let value = self.normalize(init, scope)?;
        self.refine_placeholder(declared, value);
        let shape = CallShape::operator("=", node.span, smallvec![Normalized::Binding(declared), value]);
        self.complete_call(shape, scope)
    }

    /// Give an un-annotated variable the type of its initializer. `const`
    /// keeps literal types, `let` and `var` widen them. A function or class
    /// initializer also hands over what it throws.
    fn refine_placeholder(&mut self, declared: BindingId, value: Normalized) {
        if !self.graph.binding(declared).is_placeholder() {
            return;
        }
        let ty = value.type_id(self.graph);
        let throwable = value
            .binding()
            .and_then(|source| self.graph.binding(source).throwable);
        let binding = self.graph.binding(declared);
        let ty = if binding.flags.contains(BindingFlags::CONST) {
            ty
        } else {
            widen_literal(self.types, ty)
        };
        let throwable = binding.throwable.or(throwable);
        trace!(name = %binding.name, ty = %format_type(self.types, ty), "refined");
        self.graph.refine_binding(declared, ty, throwable);
    }

    fn condition(
        &mut self,
        keyword: &'static str,
        test: &Node,
        span: Span,
        scope: ScopeId,
    ) -> Result<Normalized, CheckError> {
        let test = self.normalize(test, scope)?;
        self.complete_call(CallShape::operator(keyword, span, smallvec![test]), scope)
    }

    /// `for` is a three-argument call. The test is normalized in the scope
    /// of the loop body, where the `init` declarations live.
    fn for_loop(
        &mut self,
        test: Option<&Node>,
        body: &Node,
        span: Span,
        scope: ScopeId,
    ) -> Result<Normalized, CheckError> {
        let loop_scope = self
            .graph
            .scope_of_node(body.id)
            .ok_or(CheckError::MissingScope {
                node: "ForStatement",
                span,
            })?;
        let mixed = Normalized::Value(self.named_type("mixed", scope, span)?);
        let test = match test {
            Some(test) => self.normalize(test, loop_scope)?,
            None => Normalized::Value(self.named_type("undefined", scope, span)?),
        };
        self.complete_call(CallShape::operator("for", span, smallvec![mixed, test, mixed]), scope)
    }

    /// `object.key` or `object[key]` as a call to the generic `.`.
    fn member(
        &mut self,
        object: &Node,
        property: &Node,
        computed: bool,
        span: Span,
        scope: ScopeId,
    ) -> Result<Normalized, CheckError> {
        let object = self.normalize(object, scope)?;
        let key = match property.identifier_name() {
            Some(name) if !computed => {
                let type_scope = self.graph.nearest_type_scope(scope);
                let options = NamedTypeOptions {
                    is_literal_of: Some(TypeId::STRING),
                };
                let literal =
                    self.graph
                        .create_named_type(self.types, name, type_scope, options, property.span)?;
                Normalized::Value(literal)
            }
            _ => self.normalize(property, scope)?,
        };
        let shape = CallShape::operator(".", span, smallvec![object, key]).with_generic_arguments();
        self.complete_call(shape, scope)
    }

    fn call(
        &mut self,
        callee: &Node,
        arguments: &[Node],
        span: Span,
        scope: ScopeId,
    ) -> Result<Normalized, CheckError> {
        let arguments = self.normalize_all(arguments, scope)?;
        let target = match callee.identifier_name() {
            Some(name) => {
                let id = self.graph.resolve_binding(name, callee.span, scope)?;
                self.graph.record_position(callee.span, id);
                id
            }
            None => match self.normalize(callee, scope)? {
                Normalized::Binding(id) => id,
                Normalized::Value(ty) => self.callee_binding(callee, ty, scope)?,
            },
        };
        if let Some(thrown) = self.graph.binding(target).throwable {
            self.graph.merge_into_throwable(self.types, thrown, scope);
        }
        self.complete_call(CallShape::callee(target, span, arguments), scope)
    }

    /// Binding standing for a computed callee (`obj.method`, `make()()`),
    /// keyed by the callee's position in the calling scope.
    fn callee_binding(
        &mut self,
        callee: &Node,
        ty: TypeId,
        scope: ScopeId,
    ) -> Result<BindingId, CheckError> {
        let key = format!("[[Callee{}-{}]]", callee.span.line, callee.span.column);
        if let Some(id) = self.graph.scope(scope).binding(&key) {
            let throwable = self.graph.binding(id).throwable;
            self.graph.refine_binding(id, ty, throwable);
            return Ok(id);
        }
        Ok(self.graph.declare(Binding::new(key, ty, callee.span, scope))?)
    }

    /// `new C(args)`: the constructed type is what invoking `C` yields when
    /// that is an object, else `{ }`.
    fn construct(
        &mut self,
        callee: &Node,
        arguments: &[Node],
        span: Span,
        scope: ScopeId,
    ) -> Result<Normalized, CheckError> {
        let types = self.types;
        let constructor = self.normalize_type(callee, scope)?;
        let constructed = if is_callable(types, constructor) {
            let arguments = self.normalize_all(arguments, scope)?;
            let graph = &*self.graph;
            let arg_types: Vec<TypeId> = arguments.iter().map(|a| a.type_id(graph)).collect();
            compute_invocation_type(types, constructor, &arg_types, None, span)
                .map_err(|err| CheckError::invocation(err, span))?
        } else {
            constructor
        };
        let instance = if is_object_type(types, constructed) {
            constructed
        } else {
            types.empty_object()
        };
        let shape = CallShape::operator("new", span, smallvec![Normalized::Value(instance)]);
        self.complete_call(shape, scope)
    }
}

#[cfg(test)]
#[path = "../tests/normalize_tests.rs"]
mod tests;
