//! Declaration pass.
//!
//! Walks a program once, creating a scope for every function, class, block
//! and `for` body, and a binding for every declaration. Function and class
//! bindings get their full types here (from annotations), so the checker
//! never needs to look back at declaration syntax.

use crate::annotations::lower_annotation;
use crate::binding::{Binding, BindingFlags};
use crate::error::ScopeError;
use crate::graph::ModuleGraph;
use crate::scope::{ScopeId, ScopeKind};
use tg_ast::{Class, DeclarationKind, Function, Node, NodeKind, Param, Program, TypeAnnotation};
use tg_common::Span;
use tg_common::limits::{MAX_STATEMENT_DEPTH, STACK_GROW_SIZE, STACK_RED_ZONE};
use tg_solver::{ParamInfo, PropertyInfo, TypeDatabase, TypeId};
use tracing::{debug, trace, warn};

/// Output of the declaration pass. Errors are collected rather than fatal:
/// the graph is complete apart from the offending declarations.
#[derive(Debug)]
pub struct BindResult {
    pub graph: ModuleGraph,
    pub errors: Vec<ScopeError>,
}

/// Run the declaration pass over `program`.
pub fn bind_program(program: &Program, types: &dyn TypeDatabase) -> BindResult {
    let mut binder = Binder {
        graph: ModuleGraph::new(types),
        types,
        errors: Vec::new(),
        depth: 0,
    };
    let module = binder.graph.module_scope();
    binder.graph.node_scope_ids.insert(program.id, module);
    binder.bind_statements(&program.body, module);
    debug!(
        scopes = binder.graph.scopes.len(),
        bindings = binder.graph.bindings.len(),
        errors = binder.errors.len(),
        "bind_program finished"
    );
    BindResult {
        graph: binder.graph,
        errors: binder.errors,
    }
}

struct Binder<'a> {
    graph: ModuleGraph,
    types: &'a dyn TypeDatabase,
    errors: Vec<ScopeError>,
    depth: u32,
}

impl Binder<'_> {
    fn report(&mut self, err: ScopeError) {
        trace!(%err, "declaration error");
        self.errors.push(err);
    }

    fn lower(&mut self, annotation: &TypeAnnotation, scope: ScopeId, span: Span) -> TypeId {
        match lower_annotation(&self.graph, self.types, annotation, scope, span) {
            Ok(ty) => ty,
            Err(err) => {
                self.report(err);
                TypeId::UNKNOWN
            }
        }
    }

    /// Bind a statement list, hoisting its function declarations first.
    fn bind_statements(&mut self, body: &[Node], scope: ScopeId) {
        for stmt in body {
            if let NodeKind::FunctionDeclaration(function) = &stmt.kind {
                self.declare_function(stmt, function, scope);
            }
        }
        for stmt in body {
            match &stmt.kind {
                NodeKind::FunctionDeclaration(function) => {
                    let function_scope = self
                        .graph
                        .scope_of_node(stmt.id)
                        .unwrap_or_else(|| self.declare_function(stmt, function, scope));
                    self.bind_function_body(function, function_scope);
                }
                _ => self.bind_statement(stmt, scope),
            }
        }
    }

    /// Run `bind` one level deeper. Past [`MAX_STATEMENT_DEPTH`] levels of
    /// statements and function bodies the subtree is skipped and reported;
    /// the checker stops at the same level.
    fn nested(&mut self, span: Span, bind: impl FnOnce(&mut Self)) {
        if self.depth >= MAX_STATEMENT_DEPTH {
            warn!(%span, "nesting too deep, skipping declarations");
            self.report(ScopeError::TooDeep {
                limit: MAX_STATEMENT_DEPTH,
                span,
            });
            return;
        }
        self.depth += 1;
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || bind(self));
        self.depth -= 1;
    }

    fn bind_statement(&mut self, node: &Node, scope: ScopeId) {
        self.nested(node.span, |this| this.statement(node, scope));
    }

    fn statement(&mut self, node: &Node, scope: ScopeId) {
        match &node.kind {
            NodeKind::ExpressionStatement { expression } => self.bind_expression(expression, scope),
            NodeKind::BlockStatement { body } => {
                let block = self.graph.new_scope(Some(scope), ScopeKind::Block, Some(node.id));
                self.bind_statements(body, block);
            }
            NodeKind::EmptyStatement => {}
            NodeKind::VariableDeclaration { kind, declarations } => {
                for declarator in declarations {
                    self.bind_declarator(declarator, *kind, scope);
                }
            }
            NodeKind::FunctionDeclaration(function) => {
                let function_scope = self
                    .graph
                    .scope_of_node(node.id)
                    .unwrap_or_else(|| self.declare_function(node, function, scope));
                self.bind_function_body(function, function_scope);
            }
            NodeKind::ClassDeclaration(class) => self.declare_class(node, class, scope),
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                self.bind_expression(test, scope);
                self.bind_statement(consequent, scope);
                if let Some(alternate) = alternate {
                    self.bind_statement(alternate, scope);
                }
            }
            NodeKind::WhileStatement { test, body } => {
                self.bind_expression(test, scope);
                self.bind_statement(body, scope);
            }
            NodeKind::DoWhileStatement { body, test } => {
                self.bind_statement(body, scope);
                self.bind_expression(test, scope);
            }
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => self.bind_for(init.as_deref(), test.as_deref(), update.as_deref(), body, scope),
            NodeKind::ThrowStatement { argument } => self.bind_expression(argument, scope),
            NodeKind::ReturnStatement { argument } => {
                if let Some(argument) = argument {
                    self.bind_expression(argument, scope);
                }
            }
            _ => self.bind_expression(node, scope),
        }
    }

    /// One block scope keyed by the loop body holds the `init` declarations;
    /// the test and update see it, and a block body reuses it.
    fn bind_for(
        &mut self,
        init: Option<&Node>,
        test: Option<&Node>,
        update: Option<&Node>,
        body: &Node,
        scope: ScopeId,
    ) {
        let loop_scope = self.graph.new_scope(Some(scope), ScopeKind::Block, Some(body.id));
        if let Some(init) = init {
            match init.kind {
                NodeKind::VariableDeclaration { .. } => self.bind_statement(init, loop_scope),
                _ => self.bind_expression(init, loop_scope),
            }
        }
        for expression in test.into_iter().chain(update) {
            self.bind_expression(expression, loop_scope);
        }
        match &body.kind {
            NodeKind::BlockStatement { body: statements } => {
                self.bind_statements(statements, loop_scope)
            }
            _ => self.bind_statement(body, loop_scope),
        }
    }

    fn bind_declarator(&mut self, node: &Node, kind: DeclarationKind, scope: ScopeId) {
        let NodeKind::VariableDeclarator {
            id,
            annotation,
            init,
        } = &node.kind
        else {
            self.bind_expression(node, scope);
            return;
        };
        let target = match kind {
            DeclarationKind::Var => self.graph.nearest_function_scope(scope),
            DeclarationKind::Let | DeclarationKind::Const => scope,
        };

        if let Some(name) = id.identifier_name() {
            let redeclared_var = kind == DeclarationKind::Var
                && self.graph.scope(target).binding(name).is_some();
            if !redeclared_var {
                let mut flags = BindingFlags::empty();
                if kind == DeclarationKind::Const {
                    flags |= BindingFlags::CONST;
                }
                let ty = match annotation {
                    Some(annotation) => {
                        flags |= BindingFlags::ANNOTATED;
                        self.lower(annotation, scope, id.span)
                    }
                    None => TypeId::UNKNOWN,
                };
                let binding = Binding::new(name, ty, id.span, target).with_flags(flags);
                if let Err(err) = self.graph.declare(binding) {
                    self.report(err);
                }
            }
        }

        if let Some(init) = init {
            self.bind_expression(init, scope);
        }
    }

    /// Find the function and class expressions inside an expression.
    fn bind_expression(&mut self, node: &Node, scope: ScopeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            match &current.kind {
                NodeKind::FunctionExpression(function)
                | NodeKind::ArrowFunctionExpression(function) => {
                    let function_scope = self.declare_function(current, function, scope);
                    self.bind_function_body(function, function_scope);
                }
                NodeKind::ClassExpression(class) => self.declare_class(current, class, scope),
                _ => {
                    let mut children = current.children();
                    children.reverse();
                    stack.extend(children);
                }
            }
        }
    }

    fn declare_params(&mut self, params: &[Param], scope: ScopeId) -> Vec<ParamInfo> {
        let mut infos = Vec::with_capacity(params.len());
        for param in params {
            let Some(name) = param.name.identifier_name() else {
                continue;
            };
            let mut flags = BindingFlags::PARAMETER;
            let ty = match &param.annotation {
                Some(annotation) => {
                    flags |= BindingFlags::ANNOTATED;
                    self.lower(annotation, scope, param.name.span)
                }
                None => TypeId::UNKNOWN,
            };
            let binding = Binding::new(name, ty, param.name.span, scope).with_flags(flags);
            if let Err(err) = self.graph.declare(binding) {
                self.report(err);
            }
            infos.push(ParamInfo {
                name: Some(self.types.intern_string(name)),
                type_id: ty,
                optional: false,
            });
        }
        infos
    }

    /// Create the function's scope and binding; returns the scope.
    fn declare_function(&mut self, node: &Node, function: &Function, scope: ScopeId) -> ScopeId {
        let types = self.types;
        let function_scope = self
            .graph
            .new_scope(Some(scope), ScopeKind::Function, Some(node.id));
        self.graph.node_scope_ids.insert(function.body.id, function_scope);

        let mut type_params = Vec::with_capacity(function.type_params.len());
        for name in &function.type_params {
            let param = types.fresh_type_param(name, None);
            self.graph
                .scope_mut(function_scope)
                .types
                .insert(name.clone(), param);
            type_params.push(param);
        }

        let params = self.declare_params(&function.params, function_scope);
        let return_type = match &function.return_type {
            Some(annotation) => self.lower(annotation, function_scope, node.span),
            None if has_value_return(&function.body) => TypeId::UNKNOWN,
            None => TypeId::VOID,
        };
        let ty = types.generic(type_params, types.function(params, return_type));

        let mut binding = Binding::new(node.binding_key(), ty, node.span, scope);
        if let Some(throws) = &function.throws {
            binding.throwable = Some(self.lower(throws, function_scope, node.span));
        }
        match self.graph.declare(binding) {
            Ok(id) => {
                // A named expression sees itself by name inside its body.
                let inner_name = match &node.kind {
                    NodeKind::FunctionExpression(_) => {
                        function.id.as_deref().and_then(Node::identifier_name)
                    }
                    _ => None,
                };
                if let Some(name) = inner_name
                    && let Err(err) = self.graph.bind_name(function_scope, name, id, node.span)
                {
                    self.report(err);
                }
                trace!(name = %self.graph.binding(id).name, "declared function");
            }
            Err(err) => self.report(err),
        }
        function_scope
    }

    fn bind_function_body(&mut self, function: &Function, function_scope: ScopeId) {
        self.nested(function.body.span, |this| match &function.body.kind {
            NodeKind::BlockStatement { body } => this.bind_statements(body, function_scope),
            _ => this.bind_expression(&function.body, function_scope),
        });
    }

    /// Bind a class as a constructor function returning its instance shape.
    fn declare_class(&mut self, node: &Node, class: &Class, scope: ScopeId) {
        let types = self.types;
        let class_scope = self
            .graph
            .new_scope(Some(scope), ScopeKind::Class, Some(node.id));
        let params = self.declare_params(&class.constructor_params, class_scope);

        let mut properties = Vec::with_capacity(class.properties.len());
        for property in &class.properties {
            let ty = match &property.annotation {
                Some(annotation) => self.lower(annotation, class_scope, node.span),
                None => TypeId::UNKNOWN,
            };
            properties.push(PropertyInfo::new(types.intern_string(&property.key), ty));
        }
        let instance = types.object(properties);
        let constructor = types.function(params, instance);

        let binding = Binding::new(node.binding_key(), constructor, node.span, scope);
        match self.graph.declare(binding) {
            Ok(id) => {
                if let NodeKind::ClassExpression(_) = node.kind
                    && let Some(name) = class.id.as_deref().and_then(Node::identifier_name)
                    && let Err(err) = self.graph.bind_name(class_scope, name, id, node.span)
                {
                    self.report(err);
                }
            }
            Err(err) => self.report(err),
        }
    }
}

/// Whether `body` contains `return <value>` outside nested functions. An
/// expression body (arrow function) always returns a value.
fn has_value_return(body: &Node) -> bool {
    if !matches!(body.kind, NodeKind::BlockStatement { .. }) {
        return true;
    }
    let mut stack = vec![body];
    while let Some(node) = stack.pop() {
        match &node.kind {
            NodeKind::ReturnStatement { argument: Some(_) } => return true,
            NodeKind::FunctionDeclaration(_)
            | NodeKind::FunctionExpression(_)
            | NodeKind::ArrowFunctionExpression(_)
            | NodeKind::ClassDeclaration(_)
            | NodeKind::ClassExpression(_) => {}
            _ => stack.extend(node.children()),
        }
    }
    false
}

#[cfg(test)]
#[path = "../tests/binder_tests.rs"]
mod tests;
