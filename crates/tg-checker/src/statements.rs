//! Statement driver.
//!
//! Walks a program's statements in source order, hands each one to the
//! normalizer in the scope the declaration pass recorded for it, and checks
//! function bodies. Every statement is checked against a ledger checkpoint:
//! a user-facing failure rolls the ledgers back to it and becomes a
//! diagnostic, so one broken statement leaves earlier records intact.
//! Internal failures abort the whole unit.

use crate::error::CheckError;
use crate::leaf::{LeafInferencer, LiteralInferencer};
use crate::normalize::Normalizer;
use tg_ast::{Function, Node, NodeKind, Program};
use tg_binder::{BindingId, ModuleGraph, ScopeId, bind_program};
use tg_common::limits::{
    MAX_EXPR_NORMALIZE_DEPTH, MAX_STATEMENT_DEPTH, STACK_GROW_SIZE, STACK_RED_ZONE,
};
use tg_common::{Diagnostic, Span};
use tg_solver::{TypeDatabase, format_type};
use tracing::{debug, trace};

#[derive(Clone, Debug)]
pub struct CheckerOptions {
    /// Deepest expression nesting the normalizer follows.
    pub max_depth: u32,
    /// Roll back and report failing statements instead of stopping at the
    /// first error.
    pub isolate_statements: bool,
    /// File name put into diagnostics.
    pub file_name: String,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_EXPR_NORMALIZE_DEPTH,
            isolate_statements: true,
            file_name: "input.js".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckResult {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn codes(&self) -> Vec<u32> {
        self.diagnostics.iter().map(|d| d.code).collect()
    }
}

/// Check `program` against a graph built for it by the declaration pass.
///
/// Ledgers and throwable accumulators are written into `graph`. Returns
/// `Err` only for internal failures, or for the first failure when
/// `isolate_statements` is off.
pub fn check_program(
    program: &Program,
    graph: &mut ModuleGraph,
    types: &dyn TypeDatabase,
    options: &CheckerOptions,
) -> Result<CheckResult, CheckError> {
    check_program_with(program, graph, types, &LiteralInferencer, options)
}

/// [`check_program`] with a custom leaf inferencer.
pub fn check_program_with(
    program: &Program,
    graph: &mut ModuleGraph,
    types: &dyn TypeDatabase,
    leaf: &dyn LeafInferencer,
    options: &CheckerOptions,
) -> Result<CheckResult, CheckError> {
    let module = graph
        .scope_of_node(program.id)
        .unwrap_or_else(|| graph.module_scope());
    let mut checker = StatementChecker {
        normalizer: Normalizer::new(graph, types, leaf).with_max_depth(options.max_depth),
        options,
        diagnostics: Vec::new(),
        depth: 0,
    };
    checker.check_statements(&program.body, module)?;
    debug!(
        statements = program.body.len(),
        diagnostics = checker.diagnostics.len(),
        "check_program finished"
    );
    Ok(CheckResult {
        diagnostics: checker.diagnostics,
    })
}

/// Run the declaration pass and the checker. Declaration errors are
/// reported as diagnostics ahead of the checker's own. Both passes stop at
/// the same nesting depth; that limit is reported once per location.
pub fn bind_and_check(
    program: &Program,
    types: &dyn TypeDatabase,
    options: &CheckerOptions,
) -> Result<(ModuleGraph, CheckResult), CheckError> {
    let bound = bind_program(program, types);
    let mut graph = bound.graph;
    let mut result = check_program(program, &mut graph, types, options)?;
    let mut diagnostics: Vec<Diagnostic> = bound
        .errors
        .into_iter()
        .map(|err| CheckError::from(err).to_diagnostic(&options.file_name))
        .collect();
    let reported = diagnostics.len();
    for diagnostic in result.diagnostics.drain(..) {
        let repeated = diagnostics[..reported].iter().any(|d| {
            (d.code, d.start, d.length) == (diagnostic.code, diagnostic.start, diagnostic.length)
        });
        if !repeated {
            diagnostics.push(diagnostic);
        }
    }
    result.diagnostics = diagnostics;
    Ok((graph, result))
}

struct StatementChecker<'a, 'o> {
    normalizer: Normalizer<'a>,
    options: &'o CheckerOptions,
    diagnostics: Vec<Diagnostic>,
    /// Statements and function bodies currently being walked.
    depth: u32,
}

impl StatementChecker<'_, '_> {
    /// Check a statement list: hoisted function declarations first, then the
    /// rest in order.
    fn check_statements(&mut self, body: &[Node], scope: ScopeId) -> Result<(), CheckError> {
        for stmt in body {
            if let NodeKind::FunctionDeclaration(function) = &stmt.kind {
                self.isolated(|this| this.check_function(stmt, function))?;
            }
        }
        for stmt in body {
            if !matches!(stmt.kind, NodeKind::FunctionDeclaration(_)) {
                self.isolated(|this| this.check_statement(stmt, scope))?;
            }
        }
        Ok(())
    }

    fn isolated(
        &mut self,
        check: impl FnOnce(&mut Self) -> Result<(), CheckError>,
    ) -> Result<(), CheckError> {
        if !self.options.isolate_statements {
            return check(self);
        }
        let checkpoint = self.normalizer.graph().checkpoint();
        match check(self) {
            Err(err) if !err.is_internal() => {
                debug!(%err, "statement failed, rolling back");
                self.normalizer.graph_mut().rollback(&checkpoint);
                self.diagnostics
                    .push(err.to_diagnostic(&self.options.file_name));
                Ok(())
            }
            other => other,
        }
    }

    /// Run `check` one level deeper, counting levels the way the
    /// declaration pass does so both give up at the same node.
    fn nested(
        &mut self,
        span: Span,
        check: impl FnOnce(&mut Self) -> Result<(), CheckError>,
    ) -> Result<(), CheckError> {
        if self.depth >= MAX_STATEMENT_DEPTH {
            return Err(CheckError::RecursionLimit {
                limit: MAX_STATEMENT_DEPTH,
                span,
            });
        }
        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || check(self));
        self.depth -= 1;
        result
    }

    fn check_statement(&mut self, stmt: &Node, scope: ScopeId) -> Result<(), CheckError> {
        self.nested(stmt.span, |this| this.statement(stmt, scope))
    }

    fn statement(&mut self, stmt: &Node, scope: ScopeId) -> Result<(), CheckError> {
        match &stmt.kind {
            NodeKind::ExpressionStatement { expression } => self.expression(expression, scope),
            NodeKind::BlockStatement { body } => {
                let block = self.recorded_scope(stmt)?;
                self.check_statements(body, block)
            }
            NodeKind::EmptyStatement => Ok(()),
            NodeKind::VariableDeclaration { declarations, .. } => {
                for declarator in declarations {
                    if let NodeKind::VariableDeclarator {
                        init: Some(init), ..
                    } = &declarator.kind
                    {
                        self.check_function_expressions(init)?;
                    }
                    self.normalizer.normalize(declarator, scope)?;
                }
                Ok(())
            }
            NodeKind::FunctionDeclaration(function) => self.check_function(stmt, function),
            NodeKind::ClassDeclaration(_) => {
                self.normalizer.normalize(stmt, scope)?;
                Ok(())
            }
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                self.check_function_expressions(test)?;
                self.normalizer.normalize(stmt, scope)?;
                self.check_statement(consequent, scope)?;
                match alternate {
                    Some(alternate) => self.check_statement(alternate, scope),
                    None => Ok(()),
                }
            }
            NodeKind::WhileStatement { test, body } => {
                self.check_function_expressions(test)?;
                self.normalizer.normalize(stmt, scope)?;
                self.check_statement(body, scope)
            }
            NodeKind::DoWhileStatement { body, test } => {
                self.check_statement(body, scope)?;
                self.check_function_expressions(test)?;
                self.normalizer.normalize(stmt, scope)?;
                Ok(())
            }
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                let loop_scope = self.recorded_scope(body)?;
                if let Some(init) = init {
                    match init.kind {
                        NodeKind::VariableDeclaration { .. } => {
                            self.check_statement(init, loop_scope)?
                        }
                        _ => self.expression(init, loop_scope)?,
                    }
                }
                if let Some(test) = test {
                    self.check_function_expressions(test)?;
                }
                self.normalizer.normalize(stmt, scope)?;
                if let Some(update) = update {
                    self.expression(update, loop_scope)?;
                }
                match &body.kind {
                    NodeKind::BlockStatement { body } => self.check_statements(body, loop_scope),
                    _ => self.check_statement(body, loop_scope),
                }
            }
            NodeKind::ThrowStatement { argument }
            | NodeKind::ReturnStatement {
                argument: Some(argument),
            } => {
                self.check_function_expressions(argument)?;
                self.normalizer.normalize(stmt, scope)?;
                Ok(())
            }
            NodeKind::ReturnStatement { argument: None } => {
                self.normalizer.normalize(stmt, scope)?;
                Ok(())
            }
            _ => self.expression(stmt, scope),
        }
    }

    fn expression(&mut self, expression: &Node, scope: ScopeId) -> Result<(), CheckError> {
        self.check_function_expressions(expression)?;
        self.normalizer.normalize(expression, scope)?;
        Ok(())
    }

    fn recorded_scope(&self, node: &Node) -> Result<ScopeId, CheckError> {
        self.normalizer
            .graph()
            .scope_of_node(node.id)
            .ok_or(CheckError::MissingScope {
                node: node.kind.name(),
                span: node.span,
            })
    }

    /// Check the bodies of the function expressions and arrows inside
    /// `expression` (not descending into them), so their throwables are
    /// known before the expression itself is normalized.
    fn check_function_expressions(&mut self, expression: &Node) -> Result<(), CheckError> {
        let mut stack = vec![expression];
        while let Some(node) = stack.pop() {
            match &node.kind {
                NodeKind::FunctionExpression(function)
                | NodeKind::ArrowFunctionExpression(function) => {
                    self.check_function(node, function)?
                }
                NodeKind::ClassExpression(_) => {}
                _ => stack.extend(node.children()),
            }
        }
        Ok(())
    }

    /// Check a function body in its own scope, then hand what the body
    /// throws to the function's binding.
    fn check_function(&mut self, node: &Node, function: &Function) -> Result<(), CheckError> {
        let scope = self.recorded_scope(node)?;
        self.nested(function.body.span, |this| match &function.body.kind {
            NodeKind::BlockStatement { body } => this.check_statements(body, scope),
            _ => this.isolated(|this| this.expression(&function.body, scope)),
        })?;
        if let Some(binding) = self.function_binding(node, scope) {
            self.settle_throwable(binding, scope);
        }
        Ok(())
    }

    fn function_binding(&self, node: &Node, scope: ScopeId) -> Option<BindingId> {
        let graph = self.normalizer.graph();
        let parent = graph.scope(scope).parent?;
        graph.scope(parent).binding(&node.binding_key())
    }

    fn settle_throwable(&mut self, binding: BindingId, scope: ScopeId) {
        let types = self.normalizer.types();
        let graph = self.normalizer.graph_mut();
        let Some(thrown) = graph.collect_throwable(types, scope) else {
            return;
        };
        let entry = graph.binding(binding);
        let throwable = match entry.throwable {
            Some(declared) => types.union2(declared, thrown),
            None => thrown,
        };
        trace!(
            name = %entry.name,
            throws = %format_type(types, thrown),
            "function throwable settled"
        );
        let ty = entry.ty;
        graph.refine_binding(binding, ty, Some(throwable));
    }
}

#[cfg(test)]
#[path = "../tests/statements_tests.rs"]
mod tests;
