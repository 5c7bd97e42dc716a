//! Programmatic AST construction.
//!
//! Used by tests, benchmarks and hosts that already own a syntax tree in
//! another shape. Every node gets a fresh `NodeId` and a distinct start
//! column so anonymous binding keys never collide.

use crate::node::{
    Class, ClassProperty, DeclarationKind, Function, Node, NodeId, NodeKind, ObjectProperty,
    Param, Program,
};
use crate::type_annotation::TypeAnnotation;
use tg_common::Span;

#[derive(Debug)]
pub struct AstBuilder {
    next_id: u32,
    offset: u32,
    line: u32,
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AstBuilder {
    pub fn new() -> Self {
        // Id 0 is reserved for the program.
        Self {
            next_id: 1,
            offset: 0,
            line: 1,
        }
    }

    /// Move subsequently created nodes to a new source line.
    pub fn newline(&mut self) {
        self.line += 1;
    }

    fn node(&mut self, kind: NodeKind) -> Node {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let span = Span::new(self.offset, self.offset + 1, self.line, self.offset);
        self.offset += 1;
        Node::new(id, span, kind)
    }

    pub fn program(&mut self, body: Vec<Node>) -> Program {
        let end = self.offset;
        Program {
            id: NodeId(0),
            span: Span::new(0, end, 1, 0),
            body,
        }
    }

    // ---- expressions ----

    pub fn ident(&mut self, name: &str) -> Node {
        self.node(NodeKind::Identifier {
            name: name.to_string(),
        })
    }

    pub fn num(&mut self, value: f64) -> Node {
        self.node(NodeKind::NumericLiteral { value })
    }

    pub fn str_lit(&mut self, value: &str) -> Node {
        self.node(NodeKind::StringLiteral {
            value: value.to_string(),
        })
    }

    pub fn bool_lit(&mut self, value: bool) -> Node {
        self.node(NodeKind::BooleanLiteral { value })
    }

    pub fn null(&mut self) -> Node {
        self.node(NodeKind::NullLiteral)
    }

    pub fn this(&mut self) -> Node {
        self.node(NodeKind::ThisExpression)
    }

    pub fn template(&mut self, expressions: Vec<Node>) -> Node {
        self.node(NodeKind::TemplateLiteral { expressions })
    }

    pub fn object(&mut self, properties: Vec<(&str, Node)>) -> Node {
        let properties = properties
            .into_iter()
            .map(|(key, value)| ObjectProperty {
                key: key.to_string(),
                value,
            })
            .collect();
        self.node(NodeKind::ObjectExpression { properties })
    }

    pub fn array(&mut self, elements: Vec<Node>) -> Node {
        self.node(NodeKind::ArrayExpression { elements })
    }

    pub fn unary(&mut self, operator: &str, argument: Node) -> Node {
        self.node(NodeKind::UnaryExpression {
            operator: operator.to_string(),
            argument: Box::new(argument),
        })
    }

    pub fn update(&mut self, operator: &str, prefix: bool, argument: Node) -> Node {
        self.node(NodeKind::UpdateExpression {
            operator: operator.to_string(),
            prefix,
            argument: Box::new(argument),
        })
    }

    pub fn binary(&mut self, operator: &str, left: Node, right: Node) -> Node {
        self.node(NodeKind::BinaryExpression {
            operator: operator.to_string(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn logical(&mut self, operator: &str, left: Node, right: Node) -> Node {
        self.node(NodeKind::LogicalExpression {
            operator: operator.to_string(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn assign(&mut self, operator: &str, left: Node, right: Node) -> Node {
        self.node(NodeKind::AssignmentExpression {
            operator: operator.to_string(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// `object.property`
    pub fn member(&mut self, object: Node, property: &str) -> Node {
        let property = self.ident(property);
        self.node(NodeKind::MemberExpression {
            object: Box::new(object),
            property: Box::new(property),
            computed: false,
        })
    }

    /// `object[property]`
    pub fn computed_member(&mut self, object: Node, property: Node) -> Node {
        self.node(NodeKind::MemberExpression {
            object: Box::new(object),
            property: Box::new(property),
            computed: true,
        })
    }

    pub fn conditional(&mut self, test: Node, consequent: Node, alternate: Node) -> Node {
        self.node(NodeKind::ConditionalExpression {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    pub fn call(&mut self, callee: Node, arguments: Vec<Node>) -> Node {
        self.node(NodeKind::CallExpression {
            callee: Box::new(callee),
            arguments,
        })
    }

    pub fn new_expr(&mut self, callee: Node, arguments: Vec<Node>) -> Node {
        self.node(NodeKind::NewExpression {
            callee: Box::new(callee),
            arguments,
        })
    }

    pub fn param(&mut self, name: &str, annotation: Option<TypeAnnotation>) -> Param {
        Param {
            name: Box::new(self.ident(name)),
            annotation,
        }
    }

    fn function(
        &mut self,
        name: Option<&str>,
        params: Vec<Param>,
        return_type: Option<TypeAnnotation>,
        body: Node,
    ) -> Function {
        let id = name.map(|n| Box::new(self.ident(n)));
        Function {
            id,
            type_params: Vec::new(),
            params,
            return_type,
            throws: None,
            body: Box::new(body),
        }
    }

    pub fn function_expr(
        &mut self,
        name: Option<&str>,
        params: Vec<Param>,
        return_type: Option<TypeAnnotation>,
        body: Node,
    ) -> Node {
        let function = self.function(name, params, return_type, body);
        self.node(NodeKind::FunctionExpression(function))
    }

    pub fn arrow(
        &mut self,
        params: Vec<Param>,
        return_type: Option<TypeAnnotation>,
        body: Node,
    ) -> Node {
        let function = self.function(None, params, return_type, body);
        self.node(NodeKind::ArrowFunctionExpression(function))
    }

    pub fn class_expr(
        &mut self,
        name: Option<&str>,
        properties: Vec<(&str, TypeAnnotation)>,
    ) -> Node {
        let class = self.class(name, properties);
        self.node(NodeKind::ClassExpression(class))
    }

    fn class(&mut self, name: Option<&str>, properties: Vec<(&str, TypeAnnotation)>) -> Class {
        let id = name.map(|n| Box::new(self.ident(n)));
        Class {
            id,
            properties: properties
                .into_iter()
                .map(|(key, annotation)| ClassProperty {
                    key: key.to_string(),
                    annotation: Some(annotation),
                })
                .collect(),
            constructor_params: Vec::new(),
        }
    }

    // ---- statements ----

    pub fn expr_stmt(&mut self, expression: Node) -> Node {
        self.node(NodeKind::ExpressionStatement {
            expression: Box::new(expression),
        })
    }

    pub fn block(&mut self, body: Vec<Node>) -> Node {
        self.node(NodeKind::BlockStatement { body })
    }

    pub fn empty(&mut self) -> Node {
        self.node(NodeKind::EmptyStatement)
    }

    pub fn declarator(
        &mut self,
        name: &str,
        annotation: Option<TypeAnnotation>,
        init: Option<Node>,
    ) -> Node {
        let id = self.ident(name);
        self.node(NodeKind::VariableDeclarator {
            id: Box::new(id),
            annotation,
            init: init.map(Box::new),
        })
    }

    pub fn var_decl(&mut self, kind: DeclarationKind, declarations: Vec<Node>) -> Node {
        self.node(NodeKind::VariableDeclaration { kind, declarations })
    }

    /// `let name[: annotation] [= init];`
    pub fn let_decl(
        &mut self,
        name: &str,
        annotation: Option<TypeAnnotation>,
        init: Option<Node>,
    ) -> Node {
        let declarator = self.declarator(name, annotation, init);
        self.var_decl(DeclarationKind::Let, vec![declarator])
    }

    /// `const name[: annotation] = init;`
    pub fn const_decl(
        &mut self,
        name: &str,
        annotation: Option<TypeAnnotation>,
        init: Node,
    ) -> Node {
        let declarator = self.declarator(name, annotation, Some(init));
        self.var_decl(DeclarationKind::Const, vec![declarator])
    }

    pub fn function_decl(
        &mut self,
        name: &str,
        params: Vec<Param>,
        return_type: Option<TypeAnnotation>,
        body: Vec<Node>,
    ) -> Node {
        let body = self.block(body);
        let function = self.function(Some(name), params, return_type, body);
        self.node(NodeKind::FunctionDeclaration(function))
    }

    /// Function declaration with explicit type parameters and `throws` clause.
    pub fn function_decl_full(&mut self, name: &str, function: FunctionParts) -> Node {
        let body = self.block(function.body);
        let mut built = self.function(Some(name), function.params, function.return_type, body);
        built.type_params = function.type_params;
        built.throws = function.throws;
        self.node(NodeKind::FunctionDeclaration(built))
    }

    pub fn class_decl(&mut self, name: &str, properties: Vec<(&str, TypeAnnotation)>) -> Node {
        let class = self.class(Some(name), properties);
        self.node(NodeKind::ClassDeclaration(class))
    }

    pub fn if_stmt(&mut self, test: Node, consequent: Node, alternate: Option<Node>) -> Node {
        self.node(NodeKind::IfStatement {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: alternate.map(Box::new),
        })
    }

    pub fn while_stmt(&mut self, test: Node, body: Node) -> Node {
        self.node(NodeKind::WhileStatement {
            test: Box::new(test),
            body: Box::new(body),
        })
    }

    pub fn do_while(&mut self, body: Node, test: Node) -> Node {
        self.node(NodeKind::DoWhileStatement {
            body: Box::new(body),
            test: Box::new(test),
        })
    }

    pub fn for_stmt(
        &mut self,
        init: Option<Node>,
        test: Option<Node>,
        update: Option<Node>,
        body: Node,
    ) -> Node {
        self.node(NodeKind::ForStatement {
            init: init.map(Box::new),
            test: test.map(Box::new),
            update: update.map(Box::new),
            body: Box::new(body),
        })
    }

    pub fn throw(&mut self, argument: Node) -> Node {
        self.node(NodeKind::ThrowStatement {
            argument: Box::new(argument),
        })
    }

    pub fn ret(&mut self, argument: Option<Node>) -> Node {
        self.node(NodeKind::ReturnStatement {
            argument: argument.map(Box::new),
        })
    }
}

/// Everything `function_decl_full` needs besides the name.
#[derive(Debug, Default)]
pub struct FunctionParts {
    pub type_params: Vec<String>,
    pub params: Vec<Param>,
    pub return_type: Option<TypeAnnotation>,
    pub throws: Option<TypeAnnotation>,
    pub body: Vec<Node>,
}
