//! Node kinds.
//!
//! Field names follow Babel's ESTree flavour so JSON dumped by a Babel-based
//! front end deserializes directly (`"type"` selects the variant).

use crate::type_annotation::TypeAnnotation;
use serde::{Deserialize, Serialize};
use tg_common::Span;

/// Stable identity of a node within one program.
///
/// The binder keys scopes by the id of the node that creates them, and the
/// checker looks scopes up again by the same id.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(pub u32);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, rename = "nodeId")]
    pub id: NodeId,
    #[serde(default)]
    pub span: Span,
    #[serde(flatten)]
    pub kind: NodeKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    /// Identifier node naming the parameter.
    pub name: Box<Node>,
    #[serde(default)]
    pub annotation: Option<TypeAnnotation>,
}

/// Shared payload of function declarations, function expressions and arrows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    #[serde(default)]
    pub id: Option<Box<Node>>,
    #[serde(default)]
    pub type_params: Vec<String>,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub return_type: Option<TypeAnnotation>,
    /// Declared exception type (`throws` clause).
    #[serde(default)]
    pub throws: Option<TypeAnnotation>,
    /// A `BlockStatement`, or any expression for concise arrow bodies.
    pub body: Box<Node>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassProperty {
    pub key: String,
    #[serde(default)]
    pub annotation: Option<TypeAnnotation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    #[serde(default)]
    pub id: Option<Box<Node>>,
    #[serde(default)]
    pub properties: Vec<ClassProperty>,
    #[serde(default)]
    pub constructor_params: Vec<Param>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectProperty {
    pub key: String,
    pub value: Node,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum NodeKind {
    // ---- statements ----
    ExpressionStatement {
        expression: Box<Node>,
    },
    BlockStatement {
        body: Vec<Node>,
    },
    EmptyStatement,
    VariableDeclaration {
        kind: DeclarationKind,
        declarations: Vec<Node>,
    },
    VariableDeclarator {
        id: Box<Node>,
        #[serde(default)]
        annotation: Option<TypeAnnotation>,
        #[serde(default)]
        init: Option<Box<Node>>,
    },
    FunctionDeclaration(Function),
    ClassDeclaration(Class),
    IfStatement {
        test: Box<Node>,
        consequent: Box<Node>,
        #[serde(default)]
        alternate: Option<Box<Node>>,
    },
    WhileStatement {
        test: Box<Node>,
        body: Box<Node>,
    },
    DoWhileStatement {
        body: Box<Node>,
        test: Box<Node>,
    },
    ForStatement {
        #[serde(default)]
        init: Option<Box<Node>>,
        #[serde(default)]
        test: Option<Box<Node>>,
        #[serde(default)]
        update: Option<Box<Node>>,
        body: Box<Node>,
    },
    ThrowStatement {
        argument: Box<Node>,
    },
    ReturnStatement {
        #[serde(default)]
        argument: Option<Box<Node>>,
    },

    // ---- expressions ----
    Identifier {
        name: String,
    },
    NumericLiteral {
        value: f64,
    },
    StringLiteral {
        value: String,
    },
    BooleanLiteral {
        value: bool,
    },
    NullLiteral,
    TemplateLiteral {
        #[serde(default)]
        expressions: Vec<Node>,
    },
    ThisExpression,
    ObjectExpression {
        properties: Vec<ObjectProperty>,
    },
    ArrayExpression {
        elements: Vec<Node>,
    },
    FunctionExpression(Function),
    ArrowFunctionExpression(Function),
    ClassExpression(Class),
    UnaryExpression {
        operator: String,
        argument: Box<Node>,
    },
    UpdateExpression {
        operator: String,
        #[serde(default)]
        prefix: bool,
        argument: Box<Node>,
    },
    BinaryExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    LogicalExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    AssignmentExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
        #[serde(default)]
        computed: bool,
    },
    ConditionalExpression {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    CallExpression {
        callee: Box<Node>,
        #[serde(default)]
        arguments: Vec<Node>,
    },
    NewExpression {
        callee: Box<Node>,
        #[serde(default)]
        arguments: Vec<Node>,
    },
}

impl NodeKind {
    /// ESTree name of the kind, as written in `"type"`.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
            NodeKind::BlockStatement { .. } => "BlockStatement",
            NodeKind::EmptyStatement => "EmptyStatement",
            NodeKind::VariableDeclaration { .. } => "VariableDeclaration",
            NodeKind::VariableDeclarator { .. } => "VariableDeclarator",
            NodeKind::FunctionDeclaration(_) => "FunctionDeclaration",
            NodeKind::ClassDeclaration(_) => "ClassDeclaration",
            NodeKind::IfStatement { .. } => "IfStatement",
            NodeKind::WhileStatement { .. } => "WhileStatement",
            NodeKind::DoWhileStatement { .. } => "DoWhileStatement",
            NodeKind::ForStatement { .. } => "ForStatement",
            NodeKind::ThrowStatement { .. } => "ThrowStatement",
            NodeKind::ReturnStatement { .. } => "ReturnStatement",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::NumericLiteral { .. } => "NumericLiteral",
            NodeKind::StringLiteral { .. } => "StringLiteral",
            NodeKind::BooleanLiteral { .. } => "BooleanLiteral",
            NodeKind::NullLiteral => "NullLiteral",
            NodeKind::TemplateLiteral { .. } => "TemplateLiteral",
            NodeKind::ThisExpression => "ThisExpression",
            NodeKind::ObjectExpression { .. } => "ObjectExpression",
            NodeKind::ArrayExpression { .. } => "ArrayExpression",
            NodeKind::FunctionExpression(_) => "FunctionExpression",
            NodeKind::ArrowFunctionExpression(_) => "ArrowFunctionExpression",
            NodeKind::ClassExpression(_) => "ClassExpression",
            NodeKind::UnaryExpression { .. } => "UnaryExpression",
            NodeKind::UpdateExpression { .. } => "UpdateExpression",
            NodeKind::BinaryExpression { .. } => "BinaryExpression",
            NodeKind::LogicalExpression { .. } => "LogicalExpression",
            NodeKind::AssignmentExpression { .. } => "AssignmentExpression",
            NodeKind::MemberExpression { .. } => "MemberExpression",
            NodeKind::ConditionalExpression { .. } => "ConditionalExpression",
            NodeKind::CallExpression { .. } => "CallExpression",
            NodeKind::NewExpression { .. } => "NewExpression",
        }
    }
}

impl Node {
    pub fn new(id: NodeId, span: Span, kind: NodeKind) -> Self {
        Self { id, span, kind }
    }

    /// Name of an `Identifier` node.
    pub fn identifier_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }

    /// Key under which an unnamed function or class is bound.
    ///
    /// Derived from the start position so the declaration pass and the
    /// checker compute the same key independently.
    pub fn anonymous_key(&self) -> String {
        format!("[[Anonymous{}-{}]]", self.span.line, self.span.column)
    }

    /// Name a function or class node is bound under in its enclosing scope.
    ///
    /// Declarations use their identifier. Expressions (named or not) use the
    /// anonymous key; a named expression's own name is only visible inside
    /// its body.
    pub fn binding_key(&self) -> String {
        let id = match &self.kind {
            NodeKind::FunctionDeclaration(f) => f.id.as_deref(),
            NodeKind::ClassDeclaration(c) => c.id.as_deref(),
            _ => None,
        };
        id.and_then(Node::identifier_name)
            .map(str::to_string)
            .unwrap_or_else(|| self.anonymous_key())
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Node> {
        fn function_children(f: &Function) -> Vec<&Node> {
            let mut out: Vec<&Node> = Vec::new();
            out.extend(f.id.as_deref());
            out.extend(f.params.iter().map(|p| p.name.as_ref()));
            out.push(f.body.as_ref());
            out
        }
        fn class_children(c: &Class) -> Vec<&Node> {
            let mut out: Vec<&Node> = Vec::new();
            out.extend(c.id.as_deref());
            out.extend(c.constructor_params.iter().map(|p| p.name.as_ref()));
            out
        }

        match &self.kind {
            NodeKind::ExpressionStatement { expression } => vec![expression.as_ref()],
            NodeKind::BlockStatement { body } => body.iter().collect(),
            NodeKind::VariableDeclaration { declarations, .. } => declarations.iter().collect(),
            NodeKind::VariableDeclarator { id, init, .. } => {
                let mut out = vec![id.as_ref()];
                out.extend(init.as_deref());
                out
            }
            NodeKind::FunctionDeclaration(f)
            | NodeKind::FunctionExpression(f)
            | NodeKind::ArrowFunctionExpression(f) => function_children(f),
            NodeKind::ClassDeclaration(c) | NodeKind::ClassExpression(c) => class_children(c),
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                let mut out = vec![test.as_ref(), consequent.as_ref()];
                out.extend(alternate.as_deref());
                out
            }
            NodeKind::WhileStatement { test, body } => vec![test.as_ref(), body.as_ref()],
            NodeKind::DoWhileStatement { body, test } => vec![body.as_ref(), test.as_ref()],
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                let mut out: Vec<&Node> = Vec::new();
                out.extend(init.as_deref());
                out.extend(test.as_deref());
                out.extend(update.as_deref());
                out.push(body.as_ref());
                out
            }
            NodeKind::ThrowStatement { argument } => vec![argument.as_ref()],
            NodeKind::ReturnStatement { argument } => argument.as_deref().into_iter().collect(),
            NodeKind::TemplateLiteral { expressions } => expressions.iter().collect(),
            NodeKind::ObjectExpression { properties } => {
                properties.iter().map(|p| &p.value).collect()
            }
            NodeKind::ArrayExpression { elements } => elements.iter().collect(),
            NodeKind::UnaryExpression { argument, .. }
            | NodeKind::UpdateExpression { argument, .. } => vec![argument.as_ref()],
            NodeKind::BinaryExpression { left, right, .. }
            | NodeKind::LogicalExpression { left, right, .. }
            | NodeKind::AssignmentExpression { left, right, .. } => {
                vec![left.as_ref(), right.as_ref()]
            }
            NodeKind::MemberExpression {
                object, property, ..
            } => vec![object.as_ref(), property.as_ref()],
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => vec![test.as_ref(), consequent.as_ref(), alternate.as_ref()],
            NodeKind::CallExpression { callee, arguments }
            | NodeKind::NewExpression { callee, arguments } => {
                let mut out = vec![callee.as_ref()];
                out.extend(arguments.iter());
                out
            }
            NodeKind::EmptyStatement
            | NodeKind::Identifier { .. }
            | NodeKind::NumericLiteral { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::BooleanLiteral { .. }
            | NodeKind::NullLiteral
            | NodeKind::ThisExpression => Vec::new(),
        }
    }

    /// Mutable counterpart of [`Node::children`].
    pub fn children_mut(&mut self) -> Vec<&mut Node> {
        fn function_children(f: &mut Function) -> Vec<&mut Node> {
            let mut out: Vec<&mut Node> = Vec::new();
            if let Some(id) = f.id.as_deref_mut() {
                out.push(id);
            }
            out.extend(f.params.iter_mut().map(|p| p.name.as_mut()));
            out.push(f.body.as_mut());
            out
        }
        fn class_children(c: &mut Class) -> Vec<&mut Node> {
            let mut out: Vec<&mut Node> = Vec::new();
            if let Some(id) = c.id.as_deref_mut() {
                out.push(id);
            }
            out.extend(c.constructor_params.iter_mut().map(|p| p.name.as_mut()));
            out
        }

        match &mut self.kind {
            NodeKind::ExpressionStatement { expression } => vec![expression.as_mut()],
            NodeKind::BlockStatement { body } => body.iter_mut().collect(),
            NodeKind::VariableDeclaration { declarations, .. } => {
                declarations.iter_mut().collect()
            }
            NodeKind::VariableDeclarator { id, init, .. } => {
                let mut out = vec![id.as_mut()];
                out.extend(init.as_deref_mut());
                out
            }
            NodeKind::FunctionDeclaration(f)
            | NodeKind::FunctionExpression(f)
            | NodeKind::ArrowFunctionExpression(f) => function_children(f),
            NodeKind::ClassDeclaration(c) | NodeKind::ClassExpression(c) => class_children(c),
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                let mut out = vec![test.as_mut(), consequent.as_mut()];
                out.extend(alternate.as_deref_mut());
                out
            }
            NodeKind::WhileStatement { test, body } => vec![test.as_mut(), body.as_mut()],
            NodeKind::DoWhileStatement { body, test } => vec![body.as_mut(), test.as_mut()],
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                let mut out: Vec<&mut Node> = Vec::new();
                out.extend(init.as_deref_mut());
                out.extend(test.as_deref_mut());
                out.extend(update.as_deref_mut());
                out.push(body.as_mut());
                out
            }
            NodeKind::ThrowStatement { argument } => vec![argument.as_mut()],
            NodeKind::ReturnStatement { argument } => argument.as_deref_mut().into_iter().collect(),
            NodeKind::TemplateLiteral { expressions } => expressions.iter_mut().collect(),
            NodeKind::ObjectExpression { properties } => {
                properties.iter_mut().map(|p| &mut p.value).collect()
            }
            NodeKind::ArrayExpression { elements } => elements.iter_mut().collect(),
            NodeKind::UnaryExpression { argument, .. }
            | NodeKind::UpdateExpression { argument, .. } => vec![argument.as_mut()],
            NodeKind::BinaryExpression { left, right, .. }
            | NodeKind::LogicalExpression { left, right, .. }
            | NodeKind::AssignmentExpression { left, right, .. } => {
                vec![left.as_mut(), right.as_mut()]
            }
            NodeKind::MemberExpression {
                object, property, ..
            } => vec![object.as_mut(), property.as_mut()],
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => vec![test.as_mut(), consequent.as_mut(), alternate.as_mut()],
            NodeKind::CallExpression { callee, arguments }
            | NodeKind::NewExpression { callee, arguments } => {
                let mut out = vec![callee.as_mut()];
                out.extend(arguments.iter_mut());
                out
            }
            NodeKind::EmptyStatement
            | NodeKind::Identifier { .. }
            | NodeKind::NumericLiteral { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::BooleanLiteral { .. }
            | NodeKind::NullLiteral
            | NodeKind::ThisExpression => Vec::new(),
        }
    }
}

/// Root of one compilation unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default, rename = "nodeId")]
    pub id: NodeId,
    #[serde(default)]
    pub span: Span,
    pub body: Vec<Node>,
}

impl Program {
    /// Deserialize a program from ESTree-shaped JSON and assign node ids.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let mut program: Program = serde_json::from_str(text)?;
        program.renumber();
        Ok(program)
    }

    /// Assign fresh, unique ids to every node in pre-order. The program
    /// itself gets id 0.
    pub fn renumber(&mut self) {
        self.id = NodeId(0);
        let mut next = 1u32;
        let mut stack: Vec<&mut Node> = self.body.iter_mut().rev().collect();
        while let Some(node) = stack.pop() {
            node.id = NodeId(next);
            next += 1;
            let mut children = node.children_mut();
            children.reverse();
            stack.extend(children);
        }
    }
}

#[cfg(test)]
#[path = "../tests/node_tests.rs"]
mod tests;
