//! Expression tree node model
//!
//! A tree is a closed set of node kinds, each carrying its static result type.
//! Which operator or method a node stands for is fixed when the tree is built
//! (an explicit [`BinaryOp`] tag, a method name plus its declaring type), so
//! the renderer never has to look anything up by name at render time.
//!
//! Trees are immutable once built and owned by the caller; rendering only
//! borrows them.
//!
//! ## Serialized form
//!
//! Nodes serialize internally tagged by `kind` with camelCase fields, and
//! types serialize as their source text:
//!
//! ```json
//! {
//!   "kind": "property",
//!   "receiver": { "kind": "parameter", "name": "p", "type": "Person" },
//!   "name": "Age",
//!   "type": "int"
//! }
//! ```

mod builder;
mod literal;
mod types;

pub use builder::*;
pub use literal::{DecimalLiteral, Literal};
pub use types::TypeRef;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Expression tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Expr {
    Parameter(ParameterExpr),
    Constant(ConstantExpr),
    Property(PropertyExpr),
    Index(IndexExpr),
    Binary(BinaryExpr),
    Conditional(ConditionalExpr),
    Call(MethodCallExpr),
    Lambda(LambdaExpr),
}

impl Expr {
    /// Static result type of this node
    pub fn result_type(&self) -> &TypeRef {
        match self {
            Expr::Parameter(node) => &node.ty,
            Expr::Constant(node) => &node.ty,
            Expr::Property(node) => &node.ty,
            Expr::Index(node) => &node.ty,
            Expr::Binary(node) => &node.ty,
            Expr::Conditional(node) => &node.ty,
            Expr::Call(node) => &node.ty,
            Expr::Lambda(node) => &node.ty,
        }
    }

    /// Node kind name used in diagnostics and logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Parameter(_) => "Parameter",
            Expr::Constant(_) => "Constant",
            Expr::Property(_) => "PropertyAccess",
            Expr::Index(_) => "IndexAccess",
            Expr::Binary(_) => "BinaryOp",
            Expr::Conditional(_) => "Conditional",
            Expr::Call(_) => "MethodCall",
            Expr::Lambda(_) => "Lambda",
        }
    }
}

/// Named, typed parameter of a lambda
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterExpr {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

/// Literal or captured constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstantExpr {
    pub value: Literal,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Name of the enclosing-scope variable this value was captured from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyExpr {
    pub receiver: Box<Expr>,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexExpr {
    pub receiver: Box<Expr>,
    pub arguments: Vec<Expr>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalExpr {
    pub test: Box<Expr>,
    pub if_true: Box<Expr>,
    pub if_false: Box<Expr>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

/// Instance call when `receiver` is present, static call otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodCallExpr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Box<Expr>>,
    pub method: String,
    pub declaring_type: TypeRef,
    /// Generic arguments of the method itself; empty for non-generic methods
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<TypeRef>,
    #[serde(default)]
    pub arguments: Vec<Expr>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl MethodCallExpr {
    pub fn is_static(&self) -> bool {
        self.receiver.is_none()
    }

    pub fn is_generic(&self) -> bool {
        !self.type_arguments.is_empty()
    }

    /// Attach generic method arguments
    pub fn with_type_arguments(mut self, type_arguments: Vec<TypeRef>) -> Self {
        self.type_arguments = type_arguments;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaExpr {
    pub parameters: Vec<ParameterExpr>,
    pub body: Box<Expr>,
    /// Declared delegate type, e.g. `Func<Person, decimal>`
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl LambdaExpr {
    /// Result type of the body
    pub fn return_type(&self) -> &TypeRef {
        self.body.result_type()
    }
}

/// Binary operator tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    LessThan,
    GreaterThan,
    Equal,
    NotEqual,
    AndAlso,
    OrElse,
    Coalesce,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 10] = [
        BinaryOp::Add,
        BinaryOp::Subtract,
        BinaryOp::Multiply,
        BinaryOp::LessThan,
        BinaryOp::GreaterThan,
        BinaryOp::Equal,
        BinaryOp::NotEqual,
        BinaryOp::AndAlso,
        BinaryOp::OrElse,
        BinaryOp::Coalesce,
    ];

    /// Source symbol of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::LessThan => "<",
            BinaryOp::GreaterThan => ">",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::AndAlso => "&&",
            BinaryOp::OrElse => "||",
            BinaryOp::Coalesce => "??",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::LessThan | BinaryOp::GreaterThan | BinaryOp::Equal | BinaryOp::NotEqual
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::AndAlso | BinaryOp::OrElse)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
