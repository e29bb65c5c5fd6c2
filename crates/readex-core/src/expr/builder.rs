//! Builder API for assembling expression trees
//!
//! # Example
//!
//! ```rust
//! use readex_core::expr::{constant, lambda, less_than, parameter, property, TypeRef};
//!
//! let p = parameter("p", TypeRef::named("Person"));
//! let body = less_than(property(p.to_expr(), "Age", TypeRef::Int), constant(30, TypeRef::Int));
//! let tree = lambda(vec![p], body);
//! ```

use super::{
    BinaryExpr, BinaryOp, ConditionalExpr, ConstantExpr, DecimalLiteral, Expr, IndexExpr,
    LambdaExpr, Literal, MethodCallExpr, ParameterExpr, PropertyExpr, TypeRef,
};
use crate::result::Result;

impl ParameterExpr {
    /// Reference to this parameter inside a lambda body
    pub fn to_expr(&self) -> Expr {
        Expr::Parameter(self.clone())
    }
}

impl From<ParameterExpr> for Expr {
    fn from(value: ParameterExpr) -> Self {
        Expr::Parameter(value)
    }
}

impl From<MethodCallExpr> for Expr {
    fn from(value: MethodCallExpr) -> Self {
        Expr::Call(value)
    }
}

pub fn parameter(name: impl Into<String>, ty: TypeRef) -> ParameterExpr {
    ParameterExpr {
        name: name.into(),
        ty,
    }
}

pub fn constant(value: impl Into<Literal>, ty: TypeRef) -> Expr {
    Expr::Constant(ConstantExpr {
        value: value.into(),
        ty,
        captured_from: None,
    })
}

/// Typed `null`
pub fn null(ty: TypeRef) -> Expr {
    constant(Literal::Null, ty)
}

/// `decimal` constant from its exact text
pub fn decimal(text: &str) -> Result<Expr> {
    let value: DecimalLiteral = text.parse()?;
    Ok(constant(value, TypeRef::Decimal))
}

/// Constant whose value was captured from the variable `name`
pub fn captured(name: impl Into<String>, value: impl Into<Literal>, ty: TypeRef) -> Expr {
    Expr::Constant(ConstantExpr {
        value: value.into(),
        ty,
        captured_from: Some(name.into()),
    })
}

pub fn property(receiver: Expr, name: impl Into<String>, ty: TypeRef) -> Expr {
    Expr::Property(PropertyExpr {
        receiver: Box::new(receiver),
        name: name.into(),
        ty,
    })
}

pub fn index(receiver: Expr, arguments: Vec<Expr>, ty: TypeRef) -> Expr {
    Expr::Index(IndexExpr {
        receiver: Box::new(receiver),
        arguments,
        ty,
    })
}

pub fn binary(op: BinaryOp, left: Expr, right: Expr, ty: TypeRef) -> Expr {
    Expr::Binary(BinaryExpr {
        op,
        left: Box::new(left),
        right: Box::new(right),
        ty,
    })
}

fn arithmetic(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let ty = left.result_type().clone();
    binary(op, left, right, ty)
}

fn predicate(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    binary(op, left, right, TypeRef::Bool)
}

pub fn add(left: Expr, right: Expr) -> Expr {
    arithmetic(BinaryOp::Add, left, right)
}

pub fn subtract(left: Expr, right: Expr) -> Expr {
    arithmetic(BinaryOp::Subtract, left, right)
}

pub fn multiply(left: Expr, right: Expr) -> Expr {
    arithmetic(BinaryOp::Multiply, left, right)
}

pub fn less_than(left: Expr, right: Expr) -> Expr {
    predicate(BinaryOp::LessThan, left, right)
}

pub fn greater_than(left: Expr, right: Expr) -> Expr {
    predicate(BinaryOp::GreaterThan, left, right)
}

pub fn equal(left: Expr, right: Expr) -> Expr {
    predicate(BinaryOp::Equal, left, right)
}

pub fn not_equal(left: Expr, right: Expr) -> Expr {
    predicate(BinaryOp::NotEqual, left, right)
}

pub fn and_also(left: Expr, right: Expr) -> Expr {
    predicate(BinaryOp::AndAlso, left, right)
}

pub fn or_else(left: Expr, right: Expr) -> Expr {
    predicate(BinaryOp::OrElse, left, right)
}

/// `left ?? right`, typed as the non-nullable widening of its operands
pub fn coalesce(left: Expr, right: Expr) -> Expr {
    let ty = if right.result_type().is_nullable() {
        right.result_type().clone()
    } else {
        left.result_type().non_nullable().clone()
    };
    binary(BinaryOp::Coalesce, left, right, ty)
}

/// `test ? if_true : if_false`, typed as `if_true`
pub fn condition(test: Expr, if_true: Expr, if_false: Expr) -> Expr {
    let ty = if_true.result_type().clone();
    Expr::Conditional(ConditionalExpr {
        test: Box::new(test),
        if_true: Box::new(if_true),
        if_false: Box::new(if_false),
        ty,
    })
}

/// Instance method call on `receiver`
pub fn call(
    receiver: Expr,
    method: impl Into<String>,
    declaring_type: TypeRef,
    arguments: Vec<Expr>,
    ty: TypeRef,
) -> Expr {
    Expr::Call(MethodCallExpr {
        receiver: Some(Box::new(receiver)),
        method: method.into(),
        declaring_type,
        type_arguments: Vec::new(),
        arguments,
        ty,
    })
}

/// Static method call on `declaring_type`
pub fn static_call(
    declaring_type: TypeRef,
    method: impl Into<String>,
    arguments: Vec<Expr>,
    ty: TypeRef,
) -> Expr {
    Expr::Call(MethodCallExpr {
        receiver: None,
        method: method.into(),
        declaring_type,
        type_arguments: Vec::new(),
        arguments,
        ty,
    })
}

/// Static call of a generic method such as `Enumerable.Where<T>`
pub fn generic_static_call(
    declaring_type: TypeRef,
    method: impl Into<String>,
    type_arguments: Vec<TypeRef>,
    arguments: Vec<Expr>,
    ty: TypeRef,
) -> Expr {
    MethodCallExpr {
        receiver: None,
        method: method.into(),
        declaring_type,
        type_arguments,
        arguments,
        ty,
    }
    .into()
}

/// Lambda over `parameters`, typed `Func<parameter types..., body type>`
pub fn lambda(parameters: Vec<ParameterExpr>, body: Expr) -> Expr {
    let ty = TypeRef::function(
        parameters.iter().map(|p| p.ty.clone()).collect(),
        body.result_type().clone(),
    );
    Expr::Lambda(LambdaExpr {
        parameters,
        body: Box::new(body),
        ty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coalesce_widening() {
        let city = constant(Literal::Null, TypeRef::String);
        let expr = coalesce(city, constant("Unknown", TypeRef::String));
        assert_eq!(expr.result_type(), &TypeRef::String);

        let count = null(TypeRef::Int.nullable());
        let expr = coalesce(count, constant(0, TypeRef::Int));
        assert_eq!(expr.result_type(), &TypeRef::Int);

        let expr = coalesce(null(TypeRef::Int.nullable()), null(TypeRef::Int.nullable()));
        assert_eq!(expr.result_type(), &TypeRef::Int.nullable());
    }

    #[test]
    fn test_decimal_builder() {
        assert!(decimal("1.15").is_ok());
        assert!(decimal("1,15").is_err());
    }

    #[test]
    fn test_captured_constant() {
        let Expr::Constant(node) = captured("threshold", 30, TypeRef::Int) else {
            panic!("Expected constant");
        };
        assert_eq!(node.captured_from.as_deref(), Some("threshold"));
    }
}
