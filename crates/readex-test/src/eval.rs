//! Reference evaluator for sample trees
//!
//! Interprets a Lambda against argument values so tests can check that a tree
//! computes what its rendering says. Covers the node set and the handful of
//! framework methods the sample trees call; anything else is an
//! [`EvalError::UnsupportedMethod`].

use crate::decimal::Decimal;
use crate::value::Value;
use readex_core::expr::{
    BinaryExpr, BinaryOp, ConstantExpr, Expr, LambdaExpr, Literal, MethodCallExpr, TypeRef,
};
use std::cmp::Ordering;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Expected a lambda, found {0}")]
    NotALambda(&'static str),

    #[error("Lambda takes {expected} arguments, {found} given")]
    ArityMismatch { expected: usize, found: usize },

    #[error("Unbound parameter '{0}'")]
    UnboundParameter(String),

    #[error("Null reference accessing '{member}'")]
    NullReference { member: String },

    #[error("'{receiver}' has no member '{member}'")]
    UnknownMember {
        receiver: &'static str,
        member: String,
    },

    #[error("Unsupported method {declaring_type}.{method}")]
    UnsupportedMethod {
        declaring_type: String,
        method: String,
    },

    #[error("Index {index} is out of range for length {length}")]
    IndexOutOfRange { index: i64, length: usize },

    #[error("Type error: expected {expected}, found {found}")]
    TypeError {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("Invalid decimal literal: {0}")]
    InvalidDecimal(String),

    #[error("Cannot evaluate {0} nodes")]
    Unsupported(&'static str),
}

pub type EvalResult<T> = std::result::Result<T, EvalError>;

/// Apply the lambda `expr` to `arguments`
pub fn evaluate(expr: &Expr, arguments: &[Value]) -> EvalResult<Value> {
    let Expr::Lambda(lambda) = expr else {
        return Err(EvalError::NotALambda(expr.kind_name()));
    };
    Evaluator::bind(lambda, arguments)?.eval(&lambda.body)
}

/// Parameter bindings for one lambda application
pub struct Evaluator<'a> {
    bindings: HashMap<&'a str, Value>,
}

impl<'a> Evaluator<'a> {
    pub fn bind(lambda: &'a LambdaExpr, arguments: &[Value]) -> EvalResult<Self> {
        if lambda.parameters.len() != arguments.len() {
            return Err(EvalError::ArityMismatch {
                expected: lambda.parameters.len(),
                found: arguments.len(),
            });
        }
        debug!(parameters = lambda.parameters.len(), "Binding lambda arguments");
        let bindings = lambda
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .zip(arguments.iter().cloned())
            .collect();
        Ok(Self { bindings })
    }

    pub fn eval(&self, expr: &Expr) -> EvalResult<Value> {
        trace!(kind = expr.kind_name(), "Evaluating");
        match expr {
            Expr::Parameter(node) => self
                .bindings
                .get(node.name.as_str())
                .cloned()
                .ok_or_else(|| EvalError::UnboundParameter(node.name.clone())),
            Expr::Constant(node) => constant_value(node),
            Expr::Property(node) => {
                let receiver = self.eval(&node.receiver)?;
                member(receiver, &node.name)
            }
            Expr::Index(node) => {
                let receiver = self.eval(&node.receiver)?;
                let [position] = node.arguments.as_slice() else {
                    return Err(EvalError::Unsupported("multi-argument IndexAccess"));
                };
                let position = expect_int(self.eval(position)?)?;
                char_at(&receiver, position)
            }
            Expr::Binary(node) => self.eval_binary(node),
            Expr::Conditional(node) => match self.eval(&node.test)? {
                Value::Bool(true) => self.eval(&node.if_true),
                Value::Bool(false) => self.eval(&node.if_false),
                other => Err(EvalError::TypeError {
                    expected: "bool",
                    found: other.type_name(),
                }),
            },
            Expr::Call(node) => self.eval_call(node),
            Expr::Lambda(_) => Err(EvalError::Unsupported("nested Lambda")),
        }
    }

    fn eval_binary(&self, node: &BinaryExpr) -> EvalResult<Value> {
        // Short-circuiting operators evaluate the right side lazily.
        match node.op {
            BinaryOp::AndAlso => {
                return if expect_bool(self.eval(&node.left)?)? {
                    self.eval(&node.right)
                } else {
                    Ok(Value::Bool(false))
                };
            }
            BinaryOp::OrElse => {
                return if expect_bool(self.eval(&node.left)?)? {
                    Ok(Value::Bool(true))
                } else {
                    self.eval(&node.right)
                };
            }
            BinaryOp::Coalesce => {
                let left = self.eval(&node.left)?;
                return if left.is_null() {
                    self.eval(&node.right)
                } else {
                    Ok(left)
                };
            }
            _ => {}
        }

        let left = self.eval(&node.left)?;
        let right = self.eval(&node.right)?;
        match node.op {
            BinaryOp::Add if left.as_str().is_some() || right.as_str().is_some() => {
                Ok(Value::String(format!("{}{}", as_text(&left), as_text(&right))))
            }
            BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Multiply => {
                arithmetic(node.op, left, right)
            }
            BinaryOp::LessThan => Ok(Value::Bool(
                compare(&left, &right)? == Some(Ordering::Less),
            )),
            BinaryOp::GreaterThan => Ok(Value::Bool(
                compare(&left, &right)? == Some(Ordering::Greater),
            )),
            BinaryOp::Equal => Ok(Value::Bool(equals(&left, &right)?)),
            BinaryOp::NotEqual => Ok(Value::Bool(!equals(&left, &right)?)),
            BinaryOp::AndAlso | BinaryOp::OrElse | BinaryOp::Coalesce => {
                Err(EvalError::Unsupported("BinaryOp"))
            }
        }
    }

    fn eval_call(&self, node: &MethodCallExpr) -> EvalResult<Value> {
        let arguments = node
            .arguments
            .iter()
            .map(|argument| self.eval(argument))
            .collect::<EvalResult<Vec<_>>>()?;
        let unsupported = || EvalError::UnsupportedMethod {
            declaring_type: node.declaring_type.to_string(),
            method: node.method.clone(),
        };

        let Some(receiver) = &node.receiver else {
            return match (&node.declaring_type, node.method.as_str()) {
                (TypeRef::String, "Concat") => Ok(Value::String(
                    arguments.iter().map(as_text).collect::<Vec<_>>().concat(),
                )),
                (TypeRef::Named { name, .. }, method @ ("Min" | "Max")) if name == "Math" => {
                    let [a, b] = arguments.as_slice() else {
                        return Err(unsupported());
                    };
                    let ordering = compare(a, b)?.ok_or(EvalError::TypeError {
                        expected: "comparable operands",
                        found: a.type_name(),
                    })?;
                    let pick_first = (method == "Min") == (ordering != Ordering::Greater);
                    Ok(if pick_first { a.clone() } else { b.clone() })
                }
                _ => Err(unsupported()),
            };
        };

        let receiver = self.eval(receiver)?;
        match (&receiver, node.method.as_str(), arguments.as_slice()) {
            (Value::Null, method, _) => Err(EvalError::NullReference {
                member: method.to_string(),
            }),
            (Value::String(s), "ToUpper", []) => Ok(Value::String(s.to_uppercase())),
            (Value::String(s), "ToLower", []) => Ok(Value::String(s.to_lowercase())),
            (Value::String(s), "Trim", []) => Ok(Value::String(s.trim().to_string())),
            (Value::String(s), "Substring", [start, length]) => {
                substring(s, expect_int(start.clone())?, expect_int(length.clone())?)
            }
            (value, "ToString", []) => Ok(Value::String(as_text(value))),
            _ => Err(unsupported()),
        }
    }
}

fn constant_value(node: &ConstantExpr) -> EvalResult<Value> {
    Ok(match (&node.value, node.ty.non_nullable()) {
        (Literal::Null, _) => Value::Null,
        (Literal::Bool(value), _) => Value::Bool(*value),
        (Literal::Integer(value), TypeRef::Decimal) => Value::Decimal(Decimal::from(*value)),
        (Literal::Integer(value), TypeRef::Double) => Value::Double(*value as f64),
        (Literal::Integer(value), _) => Value::Int(*value),
        (Literal::Decimal(value), _) => Value::Decimal(value.as_str().parse()?),
        (Literal::Double(value), _) => Value::Double(*value),
        (Literal::Char(value), _) => Value::Char(*value),
        (Literal::String(value), _) => Value::String(value.clone()),
    })
}

fn member(receiver: Value, name: &str) -> EvalResult<Value> {
    match receiver {
        Value::Null => Err(EvalError::NullReference {
            member: name.to_string(),
        }),
        Value::String(s) if name == "Length" => Ok(Value::Int(s.chars().count() as i64)),
        Value::Record(mut fields) => fields.remove(name).ok_or(EvalError::UnknownMember {
            receiver: "object",
            member: name.to_string(),
        }),
        other => Err(EvalError::UnknownMember {
            receiver: other.type_name(),
            member: name.to_string(),
        }),
    }
}

fn char_at(receiver: &Value, position: i64) -> EvalResult<Value> {
    let Value::String(s) = receiver else {
        return match receiver {
            Value::Null => Err(EvalError::NullReference {
                member: "this[]".to_string(),
            }),
            other => Err(EvalError::TypeError {
                expected: "string",
                found: other.type_name(),
            }),
        };
    };
    let length = s.chars().count();
    usize::try_from(position)
        .ok()
        .and_then(|i| s.chars().nth(i))
        .map(Value::Char)
        .ok_or(EvalError::IndexOutOfRange {
            index: position,
            length,
        })
}

fn substring(s: &str, start: i64, length: i64) -> EvalResult<Value> {
    let total = s.chars().count();
    let out_of_range = |index| EvalError::IndexOutOfRange {
        index,
        length: total,
    };
    let start_index = usize::try_from(start).map_err(|_| out_of_range(start))?;
    let count = usize::try_from(length).map_err(|_| out_of_range(length))?;
    if start_index + count > total {
        return Err(out_of_range(start + length));
    }
    Ok(Value::String(s.chars().skip(start_index).take(count).collect()))
}

/// String form used by concatenation and `ToString`; null is empty
fn as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn expect_bool(value: Value) -> EvalResult<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(EvalError::TypeError {
            expected: "bool",
            found: other.type_name(),
        }),
    }
}

fn expect_int(value: Value) -> EvalResult<i64> {
    match value {
        Value::Int(i) => Ok(i),
        other => Err(EvalError::TypeError {
            expected: "int",
            found: other.type_name(),
        }),
    }
}

/// Operands promoted to a common numeric representation
enum Numbers {
    Int(i64, i64),
    Decimal(Decimal, Decimal),
    Double(f64, f64),
}

fn promote(left: &Value, right: &Value) -> Option<Numbers> {
    use Value::{Char, Double, Int};
    let as_int = |value: &Value| match value {
        Int(i) => Some(*i),
        Char(c) => Some(i64::from(u32::from(*c))),
        _ => None,
    };
    match (left, right) {
        (Double(a), b) => Some(Numbers::Double(*a, to_f64(b)?)),
        (a, Double(b)) => Some(Numbers::Double(to_f64(a)?, *b)),
        (Value::Decimal(a), b) => Some(Numbers::Decimal(*a, to_decimal(b)?)),
        (a, Value::Decimal(b)) => Some(Numbers::Decimal(to_decimal(a)?, *b)),
        (a, b) => Some(Numbers::Int(as_int(a)?, as_int(b)?)),
    }
}

fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Decimal(d) => Some(d.to_f64()),
        Value::Double(d) => Some(*d),
        _ => None,
    }
}

fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Int(i) => Some(Decimal::from(*i)),
        Value::Decimal(d) => Some(*d),
        _ => None,
    }
}

fn arithmetic(op: BinaryOp, left: Value, right: Value) -> EvalResult<Value> {
    // Lifted operators: null in, null out.
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    let numbers = promote(&left, &right).ok_or(EvalError::TypeError {
        expected: "numeric operands",
        found: left.type_name(),
    })?;
    let overflow = || EvalError::Overflow("int arithmetic");
    Ok(match (op, numbers) {
        (BinaryOp::Add, Numbers::Int(a, b)) => Value::Int(a.checked_add(b).ok_or_else(overflow)?),
        (BinaryOp::Subtract, Numbers::Int(a, b)) => {
            Value::Int(a.checked_sub(b).ok_or_else(overflow)?)
        }
        (BinaryOp::Multiply, Numbers::Int(a, b)) => {
            Value::Int(a.checked_mul(b).ok_or_else(overflow)?)
        }
        (BinaryOp::Add, Numbers::Decimal(a, b)) => Value::Decimal(a.checked_add(b)?),
        (BinaryOp::Subtract, Numbers::Decimal(a, b)) => Value::Decimal(a.checked_sub(b)?),
        (BinaryOp::Multiply, Numbers::Decimal(a, b)) => Value::Decimal(a.checked_mul(b)?),
        (BinaryOp::Add, Numbers::Double(a, b)) => Value::Double(a + b),
        (BinaryOp::Subtract, Numbers::Double(a, b)) => Value::Double(a - b),
        (BinaryOp::Multiply, Numbers::Double(a, b)) => Value::Double(a * b),
        _ => return Err(EvalError::Unsupported("non-arithmetic BinaryOp")),
    })
}

/// Numeric ordering; `None` when either side is null
fn compare(left: &Value, right: &Value) -> EvalResult<Option<Ordering>> {
    if left.is_null() || right.is_null() {
        return Ok(None);
    }
    match promote(left, right) {
        Some(Numbers::Int(a, b)) => Ok(Some(a.cmp(&b))),
        Some(Numbers::Decimal(a, b)) => Ok(Some(a.cmp(&b))),
        Some(Numbers::Double(a, b)) => Ok(a.partial_cmp(&b)),
        None => Err(EvalError::TypeError {
            expected: "comparable operands",
            found: left.type_name(),
        }),
    }
}

fn equals(left: &Value, right: &Value) -> EvalResult<bool> {
    if let Some(ordering) = promote(left, right) {
        let ordering = match ordering {
            Numbers::Int(a, b) => Some(a.cmp(&b)),
            Numbers::Decimal(a, b) => Some(a.cmp(&b)),
            Numbers::Double(a, b) => a.partial_cmp(&b),
        };
        return Ok(ordering == Some(Ordering::Equal));
    }
    Ok(left == right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use readex_core::expr::*;

    fn x() -> ParameterExpr {
        parameter("x", TypeRef::Int)
    }

    fn apply(body: Expr, argument: Value) -> EvalResult<Value> {
        evaluate(&lambda(vec![x()], body), &[argument])
    }

    #[test]
    fn test_integer_arithmetic() {
        let body = add(multiply(x().to_expr(), constant(3, TypeRef::Int)), constant(1, TypeRef::Int));
        assert_eq!(apply(body, Value::Int(4)), Ok(Value::Int(13)));
    }

    #[test]
    fn test_decimal_promotion() {
        let body = multiply(x().to_expr(), decimal("0.5").unwrap());
        assert_eq!(
            apply(body, Value::Int(3)),
            Ok(Value::Decimal("1.5".parse().unwrap()))
        );
    }

    #[test]
    fn test_short_circuit_skips_right_side() {
        let s = parameter("s", TypeRef::String);
        let length = property(s.to_expr(), "Length", TypeRef::Int);
        let body = and_also(
            not_equal(s.to_expr(), null(TypeRef::String)),
            greater_than(length, constant(0, TypeRef::Int)),
        );
        let tree = lambda(vec![s], body);
        assert_eq!(evaluate(&tree, &[Value::Null]), Ok(Value::Bool(false)));
        assert_eq!(evaluate(&tree, &[Value::from("a")]), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_null_receiver_is_an_error() {
        let s = parameter("s", TypeRef::String);
        let tree = lambda(
            vec![s.clone()],
            call(s.to_expr(), "Trim", TypeRef::String, vec![], TypeRef::String),
        );
        assert!(matches!(
            evaluate(&tree, &[Value::Null]),
            Err(EvalError::NullReference { .. })
        ));
    }

    #[test]
    fn test_arity_and_root_checks() {
        let tree = lambda(vec![x()], x().to_expr());
        assert!(matches!(
            evaluate(&tree, &[]),
            Err(EvalError::ArityMismatch { expected: 1, found: 0 })
        ));
        assert_eq!(
            evaluate(&x().to_expr(), &[]),
            Err(EvalError::NotALambda("Parameter"))
        );
    }

    #[test]
    fn test_unknown_method() {
        let body = call(x().to_expr(), "Frobnicate", TypeRef::Int, vec![], TypeRef::Int);
        assert!(matches!(
            apply(body, Value::Int(1)),
            Err(EvalError::UnsupportedMethod { .. })
        ));
    }

    #[test]
    fn test_substring_bounds() {
        assert_eq!(substring("Smith", 0, 3), Ok(Value::from("Smi")));
        assert!(matches!(
            substring("Al", 1, 3),
            Err(EvalError::IndexOutOfRange { .. })
        ));
    }
}
