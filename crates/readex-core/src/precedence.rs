//! Operator precedence table
//!
//! Maps every operator and node kind to a binding strength and associativity.
//! The renderer compares a child's strength against its parent's to decide
//! whether the child needs parentheses, so a missing table entry is an
//! internal error rather than a silent "no parentheses".

use crate::error::ReadexError;
use crate::expr::{BinaryOp, Expr, MethodCallExpr, TypeRef};
use crate::result::Result;

/// Binding strength, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// Delimited context: lambda bodies, call and index arguments
    Lowest = 0,
    Lambda = 1,
    Conditional = 2,
    OrElse = 3,
    AndAlso = 4,
    Equality = 5,
    Relational = 6,
    Coalesce = 7,
    Additive = 8,
    Multiplicative = 9,
    /// Negative numeric literals, which carry a leading minus sign
    Unary = 10,
    /// Member access, calls, indexers, parameters and constants
    Primary = 11,
}

impl Precedence {
    pub fn strength(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
    None,
}

/// Table entry for one operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorInfo {
    pub precedence: Precedence,
    pub associativity: Associativity,
}

impl OperatorInfo {
    const fn new(precedence: Precedence, associativity: Associativity) -> Self {
        Self {
            precedence,
            associativity,
        }
    }

    pub fn strength(self) -> u8 {
        self.precedence.strength()
    }
}

/// Where a child sits relative to its parent operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

const BINARY_OPERATORS: [(BinaryOp, OperatorInfo); 10] = [
    (BinaryOp::OrElse, OperatorInfo::new(Precedence::OrElse, Associativity::Left)),
    (BinaryOp::AndAlso, OperatorInfo::new(Precedence::AndAlso, Associativity::Left)),
    (BinaryOp::Equal, OperatorInfo::new(Precedence::Equality, Associativity::Left)),
    (BinaryOp::NotEqual, OperatorInfo::new(Precedence::Equality, Associativity::Left)),
    (BinaryOp::LessThan, OperatorInfo::new(Precedence::Relational, Associativity::Left)),
    (BinaryOp::GreaterThan, OperatorInfo::new(Precedence::Relational, Associativity::Left)),
    (BinaryOp::Coalesce, OperatorInfo::new(Precedence::Coalesce, Associativity::Right)),
    (BinaryOp::Add, OperatorInfo::new(Precedence::Additive, Associativity::Left)),
    (BinaryOp::Subtract, OperatorInfo::new(Precedence::Additive, Associativity::Left)),
    (BinaryOp::Multiply, OperatorInfo::new(Precedence::Multiplicative, Associativity::Left)),
];

/// Conditionals group to the right: `a ? b : c ? d : e`
pub const CONDITIONAL: OperatorInfo =
    OperatorInfo::new(Precedence::Conditional, Associativity::Right);

/// Receivers of member access, calls and indexers
pub const MEMBER_ACCESS: OperatorInfo = OperatorInfo::new(Precedence::Primary, Associativity::Left);

/// String concatenation rendered from `string.Concat` calls
pub const CONCATENATION: OperatorInfo =
    OperatorInfo::new(Precedence::Additive, Associativity::Left);

/// Look up a binary operator
pub fn binary_operator(op: BinaryOp) -> Result<OperatorInfo> {
    lookup(&BINARY_OPERATORS, op)
}

fn lookup(table: &[(BinaryOp, OperatorInfo)], op: BinaryOp) -> Result<OperatorInfo> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == op)
        .map(|(_, info)| *info)
        .ok_or_else(|| ReadexError::PrecedenceGap {
            operator: op.to_string(),
        })
}

/// Binding strength of a node when it appears as a child
pub fn of_expr(expr: &Expr) -> Result<Precedence> {
    Ok(match expr {
        Expr::Binary(node) => binary_operator(node.op)?.precedence,
        Expr::Conditional(_) => CONDITIONAL.precedence,
        Expr::Lambda(_) => Precedence::Lambda,
        Expr::Call(node) if is_concatenation(node) => CONCATENATION.precedence,
        Expr::Constant(node) if node.value.is_negative() => Precedence::Unary,
        Expr::Parameter(_)
        | Expr::Constant(_)
        | Expr::Property(_)
        | Expr::Index(_)
        | Expr::Call(_) => Precedence::Primary,
    })
}

/// Whether a call is a `string.Concat` that renders as a `+` chain
///
/// One of the first two arguments must be a string, otherwise `a + b` would
/// read as numeric addition.
pub fn is_concatenation(call: &MethodCallExpr) -> bool {
    call.is_static()
        && call.method == "Concat"
        && call.declaring_type == TypeRef::String
        && call.arguments.len() >= 2
        && call.arguments[..2]
            .iter()
            .any(|argument| *argument.result_type() == TypeRef::String)
}

/// Whether a child of strength `child` needs parentheses under `parent` on `side`
pub fn needs_parentheses(child: Precedence, parent: OperatorInfo, side: Side) -> bool {
    if child != parent.precedence {
        return child < parent.precedence;
    }
    !matches!(
        (parent.associativity, side),
        (Associativity::Left, Side::Left) | (Associativity::Right, Side::Right)
    )
}
