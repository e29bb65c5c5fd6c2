//! Expression tree renderer
//!
//! Walks a tree top-down, writing tokens into an [`OutputSink`]. At every
//! operand position the child's binding strength is compared against its
//! parent's (see [`crate::precedence`]) and the child is wrapped in
//! parentheses only when grouping would otherwise change:
//!
//! ```text
//! p => (p.City ?? "Unknown").ToUpper().Trim()
//! p => p.Age < 30 ? p.Salary * 1.15m : p.Age < 50 ? p.Salary * 1.08m : p.Salary * 1.03m
//! ```
//!
//! Rendering is all-or-nothing: the first inconsistency found aborts the call
//! and no partial text is returned.

use crate::error::ReadexError;
use crate::expr::{
    BinaryExpr, BinaryOp, ConditionalExpr, ConstantExpr, Expr, IndexExpr, LambdaExpr, Literal,
    MethodCallExpr, TypeRef,
};
use crate::options::FormatOptions;
use crate::precedence::{
    self, CONCATENATION, CONDITIONAL, MEMBER_ACCESS, OperatorInfo, Precedence, Side,
    needs_parentheses,
};
use crate::result::Result;
use crate::sink::OutputSink;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Render `expr` with `options`
pub fn render(expr: &Expr, options: &FormatOptions) -> Result<String> {
    Renderer::new(options).render(expr)
}

/// Render independent trees concurrently, one result per tree in input order
pub fn render_batch(exprs: &[Expr], options: &FormatOptions) -> Vec<Result<String>> {
    debug!(count = exprs.len(), "Rendering batch");
    exprs.par_iter().map(|expr| render(expr, options)).collect()
}

/// Recursive-descent writer over one set of options
pub struct Renderer<'a> {
    options: &'a FormatOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(options: &'a FormatOptions) -> Self {
        Self { options }
    }

    /// Render a whole tree to text
    pub fn render(&self, expr: &Expr) -> Result<String> {
        self.options.validate()?;
        debug!(kind = expr.kind_name(), "Rendering expression");

        let mut sink = OutputSink::new(self.options.indent_unit.as_str());
        self.write_expr(expr, &mut sink)?;
        let text = sink.finish();

        debug!(length = text.len(), "Rendered expression");
        Ok(text)
    }

    /// Write `expr` in a delimited position where it never needs parentheses
    pub fn write_expr(&self, expr: &Expr, sink: &mut OutputSink) -> Result<()> {
        match expr {
            Expr::Parameter(node) => {
                sink.text(&node.name);
                Ok(())
            }
            Expr::Constant(node) => self.write_constant(node, sink),
            Expr::Property(node) => {
                self.write_operand(&node.receiver, MEMBER_ACCESS, Side::Left, sink)?;
                sink.token(".");
                sink.text(&node.name);
                Ok(())
            }
            Expr::Index(node) => self.write_index(node, sink),
            Expr::Binary(node) => self.write_binary(node, sink),
            Expr::Conditional(node) => self.write_conditional(node, sink),
            Expr::Call(node) => self.write_call(node, sink),
            Expr::Lambda(node) => self.write_lambda(node, sink),
        }
    }

    fn write_operand(
        &self,
        child: &Expr,
        parent: OperatorInfo,
        side: Side,
        sink: &mut OutputSink,
    ) -> Result<()> {
        if needs_parentheses(self.precedence_of(child)?, parent, side) {
            trace!(child = child.kind_name(), "Parenthesizing operand");
            sink.token("(");
            self.write_expr(child, sink)?;
            sink.token(")");
            Ok(())
        } else {
            self.write_expr(child, sink)
        }
    }

    /// A hidden capture renders as its variable name, which never needs grouping
    fn precedence_of(&self, child: &Expr) -> Result<Precedence> {
        match child {
            Expr::Constant(node)
                if node.captured_from.is_some() && !self.options.show_captured_values =>
            {
                Ok(Precedence::Primary)
            }
            _ => precedence::of_expr(child),
        }
    }

    fn write_arguments(&self, arguments: &[Expr], sink: &mut OutputSink) -> Result<()> {
        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                sink.token(", ");
            }
            self.write_expr(argument, sink)?;
        }
        Ok(())
    }

    fn write_constant(&self, node: &ConstantExpr, sink: &mut OutputSink) -> Result<()> {
        if let Some(name) = &node.captured_from
            && !self.options.show_captured_values
        {
            sink.text(name);
            return Ok(());
        }

        let explicit = self.options.use_explicit_type_names;
        let suffixed = |text: String, suffix: &str| {
            if explicit { text + suffix } else { text }
        };

        let text = match (&node.value, node.ty.non_nullable()) {
            (Literal::Null, _) if node.ty.is_nullable() => "null".to_string(),
            (Literal::Bool(value), TypeRef::Bool) => value.to_string(),
            (Literal::Integer(value), TypeRef::Int) => {
                if i32::try_from(*value).is_err() {
                    return Err(ReadexError::invalid_literal("int", value.to_string()));
                }
                value.to_string()
            }
            (Literal::Integer(value), TypeRef::Long) => suffixed(value.to_string(), "L"),
            (Literal::Integer(value), TypeRef::Decimal) => suffixed(value.to_string(), "m"),
            (Literal::Decimal(value), TypeRef::Decimal) => suffixed(value.to_string(), "m"),
            (Literal::Double(value), TypeRef::Double) => format_double(*value, explicit),
            (Literal::Char(value), TypeRef::Char) => quote(&value.to_string(), '\''),
            (Literal::String(value), TypeRef::String | TypeRef::Object) => quote(value, '"'),
            (value, _) => {
                return Err(ReadexError::type_mismatch(
                    "Constant",
                    literal_kind(value),
                    node.ty.to_string(),
                ));
            }
        };
        sink.text(&text);
        Ok(())
    }

    fn write_index(&self, node: &IndexExpr, sink: &mut OutputSink) -> Result<()> {
        if node.arguments.is_empty() {
            return Err(ReadexError::unsupported_node(
                "IndexAccess",
                "an indexer needs at least one argument",
            ));
        }
        self.write_operand(&node.receiver, MEMBER_ACCESS, Side::Left, sink)?;
        sink.token("[");
        self.write_arguments(&node.arguments, sink)?;
        sink.token("]");
        Ok(())
    }

    fn write_binary(&self, node: &BinaryExpr, sink: &mut OutputSink) -> Result<()> {
        check_binary(node)?;
        let info = precedence::binary_operator(node.op)?;
        self.write_operand(&node.left, info, Side::Left, sink)?;
        sink.token(" ");
        sink.token(node.op.symbol());
        sink.token(" ");
        self.write_operand(&node.right, info, Side::Right, sink)
    }

    fn write_conditional(&self, node: &ConditionalExpr, sink: &mut OutputSink) -> Result<()> {
        let test_type = node.test.result_type();
        if *test_type != TypeRef::Bool {
            return Err(ReadexError::type_mismatch(
                "Conditional test",
                "bool",
                test_type.to_string(),
            ));
        }

        if let Some(width) = self.options.line_width
            && sink.column() + self.flat_width(node)? > width
        {
            trace!(width, "Breaking conditional across lines");
            self.write_operand(&node.test, CONDITIONAL, Side::Left, sink)?;
            return sink.indented(|sink| {
                sink.new_line();
                sink.token("? ");
                self.write_operand(&node.if_true, CONDITIONAL, Side::Right, sink)?;
                sink.new_line();
                sink.token(": ");
                self.write_operand(&node.if_false, CONDITIONAL, Side::Right, sink)
            });
        }

        self.write_operand(&node.test, CONDITIONAL, Side::Left, sink)?;
        sink.token(" ? ");
        self.write_operand(&node.if_true, CONDITIONAL, Side::Right, sink)?;
        sink.token(" : ");
        // A nested conditional in the false branch reads as a flat chain.
        self.write_operand(&node.if_false, CONDITIONAL, Side::Right, sink)
    }

    /// Width of a conditional rendered on a single line
    fn flat_width(&self, node: &ConditionalExpr) -> Result<usize> {
        let flat_options = FormatOptions {
            line_width: None,
            ..self.options.clone()
        };
        let flat = Renderer::new(&flat_options);
        let mut scratch = OutputSink::new(flat_options.indent_unit.as_str());
        flat.write_conditional(node, &mut scratch)?;
        Ok(scratch.column())
    }

    fn write_call(&self, node: &MethodCallExpr, sink: &mut OutputSink) -> Result<()> {
        if precedence::is_concatenation(node) {
            return self.write_concatenation(node, sink);
        }

        match &node.receiver {
            Some(receiver) => self.write_operand(receiver, MEMBER_ACCESS, Side::Left, sink)?,
            None => sink.text(&node.declaring_type.to_string()),
        }
        sink.token(".");
        sink.text(&node.method);

        if self.options.use_explicit_generic_parameters && node.is_generic() {
            sink.token("<");
            for (i, argument) in node.type_arguments.iter().enumerate() {
                if i > 0 {
                    sink.token(", ");
                }
                sink.text(&argument.to_string());
            }
            sink.token(">");
        }

        sink.token("(");
        self.write_arguments(&node.arguments, sink)?;
        sink.token(")");
        Ok(())
    }

    /// `string.Concat(a, b, c)` reads as `a + b + c`
    fn write_concatenation(&self, node: &MethodCallExpr, sink: &mut OutputSink) -> Result<()> {
        for (i, argument) in node.arguments.iter().enumerate() {
            if i == 0 {
                self.write_operand(argument, CONCATENATION, Side::Left, sink)?;
            } else {
                sink.token(" + ");
                self.write_operand(argument, CONCATENATION, Side::Right, sink)?;
            }
        }
        Ok(())
    }

    fn write_lambda(&self, node: &LambdaExpr, sink: &mut OutputSink) -> Result<()> {
        let mut seen = HashSet::new();
        for parameter in &node.parameters {
            if !seen.insert(parameter.name.as_str()) {
                return Err(ReadexError::unsupported_node(
                    "Lambda",
                    format!("duplicate parameter '{}'", parameter.name),
                ));
            }
        }
        if let TypeRef::Function { parameters, .. } = &node.ty
            && parameters.len() != node.parameters.len()
        {
            return Err(ReadexError::type_mismatch(
                "Lambda",
                format!("{} parameters", parameters.len()),
                format!("{} parameters", node.parameters.len()),
            ));
        }

        let explicit = self.options.use_explicit_type_names;
        let parenthesized = explicit || node.parameters.len() != 1;
        if parenthesized {
            sink.token("(");
        }
        for (i, parameter) in node.parameters.iter().enumerate() {
            if i > 0 {
                sink.token(", ");
            }
            if explicit {
                sink.text(&parameter.ty.to_string());
                sink.token(" ");
            }
            sink.text(&parameter.name);
        }
        if parenthesized {
            sink.token(")");
        }
        sink.token(" => ");
        self.write_expr(&node.body, sink)
    }
}

/// Local consistency of an operator with its operand and result types
fn check_binary(node: &BinaryExpr) -> Result<()> {
    let left = node.left.result_type();
    let right = node.right.result_type();
    let unsupported = || {
        ReadexError::unsupported_operation(node.op.symbol(), format!("{left} and {right}"))
    };

    if (node.op.is_comparison() || node.op.is_logical()) && node.ty != TypeRef::Bool {
        return Err(ReadexError::type_mismatch(
            "BinaryOp",
            "bool",
            node.ty.to_string(),
        ));
    }

    match node.op {
        BinaryOp::AndAlso | BinaryOp::OrElse if !(left.is_bool() && right.is_bool()) => {
            Err(unsupported())
        }
        BinaryOp::LessThan | BinaryOp::GreaterThan
            if !(is_ordered(left) && is_ordered(right)) =>
        {
            Err(unsupported())
        }
        BinaryOp::Add
            if !(left.is_numeric() && right.is_numeric())
                && *left != TypeRef::String
                && *right != TypeRef::String =>
        {
            Err(unsupported())
        }
        BinaryOp::Subtract | BinaryOp::Multiply if !(left.is_numeric() && right.is_numeric()) => {
            Err(unsupported())
        }
        BinaryOp::Coalesce if !left.is_nullable() => Err(ReadexError::type_mismatch(
            "Coalesce",
            "nullable left operand",
            left.to_string(),
        )),
        _ => Ok(()),
    }
}

fn is_ordered(ty: &TypeRef) -> bool {
    ty.is_numeric() || *ty.non_nullable() == TypeRef::Char
}

fn literal_kind(value: &Literal) -> &'static str {
    match value {
        Literal::Null => "nullable type",
        Literal::Bool(_) => "bool",
        Literal::Integer(_) => "int, long or decimal",
        Literal::Decimal(_) => "decimal",
        Literal::Double(_) => "double",
        Literal::Char(_) => "char",
        Literal::String(_) => "string",
    }
}

fn format_double(value: f64, explicit: bool) -> String {
    if value.is_nan() {
        return "double.NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "double.PositiveInfinity".to_string()
        } else {
            "double.NegativeInfinity".to_string()
        };
    }
    let text = value.to_string();
    if explicit {
        text + "d"
    } else if text.contains('.') {
        text
    } else {
        text + ".0"
    }
}

/// Quote and escape a string or char literal
fn quote(value: &str, delimiter: char) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push(delimiter);
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\0' => quoted.push_str("\\0"),
            c if c == delimiter => {
                quoted.push('\\');
                quoted.push(c);
            }
            c => quoted.push(c),
        }
    }
    quoted.push(delimiter);
    quoted
}
