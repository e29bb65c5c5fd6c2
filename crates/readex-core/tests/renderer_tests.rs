//! Rendering behavior over whole trees

use insta::assert_snapshot;
use readex_core::expr::*;
use readex_core::{FormatOptions, ReadexError, render, render_batch};

fn person() -> ParameterExpr {
    parameter("p", TypeRef::named("Person"))
}

fn prop(name: &str, ty: TypeRef) -> Expr {
    property(person().to_expr(), name, ty)
}

fn int(value: i32) -> Expr {
    constant(value, TypeRef::Int)
}

fn text(value: &str) -> Expr {
    constant(value, TypeRef::String)
}

fn salary_tree() -> Expr {
    let age = || prop("Age", TypeRef::Int);
    let salary = || prop("Salary", TypeRef::Decimal);
    let raise = |rate: &str| multiply(salary(), decimal(rate).unwrap());
    let body = condition(
        less_than(age(), int(30)),
        raise("1.15"),
        condition(less_than(age(), int(50)), raise("1.08"), raise("1.03")),
    );
    lambda(vec![person()], body)
}

fn defaults(expr: &Expr) -> String {
    render(expr, &FormatOptions::default()).unwrap()
}

#[test]
fn nested_conditionals_read_as_a_flat_chain() {
    assert_snapshot!(
        defaults(&salary_tree()),
        @"(Person p) => p.Age < 30 ? p.Salary * 1.15m : p.Age < 50 ? p.Salary * 1.08m : p.Salary * 1.03m"
    );
}

#[test]
fn implicit_types_drop_parameter_types_and_suffixes() {
    let options = FormatOptions::default().with_explicit_type_names(false);
    assert_snapshot!(
        render(&salary_tree(), &options).unwrap(),
        @"p => p.Age < 30 ? p.Salary * 1.15 : p.Age < 50 ? p.Salary * 1.08 : p.Salary * 1.03"
    );
}

#[test]
fn left_associative_operators_parenthesize_the_right_operand() {
    let a = || prop("A", TypeRef::Int);
    let b = || prop("B", TypeRef::Int);
    let c = || prop("C", TypeRef::Int);

    assert_eq!(defaults(&subtract(subtract(a(), b()), c())), "p.A - p.B - p.C");
    assert_eq!(defaults(&subtract(a(), subtract(b(), c()))), "p.A - (p.B - p.C)");
    assert_eq!(defaults(&multiply(add(a(), b()), c())), "(p.A + p.B) * p.C");
    assert_eq!(defaults(&add(a(), multiply(b(), c()))), "p.A + p.B * p.C");
}

#[test]
fn logical_operators_group_by_strength() {
    let active = || prop("IsActive", TypeRef::Bool);
    let adult = || greater_than(prop("Age", TypeRef::Int), int(17));

    assert_eq!(
        defaults(&or_else(and_also(active(), adult()), active())),
        "p.IsActive && p.Age > 17 || p.IsActive"
    );
    assert_eq!(
        defaults(&and_also(active(), or_else(adult(), active()))),
        "p.IsActive && (p.Age > 17 || p.IsActive)"
    );
}

#[test]
fn coalesce_receiver_is_parenthesized() {
    let city = coalesce(prop("City", TypeRef::String), text("Unknown"));
    let upper = call(city, "ToUpper", TypeRef::String, vec![], TypeRef::String);
    let trimmed = call(upper, "Trim", TypeRef::String, vec![], TypeRef::String);
    assert_snapshot!(defaults(&trimmed), @r#"(p.City ?? "Unknown").ToUpper().Trim()"#);
}

#[test]
fn negative_literal_receivers_are_parenthesized() {
    let to_string =
        |receiver: Expr| call(receiver, "ToString", TypeRef::Int, vec![], TypeRef::String);

    assert_snapshot!(defaults(&to_string(int(-5))), @"(-5).ToString()");
    assert_snapshot!(defaults(&to_string(int(5))), @"5.ToString()");

    let rate = decimal("-1.5").unwrap();
    let scale = property(rate.clone(), "Scale", TypeRef::Int);
    assert_snapshot!(defaults(&scale), @"(-1.5m).Scale");
    assert_snapshot!(
        defaults(&multiply(prop("Salary", TypeRef::Decimal), rate)),
        @"p.Salary * -1.5m"
    );
}

#[test]
fn hidden_negative_captures_are_not_parenthesized() {
    let offset = captured("offset", -5, TypeRef::Int);
    let tree = call(offset, "ToString", TypeRef::Int, vec![], TypeRef::String);

    assert_snapshot!(defaults(&tree), @"(-5).ToString()");
    let hidden = FormatOptions::default().with_captured_values(false);
    assert_snapshot!(render(&tree, &hidden).unwrap(), @"offset.ToString()");
}

#[test]
fn concat_without_string_operands_stays_a_call() {
    let age = || prop("Age", TypeRef::Int);
    let concat = |arguments| static_call(TypeRef::String, "Concat", arguments, TypeRef::String);

    let numbers = concat(vec![age(), int(1)]);
    assert_snapshot!(defaults(&numbers), @"string.Concat(p.Age, 1)");
    assert_ne!(defaults(&numbers), defaults(&add(age(), int(1))));

    assert_snapshot!(
        defaults(&concat(vec![age(), int(1), text("x")])),
        @r#"string.Concat(p.Age, 1, "x")"#
    );
    assert_snapshot!(
        defaults(&concat(vec![age(), text(" years")])),
        @r#"p.Age + " years""#
    );
}

#[test]
fn coalesce_groups_to_the_right() {
    let a = || prop("Nickname", TypeRef::String);
    let b = || prop("FirstName", TypeRef::String);

    assert_eq!(
        defaults(&coalesce(a(), coalesce(b(), text("?")))),
        r#"p.Nickname ?? p.FirstName ?? "?""#
    );
    assert_eq!(
        defaults(&coalesce(coalesce(a(), b()), text("?"))),
        r#"(p.Nickname ?? p.FirstName) ?? "?""#
    );
}

#[test]
fn conditional_operands_are_parenthesized() {
    let active = || prop("IsActive", TypeRef::Bool);
    let choice = || condition(active(), int(1), int(2));

    assert_eq!(defaults(&add(choice(), int(1))), "(p.IsActive ? 1 : 2) + 1");
    assert_eq!(
        defaults(&condition(condition(active(), active(), active()), int(1), int(2))),
        "(p.IsActive ? p.IsActive : p.IsActive) ? 1 : 2"
    );
    assert_eq!(
        defaults(&condition(active(), choice(), int(3))),
        "p.IsActive ? p.IsActive ? 1 : 2 : 3"
    );
}

#[test]
fn null_safe_access() {
    let city = || prop("City", TypeRef::String);
    let has_city = and_also(
        not_equal(city(), null(TypeRef::String)),
        greater_than(property(city(), "Length", TypeRef::Int), int(0)),
    );
    let first = index(city(), vec![int(0)], TypeRef::Char);
    let as_text = call(first, "ToString", TypeRef::Char, vec![], TypeRef::String);
    let lower = call(as_text, "ToLower", TypeRef::String, vec![], TypeRef::String);
    let tree = lambda(vec![person()], condition(has_city, lower, text("unknown")));

    assert_snapshot!(
        defaults(&tree),
        @r#"(Person p) => p.City != null && p.City.Length > 0 ? p.City[0].ToString().ToLower() : "unknown""#
    );
}

#[test]
fn narrow_line_width_breaks_conditionals() {
    let options = FormatOptions::default().with_line_width(Some(40));
    let expected = [
        "(Person p) => p.Age < 30",
        "  ? p.Salary * 1.15m",
        "  : p.Age < 50",
        "    ? p.Salary * 1.08m",
        "    : p.Salary * 1.03m",
    ]
    .join("\n");
    assert_eq!(render(&salary_tree(), &options).unwrap(), expected);

    let wide = FormatOptions::default().with_line_width(Some(120));
    assert_eq!(render(&salary_tree(), &wide).unwrap(), defaults(&salary_tree()));
}

#[test]
fn custom_indent_unit_is_used_for_breaks() {
    let options = FormatOptions::default()
        .with_line_width(Some(40))
        .indent_using("\t");
    let rendered = render(&salary_tree(), &options).unwrap();
    assert!(rendered.contains("\n\t? p.Salary * 1.15m"));
    assert!(rendered.contains("\n\t\t: p.Salary * 1.03m"));
}

#[test]
fn rendering_is_deterministic() {
    let tree = salary_tree();
    let copy = tree.clone();
    assert_eq!(defaults(&tree), defaults(&copy));
    assert_eq!(defaults(&tree), defaults(&tree));
}

#[test]
fn batch_preserves_input_order() {
    let trees = vec![int(1), salary_tree(), constant("x", TypeRef::Int), int(3)];
    let results = render_batch(&trees, &FormatOptions::default());

    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap(), "1");
    assert_eq!(results[1].as_ref().unwrap(), &defaults(&salary_tree()));
    assert!(results[2].is_err());
    assert_eq!(results[3].as_ref().unwrap(), "3");
}

#[test]
fn trees_deserialize_from_json() {
    let json = r#"{
        "kind": "lambda",
        "parameters": [{ "name": "p", "type": "Person" }],
        "type": "Func<Person, bool>",
        "body": {
            "kind": "binary",
            "op": "lessThan",
            "left": {
                "kind": "property",
                "receiver": { "kind": "parameter", "name": "p", "type": "Person" },
                "name": "Age",
                "type": "int"
            },
            "right": { "kind": "constant", "value": { "integer": 30 }, "type": "int" },
            "type": "bool"
        }
    }"#;
    let tree: Expr = serde_json::from_str(json).unwrap();
    assert_eq!(defaults(&tree), "(Person p) => p.Age < 30");
}

#[test]
fn inconsistent_trees_are_rejected() {
    let options = FormatOptions::default();

    let sum = binary(BinaryOp::Add, prop("IsActive", TypeRef::Bool), int(1), TypeRef::Int);
    assert!(matches!(
        render(&sum, &options).unwrap_err(),
        ReadexError::UnsupportedOperation { .. }
    ));

    let test = condition(int(1), int(2), int(3));
    assert!(matches!(
        render(&test, &options).unwrap_err(),
        ReadexError::TypeMismatch { node: "Conditional test", .. }
    ));

    let fallback = coalesce(prop("Age", TypeRef::Int), int(0));
    assert!(matches!(
        render(&fallback, &options).unwrap_err(),
        ReadexError::TypeMismatch { node: "Coalesce", .. }
    ));

    let compare = binary(BinaryOp::LessThan, int(1), int(2), TypeRef::Int);
    assert!(render(&compare, &options).is_err());
}

#[test]
fn errors_inside_lambdas_abort_the_whole_render() {
    let broken = lambda(vec![person()], add(prop("Age", TypeRef::Int), text("x")));
    // int + string is a valid concatenation; a bool operand is not.
    assert!(render(&broken, &FormatOptions::default()).is_ok());

    let broken = lambda(
        vec![person()],
        multiply(prop("Age", TypeRef::Int), prop("IsActive", TypeRef::Bool)),
    );
    let err = render(&broken, &FormatOptions::default()).unwrap_err();
    assert!(err.is_recoverable());
}
