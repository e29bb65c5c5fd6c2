//! Sample trees render as expected and compute what their renderings say

use insta::assert_snapshot;
use readex_core::{FormatOptions, render};
use readex_test::*;

fn apply_to_people(tree: &readex_core::Expr) -> Vec<Value> {
    sample_people()
        .iter()
        .map(|person| evaluate(tree, &[person.to_value()]).unwrap())
        .collect()
}

fn strings(values: &[&str]) -> Vec<Value> {
    values.iter().map(|s| Value::from(*s)).collect()
}

#[test]
fn salary_calculation_renders_as_a_ternary_chain() {
    let rendered = render(&salary_calculation().unwrap(), &FormatOptions::default()).unwrap();
    assert_snapshot!(
        rendered,
        @"(Person p) => p.Age < 30 ? p.Salary * 1.15m : p.Age < 50 ? p.Salary * 1.08m : p.Salary * 1.03m"
    );

    assert_eq!(rendered.matches('?').count(), 2);
    assert_eq!(rendered.matches(" : ").count(), 2);
    let positions: Vec<_> = ["1.15", "1.08", "1.03"]
        .iter()
        .map(|rate| rendered.find(rate).unwrap())
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn salary_calculation_evaluates_tiered_raises() {
    let expected: Vec<Value> = [63250, 81000, 41200, 34500, 64800]
        .into_iter()
        .map(|amount| Value::Decimal(Decimal::from(amount)))
        .collect();
    assert_eq!(apply_to_people(&salary_calculation().unwrap()), expected);
}

#[test]
fn string_manipulation_renders_concat_as_plus_chain() {
    let rendered = render(&string_manipulation(), &FormatOptions::default()).unwrap();
    assert_snapshot!(
        rendered,
        @r#"(Person p) => (p.City ?? "Unknown").ToUpper().Trim() + " - " + p.LastName.Substring(0, Math.Min(3, p.LastName.Length))"#
    );
}

#[test]
fn string_manipulation_evaluates_with_city_fallback() {
    assert_eq!(
        apply_to_people(&string_manipulation()),
        strings(&[
            "NEW YORK - Smi",
            "NEW JERSEY - Doe",
            "BOSTON - Wil",
            "UNKNOWN - Bro",
            "NEWARK - Joh",
        ])
    );
}

#[test]
fn null_safe_access_renders_guard_before_indexer() {
    let options = FormatOptions::default().with_explicit_type_names(false);
    assert_snapshot!(
        render(&null_safe_access(), &options).unwrap(),
        @r#"p => p.City != null && p.City.Length > 0 ? p.City[0].ToString().ToLower() : "unknown""#
    );
}

#[test]
fn null_safe_access_never_dereferences_a_missing_city() {
    assert_eq!(
        apply_to_people(&null_safe_access()),
        strings(&["n", "n", "b", "unknown", "n"])
    );
}

#[test]
fn empty_city_takes_the_fallback_branch() {
    let mut person = sample_people().remove(0);
    person.city = Some(String::new());
    let result = evaluate(&null_safe_access(), &[person.to_value()]).unwrap();
    assert_eq!(result, Value::from("unknown"));
}

#[test]
fn rendering_does_not_depend_on_evaluation() {
    let tree = string_manipulation();
    let before = render(&tree, &FormatOptions::default()).unwrap();
    apply_to_people(&tree);
    let after = render(&tree, &FormatOptions::default()).unwrap();
    assert_eq!(before, after);
}
