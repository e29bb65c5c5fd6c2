//! Sample people and the expression trees written over them

use crate::decimal::Decimal;
use crate::value::Value;
use readex_core::Result;
use readex_core::expr::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub city: Option<String>,
    pub salary: Decimal,
    pub is_active: bool,
}

impl Person {
    pub fn new(
        first_name: &str,
        last_name: &str,
        age: i32,
        city: Option<&str>,
        salary: i64,
        is_active: bool,
    ) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            age,
            city: city.map(str::to_string),
            salary: Decimal::from(salary),
            is_active,
        }
    }

    /// Evaluator record with the property names the trees use
    pub fn to_value(&self) -> Value {
        let fields = BTreeMap::from([
            ("FirstName".to_string(), Value::from(self.first_name.as_str())),
            ("LastName".to_string(), Value::from(self.last_name.as_str())),
            ("Age".to_string(), Value::Int(i64::from(self.age))),
            ("City".to_string(), Value::from(self.city.as_deref())),
            ("Salary".to_string(), Value::Decimal(self.salary)),
            ("IsActive".to_string(), Value::Bool(self.is_active)),
        ]);
        Value::Record(fields)
    }
}

pub fn sample_people() -> Vec<Person> {
    vec![
        Person::new("John", "Smith", 25, Some("New York"), 55000, true),
        Person::new("Jane", "Doe", 45, Some("New Jersey"), 75000, true),
        Person::new("Bob", "Wilson", 70, Some("Boston"), 40000, false),
        Person::new("Al", "Brown", 22, None, 30000, true),
        Person::new("Sarah", "Johnson", 35, Some("Newark"), 60000, false),
    ]
}

pub fn person_type() -> TypeRef {
    TypeRef::named("Person")
}

fn person_parameter() -> ParameterExpr {
    parameter("p", person_type())
}

fn person_property(name: &str, ty: TypeRef) -> Expr {
    property(person_parameter().to_expr(), name, ty)
}

fn int(value: i32) -> Expr {
    constant(value, TypeRef::Int)
}

/// Age-tiered raise: 15% under 30, 8% under 50, 3% otherwise
pub fn salary_calculation() -> Result<Expr> {
    let age = || person_property("Age", TypeRef::Int);
    let raise = |rate: &str| -> Result<Expr> {
        Ok(multiply(person_property("Salary", TypeRef::Decimal), decimal(rate)?))
    };

    let body = condition(
        less_than(age(), int(30)),
        raise("1.15")?,
        condition(less_than(age(), int(50)), raise("1.08")?, raise("1.03")?),
    );
    Ok(lambda(vec![person_parameter()], body))
}

/// Upper-cased city (or "Unknown") joined to the first three letters of the last name
pub fn string_manipulation() -> Expr {
    let string_call = |receiver: Expr, method: &str, arguments: Vec<Expr>| {
        call(receiver, method, TypeRef::String, arguments, TypeRef::String)
    };

    let city = coalesce(
        person_property("City", TypeRef::String),
        constant("Unknown", TypeRef::String),
    );
    let city = string_call(string_call(city, "ToUpper", vec![]), "Trim", vec![]);

    let last_name = || person_property("LastName", TypeRef::String);
    let length = static_call(
        TypeRef::named("Math"),
        "Min",
        vec![int(3), property(last_name(), "Length", TypeRef::Int)],
        TypeRef::Int,
    );
    let initials = string_call(last_name(), "Substring", vec![int(0), length]);

    let body = static_call(
        TypeRef::String,
        "Concat",
        vec![city, constant(" - ", TypeRef::String), initials],
        TypeRef::String,
    );
    lambda(vec![person_parameter()], body)
}

/// Lower-cased first letter of the city, or "unknown" when there is none
pub fn null_safe_access() -> Expr {
    let city = || person_property("City", TypeRef::String);

    let has_city = and_also(
        not_equal(city(), null(TypeRef::String)),
        greater_than(property(city(), "Length", TypeRef::Int), int(0)),
    );
    let first = index(city(), vec![int(0)], TypeRef::Char);
    let first = call(first, "ToString", TypeRef::Char, vec![], TypeRef::String);
    let first = call(first, "ToLower", TypeRef::String, vec![], TypeRef::String);

    let body = condition(has_city, first, constant("unknown", TypeRef::String));
    lambda(vec![person_parameter()], body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_people() {
        let people = sample_people();
        assert_eq!(people.len(), 5);
        assert!(people.iter().any(|p| p.city.is_none()));
        assert_eq!(people.iter().filter(|p| !p.is_active).count(), 2);
    }

    #[test]
    fn test_person_record() {
        let Value::Record(fields) = sample_people()[3].to_value() else {
            panic!("expected a record");
        };
        assert_eq!(fields["City"], Value::Null);
        assert_eq!(fields["Age"], Value::Int(22));
    }

    #[test]
    fn test_trees_are_lambdas_over_person() {
        for tree in [
            salary_calculation().unwrap(),
            string_manipulation(),
            null_safe_access(),
        ] {
            let Expr::Lambda(lambda) = &tree else {
                panic!("expected a lambda");
            };
            assert_eq!(lambda.parameters.len(), 1);
            assert_eq!(lambda.parameters[0].ty, person_type());
        }
    }

    #[test]
    fn test_person_json() {
        let json = serde_json::to_value(&sample_people()[0]).unwrap();
        assert_eq!(json["firstName"], "John");
        assert_eq!(json["salary"], "55000");
        assert_eq!(json["isActive"], true);
    }
}
