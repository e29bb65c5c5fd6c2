//! Readex Test Support
//!
//! Shared fixtures for readex tests:
//! - A `Person` record and five sample people
//! - Sample trees: age-tiered salary, string formatting, null-safe access
//! - A reference evaluator that applies a tree to argument values, so tests
//!   can check that a tree computes what its rendering says

pub mod decimal;
pub mod eval;
pub mod fixtures;
pub mod value;

pub use decimal::Decimal;
pub use eval::{EvalError, EvalResult, Evaluator, evaluate};
pub use fixtures::{
    Person, null_safe_access, person_type, salary_calculation, sample_people, string_manipulation,
};
pub use value::Value;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
