//! One-time registration
//!
//! Registration is process-wide, so this binary holds a single test that
//! walks the whole lifecycle in order.

use readex_core::ReadexError;
use readex_test::salary_calculation;
use readex_verify::{initialize, is_initialized, render, settings, to_snapshot};

#[test]
fn initialization_succeeds_once() {
    let tree = salary_calculation().unwrap();

    // Rendering works before registration.
    assert!(!is_initialized());
    let rendered = render(&tree).unwrap();
    assert!(!settings::is_registered::<readex_core::Expr>());

    initialize().unwrap();
    assert!(is_initialized());
    assert!(settings::is_registered::<readex_core::Expr>());

    // A render between the two calls does not reset anything.
    assert_eq!(render(&tree).unwrap(), rendered);
    assert!(matches!(initialize(), Err(ReadexError::AlreadyInitialized)));
    assert!(matches!(initialize(), Err(ReadexError::AlreadyInitialized)));

    assert_eq!(to_snapshot(&tree).unwrap(), rendered);
    assert!(is_initialized());
}
