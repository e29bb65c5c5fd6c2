//! Readex Verify
//!
//! Snapshot-testing integration for expression trees. After [`initialize`],
//! every [`Expr`] that ends up in a snapshot is stored as its rendered source
//! text instead of a structural dump of the tree:
//!
//! ```text
//! (Person p) => p.Age < 30 ? p.Salary * 1.15m : p.Age < 50 ? p.Salary * 1.08m : p.Salary * 1.03m
//! ```
//!
//! Initialization registers a process-wide converter. It must run once, before
//! the first snapshot is taken; a second call fails with
//! [`ReadexError::AlreadyInitialized`].

pub mod settings;
pub mod snapshot;

pub use readex_core::{Expr, FormatOptions, ReadexError, Result};
pub use snapshot::{Snapshot, to_snapshot};

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Register expression trees to snapshot as their rendered text
///
/// The call is claimed before the snapshot check, so a call that fails
/// because a snapshot was already taken still uses up initialization and a
/// retry reports [`ReadexError::AlreadyInitialized`]. A snapshot taken on
/// another thread while this call runs is not detected.
pub fn initialize() -> Result<()> {
    if INITIALIZED.swap(true, Ordering::AcqRel) {
        return Err(ReadexError::AlreadyInitialized);
    }
    settings::ensure_no_snapshot_taken()?;

    settings::treat_as_string::<Expr>(render);
    info!("Registered readable expression converter");
    Ok(())
}

/// Whether [`initialize`] has been called in this process
pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::Acquire)
}

/// Render `expr` with the default options
///
/// Does not require [`initialize`].
pub fn render(expr: &Expr) -> Result<String> {
    readex_core::render(expr, &FormatOptions::default())
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
