//! Readex Core
//!
//! Renders typed expression trees (lambdas, member access, operators,
//! conditionals, method calls) as compact, deterministic source text. The
//! rendered text is meant for snapshot files: two structurally equal trees
//! always produce byte-identical output, and parentheses appear only where
//! operator precedence requires them.
//!
//! ```
//! use readex_core::expr::*;
//! use readex_core::{FormatOptions, render};
//!
//! let p = parameter("p", TypeRef::named("Person"));
//! let body = less_than(property(p.to_expr(), "Age", TypeRef::Int), constant(30, TypeRef::Int));
//! let tree = lambda(vec![p], body);
//!
//! assert_eq!(render(&tree, &FormatOptions::default()).unwrap(), "(Person p) => p.Age < 30");
//! ```

pub mod config;
pub mod error;
pub mod expr;
pub mod options;
pub mod precedence;
pub mod render;
pub mod result;
pub mod sink;

// Re-export commonly used types
pub use config::{ConfigLoader, IndentStyle, RenderConfiguration};
pub use error::{ErrorKind, ReadexError};
pub use expr::{BinaryOp, Expr, Literal, TypeRef};
pub use options::FormatOptions;
pub use precedence::{Associativity, Precedence};
pub use render::{Renderer, render, render_batch};
pub use result::{Result, ResultExt};
pub use sink::OutputSink;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("readex=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Initialize tracing with newline-delimited JSON events on stderr
pub fn init_json_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("readex=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
