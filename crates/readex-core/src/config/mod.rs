//! Configuration system for readex
//!
//! Rendering options can be kept in a configuration file next to the trees
//! being rendered. Supported formats:
//! - `.readexrc.json` / `readex.json` - Standard JSON
//! - `.readexrc.jsonc` - JSON with comments and trailing commas
//! - `.readexrc.toml` - TOML
//!
//! When no explicit path is given, the loader searches from the current
//! directory upwards until a configuration file is found or the filesystem
//! root is reached.
//!
//! ## Example Configuration
//!
//! ```jsonc
//! {
//!   // Render `(Person p) => ...` rather than `p => ...`
//!   "useExplicitTypeNames": true,
//!   "useExplicitGenericParameters": true,
//!   "showCapturedValues": true,
//!   "indentStyle": "spaces",
//!   "indentSize": 2,
//!   "lineWidth": 100
//! }
//! ```

mod loader;
mod render_config;

pub use loader::ConfigLoader;
pub use render_config::{IndentStyle, RenderConfiguration};
