//! Formatting options for rendering

use crate::error::ReadexError;
use crate::result::Result;

/// Formatting options
///
/// Resolved once per render call and only ever read during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Prefix lambda parameters with their type and suffix ambiguous literals
    pub use_explicit_type_names: bool,

    /// Render generic method arguments instead of relying on inference
    pub use_explicit_generic_parameters: bool,

    /// Render captured variables by value instead of by name
    pub show_captured_values: bool,

    /// Token repeated once per indentation level
    pub indent_unit: String,

    /// Break conditionals that would overflow this width (None = never break)
    pub line_width: Option<usize>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            use_explicit_type_names: true,
            use_explicit_generic_parameters: true,
            show_captured_values: true,
            indent_unit: "  ".to_string(),
            line_width: None,
        }
    }
}

impl FormatOptions {
    pub fn with_explicit_type_names(mut self, enabled: bool) -> Self {
        self.use_explicit_type_names = enabled;
        self
    }

    pub fn with_explicit_generic_parameters(mut self, enabled: bool) -> Self {
        self.use_explicit_generic_parameters = enabled;
        self
    }

    pub fn with_captured_values(mut self, enabled: bool) -> Self {
        self.show_captured_values = enabled;
        self
    }

    pub fn indent_using(mut self, unit: impl Into<String>) -> Self {
        self.indent_unit = unit.into();
        self
    }

    pub fn with_line_width(mut self, width: Option<usize>) -> Self {
        self.line_width = width;
        self
    }

    /// Check the options before they are threaded through a render call
    pub fn validate(&self) -> Result<()> {
        if self.indent_unit.is_empty() {
            return Err(ReadexError::config_error("indentUnit must not be empty"));
        }
        if !self.indent_unit.chars().all(|c| c == ' ' || c == '\t') {
            return Err(ReadexError::config_error(format!(
                "indentUnit must contain only spaces or tabs, got {:?}",
                self.indent_unit
            )));
        }
        if self.line_width == Some(0) {
            return Err(ReadexError::config_error("lineWidth must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = FormatOptions::default();
        assert!(options.use_explicit_type_names);
        assert!(options.use_explicit_generic_parameters);
        assert!(options.show_captured_values);
        assert_eq!(options.indent_unit, "  ");
        assert_eq!(options.line_width, None);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let options = FormatOptions::default()
            .with_explicit_type_names(false)
            .with_captured_values(false)
            .indent_using("\t")
            .with_line_width(Some(40));
        assert!(!options.use_explicit_type_names);
        assert!(!options.show_captured_values);
        assert_eq!(options.indent_unit, "\t");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(FormatOptions::default().indent_using("").validate().is_err());
        assert!(FormatOptions::default().indent_using("->").validate().is_err());
        assert!(
            FormatOptions::default()
                .with_line_width(Some(0))
                .validate()
                .is_err()
        );
    }
}
