//! Configuration file representation of the formatting options

use crate::options::FormatOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Indent style for multi-line output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    /// Use spaces for indentation
    Spaces,
    /// Use tabs for indentation
    Tabs,
}

/// Rendering configuration
///
/// Every field is optional; unset fields keep the value they are applied to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RenderConfiguration {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "JSON Schema reference for editor support")]
    pub schema: Option<String>,

    /// Show lambda parameter types and literal suffixes
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Prefix lambda parameters with their type names and suffix ambiguous literals")]
    pub use_explicit_type_names: Option<bool>,

    /// Show generic method arguments
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Render generic method arguments explicitly instead of relying on inference")]
    pub use_explicit_generic_parameters: Option<bool>,

    /// Show captured variables by value
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Render captured variables by their value rather than their name")]
    pub show_captured_values: Option<bool>,

    /// Literal indentation token, takes precedence over indentStyle/indentSize
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Token repeated once per indentation level")]
    pub indent_unit: Option<String>,

    /// Indent style (spaces or tabs)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Indentation style: 'spaces' or 'tabs'")]
    pub indent_style: Option<IndentStyle>,

    /// Indentation size in spaces (when indentStyle is 'spaces')
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Number of spaces per indentation level")]
    pub indent_size: Option<usize>,

    /// Maximum line width before conditionals break
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Break conditionals that would exceed this width")]
    pub line_width: Option<usize>,
}

impl RenderConfiguration {
    /// Overlay the fields set in this configuration onto `options`
    pub fn apply(&self, mut options: FormatOptions) -> FormatOptions {
        if let Some(enabled) = self.use_explicit_type_names {
            options.use_explicit_type_names = enabled;
        }
        if let Some(enabled) = self.use_explicit_generic_parameters {
            options.use_explicit_generic_parameters = enabled;
        }
        if let Some(enabled) = self.show_captured_values {
            options.show_captured_values = enabled;
        }
        if let Some(unit) = self.indent_unit_from_style() {
            options.indent_unit = unit;
        }
        if let Some(width) = self.line_width {
            options.line_width = Some(width);
        }
        options
    }

    /// Options from this configuration over the defaults
    pub fn to_options(&self) -> FormatOptions {
        self.apply(FormatOptions::default())
    }

    fn indent_unit_from_style(&self) -> Option<String> {
        if let Some(unit) = &self.indent_unit {
            return Some(unit.clone());
        }
        match (self.indent_style, self.indent_size) {
            (Some(IndentStyle::Tabs), _) => Some("\t".to_string()),
            (_, Some(size)) => Some(" ".repeat(size)),
            (Some(IndentStyle::Spaces), None) => Some("  ".to_string()),
            (None, None) => None,
        }
    }
}

impl From<&FormatOptions> for RenderConfiguration {
    fn from(options: &FormatOptions) -> Self {
        Self {
            schema: None,
            use_explicit_type_names: Some(options.use_explicit_type_names),
            use_explicit_generic_parameters: Some(options.use_explicit_generic_parameters),
            show_captured_values: Some(options.show_captured_values),
            indent_unit: Some(options.indent_unit.clone()),
            indent_style: None,
            indent_size: None,
            line_width: options.line_width,
        }
    }
}
