//! Snapshot text for values under verification

use crate::settings;
use readex_core::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use std::any::Any;

/// Snapshot text for `value`
///
/// A type registered with [`settings::treat_as_string`] becomes its converted
/// text verbatim; anything else becomes pretty-printed JSON.
pub fn to_snapshot<T: Any + Serialize>(value: &T) -> Result<String> {
    settings::mark_snapshot_taken();
    match settings::convert(value) {
        Some(text) => text,
        None => Ok(serde_json::to_string_pretty(value)?),
    }
}

/// Object snapshot assembled field by field
///
/// Registered fields are stored as JSON strings holding their converted
/// text, so an expression nested in a larger value still reads as source.
///
/// ```
/// use readex_verify::Snapshot;
///
/// let json = Snapshot::new().field("count", &3)?.to_json()?;
/// assert_eq!(json, "{\n  \"count\": 3\n}");
/// # Ok::<(), readex_verify::ReadexError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    fields: Map<String, Value>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field; a repeated name replaces the earlier value in place
    pub fn field<T: Any + Serialize>(mut self, name: impl Into<String>, value: &T) -> Result<Self> {
        let value = match settings::convert(value) {
            Some(text) => Value::String(text?),
            None => serde_json::to_value(value)?,
        };
        self.fields.insert(name.into(), value);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Pretty JSON with fields in insertion order
    pub fn to_json(&self) -> Result<String> {
        settings::mark_snapshot_taken();
        Ok(serde_json::to_string_pretty(&self.fields)?)
    }
}
