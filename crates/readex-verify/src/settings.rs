//! Process-wide snapshot settings
//!
//! Holds the converters that make a type serialize as a plain string inside
//! snapshots, and remembers whether any snapshot has been produced yet. Both
//! live for the whole process and are never torn down.

use dashmap::DashMap;
use readex_core::{ReadexError, Result};
use std::any::{Any, TypeId, type_name};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};
use tracing::debug;

type Converter = Arc<dyn Fn(&dyn Any) -> Result<String> + Send + Sync>;

struct Registration {
    type_name: &'static str,
    converter: Converter,
}

static CONVERTERS: LazyLock<DashMap<TypeId, Registration>> = LazyLock::new(DashMap::new);

static SNAPSHOT_TAKEN: AtomicBool = AtomicBool::new(false);

/// Serialize values of `T` as the string returned by `convert`
///
/// Registering a type again replaces its converter.
pub fn treat_as_string<T: Any>(convert: impl Fn(&T) -> Result<String> + Send + Sync + 'static) {
    let type_name = type_name::<T>();
    let converter: Converter = Arc::new(move |value: &dyn Any| {
        let value = value.downcast_ref::<T>().ok_or_else(|| {
            ReadexError::internal_error(format!("converter for {type_name} received another type"))
        })?;
        convert(value)
    });

    let previous = CONVERTERS.insert(
        TypeId::of::<T>(),
        Registration {
            type_name,
            converter,
        },
    );
    if previous.is_some() {
        debug!("Replaced string converter for {type_name}");
    } else {
        debug!("Registered string converter for {type_name}");
    }
}

/// Whether values of `T` serialize as strings
pub fn is_registered<T: Any>() -> bool {
    CONVERTERS.contains_key(&TypeId::of::<T>())
}

/// Convert `value` with its registered converter, if there is one
pub fn convert<T: Any>(value: &T) -> Option<Result<String>> {
    // Clone the converter out so the map shard is not locked while it runs.
    let (type_name, converter) = {
        let entry = CONVERTERS.get(&TypeId::of::<T>())?;
        (entry.type_name, Arc::clone(&entry.converter))
    };
    debug!("Converting {type_name} to string");
    Some(converter(value))
}

/// Fail if a snapshot has already been produced in this process
pub fn ensure_no_snapshot_taken() -> Result<()> {
    if SNAPSHOT_TAKEN.load(Ordering::Acquire) {
        return Err(ReadexError::config_error(
            "Settings must be configured before the first snapshot is taken",
        ));
    }
    Ok(())
}

pub(crate) fn mark_snapshot_taken() {
    SNAPSHOT_TAKEN.store(true, Ordering::Release);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Celsius(f64);

    struct Unregistered;

    #[test]
    fn test_registered_type_converts() {
        treat_as_string::<Celsius>(|c| Ok(format!("{}°C", c.0)));
        assert!(is_registered::<Celsius>());

        let text = convert(&Celsius(21.5)).unwrap().unwrap();
        assert_eq!(text, "21.5°C");
    }

    #[test]
    fn test_unregistered_type_has_no_converter() {
        assert!(!is_registered::<Unregistered>());
        assert!(convert(&Unregistered).is_none());
    }

    #[test]
    fn test_converter_errors_propagate() {
        struct Broken;
        treat_as_string::<Broken>(|_| Err(ReadexError::internal_error("boom")));
        let result = convert(&Broken).unwrap();
        assert!(matches!(result, Err(ReadexError::InternalError { .. })));
    }
}
