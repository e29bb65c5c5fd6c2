//! Result type alias for readex operations

use crate::error::ReadexError;

/// Standard Result type for readex operations
pub type Result<T> = std::result::Result<T, ReadexError>;

/// Extension trait for Result to provide additional convenience methods
pub trait ResultExt<T> {
    /// Turn an error that only affects one tree into `Ok(None)`
    ///
    /// Recoverable errors are logged as warnings; anything else is returned.
    fn recoverable(self) -> Result<Option<T>>;
}

impl<T> ResultExt<T> for Result<T> {
    fn recoverable(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() => {
                tracing::warn!("Recoverable error: {}", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
