//! Configuration file discovery and loading

use super::render_config::RenderConfiguration;
use crate::error::ReadexError;
use crate::result::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names in discovery priority order
const CONFIG_FILE_NAMES: [&str; 4] = [
    ".readexrc.json",
    ".readexrc.jsonc",
    ".readexrc.toml",
    "readex.json",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover config file by traversing upward from start_path
    ///
    /// Starts from the given directory and moves up the directory tree until
    /// a config is found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| ReadexError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            // Move up to parent directory
            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    ///
    /// The format follows the extension: `.json`, `.jsonc` or `.toml`.
    pub fn load_from_file(path: &Path) -> Result<RenderConfiguration> {
        let content = fs::read_to_string(path).map_err(|e| ReadexError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        let parsed = match ext {
            Some("json") => serde_json::from_str(&content).map_err(|e| e.to_string()),
            Some("jsonc") => json5::from_str(&content).map_err(|e| e.to_string()),
            Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
            _ => Err("unsupported file extension (expected .json, .jsonc or .toml)".to_string()),
        };

        let config: RenderConfiguration = parsed.map_err(|message| {
            ReadexError::config_error(format!(
                "Failed to load config from '{}': {message}",
                path.display()
            ))
        })?;
        config.to_options().validate().map_err(|e| {
            ReadexError::config_error(format!("Invalid config '{}': {e}", path.display()))
        })?;
        Ok(config)
    }

    /// Load config from path or auto-discover
    ///
    /// An explicit path must exist. Without one, discovery starts at
    /// `start_dir` (or the current directory) and finding nothing is not an
    /// error.
    pub fn load(
        custom_path: Option<&Path>,
        start_dir: Option<&Path>,
    ) -> Result<Option<RenderConfiguration>> {
        let config_path = match custom_path {
            Some(path) if !path.exists() => {
                return Err(ReadexError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => path.to_path_buf(),
            None => {
                let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
                match Self::auto_discover(search_dir)? {
                    Some(path) => path,
                    None => {
                        tracing::debug!("No config file found, using defaults");
                        return Ok(None);
                    }
                }
            }
        };

        Self::load_from_file(&config_path).map(Some)
    }

    /// JSON Schema describing the configuration file
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(RenderConfiguration);
        serde_json::to_value(schema).unwrap_or(serde_json::Value::Null)
    }
}
