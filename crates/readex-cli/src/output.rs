//! Output formatting for rendered trees

use crate::OutputFormat;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

/// Result of rendering one file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutcome {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RenderOutcome {
    pub fn new(path: &Path, rendered: Option<String>, error: Option<String>) -> Self {
        Self {
            file: path.display().to_string(),
            rendered,
            error,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Print outcomes to stdout; in text mode failures go to stderr
pub fn print_outcomes(outcomes: &[RenderOutcome], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(outcomes)?);
        }
        OutputFormat::Text => {
            let with_headers = outcomes.len() > 1;
            for outcome in outcomes {
                match (&outcome.rendered, &outcome.error) {
                    (Some(text), _) => {
                        if with_headers {
                            println!("{}", format!("// {}", outcome.file).dimmed());
                        }
                        println!("{text}");
                    }
                    (None, Some(error)) => {
                        eprintln!("{} {}: {}", "error:".red().bold(), outcome.file, error);
                    }
                    (None, None) => {}
                }
            }
        }
    }
    Ok(())
}
