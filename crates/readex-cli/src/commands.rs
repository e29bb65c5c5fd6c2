//! Command implementations

use crate::output::{RenderOutcome, print_outcomes};
use crate::{ConfigFormat, OutputFormat};
use anyhow::{Context, bail};
use readex_core::{
    ConfigLoader, Expr, FormatOptions, RenderConfiguration, ResultExt, render_batch,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Resolve options: defaults, then the configuration file, then flags
pub fn resolve_options(
    config_path: Option<&Path>,
    overrides: &RenderConfiguration,
) -> anyhow::Result<FormatOptions> {
    let mut options = FormatOptions::default();
    if let Some(config) = ConfigLoader::load(config_path, None)? {
        options = config.apply(options);
    }
    let options = overrides.apply(options);
    options.validate()?;
    debug!("Resolved options: {:?}", options);
    Ok(options)
}

/// Render command implementation
pub fn render_command(
    files: &[PathBuf],
    format: OutputFormat,
    overrides: &RenderConfiguration,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    let options = resolve_options(config_path, overrides)?;

    let trees = files
        .iter()
        .map(|path| load_tree(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    info!("Rendering {} trees", trees.len());

    // A failing tree is reported alongside the others; anything else aborts the run.
    let mut outcomes = Vec::with_capacity(files.len());
    for (path, result) in files.iter().zip(render_batch(&trees, &options)) {
        let error = result.as_ref().err().map(ToString::to_string);
        let rendered = result
            .recoverable()
            .with_context(|| format!("Failed to render {}", path.display()))?;
        outcomes.push(RenderOutcome::new(path, rendered, error));
    }
    print_outcomes(&outcomes, format)?;

    let failed = outcomes.iter().filter(|o| o.is_failure()).count();
    if failed > 0 {
        bail!("{failed} of {} trees failed to render", outcomes.len());
    }
    Ok(())
}

fn load_tree(path: &Path) -> anyhow::Result<Expr> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse expression tree in {}", path.display()))
}

/// Config init command implementation
pub fn config_init_command(format: ConfigFormat, force: bool) -> anyhow::Result<()> {
    debug!("Initializing configuration file with format: {:?}", format);

    let filename = match format {
        ConfigFormat::Json => ".readexrc.json",
        ConfigFormat::Toml => ".readexrc.toml",
    };
    let config_path = PathBuf::from(filename);

    if config_path.exists() && !force {
        bail!("Configuration file '{filename}' already exists. Use --force to overwrite.");
    }

    let config = RenderConfiguration::from(&FormatOptions::default());
    let content = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&config)
            .context("Failed to serialize JSON configuration")?,
        ConfigFormat::Toml => {
            toml::to_string_pretty(&config).context("Failed to serialize TOML configuration")?
        }
    };
    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created configuration file: {filename}");
    Ok(())
}

/// Config validate command implementation
pub fn config_validate_command(path: Option<&Path>) -> anyhow::Result<()> {
    debug!("Validating configuration file: {:?}", path);

    let config = match path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load(None, None)?
            .context("No configuration file found (.readexrc.json, .readexrc.jsonc, .readexrc.toml, readex.json)")?,
    };
    let options = config.to_options();
    println!("Configuration is valid");
    println!("   Explicit type names: {}", options.use_explicit_type_names);
    println!(
        "   Explicit generic parameters: {}",
        options.use_explicit_generic_parameters
    );
    println!("   Captured values shown: {}", options.show_captured_values);
    Ok(())
}

/// Config show command implementation
pub fn config_show_command(config_path: Option<&Path>) -> anyhow::Result<()> {
    let options = resolve_options(config_path, &RenderConfiguration::default())?;
    let json = serde_json::to_string_pretty(&RenderConfiguration::from(&options))?;
    println!("{json}");
    Ok(())
}

/// Config schema command implementation
pub fn config_schema_command() -> anyhow::Result<()> {
    let schema = serde_json::to_string_pretty(&ConfigLoader::json_schema())?;
    println!("{schema}");
    Ok(())
}
