//! Readex CLI
//!
//! Renders JSON-encoded expression trees as readable source text

mod commands;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use colored::Colorize;
use readex_core::{IndentStyle, RenderConfiguration, init_json_tracing, init_tracing};
use std::io;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "readex")]
#[command(about = "Render expression trees as readable, deterministic source text")]
#[command(version = readex_core::VERSION)]
#[command(
    long_about = "readex turns typed expression trees into compact source text suitable for snapshot files.\n\
Parentheses appear only where operator precedence needs them, and the same tree always renders the same way.\n\
\n\
Examples:\n  \
readex render tree.json                     # Render with default options\n  \
readex render --line-width 60 a.json b.json # Break long conditionals\n  \
readex render --format json trees/*.json    # Machine-readable results\n  \
readex config init                          # Create .readexrc.json\n  \
readex config schema                        # Print the configuration JSON schema"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.readexrc.json/.readexrc.jsonc/.readexrc.toml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log event format
    #[arg(long, global = true, default_value = "text", help = "Format of log events on stderr")]
    log_format: LogFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel rendering
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,

    /// Generate shell completion script
    #[arg(
        long,
        value_enum,
        help = "Generate completion script for specified shell"
    )]
    generate_completion: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render expression trees stored as JSON
    Render {
        /// Tree files to render
        #[arg(required = true, help = "JSON files, each holding one expression tree")]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text", help = "Output format for rendered trees")]
        format: OutputFormat,

        #[command(flatten)]
        overrides: RenderFlags,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    #[command(alias = "ver")]
    Version {
        /// Show detailed version information
        #[arg(long, help = "Show detailed version and build information")]
        detailed: bool,
    },
}

/// Command-line overrides, applied over the configuration file
#[derive(clap::Args, Debug, Default)]
struct RenderFlags {
    #[arg(long, help = "Render lambda parameters and literals without type names")]
    no_explicit_type_names: bool,

    #[arg(long, help = "Leave generic method arguments to inference")]
    no_explicit_generic_parameters: bool,

    #[arg(long, help = "Render captured variables by name instead of by value")]
    hide_captured_values: bool,

    #[arg(long, help = "Indentation style for broken conditionals")]
    indent_style: Option<IndentStyleArg>,

    #[arg(long, help = "Number of spaces per indentation level")]
    indent_size: Option<usize>,

    #[arg(long, help = "Break conditionals that would exceed this width")]
    line_width: Option<usize>,
}

impl RenderFlags {
    fn to_configuration(&self) -> RenderConfiguration {
        let disabled = |flag: bool| flag.then_some(false);
        RenderConfiguration {
            use_explicit_type_names: disabled(self.no_explicit_type_names),
            use_explicit_generic_parameters: disabled(self.no_explicit_generic_parameters),
            show_captured_values: disabled(self.hide_captured_values),
            indent_style: self.indent_style.map(Into::into),
            indent_size: self.indent_size,
            line_width: self.line_width,
            ..Default::default()
        }
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize a new configuration file
    Init {
        /// Configuration file format
        #[arg(long, default_value = "json", help = "Configuration file format")]
        format: ConfigFormat,

        /// Overwrite existing configuration file
        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(help = "Path to configuration file (default: search for .readexrc)")]
        path: Option<PathBuf>,
    },

    /// Show the options a render would use
    Show,

    /// Print the JSON schema of the configuration file
    Schema,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    /// Rendered text, one tree after another
    Text,
    /// JSON array of results for programmatic consumption
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum IndentStyleArg {
    Spaces,
    Tabs,
}

impl From<IndentStyleArg> for IndentStyle {
    fn from(value: IndentStyleArg) -> Self {
        match value {
            IndentStyleArg::Spaces => IndentStyle::Spaces,
            IndentStyleArg::Tabs => IndentStyle::Tabs,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConfigFormat {
    /// JSON configuration format
    Json,
    /// TOML configuration format
    Toml,
}

fn main() {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return;
    }

    if cli.no_color || std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "readex=error", // Only errors by default
        1 => "readex=warn",  // Warnings on first -v
        2 => "readex=info",  // Info on -vv
        3 => "readex=debug", // Debug on -vvv
        _ => "readex=trace", // Trace on -vvvv+
    };
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    match cli.log_format {
        LogFormat::Text => init_tracing(),
        LogFormat::Json => init_json_tracing(),
    }

    // Set thread pool size if specified
    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        error!("Failed to set thread pool size: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run_command(cli) {
        error!("readex failed: {:#}", e);
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Render {
            files,
            format,
            overrides,
        }) => commands::render_command(
            &files,
            format,
            &overrides.to_configuration(),
            cli.config.as_deref(),
        ),

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { format, force } => commands::config_init_command(format, force),
            ConfigAction::Validate { path } => commands::config_validate_command(path.as_deref()),
            ConfigAction::Show => commands::config_show_command(cli.config.as_deref()),
            ConfigAction::Schema => commands::config_schema_command(),
        },

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("readex {}", readex_core::VERSION);
                println!("Build information:");
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
            } else {
                println!("{}", readex_core::VERSION);
            }
            Ok(())
        }

        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
