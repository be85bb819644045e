use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use docguard::config::Project;
use docguard::report::ReportFormat;

mod commands;

#[derive(Parser)]
#[command(
    name = "docguard",
    about = "Keeps generated API docs and architecture docs in sync with the code",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Project root that configured paths are relative to
    #[arg(long, default_value = ".", global = true, env = "DOCGUARD_ROOT")]
    root: PathBuf,

    /// Path to the config file (defaults to <root>/docguard.yml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable verbose output (use -vv for debug output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the API reference from the schema sources
    Generate,

    /// Check that the docs match the schema and code layout (default command)
    Validate {
        /// Output format for the report
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Write a "not yet generated" placeholder for the API reference
    Init {
        /// Replace an existing document
        #[arg(long)]
        force: bool,
    },

    /// Print the digest of the current schema sources
    Digest {
        /// Hash the generation set instead of the validation set
        #[arg(long)]
        generate_set: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let root = std::fs::canonicalize(&cli.root)
        .with_context(|| format!("Failed to resolve project root {}", cli.root.display()))?;
    let project = Project::load(root, cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Validate {
        format: ReportFormat::Text,
    }) {
        Commands::Generate => commands::generate_command(&project),
        Commands::Validate { format } => commands::validate_command(&project, format),
        Commands::Init { force } => commands::init_command(&project, force),
        Commands::Digest { generate_set } => commands::digest_command(&project, generate_set),
    }
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbose {
        0 => EnvFilter::new("docguard=warn"), // Default: warnings and errors only
        1 => EnvFilter::new("docguard=info"), // -v: info messages
        _ => EnvFilter::new("docguard=debug"), // -vv or more: full debug
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
