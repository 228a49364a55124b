//! kit-breakout: multi-level kit explosion and order reconciliation
//!
//! Explodes bill-of-materials kits into their leaf components and filters
//! order lines already supplied by a kit on the same order.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use kit_breakout::{
    cli,
    config::{self, AppConfig, CyclePolicy, KeyMatchMode},
    pipeline::exit_codes,
    reports::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kit-breakout")]
#[command(version)]
#[command(about = "Multi-level kit explosion and order reconciliation", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Every unit completed
    1  Run stopped early (completion timeout); output is partial
    2  Error occurred

EXAMPLES:
    # Explode every top-level kit of the catalog
    kit-breakout catalog --kits kits.csv

    # Per-order breakout with totals, as JSON
    kit-breakout orders --kits kits.csv --orders orders.csv -o json

    # Drop order lines a kit on the same order already supplies
    kit-breakout filter --kits kits.csv --orders orders.csv -O filtered.csv")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Worker count for both explosion and filter pools; replaces the
    /// config file's counts even when equal to the defaults
    #[arg(long, global = true)]
    workers: Option<usize>,

    /// Stop waiting after this many seconds and emit partial results
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Output format; replaces the config file's format
    #[arg(short, long, global = true)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long, global = true)]
    output_file: Option<PathBuf>,

    /// Accept kits that contain themselves instead of failing
    #[arg(long, global = true)]
    break_cycles: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Explode every root kit of the catalog
    Catalog {
        /// Kit-definition CSV
        #[arg(long)]
        kits: PathBuf,

        /// Also explode kits that are nested inside other kits
        #[arg(long)]
        include_child_assemblies: bool,
    },

    /// Explode the kits ordered on each order, with per-order totals
    Orders {
        /// Kit-definition CSV
        #[arg(long)]
        kits: PathBuf,

        /// Order line-item CSV
        #[arg(long)]
        orders: PathBuf,
    },

    /// Remove order lines already supplied by a kit on the same order
    Filter {
        /// Kit-definition CSV
        #[arg(long)]
        kits: PathBuf,

        /// Order line-item CSV
        #[arg(long)]
        orders: PathBuf,

        /// Match line keys exactly instead of by substring
        #[arg(long)]
        exact: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format (honours -O)
    ConfigSchema,

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .kit-breakout.yaml in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match run(cli) {
        Ok(exit_codes::SUCCESS) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

/// Layer CLI flags over the discovered config file and validate the result.
fn effective_config(cli: &Cli, customize: impl FnOnce(&mut AppConfig)) -> Result<AppConfig> {
    let mut builder = AppConfig::builder()
        .quiet(cli.quiet)
        .output_file(cli.output_file.clone())
        .completion_timeout_secs(cli.timeout);
    if cli.break_cycles {
        builder = builder.cycle_policy(CyclePolicy::Break);
    }
    let mut overrides = builder.build();
    customize(&mut overrides);

    let (mut config, loaded_from) =
        AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
    // merge skips override values equal to the defaults, so explicit flags
    // are applied on top.
    config.pin_flags(cli.workers, cli.output);
    if let Some(path) = loaded_from {
        if !config.behavior.quiet {
            tracing::debug!("Using config file {}", path.display());
        }
    }

    Ok(config.validated()?)
}

fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Catalog {
            kits,
            include_child_assemblies,
        } => {
            let include = *include_child_assemblies;
            let config = effective_config(&cli, |c| {
                c.catalog.include_child_assemblies = include;
            })?;
            cli::run_catalog_breakout(kits.clone(), config)
        }

        Commands::Orders { kits, orders } => {
            let config = effective_config(&cli, |_| {})?;
            cli::run_order_breakout(kits.clone(), orders.clone(), config)
        }

        Commands::Filter {
            kits,
            orders,
            exact,
        } => {
            let exact = *exact;
            let config = effective_config(&cli, |c| {
                if exact {
                    c.matching.mode = KeyMatchMode::Exact;
                }
            })?;
            cli::run_order_filter(kits.clone(), orders.clone(), config)
        }

        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "kit-breakout", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema => {
            let schema = config::generate_json_schema();
            match &cli.output_file {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) = config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 2] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    dirs::config_dir().map(|p| p.join("kit-breakout").display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in config::file::CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".kit-breakout.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                std::fs::write(&target, config::generate_example_config())
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(exit_codes::SUCCESS)
            }
        },
    }
}
