//! Bitzy storefront CLI
//!
//! Resolves the delivery location, searches places, lists the menu and
//! prices a cart from the terminal.

use anyhow::Result;
use bitzy_core::config::Config;
use bitzy_core::error::exit_codes;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod app;
mod commands;

use app::{App, OutputFormat};
use commands::{config, locate, menu, prefs, quote, search, set_location};

/// Delivery location, menu and cart tools for Bitzy
#[derive(Parser)]
#[command(name = "bitzy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to bitzy.toml or the user config dir)
    #[arg(short, long, global = true, env = "BITZY_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Keep cached location and preferences in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the delivery location (cache, device, IP)
    Locate(locate::LocateArgs),

    /// Search places and optionally pick one as the delivery location
    Search(search::SearchArgs),

    /// Choose the delivery location by hand
    SetLocation(set_location::SetLocationArgs),

    /// List the menu with filters and sorting
    Menu(menu::MenuArgs),

    /// Build a cart from menu items and print the totals
    Quote(quote::QuoteArgs),

    /// Show or change display preferences
    Prefs(prefs::PrefsArgs),

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return report(&anyhow::Error::new(e), cli.format),
    };

    let mut telemetry = bitzy_telemetry::TelemetryConfig::from_section(&config.schema.telemetry);
    if cli.verbose {
        telemetry = telemetry.verbose();
    }
    let _guard = match bitzy_telemetry::init_with_config(telemetry) {
        Ok(guard) => guard,
        Err(e) => return report(&e, cli.format),
    };

    let format = cli.format;
    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e, format),
    }
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let app = App::new(config, cli.format, cli.ephemeral)?;

    match cli.command {
        Commands::Locate(args) => locate::run(&app, args).await,
        Commands::Search(args) => search::run(&app, args).await,
        Commands::SetLocation(args) => set_location::run(&app, args),
        Commands::Menu(args) => menu::run(&app, &args),
        Commands::Quote(args) => quote::run(&app, &args),
        Commands::Prefs(args) => prefs::run(&app, args),
        Commands::Config => config::run(&app),
    }
}

fn report(err: &anyhow::Error, format: OutputFormat) -> ExitCode {
    let structured = match (format, err.downcast_ref::<bitzy_core::Error>()) {
        (OutputFormat::Json, Some(core)) => serde_json::to_string(&core.to_report()).ok(),
        _ => None,
    };
    match structured {
        Some(json) => eprintln!("{json}"),
        None => eprintln!("{} {:#}", "Error:".red().bold(), err),
    }
    let code = u8::try_from(exit_code(err)).unwrap_or(1);
    ExitCode::from(code)
}

/// Exit status for an error chain
fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(core) = err.downcast_ref::<bitzy_core::Error>() {
        return core.exit_code();
    }
    let invalid_input = err.downcast_ref::<bitzy_cart::CartError>().is_some()
        || err.downcast_ref::<bitzy_geo::GeoError>().is_some()
        || matches!(
            err.downcast_ref::<bitzy_location::LocationError>(),
            Some(bitzy_location::LocationError::InvalidLocation(_))
        )
        || matches!(
            err.downcast_ref::<bitzy_menu::MenuError>(),
            Some(bitzy_menu::MenuError::UnknownSortKey(_) | bitzy_menu::MenuError::DuplicateId { .. })
        )
        || err.downcast_ref::<commands::UsageError>().is_some();

    if invalid_input {
        exit_codes::VALIDATION_ERROR
    } else {
        exit_codes::FAILURE
    }
}
