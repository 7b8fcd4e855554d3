//! tickerconf - validate and inspect stock ticker device configuration
//!
//! # Usage
//! ```sh
//! tickerconf check --config ticker.toml
//! FINNHUB_API_KEY=... tickerconf show --json
//! tickerconf template > ticker.toml
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tickerconf::config::{CONFIG_PATH_VAR, ConfigLoader, DeviceSettings};
use tickerconf::domain::config::Configuration;
use tickerconf::domain::errors::ValidationError;
use tracing::{Level, error};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Stock ticker device configuration tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// TOML settings file (defaults to $TICKER_CONFIG, then factory defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ignore environment overrides
    #[arg(long)]
    no_env: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and list every violation
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the effective configuration (secrets redacted)
    Show {
        #[command(flatten)]
        source: SourceArgs,

        /// Emit JSON instead of a text summary
        #[arg(long)]
        json: bool,
    },
    /// Print the factory defaults as a TOML settings file
    Template,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Logs go to stderr so `show --json` output stays machine readable
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(validation) = err.downcast_ref::<ValidationError>() {
                eprintln!("Configuration rejected:");
                for violation in validation.violations() {
                    eprintln!("  - {}", violation);
                }
            } else {
                error!("{:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Check { source } => {
            let config = load(&source)?;
            println!(
                "OK: {} ticker(s), refresh every {}s",
                config.num_stocks(),
                config.display_settings().refresh_interval_seconds()
            );
        }
        Commands::Show { source, json } => {
            let config = load(&source)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print_summary(&config);
            }
        }
        Commands::Template => {
            print!("{}", DeviceSettings::default().to_toml_string()?);
        }
    }
    Ok(())
}

fn load(source: &SourceArgs) -> Result<Configuration> {
    let path = source
        .config
        .clone()
        .or_else(|| std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from));

    let mut loader = ConfigLoader::new();
    if let Some(path) = path {
        loader = loader.with_file(path)?;
    }
    if !source.no_env {
        loader = loader.with_env();
    }
    loader.load()
}

fn print_summary(config: &Configuration) {
    let primary = config.primary_credential();
    println!("WiFi primary:   {} (password {})", primary.ssid(), primary.password());
    match config.secondary_credential() {
        Some(secondary) => println!(
            "WiFi secondary: {} (password {})",
            secondary.ssid(),
            secondary.password()
        ),
        None => println!("WiFi secondary: <none>"),
    }
    println!("API key:        {}", config.api_key());

    println!("Tickers:");
    for (i, ticker) in config.tickers().enumerate() {
        if ticker.tracks_holdings() {
            println!("  {}. {:<6} {} shares", i + 1, ticker.symbol(), ticker.shares_owned());
        } else {
            println!("  {}. {:<6} price only", i + 1, ticker.symbol());
        }
    }

    let display = config.display_settings();
    println!(
        "Display:        refresh {}s, flipped {}",
        display.refresh_interval_seconds(),
        display.flipped()
    );

    let pins = config.pin_map();
    println!(
        "Pins:           SDA {} SCL {} RST {} button {} addr {:#04x}",
        pins.data_pin, pins.clock_pin, pins.reset_pin, pins.button_pin, pins.display_address
    );
}
