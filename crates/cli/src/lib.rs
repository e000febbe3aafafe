pub mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use haggle_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(
    name = "haggle",
    about = "Haggle negotiation simulator CLI",
    long_about = "Run deterministic buyer-vs-seller negotiation simulations and inspect the \
                  effective engine configuration.",
    after_help = "Examples:\n  haggle simulate\n  haggle simulate --preset insider\n  haggle config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run the scenario matrix against the scripted seller and report outcomes")]
    Simulate {
        #[arg(long, help = "Restrict the run to one policy preset (default|composed|insider)")]
        preset: Option<String>,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution per field"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Simulate { preset } => {
            let options = LoadOptions {
                overrides: ConfigOverrides { preset: preset.clone(), ..ConfigOverrides::default() },
                ..LoadOptions::default()
            };
            match AppConfig::load(options) {
                Ok(config) => {
                    init_logging(&config);
                    commands::simulate::run(&config, preset.as_deref())
                }
                Err(error) => commands::CommandResult::failure(
                    "simulate",
                    "config_validation",
                    error.to_string(),
                    2,
                ),
            }
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn init_logging(config: &AppConfig) {
    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    // try_init: the level may already be set when commands run inside tests.
    let _ = match config.logging.format {
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .compact()
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .pretty()
            .try_init(),
        LogFormat::Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().try_init()
        }
    };
}
