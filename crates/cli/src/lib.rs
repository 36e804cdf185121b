pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "bookly",
    about = "Bookly pricing CLI",
    long_about = "Price venue bookings against stored service configuration and validate \
                  partner-edited catalog exports.",
    after_help = "Examples:\n  bookly quote --services services.json --booking booking.json\n  \
                  bookly validate --services services.json --json\n  bookly config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Price a booking request against a service catalog export")]
    Quote {
        #[arg(long, help = "Path to a venue_services JSON export (array or single record)")]
        services: PathBuf,
        #[arg(long, help = "Path to a booking request JSON file (array of lines)")]
        booking: PathBuf,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Validate a venue_services JSON export and report degraded rules")]
    Validate {
        #[arg(long, help = "Path to a venue_services JSON export (array or single record)")]
        services: PathBuf,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Quote { services, booking, json } => {
            commands::quote::run(&services, &booking, json)
        }
        Command::Validate { services, json } => commands::validate::run(&services, json),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
