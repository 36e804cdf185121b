use std::process::ExitCode;

use bookly_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use bookly_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

fn main() -> ExitCode {
    // Load config and initialize logging before dispatching any command.
    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => init_logging(&config),
        Err(error) => {
            eprintln!("configuration error: {error}");
            return ExitCode::from(2);
        }
    }

    bookly_cli::run()
}
