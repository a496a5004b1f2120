mod assets;
mod cli;
mod commands;
mod config;
mod logging;

pub use cli::{parse_field_spec, Cli, Command, FieldSpec};
pub use config::{config_path, load_config, save_config, AppConfig, ConfigError};

use anyhow::Context;
use certyfikaty_core::{LogReporter, ProgressReporter, Status};
use clap::Parser;

/// Prints statuses for the user and mirrors them to the log. With `quiet`
/// set the statuses only go to the log.
struct ConsoleReporter {
    quiet: bool,
    log: LogReporter,
}

impl ConsoleReporter {
    fn new(quiet: bool) -> Self {
        Self {
            quiet,
            log: LogReporter,
        }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn report(&mut self, status: &Status) {
        if self.quiet {
            self.log.report(status);
        } else {
            log::debug!("[Status] {}", status);
            println!("{}", status);
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::config_path()?,
    };
    let config = config::load_config(&config_path)
        .with_context(|| format!("cannot load config {}", config_path.display()))?;

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        config.log_level_filter()
    };
    logging::init(level)?;
    log::debug!("[Startup] config {}", config_path.display());

    let mut reporter = ConsoleReporter::new(cli.quiet);
    commands::dispatch(cli.command, &config, &config_path, &mut reporter)
}
