mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::PathBuf;

use brailledit_config::Config;
use brailledit_logger::LogLevel;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config first so the logger can use its settings
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_default(),
    };

    let min_level = config
        .logging
        .min_level
        .parse::<LogLevel>()
        .unwrap_or(LogLevel::Info);
    if let Err(err) = brailledit_logger::init(
        config.logging.file_path.as_ref().map(PathBuf::from),
        config.logging.max_entries,
        min_level,
    ) {
        eprintln!("Failed to initialize logger: {}", err);
    }
    log::debug!("Running {:?}", cli.command);

    let mut stdout = io::stdout().lock();
    let result = commands::run(cli.command, &config, &mut stdout);

    // Print error if there was one
    if let Err(err) = result {
        log::error!("{:#}", err);
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }

    Ok(())
}
