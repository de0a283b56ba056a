mod app;
mod cli;
mod logging;

use std::io::stdout;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use lumen_config::{AppConfig, default_config_path};

use crate::app::App;
use crate::cli::Cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(default_config_path);
    let mut config = match &config_path {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::default(),
    };
    cli.apply(&mut config);

    logging::init(&config.logging);
    tracing::info!(
        mode = config.appearance.mode.name(),
        config = ?config_path,
        "starting lumen"
    );

    let terminal = ratatui::init();
    let result = execute!(stdout(), EnableMouseCapture)
        .map_err(color_eyre::Report::from)
        .and_then(|()| App::new(config, config_path).run(terminal));
    if let Err(err) = execute!(stdout(), DisableMouseCapture) {
        tracing::warn!(%err, "failed to disable mouse capture");
    }
    ratatui::restore();
    result
}
