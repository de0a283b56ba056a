//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use lumen_config::AppConfig;
use lumen_core::{BackgroundKind, DisplayMode};

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Palette to start in.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Background for the home screen.
    #[arg(long, value_enum)]
    pub background: Option<BackgroundArg>,

    /// Fixed seed for background layout.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Dark,
    Light,
}

impl From<ModeArg> for DisplayMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Dark => DisplayMode::Dark,
            ModeArg::Light => DisplayMode::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackgroundArg {
    Network,
    Particles,
}

impl From<BackgroundArg> for BackgroundKind {
    fn from(arg: BackgroundArg) -> Self {
        match arg {
            BackgroundArg::Network => BackgroundKind::Network,
            BackgroundArg::Particles => BackgroundKind::Particles,
        }
    }
}

impl Cli {
    /// Override file settings with the flags that were given.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(mode) = self.mode {
            config.appearance.mode = mode.into();
        }
        if let Some(background) = self.background {
            config.backgrounds.home = background.into();
        }
        if let Some(seed) = self.seed {
            config.backgrounds.seed = Some(seed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from(["lumen", "--mode", "light", "--background", "particles"]);
        let mut config = AppConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.appearance.mode, DisplayMode::Light);
        assert_eq!(config.backgrounds.home, BackgroundKind::Particles);
        assert_eq!(config.backgrounds.seed, None);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::parse_from(["lumen"]);
        let mut config = AppConfig::default();
        config.appearance.mode = DisplayMode::Light;
        cli.apply(&mut config);
        assert_eq!(config.appearance.mode, DisplayMode::Light);
    }

    #[test]
    fn test_seed_flag() {
        let cli = Cli::parse_from(["lumen", "--seed", "7", "--config", "/tmp/x.toml"]);
        let mut config = AppConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.backgrounds.seed, Some(7));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
    }
}
