//! Configuration for the lumen front-end.
//!
//! Settings live in `config.toml` under the platform config directory.
//! Every field has a default, so a missing file or a partial one is fine.

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{
    AppConfig, AppearanceConfig, BackgroundsConfig, FormsConfig, LoggingConfig, NetworkConfig,
    ParticlesConfig, ViewportConfig,
};

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use lumen_core::DisplayMode;
use toml::{Table, Value};

const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "lumen.log";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "lumen")
}

/// Default location of the config file.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Default location of the log file.
pub fn default_log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join(LOG_FILE))
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::parse(&read(path)?)
    }

    /// Parse TOML text. Out-of-range values are corrected.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        Ok(config.sanitized())
    }
}

/// Record `mode` in the file at `path`, leaving every other key as written.
pub fn save_mode(path: &Path, mode: DisplayMode) -> Result<(), ConfigError> {
    let mut table = if path.exists() {
        read(path)?.parse::<Table>()?
    } else {
        Table::new()
    };
    if !matches!(table.get("appearance"), Some(Value::Table(_))) {
        table.insert("appearance".to_owned(), Value::Table(Table::new()));
    }
    if let Some(Value::Table(appearance)) = table.get_mut("appearance") {
        appearance.insert("mode".to_owned(), Value::String(mode.name().to_owned()));
    }
    tracing::debug!(path = %path.display(), mode = mode.name(), "saving display mode");
    write(path, &toml::to_string_pretty(&table)?)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, contents: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("lumen-config-test-{}-{name}", std::process::id()))
            .join(CONFIG_FILE)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = temp_path("missing");
        assert_eq!(AppConfig::load_from(&path).ok(), Some(AppConfig::default()));
    }

    #[test]
    fn test_save_mode_keeps_other_keys() {
        let path = temp_path("save-mode");
        let _ = fs::remove_dir_all(path.parent().expect("has parent"));
        fs::create_dir_all(path.parent().expect("has parent")).expect("mkdir");
        fs::write(&path, "[backgrounds]\nframe_rate = 500\n").expect("write");

        save_mode(&path, DisplayMode::Light).expect("save mode");

        let contents = fs::read_to_string(&path).expect("read");
        let table: Table = contents.parse().expect("valid toml");
        assert_eq!(table["backgrounds"]["frame_rate"].as_integer(), Some(500));
        assert_eq!(table["appearance"]["mode"].as_str(), Some("light"));
        assert!(table["backgrounds"].get("seed").is_none());

        let _ = fs::remove_dir_all(path.parent().expect("has parent"));
    }

    #[test]
    fn test_save_mode_creates_file() {
        let path = temp_path("save-mode-new");
        let _ = fs::remove_dir_all(path.parent().expect("has parent"));

        save_mode(&path, DisplayMode::Light).expect("save mode");
        let loaded = AppConfig::load_from(&path).expect("load");
        assert_eq!(loaded.appearance.mode, DisplayMode::Light);
        assert_eq!(loaded.backgrounds, AppConfig::default().backgrounds);

        let _ = fs::remove_dir_all(path.parent().expect("has parent"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let err = AppConfig::parse("appearance = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
