//! User configuration: formatting and delimited-file defaults from TOML.

use datasheet_core::{CsvOptions, FormatOptions};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_BYTES: u64 = 64 * 1024;

/// Contents of `config.toml`.
///
/// ```toml
/// [format]
/// currency_symbol = "$"
/// decimal_separator = ","
///
/// [csv]
/// delimiter = ";"
/// with_column_names = true
/// encoding = "windows-1252"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub format: FormatOptions,
    pub csv: CsvOptions,
}

/// Load the configuration, falling back to defaults.
///
/// `config_file` overrides the user config path. Problems never abort; they
/// are reported as warnings alongside the default configuration.
pub fn load_config(config_file: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.map(Path::to_path_buf).or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_BYTES => {
            warnings.push(format!(
                "Config file too large ({} bytes, limit {}): {}",
                meta.len(),
                MAX_CONFIG_BYTES,
                path.display()
            ));
            return (Config::default(), warnings);
        }
        Ok(_) => {}
        Err(err) => {
            warnings.push(format!("Failed to read {}: {}", path.display(), err));
            return (Config::default(), warnings);
        }
    }

    let config = match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<Config>(&content) {
            Ok(parsed) => parsed,
            Err(err) => {
                warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                return (Config::default(), warnings);
            }
        },
        Err(err) => {
            warnings.push(format!("Failed to read {}: {}", path.display(), err));
            return (Config::default(), warnings);
        }
    };

    let mut config = config;
    if let Err(err) = config.csv.validate() {
        warnings.push(format!("{} in {}, using [csv] defaults", err, path.display()));
        config.csv = CsvOptions::default();
    }
    tracing::debug!(path = %path.display(), "loaded config");
    (config, warnings)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "datasheet")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
