// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::ExecConfig;
use crate::config::validate::validate_config;
use crate::errors::ConfigError;

/// Parse and validate a TOML document.
pub fn from_toml_str(contents: &str) -> Result<ExecConfig, ConfigError> {
    let config: ExecConfig = toml::from_str(contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Read, parse and validate a TOML config file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ExecConfig, ConfigError> {
    let contents = fs::read_to_string(path.as_ref())?;
    from_toml_str(&contents)
}
