// src/config/validate.rs

use crate::config::model::ExecConfig;
use crate::errors::ConfigError;

const MAX_READ_BUFFER_SIZE: usize = 1 << 20;

pub fn validate_config(cfg: &ExecConfig) -> Result<(), ConfigError> {
    if cfg.read_buffer_size == 0 || cfg.read_buffer_size > MAX_READ_BUFFER_SIZE {
        return Err(ConfigError::Invalid(format!(
            "read_buffer_size must be in 1..={} (got {})",
            MAX_READ_BUFFER_SIZE, cfg.read_buffer_size
        )));
    }

    if cfg.excerpt_limit == Some(0) {
        return Err(ConfigError::Invalid(
            "excerpt_limit must be >= 1 (got 0); set attach_output = false to drop output"
                .to_string(),
        ));
    }

    Ok(())
}
