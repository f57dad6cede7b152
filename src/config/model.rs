// src/config/model.rs

use serde::Deserialize;

pub const DEFAULT_READ_BUFFER_SIZE: usize = 8192;

/// Per-execution settings.
///
/// ```toml
/// log_output = true
/// attach_output = true
/// excerpt_limit = 4096
/// read_buffer_size = 8192
/// ```
///
/// Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecConfig {
    /// When false, only launch/finish records reach the logger; output lines
    /// are still captured and recorded.
    #[serde(default = "default_true")]
    pub log_output: bool,

    /// Attach the combined output to `ExitStatusError` on non-zero exit.
    #[serde(default = "default_true")]
    pub attach_output: bool,

    /// Keep at most this many trailing characters of the attached output.
    #[serde(default)]
    pub excerpt_limit: Option<usize>,

    /// Size of the chunk each pump reads from a pipe.
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
}

fn default_true() -> bool {
    true
}

fn default_read_buffer_size() -> usize {
    DEFAULT_READ_BUFFER_SIZE
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            log_output: true,
            attach_output: true,
            excerpt_limit: None,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}
