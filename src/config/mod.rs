// src/config/mod.rs

//! Execution configuration.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file or string (`loader.rs`).
//! - Validate value ranges (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{from_toml_str, load_from_path};
pub use model::{DEFAULT_READ_BUFFER_SIZE, ExecConfig};
pub use validate::validate_config;
