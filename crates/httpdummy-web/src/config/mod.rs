//! Backend config: strict YAML file loading plus command-line overrides.

pub mod cli;
pub mod schema;

use std::fs;
use std::path::Path;

use httpdummy_core::error::{HttpDummyError, Result};

pub use cli::Cli;
pub use schema::Config;

pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)
        .map_err(|e| HttpDummyError::Config(format!("read {} failed: {e}", path.display())))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<Config> {
    let cfg: Config = serde_yaml::from_str(s)
        .map_err(|e| HttpDummyError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
