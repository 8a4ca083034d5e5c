//! Config file loading.

use crate::{ConfigError, DaybookConfig};
use log::debug;
use std::fs;
use std::path::Path;

/// Load a config file, returning defaults when the path is absent.
pub fn load_config(path: &Path) -> Result<DaybookConfig, ConfigError> {
    if !path.exists() {
        debug!("config file missing, using defaults (path={})", path.display());
        return Ok(DaybookConfig::default());
    }
    debug!("loading config (path={})", path.display());
    let contents = fs::read_to_string(path)?;
    let config: DaybookConfig = json5::from_str(&contents)?;
    Ok(config)
}
