//! KPI configuration loading.
//!
//! Precedence: explicit `--config` path, then the `LABKPI_CONFIG`
//! environment variable, then built-in defaults. Partial files are
//! merged over the defaults by serde.

use std::fs;
use std::path::{Path, PathBuf};

use labkpi_model::{KpiConfig, KpiError, Result};

/// Environment variable naming a config file to load when no explicit
/// path is given.
pub const CONFIG_ENV_VAR: &str = "LABKPI_CONFIG";

/// Loads the effective configuration.
///
/// An explicit path or an env-var path must exist and parse; only the
/// absence of both falls back to defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<KpiConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
    };
    let Some(path) = path else {
        return Ok(KpiConfig::default());
    };
    read_config_file(&path)
}

fn read_config_file(path: &Path) -> Result<KpiConfig> {
    let raw = fs::read_to_string(path)?;
    let config: KpiConfig = serde_json::from_str(&raw)
        .map_err(|error| KpiError::Config(format!("{}: {error}", path.display())))?;
    tracing::info!(path = %path.display(), "loaded KPI config");
    Ok(config)
}
