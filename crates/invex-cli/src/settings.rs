//! Configuration lookup for the CLI.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use invex_core::InvexConfig;

/// Environment variable naming an explicit config file.
const CONFIG_ENV: &str = "INVEX_CONFIG";

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invex")
        .join("config.json")
}

/// Load configuration: `$INVEX_CONFIG`, else the per-user file if it
/// exists, else defaults. `INVEX_*` variables are applied last.
pub fn load() -> anyhow::Result<InvexConfig> {
    let mut config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            let path = Path::new(&path);
            InvexConfig::from_file(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?
        }
        None => {
            let path = default_config_path();
            if path.exists() {
                debug!("Using config file {}", path.display());
                InvexConfig::from_file(&path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?
            } else {
                InvexConfig::default()
            }
        }
    };

    config.apply_env()?;
    debug!(
        model = %config.model.name,
        base_url = %config.model.base_url,
        database = %config.store.database.display(),
        "Configuration loaded"
    );
    Ok(config)
}
