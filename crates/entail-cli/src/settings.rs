//! Engine configuration as seen from the command line.
//!
//! Precedence: flags, then the `--config` file, then built-in defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use entail_engine::EngineConfig;

/// Flag values that override the config file when present.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub max_models: Option<u64>,
    pub timeout_ms: Option<u64>,
}

pub fn load(config_path: Option<&Path>, overrides: Overrides) -> Result<EngineConfig> {
    let mut config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str::<EngineConfig>(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    if let Some(max_models) = overrides.max_models {
        config.truth_table.max_models = Some(max_models);
    }
    if let Some(timeout_ms) = overrides.timeout_ms {
        config.truth_table.max_millis = Some(timeout_ms);
    }

    tracing::debug!(?config, "engine configuration");
    Ok(config)
}
