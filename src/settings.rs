//! Loading [`TrafficConfig`] from a TOML file

use std::path::Path;

use anyhow::{Context, Result, bail};
use corridorwatch_core::prelude::*;
use tracing::{info, warn};

/// Environment variable that takes precedence over `api_key` in the file
pub const API_KEY_VAR: &str = "CORRIDORWATCH_API_KEY";

pub fn load(path: &Path) -> Result<TrafficConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let api_key = std::env::var(API_KEY_VAR).ok();
    let config = parse(&raw, api_key)
        .with_context(|| format!("invalid config file {}", path.display()))?;

    info!(
        "Loaded {} corridors from {}, polling every {}s",
        config.corridors.len(),
        path.display(),
        config.poll_seconds
    );
    Ok(config)
}

/// Parse and validate, letting `api_key_override` replace the file's key
pub fn parse(raw: &str, api_key_override: Option<String>) -> Result<TrafficConfig> {
    let mut config: TrafficConfig = toml::from_str(raw)?;

    if let Some(key) = api_key_override.filter(|key| !key.trim().is_empty()) {
        config.api_key = key;
    }
    config.validate()?;

    let invalid = config.invalid_corridors();
    for (corridor, error) in &invalid {
        warn!("Corridor {} will fail every poll: {error}", corridor.name);
    }
    if invalid.len() == config.corridors.len() {
        bail!("none of the configured corridors has a usable bbox");
    }

    Ok(config)
}
