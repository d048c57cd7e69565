use anyhow::{Context, Result};
use catmap::feed::FeedConfig;
use std::fs;
use std::path::Path;

/// Reads the feed configuration from a TOML file, then applies environment
/// overrides.
pub fn load_from_file(path: &Path) -> Result<FeedConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let config: FeedConfig =
        toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;
    Ok(config.with_env_overrides())
}
