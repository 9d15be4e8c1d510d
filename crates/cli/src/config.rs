use anyhow::{Context as AnyhowContext, Result};
use std::path::Path;
use xcdeps_graph::ResolverConfig;

/// Resolver configuration from an optional TOML file, with the command-line
/// step budget taking precedence over the file.
pub fn load_config(path: Option<&Path>, step_budget: Option<usize>) -> Result<ResolverConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str::<ResolverConfig>(&raw)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => ResolverConfig::default(),
    };

    if let Some(step_budget) = step_budget {
        config.step_budget = step_budget;
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid resolver config: {e}"))?;
    log::debug!("Resolver config: {config:?}");
    Ok(config)
}
