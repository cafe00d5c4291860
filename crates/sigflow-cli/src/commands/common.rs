//! Shared CLI helpers used across multiple commands.

use std::path::Path;

use sigflow_config::GraphConfig;
use sigflow_core::ProcessingSystem;

/// Load a graph file and build its processing system.
pub fn load_graph(path: &Path) -> anyhow::Result<(GraphConfig, ProcessingSystem)> {
    let config = GraphConfig::load(path)?;
    let system = config.build()?;
    tracing::info!(graph = %config.name, blocks = system.len(), "graph loaded");
    Ok((config, system))
}

/// Resolve the block to read: the one requested, or the last one declared.
pub fn output_block(system: &ProcessingSystem, requested: Option<&str>) -> anyhow::Result<String> {
    match requested {
        Some(name) if system.block_id(name).is_some() => Ok(name.to_string()),
        Some(name) => anyhow::bail!("block not found: {name}"),
        None => system
            .block_names()
            .last()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("graph has no blocks")),
    }
}
