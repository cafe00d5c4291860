//! Display graph file contents.

use clap::Args;
use sigflow_config::{BlockConfig, GraphConfig, PolicyConfig};

/// Describe a graph file.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the graph file
    pub file: std::path::PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let config = GraphConfig::load(&args.file)?;

    println!("File:        {}", args.file.display());
    println!("Graph:       {}", config.name);
    if let Some(description) = &config.description {
        println!("Description: {description}");
    }
    let policy = match config.policy {
        PolicyConfig::PerPath => "per-path",
        PolicyConfig::OncePerSample => "once-per-sample",
    };
    println!("Policy:      {policy}");
    println!("Blocks:      {}", config.len());
    println!();

    for block in &config.blocks {
        let sources = config
            .sources_of(block.name())
            .filter(|s| !s.is_empty())
            .map(|s| s.join(", "))
            .unwrap_or_else(|| "<external input>".to_string());
        println!(
            "  {:<16} {:<9} inputs={}  <- {}",
            block.name(),
            block.kind(),
            block.input_count(),
            sources
        );
        println!("  {:<16} {}", "", describe(block));
    }
    println!();

    // Building also catches cycles, which validation leaves to the graph.
    config.build()?;
    println!("Status:      ok");

    Ok(())
}

fn describe(block: &BlockConfig) -> String {
    match block {
        BlockConfig::Fir { coefficients, .. } => format!("b = {coefficients:?}"),
        BlockConfig::Iir { b, a, .. } => format!("b = {b:?}, a = {a:?}"),
        BlockConfig::Summator { u, v, .. } => format!("y = {u} * x1 + {v} * x2"),
    }
}
