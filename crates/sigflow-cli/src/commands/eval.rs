//! Single-value graph evaluation command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use super::common::{load_graph, output_block};

#[derive(Args)]
pub struct EvalArgs {
    /// Graph description (TOML)
    #[arg(value_name = "GRAPH")]
    graph: PathBuf,

    /// External input value fed to every unwired block
    #[arg(short, long, allow_negative_numbers = true)]
    input: f64,

    /// Evaluate only this block (default: every block)
    #[arg(short, long)]
    block: Option<String>,

    /// Number of successive evaluations with the same input
    #[arg(short, long, default_value = "1")]
    repeat: usize,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct EvalReport {
    graph: String,
    input: f64,
    steps: Vec<BTreeMap<String, f64>>,
}

pub fn run(args: EvalArgs) -> anyhow::Result<()> {
    let (config, mut system) = load_graph(&args.graph)?;

    let mut steps = Vec::with_capacity(args.repeat);
    match args.block.as_deref() {
        Some(requested) => {
            let name = output_block(&system, Some(requested))?;
            for _ in 0..args.repeat {
                let value = system.compute_block(&name, args.input)?;
                steps.push(BTreeMap::from([(name.clone(), value)]));
            }
        }
        None => {
            for _ in 0..args.repeat {
                steps.push(system.compute_all(args.input)?);
            }
        }
    }
    tracing::debug!(steps = steps.len(), "evaluation finished");

    let report = EvalReport {
        graph: config.name,
        input: args.input,
        steps,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &EvalReport) {
    println!("Graph: {} (input {})", report.graph, report.input);
    for (step, outputs) in report.steps.iter().enumerate() {
        println!("step {step}:");
        for (name, value) in outputs {
            println!("  {name:<16} {value:.6}");
        }
    }
}
