//! File-based graph processing command.

use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use super::common::{load_graph, output_block};
use crate::wav::{read_mono, write_mono_f32};

#[derive(Args)]
pub struct ProcessArgs {
    /// Graph description (TOML)
    #[arg(value_name = "GRAPH")]
    graph: PathBuf,

    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file (32-bit float)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Block whose output is written (defaults to the last declared block)
    #[arg(short, long)]
    block: Option<String>,

    /// Samples per progress update
    #[arg(long, default_value = "512")]
    block_size: usize,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        anyhow::bail!("--block-size must be at least 1");
    }

    let (config, mut system) = load_graph(&args.graph)?;
    let block = output_block(&system, args.block.as_deref())?;

    println!("Reading {}...", args.input.display());
    let wav = read_mono(&args.input)?;
    let samples = wav.samples;
    println!(
        "  {} samples, {} Hz, {:.2}s",
        samples.len(),
        wav.sample_rate,
        samples.len() as f64 / f64::from(wav.sample_rate.max(1))
    );

    println!("Processing through '{}' of graph '{}'...", block, config.name);

    let pb = ProgressBar::new(samples.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    // Block state carries across chunks, so chunking only affects progress.
    let mut output = vec![0.0; samples.len()];
    for (in_chunk, out_chunk) in samples
        .chunks(args.block_size)
        .zip(output.chunks_mut(args.block_size))
    {
        system.process_signal_into(&block, in_chunk, out_chunk)?;
        pb.inc(in_chunk.len() as u64);
    }
    pb.finish_with_message("done");

    println!("\nStats:");
    println!(
        "  Input:  RMS {:.4} ({:.1} dB), Peak {:.4} ({:.1} dB)",
        rms(&samples),
        linear_to_db(rms(&samples)),
        peak(&samples),
        linear_to_db(peak(&samples))
    );
    println!(
        "  Output: RMS {:.4} ({:.1} dB), Peak {:.4} ({:.1} dB)",
        rms(&output),
        linear_to_db(rms(&output)),
        peak(&output),
        linear_to_db(peak(&output))
    );

    println!("\nWriting {}...", args.output.display());
    write_mono_f32(&args.output, &output, wav.sample_rate)?;
    tracing::info!(samples = output.len(), block = %block, "processing complete");
    println!("Done!");

    Ok(())
}

fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f64).sqrt()
}

fn peak(samples: &[f64]) -> f64 {
    samples.iter().map(|s| s.abs()).fold(0.0, f64::max)
}

fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}
