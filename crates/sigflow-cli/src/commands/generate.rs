//! Test signal generation command.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::wav::write_mono_f32;

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a sine with uniform additive noise
    NoisySine {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Length in samples
        #[arg(long, default_value = "1000")]
        length: usize,

        /// Phase increment per sample, in radians
        #[arg(long, default_value = "0.1")]
        step: f64,

        /// Sine amplitude
        #[arg(long, default_value = "5.0")]
        amplitude: f64,

        /// Noise half-width (noise is uniform in [-noise, noise])
        #[arg(long, default_value = "2.0")]
        noise: f64,

        /// PRNG seed
        #[arg(long, default_value = "305419896")]
        seed: u32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,
    },

    /// Generate an impulse
    Impulse {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Length in samples
        #[arg(long, default_value = "64")]
        length: usize,

        /// Impulse amplitude
        #[arg(long, default_value = "1.0")]
        amplitude: f64,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,
    },
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    match args.command {
        GenerateCommand::NoisySine {
            output,
            length,
            step,
            amplitude,
            noise,
            seed,
            sample_rate,
        } => {
            println!("Generating noisy sine...");
            println!("  amplitude {amplitude}, noise +/-{noise}, {length} samples");

            let samples = noisy_sine(length, step, amplitude, noise, seed);
            write_mono_f32(&output, &samples, sample_rate)?;
            println!("Wrote {} samples to {}", samples.len(), output.display());
        }

        GenerateCommand::Impulse {
            output,
            length,
            amplitude,
            sample_rate,
        } => {
            println!("Generating impulse...");

            let mut samples = vec![0.0; length];
            if let Some(first) = samples.first_mut() {
                *first = amplitude;
            }

            write_mono_f32(&output, &samples, sample_rate)?;
            println!("Wrote {} samples to {}", samples.len(), output.display());
        }
    }

    Ok(())
}

/// `sin(i * step) * amplitude` plus uniform noise in `[-noise, noise]`.
fn noisy_sine(length: usize, step: f64, amplitude: f64, noise: f64, seed: u32) -> Vec<f64> {
    let mut rng = XorShift32::new(seed);
    (0..length)
        .map(|i| (i as f64 * step).sin() * amplitude + (rng.next_f64() * 2.0 - 1.0) * noise)
        .collect()
}

/// Simple PRNG for noise generation (xorshift32)
struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    fn new(seed: u32) -> Self {
        // Zero is a fixed point of xorshift.
        Self {
            state: if seed == 0 { 0x1234_5678 } else { seed },
        }
    }

    /// Next value in [0, 1].
    fn next_f64(&mut self) -> f64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        f64::from(x) / f64::from(u32::MAX)
    }
}
