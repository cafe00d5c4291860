//! Mono WAV reading and 32-bit float writing.

use std::path::Path;

use anyhow::Context;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

/// Samples of a WAV file mixed down to mono, plus its sample rate.
#[derive(Debug)]
pub struct MonoWav {
    pub samples: Vec<f64>,
    pub sample_rate: u32,
}

/// Read a WAV file, normalising integer PCM to [-1, 1) and averaging channels.
pub fn read_mono(path: &Path) -> anyhow::Result<MonoWav> {
    let reader =
        WavReader::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = int_full_scale(spec.bits_per_sample)
                .with_context(|| format!("unsupported WAV header in {}", path.display()))?;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok(MonoWav {
        samples: mix_to_mono(interleaved, channels),
        sample_rate: spec.sample_rate,
    })
}

/// Magnitude of the most negative integer sample at `bits` depth.
fn int_full_scale(bits: u16) -> anyhow::Result<f64> {
    match bits.checked_sub(1) {
        Some(shift @ 0..=31) => Ok(f64::from(1u32 << shift)),
        _ => anyhow::bail!("integer sample depth of {bits} bits is not supported"),
    }
}

/// Average interleaved frames; a trailing partial frame is averaged over the
/// samples it has.
fn mix_to_mono(interleaved: Vec<f64>, channels: usize) -> Vec<f64> {
    if channels <= 1 {
        return interleaved;
    }
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f64>() / frame.len() as f64)
        .collect()
}

/// Write mono samples as a 32-bit IEEE float WAV file.
pub fn write_mono_f32(path: &Path, samples: &[f64], sample_rate: u32) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for &sample in samples {
        writer.write_sample(sample as f32)?;
    }
    writer.finalize()?;
    Ok(())
}
