//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use ndarray::{Array2, ArrayView2};
use std::io::Read;
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = u64::from(reader.len()); // total across all channels
    let num_frames = total_samples / u64::from(spec.channels.max(1));
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 22050, 44100).
    pub sample_rate: u32,
    /// Bit depth per sample; 32 is written as float, anything else as PCM.
    pub bits_per_sample: u16,
}

impl WavSpec {
    /// The same spec with a single channel.
    pub fn mono(self) -> Self {
        Self { channels: 1, ..self }
    }
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Full-scale value for integer PCM of the given width.
fn full_scale(bits: u16) -> Result<f64> {
    if bits == 0 || bits > 32 {
        return Err(Error::UnsupportedFormat(format!("{bits}-bit PCM")));
    }
    Ok(2f64.powi(i32::from(bits) - 1))
}

/// Decode all interleaved samples, normalized to `[-1, 1]`.
fn read_interleaved<R: Read>(reader: WavReader<R>) -> Result<Vec<f64>> {
    let spec = reader.spec();
    match spec.sample_format {
        SampleFormat::Float => {
            if spec.bits_per_sample != 32 {
                return Err(Error::UnsupportedFormat(format!(
                    "{}-bit float",
                    spec.bits_per_sample
                )));
            }
            Ok(reader
                .into_samples::<f32>()
                .map(|s| s.map(f64::from))
                .collect::<std::result::Result<Vec<_>, _>>()?)
        }
        SampleFormat::Int => {
            let max_val = full_scale(spec.bits_per_sample)?;
            Ok(reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?)
        }
    }
}

/// Read a WAV file as mono `f64` samples along with its spec.
///
/// Multi-channel files are mixed down by averaging channels.
///
/// # Example
/// ```ignore
/// let (samples, spec) = read_wav("input.wav")?;
/// println!("Loaded {} samples at {} Hz", samples.len(), spec.sample_rate);
/// ```
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f64>, WavSpec)> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = usize::from(spec.channels.max(1));
    tracing::info!(
        path = %path.display(),
        sample_rate = spec.sample_rate,
        channels,
        bits = spec.bits_per_sample,
        "reading wav"
    );

    let samples = read_interleaved(reader)?;

    let mono = if channels > 1 {
        tracing::debug!(channels, "averaging channels to mono");
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f64>() / channels as f64)
            .collect()
    } else {
        samples
    };

    Ok((mono, spec))
}

/// Read a WAV file as a `[samples, channels]` matrix along with its spec.
pub fn read_wav_channels<P: AsRef<Path>>(path: P) -> Result<(Array2<f64>, WavSpec)> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = usize::from(spec.channels.max(1));
    tracing::info!(path = %path.display(), sample_rate = spec.sample_rate, channels, "reading wav");

    let mut samples = read_interleaved(reader)?;
    // A truncated final frame is dropped.
    let num_frames = samples.len() / channels;
    samples.truncate(num_frames * channels);
    let matrix = Array2::from_shape_vec((num_frames, channels), samples)
        .map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    Ok((matrix, spec))
}

/// Write mono samples to a WAV file.
///
/// `spec.channels` is ignored; the file always has one channel.
///
/// # Example
/// ```ignore
/// let samples = vec![0.0; 44100]; // 1 second of silence
/// write_wav("output.wav", &samples, WavSpec::default())?;
/// ```
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f64], spec: WavSpec) -> Result<()> {
    let spec = spec.mono();
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;
    write_samples(&mut writer, samples.iter().copied(), spec.bits_per_sample)?;
    writer.finalize()?;
    Ok(())
}

/// Write a `[samples, channels]` matrix to a WAV file.
///
/// The channel count comes from the matrix, not from `spec`.
pub fn write_wav_channels<P: AsRef<Path>>(
    path: P,
    samples: ArrayView2<'_, f64>,
    spec: WavSpec,
) -> Result<()> {
    let channels = u16::try_from(samples.ncols())
        .ok()
        .filter(|&c| c > 0)
        .ok_or_else(|| Error::UnsupportedFormat(format!("{} channels", samples.ncols())))?;
    let spec = WavSpec { channels, ..spec };

    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;
    // Row-major iteration interleaves the channels.
    write_samples(&mut writer, samples.iter().copied(), spec.bits_per_sample)?;
    writer.finalize()?;
    Ok(())
}

fn write_samples<W, I>(writer: &mut WavWriter<W>, samples: I, bits_per_sample: u16) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
    I: Iterator<Item = f64>,
{
    if bits_per_sample == 32 {
        for sample in samples {
            writer.write_sample(sample as f32)?;
        }
    } else {
        let max_val = full_scale(bits_per_sample)?;
        for sample in samples {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_sample)?;
        }
    }
    Ok(())
}
