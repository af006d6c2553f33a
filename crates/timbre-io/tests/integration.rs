//! Integration tests for timbre-io WAV I/O.

use ndarray::Array2;
use tempfile::NamedTempFile;
use timbre_io::{
    WavFormat, WavSpec, read_wav, read_wav_channels, read_wav_info, write_wav, write_wav_channels,
};

/// Generate a sine wave at the given sample rate.
fn sine_wave(sample_rate: u32, freq_hz: f64, num_samples: usize) -> Vec<f64> {
    (0..num_samples)
        .map(|i| (2.0 * std::f64::consts::PI * freq_hz * i as f64 / f64::from(sample_rate)).sin())
        .collect()
}

// ---------------------------------------------------------------------------
// WAV roundtrip tests -- mono
// ---------------------------------------------------------------------------

#[test]
fn wav_roundtrip_mono_f32_22050() {
    let sr = 22050;
    let samples = sine_wave(sr, 440.0, sr as usize);
    let spec = WavSpec {
        channels: 1,
        sample_rate: sr,
        bits_per_sample: 32,
    };

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &samples, spec).unwrap();

    let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
    assert_eq!(loaded_spec, spec);
    assert_eq!(loaded.len(), samples.len());

    for (a, b) in samples.iter().zip(loaded.iter()) {
        assert!(
            (a - b).abs() < 1e-6,
            "sample mismatch: {a} vs {b} (diff={})",
            (a - b).abs()
        );
    }
}

#[test]
fn wav_roundtrip_mono_i24() {
    let sr = 48000;
    let samples = sine_wave(sr, 1000.0, 4800);
    let spec = WavSpec {
        channels: 1,
        sample_rate: sr,
        bits_per_sample: 24,
    };

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &samples, spec).unwrap();

    let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
    assert_eq!(loaded_spec.bits_per_sample, 24);
    for (a, b) in samples.iter().zip(loaded.iter()) {
        assert!((a - b).abs() < 1e-6);
    }
}

#[test]
fn wav_write_ignores_spec_channels_for_mono() {
    let spec = WavSpec {
        channels: 2,
        sample_rate: 8000,
        bits_per_sample: 16,
    };
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &[0.25; 100], spec).unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.channels, 1);
    assert_eq!(info.num_frames, 100);
}

#[test]
fn wav_clips_out_of_range_pcm() {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
    };
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &[2.0, -2.0], spec).unwrap();

    let (loaded, _) = read_wav(file.path()).unwrap();
    assert!((loaded[0] - 32767.0 / 32768.0).abs() < 1e-12);
    assert_eq!(loaded[1], -1.0);
}

// ---------------------------------------------------------------------------
// Multichannel
// ---------------------------------------------------------------------------

#[test]
fn wav_roundtrip_channels_matrix() {
    let sr = 44100;
    let left = sine_wave(sr, 440.0, 1000);
    let right = sine_wave(sr, 660.0, 1000);
    let matrix = Array2::from_shape_fn((1000, 2), |(i, c)| if c == 0 { left[i] } else { right[i] });

    let file = NamedTempFile::new().unwrap();
    write_wav_channels(
        file.path(),
        matrix.view(),
        WavSpec {
            sample_rate: sr,
            ..Default::default()
        },
    )
    .unwrap();

    let (loaded, spec) = read_wav_channels(file.path()).unwrap();
    assert_eq!(spec.channels, 2);
    assert_eq!(loaded.dim(), (1000, 2));
    for (a, b) in matrix.iter().zip(loaded.iter()) {
        assert!((a - b).abs() < 1e-6);
    }

    let (mono, _) = read_wav(file.path()).unwrap();
    for i in 0..1000 {
        assert!((mono[i] - (left[i] + right[i]) / 2.0).abs() < 1e-6);
    }
}

#[test]
fn wav_mono_file_reads_as_one_column() {
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &[0.1, 0.2, 0.3], WavSpec::default()).unwrap();

    let (matrix, _) = read_wav_channels(file.path()).unwrap();
    assert_eq!(matrix.dim(), (3, 1));
}

#[test]
fn wav_rejects_zero_channel_matrix() {
    let file = NamedTempFile::new().unwrap();
    let empty = Array2::<f64>::zeros((10, 0));
    assert!(write_wav_channels(file.path(), empty.view(), WavSpec::default()).is_err());
}

// ---------------------------------------------------------------------------
// WAV edge cases and metadata
// ---------------------------------------------------------------------------

#[test]
fn wav_write_empty_buffer() {
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &[], WavSpec::default()).unwrap();

    let (loaded, _) = read_wav(file.path()).unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn wav_info_stereo_i16() {
    let spec = WavSpec {
        channels: 2,
        sample_rate: 44100,
        bits_per_sample: 16,
    };
    let file = NamedTempFile::new().unwrap();
    write_wav_channels(file.path(), Array2::zeros((44100, 2)).view(), spec)
        .unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.channels, 2);
    assert_eq!(info.sample_rate, 44100);
    assert_eq!(info.bits_per_sample, 16);
    assert_eq!(info.num_frames, 44100);
    assert_eq!(info.format, WavFormat::Pcm);
    assert!((info.duration_secs - 1.0).abs() < 1e-12);
}

#[test]
fn wav_missing_file_is_error() {
    assert!(read_wav("/nonexistent/timbre/missing.wav").is_err());
}
