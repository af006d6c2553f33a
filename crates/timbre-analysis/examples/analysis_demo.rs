//! Analysis demo: STFT round trip, MFCC, chromagram and MDCT of a C major chord.
//!
//! Run with: cargo run -p timbre-analysis --example analysis_demo

use timbre_analysis::export::channel_frequencies;
use timbre_analysis::{
    CqtKernel, MelFilterBank, Window, cqt_chromagram, imdct, istft, kbd_window, mdct, mfcc, stft,
};
use std::f64::consts::PI;

const PITCH_CLASSES: [&str; 12] = ["A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#"];

fn main() -> timbre_analysis::Result<()> {
    let sample_rate = 22050.0;

    // --- C major chord, two seconds ---
    let chord = [261.63, 329.63, 392.0];
    let signal: Vec<f64> = (0..2 * sample_rate as usize)
        .map(|i| {
            let t = i as f64 / sample_rate;
            chord.iter().map(|f| (2.0 * PI * f * t).sin()).sum::<f64>() / 3.0
        })
        .collect();
    println!("Input: C major chord {:?} Hz, {} samples\n", chord, signal.len());

    // --- STFT round trip ---
    let window_length = 1024;
    let window = Window::Hamming.coefficients(window_length);
    let spec = stft(&signal, &window, window_length / 2)?;
    let back = istft(&spec, &window, window_length / 2)?;
    let err = signal
        .iter()
        .zip(&back)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);
    println!("=== STFT ===");
    println!("Spectrogram: {} bins x {} frames", spec.nrows(), spec.ncols());
    println!("Round-trip max error: {err:.3e}\n");

    // --- MFCC ---
    let filterbank = MelFilterBank::build(sample_rate, window_length, 40)?;
    let coeffs = mfcc(&signal, &window, window_length / 2, &filterbank, 13)?;
    let mid = coeffs.ncols() / 2;
    println!("=== MFCC (frame {mid}) ===");
    for k in 0..coeffs.nrows() {
        println!("  c{:<2} {:>9.3}", k + 1, coeffs[[k, mid]]);
    }
    println!();

    // --- Chromagram ---
    let kernel = CqtKernel::build(sample_rate, 12, 55.0, 3520.0)?;
    let chroma = cqt_chromagram(&signal, sample_rate, 25.0, 12, &kernel)?;
    let mid = chroma.ncols() / 2;
    let total: f64 = chroma.column(mid).sum();
    println!("=== Chromagram (frame {mid}, {} CQT channels) ===", kernel.num_channels());
    let lowest = channel_frequencies(55.0, 12, 1);
    println!("Lowest channel: {:.1} Hz (pitch class A)", lowest[0]);
    for (c, name) in PITCH_CLASSES.iter().enumerate() {
        let share = chroma[[c, mid]] / total;
        println!("  {name:<3} {:5.1}% {}", share * 100.0, "#".repeat((share * 60.0) as usize));
    }
    println!();

    // --- MDCT round trip with the AC-3 window ---
    let window = kbd_window(512, 5.0);
    let coeffs = mdct(&signal, &window)?;
    let back = imdct(&coeffs, &window)?;
    let err = signal
        .iter()
        .zip(&back)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);
    println!("=== MDCT ===");
    println!("Coefficients: {} x {}", coeffs.nrows(), coeffs.ncols());
    println!("Round-trip max error: {err:.3e}");

    Ok(())
}
