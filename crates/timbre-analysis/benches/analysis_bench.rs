//! Criterion benchmarks for timbre-analysis transforms
//!
//! Run with: cargo bench -p timbre-analysis

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::f64::consts::PI;
use timbre_analysis::{
    CqtKernel, MelFilterBank, Mdct, Stft, TrigKind, TrigTransform, TrigType, Window,
    cqt_spectrogram, kbd_window, melspectrogram, mfcc,
};

const SAMPLE_RATE: f64 = 22050.0;

/// Generate a complex test signal with multiple harmonics
fn generate_complex_signal(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            let f1 = (2.0 * PI * 440.0 * t).sin();
            let f2 = 0.5 * (2.0 * PI * 880.0 * t).sin();
            let f3 = 0.25 * (2.0 * PI * 1320.0 * t).sin();
            let f4 = 0.125 * (2.0 * PI * 1760.0 * t).sin();
            (f1 + f2 + f3 + f4) * 0.5
        })
        .collect()
}

// ============================================================================
// STFT benchmarks
// ============================================================================

fn bench_stft_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("STFT_Forward");
    let signal = generate_complex_signal(SAMPLE_RATE as usize);

    for &window_length in &[512, 1024, 2048] {
        let stft = Stft::new(&Window::Hamming.coefficients(window_length), window_length / 2)
            .expect("valid stft parameters");

        group.bench_with_input(
            BenchmarkId::from_parameter(window_length),
            &window_length,
            |b, _| {
                b.iter(|| {
                    let result = stft.forward(black_box(&signal));
                    black_box(result)
                })
            },
        );
    }

    group.finish();
}

fn bench_stft_roundtrip(c: &mut Criterion) {
    let signal = generate_complex_signal(SAMPLE_RATE as usize);
    let stft = Stft::new(&Window::Hann.coefficients(1024), 512).expect("valid stft parameters");

    c.bench_function("STFT_Roundtrip_1024", |b| {
        b.iter(|| {
            let spec = stft.forward(black_box(&signal));
            let result = stft.inverse(&spec).expect("matching shape");
            black_box(result)
        })
    });
}

// ============================================================================
// Mel / MFCC benchmarks
// ============================================================================

fn bench_mel(c: &mut Criterion) {
    let mut group = c.benchmark_group("Mel");
    let signal = generate_complex_signal(SAMPLE_RATE as usize);
    let window = Window::Hamming.coefficients(1024);
    let filterbank = MelFilterBank::build(SAMPLE_RATE, 1024, 128).expect("valid filterbank");

    group.bench_function("filterbank_build", |b| {
        b.iter(|| black_box(MelFilterBank::build(SAMPLE_RATE, black_box(1024), 128)))
    });
    group.bench_function("melspectrogram", |b| {
        b.iter(|| black_box(melspectrogram(black_box(&signal), &window, 512, &filterbank)))
    });
    group.bench_function("mfcc_20", |b| {
        b.iter(|| black_box(mfcc(black_box(&signal), &window, 512, &filterbank, 20)))
    });

    group.finish();
}

// ============================================================================
// Constant-Q benchmarks
// ============================================================================

fn bench_cqt(c: &mut Criterion) {
    let mut group = c.benchmark_group("CQT");
    group.sample_size(20);
    let signal = generate_complex_signal(SAMPLE_RATE as usize);
    let kernel = CqtKernel::build(SAMPLE_RATE, 12, 55.0, 3520.0).expect("valid kernel");

    group.bench_function("kernel_build", |b| {
        b.iter(|| black_box(CqtKernel::build(SAMPLE_RATE, black_box(12), 55.0, 3520.0)))
    });
    group.bench_function("spectrogram_25fps", |b| {
        b.iter(|| black_box(cqt_spectrogram(black_box(&signal), SAMPLE_RATE, 25.0, &kernel)))
    });

    group.finish();
}

// ============================================================================
// DCT / DST and MDCT benchmarks
// ============================================================================

fn bench_trig(c: &mut Criterion) {
    let mut group = c.benchmark_group("Trig");
    let input = generate_complex_signal(1024);

    for (kind, name) in [(TrigKind::Cosine, "dct"), (TrigKind::Sine, "dst")] {
        for ty in [TrigType::I, TrigType::II, TrigType::III, TrigType::IV] {
            let plan = TrigTransform::new(kind, ty, input.len()).expect("valid length");
            group.bench_with_input(BenchmarkId::new(name, ty), &ty, |b, _| {
                b.iter(|| black_box(plan.process(black_box(&input))))
            });
        }
    }

    group.finish();
}

fn bench_mdct(c: &mut Criterion) {
    let mut group = c.benchmark_group("MDCT");
    let signal = generate_complex_signal(SAMPLE_RATE as usize);

    for &window_length in &[256, 2048] {
        let transform = Mdct::new(&kbd_window(window_length, 5.0)).expect("even window");
        group.bench_with_input(
            BenchmarkId::new("roundtrip", window_length),
            &window_length,
            |b, _| {
                b.iter(|| {
                    let coeffs = transform.forward(black_box(&signal));
                    black_box(transform.inverse(&coeffs))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_stft_forward,
    bench_stft_roundtrip,
    bench_mel,
    bench_cqt,
    bench_trig,
    bench_mdct,
);

criterion_main!(benches);
