//! Performance benchmarks for key detection

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keytag::features::chroma::extract_pitch_profile;
use keytag::features::key::{estimate_key, KeyTemplates};
use keytag::{analyze_audio, AnalysisConfig, AudioSignal};

/// 10 seconds of an A minor triad at 44.1kHz
fn triad_samples() -> Vec<f32> {
    let sample_rate = 44100.0;
    (0..44100 * 10)
        .map(|i| {
            let t = i as f32 / sample_rate;
            [220.0f32, 261.63, 329.63]
                .iter()
                .map(|f| (t * f * 2.0 * std::f32::consts::PI).sin() * 0.2)
                .sum::<f32>()
        })
        .collect()
}

fn bench_analyze_audio(c: &mut Criterion) {
    let samples = triad_samples();
    let config = AnalysisConfig::default();

    c.bench_function("analyze_audio_10s", |b| {
        b.iter(|| {
            let _ = analyze_audio(black_box(&samples), black_box(44100), black_box(config.clone()));
        });
    });
}

fn bench_stages(c: &mut Criterion) {
    let signal = AudioSignal::new(triad_samples(), 44100).expect("valid signal");
    let config = AnalysisConfig::default();
    let templates = KeyTemplates::krumhansl();
    let profile = extract_pitch_profile(&signal, &config).expect("tonal signal");

    c.bench_function("extract_pitch_profile_10s", |b| {
        b.iter(|| extract_pitch_profile(black_box(&signal), black_box(&config)))
    });
    c.bench_function("estimate_key", |b| {
        b.iter(|| estimate_key(black_box(&profile), templates))
    });
}

criterion_group!(benches, bench_analyze_audio, bench_stages);
criterion_main!(benches);
