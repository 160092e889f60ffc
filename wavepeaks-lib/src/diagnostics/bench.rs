//! Synthetic benchmarks for peak extraction throughput.

use rand::Rng;

use crate::decode::{DecodedAudio, SampleData, SampleLayout};
use crate::error::WaveformError;
use crate::store::SampleStore;
use crate::view::ViewRequest;

/// Configuration parameters for an extraction benchmark run.
#[derive(Debug, Clone, Copy)]
pub struct ExtractBenchConfig {
    pub sample_rate: u32,
    pub seconds: f32,
    pub channels: u16,
    pub samples_per_pixel: usize,
    pub iterations: usize,
}

/// Timing results from a benchmark run.
#[derive(Debug, Clone, Copy)]
pub struct ExtractBenchResult {
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub audio_time_ms: f64,
    pub rt_factor: f64,
    pub pixels: usize,
}

/// Build a store of random noise and time full-range views over it.
///
/// # Errors
/// Returns an error if the configuration describes an empty store.
pub fn bench_extraction(config: ExtractBenchConfig) -> Result<ExtractBenchResult, WaveformError> {
    let channels = config.channels.max(1);
    let frames = (config.sample_rate as f32 * config.seconds).max(1.0) as usize;

    let mut rng = rand::thread_rng();
    let samples: Vec<i16> = (0..frames * usize::from(channels))
        .map(|_| rng.gen_range(i16::MIN..=i16::MAX))
        .collect();

    let store = SampleStore::from_decoded(DecodedAudio {
        sample_rate: config.sample_rate,
        channel_count: channels,
        bits_per_sample: 16,
        layout: SampleLayout::Interleaved,
        samples: SampleData::S16(samples),
    })?;
    let request = ViewRequest::with_samples_per_pixel(0.0, 0.0, config.samples_per_pixel);

    let mut times: Vec<f64> = Vec::with_capacity(config.iterations.max(1));
    let mut pixels = 0;
    for _ in 0..config.iterations.max(1) {
        let start = std::time::Instant::now();
        let envelope = store.generate_view(&request)?;
        let elapsed = start.elapsed().as_secs_f64() * 1000.0;
        pixels = envelope.length;
        times.push(elapsed);
    }

    let min_ms = times
        .iter()
        .copied()
        .fold(f64::INFINITY, |a, b| a.min(b));
    let max_ms = times.iter().copied().fold(0.0_f64, |a, b| a.max(b));
    let avg_ms = times.iter().sum::<f64>() / times.len() as f64;
    let audio_time_ms = store.duration() * 1000.0;
    let rt_factor = if audio_time_ms > 0.0 {
        avg_ms / audio_time_ms
    } else {
        0.0
    };

    Ok(ExtractBenchResult {
        avg_ms,
        min_ms: if min_ms.is_finite() { min_ms } else { 0.0 },
        max_ms,
        audio_time_ms,
        rt_factor,
        pixels,
    })
}
