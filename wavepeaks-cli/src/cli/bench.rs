use clap::ArgMatches;
use log::error;
use wavepeaks_lib::WaveformError;

pub fn maybe_run_bench(args: &ArgMatches) -> Result<Option<i32>, WaveformError> {
    // Returns an exit code if the benchmark mode was requested.
    if args.get_flag("bench-extract") {
        return run_extract_bench(args);
    }
    Ok(None)
}

fn run_extract_bench(_args: &ArgMatches) -> Result<Option<i32>, WaveformError> {
    #[cfg(not(feature = "bench"))]
    {
        error!("Benchmarking requires the `bench` feature.");
        return Ok(Some(1));
    }
    #[cfg(feature = "bench")]
    {
        use wavepeaks_lib::diagnostics::bench::{bench_extraction, ExtractBenchConfig};

        let args = _args;
        let seconds = args.get_one::<f32>("bench-seconds").copied().unwrap_or(600.0);
        let channels = args.get_one::<u16>("bench-channels").copied().unwrap_or(2);
        let samples_per_pixel = args.get_one::<usize>("bench-zoom").copied().unwrap_or(256);
        let iterations = args.get_one::<usize>("bench-iterations").copied().unwrap_or(5);

        if seconds <= 0.0 {
            error!("--bench-seconds must be positive");
            return Ok(Some(1));
        }

        let result = bench_extraction(ExtractBenchConfig {
            sample_rate: 44_100,
            seconds,
            channels,
            samples_per_pixel,
            iterations,
        })?;

        println!(
            "Extract bench ({}s x{} ch, zoom={} iters={}): avg {:.2}ms (min {:.2}ms max {:.2}ms), audio {:.2}ms, rt {:.5}x, pixels {}",
            seconds,
            channels,
            samples_per_pixel,
            iterations,
            result.avg_ms,
            result.min_ms,
            result.max_ms,
            result.audio_time_ms,
            result.rt_factor,
            result.pixels
        );

        Ok(Some(0))
    }
}
