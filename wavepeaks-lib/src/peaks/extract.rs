use crate::view::ResolvedWindow;

use super::PeakPair;

#[derive(Debug)]
struct PeakAccumulator {
    current_min: i16,
    current_max: i16,
    count: usize,
}

impl PeakAccumulator {
    fn new() -> Self {
        Self {
            current_min: i16::MAX,
            current_max: i16::MIN,
            count: 0,
        }
    }

    fn push(&mut self, sample: i16) {
        self.current_min = self.current_min.min(sample);
        self.current_max = self.current_max.max(sample);
        self.count += 1;
    }

    /// Emit the pair for the current chunk and start a new one.
    fn take(&mut self) -> PeakPair {
        let pair = if self.count == 0 {
            PeakPair::SILENT
        } else {
            PeakPair::new(self.current_min, self.current_max)
        };
        self.reset_window();
        pair
    }

    fn reset_window(&mut self) {
        self.current_min = i16::MAX;
        self.current_max = i16::MIN;
        self.count = 0;
    }
}

/// Walk `window` in chunks of `samples_per_pixel` frames and take the
/// min/max across every channel of each chunk.
///
/// Returns exactly `window.pixel_count()` pairs. The last chunk may be
/// shorter than the rest; a chunk with no backing samples yields
/// [`PeakPair::SILENT`].
pub fn extract_peaks(samples: &[i16], channels: usize, window: &ResolvedWindow) -> Vec<PeakPair> {
    let channels = channels.max(1);
    let samples_per_pixel = window.samples_per_pixel.max(1);
    let available_frames = samples.len() / channels;
    let end_frame = window.end_frame.min(available_frames);

    let mut accumulator = PeakAccumulator::new();
    let mut peaks = Vec::with_capacity(window.pixel_count());

    for chunk_start in (window.start_frame..window.end_frame).step_by(samples_per_pixel) {
        let chunk_end = (chunk_start + samples_per_pixel).min(end_frame);
        if chunk_start < chunk_end {
            for &sample in &samples[chunk_start * channels..chunk_end * channels] {
                accumulator.push(sample);
            }
        }
        peaks.push(accumulator.take());
    }

    peaks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start_frame: usize, end_frame: usize, samples_per_pixel: usize) -> ResolvedWindow {
        ResolvedWindow {
            start_frame,
            end_frame,
            samples_per_pixel,
        }
    }

    #[test]
    fn length_is_ceil_of_span_over_zoom() {
        let samples = vec![0_i16; 1_000];
        for spp in [1, 3, 7, 256, 999, 1_000, 5_000] {
            let w = window(0, 1_000, spp);
            assert_eq!(extract_peaks(&samples, 1, &w).len(), 1_000_usize.div_ceil(spp));
        }
    }

    #[test]
    fn last_chunk_may_be_short() {
        let samples = [1, -1, 2, -2, 9];
        let peaks = extract_peaks(&samples, 1, &window(0, 5, 2));
        assert_eq!(
            peaks,
            vec![
                PeakPair::new(-1, 1),
                PeakPair::new(-2, 2),
                PeakPair::new(9, 9)
            ]
        );
    }

    #[test]
    fn min_and_max_span_all_channels() {
        // Frames: (100, -50) (20, 300) | (-7, -8) (0, 1)
        let samples = [100, -50, 20, 300, -7, -8, 0, 1];
        let peaks = extract_peaks(&samples, 2, &window(0, 4, 2));
        assert_eq!(peaks, vec![PeakPair::new(-50, 300), PeakPair::new(-8, 1)]);
    }

    #[test]
    fn window_offset_skips_leading_frames() {
        let samples = [i16::MIN, i16::MAX, 5, 6, 7];
        let peaks = extract_peaks(&samples, 1, &window(2, 5, 10));
        assert_eq!(peaks, vec![PeakPair::new(5, 7)]);
    }

    #[test]
    fn chunks_without_samples_are_silent() {
        let samples = [4, 4];
        let peaks = extract_peaks(&samples, 1, &window(0, 6, 2));
        assert_eq!(
            peaks,
            vec![PeakPair::new(4, 4), PeakPair::SILENT, PeakPair::SILENT]
        );
    }

    #[test]
    fn min_never_exceeds_max() {
        let samples = (0..4_096)
            .map(|i| ((i * 7_919) % 65_536) as i32 - 32_768)
            .map(|v| v as i16)
            .collect::<Vec<_>>();
        for pair in extract_peaks(&samples, 2, &window(0, 2_048, 37)) {
            assert!(pair.min <= pair.max);
        }
    }
}
