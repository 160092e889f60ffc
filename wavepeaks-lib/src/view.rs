//! Turning a requested time range and zoom into a validated frame window.

use log::debug;

use crate::constants::DEFAULT_SAMPLES_PER_PIXEL;
use crate::error::WaveformError;
use crate::store::FormatMetadata;

/// What part of the material to summarize, and how finely.
///
/// `end <= 0.0` means "until the end of the material". When `width` is set
/// it wins over `samples_per_pixel`; `Some(0)` for either counts as unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRequest {
    pub start: f64,
    pub end: f64,
    pub samples_per_pixel: Option<usize>,
    pub width: Option<usize>,
}

impl Default for ViewRequest {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 0.0,
            samples_per_pixel: None,
            width: None,
        }
    }
}

impl ViewRequest {
    pub fn with_samples_per_pixel(start: f64, end: f64, samples_per_pixel: usize) -> Self {
        Self {
            start,
            end,
            samples_per_pixel: Some(samples_per_pixel),
            width: None,
        }
    }

    pub fn with_width(start: f64, end: f64, width: usize) -> Self {
        Self {
            start,
            end,
            samples_per_pixel: None,
            width: Some(width),
        }
    }
}

/// A validated frame range plus the chunk size to walk it with.
///
/// Always satisfies `start_frame < end_frame <= frame_count` and
/// `samples_per_pixel >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedWindow {
    pub start_frame: usize,
    pub end_frame: usize,
    pub samples_per_pixel: usize,
}

impl ResolvedWindow {
    pub fn frame_span(&self) -> usize {
        self.end_frame - self.start_frame
    }

    /// Number of envelope pairs this window produces.
    pub fn pixel_count(&self) -> usize {
        self.frame_span().div_ceil(self.samples_per_pixel)
    }

    pub fn start_seconds(&self, sample_rate: u32) -> f64 {
        if sample_rate == 0 {
            return 0.0;
        }
        self.start_frame as f64 / f64::from(sample_rate)
    }
}

/// Resolve `request` against the material described by `format`.
///
/// # Errors
/// Returns [`WaveformError::InvalidRange`] for non-finite times or when the
/// clamped range contains no frames.
pub fn resolve(
    request: &ViewRequest,
    format: &FormatMetadata,
) -> Result<ResolvedWindow, WaveformError> {
    if !request.start.is_finite() || !request.end.is_finite() {
        return Err(WaveformError::InvalidRange(format!(
            "times must be finite (start {}, end {})",
            request.start, request.end
        )));
    }

    let rate = f64::from(format.sample_rate);
    let start_frame = time_to_frame(request.start, rate).min(format.frame_count);
    let end_frame = if request.end > 0.0 {
        time_to_frame(request.end, rate).min(format.frame_count)
    } else {
        format.frame_count
    };

    if start_frame >= end_frame {
        return Err(WaveformError::InvalidRange(format!(
            "start frame {} is not before end frame {} ({}s to {}s)",
            start_frame, end_frame, request.start, request.end
        )));
    }

    let span = end_frame - start_frame;
    let samples_per_pixel = match request.width.filter(|&width| width > 0) {
        Some(width) => (span / width).max(1),
        None => request
            .samples_per_pixel
            .filter(|&spp| spp > 0)
            .unwrap_or(DEFAULT_SAMPLES_PER_PIXEL),
    };

    let window = ResolvedWindow {
        start_frame,
        end_frame,
        samples_per_pixel,
    };
    debug!(
        "resolved view: frames {}..{} at {} samples/pixel ({} pixels)",
        window.start_frame,
        window.end_frame,
        window.samples_per_pixel,
        window.pixel_count()
    );
    Ok(window)
}

// Negative times clamp to frame 0.
fn time_to_frame(seconds: f64, rate: f64) -> usize {
    let frame = (seconds * rate).floor();
    if frame <= 0.0 {
        0
    } else {
        frame as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(sample_rate: u32, frame_count: usize) -> FormatMetadata {
        FormatMetadata {
            sample_rate,
            channel_count: 1,
            bits_per_sample: 16,
            frame_count,
        }
    }

    #[test]
    fn full_range_uses_default_zoom() {
        let window = resolve(&ViewRequest::default(), &format(44_100, 44_100)).expect("window");
        assert_eq!(window.start_frame, 0);
        assert_eq!(window.end_frame, 44_100);
        assert_eq!(window.samples_per_pixel, 256);
        assert_eq!(window.pixel_count(), 173);
    }

    #[test]
    fn width_drives_samples_per_pixel() {
        let window = resolve(
            &ViewRequest::with_width(0.0, 0.0, 100),
            &format(25_600, 25_600),
        )
        .expect("window");
        assert_eq!(window.samples_per_pixel, 256);
        assert_eq!(window.pixel_count(), 100);
    }

    #[test]
    fn width_wins_over_samples_per_pixel() {
        let request = ViewRequest {
            start: 0.0,
            end: 0.0,
            samples_per_pixel: Some(10),
            width: Some(4),
        };
        let window = resolve(&request, &format(100, 100)).expect("window");
        assert_eq!(window.samples_per_pixel, 25);
    }

    #[test]
    fn width_wider_than_span_floors_at_one() {
        let window =
            resolve(&ViewRequest::with_width(0.0, 0.0, 1_000), &format(100, 10)).expect("window");
        assert_eq!(window.samples_per_pixel, 1);
        assert_eq!(window.pixel_count(), 10);
    }

    #[test]
    fn zero_width_and_zoom_fall_back_to_default() {
        let request = ViewRequest {
            start: 0.0,
            end: 0.0,
            samples_per_pixel: Some(0),
            width: Some(0),
        };
        let window = resolve(&request, &format(1_000, 1_000)).expect("window");
        assert_eq!(window.samples_per_pixel, DEFAULT_SAMPLES_PER_PIXEL);
    }

    #[test]
    fn end_past_material_is_clamped() {
        let window = resolve(
            &ViewRequest::with_samples_per_pixel(-1.0, 10.0, 8),
            &format(100, 150),
        )
        .expect("window");
        assert_eq!(window.start_frame, 0);
        assert_eq!(window.end_frame, 150);
    }

    #[test]
    fn empty_ranges_are_rejected() {
        let fmt = format(1_000, 1_000);
        for request in [
            ViewRequest::with_samples_per_pixel(0.5, 0.5, 10),
            ViewRequest::with_samples_per_pixel(0.8, 0.2, 10),
            ViewRequest::with_samples_per_pixel(2.0, 0.0, 10),
            ViewRequest::with_samples_per_pixel(0.0, 0.0005, 10),
        ] {
            let err = resolve(&request, &fmt).unwrap_err();
            assert!(matches!(err, WaveformError::InvalidRange(_)), "{:?}", request);
        }
    }

    #[test]
    fn non_finite_times_are_rejected() {
        let fmt = format(1_000, 1_000);
        let err = resolve(&ViewRequest::with_samples_per_pixel(f64::NAN, 0.0, 1), &fmt)
            .unwrap_err();
        assert!(matches!(err, WaveformError::InvalidRange(_)));
        let err = resolve(
            &ViewRequest::with_samples_per_pixel(0.0, f64::INFINITY, 1),
            &fmt,
        )
        .unwrap_err();
        assert!(matches!(err, WaveformError::InvalidRange(_)));
    }

    #[test]
    fn start_seconds_maps_back_to_time() {
        let window = resolve(
            &ViewRequest::with_samples_per_pixel(0.25, 0.0, 1),
            &format(8_000, 8_000),
        )
        .expect("window");
        assert_eq!(window.start_frame, 2_000);
        assert!((window.start_seconds(8_000) - 0.25).abs() < 1e-12);
    }
}
