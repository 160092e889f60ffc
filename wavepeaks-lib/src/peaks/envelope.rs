use serde::Serialize;

use crate::constants::{AMPLITUDE_SCALE, CANONICAL_BITS, ENVELOPE_VERSION};
use crate::error::WaveformError;
use crate::store::FormatMetadata;
use crate::view::ResolvedWindow;

use super::PeakPair;

/// Peak envelope of one view, in the waveform-data JSON layout.
///
/// Field order here is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub version: u32,
    pub channels: u16,
    pub sample_rate: u32,
    pub samples_per_pixel: usize,
    pub bits: u16,
    pub length: usize,
    /// Alternating `min, max` per pixel, `2 * length` values.
    pub data: Vec<i16>,
}

impl Envelope {
    pub fn assemble(window: &ResolvedWindow, pairs: &[PeakPair], format: &FormatMetadata) -> Self {
        let mut data = Vec::with_capacity(pairs.len() * 2);
        for pair in pairs {
            data.push(pair.min);
            data.push(pair.max);
        }

        Self {
            version: ENVELOPE_VERSION,
            channels: format.channel_count,
            sample_rate: format.sample_rate,
            samples_per_pixel: window.samples_per_pixel,
            bits: CANONICAL_BITS,
            length: pairs.len(),
            data,
        }
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String, WaveformError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json_compact(&self) -> Result<String, WaveformError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn pair(&self, index: usize) -> Option<PeakPair> {
        let min = *self.data.get(index * 2)?;
        let max = *self.data.get(index * 2 + 1)?;
        Some(PeakPair::new(min, max))
    }

    pub fn pairs(&self) -> impl Iterator<Item = PeakPair> + '_ {
        self.data
            .chunks_exact(2)
            .map(|chunk| PeakPair::new(chunk[0], chunk[1]))
    }

    /// Time in seconds at the left edge of pixel `index`.
    pub fn pixel_time(&self, index: usize, window_start_seconds: f64) -> f64 {
        if self.sample_rate == 0 {
            return window_start_seconds;
        }
        window_start_seconds
            + (index * self.samples_per_pixel) as f64 / f64::from(self.sample_rate)
    }

    /// Map a canonical sample value onto `[-1.0, 1.0)`.
    pub fn normalize(value: i16) -> f64 {
        f64::from(value) / AMPLITUDE_SCALE
    }

    /// Largest absolute sample value in the envelope.
    pub fn max_abs(&self) -> i32 {
        self.data
            .iter()
            .map(|&value| i32::from(value).abs())
            .max()
            .unwrap_or(0)
    }
}
