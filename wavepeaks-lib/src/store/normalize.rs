//! Narrowing decoded samples to the canonical signed 16-bit width.
//!
//! Sub-16-bit material is centred and shifted up, wider material is
//! truncated by shifting down.

use crate::decode::{SampleData, SampleLayout};

/// Unsigned 8-bit: subtract 128, then shift into the high byte.
pub fn normalize_u8(sample: u8) -> i16 {
    (i16::from(sample) - 128) << 8
}

/// Signed 24-bit (sign-extended in an `i32`): drop the low byte.
pub fn normalize_s24(sample: i32) -> i16 {
    (sample.clamp(-(1 << 23), (1 << 23) - 1) >> 8) as i16
}

/// Signed 32-bit: keep the high 16 bits.
pub fn normalize_s32(sample: i32) -> i16 {
    (sample >> 16) as i16
}

/// Convert `data` to interleaved canonical samples, keeping only whole frames.
pub(crate) fn normalize_samples(
    data: &SampleData,
    layout: SampleLayout,
    channels: usize,
) -> Vec<i16> {
    let canonical: Vec<i16> = match data {
        SampleData::U8(samples) => samples.iter().map(|&s| normalize_u8(s)).collect(),
        SampleData::S16(samples) => samples.clone(),
        SampleData::S24(samples) => samples.iter().map(|&s| normalize_s24(s)).collect(),
        SampleData::S32(samples) => samples.iter().map(|&s| normalize_s32(s)).collect(),
    };

    let frames = canonical.len() / channels;
    match layout {
        SampleLayout::Interleaved => {
            let mut canonical = canonical;
            canonical.truncate(frames * channels);
            canonical
        }
        SampleLayout::Planar => interleave_planar(&canonical, channels, frames),
    }
}

fn interleave_planar(planar: &[i16], channels: usize, frames: usize) -> Vec<i16> {
    let mut out = Vec::with_capacity(frames * channels);
    for frame in 0..frames {
        for channel in 0..channels {
            out.push(planar[channel * frames + frame]);
        }
    }
    out
}
