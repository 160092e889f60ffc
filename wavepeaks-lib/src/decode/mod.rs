//! Decoder boundary: turning an audio asset into raw integer samples.
//!
//! The [`AudioDecoder`] trait is the only thing the sample store knows about
//! decoding. Backends hand back [`DecodedAudio`] with signedness already
//! canonicalized; narrowing to the 16-bit in-memory width happens in the
//! store.

mod symphonia_decoder;

pub use self::symphonia_decoder::SymphoniaDecoder;

use crate::error::WaveformError;

/// A backend capable of fully decoding one audio asset.
pub trait AudioDecoder {
    /// Decode the asset at `path` (or `-` for standard input) into memory.
    ///
    /// # Errors
    /// Returns [`WaveformError::Decode`] for unreadable or unsupported
    /// assets and [`WaveformError::Io`] when the source cannot be opened.
    fn decode(&self, path: &str) -> Result<DecodedAudio, WaveformError>;
}

/// How multi-channel samples are ordered in [`SampleData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleLayout {
    /// Frame-major: `L0 R0 L1 R1 ...`.
    Interleaved,
    /// Channel-major: every sample of channel 0, then channel 1, ...
    Planar,
}

/// Raw decoded sample values at their source width.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleData {
    /// Unsigned 8-bit, silence at 128.
    U8(Vec<u8>),
    S16(Vec<i16>),
    /// Signed 24-bit values, sign-extended into `i32`.
    S24(Vec<i32>),
    S32(Vec<i32>),
}

impl SampleData {
    pub fn len(&self) -> usize {
        match self {
            Self::U8(samples) => samples.len(),
            Self::S16(samples) => samples.len(),
            Self::S24(samples) => samples.len(),
            Self::S32(samples) => samples.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width in bits of the variant's sample values.
    pub fn native_bits(&self) -> u16 {
        match self {
            Self::U8(_) => 8,
            Self::S16(_) => 16,
            Self::S24(_) => 24,
            Self::S32(_) => 32,
        }
    }

    /// Move all samples of `other` onto the end of `self`.
    ///
    /// # Errors
    /// Returns [`WaveformError::Decode`] if the two buffers have different
    /// sample widths.
    pub fn append(&mut self, other: SampleData) -> Result<(), WaveformError> {
        match (self, other) {
            (Self::U8(dst), Self::U8(mut src)) => dst.append(&mut src),
            (Self::S16(dst), Self::S16(mut src)) => dst.append(&mut src),
            (Self::S24(dst), Self::S24(mut src)) => dst.append(&mut src),
            (Self::S32(dst), Self::S32(mut src)) => dst.append(&mut src),
            (dst, src) => {
                return Err(WaveformError::Decode(format!(
                    "sample width changed mid-stream ({} bit to {} bit)",
                    dst.native_bits(),
                    src.native_bits()
                )))
            }
        }
        Ok(())
    }
}

/// Fully decoded audio plus the format details the decoder reported.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub sample_rate: u32,
    pub channel_count: u16,
    /// Bit depth of the source material, as reported by the container.
    pub bits_per_sample: u16,
    pub layout: SampleLayout,
    pub samples: SampleData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_extends_matching_widths() {
        let mut data = SampleData::S16(vec![1, 2]);
        data.append(SampleData::S16(vec![3])).expect("append");
        assert_eq!(data, SampleData::S16(vec![1, 2, 3]));
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn append_rejects_width_change() {
        let mut data = SampleData::U8(vec![128]);
        let err = data.append(SampleData::S24(vec![0])).unwrap_err();
        assert!(matches!(err, WaveformError::Decode(_)));
        assert_eq!(data.len(), 1);
    }
}
