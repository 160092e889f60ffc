//! In-memory sample store for one decoded audio asset.

mod normalize;

pub use normalize::{normalize_s24, normalize_s32, normalize_u8};

use log::{debug, warn};
use serde::Serialize;

use crate::decode::{AudioDecoder, DecodedAudio, SymphoniaDecoder};
use crate::error::WaveformError;
use crate::peaks::{extract_peaks, Envelope};
use crate::view::{resolve, ResolvedWindow, ViewRequest};

/// Format details of a loaded asset. Fixed at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatMetadata {
    pub sample_rate: u32,
    pub channel_count: u16,
    /// Bit depth of the source material before normalization.
    pub bits_per_sample: u16,
    /// Number of multi-channel frames, not raw samples.
    pub frame_count: usize,
}

/// Fully materialized, interleaved 16-bit samples plus their format.
///
/// The buffer is immutable once built, so a store can be shared between
/// threads and queried for any number of views without re-decoding.
#[derive(Debug, Clone)]
pub struct SampleStore {
    samples: Vec<i16>,
    format: FormatMetadata,
}

impl SampleStore {
    /// Decode `path` with the symphonia backend.
    ///
    /// # Errors
    /// Propagates the decoder's error unchanged.
    pub fn load(path: &str) -> Result<Self, WaveformError> {
        Self::load_with(&SymphoniaDecoder, path)
    }

    /// Decode `path` with any [`AudioDecoder`] backend.
    pub fn load_with<D: AudioDecoder + ?Sized>(
        decoder: &D,
        path: &str,
    ) -> Result<Self, WaveformError> {
        let decoded = decoder.decode(path)?;
        Self::from_decoded(decoded)
    }

    /// Build a store from already-decoded audio, normalizing to 16 bits.
    ///
    /// # Errors
    /// Returns [`WaveformError::Decode`] if the sample rate or channel count
    /// is zero.
    pub fn from_decoded(decoded: DecodedAudio) -> Result<Self, WaveformError> {
        if decoded.sample_rate == 0 {
            return Err(WaveformError::Decode(
                "sample rate cannot be zero".to_string(),
            ));
        }
        if decoded.channel_count == 0 {
            return Err(WaveformError::Decode(
                "channel count cannot be zero".to_string(),
            ));
        }

        let channels = usize::from(decoded.channel_count);
        if decoded.samples.len() % channels != 0 {
            warn!(
                "dropping {} trailing sample(s) that do not form a whole frame",
                decoded.samples.len() % channels
            );
        }

        let samples = normalize::normalize_samples(&decoded.samples, decoded.layout, channels);
        let format = FormatMetadata {
            sample_rate: decoded.sample_rate,
            channel_count: decoded.channel_count,
            bits_per_sample: decoded.bits_per_sample,
            frame_count: samples.len() / channels,
        };

        debug!(
            "sample store ready: {} frame(s), {} channel(s), {} Hz",
            format.frame_count, format.channel_count, format.sample_rate
        );

        Ok(Self { samples, format })
    }

    pub fn format(&self) -> &FormatMetadata {
        &self.format
    }

    /// Interleaved canonical samples, `frame_count * channel_count` long.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Length of the material in seconds.
    pub fn duration(&self) -> f64 {
        if self.format.sample_rate == 0 {
            return 0.0;
        }
        self.format.frame_count as f64 / f64::from(self.format.sample_rate)
    }

    /// Resolve `request` against this store's format.
    pub fn resolve(&self, request: &ViewRequest) -> Result<ResolvedWindow, WaveformError> {
        resolve(request, &self.format)
    }

    /// Compute the min/max envelope for one view of the material.
    ///
    /// # Errors
    /// Returns [`WaveformError::InvalidRange`] if the request resolves to an
    /// empty frame range. The store is unaffected and stays usable.
    pub fn generate_view(&self, request: &ViewRequest) -> Result<Envelope, WaveformError> {
        let window = self.resolve(request)?;
        let pairs = extract_peaks(&self.samples, usize::from(self.format.channel_count), &window);
        Ok(Envelope::assemble(&window, &pairs, &self.format))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::decode::{SampleData, SampleLayout};

    pub(crate) fn mono_store(sample_rate: u32, samples: Vec<i16>) -> SampleStore {
        SampleStore::from_decoded(DecodedAudio {
            sample_rate,
            channel_count: 1,
            bits_per_sample: 16,
            layout: SampleLayout::Interleaved,
            samples: SampleData::S16(samples),
        })
        .expect("store")
    }

    pub(crate) fn sine(sample_rate: u32, seconds: f64) -> Vec<i16> {
        let frames = (f64::from(sample_rate) * seconds) as usize;
        (0..frames)
            .map(|i| {
                let phase = 2.0 * std::f64::consts::PI * 440.0 * i as f64 / f64::from(sample_rate);
                (phase.sin() * 16_000.0) as i16
            })
            .collect()
    }

    #[test]
    fn u8_source_normalizes_to_top_of_range() {
        let store = SampleStore::from_decoded(DecodedAudio {
            sample_rate: 8_000,
            channel_count: 1,
            bits_per_sample: 8,
            layout: SampleLayout::Interleaved,
            samples: SampleData::U8(vec![255, 128, 0]),
        })
        .expect("store");

        assert_eq!(store.samples(), &[32512, 0, -32768]);
        assert_eq!(store.format().bits_per_sample, 8);
    }

    #[test]
    fn s16_source_is_unchanged() {
        let store = mono_store(8_000, vec![12345]);
        assert_eq!(store.samples(), &[12345]);
    }

    #[test]
    fn frame_count_counts_frames_not_samples() {
        let store = SampleStore::from_decoded(DecodedAudio {
            sample_rate: 4,
            channel_count: 2,
            bits_per_sample: 16,
            layout: SampleLayout::Interleaved,
            samples: SampleData::S16(vec![0; 10]),
        })
        .expect("store");

        assert_eq!(store.format().frame_count, 5);
        assert_eq!(store.samples().len(), 10);
        assert!((store.duration() - 1.25).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_zero_sample_rate_and_channels() {
        let zero_rate = SampleStore::from_decoded(DecodedAudio {
            sample_rate: 0,
            channel_count: 1,
            bits_per_sample: 16,
            layout: SampleLayout::Interleaved,
            samples: SampleData::S16(vec![0]),
        });
        assert!(matches!(zero_rate, Err(WaveformError::Decode(_))));

        let zero_channels = SampleStore::from_decoded(DecodedAudio {
            sample_rate: 8_000,
            channel_count: 0,
            bits_per_sample: 16,
            layout: SampleLayout::Interleaved,
            samples: SampleData::S16(vec![0]),
        });
        assert!(matches!(zero_channels, Err(WaveformError::Decode(_))));
    }

    #[test]
    fn one_second_mono_at_256_gives_173_pixels() {
        let store = mono_store(44_100, sine(44_100, 1.0));
        let envelope = store
            .generate_view(&ViewRequest::with_samples_per_pixel(0.0, 0.0, 256))
            .expect("view");

        assert_eq!(envelope.length, 173);
        assert_eq!(envelope.sample_rate, 44_100);
        assert_eq!(envelope.channels, 1);
        assert_eq!(envelope.bits, 16);
        assert_eq!(envelope.data.len(), 346);
    }

    #[test]
    fn half_to_one_and_a_half_seconds_at_128() {
        let store = mono_store(44_100, sine(44_100, 2.0));
        let envelope = store
            .generate_view(&ViewRequest::with_samples_per_pixel(0.5, 1.5, 128))
            .expect("view");

        let expected = 44_100.0 / 128.0;
        assert!((envelope.length as f64 - expected).abs() <= 1.0);
    }

    #[test]
    fn invalid_request_leaves_store_usable() {
        let store = mono_store(1_000, sine(1_000, 1.0));

        let err = store
            .generate_view(&ViewRequest::with_samples_per_pixel(0.8, 0.2, 10))
            .unwrap_err();
        assert!(matches!(err, WaveformError::InvalidRange(_)));

        let envelope = store
            .generate_view(&ViewRequest::with_samples_per_pixel(0.0, 0.0, 10))
            .expect("view after failure");
        assert_eq!(envelope.length, 100);
    }

    #[test]
    fn repeated_views_are_identical() {
        let store = mono_store(44_100, sine(44_100, 1.0));
        let request = ViewRequest::with_width(0.1, 0.9, 300);

        let first = store.generate_view(&request).expect("first");
        let second = store.generate_view(&request).expect("second");
        assert_eq!(first, second);
        assert_eq!(
            first.to_json().expect("json"),
            second.to_json().expect("json")
        );
    }

    #[test]
    fn store_can_be_shared_across_threads() {
        let store = std::sync::Arc::new(mono_store(8_000, sine(8_000, 1.0)));
        let handles = (0..4)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .generate_view(&ViewRequest::with_samples_per_pixel(0.0, 0.0, 64 << i))
                        .expect("view")
                        .length
                })
            })
            .collect::<Vec<_>>();

        let lengths = handles
            .into_iter()
            .map(|handle| handle.join().expect("join"))
            .collect::<Vec<_>>();
        assert_eq!(lengths, vec![125, 63, 32, 16]);
    }

    #[test]
    fn loads_wav_through_symphonia() {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("wavepeaks-store-{}.wav", nanos));
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 8,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).expect("create wav");
        for sample in [127_i8, 0, -128, 0] {
            writer.write_sample(sample).expect("write");
        }
        writer.finalize().expect("finalize");

        let store = SampleStore::load(path.to_str().unwrap()).expect("load");
        assert_eq!(store.samples(), &[32512, 0, -32768, 0]);
        assert_eq!(store.format().frame_count, 4);
        assert_eq!(store.format().bits_per_sample, 8);

        let _ = std::fs::remove_file(path);
    }
}
