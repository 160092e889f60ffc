//! Symphonia-backed decoder for every container/codec symphonia supports.

use std::fs::File;
use std::path::Path;

use log::{debug, warn};
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::{MediaSource, MediaSourceStream, ReadOnlySource};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::{Hint, ProbeResult};
use symphonia::core::sample::Sample;

use super::{AudioDecoder, DecodedAudio, SampleData, SampleLayout};
use crate::error::WaveformError;

/// Decodes the first playable track of a file (or stdin, via `-`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDecoder;

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, path: &str) -> Result<DecodedAudio, WaveformError> {
        let (mut decoder, mut format, track_id) = open_file(path)?;

        let codec_params = decoder.codec_params().clone();
        let mut sample_rate = codec_params.sample_rate;
        let mut channel_count = codec_params.channels.map(|channels| channels.count());
        let mut samples: Option<SampleData> = None;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(Error::IoError(err)) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break
                }
                Err(Error::ResetRequired) => {
                    return Err(WaveformError::Decode(
                        "decoder reset required while decoding".to_string(),
                    ));
                }
                Err(err) => return Err(err.into()),
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    sample_rate.get_or_insert(spec.rate);
                    channel_count.get_or_insert(spec.channels.count());

                    let chunk = interleave_buffer(decoded);
                    match samples.as_mut() {
                        Some(data) => data.append(chunk)?,
                        None => samples = Some(chunk),
                    }
                }
                Err(Error::DecodeError(err)) => {
                    warn!("decode error: {}", err);
                }
                Err(err) => return Err(err.into()),
            }
        }

        let sample_rate = sample_rate
            .ok_or_else(|| WaveformError::Decode("missing sample rate".to_string()))?;
        let channel_count = channel_count
            .filter(|&count| count > 0)
            .ok_or_else(|| WaveformError::Decode("missing channel layout".to_string()))?;
        let channel_count = u16::try_from(channel_count)
            .map_err(|_| WaveformError::Decode("channel count exceeds u16 range".to_string()))?;
        let samples = samples.unwrap_or(SampleData::S16(Vec::new()));
        let bits_per_sample = codec_params
            .bits_per_sample
            .and_then(|bits| u16::try_from(bits).ok())
            .unwrap_or_else(|| samples.native_bits());

        debug!(
            "decoded {}: {} Hz, {} channel(s), {} bit, {} sample(s)",
            path,
            sample_rate,
            channel_count,
            bits_per_sample,
            samples.len()
        );

        Ok(DecodedAudio {
            sample_rate,
            channel_count,
            bits_per_sample,
            layout: SampleLayout::Interleaved,
            samples,
        })
    }
}

/// Open a file and return a decoder, its format reader and the selected track id.
fn open_file(
    file_path: &str,
) -> Result<(Box<dyn Decoder>, Box<dyn FormatReader>, u32), WaveformError> {
    let probed = get_probe_result(file_path)?;
    let format = probed.format;

    let (track_id, codec_params) = format
        .tracks()
        .iter()
        .find(|track| track.codec_params.codec != CODEC_TYPE_NULL)
        .map(|track| (track.id, track.codec_params.clone()))
        .ok_or_else(|| WaveformError::Decode("no supported audio tracks".to_string()))?;

    let dec_opts: DecoderOptions = Default::default();
    let decoder = symphonia::default::get_codecs().make(&codec_params, &dec_opts)?;

    Ok((decoder, format, track_id))
}

/// Probe a media file (or stdin `-`) and return the Symphonia probe result.
///
/// The file extension is tried as a hint first, then probing falls back to
/// content sniffing alone.
fn get_probe_result(file_path: &str) -> Result<ProbeResult, WaveformError> {
    if file_path == "-" {
        let source = Box::new(ReadOnlySource::new(std::io::stdin())) as Box<dyn MediaSource>;
        return probe_with_hint(source, None);
    }

    let path = Path::new(file_path);
    let mut hints: Vec<Option<String>> = Vec::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        let ext_lc = ext.to_lowercase();
        if ext_lc == "aiff" || ext_lc == "aif" || ext_lc == "aifc" {
            hints.push(Some("aiff".to_string()));
            hints.push(Some("aifc".to_string()));
        } else {
            hints.push(Some(ext_lc));
        }
    }
    hints.push(None);

    let mut last_error = None;
    for hint in hints {
        let source = Box::new(File::open(path)?) as Box<dyn MediaSource>;
        match probe_with_hint(source, hint.as_deref()) {
            Ok(probed) => return Ok(probed),
            Err(err) => last_error = Some(err),
        }
    }

    Err(last_error
        .unwrap_or_else(|| WaveformError::Decode(format!("failed to probe {}", file_path))))
}

fn probe_with_hint(
    source: Box<dyn MediaSource>,
    extension_hint: Option<&str>,
) -> Result<ProbeResult, WaveformError> {
    let mut hint = Hint::new();
    if let Some(extension_str) = extension_hint {
        hint.with_extension(extension_str);
    }

    let mss = MediaSourceStream::new(source, Default::default());
    let format_opts: FormatOptions = Default::default();
    let metadata_opts: MetadataOptions = Default::default();

    Ok(symphonia::default::get_probe().format(&hint, mss, &format_opts, &metadata_opts)?)
}

/// Interleave one decoded packet, folding unsigned and float formats onto
/// the signed variants of [`SampleData`].
fn interleave_buffer(decoded: AudioBufferRef<'_>) -> SampleData {
    match decoded {
        AudioBufferRef::U8(buf) => SampleData::U8(interleave(&*buf, |s| s)),
        AudioBufferRef::S8(buf) => SampleData::U8(interleave(&*buf, |s| (s as u8) ^ 0x80)),
        AudioBufferRef::U16(buf) => SampleData::S16(interleave(&*buf, |s| (s ^ 0x8000) as i16)),
        AudioBufferRef::S16(buf) => SampleData::S16(interleave(&*buf, |s| s)),
        AudioBufferRef::U24(buf) => {
            SampleData::S24(interleave(&*buf, |s| s.inner() as i32 - (1 << 23)))
        }
        AudioBufferRef::S24(buf) => SampleData::S24(interleave(&*buf, |s| s.inner())),
        AudioBufferRef::U32(buf) => {
            SampleData::S32(interleave(&*buf, |s| (s ^ 0x8000_0000) as i32))
        }
        AudioBufferRef::S32(buf) => SampleData::S32(interleave(&*buf, |s| s)),
        AudioBufferRef::F32(buf) => {
            SampleData::S32(interleave(&*buf, |s| float_to_s32(f64::from(s))))
        }
        AudioBufferRef::F64(buf) => SampleData::S32(interleave(&*buf, float_to_s32)),
    }
}

fn interleave<S, T, F>(buf: &AudioBuffer<S>, convert: F) -> Vec<T>
where
    S: Sample,
    F: Fn(S) -> T,
{
    let channels = buf.spec().channels.count();
    let frames = buf.frames();
    let planes = (0..channels).map(|channel| buf.chan(channel)).collect::<Vec<_>>();

    let mut out = Vec::with_capacity(frames * channels);
    for frame in 0..frames {
        for plane in &planes {
            out.push(convert(plane[frame]));
        }
    }
    out
}

fn float_to_s32(sample: f64) -> i32 {
    (sample.clamp(-1.0, 1.0) * f64::from(i32::MAX)).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn test_file_path(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time")
            .as_nanos();
        std::env::temp_dir().join(format!("wavepeaks-decode-{}-{}.wav", tag, nanos))
    }

    fn write_wav(path: &PathBuf, channels: u16, bits: u16, samples: &[i32]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 8_000,
            bits_per_sample: bits,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
        for &sample in samples {
            match bits {
                8 => writer.write_sample(sample as i8).expect("write"),
                16 => writer.write_sample(sample as i16).expect("write"),
                _ => writer.write_sample(sample).expect("write"),
            }
        }
        writer.finalize().expect("finalize wav");
    }

    #[test]
    fn decodes_16bit_stereo_interleaved() {
        let path = test_file_path("s16");
        write_wav(&path, 2, 16, &[100, -100, 200, -200, 300, -300]);

        let decoded = SymphoniaDecoder.decode(path.to_str().unwrap()).expect("decode");
        assert_eq!(decoded.sample_rate, 8_000);
        assert_eq!(decoded.channel_count, 2);
        assert_eq!(decoded.bits_per_sample, 16);
        assert_eq!(decoded.layout, SampleLayout::Interleaved);
        assert_eq!(
            decoded.samples,
            SampleData::S16(vec![100, -100, 200, -200, 300, -300])
        );

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn decodes_8bit_as_unsigned() {
        let path = test_file_path("u8");
        // hound stores 8-bit samples offset by 128.
        write_wav(&path, 1, 8, &[127, 0, -128]);

        let decoded = SymphoniaDecoder.decode(path.to_str().unwrap()).expect("decode");
        assert_eq!(decoded.bits_per_sample, 8);
        assert_eq!(decoded.samples, SampleData::U8(vec![255, 128, 0]));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn decodes_24bit_sign_extended() {
        let path = test_file_path("s24");
        write_wav(&path, 1, 24, &[8_388_607, -8_388_608, 256]);

        let decoded = SymphoniaDecoder.decode(path.to_str().unwrap()).expect("decode");
        assert_eq!(decoded.bits_per_sample, 24);
        assert_eq!(
            decoded.samples,
            SampleData::S24(vec![8_388_607, -8_388_608, 256])
        );

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn rejects_non_audio_file() {
        let path = test_file_path("garbage");
        std::fs::write(&path, b"not a wav file").expect("write garbage");

        let result = SymphoniaDecoder.decode(path.to_str().unwrap());
        assert!(result.is_err());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = test_file_path("missing");
        let result = SymphoniaDecoder.decode(path.to_str().unwrap());
        assert!(matches!(result, Err(WaveformError::Io(_))));
    }

    #[test]
    fn float_conversion_saturates() {
        assert_eq!(float_to_s32(0.0), 0);
        assert_eq!(float_to_s32(2.0), i32::MAX);
        assert_eq!(float_to_s32(-2.0), -i32::MAX);
    }
}
