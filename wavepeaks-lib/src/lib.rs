//! # Wavepeaks Library
//!
//! Peak-envelope generation for waveform display. An audio asset is decoded
//! once into a [`store::SampleStore`]; any number of views can then be cut
//! from it, each producing an [`peaks::Envelope`] of min/max pairs sized for
//! a given zoom or pixel width. Envelopes serialize to the waveform-data JSON
//! layout and can be drawn to a bitmap (`plot` feature) or to terminal glyphs.

pub mod constants;
pub mod decode;
#[cfg(feature = "bench")]
pub mod diagnostics;
pub mod error;
pub mod peaks;
#[cfg(feature = "plot")]
pub mod plot;
pub mod store;
pub mod terminal;
pub mod ticks;
pub mod view;

pub use error::WaveformError;
pub use peaks::{Envelope, PeakPair};
pub use store::{FormatMetadata, SampleStore};
pub use view::{ResolvedWindow, ViewRequest};

/// Load `path` and compute a single view of it.
///
/// # Errors
/// Returns decode errors from loading and [`WaveformError::InvalidRange`]
/// from resolving `request`.
pub fn generate_waveform_data(
    path: &str,
    request: &ViewRequest,
) -> Result<Envelope, WaveformError> {
    let store = SampleStore::load(path)?;
    store.generate_view(request)
}

/// Like [`generate_waveform_data`], serialized as pretty JSON.
pub fn generate_waveform_json(path: &str, request: &ViewRequest) -> Result<String, WaveformError> {
    generate_waveform_data(path, request)?.to_json()
}
