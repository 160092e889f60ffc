//! Min/max peak extraction and the envelope that packages it.

mod envelope;
mod extract;

pub use envelope::Envelope;
pub use extract::extract_peaks;

/// Smallest and largest canonical sample value seen in one chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeakPair {
    pub min: i16,
    pub max: i16,
}

impl PeakPair {
    /// The pair reported for a chunk that contained no frames.
    pub const SILENT: PeakPair = PeakPair { min: 0, max: 0 };

    pub fn new(min: i16, max: i16) -> Self {
        Self { min, max }
    }
}
