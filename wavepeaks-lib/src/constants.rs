//! Shared constants for envelope generation and rendering.

/// Samples per pixel used when a view request specifies neither a zoom
/// nor a target width.
pub const DEFAULT_SAMPLES_PER_PIXEL: usize = 256;

/// Schema version written into every serialized envelope.
pub const ENVELOPE_VERSION: u32 = 2;

/// Bit depth of the canonical in-memory sample representation.
///
/// Every loaded asset is normalized to signed 16-bit regardless of its
/// source depth, so this is also the `bits` field of every envelope.
pub const CANONICAL_BITS: u16 = 16;

/// Divisor that maps canonical sample values onto `[-1.0, 1.0]`.
pub const AMPLITUDE_SCALE: f64 = 32768.0;
