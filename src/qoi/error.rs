// Typed errors for QOI encoding and decoding.
//
// Both directions fail atomically: the caller receives one of these
// variants and nothing else. All codec state is call-local, so a failed
// call leaves nothing mutated.

use thiserror::Error;

/// Errors returned by the encoder.
///
/// Encoding fails only on a structurally invalid [`Image`]; the pixel
/// values themselves can never make encoding fail.
///
/// [`Image`]: super::image::Image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Channel count is neither 3 (RGB) nor 4 (RGBA).
    #[error("invalid channel count: {0} (must be 3 or 4)")]
    InvalidChannels(u8),

    /// Pixel buffer length does not equal `width * height * channels`.
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Errors returned by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Stream is shorter than a header plus end marker (14 + 8 bytes).
    #[error("stream too short: {0} bytes (minimum is 22)")]
    TooShort(usize),

    /// The first four bytes are not the "qoif" magic.
    #[error("bad magic: expected \"qoif\", got {0:02x?}")]
    BadMagic([u8; 4]),

    /// Input ran out before the exact 8-byte end marker was seen.
    #[error("missing end marker")]
    MissingEndMarker,
}
