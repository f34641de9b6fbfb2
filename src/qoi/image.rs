// Caller-facing image buffer and its structural invariants.

use super::error::EncodeError;

/// An uncompressed image: dimensions, channel layout, and the raw
/// row-major, channel-interleaved pixel bytes.
///
/// For 3-channel images the buffer holds no alpha bytes at all; alpha
/// is treated as a constant 255 inside the codec and never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// 3 = RGB, 4 = RGBA.
    pub channels: u8,
    /// Carried into the header verbatim; never interpreted.
    pub colorspace: u8,
    /// `width * height * channels` bytes, row-major.
    pub pixels: Vec<u8>,
}

impl Image {
    /// Check the two structural invariants the encoder relies on: the
    /// channel count is 3 or 4, and the buffer holds exactly
    /// `width * height * channels` bytes.
    pub fn validate(&self) -> Result<(), EncodeError> {
        if self.channels != 3 && self.channels != 4 {
            return Err(EncodeError::InvalidChannels(self.channels));
        }
        // Saturates on absurd dimensions; the comparison then fails.
        let expected = (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(self.channels as usize);
        if self.pixels.len() != expected {
            return Err(EncodeError::SizeMismatch {
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
