// Running color cache: 64 pixels, direct-addressed by position hash.
//
// Insertion always overwrites the slot at the pixel's hash; there is no
// chaining and no eviction beyond last-writer-wins. The fixed size and
// overwrite behavior are part of the wire format: both ends must agree
// on exactly which pixel occupies each slot after every opcode, so this
// must stay a constant-time array rather than a growable map.

use super::pixel::Pixel;

/// Number of cache slots (the INDEX opcode carries a 6-bit slot number).
pub const CACHE_SIZE: usize = 64;

/// Fixed-size table of recently seen pixels, scoped to one encode or
/// decode call.
#[derive(Clone)]
pub struct ColorCache {
    slots: [Pixel; CACHE_SIZE],
}

impl ColorCache {
    /// Fresh cache with every slot zeroed.
    pub fn new() -> Self {
        Self {
            slots: [Pixel::ZERO; CACHE_SIZE],
        }
    }

    /// The pixel currently stored at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Pixel {
        self.slots[index]
    }

    /// Store `pixel` at its hash slot, returning the slot index.
    #[inline]
    pub fn insert(&mut self, pixel: Pixel) -> usize {
        let index = pixel.hash();
        self.slots[index] = pixel;
        index
    }
}

impl Default for ColorCache {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
