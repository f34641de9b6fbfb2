// QOI decoder: opcode dispatch and pixel reconstruction.
//
// A single pass over the body bytes, mirroring the encoder's state
// transitions exactly. Cache-insertion timing is the format's
// correctness invariant: opcodes carrying a genuinely new pixel value
// (RGB, RGBA, DIFF, LUMA) insert into the cache after reconstruction;
// opcodes repeating already-known state (RUN, INDEX) never insert.
// Any divergence desynchronizes the two caches and corrupts every
// subsequent pixel.

use super::cache::ColorCache;
use super::error::DecodeError;
use super::header::{
    DIFF_BIAS, END_MARKER, HEADER_SIZE, Header, LUMA_G_BIAS, LUMA_RB_BIAS, MASK_6BIT, OP_DIFF,
    OP_INDEX, OP_RGB, OP_RGBA, OP_RUN, TAG_MASK,
};
use super::image::Image;
use super::pixel::Pixel;

/// Cap on the output pre-reservation derived from the header.
///
/// Header dimensions are trusted for the result (caller contract, as in
/// the reference implementation), but a hostile header must not force a
/// multi-gigabyte reservation up front. The buffer still grows to
/// whatever the body actually decodes.
const PREALLOC_CAP: usize = 1 << 26; // 64 MiB

/// Decode a complete QOI stream into an [`Image`].
///
/// Fails with [`DecodeError::TooShort`] if the stream cannot hold a
/// header and end marker, [`DecodeError::BadMagic`] on a magic
/// mismatch, and [`DecodeError::MissingEndMarker`] if the input runs
/// out before the exact 8-byte end marker. Header fields beyond that
/// are trusted as-is.
pub fn decode(data: &[u8]) -> Result<Image, DecodeError> {
    let header = Header::decode(data)?;
    let channels = header.channels as usize;

    let mut pixels = Vec::with_capacity(header.pixel_buffer_len().min(PREALLOC_CAP));
    let mut cache = ColorCache::new();
    let mut px = Pixel::START;

    let mut pos = HEADER_SIZE;
    loop {
        if at_end_marker(data, pos)? {
            break;
        }

        // The end-marker guard leaves at least 8 readable bytes here,
        // which covers the longest opcode (RGBA: tag + 4).
        let tag = data[pos];
        pos += 1;

        // Exact tags first: 0xFE and 0xFF would otherwise alias RUN.
        match tag {
            OP_RGB => {
                px = Pixel {
                    r: data[pos],
                    g: data[pos + 1],
                    b: data[pos + 2],
                    a: px.a,
                };
                pos += 3;
                write_pixel(&mut pixels, px, channels);
                cache.insert(px);
            }
            OP_RGBA => {
                px = Pixel {
                    r: data[pos],
                    g: data[pos + 1],
                    b: data[pos + 2],
                    a: data[pos + 3],
                };
                pos += 4;
                write_pixel(&mut pixels, px, channels);
                cache.insert(px);
            }
            _ => match tag & TAG_MASK {
                OP_RUN => {
                    let run = (tag & MASK_6BIT) + 1;
                    for _ in 0..run {
                        write_pixel(&mut pixels, px, channels);
                    }
                }
                OP_INDEX => {
                    px = cache.get((tag & MASK_6BIT) as usize);
                    write_pixel(&mut pixels, px, channels);
                }
                OP_DIFF => {
                    let dr = (((tag >> 4) & 0x03) as i8) - DIFF_BIAS;
                    let dg = (((tag >> 2) & 0x03) as i8) - DIFF_BIAS;
                    let db = ((tag & 0x03) as i8) - DIFF_BIAS;
                    px = Pixel {
                        r: px.r.wrapping_add(dr as u8),
                        g: px.g.wrapping_add(dg as u8),
                        b: px.b.wrapping_add(db as u8),
                        a: px.a,
                    };
                    write_pixel(&mut pixels, px, channels);
                    cache.insert(px);
                }
                _ => {
                    // OP_LUMA
                    let dg = ((tag & MASK_6BIT) as i8) - LUMA_G_BIAS;
                    let packed = data[pos];
                    pos += 1;
                    let dr_dg = ((packed >> 4) as i8) - LUMA_RB_BIAS;
                    let db_dg = ((packed & 0x0F) as i8) - LUMA_RB_BIAS;
                    px = Pixel {
                        r: px.r.wrapping_add((dr_dg + dg) as u8),
                        g: px.g.wrapping_add(dg as u8),
                        b: px.b.wrapping_add((db_dg + dg) as u8),
                        a: px.a,
                    };
                    write_pixel(&mut pixels, px, channels);
                    cache.insert(px);
                }
            },
        }
    }

    Ok(Image {
        width: header.width,
        height: header.height,
        channels: header.channels,
        colorspace: header.colorspace,
        pixels,
    })
}

/// True when the 8 bytes at `pos` are exactly the end marker.
///
/// Fails `MissingEndMarker` when fewer than 8 bytes remain, since the
/// stream can then no longer terminate correctly.
#[inline]
fn at_end_marker(data: &[u8], pos: usize) -> Result<bool, DecodeError> {
    match data.get(pos..pos + END_MARKER.len()) {
        Some(tail) => Ok(tail == &END_MARKER),
        None => Err(DecodeError::MissingEndMarker),
    }
}

#[inline]
fn write_pixel(out: &mut Vec<u8>, px: Pixel, channels: usize) {
    out.push(px.r);
    out.push(px.g);
    out.push(px.b);
    if channels == 4 {
        out.push(px.a);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
