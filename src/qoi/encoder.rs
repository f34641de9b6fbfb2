// QOI encoder: single-pass opcode selection.
//
// One left-to-right pass over the pixel buffer. For each pixel the
// encoder picks the shortest valid opcode in strict priority order:
// run continuation, cache INDEX, RGBA (alpha changed), DIFF, LUMA, and
// finally a raw RGB literal. The running cache and previous-pixel
// register advance exactly as the decoder will replay them; keeping the
// two passes in lockstep is the format's correctness invariant.

use super::cache::ColorCache;
use super::error::EncodeError;
use super::header::{
    DIFF_BIAS, END_MARKER, HEADER_SIZE, Header, LUMA_G_BIAS, LUMA_RB_BIAS, MAX_RUN, OP_DIFF,
    OP_INDEX, OP_LUMA, OP_RGB, OP_RGBA, OP_RUN,
};
use super::image::Image;
use super::pixel::Pixel;

/// Encode an image to a complete QOI stream (header, opcode body, end
/// marker).
///
/// Fails only on a structurally invalid image; see [`Image::validate`].
pub fn encode(image: &Image) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    encode_into(image, &mut out)?;
    Ok(out)
}

/// Encode an image, appending the stream to a caller-provided buffer.
///
/// Reserves the worst case up front (one tag byte plus raw channels per
/// pixel) so the pass itself never reallocates.
pub fn encode_into(image: &Image, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    image.validate()?;

    let channels = image.channels as usize;
    let n_pixels = image.pixels.len() / channels;
    out.reserve(HEADER_SIZE + n_pixels * (channels + 1) + END_MARKER.len());

    Header {
        width: image.width,
        height: image.height,
        channels: image.channels,
        colorspace: image.colorspace,
    }
    .write_into(out);

    let mut cache = ColorCache::new();
    let mut prev = Pixel::START;
    let mut run: u32 = 0;

    for (i, chunk) in image.pixels.chunks_exact(channels).enumerate() {
        let px = Pixel {
            r: chunk[0],
            g: chunk[1],
            b: chunk[2],
            a: if channels == 4 { chunk[3] } else { 255 },
        };

        if px == prev {
            run += 1;
            if run == MAX_RUN || i + 1 == n_pixels {
                out.push(OP_RUN | (run - 1) as u8);
                run = 0;
            }
            continue;
        }

        if run > 0 {
            out.push(OP_RUN | (run - 1) as u8);
            run = 0;
        }

        let index = px.hash();
        if cache.get(index) == px {
            // An exact hit means this value is the one most recently
            // inserted for its slot, so no re-insert and no diff work.
            out.push(OP_INDEX | index as u8);
        } else {
            cache.insert(px);

            let d = px.diff(prev);
            if d.da != 0 {
                out.extend_from_slice(&[OP_RGBA, px.r, px.g, px.b, px.a]);
            } else if d.fits_diff() {
                out.push(
                    OP_DIFF
                        | (((d.dr + DIFF_BIAS) as u8) << 4)
                        | (((d.dg + DIFF_BIAS) as u8) << 2)
                        | (d.db + DIFF_BIAS) as u8,
                );
            } else if d.fits_luma() {
                out.push(OP_LUMA | (d.dg + LUMA_G_BIAS) as u8);
                out.push(
                    (((d.dr_dg() + LUMA_RB_BIAS as i16) as u8) << 4)
                        | (d.db_dg() + LUMA_RB_BIAS as i16) as u8,
                );
            } else {
                out.extend_from_slice(&[OP_RGB, px.r, px.g, px.b]);
            }
        }

        prev = px;
    }

    out.extend_from_slice(&END_MARKER);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_image(width: u32, pixels: &[[u8; 3]]) -> Image {
        Image {
            width,
            height: 1,
            channels: 3,
            colorspace: 0,
            pixels: pixels.iter().flatten().copied().collect(),
        }
    }

    /// Encode and strip header and end marker, leaving the opcode body.
    fn body(image: &Image) -> Vec<u8> {
        let bytes = encode(image).unwrap();
        assert_eq!(&bytes[..4], b"qoif");
        assert_eq!(&bytes[bytes.len() - 8..], &END_MARKER);
        bytes[HEADER_SIZE..bytes.len() - 8].to_vec()
    }

    #[test]
    fn single_zero_pixel_is_a_run() {
        // (0,0,0) equals the initial previous pixel, so the whole image
        // is one run of length 1.
        let img = rgb_image(1, &[[0, 0, 0]]);
        assert_eq!(body(&img), vec![0xC0]);
    }

    #[test]
    fn empty_image_has_empty_body() {
        let img = Image {
            width: 0,
            height: 0,
            channels: 3,
            colorspace: 0,
            pixels: Vec::new(),
        };
        assert!(body(&img).is_empty());
        assert_eq!(encode(&img).unwrap().len(), HEADER_SIZE + 8);
    }

    #[test]
    fn run_of_62_flushes_as_single_opcode() {
        // One LUMA pixel, then 62 copies, then a differing pixel.
        let mut pixels = vec![[10, 10, 10]; 63];
        pixels.push([11, 11, 11]);
        let img = rgb_image(64, &pixels);
        // (10,10,10): dg=10, dr-dg=0, db-dg=0 -> LUMA 0xAA 0x88.
        // 62 identical -> RUN(61) = 0xFD, flushed when the counter hits 62.
        // (11,11,11): dr=dg=db=1 -> DIFF 0x7F.
        assert_eq!(body(&img), vec![0xAA, 0x88, 0xFD, 0x7F]);
    }

    #[test]
    fn run_of_63_splits_into_62_plus_1() {
        let pixels = vec![[10, 10, 10]; 64];
        let img = rgb_image(64, &pixels);
        // LUMA, then RUN(61) for 62 pixels, then RUN(0) for the last.
        assert_eq!(body(&img), vec![0xAA, 0x88, 0xFD, 0xC0]);
    }

    #[test]
    fn run_flushes_at_end_of_input() {
        let img = rgb_image(3, &[[0, 0, 0], [0, 0, 0], [0, 0, 0]]);
        assert_eq!(body(&img), vec![0xC0 | 2]);
    }

    #[test]
    fn cache_hit_emits_index() {
        // A is cached by its first occurrence; B hashes elsewhere, so
        // A's second occurrence is an exact cache hit.
        let a = [1, 0, 0]; // hash(1,0,0,255) = 56
        let b = [0, 1, 0]; // hash(0,1,0,255) = 58
        let img = rgb_image(3, &[a, b, a]);
        // A: DIFF(+1,0,0) = 0x7A; B: DIFF(-1,+1,0) = 0x5E; A: INDEX(56).
        assert_eq!(body(&img), vec![0x7A, 0x5E, 0x38]);
    }

    #[test]
    fn evicted_pixel_does_not_index() {
        // A and B share hash slot 56; B evicts A, so A's reappearance
        // must fall through to a literal instead of INDEX.
        let a = [1, 0, 0];
        let b = [65, 0, 0];
        let img = rgb_image(3, &[a, b, a]);
        assert_eq!(
            body(&img),
            vec![0x7A, OP_RGB, 65, 0, 0, OP_RGB, 1, 0, 0]
        );
    }

    #[test]
    fn alpha_change_uses_rgba() {
        let img = Image {
            width: 1,
            height: 1,
            channels: 4,
            colorspace: 0,
            pixels: vec![0, 0, 0, 128],
        };
        assert_eq!(body(&img), vec![OP_RGBA, 0, 0, 0, 128]);
    }

    #[test]
    fn opaque_rgba_pixel_avoids_rgba_opcode() {
        // Alpha matches the previous pixel's 255, so the encoder can
        // use the 1-byte DIFF form even for 4-channel input.
        let img = Image {
            width: 1,
            height: 1,
            channels: 4,
            colorspace: 0,
            pixels: vec![1, 1, 1, 255],
        };
        assert_eq!(body(&img), vec![0x7F]);
    }

    #[test]
    fn diff_boundary_deltas() {
        // (10,10,10) -> LUMA; (8,11,10) has deltas (-2,+1,0), the DIFF
        // corners; (5,11,10) has dr=-3, one past DIFF, and fits LUMA.
        let img = rgb_image(3, &[[10, 10, 10], [8, 11, 10], [5, 11, 10]]);
        assert_eq!(body(&img), vec![0xAA, 0x88, 0x4E, 0xA0, 0x58]);
    }

    #[test]
    fn luma_boundary_deltas() {
        // dg = +31 with red/blue tracking green exactly stays LUMA.
        let img = rgb_image(2, &[[10, 10, 10], [41, 41, 41]]);
        // 0x80 | (31+32) = 0xBF, then (0+8)<<4 | (0+8) = 0x88.
        assert_eq!(body(&img), vec![0xAA, 0x88, 0xBF, 0x88]);
    }

    #[test]
    fn big_jump_falls_back_to_rgb() {
        let img = rgb_image(1, &[[200, 10, 60]]);
        assert_eq!(body(&img), vec![OP_RGB, 200, 10, 60]);
    }

    #[test]
    fn rejects_invalid_channels() {
        let img = Image {
            width: 1,
            height: 1,
            channels: 2,
            colorspace: 0,
            pixels: vec![0, 0],
        };
        assert_eq!(encode(&img), Err(EncodeError::InvalidChannels(2)));
    }

    #[test]
    fn rejects_size_mismatch() {
        let img = Image {
            width: 2,
            height: 2,
            channels: 3,
            colorspace: 0,
            pixels: vec![0; 7],
        };
        assert_eq!(
            encode(&img),
            Err(EncodeError::SizeMismatch {
                expected: 12,
                actual: 7,
            })
        );
    }

    #[test]
    fn header_carries_image_fields() {
        let img = Image {
            width: 3,
            height: 2,
            channels: 3,
            colorspace: 1,
            pixels: vec![0; 18],
        };
        let bytes = encode(&img).unwrap();
        let hdr = Header::decode(&bytes).unwrap();
        assert_eq!(hdr.width, 3);
        assert_eq!(hdr.height, 2);
        assert_eq!(hdr.channels, 3);
        assert_eq!(hdr.colorspace, 1);
    }

    #[test]
    fn output_never_exceeds_worst_case() {
        // Incompressible-ish noise: every pixel distinct from its
        // neighbor by a large margin.
        let pixels: Vec<[u8; 3]> = (0..128u32)
            .map(|i| {
                let v = (i * 97 + 13) as u8;
                [v, v.wrapping_mul(31), v.wrapping_add(113)]
            })
            .collect();
        let img = rgb_image(128, &pixels);
        let bytes = encode(&img).unwrap();
        assert!(bytes.len() <= HEADER_SIZE + 128 * 4 + END_MARKER.len());
    }
}
