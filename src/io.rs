// File-level I/O helpers around the in-memory codec.
//
// The codec itself never touches the filesystem; these functions are
// the collaborators that read and write `.qoi` files and raw pixel
// buffer files for callers (and the CLI) that work with paths.

use std::fs;
use std::io;
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::qoi::{self, DecodeError, EncodeError, Image};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by the encoding helpers.
#[derive(Debug, Clone, Copy)]
pub struct EncodeStats {
    /// Number of pixels encoded.
    pub pixels: u64,
    /// Raw pixel buffer size in bytes.
    pub raw_size: u64,
    /// Encoded QOI stream size in bytes.
    pub qoi_size: u64,
}

/// Statistics returned by the decoding helpers.
#[derive(Debug, Clone, Copy)]
pub struct DecodeStats {
    /// Number of pixels decoded.
    pub pixels: u64,
    /// Encoded QOI stream size in bytes.
    pub qoi_size: u64,
    /// Raw pixel buffer size in bytes.
    pub raw_size: u64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file-level operations.
#[derive(Debug, Error)]
pub enum IoError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// QOI encoding error.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
    /// QOI decoding error.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

// ---------------------------------------------------------------------------
// .qoi files
// ---------------------------------------------------------------------------

/// Read and decode a `.qoi` file.
pub fn read_qoi_file<P: AsRef<Path>>(path: P) -> Result<Image, IoError> {
    let data = fs::read(path.as_ref())?;
    let image = qoi::decode(&data)?;
    debug!(
        "read {}: {}x{} ({} channels, {} -> {} bytes)",
        path.as_ref().display(),
        image.width,
        image.height,
        image.channels,
        data.len(),
        image.pixels.len()
    );
    Ok(image)
}

/// Encode an image and write it as a `.qoi` file.
pub fn write_qoi_file<P: AsRef<Path>>(path: P, image: &Image) -> Result<EncodeStats, IoError> {
    let data = qoi::encode(image)?;
    fs::write(path.as_ref(), &data)?;
    let stats = EncodeStats {
        pixels: u64::from(image.width) * u64::from(image.height),
        raw_size: image.pixels.len() as u64,
        qoi_size: data.len() as u64,
    };
    debug!(
        "wrote {}: {} -> {} bytes",
        path.as_ref().display(),
        stats.raw_size,
        stats.qoi_size
    );
    Ok(stats)
}

// ---------------------------------------------------------------------------
// Raw pixel buffer files
// ---------------------------------------------------------------------------

/// Encode a raw pixel buffer file (row-major, channel-interleaved, 8
/// bits per channel) into a `.qoi` file.
///
/// The buffer length must equal `width * height * channels`; a
/// mismatch surfaces as [`EncodeError::SizeMismatch`].
pub fn encode_raw_file<P: AsRef<Path>, Q: AsRef<Path>>(
    raw_path: P,
    qoi_path: Q,
    width: u32,
    height: u32,
    channels: u8,
    colorspace: u8,
) -> Result<EncodeStats, IoError> {
    let pixels = fs::read(raw_path.as_ref())?;
    let image = Image {
        width,
        height,
        channels,
        colorspace,
        pixels,
    };
    write_qoi_file(qoi_path, &image)
}

/// Decode a `.qoi` file and write the raw pixel buffer to `raw_path`.
///
/// Returns the decoded image alongside the stats so callers can report
/// dimensions without re-reading the file.
pub fn decode_to_raw_file<P: AsRef<Path>, Q: AsRef<Path>>(
    qoi_path: P,
    raw_path: Q,
) -> Result<(Image, DecodeStats), IoError> {
    let data = fs::read(qoi_path.as_ref())?;
    let image = qoi::decode(&data)?;
    fs::write(raw_path.as_ref(), &image.pixels)?;
    let stats = DecodeStats {
        pixels: u64::from(image.width) * u64::from(image.height),
        qoi_size: data.len() as u64,
        raw_size: image.pixels.len() as u64,
    };
    debug!(
        "decoded {} -> {}: {} -> {} bytes",
        qoi_path.as_ref().display(),
        raw_path.as_ref().display(),
        stats.qoi_size,
        stats.raw_size
    );
    Ok((image, stats))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_image() -> Image {
        Image {
            width: 4,
            height: 2,
            channels: 4,
            colorspace: 0,
            pixels: (0..32).collect(),
        }
    }

    #[test]
    fn qoi_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("image.qoi");

        let image = test_image();
        let stats = write_qoi_file(&path, &image).unwrap();
        assert_eq!(stats.pixels, 8);
        assert_eq!(stats.raw_size, 32);

        let read_back = read_qoi_file(&path).unwrap();
        assert_eq!(read_back, image);
    }

    #[test]
    fn raw_file_roundtrip() {
        let dir = tempdir().unwrap();
        let raw_in = dir.path().join("pixels.raw");
        let qoi = dir.path().join("image.qoi");
        let raw_out = dir.path().join("pixels_out.raw");

        let image = test_image();
        fs::write(&raw_in, &image.pixels).unwrap();

        let stats = encode_raw_file(&raw_in, &qoi, 4, 2, 4, 0).unwrap();
        assert_eq!(stats.raw_size, 32);

        let (decoded, dstats) = decode_to_raw_file(&qoi, &raw_out).unwrap();
        assert_eq!(decoded, image);
        assert_eq!(dstats.raw_size, 32);
        assert_eq!(fs::read(&raw_out).unwrap(), image.pixels);
    }

    #[test]
    fn size_mismatch_surfaces_as_encode_error() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("short.raw");
        let qoi = dir.path().join("out.qoi");
        fs::write(&raw, [0u8; 10]).unwrap();

        let err = encode_raw_file(&raw, &qoi, 4, 2, 4, 0).unwrap_err();
        assert!(matches!(
            err,
            IoError::Encode(EncodeError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn missing_file_surfaces_as_io_error() {
        let err = read_qoi_file("/nonexistent/image.qoi").unwrap_err();
        assert!(matches!(err, IoError::Io(_)));
    }

    #[test]
    fn corrupt_file_surfaces_as_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.qoi");
        fs::write(&path, b"not a qoi file at all....").unwrap();

        let err = read_qoi_file(&path).unwrap_err();
        assert!(matches!(err, IoError::Decode(DecodeError::BadMagic(_))));
    }
}
