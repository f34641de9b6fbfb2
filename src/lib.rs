//! Oxiqoi: QOI ("Quite OK Image") lossless image codec in Rust.
//!
//! The crate provides:
//! - A pure-Rust QOI encoder/decoder (`qoi`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use oxiqoi::qoi::{decode, encode, Image};
//!
//! let image = Image {
//!     width: 2,
//!     height: 1,
//!     channels: 3,
//!     colorspace: 0,
//!     pixels: vec![10, 20, 30, 10, 20, 30],
//! };
//!
//! let bytes = encode(&image).unwrap();
//! let decoded = decode(&bytes).unwrap();
//! assert_eq!(decoded, image);
//! ```

pub mod io;
pub mod qoi;

#[cfg(feature = "cli")]
pub mod cli;
