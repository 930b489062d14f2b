#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_debug_implementations)]

//! A crate for reading, rebuilding, and decoding PNG datastreams.
//!
//! A PNG is a signature followed by a series of chunks. This crate parses the
//! bytes into [`Chunk`](png::Chunk) values (each keeping its raw data and a
//! typed payload), writes chunk sequences back out byte for byte, and turns
//! the image data chunks back into unfiltered pixel bytes.
//!
//! ```
//! # use png_datastream::png::*;
//! # fn demo(bytes: &[u8]) -> Result<(), PngError> {
//! let chunks = parse_datastream(bytes, true).map_err(|partial| partial.error())?;
//! let image = RawImage::assemble(&chunks)?;
//! let _rows: &[u8] = image.data();
//! let again = write_datastream_to_vec(&chunks, true)?;
//! assert_eq!(again, bytes);
//! # Ok(())
//! # }
//! ```
//!
//! Everything lives in memory: you bring the whole datastream as a slice, and
//! every owned buffer is allocated fallibly, so allocation failure is an
//! error value rather than an abort.

extern crate alloc;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod error;
pub use error::*;

pub mod byte_cursor;

pub mod pixel_format;
pub use pixel_format::*;

pub mod png;

/// Used by various image formats that support sRGB colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
// Note: PNG stores these as the byte values given here.
pub enum SrgbIntent {
  /// for images preferring good adaptation to the output device gamut at the
  /// expense of colorimetric accuracy, such as photographs.
  Perceptual = 0,
  /// for images requiring colour appearance matching (relative to the output
  /// device white point), such as logos.
  RelativeColorimetric = 1,
  /// for images preferring preservation of saturation at the expense of hue and
  /// lightness, such as charts and graphs.
  Saturation = 2,
  /// for images requiring preservation of absolute colorimetry, such as
  /// previews of images destined for a different output device (proofs).
  AbsoluteColorimetric = 3,
}
