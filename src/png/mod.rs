#![forbid(unsafe_code)]

//! Module for working with PNG datastreams.
//!
//! * [Portable Network Graphics Specification (Third Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/png/
//!
//! ## Layers
//!
//! * **Chunks**: [`parse_datastream`] splits the bytes (after the optional
//!   [`PNG_SIGNATURE`]) into a `Vec` of [`Chunk`]. Each chunk is the full
//!   envelope: the [`ChunkTag`], the data bytes exactly as read, the typed
//!   [`ChunkPayload`] parsed from those bytes, and the stored CRC. Tags with
//!   no typed payload parse as [`Unknown`], which never fails.
//! * **Writing**: [`datastream_required_size`] gives the exact byte count, and
//!   [`write_datastream_into`] writes into a buffer of that size. A chunk
//!   writes its raw data verbatim when it has it, so parsed chunks write back
//!   byte for byte. Chunks built with [`Chunk::from_payload`] serialize their
//!   payload instead.
//! * **Pixels**: [`RawImage::assemble`] concatenates the `IDAT` data, inflates
//!   it with [`decompress_slices`], and reverses the scanline filters with
//!   [`unfilter_scanlines`].
//!
//! ## Checks
//!
//! Parsing checks the framing (lengths always, CRCs only when
//! [`DecodeOptions::confirm_crc`] is set) and that each payload has the shape
//! its tag needs. It does *not* check chunk ordering, duplicate chunks, or
//! whether header fields are legal. [`IHDR::validate`] and
//! [`ChunkTag::is_well_formed`] are there when you want those checks, and the
//! assembler validates the header it uses.
//!
//! When parsing a datastream stops early, the [`PartialParse`] error still
//! holds every chunk that parsed before the failure.
//!
//! Interlaced images are not reconstructed.

use alloc::vec::Vec;
use core::fmt::{Debug, Display, Write};

use log::{debug, trace, warn};

pub use crate::PngError;
use crate::{
  byte_cursor::{try_copy_bytes, try_zeroed_vec, ByteReader, ByteWriter},
  PaletteEntry, PngColorType, PngPixelFormat, SrgbIntent,
};

mod chunk_tag;
pub use chunk_tag::*;

mod crc32;
pub use crc32::*;

mod payload;
pub use payload::*;

mod ihdr;
pub use ihdr::*;

mod plte;
pub use plte::*;

mod idat;
pub use idat::*;

mod iend;
pub use iend::*;

mod text;
pub use text::*;

mod bkgd;
pub use bkgd::*;

mod gama;
pub use gama::*;

mod phys;
pub use phys::*;

mod srgb;
pub use srgb::*;

mod sbit;
pub use sbit::*;

mod options;
pub use options::*;

mod chunk;
pub use chunk::*;

mod datastream;
pub use datastream::*;

mod compression;
pub use compression::*;

mod filter;
pub use filter::*;

mod raw_image;
pub use raw_image::*;

#[cfg(test)]
mod tests;

/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, b'P', b'N', b'G', b'\r', b'\n', 26, b'\n'];

/// Largest data length a chunk may declare, `2^31 - 1`.
pub const MAX_CHUNK_LENGTH: u32 = (1 << 31) - 1;

/// Checks if the PNG's initial 8 bytes are correct.
#[inline]
#[must_use]
pub const fn is_png_signature(bytes: &[u8]) -> bool {
  matches!(bytes, [137, b'P', b'N', b'G', b'\r', b'\n', 26, b'\n', ..])
}
