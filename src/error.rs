use core::fmt;

use crate::png::ChunkTag;

/// An error from the `png_datastream` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngError {
  /// The input ended before a complete value could be read.
  UnexpectedEndOfInput,

  /// The first eight bytes were not the PNG signature.
  NoPngSignature,

  /// A chunk declared a data length over `2^31 - 1`.
  ChunkLengthTooLarge(u32),

  /// The declared data length doesn't match the bytes given for the chunk.
  ChunkLengthMismatch {
    /// length field of the chunk
    declared: u32,
    /// total bytes given for the chunk, envelope included
    available: usize,
  },

  /// The chunk data couldn't be parsed as the payload its tag names.
  MalformedPayload(ChunkTag),

  /// The allocator couldn't give us enough space.
  Alloc,

  /// An output buffer was smaller than the size query said it must be.
  OutputBufferTooSmall {
    /// bytes the write needs
    required: usize,
    /// bytes the caller gave
    provided: usize,
  },

  /// No `IHDR` chunk was found.
  NoHeader,

  /// The `IHDR` fields don't describe a legal image.
  InvalidHeader,

  /// Only compression method 0 (zlib/deflate) exists.
  UnsupportedCompressionMethod(u8),

  /// Only filter method 0 exists.
  UnsupportedFilterMethod(u8),

  /// Interlaced data isn't reconstructed by this crate.
  UnsupportedInterlaceMethod(u8),

  /// A scanline started with a filter type other than 0 through 4.
  IllegalFilterType(u8),

  /// The zlib stream was corrupt or truncated.
  Decompression,

  /// The zlib stream didn't inflate to exactly the expected size.
  DecompressedSizeMismatch {
    /// bytes the header says the image needs
    expected: usize,
    /// bytes the stream actually held
    actual: usize,
  },

  /// The declared CRC didn't match the computed one.
  CrcMismatch {
    /// the chunk's tag
    tag: ChunkTag,
    /// CRC stored in the chunk
    declared: u32,
    /// CRC computed over tag and data
    actual: u32,
  },

  /// A text keyword was empty or held a null byte.
  InvalidKeyword,

  /// Opaque data was given for a tag that has a typed payload.
  TypedTag(ChunkTag),

  /// A checked math operation failed.
  CheckedMath,
}

impl fmt::Display for PngError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnexpectedEndOfInput => write!(f, "unexpected end of input"),
      Self::NoPngSignature => write!(f, "bad PNG signature, not a png"),
      Self::ChunkLengthTooLarge(len) => write!(f, "chunk length {len} exceeds 2^31-1"),
      Self::ChunkLengthMismatch { declared, available } => {
        write!(f, "chunk declares {declared} data bytes but {available} envelope bytes were given")
      }
      Self::MalformedPayload(tag) => write!(f, "malformed {tag} chunk data"),
      Self::Alloc => write!(f, "allocation failed"),
      Self::OutputBufferTooSmall { required, provided } => {
        write!(f, "output buffer needs {required} bytes, got {provided}")
      }
      Self::NoHeader => write!(f, "no IHDR chunk present"),
      Self::InvalidHeader => write!(f, "IHDR describes an illegal image"),
      Self::UnsupportedCompressionMethod(m) => write!(f, "unsupported compression method {m}"),
      Self::UnsupportedFilterMethod(m) => write!(f, "unsupported filter method {m}"),
      Self::UnsupportedInterlaceMethod(m) => write!(f, "unsupported interlace method {m}"),
      Self::IllegalFilterType(t) => write!(f, "illegal scanline filter type {t}"),
      Self::Decompression => write!(f, "zlib stream is corrupt or truncated"),
      Self::DecompressedSizeMismatch { expected, actual } => {
        write!(f, "expected {expected} decompressed bytes, stream held {actual}")
      }
      Self::CrcMismatch { tag, declared, actual } => {
        write!(f, "{tag} CRC mismatch: declared {declared:#010X}, actual {actual:#010X}")
      }
      Self::InvalidKeyword => write!(f, "text keyword must be non-empty and null-free"),
      Self::TypedTag(tag) => write!(f, "{tag} has a typed payload, not unknown data"),
      Self::CheckedMath => write!(f, "size computation overflowed"),
    }
  }
}

impl From<alloc::collections::TryReserveError> for PngError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::Alloc
  }
}
