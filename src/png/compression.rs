use super::*;

use miniz_oxide::inflate::TINFLStatus;

/// The compression methods an `IHDR` can name. PNG only defines zlib.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum CompressionMethod {
  /// zlib format, deflate compression with a window of at most 32k.
  Zlib = 0,
}
impl TryFrom<u8> for CompressionMethod {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0 => Ok(Self::Zlib),
      other => Err(PngError::UnsupportedCompressionMethod(other)),
    }
  }
}

/// Inflates `compressed` into a new buffer of exactly `expected` bytes.
///
/// See [`decompress_slices`].
#[inline]
pub fn decompress(method: u8, compressed: &[u8], expected: usize) -> Result<Vec<u8>, PngError> {
  decompress_slices(method, core::iter::once(compressed), expected, true)
}

/// Most output a deflate stream can give per input byte.
///
/// The shortest codes are 1 bit for a length of 258 plus 1 bit for its
/// distance, so each input byte holds at most 4 such matches.
pub const MAX_DEFLATE_RATIO: usize = 4 * 258;

/// Inflates the concatenation of several slices as one zlib stream.
///
/// The stream must end with exactly `expected` bytes of output. On any
/// failure the partial output is dropped.
///
/// ## Failure
/// * `method` isn't 0.
/// * `expected` is more than the input could hold even at
///   [`MAX_DEFLATE_RATIO`]. This is checked before the output is allocated.
/// * The stream is corrupt, truncated, or (with `confirm_adler`) fails its
///   checksum.
/// * The stream holds more or less than `expected` bytes.
pub fn decompress_slices<'a>(
  method: u8, compressed: impl Iterator<Item = &'a [u8]> + Clone, expected: usize,
  confirm_adler: bool,
) -> Result<Vec<u8>, PngError> {
  let CompressionMethod::Zlib = CompressionMethod::try_from(method)?;
  let input_len = compressed.clone().fold(0_usize, |sum, s| sum.saturating_add(s.len()));
  if expected > input_len.saturating_mul(MAX_DEFLATE_RATIO) {
    warn!("{input_len} compressed bytes can't inflate to the expected {expected}");
    return Err(PngError::Decompression);
  }
  let mut out = try_zeroed_vec(expected)?;
  match miniz_oxide::inflate::decompress_slice_iter_to_slice(
    &mut out,
    compressed,
    true,
    !confirm_adler,
  ) {
    Ok(actual) if actual == expected => Ok(out),
    Ok(actual) => {
      warn!("zlib stream ended after {actual} bytes, expected {expected}");
      Err(PngError::DecompressedSizeMismatch { expected, actual })
    }
    Err(TINFLStatus::HasMoreOutput) => {
      warn!("zlib stream holds more than the expected {expected} bytes");
      Err(PngError::Decompression)
    }
    Err(status) => {
      debug!("inflate failed: {status:?}");
      Err(PngError::Decompression)
    }
  }
}

/// Deflates `data` as a zlib stream.
pub fn compress(method: u8, data: &[u8]) -> Result<Vec<u8>, PngError> {
  let CompressionMethod::Zlib = CompressionMethod::try_from(method)?;
  Ok(miniz_oxide::deflate::compress_to_vec_zlib(data, 6))
}

#[test]
fn test_decompress_known_stream() {
  // zlib stream of [0, 128]
  let z = [0x78, 0x9C, 0x63, 0x68, 0x00, 0x00, 0x00, 0x82, 0x00, 0x81];
  assert_eq!(decompress(0, &z, 2).unwrap(), [0, 128]);
  assert_eq!(decompress(1, &z, 2), Err(PngError::UnsupportedCompressionMethod(1)));
  assert_eq!(
    decompress(0, &z, 3),
    Err(PngError::DecompressedSizeMismatch { expected: 3, actual: 2 })
  );
  assert_eq!(decompress(0, &z, 1), Err(PngError::Decompression));
  assert_eq!(decompress(0, &z[..4], 2), Err(PngError::Decompression));
}

#[test]
fn test_decompress_rejects_impossible_size_before_inflating() {
  let z = [0x78, 0x9C, 0x63, 0x68, 0x00, 0x00, 0x00, 0x82, 0x00, 0x81];
  let too_big = z.len() * MAX_DEFLATE_RATIO + 1;
  assert_eq!(decompress(0, &z, too_big), Err(PngError::Decompression));
  assert_eq!(decompress(0, &z, usize::MAX), Err(PngError::Decompression));
  assert_eq!(decompress(0, &[], 1), Err(PngError::Decompression));
  // at the limit the stream is inflated, and just comes up short
  assert_eq!(
    decompress(0, &z, z.len() * MAX_DEFLATE_RATIO),
    Err(PngError::DecompressedSizeMismatch { expected: 10320, actual: 2 })
  );
}

#[test]
fn test_highly_compressible_data_is_accepted() {
  let data = alloc::vec![0_u8; 1 << 20];
  let z = compress(0, &data).unwrap();
  assert!(data.len() <= z.len() * MAX_DEFLATE_RATIO);
  assert_eq!(decompress(0, &z, data.len()).unwrap(), data);
}

#[test]
fn test_decompress_split_stream() {
  let z = [0x78, 0x9C, 0x63, 0x68, 0x00, 0x00, 0x00, 0x82, 0x00, 0x81];
  let (a, b) = z.split_at(4);
  assert_eq!(decompress_slices(0, [a, b].into_iter(), 2, true).unwrap(), [0, 128]);
}

#[test]
fn test_compress_then_decompress() {
  let data: Vec<u8> = (0..=255).cycle().take(1000).collect();
  let z = compress(0, &data).unwrap();
  assert_eq!(decompress(0, &z, data.len()).unwrap(), data);
  assert!(compress(8, &data).is_err());
}
