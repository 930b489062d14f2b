use super::*;

/// A datastream that stopped parsing before its end.
///
/// Holds every chunk parsed before the failure, the failure itself, and the
/// byte offset (from the start of the input) of the envelope that failed. If
/// you'd rather keep going with whatever parsed, call
/// [`into_chunks`](PartialParse::into_chunks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialParse {
  chunks: Vec<Chunk>,
  error: PngError,
  offset: usize,
}
impl PartialParse {
  /// The chunks parsed before the failure, in datastream order.
  #[inline]
  #[must_use]
  pub fn chunks(&self) -> &[Chunk] {
    &self.chunks
  }

  #[inline]
  #[must_use]
  pub const fn error(&self) -> PngError {
    self.error
  }

  /// Where the failed envelope (or the signature) starts.
  #[inline]
  #[must_use]
  pub const fn offset(&self) -> usize {
    self.offset
  }

  #[inline]
  #[must_use]
  pub fn into_chunks(self) -> Vec<Chunk> {
    self.chunks
  }
}
impl Display for PartialParse {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "{} at byte {}, after {} chunks", self.error, self.offset, self.chunks.len())
  }
}

/// Parses a whole datastream into its chunks, with default options.
///
/// * `has_signature`: the input starts with the 8 byte [`PNG_SIGNATURE`].
///
/// See [`parse_datastream_with`].
#[inline]
pub fn parse_datastream(bytes: &[u8], has_signature: bool) -> Result<Vec<Chunk>, PartialParse> {
  parse_datastream_with(bytes, has_signature, &DecodeOptions::default())
}

/// Parses a whole datastream into its chunks.
///
/// Chunks are parsed back to back until the input is used up. Empty input
/// (after any signature) is zero chunks.
///
/// ## Failure
/// Parsing stops at the first envelope that doesn't parse, including trailing
/// bytes too short to be an envelope. The error carries the chunks parsed
/// before that point.
pub fn parse_datastream_with(
  bytes: &[u8], has_signature: bool, opts: &DecodeOptions,
) -> Result<Vec<Chunk>, PartialParse> {
  let mut chunks: Vec<Chunk> = Vec::new();
  let mut offset = 0;
  let stop = |chunks: Vec<Chunk>, error: PngError, offset: usize| {
    warn!("datastream parsing stopped at byte {offset} after {} chunks: {error}", chunks.len());
    PartialParse { chunks, error, offset }
  };
  if has_signature {
    if bytes.len() < PNG_SIGNATURE.len() {
      return Err(stop(chunks, PngError::UnexpectedEndOfInput, 0));
    }
    if opts.confirm_signature() && !is_png_signature(bytes) {
      return Err(stop(chunks, PngError::NoPngSignature, 0));
    }
    offset = PNG_SIGNATURE.len();
  }
  while offset < bytes.len() {
    let window = match envelope_end(&bytes[offset..]) {
      Ok(len) => &bytes[offset..offset + len],
      Err(e) => return Err(stop(chunks, e, offset)),
    };
    let chunk = match Chunk::parse_with(window, opts) {
      Ok(chunk) => chunk,
      Err(e) => return Err(stop(chunks, e, offset)),
    };
    if let Err(e) = chunks.try_reserve(1) {
      return Err(stop(chunks, e.into(), offset));
    }
    chunks.push(chunk);
    offset += window.len();
  }
  Ok(chunks)
}

/// Size of the envelope at the start of `rest`, checked against the bytes
/// that are actually there.
fn envelope_end(rest: &[u8]) -> Result<usize, PngError> {
  if rest.len() < CHUNK_OVERHEAD {
    return Err(PngError::UnexpectedEndOfInput);
  }
  let declared = ByteReader::new(rest).read_u32()?;
  if declared > MAX_CHUNK_LENGTH {
    return Err(PngError::ChunkLengthTooLarge(declared));
  }
  let len = (declared as usize).checked_add(CHUNK_OVERHEAD).ok_or(PngError::CheckedMath)?;
  if len > rest.len() {
    return Err(PngError::UnexpectedEndOfInput);
  }
  Ok(len)
}

/// Exact bytes [`write_datastream_into`] will write for these chunks.
#[must_use]
pub fn datastream_required_size(chunks: &[Chunk], write_signature: bool) -> usize {
  let sig = if write_signature { PNG_SIGNATURE.len() } else { 0 };
  chunks.iter().map(Chunk::required_size).fold(sig, usize::saturating_add)
}

/// Writes the chunks, optionally after the signature, to the start of `out`.
///
/// Gives the number of bytes written, which always equals
/// [`datastream_required_size`].
pub fn write_datastream_into(
  chunks: &[Chunk], write_signature: bool, out: &mut [u8],
) -> Result<usize, PngError> {
  let required = datastream_required_size(chunks, write_signature);
  if out.len() < required {
    return Err(PngError::OutputBufferTooSmall { required, provided: out.len() });
  }
  let mut position = 0;
  if write_signature {
    out[..PNG_SIGNATURE.len()].copy_from_slice(&PNG_SIGNATURE);
    position = PNG_SIGNATURE.len();
  }
  for chunk in chunks {
    position += chunk.write_into(&mut out[position..])?;
  }
  debug_assert_eq!(position, required);
  Ok(position)
}

/// Allocates exactly the required size and writes the datastream into it.
pub fn write_datastream_to_vec(
  chunks: &[Chunk], write_signature: bool,
) -> Result<Vec<u8>, PngError> {
  let mut out = try_zeroed_vec(datastream_required_size(chunks, write_signature))?;
  write_datastream_into(chunks, write_signature, &mut out)?;
  Ok(out)
}

#[test]
fn test_datastream_signature_handling() {
  let iend = [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82];
  let mut with_sig = [0_u8; 20];
  with_sig[..8].copy_from_slice(&PNG_SIGNATURE);
  with_sig[8..].copy_from_slice(&iend);
  assert_eq!(parse_datastream(&with_sig, true).unwrap().len(), 1);
  assert_eq!(parse_datastream(&iend, false).unwrap().len(), 1);
  with_sig[0] = 0;
  let err = parse_datastream(&with_sig, true).unwrap_err();
  assert_eq!(err.error(), PngError::NoPngSignature);
  assert_eq!(err.offset(), 0);
  // without confirmation the first 8 bytes are only skipped
  assert_eq!(parse_datastream_with(&with_sig, true, &DecodeOptions::lenient()).unwrap().len(), 1);
  assert_eq!(parse_datastream(&[], false), Ok(Vec::new()));
  assert_eq!(parse_datastream(&PNG_SIGNATURE, true), Ok(Vec::new()));
}

#[test]
fn test_datastream_stops_with_prefix() {
  let iend = [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82];
  let mut bytes = [0_u8; 29];
  bytes[..12].copy_from_slice(&iend);
  bytes[12..24].copy_from_slice(&iend);
  // a length claiming more bytes than remain
  bytes[24..29].copy_from_slice(&[0, 0, 0, 9, b'x']);
  let err = parse_datastream(&bytes, false).unwrap_err();
  assert_eq!(err.error(), PngError::UnexpectedEndOfInput);
  assert_eq!(err.offset(), 24);
  assert_eq!(err.chunks().len(), 2);
  assert_eq!(err.into_chunks().len(), 2);
}

#[test]
fn test_datastream_write_size_query() {
  let chunks = [
    Chunk::from_payload(gAMA { gamma: 45455 }).unwrap(),
    Chunk::from_payload(IEND).unwrap(),
  ];
  let size = datastream_required_size(&chunks, true);
  assert_eq!(size, 8 + 16 + 12);
  let mut out = alloc::vec![0_u8; size];
  assert_eq!(write_datastream_into(&chunks, true, &mut out), Ok(size));
  assert_eq!(parse_datastream(&out, true).unwrap(), {
    let mut v: Vec<Chunk> = Vec::new();
    v.push(Chunk::from_raw(ChunkTag::gAMA, &45455_u32.to_be_bytes()).unwrap());
    v.push(Chunk::from_raw(ChunkTag::IEND, &[]).unwrap());
    v
  });
  assert!(write_datastream_into(&chunks, true, &mut out[..size - 1]).is_err());
}
