use super::*;

/// Bytes in a chunk envelope with no data: length, tag, and CRC.
pub const CHUNK_OVERHEAD: usize = 12;

/// One framed chunk of a PNG datastream.
///
/// A chunk from [`parse`](Chunk::parse) holds both its raw data bytes and the
/// payload parsed from them. A chunk made with
/// [`from_payload`](Chunk::from_payload) only holds the payload, and the bytes
/// are derived from it when writing.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Chunk {
  tag: ChunkTag,
  raw: Option<Vec<u8>>,
  parsed: Option<ChunkPayload>,
  crc: u32,
}
impl Debug for Chunk {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Chunk")
      .field("tag", &self.tag)
      .field("raw", &self.raw.as_ref().map(|r| (&r[..r.len().min(12)], r.len())))
      .field("parsed", &self.parsed)
      .field("crc", &format_args!("{:#010X}", self.crc))
      .finish()
  }
}

impl Chunk {
  /// Parses a chunk from a window holding exactly one envelope.
  ///
  /// Uses [`DecodeOptions::default`], so the CRC is stored but not checked.
  #[inline]
  pub fn parse(bytes: &[u8]) -> Result<Self, PngError> {
    Self::parse_with(bytes, &DecodeOptions::default())
  }

  /// Parses a chunk from a window holding exactly one envelope.
  ///
  /// ## Failure
  /// * Fewer than 12 bytes.
  /// * Declared length over `2^31-1`.
  /// * `12 + length` isn't exactly `bytes.len()`.
  /// * The data doesn't parse as the payload the tag names. Unknown tags
  ///   always parse.
  /// * With [`confirm_crc`](DecodeOptions::confirm_crc), a CRC mismatch.
  pub fn parse_with(bytes: &[u8], opts: &DecodeOptions) -> Result<Self, PngError> {
    if bytes.len() < CHUNK_OVERHEAD {
      return Err(PngError::UnexpectedEndOfInput);
    }
    let mut r = ByteReader::new(bytes);
    let declared = r.read_u32()?;
    if declared > MAX_CHUNK_LENGTH {
      return Err(PngError::ChunkLengthTooLarge(declared));
    }
    if (declared as usize).checked_add(CHUNK_OVERHEAD) != Some(bytes.len()) {
      return Err(PngError::ChunkLengthMismatch { declared, available: bytes.len() });
    }
    let tag = ChunkTag(r.read_array()?);
    let data = r.read_bytes(declared as usize)?;
    let crc = r.read_u32()?;
    if opts.confirm_crc() {
      let actual = chunk_crc(tag.0, data);
      if actual != crc {
        warn!("{tag} CRC mismatch: declared {crc:#010X}, actual {actual:#010X}");
        return Err(PngError::CrcMismatch { tag, declared: crc, actual });
      }
    }
    let raw = try_copy_bytes(data)?;
    let parsed = ChunkPayload::parse(tag, data)?;
    trace!("parsed {tag} chunk, {declared} data bytes");
    Ok(Self { tag, raw: Some(raw), parsed: Some(parsed), crc })
  }

  /// Makes a chunk from a typed payload, with a correct CRC.
  ///
  /// No raw bytes are kept; writing serializes the payload.
  pub fn from_payload(payload: impl Into<ChunkPayload>) -> Result<Self, PngError> {
    let payload: ChunkPayload = payload.into();
    let mut c = Self { tag: payload.tag(), raw: None, parsed: Some(payload), crc: 0 };
    c.refresh_crc()?;
    Ok(c)
  }

  /// Makes a chunk from a tag and data bytes, parsing the data.
  ///
  /// The CRC is computed.
  pub fn from_raw(tag: ChunkTag, data: &[u8]) -> Result<Self, PngError> {
    if data.len() > MAX_CHUNK_LENGTH as usize {
      return Err(PngError::ChunkLengthTooLarge(u32::try_from(data.len()).unwrap_or(u32::MAX)));
    }
    let parsed = ChunkPayload::parse(tag, data)?;
    let raw = try_copy_bytes(data)?;
    Ok(Self { tag, raw: Some(raw), parsed: Some(parsed), crc: chunk_crc(tag.0, data) })
  }

  #[inline]
  #[must_use]
  pub const fn tag(&self) -> ChunkTag {
    self.tag
  }

  /// The data bytes exactly as read, if the chunk came from bytes.
  #[inline]
  #[must_use]
  pub fn raw(&self) -> Option<&[u8]> {
    self.raw.as_deref()
  }

  /// The parsed payload.
  #[inline]
  #[must_use]
  pub const fn payload(&self) -> Option<&ChunkPayload> {
    self.parsed.as_ref()
  }

  /// The CRC field as stored (or as computed, for built chunks).
  #[inline]
  #[must_use]
  pub const fn crc(&self) -> u32 {
    self.crc
  }

  /// Number of data bytes this chunk writes, which is its length field.
  #[inline]
  #[must_use]
  pub fn data_len(&self) -> usize {
    match (&self.raw, &self.parsed) {
      (Some(raw), _) => raw.len(),
      (None, Some(p)) => p.required_size(),
      (None, None) => 0,
    }
  }

  /// The length field this chunk writes.
  #[inline]
  pub fn declared_length(&self) -> Result<u32, PngError> {
    let len = self.data_len();
    u32::try_from(len)
      .ok()
      .filter(|l| *l <= MAX_CHUNK_LENGTH)
      .ok_or(PngError::ChunkLengthTooLarge(u32::try_from(len).unwrap_or(u32::MAX)))
  }

  /// Exact bytes [`write_into`](Chunk::write_into) will write, envelope
  /// included.
  #[inline]
  #[must_use]
  pub fn required_size(&self) -> usize {
    CHUNK_OVERHEAD + self.data_len()
  }

  /// Writes the whole envelope to the start of `out`, giving the bytes
  /// written.
  ///
  /// Raw data bytes are written verbatim when present, otherwise the parsed
  /// payload is serialized. The stored CRC is written as-is.
  pub fn write_into(&self, out: &mut [u8]) -> Result<usize, PngError> {
    let required = self.required_size();
    if out.len() < required {
      return Err(PngError::OutputBufferTooSmall { required, provided: out.len() });
    }
    let out = &mut out[..required];
    let mut w = ByteWriter::new(&mut *out);
    w.write_u32(self.declared_length()?)?;
    w.write_bytes(&self.tag.0)?;
    let data_start = w.position();
    match (&self.raw, &self.parsed) {
      (Some(raw), _) => w.write_bytes(raw)?,
      (None, Some(p)) => {
        let written = p.write_into(&mut out[data_start..required - 4])?;
        debug_assert_eq!(written, self.data_len());
      }
      (None, None) => (),
    }
    out[required - 4..].copy_from_slice(&self.crc.to_be_bytes());
    trace!("wrote {} chunk, {} bytes", self.tag, required);
    Ok(required)
  }

  /// CRC of the tag and data this chunk writes.
  pub fn compute_crc(&self) -> Result<u32, PngError> {
    match (&self.raw, &self.parsed) {
      (Some(raw), _) => Ok(chunk_crc(self.tag.0, raw)),
      (None, Some(p)) => {
        let mut data = try_zeroed_vec(p.required_size())?;
        p.write_into(&mut data)?;
        Ok(chunk_crc(self.tag.0, &data))
      }
      (None, None) => Ok(chunk_crc(self.tag.0, &[])),
    }
  }

  /// If the stored CRC matches [`compute_crc`](Chunk::compute_crc).
  #[inline]
  pub fn crc_is_valid(&self) -> Result<bool, PngError> {
    Ok(self.compute_crc()? == self.crc)
  }

  /// Replaces the stored CRC with the computed one.
  #[inline]
  pub fn refresh_crc(&mut self) -> Result<(), PngError> {
    self.crc = self.compute_crc()?;
    Ok(())
  }
}

#[test]
fn test_chunk_minimum_envelope() {
  assert_eq!(Chunk::parse(&[0; 11]), Err(PngError::UnexpectedEndOfInput));
  let iend = [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82];
  let c = Chunk::parse(&iend).unwrap();
  assert_eq!(c.tag(), ChunkTag::IEND);
  assert_eq!(c.raw(), Some(&[][..]));
  assert_eq!(c.payload(), Some(&ChunkPayload::IEND(IEND)));
  assert_eq!(c.crc(), 0xAE42_6082);
  assert_eq!(c.crc_is_valid(), Ok(true));
}

#[test]
fn test_chunk_length_checks() {
  let mut too_big = [0_u8; 12];
  too_big[..4].copy_from_slice(&0x8000_0000_u32.to_be_bytes());
  assert_eq!(Chunk::parse(&too_big), Err(PngError::ChunkLengthTooLarge(0x8000_0000)));
  // declares 1 data byte, window only has the envelope
  let short = [0, 0, 0, 1, b'a', b'b', b'c', b'd', 0, 0, 0, 0];
  assert_eq!(
    Chunk::parse(&short),
    Err(PngError::ChunkLengthMismatch { declared: 1, available: 12 })
  );
  // declares 0 data bytes, window has an extra byte
  let long = [0, 0, 0, 0, b'a', b'b', b'c', b'd', 9, 0, 0, 0, 0];
  assert_eq!(
    Chunk::parse(&long),
    Err(PngError::ChunkLengthMismatch { declared: 0, available: 13 })
  );
}

#[test]
fn test_chunk_bad_payload_fails_whole_chunk() {
  // IEND must be empty
  let bytes = [0, 0, 0, 1, b'I', b'E', b'N', b'D', 0, 0, 0, 0, 0];
  assert_eq!(Chunk::parse(&bytes), Err(PngError::MalformedPayload(ChunkTag::IEND)));
}

#[test]
fn test_chunk_crc_confirmation() {
  let bad = [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0, 0, 0, 0];
  assert!(Chunk::parse(&bad).is_ok());
  let strict = DecodeOptions::default().set_confirm_crc(true);
  assert_eq!(
    Chunk::parse_with(&bad, &strict),
    Err(PngError::CrcMismatch { tag: ChunkTag::IEND, declared: 0, actual: 0xAE42_6082 })
  );
  let mut c = Chunk::parse(&bad).unwrap();
  assert_eq!(c.crc_is_valid(), Ok(false));
  c.refresh_crc().unwrap();
  assert_eq!(c.crc(), 0xAE42_6082);
}

#[test]
fn test_chunk_from_payload_writes_serialized_data() {
  let c = Chunk::from_payload(sRGB { rendering_intent: 0 }).unwrap();
  assert_eq!(c.raw(), None);
  assert_eq!(c.required_size(), 13);
  let mut out = [0_u8; 13];
  assert_eq!(c.write_into(&mut out), Ok(13));
  assert_eq!(out, [0, 0, 0, 1, b's', b'R', b'G', b'B', 0, 0xAE, 0xCE, 0x1C, 0xE9]);
  assert_eq!(Chunk::parse(&out), Ok(Chunk::from_raw(ChunkTag::sRGB, &[0]).unwrap()));
  let mut small = [0_u8; 12];
  assert_eq!(
    c.write_into(&mut small),
    Err(PngError::OutputBufferTooSmall { required: 13, provided: 12 })
  );
}

#[test]
fn test_chunk_write_into_larger_buffer_fills_only_envelope() {
  let text = tEXt::new(b"Title", b"hi").unwrap();
  let c = Chunk::from_payload(text).unwrap();
  assert_eq!(c.data_len(), 8);
  let mut out = [0xAA_u8; 32];
  assert_eq!(c.write_into(&mut out), Ok(20));
  assert_eq!(&out[..8], &[0, 0, 0, 8, b't', b'E', b'X', b't']);
  assert_eq!(&out[8..16], b"Title\0hi");
  assert_eq!(&out[16..20], &c.crc().to_be_bytes());
  assert!(out[20..].iter().all(|&b| b == 0xAA));
}
