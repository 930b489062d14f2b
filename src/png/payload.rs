use super::*;

/// The per-type codec that every chunk payload implements.
///
/// Parsing checks only what's needed to decode the fields; it does not
/// cross-check against other chunks. Writing is the exact inverse of parsing,
/// and uses a two step convention: ask [`required_size`](ChunkData::required_size)
/// first, allocate exactly that much, then call
/// [`write_into`](ChunkData::write_into).
pub trait ChunkData: Sized {
  /// The tag this payload is stored under.
  const TAG: ChunkTag;

  /// Parses the chunk data bytes.
  fn parse(data: &[u8]) -> Result<Self, PngError>;

  /// Exact number of bytes [`write_into`](ChunkData::write_into) will write.
  fn required_size(&self) -> usize;

  /// Writes the fields in wire order.
  ///
  /// Only called after the buffer is known to be large enough.
  fn write_fields(&self, w: &mut ByteWriter<'_>) -> Result<(), PngError>;

  /// Writes the payload to the start of `out`, giving the bytes written.
  fn write_into(&self, out: &mut [u8]) -> Result<usize, PngError> {
    let required = self.required_size();
    if out.len() < required {
      return Err(PngError::OutputBufferTooSmall { required, provided: out.len() });
    }
    let mut w = ByteWriter::new(&mut out[..required]);
    self.write_fields(&mut w)?;
    debug_assert_eq!(w.position(), required);
    Ok(w.position())
  }
}

/// Fails with [`PngError::MalformedPayload`] unless `data` is exactly `N`
/// bytes, otherwise gives a reader over it.
#[inline]
pub(crate) fn exact_len<const N: usize>(
  tag: ChunkTag, data: &[u8],
) -> Result<ByteReader<'_>, PngError> {
  if data.len() == N {
    Ok(ByteReader::new(data))
  } else {
    Err(PngError::MalformedPayload(tag))
  }
}

/// Data of a chunk whose tag has no typed payload.
///
/// This never fails to parse: the bytes are kept exactly as given.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Unknown {
  tag: ChunkTag,
  data: Vec<u8>,
}
impl Unknown {
  /// Copies `data` to be stored under `tag`.
  ///
  /// ## Failure
  /// * `tag` is [known](ChunkTag::is_known). Those tags always parse as their
  ///   typed payload, so an `Unknown` under one wouldn't read back as itself.
  #[inline]
  pub fn new(tag: ChunkTag, data: &[u8]) -> Result<Self, PngError> {
    if tag.is_known() {
      return Err(PngError::TypedTag(tag));
    }
    Ok(Self { tag, data: try_copy_bytes(data)? })
  }
  #[inline]
  #[must_use]
  pub const fn tag(&self) -> ChunkTag {
    self.tag
  }
  #[inline]
  #[must_use]
  pub fn data(&self) -> &[u8] {
    &self.data
  }
}
impl Debug for Unknown {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Unknown")
      .field("tag", &self.tag)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .finish()
  }
}

/// A parsed chunk payload.
///
/// There's one variant per [known](ChunkTag::KNOWN) tag, and the `Unknown`
/// variant holds the bytes of any other tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub enum ChunkPayload {
  /// Image Header
  IHDR(IHDR),
  /// Palette
  PLTE(PLTE),
  /// Image Data
  IDAT(IDAT),
  /// Image End
  IEND(IEND),
  /// Textual data
  tEXt(tEXt),
  /// Background color palette index
  bKGD(bKGD),
  /// Gamma value times 100,000
  gAMA(gAMA),
  /// Physical pixel dimensions
  pHYs(pHYs),
  /// sRGB rendering intent
  sRGB(sRGB),
  /// Significant bits
  sBIT(sBIT),
  /// Any other tag
  Unknown(Unknown),
}

macro_rules! dispatch {
  ($self:expr, $p:ident => $e:expr, $u:ident => $ue:expr) => {
    match $self {
      ChunkPayload::IHDR($p) => $e,
      ChunkPayload::PLTE($p) => $e,
      ChunkPayload::IDAT($p) => $e,
      ChunkPayload::IEND($p) => $e,
      ChunkPayload::tEXt($p) => $e,
      ChunkPayload::bKGD($p) => $e,
      ChunkPayload::gAMA($p) => $e,
      ChunkPayload::pHYs($p) => $e,
      ChunkPayload::sRGB($p) => $e,
      ChunkPayload::sBIT($p) => $e,
      ChunkPayload::Unknown($u) => $ue,
    }
  };
}

impl ChunkPayload {
  /// Parses `data` as the payload type that `tag` names.
  ///
  /// Tags without a typed payload always parse, as [`ChunkPayload::Unknown`].
  pub fn parse(tag: ChunkTag, data: &[u8]) -> Result<Self, PngError> {
    Ok(match tag {
      ChunkTag::IHDR => Self::IHDR(IHDR::parse(data)?),
      ChunkTag::PLTE => Self::PLTE(PLTE::parse(data)?),
      ChunkTag::IDAT => Self::IDAT(IDAT::parse(data)?),
      ChunkTag::IEND => Self::IEND(IEND::parse(data)?),
      ChunkTag::tEXt => Self::tEXt(tEXt::parse(data)?),
      ChunkTag::bKGD => Self::bKGD(bKGD::parse(data)?),
      ChunkTag::gAMA => Self::gAMA(gAMA::parse(data)?),
      ChunkTag::pHYs => Self::pHYs(pHYs::parse(data)?),
      ChunkTag::sRGB => Self::sRGB(sRGB::parse(data)?),
      ChunkTag::sBIT => Self::sBIT(sBIT::parse(data)?),
      other => {
        trace!("no typed payload for {other}, keeping {} bytes as-is", data.len());
        Self::Unknown(Unknown::new(other, data)?)
      }
    })
  }

  /// The tag this payload is stored under.
  #[inline]
  #[must_use]
  pub fn tag(&self) -> ChunkTag {
    dispatch!(self, p => chunk_tag_of(p), u => u.tag())
  }

  /// Exact bytes [`write_into`](ChunkPayload::write_into) will write.
  #[inline]
  #[must_use]
  pub fn required_size(&self) -> usize {
    dispatch!(self, p => p.required_size(), u => u.data().len())
  }

  /// Writes the payload bytes to the start of `out`, giving the count written.
  pub fn write_into(&self, out: &mut [u8]) -> Result<usize, PngError> {
    dispatch!(self, p => p.write_into(out), u => {
      let mut w = ByteWriter::new(out);
      w.write_bytes(u.data())?;
      Ok(w.position())
    })
  }
}

#[inline]
fn chunk_tag_of<T: ChunkData>(_: &T) -> ChunkTag {
  T::TAG
}

macro_rules! payload_conversions {
  ($($t:ident),*) => {
    $(
      impl From<$t> for ChunkPayload {
        #[inline]
        fn from(p: $t) -> Self {
          Self::$t(p)
        }
      }
      impl TryFrom<ChunkPayload> for $t {
        type Error = ChunkPayload;
        #[inline]
        fn try_from(value: ChunkPayload) -> Result<Self, Self::Error> {
          match value {
            ChunkPayload::$t(p) => Ok(p),
            other => Err(other),
          }
        }
      }
    )*
  };
}
payload_conversions!(IHDR, PLTE, IDAT, IEND, tEXt, bKGD, gAMA, pHYs, sRGB, sBIT, Unknown);
