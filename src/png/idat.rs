use super::*;
/// Image Data.
///
/// * Image data is stored with Zlib compression applied.
/// * Images can have more than one IDAT chunk. They should all be stored in a
///   row. Multiple chunks are treated as a single Zlib datastream.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IDAT(Vec<u8>);
impl ChunkData for IDAT {
  const TAG: ChunkTag = ChunkTag::IDAT;

  #[inline]
  fn parse(data: &[u8]) -> Result<Self, PngError> {
    try_copy_bytes(data).map(Self)
  }

  #[inline]
  fn required_size(&self) -> usize {
    self.0.len()
  }

  #[inline]
  fn write_fields(&self, w: &mut ByteWriter<'_>) -> Result<(), PngError> {
    w.write_bytes(&self.0)
  }
}
impl From<Vec<u8>> for IDAT {
  #[inline]
  fn from(data: Vec<u8>) -> Self {
    Self(data)
  }
}
impl Debug for IDAT {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_tuple("IDAT").field(&&self.0[..self.0.len().min(12)]).field(&self.0.len()).finish()
  }
}
impl IDAT {
  /// The compressed bytes this chunk holds.
  #[inline]
  #[must_use]
  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }
}
