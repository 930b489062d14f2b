use super::*;

/// Image End. Always the last chunk, and it has no data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IEND;
impl ChunkData for IEND {
  const TAG: ChunkTag = ChunkTag::IEND;

  #[inline]
  fn parse(data: &[u8]) -> Result<Self, PngError> {
    exact_len::<0>(Self::TAG, data).map(|_| IEND)
  }

  #[inline]
  fn required_size(&self) -> usize {
    0
  }

  #[inline]
  fn write_fields(&self, _: &mut ByteWriter<'_>) -> Result<(), PngError> {
    Ok(())
  }
}
