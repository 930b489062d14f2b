use super::*;

/// Significant bits
///
/// Four bytes kept verbatim. How many of them are meaningful depends on the
/// image's color type.
///
/// Spec: [sBIT](https://www.w3.org/TR/png/#11sBIT)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct sBIT(pub [u8; 4]);
impl ChunkData for sBIT {
  const TAG: ChunkTag = ChunkTag::sBIT;

  #[inline]
  fn parse(data: &[u8]) -> Result<Self, PngError> {
    let mut r = exact_len::<4>(Self::TAG, data)?;
    Ok(Self(r.read_array()?))
  }

  #[inline]
  fn required_size(&self) -> usize {
    4
  }

  #[inline]
  fn write_fields(&self, w: &mut ByteWriter<'_>) -> Result<(), PngError> {
    w.write_bytes(&self.0)
  }
}
