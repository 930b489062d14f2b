use super::*;

/// Background color, as a palette index.
///
/// Only the single byte (indexed color) form is decoded as `bKGD`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct bKGD {
  /// index into the `PLTE` entries
  pub index: u8,
}
impl ChunkData for bKGD {
  const TAG: ChunkTag = ChunkTag::bKGD;

  #[inline]
  fn parse(data: &[u8]) -> Result<Self, PngError> {
    let mut r = exact_len::<1>(Self::TAG, data)?;
    Ok(Self { index: r.read_u8()? })
  }

  #[inline]
  fn required_size(&self) -> usize {
    1
  }

  #[inline]
  fn write_fields(&self, w: &mut ByteWriter<'_>) -> Result<(), PngError> {
    w.write_u8(self.index)
  }
}

#[test]
fn test_bkgd_length() {
  assert_eq!(bKGD::parse(&[7]), Ok(bKGD { index: 7 }));
  assert!(bKGD::parse(&[]).is_err());
  assert!(bKGD::parse(&[0, 7]).is_err());
}
