use super::*;

/// Image gamma
///
/// Spec: [gAMA](https://www.w3.org/TR/png/#11gAMA)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct gAMA {
  /// gamma times 100,000
  pub gamma: u32,
}
impl ChunkData for gAMA {
  const TAG: ChunkTag = ChunkTag::gAMA;

  #[inline]
  fn parse(data: &[u8]) -> Result<Self, PngError> {
    let mut r = exact_len::<4>(Self::TAG, data)?;
    Ok(Self { gamma: r.read_u32()? })
  }

  #[inline]
  fn required_size(&self) -> usize {
    4
  }

  #[inline]
  fn write_fields(&self, w: &mut ByteWriter<'_>) -> Result<(), PngError> {
    w.write_u32(self.gamma)
  }
}
impl gAMA {
  /// The gamma as a float, `gamma / 100_000`.
  #[inline]
  #[must_use]
  pub fn to_f32(self) -> f32 {
    self.gamma as f32 / 100_000.0
  }
}

#[test]
fn test_gama_big_endian() {
  // 1/2.2
  let g = gAMA::parse(&[0x00, 0x00, 0xB1, 0x8F]).unwrap();
  assert_eq!(g.gamma, 45455);
  assert!(gAMA::parse(&[0, 0, 0xB1]).is_err());
}
