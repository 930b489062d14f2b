use super::*;

/// Physical pixel dimensions
///
/// Spec: [pHYs](https://www.w3.org/TR/png/#11pHYs)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct pHYs {
  /// pixels per unit, X axis
  pub pixels_per_x: u32,
  /// pixels per unit, Y axis
  pub pixels_per_y: u32,
  /// 0 means the values only give an aspect ratio, 1 means the unit is meters
  pub unit: u8,
}
impl ChunkData for pHYs {
  const TAG: ChunkTag = ChunkTag::pHYs;

  fn parse(data: &[u8]) -> Result<Self, PngError> {
    let mut r = exact_len::<9>(Self::TAG, data)?;
    Ok(Self { pixels_per_x: r.read_u32()?, pixels_per_y: r.read_u32()?, unit: r.read_u8()? })
  }

  #[inline]
  fn required_size(&self) -> usize {
    9
  }

  fn write_fields(&self, w: &mut ByteWriter<'_>) -> Result<(), PngError> {
    w.write_u32(self.pixels_per_x)?;
    w.write_u32(self.pixels_per_y)?;
    w.write_u8(self.unit)
  }
}
impl pHYs {
  #[inline]
  #[must_use]
  pub const fn unit_is_meter(&self) -> bool {
    self.unit == 1
  }
}

#[test]
fn test_phys_fields() {
  let data = [0, 0, 0x0B, 0x13, 0, 0, 0x0B, 0x13, 1];
  let p = pHYs::parse(&data).unwrap();
  assert_eq!(p.pixels_per_x, 2835);
  assert_eq!(p.pixels_per_y, 2835);
  assert!(p.unit_is_meter());
  let mut out = [0_u8; 9];
  assert_eq!(p.write_into(&mut out), Ok(9));
  assert_eq!(out, data);
  assert!(pHYs::parse(&data[..8]).is_err());
}
