use super::*;

/// Palette data
///
/// Palette entries are always RGB. The chunk length must be a multiple of 3,
/// and zero entries is accepted here (a decoder of indexed images will want
/// at least one).
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PLTE(Vec<PaletteEntry>);
impl ChunkData for PLTE {
  const TAG: ChunkTag = ChunkTag::PLTE;

  fn parse(data: &[u8]) -> Result<Self, PngError> {
    let entries: &[PaletteEntry] =
      bytemuck::try_cast_slice(data).map_err(|_| PngError::MalformedPayload(Self::TAG))?;
    let mut v = Vec::new();
    v.try_reserve_exact(entries.len())?;
    v.extend_from_slice(entries);
    Ok(Self(v))
  }

  #[inline]
  fn required_size(&self) -> usize {
    self.0.len() * 3
  }

  fn write_fields(&self, w: &mut ByteWriter<'_>) -> Result<(), PngError> {
    w.write_bytes(bytemuck::cast_slice(self.0.as_slice()))
  }
}
impl From<Vec<PaletteEntry>> for PLTE {
  #[inline]
  fn from(entries: Vec<PaletteEntry>) -> Self {
    Self(entries)
  }
}
impl Debug for PLTE {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    // currently prints no more than 4 palette entries
    f.debug_tuple("PLTE").field(&&self.0[..self.0.len().min(4)]).field(&self.0.len()).finish()
  }
}
impl PLTE {
  /// Gets the entries as a slice.
  #[inline]
  #[must_use]
  pub fn entries(&self) -> &[PaletteEntry] {
    &self.0
  }
}

#[test]
fn test_plte_divisibility() {
  assert_eq!(PLTE::parse(&[1, 2, 3, 4]), Err(PngError::MalformedPayload(ChunkTag::PLTE)));
  assert!(PLTE::parse(&[]).unwrap().entries().is_empty());
  let plte = PLTE::parse(&[1, 2, 3, 4, 5, 6]).unwrap();
  assert_eq!(
    plte.entries(),
    &[PaletteEntry { r: 1, g: 2, b: 3 }, PaletteEntry { r: 4, g: 5, b: 6 }]
  );
  assert_eq!(plte.required_size(), 6);
}
