use super::*;

/// Standard RGB colour space
///
/// The intent byte is kept as stored, `intent` gives the typed view.
///
/// Spec: [sRGB](https://www.w3.org/TR/png/#11sRGB)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct sRGB {
  /// 0 through 3, see [`SrgbIntent`]
  pub rendering_intent: u8,
}
impl ChunkData for sRGB {
  const TAG: ChunkTag = ChunkTag::sRGB;

  #[inline]
  fn parse(data: &[u8]) -> Result<Self, PngError> {
    let mut r = exact_len::<1>(Self::TAG, data)?;
    Ok(Self { rendering_intent: r.read_u8()? })
  }

  #[inline]
  fn required_size(&self) -> usize {
    1
  }

  #[inline]
  fn write_fields(&self, w: &mut ByteWriter<'_>) -> Result<(), PngError> {
    w.write_u8(self.rendering_intent)
  }
}
impl sRGB {
  /// The rendering intent, if the byte is one of the four defined values.
  #[inline]
  #[must_use]
  pub const fn intent(&self) -> Option<SrgbIntent> {
    Some(match self.rendering_intent {
      0 => SrgbIntent::Perceptual,
      1 => SrgbIntent::RelativeColorimetric,
      2 => SrgbIntent::Saturation,
      3 => SrgbIntent::AbsoluteColorimetric,
      _ => return None,
    })
  }
}
impl From<SrgbIntent> for sRGB {
  #[inline]
  fn from(intent: SrgbIntent) -> Self {
    Self { rendering_intent: intent as u8 }
  }
}

#[test]
fn test_srgb_intent() {
  assert_eq!(sRGB::parse(&[2]).unwrap().intent(), Some(SrgbIntent::Saturation));
  assert_eq!(sRGB::parse(&[9]).unwrap().intent(), None);
  assert!(sRGB::parse(&[0, 0]).is_err());
  assert_eq!(sRGB::from(SrgbIntent::AbsoluteColorimetric).rendering_intent, 3);
}
