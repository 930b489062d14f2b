use super::*;

/// Image Header
///
/// The fields are kept exactly as stored, so any 13 bytes parse and write
/// back unchanged. Call [`validate`](IHDR::validate) (or one of the typed
/// accessors) before trusting them to describe a decodable image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IHDR {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type, see [`PngColorType`]
  pub color_type: u8,
  /// must be 0 (zlib)
  pub compression_method: u8,
  /// must be 0 (adaptive, five filter types)
  pub filter_method: u8,
  /// 0 for no interlace, 1 for Adam7
  pub interlace_method: u8,
}
impl ChunkData for IHDR {
  const TAG: ChunkTag = ChunkTag::IHDR;

  fn parse(data: &[u8]) -> Result<Self, PngError> {
    let mut r = exact_len::<13>(Self::TAG, data)?;
    Ok(Self {
      width: r.read_u32()?,
      height: r.read_u32()?,
      bit_depth: r.read_u8()?,
      color_type: r.read_u8()?,
      compression_method: r.read_u8()?,
      filter_method: r.read_u8()?,
      interlace_method: r.read_u8()?,
    })
  }

  #[inline]
  fn required_size(&self) -> usize {
    13
  }

  fn write_fields(&self, w: &mut ByteWriter<'_>) -> Result<(), PngError> {
    w.write_u32(self.width)?;
    w.write_u32(self.height)?;
    w.write_u8(self.bit_depth)?;
    w.write_u8(self.color_type)?;
    w.write_u8(self.compression_method)?;
    w.write_u8(self.filter_method)?;
    w.write_u8(self.interlace_method)
  }
}
impl IHDR {
  /// A non-interlaced header with methods set to 0.
  #[inline]
  #[must_use]
  pub const fn new(width: u32, height: u32, color_type: PngColorType, bit_depth: u8) -> Self {
    Self {
      width,
      height,
      bit_depth,
      color_type: color_type as u8,
      compression_method: 0,
      filter_method: 0,
      interlace_method: 0,
    }
  }

  /// The color type, if it's one PNG defines.
  #[inline]
  pub fn color_type(&self) -> Result<PngColorType, PngError> {
    PngColorType::try_from(self.color_type)
  }

  /// The color type and bit depth, if they're a legal pairing.
  #[inline]
  pub fn pixel_format(&self) -> Result<PngPixelFormat, PngError> {
    PngPixelFormat::new(self.color_type()?, self.bit_depth)
  }

  #[inline]
  #[must_use]
  pub const fn is_interlaced(&self) -> bool {
    self.interlace_method == 1
  }

  /// Checks every field against the PNG rules.
  ///
  /// * compression and filter method must be 0
  /// * interlace method must be 0 or 1
  /// * width and height must be in `1..=2^31-1`
  /// * the bit depth must be allowed for the color type
  ///
  /// The methods are checked first, and an unknown one is reported as
  /// [`UnsupportedCompressionMethod`](PngError::UnsupportedCompressionMethod),
  /// [`UnsupportedFilterMethod`](PngError::UnsupportedFilterMethod), or
  /// [`UnsupportedInterlaceMethod`](PngError::UnsupportedInterlaceMethod).
  /// Everything else is [`InvalidHeader`](PngError::InvalidHeader).
  pub fn validate(&self) -> Result<(), PngError> {
    CompressionMethod::try_from(self.compression_method)?;
    if self.filter_method != 0 {
      return Err(PngError::UnsupportedFilterMethod(self.filter_method));
    }
    if self.interlace_method > 1 {
      return Err(PngError::UnsupportedInterlaceMethod(self.interlace_method));
    }
    let max = MAX_CHUNK_LENGTH;
    if self.width == 0 || self.height == 0 || self.width > max || self.height > max {
      return Err(PngError::InvalidHeader);
    }
    self.pixel_format()?;
    Ok(())
  }

  /// Bytes of unfiltered pixel data: `height` rows of padded scanlines.
  pub fn plain_image_size(&self) -> Result<usize, PngError> {
    let line = self.pixel_format()?.bytes_per_scanline(self.width)?;
    line.checked_mul(self.height as usize).ok_or(PngError::CheckedMath)
  }

  /// Bytes of filtered pixel data, which is what the zlib stream inflates to.
  ///
  /// Each row gets one extra leading byte for its filter type.
  pub fn filtered_image_size(&self) -> Result<usize, PngError> {
    self.plain_image_size()?.checked_add(self.height as usize).ok_or(PngError::CheckedMath)
  }
}

#[test]
fn test_ihdr_length_boundaries() {
  let good = [0, 0, 0, 1, 0, 0, 0, 2, 8, 0, 0, 0, 0];
  assert!(IHDR::parse(&good).is_ok());
  assert_eq!(IHDR::parse(&good[..12]), Err(PngError::MalformedPayload(ChunkTag::IHDR)));
  let mut long = [0_u8; 14];
  long[..13].copy_from_slice(&good);
  assert_eq!(IHDR::parse(&long), Err(PngError::MalformedPayload(ChunkTag::IHDR)));
}

#[test]
fn test_ihdr_field_order() {
  let data = [0, 0, 1, 0, 0, 0, 0, 32, 16, 6, 0, 0, 1];
  let ihdr = IHDR::parse(&data).unwrap();
  assert_eq!(ihdr.width, 256);
  assert_eq!(ihdr.height, 32);
  assert_eq!(ihdr.bit_depth, 16);
  assert_eq!(ihdr.color_type(), Ok(PngColorType::RGBA));
  assert!(ihdr.is_interlaced());
  let mut out = [0_u8; 13];
  assert_eq!(ihdr.write_into(&mut out), Ok(13));
  assert_eq!(out, data);
}

#[test]
fn test_ihdr_validate() {
  assert_eq!(IHDR::new(1, 1, PngColorType::Y, 8).validate(), Ok(()));
  assert_eq!(IHDR::new(0, 1, PngColorType::Y, 8).validate(), Err(PngError::InvalidHeader));
  assert_eq!(IHDR::new(1, 1 << 31, PngColorType::Y, 8).validate(), Err(PngError::InvalidHeader));
  assert_eq!(IHDR::new(1, 1, PngColorType::RGB, 1).validate(), Err(PngError::InvalidHeader));
  let mut ihdr = IHDR::new(1, 1, PngColorType::Index, 4);
  ihdr.filter_method = 1;
  assert_eq!(ihdr.validate(), Err(PngError::UnsupportedFilterMethod(1)));
  ihdr.filter_method = 0;
  ihdr.compression_method = 1;
  assert_eq!(ihdr.validate(), Err(PngError::UnsupportedCompressionMethod(1)));
  ihdr.compression_method = 0;
  ihdr.interlace_method = 2;
  assert_eq!(ihdr.validate(), Err(PngError::UnsupportedInterlaceMethod(2)));
  // an unknown method is reported even when the dimensions are bad too
  let mut zero = IHDR::new(0, 0, PngColorType::Y, 8);
  zero.compression_method = 7;
  assert_eq!(zero.validate(), Err(PngError::UnsupportedCompressionMethod(7)));
}

#[test]
fn test_ihdr_image_sizes() {
  let ihdr = IHDR::new(3, 2, PngColorType::RGB, 8);
  assert_eq!(ihdr.plain_image_size(), Ok(18));
  assert_eq!(ihdr.filtered_image_size(), Ok(20));
  let ihdr = IHDR::new(10, 3, PngColorType::Y, 1);
  assert_eq!(ihdr.plain_image_size(), Ok(6));
  assert_eq!(ihdr.filtered_image_size(), Ok(9));
}
