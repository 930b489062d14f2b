//! Pixel format math shared by the header, the filters, and the assembler.
//!
//! A PNG pixel format is a color type plus a bit depth. The bit depth is per
//! channel, and every channel of a pixel has the same depth. Depths under 8
//! pack several pixels into each byte, with the high bits holding the leftmost
//! pixel, and every scanline is padded out to a whole byte.

use bytemuck::{Pod, Zeroable};

use crate::PngError;

/// The types of color that PNG supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  ///
  /// The palette will have RGB8 data.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl PngColorType {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Y => 1,
      Self::RGB => 3,
      Self::Index => 1,
      Self::YA => 2,
      Self::RGBA => 4,
    }
  }

  /// The bit depths this color type may be paired with, ascending.
  #[inline]
  #[must_use]
  pub const fn allowed_bit_depths(self) -> &'static [u8] {
    match self {
      Self::Y => &[1, 2, 4, 8, 16],
      Self::Index => &[1, 2, 4, 8],
      Self::RGB | Self::YA | Self::RGBA => &[8, 16],
    }
  }

  /// If `bit_depth` is legal for this color type.
  #[inline]
  #[must_use]
  pub fn allows_bit_depth(self, bit_depth: u8) -> bool {
    self.allowed_bit_depths().contains(&bit_depth)
  }
}
impl TryFrom<u8> for PngColorType {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => PngColorType::Y,
      2 => PngColorType::RGB,
      3 => PngColorType::Index,
      4 => PngColorType::YA,
      6 => PngColorType::RGBA,
      _ => return Err(PngError::InvalidHeader),
    })
  }
}
impl From<PngColorType> for u8 {
  #[inline]
  fn from(value: PngColorType) -> Self {
    value as u8
  }
}

/// A color type paired with a legal bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PngPixelFormat {
  color_type: PngColorType,
  bit_depth: u8,
}
impl PngPixelFormat {
  /// Pairs the two, failing if the depth isn't allowed for the color type.
  #[inline]
  pub fn new(color_type: PngColorType, bit_depth: u8) -> Result<Self, PngError> {
    if color_type.allows_bit_depth(bit_depth) {
      Ok(Self { color_type, bit_depth })
    } else {
      Err(PngError::InvalidHeader)
    }
  }

  /// The color type.
  #[inline]
  #[must_use]
  pub const fn color_type(self) -> PngColorType {
    self.color_type
  }

  /// Bits per channel.
  #[inline]
  #[must_use]
  pub const fn bit_depth(self) -> u8 {
    self.bit_depth
  }

  /// Bits in one whole pixel.
  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(self) -> usize {
    self.color_type.channel_count() * (self.bit_depth as usize)
  }

  /// Bytes per complete pixel, rounded up, with a minimum of 1.
  ///
  /// Filtering is per byte, and this is the distance back to the "left"
  /// neighbor byte of the same channel.
  #[inline]
  #[must_use]
  pub const fn bytes_per_pixel(self) -> usize {
    let bits = self.bits_per_pixel();
    if bits < 8 {
      1
    } else {
      bits / 8
    }
  }

  /// Bytes in one unfiltered scanline of `width` pixels, padded to a byte.
  #[inline]
  pub fn bytes_per_scanline(self, width: u32) -> Result<usize, PngError> {
    let bits = self.bits_per_pixel().checked_mul(width as usize).ok_or(PngError::CheckedMath)?;
    Ok(bits / 8 + usize::from(bits % 8 != 0))
  }
}

/// One RGB palette entry, 8 bits per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct PaletteEntry {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}
impl From<[u8; 3]> for PaletteEntry {
  #[inline]
  fn from([r, g, b]: [u8; 3]) -> Self {
    Self { r, g, b }
  }
}

#[test]
fn test_color_type_values() {
  assert_eq!(u8::from(PngColorType::Y), 0);
  assert_eq!(u8::from(PngColorType::RGB), 2);
  assert_eq!(u8::from(PngColorType::Index), 3);
  assert_eq!(u8::from(PngColorType::YA), 4);
  assert_eq!(u8::from(PngColorType::RGBA), 6);
  assert_eq!(PngColorType::try_from(1), Err(PngError::InvalidHeader));
  assert_eq!(PngColorType::try_from(5), Err(PngError::InvalidHeader));
}

#[test]
fn test_channel_counts() {
  assert_eq!(PngColorType::Y.channel_count(), 1);
  assert_eq!(PngColorType::RGB.channel_count(), 3);
  assert_eq!(PngColorType::Index.channel_count(), 1);
  assert_eq!(PngColorType::YA.channel_count(), 2);
  assert_eq!(PngColorType::RGBA.channel_count(), 4);
}

#[test]
fn test_allowed_bit_depths() {
  assert_eq!(PngColorType::Y.allowed_bit_depths(), &[1, 2, 4, 8, 16]);
  assert_eq!(PngColorType::RGB.allowed_bit_depths(), &[8, 16]);
  assert_eq!(PngColorType::Index.allowed_bit_depths(), &[1, 2, 4, 8]);
  assert_eq!(PngColorType::YA.allowed_bit_depths(), &[8, 16]);
  assert_eq!(PngColorType::RGBA.allowed_bit_depths(), &[8, 16]);
  assert!(PngPixelFormat::new(PngColorType::Index, 16).is_err());
  assert!(PngPixelFormat::new(PngColorType::RGB, 4).is_err());
}

#[test]
fn test_scanline_sizes() {
  let y1 = PngPixelFormat::new(PngColorType::Y, 1).unwrap();
  assert_eq!(y1.bytes_per_pixel(), 1);
  assert_eq!(y1.bytes_per_scanline(1), Ok(1));
  assert_eq!(y1.bytes_per_scanline(8), Ok(1));
  assert_eq!(y1.bytes_per_scanline(9), Ok(2));
  let rgba16 = PngPixelFormat::new(PngColorType::RGBA, 16).unwrap();
  assert_eq!(rgba16.bytes_per_pixel(), 8);
  assert_eq!(rgba16.bytes_per_scanline(3), Ok(24));
  let ya8 = PngPixelFormat::new(PngColorType::YA, 8).unwrap();
  assert_eq!(ya8.bytes_per_pixel(), 2);
}
