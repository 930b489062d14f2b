use super::*;

/// A four byte chunk type tag, such as `IHDR`.
///
/// Bit 5 of each byte (the ASCII lowercase bit) carries a property:
/// * byte 0: ancillary (set) or critical (clear)
/// * byte 1: private (set) or public (clear)
/// * byte 2: reserved, must be clear in this version of PNG
/// * byte 3: safe to copy (set) or not (clear)
///
/// Any four bytes may be used as a tag when parsing. Use
/// [`is_well_formed`](ChunkTag::is_well_formed) to check that a tag follows
/// the naming rules.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkTag(pub [u8; 4]);

const PROPERTY_BIT: u8 = 1 << 5;

#[allow(nonstandard_style)]
impl ChunkTag {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
  pub const tEXt: Self = Self(*b"tEXt");
  pub const bKGD: Self = Self(*b"bKGD");
  pub const gAMA: Self = Self(*b"gAMA");
  pub const pHYs: Self = Self(*b"pHYs");
  pub const sRGB: Self = Self(*b"sRGB");
  pub const sBIT: Self = Self(*b"sBIT");

  /// Every tag that has a typed payload.
  pub const KNOWN: [Self; 10] = [
    Self::IHDR,
    Self::PLTE,
    Self::IDAT,
    Self::IEND,
    Self::tEXt,
    Self::bKGD,
    Self::gAMA,
    Self::pHYs,
    Self::sRGB,
    Self::sBIT,
  ];

  /// The raw tag bytes.
  #[inline]
  #[must_use]
  pub const fn bytes(self) -> [u8; 4] {
    self.0
  }

  /// If this tag is one of the [`KNOWN`](ChunkTag::KNOWN) tags.
  #[inline]
  #[must_use]
  pub fn is_known(self) -> bool {
    Self::KNOWN.contains(&self)
  }

  /// Ancillary chunks can be ignored by a decoder.
  #[inline]
  #[must_use]
  pub const fn is_ancillary(self) -> bool {
    (self.0[0] & PROPERTY_BIT) != 0
  }

  /// Critical chunks must be understood to decode the image.
  #[inline]
  #[must_use]
  pub const fn is_critical(self) -> bool {
    !self.is_ancillary()
  }

  #[inline]
  #[must_use]
  pub const fn is_private(self) -> bool {
    (self.0[1] & PROPERTY_BIT) != 0
  }

  #[inline]
  #[must_use]
  pub const fn is_public(self) -> bool {
    !self.is_private()
  }

  /// Must be unset in this version of PNG.
  #[inline]
  #[must_use]
  pub const fn is_reserved_bit_set(self) -> bool {
    (self.0[2] & PROPERTY_BIT) != 0
  }

  /// Editors that don't understand the chunk may still copy it.
  #[inline]
  #[must_use]
  pub const fn is_safe_to_copy(self) -> bool {
    (self.0[3] & PROPERTY_BIT) != 0
  }

  /// All four bytes are ASCII letters and the reserved bit is unset.
  #[inline]
  #[must_use]
  pub const fn is_well_formed(self) -> bool {
    let [a, b, c, d] = self.0;
    a.is_ascii_alphabetic()
      && b.is_ascii_alphabetic()
      && c.is_ascii_alphabetic()
      && d.is_ascii_alphabetic()
      && !self.is_reserved_bit_set()
  }
}
impl From<[u8; 4]> for ChunkTag {
  #[inline]
  fn from(bytes: [u8; 4]) -> Self {
    Self(bytes)
  }
}
impl Debug for ChunkTag {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char('\"')?;
    Display::fmt(self, f)?;
    f.write_char('\"')
  }
}
impl Display for ChunkTag {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    for ch in self.0.iter().copied().map(|u| u as char) {
      f.write_char(ch)?;
    }
    Ok(())
  }
}

#[test]
fn test_known_tag_bytes() {
  assert_eq!(ChunkTag::IHDR.bytes(), [73, 72, 68, 82]);
  assert_eq!(ChunkTag::sRGB.bytes(), [115, 82, 71, 66]);
  assert_eq!(ChunkTag::pHYs.bytes(), [112, 72, 89, 115]);
  assert_eq!(ChunkTag::tEXt.bytes(), [116, 69, 88, 116]);
  assert_eq!(ChunkTag::PLTE.bytes(), [80, 76, 84, 69]);
  assert_eq!(ChunkTag::bKGD.bytes(), [98, 75, 71, 68]);
  assert_eq!(ChunkTag::IEND.bytes(), [73, 69, 78, 68]);
  assert_eq!(ChunkTag::gAMA.bytes(), [103, 65, 77, 65]);
  assert_eq!(ChunkTag::IDAT.bytes(), [73, 68, 65, 84]);
  assert_eq!(ChunkTag::sBIT.bytes(), [115, 66, 73, 84]);
  for tag in ChunkTag::KNOWN {
    assert!(tag.is_well_formed(), "{tag:?}");
    assert!(tag.is_known());
  }
  assert!(!ChunkTag(*b"abCd").is_known());
}

#[test]
fn test_tag_well_formedness() {
  assert!(ChunkTag(*b"iHDR").is_well_formed());
  // only latin letters
  assert!(!ChunkTag([b'i', b'H', 10, b'R']).is_well_formed());
  assert!(!ChunkTag(*b"i-DR").is_well_formed());
  assert!(!ChunkTag(*b"iH1R").is_well_formed());
  // letters, but the reserved bit is set
  assert!(!ChunkTag(*b"iHdR").is_well_formed());
}

#[test]
fn test_tag_properties() {
  assert!(ChunkTag(*b"iHDR").is_ancillary());
  assert!(ChunkTag(*b"IHDR").is_critical());
  assert!(ChunkTag(*b"IhDR").is_private());
  assert!(ChunkTag(*b"IHDR").is_public());
  assert!(ChunkTag(*b"IHdR").is_reserved_bit_set());
  assert!(!ChunkTag(*b"IHDR").is_reserved_bit_set());
  assert!(ChunkTag(*b"IHDr").is_safe_to_copy());
  assert!(!ChunkTag(*b"IHDR").is_safe_to_copy());
}

#[test]
fn test_tag_formatting() {
  assert_eq!(alloc::format!("{}", ChunkTag::gAMA), "gAMA");
  assert_eq!(alloc::format!("{:?}", ChunkTag::IEND), "\"IEND\"");
}
