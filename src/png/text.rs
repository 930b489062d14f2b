use super::*;

/// Textual data
///
/// A keyword and a text string, Latin-1 encoded, separated by a single null
/// byte. The keyword is everything before the first null and must not be
/// empty. The text is everything after it, and may be empty.
///
/// Spec: [tEXt](https://www.w3.org/TR/png/#11tEXt)
#[derive(Clone, PartialEq, Eq, Hash)]
#[allow(nonstandard_style)]
pub struct tEXt {
  keyword: Vec<u8>,
  text: Vec<u8>,
}
impl ChunkData for tEXt {
  const TAG: ChunkTag = ChunkTag::tEXt;

  fn parse(data: &[u8]) -> Result<Self, PngError> {
    let malformed = PngError::MalformedPayload(Self::TAG);
    let mut it = data.splitn(2, |u| u == &0_u8);
    let keyword = it.next().ok_or(malformed)?;
    let text = it.next().ok_or(malformed)?;
    if keyword.is_empty() {
      return Err(malformed);
    }
    Ok(Self { keyword: try_copy_bytes(keyword)?, text: try_copy_bytes(text)? })
  }

  #[inline]
  fn required_size(&self) -> usize {
    self.keyword.len() + 1 + self.text.len()
  }

  fn write_fields(&self, w: &mut ByteWriter<'_>) -> Result<(), PngError> {
    w.write_bytes(&self.keyword)?;
    w.write_u8(0)?;
    w.write_bytes(&self.text)
  }
}
impl tEXt {
  /// Builds a text chunk.
  ///
  /// ## Failure
  /// * The keyword is empty or contains a null byte.
  pub fn new(keyword: &[u8], text: &[u8]) -> Result<Self, PngError> {
    if keyword.is_empty() || keyword.contains(&0) {
      return Err(PngError::InvalidKeyword);
    }
    Ok(Self { keyword: try_copy_bytes(keyword)?, text: try_copy_bytes(text)? })
  }

  #[inline]
  #[must_use]
  pub fn keyword(&self) -> &[u8] {
    &self.keyword
  }

  #[inline]
  #[must_use]
  pub fn text(&self) -> &[u8] {
    &self.text
  }
}
impl Debug for tEXt {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    struct Latin1<'a>(&'a [u8]);
    impl Debug for Latin1<'_> {
      fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_char('\"')?;
        for ch in self.0.iter().copied().map(|u| u as char) {
          f.write_char(ch)?;
        }
        f.write_char('\"')
      }
    }
    f.debug_struct("tEXt")
      .field("keyword", &Latin1(&self.keyword))
      .field("text", &Latin1(&self.text))
      .finish()
  }
}

#[test]
fn test_text_split_edge_cases() {
  let malformed = Err(PngError::MalformedPayload(ChunkTag::tEXt));
  assert_eq!(tEXt::parse(b""), malformed);
  assert_eq!(tEXt::parse(b"NoNullHere"), malformed);
  assert_eq!(tEXt::parse(b"\0text"), malformed);
  let t = tEXt::parse(b"K\0").unwrap();
  assert_eq!(t.keyword(), b"K");
  assert_eq!(t.text(), b"");
  // only the first null splits
  let t = tEXt::parse(b"Title\0a\0b").unwrap();
  assert_eq!(t.keyword(), b"Title");
  assert_eq!(t.text(), b"a\0b");
}

#[test]
fn test_text_new_checks_keyword() {
  assert_eq!(tEXt::new(b"", b"x"), Err(PngError::InvalidKeyword));
  assert_eq!(tEXt::new(b"a\0b", b"x"), Err(PngError::InvalidKeyword));
  let t = tEXt::new(b"Author", b"me").unwrap();
  let mut out = [0_u8; 9];
  assert_eq!(t.required_size(), 9);
  assert_eq!(t.write_into(&mut out), Ok(9));
  assert_eq!(&out, b"Author\0me");
}
