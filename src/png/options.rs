use super::*;

/// Knobs for how strictly a datastream is checked while decoding.
///
/// Built with chained setters:
/// ```
/// # use png_datastream::png::DecodeOptions;
/// let opts = DecodeOptions::default().set_confirm_crc(true);
/// assert!(opts.confirm_crc());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodeOptions {
  confirm_crc: bool,
  confirm_signature: bool,
  confirm_adler: bool,
}
impl Default for DecodeOptions {
  /// CRCs are not checked, the signature and zlib checksum are.
  #[inline]
  fn default() -> Self {
    Self { confirm_crc: false, confirm_signature: true, confirm_adler: true }
  }
}
impl DecodeOptions {
  /// Checks everything that can be checked.
  #[inline]
  #[must_use]
  pub const fn strict() -> Self {
    Self { confirm_crc: true, confirm_signature: true, confirm_adler: true }
  }

  /// Checks nothing that isn't needed to make sense of the bytes.
  #[inline]
  #[must_use]
  pub const fn lenient() -> Self {
    Self { confirm_crc: false, confirm_signature: false, confirm_adler: false }
  }

  /// If each chunk's CRC is recomputed and compared on parse.
  #[inline]
  #[must_use]
  pub const fn confirm_crc(&self) -> bool {
    self.confirm_crc
  }

  #[inline]
  #[must_use]
  pub const fn set_confirm_crc(mut self, yes: bool) -> Self {
    self.confirm_crc = yes;
    self
  }

  /// If a datastream parsed "with signature" must actually start with
  /// [`PNG_SIGNATURE`]. When off, the first 8 bytes are skipped unread.
  #[inline]
  #[must_use]
  pub const fn confirm_signature(&self) -> bool {
    self.confirm_signature
  }

  #[inline]
  #[must_use]
  pub const fn set_confirm_signature(mut self, yes: bool) -> Self {
    self.confirm_signature = yes;
    self
  }

  /// If the zlib stream's adler32 checksum is verified during inflate.
  #[inline]
  #[must_use]
  pub const fn confirm_adler(&self) -> bool {
    self.confirm_adler
  }

  #[inline]
  #[must_use]
  pub const fn set_confirm_adler(mut self, yes: bool) -> Self {
    self.confirm_adler = yes;
    self
  }
}
