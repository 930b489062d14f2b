use super::*;

/// The per-scanline filter types of filter method 0.
///
/// Each filtered scanline starts with one of these as a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum FilterType {
  /// The bytes are unchanged.
  None = 0,
  /// Each byte is stored relative to the byte one pixel to the left.
  Sub = 1,
  /// Each byte is stored relative to the byte above.
  Up = 2,
  /// Each byte is stored relative to the average of left and above.
  Average = 3,
  /// Each byte is stored relative to the [Paeth](paeth_predict) prediction.
  Paeth = 4,
}
impl TryFrom<u8> for FilterType {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::None,
      1 => Self::Sub,
      2 => Self::Up,
      3 => Self::Average,
      4 => Self::Paeth,
      other => return Err(PngError::IllegalFilterType(other)),
    })
  }
}

/// How the bytes of a single image are split into scanlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanlineLayout {
  /// Unfiltered bytes per scanline, not counting the filter type byte.
  pub bytes_per_line: usize,
  /// Distance back to the "left" byte. At least 1.
  pub bytes_per_pixel: usize,
}
impl ScanlineLayout {
  /// A layout of `width` pixels per line, each `pixel_size` whole bytes.
  #[inline]
  pub fn from_pixels(width: usize, pixel_size: usize) -> Result<Self, PngError> {
    let bytes_per_line = width.checked_mul(pixel_size).ok_or(PngError::CheckedMath)?;
    Ok(Self { bytes_per_line, bytes_per_pixel: pixel_size.max(1) })
  }

  /// The layout of a (non-interlaced) image with this header.
  ///
  /// Sub-byte formats pack pixels, but filtering still steps one byte back.
  #[inline]
  pub fn for_header(ihdr: &IHDR) -> Result<Self, PngError> {
    let format = ihdr.pixel_format()?;
    Ok(Self {
      bytes_per_line: format.bytes_per_scanline(ihdr.width)?,
      bytes_per_pixel: format.bytes_per_pixel(),
    })
  }

  /// Bytes per filtered scanline: the line plus its filter type byte.
  #[inline]
  #[must_use]
  pub const fn filtered_line_len(&self) -> usize {
    self.bytes_per_line + 1
  }
}

/// The Paeth predictor.
///
/// Picks whichever of `a` (left), `b` (up), or `c` (upper left) is closest to
/// `a + b - c`. Ties go to `a`, then `b`.
#[inline]
#[must_use]
pub const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // the order of these tests is fixed by the format, don't reorder them.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Neighbors of byte `j`: left, up, upper left. Missing neighbors are 0.
#[inline]
fn neighbors(line: &[u8], prev: Option<&[u8]>, j: usize, bpp: usize) -> (u8, u8, u8) {
  let a = if j >= bpp { line[j - bpp] } else { 0 };
  let (b, c) = match prev {
    Some(prev) => (prev[j], if j >= bpp { prev[j - bpp] } else { 0 }),
    None => (0, 0),
  };
  (a, b, c)
}

#[inline]
fn predict(filter: FilterType, a: u8, b: u8, c: u8) -> u8 {
  match filter {
    FilterType::None => 0,
    FilterType::Sub => a,
    FilterType::Up => b,
    FilterType::Average => ((u16::from(a) + u16::from(b)) / 2) as u8,
    FilterType::Paeth => paeth_predict(a, b, c),
  }
}

/// Reconstructs one line in place. `prev` is the already reconstructed line
/// above, if any.
fn unfilter_line(filter: FilterType, bpp: usize, prev: Option<&[u8]>, line: &mut [u8]) {
  match filter {
    FilterType::None => (),
    FilterType::Up => {
      if let Some(prev) = prev {
        line.iter_mut().zip(prev.iter().copied()).for_each(|(x, b)| *x = x.wrapping_add(b));
      }
    }
    _ => {
      // left to right, each byte depends on the reconstructed byte to its left
      for j in 0..line.len() {
        let (a, b, c) = neighbors(line, prev, j, bpp);
        line[j] = line[j].wrapping_add(predict(filter, a, b, c));
      }
    }
  }
}

/// Reconstructs raw scanlines from filtered ones.
///
/// `filtered` must be whole filtered lines of the layout (each a filter type
/// byte then `bytes_per_line` bytes), and `out` gets the raw lines packed one
/// after the other. Only the rows actually present are reconstructed, top to
/// bottom, with the line above the first row treated as all zero.
///
/// ## Failure
/// * `filter_method` isn't 0.
/// * `filtered` isn't a whole number of lines.
/// * `out` is too small.
/// * A line has a filter type byte over 4. Rows before it are already written
///   to `out` at that point.
pub fn unfilter_scanlines(
  filter_method: u8, filtered: &[u8], layout: ScanlineLayout, out: &mut [u8],
) -> Result<(), PngError> {
  if filter_method != 0 {
    return Err(PngError::UnsupportedFilterMethod(filter_method));
  }
  let line_len = layout.filtered_line_len();
  if filtered.len() % line_len != 0 {
    return Err(PngError::UnexpectedEndOfInput);
  }
  let rows = filtered.len() / line_len;
  let bpl = layout.bytes_per_line;
  let required = rows * bpl;
  if out.len() < required {
    return Err(PngError::OutputBufferTooSmall { required, provided: out.len() });
  }
  for (y, filtered_line) in filtered.chunks_exact(line_len).enumerate() {
    let filter = FilterType::try_from(filtered_line[0])?;
    // everything before `y * bpl` is finished, so split there for the window
    let (done, rest) = out.split_at_mut(y * bpl);
    let prev = if y > 0 { Some(&done[(y - 1) * bpl..]) } else { None };
    let line = &mut rest[..bpl];
    line.copy_from_slice(&filtered_line[1..]);
    unfilter_line(filter, layout.bytes_per_pixel, prev, line);
  }
  Ok(())
}

/// As [`unfilter_scanlines`], into a new exactly-sized buffer.
///
/// Nothing is returned unless every line reconstructs.
pub fn unfilter_scanlines_to_vec(
  filter_method: u8, filtered: &[u8], layout: ScanlineLayout,
) -> Result<Vec<u8>, PngError> {
  let rows = filtered.len() / layout.filtered_line_len();
  let len = rows.checked_mul(layout.bytes_per_line).ok_or(PngError::CheckedMath)?;
  let mut out = try_zeroed_vec(len)?;
  unfilter_scanlines(filter_method, filtered, layout, &mut out)?;
  Ok(out)
}

/// Filters raw lines with one filter type for every line.
///
/// `raw` must be a whole number of lines. The output has a filter type byte in
/// front of each line, and [`unfilter_scanlines`] gives back `raw` exactly.
pub fn filter_scanlines(
  filter_type: FilterType, raw: &[u8], layout: ScanlineLayout,
) -> Result<Vec<u8>, PngError> {
  let bpl = layout.bytes_per_line;
  let rows = raw.len().checked_div(bpl).unwrap_or(0);
  if rows * bpl != raw.len() {
    return Err(PngError::UnexpectedEndOfInput);
  }
  let total = rows.checked_mul(layout.filtered_line_len()).ok_or(PngError::CheckedMath)?;
  let mut out: Vec<u8> = Vec::new();
  out.try_reserve_exact(total)?;
  let mut prev: Option<&[u8]> = None;
  for line in raw.chunks_exact(bpl.max(1)).take(rows) {
    out.push(filter_type as u8);
    for (j, x) in line.iter().copied().enumerate() {
      let (a, b, c) = neighbors(line, prev, j, layout.bytes_per_pixel);
      out.push(x.wrapping_sub(predict(filter_type, a, b, c)));
    }
    prev = Some(line);
  }
  Ok(out)
}

#[cfg(test)]
fn unfilter_one_line(filtered: &[u8]) -> Vec<u8> {
  let layout = ScanlineLayout::from_pixels(6, 1).unwrap();
  unfilter_scanlines_to_vec(0, filtered, layout).unwrap()
}

#[test]
fn test_unfilter_single_lines() {
  assert_eq!(unfilter_one_line(&[0, 1, 2, 3, 4, 5, 6]), [1, 2, 3, 4, 5, 6]);
  assert_eq!(unfilter_one_line(&[1, 1, 2, 3, 4, 5, 6]), [1, 3, 6, 10, 15, 21]);
  assert_eq!(unfilter_one_line(&[2, 1, 2, 3, 4, 5, 6]), [1, 2, 3, 4, 5, 6]);
  assert_eq!(unfilter_one_line(&[3, 1, 2, 3, 4, 5, 6]), [1, 2, 4, 6, 8, 10]);
  assert_eq!(unfilter_one_line(&[4, 1, 2, 3, 4, 5, 6]), [1, 3, 6, 10, 15, 21]);
}

#[test]
fn test_unfilter_uses_previous_line() {
  let layout = ScanlineLayout::from_pixels(3, 1).unwrap();
  #[rustfmt::skip]
  let filtered = [
    0, 10, 20, 30,
    2, 1, 1, 1,
    3, 5, 0, 0,
    4, 1, 0, 255,
  ];
  let raw = unfilter_scanlines_to_vec(0, &filtered, layout).unwrap();
  assert_eq!(&raw[0..3], &[10, 20, 30]);
  assert_eq!(&raw[3..6], &[11, 21, 31]);
  assert_eq!(&raw[6..9], &[10, 15, 23]);
  assert_eq!(&raw[9..12], &[11, 15, 22]);
}

#[test]
fn test_unfilter_wraps_mod_256() {
  let layout = ScanlineLayout::from_pixels(2, 1).unwrap();
  assert_eq!(unfilter_scanlines_to_vec(0, &[1, 200, 100], layout).unwrap(), [200, 44]);
}

#[test]
fn test_unfilter_failures() {
  let layout = ScanlineLayout::from_pixels(2, 1).unwrap();
  assert_eq!(
    unfilter_scanlines_to_vec(1, &[0, 1, 2], layout),
    Err(PngError::UnsupportedFilterMethod(1))
  );
  assert_eq!(
    unfilter_scanlines_to_vec(0, &[5, 1, 2], layout),
    Err(PngError::IllegalFilterType(5))
  );
  assert_eq!(unfilter_scanlines_to_vec(0, &[0, 1], layout), Err(PngError::UnexpectedEndOfInput));
  let mut out = [0_u8; 1];
  assert_eq!(
    unfilter_scanlines(0, &[0, 1, 2], layout, &mut out),
    Err(PngError::OutputBufferTooSmall { required: 2, provided: 1 })
  );
}

#[test]
fn test_paeth_tie_breaks() {
  assert_eq!(paeth_predict(5, 5, 5), 5);
  // p = 3, pa = 0
  assert_eq!(paeth_predict(3, 3, 3), 3);
  // p = 1 + 9 - 1 = 9, pb = 0
  assert_eq!(paeth_predict(1, 9, 1), 9);
  // p = 7 + 7 - 9 = 5, pa = pb = 2, pc = 4, a wins
  assert_eq!(paeth_predict(7, 7, 9), 7);
  // p = 0 + 10 - 6 = 4, pa = 4, pb = 6, pc = 2
  assert_eq!(paeth_predict(0, 10, 6), 6);
}

#[test]
fn test_filter_inverts_unfilter() {
  let layout = ScanlineLayout::from_pixels(4, 3).unwrap();
  let raw: Vec<u8> = (0..36_u32).map(|i| (i * 37 % 251) as u8).collect();
  let all =
    [FilterType::None, FilterType::Sub, FilterType::Up, FilterType::Average, FilterType::Paeth];
  for ft in all {
    let filtered = filter_scanlines(ft, &raw, layout).unwrap();
    assert_eq!(filtered.len(), 3 * 13);
    assert!(filtered.chunks_exact(13).all(|line| line[0] == ft as u8));
    assert_eq!(unfilter_scanlines_to_vec(0, &filtered, layout).unwrap(), raw);
  }
}
