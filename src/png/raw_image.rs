use super::*;

use bitfrob::u8_replicate_bits;

/// Decoded, unfiltered pixel bytes of a PNG, in the PNG's own pixel format.
///
/// The data is `height` rows, each [`bytes_per_scanline`] bytes long.
/// Multi-byte samples are big-endian, and sub-byte samples are packed with the
/// leftmost pixel in the high bits, with every row padded to a whole byte.
///
/// [`bytes_per_scanline`]: PngPixelFormat::bytes_per_scanline
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RawImage {
  format: PngPixelFormat,
  width: u32,
  height: u32,
  data: Vec<u8>,
}
impl Debug for RawImage {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RawImage")
      .field("format", &self.format)
      .field("width", &self.width)
      .field("height", &self.height)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .finish()
  }
}

impl RawImage {
  /// Wraps already-unfiltered pixel bytes.
  ///
  /// ## Failure
  /// * The dimensions or format aren't legal for a PNG.
  /// * `data` isn't exactly the size the format and dimensions need.
  pub fn new(
    color_type: PngColorType, bit_depth: u8, width: u32, height: u32, data: Vec<u8>,
  ) -> Result<Self, PngError> {
    let ihdr = IHDR::new(width, height, color_type, bit_depth);
    ihdr.validate()?;
    let expected = ihdr.plain_image_size()?;
    if data.len() != expected {
      return Err(PngError::DecompressedSizeMismatch { expected, actual: data.len() });
    }
    Ok(Self { format: ihdr.pixel_format()?, width, height, data })
  }

  /// Decodes the image held by a chunk sequence, with default options.
  #[inline]
  pub fn assemble(chunks: &[Chunk]) -> Result<Self, PngError> {
    Self::assemble_with(chunks, &DecodeOptions::default())
  }

  /// Decodes the image held by a chunk sequence.
  ///
  /// Every `IDAT` is concatenated in order as one zlib stream, which is
  /// inflated to the size the first `IHDR` calls for and then unfiltered.
  /// Other chunks are ignored.
  ///
  /// ## Failure
  /// * No `IHDR`.
  /// * The header is interlaced, or names a compression or filter method
  ///   other than 0. These are the `Unsupported*Method` errors.
  /// * Any other header field is illegal.
  /// * The image data doesn't decompress, or decompresses to the wrong size.
  /// * A scanline has an illegal filter type.
  pub fn assemble_with(chunks: &[Chunk], opts: &DecodeOptions) -> Result<Self, PngError> {
    let ihdr = find_header(chunks)?;
    if ihdr.interlace_method != 0 {
      return Err(PngError::UnsupportedInterlaceMethod(ihdr.interlace_method));
    }
    ihdr.validate()?;

    let idat = concat_image_data(chunks)?;
    let expected = ihdr.filtered_image_size()?;
    debug!(
      "assembling {}x{} image: {} compressed bytes, inflating to {expected}",
      ihdr.width,
      ihdr.height,
      idat.len()
    );
    let filtered = decompress_slices(
      ihdr.compression_method,
      core::iter::once(idat.as_slice()),
      expected,
      opts.confirm_adler(),
    )?;
    drop(idat);

    let layout = ScanlineLayout::for_header(&ihdr)?;
    debug!("scanline layout: {layout:?}");
    let data = unfilter_scanlines_to_vec(ihdr.filter_method, &filtered, layout)?;
    Ok(Self { format: ihdr.pixel_format()?, width: ihdr.width, height: ihdr.height, data })
  }

  #[inline]
  #[must_use]
  pub const fn pixel_format(&self) -> PngPixelFormat {
    self.format
  }

  #[inline]
  #[must_use]
  pub const fn color_type(&self) -> PngColorType {
    self.format.color_type()
  }

  /// Bits per channel.
  #[inline]
  #[must_use]
  pub const fn bit_depth(&self) -> u8 {
    self.format.bit_depth()
  }

  /// Pixels per scanline.
  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.width
  }

  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.height
  }

  #[inline]
  #[must_use]
  pub fn data(&self) -> &[u8] {
    &self.data
  }

  /// Size of [`data`](RawImage::data) in bytes.
  #[inline]
  #[must_use]
  pub fn data_size(&self) -> usize {
    self.data.len()
  }

  #[inline]
  #[must_use]
  pub fn into_data(self) -> Vec<u8> {
    self.data
  }

  /// A header describing this image, not interlaced.
  #[inline]
  #[must_use]
  pub const fn header(&self) -> IHDR {
    IHDR::new(self.width, self.height, self.format.color_type(), self.format.bit_depth())
  }

  /// Encodes the image as an `IHDR`, a single `IDAT`, and an `IEND`.
  ///
  /// Every line uses `filter_type`. Indexed images need a `PLTE` inserted
  /// after the header before they're a complete PNG.
  pub fn to_chunks(&self, filter_type: FilterType) -> Result<Vec<Chunk>, PngError> {
    let ihdr = self.header();
    let layout = ScanlineLayout::for_header(&ihdr)?;
    let filtered = filter_scanlines(filter_type, &self.data, layout)?;
    let compressed = compress(ihdr.compression_method, &filtered)?;
    let mut chunks = Vec::new();
    chunks.try_reserve_exact(3)?;
    chunks.push(Chunk::from_payload(ihdr)?);
    chunks.push(Chunk::from_payload(IDAT::from(compressed))?);
    chunks.push(Chunk::from_payload(IEND)?);
    Ok(chunks)
  }

  /// One byte per sample, row after row with no padding.
  ///
  /// * 8-bit samples are copied.
  /// * 16-bit samples keep their high byte.
  /// * 1, 2, and 4 bit samples are unpacked. Indexed samples keep their value,
  ///   the others are scaled to the full `u8` range by bit replication.
  pub fn to_u8_samples(&self) -> Result<Vec<u8>, PngError> {
    let depth = self.bit_depth();
    let samples_per_line = (self.width as usize)
      .checked_mul(self.color_type().channel_count())
      .ok_or(PngError::CheckedMath)?;
    let total = samples_per_line.checked_mul(self.height as usize).ok_or(PngError::CheckedMath)?;
    let mut out: Vec<u8> = Vec::new();
    out.try_reserve_exact(total)?;
    match depth {
      8 => out.extend_from_slice(&self.data),
      16 => out.extend(self.data.chunks_exact(2).map(|pair| pair[0])),
      _ => {
        let line_len = self.format.bytes_per_scanline(self.width)?;
        let mask = (1_u8 << depth) - 1;
        let indexed = self.color_type() == PngColorType::Index;
        for line in self.data.chunks_exact(line_len) {
          for k in 0..samples_per_line {
            let bit = k * usize::from(depth);
            let shift = 8 - usize::from(depth) - (bit % 8);
            let value = (line[bit / 8] >> shift) & mask;
            out.push(if indexed { value } else { u8_replicate_bits(u32::from(depth), value) });
          }
        }
      }
    }
    Ok(out)
  }
}

/// The first `IHDR`, from its parsed payload or else its raw bytes.
fn find_header(chunks: &[Chunk]) -> Result<IHDR, PngError> {
  let chunk = chunks.iter().find(|c| c.tag() == ChunkTag::IHDR).ok_or(PngError::NoHeader)?;
  match (chunk.payload(), chunk.raw()) {
    (Some(ChunkPayload::IHDR(ihdr)), _) => Ok(*ihdr),
    (_, Some(raw)) => IHDR::parse(raw),
    _ => Err(PngError::NoHeader),
  }
}

/// All `IDAT` data, in sequence order, as one buffer.
fn concat_image_data(chunks: &[Chunk]) -> Result<Vec<u8>, PngError> {
  let parts = || {
    chunks.iter().filter(|c| c.tag() == ChunkTag::IDAT).map(|c| match c.payload() {
      Some(ChunkPayload::IDAT(idat)) => idat.as_bytes(),
      _ => c.raw().unwrap_or(&[]),
    })
  };
  let total = parts().try_fold(0_usize, |sum, p| sum.checked_add(p.len()));
  let mut out: Vec<u8> = Vec::new();
  out.try_reserve_exact(total.ok_or(PngError::CheckedMath)?)?;
  parts().for_each(|p| out.extend_from_slice(p));
  Ok(out)
}
