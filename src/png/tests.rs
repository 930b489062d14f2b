use super::*;

use alloc::vec;

/// 1x1 greyscale, 8-bit, pixel value 0x80.
#[rustfmt::skip]
const ONE_GREY_PIXEL: [u8; 67] = [
  0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A,
  0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x01,
  0x00, 0x00, 0x00, 0x01, 0x08, 0x00, 0x00, 0x00, 0x00, 0x3A, 0x7E, 0x9B,
  0x55,
  0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x68,
  0x00, 0x00, 0x00, 0x82, 0x00, 0x81, 0x77, 0xCD, 0x72, 0xB6,
  0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// 5x2 greyscale, 2-bit, with a `tEXt`, a private chunk `zzZz`, and the zlib
/// stream split over two `IDAT`. Row 0 uses Sub, row 1 uses Up.
#[rustfmt::skip]
const TWO_BIT_SPLIT_IDAT: [u8; 123] = [
  0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A,
  0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x05,
  0x00, 0x00, 0x00, 0x02, 0x02, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xB1, 0x51,
  0x20,
  0x00, 0x00, 0x00, 0x0D, 0x74, 0x45, 0x58, 0x74, 0x54, 0x69, 0x74, 0x6C,
  0x65, 0x00, 0x74, 0x77, 0x6F, 0x20, 0x62, 0x69, 0x74, 0xCA, 0xEF, 0xD1,
  0x7A,
  0x00, 0x00, 0x00, 0x03, 0x7A, 0x7A, 0x5A, 0x7A, 0x00, 0xFF, 0x10, 0x87,
  0x7F, 0x04, 0x38,
  0x00, 0x00, 0x00, 0x05, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x94,
  0x5E, 0xA1, 0xD7, 0xEA, 0x4F,
  0x00, 0x00, 0x00, 0x09, 0x49, 0x44, 0x41, 0x54, 0xCA, 0x74, 0xB2, 0x01,
  0x00, 0x05, 0x3F, 0x02, 0x0D, 0x8C, 0x1B, 0x66, 0x63,
  0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[test]
fn test_png_signature() {
  assert!(is_png_signature(&ONE_GREY_PIXEL));
  assert!(!is_png_signature(&ONE_GREY_PIXEL[..7]));
  assert!(!is_png_signature(&ONE_GREY_PIXEL[1..]));
}

#[test]
fn test_one_pixel_end_to_end() {
  let chunks = parse_datastream(&ONE_GREY_PIXEL, true).unwrap();
  let tags: Vec<ChunkTag> = chunks.iter().map(Chunk::tag).collect();
  assert_eq!(tags, [ChunkTag::IHDR, ChunkTag::IDAT, ChunkTag::IEND]);
  for c in &chunks {
    assert_eq!(c.crc_is_valid(), Ok(true), "{c:?}");
  }

  // writes back byte for byte
  assert_eq!(datastream_required_size(&chunks, true), ONE_GREY_PIXEL.len());
  let mut out = [0_u8; 67];
  assert_eq!(write_datastream_into(&chunks, true, &mut out), Ok(67));
  assert_eq!(out, ONE_GREY_PIXEL);

  let image = RawImage::assemble(&chunks).unwrap();
  assert_eq!(image.color_type(), PngColorType::Y);
  assert_eq!(image.bit_depth(), 8);
  assert_eq!(image.width(), 1);
  assert_eq!(image.height(), 1);
  // 1 * 1 * 1 channel * 8 bits / 8
  assert_eq!(image.data_size(), 1);
  assert_eq!(image.data(), &[0x80]);
}

#[test]
fn test_strict_options_accept_good_png() {
  let chunks = parse_datastream_with(&ONE_GREY_PIXEL, true, &DecodeOptions::strict()).unwrap();
  assert!(RawImage::assemble_with(&chunks, &DecodeOptions::strict()).is_ok());
  let mut corrupt = ONE_GREY_PIXEL;
  // flip a bit in the IHDR CRC
  corrupt[32] ^= 1;
  let err = parse_datastream_with(&corrupt, true, &DecodeOptions::strict()).unwrap_err();
  assert!(matches!(err.error(), PngError::CrcMismatch { tag: ChunkTag::IHDR, .. }));
  assert_eq!(err.offset(), 8);
  assert!(err.chunks().is_empty());
  // the default options don't look
  assert!(parse_datastream(&corrupt, true).is_ok());
}

#[test]
fn test_split_idat_and_ancillary_chunks() {
  let chunks = parse_datastream(&TWO_BIT_SPLIT_IDAT, true).unwrap();
  assert_eq!(chunks.len(), 6);
  match chunks[1].payload() {
    Some(ChunkPayload::tEXt(text)) => {
      assert_eq!(text.keyword(), b"Title");
      assert_eq!(text.text(), b"two bit");
    }
    other => panic!("{other:?}"),
  }
  let private = chunks[2].tag();
  assert!(!private.is_known());
  assert!(private.is_ancillary() && private.is_private() && private.is_safe_to_copy());
  match chunks[2].payload() {
    Some(ChunkPayload::Unknown(u)) => assert_eq!(u.data(), &[0x00, 0xFF, 0x10]),
    other => panic!("{other:?}"),
  }
  assert_eq!(write_datastream_to_vec(&chunks, true).unwrap(), TWO_BIT_SPLIT_IDAT);

  let image = RawImage::assemble(&chunks).unwrap();
  // two rows of ceil(5 * 2 / 8) bytes
  assert_eq!(image.data(), &[0x1B, 0xC0, 0xE4, 0x40]);
  assert_eq!(
    image.to_u8_samples().unwrap(),
    [0x00, 0x55, 0xAA, 0xFF, 0xFF, 0xFF, 0xAA, 0x55, 0x00, 0x55]
  );
}

#[test]
fn test_assemble_failures() {
  let chunks = parse_datastream(&ONE_GREY_PIXEL, true).unwrap();
  assert_eq!(RawImage::assemble(&chunks[1..]).unwrap_err(), PngError::NoHeader);

  let mut interlaced = IHDR::parse(chunks[0].raw().unwrap()).unwrap();
  interlaced.interlace_method = 1;
  let mut v = chunks.clone();
  v[0] = Chunk::from_payload(interlaced).unwrap();
  assert_eq!(RawImage::assemble(&v).unwrap_err(), PngError::UnsupportedInterlaceMethod(1));

  let mut bad_filter = interlaced;
  bad_filter.interlace_method = 0;
  bad_filter.filter_method = 1;
  v[0] = Chunk::from_payload(bad_filter).unwrap();
  assert_eq!(RawImage::assemble(&v).unwrap_err(), PngError::UnsupportedFilterMethod(1));

  let mut bad_compression = bad_filter;
  bad_compression.filter_method = 0;
  bad_compression.compression_method = 1;
  v[0] = Chunk::from_payload(bad_compression).unwrap();
  assert_eq!(RawImage::assemble(&v).unwrap_err(), PngError::UnsupportedCompressionMethod(1));

  let mut zero_width = bad_compression;
  zero_width.compression_method = 0;
  zero_width.width = 0;
  v[0] = Chunk::from_payload(zero_width).unwrap();
  assert_eq!(RawImage::assemble(&v).unwrap_err(), PngError::InvalidHeader);

  // no image data at all
  let no_idat = [chunks[0].clone(), chunks[2].clone()];
  assert_eq!(RawImage::assemble(&no_idat).unwrap_err(), PngError::Decompression);

  // the header says 2x1, the stream only holds one line of 1 pixel
  let mut wide = IHDR::parse(chunks[0].raw().unwrap()).unwrap();
  wide.width = 2;
  v[0] = Chunk::from_payload(wide).unwrap();
  assert_eq!(
    RawImage::assemble(&v).unwrap_err(),
    PngError::DecompressedSizeMismatch { expected: 3, actual: 2 }
  );
}

#[test]
fn test_unknown_payload_round_trips_any_bytes() {
  let tag = ChunkTag([0, 255, b'1', b' ']);
  let data = [9, 8, 7, 0, 0, 1];
  let p = ChunkPayload::parse(tag, &data).unwrap();
  assert_eq!(p.tag(), tag);
  assert_eq!(p.required_size(), data.len());
  let mut out = [0_u8; 6];
  assert_eq!(p.write_into(&mut out), Ok(6));
  assert_eq!(out, data);
  assert_eq!(ChunkPayload::parse(tag, &[]).unwrap().required_size(), 0);
}

#[test]
fn test_huge_header_with_tiny_data_fails_without_allocating() {
  let chunks = parse_datastream(&ONE_GREY_PIXEL, true).unwrap();
  let mut huge = IHDR::new(20_000, 20_000, PngColorType::RGBA, 16);
  huge.validate().unwrap();
  let mut v = chunks.clone();
  v[0] = Chunk::from_payload(huge).unwrap();
  assert_eq!(RawImage::assemble(&v).unwrap_err(), PngError::Decompression);
}

#[test]
fn test_unknown_rejects_typed_tags() {
  for tag in ChunkTag::KNOWN {
    assert_eq!(Unknown::new(tag, &[1]), Err(PngError::TypedTag(tag)), "{tag}");
  }
  let private = ChunkTag(*b"zzZz");
  let chunk = Chunk::from_payload(Unknown::new(private, &[1]).unwrap()).unwrap();
  let bytes = write_datastream_to_vec(core::slice::from_ref(&chunk), false).unwrap();
  let back = Chunk::parse(&bytes).unwrap();
  assert_eq!(back.payload(), chunk.payload());
  assert_eq!(back.crc(), chunk.crc());
}

#[test]
fn test_every_known_payload_writes_what_it_parsed() {
  let samples: [(ChunkTag, &[u8]); 10] = [
    (ChunkTag::IHDR, &[0, 0, 0, 3, 0, 0, 0, 2, 8, 2, 0, 0, 0]),
    (ChunkTag::PLTE, &[1, 2, 3, 4, 5, 6, 7, 8, 9]),
    (ChunkTag::IDAT, &[0x78, 0x9C, 3, 0]),
    (ChunkTag::IEND, &[]),
    (ChunkTag::tEXt, b"Comment\0hello"),
    (ChunkTag::bKGD, &[4]),
    (ChunkTag::gAMA, &[0, 0, 0xB1, 0x8F]),
    (ChunkTag::pHYs, &[0, 0, 0x0B, 0x13, 0, 0, 0x0B, 0x13, 1]),
    (ChunkTag::sRGB, &[1]),
    (ChunkTag::sBIT, &[5, 6, 5, 8]),
  ];
  for (tag, data) in samples {
    let p = ChunkPayload::parse(tag, data).unwrap();
    assert!(!matches!(p, ChunkPayload::Unknown(_)), "{tag}");
    assert_eq!(p.tag(), tag);
    assert_eq!(p.required_size(), data.len(), "{tag}");
    let mut out = vec![0_u8; p.required_size()];
    assert_eq!(p.write_into(&mut out), Ok(data.len()), "{tag}");
    assert_eq!(out, data, "{tag}");
    assert_eq!(ChunkPayload::parse(tag, &out), Ok(p));
  }
}

#[test]
fn test_payload_conversions() {
  let p = ChunkPayload::from(gAMA { gamma: 100_000 });
  assert_eq!(p.tag(), ChunkTag::gAMA);
  assert_eq!(gAMA::try_from(p.clone()), Ok(gAMA { gamma: 100_000 }));
  assert_eq!(sRGB::try_from(p.clone()), Err(p));
}

#[test]
fn test_raw_image_to_chunks_round_trip() {
  let data: Vec<u8> = (0..4 * 3 * 3).map(|i| (i * 29 % 256) as u8).collect();
  let image = RawImage::new(PngColorType::RGB, 8, 4, 3, data).unwrap();
  let all =
    [FilterType::None, FilterType::Sub, FilterType::Up, FilterType::Average, FilterType::Paeth];
  for ft in all {
    let chunks = image.to_chunks(ft).unwrap();
    let bytes = write_datastream_to_vec(&chunks, true).unwrap();
    let parsed = parse_datastream_with(&bytes, true, &DecodeOptions::strict()).unwrap();
    assert_eq!(parsed.len(), 3);
    assert_eq!(RawImage::assemble(&parsed).unwrap(), image);
  }
  assert!(RawImage::new(PngColorType::RGB, 8, 4, 3, vec![0; 35]).is_err());
  assert!(RawImage::new(PngColorType::RGB, 2, 4, 3, vec![0; 36]).is_err());
}

#[test]
fn test_u8_samples_sixteen_bit_and_indexed() {
  let image = RawImage::new(PngColorType::YA, 16, 1, 1, vec![0x12, 0x34, 0xAB, 0xCD]).unwrap();
  assert_eq!(image.to_u8_samples().unwrap(), [0x12, 0xAB]);
  // 3 pixels of 4-bit indexes, padded to 2 bytes
  let image = RawImage::new(PngColorType::Index, 4, 3, 1, vec![0x1F, 0x70]).unwrap();
  assert_eq!(image.to_u8_samples().unwrap(), [1, 15, 7]);
  let image = RawImage::new(PngColorType::Y, 1, 3, 1, vec![0b1010_0000]).unwrap();
  assert_eq!(image.to_u8_samples().unwrap(), [255, 0, 255]);
}
