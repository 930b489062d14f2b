use std::path::Path;

use png_datastream::png::*;
use walkdir::WalkDir;

/// Every fixture PNG, with the unfiltered pixel bytes stored next to it.
fn fixtures() -> Vec<(String, Vec<u8>, Vec<u8>)> {
  let mut out = Vec::new();
  for entry in WalkDir::new("tests/images/").into_iter().filter_map(|e| e.ok()) {
    let path = entry.path();
    if path.extension().and_then(|e| e.to_str()) != Some("png") {
      continue;
    }
    let png = std::fs::read(path).unwrap();
    let raw = std::fs::read(path.with_extension("raw")).unwrap();
    out.push((path.display().to_string(), png, raw));
  }
  assert!(!out.is_empty(), "no fixtures found");
  out
}

/// Pulls `WxH` out of a fixture name like `rgb8_6x5.png`.
fn dims_from_name(name: &str) -> (u32, u32) {
  let stem = Path::new(name).file_stem().unwrap().to_str().unwrap();
  let (w, h) = stem.rsplit('_').next().unwrap().split_once('x').unwrap();
  (w.parse().unwrap(), h.parse().unwrap())
}

#[test]
fn test_parse_datastream_no_panics() {
  // iter ALL files in the test folder, even non-png files shouldn't panic it.
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    let v = match std::fs::read(entry.path()) {
      Ok(v) => v,
      Err(e) => {
        println!("Error reading file: {e:?}");
        continue;
      }
    };
    let _ = parse_datastream(&v, true);
    let _ = parse_datastream(&v, false);
  }
  // even totally random data should never panic the parser!
  for _ in 0..10 {
    let v = super::rand_bytes(1024);
    let _ = parse_datastream_with(&v, true, &DecodeOptions::lenient());
    if let Err(partial) = parse_datastream(&v, false) {
      let _ = RawImage::assemble(&partial.into_chunks());
    }
  }
}

#[test]
fn test_single_chunk_random_windows_no_panics() {
  for _ in 0..200 {
    let mut v = super::rand_bytes(64);
    // keep the declared length plausible half the time
    if v[0] & 1 == 0 {
      v[..4].copy_from_slice(&52_u32.to_be_bytes());
    }
    if let Ok(chunk) = Chunk::parse(&v) {
      let mut out = vec![0; chunk.required_size()];
      assert_eq!(chunk.write_into(&mut out), Ok(v.len()));
      assert_eq!(out, v);
    }
  }
}

#[test]
fn test_fixtures_write_back_exactly() {
  for (name, png, _) in fixtures() {
    let chunks = parse_datastream_with(&png, true, &DecodeOptions::strict())
      .unwrap_or_else(|e| panic!("{name}: {e}"));
    assert_eq!(chunks.first().map(Chunk::tag), Some(ChunkTag::IHDR), "{name}");
    assert_eq!(chunks.last().map(Chunk::tag), Some(ChunkTag::IEND), "{name}");
    assert_eq!(datastream_required_size(&chunks, true), png.len(), "{name}");
    assert_eq!(write_datastream_to_vec(&chunks, true).unwrap(), png, "{name}");
    // and without the signature
    let bare = write_datastream_to_vec(&chunks, false).unwrap();
    assert_eq!(bare, png[PNG_SIGNATURE.len()..], "{name}");
    assert_eq!(parse_datastream(&bare, false).unwrap(), chunks, "{name}");
  }
}

#[test]
fn test_fixtures_assemble_to_expected_pixels() {
  for (name, png, raw) in fixtures() {
    let chunks = parse_datastream(&png, true).unwrap();
    let image = RawImage::assemble_with(&chunks, &DecodeOptions::strict())
      .unwrap_or_else(|e| panic!("{name}: {e}"));
    let (w, h) = dims_from_name(&name);
    assert_eq!((image.width(), image.height()), (w, h), "{name}");
    let bits_per_line = w as usize * image.pixel_format().bits_per_pixel();
    assert_eq!(image.data_size(), (bits_per_line + 7) / 8 * h as usize, "{name}");
    assert_eq!(image.data(), raw.as_slice(), "{name}");
  }
}

#[test]
fn test_fixtures_reencode() {
  for (name, png, _) in fixtures() {
    let chunks = parse_datastream(&png, true).unwrap();
    let image = RawImage::assemble(&chunks).unwrap();
    let mut rebuilt = image.to_chunks(FilterType::Paeth).unwrap();
    // indexed images need their palette back
    if let Some(plte) = chunks.iter().find(|c| c.tag() == ChunkTag::PLTE) {
      rebuilt.insert(1, plte.clone());
    }
    let bytes = write_datastream_to_vec(&rebuilt, true).unwrap();
    let again = parse_datastream_with(&bytes, true, &DecodeOptions::strict()).unwrap();
    assert_eq!(RawImage::assemble(&again).unwrap(), image, "{name}");
  }
}

#[test]
fn test_fixture_ancillary_payloads() {
  let png = std::fs::read("tests/images/rgb8_6x5.png").unwrap();
  let chunks = parse_datastream(&png, true).unwrap();
  let srgb: sRGB = chunks[1].payload().cloned().unwrap().try_into().unwrap();
  assert_eq!(srgb.intent(), Some(png_datastream::SrgbIntent::Perceptual));
  let phys: pHYs = chunks[2].payload().cloned().unwrap().try_into().unwrap();
  assert_eq!((phys.pixels_per_x, phys.pixels_per_y), (2835, 2835));
  assert!(phys.unit_is_meter());

  let png = std::fs::read("tests/images/index4_11x4.png").unwrap();
  let chunks = parse_datastream(&png, true).unwrap();
  let plte: PLTE = chunks[1].payload().cloned().unwrap().try_into().unwrap();
  assert_eq!(plte.entries().len(), 16);
  let bkgd: bKGD = chunks[2].payload().cloned().unwrap().try_into().unwrap();
  assert_eq!(bkgd.index, 2);

  let png = std::fs::read("tests/images/ya8_8x8.png").unwrap();
  let chunks = parse_datastream(&png, true).unwrap();
  assert_eq!(chunks[1].tag(), ChunkTag(*b"prVt"));
  assert!(chunks[1].tag().is_well_formed());
  assert!(matches!(chunks[1].payload(), Some(ChunkPayload::Unknown(_))));
}

#[test]
fn test_truncated_fixture_keeps_prefix() {
  let png = std::fs::read("tests/images/grey8_16x10.png").unwrap();
  let full = parse_datastream(&png, true).unwrap();
  // cut into the last chunk
  let err = parse_datastream(&png[..png.len() - 3], true).unwrap_err();
  assert_eq!(err.error(), PngError::UnexpectedEndOfInput);
  assert_eq!(err.chunks(), &full[..full.len() - 1]);
  assert_eq!(err.offset(), png.len() - 12);
}
