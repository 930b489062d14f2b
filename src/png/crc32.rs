//! The CRC-32 that PNG stores after each chunk.
//!
//! It covers the tag bytes and the data bytes, but not the length field.

const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
  let mut out = [0; 256];
  let mut n = 0;
  while n < 256 {
    let mut c = n as u32;
    let mut k = 0;
    while k < 8 {
      if (c & 1) != 0 {
        c = 0xEDB8_8320_u32 ^ (c >> 1);
      } else {
        c >>= 1;
      }
      k += 1;
    }
    out[n] = c;
    n += 1;
  }
  out
}

#[inline]
fn update_crc(mut crc: u32, bytes: &[u8]) -> u32 {
  for &byte in bytes {
    let i = (crc ^ u32::from(byte)) as u8 as usize;
    crc = CRC_TABLE[i] ^ (crc >> 8);
  }
  crc
}

/// CRC of a chunk's tag followed by its data.
#[inline]
#[must_use]
pub fn chunk_crc(tag: [u8; 4], data: &[u8]) -> u32 {
  update_crc(update_crc(u32::MAX, &tag), data) ^ u32::MAX
}

#[test]
fn test_chunk_crc_known_values() {
  // an empty IEND always carries this CRC
  assert_eq!(chunk_crc(*b"IEND", &[]), 0xAE42_6082);
  // sRGB with perceptual intent
  assert_eq!(chunk_crc(*b"sRGB", &[0]), 0xAECE_1CE9);
}
