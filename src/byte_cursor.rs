#![forbid(unsafe_code)]

//! Bounds-checked cursors over network-order (big-endian) bytes.
//!
//! Every multi-byte integer in a PNG datastream is big-endian. The readers
//! here convert to host order with the `from_be_bytes` family, so there's no
//! separate host endianness detection to get wrong.

use alloc::vec::Vec;

use crate::PngError;

/// Reads big-endian values out of a byte slice, tracking a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteReader<'b> {
  bytes: &'b [u8],
  position: usize,
}

macro_rules! reader_ints {
  ($($read:ident, $peek:ident => $t:ty),* $(,)?) => {
    $(
      #[doc = concat!("Reads a big-endian `", stringify!($t), "` and advances past it.")]
      #[inline]
      pub fn $read(&mut self) -> Result<$t, PngError> {
        let a = self.read_array::<{ core::mem::size_of::<$t>() }>()?;
        Ok(<$t>::from_be_bytes(a))
      }
      #[doc = concat!("Reads a big-endian `", stringify!($t), "` without advancing.")]
      #[inline]
      pub fn $peek(&self) -> Result<$t, PngError> {
        let a = self.peek_array::<{ core::mem::size_of::<$t>() }>()?;
        Ok(<$t>::from_be_bytes(a))
      }
    )*
  };
}

impl<'b> ByteReader<'b> {
  /// Starts a reader at the first byte.
  #[inline]
  #[must_use]
  pub const fn new(bytes: &'b [u8]) -> Self {
    Self { bytes, position: 0 }
  }

  /// Current offset from the start of the buffer.
  #[inline]
  #[must_use]
  pub const fn position(&self) -> usize {
    self.position
  }

  /// Bytes left after the current position.
  #[inline]
  #[must_use]
  pub const fn remaining(&self) -> usize {
    self.bytes.len() - self.position
  }

  /// The unread tail of the buffer.
  #[inline]
  #[must_use]
  pub fn rest(&self) -> &'b [u8] {
    &self.bytes[self.position..]
  }

  #[inline]
  fn peek_array<const N: usize>(&self) -> Result<[u8; N], PngError> {
    match self.rest().get(..N) {
      Some(head) => head.try_into().map_err(|_| PngError::UnexpectedEndOfInput),
      None => Err(PngError::UnexpectedEndOfInput),
    }
  }

  /// Reads `N` bytes as an array and advances past them.
  #[inline]
  pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PngError> {
    let a = self.peek_array::<N>()?;
    self.position += N;
    Ok(a)
  }

  /// Borrows the next `len` bytes without interpretation and advances.
  #[inline]
  pub fn read_bytes(&mut self, len: usize) -> Result<&'b [u8], PngError> {
    let bytes: &'b [u8] = self.bytes;
    let end = self.position.checked_add(len).ok_or(PngError::CheckedMath)?;
    let out = bytes.get(self.position..end).ok_or(PngError::UnexpectedEndOfInput)?;
    self.position = end;
    Ok(out)
  }

  /// Skips `len` bytes.
  #[inline]
  pub fn skip(&mut self, len: usize) -> Result<(), PngError> {
    self.read_bytes(len).map(|_| ())
  }

  reader_ints! {
    read_u8, peek_u8 => u8,
    read_i8, peek_i8 => i8,
    read_u16, peek_u16 => u16,
    read_i16, peek_i16 => i16,
    read_u32, peek_u32 => u32,
    read_i32, peek_i32 => i32,
    read_u64, peek_u64 => u64,
    read_i64, peek_i64 => i64,
  }
}

/// Writes big-endian values into a caller-provided buffer.
///
/// The buffer is never grown: writes past the end fail with
/// [`PngError::OutputBufferTooSmall`] and leave the position unchanged.
#[derive(Debug)]
pub struct ByteWriter<'o> {
  out: &'o mut [u8],
  position: usize,
}

macro_rules! writer_ints {
  ($($write:ident => $t:ty),* $(,)?) => {
    $(
      #[doc = concat!("Writes a `", stringify!($t), "` in big-endian order and advances.")]
      #[inline]
      pub fn $write(&mut self, value: $t) -> Result<(), PngError> {
        self.write_bytes(&value.to_be_bytes())
      }
    )*
  };
}

impl<'o> ByteWriter<'o> {
  /// Starts a writer at the first byte of `out`.
  #[inline]
  #[must_use]
  pub fn new(out: &'o mut [u8]) -> Self {
    Self { out, position: 0 }
  }

  /// Bytes written so far.
  #[inline]
  #[must_use]
  pub const fn position(&self) -> usize {
    self.position
  }

  /// Copies `bytes` verbatim and advances.
  #[inline]
  pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), PngError> {
    let end = self.position.checked_add(bytes.len()).ok_or(PngError::CheckedMath)?;
    let provided = self.out.len();
    match self.out.get_mut(self.position..end) {
      Some(dst) => {
        dst.copy_from_slice(bytes);
        self.position = end;
        Ok(())
      }
      None => Err(PngError::OutputBufferTooSmall { required: end, provided }),
    }
  }

  writer_ints! {
    write_u8 => u8,
    write_i8 => i8,
    write_u16 => u16,
    write_i16 => i16,
    write_u32 => u32,
    write_i32 => i32,
    write_u64 => u64,
    write_i64 => i64,
  }
}

/// Copies `bytes` into a new exactly-sized `Vec`, reporting allocation failure
/// as an error instead of aborting.
#[inline]
pub(crate) fn try_copy_bytes(bytes: &[u8]) -> Result<Vec<u8>, PngError> {
  let mut v = Vec::new();
  v.try_reserve_exact(bytes.len())?;
  v.extend_from_slice(bytes);
  Ok(v)
}

/// A zeroed buffer of `len` bytes, reporting allocation failure as an error.
#[inline]
pub(crate) fn try_zeroed_vec(len: usize) -> Result<Vec<u8>, PngError> {
  let mut v = Vec::new();
  v.try_reserve_exact(len)?;
  v.resize(len, 0);
  Ok(v)
}

#[test]
fn test_reader_is_big_endian_and_bounds_checked() {
  let bytes = [0x12, 0x34, 0x56, 0x78, 0xFF];
  let mut r = ByteReader::new(&bytes);
  assert_eq!(r.peek_u16(), Ok(0x1234));
  assert_eq!(r.position(), 0);
  assert_eq!(r.read_u32(), Ok(0x1234_5678));
  assert_eq!(r.read_i8(), Ok(-1));
  assert_eq!(r.remaining(), 0);
  assert_eq!(r.read_u8(), Err(PngError::UnexpectedEndOfInput));
  assert_eq!(r.read_bytes(1), Err(PngError::UnexpectedEndOfInput));
  assert_eq!(r.read_bytes(0), Ok(&[][..]));
}

#[test]
fn test_reader_failed_read_does_not_advance() {
  let bytes = [1, 2, 3];
  let mut r = ByteReader::new(&bytes);
  assert_eq!(r.read_u32(), Err(PngError::UnexpectedEndOfInput));
  assert_eq!(r.position(), 0);
  assert_eq!(r.read_u16(), Ok(0x0102));
  assert_eq!(r.rest(), &[3]);
}

#[test]
fn test_writer_matches_reader() {
  let mut buf = [0_u8; 15];
  let mut w = ByteWriter::new(&mut buf);
  w.write_i32(-2).unwrap();
  w.write_u64(0x0102_0304_0506_0708).unwrap();
  w.write_u16(0xBEEF).unwrap();
  w.write_u8(7).unwrap();
  assert_eq!(w.position(), 15);
  assert_eq!(w.write_u8(0), Err(PngError::OutputBufferTooSmall { required: 16, provided: 15 }));
  let mut r = ByteReader::new(&buf);
  assert_eq!(r.read_i32(), Ok(-2));
  assert_eq!(r.read_u64(), Ok(0x0102_0304_0506_0708));
  assert_eq!(r.read_i16(), Ok(0xBEEF_u16 as i16));
  assert_eq!(r.read_u8(), Ok(7));
}
