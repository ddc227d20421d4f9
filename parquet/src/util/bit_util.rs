// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::mem::size_of;

use bytes::Bytes;

use crate::errors::{ParquetError, Result};

/// Converts little-endian bytes into a fixed-width primitive.
pub trait FromBytes: Sized {
    type Buffer: AsMut<[u8]> + Default;
    fn try_from_le_slice(b: &[u8]) -> Result<Self>;
    fn from_le_bytes(bs: Self::Buffer) -> Self;
}

macro_rules! from_le_bytes {
    ($($ty: ty),*) => {
        $(
        impl FromBytes for $ty {
            type Buffer = [u8; size_of::<Self>()];
            fn try_from_le_slice(b: &[u8]) -> Result<Self> {
                Ok(Self::from_le_bytes(array_from_slice(b)?))
            }
            fn from_le_bytes(bs: Self::Buffer) -> Self {
                <$ty>::from_le_bytes(bs)
            }
        }
        )*
    };
}

from_le_bytes! { u8, u16, u32, u64, i8, i16, i32, i64, f32, f64 }

impl FromBytes for bool {
    type Buffer = [u8; 1];

    fn try_from_le_slice(b: &[u8]) -> Result<Self> {
        Ok(Self::from_le_bytes(array_from_slice(b)?))
    }
    fn from_le_bytes(bs: Self::Buffer) -> Self {
        bs[0] != 0
    }
}

fn array_from_slice<const N: usize>(bs: &[u8]) -> Result<[u8; N]> {
    // Need to slice as may be called with zero-padded values
    match bs.get(..N) {
        Some(b) => Ok(b.try_into().unwrap_or([0; N])),
        None => Err(eof_err!(
            "error converting value, expected {} bytes got {}",
            N,
            bs.len()
        )),
    }
}

/// Reads `size` of bytes from `src`, and reinterprets them as type `ty`, in
/// little-endian order.
/// This is copied and modified from byteorder crate.
pub(crate) fn read_num_bytes<T>(size: usize, src: &[u8]) -> T
where
    T: FromBytes,
{
    assert!(size <= src.len());
    let mut buffer = <T as FromBytes>::Buffer::default();
    buffer.as_mut()[..size].copy_from_slice(&src[..size]);
    <T>::from_le_bytes(buffer)
}

/// Returns the ceil of value/divisor.
#[inline]
pub fn ceil<T: num::Integer>(value: T, divisor: T) -> T {
    num::Integer::div_ceil(&value, &divisor)
}

/// Returns the `num_bits` least-significant bits of `v`
#[inline]
pub fn trailing_bits(v: u64, num_bits: usize) -> u64 {
    if num_bits >= 64 {
        v
    } else {
        v & ((1 << num_bits) - 1)
    }
}

/// Returns the minimum number of bits needed to represent the value 'x'
#[inline]
pub fn num_required_bits(x: u64) -> u8 {
    64 - x.leading_zeros() as u8
}

/// Maximum byte length for a VLQ encoded integer
/// MAX_VLQ_BYTE_LEN = 5 for i32, and MAX_VLQ_BYTE_LEN = 10 for i64
pub const MAX_VLQ_BYTE_LEN: usize = 10;

/// Utility class for writing bit/byte streams. This class can write data in either
/// bit packed or byte aligned fashion.
pub struct BitWriter {
    buffer: Vec<u8>,
    buffered_values: u64,
    bit_offset: usize,
}

impl BitWriter {
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(initial_capacity),
            buffered_values: 0,
            bit_offset: 0,
        }
    }

    /// Initializes the writer appending to the existing buffer `buffer`
    pub fn new_from_buf(buffer: Vec<u8>) -> Self {
        Self {
            buffer,
            buffered_values: 0,
            bit_offset: 0,
        }
    }

    /// Consumes and returns the current buffer.
    #[inline]
    pub fn consume(mut self) -> Vec<u8> {
        self.flush();
        self.buffer
    }

    /// Flushes the internal buffered bits and returns the buffer's content.
    /// This is a borrow equivalent of `consume` method.
    #[inline]
    pub fn flush_buffer(&mut self) -> &[u8] {
        self.flush();
        self.buffer()
    }

    /// Clears the internal state so the buffer can be reused.
    #[inline]
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.buffered_values = 0;
        self.bit_offset = 0;
    }

    /// Flushes the internal buffered bits and the align the buffer to the next byte.
    #[inline]
    pub fn flush(&mut self) {
        let num_bytes = ceil(self.bit_offset, 8);
        let slice = &self.buffered_values.to_le_bytes()[..num_bytes];
        self.buffer.extend_from_slice(slice);
        self.buffered_values = 0;
        self.bit_offset = 0;
    }

    /// Advances the current offset by skipping `num_bytes`, flushing the internal bit
    /// buffer first.
    /// This is useful when you want to jump over `num_bytes` bytes and come back later
    /// to fill these bytes.
    #[inline]
    pub fn skip(&mut self, num_bytes: usize) -> usize {
        self.flush();
        let result = self.buffer.len();
        self.buffer.resize(result + num_bytes, 0);
        result
    }

    /// Returns the number of bytes written so far, including a partially filled byte.
    #[inline]
    pub fn bytes_written(&self) -> usize {
        self.buffer.len() + ceil(self.bit_offset, 8)
    }

    #[inline]
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.buffer.len()
    }

    /// Writes the entire byte `value` at the byte `offset`
    pub fn write_at(&mut self, offset: usize, value: u8) {
        self.buffer[offset] = value;
    }

    /// Puts the `num_bits` least-significant bits of `v` into the stream, starting at
    /// the current bit position. Bits are filled from the least-significant end of
    /// each byte.
    #[inline]
    pub fn put_value(&mut self, v: u64, num_bits: usize) {
        debug_assert!(num_bits <= 64);
        let v = trailing_bits(v, num_bits);

        self.buffered_values |= v << self.bit_offset;
        self.bit_offset += num_bits;

        if let Some(remaining) = self.bit_offset.checked_sub(64) {
            self.buffer
                .extend_from_slice(&self.buffered_values.to_le_bytes());
            self.bit_offset = remaining;

            // Perform checked right shift: v >> offset, where offset < 64, otherwise we
            // shift all bits
            self.buffered_values = v
                .checked_shr((num_bits - self.bit_offset) as u32)
                .unwrap_or(0);
        }
    }

    /// Writes the `num_bytes` least-significant bytes of `val` after flushing any
    /// buffered bits, so the value lands on a byte boundary.
    #[inline]
    pub fn put_aligned(&mut self, val: u64, num_bytes: usize) {
        self.flush();
        let slice = val.to_le_bytes();
        let len = num_bytes.min(slice.len());
        self.buffer.extend_from_slice(&slice[..len]);
    }

    /// Appends `bytes` after flushing any buffered bits.
    #[inline]
    pub fn put_aligned_slice(&mut self, bytes: &[u8]) {
        self.flush();
        self.buffer.extend_from_slice(bytes);
    }

    /// Writes the `num_bytes` least-significant bytes of `val` at the byte `offset`,
    /// which must have been reserved with [`Self::skip`].
    #[inline]
    pub fn put_aligned_offset(&mut self, val: u64, num_bytes: usize, offset: usize) {
        let slice = val.to_le_bytes();
        let len = num_bytes.min(slice.len());
        self.buffer[offset..offset + len].copy_from_slice(&slice[..len])
    }

    /// Writes a VLQ (ULEB128) encoded integer `v` to this buffer.
    #[inline]
    pub fn put_vlq_int(&mut self, mut v: u64) {
        while v & 0xFFFFFFFFFFFFFF80 != 0 {
            self.put_aligned((v & 0x7F) | 0x80, 1);
            v >>= 7;
        }
        self.put_aligned(v & 0x7F, 1);
    }

    /// Writes a zigzag-VLQ encoded (in little endian order) int `v` to this buffer.
    /// Zigzag-VLQ is a variant of VLQ encoding where negative and positive
    /// numbers are encoded in a zigzag fashion.
    /// See: https://developers.google.com/protocol-buffers/docs/encoding
    #[inline]
    pub fn put_zigzag_vlq_int(&mut self, v: i64) {
        let u: u64 = ((v << 1) ^ (v >> 63)) as _;
        self.put_vlq_int(u)
    }
}

/// Utility class to read bit/byte stream. This class can read bits or bytes that are
/// either byte aligned or not.
pub struct BitReader {
    /// The byte buffer to read from, passed in by client
    buffer: Bytes,

    /// Bytes are memcpy'd from `buffer` and values are read from this variable.
    /// This is faster than reading values byte by byte directly from `buffer`
    ///
    /// This is only populated when `self.bit_offset != 0`
    buffered_values: u64,

    ///
    /// End                                         Start
    /// |............|B|B|B|B|B|B|B|B|..............|
    ///                   ^          ^
    ///                 bit_offset   byte_offset
    ///
    /// Current byte offset in `buffer`
    byte_offset: usize,

    /// Current bit offset in `buffered_values`
    bit_offset: usize,
}

impl BitReader {
    pub fn new(buffer: Bytes) -> Self {
        BitReader {
            buffer,
            buffered_values: 0,
            byte_offset: 0,
            bit_offset: 0,
        }
    }

    pub fn reset(&mut self, buffer: Bytes) {
        self.buffer = buffer;
        self.buffered_values = 0;
        self.byte_offset = 0;
        self.bit_offset = 0;
    }

    /// Gets the current byte offset
    #[inline]
    pub fn get_byte_offset(&self) -> usize {
        self.byte_offset + ceil(self.bit_offset, 8)
    }

    /// Returns the number of bits not yet consumed.
    #[inline]
    pub fn bits_left(&self) -> usize {
        (self.buffer.len() * 8).saturating_sub(self.byte_offset * 8 + self.bit_offset)
    }

    /// Reads a value of type `T` and of size `num_bits`.
    ///
    /// Returns `None` if there's not enough data available. `Some` otherwise.
    pub fn get_value<T: FromBytes>(&mut self, num_bits: usize) -> Option<T> {
        assert!(num_bits <= 64);
        assert!(num_bits <= size_of::<T>() * 8);

        if num_bits > self.bits_left() {
            return None;
        }

        // If buffer is not byte aligned, `self.buffered_values` will
        // have already been populated
        if self.bit_offset == 0 {
            self.load_buffered_values()
        }

        let mut v =
            trailing_bits(self.buffered_values, self.bit_offset + num_bits) >> self.bit_offset;
        self.bit_offset += num_bits;

        if self.bit_offset >= 64 {
            self.byte_offset += 8;
            self.bit_offset -= 64;

            // If the new bit_offset is not 0, we need to read the next 64-bit chunk
            // to buffered_values and update `v`
            if self.bit_offset != 0 {
                self.load_buffered_values();

                v |= trailing_bits(self.buffered_values, self.bit_offset)
                    .wrapping_shl((num_bits - self.bit_offset) as u32);
            }
        }

        T::try_from_le_slice(&v.to_le_bytes()).ok()
    }

    /// Reads up to `batch.len()` values of `num_bits` each, returning how many were read.
    pub fn get_batch<T: FromBytes>(&mut self, batch: &mut [T], num_bits: usize) -> usize {
        let mut values_read = 0;
        for slot in batch.iter_mut() {
            match self.get_value(num_bits) {
                Some(v) => *slot = v,
                None => break,
            }
            values_read += 1;
        }
        values_read
    }

    /// Skip num_value values with num_bits bit width
    ///
    /// Return the number of values skipped (up to num_values)
    pub fn skip(&mut self, num_values: usize, num_bits: usize) -> usize {
        assert!(num_bits <= 64);

        let values_to_read = match num_bits {
            0 => num_values,
            _ => num_values.min(self.bits_left() / num_bits),
        };

        let end_bit_offset = self.byte_offset * 8 + self.bit_offset + values_to_read * num_bits;

        self.byte_offset = end_bit_offset / 8;
        self.bit_offset = end_bit_offset % 8;

        if self.bit_offset != 0 {
            self.load_buffered_values()
        }

        values_to_read
    }

    /// Reads a `num_bytes`-sized value from this buffer and return it.
    /// `T` needs to be a little-endian native type. The value is assumed to be byte
    /// aligned so the bit reader will be advanced to the start of the next byte before
    /// reading the value.
    ///
    /// Returns `Some` if there's enough bytes left to form a value of `T`.
    /// Otherwise `None`.
    pub fn get_aligned<T: FromBytes>(&mut self, num_bytes: usize) -> Option<T> {
        self.byte_offset = self.get_byte_offset();
        self.bit_offset = 0;

        if self.byte_offset + num_bytes > self.buffer.len() {
            return None;
        }

        // Advance byte_offset to next unread byte and read num_bytes
        let v = read_num_bytes::<T>(num_bytes, &self.buffer[self.byte_offset..]);
        self.byte_offset += num_bytes;

        Some(v)
    }

    /// Returns the next `num_bytes` bytes, starting at the next byte boundary.
    ///
    /// Returns `None`, without advancing, if fewer than `num_bytes` bytes remain.
    pub fn get_aligned_slice(&mut self, num_bytes: usize) -> Option<&[u8]> {
        let start = self.get_byte_offset();
        let end = start.checked_add(num_bytes)?;
        if end > self.buffer.len() {
            return None;
        }
        self.byte_offset = end;
        self.bit_offset = 0;
        Some(&self.buffer[start..end])
    }

    /// Reads a VLQ (ULEB128) encoded integer from the stream.
    ///
    /// Fails with [`ParquetError::TruncatedInput`] if the stream ends before the final byte and
    /// with [`ParquetError::MalformedHeader`] if the encoding runs past
    /// [`MAX_VLQ_BYTE_LEN`] bytes.
    pub fn get_vlq_int(&mut self) -> Result<u64> {
        let mut shift = 0;
        let mut v: u64 = 0;
        while let Some(byte) = self.get_aligned::<u8>(1) {
            v |= ((byte & 0x7F) as u64) << shift;
            shift += 7;
            if byte & 0x80 == 0 {
                return Ok(v);
            }
            if shift >= MAX_VLQ_BYTE_LEN * 7 {
                return Err(malformed_err!(
                    "VLQ integer longer than {} bytes",
                    MAX_VLQ_BYTE_LEN
                ));
            }
        }
        Err(eof_err!("Not enough data to decode VLQ integer"))
    }

    /// Reads a zigzag-VLQ encoded (in little endian order) int from the stream
    /// Zigzag-VLQ is a variant of VLQ encoding where negative and positive numbers are
    /// encoded in a zigzag fashion.
    /// See: https://developers.google.com/protocol-buffers/docs/encoding
    #[inline]
    pub fn get_zigzag_vlq_int(&mut self) -> Result<i64> {
        self.get_vlq_int()
            .map(|u| ((u >> 1) as i64) ^ -((u & 1) as i64))
    }

    /// Loads up to the the next 8 bytes from `self.buffer` at `self.byte_offset`
    /// into `self.buffered_values`.
    ///
    /// Reads fewer than 8 bytes if there are fewer than 8 bytes left
    #[inline]
    fn load_buffered_values(&mut self) {
        let bytes_to_read = (self.buffer.len() - self.byte_offset).min(8);
        self.buffered_values =
            read_num_bytes::<u64>(bytes_to_read, &self.buffer[self.byte_offset..]);
    }
}

impl From<Vec<u8>> for BitReader {
    #[inline]
    fn from(buffer: Vec<u8>) -> Self {
        BitReader::new(buffer.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::distr::{Distribution, StandardUniform};
    use rand::{rng, Rng};

    #[test]
    fn test_ceil() {
        assert_eq!(ceil(0, 1), 0);
        assert_eq!(ceil(1, 1), 1);
        assert_eq!(ceil(1, 2), 1);
        assert_eq!(ceil(1, 8), 1);
        assert_eq!(ceil(7, 8), 1);
        assert_eq!(ceil(8, 8), 1);
        assert_eq!(ceil(9, 8), 2);
        assert_eq!(ceil(9, 9), 1);
        assert_eq!(ceil(10000000000_u64, 10), 1000000000);
        assert_eq!(ceil(10_u64, 10000000000), 1);
    }

    #[test]
    fn test_num_required_bits() {
        assert_eq!(num_required_bits(0), 0);
        assert_eq!(num_required_bits(1), 1);
        assert_eq!(num_required_bits(2), 2);
        assert_eq!(num_required_bits(4), 3);
        assert_eq!(num_required_bits(8), 4);
        assert_eq!(num_required_bits(10), 4);
        assert_eq!(num_required_bits(12), 4);
        assert_eq!(num_required_bits(16), 5);
        assert_eq!(num_required_bits(u64::MAX), 64);
    }

    #[test]
    fn test_bit_reader_get_byte_offset() {
        let buffer = vec![255; 10];
        let mut bit_reader = BitReader::from(buffer);
        assert_eq!(bit_reader.get_byte_offset(), 0); // offset (0 bytes, 0 bits)
        bit_reader.get_value::<i32>(6);
        assert_eq!(bit_reader.get_byte_offset(), 1); // offset (0 bytes, 6 bits)
        bit_reader.get_value::<i32>(10);
        assert_eq!(bit_reader.get_byte_offset(), 2); // offset (0 bytes, 16 bits)
        bit_reader.get_value::<i32>(20);
        assert_eq!(bit_reader.get_byte_offset(), 5); // offset (0 bytes, 36 bits)
        bit_reader.get_value::<i32>(30);
        assert_eq!(bit_reader.get_byte_offset(), 9); // offset (8 bytes, 2 bits)
    }

    #[test]
    fn test_bit_reader_get_value() {
        let buffer = vec![255, 0];
        let mut bit_reader = BitReader::from(buffer);
        assert_eq!(bit_reader.get_value::<i32>(1), Some(1));
        assert_eq!(bit_reader.get_value::<i32>(2), Some(3));
        assert_eq!(bit_reader.get_value::<i32>(3), Some(7));
        assert_eq!(bit_reader.get_value::<i32>(4), Some(3));
        assert_eq!(bit_reader.get_value::<i32>(8), None);
    }

    #[test]
    fn test_bit_reader_skip() {
        let buffer = vec![255, 0];
        let mut bit_reader = BitReader::from(buffer);
        let skipped = bit_reader.skip(1, 1);
        assert_eq!(skipped, 1);
        assert_eq!(bit_reader.get_value::<i32>(1), Some(1));
        let skipped = bit_reader.skip(2, 2);
        assert_eq!(skipped, 2);
        assert_eq!(bit_reader.get_value::<i32>(2), Some(3));
        let skipped = bit_reader.skip(4, 1);
        assert_eq!(skipped, 4);
        assert_eq!(bit_reader.get_value::<i32>(4), Some(0));
        let skipped = bit_reader.skip(1, 1);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_bit_reader_get_value_boundary() {
        let buffer = vec![10, 0, 0, 0, 20, 0, 30, 0, 0, 0, 40, 0];
        let mut bit_reader = BitReader::from(buffer);
        assert_eq!(bit_reader.get_value::<i64>(32), Some(10));
        assert_eq!(bit_reader.get_value::<i64>(16), Some(20));
        assert_eq!(bit_reader.get_value::<i64>(32), Some(30));
        assert_eq!(bit_reader.get_value::<i64>(16), Some(40));
    }

    #[test]
    fn test_bit_reader_get_aligned() {
        // 01110101 11001011
        let buffer = Bytes::from(vec![0x75, 0xCB]);
        let mut bit_reader = BitReader::new(buffer.clone());
        assert_eq!(bit_reader.get_value::<i32>(3), Some(5));
        assert_eq!(bit_reader.get_aligned::<i32>(1), Some(203));
        assert_eq!(bit_reader.get_value::<i32>(1), None);
        bit_reader.reset(buffer);
        assert_eq!(bit_reader.get_aligned::<i32>(3), None);
    }

    #[test]
    fn test_bit_reader_get_vlq_int() {
        // 10001001 00000001 11110010 10110101 00000110
        let buffer: Vec<u8> = vec![0x89, 0x01, 0xF2, 0xB5, 0x06];
        let mut bit_reader = BitReader::from(buffer);
        assert_eq!(bit_reader.get_vlq_int().unwrap(), 137);
        assert_eq!(bit_reader.get_vlq_int().unwrap(), 105202);
        assert!(matches!(bit_reader.get_vlq_int(), Err(ParquetError::TruncatedInput(_))));
    }

    #[test]
    fn test_bit_reader_get_vlq_int_truncated() {
        // Continuation bit set on the final byte
        let mut bit_reader = BitReader::from(vec![0xD8, 0x84]);
        assert!(matches!(bit_reader.get_vlq_int(), Err(ParquetError::TruncatedInput(_))));

        // Nine continuation bytes are within the limit, the stream just ends
        let mut bit_reader = BitReader::from(vec![0x80; 9]);
        assert!(matches!(bit_reader.get_vlq_int(), Err(ParquetError::TruncatedInput(_))));
    }

    #[test]
    fn test_bit_reader_get_vlq_int_too_long() {
        let mut bit_reader = BitReader::from(vec![0x80; 11]);
        let err = bit_reader.get_vlq_int().unwrap_err();
        assert!(matches!(err, ParquetError::MalformedHeader(_)), "{err}");

        let mut bit_reader = BitReader::from(vec![0xFF; 12]);
        assert!(matches!(
            bit_reader.get_zigzag_vlq_int(),
            Err(ParquetError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_bit_reader_get_zigzag_vlq_int() {
        let buffer: Vec<u8> = vec![0, 1, 2, 3];
        let mut bit_reader = BitReader::from(buffer);
        assert_eq!(bit_reader.get_zigzag_vlq_int().unwrap(), 0);
        assert_eq!(bit_reader.get_zigzag_vlq_int().unwrap(), -1);
        assert_eq!(bit_reader.get_zigzag_vlq_int().unwrap(), 1);
        assert_eq!(bit_reader.get_zigzag_vlq_int().unwrap(), -2);
    }

    #[test]
    fn test_put_value_rand_numbers_32() {
        test_put_value_rand_numbers(32, 2);
        test_put_value_rand_numbers(32, 7);
        test_put_value_rand_numbers(32, 31);
        test_put_value_rand_numbers(32, 32);
    }

    #[test]
    fn test_put_value_rand_numbers_64() {
        test_put_value_rand_numbers(64, 16);
        test_put_value_rand_numbers(64, 33);
        test_put_value_rand_numbers(64, 63);
        test_put_value_rand_numbers(64, 64);
    }

    fn test_put_value_rand_numbers(total: usize, num_bits: usize) {
        assert!(num_bits <= 64);
        let num_bytes = ceil(num_bits, 8);
        let mut writer = BitWriter::new(num_bytes * total);
        let values: Vec<u64> = StandardUniform
            .sample_iter(&mut rng())
            .take(total)
            .map(|v: u64| trailing_bits(v, num_bits))
            .collect();
        for v in &values {
            writer.put_value(*v, num_bits);
        }

        let mut reader = BitReader::from(writer.consume());
        for (i, expected) in values.iter().enumerate() {
            let v = reader
                .get_value::<u64>(num_bits)
                .expect("get_value() should return OK");
            assert_eq!(
                v, *expected,
                "[{i}]: expected {expected} but got {v}"
            );
        }
    }

    #[test]
    fn test_put_aligned_rand_numbers() {
        let mut rng = rng();
        let total = 64;
        let mut writer = BitWriter::new(total * 5);
        let mut expected = Vec::with_capacity(total);
        for _ in 0..total {
            let bits: u64 = rng.random_range(0..8);
            let aligned: u64 = rng.random::<u32>() as u64;
            writer.put_value(bits, 3);
            writer.put_aligned(aligned, 4);
            expected.push((bits, aligned));
        }

        let mut reader = BitReader::from(writer.consume());
        for (bits, aligned) in expected {
            assert_eq!(reader.get_value::<u64>(3), Some(bits));
            assert_eq!(reader.get_aligned::<u64>(4), Some(aligned));
        }
    }

    #[test]
    fn test_put_vlq_int() {
        let mut writer = BitWriter::new(16);
        writer.put_vlq_int(1);
        writer.put_vlq_int(300);
        writer.put_vlq_int(u64::MAX);
        let buffer = writer.consume();
        assert_eq!(&buffer[..3], &[0x01, 0xAC, 0x02]);
        assert_eq!(buffer.len(), 3 + MAX_VLQ_BYTE_LEN);

        let mut reader = BitReader::from(buffer);
        assert_eq!(reader.get_vlq_int().unwrap(), 1);
        assert_eq!(reader.get_vlq_int().unwrap(), 300);
        assert_eq!(reader.get_vlq_int().unwrap(), u64::MAX);
    }

    #[test]
    fn test_put_zigzag_vlq_int() {
        let values = [0, -1, 1, i64::MIN, i64::MAX, -123456789];
        let mut writer = BitWriter::new(64);
        for v in values {
            writer.put_zigzag_vlq_int(v);
        }
        let mut reader = BitReader::from(writer.consume());
        for v in values {
            assert_eq!(reader.get_zigzag_vlq_int().unwrap(), v);
        }
    }

    #[test]
    fn test_skip_and_put_aligned_offset() {
        let mut writer = BitWriter::new(8);
        writer.put_value(1, 1);
        let pos = writer.skip(1);
        assert_eq!(pos, 1);
        writer.put_aligned(0xAB, 1);
        writer.put_aligned_offset(0x07, 1, pos);
        assert_eq!(writer.bytes_written(), 3);
        assert_eq!(writer.consume(), vec![0x01, 0x07, 0xAB]);
    }

    #[test]
    fn test_from_le_slice() {
        assert_eq!(i32::try_from_le_slice(&[1, 0, 0, 0, 9]).unwrap(), 1);
        assert!(bool::try_from_le_slice(&[1]).unwrap());
        assert!(i64::try_from_le_slice(&[1, 2]).is_err());
    }
}
