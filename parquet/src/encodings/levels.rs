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

//! Encoding and decoding of definition and repetition levels.
//!
//! Levels are stored either in an RLE/bit-packed hybrid stream (`RLE`), or, in old
//! files, with the deprecated `BIT_PACKED` encoding. Data page v1 prefixes an `RLE`
//! level stream with its 4 byte little-endian length, data page v2 stores the stream
//! length in the page header instead. A level with a maximum of 0 is never stored and
//! is decoded as a constant.

use std::mem;

use bytes::Bytes;

use super::rle::{RleDecoder, RleEncoder};
use crate::basic::Encoding;
use crate::errors::{ParquetError, Result};
use crate::util::bit_util::{ceil, num_required_bits, read_num_bytes};

/// Computes max buffer size for level encoder/decoder based on encoding, max
/// repetition/definition level and number of total buffered values (includes null
/// values).
#[inline]
pub fn max_buffer_size(encoding: Encoding, max_level: i16, num_buffered_values: usize) -> usize {
    let bit_width = num_required_bits(max_level as u64);
    match encoding {
        Encoding::RLE => RleEncoder::max_buffer_size(bit_width, num_buffered_values),
        Encoding::BIT_PACKED => ceil(num_buffered_values * bit_width as usize, 8),
        _ => 0,
    }
}

/// Reader for the deprecated `BIT_PACKED` encoding, which fills each byte from its
/// most significant bit.
pub struct BitPackedLevelReader {
    data: Bytes,
    bit_offset: usize,
    bit_width: usize,
}

impl BitPackedLevelReader {
    fn new(data: Bytes, bit_width: u8) -> Self {
        Self {
            data,
            bit_offset: 0,
            bit_width: bit_width as usize,
        }
    }

    fn get_value(&mut self) -> Option<u32> {
        if self.bit_offset + self.bit_width > self.data.len() * 8 {
            return None;
        }
        let mut v = 0;
        for _ in 0..self.bit_width {
            let byte = self.data[self.bit_offset / 8];
            let bit = (byte >> (7 - self.bit_offset % 8)) & 1;
            v = (v << 1) | bit as u32;
            self.bit_offset += 1;
        }
        Some(v)
    }
}

/// Writer for the deprecated `BIT_PACKED` encoding, see [`BitPackedLevelReader`].
pub struct BitPackedLevelWriter {
    buffer: Vec<u8>,
    bit_offset: usize,
    bit_width: usize,
}

impl BitPackedLevelWriter {
    fn new(bit_width: u8, capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            bit_offset: 0,
            bit_width: bit_width as usize,
        }
    }

    fn put(&mut self, value: u32) {
        for i in (0..self.bit_width).rev() {
            if self.bit_offset % 8 == 0 {
                self.buffer.push(0);
            }
            let bit = ((value >> i) & 1) as u8;
            if let Some(last) = self.buffer.last_mut() {
                *last |= bit << (7 - self.bit_offset % 8);
            }
            self.bit_offset += 1;
        }
    }
}

/// Decoder for definition/repetition levels.
pub enum LevelDecoder {
    /// Levels that are not stored, every slot has `value`.
    Constant { value: i16, num_values: usize },
    /// Levels stored in an RLE/bit-packed hybrid stream.
    Rle {
        max_level: i16,
        decoder: RleDecoder,
        num_values: usize,
        buffer: Vec<u32>,
    },
    /// Levels stored with the deprecated `BIT_PACKED` encoding.
    BitPacked {
        max_level: i16,
        reader: BitPackedLevelReader,
        num_values: usize,
    },
}

impl LevelDecoder {
    /// Creates a decoder that yields `value` for every slot.
    pub fn constant(value: i16) -> Self {
        LevelDecoder::Constant {
            value,
            num_values: 0,
        }
    }

    /// Creates new level decoder for data page v1, with the level `encoding` declared
    /// by the page header.
    pub fn v1(encoding: Encoding, max_level: i16) -> Result<Self> {
        let bit_width = num_required_bits(max_level as u64);
        match encoding {
            Encoding::RLE => Ok(Self::rle(max_level, bit_width)),
            Encoding::BIT_PACKED => Ok(LevelDecoder::BitPacked {
                max_level,
                reader: BitPackedLevelReader::new(Bytes::new(), bit_width),
                num_values: 0,
            }),
            _ => Err(unsupported_encoding_err!(
                "Unsupported encoding {} for levels",
                encoding
            )),
        }
    }

    /// Creates new level decoder for data page v2, levels are always RLE.
    pub fn v2(max_level: i16) -> Self {
        Self::rle(max_level, num_required_bits(max_level as u64))
    }

    fn rle(max_level: i16, bit_width: u8) -> Self {
        LevelDecoder::Rle {
            max_level,
            decoder: RleDecoder::new(bit_width),
            num_values: 0,
            buffer: vec![],
        }
    }

    /// Sets data for this level decoder from the start of a data page v1 payload and
    /// returns the number of bytes the levels occupy.
    ///
    /// `num_buffered_values` is the number of values in the page, including nulls.
    pub fn set_data(&mut self, num_buffered_values: usize, data: Bytes) -> Result<usize> {
        match self {
            LevelDecoder::Constant { num_values, .. } => {
                *num_values = num_buffered_values;
                Ok(0)
            }
            LevelDecoder::Rle {
                decoder,
                num_values,
                ..
            } => {
                const I32_SIZE: usize = mem::size_of::<i32>();
                if data.len() < I32_SIZE {
                    return Err(eof_err!("Not enough data to read levels length"));
                }
                let data_size = read_num_bytes::<i32>(I32_SIZE, data.as_ref());
                let data_size = usize::try_from(data_size)
                    .map_err(|_| corrupt_err!("Negative level block length {}", data_size))?;
                if I32_SIZE + data_size > data.len() {
                    return Err(eof_err!(
                        "Level block of {} bytes exceeds the {} bytes left in the page",
                        data_size,
                        data.len() - I32_SIZE
                    ));
                }
                *num_values = num_buffered_values;
                decoder.set_data(data.slice(I32_SIZE..I32_SIZE + data_size));
                Ok(I32_SIZE + data_size)
            }
            LevelDecoder::BitPacked {
                reader, num_values, ..
            } => {
                let num_bytes = ceil(num_buffered_values * reader.bit_width, 8);
                if num_bytes > data.len() {
                    return Err(eof_err!(
                        "Not enough data for {} bit-packed levels",
                        num_buffered_values
                    ));
                }
                *num_values = num_buffered_values;
                *reader = BitPackedLevelReader::new(data.slice(..num_bytes), reader.bit_width as u8);
                Ok(num_bytes)
            }
        }
    }

    /// Sets byte array explicitly when start position `start` and length `len` are known
    /// in advance. Only supported by RLE level decoder and used for data page v2.
    /// Returns number of total bytes set for this decoder (len).
    pub fn set_data_range(
        &mut self,
        num_buffered_values: usize,
        data: &Bytes,
        start: usize,
        len: usize,
    ) -> Result<usize> {
        match self {
            LevelDecoder::Constant { num_values, .. } => {
                *num_values = num_buffered_values;
                Ok(0)
            }
            LevelDecoder::Rle {
                decoder,
                num_values,
                ..
            } => {
                if start + len > data.len() {
                    return Err(eof_err!(
                        "Level block of {} bytes exceeds the {} bytes of the page",
                        len,
                        data.len()
                    ));
                }
                decoder.set_data(data.slice(start..start + len));
                *num_values = num_buffered_values;
                Ok(len)
            }
            LevelDecoder::BitPacked { .. } => Err(general_err!(
                "set_data_range() is only supported by RLE level decoders"
            )),
        }
    }

    /// Returns the number of levels not yet decoded from the current page.
    pub fn values_left(&self) -> usize {
        match self {
            LevelDecoder::Constant { num_values, .. }
            | LevelDecoder::Rle { num_values, .. }
            | LevelDecoder::BitPacked { num_values, .. } => *num_values,
        }
    }

    /// Decodes up to `buffer.len()` levels and returns the number decoded, which is
    /// less than `buffer.len()` only once the page's levels are exhausted.
    ///
    /// A level above the maximum level is reported as a corrupt page.
    pub fn get(&mut self, buffer: &mut [i16]) -> Result<usize> {
        let to_read = buffer.len().min(self.values_left());
        let buffer = &mut buffer[..to_read];
        match self {
            LevelDecoder::Constant { value, num_values } => {
                buffer.fill(*value);
                *num_values -= to_read;
            }
            LevelDecoder::Rle {
                max_level,
                decoder,
                num_values,
                buffer: scratch,
            } => {
                scratch.resize(to_read, 0);
                let values_read = decoder.get_batch(scratch)?;
                if values_read != to_read {
                    return Err(eof_err!(
                        "Level stream ended after {} of {} levels",
                        values_read,
                        to_read
                    ));
                }
                for (level, v) in buffer.iter_mut().zip(scratch.iter()) {
                    *level = checked_level(*v, *max_level)?;
                }
                *num_values -= to_read;
            }
            LevelDecoder::BitPacked {
                max_level,
                reader,
                num_values,
            } => {
                for level in buffer.iter_mut() {
                    let v = reader
                        .get_value()
                        .ok_or_else(|| eof_err!("Not enough data for bit-packed levels"))?;
                    *level = checked_level(v, *max_level)?;
                }
                *num_values -= to_read;
            }
        }
        Ok(to_read)
    }
}

#[inline]
fn checked_level(v: u32, max_level: i16) -> Result<i16> {
    match i16::try_from(v) {
        Ok(level) if level <= max_level => Ok(level),
        _ => Err(corrupt_err!(
            "Level {} exceeds the maximum level {}",
            v,
            max_level
        )),
    }
}

/// Encoder for definition/repetition levels.
/// Currently only supports RLE and BIT_PACKED (dev/null) encoding, including v2.
pub enum LevelEncoder {
    Rle(RleEncoder),
    RleV2(RleEncoder),
    BitPacked(BitPackedLevelWriter),
}

impl LevelEncoder {
    /// Creates new level encoder based on encoding, max level and capacity.
    /// This does not check/validate if capacity is enough to encode values, it is
    /// callers job to ensure this.
    pub fn v1(encoding: Encoding, max_level: i16, capacity: usize) -> Result<Self> {
        let capacity_bytes = max_buffer_size(encoding, max_level, capacity);
        let bit_width = num_required_bits(max_level as u64);
        match encoding {
            Encoding::RLE => {
                let mut buffer = Vec::with_capacity(capacity_bytes + mem::size_of::<i32>());
                // Reserve space for the length prefix
                buffer.extend_from_slice(&[0; mem::size_of::<i32>()]);
                Ok(LevelEncoder::Rle(RleEncoder::new_from_buf(bit_width, buffer)))
            }
            Encoding::BIT_PACKED => Ok(LevelEncoder::BitPacked(BitPackedLevelWriter::new(
                bit_width,
                capacity_bytes,
            ))),
            _ => Err(unsupported_encoding_err!(
                "Unsupported encoding {} for levels",
                encoding
            )),
        }
    }

    /// Creates new level encoder based on RLE encoding. Used to encode Data Page v2
    /// repetition and definition levels.
    pub fn v2(max_level: i16, capacity: usize) -> Self {
        let capacity_bytes = max_buffer_size(Encoding::RLE, max_level, capacity);
        let bit_width = num_required_bits(max_level as u64);
        LevelEncoder::RleV2(RleEncoder::new(bit_width, capacity_bytes))
    }

    /// Put/encode levels vector into this level encoder.
    /// Returns number of encoded values that are less than or equal to length of the
    /// input buffer.
    #[inline]
    pub fn put(&mut self, buffer: &[i16]) -> usize {
        match self {
            LevelEncoder::Rle(encoder) | LevelEncoder::RleV2(encoder) => {
                for value in buffer {
                    encoder.put(*value as u64);
                }
            }
            LevelEncoder::BitPacked(writer) => {
                for value in buffer {
                    writer.put(*value as u32);
                }
            }
        }
        buffer.len()
    }

    /// Finalizes level encoder, flush all intermediate buffers and return resulting
    /// encoded buffer. Returned buffer is already truncated to encoded bytes only.
    #[inline]
    pub fn consume(self) -> Vec<u8> {
        match self {
            LevelEncoder::Rle(encoder) => {
                let mut encoded_data = encoder.consume();
                // Account for the buffer offset
                let encoded_len = encoded_data.len() - mem::size_of::<i32>();
                let len = (encoded_len as i32).to_le_bytes();
                encoded_data[0..len.len()].copy_from_slice(len.as_slice());
                encoded_data
            }
            LevelEncoder::RleV2(encoder) => encoder.consume(),
            LevelEncoder::BitPacked(writer) => writer.buffer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::distr::{Distribution, Uniform};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn random_levels(num: usize, max_level: i16, seed: u64) -> Vec<i16> {
        let rng = StdRng::seed_from_u64(seed);
        let dist = Uniform::new_inclusive(0, max_level).unwrap();
        dist.sample_iter(rng).take(num).collect()
    }

    fn test_internal_roundtrip(enc: Encoding, levels: &[i16], max_level: i16, v2: bool) {
        let mut encoder = if v2 {
            LevelEncoder::v2(max_level, levels.len())
        } else {
            LevelEncoder::v1(enc, max_level, levels.len()).unwrap()
        };
        assert_eq!(encoder.put(levels), levels.len());
        let encoded = Bytes::from(encoder.consume());

        let mut decoder = if v2 {
            LevelDecoder::v2(max_level)
        } else {
            LevelDecoder::v1(enc, max_level).unwrap()
        };
        let consumed = if v2 {
            decoder
                .set_data_range(levels.len(), &encoded, 0, encoded.len())
                .unwrap()
        } else {
            decoder.set_data(levels.len(), encoded.clone()).unwrap()
        };
        assert_eq!(consumed, encoded.len());

        let mut found = vec![0; levels.len()];
        let mut total = 0;
        // Decode in uneven chunks
        for chunk in found.chunks_mut(7) {
            total += decoder.get(chunk).unwrap();
        }
        assert_eq!(total, levels.len());
        assert_eq!(found, levels);
        assert_eq!(decoder.values_left(), 0);
        assert_eq!(decoder.get(&mut [0; 4]).unwrap(), 0);
    }

    #[test]
    fn test_roundtrip_one() {
        let levels = vec![0, 1, 1, 1, 1, 0, 0, 0, 0, 1];
        let max_level = 1;
        test_internal_roundtrip(Encoding::RLE, &levels, max_level, false);
        test_internal_roundtrip(Encoding::BIT_PACKED, &levels, max_level, false);
        test_internal_roundtrip(Encoding::RLE, &levels, max_level, true);
    }

    #[test]
    fn test_roundtrip() {
        let levels = vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let max_level = 10;
        test_internal_roundtrip(Encoding::RLE, &levels, max_level, false);
        test_internal_roundtrip(Encoding::BIT_PACKED, &levels, max_level, false);
        test_internal_roundtrip(Encoding::RLE, &levels, max_level, true);
    }

    #[test]
    fn test_roundtrip_random() {
        for (seed, max_level) in [(1, 1), (2, 3), (3, 7), (4, 100)] {
            let levels = random_levels(1000, max_level, seed);
            test_internal_roundtrip(Encoding::RLE, &levels, max_level, false);
            test_internal_roundtrip(Encoding::BIT_PACKED, &levels, max_level, false);
            test_internal_roundtrip(Encoding::RLE, &levels, max_level, true);
        }
    }

    #[test]
    fn test_bit_packed_msb_first() {
        // 0 to 7 at bit width 3, from the format documentation
        let mut encoder = LevelEncoder::v1(Encoding::BIT_PACKED, 7, 8).unwrap();
        encoder.put(&[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(encoder.consume(), vec![0b0000_0101, 0b0011_1001, 0b0111_0111]);
    }

    #[test]
    fn test_rle_v1_length_prefix() {
        let mut encoder = LevelEncoder::v1(Encoding::RLE, 1, 10).unwrap();
        encoder.put(&[1; 10]);
        assert_eq!(encoder.consume(), vec![2, 0, 0, 0, 0x14, 0x01]);
    }

    #[test]
    fn test_set_data_reports_consumed_bytes() {
        // Level block followed by value bytes
        let data = Bytes::from(vec![2, 0, 0, 0, 0x14, 0x01, 0xAA, 0xBB]);
        let mut decoder = LevelDecoder::v1(Encoding::RLE, 1).unwrap();
        assert_eq!(decoder.set_data(10, data).unwrap(), 6);
        let mut levels = vec![0; 10];
        assert_eq!(decoder.get(&mut levels).unwrap(), 10);
        assert_eq!(levels, vec![1; 10]);
    }

    #[test]
    fn test_constant_levels() {
        let mut decoder = LevelDecoder::constant(0);
        assert_eq!(decoder.set_data(5, Bytes::from(vec![1, 2, 3])).unwrap(), 0);
        let mut levels = vec![-1; 8];
        assert_eq!(decoder.get(&mut levels).unwrap(), 5);
        assert_eq!(levels, vec![0, 0, 0, 0, 0, -1, -1, -1]);
    }

    #[test]
    fn test_level_above_max_is_corrupt() {
        // RLE run of 3 with value 3, max level 2 has bit width 2
        let data = Bytes::from(vec![2, 0, 0, 0, 0x06, 0x03]);
        let mut decoder = LevelDecoder::v1(Encoding::RLE, 2).unwrap();
        decoder.set_data(3, data).unwrap();
        let err = decoder.get(&mut [0; 3]).unwrap_err();
        assert!(matches!(err, ParquetError::CorruptPage(_)), "{err}");
    }

    #[test]
    fn test_truncated_levels() {
        let mut decoder = LevelDecoder::v1(Encoding::RLE, 1).unwrap();
        let err = decoder.set_data(3, Bytes::from(vec![2, 0])).unwrap_err();
        assert!(matches!(err, ParquetError::TruncatedInput(_)), "{err}");

        let err = decoder
            .set_data(3, Bytes::from(vec![9, 0, 0, 0, 0x06]))
            .unwrap_err();
        assert!(matches!(err, ParquetError::TruncatedInput(_)), "{err}");

        // Stream holds 2 levels but the page declares 3
        decoder
            .set_data(3, Bytes::from(vec![2, 0, 0, 0, 0x04, 0x01]))
            .unwrap();
        let err = decoder.get(&mut [0; 3]).unwrap_err();
        assert!(matches!(err, ParquetError::TruncatedInput(_)), "{err}");

        let mut decoder = LevelDecoder::v1(Encoding::BIT_PACKED, 3).unwrap();
        let err = decoder.set_data(9, Bytes::from(vec![0; 2])).unwrap_err();
        assert!(matches!(err, ParquetError::TruncatedInput(_)), "{err}");
    }

    #[test]
    fn test_unsupported_level_encoding() {
        let err = LevelDecoder::v1(Encoding::PLAIN, 1).err().unwrap();
        assert!(matches!(err, ParquetError::UnsupportedEncoding(_)));
        let err = LevelEncoder::v1(Encoding::DELTA_BINARY_PACKED, 1, 1)
            .err()
            .unwrap();
        assert!(matches!(err, ParquetError::UnsupportedEncoding(_)));
    }
}
