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

use std::cmp;

use bytes::Bytes;

use crate::errors::{ParquetError, Result};
use crate::util::bit_pack::{self, MAX_BIT_WIDTH};
use crate::util::bit_util::{self, BitReader, BitWriter};

/// Rle/Bit-Packing Hybrid Encoding
/// The grammar for this encoding looks like the following (copied verbatim
/// from <https://github.com/Parquet/parquet-format/blob/master/Encodings.md>):
///
/// rle-bit-packed-hybrid: `<length>` `<encoded-data>`
/// length := length of the `<encoded-data>` in bytes stored as 4 bytes little endian
/// encoded-data := `<run>`*
/// run := `<bit-packed-run>` | `<rle-run>`
/// bit-packed-run := `<bit-packed-header>` `<bit-packed-values>`
/// bit-packed-header := varint-encode(`<bit-pack-count>` << 1 | 1)
/// we always bit-pack a multiple of 8 values at a time, so we only store the number of
/// values / 8
/// bit-pack-count := (number of values in this run) / 8
/// bit-packed-values := *see 1 below*
/// rle-run := `<rle-header>` `<repeated-value>`
/// rle-header := varint-encode( (number of times repeated) << 1)
/// repeated-value := value that is repeated, using a fixed-width of
/// round-up-to-next-byte(bit-width)
///
/// The `<length>` prefix is not part of the streams produced and consumed here, it
/// is added by the users that need it.

/// Maximum groups of 8 values per bit-packed run. Current value is 64.
const MAX_GROUPS_PER_BIT_PACKED_RUN: usize = 1 << 6;

/// One run of a hybrid stream, as described by its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HybridRun {
    /// `count` repetitions of `value`.
    Rle { count: u32, value: u32 },
    /// `num_groups` groups of 8 values, each packed at `bit_width` bits.
    BitPacked { num_groups: u32, bit_width: u8 },
}

impl HybridRun {
    /// Number of values this run yields, including bit-packed padding.
    pub fn num_values(&self) -> usize {
        match self {
            HybridRun::Rle { count, .. } => *count as usize,
            HybridRun::BitPacked { num_groups, .. } => *num_groups as usize * 8,
        }
    }

    /// Reads the next run header, and for RLE runs the repeated value, from `reader`.
    ///
    /// Returns `Ok(None)` if the reader is exhausted on a run boundary.
    pub fn read(reader: &mut BitReader, bit_width: u8) -> Result<Option<Self>> {
        if bit_width as usize > MAX_BIT_WIDTH {
            return Err(ParquetError::InvalidBitWidth(bit_width as usize));
        }
        if reader.bits_left() == 0 {
            return Ok(None);
        }

        let indicator_value = reader.get_vlq_int()?;

        let count = indicator_value >> 1;
        if count == 0 {
            return Err(ParquetError::EmptyRun);
        }
        let count = u32::try_from(count)?;

        if indicator_value & 1 == 1 {
            Ok(Some(HybridRun::BitPacked {
                num_groups: count,
                bit_width,
            }))
        } else {
            let value_width = bit_util::ceil(bit_width as usize, 8);
            let value = reader
                .get_aligned::<u32>(value_width)
                .ok_or_else(|| eof_err!("Not enough data for RLE run value"))?;
            Ok(Some(HybridRun::Rle { count, value }))
        }
    }
}

/// A RLE/Bit-Packing hybrid encoder.
///
/// Values are buffered 8 at a time; a value repeated at least 8 times is written as
/// an RLE run, everything else is collected into bit-packed runs of at most 63 groups.
pub struct RleEncoder {
    // Number of bits needed to encode the value. Must be in the range of [0, 32].
    bit_width: u8,

    // Underlying writer which holds an internal buffer.
    bit_writer: BitWriter,

    // Buffered values for bit-packed runs.
    buffered_values: [u32; 8],

    // Number of current buffered values. Must be less than 8.
    num_buffered_values: usize,

    // The current (also last) value that was written and the count of how many
    // times in a row that value has been seen.
    current_value: u64,

    // The number of repetitions for `current_value`. If this gets too high we'd
    // switch to use RLE encoding.
    repeat_count: usize,

    // Number of bit-packed values in the current run. This doesn't include values
    // in `buffered_values`.
    bit_packed_count: usize,

    // The position of the indicator byte in the `bit_writer`.
    indicator_byte_pos: Option<usize>,
}

impl RleEncoder {
    pub fn new(bit_width: u8, buffer_len: usize) -> Self {
        let buffer = Vec::with_capacity(buffer_len);
        RleEncoder::new_from_buf(bit_width, buffer)
    }

    /// Initialize the encoder from existing `buffer`
    ///
    /// # Panics
    ///
    /// Panics if `bit_width` is larger than 32.
    pub fn new_from_buf(bit_width: u8, buffer: Vec<u8>) -> Self {
        assert!(
            bit_width as usize <= MAX_BIT_WIDTH,
            "bit width {bit_width} out of range"
        );
        let bit_writer = BitWriter::new_from_buf(buffer);
        RleEncoder {
            bit_width,
            bit_writer,
            buffered_values: [0; 8],
            num_buffered_values: 0,
            current_value: 0,
            repeat_count: 0,
            bit_packed_count: 0,
            indicator_byte_pos: None,
        }
    }

    /// Returns the maximum buffer size to encode `num_values` values with
    /// `bit_width`.
    pub fn max_buffer_size(bit_width: u8, num_values: usize) -> usize {
        // The maximum size occurs with the shortest possible runs of 8
        let num_runs = bit_util::ceil(num_values, 8);

        // The number of bytes in a run of 8
        let bytes_per_run = bit_width as usize;

        // The maximum size if stored as shortest possible bit packed runs of 8
        let bit_packed_max_size = num_runs + num_runs * bytes_per_run;

        // The length of `8` VLQ encoded
        let rle_len_prefix = 1;

        // The length of an RLE run of 8
        let min_rle_run_size = rle_len_prefix + bit_util::ceil(bit_width as usize, 8);

        // The maximum size if stored as shortest possible RLE runs of 8
        let rle_max_size = num_runs * min_rle_run_size;

        bit_packed_max_size.max(rle_max_size)
    }

    /// Encodes `value`, which must be representable with `bit_width` bits.
    #[inline]
    pub fn put(&mut self, value: u64) {
        // This function buffers 8 values at a time. After seeing 8 values, it
        // decides whether the current run should be encoded in bit-packed or RLE.
        if self.current_value == value {
            self.repeat_count += 1;
            if self.repeat_count > 8 {
                // A continuation of last value. No need to buffer.
                return;
            }
        } else {
            if self.repeat_count >= 8 {
                // The current RLE run has ended and we've gathered enough. Flush first.
                debug_assert_eq!(self.bit_packed_count, 0);
                self.flush_rle_run();
            }
            self.repeat_count = 1;
            self.current_value = value;
        }

        self.buffered_values[self.num_buffered_values] = value as u32;
        self.num_buffered_values += 1;
        if self.num_buffered_values == 8 {
            // Buffered values are full. Flush them.
            debug_assert_eq!(self.bit_packed_count % 8, 0);
            self.flush_buffered_values();
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bit_writer.bytes_written()
    }

    pub fn is_empty(&self) -> bool {
        self.bit_writer.bytes_written() == 0
    }

    #[inline]
    pub fn consume(mut self) -> Vec<u8> {
        self.flush();
        self.bit_writer.consume()
    }

    /// Borrow equivalent of the `consume` method.
    /// Call `clear()` after invoking this method.
    #[inline]
    pub fn flush_buffer(&mut self) -> &[u8] {
        self.flush();
        self.bit_writer.flush_buffer()
    }

    /// Clears the internal state so this encoder can be reused (e.g., after becoming
    /// full).
    #[inline]
    pub fn clear(&mut self) {
        self.bit_writer.clear();
        self.num_buffered_values = 0;
        self.current_value = 0;
        self.repeat_count = 0;
        self.bit_packed_count = 0;
        self.indicator_byte_pos = None;
    }

    /// Flushes all remaining values and return the final byte buffer maintained by the
    /// internal writer.
    #[inline]
    pub fn flush(&mut self) {
        if self.bit_packed_count > 0 || self.repeat_count > 0 || self.num_buffered_values > 0 {
            let all_repeat = self.bit_packed_count == 0
                && (self.repeat_count == self.num_buffered_values || self.num_buffered_values == 0);
            if self.repeat_count > 0 && all_repeat {
                self.flush_rle_run();
            } else {
                // Buffer the last group of bit-packed values to 8 by padding with 0s.
                if self.num_buffered_values > 0 {
                    while self.num_buffered_values < 8 {
                        self.buffered_values[self.num_buffered_values] = 0;
                        self.num_buffered_values += 1;
                    }
                }
                self.bit_packed_count += self.num_buffered_values;
                self.flush_bit_packed_run(true);
                self.repeat_count = 0;
            }
        }
    }

    fn flush_rle_run(&mut self) {
        debug_assert!(self.repeat_count > 0);
        let indicator_value = self.repeat_count << 1;
        self.bit_writer.put_vlq_int(indicator_value as u64);
        self.bit_writer.put_aligned(
            self.current_value,
            bit_util::ceil(self.bit_width as usize, 8),
        );
        self.num_buffered_values = 0;
        self.repeat_count = 0;
    }

    fn flush_bit_packed_run(&mut self, update_indicator_byte: bool) {
        let indicator_byte_pos = match self.indicator_byte_pos {
            Some(pos) => pos,
            None => {
                let pos = self.bit_writer.skip(1);
                self.indicator_byte_pos = Some(pos);
                pos
            }
        };

        // Write the buffered group as bit-packed literals
        let width = self.bit_width as usize;
        if self.num_buffered_values > 0 && width > 0 {
            let mut packed = [0_u8; MAX_BIT_WIDTH];
            bit_pack::pack_group(&self.buffered_values, &mut packed, width);
            self.bit_writer.put_aligned_slice(&packed[..width]);
        }
        self.num_buffered_values = 0;

        if update_indicator_byte {
            // Write the indicator byte to the reserved position in `bit_writer`
            let num_groups = self.bit_packed_count / 8;
            let indicator_byte = ((num_groups << 1) | 1) as u64;
            self.bit_writer
                .put_aligned_offset(indicator_byte, 1, indicator_byte_pos);
            self.indicator_byte_pos = None;
            self.bit_packed_count = 0;
        }
    }

    #[inline(never)]
    fn flush_buffered_values(&mut self) {
        if self.repeat_count >= 8 {
            self.num_buffered_values = 0;
            if self.bit_packed_count > 0 {
                // In this case we choose RLE encoding. Flush the current buffered values
                // as bit-packed encoding.
                debug_assert_eq!(self.bit_packed_count % 8, 0);
                self.flush_bit_packed_run(true)
            }
            return;
        }

        self.bit_packed_count += self.num_buffered_values;
        let num_groups = self.bit_packed_count / 8;
        if num_groups + 1 >= MAX_GROUPS_PER_BIT_PACKED_RUN {
            // We've reached the maximum value that can be hold in a single bit-packed
            // run.
            self.flush_bit_packed_run(true);
        } else {
            self.flush_bit_packed_run(false);
        }
        self.repeat_count = 0;
    }
}

/// A RLE/Bit-Packing hybrid decoder.
///
/// Runs are read lazily, one header at a time. Bit-packed runs are unpacked a group of
/// 8 values at a time, so no more than 8 decoded values are ever held ahead of the
/// consumer.
pub struct RleDecoder {
    // Number of bits used to encode the value. Must be between [0, 32].
    bit_width: u8,

    // Bit reader loaded with input buffer.
    bit_reader: Option<BitReader>,

    // The remaining number of values in RLE for this run
    rle_left: u32,

    // The remaining number of values in Bit-Packing for this run, excluding the
    // ones already unpacked into `unpacked`
    bit_packed_left: u32,

    // The current value for the case of RLE mode
    current_value: u32,

    // The most recently unpacked group and the number of its values not yet consumed
    unpacked: [u32; 8],
    unpacked_left: usize,
}

impl RleDecoder {
    pub fn new(bit_width: u8) -> Self {
        RleDecoder {
            bit_width,
            bit_reader: None,
            rle_left: 0,
            bit_packed_left: 0,
            current_value: 0,
            unpacked: [0; 8],
            unpacked_left: 0,
        }
    }

    pub fn bit_width(&self) -> u8 {
        self.bit_width
    }

    /// Resets the decoder to read from `data`.
    #[inline]
    pub fn set_data(&mut self, data: Bytes) {
        if let Some(ref mut bit_reader) = self.bit_reader {
            bit_reader.reset(data);
        } else {
            self.bit_reader = Some(BitReader::new(data));
        }
        self.rle_left = 0;
        self.bit_packed_left = 0;
        self.unpacked_left = 0;
    }

    /// Returns the next value, or `None` once the stream is exhausted.
    pub fn get(&mut self) -> Result<Option<u32>> {
        let mut buffer = [0];
        Ok(match self.get_batch(&mut buffer)? {
            0 => None,
            _ => Some(buffer[0]),
        })
    }

    /// Fills `buffer` with decoded values and returns how many were written.
    ///
    /// Fewer values than `buffer.len()` are returned only if the stream ends cleanly on
    /// a run boundary; a stream that ends inside a run is an error.
    #[inline(never)]
    pub fn get_batch(&mut self, buffer: &mut [u32]) -> Result<usize> {
        let mut values_read = 0;
        while values_read < buffer.len() {
            let remaining = &mut buffer[values_read..];
            if self.rle_left > 0 {
                let num_values = cmp::min(remaining.len(), self.rle_left as usize);
                remaining[..num_values].fill(self.current_value);
                self.rle_left -= num_values as u32;
                values_read += num_values;
            } else if self.unpacked_left > 0 {
                let num_values = cmp::min(remaining.len(), self.unpacked_left);
                let start = 8 - self.unpacked_left;
                remaining[..num_values].copy_from_slice(&self.unpacked[start..start + num_values]);
                self.unpacked_left -= num_values;
                values_read += num_values;
            } else if self.bit_packed_left > 0 {
                self.unpack_next_group()?;
            } else if !self.reload()? {
                break;
            }
        }

        Ok(values_read)
    }

    /// Skips up to `num_values` values, returning how many were skipped.
    #[inline(never)]
    pub fn skip(&mut self, num_values: usize) -> Result<usize> {
        let mut values_skipped = 0;
        while values_skipped < num_values {
            let remaining = num_values - values_skipped;
            if self.rle_left > 0 {
                let n = cmp::min(remaining, self.rle_left as usize);
                self.rle_left -= n as u32;
                values_skipped += n;
            } else if self.unpacked_left > 0 {
                let n = cmp::min(remaining, self.unpacked_left);
                self.unpacked_left -= n;
                values_skipped += n;
            } else if self.bit_packed_left > 0 {
                let whole_groups = cmp::min(remaining, self.bit_packed_left as usize) / 8;
                if whole_groups == 0 {
                    self.unpack_next_group()?;
                    continue;
                }
                let width = self.bit_width as usize;
                let bit_reader = self.reader()?;
                if bit_reader.get_aligned_slice(whole_groups * width).is_none() {
                    return Err(eof_err!("Not enough data for bit-packed run"));
                }
                self.bit_packed_left -= (whole_groups * 8) as u32;
                values_skipped += whole_groups * 8;
            } else if !self.reload()? {
                break;
            }
        }

        Ok(values_skipped)
    }

    fn reader(&mut self) -> Result<&mut BitReader> {
        self.bit_reader
            .as_mut()
            .ok_or_else(|| general_err!("RleDecoder used before set_data"))
    }

    fn unpack_next_group(&mut self) -> Result<()> {
        let width = self.bit_width as usize;
        if width == 0 {
            self.unpacked = [0; 8];
        } else {
            let bit_reader = self
                .bit_reader
                .as_mut()
                .ok_or_else(|| general_err!("RleDecoder used before set_data"))?;
            let group = bit_reader
                .get_aligned_slice(width)
                .ok_or_else(|| eof_err!("Not enough data for bit-packed run"))?;
            bit_pack::unpack8(group, &mut self.unpacked, width)?;
        }
        self.unpacked_left = 8;
        self.bit_packed_left -= 8;
        Ok(())
    }

    #[inline]
    fn reload(&mut self) -> Result<bool> {
        let bit_width = self.bit_width;
        match HybridRun::read(self.reader()?, bit_width)? {
            Some(HybridRun::Rle { count, value }) => {
                self.rle_left = count;
                self.current_value = value;
                Ok(true)
            }
            Some(HybridRun::BitPacked { num_groups, .. }) => {
                self.bit_packed_left = num_groups
                    .checked_mul(8)
                    .ok_or_else(|| corrupt_err!("bit-packed run of {} groups", num_groups))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
