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
//! Contains all supported encoders for Parquet.

use std::{cmp, marker::PhantomData};

use bytes::Bytes;

use crate::basic::*;
use crate::data_type::private::ParquetValueType;
use crate::data_type::*;
use crate::encodings::rle::RleEncoder;
use crate::errors::{ParquetError, Result};
use crate::util::bit_util::{num_required_bits, BitWriter};

pub use dict_encoder::DictEncoder;

mod dict_encoder;

pub(crate) mod private {
    use super::*;

    /// Counterpart of [`GetDecoder`](crate::encodings::decoding::private::GetDecoder),
    /// restricting the non-PLAIN value encoders to the types they apply to.
    pub trait GetEncoder {
        fn get_encoder<T: DataType<T = Self>>(encoding: Encoding) -> Result<Box<dyn Encoder<T>>> {
            get_encoder_default(encoding)
        }
    }

    fn get_encoder_default<T: DataType>(encoding: Encoding) -> Result<Box<dyn Encoder<T>>> {
        match encoding {
            Encoding::PLAIN => Ok(Box::new(PlainEncoder::new())),
            Encoding::RLE_DICTIONARY | Encoding::PLAIN_DICTIONARY => Err(general_err!(
                "Cannot initialize this encoding through this function"
            )),
            e => Err(unsupported_encoding_err!(
                "Encoding {} is not supported for type {}",
                e,
                T::get_physical_type()
            )),
        }
    }

    impl GetEncoder for bool {
        fn get_encoder<T: DataType<T = Self>>(encoding: Encoding) -> Result<Box<dyn Encoder<T>>> {
            match encoding {
                Encoding::RLE => Ok(Box::new(RleValueEncoder::new())),
                _ => get_encoder_default(encoding),
            }
        }
    }

    impl GetEncoder for i32 {
        fn get_encoder<T: DataType<T = Self>>(encoding: Encoding) -> Result<Box<dyn Encoder<T>>> {
            match encoding {
                Encoding::DELTA_BINARY_PACKED => Ok(Box::new(DeltaBitPackEncoder::new())),
                _ => get_encoder_default(encoding),
            }
        }
    }

    impl GetEncoder for i64 {
        fn get_encoder<T: DataType<T = Self>>(encoding: Encoding) -> Result<Box<dyn Encoder<T>>> {
            match encoding {
                Encoding::DELTA_BINARY_PACKED => Ok(Box::new(DeltaBitPackEncoder::new())),
                _ => get_encoder_default(encoding),
            }
        }
    }

    impl GetEncoder for f32 {}
    impl GetEncoder for f64 {}
    impl GetEncoder for Int96 {}
    impl GetEncoder for ByteArray {}
    impl GetEncoder for FixedLenByteArray {}
}

// ----------------------------------------------------------------------
// Encoders

/// An Parquet encoder for the data type `T`.
///
/// Currently this allocates internal buffers for the encoded values. After done putting
/// values, caller should call `flush_buffer()` to get an immutable buffer pointer.
pub trait Encoder<T: DataType>: Send {
    /// Encodes data from `values`.
    fn put(&mut self, values: &[T::T]) -> Result<()>;

    /// Returns the encoding type of this encoder.
    fn encoding(&self) -> Encoding;

    /// Returns an estimate of the encoded data, in bytes.
    /// Method call must be O(1).
    fn estimated_data_encoded_size(&self) -> usize;

    /// Flushes the underlying byte buffer that's being processed by this encoder, and
    /// return the immutable copy of it. This will also reset the internal state.
    fn flush_buffer(&mut self) -> Result<Bytes>;
}

/// Gets a encoder for the particular data type `T` and encoding `encoding`.
///
/// Dictionary encodings are not created here, see [`DictEncoder`].
pub fn get_encoder<T: DataType>(encoding: Encoding) -> Result<Box<dyn Encoder<T>>> {
    use self::private::GetEncoder;
    T::T::get_encoder(encoding)
}

// ----------------------------------------------------------------------
// Plain encoding

/// Plain encoding that supports all types.
/// Values are encoded back to back.
/// The plain encoding is used whenever a more efficient encoding can not be used.
/// It stores the data in the following format:
/// - BOOLEAN - 1 bit per value, 0 is false; 1 is true.
/// - INT32 - 4 bytes per value, stored as little-endian.
/// - INT64 - 8 bytes per value, stored as little-endian.
/// - INT96 - 12 bytes per value, stored as little-endian.
/// - FLOAT - 4 bytes per value, stored as IEEE little-endian.
/// - DOUBLE - 8 bytes per value, stored as IEEE little-endian.
/// - BYTE_ARRAY - 4 byte length stored as little endian, followed by bytes.
/// - FIXED_LEN_BYTE_ARRAY - just the bytes are stored.
pub struct PlainEncoder<T: DataType> {
    buffer: Vec<u8>,
    bit_writer: BitWriter,
    _phantom: PhantomData<T>,
}

impl<T: DataType> Default for PlainEncoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DataType> PlainEncoder<T> {
    /// Creates new plain encoder.
    pub fn new() -> Self {
        Self {
            buffer: vec![],
            bit_writer: BitWriter::new(256),
            _phantom: PhantomData,
        }
    }
}

impl<T: DataType> Encoder<T> for PlainEncoder<T> {
    #[cold]
    fn encoding(&self) -> Encoding {
        Encoding::PLAIN
    }

    fn estimated_data_encoded_size(&self) -> usize {
        self.buffer.len() + self.bit_writer.bytes_written()
    }

    #[inline]
    fn flush_buffer(&mut self) -> Result<Bytes> {
        self.buffer.extend_from_slice(self.bit_writer.flush_buffer());
        self.bit_writer.clear();
        Ok(std::mem::take(&mut self.buffer).into())
    }

    #[inline]
    fn put(&mut self, values: &[T::T]) -> Result<()> {
        T::T::encode(values, &mut self.buffer, &mut self.bit_writer)?;
        Ok(())
    }
}

// ----------------------------------------------------------------------
// RLE encoding

const DEFAULT_RLE_BUFFER_LEN: usize = 1024;

/// RLE/Bit-Packing hybrid encoding for boolean values.
///
/// The encoded stream is prefixed with its length as a 4 byte little-endian integer.
pub struct RleValueEncoder<T: DataType> {
    // Buffer with raw values that we collect,
    // when flushing buffer they are encoded using RLE encoder
    encoder: Option<RleEncoder>,
    _phantom: PhantomData<T>,
}

impl<T: DataType> Default for RleValueEncoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DataType> RleValueEncoder<T> {
    /// Creates new rle value encoder.
    pub fn new() -> Self {
        Self {
            encoder: None,
            _phantom: PhantomData,
        }
    }

    fn new_encoder() -> RleEncoder {
        let mut buffer = Vec::with_capacity(DEFAULT_RLE_BUFFER_LEN);
        // Reserve space for length
        buffer.extend_from_slice(&[0; 4]);
        RleEncoder::new_from_buf(1, buffer)
    }
}

impl<T: DataType<T = bool>> Encoder<T> for RleValueEncoder<T> {
    #[inline]
    fn put(&mut self, values: &[T::T]) -> Result<()> {
        let rle_encoder = self.encoder.get_or_insert_with(Self::new_encoder);
        for value in values {
            rle_encoder.put(*value as u64)
        }
        Ok(())
    }

    #[cold]
    fn encoding(&self) -> Encoding {
        Encoding::RLE
    }

    #[inline]
    fn estimated_data_encoded_size(&self) -> usize {
        match self.encoder {
            Some(ref enc) => enc.len(),
            None => 0,
        }
    }

    #[inline]
    fn flush_buffer(&mut self) -> Result<Bytes> {
        let rle_encoder = self.encoder.take().unwrap_or_else(Self::new_encoder);

        // Flush all encoder buffers and raw values
        let mut buf = rle_encoder.consume();

        let len = i32::try_from(buf.len() - 4)?;
        buf[..4].copy_from_slice(&len.to_le_bytes());

        Ok(buf.into())
    }
}

// ----------------------------------------------------------------------
// DELTA_BINARY_PACKED encoding

const MAX_PAGE_HEADER_WRITER_SIZE: usize = 32;
const DEFAULT_BIT_WRITER_SIZE: usize = 1024 * 1024;
const DEFAULT_NUM_MINI_BLOCKS: usize = 4;

/// Integer types that can be delta encoded.
pub trait DeltaBitPackValue: Copy {
    /// Number of values per mini block, chosen so mini blocks decode efficiently.
    const MINI_BLOCK_SIZE: usize;

    fn to_i64(self) -> i64;

    /// `self - other`, wrapping at the width of the type.
    fn wrapping_delta(self, other: Self) -> i64;

    /// `left - right` as an unsigned offset, wrapping at the width of the type.
    fn delta_offset(left: i64, right: i64) -> u64;
}

impl DeltaBitPackValue for i32 {
    const MINI_BLOCK_SIZE: usize = 32;

    fn to_i64(self) -> i64 {
        self as i64
    }

    fn wrapping_delta(self, other: Self) -> i64 {
        self.wrapping_sub(other) as i64
    }

    fn delta_offset(left: i64, right: i64) -> u64 {
        // Conversion of i32 -> u32 -> u64 is to avoid non-zero left most bytes in int repr
        (left as i32).wrapping_sub(right as i32) as u32 as u64
    }
}

impl DeltaBitPackValue for i64 {
    const MINI_BLOCK_SIZE: usize = 64;

    fn to_i64(self) -> i64 {
        self
    }

    fn wrapping_delta(self, other: Self) -> i64 {
        self.wrapping_sub(other)
    }

    fn delta_offset(left: i64, right: i64) -> u64 {
        left.wrapping_sub(right) as u64
    }
}

/// Delta bit packed encoder.
/// Consists of a header followed by blocks of delta encoded values binary packed.
///
/// Delta-binary-packing:
/// ```shell
///   [page-header] [block 1], [block 2], ... [block N]
/// ```
///
/// Each page header consists of:
/// ```shell
///   [block size] [number of miniblocks in a block] [total value count] [first value]
/// ```
///
/// Each block consists of:
/// ```shell
///   [min delta] [list of bitwidths of miniblocks] [miniblocks]
/// ```
///
/// Current implementation writes values in `put` method, multiple calls to `put` to
/// existing block or start new block if block size is exceeded. Calling `flush_buffer`
/// writes out all data and resets internal state, including page header.
///
/// Supports only INT32 and INT64.
pub struct DeltaBitPackEncoder<T: DataType> {
    page_header_writer: BitWriter,
    bit_writer: BitWriter,
    total_values: usize,
    first_value: i64,
    current_value: T::T,
    block_size: usize,
    mini_block_size: usize,
    num_mini_blocks: usize,
    values_in_block: usize,
    deltas: Vec<i64>,
}

impl<T: DataType> Default for DeltaBitPackEncoder<T>
where
    T::T: DeltaBitPackValue,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DataType> DeltaBitPackEncoder<T>
where
    T::T: DeltaBitPackValue,
{
    /// Creates new delta bit packed encoder.
    pub fn new() -> Self {
        let mini_block_size = T::T::MINI_BLOCK_SIZE;
        let num_mini_blocks = DEFAULT_NUM_MINI_BLOCKS;
        let block_size = mini_block_size * num_mini_blocks;
        debug_assert_eq!(block_size % 128, 0);

        DeltaBitPackEncoder {
            page_header_writer: BitWriter::new(MAX_PAGE_HEADER_WRITER_SIZE),
            bit_writer: BitWriter::new(DEFAULT_BIT_WRITER_SIZE),
            total_values: 0,
            first_value: 0,
            current_value: T::T::default(), // current value to keep adding deltas
            block_size, // can write fewer values than block size for last block
            mini_block_size,
            num_mini_blocks,
            values_in_block: 0, // will be at most block_size
            deltas: vec![0; block_size],
        }
    }

    /// Writes page header for blocks, this method is invoked when we are done encoding
    /// values. It is also okay to encode when no values have been provided
    fn write_page_header(&mut self) {
        // Write the size of each block
        self.page_header_writer.put_vlq_int(self.block_size as u64);
        // Write the number of mini blocks
        self.page_header_writer
            .put_vlq_int(self.num_mini_blocks as u64);
        // Write the number of all values (including non-encoded first value)
        self.page_header_writer
            .put_vlq_int(self.total_values as u64);
        // Write first value
        self.page_header_writer.put_zigzag_vlq_int(self.first_value);
    }

    // Write current delta buffer (<= 'block size' values) into bit writer
    #[inline(never)]
    fn flush_block_values(&mut self) {
        if self.values_in_block == 0 {
            return;
        }

        let min_delta = self.deltas[..self.values_in_block]
            .iter()
            .copied()
            .min()
            .unwrap_or_default();

        // Write min delta
        self.bit_writer.put_zigzag_vlq_int(min_delta);

        // Slice to store bit width for each mini block
        let offset = self.bit_writer.skip(self.num_mini_blocks);

        for i in 0..self.num_mini_blocks {
            // Find how many values we need to encode - either block size or whatever
            // values left
            let n = cmp::min(self.mini_block_size, self.values_in_block);
            if n == 0 {
                // Trailing mini blocks hold no values, their width is ignored by readers
                for j in i..self.num_mini_blocks {
                    self.bit_writer.write_at(offset + j, 0);
                }
                break;
            }

            let start = i * self.mini_block_size;
            let mini_block = &self.deltas[start..start + n];

            // Compute the max delta in current mini block
            let max_delta = mini_block.iter().copied().max().unwrap_or(min_delta);

            // Compute bit width to store (max_delta - min_delta)
            let bit_width =
                num_required_bits(T::T::delta_offset(max_delta, min_delta)) as usize;
            self.bit_writer.write_at(offset + i, bit_width as u8);

            // Encode values in current mini block using min_delta and bit_width
            for delta in mini_block {
                let packed_value = T::T::delta_offset(*delta, min_delta);
                self.bit_writer.put_value(packed_value, bit_width);
            }

            // Pad the last block (n < mini_block_size)
            for _ in n..self.mini_block_size {
                self.bit_writer.put_value(0, bit_width);
            }

            self.values_in_block -= n;
        }

        debug_assert_eq!(self.values_in_block, 0);
    }
}

impl<T: DataType> Encoder<T> for DeltaBitPackEncoder<T>
where
    T::T: DeltaBitPackValue,
{
    fn put(&mut self, values: &[T::T]) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }

        // Define values to encode, initialize state
        let mut idx = if self.total_values == 0 {
            self.first_value = values[0].to_i64();
            self.current_value = values[0];
            1
        } else {
            0
        };
        // Add all values (including first value)
        self.total_values += values.len();

        // Write block
        while idx < values.len() {
            let value = values[idx];
            self.deltas[self.values_in_block] = value.wrapping_delta(self.current_value);
            self.current_value = value;
            idx += 1;
            self.values_in_block += 1;
            if self.values_in_block == self.block_size {
                self.flush_block_values();
            }
        }
        Ok(())
    }

    #[cold]
    fn encoding(&self) -> Encoding {
        Encoding::DELTA_BINARY_PACKED
    }

    fn estimated_data_encoded_size(&self) -> usize {
        self.bit_writer.bytes_written()
    }

    fn flush_buffer(&mut self) -> Result<Bytes> {
        // Write remaining values
        self.flush_block_values();
        // Write page header with total values
        self.write_page_header();

        let mut buffer = Vec::new();
        buffer.extend_from_slice(self.page_header_writer.flush_buffer());
        buffer.extend_from_slice(self.bit_writer.flush_buffer());

        // Reset state
        self.page_header_writer.clear();
        self.bit_writer.clear();
        self.total_values = 0;
        self.first_value = 0;
        self.current_value = T::T::default();
        self.values_in_block = 0;

        Ok(buffer.into())
    }
}
