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
//! Contains all supported decoders for Parquet.

use num::traits::WrappingAdd;
use num::FromPrimitive;
use std::{cmp, marker::PhantomData, mem, sync::Arc};

use bytes::Bytes;

use super::dictionary::Dictionary;
use super::rle::RleDecoder;

use crate::basic::*;
use crate::data_type::private::ParquetValueType;
use crate::data_type::*;
use crate::errors::{ParquetError, Result};
use crate::schema::types::ColumnDescPtr;
use crate::util::bit_pack::MAX_BIT_WIDTH;
use crate::util::bit_util::{self, BitReader, FromBytes};

pub(crate) mod private {
    use super::*;

    /// A trait that allows getting a [`Decoder`] implementation for a [`DataType`] with
    /// the corresponding [`ParquetValueType`]. This is necessary to support
    /// [`Decoder`] implementations that may not be applicable for all [`DataType`]
    /// and by extension all [`ParquetValueType`]
    pub trait GetDecoder {
        fn get_decoder<T: DataType<T = Self>>(
            descr: ColumnDescPtr,
            encoding: Encoding,
        ) -> Result<Box<dyn Decoder<T>>> {
            get_decoder_default(descr, encoding)
        }
    }

    fn get_decoder_default<T: DataType>(
        descr: ColumnDescPtr,
        encoding: Encoding,
    ) -> Result<Box<dyn Decoder<T>>> {
        match encoding {
            Encoding::PLAIN => Ok(Box::new(PlainDecoder::new(descr.type_length()))),
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

    impl GetDecoder for bool {
        fn get_decoder<T: DataType<T = Self>>(
            descr: ColumnDescPtr,
            encoding: Encoding,
        ) -> Result<Box<dyn Decoder<T>>> {
            match encoding {
                Encoding::RLE => Ok(Box::new(RleValueDecoder::new())),
                _ => get_decoder_default(descr, encoding),
            }
        }
    }

    impl GetDecoder for i32 {
        fn get_decoder<T: DataType<T = Self>>(
            descr: ColumnDescPtr,
            encoding: Encoding,
        ) -> Result<Box<dyn Decoder<T>>> {
            match encoding {
                Encoding::DELTA_BINARY_PACKED => Ok(Box::new(DeltaBitPackDecoder::new())),
                _ => get_decoder_default(descr, encoding),
            }
        }
    }

    impl GetDecoder for i64 {
        fn get_decoder<T: DataType<T = Self>>(
            descr: ColumnDescPtr,
            encoding: Encoding,
        ) -> Result<Box<dyn Decoder<T>>> {
            match encoding {
                Encoding::DELTA_BINARY_PACKED => Ok(Box::new(DeltaBitPackDecoder::new())),
                _ => get_decoder_default(descr, encoding),
            }
        }
    }

    impl GetDecoder for f32 {}
    impl GetDecoder for f64 {}
    impl GetDecoder for Int96 {}
    impl GetDecoder for ByteArray {}
    impl GetDecoder for FixedLenByteArray {}
}

// ----------------------------------------------------------------------
// Decoders

/// A Parquet decoder for the data type `T`.
pub trait Decoder<T: DataType>: Send {
    /// Sets the data to decode to be `data`, which holds at most `num_values` values.
    fn set_data(&mut self, data: Bytes, num_values: usize) -> Result<()>;

    /// Consumes values from this decoder and write the results to `buffer`. This will try
    /// to fill up `buffer`.
    ///
    /// Returns the actual number of values decoded, which is equal to `buffer.len()`
    /// unless fewer values are left. Running out of bytes before that is an error.
    fn get(&mut self, buffer: &mut [T::T]) -> Result<usize>;

    /// Returns the number of values left in this decoder stream.
    fn values_left(&self) -> usize;

    /// Returns the encoding for this decoder.
    fn encoding(&self) -> Encoding;

    /// Skip the specified number of values in this decoder stream.
    fn skip(&mut self, num_values: usize) -> Result<usize>;
}

/// Gets a decoder for the column descriptor `descr` and encoding type `encoding`.
///
/// Dictionary encodings are not created here, see [`DictDecoder`].
///
/// NOTE: the primitive type in `descr` MUST match the data type `T`.
pub fn get_decoder<T: DataType>(
    descr: ColumnDescPtr,
    encoding: Encoding,
) -> Result<Box<dyn Decoder<T>>> {
    use self::private::GetDecoder;
    T::T::get_decoder(descr, encoding)
}

// ----------------------------------------------------------------------
// PLAIN Decoding

#[derive(Default)]
pub struct PlainDecoderDetails {
    // The remaining number of values in the byte array
    pub(crate) num_values: usize,

    // The current starting index in the byte array. Not used when `T` is bool.
    pub(crate) start: usize,

    // The length for the type `T`. Only used when `T` is `FixedLenByteArrayType`
    pub(crate) type_length: i32,

    // The byte array to decode from. Not set if `T` is bool.
    pub(crate) data: Option<Bytes>,

    // Read `data` bit by bit. Only set if `T` is bool.
    pub(crate) bit_reader: Option<BitReader>,
}

/// Plain decoding that supports all types.
/// Values are encoded back to back. For native types, data is encoded as little endian.
/// Floating point types are encoded in IEEE.
/// See [`PlainEncoder`](crate::encodings::encoding::PlainEncoder) for more information.
pub struct PlainDecoder<T: DataType> {
    // The binary details needed for decoding
    inner: PlainDecoderDetails,

    // To allow `T` in the generic parameter for this struct. This doesn't take any
    // space.
    _phantom: PhantomData<T>,
}

impl<T: DataType> PlainDecoder<T> {
    /// Creates new plain decoder.
    pub fn new(type_length: i32) -> Self {
        PlainDecoder {
            inner: PlainDecoderDetails {
                type_length,
                ..Default::default()
            },
            _phantom: PhantomData,
        }
    }
}

impl<T: DataType> Decoder<T> for PlainDecoder<T> {
    #[inline]
    fn set_data(&mut self, data: Bytes, num_values: usize) -> Result<()> {
        T::T::set_data(&mut self.inner, data, num_values);
        Ok(())
    }

    #[inline]
    fn values_left(&self) -> usize {
        self.inner.num_values
    }

    #[inline]
    fn encoding(&self) -> Encoding {
        Encoding::PLAIN
    }

    #[inline]
    fn get(&mut self, buffer: &mut [T::T]) -> Result<usize> {
        T::T::decode(buffer, &mut self.inner)
    }

    #[inline]
    fn skip(&mut self, num_values: usize) -> Result<usize> {
        T::T::skip(&mut self.inner, num_values)
    }
}

// ----------------------------------------------------------------------
// RLE_DICTIONARY/PLAIN_DICTIONARY Decoding

/// Dictionary decoder.
///
/// The data of a dictionary encoded page is one byte holding the bit width of the keys,
/// followed by the keys as an RLE/bit-packed hybrid stream. Keys are resolved against
/// the [`Dictionary`] of the column chunk.
/// See [`DictEncoder`](crate::encodings::encoding::DictEncoder) for more information.
pub struct DictDecoder<T: DataType> {
    // The dictionary, which maps ids to the values
    dictionary: Option<Arc<Dictionary<T>>>,

    // The decoder for the value ids
    rle_decoder: Option<RleDecoder>,

    // Number of values left in the data stream
    num_values: usize,

    // Scratch space for decoded keys
    keys: Vec<u32>,
}

impl<T: DataType> Default for DictDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DataType> DictDecoder<T> {
    /// Creates new dictionary decoder.
    pub fn new() -> Self {
        Self {
            dictionary: None,
            rle_decoder: None,
            num_values: 0,
            keys: vec![],
        }
    }

    /// Sets the dictionary keys are resolved against.
    pub fn set_dict(&mut self, dictionary: Arc<Dictionary<T>>) {
        self.dictionary = Some(dictionary);
    }

    fn parts(&mut self) -> Result<(&Dictionary<T>, &mut RleDecoder, &mut Vec<u32>)> {
        let dictionary = self
            .dictionary
            .as_deref()
            .ok_or_else(|| general_err!("Must call set_dict() first"))?;
        let rle = self
            .rle_decoder
            .as_mut()
            .ok_or_else(|| general_err!("set_data() must be called before decode"))?;
        Ok((dictionary, rle, &mut self.keys))
    }
}

impl<T: DataType> Decoder<T> for DictDecoder<T> {
    fn set_data(&mut self, data: Bytes, num_values: usize) -> Result<()> {
        // First byte in `data` is bit width
        let bit_width = match data.first() {
            Some(width) => *width,
            None if num_values == 0 => 0,
            None => return Err(eof_err!("Not enough bytes to decode dictionary key width")),
        };
        if bit_width as usize > MAX_BIT_WIDTH {
            return Err(ParquetError::InvalidBitWidth(bit_width as usize));
        }
        let mut rle_decoder = RleDecoder::new(bit_width);
        rle_decoder.set_data(data.slice(data.len().min(1)..));
        self.num_values = num_values;
        self.rle_decoder = Some(rle_decoder);
        Ok(())
    }

    fn get(&mut self, buffer: &mut [T::T]) -> Result<usize> {
        let num_values = cmp::min(buffer.len(), self.num_values);
        let (dictionary, rle, keys) = self.parts()?;

        keys.clear();
        keys.resize(num_values, 0);
        let keys_read = rle.get_batch(keys)?;
        if keys_read != num_values {
            return Err(eof_err!(
                "Expected {} dictionary keys, got {}",
                num_values,
                keys_read
            ));
        }
        dictionary.resolve(keys, &mut buffer[..num_values])?;

        self.num_values -= num_values;
        Ok(num_values)
    }

    /// Number of values left in this decoder stream
    fn values_left(&self) -> usize {
        self.num_values
    }

    fn encoding(&self) -> Encoding {
        Encoding::RLE_DICTIONARY
    }

    fn skip(&mut self, num_values: usize) -> Result<usize> {
        let num_values = cmp::min(num_values, self.num_values);
        let (_, rle, _) = self.parts()?;
        let skipped = rle.skip(num_values)?;
        if skipped != num_values {
            return Err(eof_err!(
                "Expected to skip {} dictionary keys, skipped {}",
                num_values,
                skipped
            ));
        }
        self.num_values -= skipped;
        Ok(skipped)
    }
}

// ----------------------------------------------------------------------
// RLE Decoding

/// RLE/Bit-Packing hybrid decoding for boolean values.
///
/// The stream is prefixed by its length as a 4 byte little-endian integer.
/// See [`RleValueEncoder`](crate::encodings::encoding::RleValueEncoder) for more information.
pub struct RleValueDecoder<T: DataType> {
    values_left: usize,
    decoder: RleDecoder,
    buffer: Vec<u32>,
    _phantom: PhantomData<T>,
}

impl<T: DataType> Default for RleValueDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DataType> RleValueDecoder<T> {
    pub fn new() -> Self {
        Self {
            values_left: 0,
            decoder: RleDecoder::new(1),
            buffer: vec![],
            _phantom: PhantomData,
        }
    }
}

impl<T: DataType<T = bool>> Decoder<T> for RleValueDecoder<T> {
    #[inline]
    fn set_data(&mut self, data: Bytes, num_values: usize) -> Result<()> {
        const I32_SIZE: usize = mem::size_of::<i32>();
        if data.len() < I32_SIZE {
            return Err(eof_err!("Not enough bytes to decode RLE length prefix"));
        }
        let data_size = bit_util::read_num_bytes::<i32>(I32_SIZE, &data);
        let data_size = usize::try_from(data_size)
            .map_err(|_| corrupt_err!("Negative RLE data length {}", data_size))?;
        if I32_SIZE + data_size > data.len() {
            return Err(eof_err!(
                "RLE data length {} exceeds the {} bytes available",
                data_size,
                data.len() - I32_SIZE
            ));
        }

        self.decoder.set_data(data.slice(I32_SIZE..I32_SIZE + data_size));
        self.values_left = num_values;
        Ok(())
    }

    #[inline]
    fn values_left(&self) -> usize {
        self.values_left
    }

    #[inline]
    fn encoding(&self) -> Encoding {
        Encoding::RLE
    }

    #[inline]
    fn get(&mut self, buffer: &mut [T::T]) -> Result<usize> {
        let num_values = cmp::min(buffer.len(), self.values_left);
        self.buffer.clear();
        self.buffer.resize(num_values, 0);
        let values_read = self.decoder.get_batch(&mut self.buffer)?;
        if values_read != num_values {
            return Err(eof_err!(
                "Expected {} boolean values, got {}",
                num_values,
                values_read
            ));
        }
        for (slot, value) in buffer.iter_mut().zip(&self.buffer) {
            *slot = *value != 0;
        }
        self.values_left -= values_read;
        Ok(values_read)
    }

    #[inline]
    fn skip(&mut self, num_values: usize) -> Result<usize> {
        let num_values = cmp::min(num_values, self.values_left);
        let values_skipped = self.decoder.skip(num_values)?;
        if values_skipped != num_values {
            return Err(eof_err!("Not enough data to skip {} values", num_values));
        }
        self.values_left -= values_skipped;
        Ok(values_skipped)
    }
}

// ----------------------------------------------------------------------
// DELTA_BINARY_PACKED Decoding

/// Delta binary packed decoder.
/// Supports INT32 and INT64 types.
/// See [`DeltaBitPackEncoder`](crate::encodings::encoding::DeltaBitPackEncoder) for more
/// information.
pub struct DeltaBitPackDecoder<T: DataType> {
    bit_reader: BitReader,
    initialized: bool,

    // Header info
    /// The number of values in each block
    block_size: usize,
    /// The number of values that remain to be read in the current page
    values_left: usize,
    /// The number of mini-blocks in each block
    mini_blocks_per_block: usize,
    /// The number of values in each mini block
    values_per_mini_block: usize,

    // Per block info
    /// The minimum delta in the block
    min_delta: T::T,
    /// The byte offset of the end of the current block
    block_end_offset: usize,
    /// The index on the current mini block
    mini_block_idx: usize,
    /// The bit widths of each mini block in the current block
    mini_block_bit_widths: Vec<u8>,
    /// The number of values remaining in the current mini block
    mini_block_remaining: usize,

    /// The first value from the block header if not consumed
    first_value: Option<T::T>,
    /// The last value to compute offsets from
    last_value: T::T,
}

impl<T: DataType> Default for DeltaBitPackDecoder<T>
where
    T::T: Default + FromPrimitive + WrappingAdd + Copy + FromBytes,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DataType> DeltaBitPackDecoder<T>
where
    T::T: Default + FromPrimitive + WrappingAdd + Copy + FromBytes,
{
    /// Creates new delta bit packed decoder.
    pub fn new() -> Self {
        Self {
            bit_reader: BitReader::from(vec![]),
            initialized: false,
            block_size: 0,
            values_left: 0,
            mini_blocks_per_block: 0,
            values_per_mini_block: 0,
            min_delta: Default::default(),
            mini_block_idx: 0,
            mini_block_bit_widths: vec![],
            mini_block_remaining: 0,
            block_end_offset: 0,
            first_value: None,
            last_value: Default::default(),
        }
    }

    /// Returns the current offset, or an error if no data has been set
    pub fn get_offset(&self) -> Result<usize> {
        if !self.initialized {
            return Err(general_err!("Bit reader is not initialized"));
        }
        Ok(match self.values_left {
            // If we've exhausted this page report the end of the current block
            // as we may not have consumed the trailing padding
            //
            // The max is necessary to handle pages which don't contain more than
            // one value and therefore have no blocks, but still contain a page header
            0 => self.bit_reader.get_byte_offset().max(self.block_end_offset),
            _ => self.bit_reader.get_byte_offset(),
        })
    }

    /// Initializes the next block and the first mini block within it
    #[inline]
    fn next_block(&mut self) -> Result<()> {
        let min_delta = self.bit_reader.get_zigzag_vlq_int()?;

        self.min_delta =
            T::T::from_i64(min_delta).ok_or_else(|| corrupt_err!("'min_delta' too large"))?;

        let widths = self
            .bit_reader
            .get_aligned_slice(self.mini_blocks_per_block)
            .ok_or_else(|| eof_err!("insufficient mini block bit widths"))?;
        self.mini_block_bit_widths.clear();
        self.mini_block_bit_widths.extend_from_slice(widths);

        let max_bit_width = mem::size_of::<T::T>() * 8;
        let mut offset = self.bit_reader.get_byte_offset();
        let mut remaining = self.values_left;

        // Compute the end offset of the current block
        for b in &mut self.mini_block_bit_widths {
            if remaining == 0 {
                // Trailing mini blocks hold no values and may carry any bit width
                *b = 0;
            }
            if *b as usize > max_bit_width {
                return Err(ParquetError::InvalidBitWidth(*b as usize));
            }
            remaining = remaining.saturating_sub(self.values_per_mini_block);
            offset += *b as usize * self.values_per_mini_block / 8;
        }
        self.block_end_offset = offset;

        self.mini_block_remaining = self.values_per_mini_block;
        self.mini_block_idx = 0;

        Ok(())
    }

    /// Initializes the next mini block
    #[inline]
    fn next_mini_block(&mut self) -> Result<()> {
        if self.mini_block_idx + 1 < self.mini_block_bit_widths.len() {
            self.mini_block_idx += 1;
            self.mini_block_remaining = self.values_per_mini_block;
            Ok(())
        } else {
            self.next_block()
        }
    }

    fn read_header_value(&mut self, name: &str) -> Result<usize> {
        self.bit_reader
            .get_vlq_int()?
            .try_into()
            .map_err(|_| corrupt_err!("invalid '{}'", name))
    }
}

impl<T: DataType> Decoder<T> for DeltaBitPackDecoder<T>
where
    T::T: Default + FromPrimitive + WrappingAdd + Copy + FromBytes,
{
    // # of total values is derived from encoding
    #[inline]
    fn set_data(&mut self, data: Bytes, _index: usize) -> Result<()> {
        self.bit_reader = BitReader::new(data);
        self.initialized = true;

        // Read header information
        self.block_size = self.read_header_value("block_size")?;
        self.mini_blocks_per_block = self.read_header_value("mini_blocks_per_block")?;
        self.values_left = self.read_header_value("values_left")?;

        let first_value = self.bit_reader.get_zigzag_vlq_int()?;

        self.first_value = match self.values_left {
            0 => None,
            _ => Some(
                T::T::from_i64(first_value)
                    .ok_or_else(|| corrupt_err!("first value too large"))?,
            ),
        };

        if self.block_size == 0 || self.block_size % 128 != 0 {
            return Err(corrupt_err!(
                "'block_size' must be a multiple of 128, got {}",
                self.block_size
            ));
        }

        if self.mini_blocks_per_block == 0 || self.block_size % self.mini_blocks_per_block != 0 {
            return Err(corrupt_err!(
                "'block_size' must be a multiple of 'mini_blocks_per_block' got {} and {}",
                self.block_size,
                self.mini_blocks_per_block
            ));
        }

        // Reset decoding state
        self.mini_block_idx = 0;
        self.values_per_mini_block = self.block_size / self.mini_blocks_per_block;
        self.mini_block_remaining = 0;
        self.mini_block_bit_widths.clear();
        self.block_end_offset = 0;

        if self.values_per_mini_block % 32 != 0 {
            return Err(corrupt_err!(
                "'values_per_mini_block' must be a multiple of 32 got {}",
                self.values_per_mini_block
            ));
        }

        Ok(())
    }

    fn get(&mut self, buffer: &mut [T::T]) -> Result<usize> {
        if !self.initialized {
            return Err(general_err!("Bit reader is not initialized"));
        }
        let to_read = buffer.len().min(self.values_left);
        if to_read == 0 {
            return Ok(0);
        }

        let mut read = 0;
        if let Some(value) = self.first_value.take() {
            self.last_value = value;
            buffer[0] = value;
            read += 1;
            self.values_left -= 1;
        }

        while read != to_read {
            if self.mini_block_remaining == 0 {
                self.next_mini_block()?;
            }

            let bit_width = self.mini_block_bit_widths[self.mini_block_idx] as usize;
            let batch_to_read = self.mini_block_remaining.min(to_read - read);

            let batch_read = self
                .bit_reader
                .get_batch(&mut buffer[read..read + batch_to_read], bit_width);

            if batch_read != batch_to_read {
                return Err(eof_err!(
                    "Expected to read {} values from miniblock got {}",
                    batch_to_read,
                    batch_read
                ));
            }

            // At this point we have read the deltas to `buffer` we now need to offset
            // these to get back to the original values that were encoded
            for v in &mut buffer[read..read + batch_read] {
                // Deltas may have wrapped when encoded, e.g. i64::MAX - i64::MIN, so
                // `wrapping_add` restores the original value.
                *v = v
                    .wrapping_add(&self.min_delta)
                    .wrapping_add(&self.last_value);

                self.last_value = *v;
            }

            read += batch_read;
            self.mini_block_remaining -= batch_read;
            self.values_left -= batch_read;
        }

        Ok(to_read)
    }

    fn values_left(&self) -> usize {
        self.values_left
    }

    fn encoding(&self) -> Encoding {
        Encoding::DELTA_BINARY_PACKED
    }

    fn skip(&mut self, num_values: usize) -> Result<usize> {
        let mut buffer = vec![T::T::default(); num_values.min(self.values_left).min(1024)];
        let mut skipped = 0;
        while skipped < num_values && self.values_left > 0 {
            let batch = buffer.len().min(num_values - skipped);
            skipped += self.get(&mut buffer[..batch])?;
        }
        Ok(skipped)
    }
}

#[cfg(test)]
#[allow(clippy::approx_constant)]
mod tests {
    use super::{super::encoding::*, *};

    use crate::schema::types::ColumnDescriptor;
    use crate::util::test_common::rand_gen::RandGen;

    #[test]
    fn test_get_decoders() {
        // supported encodings
        create_and_check_decoder::<Int32Type>(Encoding::PLAIN, None);
        create_and_check_decoder::<Int32Type>(Encoding::DELTA_BINARY_PACKED, None);
        create_and_check_decoder::<Int64Type>(Encoding::DELTA_BINARY_PACKED, None);
        create_and_check_decoder::<BoolType>(Encoding::RLE, None);
        create_and_check_decoder::<ByteArrayType>(Encoding::PLAIN, None);

        // error when initializing
        create_and_check_decoder::<Int32Type>(
            Encoding::RLE_DICTIONARY,
            Some("Parquet error: Cannot initialize this encoding through this function"),
        );
        create_and_check_decoder::<Int32Type>(
            Encoding::PLAIN_DICTIONARY,
            Some("Parquet error: Cannot initialize this encoding through this function"),
        );

        // unsupported
        create_and_check_decoder::<ByteArrayType>(
            Encoding::DELTA_LENGTH_BYTE_ARRAY,
            Some("Unsupported encoding: Encoding DELTA_LENGTH_BYTE_ARRAY is not supported for type BYTE_ARRAY"),
        );
        create_and_check_decoder::<DoubleType>(
            Encoding::DELTA_BINARY_PACKED,
            Some("Unsupported encoding: Encoding DELTA_BINARY_PACKED is not supported for type DOUBLE"),
        );
        create_and_check_decoder::<Int32Type>(
            Encoding::BIT_PACKED,
            Some("Unsupported encoding: Encoding BIT_PACKED is not supported for type INT32"),
        );
    }

    #[test]
    fn test_plain_decode_int32() {
        let data = vec![42, 18, 52];
        let data_bytes = Int32Type::to_byte_array(&data[..]);
        let mut buffer = vec![0; 3];
        test_plain_decode::<Int32Type>(data_bytes.into(), 3, -1, &mut buffer[..], &data[..]);
    }

    #[test]
    fn test_plain_skip_int32() {
        let data = vec![42, 18, 52];
        let data_bytes = Int32Type::to_byte_array(&data[..]);
        test_plain_skip::<Int32Type>(data_bytes.into(), 3, 1, -1, &data[1..]);
    }

    #[test]
    fn test_plain_skip_all_int32() {
        let data = vec![42, 18, 52];
        let data_bytes = Int32Type::to_byte_array(&data[..]);
        test_plain_skip::<Int32Type>(data_bytes.into(), 3, 5, -1, &[]);
    }

    #[test]
    fn test_plain_decode_int64() {
        let data = vec![42, 18, 52];
        let data_bytes = Int64Type::to_byte_array(&data[..]);
        let mut buffer = vec![0; 3];
        test_plain_decode::<Int64Type>(data_bytes.into(), 3, -1, &mut buffer[..], &data[..]);
    }

    #[test]
    fn test_plain_decode_float() {
        let data = vec![3.14, 2.414, 12.51];
        let data_bytes = FloatType::to_byte_array(&data[..]);
        let mut buffer = vec![0.0; 3];
        test_plain_decode::<FloatType>(data_bytes.into(), 3, -1, &mut buffer[..], &data[..]);
    }

    #[test]
    fn test_plain_decode_double() {
        let data = vec![3.14f64, 2.414f64, 12.51f64];
        let data_bytes = DoubleType::to_byte_array(&data[..]);
        let mut buffer = vec![0.0f64; 3];
        test_plain_decode::<DoubleType>(data_bytes.into(), 3, -1, &mut buffer[..], &data[..]);
    }

    #[test]
    fn test_plain_decode_int96() {
        let data = vec![
            Int96::from(vec![11, 22, 33]),
            Int96::from(vec![44, 55, 66]),
            Int96::from(vec![10, 20, 30]),
            Int96::from(vec![40, 50, 60]),
        ];
        let data_bytes = Int96Type::to_byte_array(&data[..]);
        let mut buffer = vec![Int96::new(); 4];
        test_plain_decode::<Int96Type>(data_bytes.into(), 4, -1, &mut buffer[..], &data[..]);
    }

    #[test]
    fn test_plain_decode_bool() {
        let data = vec![
            false, true, false, false, true, false, true, true, false, true,
        ];
        let data_bytes = BoolType::to_byte_array(&data[..]);
        let mut buffer = vec![false; 10];
        test_plain_decode::<BoolType>(data_bytes.into(), 10, -1, &mut buffer[..], &data[..]);
    }

    #[test]
    fn test_plain_decode_bool_literals() {
        let mut buffer = vec![true; 5];
        test_plain_decode::<BoolType>(
            Bytes::from_static(&[0x00]),
            5,
            -1,
            &mut buffer[..],
            &[false; 5],
        );

        let mut buffer = vec![false; 3];
        test_plain_decode::<BoolType>(
            Bytes::from_static(&[0xFF]),
            3,
            -1,
            &mut buffer[..],
            &[true; 3],
        );
    }

    #[test]
    fn test_plain_decode_byte_array() {
        let data = Bytes::from_static(&[
            0x03, 0, 0, 0, b'1', b'2', b'3', 0, 0, 0, 0, 0x06, 0, 0, 0, b'A', b'B', b'C',
            b'D', b'E', b'F',
        ]);
        let expected = vec![
            ByteArray::from("123"),
            ByteArray::from(""),
            ByteArray::from("ABCDEF"),
        ];
        let mut buffer = vec![ByteArray::new(); 3];
        test_plain_decode::<ByteArrayType>(data, 3, -1, &mut buffer[..], &expected[..]);
    }

    #[test]
    fn test_plain_skip_byte_array() {
        let data = vec![ByteArray::from("hello"), ByteArray::from("parquet")];
        let data_bytes = ByteArrayType::to_byte_array(&data[..]);
        test_plain_skip::<ByteArrayType>(data_bytes.into(), 2, 1, -1, &data[1..]);
    }

    #[test]
    fn test_plain_decode_fixed_len_byte_array() {
        let data = vec![
            FixedLenByteArray::from(ByteArray::from("bird")),
            FixedLenByteArray::from(ByteArray::from("come")),
            FixedLenByteArray::from(ByteArray::from("flow")),
        ];
        let data_bytes = FixedLenByteArrayType::to_byte_array(&data[..]);
        let mut buffer = vec![FixedLenByteArray::default(); 3];
        test_plain_decode::<FixedLenByteArrayType>(
            data_bytes.into(),
            3,
            4,
            &mut buffer[..],
            &data[..],
        );
    }

    #[test]
    fn test_plain_decode_truncated() {
        let mut decoder = PlainDecoder::<Int32Type>::new(-1);
        decoder
            .set_data(Bytes::from_static(&[1, 0, 0, 0, 2, 0]), 2)
            .unwrap();
        let mut buffer = vec![0; 2];
        let err = decoder.get(&mut buffer).unwrap_err();
        assert!(matches!(err, ParquetError::TruncatedInput(_)), "{err}");

        let mut decoder = PlainDecoder::<BoolType>::new(-1);
        decoder.set_data(Bytes::from_static(&[0xFF]), 9).unwrap();
        let mut buffer = vec![false; 9];
        let err = decoder.get(&mut buffer).unwrap_err();
        assert!(matches!(err, ParquetError::TruncatedInput(_)), "{err}");

        let mut decoder = PlainDecoder::<ByteArrayType>::new(-1);
        decoder
            .set_data(Bytes::from_static(&[0x05, 0, 0, 0, b'a', b'b']), 1)
            .unwrap();
        let mut buffer = vec![ByteArray::new(); 1];
        let err = decoder.get(&mut buffer).unwrap_err();
        assert!(matches!(err, ParquetError::TruncatedInput(_)), "{err}");
    }

    #[test]
    fn test_dict_decoder() {
        let dictionary = Arc::new(Dictionary::<ByteArrayType>::from(vec![
            ByteArray::from("a"),
            ByteArray::from("bb"),
            ByteArray::from("ccc"),
        ]));
        // width 2, one bit-packed group: 2, 0, 1, 1, 2, 0, 0, 0
        let mut encoder = crate::encodings::rle::RleEncoder::new(2, 16);
        for key in [2, 0, 1, 1, 2] {
            encoder.put(key);
        }
        let mut data = vec![2];
        data.extend_from_slice(&encoder.consume());

        let mut decoder = DictDecoder::<ByteArrayType>::new();
        decoder.set_dict(dictionary);
        decoder.set_data(data.into(), 5).unwrap();
        assert_eq!(decoder.encoding(), Encoding::RLE_DICTIONARY);

        let mut buffer = vec![ByteArray::new(); 2];
        assert_eq!(decoder.get(&mut buffer).unwrap(), 2);
        assert_eq!(buffer, vec![ByteArray::from("ccc"), ByteArray::from("a")]);

        assert_eq!(decoder.skip(1).unwrap(), 1);
        assert_eq!(decoder.values_left(), 2);

        let mut buffer = vec![ByteArray::new(); 4];
        assert_eq!(decoder.get(&mut buffer).unwrap(), 2);
        assert_eq!(&buffer[..2], &[ByteArray::from("bb"), ByteArray::from("ccc")]);
        assert_eq!(decoder.get(&mut buffer).unwrap(), 0);
    }

    #[test]
    fn test_dict_decoder_out_of_range() {
        let dictionary = Arc::new(Dictionary::<Int32Type>::from(vec![7, 8]));
        // width 2, RLE run of three 3s
        let data = Bytes::from_static(&[2, 0x06, 0x03]);
        let mut decoder = DictDecoder::<Int32Type>::new();
        decoder.set_dict(dictionary);
        decoder.set_data(data, 3).unwrap();

        let mut buffer = vec![0; 3];
        let err = decoder.get(&mut buffer).unwrap_err();
        assert!(
            matches!(err, ParquetError::DictionaryIndexOutOfRange { index: 3, len: 2 }),
            "{err}"
        );
    }

    #[test]
    fn test_dict_decoder_errors() {
        let mut decoder = DictDecoder::<Int32Type>::new();
        decoder.set_data(Bytes::from_static(&[1, 0x02, 0x01]), 1).unwrap();
        let mut buffer = vec![0; 1];
        let err = decoder.get(&mut buffer).unwrap_err();
        assert_eq!(err.to_string(), "Parquet error: Must call set_dict() first");

        let err = decoder.set_data(Bytes::from_static(&[33, 0]), 1).unwrap_err();
        assert!(matches!(err, ParquetError::InvalidBitWidth(33)), "{err}");

        let err = decoder.set_data(Bytes::new(), 1).unwrap_err();
        assert!(matches!(err, ParquetError::TruncatedInput(_)), "{err}");

        // stream holds two keys, four are declared
        decoder.set_dict(Arc::new(Dictionary::from(vec![1, 2])));
        decoder.set_data(Bytes::from_static(&[1, 0x04, 0x01]), 4).unwrap();
        let mut buffer = vec![0; 4];
        let err = decoder.get(&mut buffer).unwrap_err();
        assert!(matches!(err, ParquetError::TruncatedInput(_)), "{err}");
    }

    #[test]
    fn test_rle_value_decode_bool_decode() {
        // Test multiple 'put' calls on the same encoder
        let data = vec![
            BoolType::gen_vec(-1, 256),
            BoolType::gen_vec(-1, 257),
            BoolType::gen_vec(-1, 126),
        ];
        test_rle_value_decode::<BoolType>(data);
    }

    #[test]
    fn test_rle_value_decode_bad_prefix() {
        let mut decoder = RleValueDecoder::<BoolType>::new();
        let err = decoder
            .set_data(Bytes::from_static(&[5, 0, 0, 0, 0x02]), 1)
            .unwrap_err();
        assert!(matches!(err, ParquetError::TruncatedInput(_)), "{err}");

        let err = decoder
            .set_data(Bytes::from_static(&[0xFF, 0xFF, 0xFF, 0xFF]), 1)
            .unwrap_err();
        assert!(matches!(err, ParquetError::CorruptPage(_)), "{err}");
    }

    #[test]
    fn test_delta_bit_packed_not_initialized() {
        let decoder = DeltaBitPackDecoder::<Int32Type>::new();
        assert!(decoder.get_offset().is_err());

        let mut decoder = DeltaBitPackDecoder::<Int32Type>::new();
        let mut buffer = vec![0; 1];
        let err = decoder.get(&mut buffer).unwrap_err();
        assert_eq!(err.to_string(), "Parquet error: Bit reader is not initialized");
    }

    #[test]
    fn test_delta_bit_packed_int32_empty() {
        let data = vec![vec![0; 0]];
        test_delta_bit_packed_decode::<Int32Type>(data);
    }

    #[test]
    fn test_delta_bit_packed_int32_repeat() {
        let block_data = vec![
            1, 2, 3, 4, 5, 6, 7, 8, 1, 2, 3, 4, 5, 6, 7, 8, 1, 2, 3, 4, 5, 6, 7, 8, 1, 2,
            3, 4, 5, 6, 7, 8,
        ];
        test_delta_bit_packed_decode::<Int32Type>(vec![block_data]);
    }

    #[test]
    fn test_skip_delta_bit_packed_int32_repeat() {
        let block_data = vec![
            1, 2, 3, 4, 5, 6, 7, 8, 1, 2, 3, 4, 5, 6, 7, 8, 1, 2, 3, 4, 5, 6, 7, 8, 1, 2,
            3, 4, 5, 6, 7, 8,
        ];
        test_skip::<Int32Type>(block_data.clone(), Encoding::DELTA_BINARY_PACKED, 10);
        test_skip::<Int32Type>(block_data, Encoding::DELTA_BINARY_PACKED, 100);
    }

    #[test]
    fn test_delta_bit_packed_int32_uneven() {
        let block_data = vec![1, -2, 3, -4, 5, 6, 7, 8, 9, 10, 11];
        test_delta_bit_packed_decode::<Int32Type>(vec![block_data]);
    }

    #[test]
    fn test_delta_bit_packed_int32_same_values() {
        let block_data = vec![
            127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127, 127,
        ];
        test_delta_bit_packed_decode::<Int32Type>(vec![block_data]);

        let block_data = vec![
            -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127, -127,
            -127, -127, -127,
        ];
        test_delta_bit_packed_decode::<Int32Type>(vec![block_data]);
    }

    #[test]
    fn test_delta_bit_packed_int32_min_max() {
        let block_data = vec![
            i32::MIN,
            i32::MIN,
            i32::MIN,
            i32::MAX,
            i32::MIN,
            i32::MAX,
            i32::MIN,
            i32::MAX,
        ];
        test_delta_bit_packed_decode::<Int32Type>(vec![block_data]);
    }

    #[test]
    fn test_delta_bit_packed_int32_multiple_blocks() {
        // Test multiple 'put' calls on the same encoder
        let data = vec![
            Int32Type::gen_vec(-1, 64),
            Int32Type::gen_vec(-1, 128),
            Int32Type::gen_vec(-1, 64),
        ];
        test_delta_bit_packed_decode::<Int32Type>(data);
    }

    #[test]
    fn test_delta_bit_packed_int32_data_across_blocks() {
        // Test multiple 'put' calls on the same encoder
        let data = vec![Int32Type::gen_vec(-1, 256), Int32Type::gen_vec(-1, 257)];
        test_delta_bit_packed_decode::<Int32Type>(data);
    }

    #[test]
    fn test_delta_bit_packed_int32_with_empty_blocks() {
        let data = vec![
            Int32Type::gen_vec(-1, 128),
            vec![0; 0],
            Int32Type::gen_vec(-1, 64),
        ];
        test_delta_bit_packed_decode::<Int32Type>(data);
    }

    #[test]
    fn test_delta_bit_packed_int64_empty() {
        let data = vec![vec![0; 0]];
        test_delta_bit_packed_decode::<Int64Type>(data);
    }

    #[test]
    fn test_delta_bit_packed_int64_min_max() {
        let block_data = vec![
            i64::MIN,
            i64::MAX,
            i64::MIN,
            i64::MAX,
            i64::MIN,
            i64::MAX,
            i64::MIN,
            i64::MAX,
        ];
        test_delta_bit_packed_decode::<Int64Type>(vec![block_data]);
    }

    #[test]
    fn test_delta_bit_packed_int64_multiple_blocks() {
        // Test multiple 'put' calls on the same encoder
        let data = vec![
            Int64Type::gen_vec(-1, 64),
            Int64Type::gen_vec(-1, 128),
            Int64Type::gen_vec(-1, 64),
        ];
        test_delta_bit_packed_decode::<Int64Type>(data);
    }

    #[test]
    fn test_skip_delta_bit_packed_int64_across_blocks() {
        let data = Int64Type::gen_vec(-1, 700);
        test_skip::<Int64Type>(data.clone(), Encoding::DELTA_BINARY_PACKED, 300);
        test_skip::<Int64Type>(data, Encoding::DELTA_BINARY_PACKED, 700);
    }

    #[test]
    fn test_delta_bit_packed_decoder_sample() {
        let data_bytes = vec![
            128, 1, 4, 3, 58, 28, 6, 0, 0, 0, 0, 8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0, 0, 0, 0, 0,
        ];
        let mut decoder: DeltaBitPackDecoder<Int32Type> = DeltaBitPackDecoder::new();
        decoder.set_data(data_bytes.into(), 3).unwrap();
        // check exact offsets, because when reading partial values we end up with
        // some data not being read from bit reader
        assert_eq!(decoder.get_offset().unwrap(), 5);
        let mut result = vec![0, 0, 0];
        decoder.get(&mut result).unwrap();
        assert_eq!(decoder.get_offset().unwrap(), 34);
        assert_eq!(result, vec![29, 43, 89]);
    }

    #[test]
    fn test_delta_bit_packed_padding() {
        // Page header
        let header = vec![
            // Block Size - 256
            128,
            2,
            // Miniblocks in block,
            4,
            // Total value count - 419
            128 + 35,
            3,
            // First value - 7
            7,
        ];

        // Block Header
        let block1_header = vec![
            0, // Min delta
            0, 1, 0, 0, // Bit widths
        ];

        // Mini-block 1 - bit width 0 => 0 bytes
        // Mini-block 2 - bit width 1 => 8 bytes
        // Mini-block 3 - bit width 0 => 0 bytes
        // Mini-block 4 - bit width 0 => 0 bytes
        let block1 = vec![0xFF; 8];

        // Block Header
        let block2_header = vec![
            0, // Min delta
            0, 1, 2, 0xFF, // Bit widths, including non-zero padding
        ];

        // Mini-block 1 - bit width 0 => 0 bytes
        // Mini-block 2 - bit width 1 => 8 bytes
        // Mini-block 3 - bit width 2 => 16 bytes
        // Mini-block 4 - padding => no bytes
        let block2 = vec![0xFF; 24];

        let data: Vec<u8> = header
            .into_iter()
            .chain(block1_header)
            .chain(block1)
            .chain(block2_header)
            .chain(block2)
            .collect();

        let length = data.len();
        let data = Bytes::from(data);

        let mut reader = BitReader::new(data.clone());
        assert_eq!(reader.get_vlq_int().unwrap(), 256);
        assert_eq!(reader.get_vlq_int().unwrap(), 4);
        assert_eq!(reader.get_vlq_int().unwrap(), 419);
        assert_eq!(reader.get_vlq_int().unwrap(), 7);

        // Test output buffer larger than needed and not exact multiple of block size
        let mut output = vec![0_i32; 420];

        let mut decoder = DeltaBitPackDecoder::<Int32Type>::new();
        decoder.set_data(data.clone(), 0).unwrap();
        assert_eq!(decoder.get(&mut output).unwrap(), 419);
        assert_eq!(decoder.get_offset().unwrap(), length);

        // Test with truncated buffer
        decoder.set_data(data.slice(0..12), 0).unwrap();
        let err = decoder.get(&mut output).unwrap_err();
        assert!(matches!(err, ParquetError::TruncatedInput(_)), "{err}");
        assert!(
            err.to_string()
                .contains("Expected to read 64 values from miniblock got 8"),
            "{}",
            err
        );
    }

    #[test]
    fn test_delta_bit_packed_invalid_header() {
        let mut decoder = DeltaBitPackDecoder::<Int32Type>::new();

        // block size 100
        let err = decoder
            .set_data(Bytes::from_static(&[100, 4, 1, 2]), 1)
            .unwrap_err();
        assert!(matches!(err, ParquetError::CorruptPage(_)), "{err}");

        // zero mini blocks
        let err = decoder
            .set_data(Bytes::from_static(&[128, 1, 0, 1, 2]), 1)
            .unwrap_err();
        assert!(matches!(err, ParquetError::CorruptPage(_)), "{err}");

        // header cut short
        let err = decoder.set_data(Bytes::from_static(&[128, 1, 4]), 1).unwrap_err();
        assert!(matches!(err, ParquetError::TruncatedInput(_)), "{err}");
    }

    #[test]
    fn test_delta_bit_packed_invalid_bit_width() {
        // block 128, 4 mini blocks, 2 values, first value 0, min delta 0, width 33
        let data = Bytes::from_static(&[128, 1, 4, 2, 0, 0, 33, 0, 0, 0]);
        let mut decoder = DeltaBitPackDecoder::<Int32Type>::new();
        decoder.set_data(data, 2).unwrap();
        let mut output = vec![0; 2];
        let err = decoder.get(&mut output).unwrap_err();
        assert!(matches!(err, ParquetError::InvalidBitWidth(33)), "{err}");
    }

    fn test_plain_decode<T: DataType>(
        data: Bytes,
        num_values: usize,
        type_length: i32,
        buffer: &mut [T::T],
        expected: &[T::T],
    ) {
        let mut decoder: PlainDecoder<T> = PlainDecoder::new(type_length);
        let result = decoder.set_data(data, num_values);
        assert!(result.is_ok());
        let result = decoder.get(buffer);
        assert_eq!(result.unwrap(), num_values);
        assert_eq!(decoder.values_left(), 0);
        assert_eq!(buffer, expected);
    }

    fn test_plain_skip<T: DataType>(
        data: Bytes,
        num_values: usize,
        skip: usize,
        type_length: i32,
        expected: &[T::T],
    ) {
        let mut decoder: PlainDecoder<T> = PlainDecoder::new(type_length);
        let result = decoder.set_data(data, num_values);
        assert!(result.is_ok());
        let skipped = decoder.skip(skip).expect("skipping values");

        if skip >= num_values {
            assert_eq!(skipped, num_values);

            let mut buffer = vec![T::T::default(); 1];
            let remaining = decoder.get(&mut buffer).expect("getting remaining values");
            assert_eq!(remaining, 0);
        } else {
            assert_eq!(skipped, skip);
            let mut buffer = vec![T::T::default(); num_values - skip];
            let remaining = decoder.get(&mut buffer).expect("getting remaining values");
            assert_eq!(remaining, num_values - skip);
            assert_eq!(decoder.values_left(), 0);
            assert_eq!(buffer, expected);
        }
    }

    fn test_rle_value_decode<T: DataType>(data: Vec<Vec<T::T>>) {
        test_encode_decode::<T>(data, Encoding::RLE);
    }

    fn test_delta_bit_packed_decode<T: DataType>(data: Vec<Vec<T::T>>) {
        test_encode_decode::<T>(data, Encoding::DELTA_BINARY_PACKED);
    }

    // Input data represents vector of data slices to write (test multiple `put()` calls)
    // For example,
    //   vec![vec![1, 2, 3]] invokes `put()` once and writes {1, 2, 3}
    //   vec![vec![1, 2], vec![3]] invokes `put()` twice and writes {1, 2, 3}
    fn test_encode_decode<T: DataType>(data: Vec<Vec<T::T>>, encoding: Encoding) {
        let col_descr = create_test_col_desc_ptr(-1, T::get_physical_type());

        // Encode data
        let mut encoder = get_encoder::<T>(encoding).expect("get encoder");

        for v in &data[..] {
            encoder.put(&v[..]).expect("ok to encode");
        }
        let bytes = encoder.flush_buffer().expect("ok to flush buffer");

        // Flatten expected data as contiguous array of values
        let expected: Vec<T::T> = data.iter().flat_map(|s| s.clone()).collect();

        // Decode data and compare with original
        let mut decoder = get_decoder::<T>(col_descr, encoding).expect("get decoder");

        let mut result = vec![T::T::default(); expected.len()];
        decoder
            .set_data(bytes, expected.len())
            .expect("ok to set data");
        let mut result_num_values = 0;
        while decoder.values_left() > 0 {
            result_num_values += decoder
                .get(&mut result[result_num_values..])
                .expect("ok to decode");
        }
        assert_eq!(result_num_values, expected.len());
        assert_eq!(result, expected);
    }

    fn test_skip<T: DataType>(data: Vec<T::T>, encoding: Encoding, skip: usize) {
        let col_descr = create_test_col_desc_ptr(-1, T::get_physical_type());

        // Encode data
        let mut encoder = get_encoder::<T>(encoding).expect("get encoder");

        encoder.put(&data).expect("ok to encode");

        let bytes = encoder.flush_buffer().expect("ok to flush buffer");

        let mut decoder = get_decoder::<T>(col_descr, encoding).expect("get decoder");
        decoder.set_data(bytes, data.len()).expect("ok to set data");

        if skip >= data.len() {
            let skipped = decoder.skip(skip).expect("ok to skip");
            assert_eq!(skipped, data.len());

            let skipped_again = decoder.skip(skip).expect("ok to skip again");
            assert_eq!(skipped_again, 0);
        } else {
            let skipped = decoder.skip(skip).expect("ok to skip");
            assert_eq!(skipped, skip);

            let remaining = data.len() - skip;

            let expected = &data[skip..];
            let mut buffer = vec![T::T::default(); remaining];
            let fetched = decoder.get(&mut buffer).expect("ok to decode");
            assert_eq!(remaining, fetched);
            assert_eq!(&buffer, expected);
        }
    }

    fn create_and_check_decoder<T: DataType>(encoding: Encoding, err: Option<&str>) {
        let descr = create_test_col_desc_ptr(-1, T::get_physical_type());
        let decoder = get_decoder::<T>(descr, encoding);
        match err {
            Some(message) => {
                assert_eq!(decoder.err().unwrap().to_string(), message);
            }
            None => {
                assert_eq!(decoder.unwrap().encoding(), encoding);
            }
        }
    }

    // Creates test column descriptor.
    fn create_test_col_desc_ptr(type_len: i32, t: Type) -> ColumnDescPtr {
        let type_len = match t {
            Type::FIXED_LEN_BYTE_ARRAY => type_len.max(1),
            _ => type_len,
        };
        Arc::new(
            ColumnDescriptor::builder("t", t)
                .with_length(type_len)
                .build()
                .unwrap(),
        )
    }

    /// A util trait to convert slices of different types to byte arrays
    trait ToByteArray<T: DataType> {
        #[allow(clippy::wrong_self_convention)]
        fn to_byte_array(data: &[T::T]) -> Vec<u8>;
    }

    impl<T: DataType> ToByteArray<T> for T {
        fn to_byte_array(data: &[T::T]) -> Vec<u8> {
            let mut buffer = vec![];
            let mut bit_writer = bit_util::BitWriter::new(16);
            T::T::encode(data, &mut buffer, &mut bit_writer).unwrap();
            buffer.extend_from_slice(bit_writer.flush_buffer());
            buffer
        }
    }
}
