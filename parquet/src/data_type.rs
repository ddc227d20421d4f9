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

//! Data types that connect Parquet physical types with their Rust-specific
//! representations.
use bytes::Bytes;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::from_utf8;

use crate::basic::Type;
use crate::column::reader::{ColumnChunkReader, ColumnReader};
use crate::errors::{ParquetError, Result};
use crate::util::bit_util::FromBytes;

/// Rust representation for logical type INT96, value is backed by an array of `u32`.
/// The type only takes 12 bytes, without extra padding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Int96 {
    value: [u32; 3],
}

impl Int96 {
    /// Creates new INT96 type struct with no data set.
    pub fn new() -> Self {
        Self { value: [0; 3] }
    }

    /// Returns underlying data as slice of [`u32`].
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.value
    }

    /// Sets data for this INT96 type.
    #[inline]
    pub fn set_data(&mut self, elem0: u32, elem1: u32, elem2: u32) {
        self.value = [elem0, elem1, elem2];
    }

    /// Returns the 12 little-endian bytes of this value, as stored by PLAIN.
    pub fn to_le_bytes(&self) -> [u8; 12] {
        let mut bytes = [0; 12];
        for (chunk, v) in bytes.chunks_exact_mut(4).zip(self.value) {
            chunk.copy_from_slice(&v.to_le_bytes());
        }
        bytes
    }

    /// Reads a value from the first 12 bytes of `bytes`.
    pub fn from_le_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 12 {
            return Err(eof_err!("INT96 needs 12 bytes, got {}", bytes.len()));
        }
        let mut value = [0; 3];
        for (v, chunk) in value.iter_mut().zip(bytes.chunks_exact(4)) {
            *v = u32::try_from_le_slice(chunk)?;
        }
        Ok(Self { value })
    }
}

impl From<Vec<u32>> for Int96 {
    fn from(buf: Vec<u32>) -> Self {
        assert_eq!(buf.len(), 3);
        let mut result = Self::new();
        result.set_data(buf[0], buf[1], buf[2]);
        result
    }
}

impl fmt::Display for Int96 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.data())
    }
}

/// Rust representation for BYTE_ARRAY and FIXED_LEN_BYTE_ARRAY Parquet physical types.
/// Value is backed by a byte buffer.
#[derive(Clone, Default)]
pub struct ByteArray {
    data: Option<Bytes>,
}

// Special case Debug that prints out byte arrays that are valid utf8 as &str's
impl fmt::Debug for ByteArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug_struct = f.debug_struct("ByteArray");
        match self.as_utf8() {
            Ok(s) => debug_struct.field("data", &s),
            Err(_) => debug_struct.field("data", &self.data),
        };
        debug_struct.finish()
    }
}

impl PartialEq for ByteArray {
    fn eq(&self, other: &ByteArray) -> bool {
        self.data() == other.data()
    }
}

impl Eq for ByteArray {}

impl ByteArray {
    /// Creates new byte array with no data set.
    #[inline]
    pub fn new() -> Self {
        ByteArray { data: None }
    }

    /// Gets length of the underlying byte buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.as_ref().map(|d| d.len()).unwrap_or(0)
    }

    /// Checks if the underlying buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns slice of data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// Set data from another byte buffer.
    #[inline]
    pub fn set_data(&mut self, data: Bytes) {
        self.data = Some(data);
    }

    /// Returns `ByteArray` instance with slice of values for a data.
    #[inline]
    pub fn slice(&self, start: usize, len: usize) -> Self {
        Self::from(self.data.clone().unwrap_or_default().slice(start..start + len))
    }

    /// Try to convert the byte array to a utf8 slice
    pub fn as_utf8(&self) -> Result<&str> {
        from_utf8(self.data()).map_err(|e| e.into())
    }
}

impl From<Vec<u8>> for ByteArray {
    fn from(buf: Vec<u8>) -> ByteArray {
        Self {
            data: Some(buf.into()),
        }
    }
}

impl<'a> From<&'a [u8]> for ByteArray {
    fn from(b: &'a [u8]) -> ByteArray {
        b.to_vec().into()
    }
}

impl<'a> From<&'a str> for ByteArray {
    fn from(s: &'a str) -> ByteArray {
        s.as_bytes().into()
    }
}

impl From<String> for ByteArray {
    fn from(s: String) -> ByteArray {
        s.into_bytes().into()
    }
}

impl From<Bytes> for ByteArray {
    fn from(value: Bytes) -> Self {
        Self { data: Some(value) }
    }
}

impl fmt::Display for ByteArray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.as_utf8() {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "{:?}", self.data()),
        }
    }
}

/// Wrapper type for performance reasons, this represents `FIXED_LEN_BYTE_ARRAY` but in all other
/// considerations behaves the same as `ByteArray`
///
/// # Performance notes:
/// This type is a little unfortunate, without it the compiler generates code that takes quite a
/// big hit on the CPU pipeline. Essentially the previous version stalls awaiting the result of
/// `T::get_physical_type() == Type::FIXED_LEN_BYTE_ARRAY`.
///
/// Its debatable if this is wanted, it is out of spec for what parquet documents as its base
/// types, although there are code paths in the Rust (and potentially the C++) versions that
/// warrant this.
///
/// With this wrapper type the compiler generates more targeted code paths matching the higher
/// level logical types, removing the data-hazard from all decoding and encoding paths.
#[repr(transparent)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedLenByteArray(ByteArray);

impl Deref for FixedLenByteArray {
    type Target = ByteArray;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for FixedLenByteArray {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<ByteArray> for FixedLenByteArray {
    fn from(other: ByteArray) -> Self {
        Self(other)
    }
}

impl From<Vec<u8>> for FixedLenByteArray {
    fn from(buf: Vec<u8>) -> FixedLenByteArray {
        FixedLenByteArray(ByteArray::from(buf))
    }
}

impl From<FixedLenByteArray> for ByteArray {
    fn from(other: FixedLenByteArray) -> Self {
        other.0
    }
}

impl fmt::Display for FixedLenByteArray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Converts an instance of a data type to a slice of bytes as `u8`.
pub trait AsBytes {
    /// Returns slice of bytes for this data type.
    fn as_bytes(&self) -> &[u8];
}

macro_rules! gen_as_bytes {
    ($source_ty:ident) => {
        impl AsBytes for $source_ty {
            fn as_bytes(&self) -> &[u8] {
                // SAFETY: a plain value has no padding and every bit pattern is a valid u8
                unsafe {
                    std::slice::from_raw_parts(
                        self as *const $source_ty as *const u8,
                        std::mem::size_of::<$source_ty>(),
                    )
                }
            }
        }
    };
}

gen_as_bytes!(bool);
gen_as_bytes!(i32);
gen_as_bytes!(i64);
gen_as_bytes!(f32);
gen_as_bytes!(f64);

impl AsBytes for Int96 {
    fn as_bytes(&self) -> &[u8] {
        // SAFETY: [u32; 3] is 12 contiguous bytes
        unsafe { std::slice::from_raw_parts(self.value.as_ptr() as *const u8, 12) }
    }
}

impl AsBytes for ByteArray {
    fn as_bytes(&self) -> &[u8] {
        self.data()
    }
}

impl AsBytes for FixedLenByteArray {
    fn as_bytes(&self) -> &[u8] {
        self.data()
    }
}

impl AsBytes for [u8] {
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

pub(crate) mod private {
    use bytes::Bytes;

    use crate::encodings::decoding::PlainDecoderDetails;
    use crate::errors::{ParquetError, Result};
    use crate::util::bit_util::{read_num_bytes, BitReader, BitWriter, FromBytes};

    use super::{ByteArray, FixedLenByteArray, Int96, Type};

    /// Sealed trait to start to remove specialisation from implementations
    ///
    /// This is done to force the associated value type to be unimplementable outside of this
    /// crate, and thus hint to the type system (and end user) traits are public for the contract
    /// and not for extension.
    pub trait ParquetValueType:
        PartialEq
        + std::fmt::Debug
        + std::fmt::Display
        + Default
        + Clone
        + Send
        + Sync
        + 'static
        + crate::encodings::decoding::private::GetDecoder
        + crate::encodings::encoding::private::GetEncoder
        + super::AsBytes
    {
        const PHYSICAL_TYPE: Type;

        /// Encode the value directly from a higher level encoder
        fn encode<W: std::io::Write>(
            values: &[Self],
            writer: &mut W,
            bit_writer: &mut BitWriter,
        ) -> Result<()>;

        /// Establish the data that will be decoded in a buffer
        fn set_data(decoder: &mut PlainDecoderDetails, data: Bytes, num_values: usize);

        /// Decode the value from a given buffer for a higher level decoder
        fn decode(buffer: &mut [Self], decoder: &mut PlainDecoderDetails) -> Result<usize>;

        fn skip(decoder: &mut PlainDecoderDetails, num_values: usize) -> Result<usize>;

        /// Size of this value once PLAIN encoded, in bytes. BOOLEAN reports one byte.
        fn plain_encoded_size(&self) -> usize;

        /// Return the value as i64 if possible
        ///
        /// This is essentially the same as `std::convert::TryInto<i64>` but can't be
        /// implemented for `f32` and `f64`, types that would fail orphan rules
        #[inline]
        fn as_i64(&self) -> Result<i64> {
            Err(general_err!("Type cannot be converted to i64"))
        }
    }

    impl ParquetValueType for bool {
        const PHYSICAL_TYPE: Type = Type::BOOLEAN;

        #[inline]
        fn encode<W: std::io::Write>(
            values: &[Self],
            _: &mut W,
            bit_writer: &mut BitWriter,
        ) -> Result<()> {
            for value in values {
                bit_writer.put_value(*value as u64, 1)
            }
            Ok(())
        }

        #[inline]
        fn set_data(decoder: &mut PlainDecoderDetails, data: Bytes, num_values: usize) {
            decoder.bit_reader.replace(BitReader::new(data));
            decoder.num_values = num_values;
        }

        #[inline]
        fn decode(buffer: &mut [bool], decoder: &mut PlainDecoderDetails) -> Result<usize> {
            let bit_reader = decoder
                .bit_reader
                .as_mut()
                .ok_or_else(|| general_err!("set_data() must be called before decode"))?;
            let num_values = std::cmp::min(buffer.len(), decoder.num_values);
            let values_read = bit_reader.get_batch(&mut buffer[..num_values], 1);
            if values_read != num_values {
                return Err(eof_err!(
                    "Not enough bytes to decode {} boolean values",
                    num_values
                ));
            }
            decoder.num_values -= values_read;
            Ok(values_read)
        }

        fn skip(decoder: &mut PlainDecoderDetails, num_values: usize) -> Result<usize> {
            let bit_reader = decoder
                .bit_reader
                .as_mut()
                .ok_or_else(|| general_err!("set_data() must be called before skip"))?;
            let num_values = std::cmp::min(num_values, decoder.num_values);
            let values_skipped = bit_reader.skip(num_values, 1);
            if values_skipped != num_values {
                return Err(eof_err!("Not enough bytes to skip"));
            }
            decoder.num_values -= values_skipped;
            Ok(values_skipped)
        }

        #[inline]
        fn plain_encoded_size(&self) -> usize {
            1
        }

        #[inline]
        fn as_i64(&self) -> Result<i64> {
            Ok(*self as i64)
        }
    }

    macro_rules! impl_from_raw {
        ($ty: ty, $physical_ty: expr, $self: ident => $as_i64: block) => {
            impl ParquetValueType for $ty {
                const PHYSICAL_TYPE: Type = $physical_ty;

                #[inline]
                fn encode<W: std::io::Write>(
                    values: &[Self],
                    writer: &mut W,
                    _: &mut BitWriter,
                ) -> Result<()> {
                    for value in values {
                        writer.write_all(&value.to_le_bytes())?;
                    }
                    Ok(())
                }

                #[inline]
                fn set_data(decoder: &mut PlainDecoderDetails, data: Bytes, num_values: usize) {
                    decoder.data.replace(data);
                    decoder.start = 0;
                    decoder.num_values = num_values;
                }

                #[inline]
                fn decode(buffer: &mut [Self], decoder: &mut PlainDecoderDetails) -> Result<usize> {
                    let data = decoder
                        .data
                        .as_ref()
                        .ok_or_else(|| general_err!("set_data() must be called before decode"))?;

                    let num_values = std::cmp::min(buffer.len(), decoder.num_values);
                    let bytes_left = data.len() - decoder.start;
                    let bytes_to_decode = std::mem::size_of::<Self>() * num_values;

                    if bytes_left < bytes_to_decode {
                        return Err(eof_err!(
                            "Not enough bytes to decode {} values, {} bytes left",
                            num_values,
                            bytes_left
                        ));
                    }

                    let raw = &data[decoder.start..decoder.start + bytes_to_decode];
                    for (value, chunk) in buffer
                        .iter_mut()
                        .zip(raw.chunks_exact(std::mem::size_of::<Self>()))
                    {
                        *value = <$ty>::try_from_le_slice(chunk)?;
                    }
                    decoder.start += bytes_to_decode;
                    decoder.num_values -= num_values;

                    Ok(num_values)
                }

                #[inline]
                fn skip(decoder: &mut PlainDecoderDetails, num_values: usize) -> Result<usize> {
                    let data = decoder
                        .data
                        .as_ref()
                        .ok_or_else(|| general_err!("set_data() must be called before skip"))?;

                    let num_values = num_values.min(decoder.num_values);
                    let bytes_left = data.len() - decoder.start;
                    let bytes_to_skip = std::mem::size_of::<Self>() * num_values;

                    if bytes_left < bytes_to_skip {
                        return Err(eof_err!("Not enough bytes to skip"));
                    }

                    decoder.start += bytes_to_skip;
                    decoder.num_values -= num_values;

                    Ok(num_values)
                }

                #[inline]
                fn plain_encoded_size(&self) -> usize {
                    std::mem::size_of::<Self>()
                }

                #[inline]
                fn as_i64(&$self) -> Result<i64> {
                    $as_i64
                }
            }
        };
    }

    impl_from_raw!(i32, Type::INT32, self => { Ok(*self as i64) });
    impl_from_raw!(i64, Type::INT64, self => { Ok(*self) });
    impl_from_raw!(f32, Type::FLOAT, self => { Err(general_err!("Type cannot be converted to i64")) });
    impl_from_raw!(f64, Type::DOUBLE, self => { Err(general_err!("Type cannot be converted to i64")) });

    impl ParquetValueType for Int96 {
        const PHYSICAL_TYPE: Type = Type::INT96;

        #[inline]
        fn encode<W: std::io::Write>(
            values: &[Self],
            writer: &mut W,
            _: &mut BitWriter,
        ) -> Result<()> {
            for value in values {
                writer.write_all(&value.to_le_bytes())?;
            }
            Ok(())
        }

        #[inline]
        fn set_data(decoder: &mut PlainDecoderDetails, data: Bytes, num_values: usize) {
            decoder.data.replace(data);
            decoder.start = 0;
            decoder.num_values = num_values;
        }

        #[inline]
        fn decode(buffer: &mut [Self], decoder: &mut PlainDecoderDetails) -> Result<usize> {
            let data = decoder
                .data
                .as_ref()
                .ok_or_else(|| general_err!("set_data() must be called before decode"))?;

            let num_values = std::cmp::min(buffer.len(), decoder.num_values);
            let bytes_left = data.len() - decoder.start;
            let bytes_to_decode = 12 * num_values;

            if bytes_left < bytes_to_decode {
                return Err(eof_err!(
                    "Not enough bytes to decode {} INT96 values, {} bytes left",
                    num_values,
                    bytes_left
                ));
            }

            let data_range = &data[decoder.start..decoder.start + bytes_to_decode];
            for (item, chunk) in buffer.iter_mut().zip(data_range.chunks_exact(12)) {
                *item = Int96::from_le_slice(chunk)?;
            }
            decoder.start += bytes_to_decode;
            decoder.num_values -= num_values;

            Ok(num_values)
        }

        fn skip(decoder: &mut PlainDecoderDetails, num_values: usize) -> Result<usize> {
            let data = decoder
                .data
                .as_ref()
                .ok_or_else(|| general_err!("set_data() must be called before skip"))?;

            let num_values = std::cmp::min(num_values, decoder.num_values);
            let bytes_left = data.len() - decoder.start;
            let bytes_to_skip = 12 * num_values;

            if bytes_left < bytes_to_skip {
                return Err(eof_err!("Not enough bytes to skip"));
            }
            decoder.start += bytes_to_skip;
            decoder.num_values -= num_values;

            Ok(num_values)
        }

        #[inline]
        fn plain_encoded_size(&self) -> usize {
            12
        }
    }

    impl ParquetValueType for ByteArray {
        const PHYSICAL_TYPE: Type = Type::BYTE_ARRAY;

        #[inline]
        fn encode<W: std::io::Write>(
            values: &[Self],
            writer: &mut W,
            _: &mut BitWriter,
        ) -> Result<()> {
            for value in values {
                let len: u32 = value.len().try_into()?;
                writer.write_all(&len.to_le_bytes())?;
                writer.write_all(value.data())?;
            }
            Ok(())
        }

        #[inline]
        fn set_data(decoder: &mut PlainDecoderDetails, data: Bytes, num_values: usize) {
            decoder.data.replace(data);
            decoder.start = 0;
            decoder.num_values = num_values;
        }

        #[inline]
        fn decode(buffer: &mut [Self], decoder: &mut PlainDecoderDetails) -> Result<usize> {
            let data = decoder
                .data
                .as_ref()
                .ok_or_else(|| general_err!("set_data() must be called before decode"))?;

            let num_values = std::cmp::min(buffer.len(), decoder.num_values);
            for val_array in buffer.iter_mut().take(num_values) {
                let len = read_length(data, decoder.start)?;
                decoder.start += std::mem::size_of::<u32>();

                if data.len() < decoder.start + len {
                    return Err(eof_err!(
                        "Not enough bytes to decode a byte array of length {}",
                        len
                    ));
                }

                val_array.set_data(data.slice(decoder.start..decoder.start + len));
                decoder.start += len;
            }
            decoder.num_values -= num_values;

            Ok(num_values)
        }

        fn skip(decoder: &mut PlainDecoderDetails, num_values: usize) -> Result<usize> {
            let data = decoder
                .data
                .as_ref()
                .ok_or_else(|| general_err!("set_data() must be called before skip"))?;
            let num_values = num_values.min(decoder.num_values);

            for _ in 0..num_values {
                let len = read_length(data, decoder.start)?;
                decoder.start += std::mem::size_of::<u32>() + len;
                if decoder.start > data.len() {
                    return Err(eof_err!("Not enough bytes to skip"));
                }
            }
            decoder.num_values -= num_values;
            Ok(num_values)
        }

        #[inline]
        fn plain_encoded_size(&self) -> usize {
            std::mem::size_of::<u32>() + self.len()
        }
    }

    /// Reads the 4 byte little-endian length prefix of a BYTE_ARRAY value at `start`.
    fn read_length(data: &[u8], start: usize) -> Result<usize> {
        match data.get(start..start + std::mem::size_of::<u32>()) {
            Some(prefix) => Ok(read_num_bytes::<u32>(prefix.len(), prefix) as usize),
            None => Err(eof_err!("Not enough bytes to decode a byte array length")),
        }
    }

    impl ParquetValueType for FixedLenByteArray {
        const PHYSICAL_TYPE: Type = Type::FIXED_LEN_BYTE_ARRAY;

        #[inline]
        fn encode<W: std::io::Write>(
            values: &[Self],
            writer: &mut W,
            _: &mut BitWriter,
        ) -> Result<()> {
            for value in values {
                writer.write_all(value.data())?;
            }
            Ok(())
        }

        #[inline]
        fn set_data(decoder: &mut PlainDecoderDetails, data: Bytes, num_values: usize) {
            decoder.data.replace(data);
            decoder.start = 0;
            decoder.num_values = num_values;
        }

        #[inline]
        fn decode(buffer: &mut [Self], decoder: &mut PlainDecoderDetails) -> Result<usize> {
            if decoder.type_length <= 0 {
                return Err(general_err!(
                    "Invalid type length {} for FIXED_LEN_BYTE_ARRAY",
                    decoder.type_length
                ));
            }
            let type_length = decoder.type_length as usize;
            let data = decoder
                .data
                .as_ref()
                .ok_or_else(|| general_err!("set_data() must be called before decode"))?;

            let num_values = std::cmp::min(buffer.len(), decoder.num_values);
            for item in buffer.iter_mut().take(num_values) {
                if data.len() < decoder.start + type_length {
                    return Err(eof_err!(
                        "Not enough bytes to decode a fixed length byte array of length {}",
                        type_length
                    ));
                }

                item.set_data(data.slice(decoder.start..decoder.start + type_length));
                decoder.start += type_length;
            }
            decoder.num_values -= num_values;

            Ok(num_values)
        }

        fn skip(decoder: &mut PlainDecoderDetails, num_values: usize) -> Result<usize> {
            let data = decoder
                .data
                .as_ref()
                .ok_or_else(|| general_err!("set_data() must be called before skip"))?;
            let type_length = decoder.type_length.max(0) as usize;
            let num_values = std::cmp::min(num_values, decoder.num_values);
            let bytes_to_skip = type_length * num_values;
            if data.len() < decoder.start + bytes_to_skip {
                return Err(eof_err!("Not enough bytes to skip"));
            }
            decoder.start += bytes_to_skip;
            decoder.num_values -= num_values;

            Ok(num_values)
        }

        #[inline]
        fn plain_encoded_size(&self) -> usize {
            self.len()
        }
    }
}

/// Contains the Parquet physical type information as well as the Rust primitive type
/// presentation.
pub trait DataType: 'static + Send {
    /// The physical type of the Parquet data type.
    type T: private::ParquetValueType;

    /// Returns Parquet physical type.
    fn get_physical_type() -> Type {
        <Self::T as private::ParquetValueType>::PHYSICAL_TYPE
    }

    /// Returns size in bytes for Rust representation of the physical type.
    fn get_type_size() -> usize;

    /// Returns the typed reader held by `column_reader`, if it has this type.
    fn get_column_reader(column_reader: ColumnReader) -> Option<ColumnChunkReader<Self>>
    where
        Self: Sized;
}

macro_rules! make_type {
    ($name:ident, $reader_ident: ident, $native_ty:ty, $size:expr) => {
        #[doc = concat!("Parquet physical type: ", stringify!($name))]
        #[derive(Clone)]
        pub struct $name {}

        impl DataType for $name {
            type T = $native_ty;

            fn get_type_size() -> usize {
                $size
            }

            fn get_column_reader(column_reader: ColumnReader) -> Option<ColumnChunkReader<Self>> {
                match column_reader {
                    ColumnReader::$reader_ident(w) => Some(w),
                    _ => None,
                }
            }
        }
    };
}

// Generate struct definitions for all physical types

make_type!(BoolType, BoolColumnReader, bool, 1);
make_type!(Int32Type, Int32ColumnReader, i32, 4);
make_type!(Int64Type, Int64ColumnReader, i64, 8);
make_type!(Int96Type, Int96ColumnReader, Int96, std::mem::size_of::<Int96>());
make_type!(FloatType, FloatColumnReader, f32, 4);
make_type!(DoubleType, DoubleColumnReader, f64, 8);
make_type!(
    ByteArrayType,
    ByteArrayColumnReader,
    ByteArray,
    std::mem::size_of::<ByteArray>()
);
make_type!(
    FixedLenByteArrayType,
    FixedLenByteArrayColumnReader,
    FixedLenByteArray,
    std::mem::size_of::<FixedLenByteArray>()
);
