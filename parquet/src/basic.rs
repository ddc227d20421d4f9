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
//! Contains Rust mappings for the Parquet enums used by page headers and column
//! chunks: physical types, repetitions, encodings, compression codecs and page types.
//!
//! Each enum converts to and from the `i32` value it carries in the thrift
//! compact encoding of the Parquet file format.

use std::{fmt, str};

use crate::errors::{ParquetError, Result};

// ----------------------------------------------------------------------
// Types from the Thrift definition

// ----------------------------------------------------------------------
// Mirrors `parquet::Type`

/// Types supported by Parquet.
///
/// These physical types are intended to be used in combination with the encodings to
/// control the on disk storage format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum Type {
    /// A boolean value.
    BOOLEAN,
    /// 32-bit signed integer.
    INT32,
    /// 64-bit signed integer.
    INT64,
    /// 96-bit signed integer for timestamps.
    INT96,
    /// IEEE 754 single-precision floating point value.
    FLOAT,
    /// IEEE 754 double-precision floating point value.
    DOUBLE,
    /// Arbitrary length byte array.
    BYTE_ARRAY,
    /// Fixed length byte array.
    FIXED_LEN_BYTE_ARRAY,
}

// ----------------------------------------------------------------------
// Mirrors `parquet::FieldRepetitionType`

/// Representation of field types in schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Repetition {
    /// Field is required (can not be null) and each record has exactly 1 value.
    REQUIRED,
    /// Field is optional (can be null) and each record has 0 or 1 values.
    OPTIONAL,
    /// Field is repeated and can contain 0 or more values.
    REPEATED,
}

// ----------------------------------------------------------------------
// Mirrors `parquet::Encoding`

/// Encodings supported by Parquet.
/// Not all encodings are valid for all types. These enums are also used to specify the
/// encoding of definition and repetition levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[allow(non_camel_case_types)]
pub enum Encoding {
    /// Default byte encoding.
    /// - BOOLEAN - 1 bit per value, 0 is false; 1 is true.
    /// - INT32 - 4 bytes per value, stored as little-endian.
    /// - INT64 - 8 bytes per value, stored as little-endian.
    /// - INT96 - 12 bytes per value, stored as little-endian.
    /// - FLOAT - 4 bytes per value, stored as little-endian.
    /// - DOUBLE - 8 bytes per value, stored as little-endian.
    /// - BYTE_ARRAY - 4 byte length stored as little endian, followed by bytes.
    /// - FIXED_LEN_BYTE_ARRAY - just the bytes are stored.
    PLAIN,

    /// **Deprecated** dictionary encoding.
    ///
    /// Data pages carry RLE/bit-packed hybrid indices, identical to RLE_DICTIONARY.
    /// Dictionary pages written with this encoding hold PLAIN values.
    PLAIN_DICTIONARY,

    /// Group packed run length encoding.
    ///
    /// Usable for definition/repetition levels encoding and boolean values.
    RLE,

    /// **Deprecated** bit packed encoding.
    ///
    /// Only used for definition/repetition levels; values are packed from the most
    /// significant bit.
    BIT_PACKED,

    /// Delta encoding for integers, either INT32 or INT64.
    ///
    /// Works best on sorted data.
    DELTA_BINARY_PACKED,

    /// Encoding for byte arrays to separate the length values and the data.
    DELTA_LENGTH_BYTE_ARRAY,

    /// Incremental encoding for byte arrays.
    DELTA_BYTE_ARRAY,

    /// Dictionary encoding.
    ///
    /// The ids are encoded using the RLE encoding.
    RLE_DICTIONARY,

    /// Encoding for floating-point data.
    BYTE_STREAM_SPLIT,
}

// ----------------------------------------------------------------------
// Mirrors `parquet::CompressionCodec`

/// Compression algorithms named by the file format.
///
/// Only UNCOMPRESSED, SNAPPY and GZIP can be decoded; see [`crate::compression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Compression {
    UNCOMPRESSED,
    SNAPPY,
    GZIP,
    LZO,
    BROTLI,
    LZ4,
    ZSTD,
    LZ4_RAW,
}

// ----------------------------------------------------------------------
// Mirrors `parquet::PageType`

/// Available data pages for Parquet file format.
/// Note that some of the page types may not be supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum PageType {
    DATA_PAGE,
    INDEX_PAGE,
    DICTIONARY_PAGE,
    DATA_PAGE_V2,
}

// ----------------------------------------------------------------------
// Display and string conversions

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl fmt::Display for Repetition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl str::FromStr for Repetition {
    type Err = ParquetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "REQUIRED" => Ok(Repetition::REQUIRED),
            "OPTIONAL" => Ok(Repetition::OPTIONAL),
            "REPEATED" => Ok(Repetition::REPEATED),
            other => Err(general_err!("Invalid parquet repetition {}", other)),
        }
    }
}

impl str::FromStr for Type {
    type Err = ParquetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "BOOLEAN" => Ok(Type::BOOLEAN),
            "INT32" => Ok(Type::INT32),
            "INT64" => Ok(Type::INT64),
            "INT96" => Ok(Type::INT96),
            "FLOAT" => Ok(Type::FLOAT),
            "DOUBLE" => Ok(Type::DOUBLE),
            "BYTE_ARRAY" | "BINARY" => Ok(Type::BYTE_ARRAY),
            "FIXED_LEN_BYTE_ARRAY" => Ok(Type::FIXED_LEN_BYTE_ARRAY),
            other => Err(general_err!("Invalid parquet type {}", other)),
        }
    }
}

impl str::FromStr for Encoding {
    type Err = ParquetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PLAIN" | "plain" => Ok(Encoding::PLAIN),
            "PLAIN_DICTIONARY" | "plain_dictionary" => Ok(Encoding::PLAIN_DICTIONARY),
            "RLE" | "rle" => Ok(Encoding::RLE),
            "BIT_PACKED" | "bit_packed" => Ok(Encoding::BIT_PACKED),
            "DELTA_BINARY_PACKED" | "delta_binary_packed" => {
                Ok(Encoding::DELTA_BINARY_PACKED)
            }
            "DELTA_LENGTH_BYTE_ARRAY" | "delta_length_byte_array" => {
                Ok(Encoding::DELTA_LENGTH_BYTE_ARRAY)
            }
            "DELTA_BYTE_ARRAY" | "delta_byte_array" => Ok(Encoding::DELTA_BYTE_ARRAY),
            "RLE_DICTIONARY" | "rle_dictionary" => Ok(Encoding::RLE_DICTIONARY),
            "BYTE_STREAM_SPLIT" | "byte_stream_split" => Ok(Encoding::BYTE_STREAM_SPLIT),
            _ => Err(general_err!("unknown encoding: {}", s)),
        }
    }
}

impl str::FromStr for Compression {
    type Err = ParquetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "UNCOMPRESSED" | "uncompressed" => Ok(Compression::UNCOMPRESSED),
            "SNAPPY" | "snappy" => Ok(Compression::SNAPPY),
            "GZIP" | "gzip" => Ok(Compression::GZIP),
            "LZO" | "lzo" => Ok(Compression::LZO),
            "BROTLI" | "brotli" => Ok(Compression::BROTLI),
            "LZ4" | "lz4" => Ok(Compression::LZ4),
            "ZSTD" | "zstd" => Ok(Compression::ZSTD),
            "LZ4_RAW" | "lz4_raw" => Ok(Compression::LZ4_RAW),
            _ => Err(general_err!("unknown compression codec: {}", s)),
        }
    }
}

// ----------------------------------------------------------------------
// Thrift i32 <=> enum conversions

impl TryFrom<i32> for Type {
    type Error = ParquetError;

    fn try_from(value: i32) -> Result<Self> {
        Ok(match value {
            0 => Type::BOOLEAN,
            1 => Type::INT32,
            2 => Type::INT64,
            3 => Type::INT96,
            4 => Type::FLOAT,
            5 => Type::DOUBLE,
            6 => Type::BYTE_ARRAY,
            7 => Type::FIXED_LEN_BYTE_ARRAY,
            _ => return Err(general_err!("unexpected parquet type: {}", value)),
        })
    }
}

impl From<Type> for i32 {
    fn from(value: Type) -> Self {
        match value {
            Type::BOOLEAN => 0,
            Type::INT32 => 1,
            Type::INT64 => 2,
            Type::INT96 => 3,
            Type::FLOAT => 4,
            Type::DOUBLE => 5,
            Type::BYTE_ARRAY => 6,
            Type::FIXED_LEN_BYTE_ARRAY => 7,
        }
    }
}

impl TryFrom<i32> for Encoding {
    type Error = ParquetError;

    /// Unknown values are reported as [`ParquetError::UnsupportedEncoding`].
    fn try_from(value: i32) -> Result<Self> {
        Ok(match value {
            0 => Encoding::PLAIN,
            2 => Encoding::PLAIN_DICTIONARY,
            3 => Encoding::RLE,
            4 => Encoding::BIT_PACKED,
            5 => Encoding::DELTA_BINARY_PACKED,
            6 => Encoding::DELTA_LENGTH_BYTE_ARRAY,
            7 => Encoding::DELTA_BYTE_ARRAY,
            8 => Encoding::RLE_DICTIONARY,
            9 => Encoding::BYTE_STREAM_SPLIT,
            _ => {
                return Err(unsupported_encoding_err!(
                    "unexpected parquet encoding: {}",
                    value
                ))
            }
        })
    }
}

impl From<Encoding> for i32 {
    fn from(value: Encoding) -> Self {
        match value {
            Encoding::PLAIN => 0,
            Encoding::PLAIN_DICTIONARY => 2,
            Encoding::RLE => 3,
            Encoding::BIT_PACKED => 4,
            Encoding::DELTA_BINARY_PACKED => 5,
            Encoding::DELTA_LENGTH_BYTE_ARRAY => 6,
            Encoding::DELTA_BYTE_ARRAY => 7,
            Encoding::RLE_DICTIONARY => 8,
            Encoding::BYTE_STREAM_SPLIT => 9,
        }
    }
}

impl TryFrom<i32> for Compression {
    type Error = ParquetError;

    /// Unknown values are reported as [`ParquetError::UnsupportedCompressionCodec`].
    fn try_from(value: i32) -> Result<Self> {
        Ok(match value {
            0 => Compression::UNCOMPRESSED,
            1 => Compression::SNAPPY,
            2 => Compression::GZIP,
            3 => Compression::LZO,
            4 => Compression::BROTLI,
            5 => Compression::LZ4,
            6 => Compression::ZSTD,
            7 => Compression::LZ4_RAW,
            _ => {
                return Err(ParquetError::UnsupportedCompressionCodec(format!(
                    "unexpected parquet compression codec: {value}"
                )))
            }
        })
    }
}

impl From<Compression> for i32 {
    fn from(value: Compression) -> Self {
        match value {
            Compression::UNCOMPRESSED => 0,
            Compression::SNAPPY => 1,
            Compression::GZIP => 2,
            Compression::LZO => 3,
            Compression::BROTLI => 4,
            Compression::LZ4 => 5,
            Compression::ZSTD => 6,
            Compression::LZ4_RAW => 7,
        }
    }
}

impl TryFrom<i32> for PageType {
    type Error = ParquetError;

    fn try_from(value: i32) -> Result<Self> {
        Ok(match value {
            0 => PageType::DATA_PAGE,
            1 => PageType::INDEX_PAGE,
            2 => PageType::DICTIONARY_PAGE,
            3 => PageType::DATA_PAGE_V2,
            _ => return Err(malformed_err!("unexpected parquet page type: {}", value)),
        })
    }
}

impl From<PageType> for i32 {
    fn from(value: PageType) -> Self {
        match value {
            PageType::DATA_PAGE => 0,
            PageType::INDEX_PAGE => 1,
            PageType::DICTIONARY_PAGE => 2,
            PageType::DATA_PAGE_V2 => 3,
        }
    }
}

impl Type {
    /// Returns the width in bytes of a PLAIN encoded value of this type, or `None`
    /// for variable or column-defined widths.
    pub fn plain_width(&self) -> Option<usize> {
        match self {
            Type::INT32 | Type::FLOAT => Some(4),
            Type::INT64 | Type::DOUBLE => Some(8),
            Type::INT96 => Some(12),
            Type::BOOLEAN | Type::BYTE_ARRAY | Type::FIXED_LEN_BYTE_ARRAY => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_type() {
        assert_eq!(Type::BOOLEAN.to_string(), "BOOLEAN");
        assert_eq!(Type::INT32.to_string(), "INT32");
        assert_eq!(Type::INT96.to_string(), "INT96");
        assert_eq!(Type::BYTE_ARRAY.to_string(), "BYTE_ARRAY");
        assert_eq!(
            Type::FIXED_LEN_BYTE_ARRAY.to_string(),
            "FIXED_LEN_BYTE_ARRAY"
        );
    }

    #[test]
    fn test_from_string_into_type() {
        for t in [
            Type::BOOLEAN,
            Type::INT32,
            Type::INT64,
            Type::INT96,
            Type::FLOAT,
            Type::DOUBLE,
            Type::BYTE_ARRAY,
            Type::FIXED_LEN_BYTE_ARRAY,
        ] {
            assert_eq!(t.to_string().parse::<Type>().unwrap(), t);
        }
        assert_eq!("BINARY".parse::<Type>().unwrap(), Type::BYTE_ARRAY);
        assert!("INT8".parse::<Type>().is_err());
    }

    #[test]
    fn test_type_thrift_values() {
        for v in 0..8 {
            let t = Type::try_from(v).unwrap();
            assert_eq!(i32::from(t), v);
        }
        assert!(Type::try_from(8).is_err());
        assert!(Type::try_from(-1).is_err());
    }

    #[test]
    fn test_display_encoding() {
        assert_eq!(Encoding::PLAIN.to_string(), "PLAIN");
        assert_eq!(Encoding::PLAIN_DICTIONARY.to_string(), "PLAIN_DICTIONARY");
        assert_eq!(Encoding::RLE.to_string(), "RLE");
        assert_eq!(Encoding::BIT_PACKED.to_string(), "BIT_PACKED");
        assert_eq!(
            Encoding::DELTA_BINARY_PACKED.to_string(),
            "DELTA_BINARY_PACKED"
        );
        assert_eq!(Encoding::RLE_DICTIONARY.to_string(), "RLE_DICTIONARY");
    }

    #[test]
    fn test_encoding_thrift_values() {
        assert_eq!(Encoding::try_from(0).unwrap(), Encoding::PLAIN);
        assert_eq!(Encoding::try_from(2).unwrap(), Encoding::PLAIN_DICTIONARY);
        assert_eq!(Encoding::try_from(3).unwrap(), Encoding::RLE);
        assert_eq!(Encoding::try_from(4).unwrap(), Encoding::BIT_PACKED);
        assert_eq!(Encoding::try_from(8).unwrap(), Encoding::RLE_DICTIONARY);
        assert_eq!(i32::from(Encoding::DELTA_BINARY_PACKED), 5);

        // 1 was GROUP_VAR_INT, never used
        let err = Encoding::try_from(1).unwrap_err();
        assert!(matches!(err, ParquetError::UnsupportedEncoding(_)));
        assert!(Encoding::try_from(42).is_err());
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("rle".parse::<Encoding>().unwrap(), Encoding::RLE);
        assert_eq!(
            "DELTA_BINARY_PACKED".parse::<Encoding>().unwrap(),
            Encoding::DELTA_BINARY_PACKED
        );
        assert!("foo".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_compression_thrift_values() {
        assert_eq!(Compression::try_from(0).unwrap(), Compression::UNCOMPRESSED);
        assert_eq!(Compression::try_from(1).unwrap(), Compression::SNAPPY);
        assert_eq!(Compression::try_from(2).unwrap(), Compression::GZIP);
        assert_eq!(Compression::try_from(3).unwrap(), Compression::LZO);
        assert_eq!(i32::from(Compression::LZ4_RAW), 7);

        let err = Compression::try_from(8).unwrap_err();
        assert!(matches!(err, ParquetError::UnsupportedCompressionCodec(_)));
    }

    #[test]
    fn test_compression_from_str() {
        assert_eq!("gzip".parse::<Compression>().unwrap(), Compression::GZIP);
        assert_eq!("SNAPPY".parse::<Compression>().unwrap(), Compression::SNAPPY);
        assert!("bzip2".parse::<Compression>().is_err());
    }

    #[test]
    fn test_display_page_type() {
        assert_eq!(PageType::DATA_PAGE.to_string(), "DATA_PAGE");
        assert_eq!(PageType::INDEX_PAGE.to_string(), "INDEX_PAGE");
        assert_eq!(PageType::DICTIONARY_PAGE.to_string(), "DICTIONARY_PAGE");
        assert_eq!(PageType::DATA_PAGE_V2.to_string(), "DATA_PAGE_V2");
    }

    #[test]
    fn test_page_type_thrift_values() {
        for v in 0..4 {
            assert_eq!(i32::from(PageType::try_from(v).unwrap()), v);
        }
        let err = PageType::try_from(4).unwrap_err();
        assert!(matches!(err, ParquetError::MalformedHeader(_)));
    }

    #[test]
    fn test_repetition_from_str() {
        assert_eq!(
            "OPTIONAL".parse::<Repetition>().unwrap(),
            Repetition::OPTIONAL
        );
        assert_eq!(Repetition::REPEATED.to_string(), "REPEATED");
        assert!("NULLABLE".parse::<Repetition>().is_err());
    }

    #[test]
    fn test_plain_width() {
        assert_eq!(Type::INT32.plain_width(), Some(4));
        assert_eq!(Type::INT96.plain_width(), Some(12));
        assert_eq!(Type::BYTE_ARRAY.plain_width(), None);
    }
}
