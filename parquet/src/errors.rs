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

//! Common Parquet errors and macros.

use std::error::Error;
use std::num::TryFromIntError;
use std::sync::Arc;
use std::{io, result, str};

/// Parquet error enumeration
///
/// Every variant except [`ParquetError::EndOfChunk`] is fatal to the
/// [`ColumnChunkReader`](crate::column::reader::ColumnChunkReader) that produced it.
// Note: we don't implement PartialEq as the semantics for the
// external variant are not well defined
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ParquetError {
    /// General Parquet error.
    /// Returned when code violates normal workflow of working with Parquet files.
    General(String),
    /// "Not yet implemented" Parquet error.
    /// Returned when functionality is not yet available.
    NYI(String),
    /// The thrift page header or a varint in it could not be parsed.
    MalformedHeader(String),
    /// A known encoding that cannot be decoded for the column's physical type.
    UnsupportedEncoding(String),
    /// A known compression codec that this crate cannot decompress.
    UnsupportedCompressionCodec(String),
    /// Declared and actual sizes disagree, or a page extends past its column chunk.
    CorruptPage(String),
    /// Fewer bytes remain than a fixed-width decode requires.
    TruncatedInput(String),
    /// A bit width outside of `1..=32` was passed to the bit packer.
    InvalidBitWidth(usize),
    /// A dictionary key does not address an entry of the dictionary.
    DictionaryIndexOutOfRange {
        /// The offending key
        index: usize,
        /// The number of entries in the dictionary
        len: usize,
    },
    /// A hybrid run header declared zero values while more values were expected.
    EmptyRun,
    /// No data pages remain in the column chunk. This is not a failure.
    EndOfChunk,
    /// Invalid index (index, bound)
    IndexOutOfBound(usize, usize),
    /// An external error variant
    External(Arc<dyn Error + Send + Sync>),
}

impl ParquetError {
    /// Returns true if this is the [`ParquetError::EndOfChunk`] sentinel
    pub fn is_end_of_chunk(&self) -> bool {
        matches!(self, ParquetError::EndOfChunk)
    }
}

impl std::fmt::Display for ParquetError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self {
            ParquetError::General(message) => write!(fmt, "Parquet error: {message}"),
            ParquetError::NYI(message) => write!(fmt, "NYI: {message}"),
            ParquetError::MalformedHeader(message) => write!(fmt, "Malformed header: {message}"),
            ParquetError::UnsupportedEncoding(message) => {
                write!(fmt, "Unsupported encoding: {message}")
            }
            ParquetError::UnsupportedCompressionCodec(message) => {
                write!(fmt, "Unsupported compression codec: {message}")
            }
            ParquetError::CorruptPage(message) => write!(fmt, "Corrupt page: {message}"),
            ParquetError::TruncatedInput(message) => write!(fmt, "EOF: {message}"),
            ParquetError::InvalidBitWidth(width) => {
                write!(fmt, "Invalid bit width {width}, expected 1..=32")
            }
            ParquetError::DictionaryIndexOutOfRange { index, len } => write!(
                fmt,
                "Dictionary index {index} out of range for dictionary of {len} entries"
            ),
            ParquetError::EmptyRun => write!(fmt, "Hybrid run header declares zero values"),
            ParquetError::EndOfChunk => write!(fmt, "End of column chunk"),
            ParquetError::IndexOutOfBound(index, bound) => {
                write!(fmt, "Index {index} out of bound: {bound}")
            }
            ParquetError::External(e) => write!(fmt, "External: {e}"),
        }
    }
}

impl Error for ParquetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParquetError::External(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<TryFromIntError> for ParquetError {
    fn from(e: TryFromIntError) -> ParquetError {
        ParquetError::General(format!("Integer overflow: {e}"))
    }
}

impl From<io::Error> for ParquetError {
    fn from(e: io::Error) -> ParquetError {
        ParquetError::External(Arc::new(e))
    }
}

#[cfg(feature = "snap")]
impl From<snap::Error> for ParquetError {
    fn from(e: snap::Error) -> ParquetError {
        ParquetError::External(Arc::new(e))
    }
}

impl From<str::Utf8Error> for ParquetError {
    fn from(e: str::Utf8Error) -> ParquetError {
        ParquetError::External(Arc::new(e))
    }
}

/// A specialized `Result` for Parquet errors.
pub type Result<T, E = ParquetError> = result::Result<T, E>;

// ----------------------------------------------------------------------
// Convenient macros for different errors

macro_rules! general_err {
    ($fmt:expr) => (ParquetError::General($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::General(format!($fmt, $($args),*)));
}

macro_rules! eof_err {
    ($fmt:expr) => (ParquetError::TruncatedInput($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::TruncatedInput(format!($fmt, $($args),*)));
}

macro_rules! corrupt_err {
    ($fmt:expr) => (ParquetError::CorruptPage($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::CorruptPage(format!($fmt, $($args),*)));
}

macro_rules! malformed_err {
    ($fmt:expr) => (ParquetError::MalformedHeader($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::MalformedHeader(format!($fmt, $($args),*)));
}

macro_rules! unsupported_encoding_err {
    ($fmt:expr) => (ParquetError::UnsupportedEncoding($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::UnsupportedEncoding(format!($fmt, $($args),*)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_of_chunk_is_distinguishable() {
        assert!(ParquetError::EndOfChunk.is_end_of_chunk());
        assert!(!corrupt_err!("bad page").is_end_of_chunk());
        assert!(!eof_err!("End of chunk").is_end_of_chunk());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            eof_err!("Not enough bytes: {}", 3).to_string(),
            "EOF: Not enough bytes: 3"
        );
        assert_eq!(
            ParquetError::DictionaryIndexOutOfRange { index: 4, len: 2 }.to_string(),
            "Dictionary index 4 out of range for dictionary of 2 entries"
        );
        assert_eq!(
            ParquetError::InvalidBitWidth(33).to_string(),
            "Invalid bit width 33, expected 1..=32"
        );
    }

    #[test]
    fn test_recorded_error_clones() {
        let err: ParquetError = io::Error::new(io::ErrorKind::Other, "disk gone").into();
        let again = err.clone();
        assert_eq!(err.to_string(), again.to_string());
        assert!(again.source().is_some());
    }
}
