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

//! Page header structures and their thrift compact serialization.
//!
//! Field ids follow `parquet.thrift`. Unknown fields are skipped so headers written
//! by newer writers can still be read.

use std::io::Write;

use crate::basic::{Encoding, PageType};
use crate::errors::{ParquetError, Result};
use crate::parquet_thrift::{
    FieldType, ThriftCompactInputProtocol, ThriftCompactOutputProtocol, WriteThriftField,
};

/// Statistics carried by a data page header. Values are kept as raw PLAIN encoded bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageStatistics {
    /// Deprecated maximum, with signed byte-wise ordering
    pub max: Option<Vec<u8>>,
    /// Deprecated minimum, with signed byte-wise ordering
    pub min: Option<Vec<u8>>,
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub max_value: Option<Vec<u8>>,
    pub min_value: Option<Vec<u8>>,
}

/// Header of a `DATA_PAGE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPageHeader {
    /// Number of values, including nulls
    pub num_values: i32,
    pub encoding: Encoding,
    pub definition_level_encoding: Encoding,
    pub repetition_level_encoding: Encoding,
    pub statistics: Option<PageStatistics>,
}

/// Header of a `DATA_PAGE_V2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPageHeaderV2 {
    /// Number of values, including nulls
    pub num_values: i32,
    pub num_nulls: i32,
    pub num_rows: i32,
    pub encoding: Encoding,
    /// Length of the definition levels, stored uncompressed
    pub definition_levels_byte_length: i32,
    /// Length of the repetition levels, stored uncompressed
    pub repetition_levels_byte_length: i32,
    /// Whether the values section is compressed, defaults to true when absent
    pub is_compressed: Option<bool>,
    pub statistics: Option<PageStatistics>,
}

/// Header of a `DICTIONARY_PAGE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryPageHeader {
    /// Number of values in the dictionary
    pub num_values: i32,
    pub encoding: Encoding,
    /// If true, the entries in the dictionary are sorted in ascending order
    pub is_sorted: Option<bool>,
}

/// Header preceding every page of a column chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader {
    /// Indicates which of the `*_header` fields is set
    pub r#type: PageType,
    /// Uncompressed page size in bytes, not including this header
    pub uncompressed_page_size: i32,
    /// Compressed page size in bytes, not including this header
    pub compressed_page_size: i32,
    /// CRC32 of the page payload as written, not verified by this crate
    pub crc: Option<i32>,
    pub data_page_header: Option<DataPageHeader>,
    /// Index pages have an empty header
    pub index_page_header: Option<()>,
    pub dictionary_page_header: Option<DictionaryPageHeader>,
    pub data_page_header_v2: Option<DataPageHeaderV2>,
}

impl PageHeader {
    /// Returns true if this is the header of a `DATA_PAGE` or `DATA_PAGE_V2`.
    pub fn is_data_page(&self) -> bool {
        matches!(self.r#type, PageType::DATA_PAGE | PageType::DATA_PAGE_V2)
    }

    /// Returns true if this is the header of a `DICTIONARY_PAGE`.
    pub fn is_dictionary_page(&self) -> bool {
        self.r#type == PageType::DICTIONARY_PAGE
    }

    /// Returns the number of values (data pages) or entries (dictionary pages)
    /// declared by the type specific header.
    pub fn num_values(&self) -> Option<i32> {
        match self.r#type {
            PageType::DATA_PAGE => self.data_page_header.as_ref().map(|h| h.num_values),
            PageType::DATA_PAGE_V2 => self.data_page_header_v2.as_ref().map(|h| h.num_values),
            PageType::DICTIONARY_PAGE => {
                self.dictionary_page_header.as_ref().map(|h| h.num_values)
            }
            PageType::INDEX_PAGE => None,
        }
    }

    /// Returns the value encoding declared by the type specific header.
    pub fn encoding(&self) -> Option<Encoding> {
        match self.r#type {
            PageType::DATA_PAGE => self.data_page_header.as_ref().map(|h| h.encoding),
            PageType::DATA_PAGE_V2 => self.data_page_header_v2.as_ref().map(|h| h.encoding),
            PageType::DICTIONARY_PAGE => self.dictionary_page_header.as_ref().map(|h| h.encoding),
            PageType::INDEX_PAGE => None,
        }
    }

    /// Returns the statistics of a data page.
    pub fn statistics(&self) -> Option<&PageStatistics> {
        match self.r#type {
            PageType::DATA_PAGE => self.data_page_header.as_ref()?.statistics.as_ref(),
            PageType::DATA_PAGE_V2 => self.data_page_header_v2.as_ref()?.statistics.as_ref(),
            _ => None,
        }
    }

    /// Parses a header from the start of `buf`, returning the number of bytes it
    /// occupies along with the header.
    ///
    /// A header extending past the end of `buf` is reported as
    /// [`ParquetError::TruncatedInput`].
    pub fn read_from_slice(buf: &[u8]) -> Result<(usize, Self)> {
        let mut prot = ThriftCompactInputProtocol::new(buf);
        let header = Self::read_thrift(&mut prot)?;
        Ok((prot.position(), header))
    }

    /// Serializes this header into `writer`, returning the number of bytes written.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<usize> {
        let mut counting = CountingWrite {
            inner: writer,
            bytes_written: 0,
        };
        let mut prot = ThriftCompactOutputProtocol::new(&mut counting);
        self.write_thrift(&mut prot)?;
        Ok(counting.bytes_written)
    }

    pub(crate) fn read_thrift(prot: &mut ThriftCompactInputProtocol<'_>) -> Result<Self> {
        let mut type_: Option<PageType> = None;
        let mut uncompressed_page_size: Option<i32> = None;
        let mut compressed_page_size: Option<i32> = None;
        let mut crc: Option<i32> = None;
        let mut data_page_header: Option<DataPageHeader> = None;
        let mut index_page_header: Option<()> = None;
        let mut dictionary_page_header: Option<DictionaryPageHeader> = None;
        let mut data_page_header_v2: Option<DataPageHeaderV2> = None;
        prot.read_struct_begin()?;
        loop {
            let field_ident = prot.read_field_begin()?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => type_ = Some(PageType::try_from(prot.read_i32()?)?),
                2 => uncompressed_page_size = Some(prot.read_i32()?),
                3 => compressed_page_size = Some(prot.read_i32()?),
                4 => crc = Some(prot.read_i32()?),
                5 => data_page_header = Some(DataPageHeader::read_thrift(prot)?),
                6 => {
                    prot.skip(FieldType::Struct)?;
                    index_page_header = Some(());
                }
                7 => dictionary_page_header = Some(DictionaryPageHeader::read_thrift(prot)?),
                8 => data_page_header_v2 = Some(DataPageHeaderV2::read_thrift(prot)?),
                _ => prot.skip(field_ident.field_type)?,
            };
        }
        prot.read_struct_end()?;
        Ok(Self {
            r#type: required(type_, "type")?,
            uncompressed_page_size: required(uncompressed_page_size, "uncompressed_page_size")?,
            compressed_page_size: required(compressed_page_size, "compressed_page_size")?,
            crc,
            data_page_header,
            index_page_header,
            dictionary_page_header,
            data_page_header_v2,
        })
    }

    pub(crate) fn write_thrift<W: Write>(
        &self,
        prot: &mut ThriftCompactOutputProtocol<W>,
    ) -> Result<()> {
        let mut last = i32::from(self.r#type).write_thrift_field(prot, 1, 0)?;
        last = self.uncompressed_page_size.write_thrift_field(prot, 2, last)?;
        last = self.compressed_page_size.write_thrift_field(prot, 3, last)?;
        if let Some(crc) = self.crc {
            last = crc.write_thrift_field(prot, 4, last)?;
        }
        if let Some(header) = &self.data_page_header {
            prot.write_field_begin(FieldType::Struct, 5, last)?;
            header.write_thrift(prot)?;
            last = 5;
        }
        if self.index_page_header.is_some() {
            prot.write_field_begin(FieldType::Struct, 6, last)?;
            prot.write_struct_end()?;
            last = 6;
        }
        if let Some(header) = &self.dictionary_page_header {
            prot.write_field_begin(FieldType::Struct, 7, last)?;
            header.write_thrift(prot)?;
            last = 7;
        }
        if let Some(header) = &self.data_page_header_v2 {
            prot.write_field_begin(FieldType::Struct, 8, last)?;
            header.write_thrift(prot)?;
        }
        prot.write_struct_end()
    }
}

impl DataPageHeader {
    fn read_thrift(prot: &mut ThriftCompactInputProtocol<'_>) -> Result<Self> {
        let mut num_values: Option<i32> = None;
        let mut encoding: Option<Encoding> = None;
        let mut definition_level_encoding: Option<Encoding> = None;
        let mut repetition_level_encoding: Option<Encoding> = None;
        let mut statistics: Option<PageStatistics> = None;
        prot.read_struct_begin()?;
        loop {
            let field_ident = prot.read_field_begin()?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => num_values = Some(prot.read_i32()?),
                2 => encoding = Some(Encoding::try_from(prot.read_i32()?)?),
                3 => definition_level_encoding = Some(Encoding::try_from(prot.read_i32()?)?),
                4 => repetition_level_encoding = Some(Encoding::try_from(prot.read_i32()?)?),
                5 => statistics = Some(PageStatistics::read_thrift(prot)?),
                _ => prot.skip(field_ident.field_type)?,
            };
        }
        prot.read_struct_end()?;
        Ok(Self {
            num_values: required(num_values, "num_values")?,
            encoding: required(encoding, "encoding")?,
            definition_level_encoding: required(
                definition_level_encoding,
                "definition_level_encoding",
            )?,
            repetition_level_encoding: required(
                repetition_level_encoding,
                "repetition_level_encoding",
            )?,
            statistics,
        })
    }

    fn write_thrift<W: Write>(&self, prot: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last = self.num_values.write_thrift_field(prot, 1, 0)?;
        last = i32::from(self.encoding).write_thrift_field(prot, 2, last)?;
        last = i32::from(self.definition_level_encoding).write_thrift_field(prot, 3, last)?;
        last = i32::from(self.repetition_level_encoding).write_thrift_field(prot, 4, last)?;
        if let Some(statistics) = &self.statistics {
            prot.write_field_begin(FieldType::Struct, 5, last)?;
            statistics.write_thrift(prot)?;
        }
        prot.write_struct_end()
    }
}

impl DataPageHeaderV2 {
    fn read_thrift(prot: &mut ThriftCompactInputProtocol<'_>) -> Result<Self> {
        let mut num_values: Option<i32> = None;
        let mut num_nulls: Option<i32> = None;
        let mut num_rows: Option<i32> = None;
        let mut encoding: Option<Encoding> = None;
        let mut definition_levels_byte_length: Option<i32> = None;
        let mut repetition_levels_byte_length: Option<i32> = None;
        let mut is_compressed: Option<bool> = None;
        let mut statistics: Option<PageStatistics> = None;
        prot.read_struct_begin()?;
        loop {
            let field_ident = prot.read_field_begin()?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => num_values = Some(prot.read_i32()?),
                2 => num_nulls = Some(prot.read_i32()?),
                3 => num_rows = Some(prot.read_i32()?),
                4 => encoding = Some(Encoding::try_from(prot.read_i32()?)?),
                5 => definition_levels_byte_length = Some(prot.read_i32()?),
                6 => repetition_levels_byte_length = Some(prot.read_i32()?),
                7 => is_compressed = Some(prot.read_bool()?),
                8 => statistics = Some(PageStatistics::read_thrift(prot)?),
                _ => prot.skip(field_ident.field_type)?,
            };
        }
        prot.read_struct_end()?;
        Ok(Self {
            num_values: required(num_values, "num_values")?,
            num_nulls: required(num_nulls, "num_nulls")?,
            num_rows: required(num_rows, "num_rows")?,
            encoding: required(encoding, "encoding")?,
            definition_levels_byte_length: required(
                definition_levels_byte_length,
                "definition_levels_byte_length",
            )?,
            repetition_levels_byte_length: required(
                repetition_levels_byte_length,
                "repetition_levels_byte_length",
            )?,
            is_compressed,
            statistics,
        })
    }

    fn write_thrift<W: Write>(&self, prot: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last = self.num_values.write_thrift_field(prot, 1, 0)?;
        last = self.num_nulls.write_thrift_field(prot, 2, last)?;
        last = self.num_rows.write_thrift_field(prot, 3, last)?;
        last = i32::from(self.encoding).write_thrift_field(prot, 4, last)?;
        last = self
            .definition_levels_byte_length
            .write_thrift_field(prot, 5, last)?;
        last = self
            .repetition_levels_byte_length
            .write_thrift_field(prot, 6, last)?;
        if let Some(is_compressed) = self.is_compressed {
            last = is_compressed.write_thrift_field(prot, 7, last)?;
        }
        if let Some(statistics) = &self.statistics {
            prot.write_field_begin(FieldType::Struct, 8, last)?;
            statistics.write_thrift(prot)?;
        }
        prot.write_struct_end()
    }
}

impl DictionaryPageHeader {
    fn read_thrift(prot: &mut ThriftCompactInputProtocol<'_>) -> Result<Self> {
        let mut num_values: Option<i32> = None;
        let mut encoding: Option<Encoding> = None;
        let mut is_sorted: Option<bool> = None;
        prot.read_struct_begin()?;
        loop {
            let field_ident = prot.read_field_begin()?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => num_values = Some(prot.read_i32()?),
                2 => encoding = Some(Encoding::try_from(prot.read_i32()?)?),
                3 => is_sorted = Some(prot.read_bool()?),
                _ => prot.skip(field_ident.field_type)?,
            };
        }
        prot.read_struct_end()?;
        Ok(Self {
            num_values: required(num_values, "num_values")?,
            encoding: required(encoding, "encoding")?,
            is_sorted,
        })
    }

    fn write_thrift<W: Write>(&self, prot: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last = self.num_values.write_thrift_field(prot, 1, 0)?;
        last = i32::from(self.encoding).write_thrift_field(prot, 2, last)?;
        if let Some(is_sorted) = self.is_sorted {
            is_sorted.write_thrift_field(prot, 3, last)?;
        }
        prot.write_struct_end()
    }
}

impl PageStatistics {
    fn read_thrift(prot: &mut ThriftCompactInputProtocol<'_>) -> Result<Self> {
        let mut statistics = PageStatistics::default();
        prot.read_struct_begin()?;
        loop {
            let field_ident = prot.read_field_begin()?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => statistics.max = Some(prot.read_bytes()?.to_vec()),
                2 => statistics.min = Some(prot.read_bytes()?.to_vec()),
                3 => statistics.null_count = Some(prot.read_i64()?),
                4 => statistics.distinct_count = Some(prot.read_i64()?),
                5 => statistics.max_value = Some(prot.read_bytes()?.to_vec()),
                6 => statistics.min_value = Some(prot.read_bytes()?.to_vec()),
                _ => prot.skip(field_ident.field_type)?,
            };
        }
        prot.read_struct_end()?;
        Ok(statistics)
    }

    fn write_thrift<W: Write>(&self, prot: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last = 0;
        if let Some(max) = &self.max {
            last = max[..].write_thrift_field(prot, 1, last)?;
        }
        if let Some(min) = &self.min {
            last = min[..].write_thrift_field(prot, 2, last)?;
        }
        if let Some(null_count) = self.null_count {
            last = null_count.write_thrift_field(prot, 3, last)?;
        }
        if let Some(distinct_count) = self.distinct_count {
            last = distinct_count.write_thrift_field(prot, 4, last)?;
        }
        if let Some(max_value) = &self.max_value {
            last = max_value[..].write_thrift_field(prot, 5, last)?;
        }
        if let Some(min_value) = &self.min_value {
            min_value[..].write_thrift_field(prot, 6, last)?;
        }
        prot.write_struct_end()
    }
}

#[inline]
fn required<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| malformed_err!("Required field {} is missing", name))
}

/// A [`Write`] that counts the bytes passing through it.
struct CountingWrite<W> {
    inner: W,
    bytes_written: usize,
}

impl<W: Write> Write for CountingWrite<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bytes_written += n;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_page_header() -> PageHeader {
        PageHeader {
            r#type: PageType::DATA_PAGE,
            uncompressed_page_size: 300,
            compressed_page_size: 120,
            crc: None,
            data_page_header: Some(DataPageHeader {
                num_values: 100,
                encoding: Encoding::PLAIN,
                definition_level_encoding: Encoding::RLE,
                repetition_level_encoding: Encoding::BIT_PACKED,
                statistics: None,
            }),
            index_page_header: None,
            dictionary_page_header: None,
            data_page_header_v2: None,
        }
    }

    #[test]
    fn test_data_page_header_bytes() {
        let mut buf = vec![];
        let len = data_page_header().write_to(&mut buf).unwrap();
        assert_eq!(len, buf.len());
        assert_eq!(
            buf,
            vec![
                0x15, 0x00, // type = DATA_PAGE
                0x15, 0xD8, 0x04, // uncompressed_page_size = 300
                0x15, 0xF0, 0x01, // compressed_page_size = 120
                0x2C, // field 5, struct
                0x15, 0xC8, 0x01, // num_values = 100
                0x15, 0x00, // encoding = PLAIN
                0x15, 0x06, // definition_level_encoding = RLE
                0x15, 0x08, // repetition_level_encoding = BIT_PACKED
                0x00, 0x00,
            ]
        );
        let (read_len, header) = PageHeader::read_from_slice(&buf).unwrap();
        assert_eq!(read_len, buf.len());
        assert_eq!(header, data_page_header());
        assert!(header.is_data_page());
        assert_eq!(header.num_values(), Some(100));
        assert_eq!(header.encoding(), Some(Encoding::PLAIN));
    }

    #[test]
    fn test_header_roundtrip_all_page_types() {
        let statistics = PageStatistics {
            null_count: Some(3),
            distinct_count: Some(7),
            min_value: Some(vec![1, 0, 0, 0]),
            max_value: Some(vec![9, 0, 0, 0]),
            ..Default::default()
        };
        let headers = vec![
            PageHeader {
                crc: Some(-12345),
                data_page_header: Some(DataPageHeader {
                    statistics: Some(statistics.clone()),
                    ..data_page_header().data_page_header.unwrap()
                }),
                ..data_page_header()
            },
            PageHeader {
                r#type: PageType::DICTIONARY_PAGE,
                uncompressed_page_size: 16,
                compressed_page_size: 16,
                crc: None,
                data_page_header: None,
                index_page_header: None,
                dictionary_page_header: Some(DictionaryPageHeader {
                    num_values: 4,
                    encoding: Encoding::PLAIN_DICTIONARY,
                    is_sorted: Some(false),
                }),
                data_page_header_v2: None,
            },
            PageHeader {
                r#type: PageType::DATA_PAGE_V2,
                uncompressed_page_size: 64,
                compressed_page_size: 40,
                crc: None,
                data_page_header: None,
                index_page_header: None,
                dictionary_page_header: None,
                data_page_header_v2: Some(DataPageHeaderV2 {
                    num_values: 10,
                    num_nulls: 2,
                    num_rows: 5,
                    encoding: Encoding::RLE_DICTIONARY,
                    definition_levels_byte_length: 3,
                    repetition_levels_byte_length: 4,
                    is_compressed: Some(true),
                    statistics: Some(statistics),
                }),
            },
            PageHeader {
                r#type: PageType::INDEX_PAGE,
                uncompressed_page_size: 0,
                compressed_page_size: 0,
                crc: None,
                data_page_header: None,
                index_page_header: Some(()),
                dictionary_page_header: None,
                data_page_header_v2: None,
            },
        ];

        for header in headers {
            let mut buf = vec![];
            header.write_to(&mut buf).unwrap();
            let (len, read) = PageHeader::read_from_slice(&buf).unwrap();
            assert_eq!(len, buf.len());
            assert_eq!(read, header);
        }
    }

    #[test]
    fn test_unknown_fields_skipped() {
        let mut buf = vec![];
        data_page_header().write_to(&mut buf).unwrap();
        // replace the final stop with field 9 (binary) followed by a stop
        buf.pop();
        buf.extend_from_slice(&[0x48, 0x02, 0xAA, 0xBB, 0x00]);
        let (len, header) = PageHeader::read_from_slice(&buf).unwrap();
        assert_eq!(len, buf.len());
        assert_eq!(header, data_page_header());
    }

    #[test]
    fn test_truncated_header() {
        let mut buf = vec![];
        data_page_header().write_to(&mut buf).unwrap();
        for len in 0..buf.len() {
            match PageHeader::read_from_slice(&buf[..len]) {
                Err(ParquetError::TruncatedInput(_)) => {}
                other => panic!("expected truncated input at {len}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_missing_required_field() {
        // only the page type
        let buf = [0x15, 0x00, 0x00];
        let err = PageHeader::read_from_slice(&buf).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed header: Required field uncompressed_page_size is missing"
        );
    }

    #[test]
    fn test_invalid_page_type() {
        let buf = [0x15, 0x0A, 0x00];
        assert!(matches!(
            PageHeader::read_from_slice(&buf),
            Err(ParquetError::MalformedHeader(_))
        ));
    }
}
