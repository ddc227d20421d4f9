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

//! Contains implementation of the page reader for a serialized column chunk.
//!
//! [`SerializedPageReader`] walks the byte range of one column chunk, parsing each
//! thrift page header, decompressing the payload and yielding [`Page`]s.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::basic::PageType;
use crate::column::page::{Page, PageReader};
use crate::compression::{create_codec, Codec};
use crate::errors::{ParquetError, Result};
use crate::file::metadata::thrift::PageHeader;
use crate::file::metadata::ColumnChunkMetaData;
use crate::file::properties::{ReaderProperties, ReaderPropertiesPtr};
use crate::file::reader::ChunkReader;

/// Number of bytes fetched for the first attempt at parsing a page header.
///
/// Most headers are a few dozen bytes, headers carrying large statistics need
/// further attempts with a doubled buffer.
const INITIAL_HEADER_PROBE: usize = 256;

/// Decodes a [`Page`] from the provided `buffer`
pub(crate) fn decode_page(
    page_header: PageHeader,
    buffer: Bytes,
    decompressor: Option<&mut Box<dyn Codec>>,
) -> Result<Page> {
    // When processing data page v2, depending on enabled compression for the
    // page, we should account for uncompressed data ('offset') of
    // repetition and definition levels.
    //
    // We always use 0 offset for other pages other than v2, `true` flag means
    // that compression will be applied if decompressor is defined
    let mut offset: usize = 0;
    let mut can_decompress = true;

    if let Some(ref header_v2) = page_header.data_page_header_v2 {
        if header_v2.definition_levels_byte_length < 0
            || header_v2.repetition_levels_byte_length < 0
            || header_v2.definition_levels_byte_length as i64
                + header_v2.repetition_levels_byte_length as i64
                > page_header.uncompressed_page_size as i64
        {
            return Err(corrupt_err!(
                "DataPage v2 header contains implausible values \
                    for definition_levels_byte_length ({}) \
                    and repetition_levels_byte_length ({}) \
                    given DataPage header provides uncompressed_page_size ({})",
                header_v2.definition_levels_byte_length,
                header_v2.repetition_levels_byte_length,
                page_header.uncompressed_page_size
            ));
        }
        offset = usize::try_from(
            header_v2.definition_levels_byte_length + header_v2.repetition_levels_byte_length,
        )?;
        // When is_compressed flag is missing the page is considered compressed
        can_decompress = header_v2.is_compressed.unwrap_or(true);
    }

    let uncompressed_page_size = usize::try_from(page_header.uncompressed_page_size)?;
    let buffer = match decompressor {
        Some(decompressor) if can_decompress => {
            if offset > buffer.len() || offset > uncompressed_page_size {
                return Err(corrupt_err!(
                    "Level section of {} bytes exceeds page of {} bytes",
                    offset,
                    buffer.len()
                ));
            }
            let decompressed_size = uncompressed_page_size - offset;
            let mut decompressed = Vec::with_capacity(uncompressed_page_size);
            decompressed.extend_from_slice(&buffer[..offset]);
            // decompressed size of zero corresponds to a page with no non-null values
            let actual_size = if decompressed_size > 0 {
                let compressed = &buffer[offset..];
                decompressor.decompress(compressed, &mut decompressed, Some(decompressed_size))?
            } else {
                0
            };

            if offset + actual_size != uncompressed_page_size {
                return Err(corrupt_err!(
                    "Actual decompressed size doesn't match the expected one ({} vs {})",
                    offset + actual_size,
                    uncompressed_page_size
                ));
            }
            decompressed.truncate(uncompressed_page_size);

            Bytes::from(decompressed)
        }
        _ => {
            if buffer.len() != uncompressed_page_size {
                return Err(corrupt_err!(
                    "Uncompressed page of {} bytes declares uncompressed_page_size {}",
                    buffer.len(),
                    uncompressed_page_size
                ));
            }
            buffer
        }
    };

    let result = match page_header.r#type {
        PageType::DICTIONARY_PAGE => {
            let dict_header = page_header
                .dictionary_page_header
                .as_ref()
                .ok_or_else(|| malformed_err!("Missing dictionary page header"))?;
            let is_sorted = dict_header.is_sorted.unwrap_or(false);
            Page::DictionaryPage {
                buf: buffer,
                num_values: dict_header.num_values.try_into()?,
                encoding: dict_header.encoding,
                is_sorted,
            }
        }
        PageType::DATA_PAGE => {
            let header = page_header
                .data_page_header
                .ok_or_else(|| malformed_err!("Missing V1 data page header"))?;
            Page::DataPage {
                buf: buffer,
                num_values: header.num_values.try_into()?,
                encoding: header.encoding,
                def_level_encoding: header.definition_level_encoding,
                rep_level_encoding: header.repetition_level_encoding,
                statistics: header.statistics,
            }
        }
        PageType::DATA_PAGE_V2 => {
            let header = page_header
                .data_page_header_v2
                .ok_or_else(|| malformed_err!("Missing V2 data page header"))?;
            let is_compressed = header.is_compressed.unwrap_or(true);
            Page::DataPageV2 {
                buf: buffer,
                num_values: header.num_values.try_into()?,
                encoding: header.encoding,
                num_nulls: header.num_nulls.try_into()?,
                num_rows: header.num_rows.try_into()?,
                def_levels_byte_len: header.definition_levels_byte_length.try_into()?,
                rep_levels_byte_len: header.repetition_levels_byte_length.try_into()?,
                is_compressed,
                statistics: header.statistics,
            }
        }
        _ => {
            // Index pages are skipped by the page reader before reaching here
            return Err(general_err!(
                "Page type {:?} is not supported",
                page_header.r#type
            ));
        }
    };

    Ok(result)
}

fn verify_page_size(
    compressed_size: i32,
    uncompressed_size: i32,
    remaining_bytes: u64,
) -> Result<()> {
    // The page's compressed size should not exceed the remaining bytes that are
    // available to read. The page's uncompressed size is the expected size
    // after decompression, which can never be negative.
    if compressed_size < 0 || compressed_size as u64 > remaining_bytes || uncompressed_size < 0 {
        return Err(corrupt_err!(
            "Page of {} bytes ({} uncompressed) does not fit in the {} bytes left in the column chunk",
            compressed_size,
            uncompressed_size,
            remaining_bytes
        ));
    }
    Ok(())
}

/// A serialized implementation for Parquet [`PageReader`].
///
/// # Example
///
/// ```no_run
/// # use std::{fs::File, sync::Arc};
/// # use parquet_codec::column::page::PageReader;
/// # use parquet_codec::file::metadata::ColumnChunkMetaData;
/// # use parquet_codec::file::serialized_reader::SerializedPageReader;
/// # fn chunk_metadata() -> ColumnChunkMetaData { unimplemented!() }
/// let file = Arc::new(File::open("data.parquet").unwrap());
/// let mut reader = SerializedPageReader::new(file, &chunk_metadata()).unwrap();
/// while let Some(page) = reader.get_next_page().unwrap() {
///     println!("{:?} with {} values", page.page_type(), page.num_values());
/// }
/// ```
pub struct SerializedPageReader<R: ChunkReader> {
    /// The chunk reader
    reader: Arc<R>,

    /// The compression codec for this column chunk. Only set for non-PLAIN codec.
    decompressor: Option<Box<dyn Codec>>,

    /// The current byte offset in the reader
    /// Note that offset is u64 (i.e., not usize) to support 32-bit architectures such as WASM
    offset: u64,

    /// The bytes of the column chunk not yet consumed
    remaining_bytes: u64,

    /// If the next page header has already been "peeked", we will cache it here
    next_page_header: Option<Box<PageHeader>>,

    /// The index of the data page within this column chunk
    page_index: usize,

    /// Upper bound on the size of a single page header
    max_page_header_size: usize,
}

impl<R: ChunkReader> SerializedPageReader<R> {
    /// Creates a new serialized page reader from a chunk reader and metadata
    pub fn new(reader: Arc<R>, column_chunk_metadata: &ColumnChunkMetaData) -> Result<Self> {
        let props = Arc::new(ReaderProperties::builder().build());
        SerializedPageReader::new_with_properties(reader, column_chunk_metadata, props)
    }

    /// Creates a new serialized page reader with custom options.
    pub fn new_with_properties(
        reader: Arc<R>,
        meta: &ColumnChunkMetaData,
        props: ReaderPropertiesPtr,
    ) -> Result<Self> {
        let decompressor = create_codec(meta.compression())?;
        let (start, len) = meta.byte_range();
        debug!(
            "Reading column chunk {} at bytes {}..{} with codec {}",
            meta.column_path(),
            start,
            start + len,
            meta.compression()
        );

        Ok(Self {
            reader,
            decompressor,
            offset: start,
            remaining_bytes: len,
            next_page_header: None,
            page_index: 0,
            max_page_header_size: props.max_page_header_size(),
        })
    }

    /// Returns the offset of the next unread byte of the column chunk
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Reads the page header at the current offset, returning it along with its length.
    ///
    /// Headers are parsed from a buffer that is doubled until the header fits,
    /// bounded by both the remaining chunk bytes and the maximum header size.
    fn read_page_header_len(&self) -> Result<(usize, PageHeader)> {
        let remaining = usize::try_from(self.remaining_bytes).unwrap_or(usize::MAX);
        let limit = remaining.min(self.max_page_header_size);
        let mut probe = limit.min(INITIAL_HEADER_PROBE);
        loop {
            let buffer = self.reader.get_bytes(self.offset, probe)?;
            match PageHeader::read_from_slice(&buffer) {
                Ok(r) => return Ok(r),
                Err(ParquetError::TruncatedInput(_)) if probe < limit => {
                    probe = probe.saturating_mul(2).min(limit);
                }
                Err(ParquetError::TruncatedInput(_)) if limit < remaining => {
                    return Err(malformed_err!(
                        "Page header at offset {} exceeds the maximum size of {} bytes",
                        self.offset,
                        self.max_page_header_size
                    ));
                }
                Err(ParquetError::TruncatedInput(_)) => {
                    return Err(corrupt_err!(
                        "Page header at offset {} extends past the end of the column chunk",
                        self.offset
                    ));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Parses the next page header, skipping index pages, and caches it.
    fn fill_next_page_header(&mut self) -> Result<Option<&PageHeader>> {
        while self.next_page_header.is_none() {
            if self.remaining_bytes == 0 {
                return Ok(None);
            }
            let (header_len, header) = self.read_page_header_len()?;
            self.offset += header_len as u64;
            self.remaining_bytes -= header_len as u64;
            verify_page_size(
                header.compressed_page_size,
                header.uncompressed_page_size,
                self.remaining_bytes,
            )?;
            trace!(
                "Parsed {} header of {} bytes, page of {} bytes at offset {}",
                header.r#type,
                header_len,
                header.compressed_page_size,
                self.offset
            );

            if header.r#type == PageType::INDEX_PAGE {
                debug!("Skipping index page at offset {}", self.offset);
                self.advance(header.compressed_page_size as u64);
                continue;
            }
            self.next_page_header = Some(Box::new(header));
        }
        Ok(self.next_page_header.as_deref())
    }

    fn advance(&mut self, len: u64) {
        self.offset += len;
        self.remaining_bytes -= len;
    }
}

impl<R: ChunkReader> Iterator for SerializedPageReader<R> {
    type Item = Result<Page>;

    fn next(&mut self) -> Option<Self::Item> {
        self.get_next_page().transpose()
    }
}

impl<R: ChunkReader> PageReader for SerializedPageReader<R> {
    fn get_next_page(&mut self) -> Result<Option<Page>> {
        if self.fill_next_page_header()?.is_none() {
            debug!("End of column chunk after {} data pages", self.page_index);
            return Ok(None);
        }
        let header = match self.next_page_header.take() {
            Some(header) => *header,
            None => return Ok(None),
        };

        let data_len = header.compressed_page_size as usize;
        let buffer = self.reader.get_bytes(self.offset, data_len)?;
        self.advance(data_len as u64);

        let page = decode_page(header, buffer, self.decompressor.as_mut())?;
        if page.is_data_page() {
            self.page_index += 1;
        }
        debug!(
            "Read {} with {} values, {} bytes",
            page.page_type(),
            page.num_values(),
            page.buffer().len()
        );
        Ok(Some(page))
    }

    fn peek_next_page(&mut self) -> Result<Option<PageHeader>> {
        Ok(self.fill_next_page_header()?.cloned())
    }

    fn skip_next_page(&mut self) -> Result<()> {
        let (page_type, len) = match self.fill_next_page_header()? {
            Some(header) => (header.r#type, header.compressed_page_size as u64),
            None => return Ok(()),
        };
        debug!("Skipping {} of {} bytes at offset {}", page_type, len, self.offset);

        self.next_page_header = None;
        self.advance(len);
        if matches!(page_type, PageType::DATA_PAGE | PageType::DATA_PAGE_V2) {
            self.page_index += 1;
        }
        Ok(())
    }
}
