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

//! Contains column writer API.

use std::collections::{BTreeSet, VecDeque};

use bytes::Bytes;
use tracing::{debug, trace};

use crate::basic::{Compression, Encoding, PageType};
use crate::column::page::{CompressedPage, Page, PageWriteSpec, PageWriter};
use crate::compression::{create_codec, Codec};
use crate::data_type::DataType;
use crate::encodings::levels::LevelEncoder;
use crate::errors::{ParquetError, Result};
use crate::file::metadata::thrift::PageStatistics;
use crate::file::metadata::ColumnChunkMetaData;
use crate::file::properties::{WriterPropertiesPtr, WriterVersion};
use crate::file::writer::compress_page;
use crate::schema::types::ColumnDescPtr;

use self::encoder::ColumnValueEncoder;

pub(crate) mod encoder;

// Metrics per page
#[derive(Default)]
struct PageMetrics {
    num_buffered_values: u32,
    num_buffered_rows: u32,
    num_page_nulls: u64,
}

// Metrics per column writer
#[derive(Default)]
struct ColumnMetrics {
    total_bytes_written: u64,
    total_rows_written: u64,
    total_uncompressed_size: u64,
    total_compressed_size: u64,
    total_num_values: u64,
    dictionary_page_offset: Option<u64>,
    data_page_offset: Option<u64>,
}

/// Writes the values and levels of one column chunk as a sequence of pages.
///
/// Values are encoded with a dictionary when [`WriterProperties`] enables one, in
/// which case data pages are buffered until [`Self::close`] so that the dictionary
/// page is written first. Otherwise every data page goes to the [`PageWriter`] as
/// soon as it is full.
///
/// [`WriterProperties`]: crate::file::properties::WriterProperties
pub struct ColumnChunkWriter<'a, T: DataType> {
    // Column writer properties
    descr: ColumnDescPtr,
    props: WriterPropertiesPtr,

    page_writer: Box<dyn PageWriter + 'a>,
    codec: Compression,
    compressor: Option<Box<dyn Codec>>,
    encoder: ColumnValueEncoder<T>,

    page_metrics: PageMetrics,
    // Metrics per column writer
    column_metrics: ColumnMetrics,

    encodings: BTreeSet<Encoding>,
    // Reused buffers
    def_levels_sink: Vec<i16>,
    rep_levels_sink: Vec<i16>,
    data_pages: VecDeque<CompressedPage>,
}

impl<'a, T: DataType> ColumnChunkWriter<'a, T> {
    /// Creates a writer for the column `descr`, sending pages to `page_writer`.
    ///
    /// Fails if the compression or the fallback encoding of `props` is not supported
    /// for this column.
    pub fn new(
        descr: ColumnDescPtr,
        props: WriterPropertiesPtr,
        page_writer: Box<dyn PageWriter + 'a>,
    ) -> Result<Self> {
        let codec = props.compression();
        let compressor = create_codec(codec)?;
        let encoder = ColumnValueEncoder::try_new(&descr, props.as_ref())?;

        let mut encodings = BTreeSet::new();
        // Used for level information
        encodings.insert(Encoding::RLE);

        Ok(Self {
            descr,
            props,
            page_writer,
            codec,
            compressor,
            encoder,
            page_metrics: PageMetrics::default(),
            column_metrics: ColumnMetrics::default(),
            encodings,
            def_levels_sink: vec![],
            rep_levels_sink: vec![],
            data_pages: VecDeque::new(),
        })
    }

    /// Writes batch of values, definition levels and repetition levels.
    /// Returns number of values processed (written).
    ///
    /// If definition and repetition levels are provided, we write fully those levels and
    /// select how many values to write (this number will be returned), since number of
    /// actual written values may be smaller than provided values.
    ///
    /// If only values are provided, then all values are written and the length of
    /// of the values buffer is returned.
    ///
    /// Definition and/or repetition levels can be omitted, if values are
    /// non-nullable and/or non-repeated.
    pub fn write_batch(
        &mut self,
        values: &[T::T],
        def_levels: Option<&[i16]>,
        rep_levels: Option<&[i16]>,
    ) -> Result<usize> {
        // We check for DataPage limits only after we have inserted the values. The
        // chunking bounds how far a large write can overshoot the page limits.
        let num_levels = match def_levels {
            Some(def_levels) => def_levels.len(),
            None => values.len(),
        };

        if let Some(rep_levels) = rep_levels {
            if rep_levels.len() != num_levels {
                return Err(general_err!(
                    "Inconsistent length of definition and repetition levels: {} != {}",
                    num_levels,
                    rep_levels.len()
                ));
            }
        }

        // Find out number of batches to process.
        let write_batch_size = self.props.write_batch_size().max(1);

        let mut values_offset = 0;
        let mut levels_offset = 0;
        while levels_offset < num_levels {
            let end = (levels_offset + write_batch_size).min(num_levels);
            values_offset += self.write_mini_batch(
                values,
                values_offset,
                end - levels_offset,
                def_levels.map(|lv| &lv[levels_offset..end]),
                rep_levels.map(|lv| &lv[levels_offset..end]),
            )?;
            levels_offset = end;
        }

        // Return total number of values processed.
        Ok(values_offset)
    }

    /// Returns total number of bytes written by this column writer so far, page headers
    /// included. Buffered data pages are not counted until they are written.
    pub fn get_total_bytes_written(&self) -> u64 {
        self.column_metrics.total_bytes_written
    }

    /// Returns total number of rows written by this column writer so far.
    pub fn get_total_rows_written(&self) -> u64 {
        self.column_metrics.total_rows_written
    }

    /// Returns a reference to a [`ColumnDescPtr`]
    pub fn get_descriptor(&self) -> &ColumnDescPtr {
        &self.descr
    }

    /// Finalizes writes and closes the column writer.
    ///
    /// Writes the dictionary page, if any, then every buffered data page, and returns
    /// the metadata locating them in the page writer's output.
    pub fn close(mut self) -> Result<ColumnChunkMetaData> {
        if self.page_metrics.num_buffered_values > 0 {
            self.add_data_page()?;
        }
        if self.encoder.has_dictionary() {
            self.write_dictionary_page()?;
        }
        self.flush_data_pages()?;
        let metadata = self.write_column_metadata()?;
        self.page_writer.close()?;

        debug!(
            "Closed column chunk {}: {} values, {} bytes",
            self.descr.path(),
            metadata.num_values(),
            metadata.compressed_size()
        );
        Ok(metadata)
    }

    /// Writes mini batch of values, definition and repetition levels.
    /// This allows fine-grained processing of values and maintaining a reasonable
    /// page size.
    fn write_mini_batch(
        &mut self,
        values: &[T::T],
        values_offset: usize,
        num_levels: usize,
        def_levels: Option<&[i16]>,
        rep_levels: Option<&[i16]>,
    ) -> Result<usize> {
        let max_def_level = self.descr.max_def_level();
        let max_rep_level = self.descr.max_rep_level();

        // Process definition levels and determine how many values to write.
        let values_to_write = if max_def_level > 0 {
            let levels = def_levels.ok_or_else(|| {
                general_err!(
                    "Definition levels are required, because max definition level = {}",
                    max_def_level
                )
            })?;

            let mut values_to_write = 0;
            for &level in levels {
                if level < 0 || level > max_def_level {
                    return Err(general_err!(
                        "Definition level {} is out of range [0, {}]",
                        level,
                        max_def_level
                    ));
                }
                if level == max_def_level {
                    values_to_write += 1;
                } else {
                    // We must always compute this as it is used to populate v2 pages
                    self.page_metrics.num_page_nulls += 1
                }
            }

            self.def_levels_sink.extend_from_slice(levels);
            values_to_write
        } else {
            num_levels
        };

        // Process repetition levels and determine how many rows we are about to process.
        if max_rep_level > 0 {
            // A row could contain more than one value.
            let levels = rep_levels.ok_or_else(|| {
                general_err!(
                    "Repetition levels are required, because max repetition level = {}",
                    max_rep_level
                )
            })?;

            // Count the occasions where we start a new row
            for &level in levels {
                if level < 0 || level > max_rep_level {
                    return Err(general_err!(
                        "Repetition level {} is out of range [0, {}]",
                        level,
                        max_rep_level
                    ));
                }
                self.page_metrics.num_buffered_rows += (level == 0) as u32
            }

            self.rep_levels_sink.extend_from_slice(levels);
        } else {
            // Each value is exactly one row.
            // Equals to the number of values, we count nulls as well.
            self.page_metrics.num_buffered_rows += num_levels as u32;
        }

        self.encoder.write(values, values_offset, values_to_write)?;

        self.page_metrics.num_buffered_values += num_levels as u32;

        if self.should_add_data_page() {
            self.add_data_page()?;
        }

        Ok(values_to_write)
    }

    /// Returns true if there is enough data for a data page, false otherwise.
    #[inline]
    fn should_add_data_page(&self) -> bool {
        if self.page_metrics.num_buffered_values == 0 {
            return false;
        }

        self.page_metrics.num_buffered_values as usize >= self.props.data_page_row_count_limit()
            || self.encoder.estimated_data_page_size() >= self.props.data_page_size_limit()
    }

    /// Adds data page.
    /// Data page is either buffered in case of dictionary encoding or written directly.
    fn add_data_page(&mut self) -> Result<()> {
        // Extract encoded values
        let values_data = self.encoder.flush_data_page()?;

        let max_def_level = self.descr.max_def_level();
        let max_rep_level = self.descr.max_rep_level();

        let statistics = Some(PageStatistics {
            null_count: Some(self.page_metrics.num_page_nulls as i64),
            ..Default::default()
        });

        let page = match self.props.writer_version() {
            WriterVersion::PARQUET_1_0 => {
                let mut buffer = vec![];

                if max_rep_level > 0 {
                    buffer.extend_from_slice(&encode_levels_v1(&self.rep_levels_sink, max_rep_level)?);
                }

                if max_def_level > 0 {
                    buffer.extend_from_slice(&encode_levels_v1(&self.def_levels_sink, max_def_level)?);
                }

                buffer.extend_from_slice(&values_data.buf);

                Page::DataPage {
                    buf: Bytes::from(buffer),
                    num_values: self.page_metrics.num_buffered_values,
                    encoding: values_data.encoding,
                    def_level_encoding: Encoding::RLE,
                    rep_level_encoding: Encoding::RLE,
                    statistics,
                }
            }
            WriterVersion::PARQUET_2_0 => {
                let mut rep_levels_byte_len = 0;
                let mut def_levels_byte_len = 0;
                let mut buffer = vec![];

                if max_rep_level > 0 {
                    let levels = encode_levels_v2(&self.rep_levels_sink, max_rep_level);
                    rep_levels_byte_len = levels.len();
                    buffer.extend_from_slice(&levels);
                }

                if max_def_level > 0 {
                    let levels = encode_levels_v2(&self.def_levels_sink, max_def_level);
                    def_levels_byte_len = levels.len();
                    buffer.extend_from_slice(&levels);
                }

                buffer.extend_from_slice(&values_data.buf);

                Page::DataPageV2 {
                    buf: Bytes::from(buffer),
                    num_values: self.page_metrics.num_buffered_values,
                    encoding: values_data.encoding,
                    num_nulls: self.page_metrics.num_page_nulls as u32,
                    num_rows: self.page_metrics.num_buffered_rows,
                    def_levels_byte_len: def_levels_byte_len as u32,
                    rep_levels_byte_len: rep_levels_byte_len as u32,
                    is_compressed: false,
                    statistics,
                }
            }
        };

        // Data Page v2 compresses values only.
        let compressed_page = compress_page(page, self.compressor.as_mut())?;
        trace!(
            "Added {} of {} levels and {} values",
            compressed_page.page_type(),
            self.page_metrics.num_buffered_values,
            values_data.num_values
        );

        // Check if we need to buffer data page or flush it to the sink directly.
        if self.encoder.has_dictionary() {
            self.data_pages.push_back(compressed_page);
        } else {
            self.write_data_page(compressed_page)?;
        }

        // Update total number of rows.
        self.column_metrics.total_rows_written += self.page_metrics.num_buffered_rows as u64;

        // Reset state.
        self.rep_levels_sink.clear();
        self.def_levels_sink.clear();
        self.page_metrics = PageMetrics::default();

        Ok(())
    }

    /// Finalises any outstanding data pages and flushes buffered data pages from
    /// dictionary encoding into underlying sink.
    #[inline]
    fn flush_data_pages(&mut self) -> Result<()> {
        // Write all outstanding data to a new page.
        if self.page_metrics.num_buffered_values > 0 {
            self.add_data_page()?;
        }

        while let Some(page) = self.data_pages.pop_front() {
            self.write_data_page(page)?;
        }

        Ok(())
    }

    /// Assembles column chunk metadata.
    fn write_column_metadata(&mut self) -> Result<ColumnChunkMetaData> {
        let total_compressed_size = self.column_metrics.total_compressed_size as i64;
        let total_uncompressed_size = self.column_metrics.total_uncompressed_size as i64;
        let num_values = self.column_metrics.total_num_values as i64;
        let dict_page_offset = self.column_metrics.dictionary_page_offset.map(|v| v as i64);
        // If data page offset is not set, then no pages have been written
        let data_page_offset = self.column_metrics.data_page_offset.unwrap_or(0) as i64;

        ColumnChunkMetaData::builder(self.descr.clone())
            .set_compression(self.codec)
            .set_encodings(self.encodings.iter().cloned().collect())
            .set_total_compressed_size(total_compressed_size)
            .set_total_uncompressed_size(total_uncompressed_size)
            .set_num_values(num_values)
            .set_data_page_offset(data_page_offset)
            .set_dictionary_page_offset(dict_page_offset)
            .build()
    }

    /// Writes compressed data page into underlying sink and updates global metrics.
    #[inline]
    fn write_data_page(&mut self, page: CompressedPage) -> Result<()> {
        self.encodings.insert(page.encoding());
        let page_spec = self.page_writer.write_page(page)?;
        self.update_metrics_for_page(page_spec);
        Ok(())
    }

    /// Writes dictionary page into underlying sink.
    #[inline]
    fn write_dictionary_page(&mut self) -> Result<()> {
        let page = self
            .encoder
            .flush_dict_page()?
            .ok_or_else(|| general_err!("Dictionary encoder is not set"))?;

        let dict_page = Page::DictionaryPage {
            buf: page.buf,
            num_values: page.num_values as u32,
            encoding: self.props.dictionary_page_encoding(),
            is_sorted: page.is_sorted,
        };
        let compressed_page = compress_page(dict_page, self.compressor.as_mut())?;

        self.encodings.insert(compressed_page.encoding());
        let page_spec = self.page_writer.write_page(compressed_page)?;
        self.update_metrics_for_page(page_spec);
        Ok(())
    }

    /// Updates column writer metrics with each page metadata.
    #[inline]
    fn update_metrics_for_page(&mut self, page_spec: PageWriteSpec) {
        self.column_metrics.total_uncompressed_size += page_spec.uncompressed_size as u64;
        self.column_metrics.total_compressed_size += page_spec.compressed_size as u64;
        self.column_metrics.total_bytes_written += page_spec.bytes_written;

        match page_spec.page_type {
            PageType::DATA_PAGE | PageType::DATA_PAGE_V2 => {
                self.column_metrics.total_num_values += page_spec.num_values as u64;
                if self.column_metrics.data_page_offset.is_none() {
                    self.column_metrics.data_page_offset = Some(page_spec.offset);
                }
            }
            PageType::DICTIONARY_PAGE => {
                self.column_metrics.dictionary_page_offset = Some(page_spec.offset);
            }
            _ => {}
        }
    }
}

/// Encodes definition or repetition levels for Data Page v1.
#[inline]
fn encode_levels_v1(levels: &[i16], max_level: i16) -> Result<Vec<u8>> {
    let mut encoder = LevelEncoder::v1(Encoding::RLE, max_level, levels.len())?;
    encoder.put(levels);
    Ok(encoder.consume())
}

/// Encodes definition or repetition levels for Data Page v2.
/// Encoding is always RLE.
#[inline]
fn encode_levels_v2(levels: &[i16], max_level: i16) -> Vec<u8> {
    let mut encoder = LevelEncoder::v2(max_level, levels.len());
    encoder.put(levels);
    encoder.consume()
}
