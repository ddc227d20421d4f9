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

//! Contains the page writer that serializes a column chunk into a byte sink.

use std::io::{BufWriter, IoSlice, Write};

use bytes::Bytes;
use tracing::trace;

use crate::column::page::{CompressedPage, Page, PageWriteSpec, PageWriter};
use crate::compression::Codec;
use crate::errors::{ParquetError, Result};

/// A wrapper around a [`Write`] that keeps track of the number
/// of bytes that have been written. The given [`Write`] is wrapped
/// with a [`BufWriter`] to optimize writing performance.
pub struct TrackedWrite<W: Write> {
    inner: BufWriter<W>,
    bytes_written: usize,
}

impl<W: Write> TrackedWrite<W> {
    /// Create a new [`TrackedWrite`] from a [`Write`]
    pub fn new(inner: W) -> Self {
        let buf_write = BufWriter::new(inner);
        Self {
            inner: buf_write,
            bytes_written: 0,
        }
    }

    /// Returns the number of bytes written to this instance
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Returns a reference to the underlying writer.
    pub fn inner(&self) -> &W {
        self.inner.get_ref()
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.inner.into_inner().map_err(|err| {
            ParquetError::General(format!("fail to get inner writer: {:?}", err.to_string()))
        })
    }
}

impl<W: Write> Write for TrackedWrite<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let bytes = self.inner.write(buf)?;
        self.bytes_written += bytes;
        Ok(bytes)
    }

    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> std::io::Result<usize> {
        let bytes = self.inner.write_vectored(bufs)?;
        self.bytes_written += bytes;
        Ok(bytes)
    }

    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        self.inner.write_all(buf)?;
        self.bytes_written += buf.len();

        Ok(())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// Compresses the buffer of an uncompressed `page` with `compressor`.
///
/// The level section of a data page v2 is kept uncompressed ahead of the
/// compressed values. Without a compressor the buffer is left untouched.
pub fn compress_page(page: Page, compressor: Option<&mut Box<dyn Codec>>) -> Result<CompressedPage> {
    let uncompressed_size = page.buffer().len();
    let compressor = match compressor {
        Some(compressor) => compressor,
        None => return Ok(CompressedPage::new(page, uncompressed_size)),
    };

    let compressed = match page {
        Page::DataPage {
            buf,
            num_values,
            encoding,
            def_level_encoding,
            rep_level_encoding,
            statistics,
        } => {
            let mut output_buf = Vec::with_capacity(buf.len());
            compressor.compress(&buf, &mut output_buf)?;
            Page::DataPage {
                buf: Bytes::from(output_buf),
                num_values,
                encoding,
                def_level_encoding,
                rep_level_encoding,
                statistics,
            }
        }
        Page::DataPageV2 {
            buf,
            num_values,
            encoding,
            num_nulls,
            num_rows,
            def_levels_byte_len,
            rep_levels_byte_len,
            statistics,
            ..
        } => {
            let offset = (def_levels_byte_len + rep_levels_byte_len) as usize;
            if offset > buf.len() {
                return Err(general_err!(
                    "Level section of {} bytes exceeds page of {} bytes",
                    offset,
                    buf.len()
                ));
            }
            let mut output_buf = Vec::from(&buf[..offset]);
            compressor.compress(&buf[offset..], &mut output_buf)?;
            Page::DataPageV2 {
                buf: Bytes::from(output_buf),
                num_values,
                encoding,
                num_nulls,
                num_rows,
                def_levels_byte_len,
                rep_levels_byte_len,
                is_compressed: true,
                statistics,
            }
        }
        Page::DictionaryPage {
            buf,
            num_values,
            encoding,
            is_sorted,
        } => {
            let mut output_buf = Vec::with_capacity(buf.len());
            compressor.compress(&buf, &mut output_buf)?;
            Page::DictionaryPage {
                buf: Bytes::from(output_buf),
                num_values,
                encoding,
                is_sorted,
            }
        }
    };
    Ok(CompressedPage::new(compressed, uncompressed_size))
}

/// A serialized implementation for Parquet [`PageWriter`].
/// Writes and serializes pages into output stream.
///
/// `SerializedPageWriter` should not be used after calling `close()`.
pub struct SerializedPageWriter<W: Write> {
    sink: TrackedWrite<W>,
}

impl<W: Write> SerializedPageWriter<W> {
    /// Creates new page writer.
    pub fn new(sink: W) -> Self {
        Self {
            sink: TrackedWrite::new(sink),
        }
    }

    /// Returns the number of bytes written so far, page headers included.
    pub fn bytes_written(&self) -> usize {
        self.sink.bytes_written()
    }

    /// Flushes and returns the underlying sink.
    pub fn into_inner(self) -> Result<W> {
        self.sink.into_inner()
    }
}

impl<W: Write + Send> PageWriter for SerializedPageWriter<W> {
    fn write_page(&mut self, page: CompressedPage) -> Result<PageWriteSpec> {
        let page_type = page.page_type();
        let start_pos = self.sink.bytes_written() as u64;

        let page_header = page.to_header()?;
        let header_size = page_header.write_to(&mut self.sink)?;
        self.sink.write_all(page.data())?;

        let mut spec = PageWriteSpec::new();
        spec.page_type = page_type;
        spec.uncompressed_size = page.uncompressed_size() + header_size;
        spec.compressed_size = page.compressed_size() + header_size;
        spec.offset = start_pos;
        spec.bytes_written = self.sink.bytes_written() as u64 - start_pos;
        spec.num_values = page.num_values();

        trace!(
            "Wrote {} with {} values at offset {}, {} bytes",
            page_type,
            spec.num_values,
            spec.offset,
            spec.bytes_written
        );
        Ok(spec)
    }

    fn close(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}
