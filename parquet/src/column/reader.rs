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

//! Contains column reader API.

use std::fmt;

use tracing::{debug, trace};

use super::page::{Page, PageReader};
use crate::basic::*;
use crate::column::reader::decoder::ColumnValueDecoder;
use crate::data_type::*;
use crate::encodings::levels::LevelDecoder;
use crate::errors::{ParquetError, Result};
use crate::file::metadata::thrift::PageHeader;
use crate::schema::types::ColumnDescPtr;

pub(crate) mod decoder;

/// Column reader for a Parquet type.
pub enum ColumnReader {
    /// Column reader for boolean type
    BoolColumnReader(ColumnChunkReader<BoolType>),
    /// Column reader for int32 type
    Int32ColumnReader(ColumnChunkReader<Int32Type>),
    /// Column reader for int64 type
    Int64ColumnReader(ColumnChunkReader<Int64Type>),
    /// Column reader for int96 type
    Int96ColumnReader(ColumnChunkReader<Int96Type>),
    /// Column reader for float type
    FloatColumnReader(ColumnChunkReader<FloatType>),
    /// Column reader for double type
    DoubleColumnReader(ColumnChunkReader<DoubleType>),
    /// Column reader for byte array type
    ByteArrayColumnReader(ColumnChunkReader<ByteArrayType>),
    /// Column reader for fixed length byte array type
    FixedLenByteArrayColumnReader(ColumnChunkReader<FixedLenByteArrayType>),
}

/// Gets a specific column reader corresponding to column descriptor `col_descr`. The
/// column reader will read from pages in `col_page_reader`.
pub fn get_column_reader(
    col_descr: ColumnDescPtr,
    col_page_reader: Box<dyn PageReader>,
) -> ColumnReader {
    match col_descr.physical_type() {
        Type::BOOLEAN => {
            ColumnReader::BoolColumnReader(ColumnChunkReader::new(col_descr, col_page_reader))
        }
        Type::INT32 => {
            ColumnReader::Int32ColumnReader(ColumnChunkReader::new(col_descr, col_page_reader))
        }
        Type::INT64 => {
            ColumnReader::Int64ColumnReader(ColumnChunkReader::new(col_descr, col_page_reader))
        }
        Type::INT96 => {
            ColumnReader::Int96ColumnReader(ColumnChunkReader::new(col_descr, col_page_reader))
        }
        Type::FLOAT => {
            ColumnReader::FloatColumnReader(ColumnChunkReader::new(col_descr, col_page_reader))
        }
        Type::DOUBLE => {
            ColumnReader::DoubleColumnReader(ColumnChunkReader::new(col_descr, col_page_reader))
        }
        Type::BYTE_ARRAY => ColumnReader::ByteArrayColumnReader(ColumnChunkReader::new(
            col_descr,
            col_page_reader,
        )),
        Type::FIXED_LEN_BYTE_ARRAY => ColumnReader::FixedLenByteArrayColumnReader(
            ColumnChunkReader::new(col_descr, col_page_reader),
        ),
    }
}

/// Gets a typed column reader for the specific type `T`, by "up-casting" `col_reader` of
/// non-generic type to a generic column reader type `ColumnChunkReader`.
///
/// Panics if actual enum value for `col_reader` does not match the type `T`.
pub fn get_typed_column_reader<T: DataType>(col_reader: ColumnReader) -> ColumnChunkReader<T> {
    T::get_column_reader(col_reader).unwrap_or_else(|| {
        panic!(
            "Failed to convert column reader into a typed column reader for `{}` type",
            T::get_physical_type()
        )
    })
}

/// Levels and non-null values decoded by [`ColumnChunkReader::read`].
pub struct ColumnBatch<T: DataType> {
    def_levels: Vec<i16>,
    rep_levels: Vec<i16>,
    values: Vec<T::T>,
}

impl<T: DataType> fmt::Debug for ColumnBatch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnBatch")
            .field("def_levels", &self.def_levels)
            .field("rep_levels", &self.rep_levels)
            .field("values", &self.values)
            .finish()
    }
}

impl<T: DataType> ColumnBatch<T> {
    /// Definition level of every slot, one per level read.
    pub fn def_levels(&self) -> &[i16] {
        &self.def_levels
    }

    /// Repetition level of every slot, one per level read.
    pub fn rep_levels(&self) -> &[i16] {
        &self.rep_levels
    }

    /// The non-null values, in slot order.
    pub fn values(&self) -> &[T::T] {
        &self.values
    }

    pub fn num_levels(&self) -> usize {
        self.def_levels.len()
    }

    pub fn num_values(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.def_levels.is_empty()
    }

    /// Returns the `(definition, repetition)` level pair of every slot.
    pub fn levels(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.def_levels
            .iter()
            .copied()
            .zip(self.rep_levels.iter().copied())
    }

    /// Consumes the batch, returning definition levels, repetition levels and values.
    pub fn into_parts(self) -> (Vec<i16>, Vec<i16>, Vec<T::T>) {
        (self.def_levels, self.rep_levels, self.values)
    }
}

/// Reads the values and levels of one column chunk, page after page.
///
/// The reader pulls pages from a [`PageReader`], builds the chunk's dictionary when it
/// meets the dictionary page and hides page boundaries from the caller: a read that
/// exhausts a page carries on with the next one.
///
/// Once the chunk has no data page left every call returns
/// [`ParquetError::EndOfChunk`]. Any other error is fatal and is returned again by
/// every subsequent call.
pub struct ColumnChunkReader<T: DataType> {
    descr: ColumnDescPtr,
    page_reader: Box<dyn PageReader>,

    // The total number of levels stored in the data page.
    num_buffered_values: usize,

    // The number of levels from the current data page that have been decoded into
    // internal buffers
    num_decoded_values: usize,

    def_level_decoder: LevelDecoder,
    rep_level_decoder: LevelDecoder,
    values_decoder: ColumnValueDecoder<T>,

    page_header: Option<PageHeader>,
    dictionary_page_header: Option<PageHeader>,

    // Error met while loading a page after a batch had already produced levels
    pending_error: Option<ParquetError>,
    // Terminal state, either `EndOfChunk` or the first fatal error
    finished: Option<ParquetError>,
}

impl<T: DataType> ColumnChunkReader<T> {
    /// Creates new column reader based on column descriptor and page reader.
    pub fn new(descr: ColumnDescPtr, page_reader: Box<dyn PageReader>) -> Self {
        let values_decoder = ColumnValueDecoder::new(&descr);
        Self {
            descr,
            page_reader,
            num_buffered_values: 0,
            num_decoded_values: 0,
            def_level_decoder: LevelDecoder::constant(0),
            rep_level_decoder: LevelDecoder::constant(0),
            values_decoder,
            page_header: None,
            dictionary_page_header: None,
            pending_error: None,
            finished: None,
        }
    }

    /// Returns the descriptor of the column being read.
    pub fn descr(&self) -> &ColumnDescPtr {
        &self.descr
    }

    /// Reads up to `max_levels` levels, appending definition levels to `def_levels`,
    /// repetition levels to `rep_levels` and the non-null values to `values`.
    ///
    /// Returns the number of values and the number of levels appended. Columns without
    /// definition levels get a `0` definition level per slot, likewise for repetition.
    ///
    /// Fewer than `max_levels` levels are returned only at the end of the column chunk,
    /// or when the next page could not be loaded: that error is then returned by the
    /// next call. On error nothing is appended.
    pub fn read_batch(
        &mut self,
        max_levels: usize,
        def_levels: &mut Vec<i16>,
        rep_levels: &mut Vec<i16>,
        values: &mut Vec<T::T>,
    ) -> Result<(usize, usize)> {
        self.check_state()?;

        let def_start = def_levels.len();
        let rep_start = rep_levels.len();
        let values_start = values.len();

        match self.read_levels_and_values(max_levels, def_levels, rep_levels, values) {
            Ok(read) => Ok(read),
            Err(e) => {
                def_levels.truncate(def_start);
                rep_levels.truncate(rep_start);
                values.truncate(values_start);
                Err(self.fail(e))
            }
        }
    }

    /// Reads up to `max_levels` levels into a new [`ColumnBatch`].
    ///
    /// See [`Self::read_batch`].
    pub fn read(&mut self, max_levels: usize) -> Result<ColumnBatch<T>> {
        let mut batch = ColumnBatch {
            def_levels: Vec::new(),
            rep_levels: Vec::new(),
            values: Vec::new(),
        };
        self.read_batch(
            max_levels,
            &mut batch.def_levels,
            &mut batch.rep_levels,
            &mut batch.values,
        )?;
        Ok(batch)
    }

    /// Discards the rest of the current data page, or the whole next data page if the
    /// current one is exhausted, without decoding it.
    pub fn skip_page(&mut self) -> Result<()> {
        self.check_state()?;

        if self.num_decoded_values < self.num_buffered_values {
            trace!(
                "Skipping {} levels left in the current page",
                self.num_buffered_values - self.num_decoded_values
            );
            self.num_decoded_values = self.num_buffered_values;
            self.page_header = None;
            return Ok(());
        }

        let result = match self.peek_data_page() {
            Ok(Some(header)) => {
                trace!("Skipping {:?} page", header.r#type);
                self.page_reader.skip_next_page()
            }
            Ok(None) => Err(ParquetError::EndOfChunk),
            Err(e) => Err(e),
        };
        result.map_err(|e| self.fail(e))
    }

    /// Returns the header of the data page the next read decodes from.
    ///
    /// The dictionary page, if not read yet, is read on the way.
    pub fn page_header(&mut self) -> Result<PageHeader> {
        self.check_state()?;

        if self.num_decoded_values < self.num_buffered_values {
            if let Some(header) = &self.page_header {
                return Ok(header.clone());
            }
        }

        match self.peek_data_page() {
            Ok(Some(header)) => Ok(header),
            Ok(None) => Err(self.fail(ParquetError::EndOfChunk)),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Returns the header of the chunk's dictionary page, once it has been read.
    pub fn dictionary_page_header(&self) -> Option<&PageHeader> {
        self.dictionary_page_header.as_ref()
    }

    /// Checks whether there is more data to read from this column.
    ///
    /// If the current page is fully decoded, this will load the next page (if it
    /// exists). Returns `Ok(false)` at the end of the column chunk.
    pub fn has_next(&mut self) -> Result<bool> {
        match &self.finished {
            Some(e) if e.is_end_of_chunk() => return Ok(false),
            Some(e) => return Err(e.clone()),
            None => {}
        }
        if let Some(e) = self.pending_error.take() {
            return Err(self.fail(e));
        }
        if self.num_decoded_values < self.num_buffered_values {
            return Ok(true);
        }
        match self.read_new_page() {
            Ok(true) => Ok(true),
            Ok(false) => {
                self.fail(ParquetError::EndOfChunk);
                Ok(false)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn check_state(&mut self) -> Result<()> {
        if let Some(e) = &self.finished {
            return Err(e.clone());
        }
        if let Some(e) = self.pending_error.take() {
            return Err(self.fail(e));
        }
        Ok(())
    }

    /// Records `e` as the terminal state of this reader and returns it.
    fn fail(&mut self, e: ParquetError) -> ParquetError {
        if e.is_end_of_chunk() {
            debug!("Reached the end of column chunk {}", self.descr.path());
        } else {
            debug!("Reading column chunk {} failed: {}", self.descr.path(), e);
        }
        self.num_decoded_values = self.num_buffered_values;
        self.finished = Some(e.clone());
        e
    }

    fn read_levels_and_values(
        &mut self,
        max_levels: usize,
        def_levels: &mut Vec<i16>,
        rep_levels: &mut Vec<i16>,
        values: &mut Vec<T::T>,
    ) -> Result<(usize, usize)> {
        let max_def_level = self.descr.max_def_level();

        let mut values_read = 0;
        let mut levels_read = 0;

        while levels_read < max_levels {
            if self.num_decoded_values == self.num_buffered_values {
                match self.read_new_page() {
                    Ok(true) => {}
                    Ok(false) if levels_read == 0 => return Err(ParquetError::EndOfChunk),
                    Ok(false) => break,
                    Err(e) if levels_read == 0 => return Err(e),
                    Err(e) => {
                        self.pending_error = Some(e);
                        break;
                    }
                }
            }

            let remaining = self.num_buffered_values - self.num_decoded_values;
            let batch_size = remaining.min(max_levels - levels_read);

            let rep_start = rep_levels.len();
            rep_levels.resize(rep_start + batch_size, 0);
            let read = self.rep_level_decoder.get(&mut rep_levels[rep_start..])?;
            if read != batch_size {
                return Err(eof_err!(
                    "insufficient repetition levels read from column - expected: {}, got: {}",
                    batch_size,
                    read
                ));
            }

            let def_start = def_levels.len();
            def_levels.resize(def_start + batch_size, 0);
            let read = self.def_level_decoder.get(&mut def_levels[def_start..])?;
            if read != batch_size {
                return Err(eof_err!(
                    "insufficient definition levels read from column - expected: {}, got: {}",
                    batch_size,
                    read
                ));
            }

            // Nulls take a level slot but nothing in the value stream
            let num_values = if max_def_level > 0 {
                def_levels[def_start..]
                    .iter()
                    .filter(|level| **level == max_def_level)
                    .count()
            } else {
                batch_size
            };

            let values_start = values.len();
            values.resize(values_start + num_values, T::T::default());
            self.values_decoder.read(&mut values[values_start..])?;

            self.num_decoded_values += batch_size;
            levels_read += batch_size;
            values_read += num_values;
        }

        Ok((values_read, levels_read))
    }

    /// Peeks the header of the next data page, reading the dictionary page first if
    /// it comes next. Returns `None` once the chunk has no page left.
    fn peek_data_page(&mut self) -> Result<Option<PageHeader>> {
        loop {
            match self.page_reader.peek_next_page()? {
                None => return Ok(None),
                Some(header) if header.is_dictionary_page() => self.read_dictionary_page(header)?,
                Some(header) => return Ok(Some(header)),
            }
        }
    }

    fn read_dictionary_page(&mut self, header: PageHeader) -> Result<()> {
        match self.page_reader.get_next_page()? {
            Some(Page::DictionaryPage {
                buf,
                num_values,
                encoding,
                is_sorted: _,
            }) => {
                self.values_decoder.set_dict(buf, num_values, encoding)?;
                self.dictionary_page_header = Some(header);
                Ok(())
            }
            _ => Err(general_err!("Expected a dictionary page")),
        }
    }

    /// Reads a new page and set up the decoders for levels, values or dictionary.
    /// Returns false if there's no page left.
    fn read_new_page(&mut self) -> Result<bool> {
        loop {
            let header = match self.peek_data_page()? {
                Some(header) => header,
                // No more page to read
                None => return Ok(false),
            };
            let page = self
                .page_reader
                .get_next_page()?
                .ok_or_else(|| general_err!("Page reader has no page after its peeked header"))?;

            match page {
                Page::DataPage {
                    buf,
                    num_values,
                    encoding,
                    def_level_encoding,
                    rep_level_encoding,
                    statistics: _,
                } => {
                    let num_values = num_values as usize;
                    if num_values == 0 {
                        continue;
                    }

                    let max_rep_level = self.descr.max_rep_level();
                    let max_def_level = self.descr.max_def_level();

                    // Repetition levels come first, then definition levels, then values
                    let mut offset = 0;
                    self.rep_level_decoder = v1_level_decoder(max_rep_level, rep_level_encoding)?;
                    offset += self
                        .rep_level_decoder
                        .set_data(num_values, buf.slice(offset..))?;

                    self.def_level_decoder = v1_level_decoder(max_def_level, def_level_encoding)?;
                    offset += self
                        .def_level_decoder
                        .set_data(num_values, buf.slice(offset..))?;

                    // v1 pages do not record the null count, the level count bounds the values
                    self.values_decoder
                        .set_data(encoding, buf.slice(offset..), num_values)?;

                    trace!(
                        "Loaded data page of {} levels encoded with {}",
                        num_values,
                        encoding
                    );
                    self.start_page(header, num_values);
                    return Ok(true);
                }
                Page::DataPageV2 {
                    buf,
                    num_values,
                    encoding,
                    num_nulls,
                    num_rows: _,
                    def_levels_byte_len,
                    rep_levels_byte_len,
                    is_compressed: _,
                    statistics: _,
                } => {
                    if num_nulls > num_values {
                        return Err(corrupt_err!(
                            "more nulls than values in page, contained {} values and {} nulls",
                            num_values,
                            num_nulls
                        ));
                    }
                    let num_levels = num_values as usize;
                    if num_levels == 0 {
                        continue;
                    }

                    let rep_len = rep_levels_byte_len as usize;
                    let def_len = def_levels_byte_len as usize;
                    if rep_len + def_len > buf.len() {
                        return Err(corrupt_err!(
                            "DataPage v2 levels of {} bytes exceed the page of {} bytes",
                            rep_len + def_len,
                            buf.len()
                        ));
                    }

                    // DataPage v2 only supports RLE encoding for levels
                    self.rep_level_decoder = v2_level_decoder(self.descr.max_rep_level());
                    self.rep_level_decoder
                        .set_data_range(num_levels, &buf, 0, rep_len)?;

                    self.def_level_decoder = v2_level_decoder(self.descr.max_def_level());
                    self.def_level_decoder
                        .set_data_range(num_levels, &buf, rep_len, def_len)?;

                    self.values_decoder.set_data(
                        encoding,
                        buf.slice(rep_len + def_len..),
                        (num_values - num_nulls) as usize,
                    )?;

                    trace!(
                        "Loaded data page v2 of {} levels ({} nulls) encoded with {}",
                        num_levels,
                        num_nulls,
                        encoding
                    );
                    self.start_page(header, num_levels);
                    return Ok(true);
                }
                Page::DictionaryPage { .. } => {
                    return Err(general_err!("Unexpected dictionary page after a data page header"));
                }
            }
        }
    }

    fn start_page(&mut self, header: PageHeader, num_levels: usize) {
        self.page_header = Some(header);
        self.num_buffered_values = num_levels;
        self.num_decoded_values = 0;
    }
}

fn v1_level_decoder(max_level: i16, encoding: Encoding) -> Result<LevelDecoder> {
    if max_level > 0 {
        LevelDecoder::v1(encoding, max_level)
    } else {
        Ok(LevelDecoder::constant(0))
    }
}

fn v2_level_decoder(max_level: i16) -> LevelDecoder {
    if max_level > 0 {
        LevelDecoder::v2(max_level)
    } else {
        LevelDecoder::constant(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Arc;

    use bytes::Bytes;
    use rand::distr::uniform::SampleUniform;

    use crate::column::page::Page;
    use crate::schema::types::{ColumnDescriptor, ColumnPath};
    use crate::util::test_common::make_pages;
    use crate::util::test_common::page_util::{
        DataPageBuilder, DataPageBuilderImpl, InMemoryPageReader,
    };

    const NUM_LEVELS: usize = 128;
    const NUM_PAGES: usize = 2;

    fn required_descr(physical_type: Type) -> ColumnDescPtr {
        Arc::new(ColumnDescriptor::builder("a", physical_type).build().unwrap())
    }

    fn optional_descr(physical_type: Type) -> ColumnDescPtr {
        Arc::new(
            ColumnDescriptor::builder("a", physical_type)
                .with_repetition(Repetition::OPTIONAL)
                .build()
                .unwrap(),
        )
    }

    fn repeated_descr(physical_type: Type) -> ColumnDescPtr {
        let path = ColumnPath::new(vec!["a".to_string(), "b".to_string()]);
        Arc::new(
            ColumnDescriptor::builder(path, physical_type)
                .with_repetitions(vec![Repetition::OPTIONAL, Repetition::REPEATED])
                .build()
                .unwrap(),
        )
    }

    fn reader_for<T: DataType>(descr: &ColumnDescPtr, pages: VecDeque<Page>) -> ColumnChunkReader<T> {
        let page_reader = Box::new(InMemoryPageReader::new(pages));
        ColumnChunkReader::new(descr.clone(), page_reader)
    }

    /// Writes random pages, reads them back with batches of `batch_size` levels and
    /// compares levels and values.
    fn test_read_batch<T: DataType>(
        descr: ColumnDescPtr,
        encoding: Encoding,
        batch_size: usize,
        min: T::T,
        max: T::T,
        use_v2: bool,
    ) where
        T::T: PartialOrd + SampleUniform + Copy,
    {
        let mut def_levels = Vec::new();
        let mut rep_levels = Vec::new();
        let mut values = Vec::new();
        let mut pages = VecDeque::new();
        make_pages::<T>(
            descr.clone(),
            encoding,
            NUM_PAGES,
            NUM_LEVELS,
            min,
            max,
            &mut def_levels,
            &mut rep_levels,
            &mut values,
            &mut pages,
            use_v2,
        );

        let mut reader = reader_for::<T>(&descr, pages);
        let mut actual_def = Vec::new();
        let mut actual_rep = Vec::new();
        let mut actual_values = Vec::new();
        loop {
            match reader.read_batch(batch_size, &mut actual_def, &mut actual_rep, &mut actual_values)
            {
                Ok((_, levels)) => assert!(levels > 0 && levels <= batch_size),
                Err(e) => {
                    assert!(e.is_end_of_chunk(), "{e}");
                    break;
                }
            }
        }

        assert_eq!(actual_values, values);
        assert_eq!(actual_def.len(), NUM_PAGES * NUM_LEVELS);
        if descr.max_def_level() > 0 {
            assert_eq!(actual_def, def_levels);
        } else {
            assert!(actual_def.iter().all(|l| *l == 0));
        }
        if descr.max_rep_level() > 0 {
            assert_eq!(actual_rep, rep_levels);
        } else {
            assert!(actual_rep.iter().all(|l| *l == 0));
        }
    }

    #[test]
    fn test_read_plain_required_int32() {
        let descr = required_descr(Type::INT32);
        test_read_batch::<Int32Type>(descr.clone(), Encoding::PLAIN, 50, i32::MIN, i32::MAX, false);
        test_read_batch::<Int32Type>(descr, Encoding::PLAIN, 50, i32::MIN, i32::MAX, true);
    }

    #[test]
    fn test_read_plain_optional_int64() {
        let descr = optional_descr(Type::INT64);
        test_read_batch::<Int64Type>(descr.clone(), Encoding::PLAIN, 17, -100, 100, false);
        test_read_batch::<Int64Type>(descr, Encoding::PLAIN, 17, -100, 100, true);
    }

    #[test]
    fn test_read_plain_repeated_double() {
        let descr = repeated_descr(Type::DOUBLE);
        test_read_batch::<DoubleType>(descr.clone(), Encoding::PLAIN, 100, -1.0, 1.0, false);
        test_read_batch::<DoubleType>(descr, Encoding::PLAIN, 100, -1.0, 1.0, true);
    }

    #[test]
    fn test_read_dictionary_optional_int32() {
        let descr = optional_descr(Type::INT32);
        test_read_batch::<Int32Type>(descr.clone(), Encoding::RLE_DICTIONARY, 33, 0, 10, false);
        test_read_batch::<Int32Type>(descr, Encoding::RLE_DICTIONARY, 33, 0, 10, true);
    }

    #[test]
    fn test_read_dictionary_repeated_float() {
        let descr = repeated_descr(Type::FLOAT);
        test_read_batch::<FloatType>(descr.clone(), Encoding::PLAIN_DICTIONARY, 64, 0.0, 4.0, false);
        test_read_batch::<FloatType>(descr, Encoding::PLAIN_DICTIONARY, 64, 0.0, 4.0, true);
    }

    #[test]
    fn test_read_delta_required_int64() {
        let descr = required_descr(Type::INT64);
        test_read_batch::<Int64Type>(descr, Encoding::DELTA_BINARY_PACKED, 1000, -5000, 5000, false);
    }

    fn int32_page(descr: &ColumnDescPtr, values: &[i32], use_v2: bool) -> Page {
        let mut pb = DataPageBuilderImpl::new(descr.clone(), values.len() as u32, use_v2);
        pb.add_values::<Int32Type>(Encoding::PLAIN, values);
        pb.consume()
    }

    #[test]
    fn test_batch_spans_pages() {
        let descr = required_descr(Type::INT32);
        let pages = VecDeque::from(vec![
            int32_page(&descr, &[1, 2, 3], false),
            int32_page(&descr, &[4, 5], true),
            int32_page(&descr, &[6, 7, 8, 9], false),
        ]);
        let mut reader = reader_for::<Int32Type>(&descr, pages);

        let batch = reader.read(4).unwrap();
        assert_eq!(batch.values(), &[1, 2, 3, 4]);
        assert_eq!(batch.num_levels(), 4);

        let batch = reader.read(100).unwrap();
        assert_eq!(batch.values(), &[5, 6, 7, 8, 9]);
        assert!(batch.levels().all(|levels| levels == (0, 0)));
    }

    #[test]
    fn test_end_of_chunk_is_repeated() {
        let descr = required_descr(Type::INT32);
        let pages = VecDeque::from(vec![int32_page(&descr, &[1, 2], false)]);
        let mut reader = reader_for::<Int32Type>(&descr, pages);

        assert!(reader.has_next().unwrap());
        assert_eq!(reader.read(10).unwrap().values(), &[1, 2]);
        for _ in 0..3 {
            let err = reader.read(10).err().unwrap();
            assert!(matches!(err, ParquetError::EndOfChunk));
        }
        assert!(!reader.has_next().unwrap());
        assert!(reader.skip_page().unwrap_err().is_end_of_chunk());
        assert!(reader.page_header().unwrap_err().is_end_of_chunk());
    }

    #[test]
    fn test_empty_chunk() {
        let descr = required_descr(Type::INT32);
        let mut reader = reader_for::<Int32Type>(&descr, VecDeque::new());
        assert!(reader.read(1).err().unwrap().is_end_of_chunk());

        let mut reader = reader_for::<Int32Type>(&descr, VecDeque::new());
        assert!(!reader.has_next().unwrap());
    }

    #[test]
    fn test_column_batch_debug() {
        let batch = ColumnBatch::<Int32Type> {
            def_levels: vec![1, 0],
            rep_levels: vec![0, 0],
            values: vec![7],
        };
        assert_eq!(
            format!("{batch:?}"),
            "ColumnBatch { def_levels: [1, 0], rep_levels: [0, 0], values: [7] }"
        );
    }

    #[test]
    fn test_read_zero_levels() {
        let descr = required_descr(Type::INT32);
        let pages = VecDeque::from(vec![int32_page(&descr, &[1], false)]);
        let mut reader = reader_for::<Int32Type>(&descr, pages);
        assert!(reader.read(0).unwrap().is_empty());
        assert_eq!(reader.read(1).unwrap().values(), &[1]);
    }

    #[test]
    fn test_read_batch_appends() {
        let descr = optional_descr(Type::INT32);
        let mut pb = DataPageBuilderImpl::new(descr.clone(), 4, false);
        pb.add_def_levels(1, &[1, 0, 0, 1]);
        pb.add_values::<Int32Type>(Encoding::PLAIN, &[10, 20]);
        let mut reader = reader_for::<Int32Type>(&descr, VecDeque::from(vec![pb.consume()]));

        let mut def_levels = vec![7];
        let mut rep_levels = vec![7];
        let mut values = vec![7];
        let read = reader
            .read_batch(3, &mut def_levels, &mut rep_levels, &mut values)
            .unwrap();
        assert_eq!(read, (1, 3));
        assert_eq!(def_levels, vec![7, 1, 0, 0]);
        assert_eq!(rep_levels, vec![7, 0, 0, 0]);
        assert_eq!(values, vec![7, 10]);

        let read = reader
            .read_batch(3, &mut def_levels, &mut rep_levels, &mut values)
            .unwrap();
        assert_eq!(read, (1, 1));
        assert_eq!(values, vec![7, 10, 20]);
    }

    #[test]
    fn test_error_after_values_is_deferred() {
        let descr = required_descr(Type::INT32);
        let bad_page = Page::DataPage {
            buf: Bytes::from(vec![0; 8]),
            num_values: 2,
            encoding: Encoding::DELTA_BYTE_ARRAY,
            def_level_encoding: Encoding::RLE,
            rep_level_encoding: Encoding::RLE,
            statistics: None,
        };
        let pages = VecDeque::from(vec![int32_page(&descr, &[1, 2, 3], false), bad_page]);
        let mut reader = reader_for::<Int32Type>(&descr, pages);

        let batch = reader.read(10).unwrap();
        assert_eq!(batch.values(), &[1, 2, 3]);

        for _ in 0..2 {
            let err = reader.read(10).err().unwrap();
            assert!(matches!(err, ParquetError::UnsupportedEncoding(_)), "{err}");
        }
        assert!(reader.has_next().is_err());
    }

    #[test]
    fn test_mid_page_error_is_fatal() {
        let descr = required_descr(Type::INT32);
        // Declares 4 values but carries only 2
        let page = Page::DataPage {
            buf: Bytes::from(vec![1, 0, 0, 0, 2, 0, 0, 0]),
            num_values: 4,
            encoding: Encoding::PLAIN,
            def_level_encoding: Encoding::RLE,
            rep_level_encoding: Encoding::RLE,
            statistics: None,
        };
        let mut reader = reader_for::<Int32Type>(&descr, VecDeque::from(vec![page]));

        let mut def_levels = vec![];
        let mut rep_levels = vec![];
        let mut values = vec![];
        let err = reader
            .read_batch(4, &mut def_levels, &mut rep_levels, &mut values)
            .unwrap_err();
        assert!(matches!(err, ParquetError::TruncatedInput(_)), "{err}");
        assert!(def_levels.is_empty() && values.is_empty());

        let again = reader.read(1).err().unwrap();
        assert_eq!(again.to_string(), err.to_string());
    }

    #[test]
    fn test_dictionary_page_without_dictionary() {
        let descr = required_descr(Type::INT32);
        let mut pb = DataPageBuilderImpl::new(descr.clone(), 1, false);
        pb.add_indices(Bytes::from(vec![1, 2, 0]));
        let mut reader = reader_for::<Int32Type>(&descr, VecDeque::from(vec![pb.consume()]));

        let err = reader.read(1).err().unwrap();
        assert!(matches!(err, ParquetError::CorruptPage(_)), "{err}");
    }

    #[test]
    fn test_dictionary_page_count_exceeds_payload() {
        let descr = required_descr(Type::BYTE_ARRAY);
        let dict = Page::DictionaryPage {
            buf: Bytes::from(vec![1, 0, 0, 0, b'x']),
            num_values: u32::MAX,
            encoding: Encoding::PLAIN,
            is_sorted: false,
        };
        let mut pb = DataPageBuilderImpl::new(descr.clone(), 1, false);
        pb.add_indices(Bytes::from(vec![1, 2, 0]));
        let pages = VecDeque::from(vec![dict, pb.consume()]);
        let mut reader = reader_for::<ByteArrayType>(&descr, pages);

        let err = reader.read(1).unwrap_err();
        assert!(matches!(err, ParquetError::TruncatedInput(_)), "{err}");
        assert_eq!(reader.read(1).unwrap_err().to_string(), err.to_string());
    }

    #[test]
    fn test_too_many_nulls_v2() {
        let descr = optional_descr(Type::INT32);
        let page = Page::DataPageV2 {
            buf: Bytes::new(),
            num_values: 1,
            encoding: Encoding::PLAIN,
            num_nulls: 2,
            num_rows: 1,
            def_levels_byte_len: 0,
            rep_levels_byte_len: 0,
            is_compressed: false,
            statistics: None,
        };
        let mut reader = reader_for::<Int32Type>(&descr, VecDeque::from(vec![page]));
        let err = reader.read(1).err().unwrap();
        assert!(matches!(err, ParquetError::CorruptPage(_)), "{err}");
    }

    #[test]
    fn test_skip_page_and_header() {
        let descr = required_descr(Type::INT32);
        let mut pages = VecDeque::new();
        let mut values = Vec::new();
        make_pages::<Int32Type>(
            descr.clone(),
            Encoding::RLE_DICTIONARY,
            3,
            10,
            0,
            5,
            &mut vec![],
            &mut vec![],
            &mut values,
            &mut pages,
            false,
        );
        let mut reader = reader_for::<Int32Type>(&descr, pages);
        assert!(reader.dictionary_page_header().is_none());

        let header = reader.page_header().unwrap();
        assert!(header.is_data_page());
        assert_eq!(header.num_values(), Some(10));
        assert!(reader.dictionary_page_header().unwrap().is_dictionary_page());

        reader.skip_page().unwrap();

        // Partially read page: the header stays and skipping drops the rest
        assert_eq!(reader.read(4).unwrap().values(), &values[10..14]);
        assert_eq!(reader.page_header().unwrap().num_values(), Some(10));
        reader.skip_page().unwrap();

        assert_eq!(reader.read(100).unwrap().values(), &values[20..30]);
        assert!(reader.skip_page().unwrap_err().is_end_of_chunk());
    }

    #[test]
    fn test_zero_value_pages_are_skipped() {
        let descr = required_descr(Type::INT32);
        let pages = VecDeque::from(vec![
            int32_page(&descr, &[], false),
            int32_page(&descr, &[42], false),
        ]);
        let mut reader = reader_for::<Int32Type>(&descr, pages);
        assert_eq!(reader.read(10).unwrap().values(), &[42]);
    }

    #[test]
    fn test_get_column_reader() {
        let descr = required_descr(Type::INT64);
        let pages = VecDeque::new();
        let reader = get_column_reader(descr.clone(), Box::new(InMemoryPageReader::new(pages)));
        assert!(matches!(reader, ColumnReader::Int64ColumnReader(_)));
        let typed = get_typed_column_reader::<Int64Type>(reader);
        assert_eq!(typed.descr().physical_type(), Type::INT64);
    }

    #[test]
    #[should_panic(expected = "Failed to convert column reader into a typed column reader")]
    fn test_get_typed_column_reader_mismatch() {
        let descr = required_descr(Type::INT64);
        let pages: VecDeque<Page> = VecDeque::new();
        let reader = get_column_reader(descr, Box::new(InMemoryPageReader::new(pages)));
        get_typed_column_reader::<Int32Type>(reader);
    }
}
