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

//! A codec for the column chunks of [Apache Parquet](https://parquet.apache.org/) files.
//!
//! The crate decodes (and, to round-trip, encodes) the pages of a single column chunk:
//! it parses page headers, decompresses page payloads, decodes repetition and definition
//! levels and turns PLAIN, dictionary and delta encoded values into typed Rust values.
//! Locating a column chunk inside a file, from the file footer and schema, is left to
//! the caller, who hands a [`ColumnDescriptor`](schema::types::ColumnDescriptor) and a
//! [`ColumnChunkMetaData`](file::metadata::ColumnChunkMetaData) to the reader.
//!
//! # APIs
//!
//! ## Column chunks
//!
//! [`column::reader::ColumnChunkReader`] reads the levels and values of a column chunk
//! in batches that transparently span pages, pulling pages from a
//! [`column::page::PageReader`] such as [`file::reader::SerializedPageReader`].
//! [`column::writer::ColumnChunkWriter`] is its counterpart on the write side.
//!
//! ## Pages
//!
//! The [`file`] module reads and writes the serialized pages of a chunk from any
//! [`file::reader::ChunkReader`], including files and in-memory buffers.
//!
//! ## Encodings
//!
//! The [`encodings`] module holds the value, level and dictionary codecs, built on the
//! RLE/bit-packing hybrid in [`encodings::rle`].
//!
//! # Example
//!
//! ```rust,no_run
//! # use std::{fs::File, sync::Arc};
//! # use parquet_codec::basic::{Compression, Type};
//! # use parquet_codec::column::reader::{get_column_reader, ColumnReader};
//! # use parquet_codec::file::metadata::ColumnChunkMetaData;
//! # use parquet_codec::file::reader::SerializedPageReader;
//! # use parquet_codec::schema::types::ColumnDescriptor;
//! let descr = Arc::new(ColumnDescriptor::builder("id", Type::INT64).build().unwrap());
//! // Offsets and sizes normally come from the file footer
//! let metadata = ColumnChunkMetaData::builder(descr.clone())
//!     .set_compression(Compression::SNAPPY)
//!     .set_data_page_offset(4)
//!     .set_total_compressed_size(1024)
//!     .build()
//!     .unwrap();
//!
//! let file = Arc::new(File::open("data.parquet").unwrap());
//! let pages = SerializedPageReader::new(file, &metadata).unwrap();
//! if let ColumnReader::Int64ColumnReader(mut reader) = get_column_reader(descr, Box::new(pages)) {
//!     while let Ok(batch) = reader.read(1024) {
//!         println!("{:?}", batch.values());
//!     }
//! }
//! ```

#[macro_use]
pub mod errors;
pub mod basic;

pub mod data_type;

pub mod column;
pub mod compression;
pub mod encodings;
pub mod file;
pub(crate) mod parquet_thrift;
pub mod schema;
pub mod util;
