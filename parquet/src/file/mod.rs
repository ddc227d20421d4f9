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

//! Low level APIs for reading and writing the pages of a column chunk.
//!
//! Provides the chunk byte sources, page reader and writer, column chunk metadata and
//! reader/writer properties.
//!
//! # See Also:
//! * [`SerializedPageReader`] and [`SerializedPageWriter`] for reading / writing pages
//! * [`metadata`]: for column chunk metadata and page headers
//! * [`properties`]: for reader and writer configuration
//!
//! [`SerializedPageReader`]: serialized_reader::SerializedPageReader
//! [`SerializedPageWriter`]: writer::SerializedPageWriter
//!
//! # Example of listing the pages of a column chunk
//!
//! ```rust,no_run
//! use std::{fs::File, sync::Arc};
//!
//! use parquet_codec::basic::{Compression, Type};
//! use parquet_codec::column::page::PageReader;
//! use parquet_codec::file::metadata::ColumnChunkMetaData;
//! use parquet_codec::file::reader::SerializedPageReader;
//! use parquet_codec::schema::types::ColumnDescriptor;
//!
//! let descr = ColumnDescriptor::builder("id", Type::INT64).build().unwrap();
//! // Offsets and sizes come from the file footer
//! let meta = ColumnChunkMetaData::builder(Arc::new(descr))
//!     .set_compression(Compression::SNAPPY)
//!     .set_data_page_offset(4)
//!     .set_total_compressed_size(1024)
//!     .build()
//!     .unwrap();
//!
//! let file = File::open("/path/to/sample.parquet").unwrap();
//! let mut reader = SerializedPageReader::new(Arc::new(file), &meta).unwrap();
//! while let Some(header) = reader.peek_next_page().unwrap() {
//!     println!("{:?}", header);
//!     reader.skip_next_page().unwrap();
//! }
//! ```
pub mod metadata;
pub mod properties;
pub mod reader;
pub mod serialized_reader;
pub mod writer;
