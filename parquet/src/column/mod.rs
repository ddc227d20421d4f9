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

//! Low level column reader and writer APIs.
//!
//! This API is designed for reading and writing column values, definition and repetition
//! levels directly.
//!
//! # Example of writing and reading data
//!
//! Data has the following format:
//! ```text
//! +---------------+
//! |         values|
//! +---------------+
//! |[1, 2]         |
//! |[3, null, null]|
//! +---------------+
//! ```
//!
//! The example uses column writer and reader APIs to write raw values, definition and
//! repetition levels into an in-memory column chunk and read them back.
//!
//! ```rust
//! # use std::sync::Arc;
//! #
//! # use bytes::Bytes;
//! # use parquet_codec::{
//! #    basic::{Repetition, Type},
//! #    column::{reader::ColumnChunkReader, writer::ColumnChunkWriter},
//! #    data_type::Int32Type,
//! #    file::{properties::WriterProperties, reader::SerializedPageReader, writer::SerializedPageWriter},
//! #    schema::types::{ColumnDescriptor, ColumnPath},
//! # };
//! #
//! let path = ColumnPath::new(vec!["values".into(), "list".into(), "element".into()]);
//! let descr = Arc::new(
//!     ColumnDescriptor::builder(path, Type::INT32)
//!         .with_repetitions(vec![
//!             Repetition::OPTIONAL,
//!             Repetition::REPEATED,
//!             Repetition::OPTIONAL,
//!         ])
//!         .build()
//!         .unwrap(),
//! );
//!
//! // Writing data using column writer API.
//!
//! let mut chunk = Vec::new();
//! let page_writer = Box::new(SerializedPageWriter::new(&mut chunk));
//! let props = Arc::new(WriterProperties::default());
//! let mut writer = ColumnChunkWriter::<Int32Type>::new(descr.clone(), props, page_writer).unwrap();
//! writer
//!     .write_batch(&[1, 2, 3], Some(&[3, 3, 3, 2, 2]), Some(&[0, 1, 0, 1, 1]))
//!     .unwrap();
//! let metadata = writer.close().unwrap();
//!
//! // Reading data using column reader API.
//!
//! let page_reader = SerializedPageReader::new(Arc::new(Bytes::from(chunk)), &metadata).unwrap();
//! let mut reader = ColumnChunkReader::<Int32Type>::new(descr, Box::new(page_reader));
//!
//! let mut values = vec![];
//! let mut def_levels = vec![];
//! let mut rep_levels = vec![];
//! let (num_values, num_levels) = reader
//!     .read_batch(8, &mut def_levels, &mut rep_levels, &mut values)
//!     .unwrap();
//!
//! assert_eq!(num_values, 3);
//! assert_eq!(num_levels, 5);
//! assert_eq!(values, vec![1, 2, 3]);
//! assert_eq!(def_levels, vec![3, 3, 3, 2, 2]);
//! assert_eq!(rep_levels, vec![0, 1, 0, 1, 1]);
//!
//! // The chunk is exhausted
//! assert!(reader.read(8).err().unwrap().is_end_of_chunk());
//! ```

pub mod page;
pub mod reader;
pub mod writer;
