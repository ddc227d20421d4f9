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

//! Decodes column chunks laid out byte for byte the way parquet-mr 1.x writes them:
//! v1 data pages, RLE levels with a 4-byte length prefix, and short hybrid streams
//! stored as a single bit-packed group padded with zeros to eight values. Page
//! headers are spelled out in the thrift compact protocol.

use std::sync::Arc;

use bytes::Bytes;
use parquet_codec::basic::{Encoding, Repetition, Type};
use parquet_codec::column::reader::{
    get_column_reader, get_typed_column_reader, ColumnChunkReader, ColumnReader,
};
use parquet_codec::data_type::{BoolType, ByteArray, ByteArrayType, DataType};
use parquet_codec::errors::ParquetError;
use parquet_codec::file::metadata::ColumnChunkMetaData;
use parquet_codec::file::serialized_reader::SerializedPageReader;
use parquet_codec::schema::types::{ColumnDescPtr, ColumnDescriptor};

fn descr(physical_type: Type, repetition: Repetition) -> ColumnDescPtr {
    Arc::new(
        ColumnDescriptor::builder(vec!["c".to_string()], physical_type)
            .with_repetitions(vec![repetition])
            .build()
            .unwrap(),
    )
}

/// Concatenates the pages of a chunk and opens a reader over them.
fn open(descr: &ColumnDescPtr, pages: &[&[u8]], dictionary_len: Option<usize>) -> ColumnReader {
    let chunk = Bytes::from(pages.concat());
    let metadata = ColumnChunkMetaData::builder(descr.clone())
        .set_encodings(vec![Encoding::PLAIN, Encoding::RLE])
        .set_num_values(0)
        .set_total_compressed_size(chunk.len() as i64)
        .set_total_uncompressed_size(chunk.len() as i64)
        .set_dictionary_page_offset(dictionary_len.map(|_| 0))
        .set_data_page_offset(dictionary_len.unwrap_or(0) as i64)
        .build()
        .unwrap();
    let page_reader = SerializedPageReader::new(Arc::new(chunk), &metadata).unwrap();
    get_column_reader(descr.clone(), Box::new(page_reader))
}

fn read_all<T: DataType>(
    reader: &mut ColumnChunkReader<T>,
    batch_size: usize,
) -> (Vec<i16>, Vec<i16>, Vec<T::T>) {
    let (mut def_levels, mut rep_levels, mut values) = (vec![], vec![], vec![]);
    loop {
        match reader.read_batch(batch_size, &mut def_levels, &mut rep_levels, &mut values) {
            Ok(_) => {}
            Err(ParquetError::EndOfChunk) => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    (def_levels, rep_levels, values)
}

fn byte_arrays(values: &[&str]) -> Vec<ByteArray> {
    values.iter().map(|v| ByteArray::from(*v)).collect()
}

#[test]
fn test_required_boolean_plain() {
    let page: &[u8] = &[
        // type DATA_PAGE, uncompressed 1, compressed 1
        0x15, 0x00, 0x15, 0x02, 0x15, 0x02,
        // data_page_header: 6 values, PLAIN, BIT_PACKED levels
        0x2C, 0x15, 0x0C, 0x15, 0x00, 0x15, 0x08, 0x15, 0x08, 0x00,
        0x00,
        // true, true, false, true, false, true
        0b0010_1011,
    ];
    let descr = descr(Type::BOOLEAN, Repetition::REQUIRED);
    let mut reader = get_typed_column_reader::<BoolType>(open(&descr, &[page], None));

    let (def_levels, rep_levels, values) = read_all(&mut reader, 100);
    assert_eq!(values, vec![true, true, false, true, false, true]);
    assert_eq!(def_levels, vec![0; 6]);
    assert_eq!(rep_levels, vec![0; 6]);
}

#[test]
fn test_optional_byte_array_plain() {
    let page: &[u8] = &[
        // type DATA_PAGE, uncompressed 30, compressed 30
        0x15, 0x00, 0x15, 0x3C, 0x15, 0x3C,
        // data_page_header: 6 values, PLAIN, RLE definition levels, BIT_PACKED
        // repetition levels, statistics { null_count: 2 }
        0x2C, 0x15, 0x0C, 0x15, 0x00, 0x15, 0x06, 0x15, 0x08, 0x1C, 0x36, 0x04, 0x00,
        0x00, 0x00,
        // definition levels: one bit-packed group of [0, 1, 1, 1, 0, 1] and padding
        0x02, 0x00, 0x00, 0x00, 0x03, 0x2E,
        // values
        0x02, 0x00, 0x00, 0x00, b'o', b'2',
        0x02, 0x00, 0x00, 0x00, b'o', b'3',
        0x02, 0x00, 0x00, 0x00, b'o', b'4',
        0x02, 0x00, 0x00, 0x00, b'o', b'6',
    ];
    let descr = descr(Type::BYTE_ARRAY, Repetition::OPTIONAL);
    let mut reader = get_typed_column_reader::<ByteArrayType>(open(&descr, &[page], None));

    let header = reader.page_header().unwrap();
    assert_eq!(header.num_values(), Some(6));
    assert_eq!(header.statistics().unwrap().null_count, Some(2));

    let (def_levels, rep_levels, values) = read_all(&mut reader, 4);
    assert_eq!(def_levels, vec![0, 1, 1, 1, 0, 1]);
    assert_eq!(rep_levels, vec![0; 6]);
    assert_eq!(values, byte_arrays(&["o2", "o3", "o4", "o6"]));
}

/// Levels of a repeated column holding the lists
/// `[]`, `[]`, `[a]`, `[b, c, d]`, `[]`, `[e]`.
const REPEATED_LEVELS: [u8; 12] = [
    // repetition levels [0, 0, 0, 0, 1, 1, 0, 0]
    0x02, 0x00, 0x00, 0x00, 0x03, 0x30,
    // definition levels [0, 0, 1, 1, 1, 1, 0, 1]
    0x02, 0x00, 0x00, 0x00, 0x03, 0xBC,
];

#[test]
fn test_repeated_boolean_plain() {
    let header: &[u8] = &[
        // type DATA_PAGE, uncompressed 13, compressed 13
        0x15, 0x00, 0x15, 0x1A, 0x15, 0x1A,
        // data_page_header: 8 values, PLAIN, RLE levels
        0x2C, 0x15, 0x10, 0x15, 0x00, 0x15, 0x06, 0x15, 0x06, 0x00,
        0x00,
    ];
    // true, true, false, true, true
    let values: &[u8] = &[0b0001_1011];
    let descr = descr(Type::BOOLEAN, Repetition::REPEATED);
    let mut reader =
        get_typed_column_reader::<BoolType>(open(&descr, &[header, &REPEATED_LEVELS[..], values], None));

    let (def_levels, rep_levels, values) = read_all(&mut reader, 100);
    assert_eq!(rep_levels, vec![0, 0, 0, 0, 1, 1, 0, 0]);
    assert_eq!(def_levels, vec![0, 0, 1, 1, 1, 1, 0, 1]);
    assert_eq!(values, vec![true, true, false, true, true]);
}

#[test]
fn test_repeated_byte_array_dictionary() {
    let dictionary_page: &[u8] = &[
        // type DICTIONARY_PAGE, uncompressed 40, compressed 40
        0x15, 0x04, 0x15, 0x50, 0x15, 0x50,
        // dictionary_page_header: 5 values, PLAIN_DICTIONARY
        0x4C, 0x15, 0x0A, 0x15, 0x04, 0x00,
        0x00,
        0x04, 0x00, 0x00, 0x00, b'p', b'3', b'_', b'1',
        0x04, 0x00, 0x00, 0x00, b'p', b'4', b'_', b'1',
        0x04, 0x00, 0x00, 0x00, b'p', b'4', b'_', b'2',
        0x04, 0x00, 0x00, 0x00, b'p', b'4', b'_', b'3',
        0x04, 0x00, 0x00, 0x00, b'p', b'6', b'_', b'1',
    ];
    let data_header: &[u8] = &[
        // type DATA_PAGE, uncompressed 17, compressed 17
        0x15, 0x00, 0x15, 0x22, 0x15, 0x22,
        // data_page_header: 8 values, PLAIN_DICTIONARY, RLE levels
        0x2C, 0x15, 0x10, 0x15, 0x04, 0x15, 0x06, 0x15, 0x06, 0x00,
        0x00,
    ];
    // bit width 3, one bit-packed group of keys [0, 1, 2, 3, 4] and padding
    let keys: &[u8] = &[0x03, 0x03, 0x88, 0x46, 0x00];

    let descr = descr(Type::BYTE_ARRAY, Repetition::REPEATED);
    let column = open(
        &descr,
        &[dictionary_page, data_header, &REPEATED_LEVELS[..], keys],
        Some(dictionary_page.len()),
    );
    let mut reader = get_typed_column_reader::<ByteArrayType>(column);

    assert_eq!(reader.page_header().unwrap().num_values(), Some(8));
    let dictionary = reader.dictionary_page_header().unwrap();
    assert_eq!(dictionary.num_values(), Some(5));
    assert_eq!(dictionary.encoding(), Some(Encoding::PLAIN_DICTIONARY));

    let (def_levels, rep_levels, values) = read_all(&mut reader, 3);
    assert_eq!(rep_levels, vec![0, 0, 0, 0, 1, 1, 0, 0]);
    assert_eq!(def_levels, vec![0, 0, 1, 1, 1, 1, 0, 1]);
    assert_eq!(values, byte_arrays(&["p3_1", "p4_1", "p4_2", "p4_3", "p6_1"]));

    assert!(matches!(reader.read(1), Err(ParquetError::EndOfChunk)));
}
