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

//! Binary that prints the page headers of one column chunk of a parquet file.
//!
//! # Install
//!
//! `parquet-pages` can be installed using `cargo`:
//! ```
//! cargo install parquet-codec --features=cli
//! ```
//! After this `parquet-pages` should be available:
//! ```
//! parquet-pages XYZ.parquet --offset 4 --length 1024 --type INT64 --codec SNAPPY
//! ```
//!
//! The binary can also be built from the source code and run as follows:
//! ```
//! cargo run --features=cli --bin parquet-pages XYZ.parquet --offset 4 --length 1024 --type INT64
//! ```
//!
//! The byte range, codec, physical type and levels of the chunk are taken from the
//! command line, as found in the file footer by other tools.

use std::fs::File;
use std::sync::Arc;

use clap::Parser;
use parquet_codec::basic::{Compression, Repetition, Type};
use parquet_codec::column::page::PageReader;
use parquet_codec::column::reader::{ColumnChunkReader, ColumnReader, get_column_reader};
use parquet_codec::data_type::DataType;
use parquet_codec::errors::{ParquetError, Result};
use parquet_codec::file::metadata::ColumnChunkMetaData;
use parquet_codec::file::metadata::thrift::PageHeader;
use parquet_codec::file::properties::ReaderProperties;
use parquet_codec::file::reader::SerializedPageReader;
use parquet_codec::schema::types::{ColumnDescriptor, ColumnPath};
use serde::Serialize;

#[derive(Debug, Parser)]
#[clap(author, version, about("Prints the page headers of a parquet column chunk"), long_about = None)]
struct Args {
    #[clap(help("Path to a parquet file"))]
    file: String,

    #[clap(long, help("Offset of the first page of the column chunk"))]
    offset: u64,

    #[clap(long, help("Total compressed size of the column chunk, page headers included"))]
    length: u64,

    #[clap(long = "type", value_parser = parse_type, help("Physical type of the column"))]
    physical_type: Type,

    #[clap(
        long,
        default_value_t = -1,
        help("Length of a FIXED_LEN_BYTE_ARRAY value")
    )]
    type_length: i32,

    #[clap(
        long,
        value_parser = parse_codec,
        default_value = "UNCOMPRESSED",
        help("Compression codec of the column chunk")
    )]
    codec: Compression,

    #[clap(long, default_value_t = 0, help("Maximum definition level of the column"))]
    max_def_level: i16,

    #[clap(long, default_value_t = 0, help("Maximum repetition level of the column"))]
    max_rep_level: i16,

    #[clap(long, help("Maximum size of a page header, in bytes"))]
    max_page_header_size: Option<usize>,

    #[clap(short, long, help("Print one JSON object per page"))]
    json: bool,

    /// Log verbosity.
    ///
    /// Defaults to "warn". Use `-v` for "info", `-vv` for "debug", `-vvv` for "trace".
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    log_verbose_count: u8,
}

/// Summary of one page header.
#[derive(Debug, Serialize)]
struct PageInfo {
    index: usize,
    page_type: String,
    num_values: Option<i32>,
    num_nulls: Option<i64>,
    encoding: Option<String>,
    compressed_page_size: i32,
    uncompressed_page_size: i32,
    crc: Option<i32>,
}

impl PageInfo {
    fn new(index: usize, header: &PageHeader) -> Self {
        let num_nulls = match &header.data_page_header_v2 {
            Some(v2) => Some(v2.num_nulls as i64),
            None => header.statistics().and_then(|s| s.null_count),
        };
        Self {
            index,
            page_type: header.r#type.to_string(),
            num_values: header.num_values(),
            num_nulls,
            encoding: header.encoding().map(|e| e.to_string()),
            compressed_page_size: header.compressed_page_size,
            uncompressed_page_size: header.uncompressed_page_size,
            crc: header.crc,
        }
    }

    fn print(&self, json: bool) -> Result<()> {
        if json {
            let line = serde_json::to_string(self)
                .map_err(|e| ParquetError::General(format!("Failed to serialize page: {e}")))?;
            println!("{line}");
        } else {
            let encoding = self.encoding.as_deref().unwrap_or("-");
            let num_values = self.num_values.map_or("-".to_string(), |n| n.to_string());
            let num_nulls = self.num_nulls.map_or("-".to_string(), |n| n.to_string());
            println!(
                "{:<6} {:<16} {:>10} {:>8} {:<18} {:>12} {:>14}",
                self.index,
                self.page_type,
                num_values,
                num_nulls,
                encoding,
                self.compressed_page_size,
                self.uncompressed_page_size
            );
        }
        Ok(())
    }
}

impl Args {
    fn run(&self) -> Result<()> {
        let descr = Arc::new(self.column_descriptor()?);
        let metadata = ColumnChunkMetaData::builder(descr.clone())
            .set_compression(self.codec)
            .set_data_page_offset(self.offset as i64)
            .set_total_compressed_size(self.length as i64)
            .build()?;

        let mut props = ReaderProperties::builder();
        if let Some(size) = self.max_page_header_size {
            props = props.set_max_page_header_size(size);
        }
        let file = Arc::new(File::open(&self.file)?);
        let page_reader: Box<dyn PageReader> = Box::new(SerializedPageReader::new_with_properties(
            file,
            &metadata,
            Arc::new(props.build()),
        )?);

        if !self.json {
            println!(
                "{:<6} {:<16} {:>10} {:>8} {:<18} {:>12} {:>14}",
                "page", "type", "values", "nulls", "encoding", "compressed", "uncompressed"
            );
        }

        match get_column_reader(descr, page_reader) {
            ColumnReader::BoolColumnReader(r) => self.print_pages(r),
            ColumnReader::Int32ColumnReader(r) => self.print_pages(r),
            ColumnReader::Int64ColumnReader(r) => self.print_pages(r),
            ColumnReader::Int96ColumnReader(r) => self.print_pages(r),
            ColumnReader::FloatColumnReader(r) => self.print_pages(r),
            ColumnReader::DoubleColumnReader(r) => self.print_pages(r),
            ColumnReader::ByteArrayColumnReader(r) => self.print_pages(r),
            ColumnReader::FixedLenByteArrayColumnReader(r) => self.print_pages(r),
        }
    }

    /// Builds a descriptor whose path nests enough repeated and optional groups to
    /// reach the requested levels.
    fn column_descriptor(&self) -> Result<ColumnDescriptor> {
        if self.max_rep_level < 0 || self.max_def_level < self.max_rep_level {
            return Err(ParquetError::General(format!(
                "Invalid levels: max definition level {} must be at least max repetition level {}",
                self.max_def_level, self.max_rep_level
            )));
        }
        let mut repetitions = vec![Repetition::REPEATED; self.max_rep_level as usize];
        let num_optional = (self.max_def_level - self.max_rep_level) as usize;
        repetitions.extend(std::iter::repeat(Repetition::OPTIONAL).take(num_optional));
        if repetitions.is_empty() {
            repetitions.push(Repetition::REQUIRED);
        }
        let path: Vec<String> = (0..repetitions.len()).map(|i| format!("level{i}")).collect();

        ColumnDescriptor::builder(ColumnPath::new(path), self.physical_type)
            .with_length(self.type_length)
            .with_repetitions(repetitions)
            .build()
    }

    fn print_pages<T: DataType>(&self, mut reader: ColumnChunkReader<T>) -> Result<()> {
        let mut index = 0;
        loop {
            let header = match reader.page_header() {
                Ok(header) => header,
                Err(e) if e.is_end_of_chunk() => break,
                Err(e) => return Err(e),
            };
            // The dictionary page is read on the way to the first data page
            if index == 0 {
                if let Some(dict) = reader.dictionary_page_header() {
                    PageInfo::new(index, dict).print(self.json)?;
                    index += 1;
                }
            }
            PageInfo::new(index, &header).print(self.json)?;
            index += 1;
            reader.skip_page()?;
        }
        Ok(())
    }
}

fn parse_type(s: &str) -> Result<Type> {
    s.to_uppercase().parse()
}

fn parse_codec(s: &str) -> Result<Compression> {
    s.parse()
}

fn setup_logging(log_verbose_count: u8) -> Result<()> {
    use tracing_subscriber::{util::SubscriberInitExt, EnvFilter, FmtSubscriber};

    let filter = match log_verbose_count {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| ParquetError::General(format!("set up log env filter: {e}")))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    subscriber
        .try_init()
        .map_err(|e| ParquetError::General(format!("init logging subscriber: {e}")))?;

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.log_verbose_count)?;
    args.run()
}
