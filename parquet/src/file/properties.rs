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

//! Configuration via [`WriterProperties`] and [`ReaderProperties`]
use std::str::FromStr;
use std::sync::Arc;

use crate::basic::{Compression, Encoding};

/// Default value for [`WriterProperties::data_page_size_limit`]
pub const DEFAULT_PAGE_SIZE: usize = 1024 * 1024;
/// Default value for [`WriterProperties::data_page_row_count_limit`]
pub const DEFAULT_DATA_PAGE_ROW_COUNT_LIMIT: usize = 20_000;
/// Default value for [`WriterProperties::write_batch_size`]
pub const DEFAULT_WRITE_BATCH_SIZE: usize = 1024;
/// Default value for [`WriterProperties::writer_version`]
pub const DEFAULT_WRITER_VERSION: WriterVersion = WriterVersion::PARQUET_1_0;
/// Default value for [`WriterProperties::compression`]
pub const DEFAULT_COMPRESSION: Compression = Compression::UNCOMPRESSED;
/// Default value for [`WriterProperties::encoding`]
pub const DEFAULT_ENCODING: Encoding = Encoding::PLAIN;
/// Default value for [`WriterProperties::dictionary_enabled`]
pub const DEFAULT_DICTIONARY_ENABLED: bool = true;
/// Default value for [`ReaderProperties::max_page_header_size`]
pub const DEFAULT_MAX_PAGE_HEADER_SIZE: usize = 16 * 1024 * 1024;
/// Default value for [`ReaderProperties::batch_size`]
pub const DEFAULT_READ_BATCH_SIZE: usize = 1024;

/// Parquet writer version.
///
/// Basic constant, which is not part of the Thrift definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum WriterVersion {
    /// Writes `DATA_PAGE` pages with length prefixed levels
    PARQUET_1_0,
    /// Writes `DATA_PAGE_V2` pages with levels stored uncompressed
    PARQUET_2_0,
}

impl WriterVersion {
    /// Returns writer version as `i32`.
    pub fn as_num(&self) -> i32 {
        match self {
            WriterVersion::PARQUET_1_0 => 1,
            WriterVersion::PARQUET_2_0 => 2,
        }
    }
}

impl FromStr for WriterVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PARQUET_1_0" | "parquet_1_0" => Ok(WriterVersion::PARQUET_1_0),
            "PARQUET_2_0" | "parquet_2_0" => Ok(WriterVersion::PARQUET_2_0),
            _ => Err(format!("Invalid writer version: {s}")),
        }
    }
}

/// Reference counted writer properties.
pub type WriterPropertiesPtr = Arc<WriterProperties>;

/// Configuration settings for writing column chunks.
///
/// All properties are immutable, use [`WriterPropertiesBuilder`] to assemble them.
///
/// # Example
///
/// ```rust
/// use parquet_codec::{
///     basic::{Compression, Encoding},
///     file::properties::*,
/// };
///
/// // Create properties with default configuration.
/// let props = WriterProperties::default();
///
/// // Use properties builder to set certain options and assemble the configuration.
/// let props = WriterProperties::builder()
///     .set_writer_version(WriterVersion::PARQUET_2_0)
///     .set_encoding(Encoding::DELTA_BINARY_PACKED)
///     .set_dictionary_enabled(false)
///     .set_compression(Compression::SNAPPY)
///     .build();
///
/// assert_eq!(props.writer_version(), WriterVersion::PARQUET_2_0);
/// assert_eq!(props.encoding(), Encoding::DELTA_BINARY_PACKED);
/// ```
#[derive(Debug, Clone)]
pub struct WriterProperties {
    data_page_size_limit: usize,
    data_page_row_count_limit: usize,
    write_batch_size: usize,
    writer_version: WriterVersion,
    encoding: Encoding,
    compression: Compression,
    dictionary_enabled: bool,
}

impl Default for WriterProperties {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WriterProperties {
    /// Create a new [`WriterProperties`] with the default settings
    ///
    /// See [`WriterProperties::builder`] for customising settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns builder for writer properties with default values.
    pub fn builder() -> WriterPropertiesBuilder {
        WriterPropertiesBuilder::with_defaults()
    }

    /// Returns data page size limit, in bytes of encoded values.
    ///
    /// Note: this is a best effort limit based on the write batch size
    pub fn data_page_size_limit(&self) -> usize {
        self.data_page_size_limit
    }

    /// Returns the maximum number of levels in a data page.
    ///
    /// Note: this is a best effort limit based on the write batch size
    pub fn data_page_row_count_limit(&self) -> usize {
        self.data_page_row_count_limit
    }

    /// Returns configured batch size for writes.
    ///
    /// When writing a batch of data, this setting allows to split it internally into
    /// smaller batches so we can better estimate the size of a page currently being
    /// written.
    pub fn write_batch_size(&self) -> usize {
        self.write_batch_size
    }

    /// Returns configured writer version.
    pub fn writer_version(&self) -> WriterVersion {
        self.writer_version
    }

    /// Returns encoding for data pages when dictionary encoding is disabled.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Returns compression codec applied to every page.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Returns `true` if dictionary encoding is enabled.
    pub fn dictionary_enabled(&self) -> bool {
        self.dictionary_enabled
    }

    /// Returns encoding for dictionary page, when dictionary encoding is enabled.
    #[inline]
    pub fn dictionary_page_encoding(&self) -> Encoding {
        // PLAIN_DICTIONARY encoding is deprecated in writer version 1.
        // Dictionary values are encoded using PLAIN encoding.
        Encoding::PLAIN
    }

    /// Returns encoding for a data page, when dictionary encoding is enabled.
    #[inline]
    pub fn dictionary_data_page_encoding(&self) -> Encoding {
        // PLAIN_DICTIONARY is the only dictionary encoding readers of version 1
        // files understand
        match self.writer_version {
            WriterVersion::PARQUET_1_0 => Encoding::PLAIN_DICTIONARY,
            WriterVersion::PARQUET_2_0 => Encoding::RLE_DICTIONARY,
        }
    }
}

/// Builder for column chunk writer configuration. See example on
/// [`WriterProperties`]
pub struct WriterPropertiesBuilder {
    data_page_size_limit: usize,
    data_page_row_count_limit: usize,
    write_batch_size: usize,
    writer_version: WriterVersion,
    encoding: Encoding,
    compression: Compression,
    dictionary_enabled: bool,
}

impl WriterPropertiesBuilder {
    /// Returns default state of the builder.
    fn with_defaults() -> Self {
        Self {
            data_page_size_limit: DEFAULT_PAGE_SIZE,
            data_page_row_count_limit: DEFAULT_DATA_PAGE_ROW_COUNT_LIMIT,
            write_batch_size: DEFAULT_WRITE_BATCH_SIZE,
            writer_version: DEFAULT_WRITER_VERSION,
            encoding: DEFAULT_ENCODING,
            compression: DEFAULT_COMPRESSION,
            dictionary_enabled: DEFAULT_DICTIONARY_ENABLED,
        }
    }

    /// Finalizes the configuration and returns immutable writer properties struct.
    pub fn build(self) -> WriterProperties {
        WriterProperties {
            data_page_size_limit: self.data_page_size_limit,
            data_page_row_count_limit: self.data_page_row_count_limit,
            write_batch_size: self.write_batch_size,
            writer_version: self.writer_version,
            encoding: self.encoding,
            compression: self.compression,
            dictionary_enabled: self.dictionary_enabled,
        }
    }

    /// Sets writer version.
    pub fn set_writer_version(mut self, value: WriterVersion) -> Self {
        self.writer_version = value;
        self
    }

    /// Sets best effort maximum size of a data page in bytes.
    ///
    /// Note: this is a best effort limit based on value of
    /// [`set_write_batch_size`](Self::set_write_batch_size).
    pub fn set_data_page_size_limit(mut self, value: usize) -> Self {
        self.data_page_size_limit = value;
        self
    }

    /// Sets best effort maximum number of levels in a data page.
    ///
    /// Note: this is a best effort limit based on value of
    /// [`set_write_batch_size`](Self::set_write_batch_size).
    pub fn set_data_page_row_count_limit(mut self, value: usize) -> Self {
        self.data_page_row_count_limit = value;
        self
    }

    /// Sets write batch size.
    pub fn set_write_batch_size(mut self, value: usize) -> Self {
        self.write_batch_size = value;
        self
    }

    /// Sets encoding used when dictionary encoding is disabled.
    ///
    /// Panics if user tries to set dictionary encoding here, use
    /// [`set_dictionary_enabled`](Self::set_dictionary_enabled) instead.
    pub fn set_encoding(mut self, value: Encoding) -> Self {
        if value == Encoding::PLAIN_DICTIONARY || value == Encoding::RLE_DICTIONARY {
            panic!("Dictionary encoding can not be used as fallback encoding");
        }
        self.encoding = value;
        self
    }

    /// Sets compression codec.
    pub fn set_compression(mut self, value: Compression) -> Self {
        self.compression = value;
        self
    }

    /// Sets flag to enable/disable dictionary encoding.
    pub fn set_dictionary_enabled(mut self, value: bool) -> Self {
        self.dictionary_enabled = value;
        self
    }
}

/// Reference counted reader properties.
pub type ReaderPropertiesPtr = Arc<ReaderProperties>;

/// Configuration settings for reading column chunks.
///
/// All properties are immutable and `Send` + `Sync`.
/// Use [`ReaderPropertiesBuilder`] to assemble these properties.
///
/// # Example
///
/// ```rust
/// use parquet_codec::file::properties::ReaderProperties;
///
/// // Create properties with default configuration.
/// let props = ReaderProperties::builder().build();
///
/// // Use properties builder to set certain options and assemble the configuration.
/// let props = ReaderProperties::builder()
///     .set_max_page_header_size(64 * 1024)
///     .set_batch_size(256)
///     .build();
/// assert_eq!(props.batch_size(), 256);
/// ```
#[derive(Debug, Clone)]
pub struct ReaderProperties {
    max_page_header_size: usize,
    batch_size: usize,
}

impl Default for ReaderProperties {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ReaderProperties {
    /// Returns builder for reader properties with default values.
    pub fn builder() -> ReaderPropertiesBuilder {
        ReaderPropertiesBuilder::with_defaults()
    }

    /// Returns the largest page header, in bytes, the page reader will parse.
    pub fn max_page_header_size(&self) -> usize {
        self.max_page_header_size
    }

    /// Returns the number of levels read per call by batch oriented readers.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

/// Builder for column chunk reader configuration. See example on
/// [`ReaderProperties`]
pub struct ReaderPropertiesBuilder {
    max_page_header_size: Option<usize>,
    batch_size: Option<usize>,
}

/// Reader properties builder.
impl ReaderPropertiesBuilder {
    /// Returns default state of the builder.
    fn with_defaults() -> Self {
        Self {
            max_page_header_size: None,
            batch_size: None,
        }
    }

    /// Finalizes the configuration and returns immutable reader properties struct.
    pub fn build(self) -> ReaderProperties {
        ReaderProperties {
            max_page_header_size: self
                .max_page_header_size
                .unwrap_or(DEFAULT_MAX_PAGE_HEADER_SIZE),
            batch_size: self.batch_size.unwrap_or(DEFAULT_READ_BATCH_SIZE),
        }
    }

    /// Sets the largest page header, in bytes, that will be parsed.
    ///
    /// A header that does not fit is reported as a malformed header.
    pub fn set_max_page_header_size(mut self, value: usize) -> Self {
        self.max_page_header_size = Some(value);
        self
    }

    /// Sets the number of levels read per call by batch oriented readers.
    pub fn set_batch_size(mut self, value: usize) -> Self {
        self.batch_size = Some(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_version() {
        assert_eq!(WriterVersion::PARQUET_1_0.as_num(), 1);
        assert_eq!(WriterVersion::PARQUET_2_0.as_num(), 2);
        assert_eq!(
            "parquet_2_0".parse::<WriterVersion>().unwrap(),
            WriterVersion::PARQUET_2_0
        );
        assert!("PARQUET_3_0".parse::<WriterVersion>().is_err());
    }

    #[test]
    fn test_writer_properties_default_settings() {
        let props = WriterProperties::default();
        assert_eq!(props.data_page_size_limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(props.data_page_row_count_limit(), 20_000);
        assert_eq!(props.write_batch_size(), DEFAULT_WRITE_BATCH_SIZE);
        assert_eq!(props.writer_version(), DEFAULT_WRITER_VERSION);
        assert_eq!(props.encoding(), Encoding::PLAIN);
        assert_eq!(props.compression(), Compression::UNCOMPRESSED);
        assert!(props.dictionary_enabled());
    }

    #[test]
    fn test_writer_properties_dictionary_encoding() {
        let props = WriterProperties::builder()
            .set_writer_version(WriterVersion::PARQUET_1_0)
            .build();
        assert_eq!(props.dictionary_page_encoding(), Encoding::PLAIN);
        assert_eq!(
            props.dictionary_data_page_encoding(),
            Encoding::PLAIN_DICTIONARY
        );

        let props = WriterProperties::builder()
            .set_writer_version(WriterVersion::PARQUET_2_0)
            .build();
        assert_eq!(props.dictionary_page_encoding(), Encoding::PLAIN);
        assert_eq!(
            props.dictionary_data_page_encoding(),
            Encoding::RLE_DICTIONARY
        );
    }

    #[test]
    #[should_panic(expected = "Dictionary encoding can not be used as fallback encoding")]
    fn test_writer_properties_panic_when_plain_dictionary_is_fallback() {
        WriterProperties::builder()
            .set_encoding(Encoding::PLAIN_DICTIONARY)
            .build();
    }

    #[test]
    #[should_panic(expected = "Dictionary encoding can not be used as fallback encoding")]
    fn test_writer_properties_panic_when_rle_dictionary_is_fallback() {
        WriterProperties::builder()
            .set_encoding(Encoding::RLE_DICTIONARY)
            .build();
    }

    #[test]
    fn test_writer_properties_builder() {
        let props = WriterProperties::builder()
            .set_writer_version(WriterVersion::PARQUET_2_0)
            .set_data_page_size_limit(10)
            .set_data_page_row_count_limit(100)
            .set_write_batch_size(30)
            .set_encoding(Encoding::DELTA_BINARY_PACKED)
            .set_compression(Compression::GZIP)
            .set_dictionary_enabled(false)
            .build();

        assert_eq!(props.writer_version(), WriterVersion::PARQUET_2_0);
        assert_eq!(props.data_page_size_limit(), 10);
        assert_eq!(props.data_page_row_count_limit(), 100);
        assert_eq!(props.write_batch_size(), 30);
        assert_eq!(props.encoding(), Encoding::DELTA_BINARY_PACKED);
        assert_eq!(props.compression(), Compression::GZIP);
        assert!(!props.dictionary_enabled());
    }

    #[test]
    fn test_reader_properties_default_settings() {
        let props = ReaderProperties::builder().build();
        assert_eq!(props.max_page_header_size(), 16 * 1024 * 1024);
        assert_eq!(props.batch_size(), 1024);

        let props = ReaderProperties::builder()
            .set_max_page_header_size(100)
            .build();
        assert_eq!(props.max_page_header_size(), 100);
        assert_eq!(props.batch_size(), DEFAULT_READ_BATCH_SIZE);
    }
}
