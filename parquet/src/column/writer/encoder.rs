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

use bytes::Bytes;

use crate::basic::{Encoding, Type};
use crate::data_type::DataType;
use crate::encodings::encoding::{get_encoder, DictEncoder, Encoder};
use crate::errors::{ParquetError, Result};
use crate::file::properties::WriterProperties;
use crate::schema::types::ColumnDescPtr;

/// The encoded data for a dictionary page
pub struct DictionaryPage {
    pub buf: Bytes,
    pub num_values: usize,
    pub is_sorted: bool,
}

/// The encoded values for a data page
pub struct DataPageValues {
    pub buf: Bytes,
    pub num_values: usize,
    pub encoding: Encoding,
}

/// Encodes the values of a column chunk into data and dictionary pages, dictionary
/// encoding them while a dictionary is in use.
pub struct ColumnValueEncoder<T: DataType> {
    encoder: Box<dyn Encoder<T>>,
    dict_encoder: Option<DictEncoder<T>>,
    dict_data_page_encoding: Encoding,
    num_values: usize,
}

impl<T: DataType> ColumnValueEncoder<T> {
    /// Creates the encoder for `descr`: a dictionary encoder when `props` enables
    /// dictionaries and the type supports them, and the fallback `props.encoding()`.
    pub fn try_new(descr: &ColumnDescPtr, props: &WriterProperties) -> Result<Self> {
        let dict_supported =
            props.dictionary_enabled() && has_dictionary_support(T::get_physical_type());
        let dict_encoder = dict_supported.then(|| DictEncoder::new(descr.clone()));

        let encoder = get_encoder(props.encoding())?;

        Ok(Self {
            encoder,
            dict_encoder,
            dict_data_page_encoding: props.dictionary_data_page_encoding(),
            num_values: 0,
        })
    }

    /// Write the values at `offset..offset + len` of `values`.
    pub fn write(&mut self, values: &[T::T], offset: usize, len: usize) -> Result<()> {
        let slice = values.get(offset..offset + len).ok_or_else(|| {
            general_err!(
                "Expected to write {} values, but have only {}",
                len,
                values.len().saturating_sub(offset)
            )
        })?;
        self.num_values += len;

        match &mut self.dict_encoder {
            Some(encoder) => encoder.put(slice),
            _ => self.encoder.put(slice),
        }
    }

    /// Returns true if this encoder has a dictionary page
    pub fn has_dictionary(&self) -> bool {
        self.dict_encoder.is_some()
    }

    /// Returns an estimate of the data page size in bytes
    pub fn estimated_data_page_size(&self) -> usize {
        match &self.dict_encoder {
            Some(encoder) => encoder.estimated_data_encoded_size(),
            _ => self.encoder.estimated_data_encoded_size(),
        }
    }

    /// Flush the dictionary page for this column chunk if any.
    ///
    /// Note: [`Self::flush_data_page`] must be called first, as this will error if there
    /// are any pending page values
    pub fn flush_dict_page(&mut self) -> Result<Option<DictionaryPage>> {
        if self.dict_encoder.is_some() && self.num_values != 0 {
            return Err(general_err!(
                "Must flush data pages before flushing dictionary"
            ));
        }

        match self.dict_encoder.take() {
            Some(encoder) => {
                let buf = encoder.write_dict()?;

                Ok(Some(DictionaryPage {
                    buf,
                    num_values: encoder.num_entries(),
                    is_sorted: encoder.is_sorted(),
                }))
            }
            _ => Ok(None),
        }
    }

    /// Flush the next data page for this column chunk
    pub fn flush_data_page(&mut self) -> Result<DataPageValues> {
        let (buf, encoding) = match &mut self.dict_encoder {
            Some(encoder) => (encoder.write_indices()?, self.dict_data_page_encoding),
            _ => (self.encoder.flush_buffer()?, self.encoder.encoding()),
        };

        Ok(DataPageValues {
            buf,
            encoding,
            num_values: std::mem::take(&mut self.num_values),
        })
    }
}

/// BOOLEAN columns are never dictionary encoded.
fn has_dictionary_support(kind: Type) -> bool {
    !matches!(kind, Type::BOOLEAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use crate::data_type::{BoolType, Int32Type};
    use crate::file::properties::WriterVersion;
    use crate::schema::types::ColumnDescriptor;

    fn descr(physical_type: Type) -> ColumnDescPtr {
        Arc::new(ColumnDescriptor::builder("a", physical_type).build().unwrap())
    }

    #[test]
    fn test_dictionary_encoder() {
        let props = WriterProperties::builder()
            .set_writer_version(WriterVersion::PARQUET_2_0)
            .build();
        let mut encoder = ColumnValueEncoder::<Int32Type>::try_new(&descr(Type::INT32), &props).unwrap();
        assert!(encoder.has_dictionary());

        encoder.write(&[1, 2, 2, 1, 3], 1, 3).unwrap();
        assert!(encoder.estimated_data_page_size() > 0);

        // Pending values must be flushed before the dictionary, which is kept
        assert!(encoder.flush_dict_page().is_err());
        assert!(encoder.has_dictionary());

        let page = encoder.flush_data_page().unwrap();
        assert_eq!(page.encoding, Encoding::RLE_DICTIONARY);
        assert_eq!(page.num_values, 3);

        let dict = encoder.flush_dict_page().unwrap().unwrap();
        assert_eq!(dict.num_values, 2);
        assert_eq!(dict.buf.as_ref(), &[2, 0, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn test_dictionary_page() {
        let props = WriterProperties::default();
        let mut encoder = ColumnValueEncoder::<Int32Type>::try_new(&descr(Type::INT32), &props).unwrap();
        encoder.write(&[7, 7, 8], 0, 3).unwrap();
        let page = encoder.flush_data_page().unwrap();
        assert_eq!(page.encoding, Encoding::PLAIN_DICTIONARY);

        let dict = encoder.flush_dict_page().unwrap().unwrap();
        assert_eq!(dict.num_values, 2);
        assert_eq!(dict.buf.as_ref(), &[7, 0, 0, 0, 8, 0, 0, 0]);
        assert!(!encoder.has_dictionary());
        assert!(encoder.flush_dict_page().unwrap().is_none());
    }

    #[test]
    fn test_fallback_encoder() {
        let props = WriterProperties::builder()
            .set_dictionary_enabled(true)
            .set_encoding(Encoding::RLE)
            .build();
        let mut encoder = ColumnValueEncoder::<BoolType>::try_new(&descr(Type::BOOLEAN), &props).unwrap();
        assert!(!encoder.has_dictionary());
        encoder.write(&[true, false], 0, 2).unwrap();
        assert_eq!(encoder.flush_data_page().unwrap().encoding, Encoding::RLE);

        let err = encoder.write(&[true], 0, 2).unwrap_err();
        assert!(err.to_string().contains("Expected to write 2 values"), "{err}");
    }

    #[test]
    fn test_unsupported_fallback_encoding() {
        let props = WriterProperties::builder()
            .set_encoding(Encoding::DELTA_BINARY_PACKED)
            .build();
        let err = ColumnValueEncoder::<BoolType>::try_new(&descr(Type::BOOLEAN), &props)
            .err()
            .unwrap();
        assert!(matches!(err, ParquetError::UnsupportedEncoding(_)), "{err}");
    }
}
