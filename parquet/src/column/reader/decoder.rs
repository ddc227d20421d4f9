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

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::basic::Encoding;
use crate::data_type::DataType;
use crate::encodings::decoding::{get_decoder, Decoder, DictDecoder};
use crate::encodings::dictionary::Dictionary;
use crate::errors::{ParquetError, Result};
use crate::schema::types::ColumnDescPtr;

/// Decodes the values of a column chunk, one data page at a time.
///
/// Holds the chunk's dictionary once it has been read, along with a cache of
/// decoders keyed by encoding so pages sharing an encoding reuse their decoder.
pub(crate) struct ColumnValueDecoder<T: DataType> {
    descr: ColumnDescPtr,

    current_encoding: Option<Encoding>,

    dictionary: Option<Arc<Dictionary<T>>>,

    // Cache of decoders for existing encodings
    decoders: HashMap<Encoding, Box<dyn Decoder<T>>>,
}

impl<T: DataType> ColumnValueDecoder<T> {
    pub(crate) fn new(descr: &ColumnDescPtr) -> Self {
        Self {
            descr: descr.clone(),
            current_encoding: None,
            dictionary: None,
            decoders: Default::default(),
        }
    }

    /// Builds the chunk's dictionary from the payload of its dictionary page.
    pub(crate) fn set_dict(&mut self, buf: Bytes, num_values: u32, encoding: Encoding) -> Result<()> {
        if self.dictionary.is_some() {
            return Err(corrupt_err!("Column cannot have more than one dictionary"));
        }
        if encoding != Encoding::PLAIN && encoding != Encoding::PLAIN_DICTIONARY {
            return Err(unsupported_encoding_err!(
                "Invalid/Unsupported encoding type for dictionary: {}",
                encoding
            ));
        }

        let dictionary = Arc::new(Dictionary::<T>::build(
            self.descr.type_length(),
            buf,
            num_values as usize,
        )?);
        debug!(
            "Built dictionary of {} entries for column {}",
            dictionary.len(),
            self.descr.path()
        );

        let mut decoder = DictDecoder::new();
        decoder.set_dict(dictionary.clone());
        self.decoders.insert(Encoding::RLE_DICTIONARY, Box::new(decoder));
        self.dictionary = Some(dictionary);
        Ok(())
    }

    /// Sets the value section of a new data page holding `num_values` non-null values.
    pub(crate) fn set_data(&mut self, mut encoding: Encoding, data: Bytes, num_values: usize) -> Result<()> {
        use std::collections::hash_map::Entry;

        if encoding == Encoding::PLAIN_DICTIONARY {
            encoding = Encoding::RLE_DICTIONARY;
        }

        let decoder = if encoding == Encoding::RLE_DICTIONARY {
            self.decoders.get_mut(&encoding).ok_or_else(|| {
                corrupt_err!("Dictionary encoded page without a preceding dictionary page")
            })?
        } else {
            // Search cache for data page decoder
            match self.decoders.entry(encoding) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(v) => {
                    let data_decoder = get_decoder::<T>(self.descr.clone(), encoding)?;
                    v.insert(data_decoder)
                }
            }
        };

        decoder.set_data(data, num_values)?;
        self.current_encoding = Some(encoding);
        Ok(())
    }

    fn current_decoder(&mut self) -> Result<&mut Box<dyn Decoder<T>>> {
        let encoding = self
            .current_encoding
            .ok_or_else(|| general_err!("No data page has been set"))?;
        self.decoders
            .get_mut(&encoding)
            .ok_or_else(|| general_err!("decoder for encoding {} should be set", encoding))
    }

    /// Decodes exactly `out.len()` values into `out`.
    pub(crate) fn read(&mut self, out: &mut [T::T]) -> Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        let expected = out.len();
        let read = self.current_decoder()?.get(out)?;
        if read != expected {
            return Err(eof_err!(
                "insufficient values read from column - expected: {}, got: {}",
                expected,
                read
            ));
        }
        Ok(read)
    }
}
