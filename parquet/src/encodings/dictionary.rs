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

//! Dictionary of a column chunk, decoded from its dictionary page.

use std::fmt;

use bytes::Bytes;

use super::decoding::{Decoder, PlainDecoder};
use crate::basic::Type;
use crate::data_type::DataType;
use crate::errors::{ParquetError, Result};

/// The 0-indexed table of values a dictionary encoded data page refers to.
///
/// Built once from the dictionary page of a column chunk and never modified, so it can
/// be shared by every data page of the chunk.
pub struct Dictionary<T: DataType> {
    values: Vec<T::T>,
}

impl<T: DataType> Clone for Dictionary<T> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
        }
    }
}

impl<T: DataType> fmt::Debug for Dictionary<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dictionary")
            .field("values", &self.values)
            .finish()
    }
}

impl<T: DataType> Dictionary<T> {
    /// Decodes `num_values` PLAIN encoded values from `data`.
    ///
    /// `type_length` is only used for `FIXED_LEN_BYTE_ARRAY`.
    pub fn build(type_length: i32, data: Bytes, num_values: usize) -> Result<Self> {
        let max_values = max_plain_values(T::get_physical_type(), type_length, data.len());
        if num_values > max_values {
            return Err(eof_err!(
                "Dictionary page of {} bytes cannot hold {} {} values",
                data.len(),
                num_values,
                T::get_physical_type()
            ));
        }

        let mut decoder = PlainDecoder::<T>::new(type_length);
        decoder.set_data(data, num_values)?;

        let mut values = vec![T::T::default(); num_values];
        let values_read = decoder.get(&mut values)?;
        if values_read != num_values {
            return Err(eof_err!(
                "Dictionary page holds {} of {} values",
                values_read,
                num_values
            ));
        }
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[T::T] {
        &self.values
    }

    /// Returns the value for `key`.
    #[inline]
    pub fn get(&self, key: u32) -> Result<&T::T> {
        self.values
            .get(key as usize)
            .ok_or(ParquetError::DictionaryIndexOutOfRange {
                index: key as usize,
                len: self.values.len(),
            })
    }

    /// Writes the value of each of `keys` to the matching slot of `buffer`.
    pub fn resolve(&self, keys: &[u32], buffer: &mut [T::T]) -> Result<()> {
        debug_assert!(buffer.len() >= keys.len());
        for (slot, key) in buffer.iter_mut().zip(keys) {
            slot.clone_from(self.get(*key)?);
        }
        Ok(())
    }
}

/// Upper bound on the number of PLAIN encoded values of `physical_type` in `len` bytes.
fn max_plain_values(physical_type: Type, type_length: i32, len: usize) -> usize {
    match physical_type {
        Type::BOOLEAN => len.saturating_mul(8),
        Type::INT32 | Type::FLOAT => len / 4,
        Type::INT64 | Type::DOUBLE => len / 8,
        Type::INT96 => len / 12,
        // Every value carries at least its 4-byte length
        Type::BYTE_ARRAY => len / 4,
        Type::FIXED_LEN_BYTE_ARRAY => match usize::try_from(type_length) {
            Ok(n) if n > 0 => len / n,
            _ => 0,
        },
    }
}

impl<T: DataType> From<Vec<T::T>> for Dictionary<T> {
    fn from(values: Vec<T::T>) -> Self {
        Self { values }
    }
}
