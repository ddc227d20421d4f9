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

//! Descriptors for leaf columns.
//!
//! Building and validating a full schema tree is left to callers; the codec only needs
//! the path of a leaf, its physical type and the repetition of every node on that path,
//! from which the maximum definition and repetition levels are derived.

use std::fmt;
use std::sync::Arc;

use crate::basic::{Repetition, Type as PhysicalType};
use crate::errors::{ParquetError, Result};

/// Reference counted pointer for [`ColumnDescriptor`].
pub type ColumnDescPtr = Arc<ColumnDescriptor>;

/// Represents the location of a column in a Parquet schema
#[derive(Clone, PartialEq, Debug, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnPath {
    parts: Vec<String>,
}

impl ColumnPath {
    /// Creates new column path from vector of field names.
    pub fn new(parts: Vec<String>) -> Self {
        ColumnPath { parts }
    }

    /// Returns string representation of this column path.
    /// ```rust
    /// use parquet_codec::schema::types::ColumnPath;
    ///
    /// let path = ColumnPath::new(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
    /// assert_eq!(&path.string(), "a.b.c");
    /// ```
    pub fn string(&self) -> String {
        self.parts.join(".")
    }

    /// Returns a slice of path components.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.string())
    }
}

impl From<Vec<String>> for ColumnPath {
    fn from(parts: Vec<String>) -> Self {
        ColumnPath { parts }
    }
}

impl From<&str> for ColumnPath {
    fn from(single_path: &str) -> Self {
        let s = String::from(single_path);
        ColumnPath::from(s)
    }
}

impl From<String> for ColumnPath {
    fn from(single_path: String) -> Self {
        let v = vec![single_path];
        ColumnPath { parts: v }
    }
}

impl AsRef<[String]> for ColumnPath {
    fn as_ref(&self) -> &[String] {
        &self.parts
    }
}

/// A descriptor for leaf-level primitive columns.
///
/// Immutable once built. The maximum definition level counts the `OPTIONAL` and
/// `REPEATED` nodes on the path, the maximum repetition level counts the `REPEATED`
/// ones.
#[derive(Debug, PartialEq, Eq)]
pub struct ColumnDescriptor {
    path: ColumnPath,
    physical_type: PhysicalType,
    type_length: i32,
    repetitions: Vec<Repetition>,
    max_def_level: i16,
    max_rep_level: i16,
}

impl ColumnDescriptor {
    /// Creates a builder for a column at `path` with `physical_type`.
    ///
    /// Every node on the path defaults to [`Repetition::REQUIRED`].
    pub fn builder(path: impl Into<ColumnPath>, physical_type: PhysicalType) -> ColumnDescriptorBuilder {
        let path = path.into();
        let repetitions = vec![Repetition::REQUIRED; path.parts().len()];
        ColumnDescriptorBuilder {
            path,
            physical_type,
            type_length: -1,
            repetitions,
        }
    }

    /// Returns [`ColumnPath`] for this column.
    pub fn path(&self) -> &ColumnPath {
        &self.path
    }

    /// Returns the name of the leaf field.
    pub fn name(&self) -> &str {
        self.path.parts().last().map(|s| s.as_str()).unwrap_or_default()
    }

    /// Returns physical type for this column.
    pub fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }

    /// Returns type length for this column, `-1` unless it is `FIXED_LEN_BYTE_ARRAY`.
    pub fn type_length(&self) -> i32 {
        self.type_length
    }

    /// Returns the repetition of every node on the path, root first.
    pub fn repetitions(&self) -> &[Repetition] {
        &self.repetitions
    }

    /// Returns maximum definition level for this column.
    pub fn max_def_level(&self) -> i16 {
        self.max_def_level
    }

    /// Returns maximum repetition level for this column.
    pub fn max_rep_level(&self) -> i16 {
        self.max_rep_level
    }
}

impl fmt::Display for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} (max_def_level={}, max_rep_level={})",
            self.path.string(),
            self.physical_type,
            self.max_def_level,
            self.max_rep_level
        )
    }
}

/// A builder for [`ColumnDescriptor`].
pub struct ColumnDescriptorBuilder {
    path: ColumnPath,
    physical_type: PhysicalType,
    type_length: i32,
    repetitions: Vec<Repetition>,
}

impl ColumnDescriptorBuilder {
    /// Sets type length and returns itself.
    /// This is only applied to FIXED_LEN_BYTE_ARRAY.
    pub fn with_length(mut self, length: i32) -> Self {
        self.type_length = length;
        self
    }

    /// Sets the repetition of the leaf node.
    pub fn with_repetition(mut self, repetition: Repetition) -> Self {
        if let Some(leaf) = self.repetitions.last_mut() {
            *leaf = repetition;
        }
        self
    }

    /// Sets the repetition of every node on the path, root first.
    pub fn with_repetitions(mut self, repetitions: Vec<Repetition>) -> Self {
        self.repetitions = repetitions;
        self
    }

    /// Validates the path and derives the maximum levels.
    pub fn build(self) -> Result<ColumnDescriptor> {
        if self.path.parts().is_empty() {
            return Err(general_err!("Column path cannot be empty"));
        }
        if self.repetitions.len() != self.path.parts().len() {
            return Err(general_err!(
                "Column {} has {} path elements but {} repetitions",
                self.path,
                self.path.parts().len(),
                self.repetitions.len()
            ));
        }

        let type_length = match self.physical_type {
            PhysicalType::FIXED_LEN_BYTE_ARRAY => {
                if self.type_length <= 0 {
                    return Err(general_err!(
                        "Invalid FIXED_LEN_BYTE_ARRAY length: {} for field '{}'",
                        self.type_length,
                        self.path.string()
                    ));
                }
                self.type_length
            }
            _ => -1,
        };

        let mut max_def_level = 0i16;
        let mut max_rep_level = 0i16;
        for repetition in &self.repetitions {
            match repetition {
                Repetition::REQUIRED => {}
                Repetition::OPTIONAL => max_def_level += 1,
                Repetition::REPEATED => {
                    max_def_level += 1;
                    max_rep_level += 1;
                }
            }
        }

        Ok(ColumnDescriptor {
            path: self.path,
            physical_type: self.physical_type,
            type_length,
            repetitions: self.repetitions,
            max_def_level,
            max_rep_level,
        })
    }
}
