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

//! Value deduplication for dictionary encoding.

use std::hash::{BuildHasher, Hash, Hasher};

use hashbrown::hash_map::RawEntryMut;
use hashbrown::HashMap;

use crate::data_type::AsBytes;

/// Backing store for the distinct values seen by an [`Interner`]
pub trait Storage {
    type Key: Copy;

    type Value: AsBytes + PartialEq + ?Sized;

    /// Gets an element by its key
    fn get(&self, idx: Self::Key) -> &Self::Value;

    /// Adds a new element, returning the key
    fn push(&mut self, value: &Self::Value) -> Self::Key;
}

/// Maps values to dense keys, storing each distinct value once in `S`.
pub struct Interner<S: Storage> {
    state: ahash::RandomState,

    /// Keys of the stored values, hashed by the bytes of the value they refer to.
    ///
    /// The map has no hasher of its own; every lookup and insert goes through the
    /// raw entry API with a hash computed by `state`.
    dedup: HashMap<S::Key, (), ()>,

    storage: S,
}

impl<S: Storage> Interner<S> {
    pub fn new(storage: S) -> Self {
        Self {
            state: Default::default(),
            dedup: Default::default(),
            storage,
        }
    }

    /// Returns the key for `value`, pushing it to the storage if it is new.
    pub fn intern(&mut self, value: &S::Value) -> S::Key {
        let hash = compute_hash(&self.state, value);

        let entry = self
            .dedup
            .raw_entry_mut()
            .from_hash(hash, |key| value == self.storage.get(*key));

        match entry {
            RawEntryMut::Occupied(entry) => *entry.into_key(),
            RawEntryMut::Vacant(entry) => {
                let key = self.storage.push(value);

                *entry
                    .insert_with_hasher(hash, key, (), |key| {
                        compute_hash(&self.state, self.storage.get(*key))
                    })
                    .0
            }
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consumes the interner, returning the storage
    pub fn into_inner(self) -> S {
        self.storage
    }
}

fn compute_hash<T: AsBytes + ?Sized>(state: &ahash::RandomState, value: &T) -> u64 {
    let mut hasher = state.build_hasher();
    value.as_bytes().hash(&mut hasher);
    hasher.finish()
}
