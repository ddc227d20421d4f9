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

//! Vectorised bit-packing of groups of 8 values, as used by the bit-packed runs of the
//! RLE/bit-packing hybrid encoding.
//!
//! Values are packed least-significant bit first: value `i` occupies bits
//! `[i * num_bits, (i + 1) * num_bits)` of the little-endian group, so a group of
//! 8 values always occupies exactly `num_bits` bytes.

use crate::errors::{ParquetError, Result};

/// Largest bit width a group of `u32` can be packed with.
pub const MAX_BIT_WIDTH: usize = 32;

#[inline]
fn check_bit_width(num_bits: usize) -> Result<()> {
    match num_bits {
        1..=MAX_BIT_WIDTH => Ok(()),
        _ => Err(ParquetError::InvalidBitWidth(num_bits)),
    }
}

#[inline]
fn mask(num_bits: usize) -> u32 {
    u32::MAX >> (MAX_BIT_WIDTH - num_bits)
}

/// Unpack 8 values of `num_bits` from `input` into `output`.
///
/// `input` must hold at least `num_bits` bytes, any trailing bytes are ignored.
pub fn unpack8(input: &[u8], output: &mut [u32; 8], num_bits: usize) -> Result<()> {
    check_bit_width(num_bits)?;
    if input.len() < num_bits {
        return Err(eof_err!(
            "bit-packed group of width {} needs {} bytes, got {}",
            num_bits,
            num_bits,
            input.len()
        ));
    }

    let mask = mask(num_bits);
    for (i, out) in output.iter_mut().enumerate() {
        let start_bit = i * num_bits;
        let start_byte = start_bit / 8;
        let end_byte = (start_bit + num_bits).div_ceil(8);

        // A value spans at most 5 bytes
        let word = input[start_byte..end_byte]
            .iter()
            .enumerate()
            .fold(0_u64, |acc, (j, b)| acc | (*b as u64) << (8 * j));

        *out = (word >> (start_bit % 8)) as u32 & mask;
    }
    Ok(())
}

/// Pack the 8 values of `input` into the first `num_bits` bytes of `output`.
///
/// Bits of a value above `num_bits` are discarded.
pub fn pack8(input: &[u32; 8], output: &mut [u8], num_bits: usize) -> Result<()> {
    check_bit_width(num_bits)?;
    if output.len() < num_bits {
        return Err(general_err!(
            "output buffer of {} bytes too small for bit width {}",
            output.len(),
            num_bits
        ));
    }
    pack_group(input, output, num_bits);
    Ok(())
}

/// Packs a group for a bit width already known to be in `1..=32`.
///
/// # Panics
///
/// Panics if `output` is shorter than `num_bits` bytes.
pub(crate) fn pack_group(input: &[u32; 8], output: &mut [u8], num_bits: usize) {
    debug_assert!((1..=MAX_BIT_WIDTH).contains(&num_bits));
    let mask = mask(num_bits);
    let output = &mut output[..num_bits];
    output.fill(0);

    for (i, v) in input.iter().enumerate() {
        let start_bit = i * num_bits;
        let start_byte = start_bit / 8;
        let mut word = ((*v & mask) as u64) << (start_bit % 8);

        for b in &mut output[start_byte..] {
            if word == 0 {
                break;
            }
            *b |= word as u8;
            word >>= 8;
        }
    }
}
