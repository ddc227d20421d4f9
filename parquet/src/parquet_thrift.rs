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

//! Thrift compact protocol reader and writer for page headers.
//!
//! Only the subset of the protocol that Parquet page headers need is implemented:
//! structs, lists (skipped), binary, booleans and zig-zag integers. Running out of
//! input is reported as [`ParquetError::TruncatedInput`] so that callers reading a
//! header of unknown length can retry with more bytes; every other protocol
//! violation is a [`ParquetError::MalformedHeader`].

use std::io::Write;

use crate::errors::{ParquetError, Result};

/// Maximum nesting depth followed when skipping unknown fields.
const MAX_SKIP_DEPTH: i8 = 64;

// Thrift compact protocol types for struct fields.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FieldType {
    Stop = 0,
    BooleanTrue = 1,
    BooleanFalse = 2,
    Byte = 3,
    I16 = 4,
    I32 = 5,
    I64 = 6,
    Double = 7,
    Binary = 8,
    List = 9,
    Set = 10,
    Map = 11,
    Struct = 12,
}

impl TryFrom<u8> for FieldType {
    type Error = ParquetError;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Stop),
            1 => Ok(Self::BooleanTrue),
            2 => Ok(Self::BooleanFalse),
            3 => Ok(Self::Byte),
            4 => Ok(Self::I16),
            5 => Ok(Self::I32),
            6 => Ok(Self::I64),
            7 => Ok(Self::Double),
            8 => Ok(Self::Binary),
            9 => Ok(Self::List),
            10 => Ok(Self::Set),
            11 => Ok(Self::Map),
            12 => Ok(Self::Struct),
            _ => Err(malformed_err!("Unexpected struct field type {}", value)),
        }
    }
}

// Thrift compact protocol types for list elements
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ElementType {
    Bool = 2,
    Byte = 3,
    I16 = 4,
    I32 = 5,
    I64 = 6,
    Double = 7,
    Binary = 8,
    List = 9,
    Set = 10,
    Map = 11,
    Struct = 12,
}

impl TryFrom<u8> for ElementType {
    type Error = ParquetError;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            // Both 1 and 2 are written for booleans in the wild
            1 | 2 => Ok(Self::Bool),
            3 => Ok(Self::Byte),
            4 => Ok(Self::I16),
            5 => Ok(Self::I32),
            6 => Ok(Self::I64),
            7 => Ok(Self::Double),
            8 => Ok(Self::Binary),
            9 => Ok(Self::List),
            10 => Ok(Self::Set),
            11 => Ok(Self::Map),
            12 => Ok(Self::Struct),
            _ => Err(malformed_err!("Unexpected list/set element type {}", value)),
        }
    }
}

impl From<ElementType> for FieldType {
    fn from(value: ElementType) -> Self {
        match value {
            ElementType::Bool => Self::BooleanTrue,
            ElementType::Byte => Self::Byte,
            ElementType::I16 => Self::I16,
            ElementType::I32 => Self::I32,
            ElementType::I64 => Self::I64,
            ElementType::Double => Self::Double,
            ElementType::Binary => Self::Binary,
            ElementType::List => Self::List,
            ElementType::Set => Self::Set,
            ElementType::Map => Self::Map,
            ElementType::Struct => Self::Struct,
        }
    }
}

pub(crate) struct FieldIdentifier {
    pub(crate) field_type: FieldType,
    pub(crate) id: i16,
}

/// Reads the thrift compact protocol from a slice without copying binary fields.
pub(crate) struct ThriftCompactInputProtocol<'a> {
    buf: &'a [u8],
    // Number of bytes consumed from the original slice.
    position: usize,
    // Identifier of the last field deserialized for a struct.
    last_read_field_id: i16,
    // Stack of the last read field ids (a new entry is added each time a nested struct is read).
    read_field_id_stack: Vec<i16>,
    // Boolean fields carry their value in the field header.
    pending_read_bool_value: Option<bool>,
}

impl<'a> ThriftCompactInputProtocol<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            position: 0,
            last_read_field_id: 0,
            read_field_id_stack: Vec::with_capacity(4),
            pending_read_bool_value: None,
        }
    }

    /// Returns the number of bytes consumed so far.
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    fn read_vlq(&mut self) -> Result<u64> {
        let mut in_progress = 0u64;
        let mut shift = 0;
        loop {
            let byte = self.read_byte()?;
            if shift > 63 {
                return Err(malformed_err!("Varint is longer than 10 bytes"));
            }
            in_progress |= ((byte & 0x7F) as u64).wrapping_shl(shift);
            shift += 7;
            if byte & 0x80 == 0 {
                return Ok(in_progress);
            }
        }
    }

    fn read_zig_zag(&mut self) -> Result<i64> {
        let val = self.read_vlq()?;
        Ok((val >> 1) as i64 ^ -((val & 1) as i64))
    }

    pub(crate) fn read_struct_begin(&mut self) -> Result<()> {
        self.read_field_id_stack.push(self.last_read_field_id);
        self.last_read_field_id = 0;
        Ok(())
    }

    pub(crate) fn read_struct_end(&mut self) -> Result<()> {
        self.last_read_field_id = self
            .read_field_id_stack
            .pop()
            .ok_or_else(|| malformed_err!("Struct end without matching struct begin"))?;
        Ok(())
    }

    pub(crate) fn read_field_begin(&mut self) -> Result<FieldIdentifier> {
        // the first byte holds the type, and the field delta unless it is zero
        let field_type = self.read_byte()?;
        let field_delta = (field_type & 0xf0) >> 4;
        let field_type = FieldType::try_from(field_type & 0xf)?;

        match field_type {
            FieldType::Stop => Ok(FieldIdentifier {
                field_type: FieldType::Stop,
                id: 0,
            }),
            _ => {
                if field_type == FieldType::BooleanFalse {
                    self.pending_read_bool_value = Some(false);
                } else if field_type == FieldType::BooleanTrue {
                    self.pending_read_bool_value = Some(true);
                }
                if field_delta != 0 {
                    self.last_read_field_id = self
                        .last_read_field_id
                        .checked_add(field_delta as i16)
                        .ok_or_else(|| {
                            malformed_err!(
                                "cannot add {} to field id {}",
                                field_delta,
                                self.last_read_field_id
                            )
                        })?;
                } else {
                    self.last_read_field_id = self.read_i16()?;
                };

                Ok(FieldIdentifier {
                    field_type,
                    id: self.last_read_field_id,
                })
            }
        }
    }

    pub(crate) fn read_bool(&mut self) -> Result<bool> {
        match self.pending_read_bool_value.take() {
            Some(b) => Ok(b),
            None => match self.read_byte()? {
                0x01 => Ok(true),
                0x00 | 0x02 => Ok(false),
                unkn => Err(malformed_err!("cannot convert {} into bool", unkn)),
            },
        }
    }

    pub(crate) fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_vlq()?;
        let len = usize::try_from(len)
            .map_err(|_| malformed_err!("Binary length {} does not fit in memory", len))?;
        let ret = self.buf.get(..len).ok_or_else(eof_error)?;
        self.advance(len);
        Ok(ret)
    }

    pub(crate) fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_byte()? as _)
    }

    pub(crate) fn read_i16(&mut self) -> Result<i16> {
        let v = self.read_zig_zag()?;
        i16::try_from(v).map_err(|_| malformed_err!("Value {} does not fit in i16", v))
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32> {
        let v = self.read_zig_zag()?;
        i32::try_from(v).map_err(|_| malformed_err!("Value {} does not fit in i32", v))
    }

    pub(crate) fn read_i64(&mut self) -> Result<i64> {
        self.read_zig_zag()
    }

    fn read_list_begin(&mut self) -> Result<(ElementType, usize)> {
        let header = self.read_byte()?;
        let element_type = ElementType::try_from(header & 0x0f)?;

        let possible_element_count = (header & 0xF0) >> 4;
        let element_count = if possible_element_count != 15 {
            // high bits set high if count and type encoded separately
            possible_element_count as usize
        } else {
            self.read_vlq()? as usize
        };

        Ok((element_type, element_count))
    }

    #[inline]
    fn advance(&mut self, n: usize) {
        self.buf = &self.buf[n..];
        self.position += n;
    }

    #[inline]
    fn read_byte(&mut self) -> Result<u8> {
        let ret = *self.buf.first().ok_or_else(eof_error)?;
        self.advance(1);
        Ok(ret)
    }

    #[inline]
    fn skip_bytes(&mut self, n: usize) -> Result<()> {
        self.buf.get(..n).ok_or_else(eof_error)?;
        self.advance(n);
        Ok(())
    }

    fn skip_vlq(&mut self) -> Result<()> {
        self.read_vlq().map(|_| ())
    }

    /// Skip a field with type `field_type` recursively.
    pub(crate) fn skip(&mut self, field_type: FieldType) -> Result<()> {
        self.skip_till_depth(field_type, MAX_SKIP_DEPTH)
    }

    fn skip_till_depth(&mut self, field_type: FieldType, depth: i8) -> Result<()> {
        if depth == 0 {
            return Err(malformed_err!("cannot parse past {:?}", field_type));
        }

        match field_type {
            FieldType::BooleanFalse | FieldType::BooleanTrue => self.read_bool().map(|_| ()),
            FieldType::Byte => self.read_i8().map(|_| ()),
            FieldType::I16 | FieldType::I32 | FieldType::I64 => self.skip_vlq(),
            FieldType::Double => self.skip_bytes(8),
            FieldType::Binary => self.read_bytes().map(|_| ()),
            FieldType::Struct => {
                self.read_struct_begin()?;
                loop {
                    let field_ident = self.read_field_begin()?;
                    if field_ident.field_type == FieldType::Stop {
                        break;
                    }
                    self.skip_till_depth(field_ident.field_type, depth - 1)?;
                }
                self.read_struct_end()
            }
            FieldType::List | FieldType::Set => {
                let (element_type, size) = self.read_list_begin()?;
                for _ in 0..size {
                    self.skip_till_depth(element_type.into(), depth - 1)?;
                }
                Ok(())
            }
            // no map types in page headers
            u => Err(malformed_err!("cannot skip field type {:?}", u)),
        }
    }
}

fn eof_error() -> ParquetError {
    eof_err!("Unexpected end of thrift input")
}

/// Writes the thrift compact protocol to `W`.
pub(crate) struct ThriftCompactOutputProtocol<W: Write> {
    writer: W,
}

impl<W: Write> ThriftCompactOutputProtocol<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &W {
        &self.writer
    }

    fn write_byte(&mut self, b: u8) -> Result<()> {
        self.writer.write_all(&[b])?;
        Ok(())
    }

    fn write_vlq(&mut self, val: u64) -> Result<()> {
        let mut v = val;
        while v > 0x7f {
            self.write_byte(v as u8 | 0x80)?;
            v >>= 7;
        }
        self.write_byte(v as u8)
    }

    fn write_zig_zag(&mut self, val: i64) -> Result<()> {
        self.write_vlq(((val << 1) ^ (val >> 63)) as u64)
    }

    pub(crate) fn write_field_begin(
        &mut self,
        field_type: FieldType,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<()> {
        let delta = field_id.wrapping_sub(last_field_id);
        if delta > 0 && delta <= 0xf {
            self.write_byte((delta as u8) << 4 | field_type as u8)
        } else {
            self.write_byte(field_type as u8)?;
            self.write_i16(field_id)
        }
    }

    pub(crate) fn write_struct_end(&mut self) -> Result<()> {
        self.write_byte(0)
    }

    pub(crate) fn write_bytes(&mut self, val: &[u8]) -> Result<()> {
        self.write_vlq(val.len() as u64)?;
        self.writer.write_all(val)?;
        Ok(())
    }

    pub(crate) fn write_i16(&mut self, val: i16) -> Result<()> {
        self.write_zig_zag(val as _)
    }

    pub(crate) fn write_i32(&mut self, val: i32) -> Result<()> {
        self.write_zig_zag(val as _)
    }

    pub(crate) fn write_i64(&mut self, val: i64) -> Result<()> {
        self.write_zig_zag(val)
    }
}

/// A value that can be written as a field of a thrift struct.
pub(crate) trait WriteThriftField<W: Write> {
    /// Writes the field header and value, returns `field_id`.
    fn write_thrift_field(
        &self,
        writer: &mut ThriftCompactOutputProtocol<W>,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<i16>;
}

impl<W: Write> WriteThriftField<W> for bool {
    fn write_thrift_field(
        &self,
        writer: &mut ThriftCompactOutputProtocol<W>,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<i16> {
        // boolean only writes the field header
        match *self {
            true => writer.write_field_begin(FieldType::BooleanTrue, field_id, last_field_id)?,
            false => writer.write_field_begin(FieldType::BooleanFalse, field_id, last_field_id)?,
        }
        Ok(field_id)
    }
}

impl<W: Write> WriteThriftField<W> for i32 {
    fn write_thrift_field(
        &self,
        writer: &mut ThriftCompactOutputProtocol<W>,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<i16> {
        writer.write_field_begin(FieldType::I32, field_id, last_field_id)?;
        writer.write_i32(*self)?;
        Ok(field_id)
    }
}

impl<W: Write> WriteThriftField<W> for i64 {
    fn write_thrift_field(
        &self,
        writer: &mut ThriftCompactOutputProtocol<W>,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<i16> {
        writer.write_field_begin(FieldType::I64, field_id, last_field_id)?;
        writer.write_i64(*self)?;
        Ok(field_id)
    }
}

impl<W: Write> WriteThriftField<W> for [u8] {
    fn write_thrift_field(
        &self,
        writer: &mut ThriftCompactOutputProtocol<W>,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<i16> {
        writer.write_field_begin(FieldType::Binary, field_id, last_field_id)?;
        writer.write_bytes(self)?;
        Ok(field_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zig_zag_roundtrip() {
        for v in [0i64, -1, 1, -64, 63, i32::MIN as i64, i32::MAX as i64, i64::MIN, i64::MAX] {
            let mut writer = ThriftCompactOutputProtocol::new(Vec::new());
            writer.write_i64(v).unwrap();
            let mut prot = ThriftCompactInputProtocol::new(writer.inner());
            assert_eq!(prot.read_i64().unwrap(), v);
            assert_eq!(prot.position(), writer.inner().len());
        }
    }

    #[test]
    fn test_zig_zag_bytes() {
        let mut writer = ThriftCompactOutputProtocol::new(Vec::new());
        writer.write_i32(-1).unwrap();
        writer.write_i32(1).unwrap();
        writer.write_i32(300).unwrap();
        assert_eq!(writer.inner(), &[0x01, 0x02, 0xD8, 0x04]);
    }

    #[test]
    fn test_field_headers() {
        let mut writer = ThriftCompactOutputProtocol::new(Vec::new());
        let last = 7i32.write_thrift_field(&mut writer, 1, 0).unwrap();
        let last = true.write_thrift_field(&mut writer, 3, last).unwrap();
        // delta too large for the short form
        b"ab"[..].write_thrift_field(&mut writer, 40, last).unwrap();
        writer.write_struct_end().unwrap();
        assert_eq!(
            writer.inner(),
            &[0x15, 0x0E, 0x21, 0x08, 0x50, 0x02, b'a', b'b', 0x00]
        );

        let mut prot = ThriftCompactInputProtocol::new(writer.inner());
        prot.read_struct_begin().unwrap();
        let field = prot.read_field_begin().unwrap();
        assert_eq!((field.field_type, field.id), (FieldType::I32, 1));
        assert_eq!(prot.read_i32().unwrap(), 7);
        let field = prot.read_field_begin().unwrap();
        assert_eq!((field.field_type, field.id), (FieldType::BooleanTrue, 3));
        assert!(prot.read_bool().unwrap());
        let field = prot.read_field_begin().unwrap();
        assert_eq!((field.field_type, field.id), (FieldType::Binary, 40));
        assert_eq!(prot.read_bytes().unwrap(), b"ab");
        let field = prot.read_field_begin().unwrap();
        assert_eq!(field.field_type, FieldType::Stop);
        prot.read_struct_end().unwrap();
    }

    #[test]
    fn test_skip_nested() {
        // struct { 1: struct { 1: i64 }, 2: list<i32> [1, 2] } then i32 field
        let buf = [0x1C, 0x16, 0x04, 0x00, 0x19, 0x25, 0x02, 0x04, 0x00, 0x15, 0x0A];
        let mut prot = ThriftCompactInputProtocol::new(&buf);
        prot.skip(FieldType::Struct).unwrap();
        let field = prot.read_field_begin().unwrap();
        assert_eq!((field.field_type, field.id), (FieldType::I32, 1));
        assert_eq!(prot.read_i32().unwrap(), 5);
    }

    #[test]
    fn test_errors() {
        let mut prot = ThriftCompactInputProtocol::new(&[0x80, 0x80]);
        assert!(matches!(prot.read_i32(), Err(ParquetError::TruncatedInput(_))));

        let mut prot = ThriftCompactInputProtocol::new(&[0x0D]);
        assert!(matches!(
            prot.read_field_begin(),
            Err(ParquetError::MalformedHeader(_))
        ));

        let buf = [0xFF; 11];
        let mut prot = ThriftCompactInputProtocol::new(&buf);
        assert!(matches!(prot.read_i64(), Err(ParquetError::MalformedHeader(_))));

        // i64 value in an i32 field
        let mut prot = ThriftCompactInputProtocol::new(&[0x80, 0x80, 0x80, 0x80, 0x20]);
        assert!(matches!(prot.read_i32(), Err(ParquetError::MalformedHeader(_))));
    }
}
