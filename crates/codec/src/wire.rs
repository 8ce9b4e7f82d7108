//! Low-level protobuf wire primitives.

use crate::error::{DecodeError, Result};

/// Largest field number protobuf allows, `2^29 - 1`.
pub const MAX_FIELD_NUMBER: u64 = (1 << 29) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint,
    Fixed64,
    LengthDelimited,
    StartGroup,
    EndGroup,
    Fixed32,
}

impl WireType {
    fn from_bits(field: u32, bits: u8) -> Result<Self> {
        match bits {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::Fixed32),
            wire_type => Err(DecodeError::InvalidWireType { field, wire_type }),
        }
    }

    pub(crate) fn bits(&self) -> u8 {
        match self {
            WireType::Varint => 0,
            WireType::Fixed64 => 1,
            WireType::LengthDelimited => 2,
            WireType::StartGroup => 3,
            WireType::EndGroup => 4,
            WireType::Fixed32 => 5,
        }
    }
}

/// Cursor over an encoded message.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    /// Offset of `buf[0]` in the outermost input, for error reporting.
    base: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0, base: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub fn read_varint(&mut self) -> Result<u64> {
        let start = self.offset();
        let mut value = 0u64;
        for i in 0..10 {
            let byte = *self
                .buf
                .get(self.pos)
                .ok_or(DecodeError::Truncated { offset: self.offset() })?;
            self.pos += 1;
            value |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(DecodeError::VarintOverflow { offset: start })
    }

    /// Reads a field key. Returns `None` at end of input.
    pub fn read_key(&mut self) -> Result<Option<(u32, WireType)>> {
        if self.is_empty() {
            return Ok(None);
        }
        let offset = self.offset();
        let key = self.read_varint()?;
        let field = key >> 3;
        if field == 0 || field > MAX_FIELD_NUMBER {
            return Err(DecodeError::InvalidFieldNumber { offset });
        }
        let field = field as u32;
        let wire_type = WireType::from_bits(field, (key & 0x7) as u8)?;
        Ok(Some((field, wire_type)))
    }

    pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let offset = self.offset();
        let length = self.read_varint()?;
        let remaining = self.buf.len() - self.pos;
        if length > remaining as u64 {
            return Err(DecodeError::LengthOverflow { offset, length });
        }
        let end = self.pos + length as usize;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Reads a length-delimited sub-message as its own reader.
    pub fn read_nested(&mut self) -> Result<Reader<'a>> {
        let bytes = self.read_bytes()?;
        let base = self.offset() - bytes.len();
        Ok(Reader { buf: bytes, pos: 0, base })
    }

    pub fn read_string(&mut self, field: u32) -> Result<String> {
        let bytes = self.read_bytes()?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| DecodeError::InvalidUtf8 { field })
    }

    /// `int32` fields are sign-extended varints; truncation is the wire rule.
    pub fn read_int32(&mut self) -> Result<i32> {
        Ok(self.read_varint()? as i32)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_varint()? != 0)
    }

    fn advance(&mut self, n: usize) -> Result<()> {
        if self.buf.len() - self.pos < n {
            return Err(DecodeError::Truncated { offset: self.buf.len() + self.base });
        }
        self.pos += n;
        Ok(())
    }

    /// Skips the value of a field this decoder does not keep.
    ///
    /// Groups are skipped without recursion; at most `max_depth` may be open
    /// at once.
    pub fn skip(&mut self, field: u32, wire_type: WireType, max_depth: usize) -> Result<()> {
        let mut open = Vec::new();
        let (mut field, mut wire_type) = (field, wire_type);
        loop {
            match wire_type {
                WireType::Varint => {
                    self.read_varint()?;
                }
                WireType::Fixed64 => self.advance(8)?,
                WireType::Fixed32 => self.advance(4)?,
                WireType::LengthDelimited => {
                    self.read_bytes()?;
                }
                WireType::StartGroup => {
                    if open.len() >= max_depth {
                        return Err(DecodeError::TooDeep { limit: max_depth });
                    }
                    open.push(field);
                }
                WireType::EndGroup => match open.last() {
                    Some(&group) if group == field => {
                        open.pop();
                    }
                    _ => {
                        return Err(DecodeError::InvalidWireType {
                            field,
                            wire_type: wire_type.bits(),
                        });
                    }
                },
            }

            let Some(&group) = open.last() else {
                return Ok(());
            };
            match self.read_key()? {
                Some((inner, inner_type)) => (field, wire_type) = (inner, inner_type),
                None => return Err(DecodeError::UnterminatedGroup { field: group }),
            }
        }
    }
}

/// Append-only output buffer.
#[derive(Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_varint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buf.push((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
        self.buf.push(value as u8);
    }

    pub fn write_key(&mut self, field: u32, wire_type: WireType) {
        self.write_varint((u64::from(field) << 3) | u64::from(wire_type.bits()));
    }

    pub fn write_bytes(&mut self, field: u32, bytes: &[u8]) {
        self.write_key(field, WireType::LengthDelimited);
        self.write_varint(bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_string(&mut self, field: u32, value: Option<&str>) {
        if let Some(value) = value {
            self.write_bytes(field, value.as_bytes());
        }
    }

    pub fn write_int32(&mut self, field: u32, value: Option<i32>) {
        if let Some(value) = value {
            self.write_key(field, WireType::Varint);
            // Negative values are sign-extended to ten bytes.
            self.write_varint(i64::from(value) as u64);
        }
    }

    pub fn write_bool(&mut self, field: u32, value: Option<bool>) {
        if let Some(value) = value {
            self.write_key(field, WireType::Varint);
            self.write_varint(u64::from(value));
        }
    }

    pub fn write_message(&mut self, field: u32, encode: impl FnOnce(&mut Writer)) {
        let mut nested = Writer::new();
        encode(&mut nested);
        self.write_bytes(field, &nested.buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_matches_reference_encoding() {
        let mut w = Writer::new();
        w.write_varint(300);
        assert_eq!(w.into_bytes(), vec![0xac, 0x02]);

        let mut r = Reader::new(&[0xac, 0x02]);
        assert_eq!(r.read_varint().unwrap(), 300);
        assert!(r.is_empty());
    }

    #[test]
    fn negative_int32_takes_ten_bytes() {
        let mut w = Writer::new();
        w.write_int32(3, Some(-1));
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), 11);

        let mut r = Reader::new(&bytes);
        assert_eq!(r.read_key().unwrap(), Some((3, WireType::Varint)));
        assert_eq!(r.read_int32().unwrap(), -1);
    }

    #[test]
    fn overlong_varint_is_rejected() {
        let bytes = [0xffu8; 11];
        let mut r = Reader::new(&bytes);
        assert_eq!(
            r.read_varint(),
            Err(DecodeError::VarintOverflow { offset: 0 })
        );
    }

    #[test]
    fn length_past_end_is_rejected() {
        let mut r = Reader::new(&[0x0a, 0x05, b'a']);
        r.read_key().unwrap();
        assert!(matches!(
            r.read_bytes(),
            Err(DecodeError::LengthOverflow { length: 5, .. })
        ));
    }

    #[test]
    fn skips_groups_up_to_matching_end() {
        // field 7 start group, field 1 varint 5, field 7 end group, field 2 varint 1
        let bytes = [0x3b, 0x08, 0x05, 0x3c, 0x10, 0x01];
        let mut r = Reader::new(&bytes);
        let (field, wt) = r.read_key().unwrap().unwrap();
        assert_eq!((field, wt), (7, WireType::StartGroup));
        r.skip(field, wt, 8).unwrap();
        assert_eq!(r.read_key().unwrap(), Some((2, WireType::Varint)));
    }

    #[test]
    fn group_nesting_is_bounded() {
        // 200k start-group keys for field 2, never closed
        let bytes = vec![0x13u8; 200_000];
        let mut r = Reader::new(&bytes);
        let (field, wt) = r.read_key().unwrap().unwrap();
        assert_eq!(r.skip(field, wt, 64), Err(DecodeError::TooDeep { limit: 64 }));
    }

    #[test]
    fn unterminated_group_is_rejected() {
        // field 2 start group, field 2 start group, field 2 end group, then EOF
        let bytes = [0x13, 0x13, 0x14];
        let mut r = Reader::new(&bytes);
        let (field, wt) = r.read_key().unwrap().unwrap();
        assert_eq!(
            r.skip(field, wt, 64),
            Err(DecodeError::UnterminatedGroup { field: 2 })
        );
    }

    #[test]
    fn mismatched_group_end_is_rejected() {
        // field 2 start group closed by field 3 end group
        let bytes = [0x13, 0x1c];
        let mut r = Reader::new(&bytes);
        let (field, wt) = r.read_key().unwrap().unwrap();
        assert_eq!(
            r.skip(field, wt, 64),
            Err(DecodeError::InvalidWireType { field: 3, wire_type: 4 })
        );
    }

    #[test]
    fn field_numbers_past_the_limit_are_invalid() {
        let mut w = Writer::new();
        w.write_varint((MAX_FIELD_NUMBER + 1) << 3);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(
            r.read_key(),
            Err(DecodeError::InvalidFieldNumber { offset: 0 })
        );

        let mut w = Writer::new();
        w.write_key(MAX_FIELD_NUMBER as u32, WireType::Varint);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(
            r.read_key().unwrap(),
            Some((MAX_FIELD_NUMBER as u32, WireType::Varint))
        );
    }

    #[test]
    fn field_zero_is_invalid() {
        let mut r = Reader::new(&[0x00]);
        assert_eq!(
            r.read_key(),
            Err(DecodeError::InvalidFieldNumber { offset: 0 })
        );
    }
}
