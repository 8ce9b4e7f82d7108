use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected end of input at offset {offset}")]
    Truncated { offset: usize },
    #[error("varint at offset {offset} is longer than 10 bytes")]
    VarintOverflow { offset: usize },
    #[error("invalid wire type {wire_type} for field {field}")]
    InvalidWireType { field: u32, wire_type: u8 },
    #[error("invalid field number at offset {offset}")]
    InvalidFieldNumber { offset: usize },
    #[error("length {length} at offset {offset} exceeds remaining input")]
    LengthOverflow { offset: usize, length: u64 },
    #[error("field {field} is not valid UTF-8")]
    InvalidUtf8 { field: u32 },
    #[error("invalid enum value {value} for field {field}")]
    InvalidEnumValue { field: u32, value: i32 },
    #[error("unterminated group for field {field}")]
    UnterminatedGroup { field: u32 },
    #[error("nesting deeper than {limit} levels")]
    TooDeep { limit: usize },
}

pub type Result<T> = std::result::Result<T, DecodeError>;
