//! Wire-format codec for descriptor sets.
//!
//! Decodes serialized `google.protobuf.FileDescriptorSet` bytes into the
//! descriptor tree from `protoscope-api` and writes them back out. Only the
//! fields a symbol context consumes are kept; everything else is skipped.

pub mod decode;
pub mod encode;
pub mod error;
pub mod fields;
pub mod parser;
pub mod wire;

pub use decode::decode_set;
pub use encode::encode_set;
pub use error::{DecodeError, Result};
pub use parser::{DescriptorParser, WireDecoder};
