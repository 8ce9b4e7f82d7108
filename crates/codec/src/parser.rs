use crate::decode::{DEFAULT_MAX_DEPTH, decode_set};
use crate::error::Result;
use protoscope_api::FileDescriptorSet;

/// Turns serialized descriptor bytes into an owned descriptor tree.
pub trait DescriptorParser: Send + Sync {
    fn parse_set(&self, bytes: &[u8]) -> Result<FileDescriptorSet>;
}

/// The default parser: protobuf binary wire format.
#[derive(Debug, Clone, Copy)]
pub struct WireDecoder {
    pub max_depth: usize,
}

impl WireDecoder {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for WireDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl DescriptorParser for WireDecoder {
    fn parse_set(&self, bytes: &[u8]) -> Result<FileDescriptorSet> {
        let set = decode_set(bytes, self.max_depth)?;
        tracing::trace!(
            "Decoded {} descriptor files from {} bytes",
            set.file.len(),
            bytes.len()
        );
        Ok(set)
    }
}
