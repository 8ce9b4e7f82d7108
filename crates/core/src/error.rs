use protoscope_api::SymbolKind;
use protoscope_codec::DecodeError;
use thiserror::Error;

/// Why a batch of definitions was rejected.
///
/// A rejected batch never changes the context.
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Duplicate definition: '{name}' is already defined")]
    DuplicateDefinition { name: String },
    #[error("Unresolved reference: '{reference}' referenced from '{referrer}'")]
    UnresolvedReference { referrer: String, reference: String },
    #[error(
        "Kind mismatch: '{reference}' referenced from '{referrer}' is a {found}, expected {expected}"
    )]
    KindMismatch {
        referrer: String,
        reference: String,
        expected: &'static str,
        found: SymbolKind,
    },
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("Descriptor parse failure: {0}")]
    ParseFailure(#[from] DecodeError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContextError {
    /// Stable short code, e.g. for command-line output.
    pub fn code(&self) -> &'static str {
        match self {
            ContextError::DuplicateDefinition { .. } => "duplicate_definition",
            ContextError::UnresolvedReference { .. } => "unresolved_reference",
            ContextError::KindMismatch { .. } => "kind_mismatch",
            ContextError::InvalidDescriptor(_) => "invalid_descriptor",
            ContextError::ParseFailure(_) => "parse_failure",
            ContextError::Io(_) => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, ContextError>;
