#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unknown field type: {0}")]
    UnknownFieldType(i32),
    #[error("Unknown field label: {0}")]
    UnknownLabel(i32),
    #[error("Unknown symbol kind: {0}")]
    UnknownKind(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
