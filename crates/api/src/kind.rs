use crate::error::ApiError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four kinds of named symbol a context can hold.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Message,
    Enum,
    Service,
    Extension,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Message => "message",
            SymbolKind::Enum => "enum",
            SymbolKind::Service => "service",
            SymbolKind::Extension => "extension",
        }
    }

    /// Whether a field may use a symbol of this kind as its type.
    pub fn is_type(&self) -> bool {
        matches!(self, SymbolKind::Message | SymbolKind::Enum)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymbolKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "message" => Ok(SymbolKind::Message),
            "enum" => Ok(SymbolKind::Enum),
            "service" => Ok(SymbolKind::Service),
            "extension" => Ok(SymbolKind::Extension),
            _ => Err(ApiError::UnknownKind(s.to_string())),
        }
    }
}
