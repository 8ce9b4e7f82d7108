use protoscope_codec::decode::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Register the descriptor.proto types in the private table on creation.
    pub bootstrap_descriptor_types: bool,
    pub max_decode_depth: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            bootstrap_descriptor_types: true,
            max_decode_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ContextConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        tracing::debug!("Loaded context config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = ContextConfig::from_json_str(r#"{ "max_decode_depth": 16 }"#).unwrap();
        assert_eq!(config.max_decode_depth, 16);
        assert!(config.bootstrap_descriptor_types);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            ContextConfig::from_json_str("{ max_decode_depth"),
            Err(ConfigError::Json(_))
        ));
    }
}
