use crate::error::{Result, SmimeError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Process-wide message settings, shared read-only across operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Session {
    pub encoding: EncodingConfig,
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncodingConfig {
    /// Charset stamped on text bodies built without an explicit one
    pub default_charset: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Parsing rejects messages larger than this
    pub max_message_size: usize,
}

impl Session {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SmimeError::Config(e.to_string()))?;

        toml::from_str(&content).map_err(|e| SmimeError::Config(e.to_string()))
    }
}

impl Default for Session {
    fn default() -> Self {
        Session {
            encoding: EncodingConfig {
                default_charset: "utf-8".to_string(),
            },
            provider: ProviderConfig {
                max_message_size: 10 * 1024 * 1024, // 10MB
            },
        }
    }
}
