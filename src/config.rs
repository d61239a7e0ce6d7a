//! Codec configuration
//!
//! Loaded from JSON; every field is optional and falls back to its default.

use crate::chain::MAINNET;
use crate::codec::DEFAULT_MAX_FIELD_LEN;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    InvalidData(String),
}

/// Settings for building a [`crate::codec::TxCodec`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Network name: "main", "test" or "regtest"
    pub network: String,
    /// Upper bound on any length-prefixed field of a packed record
    pub max_field_len: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            network: MAINNET.to_string(),
            max_field_len: DEFAULT_MAX_FIELD_LEN,
        }
    }
}

impl CodecConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CodecConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        log::debug!(
            "Loaded config from {:?}: network={}, max_field_len={}",
            path,
            config.network,
            config.max_field_len
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_field_len == 0 {
            return Err(ConfigError::InvalidData(
                "max_field_len must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
