use crate::error::{Result, ScamError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Directory holding config.json, tokenizer.json and model.safetensors
    pub artifact_dir: String,
    /// Inputs are truncated to this many tokens before the forward pass
    pub max_seq_len: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScamError::Config(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ScamError::Config(e.to_string()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                listen_addr: "0.0.0.0:8000".to_string(),
            },
            model: ModelConfig {
                artifact_dir: "model".to_string(),
                max_seq_len: 512,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}
