use thiserror::Error;

use crate::config::ConfigError;
use crate::decoder::DecodeError;

#[derive(Error, Debug)]
pub enum FeederError {
    #[error("Article decoding error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FeederError>;
