//! Error types for ytdoc-core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, YtDocError>;

#[derive(Error, Debug)]
pub enum YtDocError {
    #[error("Invalid video reference: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("empty video URL")]
    EmptyInput,

    #[error("not a YouTube video URL: {0}")]
    UnsupportedUrl(String),

    #[error("malformed video id '{0}'")]
    InvalidVideoId(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}
