use thiserror::Error;

use crate::sources::SourceError;

#[derive(Error, Debug)]
pub enum Error {
    /// A matched string fits none of the canonical date shapes.
    #[error("unrecognized date format: {0:?}")]
    UnrecognizedFormat(String),

    /// The text around a match is too thin to explain it.
    #[error("insufficient context around byte {offset}")]
    InsufficientContext { offset: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Source(#[from] SourceError),
}

pub type Result<T> = std::result::Result<T, Error>;
