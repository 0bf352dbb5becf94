//! Encoding errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("Empty multibase string")]
    EmptyMultibase,

    #[error("Unknown multibase prefix: '{0}'")]
    UnknownMultibase(char),

    #[error("No decoder registered for multibase prefix '{0}'")]
    NoDecoder(char),

    #[error("Invalid multibase encoding: {0}")]
    Multibase(String),

    #[error("Invalid multicodec: {0}")]
    InvalidMulticodec(String),

    #[error("Unexpected codec: expected 0x{expected:x}, got 0x{actual:x}")]
    UnexpectedCodec { expected: u64, actual: u64 },
}

pub type Result<T> = std::result::Result<T, EncodingError>;
