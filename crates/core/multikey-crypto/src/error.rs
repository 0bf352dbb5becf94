//! Error types for key material codecs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error(
        "Length must be {lengths}. (Parameter '{parameter}')",
        lengths = format_lengths(.expected)
    )]
    InvalidLength {
        parameter: &'static str,
        expected: &'static [usize],
    },

    #[error("Invalid compressed point sign byte 0x{0:02x}, expected 0x02 or 0x03.")]
    InvalidSignByte(u8),

    #[error("Uncompressed points (0x04) are not supported by this codec.")]
    UnsupportedFormat,

    #[error("Value cannot be null. (Parameter '{0}')")]
    MissingArgument(&'static str),

    #[error("Parameters 'xPoint' and 'yPoint' need to be of the same length.")]
    MismatchedLength,

    #[error("Catastrophic error while decoding RSA modulus bytes.")]
    CorruptEnvelope,

    #[error("The most significant bit of the modulus must be set. (Parameter '{0}')")]
    InvalidModulus(&'static str),

    #[error("Key error: {0}")]
    KeyError(String),

    #[error("Signature error: {0}")]
    Signature(String),

    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Encoding error: {0}")]
    Encoding(#[from] multikey_encoding::EncodingError),
}

/// "32", "256 or 512", "32, 48 or 66"
fn format_lengths(lengths: &[usize]) -> String {
    match lengths {
        [] => String::new(),
        [only] => only.to_string(),
        [head @ .., last] => {
            let head: Vec<String> = head.iter().map(usize::to_string).collect();
            format!("{} or {last}", head.join(", "))
        }
    }
}

pub type Result<T> = std::result::Result<T, CryptoError>;
