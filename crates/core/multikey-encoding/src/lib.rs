//! Multibase and multicodec encoding for multikey key material
//!
//! This crate provides the textual layer of DID key representations:
//! - Multicodec varint headers identifying key types
//! - Multibase encoders as pluggable capability values
//! - Encoding/decoding of `header ++ payload` into multibase text

pub mod multibase;
pub mod multicodec;

pub use crate::multibase::{
    BASE58BTC_PREFIX, BASE64URL_PREFIX, MultibaseEncoder, decode_base58btc, decode_multikey,
    encode_base58btc, encode_multikey, multicodec_decode, multicodec_encode,
};
pub use crate::multicodec::{
    Codec, ED25519_PRIV, ED25519_PUB, MultiEncoded, MultiEncodedBuf, MulticodecHeader, P256_PRIV,
    P256_PUB, P384_PRIV, P384_PUB, P521_PRIV, P521_PUB, RSA_PUB, SECP256K1_PRIV, SECP256K1_PUB,
    X25519_PRIV, X25519_PUB,
};

mod error;
pub use error::EncodingError;
