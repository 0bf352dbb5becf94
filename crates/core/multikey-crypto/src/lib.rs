//! Key material codecs for multikey / did:key
//!
//! This crate provides:
//! - Compression and decompression of P-256, P-384 and P-521 public points
//! - RSA modulus envelopes for 2048 and 4096 bit keys
//! - Pooled, zeroized memory for keys and signatures with pluggable
//!   key generation and sign/verify capabilities
//! - Multikey encoding of public and private keys

pub mod config;
pub mod curves;
pub mod did_key;
pub mod ec_point;
mod error;
pub mod key_generator;
mod key_type;
pub mod memory;
pub mod rsa;

#[cfg(feature = "ed25519")]
pub mod ed25519;

pub use config::BufferPoolConfig;
pub use curves::{CurveParameters, EllipticCurve};
pub use error::{CryptoError, Result};
pub use key_generator::KeyGenerator;
pub use key_type::KeyType;
pub use memory::{
    BufferPool, KeyPairMemory, PooledBuffer, PrivateKey, PrivateKeyMemory, PublicKey,
    PublicKeyMemory, SensitiveMemory, Signature, SigningFunction, VerificationFunction,
};
pub use multikey_encoding::{Codec, MultibaseEncoder};

#[cfg(feature = "ed25519")]
pub use ed25519::DalekKeyGenerator;
