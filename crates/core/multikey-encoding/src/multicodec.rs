//! Multicodec headers
//!
//! Multicodec is a self-describing format that prefixes data with an unsigned
//! varint indicating the type of data that follows. Multikey values are the
//! multicodec header of the key type followed by the raw (or wire-form) key
//! bytes.
//!
//! See: <https://github.com/multiformats/multicodec>

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{EncodingError, error::Result};

// ****************************************************************************
// Codec Magic Numbers
// See: https://github.com/multiformats/multicodec/blob/master/table.csv
// ****************************************************************************
pub const ED25519_PUB: u64 = 0xed;
pub const ED25519_PRIV: u64 = 0x1300;
pub const X25519_PUB: u64 = 0xec;
pub const X25519_PRIV: u64 = 0x1302;
pub const SECP256K1_PUB: u64 = 0xe7;
pub const SECP256K1_PRIV: u64 = 0x1301;
pub const P256_PUB: u64 = 0x1200;
pub const P256_PRIV: u64 = 0x1306;
pub const P384_PUB: u64 = 0x1201;
pub const P384_PRIV: u64 = 0x1307;
pub const P521_PUB: u64 = 0x1202;
pub const P521_PRIV: u64 = 0x1308;
pub const RSA_PUB: u64 = 0x1205;

/// Maximum length of a u64 unsigned varint
const MAX_HEADER_LENGTH: usize = 10;

/// Known codec types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Codec {
    Ed25519Pub,
    Ed25519Priv,
    X25519Pub,
    X25519Priv,
    Secp256k1Pub,
    Secp256k1Priv,
    P256Pub,
    P256Priv,
    P384Pub,
    P384Priv,
    P521Pub,
    P521Priv,
    RsaPub,
    Unknown(u64),
}

impl Codec {
    /// Convert a raw codec value to a Codec enum
    pub fn from_u64(value: u64) -> Self {
        match value {
            ED25519_PUB => Codec::Ed25519Pub,
            ED25519_PRIV => Codec::Ed25519Priv,
            X25519_PUB => Codec::X25519Pub,
            X25519_PRIV => Codec::X25519Priv,
            SECP256K1_PUB => Codec::Secp256k1Pub,
            SECP256K1_PRIV => Codec::Secp256k1Priv,
            P256_PUB => Codec::P256Pub,
            P256_PRIV => Codec::P256Priv,
            P384_PUB => Codec::P384Pub,
            P384_PRIV => Codec::P384Priv,
            P521_PUB => Codec::P521Pub,
            P521_PRIV => Codec::P521Priv,
            RSA_PUB => Codec::RsaPub,
            other => Codec::Unknown(other),
        }
    }

    /// Convert to raw u64 value
    pub fn to_u64(self) -> u64 {
        match self {
            Codec::Ed25519Pub => ED25519_PUB,
            Codec::Ed25519Priv => ED25519_PRIV,
            Codec::X25519Pub => X25519_PUB,
            Codec::X25519Priv => X25519_PRIV,
            Codec::Secp256k1Pub => SECP256K1_PUB,
            Codec::Secp256k1Priv => SECP256K1_PRIV,
            Codec::P256Pub => P256_PUB,
            Codec::P256Priv => P256_PRIV,
            Codec::P384Pub => P384_PUB,
            Codec::P384Priv => P384_PRIV,
            Codec::P521Pub => P521_PUB,
            Codec::P521Priv => P521_PRIV,
            Codec::RsaPub => RSA_PUB,
            Codec::Unknown(v) => v,
        }
    }

    /// Returns true if this is a public key codec
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Codec::Ed25519Pub
                | Codec::X25519Pub
                | Codec::Secp256k1Pub
                | Codec::P256Pub
                | Codec::P384Pub
                | Codec::P521Pub
                | Codec::RsaPub
        )
    }

    /// Key payload lengths accepted after this header.
    /// EC public keys are compressed points, RSA public keys are DER envelopes.
    pub fn accepted_key_lengths(&self) -> &'static [usize] {
        match self {
            Codec::Ed25519Pub | Codec::Ed25519Priv => &[32],
            Codec::X25519Pub | Codec::X25519Priv => &[32],
            Codec::Secp256k1Pub => &[33],
            Codec::Secp256k1Priv => &[32],
            Codec::P256Pub => &[33],
            Codec::P256Priv => &[32],
            Codec::P384Pub => &[49],
            Codec::P384Priv => &[48],
            Codec::P521Pub => &[67],
            Codec::P521Priv => &[66],
            Codec::RsaPub => &[270, 526],
            Codec::Unknown(_) => &[],
        }
    }

    /// The multicodec header bytes (unsigned varint) for this codec
    pub fn header(self) -> MulticodecHeader {
        MulticodecHeader::new(self.to_u64())
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:x}", self.to_u64())
    }
}

/// Fixed byte prefix identifying the key type of the payload that follows
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MulticodecHeader {
    bytes: [u8; MAX_HEADER_LENGTH],
    len: usize,
}

impl MulticodecHeader {
    /// Creates the varint header for a raw codec value
    pub fn new(codec: u64) -> Self {
        let mut bytes = [0u8; MAX_HEADER_LENGTH];
        let len = unsigned_varint::encode::u64(codec, &mut bytes).len();
        Self { bytes, len }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl AsRef<[u8]> for MulticodecHeader {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for MulticodecHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MulticodecHeader({:02x?})", self.as_bytes())
    }
}

/// A parsed view over multicodec-encoded bytes (borrowed)
#[derive(Debug, Clone, Copy)]
pub struct MultiEncoded<'a> {
    codec: u64,
    data: &'a [u8],
}

impl<'a> MultiEncoded<'a> {
    /// Splits the varint codec header from the data that follows
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let (codec, data) = unsigned_varint::decode::u64(bytes)
            .map_err(|e| EncodingError::InvalidMulticodec(format!("varint decode: {e}")))?;
        Ok(Self { codec, data })
    }

    /// Raw codec value (u64)
    pub fn codec(&self) -> u64 {
        self.codec
    }

    /// Codec as typed enum
    pub fn codec_type(&self) -> Codec {
        Codec::from_u64(self.codec)
    }

    /// Data bytes (without codec prefix)
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Fails unless the header is the expected codec
    pub fn expect_codec(self, expected: Codec) -> Result<Self> {
        if self.codec != expected.to_u64() {
            return Err(EncodingError::UnexpectedCodec {
                expected: expected.to_u64(),
                actual: self.codec,
            });
        }
        Ok(self)
    }
}

/// A multicodec-encoded byte buffer (owned), wiped when dropped
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MultiEncodedBuf(Vec<u8>);

impl MultiEncodedBuf {
    /// Encode bytes with the given codec
    pub fn encode(codec: Codec, bytes: &[u8]) -> Self {
        Self::encode_with_header(codec.header().as_bytes(), bytes)
    }

    /// Concatenates an arbitrary header and the payload
    pub fn encode_with_header(header: &[u8], bytes: &[u8]) -> Self {
        let mut result = Vec::with_capacity(header.len() + bytes.len());
        result.extend_from_slice(header);
        result.extend_from_slice(bytes);
        Self(result)
    }

    /// Returns a reference to the raw bytes, including the codec prefix
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Parses the buffer back into codec and data
    pub fn as_multi_encoded(&self) -> Result<MultiEncoded<'_>> {
        MultiEncoded::new(&self.0)
    }
}
