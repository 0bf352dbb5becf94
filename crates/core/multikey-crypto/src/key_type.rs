//! Key type enumeration

use std::fmt;

use multikey_encoding::Codec;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::{CryptoError, curves::EllipticCurve};

/// Key types whose material can be held in key memory and encoded as multikey
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, Zeroize)]
pub enum KeyType {
    Ed25519,
    X25519,
    P256,
    P384,
    P521,
    Rsa2048,
    Rsa4096,
    #[default]
    Unknown,
}

impl KeyType {
    /// Multicodec for the public half of this key type
    pub fn public_codec(&self) -> Option<Codec> {
        match self {
            KeyType::Ed25519 => Some(Codec::Ed25519Pub),
            KeyType::X25519 => Some(Codec::X25519Pub),
            KeyType::P256 => Some(Codec::P256Pub),
            KeyType::P384 => Some(Codec::P384Pub),
            KeyType::P521 => Some(Codec::P521Pub),
            KeyType::Rsa2048 | KeyType::Rsa4096 => Some(Codec::RsaPub),
            KeyType::Unknown => None,
        }
    }

    /// Multicodec for the private half. RSA private keys have no multikey form.
    pub fn private_codec(&self) -> Option<Codec> {
        match self {
            KeyType::Ed25519 => Some(Codec::Ed25519Priv),
            KeyType::X25519 => Some(Codec::X25519Priv),
            KeyType::P256 => Some(Codec::P256Priv),
            KeyType::P384 => Some(Codec::P384Priv),
            KeyType::P521 => Some(Codec::P521Priv),
            KeyType::Rsa2048 | KeyType::Rsa4096 | KeyType::Unknown => None,
        }
    }
}

impl From<EllipticCurve> for KeyType {
    fn from(curve: EllipticCurve) -> Self {
        match curve {
            EllipticCurve::P256 => KeyType::P256,
            EllipticCurve::P384 => KeyType::P384,
            EllipticCurve::P521 => KeyType::P521,
        }
    }
}

impl TryFrom<&str> for KeyType {
    type Error = CryptoError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Ed25519" => Ok(KeyType::Ed25519),
            "X25519" => Ok(KeyType::X25519),
            "P-256" => Ok(KeyType::P256),
            "P-384" => Ok(KeyType::P384),
            "P-521" => Ok(KeyType::P521),
            "RSA-2048" => Ok(KeyType::Rsa2048),
            "RSA-4096" => Ok(KeyType::Rsa4096),
            _ => Err(CryptoError::UnsupportedKeyType(value.to_string())),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeyType::Ed25519 => write!(f, "Ed25519"),
            KeyType::X25519 => write!(f, "X25519"),
            KeyType::P256 => write!(f, "P-256"),
            KeyType::P384 => write!(f, "P-384"),
            KeyType::P521 => write!(f, "P-521"),
            KeyType::Rsa2048 => write!(f, "RSA-2048"),
            KeyType::Rsa4096 => write!(f, "RSA-4096"),
            KeyType::Unknown => write!(f, "Unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parses_back() {
        for key_type in [
            KeyType::Ed25519,
            KeyType::X25519,
            KeyType::P256,
            KeyType::P384,
            KeyType::P521,
            KeyType::Rsa2048,
            KeyType::Rsa4096,
        ] {
            assert_eq!(KeyType::try_from(key_type.to_string().as_str()).unwrap(), key_type);
        }
        assert!(matches!(
            KeyType::try_from("secp256k1"),
            Err(CryptoError::UnsupportedKeyType(_))
        ));
    }

    #[test]
    fn rsa_has_no_private_codec() {
        assert_eq!(KeyType::Rsa4096.public_codec(), Some(Codec::RsaPub));
        assert_eq!(KeyType::Rsa4096.private_codec(), None);
        assert_eq!(KeyType::Ed25519.private_codec(), Some(Codec::Ed25519Priv));
    }

    #[test]
    fn serializes_as_variant_name() {
        let json = serde_json::to_string(&KeyType::P384).unwrap();
        assert_eq!(json, "\"P384\"");
        let key_type: KeyType = serde_json::from_str("\"Rsa2048\"").unwrap();
        assert_eq!(key_type, KeyType::Rsa2048);
    }
}
