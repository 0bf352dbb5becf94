//! Multibase encoding/decoding utilities
//!
//! Multibase is a protocol for self-describing base encodings.
//! The first character indicates the encoding used.
//!
//! The base encoding itself is a capability: a [`MultibaseEncoder`] is a value
//! holding the identifier character together with the encoding function (and
//! optionally its inverse). New schemes are added by constructing a new value.
//!
//! See: <https://github.com/multiformats/multibase>

use std::{fmt, sync::Arc};

use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use tracing::trace;

use crate::{
    EncodingError,
    error::Result,
    multicodec::{Codec, MultiEncoded, MultiEncodedBuf},
};

/// Multibase prefix for base58btc (Bitcoin alphabet)
pub const BASE58BTC_PREFIX: char = 'z';

/// Multibase prefix for unpadded URL-safe base64
pub const BASE64URL_PREFIX: char = 'u';

type EncodeFn = dyn Fn(&[u8]) -> String + Send + Sync;
type DecodeFn = dyn Fn(&str) -> std::result::Result<Vec<u8>, String> + Send + Sync;

/// A base encoding bundled with its multibase identifier character
#[derive(Clone)]
pub struct MultibaseEncoder {
    id: char,
    encoder: Arc<EncodeFn>,
    decoder: Option<Arc<DecodeFn>>,
}

impl MultibaseEncoder {
    /// Creates an encoder from an identifier and an encoding function.
    /// The function must not emit the identifier itself.
    pub fn new<F>(id: char, encoder: F) -> Self
    where
        F: Fn(&[u8]) -> String + Send + Sync + 'static,
    {
        Self {
            id,
            encoder: Arc::new(encoder),
            decoder: None,
        }
    }

    /// Adds the inverse of the encoding function
    pub fn with_decoder<F>(mut self, decoder: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<Vec<u8>, String> + Send + Sync + 'static,
    {
        self.decoder = Some(Arc::new(decoder));
        self
    }

    /// Base58 with the Bitcoin alphabet, prefix 'z'
    pub fn base58btc() -> Self {
        Self::new(BASE58BTC_PREFIX, |bytes| bs58::encode(bytes).into_string()).with_decoder(
            |text| {
                bs58::decode(text)
                    .into_vec()
                    .map_err(|e| e.to_string())
            },
        )
    }

    /// Unpadded URL-safe base64, prefix 'u'
    pub fn base64url() -> Self {
        Self::new(BASE64URL_PREFIX, |bytes| BASE64_URL_SAFE_NO_PAD.encode(bytes)).with_decoder(
            |text| {
                BASE64_URL_SAFE_NO_PAD
                    .decode(text)
                    .map_err(|e| e.to_string())
            },
        )
    }

    /// Any scheme implemented by the `multibase` crate
    pub fn from_base(base: ::multibase::Base) -> Self {
        Self::new(base.code(), move |bytes| base.encode(bytes))
            .with_decoder(move |text| base.decode(text).map_err(|e| e.to_string()))
    }

    /// The multibase identifier character
    pub fn id(&self) -> char {
        self.id
    }

    /// True if this encoder can also decode
    pub fn can_decode(&self) -> bool {
        self.decoder.is_some()
    }

    /// Encodes the data and prefixes the identifier character
    pub fn encode(&self, data: &[u8]) -> String {
        let encoded = (self.encoder)(data);
        let mut result = String::with_capacity(encoded.len() + self.id.len_utf8());
        result.push(self.id);
        result.push_str(&encoded);
        result
    }

    /// Strips the identifier character and decodes the remainder
    pub fn decode(&self, text: &str) -> Result<Vec<u8>> {
        let mut chars = text.chars();
        let prefix = chars.next().ok_or(EncodingError::EmptyMultibase)?;
        if prefix != self.id {
            return Err(EncodingError::UnknownMultibase(prefix));
        }

        let decoder = self
            .decoder
            .as_ref()
            .ok_or(EncodingError::NoDecoder(self.id))?;
        decoder(chars.as_str()).map_err(EncodingError::Multibase)
    }
}

impl fmt::Debug for MultibaseEncoder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MultibaseEncoder")
            .field("id", &self.id)
            .field("can_decode", &self.can_decode())
            .finish()
    }
}

/// Prepends the codec header to the payload and multibase encodes the result.
///
/// The concatenation lives in a scratch buffer scoped to this call and is
/// wiped before returning.
pub fn multicodec_encode(data: &[u8], codec_header: &[u8], encoder: &MultibaseEncoder) -> String {
    let scratch = MultiEncodedBuf::encode_with_header(codec_header, data);
    trace!(
        "multicodec encoding {} bytes with multibase '{}'",
        scratch.as_bytes().len(),
        encoder.id()
    );
    encoder.encode(scratch.as_bytes())
}

/// Inverse of [`multicodec_encode`]: selects the encoder by the identifier
/// character, decodes, and splits off the multicodec header.
pub fn multicodec_decode(text: &str, encoders: &[MultibaseEncoder]) -> Result<(Codec, Vec<u8>)> {
    let prefix = text.chars().next().ok_or(EncodingError::EmptyMultibase)?;
    let encoder = encoders
        .iter()
        .find(|e| e.id() == prefix)
        .ok_or(EncodingError::UnknownMultibase(prefix))?;

    let bytes = zeroize::Zeroizing::new(encoder.decode(text)?);
    let multi_encoded = MultiEncoded::new(&bytes)?;
    Ok((multi_encoded.codec_type(), multi_encoded.data().to_vec()))
}

/// Decode a base58btc multibase string (must start with 'z')
///
/// Returns the decoded bytes without the prefix.
pub fn decode_base58btc(s: &str) -> Result<Vec<u8>> {
    MultibaseEncoder::base58btc().decode(s)
}

/// Encode bytes as base58btc with multibase prefix 'z'
pub fn encode_base58btc(bytes: &[u8]) -> String {
    MultibaseEncoder::base58btc().encode(bytes)
}

/// Encode key bytes with a multicodec prefix as a multibase (base58btc) string
///
/// The result is suitable for use as a did:key identifier or publicKeyMultibase value.
pub fn encode_multikey(codec: Codec, key_bytes: &[u8]) -> String {
    multicodec_encode(
        key_bytes,
        codec.header().as_bytes(),
        &MultibaseEncoder::base58btc(),
    )
}

/// Decode a base58btc multikey string and return both codec and key bytes
pub fn decode_multikey(key: &str) -> Result<(Codec, Vec<u8>)> {
    multicodec_decode(key, &[MultibaseEncoder::base58btc()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_base58btc() {
        // "z" + base58btc("hello") = "zCn8eVZg"
        let result = decode_base58btc("zCn8eVZg").unwrap();
        assert_eq!(result, b"hello");
    }

    #[test]
    fn test_encode_base58btc() {
        let encoded = encode_base58btc(b"hello");
        assert_eq!(encoded, "zCn8eVZg");
    }

    #[test]
    fn test_invalid_prefix() {
        let result = decode_base58btc("fABCDEF"); // 'f' is hex, not base58btc
        assert!(matches!(
            result.unwrap_err(),
            EncodingError::UnknownMultibase('f')
        ));
    }

    #[test]
    fn test_invalid_base58() {
        // '0', 'O', 'I', 'l' are not valid base58 characters
        let result = decode_base58btc("z0OIl");
        assert!(matches!(result.unwrap_err(), EncodingError::Multibase(_)));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            decode_base58btc("").unwrap_err(),
            EncodingError::EmptyMultibase
        ));
    }

    #[test]
    fn test_custom_encoder_without_decoder() {
        let hex = MultibaseEncoder::new('f', |bytes| {
            bytes.iter().map(|b| format!("{b:02x}")).collect()
        });
        assert_eq!(hex.encode(&[0xde, 0xad]), "fdead");
        assert!(!hex.can_decode());
        assert!(matches!(
            hex.decode("fdead").unwrap_err(),
            EncodingError::NoDecoder('f')
        ));
    }

    #[test]
    fn test_base64url() {
        let encoder = MultibaseEncoder::base64url();
        let encoded = encoder.encode(b"hello");
        assert_eq!(encoded, "uaGVsbG8");
        assert_eq!(encoder.decode(&encoded).unwrap(), b"hello");
    }

    #[test]
    fn test_from_base_matches_builtin() {
        let from_crate = MultibaseEncoder::from_base(::multibase::Base::Base58Btc);
        assert_eq!(from_crate.id(), BASE58BTC_PREFIX);
        assert_eq!(from_crate.encode(b"hello"), "zCn8eVZg");
    }

    #[test]
    fn test_multicodec_encode_prefixes_header() {
        let encoded = multicodec_encode(
            &[0u8; 32],
            Codec::Ed25519Pub.header().as_bytes(),
            &MultibaseEncoder::base58btc(),
        );
        assert!(encoded.starts_with("z6Mk"));

        let (codec, data) = decode_multikey(&encoded).unwrap();
        assert_eq!(codec, Codec::Ed25519Pub);
        assert_eq!(data, vec![0u8; 32]);
    }

    #[test]
    fn test_multicodec_decode_selects_encoder() {
        let encoders = [MultibaseEncoder::base58btc(), MultibaseEncoder::base64url()];
        let payload = [7u8; 33];

        for encoder in &encoders {
            let text = multicodec_encode(&payload, Codec::P256Pub.header().as_bytes(), encoder);
            let (codec, data) = multicodec_decode(&text, &encoders).unwrap();
            assert_eq!(codec, Codec::P256Pub);
            assert_eq!(data, payload);
        }

        assert!(matches!(
            multicodec_decode("mAAAA", &encoders).unwrap_err(),
            EncodingError::UnknownMultibase('m')
        ));
    }

    #[test]
    fn test_did_key_identifier() {
        // Real did:key identifier (ed25519)
        let id = "z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK";
        let (codec, key) = decode_multikey(id).unwrap();
        assert_eq!(codec, Codec::Ed25519Pub);
        assert_eq!(key.len(), 32);
        assert_eq!(encode_multikey(codec, &key), id);
    }
}
