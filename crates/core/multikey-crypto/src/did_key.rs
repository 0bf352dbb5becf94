//! Multikey text for public and private keys, as used in did:key identifiers
//! and `publicKeyMultibase` values.
//!
//! EC public keys are carried as compressed points and RSA public keys as
//! modulus envelopes, each behind the multicodec header of its key type.

use multikey_encoding::{
    Codec, EncodingError, MultibaseEncoder, multicodec_decode, multicodec_encode,
};
use tracing::trace;

use crate::{
    CryptoError, KeyType,
    curves::EllipticCurve,
    ec_point,
    error::Result,
    memory::{BufferPool, PrivateKeyMemory, PublicKeyMemory, SensitiveMemory},
    rsa,
};

/// Compresses the point and encodes it with the matching P-256/P-384/P-521 header
pub fn encode_ec_public_key(
    x_point: &[u8],
    y_point: &[u8],
    encoder: &MultibaseEncoder,
) -> Result<String> {
    let (curve, compressed) = ec_point::compress_point(x_point, y_point)?;
    trace!("encoding {curve} public key");
    Ok(multicodec_encode(
        &compressed,
        curve.public_codec().header().as_bytes(),
        encoder,
    ))
}

/// Wraps the modulus in its envelope and encodes it with the RSA header
pub fn encode_rsa_public_key(rsa_modulus: &[u8], encoder: &MultibaseEncoder) -> Result<String> {
    let envelope = rsa::encode(rsa_modulus)?;
    Ok(multicodec_encode(
        &envelope,
        Codec::RsaPub.header().as_bytes(),
        encoder,
    ))
}

/// Encodes public key memory already in wire form (raw, compressed point or
/// RSA envelope)
pub fn encode_public_key(
    public_key: &PublicKeyMemory,
    encoder: &MultibaseEncoder,
) -> Result<String> {
    let codec = public_key
        .key_type()
        .public_codec()
        .ok_or_else(|| unsupported(public_key.key_type()))?;
    encode_key_bytes(codec, public_key.as_slice(), encoder)
}

/// Encodes raw private key bytes. RSA private keys have no multikey form.
pub fn encode_private_key(
    private_key: &PrivateKeyMemory,
    encoder: &MultibaseEncoder,
) -> Result<String> {
    let codec = private_key
        .key_type()
        .private_codec()
        .ok_or_else(|| unsupported(private_key.key_type()))?;
    encode_key_bytes(codec, private_key.as_slice(), encoder)
}

/// Decodes an EC multikey into its curve and X and Y coordinates
pub fn decode_ec_public_key(
    text: &str,
    encoders: &[MultibaseEncoder],
) -> Result<(EllipticCurve, Vec<u8>, Vec<u8>)> {
    let (codec, data) = multicodec_decode(text, encoders)?;
    let curve = EllipticCurve::from_codec(codec).ok_or_else(|| {
        CryptoError::UnsupportedKeyType(format!(
            "Expected a P-256, P-384 or P-521 public key, got codec {codec}"
        ))
    })?;

    let (x_point, y_point) = check_point_curve(curve, &data)?;
    Ok((curve, x_point, y_point))
}

/// Decompresses the point and checks it belongs to the curve named by the header
fn check_point_curve(curve: EllipticCurve, compressed: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let (point_curve, x_point, y_point) = ec_point::decompress_point(compressed)?;
    if point_curve != curve {
        return Err(CryptoError::KeyError(format!(
            "{curve} header followed by a {point_curve} point"
        )));
    }
    Ok((x_point, y_point))
}

/// Decodes an RSA multikey into the raw modulus
pub fn decode_rsa_public_key(text: &str, encoders: &[MultibaseEncoder]) -> Result<Vec<u8>> {
    let (codec, data) = multicodec_decode(text, encoders)?;
    if codec != Codec::RsaPub {
        return Err(EncodingError::UnexpectedCodec {
            expected: Codec::RsaPub.to_u64(),
            actual: codec.to_u64(),
        }
        .into());
    }
    rsa::decode(&data)
}

/// Decodes a public multikey into key memory holding its wire form
pub fn decode_public_key(
    text: &str,
    encoders: &[MultibaseEncoder],
    pool: &BufferPool,
) -> Result<PublicKeyMemory> {
    let (codec, data) = multicodec_decode(text, encoders)?;
    let key_type = match codec {
        Codec::Ed25519Pub => KeyType::Ed25519,
        Codec::X25519Pub => KeyType::X25519,
        Codec::P256Pub => KeyType::P256,
        Codec::P384Pub => KeyType::P384,
        Codec::P521Pub => KeyType::P521,
        Codec::RsaPub if data.len() == rsa::RSA2048_ENCODED_LENGTH => KeyType::Rsa2048,
        Codec::RsaPub => KeyType::Rsa4096,
        other => {
            return Err(CryptoError::UnsupportedKeyType(format!(
                "No public key type for codec {other}"
            )));
        }
    };
    check_length(codec, &data)?;

    // wire form is stored as is, but it has to parse
    if let Some(curve) = EllipticCurve::from_codec(codec) {
        check_point_curve(curve, &data)?;
    } else if codec == Codec::RsaPub {
        rsa::decode(&data)?;
    }

    Ok(PublicKeyMemory::new(
        SensitiveMemory::copy_from(pool, &data),
        key_type,
    ))
}

fn encode_key_bytes(codec: Codec, key_bytes: &[u8], encoder: &MultibaseEncoder) -> Result<String> {
    check_length(codec, key_bytes)?;
    trace!("encoding {codec} key");
    Ok(multicodec_encode(key_bytes, codec.header().as_bytes(), encoder))
}

fn check_length(codec: Codec, key_bytes: &[u8]) -> Result<()> {
    if codec.accepted_key_lengths().contains(&key_bytes.len()) {
        Ok(())
    } else {
        Err(CryptoError::KeyError(format!(
            "Invalid key length for codec {codec}: expected {:?}, got {}",
            codec.accepted_key_lengths(),
            key_bytes.len()
        )))
    }
}

fn unsupported(key_type: KeyType) -> CryptoError {
    CryptoError::UnsupportedKeyType(format!("{key_type} has no multikey encoding"))
}
