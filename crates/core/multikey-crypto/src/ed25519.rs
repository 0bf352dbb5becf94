//! Ed25519 and X25519 key operations backed by the dalek crates

use std::sync::Arc;

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha512};
use tracing::debug;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::{Zeroize, Zeroizing};

use crate::{
    CryptoError, KeyType,
    error::Result,
    key_generator::{KeyGenerator, key_pair_from_bytes},
    memory::{
        BufferPool, KeyPairMemory, PublicKeyMemory, SensitiveMemory, Signature, SigningFunction,
        VerificationFunction,
    },
};

/// [`KeyGenerator`] using `ed25519-dalek` and `x25519-dalek` with the OS RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct DalekKeyGenerator;

impl DalekKeyGenerator {
    /// Deterministic Ed25519 key pair from a 32 byte seed
    pub fn ed25519_from_seed(&self, seed: &[u8; 32], pool: &BufferPool) -> KeyPairMemory {
        ed25519_pair(&SigningKey::from_bytes(seed), pool)
    }

    /// Deterministic X25519 key pair from a 32 byte secret
    pub fn x25519_from_seed(&self, seed: &[u8; 32], pool: &BufferPool) -> KeyPairMemory {
        x25519_pair(&StaticSecret::from(*seed), pool)
    }
}

impl KeyGenerator for DalekKeyGenerator {
    fn generate_ed25519(&self, pool: &BufferPool) -> Result<KeyPairMemory> {
        debug!("generating Ed25519 key pair");
        Ok(ed25519_pair(&SigningKey::generate(&mut OsRng), pool))
    }

    fn generate_x25519(&self, pool: &BufferPool) -> Result<KeyPairMemory> {
        debug!("generating X25519 key pair");
        Ok(x25519_pair(&StaticSecret::random_from_rng(OsRng), pool))
    }
}

fn ed25519_pair(signing_key: &SigningKey, pool: &BufferPool) -> KeyPairMemory {
    let private_bytes = Zeroizing::new(signing_key.to_bytes());
    let public_bytes = signing_key.verifying_key().to_bytes();
    key_pair_from_bytes(pool, KeyType::Ed25519, &public_bytes, &private_bytes[..])
}

fn x25519_pair(secret: &StaticSecret, pool: &BufferPool) -> KeyPairMemory {
    let private_bytes = Zeroizing::new(secret.to_bytes());
    let public_bytes = X25519PublicKey::from(secret).to_bytes();
    key_pair_from_bytes(pool, KeyType::X25519, &public_bytes, &private_bytes[..])
}

fn key_array<'a>(bytes: &'a [u8], what: &str) -> Result<&'a [u8; 32]> {
    bytes
        .try_into()
        .map_err(|_| CryptoError::KeyError(format!("{what} must be 32 bytes, got {}", bytes.len())))
}

fn verifying_key(public_key: &[u8]) -> Result<VerifyingKey> {
    VerifyingKey::from_bytes(key_array(public_key, "Ed25519 public key")?)
        .map_err(|e| CryptoError::KeyError(format!("Couldn't create ED25519 VerifyingKey: {e}")))
}

/// Ed25519 signing capability. Signatures are 64 bytes.
pub fn ed25519_signer() -> SigningFunction {
    Arc::new(
        |private_key: &[u8], data: &[u8], pool: &BufferPool| -> Result<Signature> {
            let seed = key_array(private_key, "Ed25519 private key")?;
            let signing_key = SigningKey::from_bytes(seed);
            let signature = signing_key.sign(data).to_bytes();
            Ok(Signature::new(SensitiveMemory::copy_from(pool, &signature)))
        },
    )
}

/// Ed25519 verification capability
pub fn ed25519_verifier() -> VerificationFunction {
    Arc::new(
        |public_key: &[u8], data: &[u8], signature: &[u8]| -> Result<bool> {
            let verifying_key = verifying_key(public_key)?;
            let signature = DalekSignature::from_slice(signature)
                .map_err(|e| CryptoError::Signature(format!("Invalid Ed25519 signature: {e}")))?;
            Ok(verifying_key.verify(data, &signature).is_ok())
        },
    )
}

/// Converts an Ed25519 private key to an X25519 private key
pub fn ed25519_private_to_x25519(secret: &[u8; 32]) -> Zeroizing<[u8; 32]> {
    let mut h = Sha512::digest(secret);

    h[0] &= 248;
    h[31] &= 127;
    h[31] |= 64;

    let mut result = Zeroizing::new([0u8; 32]);
    result.copy_from_slice(&h[..32]);
    h[..].zeroize();
    result
}

/// Converts an Ed25519 public key to the X25519 public key of the same secret
pub fn ed25519_public_to_x25519(
    public_key: &PublicKeyMemory,
    pool: &BufferPool,
) -> Result<PublicKeyMemory> {
    if public_key.key_type() != KeyType::Ed25519 {
        return Err(CryptoError::UnsupportedKeyType(format!(
            "Expected an Ed25519 public key, got {}",
            public_key.key_type()
        )));
    }

    let x25519 = verifying_key(public_key.as_slice())?.to_montgomery().to_bytes();

    Ok(PublicKeyMemory::new(
        SensitiveMemory::copy_from(pool, &x25519),
        KeyType::X25519,
    ))
}

#[cfg(test)]
mod tests {
    use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};

    use super::*;

    const ED25519_SK: [u8; 32] = [
        202, 104, 239, 81, 53, 110, 80, 252, 198, 23, 155, 162, 215, 98, 223, 173, 227, 188, 110,
        54, 127, 45, 185, 206, 174, 29, 44, 147, 76, 66, 196, 195,
    ];
    const CURVE25519_SK: [u8; 32] = [
        200, 255, 64, 61, 17, 52, 112, 33, 205, 71, 186, 13, 131, 12, 241, 136, 223, 5, 152, 40,
        95, 187, 83, 168, 142, 10, 234, 215, 70, 210, 148, 104,
    ];

    fn seed(b64: &str) -> [u8; 32] {
        BASE64_URL_SAFE_NO_PAD
            .decode(b64)
            .unwrap()
            .try_into()
            .unwrap()
    }

    #[test]
    fn ed25519_to_x25519_conversion() {
        assert_eq!(*ed25519_private_to_x25519(&ED25519_SK), CURVE25519_SK);
    }

    #[test]
    fn ed25519_from_seed() {
        let pool = BufferPool::default();
        let seed = seed("X20biMbNG8QUQDnBv4RrZzkS3Civfc2zWHcDkeUeS9g");
        let pair = DalekKeyGenerator.ed25519_from_seed(&seed, &pool);

        assert_eq!(pair.private_key.as_slice(), &seed);
        assert_eq!(
            pair.public_key.as_slice(),
            BASE64_URL_SAFE_NO_PAD
                .decode("yb2ttOBWPH2qO-oTrFGs8mgw3cu0nCfjnPt-q9dag7E")
                .unwrap()
        );
    }

    #[test]
    fn x25519_from_seed() {
        let pool = BufferPool::default();
        let seed = seed("_wYeKm00KWi8H861TsQLVkbAwWOVe0-T9n5Pa80VwTs");
        let pair = DalekKeyGenerator.x25519_from_seed(&seed, &pool);

        assert_eq!(pair.public_key.key_type(), KeyType::X25519);
        assert_eq!(
            pair.public_key.as_slice(),
            BASE64_URL_SAFE_NO_PAD
                .decode("ozI6dU2afJs4eyCXxs1FB-rNbn5UgPSHKHRNLRUlLnU")
                .unwrap()
        );
    }

    #[test]
    fn generated_pairs_have_key_sizes() {
        let pool = BufferPool::default();
        let generator = DalekKeyGenerator;

        for pair in [
            generator.generate_ed25519(&pool).unwrap(),
            generator.generate_x25519(&pool).unwrap(),
        ] {
            assert_eq!(pair.public_key.as_slice().len(), 32);
            assert_eq!(pair.private_key.as_slice().len(), 32);
        }
    }

    #[test]
    fn sign_and_verify() {
        let pool = BufferPool::default();
        let pair = DalekKeyGenerator.generate_ed25519(&pool).unwrap();
        let data = b"did:key signing test";

        let signature = pair
            .private_key
            .sign(data, &ed25519_signer(), &pool)
            .unwrap();
        assert_eq!(signature.len(), 64);
        assert!(
            pair.public_key
                .verify(data, &signature, &ed25519_verifier())
                .unwrap()
        );
        assert!(
            !pair
                .public_key
                .verify(b"tampered", &signature, &ed25519_verifier())
                .unwrap()
        );
    }

    #[test]
    fn signer_rejects_wrong_key_length() {
        let pool = BufferPool::default();
        let result = ed25519_signer()(&[0u8; 31], b"data", &pool);
        assert!(matches!(result, Err(CryptoError::KeyError(_))));
    }

    #[test]
    fn public_conversion_matches_private_conversion() {
        let pool = BufferPool::default();
        let generator = DalekKeyGenerator;
        let pair = generator.generate_ed25519(&pool).unwrap();

        let private: &[u8; 32] = pair.private_key.as_slice().try_into().unwrap();
        let x_secret = StaticSecret::from(*ed25519_private_to_x25519(private));
        let expected = X25519PublicKey::from(&x_secret).to_bytes();

        let converted = ed25519_public_to_x25519(&pair.public_key, &pool).unwrap();
        assert_eq!(converted.key_type(), KeyType::X25519);
        assert_eq!(converted.as_slice(), &expected);
    }
}
