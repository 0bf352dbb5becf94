//! Typed key and signature memory, plus identified keys carrying their
//! sign or verify capability

use std::{fmt, sync::Arc};

use super::{pool::BufferPool, sensitive::SensitiveMemory};
use crate::{KeyType, error::Result};

/// Signs `data` with the private key bytes, writing the signature into a
/// buffer rented from the pool
pub type SigningFunction =
    Arc<dyn Fn(&[u8], &[u8], &BufferPool) -> Result<Signature> + Send + Sync>;

/// Checks `signature` over `data` against the public key bytes
pub type VerificationFunction = Arc<dyn Fn(&[u8], &[u8], &[u8]) -> Result<bool> + Send + Sync>;

/// Public key bytes in their wire form
pub struct PublicKeyMemory {
    memory: SensitiveMemory,
    key_type: KeyType,
}

impl PublicKeyMemory {
    pub fn new(memory: SensitiveMemory, key_type: KeyType) -> Self {
        Self { memory, key_type }
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn as_slice(&self) -> &[u8] {
        self.memory.as_slice()
    }

    pub fn verify(
        &self,
        data: &[u8],
        signature: &Signature,
        verifier: &VerificationFunction,
    ) -> Result<bool> {
        verifier(self.as_slice(), data, signature.as_slice())
    }
}

impl AsRef<[u8]> for PublicKeyMemory {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for PublicKeyMemory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PublicKeyMemory")
            .field("key_type", &self.key_type)
            .field("len", &self.memory.len())
            .finish()
    }
}

/// Private key bytes
pub struct PrivateKeyMemory {
    memory: SensitiveMemory,
    key_type: KeyType,
}

impl PrivateKeyMemory {
    pub fn new(memory: SensitiveMemory, key_type: KeyType) -> Self {
        Self { memory, key_type }
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn as_slice(&self) -> &[u8] {
        self.memory.as_slice()
    }

    pub fn sign(
        &self,
        data: &[u8],
        signer: &SigningFunction,
        pool: &BufferPool,
    ) -> Result<Signature> {
        signer(self.as_slice(), data, pool)
    }
}

impl AsRef<[u8]> for PrivateKeyMemory {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for PrivateKeyMemory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "PrivateKeyMemory({}, len={}, [REDACTED])",
            self.key_type,
            self.memory.len()
        )
    }
}

/// Signature bytes ready for transport
pub struct Signature {
    memory: SensitiveMemory,
}

impl Signature {
    pub fn new(memory: SensitiveMemory) -> Self {
        Self { memory }
    }

    pub fn as_slice(&self) -> &[u8] {
        self.memory.as_slice()
    }

    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Signature(len={})", self.len())
    }
}

/// Freshly generated key pair
#[derive(Debug)]
pub struct KeyPairMemory {
    pub public_key: PublicKeyMemory,
    pub private_key: PrivateKeyMemory,
}

/// Public key with an identifier and the capability to verify with it
pub struct PublicKey {
    pub id: String,
    memory: PublicKeyMemory,
    verifier: VerificationFunction,
}

impl PublicKey {
    pub fn new(
        memory: PublicKeyMemory,
        id: impl Into<String>,
        verifier: VerificationFunction,
    ) -> Self {
        Self {
            id: id.into(),
            memory,
            verifier,
        }
    }

    pub fn memory(&self) -> &PublicKeyMemory {
        &self.memory
    }

    pub fn verify(&self, data: &[u8], signature: &Signature) -> Result<bool> {
        self.memory.verify(data, signature, &self.verifier)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("id", &self.id)
            .field("memory", &self.memory)
            .finish_non_exhaustive()
    }
}

/// Private key with an identifier and the capability to sign with it
pub struct PrivateKey {
    pub id: String,
    memory: PrivateKeyMemory,
    signer: SigningFunction,
}

impl PrivateKey {
    pub fn new(memory: PrivateKeyMemory, id: impl Into<String>, signer: SigningFunction) -> Self {
        Self {
            id: id.into(),
            memory,
            signer,
        }
    }

    pub fn memory(&self) -> &PrivateKeyMemory {
        &self.memory
    }

    pub fn sign(&self, data: &[u8], pool: &BufferPool) -> Result<Signature> {
        self.memory.sign(data, &self.signer, pool)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("id", &self.id)
            .field("memory", &self.memory)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CryptoError;

    // XOR "signature" so the plumbing can be tested without a real algorithm
    fn xor_signer() -> SigningFunction {
        Arc::new(|key: &[u8], data: &[u8], pool: &BufferPool| -> Result<Signature> {
            let mut buffer = pool.rent(data.len());
            for (i, (out, byte)) in buffer.as_mut_slice().iter_mut().zip(data).enumerate() {
                *out = byte ^ key[i % key.len()];
            }
            Ok(Signature::new(SensitiveMemory::new(buffer)))
        })
    }

    fn xor_verifier() -> VerificationFunction {
        Arc::new(|key: &[u8], data: &[u8], signature: &[u8]| -> Result<bool> {
            if signature.len() != data.len() {
                return Err(CryptoError::Signature("length mismatch".into()));
            }
            Ok(data
                .iter()
                .zip(signature)
                .enumerate()
                .all(|(i, (byte, sig))| byte ^ key[i % key.len()] == *sig))
        })
    }

    fn keys(pool: &BufferPool) -> (PublicKeyMemory, PrivateKeyMemory) {
        (
            PublicKeyMemory::new(SensitiveMemory::copy_from(pool, &[5u8; 8]), KeyType::Unknown),
            PrivateKeyMemory::new(SensitiveMemory::copy_from(pool, &[5u8; 8]), KeyType::Unknown),
        )
    }

    #[test]
    fn sign_and_verify_with_capabilities() {
        let pool = BufferPool::default();
        let (public, private) = keys(&pool);

        let signature = private.sign(b"payload", &xor_signer(), &pool).unwrap();
        assert_eq!(signature.len(), 7);
        assert!(public.verify(b"payload", &signature, &xor_verifier()).unwrap());
        assert!(!public.verify(b"pay1oad", &signature, &xor_verifier()).unwrap());
        assert!(public.verify(b"short", &signature, &xor_verifier()).is_err());
    }

    #[test]
    fn identified_keys() {
        let pool = BufferPool::default();
        let (public, private) = keys(&pool);
        let public = PublicKey::new(public, "key-1", xor_verifier());
        let private = PrivateKey::new(private, "key-1", xor_signer());

        let signature = private.sign(b"data", &pool).unwrap();
        assert!(public.verify(b"data", &signature).unwrap());
        assert_eq!(public.id, private.id);
    }

    #[test]
    fn private_debug_is_redacted() {
        let pool = BufferPool::default();
        let (_, private) = keys(&pool);
        let debug = format!("{private:?}");
        assert_eq!(debug, "PrivateKeyMemory(Unknown, len=8, [REDACTED])");
    }
}
