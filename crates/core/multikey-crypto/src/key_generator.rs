//! Key generation providers
//!
//! Generation itself is delegated to a provider implementing [`KeyGenerator`];
//! the provider writes the raw key bytes into buffers rented from the
//! caller's pool.

use crate::{
    KeyType,
    error::Result,
    memory::{BufferPool, KeyPairMemory, PrivateKeyMemory, PublicKeyMemory, SensitiveMemory},
};

/// Produces key pairs into pooled memory
pub trait KeyGenerator {
    /// 32 byte public key and 32 byte private seed
    fn generate_ed25519(&self, pool: &BufferPool) -> Result<KeyPairMemory>;

    /// 32 byte public key and 32 byte private scalar
    fn generate_x25519(&self, pool: &BufferPool) -> Result<KeyPairMemory>;
}

/// Copies raw key bytes into buffers sized exactly to each key
pub fn key_pair_from_bytes(
    pool: &BufferPool,
    key_type: KeyType,
    public_bytes: &[u8],
    private_bytes: &[u8],
) -> KeyPairMemory {
    KeyPairMemory {
        public_key: PublicKeyMemory::new(SensitiveMemory::copy_from(pool, public_bytes), key_type),
        private_key: PrivateKeyMemory::new(
            SensitiveMemory::copy_from(pool, private_bytes),
            key_type,
        ),
    }
}
