use std::fmt;

use super::pool::{BufferPool, PooledBuffer};

/// Read only owner of a pooled buffer holding secret or semi-secret bytes.
///
/// Not `Clone`: there is only ever one owner of the underlying storage.
/// Dropping it returns the (zeroized) buffer to the pool, after which the
/// bytes are gone.
pub struct SensitiveMemory {
    buffer: PooledBuffer,
}

impl SensitiveMemory {
    /// Takes ownership of an already filled buffer
    pub fn new(buffer: PooledBuffer) -> Self {
        Self { buffer }
    }

    /// Rents a buffer of exactly `bytes.len()` and copies `bytes` into it
    pub fn copy_from(pool: &BufferPool, bytes: &[u8]) -> Self {
        let mut buffer = pool.rent(bytes.len());
        buffer.as_mut_slice().copy_from_slice(bytes);
        Self { buffer }
    }

    pub fn as_slice(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl AsRef<[u8]> for SensitiveMemory {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for SensitiveMemory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SensitiveMemory(len={}, [REDACTED])", self.len())
    }
}
