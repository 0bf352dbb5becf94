//! Thread safe pool of reusable byte buffers

use std::{
    fmt,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use tracing::debug;
use zeroize::Zeroize;

use crate::config::BufferPoolConfig;

struct PoolInner {
    config: BufferPoolConfig,
    /// One free list per power of two capacity, starting at `min_capacity`
    buckets: Vec<Mutex<Vec<Box<[u8]>>>>,
}

/// Shared pool of byte buffers.
///
/// Cloning is cheap and every clone refers to the same pool.
#[derive(Clone)]
pub struct BufferPool {
    inner: Arc<PoolInner>,
}

impl BufferPool {
    pub fn new(config: BufferPoolConfig) -> Self {
        let classes = config
            .max_pooled_capacity
            .checked_div(config.min_capacity)
            .and_then(usize::checked_ilog2)
            .map_or(0, |log| log as usize + 1);
        let buckets = (0..classes).map(|_| Mutex::new(Vec::new())).collect();
        debug!(
            "buffer pool created: {classes} size classes from {} bytes, max {} retained each",
            config.min_capacity, config.max_retained_per_bucket
        );

        Self {
            inner: Arc::new(PoolInner { config, buckets }),
        }
    }

    /// Process wide pool with the default configuration
    pub fn shared() -> &'static BufferPool {
        static SHARED: OnceLock<BufferPool> = OnceLock::new();
        SHARED.get_or_init(|| BufferPool::new(BufferPoolConfig::default()))
    }

    pub fn config(&self) -> &BufferPoolConfig {
        &self.inner.config
    }

    /// Rents a zero filled buffer whose visible length is exactly `len`
    pub fn rent(&self, len: usize) -> PooledBuffer {
        let capacity = self.capacity_for(len);
        let reused = self
            .bucket(capacity)
            .and_then(|bucket| bucket.lock().unwrap_or_else(PoisonError::into_inner).pop());

        let storage = match reused {
            Some(storage) => {
                debug!("reusing pooled buffer: len={len} capacity={capacity}");
                storage
            }
            None => {
                debug!("allocating buffer: len={len} capacity={capacity}");
                vec![0u8; capacity].into_boxed_slice()
            }
        };

        PooledBuffer {
            storage,
            len,
            pool: self.clone(),
        }
    }

    /// Number of idle buffers currently held for reuse
    pub fn retained(&self) -> usize {
        self.inner
            .buckets
            .iter()
            .map(|bucket| bucket.lock().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    /// Pooled sizes round up to a power of two, larger ones are exact
    fn capacity_for(&self, len: usize) -> usize {
        let config = &self.inner.config;
        let rounded = len.max(config.min_capacity).next_power_of_two();
        if rounded <= config.max_pooled_capacity {
            rounded
        } else {
            len
        }
    }

    fn bucket(&self, capacity: usize) -> Option<&Mutex<Vec<Box<[u8]>>>> {
        let config = &self.inner.config;
        if capacity < config.min_capacity
            || capacity > config.max_pooled_capacity
            || !capacity.is_power_of_two()
        {
            return None;
        }
        let index = capacity.checked_div(config.min_capacity)?.trailing_zeros() as usize;
        self.inner.buckets.get(index)
    }

    /// Takes back storage that has already been zeroized
    fn release(&self, storage: Box<[u8]>) {
        let capacity = storage.len();
        let Some(bucket) = self.bucket(capacity) else {
            debug!("freeing unpooled buffer: capacity={capacity}");
            return;
        };

        let mut free = bucket.lock().unwrap_or_else(PoisonError::into_inner);
        if free.len() < self.inner.config.max_retained_per_bucket {
            free.push(storage);
        } else {
            debug!("pool bucket full, freeing buffer: capacity={capacity}");
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        BufferPool::new(BufferPoolConfig::default())
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("config", &self.inner.config)
            .field("retained", &self.retained())
            .finish()
    }
}

/// Exclusively owned buffer rented from a [`BufferPool`].
///
/// Only the first `len` bytes are reachable. On drop the whole capacity is
/// zeroized and the storage returns to its pool.
pub struct PooledBuffer {
    storage: Box<[u8]>,
    len: usize,
    pool: BufferPool,
}

impl PooledBuffer {
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.storage[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        let mut storage = std::mem::take(&mut self.storage);
        storage.zeroize();
        self.pool.release(storage);
    }
}

impl fmt::Debug for PooledBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PooledBuffer(len={}, [REDACTED])", self.len)
    }
}
