/*!
 * Buffer pool configuration options
 */

use crate::CryptoError;

const DEFAULT_MAX_RETAINED_PER_BUCKET: usize = 32;
const DEFAULT_MAX_POOLED_CAPACITY: usize = 64 * 1024;
const DEFAULT_MIN_CAPACITY: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferPoolConfig {
    pub max_retained_per_bucket: usize,
    pub max_pooled_capacity: usize,
    pub min_capacity: usize,
}

impl BufferPoolConfig {
    /// Returns a builder for `BufferPoolConfig`
    /// Example:
    /// ```
    /// use multikey_crypto::config::BufferPoolConfig;
    ///
    /// let config = BufferPoolConfig::builder().build().unwrap();
    /// assert_eq!(config.max_retained_per_bucket, 32);
    /// ```
    pub fn builder() -> BufferPoolConfigBuilder {
        BufferPoolConfigBuilder::default()
    }
}

impl Default for BufferPoolConfig {
    fn default() -> Self {
        BufferPoolConfig {
            max_retained_per_bucket: DEFAULT_MAX_RETAINED_PER_BUCKET,
            max_pooled_capacity: DEFAULT_MAX_POOLED_CAPACITY,
            min_capacity: DEFAULT_MIN_CAPACITY,
        }
    }
}

/// Builder for `BufferPoolConfig`.
/// Example:
/// ```
/// use multikey_crypto::config::BufferPoolConfig;
///
/// // Keep at most 4 buffers per size class, nothing above 4 KiB
/// let config = BufferPoolConfig::builder()
///     .with_max_retained_per_bucket(4)
///     .with_max_pooled_capacity(4096)
///     .build()
///     .unwrap();
/// ```
pub struct BufferPoolConfigBuilder {
    /// Released buffers kept for reuse per capacity class
    /// Default: 32
    max_retained_per_bucket: usize,

    /// Buffers with a larger capacity are freed instead of pooled
    /// Default: 64 KiB
    max_pooled_capacity: usize,

    /// Smallest capacity class, must be a power of two
    /// Default: 16
    min_capacity: usize,
}

impl Default for BufferPoolConfigBuilder {
    fn default() -> Self {
        BufferPoolConfigBuilder {
            max_retained_per_bucket: DEFAULT_MAX_RETAINED_PER_BUCKET,
            max_pooled_capacity: DEFAULT_MAX_POOLED_CAPACITY,
            min_capacity: DEFAULT_MIN_CAPACITY,
        }
    }
}

impl BufferPoolConfigBuilder {
    /// Default starting constructor for `BufferPoolConfigBuilder`
    pub fn new() -> BufferPoolConfigBuilder {
        BufferPoolConfigBuilder::default()
    }

    /// Build the `BufferPoolConfig` from the builder
    pub fn build(self) -> Result<BufferPoolConfig, CryptoError> {
        if self.min_capacity == 0 || !self.min_capacity.is_power_of_two() {
            return Err(CryptoError::Config(format!(
                "min_capacity ({}) must be a non-zero power of two",
                self.min_capacity
            )));
        }
        if self.max_pooled_capacity < self.min_capacity {
            return Err(CryptoError::Config(format!(
                "max_pooled_capacity ({}) must not be smaller than min_capacity ({})",
                self.max_pooled_capacity, self.min_capacity
            )));
        }

        Ok(BufferPoolConfig {
            max_retained_per_bucket: self.max_retained_per_bucket,
            max_pooled_capacity: self.max_pooled_capacity,
            min_capacity: self.min_capacity,
        })
    }

    /// How many released buffers of one capacity class are kept for reuse.
    /// Setting this to 0 disables pooling, every buffer is freed on release.
    pub fn with_max_retained_per_bucket(mut self, max_retained_per_bucket: usize) -> Self {
        self.max_retained_per_bucket = max_retained_per_bucket;
        self
    }

    /// Largest buffer capacity that is returned to the pool
    pub fn with_max_pooled_capacity(mut self, max_pooled_capacity: usize) -> Self {
        self.max_pooled_capacity = max_pooled_capacity;
        self
    }

    /// Smallest capacity handed out, must be a power of two
    pub fn with_min_capacity(mut self, min_capacity: usize) -> Self {
        self.min_capacity = min_capacity;
        self
    }
}
