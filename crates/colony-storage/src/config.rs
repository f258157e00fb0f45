//! Storage configuration parameters.

use colony_core::ConfigError;

/// Configuration for [`BucketStorage`](crate::BucketStorage).
///
/// Controls bucket sizing. Validated at construction; all values are
/// immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    /// Slot count of the first bucket.
    ///
    /// Default: 8. Must be at least 1.
    pub min_bucket_capacity: u32,

    /// Upper bound on the slot count of any bucket.
    ///
    /// Each new bucket doubles the previous one until it reaches this cap.
    /// Default: 8192. Must be at least `min_bucket_capacity` and at most
    /// [`StorageConfig::MAX_BUCKET_CAPACITY_LIMIT`].
    pub max_bucket_capacity: u32,
}

impl StorageConfig {
    /// Default first-bucket capacity.
    pub const DEFAULT_MIN_BUCKET_CAPACITY: u32 = 8;

    /// Default bucket capacity cap.
    pub const DEFAULT_MAX_BUCKET_CAPACITY: u32 = 8192;

    /// Largest bucket capacity accepted by [`validate`](Self::validate).
    pub const MAX_BUCKET_CAPACITY_LIMIT: u32 = 1 << 24;

    /// Create a config with explicit bucket bounds.
    pub fn new(min_bucket_capacity: u32, max_bucket_capacity: u32) -> Self {
        Self {
            min_bucket_capacity,
            max_bucket_capacity,
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_bucket_capacity == 0 {
            return Err(ConfigError::ZeroBucketCapacity);
        }
        if self.min_bucket_capacity > self.max_bucket_capacity {
            return Err(ConfigError::BucketRangeInverted {
                min: self.min_bucket_capacity,
                max: self.max_bucket_capacity,
            });
        }
        if self.max_bucket_capacity > Self::MAX_BUCKET_CAPACITY_LIMIT {
            return Err(ConfigError::BucketTooLarge {
                requested: self.max_bucket_capacity,
                limit: Self::MAX_BUCKET_CAPACITY_LIMIT,
            });
        }
        Ok(())
    }

    /// Capacity of the bucket that follows one of `previous` slots.
    ///
    /// `None` means no bucket exists yet.
    pub fn next_bucket_capacity(&self, previous: Option<u32>) -> u32 {
        match previous {
            None => self.min_bucket_capacity,
            Some(prev) => prev.saturating_mul(2).min(self.max_bucket_capacity),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_MIN_BUCKET_CAPACITY,
            Self::DEFAULT_MAX_BUCKET_CAPACITY,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(StorageConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_capacity_rejected() {
        let config = StorageConfig::new(0, 16);
        assert_eq!(config.validate(), Err(ConfigError::ZeroBucketCapacity));
    }

    #[test]
    fn inverted_range_rejected() {
        let config = StorageConfig::new(64, 8);
        assert_eq!(
            config.validate(),
            Err(ConfigError::BucketRangeInverted { min: 64, max: 8 })
        );
    }

    #[test]
    fn oversized_bucket_rejected() {
        let config = StorageConfig::new(8, StorageConfig::MAX_BUCKET_CAPACITY_LIMIT + 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BucketTooLarge { .. })
        ));
    }

    #[test]
    fn bucket_capacity_doubles_until_cap() {
        let config = StorageConfig::new(4, 16);
        assert_eq!(config.next_bucket_capacity(None), 4);
        assert_eq!(config.next_bucket_capacity(Some(4)), 8);
        assert_eq!(config.next_bucket_capacity(Some(8)), 16);
        assert_eq!(config.next_bucket_capacity(Some(16)), 16);
    }
}
