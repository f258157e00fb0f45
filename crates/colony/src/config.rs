//! Colony configuration.

use colony_core::ConfigError;
use colony_storage::StorageConfig;

/// Builder input for a [`PointerColony`](crate::PointerColony) backed by
/// [`BucketStorage`](colony_storage::BucketStorage).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColonyConfig {
    /// Bucket sizing for the element storage.
    pub storage: StorageConfig,
    /// Handles to pre-allocate in the order index. Default: 0.
    pub order_capacity: usize,
}

impl ColonyConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.storage.validate()
    }
}
