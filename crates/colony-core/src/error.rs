//! Configuration error types.
//!
//! Container operations have no recoverable error taxonomy: stale handles
//! surface as `None` and out-of-range positions panic. The only fallible
//! step is validating a configuration before a container is built.

use std::error::Error;
use std::fmt;

/// Errors detected while validating a storage or colony configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The first bucket would hold no slots.
    ZeroBucketCapacity,
    /// Minimum bucket capacity is larger than the maximum.
    BucketRangeInverted {
        /// Configured minimum capacity.
        min: u32,
        /// Configured maximum capacity.
        max: u32,
    },
    /// Maximum bucket capacity is above the supported limit.
    BucketTooLarge {
        /// Configured maximum capacity.
        requested: u32,
        /// Largest supported bucket capacity.
        limit: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBucketCapacity => write!(f, "bucket capacity must be at least 1"),
            Self::BucketRangeInverted { min, max } => {
                write!(
                    f,
                    "minimum bucket capacity {min} exceeds maximum bucket capacity {max}"
                )
            }
            Self::BucketTooLarge { requested, limit } => {
                write!(
                    f,
                    "bucket capacity {requested} exceeds the supported limit of {limit}"
                )
            }
        }
    }
}

impl Error for ConfigError {}
