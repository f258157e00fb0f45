//! Bucketed, address-stable element storage with generational handles.
//!
//! [`BucketStorage`] is the allocator behind the colony containers. It
//! hands out [`Handle`](colony_core::Handle)s that stay valid until their
//! element is erased, and never moves an element once it is stored.
//!
//! # Architecture
//!
//! ```text
//! BucketStorage (allocator)
//! ├── StorageId (fresh per instance, per copy, per clear)
//! ├── Bucket[] (fixed-capacity Vec<Slot<T>>, never reallocated)
//! │   └── Slot { generation, value: Option<T> }
//! └── free list (vacated (bucket, slot) pairs, reused LIFO)
//! ```
//!
//! Bucket capacities start at [`StorageConfig::min_bucket_capacity`] and
//! double up to [`StorageConfig::max_bucket_capacity`]. Natural order is
//! bucket order, then slot order; recycled slots keep their position, so
//! natural order is not insertion order once anything has been erased.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod bucket;
pub mod config;
pub mod iter;
pub mod storage;

// Public re-exports for the primary API surface.
pub use config::StorageConfig;
pub use iter::{Handles, Iter, IterMut};
pub use storage::BucketStorage;
