//! Ordered container with stable element handles.
//!
//! [`PointerColony`] combines two members:
//!
//! ```text
//! PointerColony<T, S>
//! ├── S: StableStorage<T> (owns elements, O(1) erase, stable handles)
//! │   └── BucketStorage<T> by default
//! └── OrderIndex (VecDeque<Handle>, defines iteration and positions)
//! ```
//!
//! Every operation that adds or erases an element updates both members.
//! Iteration walks the order index and resolves each handle in the
//! storage, so the visiting order is exactly the order of insertion
//! positions, no matter how the storage recycles slots.
//!
//! # Copying
//!
//! Cloning copies the storage (which issues fresh handles) and rebuilds
//! the order index by matching each entry's offset in the source's
//! natural order, in one pass over each storage for any history. See the
//! `Clone` impl of [`PointerColony`].
//!
//! # Removal by mark
//!
//! For element types implementing [`Removable`],
//! [`remove_if`](PointerColony::remove_if) drops marked entries from the
//! order in one pass but leaves the elements allocated in the storage.
//! Marked elements remain reachable by handle and count toward
//! [`storage_len`](PointerColony::storage_len) until
//! [`reclaim_detached`](PointerColony::reclaim_detached), `clear` or drop.
//! [`purge_removed`](PointerColony::purge_removed) erases them outright.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod colony;
pub mod config;
pub mod cursor;
pub mod iter;
pub mod order;
mod reconstruct;

// Public re-exports for the primary API surface.
pub use colony::PointerColony;
pub use config::ColonyConfig;
pub use cursor::CursorMut;
pub use iter::{IntoIter, Iter};
pub use order::OrderIndex;

pub use colony_core::{ConfigError, Handle, Removable, StableStorage, StorageId};
pub use colony_storage::{BucketStorage, StorageConfig};
