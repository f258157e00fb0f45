//! Handle types and storage contracts for the colony containers.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the storage backends and the ordered
//! combinator: handle tokens, the stable-storage contract, the
//! logical-removal predicate, and configuration errors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod handle;
pub mod traits;

pub use error::ConfigError;
pub use handle::{Handle, StorageId};
pub use traits::{Removable, StableStorage};
