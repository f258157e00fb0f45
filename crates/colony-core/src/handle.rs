//! Element handles and storage identity.
//!
//! A [`Handle`] encodes the physical location of an element within a
//! stable storage together with the generation of the slot it was issued
//! for. The generation allows O(1) staleness checks without a lookup table;
//! the [`StorageId`] prevents a handle from resolving against a copy of the
//! storage it came from.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`StorageId`] allocation.
static STORAGE_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a storage.
///
/// Allocated from a monotonic atomic counter via [`StorageId::next`].
/// A deep copy of a storage receives a fresh ID, so handles issued by the
/// source never alias elements of the copy. Clearing a storage also moves
/// it to a fresh ID, which retires every handle issued before the clear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageId(u64);

impl StorageId {
    /// Allocate a fresh, unique storage ID.
    ///
    /// Each call returns a new ID that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(STORAGE_INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StorageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque, non-owning reference to one element of a stable storage.
///
/// Handles are `Copy` tokens: holding one keeps nothing alive. A handle is
/// valid from the insert that produced it until the element is erased, and
/// is unaffected by any other insertion or erasure in the same storage.
/// Once erased, the same handle value is never issued again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    storage: StorageId,
    bucket: u32,
    slot: u32,
    generation: u32,
}

impl Handle {
    /// Create a handle. Intended for storage implementations.
    pub fn new(storage: StorageId, bucket: u32, slot: u32, generation: u32) -> Self {
        Self {
            storage,
            bucket,
            slot,
            generation,
        }
    }

    /// The storage instance that issued this handle.
    pub fn storage(&self) -> StorageId {
        self.storage
    }

    /// Bucket index within the issuing storage.
    pub fn bucket(&self) -> u32 {
        self.bucket
    }

    /// Slot index within the bucket.
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// Slot generation at the time the handle was issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Handle(storage={}, bucket={}, slot={}, gen={})",
            self.storage, self.bucket, self.slot, self.generation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_accessors() {
        let id = StorageId::next();
        let h = Handle::new(id, 3, 17, 42);
        assert_eq!(h.storage(), id);
        assert_eq!(h.bucket(), 3);
        assert_eq!(h.slot(), 17);
        assert_eq!(h.generation(), 42);
    }

    #[test]
    fn storage_ids_are_unique() {
        let a = StorageId::next();
        let b = StorageId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn handles_differ_by_generation() {
        let id = StorageId::next();
        assert_ne!(Handle::new(id, 0, 0, 0), Handle::new(id, 0, 0, 1));
    }

    #[test]
    fn handles_differ_by_storage() {
        let h1 = Handle::new(StorageId::next(), 0, 0, 0);
        let h2 = Handle::new(StorageId::next(), 0, 0, 0);
        assert_ne!(h1, h2);
    }

    #[test]
    fn display_names_every_component() {
        let id = StorageId::next();
        let text = Handle::new(id, 1, 2, 3).to_string();
        assert!(text.contains(&format!("storage={id}")));
        assert!(text.contains("bucket=1"));
        assert!(text.contains("slot=2"));
        assert!(text.contains("gen=3"));
    }
}
