//! Bucketed allocator with generation-checked handles.
//!
//! [`BucketStorage`] implements the [`StableStorage`] contract. Elements
//! live in fixed-capacity [`Bucket`]s; erasing an element vacates its slot
//! and pushes it onto a free list, and the next insert reuses the most
//! recently vacated slot before touching fresh capacity.

use std::fmt;

use colony_core::{ConfigError, Handle, StableStorage, StorageId};
use smallvec::SmallVec;

use crate::bucket::{Bucket, Vacated};
use crate::config::StorageConfig;
use crate::iter::{Handles, Iter, IterMut};

/// A vacated slot awaiting reuse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FreeSlot {
    bucket: u32,
    slot: u32,
}

/// Address-stable bucketed storage.
///
/// Insert is O(1) amortized, erase and lookup are O(1). Handles are
/// checked against the storage ID and the slot generation, so a stale or
/// foreign handle resolves to `None` rather than to another element.
///
/// Cloning produces an independent storage with a fresh [`StorageId`]
/// whose elements are packed densely in the source's natural order.
pub struct BucketStorage<T> {
    /// Identity stamped into every issued handle.
    id: StorageId,
    /// Buckets in natural order. Most storages stay within a handful.
    buckets: SmallVec<[Bucket<T>; 4]>,
    /// Vacated slots, reused most-recent first.
    free_list: Vec<FreeSlot>,
    /// Index of the first bucket that still has never-used slots.
    tail: usize,
    /// Number of live elements.
    len: usize,
    /// Slots whose generation counter ran out.
    retired: usize,
    config: StorageConfig,
}

impl<T> BucketStorage<T> {
    /// Create an empty storage with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(StorageConfig::default())
    }

    /// Create an empty storage with the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the configuration fails [`StorageConfig::validate`].
    pub fn with_config(config: StorageConfig) -> Self {
        match Self::try_with_config(config) {
            Ok(storage) => storage,
            Err(e) => panic!("invalid storage config: {e}"),
        }
    }

    /// Create an empty storage, rejecting an invalid configuration.
    pub fn try_with_config(config: StorageConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    /// Create an empty storage with room for at least `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut storage = Self::new();
        storage.reserve(capacity);
        storage
    }

    fn from_valid_config(config: StorageConfig) -> Self {
        Self {
            id: StorageId::next(),
            buckets: SmallVec::new(),
            free_list: Vec::new(),
            tail: 0,
            len: 0,
            retired: 0,
            config,
        }
    }

    /// The identity stamped into handles issued by this storage.
    pub fn id(&self) -> StorageId {
        self.id
    }

    /// The configuration this storage was built with.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Number of buckets currently allocated.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of vacated slots waiting for reuse.
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// `(handle, &element)` pairs in natural order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.id, &self.buckets, self.len)
    }

    /// `(handle, &mut element)` pairs in natural order.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.id, &mut self.buckets, self.len)
    }

    fn push_bucket(&mut self) {
        let previous = self.buckets.last().map(|b| b.capacity() as u32);
        let capacity = self.config.next_bucket_capacity(previous);
        tracing::trace!(
            storage = %self.id,
            bucket = self.buckets.len(),
            capacity,
            "allocating bucket"
        );
        self.buckets.push(Bucket::new(capacity));
    }

    fn bucket_for(&self, handle: Handle) -> Option<&Bucket<T>> {
        if handle.storage() != self.id {
            return None;
        }
        self.buckets.get(handle.bucket() as usize)
    }

    fn bucket_for_mut(&mut self, handle: Handle) -> Option<&mut Bucket<T>> {
        if handle.storage() != self.id {
            return None;
        }
        self.buckets.get_mut(handle.bucket() as usize)
    }

    fn check_free_list(&self) {
        debug_assert!(
            self.free_list.len() + self.len + self.retired
                <= self.buckets.iter().map(|b| b.capacity()).sum::<usize>(),
            "free list and live count exceed slot count"
        );
    }
}

impl<T> StableStorage<T> for BucketStorage<T> {
    type Handles<'a>
        = Handles<'a, T>
    where
        T: 'a;

    fn insert(&mut self, value: T) -> Handle {
        if let Some(free) = self.free_list.pop() {
            let generation = self.buckets[free.bucket as usize].refill(free.slot, value);
            self.len += 1;
            return Handle::new(self.id, free.bucket, free.slot, generation);
        }

        while self.tail < self.buckets.len() && self.buckets[self.tail].is_exhausted() {
            self.tail += 1;
        }
        if self.tail == self.buckets.len() {
            self.push_bucket();
        }

        let bucket = self.tail as u32;
        let slot = match self.buckets[self.tail].push(value) {
            Ok(slot) => slot,
            Err(_) => unreachable!("tail bucket has an unused slot"),
        };
        self.len += 1;
        Handle::new(self.id, bucket, slot, 0)
    }

    fn erase(&mut self, handle: Handle) -> Option<T> {
        let bucket = self.bucket_for_mut(handle)?;
        let (value, vacated) = bucket.take(handle.slot(), handle.generation())?;
        match vacated {
            Vacated::Reusable => self.free_list.push(FreeSlot {
                bucket: handle.bucket(),
                slot: handle.slot(),
            }),
            Vacated::Retired => self.retired += 1,
        }
        self.len -= 1;
        self.check_free_list();
        Some(value)
    }

    fn get(&self, handle: Handle) -> Option<&T> {
        self.bucket_for(handle)?
            .get(handle.slot(), handle.generation())
    }

    fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.bucket_for_mut(handle)?
            .get_mut(handle.slot(), handle.generation())
    }

    fn handles(&self) -> Handles<'_, T> {
        Handles::new(self.iter())
    }

    fn handle_at(&self, offset: usize) -> Option<Handle> {
        if offset >= self.len {
            return None;
        }
        let mut remaining = offset;
        for (index, bucket) in self.buckets.iter().enumerate() {
            if remaining < bucket.live() {
                let (slot, generation) = bucket.nth_occupied(remaining)?;
                return Some(Handle::new(self.id, index as u32, slot, generation));
            }
            remaining -= bucket.live();
        }
        None
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        let slots: usize = self.buckets.iter().map(|b| b.capacity()).sum();
        slots - self.retired
    }

    fn reserve(&mut self, additional: usize) {
        let needed = self.len.saturating_add(additional);
        while self.capacity() < needed {
            self.push_bucket();
        }
    }

    fn memory_bytes(&self) -> usize {
        let buckets: usize = self.buckets.iter().map(|b| b.memory_bytes()).sum();
        let spilled = if self.buckets.spilled() {
            self.buckets.capacity() * std::mem::size_of::<Bucket<T>>()
        } else {
            0
        };
        std::mem::size_of::<Self>()
            + buckets
            + spilled
            + self.free_list.capacity() * std::mem::size_of::<FreeSlot>()
    }

    fn clear(&mut self) {
        let previous = self.id;
        self.buckets.clear();
        self.free_list.clear();
        self.tail = 0;
        self.len = 0;
        self.retired = 0;
        self.id = StorageId::next();
        tracing::trace!(storage = %previous, next = %self.id, "storage cleared");
    }
}

impl<T> Default for BucketStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for BucketStorage<T> {
    fn clone(&self) -> Self {
        let mut copy = Self::from_valid_config(self.config.clone());
        copy.reserve(self.len);
        for (_, value) in self.iter() {
            copy.insert(value.clone());
        }
        copy
    }
}

impl<T: fmt::Debug> fmt::Debug for BucketStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketStorage")
            .field("id", &self.id)
            .field("len", &self.len)
            .field("buckets", &self.buckets.len())
            .field("elements", &DebugElements(self))
            .finish()
    }
}

struct DebugElements<'a, T>(&'a BucketStorage<T>);

impl<T: fmt::Debug> fmt::Debug for DebugElements<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter().map(|(_, v)| v)).finish()
    }
}
