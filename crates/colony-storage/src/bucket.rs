//! Fixed-capacity element buckets.
//!
//! A [`Bucket`] is a `Vec<Slot<T>>` allocated to its full capacity up front.
//! Slots are appended until the bucket is full and are never moved
//! afterwards, which is what keeps elements address-stable. Vacated slots
//! stay in place with a bumped generation until the storage reuses them.

/// One element slot.
///
/// `generation` counts how many times the slot has been vacated, so a
/// handle issued for an earlier occupant no longer matches.
#[derive(Clone, Debug)]
pub struct Slot<T> {
    pub(crate) generation: u32,
    pub(crate) value: Option<T>,
}

impl<T> Slot<T> {
    /// Current generation of the slot.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The element stored in this slot, if any.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

/// Outcome of vacating a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vacated {
    /// The slot can hold another element.
    Reusable,
    /// The generation counter is exhausted; the slot is never handed out again.
    Retired,
}

/// A single fixed-capacity bucket of slots.
pub struct Bucket<T> {
    /// Backing storage. Allocated to full capacity at creation.
    pub(crate) slots: Vec<Slot<T>>,
    /// Slot count fixed at creation.
    capacity: u32,
    /// Number of occupied slots.
    live: u32,
}

impl<T> Bucket<T> {
    /// Create an empty bucket that can hold `capacity` elements.
    pub fn new(capacity: u32) -> Self {
        Self {
            slots: Vec::with_capacity(capacity as usize),
            capacity,
            live: 0,
        }
    }

    /// Append `value` in the next never-used slot.
    ///
    /// Returns the slot index, or gives the value back if every slot has
    /// already been handed out once.
    pub fn push(&mut self, value: T) -> Result<u32, T> {
        if self.is_exhausted() {
            return Err(value);
        }
        let slot = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        self.live += 1;
        Ok(slot)
    }

    /// Put `value` into a previously vacated slot.
    ///
    /// Returns the slot's generation.
    ///
    /// # Panics
    ///
    /// Panics if the slot was never handed out or is occupied.
    pub fn refill(&mut self, slot: u32, value: T) -> u32 {
        let entry = &mut self.slots[slot as usize];
        assert!(entry.value.is_none(), "refill of occupied slot {slot}");
        entry.value = Some(value);
        self.live += 1;
        entry.generation
    }

    /// Remove the element in `slot` if `generation` still matches.
    pub fn take(&mut self, slot: u32, generation: u32) -> Option<(T, Vacated)> {
        let entry = self.slots.get_mut(slot as usize)?;
        if entry.generation != generation {
            return None;
        }
        let value = entry.value.take()?;
        self.live -= 1;
        let vacated = match entry.generation.checked_add(1) {
            Some(next) => {
                entry.generation = next;
                Vacated::Reusable
            }
            None => Vacated::Retired,
        };
        Some((value, vacated))
    }

    /// Shared access to `slot` if `generation` still matches.
    pub fn get(&self, slot: u32, generation: u32) -> Option<&T> {
        let entry = self.slots.get(slot as usize)?;
        if entry.generation != generation {
            return None;
        }
        entry.value.as_ref()
    }

    /// Mutable access to `slot` if `generation` still matches.
    pub fn get_mut(&mut self, slot: u32, generation: u32) -> Option<&mut T> {
        let entry = self.slots.get_mut(slot as usize)?;
        if entry.generation != generation {
            return None;
        }
        entry.value.as_mut()
    }

    /// Slot index and generation of the `n`-th occupied slot.
    ///
    /// O(1) while the bucket has no holes, O(capacity) otherwise.
    pub fn nth_occupied(&self, n: usize) -> Option<(u32, u32)> {
        if n >= self.live as usize {
            return None;
        }
        if self.live as usize == self.slots.len() {
            let entry = &self.slots[n];
            return Some((n as u32, entry.generation));
        }
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.value.is_some())
            .nth(n)
            .map(|(i, s)| (i as u32, s.generation))
    }

    /// Whether every slot has been handed out at least once.
    pub fn is_exhausted(&self) -> bool {
        self.slots.len() >= self.capacity as usize
    }

    /// Number of occupied slots.
    pub fn live(&self) -> usize {
        self.live as usize
    }

    /// Slot count fixed at creation.
    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    /// Memory usage of the backing slot array in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.slots.capacity() * std::mem::size_of::<Slot<T>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_fills_slots_in_order() {
        let mut bucket = Bucket::new(4);
        assert_eq!(bucket.push('a'), Ok(0));
        assert_eq!(bucket.push('b'), Ok(1));
        assert_eq!(bucket.live(), 2);
        assert_eq!(bucket.get(1, 0), Some(&'b'));
    }

    #[test]
    fn push_fails_when_exhausted() {
        let mut bucket = Bucket::new(1);
        assert!(bucket.push(1).is_ok());
        assert_eq!(bucket.push(2), Err(2));
    }

    #[test]
    fn take_bumps_generation() {
        let mut bucket = Bucket::new(2);
        let slot = bucket.push(10).unwrap();
        assert_eq!(bucket.take(slot, 0), Some((10, Vacated::Reusable)));
        assert_eq!(bucket.slots[0].generation(), 1);
        assert!(bucket.get(slot, 0).is_none());
        assert_eq!(bucket.live(), 0);
    }

    #[test]
    fn take_with_stale_generation_is_rejected() {
        let mut bucket = Bucket::new(2);
        let slot = bucket.push(10).unwrap();
        assert!(bucket.take(slot, 7).is_none());
        assert_eq!(bucket.get(slot, 0), Some(&10));
    }

    #[test]
    fn refill_reuses_slot_with_new_generation() {
        let mut bucket = Bucket::new(2);
        let slot = bucket.push(1).unwrap();
        bucket.take(slot, 0).unwrap();
        let generation = bucket.refill(slot, 2);
        assert_eq!(generation, 1);
        assert_eq!(bucket.get(slot, 1), Some(&2));
        assert!(bucket.get(slot, 0).is_none());
    }

    #[test]
    fn exhausted_generation_retires_slot() {
        let mut bucket = Bucket::new(1);
        let slot = bucket.push(5).unwrap();
        bucket.slots[0].generation = u32::MAX;
        assert_eq!(bucket.take(slot, u32::MAX), Some((5, Vacated::Retired)));
    }

    #[test]
    fn nth_occupied_skips_holes() {
        let mut bucket = Bucket::new(4);
        for v in 0..4 {
            bucket.push(v).unwrap();
        }
        bucket.take(1, 0).unwrap();
        assert_eq!(bucket.nth_occupied(0), Some((0, 0)));
        assert_eq!(bucket.nth_occupied(1), Some((2, 0)));
        assert_eq!(bucket.nth_occupied(2), Some((3, 0)));
        assert_eq!(bucket.nth_occupied(3), None);
    }

    #[test]
    fn slots_never_reallocate() {
        let mut bucket = Bucket::new(8);
        bucket.push(0u64).unwrap();
        let before = bucket.get(0, 0).map(|v| v as *const u64);
        for v in 1..8 {
            bucket.push(v).unwrap();
        }
        let after = bucket.get(0, 0).map(|v| v as *const u64);
        assert_eq!(before, after);
    }

    #[test]
    #[should_panic(expected = "refill of occupied slot")]
    fn refill_of_occupied_slot_panics() {
        let mut bucket = Bucket::new(2);
        let slot = bucket.push(1).unwrap();
        bucket.refill(slot, 2);
    }
}
