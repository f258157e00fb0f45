//! Seeded operation scripts for churn tests and benchmarks.
//!
//! A [`Workload`] draws [`Op`]s from a `ChaCha8Rng`, so the same seed
//! always yields the same script. Positions are drawn against the length
//! the caller reports, so every generated op is valid when applied in
//! sequence.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// One step of a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    PushBack(u64),
    PushFront(u64),
    Insert { position: usize, value: u64 },
    Erase { position: usize },
    /// Set the removal mark on the element at `position`.
    Mark { position: usize },
    /// Compact every marked element out of the order.
    RemoveIf,
}

/// Relative weights of each op kind, out of the sum of all weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpMix {
    pub push_back: u32,
    pub push_front: u32,
    pub insert: u32,
    pub erase: u32,
    pub mark: u32,
    pub remove_if: u32,
}

impl OpMix {
    /// Appends and erasures only.
    pub fn churn() -> Self {
        Self {
            push_back: 3,
            push_front: 0,
            insert: 0,
            erase: 2,
            mark: 0,
            remove_if: 0,
        }
    }

    fn total(&self) -> u32 {
        self.push_back + self.push_front + self.insert + self.erase + self.mark + self.remove_if
    }
}

impl Default for OpMix {
    fn default() -> Self {
        Self {
            push_back: 6,
            push_front: 2,
            insert: 3,
            erase: 4,
            mark: 2,
            remove_if: 1,
        }
    }
}

/// Deterministic op generator.
pub struct Workload {
    rng: ChaCha8Rng,
    mix: OpMix,
    next_value: u64,
}

impl Workload {
    pub fn new(seed: u64) -> Self {
        Self::with_mix(seed, OpMix::default())
    }

    /// # Panics
    ///
    /// Panics if every weight in `mix` is zero.
    pub fn with_mix(seed: u64, mix: OpMix) -> Self {
        assert!(mix.total() > 0, "op mix has no weight");
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            mix,
            next_value: 0,
        }
    }

    /// Draw the next op for a sequence currently holding `len` elements.
    ///
    /// Ops that need an element fall back to `PushBack` when `len == 0`.
    /// Values are unique and increasing.
    pub fn next_op(&mut self, len: usize) -> Op {
        let mut pick = self.rng.random_range(0..self.mix.total());
        let value = self.next_value;

        if pick < self.mix.push_back {
            return self.push(value);
        }
        pick -= self.mix.push_back;
        if pick < self.mix.push_front {
            self.next_value += 1;
            return Op::PushFront(value);
        }
        pick -= self.mix.push_front;
        if pick < self.mix.insert {
            self.next_value += 1;
            let position = self.rng.random_range(0..=len);
            return Op::Insert { position, value };
        }
        pick -= self.mix.insert;

        if len == 0 {
            return self.push(value);
        }
        if pick < self.mix.erase {
            return Op::Erase {
                position: self.rng.random_range(0..len),
            };
        }
        pick -= self.mix.erase;
        if pick < self.mix.mark {
            return Op::Mark {
                position: self.rng.random_range(0..len),
            };
        }
        Op::RemoveIf
    }

    /// `count` values in a shuffled order, for fill-then-erase patterns.
    pub fn shuffled_positions(&mut self, count: usize) -> Vec<usize> {
        let mut positions: Vec<usize> = (0..count).collect();
        positions.shuffle(&mut self.rng);
        positions
    }

    fn push(&mut self, value: u64) -> Op {
        self.next_value += 1;
        Op::PushBack(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_script() {
        let mut a = Workload::new(7);
        let mut b = Workload::new(7);
        for len in 0..200 {
            assert_eq!(a.next_op(len % 13), b.next_op(len % 13));
        }
    }

    #[test]
    fn positions_are_in_range() {
        let mut w = Workload::new(11);
        for step in 0..1000 {
            let len = step % 9;
            match w.next_op(len) {
                Op::Insert { position, .. } => assert!(position <= len),
                Op::Erase { position } | Op::Mark { position } => assert!(position < len),
                _ => {}
            }
        }
    }

    #[test]
    fn empty_sequence_only_grows() {
        let mut w = Workload::new(3);
        for _ in 0..200 {
            match w.next_op(0) {
                Op::PushBack(_) | Op::PushFront(_) | Op::Insert { .. } => {}
                other => panic!("unexpected {other:?} on empty sequence"),
            }
        }
    }

    #[test]
    fn churn_mix_never_marks() {
        let mut w = Workload::with_mix(5, OpMix::churn());
        for len in 0..500 {
            let op = w.next_op(len);
            assert!(matches!(op, Op::PushBack(_) | Op::Erase { .. }), "{op:?}");
        }
    }

    #[test]
    fn shuffled_positions_is_permutation() {
        let mut w = Workload::new(1);
        let mut p = w.shuffled_positions(50);
        p.sort_unstable();
        assert_eq!(p, (0..50).collect::<Vec<_>>());
    }
}
