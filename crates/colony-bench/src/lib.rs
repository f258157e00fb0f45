//! Benchmark fixtures for the colony containers.
//!
//! - [`filled`]: `n` appended elements, no holes
//! - [`churned`]: appends interleaved with erasures, so slots are recycled
//! - [`marked`]: tagged elements with every `k`-th one marked removed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use colony::PointerColony;
use colony_test_utils::{Op, OpMix, Tagged, Workload};

/// A colony holding `0..n` in order.
pub fn filled(n: u64) -> PointerColony<u64> {
    (0..n).collect()
}

/// A colony shaped by `steps` seeded append/erase operations.
///
/// The result has holes reused out of insertion order, the layout that
/// forces copy reconstruction off its single-pass path.
pub fn churned(steps: usize, seed: u64) -> PointerColony<u64> {
    let mut workload = Workload::with_mix(seed, OpMix::churn());
    let mut colony = PointerColony::new();
    for _ in 0..steps {
        match workload.next_op(colony.len()) {
            Op::PushBack(v) => {
                colony.push_back(v);
            }
            Op::Erase { position } => {
                colony.erase(position);
            }
            other => unreachable!("churn mix produced {other:?}"),
        }
    }
    colony
}

/// `n` tagged elements with every `every`-th one marked removed.
pub fn marked(n: u64, every: u64) -> PointerColony<Tagged<u64>> {
    let mut colony: PointerColony<Tagged<u64>> = (0..n).map(Tagged::new).collect();
    colony.for_each_mut(|t| {
        if t.value % every == 0 {
            t.mark();
        }
    });
    colony
}
