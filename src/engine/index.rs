use crate::rule::{MAX_NEIGHBORS, Rule};

const COUNTS: usize = MAX_NEIGHBORS as usize + 1;

/// A rule flattened into a lookup table
///
/// Indexed by `[alive as usize][neighbors]`, so the per-cell update in the
/// grid is a single lookup no matter which [`Rule`] produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct TransitionTable {
    next: [[bool; COUNTS]; 2],
}

impl TransitionTable {
    pub(super) fn compile<R: Rule + ?Sized>(rule: &R) -> Self {
        let mut next = [[false; COUNTS]; 2];
        for (state, row) in next.iter_mut().enumerate() {
            for (n, cell) in row.iter_mut().enumerate() {
                *cell = rule.next_state(state == 1, n as u8);
            }
        }
        Self { next }
    }

    #[inline]
    pub(super) fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        self.next[alive as usize][neighbors as usize]
    }
}
