//! The seam between the sliding window and the structure that answers rank
//! queries over its contents.

use crate::error::Result;

/// A multiset that can report the value at a given rank.
///
/// Ranks are 1-based and count duplicates individually: a store holding
/// `[2, 2, 5]` answers `select(1) == 2`, `select(2) == 2`, `select(3) == 5`.
pub trait OrderStatistics<T> {
    /// Add one occurrence of `value`.
    fn insert(&mut self, value: T);

    /// Remove one occurrence of `value`.
    ///
    /// Returns `Error::Absent` when no occurrence is held. The store is left
    /// untouched in that case.
    fn remove(&mut self, value: T) -> Result<()>;

    /// The value at 1-based `rank` among all held occurrences.
    ///
    /// Returns `Error::RankOutOfRange` unless `1 <= rank <= self.len()`.
    fn select(&self, rank: usize) -> Result<T>;

    /// Total occurrences held, duplicates included.
    fn len(&self) -> usize;

    /// True when no occurrence is held.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every occurrence.
    fn clear(&mut self);
}
