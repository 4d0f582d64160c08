//! A sorted multiset kept as a list of small sorted chunks.
//!
//! Each occurrence is stored individually, so `select` is a walk over chunk
//! lengths followed by an index. Insertion and removal shift at most one
//! chunk. For small windows this beats the tree's pointer chasing and
//! rebalancing; for large ones the tree wins.
use std::mem;

use crate::error::{Error, Result};
use crate::order::OrderStatistics;

/// Chunked sorted storage of every held occurrence.
#[derive(Clone, PartialEq, Debug)]
pub struct SortedStore<T> {
    data: Vec<Vec<T>>,
    inner_cap: usize,
    len: usize,
}

impl<T> Default for SortedStore<T>
where
    T: Ord + Copy,
{
    fn default() -> SortedStore<T> {
        SortedStore::new()
    }
}

impl<T> SortedStore<T>
where
    T: Ord + Copy,
{
    /// Create an empty store with chunks sized to a few cache lines.
    pub fn new() -> SortedStore<T> {
        let inner_cap = (mem::size_of::<usize>() * 32) / elem_size::<T>(); // align to cache size
        SortedStore::with_inner_cap(inner_cap)
    }

    /// Create an empty store whose chunks split once they exceed `inner_cap`
    /// elements.
    pub fn with_inner_cap(inner_cap: usize) -> SortedStore<T> {
        let inner_cap = if inner_cap < 2 { 2 } else { inner_cap };
        SortedStore {
            data: vec![Vec::with_capacity(inner_cap)],
            inner_cap: inner_cap,
            len: 0,
        }
    }

    /// Iterate every held occurrence in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter().flat_map(|inner| inner.iter())
    }

    // The first chunk whose largest element is >= `value`, or the last chunk.
    // If `value` is held at all, this chunk holds an occurrence of it.
    fn seek(&self, value: &T) -> usize {
        let last = self.data.len() - 1;
        for (outer_idx, inner) in self.data.iter().enumerate() {
            match inner.last() {
                Some(mx) if mx >= value => return outer_idx,
                _ => {}
            }
        }
        last
    }
}

fn elem_size<T>() -> usize {
    let sz = mem::size_of::<T>();
    if sz == 0 {
        1
    } else {
        sz
    }
}

impl<T> OrderStatistics<T> for SortedStore<T>
where
    T: Ord + Copy,
{
    fn insert(&mut self, value: T) {
        let outer_idx = self.seek(&value);
        let idx = match self.data[outer_idx].binary_search(&value) {
            Ok(i) | Err(i) => i,
        };
        self.data[outer_idx].insert(idx, value);
        self.len += 1;
        // Now that we've inserted, check to see if we've gone over inner_cap on
        // this particular chunk. If so, split it in half.
        if self.data[outer_idx].len() > self.inner_cap {
            let half = self.data[outer_idx].len() / 2;
            let nxt = self.data[outer_idx].split_off(half);
            self.data.insert(outer_idx + 1, nxt);
        }
    }

    fn remove(&mut self, value: T) -> Result<()> {
        let outer_idx = self.seek(&value);
        let idx = match self.data[outer_idx].binary_search(&value) {
            Ok(i) => i,
            Err(_) => return Err(Error::Absent),
        };
        self.data[outer_idx].remove(idx);
        self.len -= 1;

        // Fold the chunk into its successor when both fit in one, and never
        // keep an empty chunk around unless it is the only one.
        let nxt = outer_idx + 1;
        if nxt < self.data.len()
            && self.data[outer_idx].len() + self.data[nxt].len() <= self.inner_cap
        {
            let tail = self.data.remove(nxt);
            self.data[outer_idx].extend(tail);
        }
        if self.data[outer_idx].is_empty() && self.data.len() > 1 {
            self.data.remove(outer_idx);
        }
        Ok(())
    }

    fn select(&self, rank: usize) -> Result<T> {
        if rank == 0 || rank > self.len {
            return Err(Error::RankOutOfRange {
                rank: rank,
                len: self.len,
            });
        }
        // Seek forward and find the chunk holding this rank.
        let mut idx = rank - 1;
        for inner in &self.data {
            if idx < inner.len() {
                return Ok(inner[idx]);
            }
            idx -= inner.len();
        }
        Err(Error::RankOutOfRange {
            rank: rank,
            len: self.len,
        })
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        self.data.truncate(1);
        self.data[0].clear();
        self.len = 0;
    }
}
