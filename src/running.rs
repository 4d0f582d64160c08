//! The sliding window controller: a FIFO of raw samples driving an order
//! statistics store.
//!
//! The controller has two modes. While *filling*, each push only inserts.
//! The push that brings the window to its capacity switches it to *steady*,
//! and from then on every push first evicts the oldest sample. It never goes
//! back.
//!
//! The median is read from the store by rank. With `n` samples held, an odd
//! `n` reports rank `(n + 1) / 2` and an even `n` the mean of ranks `n / 2`
//! and `n / 2 + 1`. The same formula applies while filling: the window is
//! whatever has arrived so far, capped at capacity.
//!
//! # NaN
//!
//! NaN is stored as a value greater than every other value and equal only to
//! itself, so NaN samples occupy the top ranks. `NanPolicy::Propagate`
//! reports NaN whenever one is held. `NanPolicy::Omit` selects among the
//! ranks below them. `NanPolicy::Reject` refuses the sample. Infinities are
//! ordinary values and the even-count mean follows IEEE arithmetic, so a
//! window of `[-inf, inf]` reports NaN. `-0.0` and `0.0` compare equal and
//! share one store entry, so a zero median carries the sign of whichever zero
//! entered the store first.
//!
//! # Corruption
//!
//! A store that reports `Error::Absent` or `Error::RankOutOfRange` no longer
//! agrees with the window. The controller logs the error, keeps it, and
//! returns it from every later `push` and `median` until `reset`.
//!
//! # Examples
//!
//! ```
//! use medianwindow::running::{Mode, RunningMedian};
//!
//! let mut running = RunningMedian::new(3).unwrap();
//! let mut medians = Vec::new();
//! for x in &[1.0, 2.0, 3.0, 4.0, 5.0] {
//!     running.push(*x).unwrap();
//!     medians.push(running.median().unwrap());
//! }
//! assert_eq!(medians, vec![1.0, 1.5, 2.0, 3.0, 4.0]);
//! assert_eq!(running.mode(), Mode::Steady);
//! ```
use std::cell::RefCell;

use log::{error, trace};
use ordered_float::OrderedFloat;

use crate::config::NanPolicy;
use crate::error::{Error, Result};
use crate::fifo::Fifo;
use crate::order::OrderStatistics;
use crate::ostree::OsTree;

/// The key samples are stored under: total order with NaN above everything.
pub type Key = OrderedFloat<f64>;

/// Whether the window has reached capacity yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Fewer than `capacity` samples have arrived.
    Filling,
    /// The window is full and every push evicts.
    Steady,
}

/// Running median over the last `capacity` samples.
#[derive(Debug, Clone)]
pub struct RunningMedian<S = OsTree<Key>> {
    window: Fifo<f64>,
    store: S,
    nan: NanPolicy,
    // NaN samples currently inside the window
    nans: usize,
    // samples pushed since creation or the last reset
    seen: usize,
    // first internal error, recorded by `median` as well
    poisoned: RefCell<Option<Error>>,
}

impl RunningMedian<OsTree<Key>> {
    /// A tree-backed running median over `capacity` samples that propagates
    /// NaN.
    pub fn new(capacity: usize) -> Result<RunningMedian<OsTree<Key>>> {
        RunningMedian::with_store(capacity, NanPolicy::Propagate, OsTree::new())
    }
}

impl<S> RunningMedian<S>
where
    S: OrderStatistics<Key>,
{
    /// A running median over `capacity` samples backed by `store`, which must
    /// be empty.
    pub fn with_store(
        capacity: usize,
        nan: NanPolicy,
        mut store: S,
    ) -> Result<RunningMedian<S>> {
        if capacity == 0 {
            return Err(Error::InvalidWindow(capacity));
        }
        store.clear();
        Ok(RunningMedian {
            window: Fifo::new(capacity),
            store: store,
            nan: nan,
            nans: 0,
            seen: 0,
            poisoned: RefCell::new(None),
        })
    }

    /// Feed one sample, evicting the oldest once the window is full.
    ///
    /// Under `NanPolicy::Reject` a NaN sample is refused with
    /// `Error::NanRejected` and the window is left as it was.
    pub fn push(&mut self, sample: f64) -> Result<()> {
        self.check()?;
        if sample.is_nan() && self.nan == NanPolicy::Reject {
            return Err(Error::NanRejected { index: self.seen });
        }

        let filling = !self.window.is_full();
        if let Some(oldest) = self.window.push(sample) {
            if let Err(e) = self.store.remove(OrderedFloat(oldest)) {
                return Err(self.poison(e));
            }
            if oldest.is_nan() {
                self.nans -= 1;
            }
        }
        self.store.insert(OrderedFloat(sample));
        if sample.is_nan() {
            self.nans += 1;
        }
        self.seen += 1;

        if filling && self.window.is_full() {
            trace!(
                "window of {} samples full after {} pushes",
                self.window.capacity(),
                self.seen
            );
        }
        debug_assert_eq!(self.store.len(), self.window.len(), "store and window disagree");
        Ok(())
    }

    /// Median of the samples currently in the window.
    pub fn median(&self) -> Result<f64> {
        self.check()?;
        let n = self.store.len();
        if n == 0 {
            return Err(Error::EmptyWindow);
        }
        let valid = match self.nan {
            NanPolicy::Propagate if self.nans > 0 => return Ok(::std::f64::NAN),
            NanPolicy::Omit => n - self.nans,
            _ => n,
        };
        if valid == 0 {
            return Ok(::std::f64::NAN);
        }

        let lo = self.select((valid + 1) / 2)?;
        if valid % 2 == 1 {
            return Ok(lo);
        }
        let hi = self.select(valid / 2 + 1)?;
        Ok((lo + hi) / 2.0)
    }

    /// Samples currently in the window.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// True before the first push.
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Samples in a full window.
    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        if self.window.is_full() {
            Mode::Steady
        } else {
            Mode::Filling
        }
    }

    /// NaN samples currently in the window.
    pub fn nan_count(&self) -> usize {
        self.nans
    }

    /// Samples pushed since creation or the last reset.
    pub fn seen(&self) -> usize {
        self.seen
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The internal error that stopped this controller, if any.
    pub fn poisoned(&self) -> Option<Error> {
        self.poisoned.borrow().clone()
    }

    /// Forget every sample and return to filling mode. This also clears a
    /// recorded internal error.
    pub fn reset(&mut self) {
        self.window.clear();
        self.store.clear();
        self.nans = 0;
        self.seen = 0;
        self.poisoned.replace(None);
    }

    fn select(&self, rank: usize) -> Result<f64> {
        match self.store.select(rank) {
            Ok(key) => Ok(key.into_inner()),
            Err(e) => Err(self.poison(e)),
        }
    }

    fn check(&self) -> Result<()> {
        match *self.poisoned.borrow() {
            Some(ref e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn poison(&self, e: Error) -> Error {
        error!("sliding window corrupted after {} samples: {}", self.seen, e);
        let mut poisoned = self.poisoned.borrow_mut();
        if poisoned.is_none() {
            *poisoned = Some(e.clone());
        }
        e
    }
}
