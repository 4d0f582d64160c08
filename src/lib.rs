//! This crate provides exact running medians over sliding windows of a
//! stream.
//!
//! A median filter replaces every sample with the median of the last `w`
//! samples. Recomputing that from scratch costs a sort per position; here the
//! window is kept in an order statistics store that is updated by one
//! insertion and at most one removal per sample, so each median costs
//! `O(log w)` with the balanced tree and `O(w)` with small-window sorted
//! storage.
//!
//! ```
//! use medianwindow::{medfilt, Config};
//!
//! let medians = medfilt(&[1.0, 9.0, 2.0, 8.0, 3.0], &Config::new(3)).unwrap();
//! assert_eq!(medians, vec![1.0, 5.0, 2.0, 8.0, 3.0]);
//! ```
//!
//! The pieces are usable on their own: `ostree::OsTree` and
//! `store::SortedStore` are multisets with rank selection behind the
//! `OrderStatistics` trait, `running::RunningMedian` maintains one window, and
//! `filter::MedianFilter` adds edge and step handling on top.
#![deny(missing_docs, missing_copy_implementations, missing_debug_implementations,
        unstable_features, unused_import_braces)]

#[cfg(test)]
#[macro_use]
extern crate quickcheck;

pub mod config;
pub mod error;
pub mod fifo;
pub mod filter;
pub mod order;
pub mod ostree;
pub mod running;
pub mod store;
pub mod util;

pub use crate::config::{Config, Edge, NanPolicy, Padding, Strategy};
pub use crate::error::{Error, Result};
pub use crate::filter::{medfilt, medfilt_into, MedianFilter};
pub use crate::order::OrderStatistics;
pub use crate::running::RunningMedian;
