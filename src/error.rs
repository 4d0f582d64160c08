//! Errors raised while configuring or running a median filter.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong in this crate.
///
/// Configuration and input errors are reported before any output is written.
/// `Absent` and `RankOutOfRange` mean that the window and its order
/// statistics store have diverged. They are never recovered from: the pass
/// that hit one is abandoned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The window must hold at least one sample.
    #[error("window size must be at least 1, got {0}")]
    InvalidWindow(usize),

    /// The step between reported medians must be at least one sample.
    #[error("step must be at least 1, got {0}")]
    InvalidStep(usize),

    /// An edge policy name that could not be parsed.
    #[error("unrecognized edge policy `{0}`, expected `pad`, `pad:<value>` or `valid`")]
    UnknownEdge(String),

    /// A NaN policy name that could not be parsed.
    #[error("unrecognized nan policy `{0}`, expected `propagate`, `omit` or `reject`")]
    UnknownNanPolicy(String),

    /// A store strategy name that could not be parsed.
    #[error("unrecognized strategy `{0}`, expected `auto`, `tree` or `sorted`")]
    UnknownStrategy(String),

    /// A NaN sample arrived while running under `NanPolicy::Reject`.
    #[error("NaN sample at index {index}")]
    NanRejected {
        /// Position of the offending sample in the input.
        index: usize,
    },

    /// The output buffer cannot hold every median the run will produce.
    #[error("output buffer holds {got} values but {needed} are required")]
    OutputTooShort {
        /// Medians the run will produce.
        needed: usize,
        /// Length of the buffer supplied.
        got: usize,
    },

    /// A median was requested before any sample arrived.
    #[error("median of an empty window")]
    EmptyWindow,

    /// The store was asked to remove a value it does not hold.
    #[error("internal consistency violation: removed value is not present")]
    Absent,

    /// The store was asked for a rank outside `1..=len`.
    #[error("internal consistency violation: rank {rank} outside 1..={len}")]
    RankOutOfRange {
        /// Requested 1-based rank.
        rank: usize,
        /// Occurrences currently held.
        len: usize,
    },
}

impl Error {
    /// True for errors that indicate a broken window/store invariant rather
    /// than bad configuration or input.
    pub fn is_internal(&self) -> bool {
        match *self {
            Error::Absent | Error::RankOutOfRange { .. } => true,
            _ => false,
        }
    }
}
