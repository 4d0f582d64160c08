//! Run configuration for a median filter pass.
//!
//! Every knob has a textual form so the CLI and any other host can pass
//! configuration as plain words:
//!
//! ```
//! use medianwindow::config::{Config, Edge, NanPolicy, Padding};
//!
//! let edge: Edge = "pad:nan".parse().unwrap();
//! let config = Config::new(5)
//!     .with_edge(edge)
//!     .with_nan("omit".parse().unwrap())
//!     .with_step(2);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.nan, NanPolicy::Omit);
//! assert_eq!(config.output_len(10), 5);
//! assert!("bogus".parse::<Edge>().is_err());
//! assert_eq!("pad".parse::<Edge>(), Ok(Edge::Pad(Padding::Partial)));
//! ```
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Windows at or below this size default to the sorted store.
pub const SMALL_WINDOW: usize = 8;

/// What to report for the first `window - 1` positions under `Edge::Pad`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(serde::Serialize, serde::Deserialize))]
pub enum Padding {
    /// The median of however many samples have arrived so far.
    Partial,
    /// A fixed marker meaning "no full window yet".
    Fill(f64),
}

/// How the ramp-up of the stream is reported.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    /// One output per input position.
    Pad(Padding),
    /// Outputs only once the window is full.
    Valid,
}

/// What a NaN sample means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(serde::Serialize, serde::Deserialize))]
pub enum NanPolicy {
    /// Any NaN inside the window makes that window's median NaN.
    Propagate,
    /// The median is taken over the non-NaN samples of the window. A window
    /// holding nothing but NaN reports NaN.
    Omit,
    /// A NaN sample is an input error.
    Reject,
}

/// Which order statistics store backs the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// `Sorted` for windows of at most `SMALL_WINDOW` samples, `Tree` above.
    Auto,
    /// The balanced order statistics tree.
    Tree,
    /// The chunked sorted store.
    Sorted,
}

/// Configuration of a single median filter pass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Number of samples in a full window.
    pub window: usize,
    /// Ramp-up reporting.
    pub edge: Edge,
    /// NaN handling.
    pub nan: NanPolicy,
    /// Report a median every `step` positions. Every sample still passes
    /// through the window.
    pub step: usize,
    /// Backing store.
    pub strategy: Strategy,
}

impl Config {
    /// A configuration for `window` samples with partial-window padding,
    /// NaN propagation, a step of one and automatic store selection.
    pub fn new(window: usize) -> Config {
        Config {
            window: window,
            edge: Edge::Pad(Padding::Partial),
            nan: NanPolicy::Propagate,
            step: 1,
            strategy: Strategy::Auto,
        }
    }

    /// Set the edge policy.
    pub fn with_edge(mut self, edge: Edge) -> Config {
        self.edge = edge;
        self
    }

    /// Set the NaN policy.
    pub fn with_nan(mut self, nan: NanPolicy) -> Config {
        self.nan = nan;
        self
    }

    /// Set the step between reported medians.
    pub fn with_step(mut self, step: usize) -> Config {
        self.step = step;
        self
    }

    /// Set the backing store.
    pub fn with_strategy(mut self, strategy: Strategy) -> Config {
        self.strategy = strategy;
        self
    }

    /// Reject configurations no pass can run with.
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(Error::InvalidWindow(self.window));
        }
        if self.step == 0 {
            return Err(Error::InvalidStep(self.step));
        }
        Ok(())
    }

    /// The store `Strategy::Auto` stands for with this window size.
    pub fn resolved_strategy(&self) -> Strategy {
        match self.strategy {
            Strategy::Auto if self.window <= SMALL_WINDOW => Strategy::Sorted,
            Strategy::Auto => Strategy::Tree,
            other => other,
        }
    }

    /// Number of medians a pass over `n` samples produces.
    ///
    /// Meaningless for configurations that fail `validate`; zero is returned
    /// for those.
    pub fn output_len(&self, n: usize) -> usize {
        if self.validate().is_err() {
            return 0;
        }
        match self.edge {
            Edge::Valid if n < self.window => 0,
            Edge::Valid => (n - self.window) / self.step + 1,
            Edge::Pad(_) if n == 0 => 0,
            Edge::Pad(_) => (n - 1) / self.step + 1,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Edge::Pad(Padding::Partial) => write!(f, "pad"),
            Edge::Pad(Padding::Fill(x)) => write!(f, "pad:{}", x),
            Edge::Valid => write!(f, "valid"),
        }
    }
}

impl FromStr for Edge {
    type Err = Error;

    fn from_str(s: &str) -> Result<Edge> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "pad" | "pad:partial" => return Ok(Edge::Pad(Padding::Partial)),
            "valid" => return Ok(Edge::Valid),
            _ => {}
        }
        let fill = match s.get(..4) {
            Some(prefix) if prefix.eq_ignore_ascii_case("pad:") => s[4..].parse::<f64>().ok(),
            _ => None,
        };
        match fill {
            Some(x) => Ok(Edge::Pad(Padding::Fill(x))),
            None => Err(Error::UnknownEdge(s.to_string())),
        }
    }
}

impl fmt::Display for NanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            NanPolicy::Propagate => "propagate",
            NanPolicy::Omit => "omit",
            NanPolicy::Reject => "reject",
        };
        f.write_str(name)
    }
}

impl FromStr for NanPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<NanPolicy> {
        match s.trim().to_ascii_lowercase().as_str() {
            "propagate" => Ok(NanPolicy::Propagate),
            "omit" => Ok(NanPolicy::Omit),
            "reject" => Ok(NanPolicy::Reject),
            _ => Err(Error::UnknownNanPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Strategy::Auto => "auto",
            Strategy::Tree => "tree",
            Strategy::Sorted => "sorted",
        };
        f.write_str(name)
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Strategy> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Strategy::Auto),
            "tree" => Ok(Strategy::Tree),
            "sorted" => Ok(Strategy::Sorted),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new(3);
        assert_eq!(config.edge, Edge::Pad(Padding::Partial));
        assert_eq!(config.nan, NanPolicy::Propagate);
        assert_eq!(config.step, 1);
        assert_eq!(config.strategy, Strategy::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_configurations() {
        assert_eq!(Config::new(0).validate(), Err(Error::InvalidWindow(0)));
        assert_eq!(Config::new(4).with_step(0).validate(), Err(Error::InvalidStep(0)));
        assert_eq!(Config::new(0).output_len(10), 0);
    }

    #[test]
    fn output_lengths() {
        let pad = Config::new(3);
        let valid = Config::new(3).with_edge(Edge::Valid);
        assert_eq!(pad.output_len(0), 0);
        assert_eq!(pad.output_len(5), 5);
        assert_eq!(valid.output_len(5), 3);
        assert_eq!(valid.output_len(3), 1);
        assert_eq!(valid.output_len(2), 0);
        assert_eq!(valid.output_len(0), 0);

        // window larger than the input
        assert_eq!(Config::new(10).output_len(4), 4);
        assert_eq!(Config::new(10).with_edge(Edge::Valid).output_len(4), 0);

        assert_eq!(pad.with_step(2).output_len(5), 3);
        assert_eq!(pad.with_step(2).output_len(6), 3);
        assert_eq!(valid.with_step(2).output_len(7), 3);
        assert_eq!(valid.with_step(10).output_len(7), 1);
    }

    #[test]
    fn auto_strategy() {
        assert_eq!(Config::new(SMALL_WINDOW).resolved_strategy(), Strategy::Sorted);
        assert_eq!(Config::new(SMALL_WINDOW + 1).resolved_strategy(), Strategy::Tree);
        assert_eq!(
            Config::new(2).with_strategy(Strategy::Tree).resolved_strategy(),
            Strategy::Tree
        );
    }

    #[test]
    fn parse_edge() {
        assert_eq!("valid".parse::<Edge>(), Ok(Edge::Valid));
        assert_eq!("VALID".parse::<Edge>(), Ok(Edge::Valid));
        assert_eq!("pad:partial".parse::<Edge>(), Ok(Edge::Pad(Padding::Partial)));
        assert_eq!("pad:-1".parse::<Edge>(), Ok(Edge::Pad(Padding::Fill(-1.0))));
        match "pad:nan".parse::<Edge>() {
            Ok(Edge::Pad(Padding::Fill(x))) => assert!(x.is_nan()),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!("pad:".parse::<Edge>(), Err(Error::UnknownEdge("pad:".to_string())));
        assert_eq!("same".parse::<Edge>(), Err(Error::UnknownEdge("same".to_string())));
    }

    #[test]
    fn display_round_trips() {
        for edge in &[Edge::Valid, Edge::Pad(Padding::Partial), Edge::Pad(Padding::Fill(0.5))] {
            assert_eq!(edge.to_string().parse::<Edge>(), Ok(*edge));
        }
        for nan in &[NanPolicy::Propagate, NanPolicy::Omit, NanPolicy::Reject] {
            assert_eq!(nan.to_string().parse::<NanPolicy>(), Ok(*nan));
        }
        for strategy in &[Strategy::Auto, Strategy::Tree, Strategy::Sorted] {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(*strategy));
        }
        assert!("maybe".parse::<NanPolicy>().is_err());
        assert!("heap".parse::<Strategy>().is_err());
    }
}
