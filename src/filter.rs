//! The streaming driver: feeds samples through a running median one at a
//! time and decides, per position, whether and what to report.
//!
//! Under `Edge::Valid` only full windows are reported, so a pass over `n`
//! samples with window `w` yields `n - w + 1` medians (none when `n < w`).
//! Under `Edge::Pad` every position is reported and the first `w - 1` carry
//! either the partial-window median or a caller-chosen marker. A `step`
//! larger than one thins either sequence out without changing which samples
//! enter the window.
//!
//! # Examples
//!
//! ```
//! use medianwindow::{medfilt, Config, Edge, Padding};
//!
//! let input = [1.0, 2.0, 3.0, 4.0, 5.0];
//!
//! let valid = Config::new(3).with_edge(Edge::Valid);
//! assert_eq!(medfilt(&input, &valid).unwrap(), vec![2.0, 3.0, 4.0]);
//!
//! let marked = Config::new(3).with_edge(Edge::Pad(Padding::Fill(-1.0)));
//! assert_eq!(medfilt(&input, &marked).unwrap(), vec![-1.0, -1.0, 2.0, 3.0, 4.0]);
//! ```
use log::{debug, warn};

use crate::config::{Config, Edge, NanPolicy, Padding, Strategy};
use crate::error::{Error, Result};
use crate::ostree::OsTree;
use crate::running::{Key, RunningMedian};
use crate::store::SortedStore;

#[derive(Debug, Clone)]
enum Engine {
    Tree(RunningMedian<OsTree<Key>>),
    Sorted(RunningMedian<SortedStore<Key>>),
}

impl Engine {
    fn push(&mut self, sample: f64) -> Result<()> {
        match *self {
            Engine::Tree(ref mut r) => r.push(sample),
            Engine::Sorted(ref mut r) => r.push(sample),
        }
    }

    fn median(&self) -> Result<f64> {
        match *self {
            Engine::Tree(ref r) => r.median(),
            Engine::Sorted(ref r) => r.median(),
        }
    }

    fn reset(&mut self) {
        match *self {
            Engine::Tree(ref mut r) => r.reset(),
            Engine::Sorted(ref mut r) => r.reset(),
        }
    }
}

/// A configured median filter consuming one sample at a time.
#[derive(Debug, Clone)]
pub struct MedianFilter {
    config: Config,
    engine: Engine,
    // index of the next sample
    position: usize,
}

impl MedianFilter {
    /// Build a filter, rejecting invalid configurations up front.
    pub fn new(config: Config) -> Result<MedianFilter> {
        config.validate()?;
        let engine = match config.resolved_strategy() {
            Strategy::Sorted => Engine::Sorted(RunningMedian::with_store(
                config.window,
                config.nan,
                SortedStore::new(),
            )?),
            _ => Engine::Tree(RunningMedian::with_store(
                config.window,
                config.nan,
                OsTree::with_capacity(config.window),
            )?),
        };
        debug!(
            "median filter: window {}, edge {}, nan {}, step {}, store {}",
            config.window,
            config.edge,
            config.nan,
            config.step,
            config.resolved_strategy()
        );
        Ok(MedianFilter {
            config: config,
            engine: engine,
            position: 0,
        })
    }

    /// The configuration this filter runs with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of samples fed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Feed the next sample and return the output for its position, if that
    /// position reports one.
    pub fn feed(&mut self, sample: f64) -> Result<Option<f64>> {
        self.engine.push(sample)?;
        let i = self.position;
        self.position += 1;

        let window = self.config.window;
        let step = self.config.step;
        let full = i + 1 >= window;
        match self.config.edge {
            Edge::Valid => {
                if !full || (i + 1 - window) % step != 0 {
                    return Ok(None);
                }
                self.engine.median().map(Some)
            }
            Edge::Pad(padding) => {
                if i % step != 0 {
                    return Ok(None);
                }
                match padding {
                    Padding::Fill(marker) if !full => Ok(Some(marker)),
                    _ => self.engine.median().map(Some),
                }
            }
        }
    }

    /// Wrap `samples` into an iterator of the medians this filter reports.
    pub fn medians<I>(self, samples: I) -> Medians<I::IntoIter>
    where
        I: IntoIterator<Item = f64>,
    {
        Medians {
            samples: samples.into_iter(),
            filter: self,
            done: false,
        }
    }

    /// Forget every sample fed so far.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.position = 0;
    }
}

/// Iterator of reported medians over a stream of samples.
///
/// Yields `Err` at most once, then stops.
#[derive(Debug)]
pub struct Medians<I> {
    samples: I,
    filter: MedianFilter,
    done: bool,
}

impl<I> Iterator for Medians<I>
where
    I: Iterator<Item = f64>,
{
    type Item = Result<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for sample in &mut self.samples {
            match self.filter.feed(sample) {
                Ok(Some(m)) => return Some(Ok(m)),
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        self.done = true;
        None
    }
}

/// Run a full pass over `input` and collect the reported medians.
///
/// Nothing is returned unless the whole pass succeeds.
pub fn medfilt(input: &[f64], config: &Config) -> Result<Vec<f64>> {
    config.validate()?;
    let mut output = vec![0.0; config.output_len(input.len())];
    let written = medfilt_into(input, config, &mut output)?;
    output.truncate(written);
    Ok(output)
}

/// Run a full pass over `input`, writing the reported medians to the front of
/// `output` and returning how many were written.
///
/// Configuration, buffer length and (under `NanPolicy::Reject`) NaN checks
/// all happen before the first sample is processed. If an error is returned
/// after that the contents of `output` are unspecified.
pub fn medfilt_into(input: &[f64], config: &Config, output: &mut [f64]) -> Result<usize> {
    config.validate()?;
    let needed = config.output_len(input.len());
    if output.len() < needed {
        return Err(Error::OutputTooShort {
            needed: needed,
            got: output.len(),
        });
    }
    if config.nan == NanPolicy::Reject {
        if let Some(index) = input.iter().position(|x| x.is_nan()) {
            return Err(Error::NanRejected { index: index });
        }
    }
    if let Edge::Valid = config.edge {
        if input.len() < config.window {
            warn!(
                "{} samples never fill a window of {}, no medians reported",
                input.len(),
                config.window
            );
        }
    }

    let mut filter = MedianFilter::new(*config)?;
    let mut written = 0;
    for x in input {
        if let Some(m) = filter.feed(*x)? {
            output[written] = m;
            written += 1;
        }
    }
    debug_assert_eq!(written, needed);
    debug!(
        "median filter pass over {} samples reported {} medians",
        input.len(),
        written
    );
    Ok(written)
}
