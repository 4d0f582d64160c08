//! Median filter over a column of numbers.
//!
//! ## Usage
//!
//! ```bash
//! # 5-sample running median, one output per input line
//! medianwindow --window 5 readings.txt
//!
//! # only full windows, skipping NaN readings, every 10th median
//! cat readings.txt | medianwindow -w 101 --edge valid --nan omit --step 10
//!
//! # mark the ramp-up instead of reporting partial medians
//! medianwindow -w 5 --edge pad:nan readings.txt
//! ```
//!
//! Input is one number per line; blank lines are skipped. Set `RUST_LOG` to
//! `debug` to see what the filter was configured with.
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use env_logger::Env;
use log::{debug, error};
use thiserror::Error;

use medianwindow::{medfilt, Config, Edge, NanPolicy, Strategy};

#[derive(Parser)]
#[command(name = "medianwindow")]
#[command(about = "Running median over a sliding window of a numeric stream")]
#[command(version)]
struct Cli {
    /// Number of samples in a full window
    #[arg(short, long)]
    window: usize,

    /// Ramp-up reporting: pad, pad:partial, pad:<marker> or valid
    #[arg(short, long, default_value = "pad")]
    edge: Edge,

    /// NaN handling: propagate, omit or reject
    #[arg(short, long, default_value = "propagate")]
    nan: NanPolicy,

    /// Report every STEP-th median
    #[arg(short, long, default_value = "1")]
    step: usize,

    /// Backing store: auto, tree or sorted
    #[arg(long, default_value = "auto")]
    strategy: Strategy,

    /// Input file, stdin when absent
    input: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("reading input: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: not a number: {text:?}")]
    Parse { line: usize, text: String },

    #[error(transparent)]
    Filter(#[from] medianwindow::Error),
}

fn read_samples<R: BufRead>(reader: R) -> Result<Vec<f64>, CliError> {
    let mut samples = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        match text.parse::<f64>() {
            Ok(x) => samples.push(x),
            Err(_) => {
                return Err(CliError::Parse {
                    line: idx + 1,
                    text: text.to_string(),
                })
            }
        }
    }
    Ok(samples)
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::new(cli.window)
        .with_edge(cli.edge)
        .with_nan(cli.nan)
        .with_step(cli.step)
        .with_strategy(cli.strategy);
    config.validate()?;

    let samples = match cli.input {
        Some(ref path) => read_samples(BufReader::new(File::open(path)?))?,
        None => {
            let stdin = io::stdin();
            let handle = stdin.lock();
            read_samples(handle)?
        }
    };
    debug!("read {} samples", samples.len());

    let medians = medfilt(&samples, &config)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for m in &medians {
        writeln!(out, "{}", m)?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("medianwindow: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reads_numbers_and_skips_blanks() {
        let input = "1.5\n\n  -2\nNaN\ninf\n";
        let samples = read_samples(input.as_bytes()).unwrap();
        assert_eq!(samples.len(), 4);
        assert_eq!(&samples[..2], &[1.5, -2.0]);
        assert!(samples[2].is_nan());
        assert!(samples[3].is_infinite());
    }

    #[test]
    fn reports_bad_line() {
        match read_samples("1\n2\nthree\n".as_bytes()) {
            Err(CliError::Parse { line, text }) => {
                assert_eq!(line, 3);
                assert_eq!(text, "three");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parses_arguments() {
        let cli = Cli::try_parse_from(&[
            "medianwindow",
            "-w",
            "7",
            "--edge",
            "pad:-1",
            "--nan",
            "omit",
            "--strategy",
            "tree",
            "data.txt",
        ])
        .unwrap();
        assert_eq!(cli.window, 7);
        assert_eq!(cli.edge, "pad:-1".parse::<Edge>().unwrap());
        assert_eq!(cli.nan, NanPolicy::Omit);
        assert_eq!(cli.step, 1);
        assert_eq!(cli.strategy, Strategy::Tree);
        assert_eq!(cli.input, Some(PathBuf::from("data.txt")));

        assert!(Cli::try_parse_from(&["medianwindow", "-w", "3", "--nan", "drop"]).is_err());
        assert!(Cli::try_parse_from(&["medianwindow"]).is_err());
    }
}
