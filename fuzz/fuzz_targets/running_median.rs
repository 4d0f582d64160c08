#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate byteorder;
extern crate medianwindow;

use byteorder::{BigEndian, ReadBytesExt};
use medianwindow::{medfilt, Config, Edge, NanPolicy, Padding, Strategy};
use std::io::Cursor;

fn brute(window: &[f64], nan: NanPolicy) -> f64 {
    if nan == NanPolicy::Propagate && window.iter().any(|x| x.is_nan()) {
        return ::std::f64::NAN;
    }
    let mut sorted: Vec<f64> = window.iter().cloned().filter(|x| !x.is_nan()).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();
    if n == 0 {
        ::std::f64::NAN
    } else if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

fn same(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

fuzz_target!(|data: &[u8]| {
    let mut cursor = Cursor::new(data);

    // bounded 2**8, zero is an invalid window and must be refused
    let window = if let Ok(res) = cursor.read_u8() {
        res as usize
    } else {
        return;
    };
    let flags = if let Ok(res) = cursor.read_u8() {
        res
    } else {
        return;
    };
    let step = (flags >> 4) as usize + 1;
    let nan = if flags & 1 == 0 {
        NanPolicy::Propagate
    } else {
        NanPolicy::Omit
    };
    let edge = if flags & 2 == 0 {
        Edge::Valid
    } else {
        Edge::Pad(Padding::Partial)
    };
    let strategy = if flags & 4 == 0 {
        Strategy::Tree
    } else {
        Strategy::Sorted
    };

    // samples from 16 bits so duplicates are common and NaN shows up
    let mut samples = Vec::new();
    while let Ok(raw) = cursor.read_i16::<BigEndian>() {
        samples.push(if raw == i16::min_value() {
            ::std::f64::NAN
        } else {
            f64::from(raw % 64)
        });
    }

    let config = Config::new(window)
        .with_edge(edge)
        .with_nan(nan)
        .with_step(step)
        .with_strategy(strategy);
    let out = match medfilt(&samples, &config) {
        Ok(out) => out,
        Err(_) => {
            assert_eq!(window, 0);
            return;
        }
    };
    assert_eq!(out.len(), config.output_len(samples.len()));

    let mut emitted = 0;
    for i in 0..samples.len() {
        let reports = match edge {
            Edge::Valid => i + 1 >= window && (i + 1 - window) % step == 0,
            Edge::Pad(_) => i % step == 0,
        };
        if !reports {
            continue;
        }
        let start = (i + 1).saturating_sub(window);
        assert!(same(out[emitted], brute(&samples[start..i + 1], nan)));
        emitted += 1;
    }
    assert_eq!(emitted, out.len());
});
