//! Deterministic input generation for tests, benchmarks and the fuzz target.

/// A splitmix64 generator. Not for anything but repeatable noise.
#[derive(Debug, Clone, Copy)]
pub struct Xorshift {
    seed: u64,
}

impl Xorshift {
    /// Seed a generator.
    pub fn new(seed: u64) -> Xorshift {
        Xorshift { seed: seed }
    }

    /// Next 64 bits.
    pub fn next_u64(&mut self) -> u64 {
        // implementation inspired by
        // https://github.com/astocko/xorshift/blob/master/src/splitmix64.rs
        use std::num::Wrapping as w;

        let mut z = w(self.seed) + w(0x9E37_79B9_7F4A_7C15_u64);
        self.seed = z.0;
        z = (z ^ (z >> 30)) * w(0xBF58_476D_1CE4_E5B9_u64);
        z = (z ^ (z >> 27)) * w(0x94D0_49BB_1331_11EB_u64);
        (z ^ (z >> 31)).0
    }

    /// Next value in `[0, 65536)`.
    pub fn next_val(&mut self) -> u32 {
        u32::from(self.next_u64() as u16)
    }

    /// Next float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// A signal of `n` samples: a slow ramp with noise and the occasional
    /// large spike, which is what a median filter is usually pointed at.
    pub fn signal(&mut self, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let base = i as f64 / 100.0 + self.next_f64();
                if self.next_val() % 50 == 0 {
                    base + 1000.0
                } else {
                    base
                }
            })
            .collect()
    }
}
