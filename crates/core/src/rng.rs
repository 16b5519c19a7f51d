//! RNG module - injected randomness for reproducible games
//!
//! Every operation that needs randomness takes a [`RandomSource`] from the
//! caller. Nothing in the engine reaches for a global generator, so a game is a
//! pure function of its seed.
//!
//! [`SeededRng`] is a 32-bit LCG using the Numerical Recipes constants. It is
//! not cryptographic; it only needs to be fast and identical across platforms.

/// Capability: produce the next float in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, n)`. Returns 0 when `n` is 0.
    fn next_index(&mut self, n: usize) -> usize {
        let i = (self.next_f64() * n as f64) as usize;
        // Guards against sources that return exactly 1.0.
        i.min(n.saturating_sub(1))
    }

    /// Shuffle a slice using Fisher-Yates
    fn shuffle<T>(&mut self, slice: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..slice.len()).rev() {
            let j = self.next_index(i + 1);
            slice.swap(i, j);
        }
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Current internal state; `SeededRng::new(rng.state())` continues the same sequence.
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SeededRng {
    fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }
}

/// Convenience constructor mirroring the usual `seeded_rng(seed)` entry point.
pub fn seeded_rng(seed: u32) -> SeededRng {
    SeededRng::new(seed)
}

/// Replays a fixed list of values, wrapping around at the end.
///
/// Handy for pinning down exactly which type a spawn or a generator draws.
#[derive(Debug, Clone)]
pub struct CycleRng {
    values: Vec<f64>,
    cursor: usize,
}

impl CycleRng {
    /// `values` must be non-empty and each in `[0, 1)`.
    pub fn new(values: Vec<f64>) -> Self {
        debug_assert!(!values.is_empty());
        Self { values, cursor: 0 }
    }
}

impl RandomSource for CycleRng {
    fn next_f64(&mut self) -> f64 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
