/// Injected randomness. The engine never creates a source of its own.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of values in `[0, 1)`.
///
/// Any `FnMut() -> f64` closure is a source, which lets tests script the
/// exact draws: `let mut rng = || 0.1;`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

impl<F> RandomSource for F
where
    F: FnMut() -> f64,
{
    fn next_f64(&mut self) -> f64 {
        self()
    }
}

/// A seeded source backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of values, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceSource {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Map one draw to an index in `0..len`. Out-of-range draws are clamped.
pub fn pick_index(rng: &mut dyn RandomSource, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let r = rng.next_f64().max(0.0);
    ((r * len as f64).floor() as usize).min(len - 1)
}

/// Uniformly pick one element. Draws even for single-element slices so
/// the draw sequence does not depend on content size.
pub fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    let index = pick_index(rng, items.len());
    items.get(index)
}

/// Uniform integer in `[min, max]`.
pub fn rand_int_inclusive(rng: &mut dyn RandomSource, min: usize, max: usize) -> usize {
    if max <= min {
        return min;
    }
    min + pick_index(rng, max - min + 1)
}
