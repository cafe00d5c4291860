//! Fixed-length sample history used by the filter blocks.
//!
//! Index 0 always holds the most recent sample, index `len - 1` the oldest:
//!
//! ```text
//! push(x_t):  [x_t-1, x_t-2, ..., x_t-N]  ->  [x_t, x_t-1, ..., x_t-N+1]
//! ```

/// Zero-initialised shift register of `f64` samples.
///
/// # Invariants
///
/// - The length is fixed at construction.
/// - A zero-length history accepts pushes and ignores them.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryBuffer {
    samples: Vec<f64>,
}

impl HistoryBuffer {
    /// Creates a history of `len` zeros.
    pub fn new(len: usize) -> Self {
        Self {
            samples: vec![0.0; len],
        }
    }

    /// Shifts every sample one slot older, discarding the oldest, and stores
    /// `sample` at index 0.
    #[inline]
    pub fn push(&mut self, sample: f64) {
        if self.samples.is_empty() {
            return;
        }
        self.samples.rotate_right(1);
        self.samples[0] = sample;
    }

    /// Returns `Σ coeffs[i] * history[i]` over the shorter of the two lengths.
    #[inline]
    pub fn dot(&self, coeffs: &[f64]) -> f64 {
        coeffs
            .iter()
            .zip(self.samples.iter())
            .map(|(c, x)| c * x)
            .sum()
    }

    /// Zero-fills the history.
    pub fn clear(&mut self) {
        self.samples.fill(0.0);
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if the history retains no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the samples, newest first.
    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }
}
