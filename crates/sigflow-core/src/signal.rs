//! Fixed-size sample array with elementwise arithmetic.
//!
//! [`Signal`] is a standalone value type. It is not used by the graph
//! evaluator; it exists for callers that want to build or combine whole
//! sample arrays before streaming them through a
//! [`ProcessingSystem`](crate::ProcessingSystem).
//!
//! - `a + b` pads the shorter operand with zeros.
//! - `a * k` scales every sample.
//! - [`concat`](Signal::concat) appends one signal to another.

use core::ops::{Add, Mul};

/// A one-dimensional array of `f64` samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signal {
    values: Vec<f64>,
}

impl Signal {
    /// Creates a signal of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    /// Returns the sample at `index`, or `0.0` when out of range.
    pub fn get(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(0.0)
    }

    /// Overwrites the sample at `index`. Out-of-range writes are ignored.
    pub fn set(&mut self, index: usize, value: f64) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the signal holds no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Samples as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Returns a new signal holding `self` followed by `other`.
    #[must_use]
    pub fn concat(&self, other: &Signal) -> Signal {
        let mut values = Vec::with_capacity(self.len() + other.len());
        values.extend_from_slice(&self.values);
        values.extend_from_slice(&other.values);
        Signal { values }
    }
}

impl From<Vec<f64>> for Signal {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}

impl From<Signal> for Vec<f64> {
    fn from(signal: Signal) -> Self {
        signal.values
    }
}

impl Add for &Signal {
    type Output = Signal;

    fn add(self, rhs: &Signal) -> Signal {
        let len = self.len().max(rhs.len());
        let values = (0..len).map(|i| self.get(i) + rhs.get(i)).collect();
        Signal { values }
    }
}

impl Add for Signal {
    type Output = Signal;

    fn add(self, rhs: Signal) -> Signal {
        &self + &rhs
    }
}

impl Mul<f64> for &Signal {
    type Output = Signal;

    fn mul(self, scalar: f64) -> Signal {
        let values = self.values.iter().map(|v| v * scalar).collect();
        Signal { values }
    }
}

impl Mul<f64> for Signal {
    type Output = Signal;

    fn mul(mut self, scalar: f64) -> Signal {
        for v in &mut self.values {
            *v *= scalar;
        }
        self
    }
}
