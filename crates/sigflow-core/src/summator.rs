//! Weighted two-input summator: `y = u * x1 + v * x2`.

use crate::block::{Block, BlockError, BlockKind, check_arity};

/// Stateless weighted sum of exactly two inputs, in fixed order.
#[derive(Debug, Clone)]
pub struct Summator {
    name: String,
    u: f64,
    v: f64,
}

impl Summator {
    /// Creates a summator with weight `u` on the first input and `v` on the
    /// second.
    pub fn new(name: impl Into<String>, u: f64, v: f64) -> Self {
        Self {
            name: name.into(),
            u,
            v,
        }
    }

    /// Computes `u * x1 + v * x2` directly.
    #[inline]
    pub fn mix(&self, x1: f64, x2: f64) -> f64 {
        self.u * x1 + self.v * x2
    }

    /// Returns `(u, v)`.
    pub fn weights(&self) -> (f64, f64) {
        (self.u, self.v)
    }
}

impl Block for Summator {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> BlockKind {
        BlockKind::Summator
    }

    fn input_count(&self) -> usize {
        2
    }

    fn process(&mut self, inputs: &[f64]) -> Result<f64, BlockError> {
        check_arity(self, inputs)?;
        Ok(self.mix(inputs[0], inputs[1]))
    }

    fn reset(&mut self) {}
}
