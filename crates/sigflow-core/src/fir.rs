//! Finite impulse response filter block.
//!
//! ```text
//! y[t] = b[0]*x[t] + b[1]*x[t-1] + ... + b[N-1]*x[t-N+1]
//! ```
//!
//! The history holds exactly as many samples as there are coefficients, so a
//! unit impulse produces the coefficient sequence followed by zeros.
//!
//! # Usage
//!
//! ```rust
//! use sigflow_core::FirFilter;
//!
//! let mut avg = FirFilter::new("avg", vec![0.5, 0.5]).unwrap();
//! assert_eq!(avg.process_sample(10.0), 5.0);
//! assert_eq!(avg.process_sample(10.0), 10.0);
//! ```

use crate::block::{Block, BlockError, BlockKind, check_arity};
use crate::history::HistoryBuffer;

/// FIR filter with a fixed coefficient set.
///
/// # Invariants
///
/// - `b` is non-empty
/// - `xbuf.len() == b.len()`
#[derive(Debug, Clone)]
pub struct FirFilter {
    name: String,
    b: Vec<f64>,
    xbuf: HistoryBuffer,
}

impl FirFilter {
    /// Creates a FIR filter with zeroed history.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::EmptyCoefficients`] if `coefficients` is empty.
    pub fn new(name: impl Into<String>, coefficients: Vec<f64>) -> Result<Self, BlockError> {
        let name = name.into();
        if coefficients.is_empty() {
            return Err(BlockError::EmptyCoefficients {
                block: name,
                which: "filter",
            });
        }
        let xbuf = HistoryBuffer::new(coefficients.len());
        Ok(Self {
            name,
            b: coefficients,
            xbuf,
        })
    }

    /// Processes a single sample, bypassing the arity check.
    #[inline]
    pub fn process_sample(&mut self, x: f64) -> f64 {
        self.xbuf.push(x);
        self.xbuf.dot(&self.b)
    }

    /// Filter coefficients `b[0..N]`.
    pub fn coefficients(&self) -> &[f64] {
        &self.b
    }

    /// Input history, newest sample first.
    pub fn history(&self) -> &[f64] {
        self.xbuf.as_slice()
    }
}

impl Block for FirFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> BlockKind {
        BlockKind::Fir
    }

    fn input_count(&self) -> usize {
        1
    }

    fn process(&mut self, inputs: &[f64]) -> Result<f64, BlockError> {
        check_arity(self, inputs)?;
        Ok(self.process_sample(inputs[0]))
    }

    fn reset(&mut self) {
        self.xbuf.clear();
    }
}
