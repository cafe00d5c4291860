//! Infinite impulse response filter block.
//!
//! Accumulates feed-forward and feedback terms with addition only:
//!
//! ```text
//! y[t] = Σ b[i] * x[t-i]  +  Σ a[j] * y[t-1-j]
//! ```
//!
//! The feedback coefficients are the multipliers actually applied to past
//! outputs. To realise the textbook form
//! `y[t] = Σ b[i] x[t-i] - Σ a'[j] y[t-j]` pass `a[j] = -a'[j+1]`.
//!
//! Output history is updated after the output is computed, so the first
//! call only sees zeroed feedback.

use crate::block::{Block, BlockError, BlockKind, check_arity};
use crate::history::HistoryBuffer;

/// IIR filter with feed-forward (`b`) and feedback (`a`) coefficients.
///
/// # Invariants
///
/// - `b` is non-empty and `xbuf.len() == b.len()`
/// - `ybuf.len() == a.len()`; `a` may be empty (pure FIR behaviour)
#[derive(Debug, Clone)]
pub struct IirFilter {
    name: String,
    b: Vec<f64>,
    a: Vec<f64>,
    xbuf: HistoryBuffer,
    ybuf: HistoryBuffer,
}

impl IirFilter {
    /// Creates an IIR filter with zeroed input and output history.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::EmptyCoefficients`] if `b` is empty.
    pub fn new(name: impl Into<String>, b: Vec<f64>, a: Vec<f64>) -> Result<Self, BlockError> {
        let name = name.into();
        if b.is_empty() {
            return Err(BlockError::EmptyCoefficients {
                block: name,
                which: "feed-forward",
            });
        }
        let xbuf = HistoryBuffer::new(b.len());
        let ybuf = HistoryBuffer::new(a.len());
        Ok(Self {
            name,
            b,
            a,
            xbuf,
            ybuf,
        })
    }

    /// Processes a single sample, bypassing the arity check.
    #[inline]
    pub fn process_sample(&mut self, x: f64) -> f64 {
        self.xbuf.push(x);
        let y = self.xbuf.dot(&self.b) + self.ybuf.dot(&self.a);
        self.ybuf.push(y);
        y
    }

    /// Feed-forward coefficients.
    pub fn feedforward(&self) -> &[f64] {
        &self.b
    }

    /// Feedback coefficients, as applied to past outputs.
    pub fn feedback(&self) -> &[f64] {
        &self.a
    }

    /// Input history, newest first.
    pub fn history(&self) -> &[f64] {
        self.xbuf.as_slice()
    }

    /// Output history, newest first.
    pub fn output_history(&self) -> &[f64] {
        self.ybuf.as_slice()
    }
}

impl Block for IirFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> BlockKind {
        BlockKind::Iir
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
        self.ybuf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn one_pole_decay() {
        let mut iir = IirFilter::new("I", vec![0.2], vec![0.8]).unwrap();
        assert!(approx(iir.process(&[1.0]).unwrap(), 0.2));
        assert!(approx(iir.process(&[0.0]).unwrap(), 0.16));
        assert!(approx(iir.process(&[0.0]).unwrap(), 0.128));
    }

    #[test]
    fn empty_feedforward_rejected() {
        let err = IirFilter::new("I", Vec::new(), vec![0.5]).unwrap_err();
        assert!(matches!(
            err,
            BlockError::EmptyCoefficients { which: "feed-forward", .. }
        ));
    }

    #[test]
    fn empty_feedback_behaves_like_fir() {
        let mut iir = IirFilter::new("I", vec![0.5, 0.5], Vec::new()).unwrap();
        assert_eq!(iir.process_sample(10.0), 5.0);
        assert_eq!(iir.process_sample(10.0), 10.0);
        assert!(iir.output_history().is_empty());
    }

    #[test]
    fn output_history_tracks_outputs() {
        let mut iir = IirFilter::new("I", vec![1.0], vec![0.0, 0.0]).unwrap();
        iir.process_sample(1.0);
        iir.process_sample(2.0);
        iir.process_sample(3.0);
        assert_eq!(iir.output_history(), &[3.0, 2.0]);
        assert_eq!(iir.history(), &[3.0]);
    }

    #[test]
    fn negative_feedback_alternates() {
        let mut iir = IirFilter::new("I", vec![1.0], vec![-0.5]).unwrap();
        assert_eq!(iir.process_sample(1.0), 1.0);
        assert_eq!(iir.process_sample(0.0), -0.5);
        assert_eq!(iir.process_sample(0.0), 0.25);
    }

    #[test]
    fn reset_clears_both_histories() {
        let mut iir = IirFilter::new("I", vec![0.2], vec![0.8]).unwrap();
        iir.process_sample(1.0);
        iir.process_sample(1.0);
        iir.reset();
        assert_eq!(iir.history(), &[0.0]);
        assert_eq!(iir.output_history(), &[0.0]);
        assert!(approx(iir.process_sample(1.0), 0.2));
    }

    #[test]
    fn wrong_arity_rejected() {
        let mut iir = IirFilter::new("I", vec![0.2], vec![0.8]).unwrap();
        let err = iir.process(&[1.0, 1.0]).unwrap_err();
        assert!(matches!(err, BlockError::Arity { expected: 1, got: 2, .. }));
        assert_eq!(iir.output_history(), &[0.0]);
    }
}
