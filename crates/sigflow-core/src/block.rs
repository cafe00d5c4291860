//! Core Block trait and related types.
//!
//! The [`Block`] trait is the unit of computation in a processing system.
//! Every block has a unique name, consumes one or more scalar inputs per call,
//! and produces exactly one scalar output.
//!
//! ## Design Decisions
//!
//! - **Graph-agnostic**: a block never knows where its inputs come from. It is
//!   a pure function of the inputs it is handed plus its own retained history.
//!
//! - **Object-safe**: the trait is object-safe so a
//!   [`ProcessingSystem`](crate::ProcessingSystem) can own a heterogeneous set
//!   of blocks as `Box<dyn Block + Send>`.
//!
//! - **Checked arity**: passing the wrong number of inputs is a recoverable
//!   [`BlockError::Arity`], not a debug assertion. History is left untouched
//!   when the arity check fails.

use thiserror::Error;

/// The concrete variant behind a [`Block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Finite impulse response filter.
    Fir,
    /// Infinite impulse response filter.
    Iir,
    /// Two-input weighted summator.
    Summator,
}

impl BlockKind {
    /// Returns a short lowercase identifier (`"fir"`, `"iir"`, `"summator"`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Fir => "fir",
            BlockKind::Iir => "iir",
            BlockKind::Summator => "summator",
        }
    }
}

impl core::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Errors raised by block construction or processing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlockError {
    /// A filter was constructed with an empty coefficient set.
    #[error("block '{block}': {which} coefficients must not be empty")]
    EmptyCoefficients {
        /// Name of the block being constructed.
        block: String,
        /// Which coefficient set was empty (e.g. `"feed-forward"`).
        which: &'static str,
    },

    /// `process` was called with the wrong number of inputs.
    #[error("block '{block}' expects {expected} input(s), got {got}")]
    Arity {
        /// Name of the block.
        block: String,
        /// Number of inputs the block accepts.
        expected: usize,
        /// Number of inputs supplied.
        got: usize,
    },
}

/// Core trait for all processing blocks.
///
/// # Example
///
/// ```rust
/// use sigflow_core::{Block, BlockError, BlockKind};
///
/// struct Offset {
///     name: String,
///     offset: f64,
/// }
///
/// impl Block for Offset {
///     fn name(&self) -> &str {
///         &self.name
///     }
///
///     fn kind(&self) -> BlockKind {
///         BlockKind::Fir
///     }
///
///     fn input_count(&self) -> usize {
///         1
///     }
///
///     fn process(&mut self, inputs: &[f64]) -> Result<f64, BlockError> {
///         sigflow_core::block::check_arity(self, inputs)?;
///         Ok(inputs[0] + self.offset)
///     }
///
///     fn reset(&mut self) {}
/// }
/// ```
pub trait Block {
    /// Unique name of the block. Immutable after construction.
    fn name(&self) -> &str;

    /// The variant this block implements.
    fn kind(&self) -> BlockKind;

    /// Number of inputs `process` accepts per call.
    fn input_count(&self) -> usize;

    /// Process one set of inputs and return the output.
    ///
    /// For blocks with history (filters) this advances the state by one
    /// sample.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::Arity`] if `inputs.len()` differs from
    /// [`input_count()`](Self::input_count).
    fn process(&mut self, inputs: &[f64]) -> Result<f64, BlockError>;

    /// Clear all retained history without touching coefficients or weights.
    fn reset(&mut self);
}

/// Verifies that `inputs` matches the block's declared arity.
///
/// # Errors
///
/// Returns [`BlockError::Arity`] on mismatch.
#[inline]
pub fn check_arity<B: Block + ?Sized>(block: &B, inputs: &[f64]) -> Result<(), BlockError> {
    let expected = block.input_count();
    if inputs.len() == expected {
        Ok(())
    } else {
        Err(BlockError::Arity {
            block: block.name().to_string(),
            expected,
            got: inputs.len(),
        })
    }
}
