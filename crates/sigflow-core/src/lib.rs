//! Sigflow Core - named processing blocks and their dependency graph
//!
//! This crate provides the blocks of a small scalar signal-processing pipeline
//! and the evaluator that wires them together by name.
//!
//! # Core Abstractions
//!
//! ## Blocks
//!
//! - [`Block`] - Object-safe trait: a name, `process` over one or more
//!   scalar inputs, and `reset`
//! - [`FirFilter`] - Finite impulse response filter (one input)
//! - [`IirFilter`] - Infinite impulse response filter (one input)
//! - [`Summator`] - Weighted sum `u*x1 + v*x2` (two inputs)
//!
//! ## Graph
//!
//! - [`ProcessingSystem`] - Owns named blocks, validates dependency edges
//!   (including cycles), and evaluates any block for an external input sample
//! - [`EvalPolicy`] - Whether shared upstream blocks advance once per
//!   reference or once per sample
//!
//! ## Utilities
//!
//! - [`HistoryBuffer`] - Shift register used by the filters
//! - [`Signal`] - Fixed-size sample array with `+`, `* scalar` and `concat`
//!
//! # Example
//!
//! ```rust
//! use sigflow_core::{FirFilter, IirFilter, ProcessingSystem, Summator};
//!
//! let mut system = ProcessingSystem::new();
//! system.add_block(Box::new(FirFilter::new("smooth", vec![0.5, 0.5])?))?;
//! system.add_block(Box::new(IirFilter::new("decay", vec![0.2], vec![0.8])?))?;
//! system.add_block(Box::new(Summator::new("mix", 1.0, 1.0)))?;
//! system.connect("mix", &["smooth", "decay"])?;
//!
//! // Stream a signal sample-by-sample through the mix.
//! let out = system.process_signal("mix", &[1.0, 0.0, 0.0])?;
//! assert_eq!(out.len(), 3);
//!
//! // Rewind all history.
//! system.reset_all();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Features
//!
//! - `tracing` - emit `tracing` events on graph mutation and evaluation

pub mod block;
pub mod fir;
pub mod graph;
pub mod history;
pub mod iir;
pub mod signal;
pub mod summator;

// Re-export main types at crate root
pub use block::{Block, BlockError, BlockKind};
pub use fir::FirFilter;
pub use graph::{BlockId, EvalPolicy, GraphError, ProcessingSystem};
pub use history::HistoryBuffer;
pub use iir::IirFilter;
pub use signal::Signal;
pub use summator::Summator;
