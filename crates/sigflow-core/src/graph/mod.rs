//! Dependency-graph evaluator for named blocks.
//!
//! A [`ProcessingSystem`] owns a set of named [`Block`](crate::Block)s and a
//! dependency table mapping each target block to an ordered list of source
//! blocks. Evaluation is pull-based and recursive:
//!
//! ```text
//! compute_block("S", v)
//!   sources(S) = [A, B]  ->  S.process([compute_block(A, v), compute_block(B, v)])
//!   sources(A) = none    ->  A.process([v])
//! ```
//!
//! # Storage
//!
//! Blocks live in an arena indexed by [`BlockId`], a stable handle assigned at
//! registration and never reused. The name index and the dependency table hold
//! handles, never references, so topology edits cannot alias a block.
//!
//! # Cycles
//!
//! [`connect()`](ProcessingSystem::connect) refuses any edge set that would let
//! a block depend on itself, directly or transitively. Evaluation recursion is
//! therefore bounded by the longest dependency chain.
//!
//! # Shared ancestors
//!
//! When two consumers read the same stateful block, [`EvalPolicy`] decides
//! whether that block is advanced once per reference (`PerPath`, the default)
//! or at most once per evaluation pass (`OncePerSample`).
//!
//! # Example
//!
//! ```rust
//! use sigflow_core::{FirFilter, ProcessingSystem, Summator};
//!
//! let mut system = ProcessingSystem::new();
//! system.add_block(Box::new(FirFilter::new("A", vec![1.0])?))?;
//! system.add_block(Box::new(FirFilter::new("B", vec![2.0])?))?;
//! system.add_block(Box::new(Summator::new("S", 1.0, 1.0)))?;
//! system.connect("S", &["A", "B"])?;
//!
//! assert_eq!(system.compute_block("S", 1.0)?, 3.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod node;
mod system;

pub use node::BlockId;
pub use system::{EvalPolicy, GraphError, ProcessingSystem};
