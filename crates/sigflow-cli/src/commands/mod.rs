//! CLI command implementations.

pub mod common;
pub mod eval;
pub mod generate;
pub mod info;
pub mod process;
