//! TOML graph descriptions for sigflow processing systems.
//!
//! A graph file names its blocks, their coefficients, and how they are wired.
//! [`GraphConfig`] parses and validates such a file and builds a
//! [`ProcessingSystem`](sigflow_core::ProcessingSystem) from it.
//!
//! # Example
//!
//! ```rust
//! use sigflow_config::GraphConfig;
//!
//! let config = GraphConfig::from_toml_str(r#"
//! name = "average"
//!
//! [[blocks]]
//! type = "fir"
//! name = "F"
//! coefficients = [0.5, 0.5]
//! "#).unwrap();
//!
//! let mut system = config.build().unwrap();
//! assert_eq!(system.compute_block("F", 10.0).unwrap(), 5.0);
//! assert_eq!(system.compute_block("F", 10.0).unwrap(), 10.0);
//! ```

mod error;
mod graph_config;

/// Structural validation of graph descriptions.
pub mod validation;

pub use error::ConfigError;
pub use graph_config::{BlockConfig, ConnectionConfig, GraphConfig, PolicyConfig};
pub use validation::{ValidationError, ValidationResult, validate_block, validate_graph};
