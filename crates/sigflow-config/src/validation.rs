//! Structural validation of graph descriptions.
//!
//! Validation runs before anything is built and reports every problem it
//! finds, so a broken file can be fixed in one pass. Cycles are left to the
//! processing system, which rejects them while connecting.
//!
//! # Example
//!
//! ```rust
//! use sigflow_config::{GraphConfig, ValidationError};
//!
//! let config = GraphConfig::from_toml_str(r#"
//! [[blocks]]
//! type = "summator"
//! name = "S"
//! u = 1.0
//! v = 1.0
//!
//! [[connections]]
//! target = "S"
//! sources = ["missing"]
//! "#).unwrap();
//!
//! assert!(matches!(config.validate(), Err(ValidationError::Multiple(_))));
//! ```

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::graph_config::{BlockConfig, GraphConfig};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Two blocks share a name.
    #[error("duplicate block name: {0}")]
    DuplicateBlock(String),

    /// A filter was declared without coefficients.
    #[error("block '{block}': {which} coefficients must not be empty")]
    EmptyCoefficients {
        /// Name of the block.
        block: String,
        /// Which coefficient set is empty.
        which: &'static str,
    },

    /// A connection targets a block that does not exist.
    #[error("connection target not found: {0}")]
    UnknownTarget(String),

    /// A connection names a source that does not exist.
    #[error("source block '{source_block}' for target '{target}' not found")]
    UnknownSource {
        /// Block whose inputs were being set.
        target: String,
        /// The missing source name.
        source_block: String,
    },

    /// The same target appears in more than one connection entry.
    #[error("block '{0}' is connected more than once")]
    DuplicateConnection(String),

    /// A block is wired to the wrong number of sources.
    #[error("block '{block}' expects {expected} source(s), got {got}")]
    FanIn {
        /// Name of the block.
        block: String,
        /// Sources the block needs.
        expected: usize,
        /// Sources declared for it.
        got: usize,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a whole graph description.
///
/// Checks, in order: block names and coefficient sets, then every connection
/// entry, then the fan-in of blocks that need more than the external input.
/// A connection with an empty `sources` list is accepted and leaves its target
/// reading the external input, matching
/// [`ProcessingSystem::connect`](sigflow_core::ProcessingSystem::connect).
pub fn validate_graph(config: &GraphConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();
    let mut blocks: HashMap<&str, &BlockConfig> = HashMap::new();

    for block in &config.blocks {
        if blocks.insert(block.name(), block).is_some() {
            errors.push(ValidationError::DuplicateBlock(block.name().to_string()));
        }
        if let Err(e) = validate_block(block) {
            errors.push(e);
        }
    }

    let mut wired: HashSet<&str> = HashSet::new();
    let mut fed: HashSet<&str> = HashSet::new();
    for connection in &config.connections {
        let target = connection.target.as_str();
        if !wired.insert(target) {
            errors.push(ValidationError::DuplicateConnection(target.to_string()));
            continue;
        }

        for source in &connection.sources {
            if !blocks.contains_key(source.as_str()) {
                errors.push(ValidationError::UnknownSource {
                    target: target.to_string(),
                    source_block: source.clone(),
                });
            }
        }

        let Some(block) = blocks.get(target) else {
            errors.push(ValidationError::UnknownTarget(target.to_string()));
            continue;
        };
        // No sources: the target keeps reading the external input.
        if connection.sources.is_empty() {
            continue;
        }
        fed.insert(target);
        if connection.sources.len() != block.input_count() {
            errors.push(ValidationError::FanIn {
                block: target.to_string(),
                expected: block.input_count(),
                got: connection.sources.len(),
            });
        }
    }

    // Unwired blocks see only the external input.
    for block in &config.blocks {
        if block.input_count() > 1 && !fed.contains(block.name()) {
            errors.push(ValidationError::FanIn {
                block: block.name().to_string(),
                expected: block.input_count(),
                got: 0,
            });
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Validate a single block entry in isolation.
pub fn validate_block(block: &BlockConfig) -> ValidationResult<()> {
    let empty = match block {
        BlockConfig::Fir { coefficients, .. } if coefficients.is_empty() => Some("filter"),
        BlockConfig::Iir { b, .. } if b.is_empty() => Some("feed-forward"),
        _ => None,
    };
    match empty {
        Some(which) => Err(ValidationError::EmptyCoefficients {
            block: block.name().to_string(),
            which,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> GraphConfig {
        GraphConfig::from_toml_str(toml).unwrap()
    }

    fn errors_of(config: &GraphConfig) -> Vec<ValidationError> {
        match config.validate() {
            Ok(()) => vec![],
            Err(ValidationError::Multiple(errors)) => errors,
            Err(e) => vec![e],
        }
    }

    #[test]
    fn valid_graph_passes() {
        let config = parse(
            r#"
[[blocks]]
type = "fir"
name = "F"
coefficients = [0.5, 0.5]

[[blocks]]
type = "summator"
name = "S"
u = 1.0
v = 1.0

[[connections]]
target = "S"
sources = ["F", "F"]
"#,
        );
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn single_error_is_not_wrapped() {
        let config = parse(
            r#"
[[blocks]]
type = "fir"
name = "F"
coefficients = []
"#,
        );
        assert_eq!(
            config.validate(),
            Err(ValidationError::EmptyCoefficients {
                block: "F".to_string(),
                which: "filter",
            })
        );
    }

    #[test]
    fn iir_without_feedforward_rejected() {
        let block = BlockConfig::Iir {
            name: "I".to_string(),
            b: vec![],
            a: vec![0.5],
        };
        let err = validate_block(&block).unwrap_err();
        assert_eq!(
            err.to_string(),
            "block 'I': feed-forward coefficients must not be empty"
        );
    }

    #[test]
    fn collects_every_problem() {
        let config = parse(
            r#"
[[blocks]]
type = "fir"
name = "F"
coefficients = [1.0]

[[blocks]]
type = "fir"
name = "F"
coefficients = [2.0]

[[blocks]]
type = "summator"
name = "S"
u = 1.0
v = 1.0

[[connections]]
target = "F"
sources = ["ghost"]

[[connections]]
target = "F"
sources = ["S"]

[[connections]]
target = "nowhere"
sources = []
"#,
        );

        let errors = errors_of(&config);
        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateBlock("F".to_string()),
                ValidationError::UnknownSource {
                    target: "F".to_string(),
                    source_block: "ghost".to_string(),
                },
                ValidationError::DuplicateConnection("F".to_string()),
                ValidationError::UnknownTarget("nowhere".to_string()),
                ValidationError::FanIn {
                    block: "S".to_string(),
                    expected: 2,
                    got: 0,
                },
            ]
        );
    }

    #[test]
    fn fan_in_mismatch() {
        let config = parse(
            r#"
[[blocks]]
type = "fir"
name = "A"
coefficients = [1.0]

[[blocks]]
type = "iir"
name = "B"
b = [1.0]

[[blocks]]
type = "summator"
name = "S"
u = 1.0
v = 1.0

[[connections]]
target = "B"
sources = ["A", "A"]

[[connections]]
target = "S"
sources = ["A"]
"#,
        );
        assert_eq!(
            errors_of(&config),
            vec![
                ValidationError::FanIn {
                    block: "B".to_string(),
                    expected: 1,
                    got: 2,
                },
                ValidationError::FanIn {
                    block: "S".to_string(),
                    expected: 2,
                    got: 1,
                },
            ]
        );
    }

    #[test]
    fn empty_sources_read_external_input() {
        let config = parse(
            r#"
[[blocks]]
type = "fir"
name = "F"
coefficients = [0.5]

[[blocks]]
type = "summator"
name = "S"
u = 1.0
v = 1.0

[[connections]]
target = "F"
sources = []

[[connections]]
target = "S"
sources = []
"#,
        );
        // F is fine unwired; S still needs two sources.
        assert_eq!(
            config.validate(),
            Err(ValidationError::FanIn {
                block: "S".to_string(),
                expected: 2,
                got: 0,
            })
        );
    }

    #[test]
    fn empty_sources_build_like_connect() {
        let config = parse(
            r#"
[[blocks]]
type = "fir"
name = "F"
coefficients = [0.5]

[[connections]]
target = "F"
sources = []
"#,
        );
        let mut system = config.build().unwrap();
        assert_eq!(system.sources("F"), None);
        assert_eq!(system.compute_block("F", 4.0).unwrap(), 2.0);
    }

    #[test]
    fn multiple_display_joins_messages() {
        let err = ValidationError::Multiple(vec![
            ValidationError::DuplicateBlock("A".to_string()),
            ValidationError::UnknownTarget("B".to_string()),
        ]);
        assert_eq!(
            err.to_string(),
            "multiple validation errors: duplicate block name: A; connection target not found: B"
        );
    }
}
