//! Graph description file format.

use std::path::Path;

use serde::Deserialize;
use sigflow_core::{
    Block, BlockError, BlockKind, EvalPolicy, FirFilter, GraphError, IirFilter,
    ProcessingSystem, Summator,
};

use crate::error::ConfigError;
use crate::validation::{ValidationResult, validate_graph};

/// A processing graph described in TOML.
///
/// Blocks are registered in file order, then connections are applied in file
/// order. A block without a `[[connections]]` entry reads the external input.
///
/// # TOML Format
///
/// ```toml
/// name = "smoother"
/// policy = "per-path"
///
/// [[blocks]]
/// type = "fir"
/// name = "F"
/// coefficients = [0.5, 0.5]
///
/// [[blocks]]
/// type = "iir"
/// name = "I"
/// b = [0.2]
/// a = [0.8]
///
/// [[blocks]]
/// type = "summator"
/// name = "S"
/// u = 2.0
/// v = 3.0
///
/// [[connections]]
/// target = "S"
/// sources = ["F", "I"]
/// ```
///
/// Unknown keys are rejected, so a misspelt field fails to parse instead of
/// silently falling back to its default. An empty `sources` list leaves the
/// target reading the external input.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GraphConfig {
    /// Name of the graph.
    #[serde(default = "default_name")]
    pub name: String,

    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,

    /// How shared ancestors are evaluated.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Blocks in registration order.
    #[serde(default)]
    pub blocks: Vec<BlockConfig>,

    /// Wiring, applied in order after every block is registered.
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
}

fn default_name() -> String {
    "untitled".to_string()
}

/// Evaluation policy as written in a graph file.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyConfig {
    /// `"per-path"`
    #[default]
    PerPath,
    /// `"once-per-sample"`
    OncePerSample,
}

impl From<PolicyConfig> for EvalPolicy {
    fn from(policy: PolicyConfig) -> Self {
        match policy {
            PolicyConfig::PerPath => EvalPolicy::PerPath,
            PolicyConfig::OncePerSample => EvalPolicy::OncePerSample,
        }
    }
}

/// One `[[blocks]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum BlockConfig {
    /// Finite impulse response filter.
    Fir {
        /// Block name.
        name: String,
        /// Tap weights, newest sample first.
        coefficients: Vec<f64>,
    },
    /// Infinite impulse response filter.
    Iir {
        /// Block name.
        name: String,
        /// Feed-forward coefficients.
        b: Vec<f64>,
        /// Feedback coefficients (may be omitted).
        #[serde(default)]
        a: Vec<f64>,
    },
    /// Two-input weighted sum.
    Summator {
        /// Block name.
        name: String,
        /// Weight of the first input.
        u: f64,
        /// Weight of the second input.
        v: f64,
    },
}

impl BlockConfig {
    /// Block name.
    pub fn name(&self) -> &str {
        match self {
            BlockConfig::Fir { name, .. }
            | BlockConfig::Iir { name, .. }
            | BlockConfig::Summator { name, .. } => name,
        }
    }

    /// Kind of block this entry creates.
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockConfig::Fir { .. } => BlockKind::Fir,
            BlockConfig::Iir { .. } => BlockKind::Iir,
            BlockConfig::Summator { .. } => BlockKind::Summator,
        }
    }

    /// Number of sources the block must be wired to.
    pub fn input_count(&self) -> usize {
        match self {
            BlockConfig::Summator { .. } => 2,
            _ => 1,
        }
    }

    /// Instantiate the block.
    pub fn build(&self) -> Result<Box<dyn Block + Send>, BlockError> {
        let block: Box<dyn Block + Send> = match self {
            BlockConfig::Fir { name, coefficients } => {
                Box::new(FirFilter::new(name.as_str(), coefficients.clone())?)
            }
            BlockConfig::Iir { name, b, a } => {
                Box::new(IirFilter::new(name.as_str(), b.clone(), a.clone())?)
            }
            BlockConfig::Summator { name, u, v } => {
                Box::new(Summator::new(name.as_str(), *u, *v))
            }
        };
        Ok(block)
    }
}

/// One `[[connections]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Block whose inputs are being set.
    pub target: String,
    /// Ordered input sources.
    pub sources: Vec<String>,
}

impl GraphConfig {
    /// Load a graph description from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            "config_load: {} ({} blocks) from {}",
            config.name,
            config.blocks.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parse a graph description from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Check the description for every structural problem at once.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_graph(self)
    }

    /// Validate, then build a ready-to-run processing system.
    pub fn build(&self) -> Result<ProcessingSystem, ConfigError> {
        self.validate()?;

        let mut system = ProcessingSystem::with_policy(self.policy.into());
        for block in &self.blocks {
            system.add_block(block.build().map_err(GraphError::from)?)?;
        }
        for connection in &self.connections {
            system.connect(&connection.target, connection.sources.as_slice())?;
        }

        tracing::debug!(
            "config_build: {} blocks={} connections={}",
            self.name,
            system.len(),
            self.connections.len()
        );
        Ok(system)
    }

    /// Find a block entry by name.
    pub fn block(&self, name: &str) -> Option<&BlockConfig> {
        self.blocks.iter().find(|b| b.name() == name)
    }

    /// Declared sources of a block, if it has a connection entry.
    pub fn sources_of(&self, name: &str) -> Option<&[String]> {
        self.connections
            .iter()
            .find(|c| c.target == name)
            .map(|c| c.sources.as_slice())
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the graph has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
