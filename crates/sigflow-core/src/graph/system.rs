//! Processing system: block registry, dependency table and evaluation.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::block::{Block, BlockError};

use super::node::BlockId;

/// Errors that can occur during graph operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// A block with this name is already registered.
    #[error("block already exists: {0}")]
    DuplicateBlock(String),
    /// No block with this name is registered.
    #[error("block not found: {0}")]
    BlockNotFound(String),
    /// `connect` named a target that is not registered.
    #[error("target block not found: {0}")]
    TargetNotFound(String),
    /// `connect` named a source that is not registered.
    #[error("source block '{source_block}' for target '{target}' not found")]
    SourceNotFound {
        /// Target of the rejected connection.
        target: String,
        /// The unknown source name.
        source_block: String,
    },
    /// The connection would make `target` depend on itself.
    #[error("connecting '{source_block}' into '{target}' would create a cycle")]
    CycleDetected {
        /// Target of the rejected connection.
        target: String,
        /// The source that closes the cycle.
        source_block: String,
    },
    /// A block failed while processing.
    #[error(transparent)]
    Block(#[from] BlockError),
}

/// How shared upstream blocks are advanced within one evaluation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EvalPolicy {
    /// Every reference to a block processes it again. A stateful block read by
    /// two consumers advances twice per external sample.
    #[default]
    PerPath,
    /// Each block is processed at most once per `compute_block` /
    /// `compute_all` call; later references reuse the cached output.
    OncePerSample,
}

/// Per-pass output cache. Empty under [`EvalPolicy::PerPath`].
struct PassCache {
    outputs: Option<Vec<Option<f64>>>,
}

impl PassCache {
    fn new(policy: EvalPolicy, block_count: usize) -> Self {
        let outputs = match policy {
            EvalPolicy::PerPath => None,
            EvalPolicy::OncePerSample => Some(vec![None; block_count]),
        };
        Self { outputs }
    }

    #[inline]
    fn get(&self, id: BlockId) -> Option<f64> {
        self.outputs.as_ref().and_then(|o| o[id.slot()])
    }

    #[inline]
    fn store(&mut self, id: BlockId, value: f64) {
        if let Some(outputs) = self.outputs.as_mut() {
            outputs[id.slot()] = Some(value);
        }
    }
}

/// Named blocks wired together by named dependencies.
///
/// The system is the sole owner of its blocks. Evaluation never changes the
/// topology but does advance each visited block's history.
///
/// # Usage
///
/// 1. Create a system with [`new()`](Self::new)
/// 2. Register blocks: [`add_block()`](Self::add_block)
/// 3. Declare dependencies: [`connect()`](Self::connect)
/// 4. Evaluate: [`compute_block()`](Self::compute_block),
///    [`compute_all()`](Self::compute_all),
///    [`process_signal()`](Self::process_signal)
/// 5. Rewind history: [`reset_all()`](Self::reset_all)
#[derive(Default)]
pub struct ProcessingSystem {
    /// Block arena, indexed by `BlockId`, in registration order.
    blocks: Vec<Box<dyn Block + Send>>,
    names: HashMap<String, BlockId>,
    /// Target → ordered sources. Absent key: target reads the external input.
    connections: HashMap<BlockId, Vec<BlockId>>,
    policy: EvalPolicy,
}

impl core::fmt::Debug for ProcessingSystem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProcessingSystem")
            .field("blocks", &self.block_names().collect::<Vec<_>>())
            .field("connections", &self.connections.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl ProcessingSystem {
    /// Creates an empty system using [`EvalPolicy::PerPath`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty system with the given evaluation policy.
    pub fn with_policy(policy: EvalPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Returns the evaluation policy.
    pub fn policy(&self) -> EvalPolicy {
        self.policy
    }

    /// Changes the evaluation policy. Takes effect on the next evaluation.
    pub fn set_policy(&mut self, policy: EvalPolicy) {
        self.policy = policy;
    }

    // --- Mutation ---

    /// Registers a block and takes ownership of it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateBlock`] if the name is taken; the
    /// existing block is left untouched.
    pub fn add_block(&mut self, block: Box<dyn Block + Send>) -> Result<BlockId, GraphError> {
        if self.names.contains_key(block.name()) {
            return Err(GraphError::DuplicateBlock(block.name().to_string()));
        }
        let id = BlockId(self.blocks.len() as u32);
        self.names.insert(block.name().to_string(), id);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "graph_add: {} block '{}' as {id}",
            block.kind(),
            block.name()
        );
        self.blocks.push(block);
        Ok(id)
    }

    /// Declares that `target` reads the outputs of `sources`, in order.
    ///
    /// Replaces any previous source list for `target`. An empty `sources`
    /// removes the entry so `target` reads the external input again.
    ///
    /// # Errors
    ///
    /// - [`GraphError::TargetNotFound`] if `target` is unknown
    /// - [`GraphError::SourceNotFound`] if any source is unknown
    /// - [`GraphError::CycleDetected`] if a source is `target` or already
    ///   depends on `target`
    ///
    /// On error the dependency table is unchanged.
    pub fn connect<S: AsRef<str>>(&mut self, target: &str, sources: &[S]) -> Result<(), GraphError> {
        let target_id = self
            .block_id(target)
            .ok_or_else(|| GraphError::TargetNotFound(target.to_string()))?;

        let mut source_ids = Vec::with_capacity(sources.len());
        for source in sources {
            let source = source.as_ref();
            let id = self.block_id(source).ok_or_else(|| GraphError::SourceNotFound {
                target: target.to_string(),
                source_block: source.to_string(),
            })?;
            source_ids.push(id);
        }

        // A cycle exists if `target` is already upstream of a new source.
        for (&id, source) in source_ids.iter().zip(sources) {
            if self.depends_on(id, target_id) {
                return Err(GraphError::CycleDetected {
                    target: target.to_string(),
                    source_block: source.as_ref().to_string(),
                });
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "graph_connect: {target} <- [{}]",
            sources
                .iter()
                .map(|s| -> &str { s.as_ref() })
                .collect::<Vec<_>>()
                .join(", ")
        );

        if source_ids.is_empty() {
            self.connections.remove(&target_id);
        } else {
            self.connections.insert(target_id, source_ids);
        }
        Ok(())
    }

    /// Drops the source list of `target` so it reads the external input.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::TargetNotFound`] if `target` is unknown.
    pub fn disconnect(&mut self, target: &str) -> Result<(), GraphError> {
        let id = self
            .block_id(target)
            .ok_or_else(|| GraphError::TargetNotFound(target.to_string()))?;
        self.connections.remove(&id);
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_disconnect: {target}");
        Ok(())
    }

    // --- Lookup ---

    /// Returns the handle of the named block.
    pub fn block_id(&self, name: &str) -> Option<BlockId> {
        self.names.get(name).copied()
    }

    /// Returns the named block, or `None` if it is not registered.
    pub fn get_block(&self, name: &str) -> Option<&(dyn Block + Send)> {
        let id = self.block_id(name)?;
        Some(self.blocks[id.slot()].as_ref())
    }

    /// Returns the named block mutably, or `None` if it is not registered.
    pub fn get_block_mut(&mut self, name: &str) -> Option<&mut (dyn Block + Send)> {
        let id = self.block_id(name)?;
        Some(self.blocks[id.slot()].as_mut())
    }

    /// Returns the declared sources of `name`, in argument order.
    ///
    /// `None` if the block is unknown or reads the external input.
    pub fn sources(&self, name: &str) -> Option<Vec<&str>> {
        let id = self.block_id(name)?;
        let sources = self.connections.get(&id)?;
        Some(
            sources
                .iter()
                .map(|s| self.blocks[s.slot()].name())
                .collect(),
        )
    }

    /// Block names in registration order.
    pub fn block_names(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.name())
    }

    /// Number of registered blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if no blocks are registered.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    // --- Evaluation ---

    /// Computes the output of `name` for one external input sample.
    ///
    /// Sources are resolved recursively against the same `input`; a block
    /// without declared sources receives `[input]`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::BlockNotFound`] if `name` is unknown
    /// - [`GraphError::Block`] if any visited block rejects its inputs
    pub fn compute_block(&mut self, name: &str, input: f64) -> Result<f64, GraphError> {
        let id = self
            .block_id(name)
            .ok_or_else(|| GraphError::BlockNotFound(name.to_string()))?;
        let mut cache = PassCache::new(self.policy, self.blocks.len());
        evaluate(&mut self.blocks, &self.connections, id, input, &mut cache)
    }

    /// Computes every registered block for one external input sample.
    ///
    /// Blocks are evaluated in registration order. Under
    /// [`EvalPolicy::OncePerSample`] the whole call is a single pass.
    ///
    /// # Errors
    ///
    /// Returns the first [`GraphError`] encountered; blocks evaluated before
    /// the failure keep their advanced history.
    pub fn compute_all(&mut self, input: f64) -> Result<BTreeMap<String, f64>, GraphError> {
        let mut cache = PassCache::new(self.policy, self.blocks.len());
        let mut results = BTreeMap::new();
        for slot in 0..self.blocks.len() {
            let id = BlockId(slot as u32);
            let value = evaluate(&mut self.blocks, &self.connections, id, input, &mut cache)?;
            results.insert(self.blocks[slot].name().to_string(), value);
        }
        Ok(results)
    }

    /// Streams `input` through `name`, one independent
    /// [`compute_block()`](Self::compute_block) per sample.
    ///
    /// Stateful blocks accumulate history across the array.
    ///
    /// # Errors
    ///
    /// Stops at the first failing sample.
    pub fn process_signal(&mut self, name: &str, input: &[f64]) -> Result<Vec<f64>, GraphError> {
        let mut output = vec![0.0; input.len()];
        self.process_signal_into(name, input, &mut output)?;
        Ok(output)
    }

    /// Like [`process_signal()`](Self::process_signal) but writes into
    /// `output`. Processes `min(input.len(), output.len())` samples.
    ///
    /// # Errors
    ///
    /// Stops at the first failing sample; earlier outputs stay written.
    pub fn process_signal_into(
        &mut self,
        name: &str,
        input: &[f64],
        output: &mut [f64],
    ) -> Result<(), GraphError> {
        let id = self
            .block_id(name)
            .ok_or_else(|| GraphError::BlockNotFound(name.to_string()))?;
        #[cfg(feature = "tracing")]
        tracing::trace!("graph_stream: {} samples through '{name}'", input.len());
        for (x, y) in input.iter().zip(output.iter_mut()) {
            let mut cache = PassCache::new(self.policy, self.blocks.len());
            *y = evaluate(&mut self.blocks, &self.connections, id, *x, &mut cache)?;
        }
        Ok(())
    }

    /// Clears the history of every block, in registration order.
    pub fn reset_all(&mut self) {
        for block in &mut self.blocks {
            block.reset();
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_reset: {} blocks", self.blocks.len());
    }

    // --- Internal ---

    /// Returns `true` if `from` is `to` or reads `to` through declared sources.
    fn depends_on(&self, from: BlockId, to: BlockId) -> bool {
        let mut visited = vec![false; self.blocks.len()];
        let mut stack = vec![from];

        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if visited[current.slot()] {
                continue;
            }
            visited[current.slot()] = true;

            if let Some(sources) = self.connections.get(&current) {
                stack.extend(sources.iter().copied());
            }
        }
        false
    }
}

/// Recursive pull evaluation. Free function so the arena can be borrowed
/// mutably while the dependency table is borrowed shared.
fn evaluate(
    blocks: &mut [Box<dyn Block + Send>],
    connections: &HashMap<BlockId, Vec<BlockId>>,
    id: BlockId,
    input: f64,
    cache: &mut PassCache,
) -> Result<f64, GraphError> {
    if let Some(cached) = cache.get(id) {
        return Ok(cached);
    }

    let inputs = match connections.get(&id) {
        Some(sources) => sources
            .iter()
            .map(|&source| evaluate(blocks, connections, source, input, cache))
            .collect::<Result<Vec<f64>, GraphError>>()?,
        None => vec![input],
    };

    let block = &mut blocks[id.slot()];
    let output = block.process(&inputs)?;
    #[cfg(feature = "tracing")]
    tracing::trace!("graph_eval: '{}' {inputs:?} -> {output}", block.name());
    cache.store(id, output);
    Ok(output)
}
