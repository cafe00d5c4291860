//! System table, handles, and last-error bookkeeping.

use std::collections::HashMap;

use sigflow_core::{
    BlockError, BlockId, EvalPolicy, FirFilter, GraphError, IirFilter, ProcessingSystem, Summator,
};
use thiserror::Error;

/// Opaque key for a [`ProcessingSystem`] owned by a [`SystemTable`].
///
/// Handles are issued sequentially starting at 1 and never reused, so a
/// destroyed system's handle stays invalid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SystemHandle(u64);

impl SystemHandle {
    /// Returns the raw handle value.
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Reconstructs a handle from a raw value received from a host.
    ///
    /// The value is not validated here; table operations reject unknown
    /// handles.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl core::fmt::Display for SystemHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SystemHandle({})", self.0)
    }
}

/// Errors reported at the boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The handle does not name a live system.
    #[error("unknown system handle: {0}")]
    UnknownHandle(SystemHandle),

    /// Block construction failed.
    #[error(transparent)]
    Block(#[from] BlockError),

    /// Graph mutation or evaluation failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// `process_signal` was given buffers of different lengths.
    #[error("input has {input} samples but output has room for {output}")]
    LengthMismatch {
        /// Input length.
        input: usize,
        /// Output length.
        output: usize,
    },
}

/// Owner of every processing system reachable through a handle.
#[derive(Debug, Default)]
pub struct SystemTable {
    systems: HashMap<SystemHandle, ProcessingSystem>,
    next_handle: u64,
    last_error: Option<String>,
}

impl SystemTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live systems.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if no systems are live.
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Message of the most recent failed flat call, if the last call failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Borrows a live system.
    pub fn system(&self, handle: SystemHandle) -> Option<&ProcessingSystem> {
        self.systems.get(&handle)
    }

    /// Mutably borrows a live system.
    pub fn system_mut(&mut self, handle: SystemHandle) -> Option<&mut ProcessingSystem> {
        self.systems.get_mut(&handle)
    }

    // --- Lifecycle ---

    /// Creates an empty system and returns its handle.
    pub fn create_system(&mut self) -> SystemHandle {
        self.last_error = None;
        self.next_handle += 1;
        let handle = SystemHandle(self.next_handle);
        self.systems.insert(handle, ProcessingSystem::new());
        tracing::debug!("api_create: {handle}");
        handle
    }

    /// Destroys a system and releases its blocks.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnknownHandle`] if the handle is not live.
    pub fn try_destroy_system(&mut self, handle: SystemHandle) -> Result<(), ApiError> {
        if self.systems.remove(&handle).is_none() {
            return Err(ApiError::UnknownHandle(handle));
        }
        tracing::debug!("api_destroy: {handle}");
        Ok(())
    }

    /// Flat form of [`try_destroy_system()`](Self::try_destroy_system).
    pub fn destroy_system(&mut self, handle: SystemHandle) {
        self.last_error = None;
        let result = self.try_destroy_system(handle);
        self.settle("destroy_system", result);
    }

    // --- Registration ---

    /// Registers a FIR filter.
    ///
    /// # Errors
    ///
    /// Unknown handle, empty coefficients, or duplicate name.
    pub fn try_add_fir(
        &mut self,
        handle: SystemHandle,
        name: &str,
        coeffs: &[f64],
    ) -> Result<BlockId, ApiError> {
        let system = self.lookup(handle)?;
        let fir = FirFilter::new(name, coeffs.to_vec())?;
        Ok(system.add_block(Box::new(fir))?)
    }

    /// Flat form of [`try_add_fir()`](Self::try_add_fir).
    pub fn add_fir(&mut self, handle: SystemHandle, name: &str, coeffs: &[f64]) {
        self.last_error = None;
        let result = self.try_add_fir(handle, name, coeffs);
        self.settle("add_fir", result);
    }

    /// Registers an IIR filter with feed-forward `b` and feedback `a`.
    ///
    /// # Errors
    ///
    /// Unknown handle, empty `b`, or duplicate name.
    pub fn try_add_iir(
        &mut self,
        handle: SystemHandle,
        name: &str,
        b: &[f64],
        a: &[f64],
    ) -> Result<BlockId, ApiError> {
        let system = self.lookup(handle)?;
        let iir = IirFilter::new(name, b.to_vec(), a.to_vec())?;
        Ok(system.add_block(Box::new(iir))?)
    }

    /// Flat form of [`try_add_iir()`](Self::try_add_iir).
    pub fn add_iir(&mut self, handle: SystemHandle, name: &str, b: &[f64], a: &[f64]) {
        self.last_error = None;
        let result = self.try_add_iir(handle, name, b, a);
        self.settle("add_iir", result);
    }

    /// Registers a summator `u*x1 + v*x2`.
    ///
    /// # Errors
    ///
    /// Unknown handle or duplicate name.
    pub fn try_add_summator(
        &mut self,
        handle: SystemHandle,
        name: &str,
        u: f64,
        v: f64,
    ) -> Result<BlockId, ApiError> {
        let system = self.lookup(handle)?;
        Ok(system.add_block(Box::new(Summator::new(name, u, v)))?)
    }

    /// Flat form of [`try_add_summator()`](Self::try_add_summator).
    pub fn add_summator(&mut self, handle: SystemHandle, name: &str, u: f64, v: f64) {
        self.last_error = None;
        let result = self.try_add_summator(handle, name, u, v);
        self.settle("add_summator", result);
    }

    // --- Wiring ---

    /// Declares the ordered sources of `target`.
    ///
    /// # Errors
    ///
    /// Unknown handle, unknown names, or a cycle.
    pub fn try_connect(
        &mut self,
        handle: SystemHandle,
        target: &str,
        sources: &[&str],
    ) -> Result<(), ApiError> {
        Ok(self.lookup(handle)?.connect(target, sources)?)
    }

    /// Flat form of [`try_connect()`](Self::try_connect).
    pub fn connect(&mut self, handle: SystemHandle, target: &str, sources: &[&str]) {
        self.last_error = None;
        let result = self.try_connect(handle, target, sources);
        self.settle("connect", result);
    }

    /// Selects how shared upstream blocks are advanced.
    ///
    /// # Errors
    ///
    /// Unknown handle.
    pub fn try_set_policy(
        &mut self,
        handle: SystemHandle,
        policy: EvalPolicy,
    ) -> Result<(), ApiError> {
        self.lookup(handle)?.set_policy(policy);
        Ok(())
    }

    /// Flat form of [`try_set_policy()`](Self::try_set_policy).
    pub fn set_policy(&mut self, handle: SystemHandle, policy: EvalPolicy) {
        self.last_error = None;
        let result = self.try_set_policy(handle, policy);
        self.settle("set_policy", result);
    }

    // --- Evaluation ---

    /// Computes one block for one external input.
    ///
    /// # Errors
    ///
    /// Unknown handle, unknown block, or a block failure.
    pub fn try_compute_block(
        &mut self,
        handle: SystemHandle,
        name: &str,
        input: f64,
    ) -> Result<f64, ApiError> {
        Ok(self.lookup(handle)?.compute_block(name, input)?)
    }

    /// Flat form of [`try_compute_block()`](Self::try_compute_block).
    /// Returns `0.0` on failure.
    pub fn compute_block(&mut self, handle: SystemHandle, name: &str, input: f64) -> f64 {
        self.last_error = None;
        let result = self.try_compute_block(handle, name, input);
        self.settle("compute_block", result).unwrap_or(0.0)
    }

    /// Streams `input` through `name`, writing one output per sample.
    ///
    /// # Errors
    ///
    /// Length mismatch, unknown handle, unknown block, or a block failure.
    /// On a mid-stream failure earlier outputs stay written.
    pub fn try_process_signal(
        &mut self,
        handle: SystemHandle,
        name: &str,
        input: &[f64],
        output: &mut [f64],
    ) -> Result<(), ApiError> {
        if input.len() != output.len() {
            return Err(ApiError::LengthMismatch {
                input: input.len(),
                output: output.len(),
            });
        }
        Ok(self
            .lookup(handle)?
            .process_signal_into(name, input, output)?)
    }

    /// Flat form of [`try_process_signal()`](Self::try_process_signal).
    pub fn process_signal(
        &mut self,
        handle: SystemHandle,
        name: &str,
        input: &[f64],
        output: &mut [f64],
    ) {
        self.last_error = None;
        let result = self.try_process_signal(handle, name, input, output);
        self.settle("process_signal", result);
    }

    /// Clears the history of every block in the system.
    ///
    /// # Errors
    ///
    /// Unknown handle.
    pub fn try_reset_all(&mut self, handle: SystemHandle) -> Result<(), ApiError> {
        self.lookup(handle)?.reset_all();
        Ok(())
    }

    /// Flat form of [`try_reset_all()`](Self::try_reset_all).
    pub fn reset_all(&mut self, handle: SystemHandle) {
        self.last_error = None;
        let result = self.try_reset_all(handle);
        self.settle("reset_all", result);
    }

    // --- Internal ---

    fn lookup(&mut self, handle: SystemHandle) -> Result<&mut ProcessingSystem, ApiError> {
        self.systems
            .get_mut(&handle)
            .ok_or(ApiError::UnknownHandle(handle))
    }

    /// Records a failure as the last error and logs it.
    fn settle<T>(&mut self, op: &str, result: Result<T, ApiError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::error!("{op} failed: {err}");
                self.last_error = Some(err.to_string());
                None
            }
        }
    }
}
