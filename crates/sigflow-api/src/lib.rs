//! Handle-based boundary for embedding sigflow processing systems.
//!
//! Hosts that cannot hold Rust values directly (scripting bridges, plugin
//! shells, FFI shims) address systems through an opaque [`SystemHandle`]
//! issued by a [`SystemTable`]. The table owns every system; a handle is only a
//! key, so a stale or forged handle yields [`ApiError::UnknownHandle`] instead
//! of touching freed memory.
//!
//! Each operation comes in two flavours:
//!
//! - `try_*` returns a `Result` for Rust callers.
//! - The flat form (`add_fir`, `compute_block`, ...) never fails. It clears the
//!   last error on entry, records the message on failure, and returns a
//!   default (`0.0` for computations). Read the message with
//!   [`SystemTable::last_error()`].
//!
//! ```rust
//! use sigflow_api::SystemTable;
//!
//! let mut table = SystemTable::new();
//! let sys = table.create_system();
//! table.add_fir(sys, "Filter1", &[0.5, 0.5]);
//! assert!(table.last_error().is_none());
//!
//! assert_eq!(table.compute_block(sys, "Filter1", 10.0), 5.0);
//!
//! table.connect(sys, "Filter1", &["GhostBlock"]);
//! assert!(table.last_error().is_some());
//!
//! table.destroy_system(sys);
//! ```

mod table;

pub use table::{ApiError, SystemHandle, SystemTable};
