//! Pointer chain inspection for running processes.
//!
//! Given a snapshot of a process's mapped regions and a way to read
//! pointer-sized values, follow the chain of dereferences starting at an
//! address and report how it ends: in code, in unmapped memory, or in a
//! cycle.

/// Core data types: regions, catalogs, chains
pub mod core;

/// Walker and the memory/code primitives it consumes
pub mod analysis;

/// Decoder backends
pub mod disasm;

pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod timeout;

#[cfg(unix)]
pub mod process;
#[cfg(unix)]
pub mod session;

pub use crate::analysis::walker::{walk, walk_with_deadline};
pub use crate::core::catalog::RegionCatalog;
pub use crate::core::chain::{ChainNode, PointerChain, Resolved, Termination};
pub use crate::core::region::MemoryRegion;
pub use crate::error::{InspectError, Result};
