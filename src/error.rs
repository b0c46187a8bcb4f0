//! Error types for pointer-chain inspection.
//!
//! This module provides structured error handling using thiserror. Only
//! fatal conditions live here: a chain that ends in a cycle, on unmapped
//! memory or inside code is a successful result, not an error.

use thiserror::Error;

use crate::analysis::memory::MemoryError;
use crate::core::disassembler::DisassemblerError;

/// Main error type for inspection operations.
#[derive(Debug, Error)]
pub enum InspectError {
    /// Target has no active execution context
    #[error("process {pid} is not running")]
    ProcessNotRunning { pid: u32 },

    /// Region listing of the target could not be opened or read
    #[error("region listing for process {pid} unavailable: {source}")]
    CatalogUnavailable {
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    /// A line of the region listing could not be parsed
    #[error("malformed region at line {line}: {message}")]
    MalformedRegion { line: usize, message: String },

    /// Seed address lies in no region
    #[error("address {0:#x} is not mapped")]
    AddressNotMapped(u64),

    /// A mapped address could not actually be read
    #[error("read failed at {address:#x}: {source}")]
    ReadFailed {
        address: u64,
        #[source]
        source: MemoryError,
    },

    /// The code service could not describe an executable address
    #[error("disassembly failed at {address:#x}: {source}")]
    Disassembly {
        address: u64,
        #[source]
        source: DisassemblerError,
    },

    /// Caller-imposed deadline elapsed
    #[error("walk exceeded its {budget:?} budget")]
    Timeout { budget: std::time::Duration },

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for inspection operations
pub type Result<T> = std::result::Result<T, InspectError>;

impl InspectError {
    /// True for conditions that end an inspection session outright.
    pub fn is_session_fatal(&self) -> bool {
        matches!(
            self,
            InspectError::ProcessNotRunning { .. } | InspectError::CatalogUnavailable { .. }
        )
    }
}
