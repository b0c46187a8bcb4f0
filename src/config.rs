//! Configuration for an inspection session.
//!
//! Provides the pointer layout, decoder selection and procfs location with
//! defaults matching the machine the crate was built for.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::disassembler::{Architecture, Endianness};
use crate::disasm::registry::BackendKind;
use crate::error::{InspectError, Result};

/// Size of a pointer in the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerWidth {
    Four,
    Eight,
}

impl PointerWidth {
    pub fn bytes(&self) -> usize {
        match self {
            PointerWidth::Four => 4,
            PointerWidth::Eight => 8,
        }
    }

    pub fn for_arch(arch: Architecture) -> Self {
        if arch.is_64_bit() {
            PointerWidth::Eight
        } else {
            PointerWidth::Four
        }
    }
}

/// How a pointer-sized value is laid out in target memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerLayout {
    pub width: PointerWidth,
    pub endianness: Endianness,
}

impl PointerLayout {
    pub fn new(width: PointerWidth, endianness: Endianness) -> Self {
        Self { width, endianness }
    }

    /// Layout of the machine this crate was compiled for.
    pub fn host() -> Self {
        let width = if cfg!(target_pointer_width = "32") {
            PointerWidth::Four
        } else {
            PointerWidth::Eight
        };
        Self::new(width, Endianness::host())
    }
}

impl Default for PointerLayout {
    fn default() -> Self {
        Self::host()
    }
}

/// Master configuration for an inspection session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    /// Pointer width and byte order of the target.
    pub layout: PointerLayout,
    /// Instruction set used to describe code addresses.
    pub architecture: Architecture,
    /// Force a decoder backend instead of picking one per architecture.
    pub backend: Option<BackendKind>,
    /// Root of the process-information filesystem.
    pub proc_root: PathBuf,
    /// Optional deadline for a single walk. `None` walks until a terminal state.
    pub deadline_seconds: Option<u64>,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self::host()
    }
}

impl InspectConfig {
    /// Configuration describing the machine this crate was compiled for.
    pub fn host() -> Self {
        Self {
            layout: PointerLayout::host(),
            architecture: Architecture::host(),
            backend: None,
            proc_root: PathBuf::from("/proc"),
            deadline_seconds: None,
        }
    }

    /// Configuration for a target of a given architecture and byte order.
    pub fn for_target(architecture: Architecture, endianness: Endianness) -> Self {
        Self {
            layout: PointerLayout::new(PointerWidth::for_arch(architecture), endianness),
            architecture,
            ..Self::host()
        }
    }

    pub fn with_proc_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.proc_root = root.into();
        self
    }

    pub fn with_deadline(mut self, seconds: u64) -> Self {
        self.deadline_seconds = Some(seconds);
        self
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| InspectError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| InspectError::Serialization(e.to_string()))
    }
}
