//! Code resolution: describing an address that lies in executable memory.

use tracing::trace;

use crate::analysis::memory::{MemoryError, MemoryView};
use crate::core::catalog::RegionCatalog;
use crate::core::code_location::CodeLocation;
use crate::core::disassembler::{Disassembler, DisassemblerError, DisassemblerResult};

/// The disassemble primitive the walker consumes.
pub trait CodeResolver {
    /// Describe the instruction at `address`.
    fn disassemble(&self, address: u64) -> DisassemblerResult<CodeLocation>;
}

impl<F> CodeResolver for F
where
    F: Fn(u64) -> DisassemblerResult<CodeLocation>,
{
    fn disassemble(&self, address: u64) -> DisassemblerResult<CodeLocation> {
        self(address)
    }
}

/// Decodes code addresses by fetching bytes from target memory.
///
/// The fetch window is the backend's maximum instruction length, clamped to
/// the end of the containing region so reads never cross into unmapped
/// memory.
pub struct MemoryDisassembler<'a, M, D> {
    memory: M,
    backend: D,
    catalog: &'a RegionCatalog,
}

impl<'a, M: MemoryView, D: Disassembler> MemoryDisassembler<'a, M, D> {
    pub fn new(memory: M, backend: D, catalog: &'a RegionCatalog) -> Self {
        Self {
            memory,
            backend,
            catalog,
        }
    }

    pub fn backend(&self) -> &D {
        &self.backend
    }
}

impl<M: MemoryView, D: Disassembler> CodeResolver for MemoryDisassembler<'_, M, D> {
    fn disassemble(&self, address: u64) -> DisassemblerResult<CodeLocation> {
        let region = self
            .catalog
            .find(address)
            .map_err(|e| DisassemblerError::Unreadable(e.to_string()))?;
        let window = (self.backend.max_instruction_length() as u64).min(region.remaining_from(address));
        let bytes = match self.memory.read_bytes(address, window as usize) {
            Ok(bytes) => bytes,
            // Fewer bytes than a full window may still hold one instruction.
            Err(MemoryError::ShortRead { got, .. }) if got > 0 => self
                .memory
                .read_bytes(address, got)
                .map_err(|e| DisassemblerError::Unreadable(e.to_string()))?,
            Err(e) => return Err(DisassemblerError::Unreadable(e.to_string())),
        };
        trace!(
            address = format_args!("{:#x}", address),
            window,
            backend = self.backend.name(),
            "decoding"
        );
        self.backend.decode(address, &bytes)
    }
}
