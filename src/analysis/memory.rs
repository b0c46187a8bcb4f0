//! MemoryView: bounded reads of target memory by address.
//!
//! This trait and helpers allow analysis code to read bytes and
//! pointer-sized values from a target. Implementations should be
//! deterministic and enforce bounds to avoid panics.

use std::collections::BTreeMap;

use crate::config::{PointerLayout, PointerWidth};
use crate::core::disassembler::Endianness;

/// Errors that can occur during memory reads.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("address out of range: {0:#x}")]
    OutOfRange(u64),
    #[error("short read at {address:#x}: wanted {wanted} bytes, got {got}")]
    ShortRead {
        address: u64,
        wanted: usize,
        got: usize,
    },
    #[error("cannot read {address:#x}: {message}")]
    Access { address: u64, message: String },
}

/// Bounded memory reads by address.
pub trait MemoryView {
    /// Read `len` bytes starting at `addr`.
    fn read_bytes(&self, addr: u64, len: usize) -> Result<Vec<u8>, MemoryError>;

    /// Convenience: read a little/big-endian u32.
    fn read_u32(&self, addr: u64, endian: Endianness) -> Result<u32, MemoryError> {
        let b = self.read_bytes(addr, 4)?;
        let raw = [b[0], b[1], b[2], b[3]];
        Ok(match endian {
            Endianness::Little => u32::from_le_bytes(raw),
            Endianness::Big => u32::from_be_bytes(raw),
        })
    }

    /// Convenience: read a little/big-endian u64.
    fn read_u64(&self, addr: u64, endian: Endianness) -> Result<u64, MemoryError> {
        let b = self.read_bytes(addr, 8)?;
        let raw = [b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]];
        Ok(match endian {
            Endianness::Little => u64::from_le_bytes(raw),
            Endianness::Big => u64::from_be_bytes(raw),
        })
    }

    /// Read one pointer-sized value, zero-extended to u64.
    fn read_pointer_with(&self, addr: u64, layout: PointerLayout) -> Result<u64, MemoryError> {
        match layout.width {
            PointerWidth::Four => self.read_u32(addr, layout.endianness).map(u64::from),
            PointerWidth::Eight => self.read_u64(addr, layout.endianness),
        }
    }
}

impl<T: MemoryView + ?Sized> MemoryView for &T {
    fn read_bytes(&self, addr: u64, len: usize) -> Result<Vec<u8>, MemoryError> {
        (**self).read_bytes(addr, len)
    }
}

/// The pointer-read primitive the walker consumes.
pub trait PointerReader {
    /// Read one pointer-sized value at `address`.
    fn read_pointer(&self, address: u64) -> Result<u64, MemoryError>;
}

impl<F> PointerReader for F
where
    F: Fn(u64) -> Result<u64, MemoryError>,
{
    fn read_pointer(&self, address: u64) -> Result<u64, MemoryError> {
        self(address)
    }
}

/// Adapts a `MemoryView` into a `PointerReader` for a fixed layout.
pub struct PointerView<M> {
    memory: M,
    layout: PointerLayout,
}

impl<M: MemoryView> PointerView<M> {
    pub fn new(memory: M, layout: PointerLayout) -> Self {
        Self { memory, layout }
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn layout(&self) -> PointerLayout {
        self.layout
    }
}

impl<M: MemoryView> PointerReader for PointerView<M> {
    fn read_pointer(&self, address: u64) -> Result<u64, MemoryError> {
        self.memory.read_pointer_with(address, self.layout)
    }
}

/// In-memory snapshot of target memory as non-overlapping byte segments
/// keyed by base address.
#[derive(Debug, Clone, Default)]
pub struct SnapshotMemory {
    segments: BTreeMap<u64, Vec<u8>>,
}

impl SnapshotMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a segment of raw bytes at `base`.
    pub fn with_segment(mut self, base: u64, bytes: Vec<u8>) -> Self {
        self.segments.insert(base, bytes);
        self
    }

    /// Store a pointer value at `addr`, growing or creating a segment as needed.
    pub fn with_pointer(mut self, addr: u64, value: u64, layout: PointerLayout) -> Self {
        let bytes = match (layout.width, layout.endianness) {
            (PointerWidth::Four, Endianness::Little) => (value as u32).to_le_bytes().to_vec(),
            (PointerWidth::Four, Endianness::Big) => (value as u32).to_be_bytes().to_vec(),
            (PointerWidth::Eight, Endianness::Little) => value.to_le_bytes().to_vec(),
            (PointerWidth::Eight, Endianness::Big) => value.to_be_bytes().to_vec(),
        };

        let containing = self
            .segments
            .range(..=addr)
            .next_back()
            .filter(|(base, data)| addr - **base <= data.len() as u64)
            .map(|(base, _)| *base);

        match containing {
            Some(base) => {
                if let Some(data) = self.segments.get_mut(&base) {
                    let off = (addr - base) as usize;
                    if data.len() < off + bytes.len() {
                        data.resize(off + bytes.len(), 0);
                    }
                    data[off..off + bytes.len()].copy_from_slice(&bytes);
                }
            }
            None => {
                self.segments.insert(addr, bytes);
            }
        }
        self
    }
}

impl MemoryView for SnapshotMemory {
    fn read_bytes(&self, addr: u64, len: usize) -> Result<Vec<u8>, MemoryError> {
        if len == 0 {
            return Ok(Vec::new());
        }

        let (base, data) = self
            .segments
            .range(..=addr)
            .next_back()
            .ok_or(MemoryError::OutOfRange(addr))?;

        let start = (addr - base) as usize;
        if start >= data.len() {
            return Err(MemoryError::OutOfRange(addr));
        }
        let end = start.saturating_add(len);
        if end > data.len() {
            return Err(MemoryError::ShortRead {
                address: addr,
                wanted: len,
                got: data.len() - start,
            });
        }
        Ok(data[start..end].to_vec())
    }
}
