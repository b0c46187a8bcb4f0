//! Common test utilities and fixtures.
//!
//! Builders for region catalogs, memory snapshots and a stub code resolver
//! shared by the integration tests.

#![allow(dead_code)]

use refchain::analysis::memory::{PointerView, SnapshotMemory};
use refchain::config::{PointerLayout, PointerWidth};
use refchain::core::catalog::RegionCatalog;
use refchain::core::code_location::CodeLocation;
use refchain::core::disassembler::{DisassemblerResult, Endianness};

/// 64-bit little-endian layout used by most fixtures
pub fn le64() -> PointerLayout {
    PointerLayout::new(PointerWidth::Eight, Endianness::Little)
}

/// Parse a catalog from a listing, panicking on malformed input
pub fn catalog(listing: &str) -> RegionCatalog {
    listing.parse().expect("fixture listing parses")
}

/// Snapshot memory holding the given `(address, pointer)` pairs
pub fn pointers(pairs: &[(u64, u64)]) -> SnapshotMemory {
    pairs
        .iter()
        .fold(SnapshotMemory::new(), |mem, &(addr, value)| {
            mem.with_pointer(addr, value, le64())
        })
}

/// Pointer reader over the given `(address, pointer)` pairs
pub fn reader(pairs: &[(u64, u64)]) -> PointerView<SnapshotMemory> {
    PointerView::new(pointers(pairs), le64())
}

/// Code resolver that describes every address as `nop`
pub fn stub_code(address: u64) -> DisassemblerResult<CodeLocation> {
    Ok(CodeLocation::new(address, vec![0x90], "nop", "", "x86_64"))
}

/// Small deterministic generator for property-style tests
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 17
    }

    pub fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}
