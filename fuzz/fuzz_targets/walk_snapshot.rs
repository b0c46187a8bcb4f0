#![no_main]
use libfuzzer_sys::fuzz_target;
use refchain::analysis::memory::{PointerView, SnapshotMemory};
use refchain::config::{PointerLayout, PointerWidth};
use refchain::core::catalog::RegionCatalog;
use refchain::core::code_location::CodeLocation;
use refchain::core::disassembler::{DisassemblerResult, Endianness};

fn stub_code(address: u64) -> DisassemblerResult<CodeLocation> {
    Ok(CodeLocation::new(address, Vec::new(), "nop", "", "fuzz"))
}

// Arbitrary bytes become the contents of two small regions.
fuzz_target!(|data: &[u8]| {
    let catalog: RegionCatalog = match "1000-1100 rw-p\n2000-2100 r--p\n3000-3100 r-xp\n".parse() {
        Ok(c) => c,
        Err(_) => return,
    };
    let half = data.len() / 2;
    let mem = SnapshotMemory::new()
        .with_segment(0x1000, data[..half].to_vec())
        .with_segment(0x2000, data[half..].to_vec());
    let reader = PointerView::new(mem, PointerLayout::new(PointerWidth::Four, Endianness::Little));
    if let Ok(chain) = refchain::walk(0x1000, &catalog, &reader, &stub_code) {
        assert!(chain.is_well_formed());
    }
});
