#![no_main]
use libfuzzer_sys::fuzz_target;
use refchain::core::catalog::RegionCatalog;

fuzz_target!(|data: &[u8]| {
    if let Ok(catalog) = RegionCatalog::from_reader(data) {
        for region in catalog.iter() {
            assert!(region.start < region.end);
            let _ = catalog.find(region.start);
        }
    }
});
