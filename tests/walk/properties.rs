//! Invariants that must hold for every successfully returned chain.
//!
//! Random memory images are generated over a fixed catalog: each readable
//! word points into a data region, into code, or at unmapped memory.

use crate::common::{catalog, reader, stub_code, Lcg};
use refchain::core::catalog::RegionCatalog;
use refchain::core::chain::{PointerChain, Resolved, Termination};
use refchain::{walk, InspectError};
use std::collections::HashSet;

const LISTING: &str = "\
1000-1100 rw-p
2000-2100 r--p
3000-3100 r-xp
4000-4100 rw-s
";

const SLOTS: u64 = 4;

fn random_image(rng: &mut Lcg) -> Vec<(u64, u64)> {
    let bases = [0x1000u64, 0x2000, 0x4000];
    let targets = [0x1000u64, 0x2000, 0x3000, 0x4000, 0x5000, 0x0];
    let mut pairs = Vec::new();
    for base in bases {
        for slot in 0..SLOTS {
            let target = targets[rng.below(targets.len() as u64) as usize];
            pairs.push((base + slot * 8, target + rng.below(SLOTS) * 8));
        }
    }
    pairs
}

fn check(chain: &PointerChain, catalog: &RegionCatalog) {
    assert!(chain.is_well_formed(), "malformed chain: {:?}", chain);

    for node in chain.nodes() {
        assert!(node.region.contains(node.address));
        assert_eq!(catalog.find(node.address).unwrap(), &node.region);
    }

    let unique: HashSet<u64> = chain.addresses().collect();
    assert_eq!(unique.len(), chain.len());

    let last = chain.last();
    match chain.terminated_by() {
        Termination::Cycle => {
            let target = chain.cycle_target().unwrap();
            assert_eq!(chain.addresses().filter(|a| *a == target).count(), 1);
        }
        Termination::CodeTail => {
            assert!(last.region.perms.has_execute());
            assert!(matches!(last.resolved, Resolved::Code(_)));
        }
        Termination::UnmappedTail => {
            assert!(!last.region.perms.has_execute());
            let value = chain.unmapped_value().unwrap();
            assert!(catalog.find(value).is_err());
        }
    }
}

#[test]
fn random_images_yield_well_formed_chains() {
    let catalog = catalog(LISTING);
    let mut rng = Lcg::new(0x5eed);
    let mut seen = HashSet::new();

    for _ in 0..500 {
        let image = random_image(&mut rng);
        let r = reader(&image);
        let seed = image[rng.below(image.len() as u64) as usize].0;
        let chain = walk(seed, &catalog, &r, &stub_code).unwrap();
        check(&chain, &catalog);
        seen.insert(chain.terminated_by());
    }

    // The generator reaches every terminal state.
    assert_eq!(seen.len(), 3);
}

#[test]
fn unmapped_seeds_always_fail() {
    let catalog = catalog(LISTING);
    let r = reader(&[]);
    for seed in [0u64, 0xfff, 0x1100, 0x2100, 0x3100, 0x4100, u64::MAX] {
        let err = walk(seed, &catalog, &r, &stub_code).unwrap_err();
        assert!(matches!(err, InspectError::AddressNotMapped(a) if a == seed));
    }
}

#[test]
fn find_is_stable_across_calls() {
    let catalog = catalog(LISTING);
    for addr in [0x1000u64, 0x20ff, 0x3050, 0x4000] {
        assert_eq!(catalog.find(addr).unwrap(), catalog.find(addr).unwrap());
    }
}
