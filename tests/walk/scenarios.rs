//! Fixed scenarios for the chain walker.

use crate::common::{catalog, reader, stub_code};
use refchain::core::chain::{Resolved, Termination};
use refchain::render::{ChainFormattable, DisplayValue, TextRenderer};
use refchain::{walk, InspectError};

#[test]
fn data_pointer_into_code() {
    let catalog = catalog("1000-2000 rw-p\n2000-3000 r-xp\n");
    let chain = walk(0x1000, &catalog, &reader(&[(0x1000, 0x2000)]), &stub_code).unwrap();

    assert_eq!(chain.len(), 2);
    assert_eq!(chain.terminated_by(), Termination::CodeTail);
    assert_eq!(chain.nodes()[0].resolved, Resolved::Pointer(0x2000));
    assert!(chain.last().region.perms.has_execute());
    assert_eq!(chain.code().unwrap().mnemonic, "nop");
    assert_eq!(TextRenderer::default().render(&chain), "0x1000 : 0x2000 nop");
}

#[test]
fn pointer_to_unmapped_memory() {
    let catalog = catalog("1000-2000 rw-p\n");
    let chain = walk(0x1000, &catalog, &reader(&[(0x1000, 0x9999)]), &stub_code).unwrap();

    assert_eq!(chain.len(), 1);
    assert_eq!(chain.terminated_by(), Termination::UnmappedTail);
    assert_eq!(chain.last().resolved, Resolved::Pointer(0x9999));
    assert!(catalog.find(0x9999).is_err());

    let entries = chain.entries();
    assert_eq!(entries[0].value, Some(DisplayValue::Pointer(0x9999)));
    assert_eq!(TextRenderer::default().render(&chain), "0x1000 : 0x9999");
}

#[test]
fn self_referencing_pointer() {
    let catalog = catalog("1000-2000 rw-p\n");
    let chain = walk(0x1000, &catalog, &reader(&[(0x1000, 0x1000)]), &stub_code).unwrap();

    assert_eq!(chain.len(), 1);
    assert_eq!(chain.terminated_by(), Termination::Cycle);
    assert!(chain.entries()[0].value.is_none());
}

#[test]
fn unmapped_seed_produces_no_chain() {
    let catalog = catalog("1000-2000 rw-p\n2000-3000 r-xp\n");
    let err = walk(0x500, &catalog, &reader(&[]), &stub_code).unwrap_err();
    assert!(matches!(err, InspectError::AddressNotMapped(0x500)));
}

#[test]
fn long_chain_through_several_regions() {
    let catalog = catalog(
        "1000-2000 rw-p 00000000 00:00 0 [heap]\n\
         5000-6000 r--p 00000000 08:01 3 /lib/ld.so\n\
         7000-8000 rw-p 00000000 00:00 0 [stack]\n",
    );
    let r = reader(&[(0x7ff0, 0x1010), (0x1010, 0x5008), (0x5008, 0x7ff0)]);
    let chain = walk(0x7ff0, &catalog, &r, &stub_code).unwrap();

    assert_eq!(
        chain.addresses().collect::<Vec<_>>(),
        vec![0x7ff0, 0x1010, 0x5008]
    );
    assert_eq!(chain.terminated_by(), Termination::Cycle);
    assert_eq!(chain.cycle_target(), Some(0x7ff0));
    assert_eq!(chain.nodes()[2].region.backing.as_deref(), Some("/lib/ld.so"));
    assert!(chain.is_well_formed());
}

#[test]
fn region_boundary_is_exclusive() {
    let catalog = catalog("1000-2000 rw-p\n");
    // 0x2000 is one past the end of the only region.
    let chain = walk(0x1ff8, &catalog, &reader(&[(0x1ff8, 0x2000)]), &stub_code).unwrap();
    assert_eq!(chain.terminated_by(), Termination::UnmappedTail);
    assert_eq!(chain.unmapped_value(), Some(0x2000));
}

#[test]
fn unreadable_mapped_address_aborts() {
    // Mapped, but the snapshot holds no bytes for 0x3000.
    let catalog = catalog("1000-2000 rw-p\n3000-4000 rw-p\n");
    let err = walk(0x1000, &catalog, &reader(&[(0x1000, 0x3000)]), &stub_code).unwrap_err();
    assert!(matches!(err, InspectError::ReadFailed { address: 0x3000, .. }));
}

#[test]
fn chain_outlives_catalog() {
    let chain = {
        let catalog = catalog("1000-2000 rw-p\n");
        walk(0x1000, &catalog, &reader(&[(0x1000, 0x42)]), &stub_code).unwrap()
    };
    assert_eq!(chain.last().region.start, 0x1000);
}
