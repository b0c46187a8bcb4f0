use refchain::core::catalog::RegionCatalog;
use refchain::InspectError;
use std::fs::File;
use std::io::{BufReader, Write};
use tempfile::NamedTempFile;

const SAMPLE_MAPS: &str = include_str!("../samples/maps/x86_64-cat.maps");

fn catalog_from_file(content: &str) -> refchain::Result<RegionCatalog> {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    let file = File::open(temp_file.path()).unwrap();
    RegionCatalog::from_reader(BufReader::new(file))
}

#[test]
fn parses_real_listing() {
    let catalog = catalog_from_file(SAMPLE_MAPS).unwrap();
    assert_eq!(catalog.len(), SAMPLE_MAPS.lines().count());

    let heap = catalog
        .iter()
        .find(|r| r.backing.as_deref() == Some("[heap]"))
        .expect("heap region");
    assert!(heap.perms.is_data());

    let text = catalog.find(0x55d4a0c03000).unwrap();
    assert!(text.perms.is_code());
    assert_eq!(text.backing.as_deref(), Some("/usr/bin/cat"));

    let vsyscall = catalog.find(0xffffffffff600000).unwrap();
    assert!(vsyscall.perms.has_execute());
    assert!(!vsyscall.perms.has_read());
}

#[test]
fn listing_order_is_preserved() {
    let catalog = catalog_from_file(SAMPLE_MAPS).unwrap();
    let starts: Vec<u64> = catalog.iter().map(|r| r.start).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
    for pair in catalog.regions().windows(2) {
        assert!(!pair[0].overlaps(&pair[1]));
    }
}

#[test]
fn display_round_trips_through_parser() {
    let catalog = catalog_from_file(SAMPLE_MAPS).unwrap();
    let reparsed: RegionCatalog = catalog.to_string().parse().unwrap();
    assert_eq!(reparsed.len(), catalog.len());
    for (a, b) in catalog.iter().zip(reparsed.iter()) {
        assert_eq!((a.start, a.end, a.perms, &a.backing), (b.start, b.end, b.perms, &b.backing));
    }
}

#[test]
fn malformed_file_fails_whole_build() {
    let err = catalog_from_file("1000-2000 rw-p\n3000-zzzz rw-p\n").unwrap_err();
    assert!(matches!(err, InspectError::MalformedRegion { line: 2, .. }));
}
