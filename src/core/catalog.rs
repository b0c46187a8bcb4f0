//! RegionCatalog: the frozen set of regions of one inspection session.
//!
//! A catalog is built once from a region listing and is never patched; a
//! fresh inspection builds a fresh catalog. Lookups are therefore pure and
//! the catalog can be shared across threads without locking.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;
use tracing::debug;

use crate::core::region::MemoryRegion;
use crate::error::{InspectError, Result};

/// Ordered, immutable collection of mapped regions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCatalog {
    regions: Vec<MemoryRegion>,
}

impl RegionCatalog {
    /// Build a catalog from already-constructed regions, kept in the given order.
    ///
    /// The source is trusted to be disjoint; nothing is merged or sorted.
    pub fn from_regions(regions: Vec<MemoryRegion>) -> Self {
        Self { regions }
    }

    /// Parse a listing stream, one region per line.
    ///
    /// I/O failures are returned as `InspectError::Io`; callers that know the
    /// target pid map them to `CatalogUnavailable`.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut regions = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            match MemoryRegion::parse_line(&line) {
                Ok(Some(region)) => regions.push(region),
                Ok(None) => {}
                Err(message) => {
                    return Err(InspectError::MalformedRegion {
                        line: idx + 1,
                        message,
                    })
                }
            }
        }
        debug!(regions = regions.len(), "parsed region listing");
        Ok(Self { regions })
    }

    /// Return the region containing `address`.
    ///
    /// Regions are scanned in catalog order and the first match wins.
    pub fn find(&self, address: u64) -> Result<&MemoryRegion> {
        self.regions
            .iter()
            .find(|r| r.contains(address))
            .ok_or(InspectError::AddressNotMapped(address))
    }

    /// True if some region contains `address`
    pub fn is_mapped(&self, address: u64) -> bool {
        self.find(address).is_ok()
    }

    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MemoryRegion> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl FromStr for RegionCatalog {
    type Err = InspectError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes())
    }
}

impl<'a> IntoIterator for &'a RegionCatalog {
    type Item = &'a MemoryRegion;
    type IntoIter = std::slice::Iter<'a, MemoryRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

impl fmt::Display for RegionCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for region in &self.regions {
            writeln!(f, "{}", region)?;
        }
        Ok(())
    }
}
