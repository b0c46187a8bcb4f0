//! MemoryRegion: one mapped span of a process's address space.
//!
//! Regions are built from one line of a per-process memory-map listing and
//! never change afterwards. The range is half-open: `start` is inside,
//! `end` is not.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::perms::Perms;

/// Extra columns present in the full kernel listing format
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MappingDetail {
    /// Offset into the backing file
    pub offset: u64,
    /// Device as `major:minor`
    pub device: String,
    /// Inode of the backing file, 0 for anonymous mappings
    pub inode: u64,
}

/// A contiguous, permission-tagged span of address space
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryRegion {
    /// First address of the region (inclusive)
    pub start: u64,
    /// End of the region (exclusive)
    pub end: u64,
    /// Access permissions
    pub perms: Perms,
    /// Backing file or pseudo-name such as `[heap]`; `None` when anonymous
    pub backing: Option<String>,
    /// Offset/device/inode columns when the listing carried them
    pub detail: Option<MappingDetail>,
}

impl MemoryRegion {
    /// Create a region; `start` must be below `end`.
    pub fn new(start: u64, end: u64, perms: Perms, backing: Option<String>) -> Result<Self, String> {
        if start >= end {
            return Err(format!("empty or inverted range {:#x}-{:#x}", start, end));
        }
        Ok(Self {
            start,
            end,
            perms,
            backing: backing.filter(|b| !b.is_empty()),
            detail: None,
        })
    }

    /// Attach the full-format columns
    pub fn with_detail(mut self, detail: MappingDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Parse one listing line.
    ///
    /// Accepts `start-end perms offset dev inode [path]` as well as the
    /// short `start-end perms [path]`. Blank lines yield `Ok(None)`.
    pub fn parse_line(line: &str) -> Result<Option<Self>, String> {
        let Some((range, rest)) = take_field(line) else {
            return Ok(None);
        };
        let (perms_tok, rest) =
            take_field(rest).ok_or_else(|| format!("missing permissions after '{}'", range))?;

        let (start_s, end_s) = range
            .split_once('-')
            .ok_or_else(|| format!("range '{}' is not start-end", range))?;
        let start = parse_hex(start_s)?;
        let end = parse_hex(end_s)?;
        let perms = Perms::parse(perms_tok)
            .map_err(|c| format!("unexpected permission character '{}' in '{}'", c, perms_tok))?;

        let (detail, path) = match parse_detail(rest) {
            Some((detail, path)) => (Some(detail), path),
            None => (None, rest),
        };
        let path = path.trim();
        let backing = (!path.is_empty()).then(|| path.to_string());

        let mut region = Self::new(start, end, perms, backing)?;
        region.detail = detail;
        Ok(Some(region))
    }

    /// Size of the region in bytes
    pub fn size(&self) -> u64 {
        self.end - self.start
    }

    /// Half-open containment check
    pub fn contains(&self, address: u64) -> bool {
        self.start <= address && address < self.end
    }

    /// Bytes remaining in the region from `address` onwards
    pub fn remaining_from(&self, address: u64) -> u64 {
        if self.contains(address) {
            self.end - address
        } else {
            0
        }
    }

    /// True when the region has no backing object
    pub fn is_anonymous(&self) -> bool {
        self.backing.is_none()
    }

    /// Check if this region overlaps another one
    pub fn overlaps(&self, other: &MemoryRegion) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}-{:#x} {}", self.start, self.end, self.perms)?;
        if let Some(backing) = &self.backing {
            write!(f, " {}", backing)?;
        }
        Ok(())
    }
}

fn take_field(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

fn parse_hex(s: &str) -> Result<u64, String> {
    let digits = s.trim_start_matches("0x");
    u64::from_str_radix(digits, 16).map_err(|e| format!("bad address '{}': {}", s, e))
}

/// Recognize the `offset dev inode` triple; anything else is treated as path text.
fn parse_detail(rest: &str) -> Option<(MappingDetail, &str)> {
    let (offset, rest) = take_field(rest)?;
    let (device, rest) = take_field(rest)?;
    let (inode, rest) = take_field(rest)?;
    if !device.contains(':') {
        return None;
    }
    let offset = u64::from_str_radix(offset, 16).ok()?;
    let inode = inode.parse::<u64>().ok()?;
    Some((
        MappingDetail {
            offset,
            device: device.to_string(),
            inode,
        },
        rest,
    ))
}
