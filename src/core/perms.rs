//! Access permissions of a mapped region.

use serde::{Deserialize, Serialize};
use std::fmt;

const READ: u8 = 1;
const WRITE: u8 = 2;
const EXECUTE: u8 = 4;
const SHARED: u8 = 8;

/// Permission flags for memory regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Perms {
    /// Raw permission bits: read=1, write=2, execute=4, shared=8
    pub bits: u8,
}

impl Perms {
    /// Create a new private mapping permission set
    pub fn new(read: bool, write: bool, execute: bool) -> Self {
        let mut bits = 0u8;
        if read {
            bits |= READ;
        }
        if write {
            bits |= WRITE;
        }
        if execute {
            bits |= EXECUTE;
        }
        Self { bits }
    }

    /// Mark the mapping as shared (`s` in the fourth column)
    pub fn shared(mut self) -> Self {
        self.bits |= SHARED;
        self
    }

    /// Parse a permission token such as `r-xp` or `rw-`.
    ///
    /// Only `r`, `w`, `x` carry meaning for the walker; `p`/`s` is kept for
    /// display. Returns the offending character on failure.
    pub fn parse(token: &str) -> Result<Self, char> {
        let mut perms = Perms::default();
        for c in token.chars() {
            match c {
                'r' => perms.bits |= READ,
                'w' => perms.bits |= WRITE,
                'x' => perms.bits |= EXECUTE,
                's' => perms.bits |= SHARED,
                '-' | 'p' => {}
                other => return Err(other),
            }
        }
        Ok(perms)
    }

    /// Check if region has read permission
    pub fn has_read(&self) -> bool {
        (self.bits & READ) != 0
    }

    /// Check if region has write permission
    pub fn has_write(&self) -> bool {
        (self.bits & WRITE) != 0
    }

    /// Check if region has execute permission
    pub fn has_execute(&self) -> bool {
        (self.bits & EXECUTE) != 0
    }

    /// Check if the mapping is shared rather than private
    pub fn is_shared(&self) -> bool {
        (self.bits & SHARED) != 0
    }

    /// Check if region is readable and writable (data region)
    pub fn is_data(&self) -> bool {
        self.has_read() && self.has_write() && !self.has_execute()
    }

    /// Check if region is readable and executable (code region)
    pub fn is_code(&self) -> bool {
        self.has_read() && self.has_execute() && !self.has_write()
    }

    /// Check if region is read-only
    pub fn is_readonly(&self) -> bool {
        self.has_read() && !self.has_write() && !self.has_execute()
    }
}

impl fmt::Display for Perms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut perms = String::with_capacity(4);
        perms.push(if self.has_read() { 'r' } else { '-' });
        perms.push(if self.has_write() { 'w' } else { '-' });
        perms.push(if self.has_execute() { 'x' } else { '-' });
        perms.push(if self.is_shared() { 's' } else { 'p' });
        write!(f, "{}", perms)
    }
}
