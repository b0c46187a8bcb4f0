//! Pointer chain types produced by the walker.
//!
//! A `PointerChain` is the ordered list of addresses visited while
//! repeatedly dereferencing from a seed, together with the reason the walk
//! stopped. Chains are plain values: each node carries its own copy of the
//! region it was found in, so a chain outlives the catalog that built it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::core::code_location::CodeLocation;
use crate::core::region::MemoryRegion;

/// What a visited address resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolved {
    /// Pointer-sized value read at the address: the next address to visit
    Pointer(u64),
    /// Address lies in executable memory; the walk stopped here
    Code(CodeLocation),
}

impl Resolved {
    pub fn as_pointer(&self) -> Option<u64> {
        match self {
            Resolved::Pointer(value) => Some(*value),
            Resolved::Code(_) => None,
        }
    }

    pub fn as_code(&self) -> Option<&CodeLocation> {
        match self {
            Resolved::Code(loc) => Some(loc),
            Resolved::Pointer(_) => None,
        }
    }
}

/// Why a chain stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Termination {
    /// Last value points back at an address already in the chain
    Cycle,
    /// Last value points at memory no region covers
    UnmappedTail,
    /// Last address lies in an executable region
    CodeTail,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Cycle => write!(f, "cycle"),
            Termination::UnmappedTail => write!(f, "unmapped-tail"),
            Termination::CodeTail => write!(f, "code-tail"),
        }
    }
}

/// One hop of a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainNode {
    /// Address visited at this hop
    pub address: u64,
    /// Region containing `address`
    pub region: MemoryRegion,
    /// Value found at `address`
    pub resolved: Resolved,
}

/// A completed, terminated pointer chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChain")]
pub struct PointerChain {
    nodes: Vec<ChainNode>,
    terminated_by: Termination,
}

/// Unchecked wire form; converted through `PointerChain::new`.
#[derive(Deserialize)]
struct RawChain {
    nodes: Vec<ChainNode>,
    terminated_by: Termination,
}

impl TryFrom<RawChain> for PointerChain {
    type Error = String;

    fn try_from(raw: RawChain) -> Result<Self, Self::Error> {
        PointerChain::new(raw.nodes, raw.terminated_by)
            .ok_or_else(|| "pointer chain has no nodes".to_string())
    }
}

impl PointerChain {
    /// Assemble a chain. Returns `None` for an empty node list, which is
    /// never a valid chain.
    pub fn new(nodes: Vec<ChainNode>, terminated_by: Termination) -> Option<Self> {
        if nodes.is_empty() {
            return None;
        }
        Some(Self {
            nodes,
            terminated_by,
        })
    }

    pub fn nodes(&self) -> &[ChainNode] {
        &self.nodes
    }

    pub fn terminated_by(&self) -> Termination {
        self.terminated_by
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First visited address
    pub fn seed(&self) -> u64 {
        self.nodes[0].address
    }

    /// Terminal node
    pub fn last(&self) -> &ChainNode {
        &self.nodes[self.nodes.len() - 1]
    }

    /// Visited addresses in order
    pub fn addresses(&self) -> impl Iterator<Item = u64> + '_ {
        self.nodes.iter().map(|n| n.address)
    }

    /// Address the chain loops back to, for cycle chains
    pub fn cycle_target(&self) -> Option<u64> {
        match self.terminated_by {
            Termination::Cycle => self.last().resolved.as_pointer(),
            _ => None,
        }
    }

    /// Unmapped value the chain ended on, for unmapped-tail chains
    pub fn unmapped_value(&self) -> Option<u64> {
        match self.terminated_by {
            Termination::UnmappedTail => self.last().resolved.as_pointer(),
            _ => None,
        }
    }

    /// Code location the chain ended on, for code-tail chains
    pub fn code(&self) -> Option<&CodeLocation> {
        match self.terminated_by {
            Termination::CodeTail => self.last().resolved.as_code(),
            _ => None,
        }
    }

    /// Check the structural invariants of a finished chain.
    ///
    /// Every node lies in its region, every non-terminal node points at the
    /// next node, no address repeats, and the terminal value agrees with
    /// `terminated_by`.
    pub fn is_well_formed(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !node.region.contains(node.address) || !seen.insert(node.address) {
                return false;
            }
        }
        let links_ok = self
            .nodes
            .windows(2)
            .all(|w| w[0].resolved.as_pointer() == Some(w[1].address));
        if !links_ok {
            return false;
        }

        let last = self.last();
        match (&self.terminated_by, &last.resolved) {
            (Termination::Cycle, Resolved::Pointer(target)) => seen.contains(target),
            (Termination::UnmappedTail, Resolved::Pointer(target)) => {
                !seen.contains(target) && !last.region.perms.has_execute()
            }
            (Termination::CodeTail, Resolved::Code(_)) => last.region.perms.has_execute(),
            _ => false,
        }
    }
}
