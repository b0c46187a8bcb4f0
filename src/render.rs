//! Presentation boundary for pointer chains.
//!
//! Renderers see a chain only through [`ChainFormattable`]: one entry per
//! node carrying its address and region, and a value for the terminal node
//! only. Cycles carry no value; they are signaled by `terminated_by`.
//! Colors and widths are left to the caller, which receives styled tokens.

use serde::{Deserialize, Serialize};

use crate::core::chain::{PointerChain, Termination};
use crate::core::code_location::CodeLocation;
use crate::core::region::MemoryRegion;
use crate::error::{InspectError, Result};

/// Terminal value of a chain as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayValue<'a> {
    Pointer(u64),
    Code(&'a CodeLocation),
}

/// One displayable hop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayEntry<'a> {
    pub address: u64,
    pub region: &'a MemoryRegion,
    /// Present on the last entry only, and absent for cycles
    pub value: Option<DisplayValue<'a>>,
}

/// Anything that can be shown as a chain of hops.
pub trait ChainFormattable {
    fn entries(&self) -> Vec<DisplayEntry<'_>>;
}

impl ChainFormattable for PointerChain {
    fn entries(&self) -> Vec<DisplayEntry<'_>> {
        let Some((tail, body)) = self.nodes().split_last() else {
            return Vec::new();
        };
        let tail_value = match self.terminated_by() {
            Termination::Cycle => None,
            Termination::UnmappedTail => tail.resolved.as_pointer().map(DisplayValue::Pointer),
            Termination::CodeTail => tail.resolved.as_code().map(DisplayValue::Code),
        };
        body.iter()
            .map(|node| DisplayEntry {
                address: node.address,
                region: &node.region,
                value: None,
            })
            .chain(std::iter::once(DisplayEntry {
                address: tail.address,
                region: &tail.region,
                value: tail_value,
            }))
            .collect()
    }
}

/// How an address should be highlighted, from its region's permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressStyle {
    Code,
    Data,
    ReadOnly,
    Plain,
}

impl AddressStyle {
    pub fn for_region(region: &MemoryRegion) -> Self {
        let perms = region.perms;
        if perms.has_execute() {
            AddressStyle::Code
        } else if perms.has_write() {
            AddressStyle::Data
        } else if perms.has_read() {
            AddressStyle::ReadOnly
        } else {
            AddressStyle::Plain
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Address(AddressStyle),
    Separator,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Plain-text chain renderer: `0x1000 : 0x2000 : 0x9999`.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    separator: String,
    cycle_marker: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            separator: " : ".to_string(),
            cycle_marker: "...".to_string(),
        }
    }
}

impl TextRenderer {
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Styled tokens for a chain, for callers that colorize.
    pub fn tokens<F: ChainFormattable + ?Sized>(&self, chain: &F) -> Vec<Token> {
        let entries = chain.entries();
        let mut out = Vec::with_capacity(entries.len() * 2 + 1);
        let last = entries.len().saturating_sub(1);

        for (i, entry) in entries.iter().enumerate() {
            out.push(Token::new(
                TokenKind::Address(AddressStyle::for_region(entry.region)),
                format!("{:#x}", entry.address),
            ));
            if i < last {
                out.push(Token::new(TokenKind::Separator, self.separator.clone()));
                continue;
            }
            match entry.value {
                // Code reads as `addr insn`, no separator.
                Some(DisplayValue::Code(loc)) => {
                    out.push(Token::new(TokenKind::Text, " "));
                    out.push(Token::new(TokenKind::Text, loc.text()));
                }
                Some(DisplayValue::Pointer(value)) => {
                    out.push(Token::new(TokenKind::Separator, self.separator.clone()));
                    out.push(Token::new(TokenKind::Text, format!("{:#x}", value)));
                }
                None => {
                    out.push(Token::new(TokenKind::Separator, self.separator.clone()));
                    out.push(Token::new(TokenKind::Text, self.cycle_marker.clone()));
                }
            }
        }
        out
    }

    pub fn render<F: ChainFormattable + ?Sized>(&self, chain: &F) -> String {
        self.tokens(chain).into_iter().map(|t| t.text).collect()
    }
}

/// Serializable summary of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainReport {
    pub seed: u64,
    pub terminated_by: Termination,
    pub hops: Vec<HopReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopReport {
    pub address: u64,
    pub region: String,
    pub style: AddressStyle,
    pub value: Option<String>,
}

impl ChainReport {
    pub fn from_chain(chain: &PointerChain) -> Self {
        let hops = chain
            .entries()
            .into_iter()
            .map(|e| HopReport {
                address: e.address,
                region: e.region.to_string(),
                style: AddressStyle::for_region(e.region),
                value: e.value.map(|v| match v {
                    DisplayValue::Pointer(p) => format!("{:#x}", p),
                    DisplayValue::Code(loc) => loc.text(),
                }),
            })
            .collect();
        Self {
            seed: chain.seed(),
            terminated_by: chain.terminated_by(),
            hops,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| InspectError::Serialization(e.to_string()))
    }
}
