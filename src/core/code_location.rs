//! Symbolic description of a code address.
//!
//! A `CodeLocation` is what a pointer chain reports when it lands inside an
//! executable region: the first decoded instruction at that address.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Decoded instruction at a code address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeLocation {
    /// Address where this instruction is located
    pub address: u64,
    /// Raw bytes of the instruction
    pub bytes: Vec<u8>,
    /// Instruction mnemonic (e.g., "mov", "add", "jmp")
    pub mnemonic: String,
    /// Operand text as printed by the backend
    pub operands: String,
    /// Architecture name this instruction belongs to
    pub arch: String,
}

impl CodeLocation {
    pub fn new(
        address: u64,
        bytes: Vec<u8>,
        mnemonic: impl Into<String>,
        operands: impl Into<String>,
        arch: impl Into<String>,
    ) -> Self {
        Self {
            address,
            bytes,
            mnemonic: mnemonic.into(),
            operands: operands.into(),
            arch: arch.into(),
        }
    }

    /// Length of the instruction in bytes
    pub fn length(&self) -> usize {
        self.bytes.len()
    }

    /// Address of the following instruction
    pub fn end_address(&self) -> u64 {
        self.address.wrapping_add(self.bytes.len() as u64)
    }

    /// Instruction text without address, e.g. `mov rax, rbx`
    pub fn text(&self) -> String {
        self.to_string()
    }

    /// Full listing line with address and hex bytes
    pub fn disassembly(&self) -> String {
        let mut result = format!("{:08x}: ", self.address);

        for (i, byte) in self.bytes.iter().enumerate() {
            if i > 0 {
                result.push(' ');
            }
            result.push_str(&format!("{:02x}", byte));
        }

        // Pad to align mnemonics
        while result.len() < 30 {
            result.push(' ');
        }

        result.push_str(&self.text());
        result
    }
}

impl fmt::Display for CodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operands.is_empty() {
            write!(f, "{}", self.mnemonic)
        } else {
            write!(f, "{} {}", self.mnemonic, self.operands)
        }
    }
}
