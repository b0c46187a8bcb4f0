//! Disassembler trait and error types for instruction decoding.
//!
//! This module defines the Disassembler trait that provides a common interface
//! for the decoder backends in `crate::disasm`. A backend turns the bytes at a
//! code address into a `CodeLocation`, the terminal payload of a pointer chain
//! that lands in executable memory.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::core::code_location::CodeLocation;

/// Errors that can occur during disassembly operations
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum DisassemblerError {
    /// Invalid instruction bytes
    #[error("InvalidInstruction")]
    InvalidInstruction(),
    /// Insufficient bytes for complete instruction
    #[error("InsufficientBytes")]
    InsufficientBytes(),
    /// Unsupported architecture for the selected backend
    #[error("UnsupportedArchitecture")]
    UnsupportedArchitecture(),
    /// Bytes at the address could not be fetched
    #[error("Unreadable: {0}")]
    Unreadable(String),
    /// Internal disassembler error with message
    #[error("InternalError: {0}")]
    InternalError(String),
}

/// Result type for disassembly operations
pub type DisassemblerResult<T> = Result<T, DisassemblerError>;

/// Byte order of the inspected target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// Byte order of the machine this crate was compiled for.
    pub fn host() -> Self {
        if cfg!(target_endian = "big") {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endianness::Little => write!(f, "little"),
            Endianness::Big => write!(f, "big"),
        }
    }
}

/// Architecture types supported by disassemblers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Architecture {
    /// x86 (32-bit)
    X86,
    /// x86-64 (64-bit)
    X86_64,
    /// ARM (32-bit)
    ARM,
    /// ARM64/AArch64 (64-bit)
    ARM64,
    /// MIPS (32-bit)
    MIPS,
    /// MIPS64 (64-bit)
    MIPS64,
    /// PowerPC (32-bit)
    PPC,
    /// PowerPC64 (64-bit)
    PPC64,
    /// RISC-V (32-bit)
    RISCV,
    /// RISC-V (64-bit)
    RISCV64,
    /// Unknown/unsupported architecture
    Unknown,
}

impl Architecture {
    /// Get the address size in bits for this architecture
    pub fn address_bits(&self) -> u8 {
        match self {
            Architecture::X86
            | Architecture::ARM
            | Architecture::MIPS
            | Architecture::PPC
            | Architecture::RISCV => 32,
            Architecture::X86_64
            | Architecture::ARM64
            | Architecture::MIPS64
            | Architecture::PPC64
            | Architecture::RISCV64 => 64,
            Architecture::Unknown => 64, // Default to 64-bit
        }
    }

    /// Check if this is a 64-bit architecture
    pub fn is_64_bit(&self) -> bool {
        self.address_bits() == 64
    }

    /// Architecture of the machine this crate was compiled for.
    pub fn host() -> Self {
        if cfg!(target_arch = "x86_64") {
            Architecture::X86_64
        } else if cfg!(target_arch = "x86") {
            Architecture::X86
        } else if cfg!(target_arch = "aarch64") {
            Architecture::ARM64
        } else if cfg!(target_arch = "arm") {
            Architecture::ARM
        } else if cfg!(target_arch = "riscv64") {
            Architecture::RISCV64
        } else if cfg!(target_arch = "powerpc64") {
            Architecture::PPC64
        } else if cfg!(target_arch = "mips64") {
            Architecture::MIPS64
        } else {
            Architecture::Unknown
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::X86 => write!(f, "x86"),
            Architecture::X86_64 => write!(f, "x86_64"),
            Architecture::ARM => write!(f, "arm"),
            Architecture::ARM64 => write!(f, "arm64"),
            Architecture::MIPS => write!(f, "mips"),
            Architecture::MIPS64 => write!(f, "mips64"),
            Architecture::PPC => write!(f, "ppc"),
            Architecture::PPC64 => write!(f, "ppc64"),
            Architecture::RISCV => write!(f, "riscv"),
            Architecture::RISCV64 => write!(f, "riscv64"),
            Architecture::Unknown => write!(f, "unknown"),
        }
    }
}

/// Core disassembler trait that provides a common interface for instruction decoding
pub trait Disassembler {
    /// Decode a single instruction located at `address`
    ///
    /// # Arguments
    /// * `address` - The address where the instruction is located
    /// * `bytes` - The raw bytes starting at that address
    fn decode(&self, address: u64, bytes: &[u8]) -> DisassemblerResult<CodeLocation>;

    /// Get the maximum instruction length for this architecture in bytes
    fn max_instruction_length(&self) -> usize;

    /// Get the architecture this disassembler supports
    fn architecture(&self) -> Architecture;

    /// Get the endianness this disassembler uses
    fn endianness(&self) -> Endianness;

    /// Get the name of this disassembler backend
    fn name(&self) -> &str;
}

impl<T: Disassembler + ?Sized> Disassembler for &T {
    fn decode(&self, address: u64, bytes: &[u8]) -> DisassemblerResult<CodeLocation> {
        (**self).decode(address, bytes)
    }

    fn max_instruction_length(&self) -> usize {
        (**self).max_instruction_length()
    }

    fn architecture(&self) -> Architecture {
        (**self).architecture()
    }

    fn endianness(&self) -> Endianness {
        (**self).endianness()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
