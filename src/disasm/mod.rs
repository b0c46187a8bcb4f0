//! Disassembly backends used to describe code addresses.
//!
//! - iced-x86 for x86/x64
//! - capstone for ARM/AArch64, MIPS, PPC, RISC-V

pub mod capstone;
pub mod iced;
pub mod registry;
