use crate::core::code_location::CodeLocation;
use crate::core::disassembler::{
    Architecture, Disassembler, DisassemblerError, DisassemblerResult, Endianness,
};
use capstone::{Arch, Capstone, Endian, Mode, NO_EXTRA_MODE};

pub struct CapstoneDisassembler {
    cs: Capstone,
    arch: Architecture,
    endianness: Endianness,
}

fn cs_endian(end: Endianness) -> Option<Endian> {
    Some(match end {
        Endianness::Big => Endian::Big,
        Endianness::Little => Endian::Little,
    })
}

fn cs_arch_mode(arch: Architecture, end: Endianness) -> Option<(Arch, Mode, Option<Endian>)> {
    match arch {
        Architecture::ARM => Some((Arch::ARM, Mode::Arm, cs_endian(end))),
        Architecture::ARM64 => Some((Arch::ARM64, Mode::Arm, cs_endian(end))),
        Architecture::MIPS => Some((Arch::MIPS, Mode::Mips32, cs_endian(end))),
        Architecture::MIPS64 => Some((Arch::MIPS, Mode::Mips64, cs_endian(end))),
        Architecture::PPC => Some((Arch::PPC, Mode::Mode32, cs_endian(end))),
        Architecture::PPC64 => Some((Arch::PPC, Mode::Mode64, cs_endian(end))),
        Architecture::RISCV => Some((Arch::RISCV, Mode::RiscV32, None)),
        Architecture::RISCV64 => Some((Arch::RISCV, Mode::RiscV64, None)),
        Architecture::X86 | Architecture::X86_64 | Architecture::Unknown => None,
    }
}

impl CapstoneDisassembler {
    pub fn new(arch: Architecture, endianness: Endianness) -> Option<Self> {
        let (a, m, endian) = cs_arch_mode(arch, endianness)?;
        let cs = Capstone::new_raw(a, m, NO_EXTRA_MODE, endian).ok()?;
        Some(Self {
            cs,
            arch,
            endianness,
        })
    }
}

impl Disassembler for CapstoneDisassembler {
    fn decode(&self, address: u64, bytes: &[u8]) -> DisassemblerResult<CodeLocation> {
        if bytes.is_empty() {
            return Err(DisassemblerError::InsufficientBytes());
        }
        let insns = self
            .cs
            .disasm_count(bytes, address, 1)
            .map_err(|e| DisassemblerError::InternalError(e.to_string()))?;
        let insn = insns
            .iter()
            .next()
            .ok_or(DisassemblerError::InvalidInstruction())?;

        Ok(CodeLocation::new(
            address,
            insn.bytes().to_vec(),
            insn.mnemonic().unwrap_or(""),
            insn.op_str().unwrap_or(""),
            self.arch.to_string(),
        ))
    }

    fn max_instruction_length(&self) -> usize {
        8
    }

    fn architecture(&self) -> Architecture {
        self.arch
    }

    fn endianness(&self) -> Endianness {
        self.endianness
    }

    fn name(&self) -> &str {
        "capstone"
    }
}
