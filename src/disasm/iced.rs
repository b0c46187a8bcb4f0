use crate::core::code_location::CodeLocation;
use crate::core::disassembler::{
    Architecture, Disassembler, DisassemblerError, DisassemblerResult, Endianness,
};

pub struct IcedDisassembler {
    bits: u32,
    arch: Architecture,
    endianness: Endianness,
}

impl IcedDisassembler {
    pub fn new(arch: Architecture, endianness: Endianness) -> Self {
        let bits = match arch {
            Architecture::X86 => 32,
            _ => 64,
        };
        Self {
            bits,
            arch,
            endianness,
        }
    }
}

impl Disassembler for IcedDisassembler {
    fn decode(&self, address: u64, bytes: &[u8]) -> DisassemblerResult<CodeLocation> {
        use iced_x86::{Decoder, DecoderOptions, Formatter, IntelFormatter};

        if !matches!(self.arch, Architecture::X86 | Architecture::X86_64) {
            return Err(DisassemblerError::UnsupportedArchitecture());
        }
        if bytes.is_empty() {
            return Err(DisassemblerError::InsufficientBytes());
        }
        let mut decoder = Decoder::new(self.bits, bytes, DecoderOptions::NONE);
        decoder.set_ip(address);

        let instr = decoder.decode();
        if instr.is_invalid() {
            return Err(match decoder.last_error() {
                iced_x86::DecoderError::NoMoreBytes => DisassemblerError::InsufficientBytes(),
                _ => DisassemblerError::InvalidInstruction(),
            });
        }
        let len = instr.len();
        let mut fmt = IntelFormatter::new();
        let mut out = String::new();
        fmt.format(&instr, &mut out);
        let (mnemonic, operands) = match out.split_once(' ') {
            Some((m, rest)) => (m.to_string(), rest.trim().to_string()),
            None => (out.clone(), String::new()),
        };

        Ok(CodeLocation::new(
            address,
            bytes[..len.min(bytes.len())].to_vec(),
            mnemonic,
            operands,
            self.arch.to_string(),
        ))
    }

    fn max_instruction_length(&self) -> usize {
        15
    }

    fn architecture(&self) -> Architecture {
        self.arch
    }

    fn endianness(&self) -> Endianness {
        self.endianness
    }

    fn name(&self) -> &str {
        "iced-x86"
    }
}
