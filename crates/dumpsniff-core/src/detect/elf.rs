//! ELF core file detection.
//!
//! Relevant part of the ELF identification header:
//!
//! ```text
//! 0x00  7F 45 4C 46   e_ident[EI_MAG0..EI_MAG3]
//! 0x04  EI_CLASS      1 = 32-bit, 2 = 64-bit (ignored)
//! 0x05  EI_DATA       1 = little endian, 2 = big endian
//! 0x10  e_type        u16, ET_CORE = 4
//! ```
//!
//! `e_type` sits before any class-dependent field, so its offset is the same
//! for ELF32 and ELF64.

use super::Endianness;

/// `e_ident[EI_MAG0..=EI_MAG3]`
pub const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];

/// `e_type` value of a core file
pub const ET_CORE: u16 = 4;

const EI_DATA: usize = 5;
const ELFDATA2LSB: u8 = 1;
const ELFDATA2MSB: u8 = 2;
const E_TYPE_OFFSET: usize = 16;

fn data_encoding(ei_data: u8) -> Option<Endianness> {
    match ei_data {
        ELFDATA2LSB => Some(Endianness::Little),
        ELFDATA2MSB => Some(Endianness::Big),
        _ => None,
    }
}

/// True if `header` is an ELF file whose `e_type` is `ET_CORE`.
///
/// Needs at least 18 bytes; shorter headers never match.
pub fn is_elf_core(header: &[u8]) -> bool {
    if !header.starts_with(&ELF_MAGIC) {
        return false;
    }

    let Some(endianness) = header.get(EI_DATA).copied().and_then(data_encoding) else {
        return false;
    };

    endianness.read_u16(header, E_TYPE_OFFSET) == Some(ET_CORE)
}
