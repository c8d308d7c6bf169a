//! Mach-O core file detection.
//!
//! The magic at offset 0 is read as a little-endian `u32`. The native forms
//! (`MH_MAGIC`, `MH_MAGIC_64`) mean the rest of the header is little endian,
//! the byte-swapped forms (`MH_CIGAM`, `MH_CIGAM_64`) mean big endian.
//! Universal binaries (`FAT_MAGIC` and its swap) wrap architecture slices and
//! are never core files, so they fall through like any unknown magic.

use super::Endianness;

/// 32-bit Mach-O magic
pub const MH_MAGIC: u32 = 0xFEED_FACE;
/// 32-bit Mach-O magic, byte swapped
pub const MH_CIGAM: u32 = 0xCEFA_EDFE;
/// 64-bit Mach-O magic
pub const MH_MAGIC_64: u32 = 0xFEED_FACF;
/// 64-bit Mach-O magic, byte swapped
pub const MH_CIGAM_64: u32 = 0xCFFA_EDFE;

/// `filetype` value of a core file
pub const MH_CORE: u32 = 4;

const FILETYPE_OFFSET: usize = 12;

fn header_endianness(magic: u32) -> Option<Endianness> {
    match magic {
        MH_MAGIC | MH_MAGIC_64 => Some(Endianness::Little),
        MH_CIGAM | MH_CIGAM_64 => Some(Endianness::Big),
        _ => None,
    }
}

/// True if `header` is a thin Mach-O file whose `filetype` is `MH_CORE`.
///
/// Needs at least 16 bytes; shorter headers never match.
pub fn is_macho_core(header: &[u8]) -> bool {
    let Some(magic) = Endianness::Little.read_u32(header, 0) else {
        return false;
    };
    let Some(endianness) = header_endianness(magic) else {
        return false;
    };

    endianness.read_u32(header, FILETYPE_OFFSET) == Some(MH_CORE)
}
