//! Crash dump format detection.
//!
//! Each supported format has a stateless detector that inspects at most the
//! first [`HEADER_CAPACITY`](crate::header::HEADER_CAPACITY) bytes of a file:
//!
//! | Format     | Magic                              | Discriminator                |
//! |------------|------------------------------------|------------------------------|
//! | Minidump   | `MDMP` at offset 0                 | none                         |
//! | ELF core   | `7F 'E' 'L' 'F'` at offset 0       | `e_type == ET_CORE` at 16    |
//! | Mach-O core| `MH_MAGIC[_64]` or swapped forms   | `filetype == MH_CORE` at 12  |
//!
//! The magic spaces are disjoint, so at most one detector matches a header.
//! [`classify`] still tries them in a fixed order so results are
//! deterministic. New formats are added as a [`DumpFormat`] variant plus a
//! detector function; the `match` in [`DumpFormat::matches`] keeps the set
//! closed.

mod elf;
mod macho;
mod minidump;

use crate::error::Result;
use crate::header::ByteHeader;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::debug;

pub use elf::{is_elf_core, ELF_MAGIC, ET_CORE};
pub use macho::{is_macho_core, MH_CIGAM, MH_CIGAM_64, MH_CORE, MH_MAGIC, MH_MAGIC_64};
pub use minidump::{is_minidump, MINIDUMP_SIGNATURE};

/// Classification of a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DumpFormat {
    /// Windows minidump (`MDMP`)
    Minidump,
    /// ELF container with `e_type == ET_CORE`
    ElfCore,
    /// Mach-O container with `filetype == MH_CORE`
    #[serde(rename = "macho_core")]
    MachOCore,
    /// Not a crash dump
    None,
}

impl DumpFormat {
    /// Dump formats in the order [`classify`] tries them
    pub const DETECTION_ORDER: [DumpFormat; 3] =
        [DumpFormat::Minidump, DumpFormat::ElfCore, DumpFormat::MachOCore];

    /// Runs this format's detector against `header`.
    ///
    /// `DumpFormat::None` never matches.
    pub fn matches(self, header: &[u8]) -> bool {
        match self {
            DumpFormat::Minidump => is_minidump(header),
            DumpFormat::ElfCore => is_elf_core(header),
            DumpFormat::MachOCore => is_macho_core(header),
            DumpFormat::None => false,
        }
    }

    /// True for every variant except `None`
    pub fn is_dump(self) -> bool {
        self != DumpFormat::None
    }

    /// Short machine-friendly name
    pub fn as_str(self) -> &'static str {
        match self {
            DumpFormat::Minidump => "minidump",
            DumpFormat::ElfCore => "elf_core",
            DumpFormat::MachOCore => "macho_core",
            DumpFormat::None => "none",
        }
    }
}

impl fmt::Display for DumpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte order used to decode numeric header fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    /// Least significant byte first
    Little,
    /// Most significant byte first
    Big,
}

impl Endianness {
    /// Decodes a `u16` at `offset`, or `None` if the slice is too short
    pub fn read_u16(self, data: &[u8], offset: usize) -> Option<u16> {
        let bytes: [u8; 2] = data.get(offset..offset.checked_add(2)?)?.try_into().ok()?;
        Some(match self {
            Endianness::Little => u16::from_le_bytes(bytes),
            Endianness::Big => u16::from_be_bytes(bytes),
        })
    }

    /// Decodes a `u32` at `offset`, or `None` if the slice is too short
    pub fn read_u32(self, data: &[u8], offset: usize) -> Option<u32> {
        let bytes: [u8; 4] = data.get(offset..offset.checked_add(4)?)?.try_into().ok()?;
        Some(match self {
            Endianness::Little => u32::from_le_bytes(bytes),
            Endianness::Big => u32::from_be_bytes(bytes),
        })
    }
}

/// Returns the first format whose detector matches `header`, or
/// [`DumpFormat::None`].
pub fn classify(header: &ByteHeader) -> DumpFormat {
    classify_bytes(header.as_bytes())
}

/// Same as [`classify`] for a raw prefix of any length
pub fn classify_bytes(header: &[u8]) -> DumpFormat {
    DumpFormat::DETECTION_ORDER
        .into_iter()
        .find(|format| format.matches(header))
        .unwrap_or(DumpFormat::None)
}

/// Reads and classifies the file at `path`.
///
/// Returns an error only if the file cannot be opened or read; see
/// [`classify_file`] for the lenient variant.
pub fn try_classify_file(path: impl AsRef<Path>) -> Result<DumpFormat> {
    let header = ByteHeader::read(path)?;
    Ok(classify(&header))
}

/// Reads and classifies the file at `path`, treating any I/O failure as
/// [`DumpFormat::None`].
pub fn classify_file(path: impl AsRef<Path>) -> DumpFormat {
    let path = path.as_ref();
    match try_classify_file(path) {
        Ok(format) => format,
        Err(e) => {
            debug!("Treating unreadable file as not a dump: {}", e);
            DumpFormat::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn elf_header(ei_data: u8, e_type: [u8; 2]) -> Vec<u8> {
        let mut data = vec![0u8; 20];
        data[..4].copy_from_slice(&ELF_MAGIC);
        data[4] = 2;
        data[5] = ei_data;
        data[16..18].copy_from_slice(&e_type);
        data
    }

    fn macho_header(magic: u32, filetype: [u8; 4]) -> Vec<u8> {
        let mut data = vec![0u8; 20];
        data[..4].copy_from_slice(&magic.to_le_bytes());
        data[12..16].copy_from_slice(&filetype);
        data
    }

    #[test]
    fn test_endianness_reads() {
        let data = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(Endianness::Little.read_u16(&data, 0), Some(0x0201));
        assert_eq!(Endianness::Big.read_u16(&data, 0), Some(0x0102));
        assert_eq!(Endianness::Little.read_u32(&data, 0), Some(0x0403_0201));
        assert_eq!(Endianness::Big.read_u32(&data, 0), Some(0x0102_0304));
        assert_eq!(Endianness::Big.read_u16(&data, 3), None);
        assert_eq!(Endianness::Big.read_u32(&data, usize::MAX), None);
    }

    #[test]
    fn test_classify_minidump_scenario() {
        assert_eq!(classify_bytes(&[0x4D, 0x44, 0x4D, 0x50]), DumpFormat::Minidump);
    }

    #[test]
    fn test_classify_elf_scenario() {
        assert_eq!(classify_bytes(&elf_header(1, [4, 0])), DumpFormat::ElfCore);
        assert_eq!(classify_bytes(&elf_header(1, [2, 0])), DumpFormat::None);
        assert_eq!(classify_bytes(&elf_header(2, [0, 4])), DumpFormat::ElfCore);
    }

    #[test]
    fn test_classify_macho_scenario() {
        assert_eq!(
            classify_bytes(&macho_header(MH_MAGIC_64, [4, 0, 0, 0])),
            DumpFormat::MachOCore
        );
        assert_eq!(
            classify_bytes(&macho_header(0xCAFE_BABE, [4, 0, 0, 0])),
            DumpFormat::None
        );
    }

    #[test]
    fn test_tiny_inputs_never_match() {
        for len in 0..4 {
            assert_eq!(classify_bytes(&b"MDMP"[..len]), DumpFormat::None);
        }
        assert_eq!(classify_bytes(&[0x7F, b'E']), DumpFormat::None);
    }

    #[test]
    fn test_magic_spaces_are_disjoint() {
        let headers = [
            b"MDMP\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0".to_vec(),
            elf_header(1, [4, 0]),
            elf_header(2, [0, 4]),
            macho_header(MH_MAGIC, [4, 0, 0, 0]),
            macho_header(MH_MAGIC_64, [4, 0, 0, 0]),
            macho_header(MH_CIGAM, [0, 0, 0, 4]),
            macho_header(MH_CIGAM_64, [0, 0, 0, 4]),
        ];

        for header in &headers {
            let matching = DumpFormat::DETECTION_ORDER
                .iter()
                .filter(|format| format.matches(header))
                .count();
            assert_eq!(matching, 1, "header {:02x?} matched {} detectors", header, matching);
        }
    }

    #[test]
    fn test_none_never_matches() {
        assert!(!DumpFormat::None.matches(b"MDMP"));
        assert!(!DumpFormat::None.is_dump());
        assert!(DumpFormat::ElfCore.is_dump());
    }

    #[test]
    fn test_format_names() {
        assert_eq!(DumpFormat::MachOCore.to_string(), "macho_core");
        assert_eq!(
            serde_json::to_string(&DumpFormat::MachOCore).unwrap(),
            "\"macho_core\""
        );
        assert_eq!(
            serde_json::to_string(&DumpFormat::ElfCore).unwrap(),
            "\"elf_core\""
        );
    }

    #[test]
    fn test_classify_file_swallows_io_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(classify_file(dir.path().join("missing")), DumpFormat::None);
        assert!(try_classify_file(dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_classify_file_trailing_content_ignored() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"MDMP").unwrap();
        file.write_all(&[0xFF; 4096]).unwrap();
        assert_eq!(classify_file(file.path()), DumpFormat::Minidump);
    }
}
