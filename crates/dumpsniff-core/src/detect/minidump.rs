//! Windows minidump detection.

/// Signature at offset 0 of every minidump (`MINIDUMP_HEADER.Signature`)
pub const MINIDUMP_SIGNATURE: [u8; 4] = *b"MDMP";

/// True if `header` starts with the `MDMP` signature.
///
/// The signature is a byte sequence rather than a numeric field, so no byte
/// order applies.
pub fn is_minidump(header: &[u8]) -> bool {
    header.starts_with(&MINIDUMP_SIGNATURE)
}
