//! Bitfield extraction helpers.
//!
//! CPUID packs several fields into each 32-bit register. Every decoder in
//! this crate carves registers with [`extract_bits`], which takes an
//! *inclusive* bit range as published in the vendor manuals:
//!
//! ```text
//! extract_bits(0x000306C3, 4, 7) == 0xC   // leaf 1 EAX base model [7:4]
//! ```

/// Extract the inclusive bit range `[begin, end]` from a 32-bit word,
/// right-justified.
///
/// Requires `begin <= end <= 31`. The full-width range `[0, 31]` returns the
/// word unchanged; its mask is special-cased because building it with
/// `(1 << 32) - 1` would shift a `u32` by its own width.
#[inline]
pub fn extract_bits(word: u32, begin: u32, end: u32) -> u32 {
    debug_assert!(begin <= end && end <= 31, "invalid bit range [{begin}, {end}]");

    let width = end - begin + 1;
    let mask = if width == 32 { u32::MAX } else { (1u32 << width) - 1 };
    (word >> begin) & mask
}

/// Test a single bit position of a 32-bit word.
#[inline]
pub fn bit(word: u32, position: u32) -> bool {
    debug_assert!(position <= 31, "invalid bit position {position}");
    (word >> position) & 1 != 0
}
