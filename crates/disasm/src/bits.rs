// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Bitfield helpers shared by the instruction decoders.
//!
//! Offsets and widths are encoding constants, so callers always pass values in
//! range (`offset + width <= 32`, `1 <= width <= 32`).

/// Extracts the unsigned `width`-bit field starting at bit `offset`.
#[inline]
pub fn field(word: u32, offset: u32, width: u32) -> u32 {
    debug_assert!(width >= 1 && offset + width <= 32);
    if width == 32 {
        word
    } else {
        (word >> offset) & ((1 << width) - 1)
    }
}

/// Tests a single bit.
#[inline]
pub fn bit(word: u32, offset: u32) -> bool {
    field(word, offset, 1) != 0
}

/// Sign-extends the low `width` bits of `value` to an `i32`.
///
/// The pattern is moved to the top of the word and shifted back down
/// arithmetically, so bits above `width` are ignored.
#[inline]
pub fn sign_extend(value: u32, width: u32) -> i32 {
    debug_assert!((1..=32).contains(&width));
    let shift = 32 - width;
    ((value << shift) as i32) >> shift
}
