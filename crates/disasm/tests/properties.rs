// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use labwired_disasm::decoder::{thumb16, thumb32};
use labwired_disasm::{dump, CondField, Register};

/// Deterministic filler bytes, so runs are reproducible.
fn pseudo_random_code(len: usize, mut seed: u32) -> Vec<u8> {
    (0..len)
        .map(|_| {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (seed >> 24) as u8
        })
        .collect()
}

#[test]
fn test_arm_line_count_matches_word_count() -> anyhow::Result<()> {
    for words in [0u32, 1, 2, 7, 64] {
        let code = pseudo_random_code(words as usize * 4, words);
        let mut out = String::new();
        dump(&mut out, &code, 0x2000, 0x2000 + words * 4)?;
        assert_eq!(out.lines().count() as u32, words);
    }
    Ok(())
}

#[test]
fn test_arm_never_reads_past_end() -> anyhow::Result<()> {
    // Buffer holds exactly the range; any over-read would be a Truncated error.
    let code = pseudo_random_code(32, 7);
    let mut out = String::new();
    dump(&mut out, &code, 0x0, 0x20)?;
    assert_eq!(out.lines().count(), 8);
    Ok(())
}

#[test]
fn test_width_predicate_over_every_halfword() -> anyhow::Result<()> {
    for halfword in 0..=u16::MAX {
        let mut code = halfword.to_le_bytes().to_vec();
        code.extend_from_slice(&[0x00, 0x00]);
        let decoded = thumb16::decode_at(&code, 0x1000)?;
        let wide = (halfword & 0xF800) == 0xE800 || (halfword & 0xF000) == 0xF000;
        assert_eq!(decoded.width == 4, wide, "{:#06x}", halfword);
        assert_eq!(thumb16::is_wide(halfword), wide);
    }
    Ok(())
}

#[test]
fn test_thumb_dump_is_deterministic() -> anyhow::Result<()> {
    let code = pseudo_random_code(4096, 0xC0FFEE);
    let mut first = String::new();
    let mut second = String::new();
    // Leave slack for a wide instruction straddling the end.
    dump(&mut first, &code, 0x0800_0001, 0x0800_0FFC)?;
    dump(&mut second, &code, 0x0800_0001, 0x0800_0FFC)?;
    assert_eq!(first, second);
    assert!(!first.is_empty());
    Ok(())
}

#[test]
fn test_every_line_has_listing_prefix() -> anyhow::Result<()> {
    let code = pseudo_random_code(1024, 42);
    let mut out = String::new();
    dump(&mut out, &code, 0x1001, 0x13FC)?;
    for line in out.lines() {
        assert!(line.starts_with("\t\t\t0x"), "{:?}", line);
        assert!(line.contains(": "), "{:?}", line);
    }
    Ok(())
}

#[test]
fn test_register_and_condition_rendering() {
    assert_eq!(Register::new(13).to_string(), "SP");
    assert_eq!(Register::new(14).to_string(), "LR");
    assert_eq!(Register::new(15).to_string(), "PC");
    assert_eq!(Register::new(5).to_string(), "r5");
    assert_eq!(CondField(0).to_string(), "EQ");
    assert_eq!(CondField(14).to_string(), "AL");
    assert_eq!(CondField(15).to_string(), "Unexpected condition: 15");
}

#[test]
fn test_bl_offset_with_j_bits_set() {
    // S = 0, J1 = 1, J2 = 1, imm10 = 0, imm11 = 0: I1 = I2 = 0, offset 0
    let decoded = thumb32::decode(0xF000_F800, 0x3000);
    assert_eq!(decoded.text(), Some("BLX 0 (0x3004)"));
    // S = 0, J1 = 0, J2 = 0: I1 = I2 = 1, offset 0xC00000
    let decoded = thumb32::decode(0xF000_D000, 0x3000);
    assert_eq!(decoded.text(), Some("BLX 12582912 (0xc03004)"));
}
