// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! 32-bit Thumb-2 decoding.
//!
//! The instruction is handled as one word, `first_halfword << 16 |
//! second_halfword`, so bit positions below match the architecture manual:
//!
//! ```text
//! |111|op1| op2   |    |op|              |
//! |1 9|8 7|6543210|9  6|5 |              |
//! ```
//!
//! Pattern tests inside each group are ordered; later arms assume the
//! earlier ones did not match.

use super::{thumb16, Body, Decoded};
use crate::bits::{bit, field, sign_extend};
use crate::operands::{BranchTarget, CondField, Register, RegisterList};
use crate::{read_u16, DisasmResult};

/// Decodes the 32-bit Thumb instruction at the start of `code`.
pub fn decode_at(code: &[u8], address: u32) -> DisasmResult<Decoded> {
    let first = read_u16(code, 0, address)?;
    let second = read_u16(code, 2, address)?;
    Ok(decode(((first as u32) << 16) | second as u32, address))
}

/// Decodes a 32-bit Thumb instruction. Always reports a width of 4.
pub fn decode(instr: u32, address: u32) -> Decoded {
    let op1 = field(instr, 27, 2);
    let op2 = field(instr, 20, 7);
    let body = match op1 {
        // Not a 32-bit encoding at all; list the first halfword as 16-bit.
        0 => thumb16::decode((instr >> 16) as u16, address).body,
        1 => load_store_multiple(instr, op2),
        2 => {
            if !bit(instr, 15) && op2 & 0x20 == 0 {
                data_processing_modified_imm(instr)
            } else if !bit(instr, 15) {
                data_processing_plain_imm(instr)
            } else {
                branches_and_control(instr, op2, address)
            }
        }
        _ => load_store_single(instr, op2),
    };
    match body {
        Body::Text(_) => {}
        Body::Undefined => {
            tracing::trace!("Reserved thumb32 encoding {:#010x} at {:#x}", instr, address)
        }
        Body::Unsupported => {
            tracing::trace!("No mnemonic for thumb32 {:#010x} at {:#x}", instr, address)
        }
    }
    Decoded::thumb32(address, instr, body)
}

// STM   - 111 01 00 01 0 W0 nnnn rrrrrrrrrrrrrrrr
// LDM   - 111 01 00 01 0 W1 nnnn rrrrrrrrrrrrrrrr
// STMDB - 111 01 00 10 0 W0 nnnn rrrrrrrrrrrrrrrr
// LDMDB - 111 01 00 10 0 W1 nnnn rrrrrrrrrrrrrrrr
// PUSH and POP are STMDB / LDM with SP as base and write-back.
fn load_store_multiple(instr: u32, op2: u32) -> Body {
    match op2 {
        0x00..=0x03 | 0x08..=0x0B | 0x10..=0x13 | 0x18..=0x1B => {}
        _ => return Body::Unsupported,
    }
    let op = field(instr, 23, 2);
    let write_back = if bit(instr, 21) { "!" } else { "" };
    let is_load = bit(instr, 20);
    let rn = Register::new(field(instr, 16, 4));
    let registers = RegisterList::from_mask(field(instr, 0, 16) as u16);

    let head = match (op, is_load) {
        (1, false) => format!("STM {}{}, ", rn, write_back),
        (1, true) if rn != Register::SP => format!("LDM {}{}, ", rn, write_back),
        (1, true) => "POP ".to_string(),
        (2, false) if rn != Register::SP => format!("STMDB {}{}, ", rn, write_back),
        (2, false) => "PUSH ".to_string(),
        (2, true) => format!("LDMDB {}{}, ", rn, write_back),
        _ => return Body::Unsupported,
    };
    Body::Text(format!("{}{}", head, registers))
}

fn modified_imm_mnemonic(op3: u32) -> String {
    let name = match op3 {
        0x0 => "AND",
        0x1 => "BIC",
        0x2 => "ORR",
        0x3 => "ORN",
        0x4 => "EOR",
        0x8 => "ADD",
        0xA => "ADC",
        0xB => "SBC",
        0xD => "SUB",
        0xE => "RSB",
        _ => return format!("UNKNOWN DPMI-{}", op3),
    };
    name.to_string()
}

// 111 10 i0 oooo S nnnn 0 iii dddd iiiiiiii
fn data_processing_modified_imm(instr: u32) -> Body {
    let i = field(instr, 26, 1);
    let op3 = field(instr, 21, 4);
    let set_flags = bit(instr, 20);
    let rn = Register::new(field(instr, 16, 4));
    let imm3 = field(instr, 12, 3);
    let rd = Register::new(field(instr, 8, 4));
    let imm8 = field(instr, 0, 8);
    // i:imm3:imm8, listed before ThumbExpandImm is applied
    let imm12 = (i << 11) | (imm3 << 8) | imm8;

    Body::Text(format!(
        "{}{} {}, {}, ThumbExpand({})",
        modified_imm_mnemonic(op3),
        if set_flags { "S" } else { "" },
        rd,
        rn,
        imm12
    ))
}

// 111 10 i1 ooooo nnnn 0 iii dddd iiiiiiii
fn data_processing_plain_imm(instr: u32) -> Body {
    let op3 = field(instr, 20, 5);
    let rn = field(instr, 16, 4);
    let i = field(instr, 26, 1);
    let imm3 = field(instr, 12, 3);
    let rd = Register::new(field(instr, 8, 4));
    let imm8 = field(instr, 0, 8);

    match op3 {
        // MOVW Rd, #imm16: imm4 sits in the Rn field
        0x04 => {
            let imm16 = (rn << 12) | (i << 11) | (imm3 << 8) | imm8;
            Body::Text(format!("MOVW {}, #{}", rd, imm16))
        }
        // SUB.W Rd, Rn, #imm12
        0x0A => {
            let imm12 = (i << 11) | (imm3 << 8) | imm8;
            Body::Text(format!("SUB.W {}, {}, #{}", rd, Register::new(rn), imm12))
        }
        _ => Body::Unsupported,
    }
}

fn branches_and_control(instr: u32, op2: u32, address: u32) -> Body {
    let op3 = field(instr, 12, 3);
    let s = field(instr, 26, 1);
    let j1 = field(instr, 13, 1);
    let j2 = field(instr, 11, 1);
    let imm11 = field(instr, 0, 11);
    // Branch offsets are relative to the address after this instruction.
    let base = address.wrapping_add(4);

    match op3 {
        // B<cond>.W: 111 10 S cccc iiiiii 10 J1 0 J2 iiiiiiiiiii
        // Only op3 = 000 is listed, so J1 is always clear here.
        // op2 = x111xxx is the MSR/MRS/hint space, not a branch.
        0 if op2 & 0x38 != 0x38 => {
            let cond = field(instr, 22, 4);
            let imm6 = field(instr, 16, 6);
            // S:J2:J1:imm6:imm11:'0' is 21 bits wide
            let imm = (s << 20) | (j2 << 19) | (j1 << 18) | (imm6 << 12) | (imm11 << 1);
            let offset = sign_extend(imm, 21);
            Body::Text(format!(
                "B{}.W {}",
                CondField(cond),
                BranchTarget::new(base, offset)
            ))
        }
        // BL / BLX (immediate): 111 10 S iiiiiiiiii 11 J1 L J2 iiiiiiiiiii
        4..=7 => {
            let imm10 = field(instr, 16, 10);
            let i1 = !(j1 ^ s) & 1;
            let i2 = !(j2 ^ s) & 1;
            // S:I1:I2:imm10:imm11:'0' is imm24 scaled by two, 25 bits wide
            let imm = (s << 24) | (i1 << 23) | (i2 << 22) | (imm10 << 12) | (imm11 << 1);
            let offset = sign_extend(imm, 25);
            let mnemonic = if bit(instr, 12) { "BLX" } else { "BX" };
            Body::Text(format!("{} {}", mnemonic, BranchTarget::new(base, offset)))
        }
        _ => Body::Unsupported,
    }
}

fn load_store_single(instr: u32, op2: u32) -> Body {
    match op2 {
        // Store single data item: 000xxx0
        0x00 | 0x02 | 0x04 | 0x06 | 0x08 | 0x0A | 0x0C | 0x0E => store_single(instr),
        // Load word: 00xx101
        0x05 | 0x0D | 0x15 | 0x1D => load_word(instr),
        _ => Body::Unsupported,
    }
}

// STR.W Rt, [Rn, #imm12] - 111 11 000 110 0 nnnn tttt iiiiiiiiiiii
// STR Rt, [Rn, #imm8]    - 111 11 000 010 0 nnnn tttt 1PUWiiiiiiii
fn store_single(instr: u32) -> Body {
    let op3 = field(instr, 21, 3);
    let rn = Register::new(field(instr, 16, 4));
    let rt = Register::new(field(instr, 12, 4));

    match op3 {
        2 => {
            let p = bit(instr, 10);
            let u = bit(instr, 9);
            let w = bit(instr, 8);
            let imm = sign_extend(field(instr, 0, 8), 8);

            if rn == Register::SP && p && !u && w {
                Body::Text(format!("PUSH {}", rt))
            } else if rn == Register::PC || (!p && !w) {
                Body::Undefined
            } else {
                let mnemonic = if p && u && !w { "STRT" } else { "STR" };
                let text = if !p && w {
                    format!("{} {}, [{}], #{}", mnemonic, rt, rn, imm)
                } else {
                    format!(
                        "{} {}, [{}, #{}]{}",
                        mnemonic,
                        rt,
                        rn,
                        imm,
                        if w { "!" } else { "" }
                    )
                };
                Body::Text(text)
            }
        }
        6 => {
            let imm12 = field(instr, 0, 12);
            Body::Text(format!("STR.W {}, [{}, #{}]", rt, rn, imm12))
        }
        _ => Body::Unsupported,
    }
}

// LDR.W Rt, [Rn, #imm12]          - 111 11 00 01 101 nnnn tttt iiiiiiiiiiii
// LDR.W Rt, [PC, #imm12]          - 111 11 00 0x 101 1111 tttt iiiiiiiiiiii
// LDR.W Rt, [Rn, Rm{, LSL #imm2}] - 111 11 00 00 101 nnnn tttt 000000iimmmm
// LDRT Rt, [Rn, #imm8]            - 111 11 00 00 101 nnnn tttt 1110iiiiiiii
fn load_word(instr: u32) -> Body {
    let op3 = field(instr, 23, 2);
    let op4 = field(instr, 6, 6);
    let rn = Register::new(field(instr, 16, 4));
    let rt = Register::new(field(instr, 12, 4));

    if op3 == 1 || rn == Register::PC {
        let imm12 = field(instr, 0, 12);
        Body::Text(format!("LDR.W {}, [{}, #{}]", rt, rn, imm12))
    } else if op4 == 0 {
        let imm2 = field(instr, 4, 2);
        let rm = Register::new(field(instr, 0, 4));
        let shift = if imm2 != 0 {
            format!(", LSL #{}", imm2)
        } else {
            String::new()
        };
        Body::Text(format!("LDR.W {}, [{}, {}{}]", rt, rn, rm, shift))
    } else {
        let imm8 = field(instr, 0, 8);
        Body::Text(format!("LDRT {}, [{}, #{}]", rt, rn, imm8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(h1: u16, h2: u16) -> Option<String> {
        decode(((h1 as u32) << 16) | h2 as u32, 0x1000)
            .text()
            .map(str::to_string)
    }

    fn body(h1: u16, h2: u16) -> Body {
        decode(((h1 as u32) << 16) | h2 as u32, 0x1000).body
    }

    #[test]
    fn test_decode_push_pop_wide() {
        // PUSH.W {r4-r11, LR} -> E92D 4FF0
        assert_eq!(
            text(0xE92D, 0x4FF0).as_deref(),
            Some("PUSH {r4, r5, r6, r7, r8, r9, r10, r11, LR}")
        );
        // POP.W {r4-r11, PC} -> E8BD 8FF0
        assert_eq!(
            text(0xE8BD, 0x8FF0).as_deref(),
            Some("POP {r4, r5, r6, r7, r8, r9, r10, r11, PC}")
        );
    }

    #[test]
    fn test_decode_ldm_stm() {
        // STM r0!, {r1, r2} -> E8A0 0006
        assert_eq!(text(0xE8A0, 0x0006).as_deref(), Some("STM r0!, {r1, r2}"));
        // STM r0, {r3} -> E880 0008
        assert_eq!(text(0xE880, 0x0008).as_deref(), Some("STM r0, {r3}"));
        // LDM r5!, {r0, r1} -> E8B5 0003
        assert_eq!(text(0xE8B5, 0x0003).as_deref(), Some("LDM r5!, {r0, r1}"));
        // LDMDB r1, {r2} -> E911 0004
        assert_eq!(text(0xE911, 0x0004).as_deref(), Some("LDMDB r1, {r2}"));
        // STMDB r6!, {r0, LR} -> E926 4001
        assert_eq!(
            text(0xE926, 0x4001).as_deref(),
            Some("STMDB r6!, {r0, LR}")
        );
        // Empty register list
        assert_eq!(
            text(0xE8A0, 0x0000).as_deref(),
            Some("STM r0!, <no register list?>")
        );
    }

    #[test]
    fn test_load_store_multiple_unlisted_ops() {
        // op = 0 (SRS/RFE space) -> E800 0000
        assert_eq!(body(0xE800, 0x0000), Body::Unsupported);
        // LDRD / TBB space -> E8D0 F000
        assert_eq!(body(0xE8D0, 0xF000), Body::Unsupported);
        // Data processing (shifted register) -> EA4F 0001
        assert_eq!(body(0xEA4F, 0x0001), Body::Unsupported);
    }

    #[test]
    fn test_decode_modified_immediate() {
        // ADD r0, r1, #4 -> F101 0004
        assert_eq!(
            text(0xF101, 0x0004).as_deref(),
            Some("ADD r0, r1, ThumbExpand(4)")
        );
        // i = 1 sets bit 11 of the listed field -> F501 0004
        assert_eq!(
            text(0xF501, 0x0004).as_deref(),
            Some("ADD r0, r1, ThumbExpand(2052)")
        );
        // ORRS r2, PC, imm3 = 7, imm8 = 0xFF -> F05F 72FF
        assert_eq!(
            text(0xF05F, 0x72FF).as_deref(),
            Some("ORRS r2, PC, ThumbExpand(2047)")
        );
        // BIC r3, r3, #1 -> F023 0301
        assert_eq!(
            text(0xF023, 0x0301).as_deref(),
            Some("BIC r3, r3, ThumbExpand(1)")
        );
        // SUBS SP, SP -> F1BD 0D08
        assert_eq!(
            text(0xF1BD, 0x0D08).as_deref(),
            Some("SUBS SP, SP, ThumbExpand(8)")
        );
    }

    #[test]
    fn test_decode_modified_immediate_unknown_op() {
        // op3 = 5 has no mnemonic -> F0A1 0000
        assert_eq!(
            text(0xF0A1, 0x0000).as_deref(),
            Some("UNKNOWN DPMI-5 r0, r1, ThumbExpand(0)")
        );
    }

    #[test]
    fn test_decode_plain_immediate() {
        // MOVW r0, #0x1234 -> F241 2034
        assert_eq!(text(0xF241, 0x2034).as_deref(), Some("MOVW r0, #4660"));
        // MOVW r7, #0xFFFF -> F64F 77FF
        assert_eq!(text(0xF64F, 0x77FF).as_deref(), Some("MOVW r7, #65535"));
        // SUB.W SP, SP, #16 -> F2AD 0D10
        assert_eq!(text(0xF2AD, 0x0D10).as_deref(), Some("SUB.W SP, SP, #16"));
        // MOVT is not listed -> F2C0 0000
        assert_eq!(body(0xF2C0, 0x0000), Body::Unsupported);
    }

    #[test]
    fn test_decode_cond_branch_wide() {
        // BNE.W +256 -> F040 8080
        assert_eq!(
            text(0xF040, 0x8080).as_deref(),
            Some("BNE.W 256 (0x1104)")
        );
        // BEQ.W with S, J2, imm6 and imm11 set -> F43F 8FFF
        assert_eq!(
            text(0xF43F, 0x8FFF).as_deref(),
            Some("BEQ.W -262146 (0xfffc1002)")
        );
        // BGT.W with J2 only -> F300 8800: offset bit 19
        assert_eq!(
            text(0xF300, 0x8800).as_deref(),
            Some("BGT.W 524288 (0x81004)")
        );
    }

    #[test]
    fn test_cond_branch_needs_op3_zero() {
        // J1 shares the op3 field; with it set the group is not listed -> F040 A080
        assert_eq!(body(0xF040, 0xA080), Body::Unsupported);
    }

    #[test]
    fn test_cond_branch_guard_skips_reserved_space() {
        // cond field 111x overlaps the MSR / hint space -> F380 8000
        assert_eq!(body(0xF380, 0x8000), Body::Unsupported);
        assert_eq!(body(0xF3AF, 0x8000), Body::Unsupported);
    }

    #[test]
    fn test_decode_bl_blx() {
        // S = 0, J1 = 1, J2 = 1 gives I1 = I2 = 0 -> F000 F800
        assert_eq!(text(0xF000, 0xF800).as_deref(), Some("BLX 0 (0x1004)"));
        // Back to itself -> F7FF FFFE
        assert_eq!(text(0xF7FF, 0xFFFE).as_deref(), Some("BLX -4 (0x1000)"));
        // L clear -> F7FF EFFE
        assert_eq!(text(0xF7FF, 0xEFFE).as_deref(), Some("BX -4 (0x1000)"));
        // S = 1, J1 = J2 = 0 gives I1 = I2 = 0: most negative offset
        assert_eq!(
            text(0xF400, 0xD000).as_deref(),
            Some("BLX -16777216 (0xff001004)")
        );
        // S = 0, J1 = J2 = 0 gives I1 = I2 = 1 -> F000 D000
        assert_eq!(
            text(0xF000, 0xD000).as_deref(),
            Some("BLX 12582912 (0xc01004)")
        );
    }

    #[test]
    fn test_unlisted_branch_forms() {
        // B.W (op3 = 001) -> F000 B800
        assert_eq!(body(0xF000, 0xB800), Body::Unsupported);
    }

    #[test]
    fn test_decode_store_single() {
        // STR r1, [r2, #4]! -> F842 1D04
        assert_eq!(text(0xF842, 0x1D04).as_deref(), Some("STR r1, [r2, #4]!"));
        // STR r1, [r2], #4 -> F842 1B04
        assert_eq!(text(0xF842, 0x1B04).as_deref(), Some("STR r1, [r2], #4"));
        // STRT r1, [r2, #4] -> F842 1E04
        assert_eq!(text(0xF842, 0x1E04).as_deref(), Some("STRT r1, [r2, #4]"));
        // Offset field is sign-extended -> F842 1CFC
        assert_eq!(text(0xF842, 0x1CFC).as_deref(), Some("STR r1, [r2, #-4]"));
        // STR r4, [SP, #-4]! lists as PUSH -> F84D 4D04
        assert_eq!(text(0xF84D, 0x4D04).as_deref(), Some("PUSH r4"));
        // STR.W r1, [r2, #8] -> F8C2 1008
        assert_eq!(text(0xF8C2, 0x1008).as_deref(), Some("STR.W r1, [r2, #8]"));
    }

    #[test]
    fn test_store_single_undefined() {
        // Rn = PC -> F84F 1D04
        assert_eq!(body(0xF84F, 0x1D04), Body::Undefined);
        // P = 0, W = 0 -> F842 1804
        assert_eq!(body(0xF842, 0x1804), Body::Undefined);
        // STRB.W is not listed -> F882 1000
        assert_eq!(body(0xF882, 0x1000), Body::Unsupported);
    }

    #[test]
    fn test_decode_load_word() {
        // LDR.W r3, [r4, #12] -> F8D4 300C
        assert_eq!(text(0xF8D4, 0x300C).as_deref(), Some("LDR.W r3, [r4, #12]"));
        // Literal loads use the immediate form whatever the U bit -> F8DF 2010, F85F 2010
        assert_eq!(text(0xF8DF, 0x2010).as_deref(), Some("LDR.W r2, [PC, #16]"));
        assert_eq!(text(0xF85F, 0x2010).as_deref(), Some("LDR.W r2, [PC, #16]"));
        // LDR.W r0, [r1, r2, LSL #2] -> F851 0022
        assert_eq!(
            text(0xF851, 0x0022).as_deref(),
            Some("LDR.W r0, [r1, r2, LSL #2]")
        );
        // No shift -> F851 0002
        assert_eq!(text(0xF851, 0x0002).as_deref(), Some("LDR.W r0, [r1, r2]"));
        // LDRT r1, [r2, #8] -> F852 1E08
        assert_eq!(text(0xF852, 0x1E08).as_deref(), Some("LDRT r1, [r2, #8]"));
    }

    #[test]
    fn test_narrow_word_falls_back_to_thumb16() {
        // op1 = 0: first halfword is a 16-bit B, width still reported as 4
        let decoded = decode(0xE000_0000, 0x1000);
        assert_eq!(decoded.width, 4);
        assert_eq!(decoded.text(), Some("B 0 (0x1004)"));
    }

    #[test]
    fn test_decode_at_reads_halfwords_in_order() {
        // BL at 0x2000: bytes 00 F0 00 F8
        let decoded = decode_at(&[0x00, 0xF0, 0x00, 0xF8], 0x2000).unwrap();
        assert_eq!(decoded.raw, 0xF000_F800);
        assert_eq!(decoded.width, 4);
        assert_eq!(decoded.text(), Some("BLX 0 (0x2004)"));
        assert_eq!(
            decoded.to_string(),
            "\t\t\t0x2000: BLX 0 (0x2004)  // f000f800"
        );
    }
}
