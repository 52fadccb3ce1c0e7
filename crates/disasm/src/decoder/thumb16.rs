// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use super::{thumb32, Body, Decoded};
use crate::bits::{field, sign_extend};
use crate::operands::{BranchTarget, CondField, Register};
use crate::{read_u16, DisasmResult};

/// True when `halfword` is the first half of a 32-bit Thumb-2 instruction.
#[inline]
pub fn is_wide(halfword: u16) -> bool {
    (halfword & 0xF000) == 0xF000 || (halfword & 0xF800) == 0xE800
}

/// Decodes the Thumb instruction at the start of `code`, reading a second
/// halfword when the first one carries a 32-bit prefix.
pub fn decode_at(code: &[u8], address: u32) -> DisasmResult<Decoded> {
    let halfword = read_u16(code, 0, address)?;
    if is_wide(halfword) {
        return thumb32::decode_at(code, address);
    }
    Ok(decode(halfword, address))
}

/// Decodes a 16-bit Thumb instruction.
pub fn decode(halfword: u16, address: u32) -> Decoded {
    let body = match decode_body(halfword, address) {
        Some(text) => Body::Text(text),
        None => {
            tracing::trace!("No mnemonic for thumb16 {:#06x} at {:#x}", halfword, address);
            Body::Unsupported
        }
    };
    Decoded::thumb16(address, halfword, body)
}

fn decode_body(halfword: u16, address: u32) -> Option<String> {
    let instr = halfword as u32;
    let opcode1 = instr >> 10;

    // 0. Shift (immediate), add, subtract, move, and compare: 00xx xx..
    if opcode1 < 0x10 {
        let opcode2 = instr >> 9;
        return match opcode2 {
            // LSLS 000 00, LSRS 000 01, ASRS 000 10: 000o oiii iimm mddd
            0x0..=0xB => {
                let imm5 = field(instr, 6, 5);
                let rm = Register::new(field(instr, 3, 3));
                let rd = Register::new(field(instr, 0, 3));
                let mnemonic = if opcode2 <= 3 {
                    "LSLS"
                } else if opcode2 <= 7 {
                    "LSRS"
                } else {
                    "ASRS"
                };
                Some(format!("{} {}, {}, #{}", mnemonic, rd, rm, imm5))
            }
            // ADDS/SUBS register 0001 10s mmm nnn ddd
            // ADDS/SUBS imm3     0001 11s iii nnn ddd
            0xC..=0xF => {
                let imm3_or_rm = field(instr, 6, 3);
                let rn = Register::new(field(instr, 3, 3));
                let rd = Register::new(field(instr, 0, 3));
                let is_imm = opcode2 & 2 != 0;
                let mnemonic = if is_imm && imm3_or_rm == 0 {
                    "MOV"
                } else if opcode2 & 1 == 0 {
                    "ADDS"
                } else {
                    "SUBS"
                };
                let mut text = format!("{} {}, {}", mnemonic, rd, rn);
                if !is_imm {
                    text.push_str(&format!(", {}", Register::new(imm3_or_rm)));
                } else if imm3_or_rm != 0 {
                    text.push_str(&format!(", #{}", imm3_or_rm));
                }
                Some(text)
            }
            // MOVS/CMP/ADDS/SUBS Rdn, #imm8: 001o onnn iiii iiii
            _ => {
                let rn = Register::new(field(instr, 8, 3));
                let imm8 = field(instr, 0, 8);
                let mnemonic = match opcode2 >> 2 {
                    4 => "MOVS",
                    5 => "CMP",
                    6 => "ADDS",
                    _ => "SUBS",
                };
                Some(format!("{} {}, #{}", mnemonic, rn, imm8))
            }
        };
    }

    // 1. Special data / branch exchange: 0100 01oo oomm mnnn
    if opcode1 == 0x11 {
        let opcode2 = field(instr, 6, 4);
        let rm = Register::new(field(instr, 3, 4));
        // High bit of Rdn sits at bit 7, away from the low three bits.
        let rdn = Register::new((field(instr, 7, 1) << 3) | field(instr, 0, 3));
        return match opcode2 {
            0x0..=0x3 => Some(format!("ADD {}, {}", rdn, rm)),
            0x5..=0x7 => Some(format!("CMP {}, {}", rdn, rm)),
            0x8..=0xB => Some(format!("MOV {}, {}", rdn, rm)),
            0xC..=0xF => {
                let mnemonic = if opcode2 & 0x2 == 0 { "BX" } else { "BLX" };
                Some(format!("{} {}", mnemonic, rm))
            }
            _ => None,
        };
    }

    // 2. Miscellaneous: 1011 xxxx xxxx xxxx
    if (instr & 0xF000) == 0xB000 {
        let opcode2 = field(instr, 5, 7);
        return match opcode2 {
            // ADD/SUB SP, SP, #imm7*4: 1011 0000 siii iiii
            0x00..=0x07 => {
                let imm = field(instr, 0, 7) << 2;
                let mnemonic = if opcode2 & 4 == 0 { "ADD" } else { "SUB" };
                Some(format!("{} SP, SP, #{}", mnemonic, imm))
            }
            // IT and hints: 1011 1111 aaaa bbbb
            0x78..=0x7F => {
                let op_a = field(instr, 4, 4);
                let op_b = field(instr, 0, 4);
                if op_b != 0 {
                    return Some(format!("IT {:#x} {}", op_b, CondField(op_a)));
                }
                match op_a {
                    0 => Some("NOP".to_string()),
                    1 => Some("YIELD".to_string()),
                    2 => Some("WFE".to_string()),
                    3 => Some("SEV".to_string()),
                    _ => None,
                }
            }
            _ => None,
        };
    }

    // 3. Load/store single data item: 0101 ..., 011x ..., 100x ...
    if (instr & 0xF000) == 0x5000 || (instr & 0xE000) == 0x6000 || (instr & 0xE000) == 0x8000 {
        let is_load = instr & 0x0800 != 0;
        let mnemonic = if is_load { "LDR" } else { "STR" };
        return match instr >> 12 {
            // STR/LDR Rt, [Rn, #imm5*4]: 0110 liii iinn nttt
            0x6 => {
                let imm = field(instr, 6, 5) << 2;
                let rn = Register::new(field(instr, 3, 3));
                let rt = Register::new(field(instr, 0, 3));
                Some(format!("{} {}, [{}, #{}]", mnemonic, rt, rn, imm))
            }
            // STR/LDR Rt, [SP, #imm8*4]: 1001 lttt iiii iiii
            0x9 => {
                let imm = field(instr, 0, 8) << 2;
                let rt = Register::new(field(instr, 8, 3));
                Some(format!("{} {}, [SP, #{}]", mnemonic, rt, imm))
            }
            _ => None,
        };
    }

    // 4. Unconditional branch (T2): 1110 0iii iiii iiii
    if opcode1 == 0x38 || opcode1 == 0x39 {
        // 12-bit signed offset: imm11:'0'
        let offset = sign_extend(field(instr, 0, 11) << 1, 12);
        let target = BranchTarget::new(address.wrapping_add(4), offset);
        return Some(format!("B {}", target));
    }

    None
}
