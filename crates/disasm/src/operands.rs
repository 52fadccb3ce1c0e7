// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Text renderers for decoded operand fields.

use std::fmt;

/// Core register r0-r15. r13-r15 render by their role names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Register(u8);

impl Register {
    pub const SP: Register = Register(13);
    pub const LR: Register = Register(14);
    pub const PC: Register = Register(15);

    /// Only the low four bits of `index` are significant.
    pub fn new(index: u32) -> Self {
        Self((index & 0xF) as u8)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            13 => f.write_str("SP"),
            14 => f.write_str("LR"),
            15 => f.write_str("PC"),
            n => write!(f, "r{}", n),
        }
    }
}

bitflags::bitflags! {
    /// Register set of multi-register transfers. Bit `i` selects register `i`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RegisterList: u16 {
        const R0 = 1 << 0;
        const R1 = 1 << 1;
        const R2 = 1 << 2;
        const R3 = 1 << 3;
        const R4 = 1 << 4;
        const R5 = 1 << 5;
        const R6 = 1 << 6;
        const R7 = 1 << 7;
        const R8 = 1 << 8;
        const R9 = 1 << 9;
        const R10 = 1 << 10;
        const R11 = 1 << 11;
        const R12 = 1 << 12;
        const SP = 1 << 13;
        const LR = 1 << 14;
        const PC = 1 << 15;
    }
}

impl RegisterList {
    pub fn from_mask(mask: u16) -> Self {
        Self::from_bits_retain(mask)
    }

    /// Members in ascending register order.
    pub fn registers(self) -> impl Iterator<Item = Register> {
        (0..16u32)
            .filter(move |i| self.bits() & (1 << i) != 0)
            .map(Register::new)
    }
}

impl fmt::Display for RegisterList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("<no register list?>");
        }
        f.write_str("{")?;
        for (i, reg) in self.registers().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", reg)?;
        }
        f.write_str("}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Eq,
    Ne,
    Cs,
    Cc,
    Mi,
    Pl,
    Vs,
    Vc,
    Hi,
    Ls,
    Ge,
    Lt,
    Gt,
    Le,
    Al,
}

impl Condition {
    /// `None` for 0b1111, which has no condition mnemonic.
    pub fn from_bits(bits: u32) -> Option<Self> {
        use Condition::*;
        Some(match bits {
            0x0 => Eq,
            0x1 => Ne,
            0x2 => Cs,
            0x3 => Cc,
            0x4 => Mi,
            0x5 => Pl,
            0x6 => Vs,
            0x7 => Vc,
            0x8 => Hi,
            0x9 => Ls,
            0xA => Ge,
            0xB => Lt,
            0xC => Gt,
            0xD => Le,
            0xE => Al,
            _ => return None,
        })
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Condition::Eq => "EQ",
            Condition::Ne => "NE",
            Condition::Cs => "CS",
            Condition::Cc => "CC",
            Condition::Mi => "MI",
            Condition::Pl => "PL",
            Condition::Vs => "VS",
            Condition::Vc => "VC",
            Condition::Hi => "HI",
            Condition::Ls => "LS",
            Condition::Ge => "GE",
            Condition::Lt => "LT",
            Condition::Gt => "GT",
            Condition::Le => "LE",
            Condition::Al => "AL",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Raw condition field as found in an encoding. Values without a mnemonic
/// render as an inline diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CondField(pub u32);

impl fmt::Display for CondField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Condition::from_bits(self.0) {
            Some(cond) => write!(f, "{}", cond),
            None => write!(f, "Unexpected condition: {}", self.0),
        }
    }
}

/// PC-relative branch destination.
///
/// `base` is the PC value the offset applies to: the instruction address
/// plus four in Thumb state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchTarget {
    pub base: u32,
    pub offset: i32,
}

impl BranchTarget {
    pub fn new(base: u32, offset: i32) -> Self {
        Self { base, offset }
    }

    pub fn absolute(self) -> u32 {
        self.base.wrapping_add_signed(self.offset)
    }
}

impl fmt::Display for BranchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#x})", self.offset, self.absolute())
    }
}
