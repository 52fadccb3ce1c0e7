// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Listing disassembler for ARM and Thumb/Thumb-2 machine code.
//!
//! Renders raw instruction bytes into one text line per instruction slot, for
//! debugging output. Decoding is best effort: encodings without a mnemonic
//! still produce a line carrying the raw bytes.

pub mod bits;
pub mod decoder;
pub mod dump;
pub mod operands;

pub use decoder::{Body, Decoded};
pub use dump::{disassemble, dump, dump_region, instructions, Instructions, Region};
pub use operands::{BranchTarget, CondField, Condition, Register, RegisterList};

/// Instruction set the bytes of a region are interpreted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Arm,
    Thumb,
}

impl Mode {
    /// Splits an interworking address into its clean address and mode.
    /// Bit 0 set selects Thumb.
    pub fn from_tagged(addr: u32) -> (u32, Mode) {
        if addr & 1 == 0 {
            (addr, Mode::Arm)
        } else {
            (addr & !1, Mode::Thumb)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DisasmError {
    /// `address` is where the failed fetch starts; for a wide Thumb
    /// instruction missing its second halfword that is the instruction
    /// address + 2.
    #[error("Instruction fetch at {address:#x} needs {needed} bytes, only {available} available")]
    Truncated {
        address: u32,
        needed: usize,
        available: usize,
    },
    #[error("Listing sink rejected write")]
    Sink(#[from] std::fmt::Error),
}

pub type DisasmResult<T> = Result<T, DisasmError>;

/// Reads a little-endian halfword at `offset` of `code`.
pub(crate) fn read_u16(code: &[u8], offset: usize, address: u32) -> DisasmResult<u16> {
    match code.get(offset..) {
        Some([b0, b1, ..]) => Ok(u16::from_le_bytes([*b0, *b1])),
        _ => Err(truncated(code, offset, 2, address)),
    }
}

/// Reads a little-endian word at the start of `code`.
pub(crate) fn read_u32(code: &[u8], address: u32) -> DisasmResult<u32> {
    match code {
        [b0, b1, b2, b3, ..] => Ok(u32::from_le_bytes([*b0, *b1, *b2, *b3])),
        _ => Err(truncated(code, 0, 4, address)),
    }
}

fn truncated(code: &[u8], offset: usize, len: usize, address: u32) -> DisasmError {
    let available = code.len().saturating_sub(offset);
    tracing::warn!(
        "Fetch of {} bytes at {:#x} runs past the code buffer",
        len,
        address.wrapping_add(offset as u32)
    );
    DisasmError::Truncated {
        address: address.wrapping_add(offset as u32),
        needed: len,
        available,
    }
}
