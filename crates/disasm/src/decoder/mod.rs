// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod arm32;
pub mod thumb16;
pub mod thumb32;

use crate::Mode;
use serde::Serialize;
use std::fmt;

/// Rendered form of one instruction slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Body {
    /// No mnemonic for this encoding; only the raw bytes are listed.
    Unsupported,
    /// Architecturally reserved encoding.
    Undefined,
    /// Mnemonic and operands.
    Text(String),
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Unsupported => Ok(()),
            Body::Undefined => f.write_str("UNDEFINED "),
            Body::Text(text) => write!(f, "{}  // ", text),
        }
    }
}

/// One decoded instruction slot.
///
/// `raw` holds the instruction value: the halfword for 16-bit Thumb,
/// `first << 16 | second` for 32-bit Thumb and the word for ARM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decoded {
    pub address: u32,
    pub mode: Mode,
    pub width: u8,
    pub raw: u32,
    pub body: Body,
}

impl Decoded {
    pub(crate) fn thumb16(address: u32, halfword: u16, body: Body) -> Self {
        Self {
            address,
            mode: Mode::Thumb,
            width: 2,
            raw: halfword as u32,
            body,
        }
    }

    pub(crate) fn thumb32(address: u32, word: u32, body: Body) -> Self {
        Self {
            address,
            mode: Mode::Thumb,
            width: 4,
            raw: word,
            body,
        }
    }

    pub(crate) fn arm(address: u32, word: u32) -> Self {
        Self {
            address,
            mode: Mode::Arm,
            width: 4,
            raw: word,
            body: Body::Unsupported,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.body {
            Body::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Instruction bytes in memory order.
    pub fn bytes(&self) -> Vec<u8> {
        match (self.mode, self.width) {
            (Mode::Thumb, 2) => (self.raw as u16).to_le_bytes().to_vec(),
            (Mode::Thumb, _) => {
                let mut bytes = ((self.raw >> 16) as u16).to_le_bytes().to_vec();
                bytes.extend_from_slice(&(self.raw as u16).to_le_bytes());
                bytes
            }
            (Mode::Arm, _) => self.raw.to_le_bytes().to_vec(),
        }
    }
}

impl fmt::Display for Decoded {
    /// Listing line without the terminating newline.
    ///
    /// A 16-bit Thumb slot lists its two bytes in memory order; 32-bit slots
    /// list the instruction word as a number.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\t\t\t{:#x}: {}", self.address, self.body)?;
        if self.width == 2 {
            for byte in self.bytes() {
                write!(f, "{:02x}", byte)?;
            }
            Ok(())
        } else {
            write!(f, "{:08x}", self.raw)
        }
    }
}
