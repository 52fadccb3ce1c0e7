// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Region walking: picks the decoder for a region's mode and steps through
//! it by each instruction's width.

use crate::decoder::{arm32, thumb16, Decoded};
use crate::{DisasmResult, Mode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address range `[start, end)` of code together with its instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub start: u32,
    pub end: u32,
    pub mode: Mode,
}

impl Region {
    pub fn new(start: u32, end: u32, mode: Mode) -> Self {
        Self { start, end, mode }
    }

    /// Builds a region from interworking addresses: bit 0 of `start` selects
    /// Thumb. In Thumb mode bit 0 is cleared from both bounds; an ARM `end`
    /// is kept as given.
    pub fn from_tagged(start: u32, end: u32) -> Self {
        let (start, mode) = Mode::from_tagged(start);
        let end = match mode {
            Mode::Thumb => end & !1,
            Mode::Arm => end,
        };
        Self { start, end, mode }
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Iterator over the instruction slots of a region.
///
/// `code[0]` is the byte at `region.start`. The last instruction may extend
/// past `region.end`; its bytes must still be present in `code`, otherwise the
/// iterator yields a `Truncated` error and stops.
pub struct Instructions<'a> {
    code: &'a [u8],
    region: Region,
    cursor: u32,
    done: bool,
}

impl Iterator for Instructions<'_> {
    type Item = DisasmResult<Decoded>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor >= self.region.end {
            return None;
        }
        let offset = (self.cursor - self.region.start) as usize;
        let code = self.code.get(offset..).unwrap_or(&[]);
        let result = match self.region.mode {
            Mode::Arm => arm32::decode_at(code, self.cursor),
            Mode::Thumb => thumb16::decode_at(code, self.cursor),
        };
        match &result {
            Ok(decoded) => match self.cursor.checked_add(decoded.width as u32) {
                Some(next) => self.cursor = next,
                None => self.done = true,
            },
            Err(_) => self.done = true,
        }
        Some(result)
    }
}

pub fn instructions(code: &[u8], region: Region) -> Instructions<'_> {
    Instructions {
        code,
        region,
        cursor: region.start,
        done: false,
    }
}

/// Decodes every slot of `region` into a structured listing.
pub fn disassemble(code: &[u8], region: Region) -> DisasmResult<Vec<Decoded>> {
    instructions(code, region).collect()
}

/// Writes the text listing of `region` to `out`, one line per instruction.
///
/// Lines already written stay in `out` when a fetch runs off `code`.
pub fn dump_region<W: fmt::Write>(out: &mut W, code: &[u8], region: Region) -> DisasmResult<()> {
    tracing::debug!(
        "Dumping {:?} region {:#x}..{:#x} ({} bytes of code)",
        region.mode,
        region.start,
        region.end,
        code.len()
    );
    for decoded in instructions(code, region) {
        writeln!(out, "{}", decoded?)?;
    }
    Ok(())
}

/// Writes the listing for the interworking range `start..end`.
///
/// An odd `start` selects Thumb. `code[0]` is the byte at `start & !1`.
pub fn dump<W: fmt::Write>(out: &mut W, code: &[u8], start: u32, end: u32) -> DisasmResult<()> {
    dump_region(out, code, Region::from_tagged(start, end))
}
