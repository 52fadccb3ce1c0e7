// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! ARM (A32) listing. Words are listed raw; there is no mnemonic decoding
//! for this instruction set yet.

use super::Decoded;
use crate::{read_u32, DisasmResult};

/// Lists the ARM word at the start of `code`.
pub fn decode_at(code: &[u8], address: u32) -> DisasmResult<Decoded> {
    let word = read_u32(code, address)?;
    Ok(decode(word, address))
}

pub fn decode(word: u32, address: u32) -> Decoded {
    Decoded::arm(address, word)
}
