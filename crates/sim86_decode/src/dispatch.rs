/*
    sim86
    Copyright 2022-2025 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.
*/
//! Compiles an encoding table into a first-byte dispatch table.
//!
//! Every variable field in the leading byte of an encoding (D, W, REG, ...) multiplies the
//! number of opcode bytes that route to it. The dispatch table holds one slot per possible
//! first byte so lookup is a single index.

use tracing::{debug, trace, warn};

use crate::{
    encoding::{FieldRole, FieldSpec, InstructionEncoding, ENCODINGS_8086, MAX_ENCODING_BITS, MAX_FIELDS},
    error::ConfigError,
};

/// Expands the fields that make up a first byte into every byte value they can match.
///
/// Literal fields contribute their fixed bits; each variable field of width `n` forks the
/// expansion into `2^n` values in ascending order. Zero-width fields are skipped.
pub fn expand_first_byte_variants(fields: &[FieldSpec]) -> Result<Vec<u8>, ConfigError> {
    let mut variants = Vec::new();
    expand(fields, 0, 0, &mut variants)?;
    Ok(variants)
}

fn expand(fields: &[FieldSpec], prefix: u32, bits: u32, out: &mut Vec<u8>) -> Result<(), ConfigError> {
    let Some((field, rest)) = fields.split_first() else {
        out.push(prefix as u8);
        return Ok(());
    };

    if field.bit_count == 0 {
        return expand(rest, prefix, bits, out);
    }

    let width = field.bit_count as u32;
    let bits = bits + width;
    if bits > 8 {
        return Err(ConfigError::PrefixTooWide { bits });
    }

    match field.role {
        FieldRole::Literal => {
            let value = field.value as u32 & ((1 << width) - 1);
            expand(rest, (prefix << width) | value, bits, out)
        }
        _ => {
            for value in 0..(1u32 << width) {
                expand(rest, (prefix << width) | value, bits, out)?;
            }
            Ok(())
        }
    }
}

/// Maps each first byte to the encoding that decodes it.
#[derive(Clone, Debug)]
pub struct DispatchTable {
    entries: [Option<InstructionEncoding>; 256],
}

impl DispatchTable {
    /// Builds a table from `encodings`. Fails if any encoding is malformed or if two encodings
    /// claim the same first byte.
    pub fn build(encodings: &[InstructionEncoding]) -> Result<DispatchTable, ConfigError> {
        let mut entries: [Option<InstructionEncoding>; 256] = [None; 256];
        let mut owners: [Option<usize>; 256] = [None; 256];

        for (index, encoding) in encodings.iter().enumerate() {
            let op = encoding.op;
            if encoding.fields.len() > MAX_FIELDS {
                return Err(ConfigError::TooManyFields {
                    index,
                    op,
                    count: encoding.fields.len(),
                });
            }
            let total_bits = encoding.bit_count();
            if total_bits > MAX_ENCODING_BITS {
                return Err(ConfigError::EncodingTooWide { index, op, bits: total_bits });
            }

            let prefix = encoding.first_byte_fields();
            let variants = expand_first_byte_variants(prefix)?;
            let prefix_bits: u32 = prefix.iter().map(|f| f.bit_count as u32).sum();
            if prefix_bits < 8 {
                return Err(ConfigError::PrefixTooNarrow { index, op, bits: prefix_bits });
            }

            trace!("encoding {index} ({op}): {} first byte variant(s)", variants.len());

            for byte in variants {
                if let Some(first) = owners[byte as usize] {
                    warn!("first byte {byte:08b} claimed by encodings {first} and {index}");
                    return Err(ConfigError::OverlappingEncodings { byte, first, second: index });
                }
                owners[byte as usize] = Some(index);
                entries[byte as usize] = Some(*encoding);
            }
        }

        let table = DispatchTable { entries };
        debug!("built dispatch table: {} encodings, {} opcode bytes", encodings.len(), table.len());
        Ok(table)
    }

    /// Builds the table for the built-in 8086 encodings.
    pub fn standard() -> Result<DispatchTable, ConfigError> {
        DispatchTable::build(ENCODINGS_8086)
    }

    #[inline(always)]
    pub fn lookup(&self, byte: u8) -> Option<&InstructionEncoding> {
        self.entries[byte as usize].as_ref()
    }

    /// Iterates over every mapped first byte in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &InstructionEncoding)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(byte, enc)| enc.as_ref().map(|enc| (byte as u8, enc)))
    }

    /// Number of mapped first bytes.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
