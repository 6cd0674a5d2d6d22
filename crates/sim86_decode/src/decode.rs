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
//! Walks a matched [InstructionEncoding] over a bit stream and assembles the instruction.

use tracing::trace;

use crate::{
    bit_reader::BitReader,
    decoder::DecoderOptions,
    encoding::{FieldRole, InstructionEncoding},
    error::DecodeError,
    instruction::{DecodedInstruction, MemoryAccess, Operand},
    registers::{effective_address_registers, register_for, segment_register_for, Mode, RegisterAccess},
};

/// Field values collected while scanning an encoding.
#[derive(Default)]
struct FieldState {
    d: u8,
    s: u8,
    w: u8,
    mode: Option<Mode>,
    rm: Option<u8>,
    reg: Option<RegisterAccess>,
    has_data: bool,
    data_if_w: bool,
    disp_always_w: bool,
    rm_reg_always_w: bool,
}

/// Decodes one instruction with default [DecoderOptions]. `reader` must be positioned at the
/// first byte of the instruction that selected `encoding`.
pub fn decode(reader: &mut impl BitReader, encoding: &InstructionEncoding) -> Result<DecodedInstruction, DecodeError> {
    decode_with_options(reader, encoding, &DecoderOptions::default())
}

pub fn decode_with_options(
    reader: &mut impl BitReader,
    encoding: &InstructionEncoding,
    options: &DecoderOptions,
) -> Result<DecodedInstruction, DecodeError> {
    let mut st = FieldState::default();

    for field in encoding.fields {
        let bits = match field.bit_count {
            0 => field.value,
            n => reader.read_bits(n)?,
        };

        match field.role {
            FieldRole::Literal => {
                if options.check_literals && field.bit_count > 0 && bits != field.value {
                    return Err(DecodeError::FieldRange {
                        field: FieldRole::Literal,
                        value: bits,
                        min: field.value,
                        max: field.value,
                    });
                }
            }
            FieldRole::D => st.d = check(FieldRole::D, bits, 1)?,
            FieldRole::S => st.s = check(FieldRole::S, bits, 1)?,
            FieldRole::W => st.w = check(FieldRole::W, bits, 1)?,
            FieldRole::Mod => {
                st.mode = Mode::from_bits(bits);
                if st.mode.is_none() {
                    return Err(DecodeError::field_range(FieldRole::Mod, bits, 3));
                }
            }
            FieldRole::Reg => {
                let reg = check(FieldRole::Reg, bits, 7)?;
                st.reg = Some(register_for(reg, st.w));
            }
            FieldRole::Rm => st.rm = Some(check(FieldRole::Rm, bits, 7)?),
            FieldRole::Sr => {
                let sr = check(FieldRole::Sr, bits, 3)?;
                st.reg = Some(segment_register_for(sr));
            }
            FieldRole::Data => st.has_data = true,
            FieldRole::WMakesDataW => st.data_if_w = true,
            FieldRole::DispAlwaysW => st.disp_always_w = true,
            FieldRole::RmRegAlwaysW => st.rm_reg_always_w = true,
            FieldRole::Disp | FieldRole::RelJmpDisp | FieldRole::Far => {}
        }
    }

    let rm_operand = match (st.mode, st.rm) {
        (Some(Mode::Register), Some(rm)) => {
            let w = if st.rm_reg_always_w { 1 } else { st.w };
            Some(Operand::Register(register_for(rm, w)))
        }
        (Some(mode), Some(rm)) => {
            let (regs, direct) = effective_address_registers(rm, mode);
            let disp_len = if direct || st.disp_always_w { 2 } else { mode.displacement_len(rm) };
            let disp = reader.read_le16(disp_len)?;
            Some(Operand::Memory(MemoryAccess::new(regs, disp)))
        }
        (None, None) => None,
        _ => return Err(DecodeError::IncompleteEncoding { op: encoding.op }),
    };

    let immediate = match st.has_data {
        true => Some(Operand::Immediate(read_data(reader, &st)?)),
        false => None,
    };

    let (reg_side, rm_side) = match (st.reg, rm_operand, immediate) {
        (Some(reg), Some(rm), None) => (Operand::Register(reg), rm),
        (Some(reg), None, Some(imm)) => (Operand::Register(reg), imm),
        (None, Some(rm), Some(imm)) => (imm, rm),
        _ => return Err(DecodeError::IncompleteEncoding { op: encoding.op }),
    };

    let instruction = match st.d {
        1 => DecodedInstruction::new(encoding.op, reg_side, rm_side),
        _ => DecodedInstruction::new(encoding.op, rm_side, reg_side),
    };
    trace!("decoded {:?}", instruction);
    Ok(instruction)
}

#[inline]
fn check(field: FieldRole, value: u8, max: u8) -> Result<u8, DecodeError> {
    if value > max {
        return Err(DecodeError::field_range(field, value, max));
    }
    Ok(value)
}

/// Reads the immediate data field that follows any displacement.
fn read_data(reader: &mut impl BitReader, st: &FieldState) -> Result<u16, DecodeError> {
    let wide = st.w == 1;
    if st.data_if_w && wide && st.s == 0 {
        return Ok(reader.read_le16(2)?);
    }
    let byte = reader.read_u8()?;
    if wide && st.s == 1 {
        // Sign-extend the byte to a word.
        return Ok(byte as i8 as i16 as u16);
    }
    Ok(byte as u16)
}
