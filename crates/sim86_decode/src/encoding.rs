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
//! Declarative description of 8086 instruction bit layouts.
//!
//! Each [InstructionEncoding] is an ordered list of [FieldSpec]s read most significant bit
//! first, as laid out in table 4-12 of the Intel 8086 manual. The table carries no logic; the
//! dispatch compiler and the decoder interpret it.

use std::fmt::{Display, Formatter};

/// Maximum number of fields in a single encoding.
pub const MAX_FIELDS: usize = 16;
/// Maximum number of stream bits an encoding may describe before displacement and data bytes.
pub const MAX_ENCODING_BITS: u32 = 16;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Mov,
    Add,
    Sub,
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Mov => write!(f, "mov"),
            OperationKind::Add => write!(f, "add"),
            OperationKind::Sub => write!(f, "sub"),
        }
    }
}

/// What a group of bits in an encoding means.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldRole {
    Literal,
    D,
    S,
    W,
    Mod,
    Reg,
    Rm,
    Sr,
    /// Marks an encoding that addresses memory through a displacement.
    Disp,
    /// Marks an encoding that carries an immediate data field.
    Data,
    /// Tag: the displacement is always 16 bits.
    DispAlwaysW,
    /// Tag: W=1 (with S=0) makes the data field 16 bits.
    WMakesDataW,
    /// Tag: a register encoded in RM is always 16 bits.
    RmRegAlwaysW,
    /// Tag: the displacement is relative to the next instruction.
    RelJmpDisp,
    /// Tag: the instruction is a far transfer.
    Far,
}

impl FieldRole {
    /// Returns true for roles that never consume stream bits.
    pub fn is_tag(&self) -> bool {
        matches!(
            self,
            FieldRole::DispAlwaysW | FieldRole::WMakesDataW | FieldRole::RmRegAlwaysW | FieldRole::RelJmpDisp | FieldRole::Far
        )
    }
}

impl Display for FieldRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldRole::Literal => "literal",
            FieldRole::D => "D",
            FieldRole::S => "S",
            FieldRole::W => "W",
            FieldRole::Mod => "MOD",
            FieldRole::Reg => "REG",
            FieldRole::Rm => "RM",
            FieldRole::Sr => "SR",
            FieldRole::Disp => "DISP",
            FieldRole::Data => "DATA",
            FieldRole::DispAlwaysW => "DISP_ALWAYS_W",
            FieldRole::WMakesDataW => "W_MAKES_DATA_W",
            FieldRole::RmRegAlwaysW => "RM_REG_ALWAYS_W",
            FieldRole::RelJmpDisp => "REL_JMP_DISP",
            FieldRole::Far => "FAR",
        };
        write!(f, "{}", name)
    }
}

/// A single element of an encoding.
///
/// A `bit_count` of 0 with a role other than [FieldRole::Literal] supplies `value` without
/// reading the stream. This is how accumulator-only forms hard-code REG, MOD, RM, D or W.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    pub role: FieldRole,
    pub bit_count: u8,
    pub value: u8,
}

impl FieldSpec {
    pub const fn new(role: FieldRole, bit_count: u8, value: u8) -> Self {
        Self { role, bit_count, value }
    }

    #[inline(always)]
    pub fn is_implicit(&self) -> bool {
        self.bit_count == 0
    }
}

/// A fixed bit pattern of `bit_count` bits.
pub const fn lit(value: u8, bit_count: u8) -> FieldSpec {
    FieldSpec::new(FieldRole::Literal, bit_count, value)
}

/// An implicit field: `role` takes `value` without consuming stream bits.
pub const fn imp(role: FieldRole, value: u8) -> FieldSpec {
    FieldSpec::new(role, 0, value)
}

pub const D: FieldSpec = FieldSpec::new(FieldRole::D, 1, 0);
pub const S: FieldSpec = FieldSpec::new(FieldRole::S, 1, 0);
pub const W: FieldSpec = FieldSpec::new(FieldRole::W, 1, 0);
pub const MOD: FieldSpec = FieldSpec::new(FieldRole::Mod, 2, 0);
pub const REG: FieldSpec = FieldSpec::new(FieldRole::Reg, 3, 0);
pub const RM: FieldSpec = FieldSpec::new(FieldRole::Rm, 3, 0);
pub const SR: FieldSpec = FieldSpec::new(FieldRole::Sr, 2, 0);
pub const ADDR: FieldSpec = FieldSpec::new(FieldRole::Disp, 0, 0);
pub const DATA: FieldSpec = FieldSpec::new(FieldRole::Data, 0, 0);
pub const DISP_ALWAYS_W: FieldSpec = FieldSpec::new(FieldRole::DispAlwaysW, 0, 1);
pub const DATA_IF_W: FieldSpec = FieldSpec::new(FieldRole::WMakesDataW, 0, 1);
pub const RM_REG_ALWAYS_W: FieldSpec = FieldSpec::new(FieldRole::RmRegAlwaysW, 0, 1);
pub const REL_JMP_DISP: FieldSpec = FieldSpec::new(FieldRole::RelJmpDisp, 0, 1);
pub const FAR: FieldSpec = FieldSpec::new(FieldRole::Far, 0, 1);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstructionEncoding {
    pub op: OperationKind,
    pub fields: &'static [FieldSpec],
}

impl InstructionEncoding {
    pub const fn new(op: OperationKind, fields: &'static [FieldSpec]) -> Self {
        Self { op, fields }
    }

    /// Total number of stream bits described by the encoding.
    pub fn bit_count(&self) -> u32 {
        self.fields.iter().map(|f| f.bit_count as u32).sum()
    }

    /// The fields that determine the first byte: every field up to and including the one that
    /// reaches (or crosses) the 8-bit boundary. Returns all fields if the boundary is never
    /// reached.
    pub fn first_byte_fields(&self) -> &'static [FieldSpec] {
        let mut bits = 0u32;
        for (i, field) in self.fields.iter().enumerate() {
            bits += field.bit_count as u32;
            if bits >= 8 {
                return &self.fields[..=i];
            }
        }
        self.fields
    }

    pub fn has_role(&self, role: FieldRole) -> bool {
        self.fields.iter().any(|f| f.role == role)
    }
}

use FieldRole::{D as ImpD, Mod as ImpMod, Reg as ImpReg, Rm as ImpRm, W as ImpW};
use OperationKind::{Add, Mov, Sub};

/// Mov, Add and Sub forms from table 4-12 of the Intel 8086 manual.
///
/// The "immediate to register/memory" forms of Add and Sub share first bytes 0x80-0x83 and
/// are distinguished only by the REG field of the second byte, so they cannot be told apart by
/// a first-byte dispatch table and are not listed.
pub const ENCODINGS_8086: &[InstructionEncoding] = &[
    // register/memory to/from register
    InstructionEncoding::new(Mov, &[lit(0b100010, 6), D, W, MOD, REG, RM]),
    // immediate to register/memory
    InstructionEncoding::new(Mov, &[lit(0b1100011, 7), W, MOD, lit(0b000, 3), RM, DATA, DATA_IF_W, imp(ImpD, 0)]),
    // immediate to register
    InstructionEncoding::new(Mov, &[lit(0b1011, 4), W, REG, DATA, DATA_IF_W, imp(ImpD, 1)]),
    // memory to accumulator
    InstructionEncoding::new(
        Mov,
        &[
            lit(0b1010000, 7),
            W,
            ADDR,
            DISP_ALWAYS_W,
            imp(ImpReg, 0),
            imp(ImpMod, 0),
            imp(ImpRm, 0b110),
            imp(ImpD, 1),
        ],
    ),
    // accumulator to memory
    InstructionEncoding::new(
        Mov,
        &[
            lit(0b1010001, 7),
            W,
            ADDR,
            DISP_ALWAYS_W,
            imp(ImpReg, 0),
            imp(ImpMod, 0),
            imp(ImpRm, 0b110),
            imp(ImpD, 0),
        ],
    ),
    // register/memory to segment register and back, folded into one entry with an explicit D bit
    InstructionEncoding::new(Mov, &[lit(0b100011, 6), D, lit(0, 1), MOD, lit(0, 1), SR, RM, imp(ImpW, 1)]),
    // reg/memory with register to either
    InstructionEncoding::new(Add, &[lit(0b000000, 6), D, W, MOD, REG, RM]),
    // immediate to accumulator
    InstructionEncoding::new(Add, &[lit(0b0000010, 7), W, DATA, DATA_IF_W, imp(ImpReg, 0), imp(ImpD, 1)]),
    // reg/memory with register to either
    InstructionEncoding::new(Sub, &[lit(0b001010, 6), D, W, MOD, REG, RM]),
    // immediate from accumulator
    InstructionEncoding::new(Sub, &[lit(0b0010110, 7), W, DATA, DATA_IF_W, imp(ImpReg, 0), imp(ImpD, 1)]),
];
