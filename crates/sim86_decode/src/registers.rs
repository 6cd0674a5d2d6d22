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
//! Register selection tables.
//!
//! A [RegisterAccess] names a window into a register's two bytes of storage, so that AL, AH
//! and AX all refer to register A at different offsets and widths.

use std::fmt::{Display, Formatter};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Register {
    A,
    B,
    C,
    D,
    SP,
    BP,
    SI,
    DI,
    ES,
    CS,
    SS,
    DS,
}

impl Register {
    #[inline]
    pub fn is_segment(&self) -> bool {
        matches!(self, Register::ES | Register::CS | Register::SS | Register::DS)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegisterAccess {
    pub reg: Register,
    pub offset: u8,
    pub count: u8,
}

impl RegisterAccess {
    pub const fn new(reg: Register, offset: u8, count: u8) -> Self {
        Self { reg, offset, count }
    }

    /// Returns true if both accesses touch at least one common byte of the same register.
    pub fn aliases(&self, other: &RegisterAccess) -> bool {
        self.reg == other.reg
            && self.offset < other.offset + other.count
            && other.offset < self.offset + self.count
    }

    #[inline]
    pub fn is_word(&self) -> bool {
        self.count == 2
    }
}

impl Display for RegisterAccess {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let base = match self.reg {
            Register::A => "a",
            Register::B => "b",
            Register::C => "c",
            Register::D => "d",
            Register::SP => return write!(f, "sp"),
            Register::BP => return write!(f, "bp"),
            Register::SI => return write!(f, "si"),
            Register::DI => return write!(f, "di"),
            Register::ES => return write!(f, "es"),
            Register::CS => return write!(f, "cs"),
            Register::SS => return write!(f, "ss"),
            Register::DS => return write!(f, "ds"),
        };
        match (self.offset, self.count) {
            (0, 1) => write!(f, "{}l", base),
            (1, 1) => write!(f, "{}h", base),
            _ => write!(f, "{}x", base),
        }
    }
}

pub const AL: RegisterAccess = RegisterAccess::new(Register::A, 0, 1);
pub const AH: RegisterAccess = RegisterAccess::new(Register::A, 1, 1);
pub const AX: RegisterAccess = RegisterAccess::new(Register::A, 0, 2);
pub const CL: RegisterAccess = RegisterAccess::new(Register::C, 0, 1);
pub const CH: RegisterAccess = RegisterAccess::new(Register::C, 1, 1);
pub const CX: RegisterAccess = RegisterAccess::new(Register::C, 0, 2);
pub const DL: RegisterAccess = RegisterAccess::new(Register::D, 0, 1);
pub const DH: RegisterAccess = RegisterAccess::new(Register::D, 1, 1);
pub const DX: RegisterAccess = RegisterAccess::new(Register::D, 0, 2);
pub const BL: RegisterAccess = RegisterAccess::new(Register::B, 0, 1);
pub const BH: RegisterAccess = RegisterAccess::new(Register::B, 1, 1);
pub const BX: RegisterAccess = RegisterAccess::new(Register::B, 0, 2);
pub const SP: RegisterAccess = RegisterAccess::new(Register::SP, 0, 2);
pub const BP: RegisterAccess = RegisterAccess::new(Register::BP, 0, 2);
pub const SI: RegisterAccess = RegisterAccess::new(Register::SI, 0, 2);
pub const DI: RegisterAccess = RegisterAccess::new(Register::DI, 0, 2);
pub const ES: RegisterAccess = RegisterAccess::new(Register::ES, 0, 2);
pub const CS: RegisterAccess = RegisterAccess::new(Register::CS, 0, 2);
pub const SS: RegisterAccess = RegisterAccess::new(Register::SS, 0, 2);
pub const DS: RegisterAccess = RegisterAccess::new(Register::DS, 0, 2);

// Table 4-10 (MOD=11), indexed by [code][w].
pub const REGISTER_LUT: [[RegisterAccess; 2]; 8] = [
    [AL, AX],
    [CL, CX],
    [DL, DX],
    [BL, BX],
    [AH, SP],
    [CH, BP],
    [DH, SI],
    [BH, DI],
];

pub const SREGISTER_LUT: [RegisterAccess; 4] = [ES, CS, SS, DS];

// Table 4-10 (MOD=00, 01, 10).
pub const EFFECTIVE_ADDRESS_LUT: [&[RegisterAccess]; 8] = [
    &[BX, SI],
    &[BX, DI],
    &[BP, SI],
    &[BP, DI],
    &[SI],
    &[DI],
    &[BP],
    &[BX],
];

/// Addressing mode selected by the MOD field (table 4-8).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    MemNoDisp,
    MemDisp8,
    MemDisp16,
    Register,
}

impl Mode {
    pub const RM_DIRECT: u8 = 0b110;

    /// Converts a masked 2-bit MOD value.
    pub fn from_bits(bits: u8) -> Option<Mode> {
        match bits {
            0b00 => Some(Mode::MemNoDisp),
            0b01 => Some(Mode::MemDisp8),
            0b10 => Some(Mode::MemDisp16),
            0b11 => Some(Mode::Register),
            _ => None,
        }
    }

    #[inline]
    pub fn is_memory(&self) -> bool {
        *self != Mode::Register
    }

    /// Number of displacement bytes that follow, given the RM field.
    pub fn displacement_len(&self, rm: u8) -> usize {
        match self {
            Mode::MemNoDisp if rm == Mode::RM_DIRECT => 2,
            Mode::MemNoDisp => 0,
            Mode::MemDisp8 => 1,
            Mode::MemDisp16 => 2,
            Mode::Register => 0,
        }
    }
}

/// Look up a general register by its 3-bit code and W bit.
#[inline(always)]
pub fn register_for(code: u8, w: u8) -> RegisterAccess {
    REGISTER_LUT[(code & 0x07) as usize][(w & 0x01) as usize]
}

/// Look up a segment register by its 2-bit SR code. Segment registers are always word width.
#[inline(always)]
pub fn segment_register_for(sr: u8) -> RegisterAccess {
    SREGISTER_LUT[(sr & 0x03) as usize]
}

/// Base and index registers selected by RM under a memory mode. The second value is true for
/// the MOD=00, RM=110 direct address, which uses no registers and a 16-bit displacement.
pub fn effective_address_registers(rm: u8, mode: Mode) -> (&'static [RegisterAccess], bool) {
    let rm = rm & 0x07;
    if mode == Mode::MemNoDisp && rm == Mode::RM_DIRECT {
        (&[], true)
    }
    else {
        (EFFECTIVE_ADDRESS_LUT[rm as usize], false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_and_word_views_of_a() {
        let al = register_for(0, 0);
        let ax = register_for(0, 1);
        let ah = register_for(4, 0);
        assert_eq!(al, RegisterAccess::new(Register::A, 0, 1));
        assert_eq!(ax, RegisterAccess::new(Register::A, 0, 2));
        assert_eq!(ah, RegisterAccess::new(Register::A, 1, 1));
        assert_eq!(ah.reg, ax.reg);
    }

    #[test]
    fn code_four_is_ah_or_sp() {
        assert_eq!(register_for(4, 0), AH);
        assert_eq!(register_for(4, 1), SP);
        assert!(!register_for(4, 0).aliases(&register_for(4, 1)));
    }

    #[test]
    fn aliasing() {
        assert!(AL.aliases(&AX));
        assert!(AH.aliases(&AX));
        assert!(!AL.aliases(&AH));
        assert!(!AX.aliases(&BX));
        assert!(BX.aliases(&BL));
    }

    #[test]
    fn byte_registers_alias_their_word() {
        for code in 0..4 {
            let word = register_for(code, 1);
            assert!(register_for(code, 0).aliases(&word));
            assert!(register_for(code + 4, 0).aliases(&word));
        }
    }

    #[test]
    fn effective_address_table() {
        assert_eq!(effective_address_registers(0, Mode::MemDisp8), (&[BX, SI][..], false));
        assert_eq!(effective_address_registers(3, Mode::MemNoDisp), (&[BP, DI][..], false));
        assert_eq!(effective_address_registers(7, Mode::MemDisp16), (&[BX][..], false));
        assert_eq!(effective_address_registers(6, Mode::MemDisp8), (&[BP][..], false));
    }

    #[test]
    fn direct_address() {
        let (regs, direct) = effective_address_registers(Mode::RM_DIRECT, Mode::MemNoDisp);
        assert!(regs.is_empty());
        assert!(direct);
        assert_eq!(Mode::MemNoDisp.displacement_len(Mode::RM_DIRECT), 2);
        assert_eq!(Mode::MemNoDisp.displacement_len(0), 0);
    }

    #[test]
    fn register_names() {
        assert_eq!(AL.to_string(), "al");
        assert_eq!(AH.to_string(), "ah");
        assert_eq!(DX.to_string(), "dx");
        assert_eq!(SI.to_string(), "si");
        assert_eq!(segment_register_for(3).to_string(), "ds");
    }
}
