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
use crate::{encoding::OperationKind, registers::RegisterAccess};

/// A memory operand: up to two base/index registers plus a 16-bit displacement. No registers
/// means a direct address.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryAccess {
    pub regs: Vec<RegisterAccess>,
    pub disp: u16,
}

impl MemoryAccess {
    pub fn new(regs: &[RegisterAccess], disp: u16) -> Self {
        Self { regs: regs.to_vec(), disp }
    }

    pub fn direct(disp: u16) -> Self {
        Self { regs: Vec::new(), disp }
    }

    #[inline]
    pub fn is_direct(&self) -> bool {
        self.regs.is_empty()
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Register(RegisterAccess),
    Memory(MemoryAccess),
    /// Raw little-endian immediate field, sign-extended to 16 bits when S=1 and W=1.
    Immediate(u16),
}

impl Operand {
    pub fn is_memory(&self) -> bool {
        matches!(self, Operand::Memory(_))
    }

    pub fn register(&self) -> Option<RegisterAccess> {
        match self {
            Operand::Register(r) => Some(*r),
            _ => None,
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub op: OperationKind,
    /// Slot 0 is the destination.
    pub operands: [Operand; 2],
}

impl DecodedInstruction {
    pub fn new(op: OperationKind, destination: Operand, source: Operand) -> Self {
        Self { op, operands: [destination, source] }
    }

    #[inline]
    pub fn destination(&self) -> &Operand {
        &self.operands[0]
    }

    #[inline]
    pub fn source(&self) -> &Operand {
        &self.operands[1]
    }
}
