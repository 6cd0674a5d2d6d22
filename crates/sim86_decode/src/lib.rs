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
//! Table-driven decoder for 8086 machine code.
//!
//! An [encoding] table describes the bit layout of each instruction form. The [dispatch]
//! compiler expands it into a first-byte lookup table, and [decode](mod@decode) walks a matched encoding over
//! a [bit_reader::BitReader] to produce a [DecodedInstruction].
//!
//! ```
//! use sim86_decode::prelude::*;
//!
//! let table = DispatchTable::standard().expect("valid encoding table");
//! let ins = decode_one(&[0x8A, 0xC4], &table).unwrap();
//! assert_eq!(ins.op, OperationKind::Mov);
//! assert_eq!(ins.operands, [Operand::Register(AL), Operand::Register(AH)]);
//! ```

pub mod bit_reader;
pub mod decode;
pub mod decoder;
pub mod dispatch;
pub mod encoding;
pub mod error;
pub mod instruction;
pub mod registers;

pub use bit_reader::{BitReader, SliceBitReader};
pub use decode::{decode, decode_with_options};
pub use decoder::{decode_one, Decoder, DecoderOptions};
pub use dispatch::{expand_first_byte_variants, DispatchTable};
pub use encoding::{FieldRole, FieldSpec, InstructionEncoding, OperationKind, ENCODINGS_8086};
pub use error::{ConfigError, DecodeError, StreamError};
pub use instruction::{DecodedInstruction, MemoryAccess, Operand};
pub use registers::{effective_address_registers, register_for, segment_register_for, Register, RegisterAccess};

pub mod prelude {
    pub use crate::{
        bit_reader::{BitReader, SliceBitReader},
        decode::{decode, decode_with_options},
        decoder::{decode_one, Decoder, DecoderOptions},
        dispatch::{expand_first_byte_variants, DispatchTable},
        encoding::{FieldRole, FieldSpec, InstructionEncoding, OperationKind, ENCODINGS_8086},
        error::{ConfigError, DecodeError, StreamError},
        instruction::{DecodedInstruction, MemoryAccess, Operand},
        registers::*,
    };
}
