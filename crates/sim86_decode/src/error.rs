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
use thiserror::Error;

use crate::encoding::{FieldRole, OperationKind};

/// A defect in an encoding table, detected while building the dispatch table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("first-byte fields span {bits} bits, expected at most 8")]
    PrefixTooWide { bits: u32 },
    #[error("encoding {index} ({op}): first-byte fields span only {bits} bits")]
    PrefixTooNarrow { index: usize, op: OperationKind, bits: u32 },
    #[error("encoding {index} ({op}): {count} fields, expected at most 16")]
    TooManyFields { index: usize, op: OperationKind, count: usize },
    #[error("encoding {index} ({op}): {bits} stream bits, expected at most 16")]
    EncodingTooWide { index: usize, op: OperationKind, bits: u32 },
    #[error("first byte {byte:08b} matches encoding {first} and encoding {second}")]
    OverlappingEncodings { byte: u8, first: usize, second: usize },
}

/// A failure reading from a [crate::bit_reader::BitReader].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("unexpected end of stream: needed {needed} byte(s), {available} available")]
    UnexpectedEof { needed: usize, available: usize },
    #[error("byte read at bit offset {bit_offset} is not byte aligned")]
    Misaligned { bit_offset: usize },
    #[error("reading {requested} bit(s) at bit offset {bit_offset} crosses a byte boundary")]
    ByteBoundary { bit_offset: usize, requested: u8 },
    #[error("cannot read {0} bits at once, expected at most 8")]
    BitCountTooLarge(u8),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error("{field} value {value} outside {min}..={max}")]
    FieldRange { field: FieldRole, value: u8, min: u8, max: u8 },
    #[error("{op} encoding does not describe two operands")]
    IncompleteEncoding { op: OperationKind },
    #[error("no encoding matches first byte {0:08b}")]
    UnknownOpcode(u8),
}

impl DecodeError {
    pub(crate) fn field_range(field: FieldRole, value: u8, max: u8) -> Self {
        DecodeError::FieldRange { field, value, min: 0, max }
    }
}
