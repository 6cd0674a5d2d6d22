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
use crate::{
    bit_reader::{BitReader, SliceBitReader},
    decode::decode_with_options,
    dispatch::DispatchTable,
    error::DecodeError,
    instruction::DecodedInstruction,
};

/// Options controlling decoding behavior
#[derive(Copy, Clone, Debug)]
pub struct DecoderOptions {
    /// Reject instructions whose literal bits past the first byte differ from the encoding.
    pub check_literals: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self { check_literals: true }
    }
}

/// Decodes a sequence of instructions from a byte slice using a [DispatchTable].
pub struct Decoder<'a> {
    reader: SliceBitReader<'a>,
    table: &'a DispatchTable,
    opts: DecoderOptions,
    failed: bool,
}

impl<'a> Decoder<'a> {
    pub fn new(bytes: &'a [u8], table: &'a DispatchTable, opts: DecoderOptions) -> Self {
        Self {
            reader: SliceBitReader::new(bytes),
            table,
            opts,
            failed: false,
        }
    }

    /// Borrow the options
    pub fn options(&self) -> DecoderOptions {
        self.opts
    }

    /// Byte offset of the next instruction.
    pub fn position(&self) -> usize {
        self.reader.byte_position()
    }

    /// Decode the instruction at the cursor.
    pub fn decode_next(&mut self) -> Result<DecodedInstruction, DecodeError> {
        let opcode = self.reader.peek_u8()?;
        let encoding = self.table.lookup(opcode).ok_or(DecodeError::UnknownOpcode(opcode))?;
        decode_with_options(&mut self.reader, encoding, &self.opts)
    }
}

impl Iterator for Decoder<'_> {
    type Item = Result<DecodedInstruction, DecodeError>;

    /// Yields instructions until the input is exhausted. Stops after the first error, since the
    /// cursor can no longer be trusted to sit on an instruction boundary.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.is_empty() {
            return None;
        }
        let result = self.decode_next();
        self.failed = result.is_err();
        Some(result)
    }
}

/// Convenience helper to decode a single instruction from the start of `bytes`.
pub fn decode_one(bytes: &[u8], table: &DispatchTable) -> Result<DecodedInstruction, DecodeError> {
    Decoder::new(bytes, table, DecoderOptions::default()).decode_next()
}
