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
mod common;

use crate::common::init_tests;
use sim86_decode::prelude::*;

fn decode_bytes(bytes: &[u8]) -> Result<DecodedInstruction, DecodeError> {
    let table = DispatchTable::standard().expect("valid encoding table");
    let encoding = table.lookup(bytes[0]).expect("known opcode");
    let mut reader = SliceBitReader::new(bytes);
    decode(&mut reader, encoding)
}

#[test]
fn mov_register_to_register() {
    init_tests();
    let ins = decode_bytes(&[0b10001010, 0b11000100]).unwrap();
    assert_eq!(ins.op, OperationKind::Mov);
    assert_eq!(ins.destination(), &Operand::Register(RegisterAccess::new(Register::A, 0, 1)));
    assert_eq!(ins.source(), &Operand::Register(RegisterAccess::new(Register::A, 1, 1)));
}

#[test]
fn mov_direct_address() {
    init_tests();
    let ins = decode_bytes(&[0b10001010, 0b00000110, 0b11110000, 0b10101010]).unwrap();
    assert_eq!(ins.op, OperationKind::Mov);
    assert_eq!(ins.destination(), &Operand::Register(RegisterAccess::new(Register::A, 0, 1)));
    assert_eq!(ins.source(), &Operand::Memory(MemoryAccess { regs: vec![], disp: 0xAAF0 }));
}

#[test]
fn mov_eight_bit_displacement() {
    init_tests();
    let ins = decode_bytes(&[0b10001010, 0b01000001, 0b11010001]).unwrap();
    assert_eq!(ins.op, OperationKind::Mov);
    assert_eq!(ins.destination(), &Operand::Register(AL));
    assert_eq!(ins.source(), &Operand::Memory(MemoryAccess { regs: vec![BX, DI], disp: 0xD1 }));
}

#[test]
fn direct_address_ignores_bp_entry() {
    // MOD=00 RM=110 is a direct address; MOD=01 RM=110 is [bp + disp8].
    let direct = decode_bytes(&[0x8B, 0b00000110, 0x34, 0x12]).unwrap();
    let based = decode_bytes(&[0x8B, 0b01000110, 0x34]).unwrap();
    assert_eq!(direct.source(), &Operand::Memory(MemoryAccess::direct(0x1234)));
    assert_eq!(based.source(), &Operand::Memory(MemoryAccess::new(&[BP], 0x34)));
}

#[test]
fn d_bit_swaps_slots() {
    for second in [0b11_010_011u8, 0b00_010_011, 0b01_010_111, 0b10_010_000] {
        let to_reg = decode_bytes(&[0x8B, second, 0x44, 0x55]).unwrap();
        let from_reg = decode_bytes(&[0x89, second, 0x44, 0x55]).unwrap();
        assert_eq!(to_reg.operands[0], from_reg.operands[1]);
        assert_eq!(to_reg.operands[1], from_reg.operands[0]);
    }
}

#[test]
fn add_and_sub_share_layout() {
    let add = decode_bytes(&[0x03, 0b10_001_101, 0x00, 0x80]).unwrap();
    let sub = decode_bytes(&[0x2B, 0b10_001_101, 0x00, 0x80]).unwrap();
    assert_eq!(add.op, OperationKind::Add);
    assert_eq!(sub.op, OperationKind::Sub);
    assert_eq!(add.operands, sub.operands);
    assert_eq!(add.operands, [Operand::Register(CX), Operand::Memory(MemoryAccess::new(&[DI], 0x8000))]);
}

#[test]
fn truncated_instruction_is_a_stream_error() {
    let err = decode_bytes(&[0x8A]).unwrap_err();
    assert_eq!(err, DecodeError::Stream(StreamError::UnexpectedEof { needed: 1, available: 0 }));

    let err = decode_bytes(&[0xB8, 0x01]).unwrap_err();
    assert!(matches!(err, DecodeError::Stream(StreamError::UnexpectedEof { needed: 2, available: 1 })));
}

#[test]
fn misaligned_reader_is_a_stream_error() {
    let table = DispatchTable::standard().unwrap();
    let encoding = table.lookup(0x8A).unwrap();
    let bytes = [0xFF, 0x8A, 0xC4];
    let mut reader = SliceBitReader::new(&bytes);
    reader.read_bits(4).unwrap();
    assert!(matches!(
        decode(&mut reader, encoding),
        Err(DecodeError::Stream(StreamError::ByteBoundary { bit_offset: 4, requested: 6 }))
    ));
}
