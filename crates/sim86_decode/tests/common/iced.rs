use sim86_decode::prelude::*;

/// Maps a decoded register access onto the equivalent iced register.
pub fn iced_register(reg: &RegisterAccess) -> iced_x86::Register {
    use iced_x86::Register as R;
    match (reg.reg, reg.offset, reg.count) {
        (Register::A, 0, 1) => R::AL,
        (Register::A, 1, 1) => R::AH,
        (Register::A, _, _) => R::AX,
        (Register::B, 0, 1) => R::BL,
        (Register::B, 1, 1) => R::BH,
        (Register::B, _, _) => R::BX,
        (Register::C, 0, 1) => R::CL,
        (Register::C, 1, 1) => R::CH,
        (Register::C, _, _) => R::CX,
        (Register::D, 0, 1) => R::DL,
        (Register::D, 1, 1) => R::DH,
        (Register::D, _, _) => R::DX,
        (Register::SP, _, _) => R::SP,
        (Register::BP, _, _) => R::BP,
        (Register::SI, _, _) => R::SI,
        (Register::DI, _, _) => R::DI,
        (Register::ES, _, _) => R::ES,
        (Register::CS, _, _) => R::CS,
        (Register::SS, _, _) => R::SS,
        (Register::DS, _, _) => R::DS,
    }
}

pub fn iced_mnemonic(op: OperationKind) -> iced_x86::Mnemonic {
    match op {
        OperationKind::Mov => iced_x86::Mnemonic::Mov,
        OperationKind::Add => iced_x86::Mnemonic::Add,
        OperationKind::Sub => iced_x86::Mnemonic::Sub,
    }
}

/// Compares one of our operands with operand `i` of an iced instruction, returning a
/// description of the first difference.
pub fn compare_operand(ours: &Operand, iced_i: &iced_x86::Instruction, i: u32) -> Result<(), String> {
    use iced_x86::OpKind;
    let kind = iced_i.op_kind(i);
    match ours {
        Operand::Register(reg) => {
            if kind != OpKind::Register || iced_i.op_register(i) != iced_register(reg) {
                return Err(format!("operand {i}: {reg} vs {:?} {:?}", kind, iced_i.op_register(i)));
            }
        }
        Operand::Memory(mem) => {
            if kind != OpKind::Memory {
                return Err(format!("operand {i}: memory vs {:?}", kind));
            }
            let base = mem.regs.first().map(iced_register).unwrap_or(iced_x86::Register::None);
            let index = mem.regs.get(1).map(iced_register).unwrap_or(iced_x86::Register::None);
            if iced_i.memory_base() != base || iced_i.memory_index() != index {
                return Err(format!(
                    "operand {i}: {:?} vs base {:?} index {:?}",
                    mem.regs,
                    iced_i.memory_base(),
                    iced_i.memory_index()
                ));
            }
            // iced sign-extends 8-bit displacements; ours keeps the raw byte.
            let iced_disp = iced_i.memory_displacement32() as u16;
            let matches = if mem.disp > 0xFF { iced_disp == mem.disp } else { iced_disp as u8 == mem.disp as u8 };
            if !matches {
                return Err(format!("operand {i}: disp {:04X} vs {:04X}", mem.disp, iced_disp));
            }
        }
        Operand::Immediate(value) => {
            if !matches!(kind, OpKind::Immediate8 | OpKind::Immediate16 | OpKind::Immediate8to16) {
                return Err(format!("operand {i}: immediate vs {:?}", kind));
            }
            if iced_i.immediate(i) as u16 != *value {
                return Err(format!("operand {i}: imm {:04X} vs {:04X}", value, iced_i.immediate(i)));
            }
        }
    }
    Ok(())
}
