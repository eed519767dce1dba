//! Per-opcode instruction handlers (spec §4.5-§4.7) and the shared
//! operand-decoding helpers they're built from.

mod arithmetic;
mod bitwise;
mod control;
mod data_movement;
mod load_store;
mod misc;
mod privilege;
mod stack;

use crate::cpu::alu::Width;
use crate::cpu::op::ControlByte;
use crate::cpu::register::{Mode, RegCode, RegisterState};
use crate::cpu::{Cpu, Op};
use crate::fault::Fault;
use crate::memory::FlatMemory;

/// decodes one instruction at the current IP and executes it.
pub fn step(cpu: &mut Cpu, mem: &mut FlatMemory) -> Result<(), Fault> {
    let opcode = cpu.next_u8(mem)?;
    let op = Op::from_u8(opcode)?;

    if op.is_kernel_only() && cpu.regs.mode() == Mode::User {
        return Err(Fault::InsufficientMode(opcode));
    }

    match op {
        Op::Nop => misc::nop(),
        Op::Syscall => privilege::syscall(cpu, mem),
        Op::Sysret => privilege::sysret(cpu),
        Op::Hlt => {
            privilege::hlt(cpu);
            Ok(())
        }
        Op::Uret => privilege::uret(cpu, mem),
        Op::SetSyscall => privilege::set_syscall(cpu, mem),

        Op::Call => {
            let ctl = ControlByte::decode(cpu.next_u8(mem)?);
            control::call(cpu, mem, ctl)
        }
        Op::Ret => control::ret(cpu),
        Op::Jmp => {
            let ctl = ControlByte::decode(cpu.next_u8(mem)?);
            control::jmp(cpu, mem, ctl)
        }
        Op::Jz | Op::Jc | Op::Jo | Op::Js | Op::Jp => {
            let ctl = ControlByte::decode(cpu.next_u8(mem)?);
            control::jcc(cpu, mem, op, ctl)
        }

        Op::Mov => {
            let ctl = ControlByte::decode(cpu.next_u8(mem)?);
            data_movement::mov(cpu, mem, ctl.mod_)
        }
        Op::Lb => {
            let ctl = ControlByte::decode(cpu.next_u8(mem)?);
            load_store::lb(cpu, mem, ctl)
        }
        Op::Sb => {
            let ctl = ControlByte::decode(cpu.next_u8(mem)?);
            load_store::sb(cpu, mem, ctl)
        }
        Op::Push => {
            let ctl = ControlByte::decode(cpu.next_u8(mem)?);
            stack::push(cpu, mem, ctl.mod_)
        }
        Op::Pop => {
            let ctl = ControlByte::decode(cpu.next_u8(mem)?);
            stack::pop(cpu, mem, ctl.mod_)
        }

        Op::Cmp => {
            let ctl = ControlByte::decode(cpu.next_u8(mem)?);
            arithmetic::cmp(cpu, mem, ctl)
        }
        Op::Add => {
            let ctl = ControlByte::decode(cpu.next_u8(mem)?);
            arithmetic::add(cpu, mem, ctl)
        }
        Op::Sub => {
            let ctl = ControlByte::decode(cpu.next_u8(mem)?);
            arithmetic::sub(cpu, mem, ctl)
        }
        Op::Mul => {
            let ctl = ControlByte::decode(cpu.next_u8(mem)?);
            arithmetic::mul(cpu, mem, ctl)
        }

        Op::And => {
            let ctl = ControlByte::decode(cpu.next_u8(mem)?);
            bitwise::and(cpu, mem, ctl.mod_)
        }
        Op::Or => {
            let ctl = ControlByte::decode(cpu.next_u8(mem)?);
            bitwise::or(cpu, mem, ctl.mod_)
        }
        Op::Xor => {
            let ctl = ControlByte::decode(cpu.next_u8(mem)?);
            bitwise::xor(cpu, mem, ctl.mod_)
        }
        Op::Not => {
            let ctl = ControlByte::decode(cpu.next_u8(mem)?);
            bitwise::not(cpu, mem, ctl.mod_)
        }
    }
}

/// one decoded `dest, src` pair for the binary-operand family shared by MOV
/// and the binary ALU ops (spec §4.5 "Data-movement binary"): MOD 0-2 select
/// `reg, imm` at width 8/16/32, MOD 3-5 select `reg, reg` at the same widths.
pub(super) struct BinaryOperands {
    pub dest: RegCode,
    pub dest_value: u32,
    pub src_value: u32,
    pub width: Width,
}

pub(super) fn decode_binary(cpu: &mut Cpu, mem: &FlatMemory, op: Op, mod_: u8) -> Result<BinaryOperands, Fault> {
    let (width, reg_src) = match mod_ {
        0 => (Width::W8, false),
        1 => (Width::W16, false),
        2 => (Width::W32, false),
        3 => (Width::W8, true),
        4 => (Width::W16, true),
        5 => (Width::W32, true),
        _ => return Err(Fault::InvalidMOD(op.code(), mod_)),
    };

    let dest = cpu.next_reg(mem)?;
    let dest_value = read_reg_width(&cpu.regs, width, dest)?;

    let src_value = if reg_src {
        let src = cpu.next_reg(mem)?;
        read_reg_width(&cpu.regs, width, src)?
    } else {
        match width {
            Width::W8 => u32::from(cpu.next_u8(mem)?),
            Width::W16 => u32::from(cpu.next_u16(mem)?),
            Width::W32 => cpu.next_u32(mem)?,
        }
    };

    Ok(BinaryOperands { dest, dest_value, src_value, width })
}

pub(super) fn read_reg_width(regs: &RegisterState, width: Width, r: RegCode) -> Result<u32, Fault> {
    match width {
        Width::W8 => Ok(u32::from(regs.read8(r)?)),
        Width::W16 => Ok(u32::from(regs.read16(r)?)),
        Width::W32 => regs.read32(r),
    }
}

pub(super) fn write_reg_width(regs: &mut RegisterState, width: Width, r: RegCode, val: u32) -> Result<(), Fault> {
    match width {
        Width::W8 => regs.write8(r, val as u8),
        Width::W16 => regs.write16(r, val as u16),
        Width::W32 => regs.write32(r, val),
    }
}

#[cfg(test)]
#[path = "./instructions_test.rs"]
mod instructions_test;
