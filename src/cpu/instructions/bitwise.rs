//! AND/OR/XOR/NOT (spec §4.5 "Bitwise").

use super::{decode_binary, read_reg_width, write_reg_width};
use crate::cpu::alu::{self, Width};
use crate::cpu::{Cpu, Op};
use crate::fault::Fault;
use crate::memory::FlatMemory;

pub fn and(cpu: &mut Cpu, mem: &FlatMemory, mod_: u8) -> Result<(), Fault> {
    let ops = decode_binary(cpu, mem, Op::And, mod_)?;
    let result = alu::and(&mut cpu.regs, ops.width, ops.dest_value, ops.src_value);
    write_reg_width(&mut cpu.regs, ops.width, ops.dest, result)
}

pub fn or(cpu: &mut Cpu, mem: &FlatMemory, mod_: u8) -> Result<(), Fault> {
    let ops = decode_binary(cpu, mem, Op::Or, mod_)?;
    let result = alu::or(&mut cpu.regs, ops.width, ops.dest_value, ops.src_value);
    write_reg_width(&mut cpu.regs, ops.width, ops.dest, result)
}

pub fn xor(cpu: &mut Cpu, mem: &FlatMemory, mod_: u8) -> Result<(), Fault> {
    let ops = decode_binary(cpu, mem, Op::Xor, mod_)?;
    let result = alu::xor(&mut cpu.regs, ops.width, ops.dest_value, ops.src_value);
    write_reg_width(&mut cpu.regs, ops.width, ops.dest, result)
}

/// unary width encoding: MOD 0/1/2 select register width 8/16/32; the
/// single operand is read, inverted, and written back in place.
pub fn not(cpu: &mut Cpu, mem: &FlatMemory, mod_: u8) -> Result<(), Fault> {
    let width = match mod_ {
        0 => Width::W8,
        1 => Width::W16,
        2 => Width::W32,
        _ => return Err(Fault::InvalidMOD(Op::Not.code(), mod_)),
    };
    let dest = cpu.next_reg(mem)?;
    let value = read_reg_width(&cpu.regs, width, dest)?;
    let result = alu::not(&mut cpu.regs, width, value);
    write_reg_width(&mut cpu.regs, width, dest, result)
}
