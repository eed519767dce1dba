//! CMP/ADD/SUB/MUL (spec §4.5 "Data-movement binary", §4.4).

use super::{decode_binary, write_reg_width};
use crate::cpu::alu::{self, Width};
use crate::cpu::op::ControlByte;
use crate::cpu::register::RegCode;
use crate::cpu::{Cpu, Op};
use crate::fault::Fault;
use crate::memory::FlatMemory;

pub fn cmp(cpu: &mut Cpu, mem: &FlatMemory, ctl: ControlByte) -> Result<(), Fault> {
    let ops = decode_binary(cpu, mem, Op::Cmp, ctl.mod_)?;
    alu::cmp(&mut cpu.regs, ops.width, ops.dest_value, ops.src_value, ctl.signed);
    Ok(())
}

pub fn add(cpu: &mut Cpu, mem: &FlatMemory, ctl: ControlByte) -> Result<(), Fault> {
    let ops = decode_binary(cpu, mem, Op::Add, ctl.mod_)?;
    let result = alu::add(&mut cpu.regs, ops.width, ops.dest_value, ops.src_value, ctl.signed);
    write_reg_width(&mut cpu.regs, ops.width, ops.dest, result)
}

pub fn sub(cpu: &mut Cpu, mem: &FlatMemory, ctl: ControlByte) -> Result<(), Fault> {
    let ops = decode_binary(cpu, mem, Op::Sub, ctl.mod_)?;
    let result = alu::sub(&mut cpu.regs, ops.width, ops.dest_value, ops.src_value, ctl.signed);
    write_reg_width(&mut cpu.regs, ops.width, ops.dest, result)
}

/// writes the low half of the product back into the decoded destination
/// register, like every other binary ALU op, and the high half into the
/// fixed accumulator partner for that width (AH / DX / EDX) — the closest
/// equivalent this register file has to x86's AX / DX:AX / EDX:EAX split,
/// since dest is not assumed to already be an accumulator register.
pub fn mul(cpu: &mut Cpu, mem: &FlatMemory, ctl: ControlByte) -> Result<(), Fault> {
    let ops = decode_binary(cpu, mem, Op::Mul, ctl.mod_)?;
    let (low, high) = alu::mul(&mut cpu.regs, ops.width, ops.dest_value, ops.src_value, ctl.signed);
    write_reg_width(&mut cpu.regs, ops.width, ops.dest, low)?;
    let high_reg = match ops.width {
        Width::W8 => RegCode::Ah,
        Width::W16 => RegCode::Dx,
        Width::W32 => RegCode::Edx,
    };
    write_reg_width(&mut cpu.regs, ops.width, high_reg, high)
}
