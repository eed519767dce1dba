//! LB/SB (spec §4.5 "Load/store"): MOD 0/2/4 address via an immediate
//! (absolute or IP-relative per ADDR_MODE), MOD 1/3/5 address via a register
//! holding the target address; width is 8/16/32 bit by MOD pair.

use super::{read_reg_width, write_reg_width};
use crate::cpu::alu::Width;
use crate::cpu::op::ControlByte;
use crate::cpu::{Cpu, Op};
use crate::fault::Fault;
use crate::memory::FlatMemory;

fn width_and_kind(op: Op, mod_: u8) -> Result<(Width, bool), Fault> {
    match mod_ {
        0 => Ok((Width::W8, false)),
        1 => Ok((Width::W8, true)),
        2 => Ok((Width::W16, false)),
        3 => Ok((Width::W16, true)),
        4 => Ok((Width::W32, false)),
        5 => Ok((Width::W32, true)),
        _ => Err(Fault::InvalidMOD(op.code(), mod_)),
    }
}

fn resolve_address(cpu: &mut Cpu, mem: &FlatMemory, ctl: ControlByte, indirect: bool) -> Result<u32, Fault> {
    if indirect {
        let r = cpu.next_reg(mem)?;
        cpu.regs.read32(r)
    } else if ctl.absolute {
        cpu.next_u32(mem)
    } else {
        cpu.read_rel32(mem)
    }
}

pub fn lb(cpu: &mut Cpu, mem: &mut FlatMemory, ctl: ControlByte) -> Result<(), Fault> {
    let (width, indirect) = width_and_kind(Op::Lb, ctl.mod_)?;
    let dest = cpu.next_reg(mem)?;
    let addr = resolve_address(cpu, mem, ctl, indirect)?;
    let value = match width {
        Width::W8 => u32::from(mem.read_u8(addr)?),
        Width::W16 => u32::from(mem.read_u16(addr)?),
        Width::W32 => mem.read_u32(addr)?,
    };
    write_reg_width(&mut cpu.regs, width, dest, value)
}

pub fn sb(cpu: &mut Cpu, mem: &mut FlatMemory, ctl: ControlByte) -> Result<(), Fault> {
    let (width, indirect) = width_and_kind(Op::Sb, ctl.mod_)?;
    let src = cpu.next_reg(mem)?;
    let value = read_reg_width(&cpu.regs, width, src)?;
    let addr = resolve_address(cpu, mem, ctl, indirect)?;
    match width {
        Width::W8 => mem.write_u8(addr, value as u8),
        Width::W16 => mem.write_u16(addr, value as u16),
        Width::W32 => mem.write_u32(addr, value),
    }
}
