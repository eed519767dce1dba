//! CALL/RET/JMP/Jcc (spec §4.5 "Control flow", §4.6).
//!
//! CALL and JMP: MOD 0 addresses an immediate (absolute or IP-relative per
//! ADDR_MODE), MOD 1 addresses a register holding the target. Jcc widens
//! this to MOD 2/3, the negated-condition variants of 0/1: the jump is taken
//! when the flag is *clear* instead of set.

use crate::cpu::op::ControlByte;
use crate::cpu::register::RegCode;
use crate::cpu::{flags, Cpu, Op};
use crate::fault::Fault;
use crate::memory::FlatMemory;

fn resolve_target(cpu: &mut Cpu, mem: &FlatMemory, ctl: ControlByte, indirect: bool) -> Result<u32, Fault> {
    if indirect {
        let r = cpu.next_reg(mem)?;
        cpu.regs.read32(r)
    } else if ctl.absolute {
        cpu.next_u32(mem)
    } else {
        cpu.read_rel32(mem)
    }
}

pub fn call(cpu: &mut Cpu, mem: &mut FlatMemory, ctl: ControlByte) -> Result<(), Fault> {
    if ctl.mod_ > 1 {
        return Err(Fault::InvalidMOD(Op::Call.code(), ctl.mod_));
    }
    let target = resolve_target(cpu, mem, ctl, ctl.mod_ == 1)?;
    let return_addr = cpu.regs.ip();
    cpu.regs.write32(RegCode::Rp, return_addr)?;
    cpu.regs.set_ip(target);
    Ok(())
}

pub fn ret(cpu: &mut Cpu) -> Result<(), Fault> {
    let target = cpu.regs.read32(RegCode::Rp)?;
    cpu.regs.set_ip(target);
    Ok(())
}

pub fn jmp(cpu: &mut Cpu, mem: &mut FlatMemory, ctl: ControlByte) -> Result<(), Fault> {
    if ctl.mod_ > 1 {
        return Err(Fault::InvalidMOD(Op::Jmp.code(), ctl.mod_));
    }
    let target = resolve_target(cpu, mem, ctl, ctl.mod_ == 1)?;
    cpu.regs.set_ip(target);
    Ok(())
}

pub fn jcc(cpu: &mut Cpu, mem: &mut FlatMemory, op: Op, ctl: ControlByte) -> Result<(), Fault> {
    let flag_bit = match op {
        Op::Jz => flags::ZERO,
        Op::Jc => flags::CARRY,
        Op::Jo => flags::OVERFLOW,
        Op::Js => flags::SIGN,
        Op::Jp => flags::PARITY,
        _ => unreachable!("jcc dispatched for a non-conditional-jump opcode"),
    };
    if ctl.mod_ > 3 {
        return Err(Fault::InvalidMOD(op.code(), ctl.mod_));
    }
    let indirect = ctl.mod_ % 2 == 1;
    let negate = ctl.mod_ >= 2;
    let target = resolve_target(cpu, mem, ctl, indirect)?;

    let flag = cpu.regs.get_flag(flag_bit);
    if flag != negate {
        cpu.regs.set_ip(target);
    }
    Ok(())
}
