//! SYSCALL/SYSRET, HLT, URET, SETSYSCALL (spec §4.7).
//!
//! SETSYSCALL and URET have no encoding fixed by the source material; the
//! encodings below are this crate's own (documented in DESIGN.md).

use crate::cpu::register::{Mode, RegCode};
use crate::cpu::Cpu;
use crate::fault::Fault;
use crate::memory::{FlatMemory, KERNEL_STACK_BASE, SYSCALL_TABLE_FIRST};

/// `SYSCALL n`: looks up syscall table entry `n`, saves the user IP/ESP into
/// `srp`/`ksp`, switches to a fresh kernel stack, and jumps to the handler.
/// An unset (zero) table entry faults as `InvalidSyscall`.
pub fn syscall(cpu: &mut Cpu, mem: &mut FlatMemory) -> Result<(), Fault> {
    let n = cpu.next_u8(mem)?;
    let entry_addr = SYSCALL_TABLE_FIRST + 4 * u32::from(n);
    let handler = mem.read_u32(entry_addr)?;
    if handler == 0 {
        return Err(Fault::InvalidSyscall(u32::from(n)));
    }

    cpu.regs.srp = cpu.regs.ip();
    cpu.regs.ksp = cpu.regs.read32(RegCode::Esp)?;
    cpu.regs.set_mode(Mode::Kernel);
    cpu.regs.write32(RegCode::Esp, KERNEL_STACK_BASE)?;
    cpu.regs.set_ip(handler);
    Ok(())
}

/// restores the IP/ESP saved by the matching `SYSCALL` and drops to USER.
pub fn sysret(cpu: &mut Cpu) -> Result<(), Fault> {
    let ip = cpu.regs.srp;
    let esp = cpu.regs.ksp;
    cpu.regs.set_ip(ip);
    cpu.regs.write32(RegCode::Esp, esp)?;
    cpu.regs.set_mode(Mode::User);
    Ok(())
}

pub fn hlt(cpu: &mut Cpu) {
    cpu.halted = true;
}

/// jumps to a user-mode entry point carried as an immediate operand and
/// drops to USER, without touching `srp`/`ksp` (unlike `SYSRET`, this is not
/// a return from a syscall, so there is nothing saved to restore).
pub fn uret(cpu: &mut Cpu, mem: &FlatMemory) -> Result<(), Fault> {
    let entry = cpu.next_u32(mem)?;
    cpu.regs.set_ip(entry);
    cpu.regs.set_mode(Mode::User);
    Ok(())
}

/// installs a handler address into syscall table entry `n`.
pub fn set_syscall(cpu: &mut Cpu, mem: &mut FlatMemory) -> Result<(), Fault> {
    let n = cpu.next_u8(mem)?;
    let addr = cpu.next_u32(mem)?;
    let entry_addr = SYSCALL_TABLE_FIRST + 4 * u32::from(n);
    mem.write_u32(entry_addr, addr)
}
