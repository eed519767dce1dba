use super::step;
use crate::cpu::flags;
use crate::cpu::register::{Mode, RegCode};
use crate::cpu::Cpu;
use crate::memory::{FlatMemory, SYSCALL_TABLE_FIRST};

const BASE: u32 = 0x1_0000;

fn write_bytes(mem: &mut FlatMemory, addr: u32, bytes: &[u8]) {
    mem.write_slice(addr, bytes).unwrap();
}

#[test]
fn mov_reg32_imm32_sets_the_register() {
    let mut mem = FlatMemory::new();
    // MOV eax, 0x1234  (ctl: mod=2 => reg32,imm32)
    write_bytes(&mut mem, BASE, &[0x30, 0x02, 0x00, 0x34, 0x12, 0x00, 0x00]);
    let mut cpu = Cpu::new();
    cpu.regs.set_ip(BASE);

    step(&mut cpu, &mut mem).unwrap();

    assert_eq!(0x1234, cpu.regs.read32(RegCode::Eax).unwrap());
    assert_eq!(BASE + 7, cpu.regs.ip());
}

#[test]
fn add_reg32_imm32_updates_register_and_flags() {
    let mut mem = FlatMemory::new();
    // ADD eax, 5 (unsigned, ctl: mod=2)
    write_bytes(&mut mem, BASE, &[0x6A, 0x02, 0x00, 0x05, 0x00, 0x00, 0x00]);
    let mut cpu = Cpu::new();
    cpu.regs.set_ip(BASE);
    cpu.regs.write32(RegCode::Eax, 10).unwrap();

    step(&mut cpu, &mut mem).unwrap();

    assert_eq!(15, cpu.regs.read32(RegCode::Eax).unwrap());
    assert!(!cpu.regs.get_flag(flags::ZERO));
}

#[test]
fn call_then_ret_round_trips_ip() {
    let mut mem = FlatMemory::new();
    let target = 0x2_0000u32;
    // CALL target (ctl: mod=0, absolute)
    write_bytes(&mut mem, BASE, &[0x03, 0x10]);
    write_bytes(&mut mem, BASE + 2, &target.to_le_bytes());
    // RET at the call target
    write_bytes(&mut mem, target, &[0x04]);

    let mut cpu = Cpu::new();
    cpu.regs.set_ip(BASE);

    step(&mut cpu, &mut mem).unwrap(); // CALL
    assert_eq!(target, cpu.regs.ip());
    assert_eq!(BASE + 6, cpu.regs.read32(RegCode::Rp).unwrap());

    step(&mut cpu, &mut mem).unwrap(); // RET
    assert_eq!(BASE + 6, cpu.regs.ip());
}

#[test]
fn jz_is_taken_when_zero_flag_set_and_skipped_otherwise() {
    let target = 0x2_0000u32;
    let mut mem = FlatMemory::new();
    write_bytes(&mut mem, BASE, &[0x06, 0x10]);
    write_bytes(&mut mem, BASE + 2, &target.to_le_bytes());

    let mut cpu = Cpu::new();
    cpu.regs.set_ip(BASE);
    cpu.regs.set_flag(flags::ZERO, true);
    step(&mut cpu, &mut mem).unwrap();
    assert_eq!(target, cpu.regs.ip());

    let mut cpu2 = Cpu::new();
    cpu2.regs.set_ip(BASE);
    cpu2.regs.set_flag(flags::ZERO, false);
    step(&mut cpu2, &mut mem).unwrap();
    assert_eq!(BASE + 6, cpu2.regs.ip());
}

#[test]
fn negated_jz_variant_jumps_when_flag_is_clear() {
    let target = 0x2_0000u32;
    let mut mem = FlatMemory::new();
    // JZ with MOD=2: negated-condition immediate variant
    write_bytes(&mut mem, BASE, &[0x06, 0x12]);
    write_bytes(&mut mem, BASE + 2, &target.to_le_bytes());

    let mut cpu = Cpu::new();
    cpu.regs.set_ip(BASE);
    cpu.regs.set_flag(flags::ZERO, false);
    step(&mut cpu, &mut mem).unwrap();
    assert_eq!(target, cpu.regs.ip());
}

#[test]
fn hlt_from_user_mode_faults_insufficient_privilege() {
    let mut mem = FlatMemory::new();
    write_bytes(&mut mem, BASE, &[0x15]);
    let mut cpu = Cpu::new();
    cpu.regs.set_ip(BASE);
    cpu.regs.set_mode(Mode::User);

    let err = step(&mut cpu, &mut mem).unwrap_err();
    assert_eq!(crate::fault::Fault::InsufficientMode(0x15), err);
    assert!(!cpu.halted);
}

#[test]
fn hlt_from_kernel_mode_halts() {
    let mut mem = FlatMemory::new();
    write_bytes(&mut mem, BASE, &[0x15]);
    let mut cpu = Cpu::new();
    cpu.regs.set_ip(BASE);

    step(&mut cpu, &mut mem).unwrap();
    assert!(cpu.halted);
}

#[test]
fn syscall_then_sysret_round_trips_registers_and_mode() {
    let mut mem = FlatMemory::new();
    let handler = 0x3_0000u32;
    mem.write_u32(SYSCALL_TABLE_FIRST + 4 * 5, handler).unwrap();

    write_bytes(&mut mem, BASE, &[0x01, 0x05]); // SYSCALL 5
    write_bytes(&mut mem, handler, &[0x02]); // SYSRET

    let mut cpu = Cpu::new();
    cpu.regs.set_ip(BASE);
    cpu.regs.write32(RegCode::Esp, 0x5_0000).unwrap();

    step(&mut cpu, &mut mem).unwrap(); // SYSCALL
    assert_eq!(handler, cpu.regs.ip());
    assert_eq!(Mode::Kernel, cpu.regs.mode());
    assert_eq!(BASE + 2, cpu.regs.srp);
    assert_eq!(0x5_0000, cpu.regs.ksp);

    step(&mut cpu, &mut mem).unwrap(); // SYSRET
    assert_eq!(BASE + 2, cpu.regs.ip());
    assert_eq!(0x5_0000, cpu.regs.read32(RegCode::Esp).unwrap());
    assert_eq!(Mode::User, cpu.regs.mode());
}

#[test]
fn syscall_through_unset_table_entry_faults() {
    let mut mem = FlatMemory::new();
    write_bytes(&mut mem, BASE, &[0x01, 0x07]); // SYSCALL 7, never installed
    let mut cpu = Cpu::new();
    cpu.regs.set_ip(BASE);

    let err = step(&mut cpu, &mut mem).unwrap_err();
    assert_eq!(crate::fault::Fault::InvalidSyscall(7), err);
}

#[test]
fn push_then_pop_round_trips_through_dispatch() {
    let mut mem = FlatMemory::new();
    // PUSH eax (mod=4), POP ebx (mod=4)
    write_bytes(&mut mem, BASE, &[0x33, 0x04, 0x00]);
    write_bytes(&mut mem, BASE + 3, &[0x34, 0x04, 0x04]);

    let mut cpu = Cpu::new();
    cpu.regs.set_ip(BASE);
    cpu.regs.write32(RegCode::Esp, 0x5_0000).unwrap();
    cpu.regs.write32(RegCode::Eax, 0xCAFE_BABE).unwrap();

    step(&mut cpu, &mut mem).unwrap(); // PUSH eax
    assert_eq!(0x5_0004, cpu.regs.read32(RegCode::Esp).unwrap());

    step(&mut cpu, &mut mem).unwrap(); // POP ebx
    assert_eq!(0x5_0000, cpu.regs.read32(RegCode::Esp).unwrap());
    assert_eq!(0xCAFE_BABE, cpu.regs.read32(RegCode::Ebx).unwrap());
}

#[test]
fn setsyscall_then_syscall_uses_the_installed_handler() {
    let mut mem = FlatMemory::new();
    let handler = 0x4_0000u32;
    // SETSYSCALL 9, handler
    write_bytes(&mut mem, BASE, &[0x17, 0x09]);
    write_bytes(&mut mem, BASE + 2, &handler.to_le_bytes());
    // SYSCALL 9
    write_bytes(&mut mem, BASE + 6, &[0x01, 0x09]);

    let mut cpu = Cpu::new();
    cpu.regs.set_ip(BASE);

    step(&mut cpu, &mut mem).unwrap(); // SETSYSCALL
    step(&mut cpu, &mut mem).unwrap(); // SYSCALL
    assert_eq!(handler, cpu.regs.ip());
}
