use super::*;
use std::sync::atomic::AtomicBool;

fn image(kernel: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&(kernel.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(kernel);
    bytes
}

#[test]
fn boots_at_image_start_and_runs_to_halt() {
    // MOV eax, 7; HLT
    let kernel = [0x30, 0x02, 0x00, 0x07, 0x00, 0x00, 0x00, 0x15];
    let mut machine = Machine::new();
    machine.load_image(&image(&kernel)).unwrap();

    let keep_running = AtomicBool::new(true);
    machine.run(&keep_running, None).unwrap();

    assert!(machine.cpu.halted);
    assert_eq!(7, machine.cpu.regs.read32(crate::cpu::register::RegCode::Eax).unwrap());
}

#[test]
fn max_instructions_stops_a_runaway_loop() {
    // JMP back to IMAGE_START, forever
    let kernel = [0x05, 0x10, 0x00, 0x05, 0x01, 0x00];
    let mut machine = Machine::new();
    machine.load_image(&image(&kernel)).unwrap();

    let keep_running = AtomicBool::new(true);
    machine.run(&keep_running, Some(50)).unwrap();

    assert!(!machine.cpu.halted);
    assert_eq!(50, machine.cpu.instruction_count);
}

#[test]
fn a_fault_propagates_out_of_run() {
    // invalid opcode
    let kernel = [0xFF];
    let mut machine = Machine::new();
    machine.load_image(&image(&kernel)).unwrap();

    let keep_running = AtomicBool::new(true);
    let err = machine.run(&keep_running, None).unwrap_err();
    assert_eq!(crate::fault::Fault::InvalidInstruction(0xFF), err);
}

#[test]
fn dump_regs_reports_the_halt_state() {
    let kernel = [0x15]; // HLT
    let mut machine = Machine::new();
    machine.load_image(&image(&kernel)).unwrap();
    machine.run(&AtomicBool::new(true), None).unwrap();

    let dump = machine.dump_regs();
    assert!(dump.contains("MODE=Kernel"));
    assert!(dump.contains("IP ="));
}
