//! Ties the memory bank and CPU together into one runnable unit, and owns
//! the boot sequence, dispatch loop, and diagnostics the CLI front end
//! relies on (spec §5, §6; SPEC_FULL.md §10.2, §11).

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::cpu::{Cpu, DEBUG_TRACE};
use crate::fault::Fault;
use crate::loader::{self, LoadError};
use crate::memory::{FlatMemory, IMAGE_START};

pub struct Machine {
    pub mem: FlatMemory,
    pub cpu: Cpu,
    trace_sink: Option<Box<dyn Write>>,
}

impl Machine {
    pub fn new() -> Self {
        Machine {
            mem: FlatMemory::new(),
            cpu: Cpu::new(),
            trace_sink: None,
        }
    }

    pub fn load_image(&mut self, image: &[u8]) -> Result<(), LoadError> {
        loader::load_image(&mut self.mem, image)
    }

    /// installs a sink that receives one line per executed instruction when
    /// `crate::cpu::DEBUG_TRACE` is on.
    pub fn write_trace_to(&mut self, sink: Box<dyn Write>) {
        self.trace_sink = Some(sink);
    }

    /// runs from a freshly loaded image: IP starts at `IMAGE_START`, mode
    /// starts KERNEL (spec.md leaves the boot IP to the caller;
    /// `original_source/main.cpp` always enters at the fixed kernel image
    /// base, so that's what this does too — see DESIGN.md).
    ///
    /// `keep_running` is polled once per instruction boundary; clearing it
    /// (e.g. from a Ctrl-C handler) stops the loop cleanly with `Ok(())`.
    /// `max_instructions`, if set, stops the loop the same way once reached.
    pub fn run(&mut self, keep_running: &AtomicBool, max_instructions: Option<usize>) -> Result<(), Fault> {
        self.cpu.regs.set_ip(IMAGE_START);

        while keep_running.load(Ordering::SeqCst) && !self.cpu.halted {
            if let Some(max) = max_instructions {
                if self.cpu.instruction_count >= max {
                    break;
                }
            }

            let ip = self.cpu.regs.ip();
            crate::cpu::instructions::step(&mut self.cpu, &mut self.mem)?;
            self.cpu.instruction_count += 1;

            if DEBUG_TRACE {
                if let Some(sink) = self.trace_sink.as_mut() {
                    let _ = writeln!(sink, "[{:#010X}] -> ip={:#010X}", ip, self.cpu.regs.ip());
                }
            }
        }

        Ok(())
    }

    /// a stable, human-readable register dump (spec §6), unconditionally
    /// emitted by the CLI on halt or fault.
    pub fn dump_regs(&self) -> String {
        use crate::cpu::register::RegCode;
        let r = &self.cpu.regs;
        format!(
            "EAX={:#010X} EBX={:#010X} ECX={:#010X} EDX={:#010X}\n\
             IP ={:#010X} RP ={:#010X} ESP={:#010X} EBP={:#010X}\n\
             ESI={:#010X} EDI={:#010X} FLAGS={:#06X} MODE={:?}",
            r.read32(RegCode::Eax).unwrap(),
            r.read32(RegCode::Ebx).unwrap(),
            r.read32(RegCode::Ecx).unwrap(),
            r.read32(RegCode::Edx).unwrap(),
            r.ip(),
            r.read32(RegCode::Rp).unwrap(),
            r.read32(RegCode::Esp).unwrap(),
            r.read32(RegCode::Ebp).unwrap(),
            r.read32(RegCode::Esi).unwrap(),
            r.read32(RegCode::Edi).unwrap(),
            r.flags_u16(),
            r.mode(),
        )
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "./machine_test.rs"]
mod machine_test;
