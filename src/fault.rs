//! The tagged failure kind surfaced out of the dispatch loop (spec ​§7).

quick_error! {
    /// A fault raised by the core while decoding or executing an instruction.
    ///
    /// A handler that detects a fault aborts the current instruction; no
    /// side effects beyond the opcode/operand bytes already consumed by the
    /// fetcher occur. The dispatch loop is the sole point where a `Fault` is
    /// rendered to the user.
    #[derive(Debug, PartialEq, Eq, Clone)]
    pub enum Fault {
        MemoryOutOfBounds(addr: u32, len: u32) {
            display("memory access out of bounds: addr={:#010X} len={}", addr, len)
        }
        InvalidInstruction(opcode: u8) {
            display("invalid instruction: opcode={:#04X}", opcode)
        }
        InvalidMOD(opcode: u8, mod_: u8) {
            display("invalid MOD {:#04X} for opcode {:#04X}", mod_, opcode)
        }
        InvalidRegCode(code: u8) {
            display("invalid register code: {:#04X}", code)
        }
        InvalidSyscall(n: u32) {
            display("invalid syscall number: {}", n)
        }
        InsufficientMode(opcode: u8) {
            display("insufficient privilege mode for opcode {:#04X}", opcode)
        }
        InvalidAddress(addr: u32) {
            display("invalid target address: {:#010X}", addr)
        }
    }
}
