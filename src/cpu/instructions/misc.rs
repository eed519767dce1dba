use crate::fault::Fault;

/// NOP carries no operand and has no effect beyond the IP advance the
/// fetcher already performed to read its opcode.
pub fn nop() -> Result<(), Fault> {
    Ok(())
}
