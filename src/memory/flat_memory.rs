use crate::fault::Fault;
use crate::memory::MAX_MEMORY;

/// A flat, byte-addressable, little-endian memory bank of fixed capacity.
///
/// Owned exclusively by the running `Machine` for the process lifetime.
/// Every access is bounds-checked; a read or write whose last touched byte
/// falls outside `[0, MAX_MEMORY)` fails with `Fault::MemoryOutOfBounds`
/// instead of panicking, and never partially applies.
#[derive(Clone)]
pub struct FlatMemory {
    data: Vec<u8>,
}

impl FlatMemory {
    pub fn new() -> Self {
        FlatMemory {
            data: vec![0; MAX_MEMORY as usize],
        }
    }

    pub fn capacity(&self) -> u32 {
        self.data.len() as u32
    }

    fn check_bounds(&self, addr: u32, len: u32) -> Result<(), Fault> {
        let end = addr.checked_add(len).ok_or(Fault::MemoryOutOfBounds(addr, len))?;
        if end > self.capacity() {
            return Err(Fault::MemoryOutOfBounds(addr, len));
        }
        Ok(())
    }

    pub fn read_u8(&self, addr: u32) -> Result<u8, Fault> {
        self.check_bounds(addr, 1)?;
        Ok(self.data[addr as usize])
    }

    pub fn read_u16(&self, addr: u32) -> Result<u16, Fault> {
        self.check_bounds(addr, 2)?;
        let i = addr as usize;
        Ok(u16::from_le_bytes([self.data[i], self.data[i + 1]]))
    }

    pub fn read_u32(&self, addr: u32) -> Result<u32, Fault> {
        self.check_bounds(addr, 4)?;
        let i = addr as usize;
        Ok(u32::from_le_bytes([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]))
    }

    pub fn write_u8(&mut self, addr: u32, val: u8) -> Result<(), Fault> {
        self.check_bounds(addr, 1)?;
        self.data[addr as usize] = val;
        Ok(())
    }

    pub fn write_u16(&mut self, addr: u32, val: u16) -> Result<(), Fault> {
        self.check_bounds(addr, 2)?;
        let i = addr as usize;
        self.data[i..i + 2].copy_from_slice(&val.to_le_bytes());
        Ok(())
    }

    pub fn write_u32(&mut self, addr: u32, val: u32) -> Result<(), Fault> {
        self.check_bounds(addr, 4)?;
        let i = addr as usize;
        self.data[i..i + 4].copy_from_slice(&val.to_le_bytes());
        Ok(())
    }

    /// raw-slice read, used by the loader and diagnostics
    pub fn read_slice(&self, addr: u32, len: usize) -> Result<&[u8], Fault> {
        self.check_bounds(addr, len as u32)?;
        let i = addr as usize;
        Ok(&self.data[i..i + len])
    }

    /// raw-slice write, used by the loader
    pub fn write_slice(&mut self, addr: u32, bytes: &[u8]) -> Result<(), Fault> {
        self.check_bounds(addr, bytes.len() as u32)?;
        let i = addr as usize;
        self.data[i..i + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "./flat_memory_test.rs"]
mod flat_memory_test;
