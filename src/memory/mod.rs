// these modules are re-exported as a single module

pub use self::flat_memory::*;
mod flat_memory;

/// total size of the flat memory bank: 256 MiB
pub const MAX_MEMORY: u32 = 0x1000_0000;

/// syscall table: 256 entries * 4 bytes, each a kernel code address
pub const SYSCALL_TABLE_FIRST: u32 = 0x0000_0100;
pub const SYSCALL_TABLE_SIZE: u32 = 0x0000_0400;
pub const SYSCALL_TABLE_ENTRIES: u32 = SYSCALL_TABLE_SIZE / 4;

/// kernel stack region: 64 KiB, growing upward into IMAGE_START
pub const KERNEL_STACK_BASE: u32 = 0x0000_0500;
pub const KERNEL_STACK_END: u32 = 0x0001_0500;

/// kernel image window: max 128 KiB; execution starts here
pub const IMAGE_START: u32 = 0x0001_0500;
pub const MAX_KERNEL_LEN: u32 = 0x0002_0000;

/// user image window
pub const USER_SPACE_START: u32 = 0x0004_0000;
pub const MAX_USER_LEN: u32 = MAX_MEMORY - USER_SPACE_START;
