//! Emulator core for the TPU, a 32-bit little-endian register machine.
//!
//! `Machine` ties a [`memory::FlatMemory`] and a [`cpu::Cpu`] together,
//! loads an image via [`loader::load_image`], and runs it to halt or fault.

#[macro_use]
extern crate quick_error;

pub mod cpu;
pub mod fault;
pub mod loader;
pub mod machine;
pub mod memory;

pub use crate::machine::Machine;
