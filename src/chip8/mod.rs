//! The full implementation of the chip8 machine, from the loaded ram to the
//! opcode table and an option to pretty print the state.
mod chipset;
mod opcodes;
mod print;

/// reexport chipset structs and data for simpler usage
pub use chipset::*;
