use thiserror::Error;

use crate::opcode::Opcode;

/// Raised before any execution starts, while copying a program
/// image into ram.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum LoadError {
    #[error("A rom of {len} bytes does not fit into the {capacity} bytes of program memory.")]
    RomTooLarge { len: usize, capacity: usize },
}

/// A fatal condition hit during a step. Every variant carries the address
/// and the raw word of the failing instruction, there is no recovery from
/// any of these.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ProcessError {
    #[error("An unsupported opcode was used {opcode:#06X} at address {address:#05X}.")]
    UnknownOpcode { address: usize, opcode: Opcode },
    #[error("{source} at address {address:#05X} while executing {opcode:#06X}.")]
    Stack {
        address: usize,
        opcode: Opcode,
        source: StackError,
    },
    #[error(
        "Memory access {pointer:#05X} is out of bounds at address {address:#05X} while executing {opcode:#06X}."
    )]
    MemoryOutOfBounds {
        address: usize,
        opcode: Opcode,
        pointer: usize,
    },
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum StackError {
    #[error("Stack overflow")]
    Overflow,
    #[error("Stack underflow")]
    Underflow,
}
