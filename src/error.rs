use thiserror::Error;

use crate::opcode::Opcode;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum ProcessError {
    #[error("Invalid opcode state '{0}'.")]
    Opcode(#[from] OpcodeError),
    #[error("Invalid stack state '{0}'.")]
    Stack(#[from] StackError),
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum OpcodeError {
    #[error("An unsupported opcode was used {0:#06X?}.")]
    InvalidOpcode(Opcode),
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum StackError {
    #[error("Stack overflow, all {0} entries are in use!")]
    Overflow(usize),
    #[error("Stack underflow, there is no address to return to!")]
    Underflow,
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum LoadError {
    #[error("The rom is {len} bytes long, but only {capacity} bytes are available.")]
    RomTooLarge { len: usize, capacity: usize },
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum DeviceError {
    #[error("There is no key with the index {0:#X}.")]
    KeyOutOfRange(usize),
    #[error("The pixel ({x}, {y}) is outside of the display.")]
    PixelOutOfRange { x: usize, y: usize },
}
