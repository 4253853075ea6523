pub mod chip8;
pub mod config;
pub mod definitions;
pub mod devices;
pub mod memory;
pub mod opcode;
pub mod timer;
mod error;

// reexporting for convinience
mod runner;
pub use runner::*;
pub use error::*;
