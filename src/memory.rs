//! The ram and the call stack of the chip.
use std::ops::Range;

use tinyvec::ArrayVec;

use crate::{
    definitions::{cpu, display::fontset, memory},
    opcode::Opcode,
    LoadError, StackError,
};

/// The addresses of the font set, they can't be written to by a program.
const FONT_AREA: Range<usize> = fontset::LOCATION..(fontset::LOCATION + fontset::FONTSET.len());

/// - `0x000-0x04F` - Used for the built in `4x5` pixel font set (`0-F`)
/// - `0x050-0x1FF` - Reserved for the interpreter
/// - `0x200-0xFFF` - Program ROM and work RAM
///
/// Every access made by an instruction wraps around at the end of the ram, writes into
/// the font set are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    data: Box<[u8; memory::SIZE]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Creates a zeroed ram with the font set installed.
    pub fn new() -> Self {
        let mut ram = Self {
            data: Box::new([0; memory::SIZE]),
        };
        ram.reset();
        ram
    }

    /// Zeroes everything and reinstalls the font set.
    pub fn reset(&mut self) {
        self.data.iter_mut().for_each(|cell| *cell = 0);
        self.data[FONT_AREA].copy_from_slice(&fontset::FONTSET);
    }

    /// Makes sure that the program fits, before anything is touched.
    pub fn check_program(program: &[u8]) -> Result<(), LoadError> {
        if program.len() > cpu::PROGRAM_SIZE {
            Err(LoadError::RomTooLarge {
                len: program.len(),
                capacity: cpu::PROGRAM_SIZE,
            })
        } else {
            Ok(())
        }
    }

    /// Writes the program to its load address.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        Self::check_program(program)?;
        self.data[cpu::PROGRAM_COUNTER..(cpu::PROGRAM_COUNTER + program.len())]
            .copy_from_slice(program);
        Ok(())
    }

    /// Builds the big-endian opcode at the given address.
    ///
    /// # Example
    /// ```rust
    /// # use chip::memory::Memory;
    /// let mut memory = Memory::new();
    /// memory.load_program(&[0x00, 0xEE, 0x1E, 0xDA]).unwrap();
    /// assert_eq!(memory.opcode(0x200), 0x00EE);
    /// assert_eq!(memory.opcode(0x202), 0x1EDA);
    /// ```
    pub fn opcode(&self, address: usize) -> Opcode {
        Opcode::from_be_bytes([self.read(address), self.read(address + 1)])
    }

    #[inline]
    pub fn read(&self, address: usize) -> u8 {
        self.data[address & memory::ADDRESS_MASK]
    }

    #[inline]
    pub fn write(&mut self, address: usize, value: u8) {
        let address = address & memory::ADDRESS_MASK;
        if FONT_AREA.contains(&address) {
            log::trace!("dropped write of {:#04X} into the font at {:#05X}", value, address);
            return;
        }
        self.data[address] = value;
    }

    /// Returns the whole ram.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..]
    }

    #[cfg(test)]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data[..]
    }
}

/// The stack is only used to store return addresses when subroutines are called. The original
/// [RCA 1802](https://de.wikipedia.org/wiki/RCA1802) version allocated `48` bytes for up to
/// `12` levels of nesting; modern implementations usually have more.
/// (here we are using `16`)
#[derive(Debug, Default, Clone)]
pub struct Stack {
    entries: ArrayVec<[u16; cpu::stack::SIZE]>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Will push the return address onto the stack.
    pub fn push(&mut self, pointer: usize) -> Result<(), StackError> {
        if self.entries.len() == self.entries.capacity() {
            Err(StackError::Overflow(self.entries.capacity()))
        } else {
            self.entries.push((pointer & memory::ADDRESS_MASK) as u16);
            Ok(())
        }
    }

    /// Will pop the last return address.
    pub fn pop(&mut self) -> Result<usize, StackError> {
        self.entries
            .pop()
            .map(usize::from)
            .ok_or(StackError::Underflow)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The stack pointer, so the amount of entries in use.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.entries[..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_installed() {
        let ram = Memory::new();
        assert_eq!(
            &fontset::FONTSET[..],
            &ram.as_slice()[fontset::LOCATION..(fontset::LOCATION + fontset::FONTSET.len())]
        );
        assert!(ram.as_slice()[cpu::PROGRAM_COUNTER..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_reset_clears_program() {
        let mut ram = Memory::new();
        ram.write(0x300, 0xAB);
        assert_eq!(ram.read(0x300), 0xAB);
        ram.reset();
        assert_eq!(ram.read(0x300), 0x00);
        assert_eq!(ram.read(0x000), fontset::FONTSET[0]);
        assert_eq!(ram, Memory::new());
    }

    #[test]
    fn test_font_is_read_only() {
        let mut ram = Memory::new();
        for address in FONT_AREA {
            ram.write(address, 0x00);
        }
        assert_eq!(&fontset::FONTSET[..], &ram.as_slice()[FONT_AREA]);
        ram.write(FONT_AREA.end, 0x42);
        assert_eq!(ram.read(FONT_AREA.end), 0x42);
    }

    #[test]
    fn test_program_too_large() {
        let mut ram = Memory::new();
        let rom = vec![0xAA; cpu::PROGRAM_SIZE + 1];
        assert_eq!(
            Err(LoadError::RomTooLarge {
                len: cpu::PROGRAM_SIZE + 1,
                capacity: cpu::PROGRAM_SIZE
            }),
            ram.load_program(&rom)
        );
        assert!(ram.as_slice()[cpu::PROGRAM_COUNTER..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_program_fills_ram() {
        let mut ram = Memory::new();
        let rom = vec![0xAA; cpu::PROGRAM_SIZE];
        assert_eq!(Ok(()), ram.load_program(&rom));
        assert_eq!(ram.read(memory::SIZE - 1), 0xAA);
    }

    #[test]
    fn test_access_wraps() {
        let mut ram = Memory::new();
        ram.write(memory::SIZE - 1, 0x12);
        assert_eq!(ram.opcode(memory::SIZE - 1), 0x1200 | fontset::FONTSET[0] as u16);

        ram.write(memory::SIZE + 0x300, 0x34);
        assert_eq!(ram.read(0x300), 0x34);
        assert_eq!(ram.read(memory::SIZE + 0x300), 0x34);
    }

    #[test]
    /// testing internal functionality of popping and pushing into the stack
    fn test_push_pop_stack() {
        let mut stack = Stack::new();
        assert!(stack.is_empty());

        let next_counter = 0x0133 + cpu::PROGRAM_COUNTER;

        for i in 0..cpu::stack::SIZE {
            assert_eq!(Ok(()), stack.push(next_counter + i * 8));
        }
        assert_eq!(
            Err(StackError::Overflow(cpu::stack::SIZE)),
            stack.push(next_counter)
        );
        assert_eq!(cpu::stack::SIZE, stack.len());

        for i in (0..cpu::stack::SIZE).rev() {
            assert_eq!(Ok(next_counter + i * 8), stack.pop());
        }
        assert!(stack.is_empty());
        assert_eq!(Err(StackError::Underflow), stack.pop());
    }
}
