//! Opcode abstractions, decoding and disassembly.
use std::{convert::TryFrom, fmt};

use crate::{definitions::memory, OpcodeError};

/// the base mask used for generating all the other sub masks
pub(crate) const OPCODE_MASK_FFFF: u16 = u16::MAX;

/// the mask for the first twelve bits
pub(crate) const OPCODE_MASK_FFF0: u16 = OPCODE_MASK_FFFF << 4;

/// the mask for the first eight bits
pub(crate) const OPCODE_MASK_FF00: u16 = OPCODE_MASK_FFFF << 8;

/// the mask for the first four bits
pub(crate) const OPCODE_MASK_F000: u16 = OPCODE_MASK_FFFF << 12;

/// the mask for the last four bits
pub(crate) const OPCODE_MASK_000F: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FFF0;

/// the mask for the last eight bits
pub(crate) const OPCODE_MASK_00FF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FF00;

/// the mask for the last twelve bits
pub(crate) const OPCODE_MASK_0FFF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_F000;

/// the size of a single byte
const BYTE_SIZE: u16 = 0x8;

/// a wrapper type for u16 to make it clear what is meant to be used
pub type Opcode = u16;

/// These are special traits used to filter out information
/// from opcodes
pub trait OpcodeTrait {
    /// this is an opcode extractor that will return the
    /// opcode type nibble form any opcode
    /// - `T` is the opcode type
    fn t(&self) -> u8;

    /// this is an opcode extractor for the opcode type `TNNN`
    /// - `T` is the opcode type
    /// - `NNN` is an address
    fn nnn(&self) -> u16;

    /// this is an opcode extractor for the opcode type `TXNN`
    /// - `T` is the opcode type
    /// - `X` is a register index
    /// - `NN` is a constant
    fn xnn(&self) -> (usize, u8);

    /// this is an opcode extractor for the opcode type `TXYN`
    /// - `T` is the opcode type
    /// - `X` is a register index
    /// - `Y` is a register index
    /// - `N` is a constant or an opcode subtype
    fn xyn(&self) -> (usize, usize, u8);

    /// this is an opcode extractor for the opcode type `TXTT`
    /// - `T` is the opcode type
    /// - `X` is a register index
    fn x(&self) -> usize;
}

impl OpcodeTrait for Opcode {
    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.t(), 0x1);
    /// ```
    fn t(&self) -> u8 {
        ((self & OPCODE_MASK_F000) >> (3 * BYTE_SIZE / 2)) as u8
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.nnn(), 0xEDA)
    /// ```
    fn nnn(&self) -> u16 {
        self & OPCODE_MASK_0FFF
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.xnn(), (0xE, 0xDA));
    /// ```
    fn xnn(&self) -> (usize, u8) {
        let x = self.x();
        let nn = (self & OPCODE_MASK_00FF) as u8;
        (x, nn)
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.xyn(), (0xE, 0xD, 0xA));
    /// ```
    fn xyn(&self) -> (usize, usize, u8) {
        const MASK: u16 = OPCODE_MASK_00FF ^ OPCODE_MASK_000F;
        const NIBBLE: u16 = BYTE_SIZE / 2;
        let x = self.x();
        let y = ((self & MASK) >> NIBBLE) as usize;
        let n = (self & OPCODE_MASK_000F) as u8;
        (x, y, n)
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.x(), 0xE);
    /// ```
    fn x(&self) -> usize {
        ((self & OPCODE_MASK_0FFF & OPCODE_MASK_FF00) >> BYTE_SIZE) as usize
    }
}

/// A single decoded instruction of the classic chip8 instruction set.
///
/// `x` and `y` are register indexes, `nn` an immediate byte, `nnn` an address
/// and `n` the sprite height of a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `00E0` - Clears the screen.
    Clear,
    /// `00EE` - Returns from a subroutine.
    Return,
    /// `0NNN` - Calls the machine code routine at `NNN`, which is not supported and therefore
    /// ignored.
    Sys { nnn: u16 },
    /// `1NNN` - Jumps to address `NNN`.
    Jump { nnn: u16 },
    /// `2NNN` - Calls the subroutine at `NNN`.
    Call { nnn: u16 },
    /// `3XNN` - Skips the next instruction if `VX` equals `NN`.
    SkipEqual { x: usize, nn: u8 },
    /// `4XNN` - Skips the next instruction if `VX` doesn't equal `NN`.
    SkipNotEqual { x: usize, nn: u8 },
    /// `5XY0` - Skips the next instruction if `VX` equals `VY`.
    SkipEqualRegister { x: usize, y: usize },
    /// `6XNN` - Sets `VX` to `NN`.
    Load { x: usize, nn: u8 },
    /// `7XNN` - Adds `NN` to `VX`. (Carry flag is not changed)
    Add { x: usize, nn: u8 },
    /// `8XY0` - Sets `VX` to the value of `VY`.
    Assign { x: usize, y: usize },
    /// `8XY1` - Sets `VX` to `VX | VY`.
    Or { x: usize, y: usize },
    /// `8XY2` - Sets `VX` to `VX & VY`.
    And { x: usize, y: usize },
    /// `8XY3` - Sets `VX` to `VX ^ VY`.
    Xor { x: usize, y: usize },
    /// `8XY4` - Adds `VY` to `VX`. `VF` is set to `1` when there's a carry, and to `0` when
    /// there isn't.
    AddRegister { x: usize, y: usize },
    /// `8XY5` - `VY` is subtracted from `VX`. `VF` is set to `0` when there's a borrow, and
    /// `1` when there isn't.
    Sub { x: usize, y: usize },
    /// `8XY6` - Stores the least significant bit of `VX` in `VF` and then shifts `VX` to the
    /// right by `1`.
    ShiftRight { x: usize, y: usize },
    /// `8XY7` - Sets `VX` to `VY` minus `VX`. `VF` is set to `0` when there's a borrow, and
    /// `1` when there isn't.
    SubReverse { x: usize, y: usize },
    /// `8XYE` - Stores the most significant bit of `VX` in `VF` and then shifts `VX` to the
    /// left by `1`.
    ShiftLeft { x: usize, y: usize },
    /// `9XY0` - Skips the next instruction if `VX` doesn't equal `VY`.
    SkipNotEqualRegister { x: usize, y: usize },
    /// `ANNN` - Sets `I` to the address `NNN`.
    LoadIndex { nnn: u16 },
    /// `BNNN` - Jumps to the address `NNN` plus `V0`.
    JumpOffset { nnn: u16 },
    /// `CXNN` - Sets `VX` to a random number and `NN`.
    Random { x: usize, nn: u8 },
    /// `DXYN` - Draws a sprite `8` pixels wide and `N` pixels high at `(VX, VY)`.
    Draw { x: usize, y: usize, n: u8 },
    /// `EX9E` - Skips the next instruction if the key stored in `VX` is pressed.
    SkipKeyPressed { x: usize },
    /// `EXA1` - Skips the next instruction if the key stored in `VX` isn't pressed.
    SkipKeyNotPressed { x: usize },
    /// `FX07` - Sets `VX` to the value of the delay timer.
    GetDelayTimer { x: usize },
    /// `FX0A` - A key press is awaited, and then stored in `VX`.
    AwaitKeyPress { x: usize },
    /// `FX15` - Sets the delay timer to `VX`.
    SetDelayTimer { x: usize },
    /// `FX18` - Sets the sound timer to `VX`.
    SetSoundTimer { x: usize },
    /// `FX1E` - Adds `VX` to `I`. `VF` is not affected.
    AddIndex { x: usize },
    /// `FX29` - Sets `I` to the location of the font sprite for the character in `VX`.
    FontCharacter { x: usize },
    /// `FX33` - Stores the binary-coded decimal representation of `VX` at `I`, `I+1` and `I+2`.
    StoreBcd { x: usize },
    /// `FX55` - Stores `V0` to `VX` (including `VX`) in memory starting at address `I`.
    StoreRegisters { x: usize },
    /// `FX65` - Fills `V0` to `VX` (including `VX`) from memory starting at address `I`.
    LoadRegisters { x: usize },
}

impl TryFrom<Opcode> for Instruction {
    type Error = OpcodeError;

    /// Decodes the given opcode.
    ///
    /// # Example
    /// ```rust
    /// # use std::convert::TryFrom;
    /// # use chip::opcode::*;
    /// # use chip::OpcodeError;
    /// assert_eq!(Instruction::try_from(0xD125), Ok(Instruction::Draw { x: 1, y: 2, n: 5 }));
    /// assert_eq!(Instruction::try_from(0x5121), Err(OpcodeError::InvalidOpcode(0x5121)));
    /// ```
    fn try_from(opcode: Opcode) -> Result<Self, Self::Error> {
        use Instruction::*;

        let nnn = opcode.nnn();
        let (x, nn) = opcode.xnn();
        let (_, y, n) = opcode.xyn();

        let instruction = match (opcode.t(), n) {
            (0x0, _) => match opcode {
                0x00E0 => Clear,
                0x00EE => Return,
                _ => Sys { nnn },
            },
            (0x1, _) => Jump { nnn },
            (0x2, _) => Call { nnn },
            (0x3, _) => SkipEqual { x, nn },
            (0x4, _) => SkipNotEqual { x, nn },
            (0x5, 0x0) => SkipEqualRegister { x, y },
            (0x6, _) => Load { x, nn },
            (0x7, _) => Add { x, nn },
            (0x8, 0x0) => Assign { x, y },
            (0x8, 0x1) => Or { x, y },
            (0x8, 0x2) => And { x, y },
            (0x8, 0x3) => Xor { x, y },
            (0x8, 0x4) => AddRegister { x, y },
            (0x8, 0x5) => Sub { x, y },
            (0x8, 0x6) => ShiftRight { x, y },
            (0x8, 0x7) => SubReverse { x, y },
            (0x8, 0xE) => ShiftLeft { x, y },
            (0x9, 0x0) => SkipNotEqualRegister { x, y },
            (0xA, _) => LoadIndex { nnn },
            (0xB, _) => JumpOffset { nnn },
            (0xC, _) => Random { x, nn },
            (0xD, _) => Draw { x, y, n },
            (0xE, _) => match nn {
                0x9E => SkipKeyPressed { x },
                0xA1 => SkipKeyNotPressed { x },
                _ => return Err(OpcodeError::InvalidOpcode(opcode)),
            },
            (0xF, _) => match nn {
                0x07 => GetDelayTimer { x },
                0x0A => AwaitKeyPress { x },
                0x15 => SetDelayTimer { x },
                0x18 => SetSoundTimer { x },
                0x1E => AddIndex { x },
                0x29 => FontCharacter { x },
                0x33 => StoreBcd { x },
                0x55 => StoreRegisters { x },
                0x65 => LoadRegisters { x },
                _ => return Err(OpcodeError::InvalidOpcode(opcode)),
            },
            _ => return Err(OpcodeError::InvalidOpcode(opcode)),
        };

        Ok(instruction)
    }
}

/// Disassembles the instruction into the common chip8 assembler mnemonics.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Clear => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Sys { nnn } => write!(f, "SYS {:#05X}", nnn),
            Jump { nnn } => write!(f, "JP {:#05X}", nnn),
            Call { nnn } => write!(f, "CALL {:#05X}", nnn),
            SkipEqual { x, nn } => write!(f, "SE V{:X}, {:#04X}", x, nn),
            SkipNotEqual { x, nn } => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            SkipEqualRegister { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Load { x, nn } => write!(f, "LD V{:X}, {:#04X}", x, nn),
            Add { x, nn } => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            Assign { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddRegister { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubReverse { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipNotEqualRegister { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex { nnn } => write!(f, "LD I, {:#05X}", nnn),
            JumpOffset { nnn } => write!(f, "JP V0, {:#05X}", nnn),
            Random { x, nn } => write!(f, "RND V{:X}, {:#04X}", x, nn),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyPressed { x } => write!(f, "SKP V{:X}", x),
            SkipKeyNotPressed { x } => write!(f, "SKNP V{:X}", x),
            GetDelayTimer { x } => write!(f, "LD V{:X}, DT", x),
            AwaitKeyPress { x } => write!(f, "LD V{:X}, K", x),
            SetDelayTimer { x } => write!(f, "LD DT, V{:X}", x),
            SetSoundTimer { x } => write!(f, "LD ST, V{:X}", x),
            AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            FontCharacter { x } => write!(f, "LD F, V{:X}", x),
            StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            StoreRegisters { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegisters { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Represents the program steps that the chip
/// can take.
pub enum ProgramCounterStep {
    /// Will not change the program counter
    None,
    /// Will move the program counter to the next instruction
    Next,
    /// Will skip the next instruction
    Skip,
    /// Will simply move the program counter to the given location.
    Jump(usize),
}

impl ProgramCounterStep {
    /// Will return a Skip if the condition is true.
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Next, ProgramCounterStep::cond(false));
    /// assert_eq!(ProgramCounterStep::Skip, ProgramCounterStep::cond(true));
    /// ```
    #[inline]
    pub fn cond(cond: bool) -> Self {
        if cond {
            ProgramCounterStep::Skip
        } else {
            ProgramCounterStep::Next
        }
    }

    /// Calculates the new program counter, the result always points into the ram.
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Skip.apply(0x200), 0x204);
    /// assert_eq!(ProgramCounterStep::Next.apply(0xFFE), 0x000);
    /// assert_eq!(ProgramCounterStep::Jump(0x1234).apply(0x200), 0x234);
    /// ```
    #[inline]
    pub fn apply(&self, program_counter: usize) -> usize {
        let next = match *self {
            ProgramCounterStep::None => program_counter,
            ProgramCounterStep::Next => program_counter + memory::opcodes::SIZE,
            ProgramCounterStep::Skip => program_counter + 2 * memory::opcodes::SIZE,
            ProgramCounterStep::Jump(pointer) => pointer,
        };
        next & memory::ADDRESS_MASK
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Represents a command from the interpreter up to the host.
pub enum Operation {
    /// If no action has to be taken.
    None,
    /// If the host shall wait for the next key press
    Wait,
    /// The display changed and should be redrawn
    Draw,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_all_instructions() {
        use Instruction::*;

        let table: [(Opcode, Instruction); 35] = [
            (0x00E0, Clear),
            (0x00EE, Return),
            (0x0123, Sys { nnn: 0x123 }),
            (0x1123, Jump { nnn: 0x123 }),
            (0x2123, Call { nnn: 0x123 }),
            (0x3102, SkipEqual { x: 1, nn: 0x02 }),
            (0x4102, SkipNotEqual { x: 1, nn: 0x02 }),
            (0x5120, SkipEqualRegister { x: 1, y: 2 }),
            (0x6102, Load { x: 1, nn: 0x02 }),
            (0x7102, Add { x: 1, nn: 0x02 }),
            (0x8120, Assign { x: 1, y: 2 }),
            (0x8121, Or { x: 1, y: 2 }),
            (0x8122, And { x: 1, y: 2 }),
            (0x8123, Xor { x: 1, y: 2 }),
            (0x8124, AddRegister { x: 1, y: 2 }),
            (0x8125, Sub { x: 1, y: 2 }),
            (0x8126, ShiftRight { x: 1, y: 2 }),
            (0x8127, SubReverse { x: 1, y: 2 }),
            (0x812E, ShiftLeft { x: 1, y: 2 }),
            (0x9120, SkipNotEqualRegister { x: 1, y: 2 }),
            (0xA123, LoadIndex { nnn: 0x123 }),
            (0xB123, JumpOffset { nnn: 0x123 }),
            (0xC102, Random { x: 1, nn: 0x02 }),
            (0xD123, Draw { x: 1, y: 2, n: 3 }),
            (0xE19E, SkipKeyPressed { x: 1 }),
            (0xE1A1, SkipKeyNotPressed { x: 1 }),
            (0xF107, GetDelayTimer { x: 1 }),
            (0xF10A, AwaitKeyPress { x: 1 }),
            (0xF115, SetDelayTimer { x: 1 }),
            (0xF118, SetSoundTimer { x: 1 }),
            (0xF11E, AddIndex { x: 1 }),
            (0xF129, FontCharacter { x: 1 }),
            (0xF133, StoreBcd { x: 1 }),
            (0xF155, StoreRegisters { x: 1 }),
            (0xF165, LoadRegisters { x: 1 }),
        ];

        for (opcode, instruction) in table.iter() {
            assert_eq!(Instruction::try_from(*opcode), Ok(*instruction));
        }
    }

    #[test]
    fn test_decode_invalid_opcodes() {
        let invalid: &[Opcode] = &[
            0x5121, 0x512F, 0x8128, 0x812D, 0x812F, 0x9121, 0xE19F, 0xE1A2, 0xF100, 0xF145,
            0xF1FF,
        ];

        for opcode in invalid {
            assert_eq!(
                Instruction::try_from(*opcode),
                Err(OpcodeError::InvalidOpcode(*opcode))
            );
        }
    }

    #[test]
    fn test_invalid_opcode_message() {
        let err = Instruction::try_from(0xF1FF).unwrap_err();
        assert_eq!(
            "An unsupported opcode was used 0xF1FF.".to_string(),
            format!("{}", err)
        );
    }

    #[test]
    fn test_disassembly() {
        let data = [
            (0x00E0, "CLS"),
            (0x00EE, "RET"),
            (0x1A2B, "JP 0xA2B"),
            (0x6A0F, "LD VA, 0x0F"),
            (0x8AB4, "ADD VA, VB"),
            (0xB200, "JP V0, 0x200"),
            (0xD015, "DRW V0, V1, 5"),
            (0xF30A, "LD V3, K"),
            (0xFF65, "LD VF, [I]"),
        ];

        for (opcode, text) in data.iter() {
            let instruction = Instruction::try_from(*opcode).expect("valid opcode");
            assert_eq!(*text, instruction.to_string());
        }
    }
}
