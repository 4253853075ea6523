use crate::{
    definitions::{cpu, display},
    opcode::{Instruction, Operation, ProgramCounterStep},
    ProcessError,
};

use super::{ChipSet, State};

/// The largest sprite `DXYN` can draw.
const MAX_SPRITE_HEIGHT: usize = 0xF;

impl ChipSet {
    /// Executes a single decoded instruction. Returns how the program counter has to move
    /// and what the host has to do afterwards.
    pub(super) fn execute(
        &mut self,
        instruction: Instruction,
    ) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        use Instruction::*;

        let mut operation = Operation::None;
        let mut step = ProgramCounterStep::Next;

        match instruction {
            Clear => {
                self.display.clear();
                operation = Operation::Draw;
            }
            Return => {
                // pop from stack
                step = ProgramCounterStep::Jump(self.stack.pop()?);
            }
            Sys { nnn } => {
                log::warn!("machine code routine at {:#05X} is not supported, ignored", nnn);
            }
            Jump { nnn } => {
                step = ProgramCounterStep::Jump(nnn as usize);
            }
            Call { nnn } => {
                // the return address is the opcode after the call
                self.stack
                    .push(ProgramCounterStep::Next.apply(self.program_counter))?;
                step = ProgramCounterStep::Jump(nnn as usize);
            }
            SkipEqual { x, nn } => {
                step = ProgramCounterStep::cond(self.registers[x] == nn);
            }
            SkipNotEqual { x, nn } => {
                step = ProgramCounterStep::cond(self.registers[x] != nn);
            }
            SkipEqualRegister { x, y } => {
                step = ProgramCounterStep::cond(self.registers[x] == self.registers[y]);
            }
            Load { x, nn } => {
                self.registers[x] = nn;
            }
            Add { x, nn } => {
                // let VX overflow, but ignore carry
                self.registers[x] = self.registers[x].wrapping_add(nn);
            }
            Assign { x, y } => {
                self.registers[x] = self.registers[y];
            }
            Or { x, y } => {
                self.registers[x] |= self.registers[y];
            }
            And { x, y } => {
                self.registers[x] &= self.registers[y];
            }
            Xor { x, y } => {
                self.registers[x] ^= self.registers[y];
            }
            AddRegister { x, y } => {
                let (res, carry) = self.registers[x].overflowing_add(self.registers[y]);
                self.set_with_flag(x, res, carry);
            }
            Sub { x, y } => {
                // VF is the "no borrow" flag
                let (res, borrow) = self.registers[x].overflowing_sub(self.registers[y]);
                self.set_with_flag(x, res, !borrow);
            }
            ShiftRight { x, .. } => {
                let value = self.registers[x];
                self.set_with_flag(x, value >> 1, value & 0x01 == 0x01);
            }
            SubReverse { x, y } => {
                let (res, borrow) = self.registers[y].overflowing_sub(self.registers[x]);
                self.set_with_flag(x, res, !borrow);
            }
            ShiftLeft { x, .. } => {
                let value = self.registers[x];
                self.set_with_flag(x, value << 1, value & 0x80 == 0x80);
            }
            SkipNotEqualRegister { x, y } => {
                step = ProgramCounterStep::cond(self.registers[x] != self.registers[y]);
            }
            LoadIndex { nnn } => {
                self.index_register = nnn;
            }
            JumpOffset { nnn } => {
                step = ProgramCounterStep::Jump(nnn as usize + self.registers[0] as usize);
            }
            Random { x, nn } => {
                // using a fill bytes call here, as the trait RngCore does not
                // support random u8.
                let mut rand = [0u8; 1];
                self.rng.fill_bytes(&mut rand);
                self.registers[x] = nn & rand[0];
            }
            Draw { x, y, n } => {
                self.draw(x, y, n as usize);
                operation = Operation::Draw;
            }
            SkipKeyPressed { x } => {
                step = ProgramCounterStep::cond(self.keypad.is_pressed_wrapping(self.registers[x]));
            }
            SkipKeyNotPressed { x } => {
                step =
                    ProgramCounterStep::cond(!self.keypad.is_pressed_wrapping(self.registers[x]));
            }
            GetDelayTimer { x } => {
                self.registers[x] = self.delay_timer.get_value();
            }
            AwaitKeyPress { x } => {
                // only presses that happen from now on count
                self.keypad.clear_press();
                self.state = State::AwaitingKey { register: x };
                log::debug!("waiting for a key press for V{:X}", x);
                // don't change the counter until a key was pressed
                step = ProgramCounterStep::None;
                operation = Operation::Wait;
            }
            SetDelayTimer { x } => {
                self.delay_timer.set_value(self.registers[x]);
            }
            SetSoundTimer { x } => {
                self.sound_timer.set_value(self.registers[x]);
            }
            AddIndex { x } => {
                // VF is not affected
                self.index_register = self
                    .index_register
                    .wrapping_add(self.registers[x] as u16);
            }
            FontCharacter { x } => {
                // only the lower nibble names a character
                let character = (self.registers[x] & 0xF) as usize;
                self.index_register = (display::fontset::LOCATION
                    + display::fontset::CHARACTER_SIZE * character)
                    as u16;
            }
            StoreBcd { x } => {
                let i = self.index_register as usize;
                let r = self.registers[x];

                self.memory.write(i, r / 100); // 246u8 / 100 => 2
                self.memory.write(i + 1, r / 10 % 10); // 246u8 / 10 => 24 % 10 => 4
                self.memory.write(i + 2, r % 10); // 246u8 % 10 => 6
            }
            StoreRegisters { x } => {
                // I itself is left unmodified
                let index = self.index_register as usize;
                for (offset, value) in self.registers[..=x].iter().enumerate() {
                    self.memory.write(index + offset, *value);
                }
            }
            LoadRegisters { x } => {
                let index = self.index_register as usize;
                for (offset, register) in self.registers[..=x].iter_mut().enumerate() {
                    *register = self.memory.read(index + offset);
                }
            }
        }

        Ok((step, operation))
    }

    /// Stores the result first, so that `VF` holds the flag even if it was the target.
    #[inline]
    fn set_with_flag(&mut self, x: usize, value: u8, flag: bool) {
        self.registers[x] = value;
        self.registers[cpu::register::LAST] = flag as u8;
    }

    /// Draws `n` rows of sprite data from `I` at `(VX, VY)` and sets the collision flag.
    fn draw(&mut self, x: usize, y: usize, n: usize) {
        let index = self.index_register as usize;
        let height = n.min(MAX_SPRITE_HEIGHT);

        let mut sprite = [0u8; MAX_SPRITE_HEIGHT];
        for (offset, row) in sprite[..height].iter_mut().enumerate() {
            *row = self.memory.read(index + offset);
        }

        let collision = self.display.draw(
            self.registers[x] as usize,
            self.registers[y] as usize,
            &sprite[..height],
            self.config.sprite_edge,
        );
        self.registers[cpu::register::LAST] = collision as u8;
    }
}
