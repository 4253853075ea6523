use std::convert::TryFrom;

use {
    crate::{
        config::{Config, UnknownOpcode},
        definitions::{cpu, keyboard},
        devices::{Display, Keypad},
        memory::{Memory, Stack},
        opcode::{Instruction, Opcode, Operation, ProgramCounterStep},
        timer::{Clock, Timer},
        DeviceError, LoadError, ProcessError,
    },
    rand::RngCore,
};

/// The execution state of the chipset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Instructions are fetched and executed.
    Running,
    /// The `FX0A` instruction is waiting for a key press, that will be stored into the
    /// given register.
    AwaitingKey { register: usize },
}

/// The ChipSet struct represents the current state
/// of the system, it contains all the structures
/// needed for emulating an instant on the
/// Chip8 CPU.
pub struct ChipSet {
    /// The behaviour switches
    pub(super) config: Config,
    /// the last fetched opcode
    pub(super) opcode: Opcode,
    /// The ram of the chip, including the font set
    pub(super) memory: Memory,
    /// `8-bit` data registers named `V0` to `VF`. The `VF` register doubles as a flag for some
    /// instructions; thus, it should be avoided. In an addition operation, `VF` is the carry flag,
    /// while in subtraction, it is the "no borrow" flag. In the draw instruction `VF` is set upon
    /// pixel collision.
    pub(super) registers: [u8; cpu::register::SIZE],
    /// The index for the register, this is a special register entry
    /// called index `I`
    pub(super) index_register: u16,
    /// The program counter is a CPU register in the computer processor which has the address of the
    /// next instruction to be executed from memory.
    pub(super) program_counter: usize,
    /// The return addresses of the subroutine calls
    pub(super) stack: Stack,
    /// Delay timer: This timer is intended to be used for timing the events of games. Its value
    /// can be set and read.
    /// Counts down at 60 hertz, until it reaches 0.
    pub(super) delay_timer: Timer,
    /// Sound timer: This timer is used for sound effects. When its value is nonzero, a beeping
    /// sound is made.
    /// Counts down at 60 hertz, until it reaches 0.
    pub(super) sound_timer: Timer,
    /// Paces the timers against the executed cycles
    pub(super) clock: Clock,
    /// The monochrome `64 x 32` frame buffer
    pub(super) display: Display,
    /// The hex keyboard
    pub(super) keypad: Keypad,
    /// If the chip is running or waiting for a key press
    pub(super) state: State,
    /// This stores the random number generator, used by the chipset.
    /// It is stored into the chipset, so as to enable simple mocking
    /// of the given type.
    pub(super) rng: Box<dyn RngCore + Send>,
}

impl Default for ChipSet {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl ChipSet {
    /// will create a new chipset object without a program
    pub fn new(config: Config) -> Self {
        Self {
            config,
            opcode: 0,
            memory: Memory::new(),
            registers: [0; cpu::register::SIZE],
            index_register: 0,
            program_counter: cpu::PROGRAM_COUNTER,
            stack: Stack::new(),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            clock: Clock::new(config.cpu_hertz),
            display: Display::new(),
            keypad: Keypad::new(),
            state: State::Running,
            rng: Box::new(rand::rngs::OsRng),
        }
    }

    /// will create a new chipset object with the rom already loaded
    pub fn with_rom(config: Config, rom: &[u8]) -> Result<Self, LoadError> {
        let mut chip = Self::new(config);
        chip.load_rom(rom)?;
        Ok(chip)
    }

    /// Resets the whole machine and copies the rom to the program start.
    ///
    /// If the rom doesn't fit into the ram, nothing is changed.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        Memory::check_program(rom)?;

        self.memory.reset();
        self.memory.load_program(rom)?;

        self.opcode = 0;
        self.registers = [0; cpu::register::SIZE];
        self.index_register = 0;
        self.program_counter = cpu::PROGRAM_COUNTER;
        self.stack.clear();
        self.delay_timer.set_value(0);
        self.sound_timer.set_value(0);
        self.clock.reset();
        self.display.clear();
        self.keypad.reset();
        self.state = State::Running;

        log::debug!("loaded a rom of {} bytes", rom.len());
        Ok(())
    }

    /// Replaces the random number generator used by `CXNN`.
    pub fn set_rng(&mut self, rng: Box<dyn RngCore + Send>) {
        self.rng = rng;
    }

    /// will advance the program by a single cycle
    ///
    /// The timers are advanced as well, they expect the cycles to happen at the
    /// configured cpu frequency.
    pub fn step(&mut self) -> Result<Operation, ProcessError> {
        let operation = match self.state {
            State::AwaitingKey { register } => self.resolve_key_wait(register),
            State::Running => self.cycle()?,
        };

        for _ in 0..self.clock.cycle() {
            self.delay_timer.decrement();
            self.sound_timer.decrement();
        }

        Ok(operation)
    }

    /// fetch, decode and execute
    fn cycle(&mut self) -> Result<Operation, ProcessError> {
        self.opcode = self.memory.opcode(self.program_counter);

        let (step, operation) = match Instruction::try_from(self.opcode) {
            Ok(instruction) => {
                log::trace!(
                    "{:#05X}: {:#06X} {}",
                    self.program_counter,
                    self.opcode,
                    instruction
                );
                self.execute(instruction)?
            }
            Err(err) => match self.config.unknown_opcode {
                UnknownOpcode::Skip => {
                    log::warn!("{:#05X}: {} Skipping it.", self.program_counter, err);
                    (ProgramCounterStep::Next, Operation::None)
                }
                UnknownOpcode::Fail => return Err(err.into()),
            },
        };

        self.program_counter = step.apply(self.program_counter);
        Ok(operation)
    }

    fn resolve_key_wait(&mut self, register: usize) -> Operation {
        match self.keypad.take_press() {
            Some(key) => {
                log::debug!("key {:#X} pressed, stored in V{:X}", key, register);
                self.registers[register] = key as u8;
                self.program_counter = ProgramCounterStep::Next.apply(self.program_counter);
                self.state = State::Running;
                Operation::None
            }
            None => Operation::Wait,
        }
    }

    /// Will set the value of the given key
    pub fn set_key(&mut self, key: usize, to: bool) -> Result<(), DeviceError> {
        self.keypad.set_key(key, to)
    }

    /// Will write keyboard data into interncal keyboard representation.
    pub fn set_keyboard(&mut self, keys: &[bool; keyboard::SIZE]) {
        self.keypad.set_keys(keys);
    }

    /// Will get the current state of the keyboard
    pub fn get_keyboard(&self) -> &[bool; keyboard::SIZE] {
        self.keypad.get_keys()
    }

    /// The state of the pixel in column `x` and row `y`
    pub fn pixel_at(&self, x: usize, y: usize) -> Result<bool, DeviceError> {
        self.display.pixel(x, y)
    }

    /// Will return the frame buffer
    pub fn get_display(&self) -> &Display {
        &self.display
    }

    /// will return the sound timer
    pub fn get_sound_timer(&self) -> u8 {
        self.sound_timer.get_value()
    }

    /// will return the delay timer
    pub fn get_delay_timer(&self) -> u8 {
        self.delay_timer.get_value()
    }

    pub fn get_registers(&self) -> &[u8; cpu::register::SIZE] {
        &self.registers
    }

    pub fn get_index_register(&self) -> u16 {
        self.index_register
    }

    pub fn get_program_counter(&self) -> usize {
        self.program_counter
    }

    pub fn get_stack(&self) -> &[u16] {
        self.stack.as_slice()
    }

    pub fn get_memory(&self) -> &[u8] {
        self.memory.as_slice()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
