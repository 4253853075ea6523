/// The definitions

pub mod memory {
    /// The size of the chipset ram
    pub const SIZE: usize = 0x1000; // 4096

    /// Mask used to keep any address inside of the ram.
    pub const ADDRESS_MASK: usize = SIZE - 1;

    /// opcode information
    pub mod opcodes {
        /// The step used for calculating the program counter increments
        pub const SIZE: usize = 2;
    }
}

/// The definitions for the cpu
pub mod cpu {
    /// The starting point for the program
    pub const PROGRAM_COUNTER: usize = 0x0200;
    /// The amount of bytes a program can occupy
    pub const PROGRAM_SIZE: usize = super::memory::SIZE - PROGRAM_COUNTER;
    /// The default amount of hertz the emulation is expected to run at.
    pub const HERTZ: u32 = 600;

    /// The definitions needed for the register
    pub mod register {
        /// The size of the chip set registers
        pub const SIZE: usize = 16;
        /// The last entry of the registers (`VF`), used as flag
        pub const LAST: usize = SIZE - 1;
    }

    /// The stack definitions
    pub mod stack {
        /// The count of nesting entries
        pub const SIZE: usize = 16;
    }
}

/// The timer definitions
pub mod timer {
    /// The amount of hertz the timers count down at
    pub const HERTZ: u32 = 60;
}

/// The display definitions
pub mod display {
    /// The amount of pixels per row
    pub const WIDTH: usize = 64;
    /// The amount of rows
    pub const HEIGHT: usize = 32;

    /// The width of a single sprite row in pixels
    pub const SPRITE_WIDTH: usize = 8;

    /// The fontset information
    pub mod fontset {
        /// Is the location of the beginning to the font in memory
        pub const LOCATION: usize = 0x000;
        /// The amount of bytes a single character takes up
        pub const CHARACTER_SIZE: usize = 5;
        /// The font set character to be rendered on the screen
        pub const FONTSET: [u8; 80] = [
            0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
            0x20, 0x60, 0x20, 0x20, 0x70, // 1
            0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
            0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
            0x90, 0x90, 0xF0, 0x10, 0x10, // 4
            0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
            0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
            0xF0, 0x10, 0x20, 0x40, 0x40, // 7
            0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
            0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
            0xF0, 0x90, 0xF0, 0x90, 0x90, // A
            0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
            0xF0, 0x80, 0x80, 0x80, 0xF0, // C
            0xE0, 0x90, 0x90, 0x90, 0xE0, // D
            0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
            0xF0, 0x80, 0xF0, 0x80, 0x80, // F
        ];
    }
}

/// The definitions needed for correct keyboard definitions.
pub mod keyboard {
    /// all the different keyboard entries
    pub const SIZE: usize = 16;
}
