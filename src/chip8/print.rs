//! The pretty print implementation of the [`chipset`](super::ChipSet).
//! This implementation was split up into this file for smaller file sizes and higher
//! cohesion.

use super::ChipSet;
use std::fmt;

/// The amount of entries per printed line, has to be bigger then 0
const HEX_PRINT_STEP: usize = 8;

const INDENT: &str = "\t\t";

/// The pixel representations
const PIXEL_ON: char = '█';
const PIXEL_OFF: char = ' ';

/// Handles all the printing of the pointer values.
mod pointer_print {
    use std::fmt;

    /// will formatt the pointers according to definition
    pub(super) fn formatter(f: &mut fmt::Formatter<'_>, from: usize, to: usize) -> fmt::Result {
        write!(f, "{}{:#06X} - {:#06X} :", super::INDENT, from, to)
    }
}

/// handles printting of the registers and the stack.
mod integer_print {
    use super::{pointer_print, HEX_PRINT_STEP};
    use std::fmt;

    /// will pretty print all the integer data given
    pub(super) fn printer<T>(f: &mut fmt::Formatter<'_>, data: &[T]) -> fmt::Result
    where
        T: fmt::UpperHex,
    {
        for (line, chunk) in data.chunks(HEX_PRINT_STEP).enumerate() {
            let from = line * HEX_PRINT_STEP;
            pointer_print::formatter(f, from, from + chunk.len() - 1)?;
            for entry in chunk {
                write!(f, " {:#06X}", entry)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Handles all the boolean data types.
mod bool_print {
    use super::{pointer_print, HEX_PRINT_STEP};
    use std::fmt;

    pub(super) fn printer(f: &mut fmt::Formatter<'_>, data: &[bool]) -> fmt::Result {
        for (line, chunk) in data.chunks(HEX_PRINT_STEP).enumerate() {
            let from = line * HEX_PRINT_STEP;
            pointer_print::formatter(f, from, from + chunk.len() - 1)?;
            for (i, value) in chunk.iter().enumerate() {
                if i + 1 == chunk.len() {
                    write!(f, " {}", value)?;
                } else {
                    // keep the columns aligned with the integers
                    write!(f, " {:<6}", value)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Handles all the opcode prints
mod opcode_print {
    use super::{pointer_print, HEX_PRINT_STEP};
    use crate::{definitions::memory, opcode::Opcode};
    use std::fmt;

    /// The amount of bytes per printed line
    const POINTER_INCREMENT: usize = HEX_PRINT_STEP * memory::opcodes::SIZE;
    /// The values that are used when there are rows of zeros.
    const FILLER_BASE: &str = "...";
    /// The width of a full row, minus the two opcodes around the filler
    const FILLER_WIDTH: usize = HEX_PRINT_STEP * 7 - 1 - 2 * 6;

    /// this struct will simulate a single row of opcodes (only in this context)
    struct Row {
        from: usize,
        to: usize,
        data: [Opcode; HEX_PRINT_STEP],
        only_null: bool,
    }

    impl Row {
        fn print(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            pointer_print::formatter(f, self.from, self.to)?;
            if self.only_null {
                writeln!(
                    f,
                    " {:#06X}{:^width$}{:#06X}",
                    0,
                    FILLER_BASE,
                    0,
                    width = FILLER_WIDTH
                )
            } else {
                for entry in self.data.iter() {
                    write!(f, " {:#06X}", entry)?;
                }
                writeln!(f)
            }
        }
    }

    /// will pretty print the content of the raw memory, consecutive rows
    /// of zeros are collapsed into a single one
    pub(super) fn printer(f: &mut fmt::Formatter<'_>, ram: &[u8]) -> fmt::Result {
        let mut rows: Vec<Row> = Vec::with_capacity(ram.len() / POINTER_INCREMENT);

        for (line, chunk) in ram.chunks(POINTER_INCREMENT).enumerate() {
            let from = line * POINTER_INCREMENT;
            let to = from + chunk.len() - 1;

            let mut data = [0; HEX_PRINT_STEP];
            for (opcode, bytes) in data.iter_mut().zip(chunk.chunks(memory::opcodes::SIZE)) {
                let low = bytes.get(1).copied().unwrap_or(0);
                *opcode = Opcode::from_be_bytes([bytes[0], low]);
            }
            let only_null = data.iter().all(|opcode| *opcode == 0);

            match rows.last_mut() {
                Some(last) if only_null && last.only_null => last.to = to,
                _ => rows.push(Row {
                    from,
                    to,
                    data,
                    only_null,
                }),
            }
        }

        for row in rows.iter() {
            row.print(f)?;
        }
        Ok(())
    }
}

/// Draws the frame buffer between two borders.
mod display_print {
    use super::{INDENT, PIXEL_OFF, PIXEL_ON};
    use crate::devices::Display;
    use std::fmt;

    pub(super) fn printer(f: &mut fmt::Formatter<'_>, display: &Display) -> fmt::Result {
        for row in display.rows() {
            write!(f, "{}|", INDENT)?;
            for pixel in row.iter() {
                write!(f, "{}", if *pixel { PIXEL_ON } else { PIXEL_OFF })?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

impl fmt::Display for ChipSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Chipset {{")?;

        writeln!(f, "\tState :\n{}{:?}", INDENT, self.state)?;
        writeln!(f, "\tOpcode :\n{}{:#06X}", INDENT, self.opcode)?;
        writeln!(f, "\tProgram Counter :\n{}{:#06X}", INDENT, self.program_counter)?;
        writeln!(f, "\tIndex Register :\n{}{:#06X}", INDENT, self.index_register)?;
        writeln!(
            f,
            "\tTimers :\n{}delay {:#04X} sound {:#04X}",
            INDENT,
            self.delay_timer.get_value(),
            self.sound_timer.get_value()
        )?;

        writeln!(f, "\tRegister :")?;
        integer_print::printer(f, &self.registers)?;

        // the stack is filled up, so that the full depth is visible
        let mut stack = [0u16; crate::definitions::cpu::stack::SIZE];
        stack[..self.stack.len()].copy_from_slice(self.stack.as_slice());
        writeln!(f, "\tStack :")?;
        integer_print::printer(f, &stack)?;

        writeln!(f, "\tKeyboard :")?;
        bool_print::printer(f, self.keypad.get_keys())?;

        writeln!(f, "\tDisplay :")?;
        display_print::printer(f, &self.display)?;

        writeln!(f, "\tMemory :")?;
        opcode_print::printer(f, self.memory.as_slice())?;

        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::get_default_chip;
    use crate::definitions::{display, keyboard};

    fn section<'a>(output: &'a str, name: &str) -> Vec<&'a str> {
        output
            .lines()
            .skip_while(|line| line.trim() != name)
            .skip(1)
            .take_while(|line| line.starts_with("\t\t"))
            .collect()
    }

    #[test]
    fn test_header() {
        let chip = get_default_chip();
        let output = format!("{}", chip);

        assert!(output.starts_with("Chipset {\n"));
        assert!(output.ends_with("}"));
        assert_eq!(vec!["\t\tRunning"], section(&output, "State :"));
        assert_eq!(vec!["\t\t0x0200"], section(&output, "Program Counter :"));
        assert_eq!(vec!["\t\tdelay 0x00 sound 0x00"], section(&output, "Timers :"));
    }

    #[test]
    fn test_register_and_keyboard_print() {
        let mut chip = get_default_chip();
        let mut keys = [false; keyboard::SIZE];
        for (index, key) in keys.iter_mut().enumerate() {
            *key = index % 2 != 0;
        }
        chip.set_keyboard(&keys);
        chip.registers = [0; 16];
        chip.registers[0xF] = 0xAB;

        let output = format!("{}", chip);

        assert_eq!(
            vec![
                "\t\t0x0000 - 0x0007 : 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000",
                "\t\t0x0008 - 0x000F : 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000 0x00AB",
            ],
            section(&output, "Register :")
        );
        assert_eq!(
            vec![
                "\t\t0x0000 - 0x0007 : false  true   false  true   false  true   false  true",
                "\t\t0x0008 - 0x000F : false  true   false  true   false  true   false  true",
            ],
            section(&output, "Keyboard :")
        );
    }

    #[test]
    fn test_display_print() {
        let mut chip = get_default_chip();
        chip.display.draw(0, 0, &[0xC0], crate::config::SpriteEdge::Clip);

        let output = format!("{}", chip);
        let rows = section(&output, "Display :");

        assert_eq!(display::HEIGHT, rows.len());
        assert!(rows[0].starts_with("\t\t|██ "));
        assert_eq!(rows[1], format!("\t\t|{}|", " ".repeat(display::WIDTH)));
    }

    #[test]
    fn test_memory_print() {
        let mut chip = get_default_chip();
        chip.load_rom(&[0x00, 0xE0, 0x12, 0x00]).unwrap();

        let output = format!("{}", chip);

        assert_eq!(
            vec![
                "\t\t0x0000 - 0x000F : 0xF090 0x9090 0xF020 0x6020 0x2070 0xF010 0xF080 0xF0F0",
                "\t\t0x0010 - 0x001F : 0x10F0 0x10F0 0x9090 0xF010 0x10F0 0x80F0 0x10F0 0xF080",
                "\t\t0x0020 - 0x002F : 0xF090 0xF0F0 0x1020 0x4040 0xF090 0xF090 0xF0F0 0x90F0",
                "\t\t0x0030 - 0x003F : 0x10F0 0xF090 0xF090 0x90E0 0x90E0 0x90E0 0xF080 0x8080",
                "\t\t0x0040 - 0x004F : 0xF0E0 0x9090 0x90E0 0xF080 0xF080 0xF0F0 0x80F0 0x8080",
                "\t\t0x0050 - 0x01FF : 0x0000                    ...                    0x0000",
                "\t\t0x0200 - 0x020F : 0x00E0 0x1200 0x0000 0x0000 0x0000 0x0000 0x0000 0x0000",
                "\t\t0x0210 - 0x0FFF : 0x0000                    ...                    0x0000",
            ],
            section(&output, "Memory :")
        );
    }
}
