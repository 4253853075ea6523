use crate::{
    config::SpriteEdge,
    definitions::{display, keyboard},
    DeviceError,
};

/// A single row of the display.
pub type Row = [bool; display::WIDTH];

#[cfg_attr(test, mockall::automock)]
/// The traits responsible for the display based code
pub trait DisplayCommands {
    /// Will display all from the pixels
    fn display(&mut self, frame: &Display);
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for reading the keyboard data
pub trait KeyboardCommands {
    fn get_keyboard(&self) -> [bool; keyboard::SIZE];
}

/// The graphics of the Chip 8 are black and white and the screen has a total of `2048` pixels
/// `(64 x 32)`. The pixels are stored row by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    pixels: Box<[Row; display::HEIGHT]>,
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl Display {
    pub fn new() -> Self {
        Self {
            pixels: Box::new([[false; display::WIDTH]; display::HEIGHT]),
        }
    }

    /// Will clear the display
    pub fn clear(&mut self) {
        for row in self.pixels.iter_mut() {
            for pixel in row.iter_mut() {
                *pixel = false;
            }
        }
    }

    /// Draws the sprite with its top left corner at `(x, y)`, the start coordinates wrap
    /// around the display. Every sprite byte is one row of `8` pixels, the most significant
    /// bit being the left most one. The pixels are xored onto the display.
    ///
    /// Returns if any pixel was turned off, which is the collision flag.
    pub fn draw(&mut self, x: usize, y: usize, sprite: &[u8], edge: SpriteEdge) -> bool {
        let coorx = x % display::WIDTH;
        let coory = y % display::HEIGHT;

        let mut collision = false;

        for (i, row) in sprite.iter().enumerate() {
            let y = match (coory + i, edge) {
                (y, _) if y < display::HEIGHT => y,
                (y, SpriteEdge::Wrap) => y % display::HEIGHT,
                (_, SpriteEdge::Clip) => break,
            };

            for j in 0..display::SPRITE_WIDTH {
                let mask = 0x80 >> j;
                if *row & mask == 0 {
                    continue;
                }

                let x = match (coorx + j, edge) {
                    (x, _) if x < display::WIDTH => x,
                    (x, SpriteEdge::Wrap) => x % display::WIDTH,
                    (_, SpriteEdge::Clip) => break,
                };

                let spixel = self.pixels[y][x];
                self.pixels[y][x] = !spixel;
                collision |= spixel;
            }
        }

        collision
    }

    /// The state of the pixel in column `x` and row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Result<bool, DeviceError> {
        self.pixels
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .ok_or(DeviceError::PixelOutOfRange { x, y })
    }

    /// All rows from top to bottom.
    pub fn rows(&self) -> &[Row] {
        &self.pixels[..]
    }
}

/// Input is done with a hex keyboard that has 16 keys ranging `0-F`. The `8`, `4`, `6`, and
/// `2` keys are typically used for directional input. Three opcodes are used to detect input.
/// One skips an instruction if a specific key is pressed, while another does the same if a
/// specific key is not pressed. The third waits for a key press, and then stores it in one of
/// the data registers.
///
/// Next to the state of the keys the last key that went from released to pressed is kept,
/// until it gets consumed by the waiting opcode.
#[derive(Default, Debug, Clone)]
pub struct Keypad {
    keys: [bool; keyboard::SIZE],
    pressed: Option<usize>,
}

impl Keypad {
    pub fn new() -> Self {
        Keypad::default()
    }

    /// Releases all keys and forgets any pending press.
    pub fn reset(&mut self) {
        self.keys = [false; keyboard::SIZE];
        self.pressed = None;
    }

    pub fn set_key(&mut self, key: usize, to: bool) -> Result<(), DeviceError> {
        if key >= keyboard::SIZE {
            return Err(DeviceError::KeyOutOfRange(key));
        }
        self.update(key, to);
        Ok(())
    }

    /// Overwrites the whole keyboard state at once.
    pub fn set_keys(&mut self, keys: &[bool; keyboard::SIZE]) {
        for (key, to) in keys.iter().enumerate() {
            self.update(key, *to);
        }
    }

    fn update(&mut self, key: usize, to: bool) {
        if to && !self.keys[key] {
            self.pressed = Some(key);
        }
        self.keys[key] = to;
    }

    pub fn is_pressed(&self, key: usize) -> Result<bool, DeviceError> {
        self.keys
            .get(key)
            .copied()
            .ok_or(DeviceError::KeyOutOfRange(key))
    }

    /// The key is taken from a register, only the lower nibble is used.
    pub(crate) fn is_pressed_wrapping(&self, key: u8) -> bool {
        self.keys[key as usize % keyboard::SIZE]
    }

    /// Consumes the last key press.
    pub fn take_press(&mut self) -> Option<usize> {
        self.pressed.take()
    }

    /// Forgets the last key press, without touching the key states.
    pub fn clear_press(&mut self) {
        self.pressed = None;
    }

    pub fn get_keys(&self) -> &[bool; keyboard::SIZE] {
        &self.keys
    }
}
