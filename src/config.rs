//! The behaviour switches of the chipset.
//!
//! Different rom collections assume different interpreters, so the
//! ambiguous parts of the instruction set are configurable here.
use crate::definitions::cpu;

/// How sprites that cross the border of the display are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteEdge {
    /// Pixels outside of the display are dropped.
    Clip,
    /// Pixels outside of the display continue on the opposite side.
    Wrap,
}

impl Default for SpriteEdge {
    fn default() -> Self {
        SpriteEdge::Clip
    }
}

/// What happens when an opcode is fetched that is not part of the instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownOpcode {
    /// A warning is logged and the opcode is stepped over.
    Skip,
    /// The step fails with [`OpcodeError::InvalidOpcode`](crate::OpcodeError::InvalidOpcode).
    Fail,
}

impl Default for UnknownOpcode {
    fn default() -> Self {
        UnknownOpcode::Skip
    }
}

/// The configuration of a [`ChipSet`](crate::chip8::ChipSet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// The amount of cycles the host runs per second, the timers are paced against it.
    pub cpu_hertz: u32,
    /// How `DXYN` treats sprites crossing the display border.
    pub sprite_edge: SpriteEdge,
    /// How opcodes outside of the instruction set are handled.
    pub unknown_opcode: UnknownOpcode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cpu_hertz: cpu::HERTZ,
            sprite_edge: SpriteEdge::default(),
            unknown_opcode: UnknownOpcode::default(),
        }
    }
}

impl Config {
    pub fn with_cpu_hertz(mut self, cpu_hertz: u32) -> Self {
        self.cpu_hertz = cpu_hertz;
        self
    }

    pub fn with_sprite_edge(mut self, sprite_edge: SpriteEdge) -> Self {
        self.sprite_edge = sprite_edge;
        self
    }

    pub fn with_unknown_opcode(mut self, unknown_opcode: UnknownOpcode) -> Self {
        self.unknown_opcode = unknown_opcode;
        self
    }

    /// The amount of cycles a host has to run per frame to keep the configured rate.
    /// Is at least one.
    ///
    /// # Example
    /// ```rust
    /// # use chip::config::Config;
    /// assert_eq!(Config::default().cycles_per_frame(60), 10);
    /// assert_eq!(Config::default().with_cpu_hertz(500).cycles_per_frame(60), 8);
    /// ```
    pub fn cycles_per_frame(&self, frame_hertz: u32) -> u32 {
        (self.cpu_hertz / frame_hertz.max(1)).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cpu_hertz, cpu::HERTZ);
        assert_eq!(config.sprite_edge, SpriteEdge::Clip);
        assert_eq!(config.unknown_opcode, UnknownOpcode::Skip);
    }

    #[test]
    fn test_builders() {
        let config = Config::default()
            .with_cpu_hertz(0)
            .with_sprite_edge(SpriteEdge::Wrap)
            .with_unknown_opcode(UnknownOpcode::Fail);
        assert_eq!(config.cpu_hertz, 0);
        assert_eq!(config.sprite_edge, SpriteEdge::Wrap);
        assert_eq!(config.unknown_opcode, UnknownOpcode::Fail);
        assert_eq!(config.cycles_per_frame(60), 1);
    }
}
