use crate::{
    chip8::ChipSet,
    devices::{DisplayCommands, KeyboardCommands},
    opcode::Operation,
    ProcessError,
};

/// Runs a single frame worth of cycles.
///
/// The keyboard is read once before the cycles run and the display is only
/// handed the frame buffer, if one of the cycles changed it. The host is
/// responsible for calling this at its frame rate, see
/// [`Config::cycles_per_frame`](crate::config::Config::cycles_per_frame).
///
/// Returns the operation of the last cycle, so the host knows if the chip is
/// waiting for a key press.
pub fn run_frame<D, K>(
    chip: &mut ChipSet,
    display: &mut D,
    keyboard: &K,
    cycles: u32,
) -> Result<Operation, ProcessError>
where
    D: DisplayCommands,
    K: KeyboardCommands,
{
    chip.set_keyboard(&keyboard.get_keyboard());

    let mut last_op = Operation::None;
    let mut redraw = false;

    for _ in 0..cycles {
        last_op = chip.step()?;
        if matches!(last_op, Operation::Draw) {
            redraw = true;
        }
    }

    if redraw {
        /* draw the screen */
        display.display(chip.get_display());
    }

    Ok(last_op)
}
