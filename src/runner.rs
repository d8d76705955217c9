use crate::{
    chip8::ChipSet,
    devices::{DisplayCommands, KeyboardCommands, SoundCommands},
    error::{LoadError, ProcessError},
    resources::Rom,
};

/// The host-side glue around the chipset.
///
/// The host owns the periodic tick source, whatever drives it (a timer
/// thread, a frame callback, a plain loop with sleeps) calls
/// [`tick`](Runner::tick) once per instruction step and the runner fans the
/// step output out to the collaborators.
pub struct Runner<D, S, K>
where
    D: DisplayCommands,
    S: SoundCommands,
    K: KeyboardCommands,
{
    chip: ChipSet,
    display: D,
    sound: S,
    keyboard: K,
}

impl<D, S, K> Runner<D, S, K>
where
    D: DisplayCommands,
    S: SoundCommands,
    K: KeyboardCommands,
{
    /// will create a runner with a freshly loaded chipset
    pub fn new(rom: &Rom, display: D, sound: S, keyboard: K) -> Result<Self, LoadError> {
        Ok(Self {
            chip: ChipSet::new(rom)?,
            display,
            sound,
            keyboard,
        })
    }

    /// will run a single instruction step and dispatch its output
    pub fn tick(&mut self) -> Result<(), ProcessError> {
        // the keypad snapshot is taken between steps, never during one
        self.chip.set_keyboard(&self.keyboard.keys());

        let output = self.chip.step()?;

        if output.clear {
            self.display.clear();
        }
        if output.render {
            self.display.draw(self.chip.display());
        }
        if output.beep {
            self.sound.beep();
        }
        Ok(())
    }

    /// access to the wrapped chipset, for introspection tooling
    pub fn chip(&self) -> &ChipSet {
        &self.chip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        definitions::keyboard,
        devices::{MockDisplayCommands, MockKeyboardCommands, MockSoundCommands},
        error::ProcessError,
    };

    fn keyboard_with(pressed: &[usize]) -> MockKeyboardCommands {
        let mut keys = [false; keyboard::SIZE];
        for &key in pressed {
            keys[key] = true;
        }
        let mut keyboard = MockKeyboardCommands::new();
        keyboard.expect_keys().returning(move || keys);
        keyboard
    }

    #[test]
    /// the clear signal reaches the display collaborator exactly once
    fn test_tick_dispatches_clear() {
        let rom = Rom::new("clear", &[0x00, 0xE0, 0x12, 0x02][..]);

        let mut display = MockDisplayCommands::new();
        display.expect_clear().times(1).return_const(());

        let mut runner = Runner::new(&rom, display, MockSoundCommands::new(), keyboard_with(&[]))
            .expect("The test rom has to fit into program memory.");

        // the clear opcode, then the jump which touches nothing
        assert!(runner.tick().is_ok());
        assert!(runner.tick().is_ok());
    }

    #[test]
    /// a draw step hands the pixel snapshot to the display collaborator
    fn test_tick_dispatches_draw() {
        // V0 = 5, I = 0, draw the glyph under I at (V0, V0)
        let rom = Rom::new("draw", &[0x60, 0x05, 0xA0, 0x00, 0xD0, 0x05][..]);

        let mut display = MockDisplayCommands::new();
        display
            .expect_draw()
            .withf(|pixels| pixels[5][5])
            .times(1)
            .return_const(());

        let mut runner = Runner::new(&rom, display, MockSoundCommands::new(), keyboard_with(&[]))
            .expect("The test rom has to fit into program memory.");

        for _ in 0..3 {
            assert!(runner.tick().is_ok());
        }
    }

    #[test]
    /// the tone plays on the last audible timer tick and only there
    fn test_tick_dispatches_beep() {
        // V0 = 3, sound = V0, then loop in place
        let rom = Rom::new("beep", &[0x60, 0x03, 0xF0, 0x18, 0x12, 0x04][..]);

        let mut sound = MockSoundCommands::new();
        sound.expect_beep().times(1).return_const(());

        let mut runner = Runner::new(&rom, MockDisplayCommands::new(), sound, keyboard_with(&[]))
            .expect("The test rom has to fit into program memory.");

        for _ in 0..6 {
            assert!(runner.tick().is_ok());
        }
    }

    #[test]
    /// the keypad snapshot is fed into the chipset before the step
    fn test_tick_feeds_the_keypad() {
        // wait for a key, store it in V3
        let rom = Rom::new("wait", &[0xF3, 0x0A][..]);

        let mut runner = Runner::new(
            &rom,
            MockDisplayCommands::new(),
            MockSoundCommands::new(),
            keyboard_with(&[0xB]),
        )
        .expect("The test rom has to fit into program memory.");

        assert!(runner.tick().is_ok());
        assert_eq!(runner.chip().registers()[0x3], 0xB);
    }

    #[test]
    /// a fatal condition inside the step surfaces unchanged
    fn test_tick_propagates_errors() {
        let rom = Rom::new("invalid", &[0x00, 0xEA][..]);

        let mut runner = Runner::new(
            &rom,
            MockDisplayCommands::new(),
            MockSoundCommands::new(),
            keyboard_with(&[]),
        )
        .expect("The test rom has to fit into program memory.");

        assert_eq!(
            runner.tick(),
            Err(ProcessError::UnknownOpcode {
                address: crate::definitions::cpu::PROGRAM_COUNTER,
                opcode: 0x00EA,
            })
        );
    }
}
