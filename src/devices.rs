//! The keypad state and the collaborator seams of the core.
//!
//! Rendering, audio playback and key capture live on the host side, the
//! chipset only ever talks to them through the traits below.

use crate::definitions::{
    display::{HEIGHT, WIDTH},
    keyboard,
};

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for the display based code
pub trait DisplayCommands {
    /// Will clear the presentation surface
    fn clear(&mut self);
    /// Will present the given pixel snapshot
    fn draw<'a>(&'a mut self, pixels: &'a [[bool; WIDTH]; HEIGHT]);
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for the audio playback
pub trait SoundCommands {
    /// Will play the single fixed tone. Called on the last audible timer
    /// tick, the implementation has to suppress re-triggering while a tone
    /// is already sounding.
    fn beep(&mut self);
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for reading the keyboard data
pub trait KeyboardCommands {
    /// Will return the current key snapshot, one flag per hex key
    fn keys(&self) -> [bool; keyboard::SIZE];
}

/// The internal keypad snapshot.
///
/// Input is done with a hex keyboard that has 16 keys ranging `0-F`. The
/// input collaborator writes this state between steps, the chipset itself
/// only reads it.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; keyboard::SIZE],
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard::default()
    }

    /// Will set the state of a single key, out of range indices are ignored
    pub fn set_key(&mut self, key: usize, to: bool) {
        if let Some(state) = self.keys.get_mut(key) {
            *state = to;
        }
    }

    /// Will replace the whole snapshot
    pub fn set_keys(&mut self, keys: &[bool; keyboard::SIZE]) {
        self.keys = *keys;
    }

    /// Whether the given key is currently down. Indices beyond the pad are
    /// never down, a key that can not exist can not be pressed.
    pub fn is_pressed(&self, key: usize) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }

    /// Will return the lowest key index that is currently down, this is
    /// what the key wait opcode stores.
    pub fn first_pressed(&self) -> Option<usize> {
        self.keys.iter().position(|key| *key)
    }

    pub fn keys(&self) -> &[bool; keyboard::SIZE] {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_read_keys() {
        let mut keyboard = Keyboard::new();
        assert_eq!(keyboard.first_pressed(), None);

        keyboard.set_key(0xA, true);
        assert!(keyboard.is_pressed(0xA));
        assert_eq!(keyboard.first_pressed(), Some(0xA));

        keyboard.set_key(0x2, true);
        assert_eq!(keyboard.first_pressed(), Some(0x2));

        keyboard.set_key(0x2, false);
        assert_eq!(keyboard.first_pressed(), Some(0xA));
    }

    #[test]
    fn test_out_of_range_keys_are_never_down() {
        let mut keyboard = Keyboard::new();
        keyboard.set_key(0x20, true);
        assert!(!keyboard.is_pressed(0x20));
        assert_eq!(keyboard.first_pressed(), None);
    }

    #[test]
    fn test_snapshot_replacement() {
        let mut keyboard = Keyboard::new();
        let mut snapshot = [false; keyboard::SIZE];
        snapshot[0x5] = true;

        keyboard.set_keys(&snapshot);
        assert_eq!(keyboard.keys(), &snapshot);
    }
}
