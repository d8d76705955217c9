//! The two 8-bit countdown timers of the machine.
//!
//! Both counters run at the instruction cadence: the engine ticks them
//! exactly once per step, before decode. The 60 Hz presentation rate is a
//! host concern (see [`definitions::timer`](crate::definitions::timer)),
//! the core itself owns no clock and spawns no threads.

/// The delay and sound countdown pair.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    /// Intended for timing the events of games, its value can be set
    /// and read by the program.
    delay: u8,
    /// While nonzero a beeping sound is expected from the host.
    sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Will decrement both counters by one, saturating at zero.
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// True exactly on the tick where the sound timer landed on one, the
    /// last still audible tick before silence. The host is responsible for
    /// not re-triggering playback while a tone is already sounding.
    pub fn beep(&self) -> bool {
        self.sound == 1
    }

    pub fn delay(&self) -> u8 {
        self.delay
    }

    pub fn sound(&self) -> u8 {
        self.sound
    }

    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }

    /// Will zero both counters, used on load.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
