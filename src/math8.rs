/// Dim an 8-bit value by a factor (0-255), truncating.
///
/// Unlike `FastLED`'s `scale8` this does not compensate for the
/// missing 256th step, so `dim8(255, 255) == 254`.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn dim8(value: u8, scale: u8) -> u8 {
    ((value as u16 * scale as u16) >> 8) as u8
}

/// Triangle-wave oscillator stepping between two bounds
///
/// Each step moves the level by `increment`. When the next step would
/// cross a bound, the level stays put and the direction flips instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Oscillator8 {
    pub rising: bool,
    pub level: u8,
}

impl Oscillator8 {
    /// Advance the oscillator and return the new level
    pub fn step(&mut self, low: u8, high: u8, increment: u8) -> u8 {
        if self.rising {
            if self.level >= high.saturating_sub(increment) {
                self.rising = false;
            } else {
                self.level += increment;
            }
        } else if self.level <= low.saturating_add(increment) {
            self.rising = true;
        } else {
            self.level -= increment;
        }
        self.level
    }
}
