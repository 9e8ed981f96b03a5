//! Rainbow color wheel
//!
//! The wheel walks red -> green -> blue -> red over 256 positions.
//! [`RainbowCursor`] is the rotating position shared by everything that
//! wants "the next rainbow color", so pressed buttons and rainbow light
//! units drift through the hues together.

use crate::color::Rgb;

/// Hue advance of the cursor per drawn color
pub const RAINBOW_STEP: u8 = 9;

/// Get the wheel color at `position`
pub const fn wheel(position: u8) -> Rgb {
    if position < 85 {
        Rgb {
            r: position * 3,
            g: 255 - position * 3,
            b: 0,
        }
    } else if position < 170 {
        let position = position - 85;
        Rgb {
            r: 255 - position * 3,
            g: 0,
            b: position * 3,
        }
    } else {
        let position = position - 170;
        Rgb {
            r: 0,
            g: position * 3,
            b: 255 - position * 3,
        }
    }
}

/// Rotating position on the rainbow wheel
#[derive(Debug, Clone, Default)]
pub struct RainbowCursor {
    position: u8,
}

impl RainbowCursor {
    pub const fn new() -> Self {
        Self { position: 0 }
    }

    /// Advance the cursor and return the color under it
    pub fn next_color(&mut self) -> Rgb {
        self.position = self.position.wrapping_add(RAINBOW_STEP);
        wheel(self.position)
    }

    /// Current cursor position
    pub const fn position(&self) -> u8 {
        self.position
    }
}
