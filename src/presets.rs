//! Built-in animations
//!
//! Presets are plain light units stored under ids reserved just below the
//! anonymous range, so protocol-addressed units never collide with them.

use crate::color::{Rgb, rgb_from_u32};
use crate::grid::{ALL_PIXELS, GRID_SIZE, pixel_bit};
use crate::unit::{LightUnit, LightUnitAnimation, LightUnitId, MIN_DYNAMIC_ID};

/// Id of the flashlight unit
pub const FLASHLIGHT_ID: LightUnitId = MIN_DYNAMIC_ID - 1;

/// Id of the low battery indicator
pub const LOW_BATTERY_ID: LightUnitId = MIN_DYNAMIC_ID - 2;

const WHITE: Rgb = rgb_from_u32(0xFF_FFFF);
const DIM_RED: Rgb = rgb_from_u32(0x2B_0000);

/// Render ticks a flash lasts (10 seconds)
const FLASH_EXPIRATION: u64 = 100;
/// Render ticks between blinks (half a second)
const BLINK_SPEED: u32 = 5;
/// Render ticks the low battery indicator stays up (one minute)
const LOW_BATTERY_EXPIRATION: u64 = 600;

/// Built-in animation requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Flashlight(Flashlight),
    StopFlashlight,
    LowBattery,
}

/// Whole-grid light
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flashlight {
    /// Render ticks until it turns off (0 => never)
    pub expiration: u64,
    pub color: Rgb,
    pub pulse: bool,
    pub blink: bool,
}

impl Default for Flashlight {
    fn default() -> Self {
        Self {
            expiration: 0,
            color: WHITE,
            pulse: false,
            blink: false,
        }
    }
}

impl Flashlight {
    /// Get one of the numbered flashlight variants (1-4)
    pub fn variant(number: u8) -> Option<Self> {
        let base = Self::default();
        Some(match number {
            1 => base,
            2 => Self {
                pulse: true,
                ..base
            },
            3 => Self {
                blink: true,
                ..base
            },
            4 => Self {
                expiration: FLASH_EXPIRATION,
                ..base
            },
            _ => return None,
        })
    }

    pub fn to_unit(self) -> LightUnit {
        LightUnit::new(ALL_PIXELS, self.color).with_animation(LightUnitAnimation {
            expiration: self.expiration,
            pulse: self.pulse,
            blink: self.blink,
            speed: if self.blink { BLINK_SPEED } else { 1 },
            ..LightUnitAnimation::default()
        })
    }
}

/// Dim red blinking light on the last pixel
pub fn low_battery_unit() -> LightUnit {
    LightUnit::new(pixel_bit(GRID_SIZE - 1), DIM_RED).with_animation(LightUnitAnimation {
        expiration: LOW_BATTERY_EXPIRATION,
        blink: true,
        speed: BLINK_SPEED,
        ..LightUnitAnimation::default()
    })
}
