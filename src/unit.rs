//! Light unit entities
//!
//! A light unit is an independently scheduled effect over a subset of the
//! grid pixels. The definition (`pixel_mask`, `color`, `brightness`,
//! `animation`, callbacks) is immutable once stored; `state` is owned by the
//! animation engine and reset whenever the unit is (re)installed.

use crate::color::{OFF, Rgb};
use crate::grid::PixelMask;
use crate::math8::Oscillator8;

/// Light unit identifier. `0` is reserved.
pub type LightUnitId = u32;

/// Ids above this value are handed out to anonymous units
pub const MIN_DYNAMIC_ID: LightUnitId = 512;

/// Upper (exclusive) bound of anonymous ids
pub const MAX_DYNAMIC_ID: LightUnitId = 0x0fff_ffff;

/// Called right before a unit fires, may mutate the unit.
///
/// Changes to `id` are discarded.
pub type IterateCallback = fn(&mut LightUnit);

/// Called once after a unit has been removed
pub type DoneCallback = fn(&LightUnit);

/// Animation parameters of a light unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct LightUnitAnimation {
    /// Length of the cycle this unit is part of
    pub frames: u32,
    /// Frame index within the cycle at which the unit fires
    pub step: u32,
    /// Render ticks between frames. Forced to 1 for pulsing units
    pub speed: u32,
    /// Evaluations until the unit is removed (0 => never)
    pub expiration: u64,
    /// Unit expires once the unit with this id is gone (0 => none)
    pub depends_on: LightUnitId,
    /// Pick a new random pixel subset on every frame
    pub random_pixels: bool,
    /// One random color for the whole subset. Overridden by `random_color`
    pub same_random_color: bool,
    /// Random color per pixel. Overridden by `rainbow_color`
    pub random_color: bool,
    /// Next rainbow color (per pixel when combined with `random_color`)
    pub rainbow_color: bool,
    /// Leave pixels lit when the unit goes away
    pub keep_pixel_when_done: bool,
    /// Turn off on every other frame
    pub blink: bool,
    /// Oscillate brightness. Ignored with any random or rainbow color
    pub pulse: bool,
}

impl Default for LightUnitAnimation {
    fn default() -> Self {
        Self {
            frames: 1,
            step: 0,
            speed: 1,
            expiration: 0,
            depends_on: 0,
            random_pixels: false,
            same_random_color: false,
            random_color: false,
            rainbow_color: false,
            keep_pixel_when_done: false,
            blink: false,
            pulse: false,
        }
    }
}

impl LightUnitAnimation {
    /// Returns true if any color randomization flag is set
    pub const fn has_varying_color(&self) -> bool {
        self.rainbow_color || self.random_color || self.same_random_color
    }
}

/// Mutable per-unit bookkeeping of the animation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightUnitState {
    /// Has the unit fired at least once
    pub iterated: bool,
    /// Pulse brightness ramp
    pub pulse: Oscillator8,
    /// Number of evaluations survived
    pub age: u64,
    /// Random pixel accumulator
    pub temp_pixels: u64,
    /// Shared blink / flicker counter
    pub temp_counter: u64,
}

/// Animated effect over a subset of the grid
#[derive(Debug, Clone)]
pub struct LightUnit {
    pub id: LightUnitId,
    pub pixel_mask: PixelMask,
    pub color: Rgb,
    /// Color scale, read as its unsigned bit pattern (0 => unscaled)
    pub brightness: i8,
    pub animation: LightUnitAnimation,
    pub state: LightUnitState,
    pub on_iterate: Option<IterateCallback>,
    pub on_done: Option<DoneCallback>,
}

impl Default for LightUnit {
    fn default() -> Self {
        Self {
            id: 0,
            pixel_mask: 0,
            color: OFF,
            brightness: 0,
            animation: LightUnitAnimation::default(),
            state: LightUnitState::default(),
            on_iterate: None,
            on_done: None,
        }
    }
}

impl LightUnit {
    /// Create a unit lighting `pixel_mask` with `color`
    pub fn new(pixel_mask: PixelMask, color: Rgb) -> Self {
        Self {
            pixel_mask,
            color,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_brightness(mut self, brightness: i8) -> Self {
        self.brightness = brightness;
        self
    }

    #[must_use]
    pub fn with_animation(mut self, animation: LightUnitAnimation) -> Self {
        self.animation = animation;
        self
    }

    #[must_use]
    pub fn with_iterate_callback(mut self, callback: IterateCallback) -> Self {
        self.on_iterate = Some(callback);
        self
    }

    #[must_use]
    pub fn with_done_callback(mut self, callback: DoneCallback) -> Self {
        self.on_done = Some(callback);
        self
    }

    /// Brightness as an 8-bit scale factor
    #[allow(clippy::cast_sign_loss)]
    pub const fn brightness_scale(&self) -> u8 {
        self.brightness as u8
    }

    /// Apply the definition invariants and reset the state
    ///
    /// - color randomization disables pulse
    /// - `frames` is at least 1
    /// - `speed` is at least 1, and exactly 1 when pulsing
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let animation = &mut self.animation;
        if animation.has_varying_color() {
            animation.pulse = false;
        }
        if animation.frames == 0 {
            animation.frames = 1;
        }
        if animation.speed == 0 || animation.pulse {
            animation.speed = 1;
        }
        self.state = LightUnitState::default();
        self
    }

    /// Same as [`normalized`](Self::normalized), storing the unit under `id`
    #[must_use]
    pub fn normalized_with_id(mut self, id: LightUnitId) -> Self {
        self.id = id;
        self.normalized()
    }

    /// Compare definitions, ignoring the animation state
    pub fn equivalent(&self, other: &Self) -> bool {
        self.id == other.id
            && self.pixel_mask == other.pixel_mask
            && self.color == other.color
            && self.brightness == other.brightness
            && self.animation == other.animation
            && same_iterate_callback(self.on_iterate, other.on_iterate)
            && same_done_callback(self.on_done, other.on_done)
    }
}

fn same_iterate_callback(a: Option<IterateCallback>, b: Option<IterateCallback>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => core::ptr::fn_addr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn same_done_callback(a: Option<DoneCallback>, b: Option<DoneCallback>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => core::ptr::fn_addr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
