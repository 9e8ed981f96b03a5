//! Light unit animation engine
//!
//! Once per render tick the engine walks the store (highest id first), ages
//! every unit, decides whether it fires this tick and paints the fired ones
//! through the [`Canvas`]. Expired units are handed to the store for removal,
//! which renders their terminal pass.

use crate::PixelSink;
use crate::canvas::Canvas;
use crate::color::{OFF, Rgb, rgb_from_u32, scale_color};
use crate::grid::{ALL_PIXELS, pixels_of};
use crate::random::RandomSource;
use crate::store::LightUnitStore;
use crate::unit::{LightUnit, LightUnitId};

/// Lower bound of the pulse brightness ramp
const PULSE_LOW: u8 = 2;
/// Upper bound of the pulse brightness ramp
const PULSE_HIGH: u8 = 250;
/// Pulse brightness change per frame
const PULSE_INCREMENT: u8 = 12;

/// Random pixel subsets go dark on every n-th frame
const FLICKER_PERIOD: u64 = 3;

/// Color of a unit for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameColor {
    /// Same color for every pixel
    Solid(Rgb),
    /// Resolved for each pixel while painting
    PerPixel,
}

/// Drives light units forward, one render tick at a time
#[derive(Debug, Default)]
pub struct AnimationEngine {
    render_tick: u32,
}

impl AnimationEngine {
    pub const fn new() -> Self {
        Self { render_tick: 0 }
    }

    /// Number of completed render ticks
    pub const fn render_tick(&self) -> u32 {
        self.render_tick
    }

    /// Evaluate every unit once and flush if any pixel changed
    pub fn tick<S: PixelSink, R: RandomSource, const N: usize>(
        &mut self,
        store: &mut LightUnitStore<N>,
        canvas: &mut Canvas<'_, S, R>,
    ) {
        let version = canvas.cache.version();

        let mut cursor = store.first();
        while let Some(id) = cursor {
            self.evaluate(id, store, canvas);
            cursor = store.next(id);
        }

        if version != canvas.cache.version() {
            canvas.sink.flush();
        }
        self.render_tick = self.render_tick.wrapping_add(1);
    }

    fn evaluate<S: PixelSink, R: RandomSource, const N: usize>(
        &self,
        id: LightUnitId,
        store: &mut LightUnitStore<N>,
        canvas: &mut Canvas<'_, S, R>,
    ) {
        let Some(depends_on) = store.get(id).map(|unit| unit.animation.depends_on) else {
            return;
        };
        let orphaned = depends_on != 0 && !store.contains(depends_on);
        let Some(unit) = store.get_mut(id) else {
            return;
        };

        unit.state.age = unit.state.age.wrapping_add(1);
        let expiration = unit.animation.expiration;
        let expired = (expiration > 0 && unit.state.age >= expiration) || orphaned;

        if !self.fires(unit, expired) {
            return;
        }

        if let Some(on_iterate) = unit.on_iterate {
            on_iterate(unit);
            // The store is ordered by id
            unit.id = id;
        }
        unit.state.iterated = true;

        if expired {
            store.remove(id, canvas);
        } else {
            render_unit(unit, false, canvas);
        }
    }

    /// Returns true if the unit renders on the current tick
    ///
    /// A unit on step 0 with `speed > 1` renders right away on its first
    /// evaluation instead of waiting for the tick counter to line up.
    fn fires(&self, unit: &LightUnit, expired: bool) -> bool {
        let animation = &unit.animation;
        let speed = animation.speed.max(1);
        let frames = animation.frames.max(1);

        expired
            || (!unit.state.iterated && animation.step == 0 && speed > 1)
            || (self.render_tick % speed == 0 && self.render_tick % frames == animation.step)
    }
}

/// Paint one frame of a unit
///
/// With `expired` this is the terminal pass: pixels are turned off unless the
/// unit keeps them when done.
pub(crate) fn render_unit<S: PixelSink, R: RandomSource>(
    unit: &mut LightUnit,
    expired: bool,
    canvas: &mut Canvas<'_, S, R>,
) {
    let animation = unit.animation;
    let brightness = unit.brightness_scale();
    let state = &mut unit.state;
    let finishing = expired && !animation.keep_pixel_when_done;

    let mut color = if finishing {
        FrameColor::Solid(OFF)
    } else if animation.random_color {
        FrameColor::PerPixel
    } else if animation.rainbow_color {
        FrameColor::Solid(canvas.rainbow.next_color())
    } else if animation.same_random_color {
        FrameColor::Solid(random_color(&mut *canvas.rng))
    } else {
        FrameColor::Solid(unit.color)
    };

    let blinked_off = animation.blink && {
        state.temp_counter = state.temp_counter.wrapping_add(1);
        state.temp_counter % 2 == 0
    };
    if blinked_off {
        color = FrameColor::Solid(OFF);
    } else {
        let scale = if animation.pulse {
            state.pulse.step(PULSE_LOW, PULSE_HIGH, PULSE_INCREMENT)
        } else {
            brightness
        };
        if let FrameColor::Solid(solid) = color {
            color = FrameColor::Solid(scale_color(solid, scale));
        }
    }

    let pixels = if !animation.random_pixels {
        unit.pixel_mask
    } else if finishing {
        ALL_PIXELS
    } else {
        // Each draw is folded into the accumulator, so the subset evolves
        // instead of jumping around
        let pixels = u64::from(canvas.rng.random31()) ^ state.temp_pixels.wrapping_mul(2);
        state.temp_pixels = state.temp_pixels.wrapping_mul(1 << 32) ^ pixels;

        if !animation.blink {
            state.temp_counter = state.temp_counter.wrapping_add(1);
        }
        if state.temp_counter % FLICKER_PERIOD == 0 {
            color = FrameColor::Solid(OFF);
        }
        pixels
    };

    for index in pixels_of(pixels) {
        let pixel_color = match color {
            FrameColor::Solid(solid) => solid,
            FrameColor::PerPixel if animation.rainbow_color => canvas.rainbow.next_color(),
            FrameColor::PerPixel => random_color(&mut *canvas.rng),
        };
        canvas.put_pixel(index, pixel_color);
    }
}

/// Random non-black 24-bit color
fn random_color<R: RandomSource>(rng: &mut R) -> Rgb {
    rgb_from_u32(rng.random_range(1, 0x00ff_ffff))
}
