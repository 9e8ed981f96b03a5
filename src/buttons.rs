//! Button press tracking
//!
//! Raw press bits are sampled once per fast tick. Edges update the pressed
//! mask, every held button counts up, and the hold duration classifies the
//! press on release. The button layer paints pressed pixels directly, taking
//! priority over light units until the release.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::PixelSink;
use crate::color::{OFF, RainbowCursor, Rgb, rgb_from_u32};
use crate::grid::{GRID_SIZE, PixelMask, contains_pixel, pixel_bit, pixels_of};
use crate::pixel_cache::PixelCache;

/// Colors of pressed buttons
#[derive(Debug, Clone, Copy)]
pub struct ButtonColors {
    /// Held, but not long enough to count as a press
    pub waiting: Rgb,
    /// Held past the long press threshold
    pub long_press: Rgb,
    /// Held past the stuck threshold
    pub stuck: Rgb,
}

impl Default for ButtonColors {
    fn default() -> Self {
        Self {
            waiting: rgb_from_u32(0x00_0010),
            long_press: rgb_from_u32(0xFF_00FF),
            stuck: rgb_from_u32(0xFF_0000),
        }
    }
}

/// Configuration for the debouncer
///
/// Thresholds are counted in fast ticks and must satisfy
/// `min_press < long_press < max_press`.
#[derive(Debug, Clone, Copy)]
pub struct DebounceConfig {
    pub min_press: u32,
    pub long_press: u32,
    pub max_press: u32,
    pub colors: ButtonColors,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            min_press: 2,
            long_press: 25,
            max_press: 500,
            colors: ButtonColors::default(),
        }
    }
}

/// Grid-wide press bookkeeping
#[derive(Debug, Clone)]
pub struct ButtonsState {
    /// Buttons currently held down
    pub pressed: PixelMask,
    /// Buttons pressed or released since the last fast tick
    pub changed_state: PixelMask,
    /// Hold duration of every button, in fast ticks
    pub pressed_counter: [u32; GRID_SIZE],
    /// Released after at least `min_press` ticks
    pub pending_press: PixelMask,
    /// Released after at least `long_press` ticks
    pub pending_long_press: PixelMask,
    /// Held for `max_press` ticks or more
    pub aborted: PixelMask,
}

impl Default for ButtonsState {
    fn default() -> Self {
        Self {
            pressed: 0,
            changed_state: 0,
            pressed_counter: [0; GRID_SIZE],
            pending_press: 0,
            pending_long_press: 0,
            aborted: 0,
        }
    }
}

impl ButtonsState {
    /// Pixels owned by the button layer
    pub const fn reserved(&self) -> PixelMask {
        self.pressed | self.aborted
    }

    /// Pending events in their published form
    pub const fn events(&self) -> ButtonEvents {
        ButtonEvents {
            short: self.pending_press ^ self.pending_long_press,
            long: self.pending_long_press,
            aborted: self.aborted,
        }
    }

    /// Forget events that were delivered
    ///
    /// Clearing an aborted bit is what lets a stuck button be used again.
    pub fn acknowledge(&mut self, events: ButtonEvents) {
        self.pending_press &= !(events.short | events.long);
        self.pending_long_press &= !events.long;
        self.aborted &= !events.aborted;
    }
}

/// Button events waiting to be published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonEvents {
    /// Short presses
    pub short: PixelMask,
    /// Long presses
    pub long: PixelMask,
    /// Presses aborted for being held too long
    pub aborted: PixelMask,
}

impl ButtonEvents {
    pub const fn is_empty(&self) -> bool {
        self.short == 0 && self.long == 0 && self.aborted == 0
    }
}

/// Press classification by hold duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldStage {
    /// Not held long enough to be a press yet
    Waiting,
    /// Would be a short press if released now
    Short,
    /// Would be a long press if released now
    Long,
    /// Held too long, the press is aborted
    Stuck,
}

/// Turns raw press bits into classified press events
#[derive(Debug)]
pub struct ButtonDebouncer {
    config: DebounceConfig,
    state: ButtonsState,
    last_sample: PixelMask,
}

impl ButtonDebouncer {
    pub fn new(config: &DebounceConfig) -> Self {
        Self {
            config: *config,
            state: ButtonsState::default(),
            last_sample: 0,
        }
    }

    pub const fn state(&self) -> &ButtonsState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ButtonsState {
        &mut self.state
    }

    /// Classify a hold counter
    pub const fn stage(&self, counter: u32) -> HoldStage {
        if counter < self.config.min_press {
            HoldStage::Waiting
        } else if counter < self.config.long_press {
            HoldStage::Short
        } else if counter < self.config.max_press {
            HoldStage::Long
        } else {
            HoldStage::Stuck
        }
    }

    /// Feed the raw press bits read from the hardware
    ///
    /// Only edges matter: a button demoted as stuck stays out of the
    /// pressed mask until it is released and pressed again.
    pub fn sample(&mut self, raw: PixelMask) {
        let went_down = raw & !self.last_sample;
        let went_up = !raw & self.last_sample;
        self.last_sample = raw;

        self.state.pressed = (self.state.pressed | went_down) & !went_up;
        self.state.changed_state |= went_down | went_up;
    }

    /// Render held buttons and settle released ones
    pub fn process<S: PixelSink>(
        &mut self,
        sink: &mut S,
        cache: &mut PixelCache,
        rainbow: &mut RainbowCursor,
    ) {
        if self.state.pressed == 0 && self.state.changed_state == 0 {
            return;
        }

        self.render_pressed(sink, rainbow);
        let released = self.render_released(sink, cache);
        sink.flush();

        if self.state.changed_state != 0 {
            self.settle(released);
        }
    }

    fn render_pressed<S: PixelSink>(&mut self, sink: &mut S, rainbow: &mut RainbowCursor) {
        if self.state.pressed == 0 {
            return;
        }

        let highlight = rainbow.next_color();
        let colors = self.config.colors;
        for index in pixels_of(self.state.pressed) {
            let counter = &mut self.state.pressed_counter[index];
            *counter = counter.saturating_add(1);

            let color = match self.stage(self.state.pressed_counter[index]) {
                HoldStage::Waiting => colors.waiting,
                HoldStage::Short => highlight,
                HoldStage::Long => colors.long_press,
                HoldStage::Stuck => {
                    #[cfg(feature = "esp32-log")]
                    println!("[ButtonDebouncer] warning: button {} is stuck", index + 1);

                    let bit = pixel_bit(index);
                    self.state.pressed &= !bit;
                    self.state.pending_press &= !bit;
                    self.state.pending_long_press &= !bit;
                    self.state.aborted |= bit;
                    colors.stuck
                }
            };
            sink.set_pixel(index, color);
        }
    }

    /// Turn off released buttons, returning them as a mask
    fn render_released<S: PixelSink>(&self, sink: &mut S, cache: &mut PixelCache) -> PixelMask {
        let released = self.state.changed_state & !self.state.pressed & !self.state.aborted;
        for index in pixels_of(released) {
            sink.set_pixel(index, OFF);
            cache.mark_dirty(index);

            #[cfg(feature = "esp32-log")]
            println!(
                "[ButtonDebouncer] button {:02} released after {:3} ticks",
                index + 1,
                self.state.pressed_counter[index]
            );
        }
        released
    }

    /// Turn released buttons into pending events
    fn settle(&mut self, released: PixelMask) {
        for index in pixels_of(released) {
            if contains_pixel(self.state.aborted, index) {
                continue;
            }
            match self.stage(self.state.pressed_counter[index]) {
                HoldStage::Waiting => {}
                HoldStage::Short => {
                    self.state.pending_press |= pixel_bit(index);
                }
                HoldStage::Long | HoldStage::Stuck => {
                    self.state.pending_press |= pixel_bit(index);
                    self.state.pending_long_press |= pixel_bit(index);
                }
            }
        }

        self.state.changed_state = 0;

        // Clean slate for the next press sequence
        if self.state.pressed == 0 {
            self.state.pressed_counter = [0; GRID_SIZE];
        }
    }
}
