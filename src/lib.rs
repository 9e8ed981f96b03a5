#![no_std]

pub mod animation;
pub mod buttons;
pub mod canvas;
pub mod color;
pub mod command;
pub mod compositor;
pub mod grid;
pub mod math8;
pub mod pixel_cache;
pub mod presets;
pub mod queue;
pub mod random;
pub mod scheduler;
pub mod store;
pub mod unit;

pub use animation::AnimationEngine;
pub use buttons::{ButtonColors, ButtonDebouncer, ButtonEvents, ButtonsState, DebounceConfig};
pub use canvas::Canvas;
pub use command::{LightCommand, Op, SetCommand, UnitPatch};
pub use compositor::{Compositor, CompositorConfig};
pub use grid::{GRID_SIZE, PixelMask};
pub use pixel_cache::PixelCache;
pub use presets::{Flashlight, Preset};
pub use queue::{CommandQueue, CommandReceiver, CommandSender};
pub use random::{RandomSource, SplitMix64};
pub use scheduler::{TickResult, TickScheduler, TickTimings};
pub use store::{LightUnitStore, StoreError, UnitFinalizer};
pub use unit::{LightUnit, LightUnitAnimation, LightUnitId, LightUnitState};

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// Abstract pixel driver trait
///
/// Implement this trait to support different hardware platforms.
/// Writes may be buffered until `flush`.
pub trait PixelSink {
    /// Set the color of a single pixel
    fn set_pixel(&mut self, index: usize, color: Rgb);

    /// Push buffered writes to the hardware
    fn flush(&mut self);
}

/// Abstract button reader trait
pub trait ButtonInput {
    /// Read the raw pressed state of every button, bit `i` is button `i`
    fn read_inputs(&mut self) -> PixelMask;
}
