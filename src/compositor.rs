//! Ties buttons and light units to one pixel grid
//!
//! The button layer and the animation engine share the sink, the pixel cache
//! and the rainbow cursor. Priority is structural: on a render tick every
//! pressed or aborted button is passed to the [`Canvas`] as reserved, so
//! light unit writes to those pixels only land in the cache (dirty). The
//! release path re-dirties the pixel, and the next render tick repaints the
//! light unit color.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::buttons::{ButtonDebouncer, ButtonEvents, ButtonsState, DebounceConfig};
use crate::canvas::Canvas;
use crate::color::{OFF, RainbowCursor, wheel};
use crate::command::{LightCommand, SetCommand};
use crate::grid::{GRID_SIZE, PixelMask};
use crate::pixel_cache::PixelCache;
use crate::presets::{FLASHLIGHT_ID, LOW_BATTERY_ID, Preset, low_battery_unit};
use crate::queue::CommandReceiver;
use crate::random::RandomSource;
use crate::store::{LightUnitStore, StoreError};
use crate::unit::{LightUnit, LightUnitId};
use crate::{AnimationEngine, ButtonInput, PixelSink};

/// Configuration for the compositor
#[derive(Debug, Clone, Default)]
pub struct CompositorConfig {
    pub debounce: DebounceConfig,
}

/// Owner of everything that draws on the grid
///
/// MAX_UNITS is the capacity of the light unit store
pub struct Compositor<S: PixelSink, I: ButtonInput, R: RandomSource, const MAX_UNITS: usize> {
    // External dependencies
    sink: S,
    input: I,
    rng: R,

    // Internal state
    store: LightUnitStore<MAX_UNITS>,
    cache: PixelCache,
    rainbow: RainbowCursor,

    // Internal dependencies
    engine: AnimationEngine,
    buttons: ButtonDebouncer,
}

impl<S: PixelSink, I: ButtonInput, R: RandomSource, const MAX_UNITS: usize>
    Compositor<S, I, R, MAX_UNITS>
{
    pub fn new(sink: S, input: I, rng: R, config: &CompositorConfig) -> Self {
        Self {
            sink,
            input,
            rng,
            store: LightUnitStore::new(),
            cache: PixelCache::new(),
            rainbow: RainbowCursor::new(),
            engine: AnimationEngine::new(),
            buttons: ButtonDebouncer::new(&config.debounce),
        }
    }

    /// Borrow the store, the engine and a canvas at once
    fn split(&mut self) -> (&mut LightUnitStore<MAX_UNITS>, &mut AnimationEngine, Canvas<'_, S, R>) {
        let reserved = self.buttons.state().reserved();
        (
            &mut self.store,
            &mut self.engine,
            Canvas::new(
                &mut self.sink,
                &mut self.cache,
                &mut self.rainbow,
                &mut self.rng,
                reserved,
            ),
        )
    }

    /// Sample the buttons and render press feedback
    ///
    /// Call this every fast tick (~20 ms).
    pub fn fast_tick(&mut self) {
        let raw = self.input.read_inputs();
        self.buttons.sample(raw);
        self.buttons
            .process(&mut self.sink, &mut self.cache, &mut self.rainbow);
    }

    /// Advance every light unit by one tick
    ///
    /// Call this every render tick (~100 ms).
    pub fn render_tick(&mut self) {
        let (store, engine, mut canvas) = self.split();
        engine.tick(store, &mut canvas);
    }

    /// Apply all queued commands
    ///
    /// Stops at the first failing command.
    pub fn process_commands<const SIZE: usize>(
        &mut self,
        commands: &CommandReceiver<'_, SIZE>,
    ) -> Result<(), StoreError> {
        while let Ok(command) = commands.try_receive() {
            self.apply(command)?;
        }
        Ok(())
    }

    /// Apply a single command
    pub fn apply(&mut self, command: LightCommand) -> Result<(), StoreError> {
        match command {
            LightCommand::Set(command) => self.apply_set(&command),
            LightCommand::Remove(0) | LightCommand::Clear => {
                self.remove_all();
                Ok(())
            }
            LightCommand::Remove(id) => {
                self.remove(id);
                Ok(())
            }
            LightCommand::Preset(preset) => self.start_preset(preset),
        }
    }

    fn apply_set(&mut self, command: &SetCommand) -> Result<(), StoreError> {
        let current = self.store.get(command.id);
        let exists = current.is_some();
        let mut unit = current.cloned().unwrap_or_default();
        unit.id = command.id;
        command.patch.apply_to(&mut unit);

        if command.id == 0 {
            return self.add(unit).map(|_| ());
        }

        // Stored units are normalized, compare like with like
        let unit = unit.normalized_with_id(command.id);
        if exists && !command.rm_before_add {
            let unchanged = self
                .store
                .get(command.id)
                .is_some_and(|current| current.equivalent(&unit));
            if unchanged {
                #[cfg(feature = "esp32-log")]
                println!(
                    "[Compositor.apply] set skipped for {}: no changes",
                    command.id
                );
                return Ok(());
            }
        }

        self.set(command.id, unit, command.rm_before_add, false)
    }

    /// Start or stop a built-in animation
    pub fn start_preset(&mut self, preset: Preset) -> Result<(), StoreError> {
        match preset {
            Preset::Flashlight(flashlight) => {
                self.set(FLASHLIGHT_ID, flashlight.to_unit(), true, false)
            }
            Preset::StopFlashlight => {
                self.remove(FLASHLIGHT_ID);
                Ok(())
            }
            Preset::LowBattery => self.set(LOW_BATTERY_ID, low_battery_unit(), false, true),
        }
    }

    /// Store a unit under a generated id
    pub fn add(&mut self, unit: LightUnit) -> Result<LightUnitId, StoreError> {
        self.store.add(unit, &mut self.rng)
    }

    /// Store a unit under `id`, see [`LightUnitStore::set`]
    pub fn set(
        &mut self,
        id: LightUnitId,
        unit: LightUnit,
        replace_first: bool,
        quiet: bool,
    ) -> Result<(), StoreError> {
        let (store, _, mut canvas) = self.split();
        store.set(id, unit, replace_first, quiet, &mut canvas)
    }

    /// Remove a unit and its dependents
    pub fn remove(&mut self, id: LightUnitId) {
        let (store, _, mut canvas) = self.split();
        store.remove(id, &mut canvas);
    }

    /// Remove every unit
    pub fn remove_all(&mut self) {
        let (store, _, mut canvas) = self.split();
        store.remove_all(&mut canvas);
    }

    /// Get a stored unit
    pub fn exists(&self, id: LightUnitId) -> Option<&LightUnit> {
        self.store.get(id)
    }

    /// Restart the expiration countdown of a unit
    pub fn reset_age(&mut self, id: LightUnitId) {
        self.store.reset_age(id);
    }

    pub fn unit_count(&self) -> usize {
        self.store.len()
    }

    /// Pixels that are (or will be, once released) lit
    pub fn active_pixels(&self) -> PixelMask {
        self.cache.active_pixels()
    }

    /// Pending button events
    ///
    /// Events stay pending until acknowledged.
    pub fn button_events(&self) -> ButtonEvents {
        self.buttons.state().events()
    }

    /// Clear events that were delivered
    pub fn acknowledge_button_events(&mut self, events: ButtonEvents) {
        self.buttons.state_mut().acknowledge(events);
    }

    pub fn buttons(&self) -> &ButtonsState {
        self.buttons.state()
    }

    pub fn store(&self) -> &LightUnitStore<MAX_UNITS> {
        &self.store
    }

    pub fn cache(&self) -> &PixelCache {
        &self.cache
    }

    pub fn render_ticks(&self) -> u32 {
        self.engine.render_tick()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Turn every pixel off
    pub fn clear_pixels(&mut self) {
        for index in 0..GRID_SIZE {
            self.sink.set_pixel(index, OFF);
        }
        self.sink.flush();
        self.cache.reset();
    }

    /// Boot animation: paint the rainbow pixel by pixel, then clear
    ///
    /// Every pixel is flushed on its own, the bus transfer paces the sweep.
    #[allow(clippy::cast_possible_truncation)]
    pub fn startup_sweep(&mut self) {
        for index in 0..GRID_SIZE {
            let position = (index * 255 / GRID_SIZE) as u8;
            self.sink.set_pixel(index, wheel(position));
            self.sink.flush();
        }
        self.clear_pixels();
    }
}
