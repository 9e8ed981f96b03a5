#![allow(dead_code)]

use trellis_light_units::color::OFF;
use trellis_light_units::{
    ButtonInput, Compositor, CompositorConfig, GRID_SIZE, LightUnit, LightUnitId, PixelMask,
    PixelSink, RandomSource, Rgb, SplitMix64, UnitFinalizer,
};

/// Sink that remembers every write
pub struct RecordingSink {
    pub writes: Vec<(usize, Rgb)>,
    pub flushes: usize,
    pub pixels: [Rgb; GRID_SIZE],
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            flushes: 0,
            pixels: [OFF; GRID_SIZE],
        }
    }

    /// Writes that went to a single pixel
    pub fn writes_to(&self, index: usize) -> Vec<Rgb> {
        self.writes
            .iter()
            .filter(|(pixel, _)| *pixel == index)
            .map(|(_, color)| *color)
            .collect()
    }
}

impl PixelSink for RecordingSink {
    fn set_pixel(&mut self, index: usize, color: Rgb) {
        self.writes.push((index, color));
        self.pixels[index] = color;
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}

/// Buttons held down by the test
#[derive(Default)]
pub struct FakeInput {
    pub raw: PixelMask,
}

impl ButtonInput for FakeInput {
    fn read_inputs(&mut self) -> PixelMask {
        self.raw
    }
}

/// Random source that always returns the same value
pub struct FixedRandom(pub u32);

impl RandomSource for FixedRandom {
    fn next_u32(&mut self) -> u32 {
        self.0
    }
}

/// Finalizer that only records which units got their terminal pass
#[derive(Default)]
pub struct RecordingFinalizer {
    pub finalized: Vec<LightUnitId>,
}

impl UnitFinalizer for RecordingFinalizer {
    fn finalize(&mut self, unit: &mut LightUnit) {
        self.finalized.push(unit.id);
    }
}

pub type TestCompositor = Compositor<RecordingSink, FakeInput, SplitMix64, 16>;

pub fn compositor() -> TestCompositor {
    compositor_with(&CompositorConfig::default())
}

pub fn compositor_with(config: &CompositorConfig) -> TestCompositor {
    Compositor::new(RecordingSink::new(), FakeInput::default(), SplitMix64::new(7), config)
}

/// Hold `mask` down for `ticks` fast ticks
pub fn hold(compositor: &mut TestCompositor, mask: PixelMask, ticks: usize) {
    compositor.input_mut().raw = mask;
    for _ in 0..ticks {
        compositor.fast_tick();
    }
}

/// Release every button and run one fast tick
pub fn release_all(compositor: &mut TestCompositor) {
    compositor.input_mut().raw = 0;
    compositor.fast_tick();
}
