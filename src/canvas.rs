use crate::PixelSink;
use crate::animation::render_unit;
use crate::color::{RainbowCursor, Rgb};
use crate::grid::{PixelMask, contains_pixel};
use crate::pixel_cache::PixelCache;
use crate::random::RandomSource;
use crate::store::UnitFinalizer;
use crate::unit::LightUnit;

/// Everything a light unit needs to put colors on the grid
///
/// Writes go through the [`PixelCache`]. Pixels in `reserved` belong to the
/// button layer: their writes are cached dirty and never forwarded.
pub struct Canvas<'a, S: PixelSink, R: RandomSource> {
    pub sink: &'a mut S,
    pub cache: &'a mut PixelCache,
    pub rainbow: &'a mut RainbowCursor,
    pub rng: &'a mut R,
    pub reserved: PixelMask,
}

impl<'a, S: PixelSink, R: RandomSource> Canvas<'a, S, R> {
    pub fn new(
        sink: &'a mut S,
        cache: &'a mut PixelCache,
        rainbow: &'a mut RainbowCursor,
        rng: &'a mut R,
        reserved: PixelMask,
    ) -> Self {
        Self {
            sink,
            cache,
            rainbow,
            rng,
            reserved,
        }
    }

    /// Write a pixel unless the cache says it already shows `color`
    pub fn put_pixel(&mut self, index: usize, color: Rgb) {
        if self.cache.matches(index, color) {
            return;
        }
        if contains_pixel(self.reserved, index) {
            self.cache.defer(index, color);
            return;
        }
        self.sink.set_pixel(index, color);
        self.cache.commit(index, color);
    }
}

impl<S: PixelSink, R: RandomSource> UnitFinalizer for Canvas<'_, S, R> {
    fn finalize(&mut self, unit: &mut LightUnit) {
        let version = self.cache.version();
        render_unit(unit, true, self);
        if version != self.cache.version() {
            self.sink.flush();
        }
    }
}
