//! Last known color of every pixel
//!
//! The cache sits between the renderers and the [`PixelSink`](crate::PixelSink).
//! It drops writes that would not change a pixel and keeps a version counter,
//! bumped on every forwarded write, so a tick only flushes when something
//! actually changed.
//!
//! A *dirty* entry never matches any color. Pixels owned by a pressed button
//! are cached dirty, so the first write after the release reaches the sink.

use crate::color::{OFF, Rgb, is_off};
use crate::grid::{GRID_SIZE, PixelMask, pixel_bit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CachedPixel {
    color: Rgb,
    dirty: bool,
}

impl CachedPixel {
    const OFF: Self = Self {
        color: OFF,
        dirty: false,
    };
}

#[derive(Debug, Clone)]
pub struct PixelCache {
    pixels: [CachedPixel; GRID_SIZE],
    version: u32,
}

impl Default for PixelCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelCache {
    /// Create a cache with every pixel off
    pub const fn new() -> Self {
        Self {
            pixels: [CachedPixel::OFF; GRID_SIZE],
            version: 0,
        }
    }

    /// Returns true if the pixel is known to show `color`
    pub fn matches(&self, index: usize, color: Rgb) -> bool {
        let pixel = self.pixels[index];
        !pixel.dirty && pixel.color == color
    }

    /// Record a color that was written to the sink
    pub fn commit(&mut self, index: usize, color: Rgb) {
        self.pixels[index] = CachedPixel {
            color,
            dirty: false,
        };
        self.version = self.version.wrapping_add(1);
    }

    /// Record a color that was held back from the sink
    pub fn defer(&mut self, index: usize, color: Rgb) {
        self.pixels[index] = CachedPixel { color, dirty: true };
    }

    /// Force the next write of this pixel through
    pub fn mark_dirty(&mut self, index: usize) {
        self.pixels[index].dirty = true;
    }

    /// Forget every pixel, as after the sink was blanked
    pub fn reset(&mut self) {
        self.pixels = [CachedPixel::OFF; GRID_SIZE];
    }

    /// Cached color of a pixel
    pub fn color(&self, index: usize) -> Rgb {
        self.pixels[index].color
    }

    /// Returns true if the pixel write was held back or invalidated
    pub fn is_dirty(&self, index: usize) -> bool {
        self.pixels[index].dirty
    }

    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Pixels whose cached color is not off, dirty or not
    pub fn active_pixels(&self) -> PixelMask {
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, pixel)| !is_off(pixel.color))
            .fold(0, |mask, (index, _)| mask | pixel_bit(index))
    }
}
