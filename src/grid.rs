//! Grid geometry and pixel masks

/// Number of rows of the button grid
pub const GRID_HEIGHT: usize = 8;

/// Number of columns of the button grid
pub const GRID_WIDTH: usize = 8;

/// Number of pixels (and buttons) on the grid
pub const GRID_SIZE: usize = GRID_WIDTH * GRID_HEIGHT;

/// Set of grid positions, bit `i` is pixel `i`
pub type PixelMask = u64;

/// Mask with every pixel of the grid
pub const ALL_PIXELS: PixelMask = PixelMask::MAX;

/// Get the mask bit of a single pixel
#[inline]
pub const fn pixel_bit(index: usize) -> PixelMask {
    1 << index
}

/// Returns true if `index` is part of `mask`
#[inline]
pub const fn contains_pixel(mask: PixelMask, index: usize) -> bool {
    mask & pixel_bit(index) != 0
}

/// Iterate over the pixel indices of a mask, lowest first
pub fn pixels_of(mask: PixelMask) -> impl Iterator<Item = usize> {
    (0..GRID_SIZE).filter(move |&index| contains_pixel(mask, index))
}

/// Get the pixel index of a grid coordinate
pub const fn pixel_at(x: usize, y: usize) -> usize {
    y * GRID_WIDTH + x
}
