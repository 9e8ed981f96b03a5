use crate::{color::Rgb, math8::dim8};

/// Create an RGB color from a u32 value (0xRRGGBB format)
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// Pack an RGB color into a u32 value (0xRRGGBB format)
pub const fn rgb_to_u32(color: Rgb) -> u32 {
    ((color.r as u32) << 16) | ((color.g as u32) << 8) | color.b as u32
}

/// Returns true if all channels are zero
#[inline]
pub const fn is_off(color: Rgb) -> bool {
    color.r == 0 && color.g == 0 && color.b == 0
}

/// Scale every channel by `brightness / 256`, truncating.
///
/// Black colors and a zero brightness leave the color untouched,
/// zero means "no scaling" for light units.
#[inline]
pub fn scale_color(color: Rgb, brightness: u8) -> Rgb {
    if is_off(color) || brightness == 0 {
        return color;
    }
    Rgb {
        r: dim8(color.r, brightness),
        g: dim8(color.g, brightness),
        b: dim8(color.b, brightness),
    }
}
