mod utils;
mod wheel;

use smart_leds::RGB8;
pub use utils::{is_off, rgb_from_u32, rgb_to_u32, scale_color};
pub use wheel::{RAINBOW_STEP, RainbowCursor, wheel};

pub type Rgb = RGB8;

/// Color of a pixel that is turned off
pub const OFF: Rgb = Rgb { r: 0, g: 0, b: 0 };
