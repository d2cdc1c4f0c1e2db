mod palette;
mod utils;

use smart_leds::{RGB8, hsv::Hsv as HSV};

pub use palette::{PaletteMode, palette_color};
pub use utils::{
    BLACK, WHITE, apply_brightness, blend_unit, hsv_to_rgb, is_black, rgb_from_u32,
    scale_color,
};

pub type Rgb = RGB8;
pub type Hsv = HSV;
