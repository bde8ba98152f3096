use crate::{
    alphabet::Alphabet,
    render::{Align, RenderOptions},
    theme::ColorTheme,
};

use image::{Rgba, RgbaImage};

pub const HEIGHT: u32 = 40;
pub const WIDTH: u32 = 20;
pub const NARROW: u32 = 10;
pub const SPACING: u32 = 5;
pub const WORD_SPACING: u32 = 15;
pub const LINE_GAP: u32 = 10;

/// Solid color unique to each letter.
pub fn letter_color(ch: char) -> Rgba<u8> {
    let n = (ch as u8 - b'A') * 9;
    Rgba([n, 100, 200, 255])
}

/// A–Z at `HEIGHT` pixels, all `WIDTH` wide except a `NARROW` I.
pub fn alphabet() -> Alphabet {
    Alphabet::from_images(('A'..='Z').map(|ch| {
        let width = if ch == 'I' { NARROW } else { WIDTH };
        (ch, RgbaImage::from_pixel(width, HEIGHT, letter_color(ch)))
    }))
}

pub fn options() -> RenderOptions {
    RenderOptions {
        max_line_width: 1000,
        letter_height: HEIGHT,
        letter_spacing: SPACING,
        word_spacing: WORD_SPACING,
        line_gap: LINE_GAP,
        background_color: Rgba([0, 0, 0, 0]),
        letter_color_theme: ColorTheme::Original,
        align: Align::Left,
    }
}
