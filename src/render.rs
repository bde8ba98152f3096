use crate::{
    alphabet::{Alphabet, baseline_offset},
    error::{Error, Result},
    layout::layout_text,
    theme::ColorTheme,
    types::TextLayout,
};

use clap::ValueEnum;
use image::{Rgba, RgbaImage, imageops};
use std::collections::{HashMap, hash_map::Entry};
use tracing::debug;

pub const DEFAULT_MAX_LINE_WIDTH: u32 = 2400;
pub const DEFAULT_LETTER_HEIGHT: u32 = 220;
pub const DEFAULT_LETTER_SPACING: u32 = 15;
pub const DEFAULT_WORD_SPACING: u32 = 45;
pub const DEFAULT_LINE_GAP: u32 = 40;
pub const MAX_LETTER_HEIGHT: u32 = 4096;
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Align {
    Left,
    #[default]
    Center,
}

/// Every recognized layout and style setting.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
    pub max_line_width: u32,
    pub letter_height: u32,
    pub letter_spacing: u32,
    pub word_spacing: u32,
    pub line_gap: u32,
    pub background_color: Rgba<u8>,
    pub letter_color_theme: ColorTheme,
    pub align: Align,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_line_width: DEFAULT_MAX_LINE_WIDTH,
            letter_height: DEFAULT_LETTER_HEIGHT,
            letter_spacing: DEFAULT_LETTER_SPACING,
            word_spacing: DEFAULT_WORD_SPACING,
            line_gap: DEFAULT_LINE_GAP,
            background_color: Rgba([0, 0, 0, 0]),
            letter_color_theme: ColorTheme::Original,
            align: Align::Center,
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> Result<()> {
        if self.max_line_width == 0 {
            return Err(Error::invalid_input("max line width must be at least 1 px"));
        }

        if self.letter_height == 0 || self.letter_height > MAX_LETTER_HEIGHT {
            return Err(Error::invalid_input(format!(
                "letter height must be between 1 and {MAX_LETTER_HEIGHT} px, got {}",
                self.letter_height
            )));
        }

        Ok(())
    }
}

/// A composed canvas and the layout it was drawn from.
#[derive(Clone, Debug)]
pub struct Rendering {
    pub image: RgbaImage,
    pub layout: TextLayout,
}

/// Render `text` with the letter images of `alphabet`.
///
/// Empty or whitespace-only text, text with no letter in the alphabet, and
/// out-of-range options are `InvalidInput`. Unknown characters are skipped
/// and listed in `layout.skipped`.
pub fn render(text: &str, options: &RenderOptions, alphabet: &Alphabet) -> Result<Rendering> {
    options.validate()?;

    if text.trim().is_empty() {
        return Err(Error::invalid_input("text is empty"));
    }

    let layout = layout_text(text, options, alphabet);
    if layout.glyph_count() == 0 {
        return Err(Error::invalid_input("text has no letters in the alphabet"));
    }

    if layout.width as u64 * layout.height as u64 > MAX_CANVAS_PIXELS {
        return Err(Error::invalid_input(format!(
            "canvas of {}x{} px is too large",
            layout.width, layout.height
        )));
    }

    let image = compose(&layout, options, alphabet);

    debug!(
        glyphs = layout.glyph_count(),
        lines = layout.lines.len(),
        skipped = layout.skipped.len(),
        width = layout.width,
        height = layout.height,
        "rendered text"
    );

    Ok(Rendering { image, layout })
}

fn compose(layout: &TextLayout, options: &RenderOptions, alphabet: &Alphabet) -> RgbaImage {
    let height = layout.cell_height;
    let mut canvas = RgbaImage::from_pixel(layout.width, layout.height, options.background_color);
    let mut themed: HashMap<char, RgbaImage> = HashMap::new();

    for glyph in layout.glyphs() {
        let img = match themed.entry(glyph.ch) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let Some(mut img) = alphabet.scaled(glyph.ch, height) else {
                    continue;
                };
                options.letter_color_theme.apply(&mut img);
                entry.insert(img)
            }
        };

        // Shifted glyphs are clipped at the bottom of their cell.
        let shift = baseline_offset(glyph.ch, height).min(height);
        let visible = height - shift;
        if visible == 0 {
            continue;
        }

        let clipped = imageops::crop_imm(&*img, 0, 0, img.width(), visible).to_image();
        imageops::overlay(&mut canvas, &clipped, glyph.x as i64, (glyph.y + shift) as i64);
    }

    canvas
}
