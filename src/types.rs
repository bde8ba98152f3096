use crate::error::UnknownCharacter;

/// One alphabet image placed on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    /// Character position in the input text.
    pub idx: usize,
    pub line: usize,
    /// Top-left corner of the glyph cell.
    pub x: u32,
    pub y: u32,
    pub width: u32,
}

impl Glyph {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphLine {
    pub glyphs: Vec<Glyph>,
    /// Right edge of the last glyph, trailing spacing excluded.
    pub width: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextLayout {
    pub lines: Vec<GlyphLine>,
    pub skipped: Vec<UnknownCharacter>,
    pub width: u32,
    pub height: u32,
    pub cell_height: u32,
}

impl TextLayout {
    pub fn glyphs(&self) -> impl Iterator<Item = &Glyph> {
        self.lines.iter().flat_map(|line| line.glyphs.iter())
    }

    pub fn glyph_count(&self) -> usize {
        self.lines.iter().map(|line| line.glyphs.len()).sum()
    }

    /// The letters of each line, without spaces.
    pub fn line_texts(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| line.glyphs.iter().map(|g| g.ch).collect())
            .collect()
    }
}
