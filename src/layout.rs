use crate::{
    alphabet::Alphabet,
    error::UnknownCharacter,
    render::{Align, RenderOptions},
    types::{Glyph, GlyphLine, TextLayout},
};

use tracing::warn;

/// Place every resolvable letter of `text` on lines no wider than
/// `max_line_width`.
///
/// Lines break between words. A word that is wider than the limit on its own
/// starts a fresh line and is broken between glyphs; a single glyph wider
/// than the limit overflows. Characters missing from the alphabet are
/// skipped and recorded in `TextLayout::skipped`.
///
/// Glyph and skip indices count characters of `text` as given. A character
/// that uppercases to several (`ß` to `SS`) gives each of them its index.
pub fn layout_text(text: &str, options: &RenderOptions, alphabet: &Alphabet) -> TextLayout {
    let height = options.letter_height;
    let max_width = options.max_line_width;
    let spacing = options.letter_spacing;
    let chars: Vec<(usize, char)> = text
        .chars()
        .enumerate()
        .flat_map(|(idx, c)| c.to_uppercase().map(move |up| (idx, up)))
        .collect();

    let mut lines: Vec<GlyphLine> = vec![GlyphLine::default()];
    let mut skipped = Vec::new();
    let mut cursor = 0u32;
    let mut i = 0usize;

    while i < chars.len() {
        if chars[i].1.is_whitespace() {
            if !current(&lines).glyphs.is_empty() {
                cursor = cursor.saturating_add(options.word_spacing);
            }

            i += 1;
            continue;
        }

        let mut word: Vec<(usize, char, u32)> = Vec::new();
        while i < chars.len() && !chars[i].1.is_whitespace() {
            let (index, ch) = chars[i];
            match alphabet.scaled_width(ch, height) {
                Some(width) => word.push((index, ch, width)),
                None => {
                    warn!(character = ?ch, index, "no glyph for character, skipping");
                    skipped.push(UnknownCharacter { ch, index });
                }
            }

            i += 1;
        }

        if word.is_empty() {
            continue;
        }

        let word_width = word
            .iter()
            .map(|&(_, _, w)| w)
            .fold(0u32, u32::saturating_add)
            .saturating_add(spacing.saturating_mul(word.len() as u32 - 1));

        if !current(&lines).glyphs.is_empty() && cursor.saturating_add(word_width) > max_width {
            lines.push(GlyphLine::default());
            cursor = 0;
        }

        for (idx, ch, width) in word {
            // Only reachable for a word wider than the whole line.
            if !current(&lines).glyphs.is_empty() && cursor.saturating_add(width) > max_width {
                lines.push(GlyphLine::default());
                cursor = 0;
            }

            let line = lines.len() - 1;
            let glyph = Glyph {
                ch,
                idx,
                line,
                x: cursor,
                y: 0,
                width,
            };

            let row = &mut lines[line];
            row.width = glyph.right();
            row.glyphs.push(glyph);

            cursor = cursor.saturating_add(width).saturating_add(spacing);
        }
    }

    finish(lines, skipped, options)
}

fn current(lines: &[GlyphLine]) -> &GlyphLine {
    &lines[lines.len() - 1]
}

fn finish(
    mut lines: Vec<GlyphLine>,
    skipped: Vec<UnknownCharacter>,
    options: &RenderOptions,
) -> TextLayout {
    let cell_height = options.letter_height;
    let line_advance = cell_height.saturating_add(options.line_gap);
    let width = lines.iter().map(|line| line.width).max().unwrap_or(0);

    for (row, line) in lines.iter_mut().enumerate() {
        let offset = match options.align {
            Align::Left => 0,
            Align::Center => (width - line.width) / 2,
        };
        let top = line_advance.saturating_mul(row as u32);

        for glyph in &mut line.glyphs {
            glyph.x += offset;
            glyph.y = top;
        }
    }

    TextLayout {
        height: line_advance.saturating_mul(lines.len() as u32),
        lines,
        skipped,
        width,
        cell_height,
    }
}
