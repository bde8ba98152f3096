use crate::{
    export::DEFAULT_FILE_NAME,
    render::{
        Align, DEFAULT_LETTER_HEIGHT, DEFAULT_LETTER_SPACING, DEFAULT_LINE_GAP,
        DEFAULT_MAX_LINE_WIDTH, DEFAULT_WORD_SPACING, RenderOptions,
    },
    theme::ColorTheme,
    types::TextLayout,
};

use anyhow::Context;
use clap::Parser;
use image::{Rgba, RgbaImage, imageops, imageops::FilterType};
use ratatui::prelude::*;
use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "protein-alphabet",
    version,
    about = "Render text with the protein alphabet and export it as PNG"
)]
pub struct Cli {
    /// Directory holding A.png through Z.png
    #[arg(long, default_value = "images")]
    pub images: PathBuf,

    /// Text to render
    #[arg(short, long, default_value = "HELLO WORLD")]
    pub text: String,

    /// PNG file written on export
    #[arg(short, long, default_value = DEFAULT_FILE_NAME)]
    pub output: PathBuf,

    /// Render once to --output and exit instead of opening the UI
    #[arg(long)]
    pub headless: bool,

    #[arg(long, value_enum, default_value_t = ColorTheme::Original)]
    pub theme: ColorTheme,

    #[arg(long, default_value_t = DEFAULT_LETTER_HEIGHT)]
    pub letter_height: u32,

    #[arg(long, default_value_t = DEFAULT_LETTER_SPACING)]
    pub letter_spacing: u32,

    #[arg(long, default_value_t = DEFAULT_WORD_SPACING)]
    pub word_spacing: u32,

    #[arg(long, default_value_t = DEFAULT_MAX_LINE_WIDTH)]
    pub max_line_width: u32,

    #[arg(long, default_value_t = DEFAULT_LINE_GAP)]
    pub line_gap: u32,

    /// Canvas color as #RRGGBB or #RRGGBBAA
    #[arg(long, default_value = "#00000000", value_parser = parse_color)]
    pub background: Rgba<u8>,

    #[arg(long, value_enum, default_value_t = Align::Center)]
    pub align: Align,

    /// Append logs to this file (the UI logs nowhere otherwise)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            max_line_width: self.max_line_width,
            letter_height: self.letter_height,
            letter_spacing: self.letter_spacing,
            word_spacing: self.word_spacing,
            line_gap: self.line_gap,
            background_color: self.background,
            letter_color_theme: self.theme,
            align: self.align,
        }
    }
}

pub fn parse_color(s: &str) -> Result<Rgba<u8>, String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
        return Err(format!("expected #RRGGBB or #RRGGBBAA, got {s:?}"));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| format!("invalid hex color {s:?}"))
    };

    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };

    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

/// Log to `log_file` when given, else to stderr when `to_stderr` is set.
pub fn init_logging(log_file: Option<&Path>, to_stderr: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if to_stderr {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}

/// A half-block thumbnail of `image` fitted into `cols` x `rows` cells,
/// blended over black.
pub fn build_preview_lines(image: &RgbaImage, cols: u16, rows: u16) -> Vec<Line<'static>> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || cols == 0 || rows == 0 {
        return Vec::new();
    }

    // Each cell shows two vertically stacked pixels.
    let scale = f64::min(
        cols as f64 / width as f64,
        (rows as f64 * 2.0) / height as f64,
    );
    let thumb_w = ((width as f64 * scale) as u32).clamp(1, cols as u32);
    let thumb_h = ((height as f64 * scale) as u32).clamp(1, rows as u32 * 2);

    let thumb = if (thumb_w, thumb_h) == (width, height) {
        image.clone()
    } else {
        imageops::resize(image, thumb_w, thumb_h, FilterType::Triangle)
    };

    let over_black = |y: u32, x: u32| {
        if y >= thumb.height() {
            return Color::Rgb(0, 0, 0);
        }

        let [r, g, b, a] = thumb.get_pixel(x, y).0;
        let mix = |c: u8| (c as u16 * a as u16 / 255) as u8;
        Color::Rgb(mix(r), mix(g), mix(b))
    };

    (0..thumb_h.div_ceil(2))
        .map(|row| {
            let spans: Vec<Span<'static>> = (0..thumb_w)
                .map(|x| {
                    let style = Style::default()
                        .fg(over_black(row * 2, x))
                        .bg(over_black(row * 2 + 1, x));
                    Span::styled("▀", style)
                })
                .collect();

            Line::from(spans)
        })
        .collect()
}

/// The letters placed on each line, numbered, with skipped characters last.
pub fn build_layout_lines(layout: &TextLayout) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = layout
        .line_texts()
        .into_iter()
        .enumerate()
        .map(|(row, text)| {
            Line::from(vec![
                Span::styled(format!("{:>2} ", row + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(text),
            ])
        })
        .collect();

    if !layout.skipped.is_empty() {
        let skipped: String = layout
            .skipped
            .iter()
            .map(|u| format!("{:?}", u.ch))
            .collect::<Vec<_>>()
            .join(" ");

        lines.push(Line::from(Span::styled(
            format!("skipped: {skipped}"),
            Style::default().fg(Color::Yellow),
        )));
    }

    lines
}
