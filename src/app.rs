use crate::{
    alphabet::Alphabet,
    export::save_png,
    helpers::{build_layout_lines, build_preview_lines},
    render::{Rendering, RenderOptions, render},
};

use ratatui::{
    crossterm::event::{self, KeyCode, KeyEventKind},
    prelude::*,
    widgets::*,
};
use std::{ops::RangeInclusive, path::PathBuf};
use tracing::warn;
use tui_input::{Input, InputRequest};

const LETTER_HEIGHT_RANGE: RangeInclusive<u32> = 120..=400;
const LETTER_SPACING_RANGE: RangeInclusive<u32> = 0..=60;
const WORD_SPACING_RANGE: RangeInclusive<u32> = 10..=120;
const LINE_WIDTH_RANGE: RangeInclusive<u32> = 100..=20_000;

const REFERENCE: &str = "Howarth, M. (2015). Say it with proteins: an alphabet of crystal \
structures. Nature Structural & Molecular Biology, 22(5), 349. \
https://www.nature.com/articles/nsmb.3011";

const KEYS: &str = " Tab theme | F2/F3 height | F5/F6 letter | F7/F8 word | F9/F10 width | Enter export | Esc quit ";

pub struct App<'a> {
    alphabet: &'a Alphabet,
    options: RenderOptions,
    output: PathBuf,
    input: Input,
    rendering: Option<Rendering>,
    preview: Option<Preview>,
    error: Option<String>,
    status: Option<String>,
}

/// Thumbnail of the current rendering, built for one panel size.
struct Preview {
    size: (u16, u16),
    lines: Vec<Line<'static>>,
}

impl<'a> App<'a> {
    pub fn new(alphabet: &'a Alphabet, text: String, options: RenderOptions, output: PathBuf) -> Self {
        let mut app = Self {
            alphabet,
            options,
            output,
            input: Input::new(text),
            rendering: None,
            preview: None,
            error: None,
            status: None,
        };

        app.rerender();
        app
    }

    fn rerender(&mut self) {
        self.preview = None;
        match render(self.input.value(), &self.options, self.alphabet) {
            Ok(rendering) => {
                self.rendering = Some(rendering);
                self.error = None;
            }
            Err(e) => {
                self.rendering = None;
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn export(&mut self) {
        let Some(rendering) = &self.rendering else {
            self.status = Some("Nothing to export".to_string());
            return;
        };

        self.status = Some(match save_png(&rendering.image, &self.output) {
            Ok(bytes) => format!("Saved {} ({} bytes)", self.output.display(), bytes),
            Err(e) => {
                warn!(error = %e, path = %self.output.display(), "export failed");
                format!("Export failed: {e}")
            }
        });
    }

    pub fn handle_key(&mut self, key: event::KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let o = &mut self.options;
        match key.code {
            KeyCode::Char(c) => {
                self.input.handle(InputRequest::InsertChar(c));
            }
            KeyCode::Backspace => {
                self.input.handle(InputRequest::DeletePrevChar);
            }
            KeyCode::Delete => {
                self.input.handle(InputRequest::DeleteNextChar);
            }
            KeyCode::Left => {
                self.input.handle(InputRequest::GoToPrevChar);
                return;
            }
            KeyCode::Right => {
                self.input.handle(InputRequest::GoToNextChar);
                return;
            }
            KeyCode::Home => {
                self.input.handle(InputRequest::GoToStart);
                return;
            }
            KeyCode::End => {
                self.input.handle(InputRequest::GoToEnd);
                return;
            }
            KeyCode::Tab => o.letter_color_theme = o.letter_color_theme.next(),
            KeyCode::BackTab => o.letter_color_theme = o.letter_color_theme.prev(),
            KeyCode::F(2) => o.letter_height = step(o.letter_height, -10, LETTER_HEIGHT_RANGE),
            KeyCode::F(3) => o.letter_height = step(o.letter_height, 10, LETTER_HEIGHT_RANGE),
            KeyCode::F(5) => o.letter_spacing = step(o.letter_spacing, -5, LETTER_SPACING_RANGE),
            KeyCode::F(6) => o.letter_spacing = step(o.letter_spacing, 5, LETTER_SPACING_RANGE),
            KeyCode::F(7) => o.word_spacing = step(o.word_spacing, -5, WORD_SPACING_RANGE),
            KeyCode::F(8) => o.word_spacing = step(o.word_spacing, 5, WORD_SPACING_RANGE),
            KeyCode::F(9) => o.max_line_width = step(o.max_line_width, -100, LINE_WIDTH_RANGE),
            KeyCode::F(10) => o.max_line_width = step(o.max_line_width, 100, LINE_WIDTH_RANGE),
            KeyCode::Enter => {
                self.export();
                return;
            }
            _ => return,
        }

        self.rerender();
    }

    /// The thumbnail for a `cols` x `rows` panel, rebuilt only after a
    /// re-render or a resize.
    fn preview_lines(&mut self, cols: u16, rows: u16) -> Vec<Line<'static>> {
        let Some(rendering) = &self.rendering else {
            return Vec::new();
        };

        let cached = matches!(&self.preview, Some(p) if p.size == (cols, rows));
        if !cached {
            self.preview = Some(Preview {
                size: (cols, rows),
                lines: build_preview_lines(&rendering.image, cols, rows),
            });
        }

        self.preview
            .as_ref()
            .map(|p| p.lines.clone())
            .unwrap_or_default()
    }

    pub fn draw_ui(&mut self, f: &mut Frame) {
        let area = f.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(
                [
                    Constraint::Length(2), // Title
                    Constraint::Length(3), // Input
                    Constraint::Min(6),    // Preview + lines
                    Constraint::Length(4), // Settings
                    Constraint::Length(6), // Notes
                ]
                .as_ref(),
            )
            .split(area);

        let title = Paragraph::new(vec![
            Line::from("Protein Alphabet Text Generator").bold(),
            Line::from("Render text using protein-structure letters (A–Z).").dark_gray(),
        ])
        .alignment(Alignment::Center);
        f.render_widget(title, chunks[0]);

        let input_block = Block::default().title("Enter text").borders(Borders::ALL);
        let input_inner = input_block.inner(chunks[1]);
        let scroll = self.input.visual_scroll(input_inner.width.max(1) as usize);
        let input_paragraph = Paragraph::new(self.input.value())
            .block(input_block)
            .scroll((0, scroll as u16));
        f.render_widget(input_paragraph, chunks[1]);

        let cursor_x = self.input.visual_cursor().saturating_sub(scroll) as u16;
        f.set_cursor_position((input_inner.x + cursor_x, input_inner.y));

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)].as_ref())
            .split(chunks[2]);

        let preview_block = Block::default().title("Rendered output").borders(Borders::ALL);
        let preview_inner = preview_block.inner(middle[0]);
        let preview = if self.rendering.is_some() {
            Paragraph::new(self.preview_lines(preview_inner.width, preview_inner.height))
        } else if let Some(error) = &self.error {
            Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false })
        } else {
            Paragraph::new("")
        };
        f.render_widget(preview.block(preview_block), middle[0]);

        let lines = self
            .rendering
            .as_ref()
            .map(|r| build_layout_lines(&r.layout))
            .unwrap_or_default();
        let lines_paragraph =
            Paragraph::new(lines).block(Block::default().title("Lines").borders(Borders::ALL));
        f.render_widget(lines_paragraph, middle[1]);

        let o = &self.options;
        let mut settings = vec![Line::from(format!(
            "Theme: {} | Height: {} px | Letter: {} px | Word: {} px | Width: {} px",
            o.letter_color_theme.name(),
            o.letter_height,
            o.letter_spacing,
            o.word_spacing,
            o.max_line_width
        ))];

        let summary = match &self.rendering {
            Some(r) => format!(
                "Canvas: {}x{} px | Lines: {} | Skipped: {}",
                r.image.width(),
                r.image.height(),
                r.layout.lines.len(),
                r.layout.skipped.len()
            ),
            None => "Canvas: -".to_string(),
        };
        let status = match &self.status {
            Some(status) => format!("{summary} | {status}"),
            None => summary,
        };
        settings.push(Line::from(status));

        let settings_paragraph = Paragraph::new(settings)
            .block(Block::default().title(KEYS).borders(Borders::ALL));
        f.render_widget(settings_paragraph, chunks[3]);

        let notes = Paragraph::new(vec![
            Line::from(format!(
                "Each letter is a real protein structure whose fold resembles a character. {}",
                o.letter_color_theme.description()
            )),
            Line::from(REFERENCE).dark_gray(),
        ])
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Educational notes").borders(Borders::ALL));
        f.render_widget(notes, chunks[4]);
    }
}

fn step(value: u32, delta: i64, range: RangeInclusive<u32>) -> u32 {
    let next = (value as i64 + delta).clamp(*range.start() as i64, *range.end() as i64);
    next as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{testing, theme::ColorTheme};
    use ratatui::{
        backend::TestBackend,
        crossterm::event::{KeyEvent, KeyModifiers},
    };

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn scratch_output(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("protein-alphabet-{}-{name}.png", std::process::id()))
    }

    #[test]
    fn typing_rerenders() {
        let alphabet = testing::alphabet();
        let mut app = App::new(&alphabet, "A".into(), testing::options(), scratch_output("typing"));
        assert_eq!(app.rendering.as_ref().unwrap().layout.glyph_count(), 1);

        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.rendering.as_ref().unwrap().layout.line_texts(), vec!["AB"]);

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        assert!(app.rendering.as_ref().is_none());
        assert!(app.error.as_deref().unwrap().contains("empty"));
    }

    #[test]
    fn keys_adjust_options_within_ranges() {
        let alphabet = testing::alphabet();
        let mut app = App::new(&alphabet, "A".into(), testing::options(), scratch_output("keys"));

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.options.letter_color_theme, ColorTheme::SecondaryStructure);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.options.letter_color_theme, ColorTheme::Original);

        press(&mut app, KeyCode::F(3));
        assert_eq!(app.options.letter_height, 120);
        assert_eq!(app.rendering.as_ref().unwrap().image.height(), 120 + testing::LINE_GAP);

        for _ in 0..20 {
            press(&mut app, KeyCode::F(5));
        }
        assert_eq!(app.options.letter_spacing, 0);

        press(&mut app, KeyCode::F(8));
        assert_eq!(app.options.word_spacing, testing::WORD_SPACING + 5);
    }

    #[test]
    fn enter_exports_png() {
        let alphabet = testing::alphabet();
        let output = scratch_output("enter");
        let mut app = App::new(&alphabet, "AB".into(), testing::options(), output.clone());

        press(&mut app, KeyCode::Enter);

        assert!(app.status.as_deref().unwrap().starts_with("Saved"));
        let saved = image::open(&output).unwrap().to_rgba8();
        assert_eq!(saved, app.rendering.as_ref().unwrap().image);

        let _ = std::fs::remove_file(&output);
    }

    #[test]
    fn export_without_rendering_reports_status() {
        let alphabet = testing::alphabet();
        let mut app = App::new(&alphabet, "###".into(), testing::options(), scratch_output("none"));

        app.export();
        assert_eq!(app.status.as_deref(), Some("Nothing to export"));
    }

    #[test]
    fn draws_every_panel() {
        let alphabet = testing::alphabet();
        let mut app = App::new(&alphabet, "HI".into(), testing::options(), scratch_output("draw"));

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.draw_ui(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();

        for needle in ["Enter text", "Rendered output", "Lines", "Educational notes", "Canvas:"] {
            assert!(text.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn thumbnail_is_reused_until_rerender() {
        let alphabet = testing::alphabet();
        let mut app = App::new(&alphabet, "HI".into(), testing::options(), scratch_output("thumb"));
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        terminal.draw(|f| app.draw_ui(f)).unwrap();
        let size = app.preview.as_ref().unwrap().size;

        // A marker in the cache shows up only if the next frame skips the rebuild.
        app.preview = Some(Preview {
            size,
            lines: vec![Line::from("cached thumbnail")],
        });
        terminal.draw(|f| app.draw_ui(f)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("cached thumbnail"));

        press(&mut app, KeyCode::Char('A'));
        assert!(app.preview.is_none());
    }
}
