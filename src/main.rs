mod alphabet;
mod app;
mod error;
mod export;
mod helpers;
mod layout;
mod render;
mod theme;
mod types;

#[cfg(test)]
mod testing;

use crate::{
    alphabet::Alphabet,
    app::App,
    helpers::{Cli, init_logging},
    render::render,
};

use anyhow::Context;
use clap::Parser;
use ratatui::{
    crossterm::{
        event::{self, Event, KeyCode},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
};
use std::{io, time::Duration};
use tracing::info;

const POLLING_RATE_MS: u64 = 16;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), cli.headless)?;

    let options = cli.render_options();
    options.validate()?;

    let catalog = Alphabet::load(&cli.images).with_context(|| {
        format!(
            "cannot load the protein alphabet from {}",
            cli.images.display()
        )
    })?;
    let alphabet = alphabet::install(catalog);

    if cli.headless {
        let rendering = render(&cli.text, &options, alphabet)?;
        export::save_png(&rendering.image, &cli.output)
            .with_context(|| format!("cannot write {}", cli.output.display()))?;

        println!(
            "{} ({}x{} px, {} lines)",
            cli.output.display(),
            rendering.image.width(),
            rendering.image.height(),
            rendering.layout.lines.len()
        );

        return Ok(());
    }

    info!(letters = alphabet.len(), "starting interactive session");

    let mut app = App::new(alphabet, cli.text, options, cli.output);

    enable_raw_mode()?;
    let mut terminal = setup_or_restore(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Terminal::new(CrosstermBackend::new(stdout))
        },
        restore_terminal,
    )?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Run `setup`, calling `restore` first if it fails.
fn setup_or_restore<T>(
    setup: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce(),
) -> io::Result<T> {
    setup().inspect_err(|_| restore())
}

fn restore_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| app.draw_ui(frame))?;
        terminal.show_cursor()?;

        if event::poll(Duration::from_millis(POLLING_RATE_MS))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Esc => return Ok(()),
                    _ => app.handle_key(key),
                }
            }
        }
    }
}
