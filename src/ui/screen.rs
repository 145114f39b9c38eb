//! # Screen
//!
//! The terminal front-end: a ratatui [`Terminal`], an [`EventReader`] and
//! the active [`Theme`]. The screen is also the controller's [`Prompter`]:
//! it draws the pending question as a modal and waits for `y`/`n`.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{backend::Backend, Terminal};

use crate::ui::app::AppState;
use crate::ui::controller::Prompter;
use crate::ui::render::render;
use crate::ui::theme::Theme;

/// Poll interval of the event loop.
pub const TICK: Duration = Duration::from_millis(100);

/// Source of terminal events, replaceable in tests.
pub trait EventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Event reader backed by crossterm's polling.
pub struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Failed to poll for events")? {
            Ok(Some(event::read().context("Failed to read keyboard event")?))
        } else {
            Ok(None)
        }
    }
}

pub struct Screen<B: Backend> {
    terminal: Terminal<B>,
    events: Box<dyn EventReader>,
    theme: &'static Theme,
}

impl<B: Backend> Screen<B> {
    pub fn new(terminal: Terminal<B>, events: Box<dyn EventReader>, theme: &'static Theme) -> Self {
        Self {
            terminal,
            events,
            theme,
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    pub fn theme(&self) -> &'static Theme {
        self.theme
    }

    pub fn draw(&mut self, state: &AppState) -> Result<()> {
        let theme = self.theme;
        self.terminal
            .draw(|f| render(f, state, theme))
            .map_err(|e| anyhow!("Failed to draw terminal UI: {e}"))?;
        Ok(())
    }

    pub fn next_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        self.events.read_event(timeout)
    }

    /// Draw the pending question and wait for an answer.
    fn ask(&mut self, state: &AppState) -> Result<bool> {
        loop {
            self.draw(state)?;
            let Some(Event::Key(key)) = self.next_event(TICK)? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => return Ok(true),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => return Ok(false),
                _ => {}
            }
        }
    }
}

impl<B: Backend> Prompter for Screen<B> {
    async fn confirm(&mut self, state: &AppState) -> bool {
        match self.ask(state) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "confirmation failed, treating as declined");
                false
            }
        }
    }
}
