//! The rendering session: sole owner and writer of the terminal.
//!
//! [`TermSession`] keeps the last loaded [`Layout`] and redraws it on demand.
//! Layouts arrive from the refresh task over an `mpsc` channel; the session
//! clears, loads and renders each one, so draws are never interleaved with
//! input handling.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use devdash_core::backend::Renderer;
use devdash_core::error::{DashError, Result};
use devdash_core::layout::Layout;

use crate::grid_view;
use crate::keys::{self, QuitKey};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// What the event loop should do after one terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Redraw,
    Quit,
}

pub struct TermSession<B: Backend> {
    terminal: Terminal<B>,
    layout: Layout,
    quit: QuitKey,
    /// Whether raw mode and the alternate screen must be undone on close.
    owns_tty: bool,
    closed: bool,
}

fn backend_error(err: impl std::fmt::Display) -> DashError {
    DashError::BackendInit(io::Error::other(err.to_string()))
}

impl TermSession<CrosstermBackend<Stdout>> {
    /// Take over the real terminal: raw mode plus the alternate screen.
    pub fn crossterm() -> Result<Self> {
        enable_raw_mode().map_err(DashError::BackendInit)?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(DashError::BackendInit(err));
        }
        let mut session = Self::with_backend(CrosstermBackend::new(stdout))?;
        session.owns_tty = true;
        info!("terminal session started");
        Ok(session)
    }
}

impl<B: Backend> TermSession<B> {
    pub fn with_backend(backend: B) -> Result<Self> {
        let terminal = Terminal::new(backend).map_err(backend_error)?;
        Ok(Self {
            terminal,
            layout: Layout::new(),
            quit: QuitKey::Ctrl('c'),
            owns_tty: false,
            closed: false,
        })
    }

    pub fn set_quit_key(&mut self, raw: &str) -> Result<()> {
        self.quit = raw.parse()?;
        debug!(quit = %self.quit, "quit key registered");
        Ok(())
    }

    pub fn quit_key(&self) -> QuitKey {
        self.quit
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn load(&mut self, layout: Layout) {
        self.layout = layout;
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    /// Decide what a terminal event means for the session.
    pub fn handle_event(&self, event: &Event) -> Flow {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Resize(width, height) => {
                debug!(width, height, "terminal resized");
                Flow::Redraw
            }
            _ => Flow::Continue,
        }
    }

    fn handle_key(&self, key: &KeyEvent) -> Flow {
        if keys::is_interrupt(key) || self.quit.matches(key) {
            Flow::Quit
        } else {
            Flow::Continue
        }
    }

    /// Replace the displayed layout with a fresh one and draw it.
    pub fn apply(&mut self, layout: Layout) -> Result<()> {
        self.clear();
        self.load(layout);
        self.render()
    }

    /// Blocking event loop.
    ///
    /// Polls the terminal for input, then drains any finished layouts from
    /// `rx`. Returns when the quit key is pressed. A closed channel leaves
    /// the last layout on screen until then.
    pub async fn run(&mut self, rx: mpsc::Receiver<Layout>) -> Result<()> {
        let mut rx = Some(rx);
        self.render()?;

        loop {
            if event::poll(POLL_INTERVAL)? {
                match self.handle_event(&event::read()?) {
                    Flow::Quit => break,
                    Flow::Redraw => self.render()?,
                    Flow::Continue => {}
                }
            }

            while let Some(receiver) = rx.as_mut() {
                match receiver.try_recv() {
                    Ok(layout) => self.apply(layout)?,
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        debug!("layout channel closed");
                        rx = None;
                    }
                }
            }
            // Let other tasks on this runtime (signal handlers) make progress.
            tokio::task::yield_now().await;
        }
        info!("quit requested");
        Ok(())
    }
}

impl<B: Backend> Renderer for TermSession<B> {
    fn render(&mut self) -> Result<()> {
        let layout = &self.layout;
        self.terminal
            .draw(|frame| grid_view::render_layout(frame, frame.area(), layout))
            .map_err(backend_error)?;
        Ok(())
    }

    fn clear(&mut self) {
        self.layout = Layout::new();
    }

    /// Restore the terminal. Only the first call has any effect.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if self.owns_tty {
            disable_raw_mode()?;
            execute!(io::stdout(), LeaveAlternateScreen)?;
        }
        self.terminal.show_cursor().map_err(backend_error)?;
        debug!("terminal session closed");
        Ok(())
    }
}

impl<B: Backend> Drop for TermSession<B> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(error = %err, "failed to restore terminal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use devdash_core::color::Color;
    use ratatui::backend::TestBackend;

    fn session() -> TermSession<TestBackend> {
        TermSession::with_backend(TestBackend::new(60, 10)).unwrap()
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn screen(session: &TermSession<TestBackend>) -> String {
        session
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_default_quit_is_ctrl_c() {
        let s = session();
        assert_eq!(s.quit_key(), QuitKey::Ctrl('c'));
        assert_eq!(s.handle_event(&press(KeyCode::Char('q'), KeyModifiers::NONE)), Flow::Continue);
        assert_eq!(s.handle_event(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)), Flow::Quit);
    }

    #[test]
    fn test_configured_quit_key_and_ctrl_c_both_quit() {
        let mut s = session();
        s.set_quit_key("q").unwrap();
        assert_eq!(s.handle_event(&press(KeyCode::Char('q'), KeyModifiers::NONE)), Flow::Quit);
        assert_eq!(s.handle_event(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)), Flow::Quit);
        assert_eq!(s.handle_event(&press(KeyCode::Char('x'), KeyModifiers::NONE)), Flow::Continue);
    }

    #[test]
    fn test_invalid_quit_key_rejected() {
        let mut s = session();
        assert!(matches!(
            s.set_quit_key("ctrl+q"),
            Err(DashError::ConfigValidation { .. })
        ));
        assert_eq!(s.quit_key(), QuitKey::Ctrl('c'));
    }

    #[test]
    fn test_resize_redraws() {
        assert_eq!(session().handle_event(&Event::Resize(100, 40)), Flow::Redraw);
    }

    #[test]
    fn test_apply_replaces_layout() {
        let mut s = session();
        s.apply(Layout::message_panel("Hello", "first", Color::Default)).unwrap();
        assert!(screen(&s).contains("first"));

        s.apply(Layout::error_panel("second")).unwrap();
        let shown = screen(&s);
        assert!(shown.contains("second"));
        assert!(!shown.contains("first"));
    }

    #[test]
    fn test_clear_empties_retained_layout() {
        let mut s = session();
        s.load(Layout::error_panel("boom"));
        s.clear();
        assert!(s.layout().is_empty());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut s = session();
        s.close().unwrap();
        s.close().unwrap();
        assert!(s.closed);
    }
}
