//! Terminal renderer using crossterm
//!
//! [`Renderer`] owns terminal setup and teardown on the host thread.
//! [`TerminalSurface`] is the [`Surface`] the session thread writes through.

use std::io::{self, Write};

use crossterm::{
    cursor::{MoveTo, SetCursorStyle, Show},
    execute, queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use tracing::{debug, info};

use crate::config::{Color, Theme};
use crate::core::surface::Surface;

/// Terminal setup and teardown
pub struct Renderer {
    /// Whether the terminal has been initialized
    initialized: bool,
    theme: Theme,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            initialized: false,
            theme,
        }
    }

    /// Initialize the terminal for rendering
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        // From here on cleanup has something to undo
        self.initialized = true;

        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            SetBackgroundColor(self.theme.background.to_crossterm()),
            Clear(ClearType::All),
            MoveTo(0, 0),
            SetCursorStyle::BlinkingBlock,
            Show
        )?;

        // Cursor color (OSC 12)
        write!(stdout, "\x1b]12;{}\x07", self.theme.cursor)?;
        stdout.flush()?;

        info!("Terminal initialized");
        Ok(())
    }

    /// Cleanup the terminal
    pub fn cleanup(&mut self) -> io::Result<()> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;

        let mut stdout = io::stdout();

        // Reset cursor color (OSC 112)
        write!(stdout, "\x1b]112\x07")?;

        let _ = execute!(stdout, ResetColor, SetAttribute(Attribute::Reset));
        let _ = execute!(stdout, SetCursorStyle::DefaultUserShape, Show);
        let _ = execute!(stdout, LeaveAlternateScreen);
        let _ = stdout.flush();

        // Disable raw mode - this is the most important part
        terminal::disable_raw_mode()?;
        debug!("Terminal restored");
        Ok(())
    }

    /// Get terminal size
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Where the surface width comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// Query the real terminal on every call, so resizes apply immediately
    Terminal,
    #[allow(dead_code)]
    Fixed(i32),
}

/// A [`Surface`] over any byte sink, normally stdout
pub struct TerminalSurface<W: Write> {
    out: W,
    width: Width,
    foreground: Color,
    background: Color,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout(theme: &Theme) -> Self {
        Self::new(io::stdout(), Width::Terminal, theme)
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, width: Width, theme: &Theme) -> Self {
        Self {
            out,
            width,
            foreground: Color::WHITE,
            background: theme.background,
        }
    }

    #[allow(dead_code)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn write(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text))?;
        self.out.flush()
    }

    fn write_styled(&mut self, text: &str, color: Color) -> io::Result<()> {
        queue!(
            self.out,
            SetForegroundColor(color.to_crossterm()),
            Print(text),
            SetForegroundColor(self.foreground.to_crossterm())
        )?;
        self.out.flush()
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            SetBackgroundColor(self.background.to_crossterm()),
            Clear(ClearType::All),
            Clear(ClearType::Purge),
            MoveTo(0, 0)
        )?;
        self.out.flush()
    }

    fn columns(&self) -> i32 {
        match self.width {
            Width::Terminal => Renderer::size().map(|(cols, _)| i32::from(cols)).unwrap_or(0),
            Width::Fixed(cols) => cols,
        }
    }

    fn set_foreground(&mut self, color: Color) -> io::Result<()> {
        self.foreground = color;
        queue!(self.out, SetForegroundColor(color.to_crossterm()))?;
        self.out.flush()
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        queue!(self.out, SetTitle(title))?;
        self.out.flush()
    }
}
