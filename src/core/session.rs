//! Session controller
//!
//! Owns the current mode and the input line, and drives the surface through
//! the session lifecycle:
//!
//! ```text
//! Booting ──banner done──▶ Ready ──switch──▶ AwaitingSwitch ──banner done──▶ Ready
//!    │                       │                      │
//!    └───────────────────────┴──────dispose()───────┴──────▶ Disposed
//! ```
//!
//! Keys are only processed in `Ready`. Keys that were typed while a banner or
//! a switch was still running are dropped, see [`SessionController::accepts`].

use std::io;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::{Config, Pacing, Theme};

use super::command::{interpret, Action};
use super::registry::{Mode, ModeRegistry};
use super::surface::{Surface, ERASE_CHAR, LINE_BREAK};
use super::writer::{AnimatedWriter, Emitted, Liveness};

/// Width of the rule under the banner title
const RULE_WIDTH: usize = 40;

/// A key as seen by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Enter,
    Backspace,
    Char(char),
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Booting,
    Ready,
    AwaitingSwitch,
    Disposed,
}

/// Session settings taken from the configuration
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub pacing: Pacing,
    pub theme: Theme,
    pub prompt: String,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            pacing: config.pacing,
            theme: config.theme,
            prompt: config.prompt.clone(),
        }
    }
}

/// One animated banner line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerLine {
    pub text: String,
    pub delay: Duration,
    pub center: bool,
}

impl BannerLine {
    fn centered(text: String, delay: Duration) -> Self {
        Self { text, delay, center: true }
    }

    fn blank() -> Self {
        Self {
            text: String::new(),
            delay: Duration::ZERO,
            center: false,
        }
    }
}

/// The introductory banner for `mode`
pub fn banner(mode: &Mode, pacing: &Pacing) -> Vec<BannerLine> {
    vec![
        BannerLine::centered(
            format!("{} - {}", mode.name, mode.description),
            pacing.title_delay(),
        ),
        BannerLine::centered("━".repeat(RULE_WIDTH), pacing.rule_delay()),
        BannerLine::blank(),
        BannerLine::centered("▲ Initializing systems...".to_string(), pacing.text_delay()),
        BannerLine::centered(
            format!("▲ Loading {} modules...", mode.name.to_lowercase()),
            pacing.text_delay(),
        ),
        BannerLine::blank(),
        BannerLine::centered(
            "Type \"modes\" to see available modes".to_string(),
            pacing.text_delay(),
        ),
        BannerLine::centered(
            "Type \"switch <mode>\" to change modes".to_string(),
            pacing.text_delay(),
        ),
        BannerLine::blank(),
    ]
}

/// A single interactive session bound to one surface
pub struct SessionController<S: Surface> {
    surface: S,
    registry: ModeRegistry,
    current: Mode,
    input: String,
    state: SessionState,
    writer: AnimatedWriter,
    settings: SessionSettings,
    /// When the session last entered `Ready`
    ready_since: Option<Instant>,
}

impl<S: Surface> SessionController<S> {
    /// Create a session. `initial` must belong to `registry`.
    pub fn new(
        surface: S,
        registry: ModeRegistry,
        initial: Mode,
        settings: SessionSettings,
        liveness: Liveness,
    ) -> Self {
        debug_assert!(registry.contains(&initial));
        Self {
            surface,
            registry,
            current: initial,
            input: String::new(),
            state: SessionState::Booting,
            writer: AnimatedWriter::new(liveness),
            settings,
            ready_since: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_mode(&self) -> &Mode {
        &self.current
    }

    #[allow(dead_code)]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[allow(dead_code)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn liveness(&self) -> &Liveness {
        self.writer.liveness()
    }

    /// Whether a key typed at `typed_at` should be processed
    pub fn accepts(&self, typed_at: Instant) -> bool {
        self.state == SessionState::Ready
            && self.liveness().is_active()
            && self.ready_since.map_or(false, |since| typed_at >= since)
    }

    /// Tear the session down. Pending output stops before its next character.
    pub fn dispose(&mut self) {
        if self.state != SessionState::Disposed {
            info!("Session disposed in mode {}", self.current.name);
        }
        self.writer.liveness().dispose();
        self.state = SessionState::Disposed;
        self.input.clear();
    }

    /// Play the banner for the current mode and show the prompt
    pub fn boot(&mut self) -> io::Result<()> {
        if !self.check_alive() {
            return Ok(());
        }
        self.state = SessionState::Booting;
        info!("Booting mode {}", self.current.name);

        self.surface.set_title(&format!("modeterm - {}", self.current.name))?;
        self.surface.set_foreground(self.current.color)?;

        for line in banner(&self.current, &self.settings.pacing) {
            let emitted = self
                .writer
                .emit(&mut self.surface, &line.text, line.delay, line.center)?;
            if emitted == Emitted::Aborted {
                self.dispose();
                return Ok(());
            }
        }

        if !self.check_alive() {
            return Ok(());
        }
        self.surface.write(&self.settings.prompt)?;
        self.state = SessionState::Ready;
        self.ready_since = Some(Instant::now());
        Ok(())
    }

    /// Process one key. Ignored unless the session is `Ready`.
    pub fn handle_key(&mut self, key: KeyInput) -> io::Result<()> {
        if !self.check_alive() {
            return Ok(());
        }
        if self.state != SessionState::Ready {
            debug!("Dropping {:?} in state {:?}", key, self.state);
            return Ok(());
        }

        match key {
            KeyInput::Char(ch) if ch.is_control() => {
                debug!("Ignoring control character {:?}", ch);
                Ok(())
            }
            KeyInput::Char(ch) => {
                self.input.push(ch);
                let mut buf = [0u8; 4];
                self.surface.write(ch.encode_utf8(&mut buf))
            }
            KeyInput::Backspace => {
                if self.input.pop().is_some() {
                    self.surface.write(ERASE_CHAR)?;
                }
                Ok(())
            }
            KeyInput::Enter => {
                let line = std::mem::take(&mut self.input);
                self.submit(&line)
            }
        }
    }

    fn submit(&mut self, line: &str) -> io::Result<()> {
        let action = interpret(line, &self.registry);
        debug!("Line {:?} -> {:?}", line, action);

        match action {
            Action::Reprompt => self.prompt(),
            Action::ListModes(modes) => {
                self.surface.write(LINE_BREAK)?;
                for mode in &modes {
                    self.surface.write_styled(&mode.name, mode.color)?;
                    self.surface.write(&format!(" - {}{}", mode.description, LINE_BREAK))?;
                }
                self.prompt()
            }
            Action::Error(err) => {
                info!("Rejected {:?}: {}", line, err);
                self.surface.write(LINE_BREAK)?;
                self.surface
                    .write_styled(err.user_message(), self.settings.theme.error)?;
                self.surface.write(LINE_BREAK)?;
                self.prompt()
            }
            Action::SwitchMode(mode) => self.switch_to(mode),
        }
    }

    fn switch_to(&mut self, mode: Mode) -> io::Result<()> {
        self.state = SessionState::AwaitingSwitch;
        info!("Switching mode {} -> {}", self.current.name, mode.name);

        self.surface.write(LINE_BREAK)?;
        self.surface
            .write_styled("Switching mode...", self.settings.theme.notice)?;
        self.surface.write(LINE_BREAK)?;

        if !self.writer.liveness().pause(self.settings.pacing.switch_delay()) {
            self.dispose();
            return Ok(());
        }

        self.surface.clear()?;
        self.current = mode;
        self.boot()
    }

    fn prompt(&mut self) -> io::Result<()> {
        self.surface.write(LINE_BREAK)?;
        self.surface.write(&self.settings.prompt)
    }

    /// Move to `Disposed` if the liveness flag was cleared from outside
    fn check_alive(&mut self) -> bool {
        if self.state == SessionState::Disposed {
            return false;
        }
        if !self.writer.liveness().is_active() {
            self.dispose();
            return false;
        }
        true
    }
}
