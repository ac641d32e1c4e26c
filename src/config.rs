//! Configuration and color management for modeterm.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.modeterm/config.toml`
//! - The built-in mode catalog and user-defined replacements
//! - Typewriter pacing and theme colors
//!
//! # Configuration File
//!
//! The configuration file is located at `~/.modeterm/config.toml`:
//!
//! ```toml
//! # Mode selected at startup
//! default_mode = "LAB42"
//! prompt = "> "
//!
//! [pacing]
//! title_delay_ms = 20
//! rule_delay_ms = 10
//! text_delay_ms = 15
//! switch_delay_ms = 500
//!
//! [theme]
//! background = "#0B132B"
//! cursor = "#5DE2FF"
//! notice = "#FFD166"
//! error = "#FF4A4A"
//!
//! # Replaces the built-in modes when present
//! [[modes]]
//! name = "LAB42"
//! description = "Bio-Research Terminal"
//! color = "#3A86FF"
//! ```

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::registry::{Mode, ModeRegistry};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine config path")]
    NoHomeDir,

    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    #[error("Invalid mode name: {0:?}")]
    InvalidModeName(String),

    #[error("Mode list is empty")]
    EmptyRegistry,

    #[error("Mode defined twice: {0}")]
    DuplicateMode(String),
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mode selected at startup
    pub default_mode: Option<String>,
    /// Prompt marker written after every command
    pub prompt: String,
    /// Typewriter timing
    pub pacing: Pacing,
    /// Fixed colors that do not follow the current mode
    pub theme: Theme,
    /// User-defined modes (built-in catalog when empty)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modes: Vec<Mode>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_mode: None,
            prompt: "> ".to_string(),
            pacing: Pacing::default(),
            theme: Theme::default(),
            modes: Vec::new(),
        }
    }
}

/// Per-character delays used by the banner, and the mode switch pause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    pub title_delay_ms: u64,
    pub rule_delay_ms: u64,
    pub text_delay_ms: u64,
    pub switch_delay_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            title_delay_ms: 20,
            rule_delay_ms: 10,
            text_delay_ms: 15,
            switch_delay_ms: 500,
        }
    }
}

impl Pacing {
    /// No delays at all (`--fast`)
    pub const fn instant() -> Self {
        Self {
            title_delay_ms: 0,
            rule_delay_ms: 0,
            text_delay_ms: 0,
            switch_delay_ms: 0,
        }
    }

    pub fn title_delay(&self) -> Duration {
        Duration::from_millis(self.title_delay_ms)
    }

    pub fn rule_delay(&self) -> Duration {
        Duration::from_millis(self.rule_delay_ms)
    }

    pub fn text_delay(&self) -> Duration {
        Duration::from_millis(self.text_delay_ms)
    }

    pub fn switch_delay(&self) -> Duration {
        Duration::from_millis(self.switch_delay_ms)
    }
}

/// Theme colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background: Color,
    pub cursor: Color,
    /// "Switching mode..." notice
    pub notice: Color,
    /// Inline error messages
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::new(11, 19, 43),
            cursor: Color::new(93, 226, 255),
            notice: Color::new(255, 209, 102),
            error: Color::new(255, 74, 74),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Ignoring config file: {}", e);
                Self::default()
            }
        }
    }

    /// Load configuration from file, `None` when no file exists
    pub fn try_load() -> Result<Option<Self>, ConfigError> {
        let path = Self::get_config_path().ok_or(ConfigError::NoHomeDir)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let config = Self::parse(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(Some(config))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::get_config_path().ok_or(ConfigError::NoHomeDir)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Get config file path
    pub fn get_config_path() -> Option<PathBuf> {
        data_dir().map(|dir| dir.join("config.toml"))
    }

    /// Build the mode registry, falling back to the built-in modes when the
    /// configured list is unusable
    pub fn registry(&self) -> ModeRegistry {
        if self.modes.is_empty() {
            return ModeRegistry::builtin();
        }
        match ModeRegistry::new(self.modes.clone()) {
            Ok(registry) => registry,
            Err(e) => {
                warn!("Ignoring configured modes: {}", e);
                ModeRegistry::builtin()
            }
        }
    }

    /// Resolve the startup mode. An explicit request must exist; the
    /// configured default falls back to the first mode.
    pub fn initial_mode(
        &self,
        registry: &ModeRegistry,
        requested: Option<&str>,
    ) -> Result<Mode, ConfigError> {
        if let Some(name) = requested {
            return registry
                .find(name)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownMode(name.to_string()));
        }
        if let Some(name) = self.default_mode.as_deref() {
            match registry.find(name) {
                Some(mode) => return Ok(mode.clone()),
                None => warn!("Unknown default_mode {:?}, using {}", name, registry.first().name),
            }
        }
        Ok(registry.first().clone())
    }
}

/// Color definition (RGB)
///
/// Serialized as a `#RRGGBB` string. Anything that is not valid hex reads as
/// white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Convert to crossterm Color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

impl From<String> for Color {
    fn from(hex: String) -> Self {
        Self::from_hex(&hex).unwrap_or(Self::WHITE)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// `~/.modeterm`
pub fn data_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".modeterm"))
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}
