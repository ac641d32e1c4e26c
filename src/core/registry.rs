//! Mode registry
//!
//! The fixed catalog of selectable modes. Built once at startup and never
//! modified afterwards; the session only ever *selects* from it.

use serde::{Deserialize, Serialize};

use crate::config::{Color, ConfigError};

/// A selectable mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    /// Unique name, matched case-insensitively
    pub name: String,
    /// One-line description shown by `modes`
    pub description: String,
    /// Display color for the mode name and banner text
    pub color: Color,
}

impl Mode {
    pub fn new(name: &str, description: &str, color: Color) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            color,
        }
    }

    /// Case-insensitive name comparison
    pub fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Ordered, read-only collection of modes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeRegistry {
    modes: Vec<Mode>,
}

impl ModeRegistry {
    /// Create a registry. Names must be non-empty and unique ignoring case.
    pub fn new(modes: Vec<Mode>) -> Result<Self, ConfigError> {
        if modes.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }
        for (i, mode) in modes.iter().enumerate() {
            let name = mode.name.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(ConfigError::InvalidModeName(mode.name.clone()));
            }
            if modes[..i].iter().any(|earlier| earlier.matches(&mode.name)) {
                return Err(ConfigError::DuplicateMode(mode.name.clone()));
            }
        }
        Ok(Self { modes })
    }

    /// The built-in catalog
    pub fn builtin() -> Self {
        Self {
            modes: vec![
                Mode::new("LAB42", "Bio-Research Terminal", Color::new(58, 134, 255)),
                Mode::new("TOP-TRADERS", "Market Analysis System", Color::new(0, 255, 157)),
                Mode::new("X-MANAGER", "System Control Interface", Color::new(255, 95, 95)),
                Mode::new("AI-ASSISTANT", "Neural Network Terminal", Color::new(177, 140, 255)),
            ],
        }
    }

    /// All modes in insertion order
    pub fn list(&self) -> &[Mode] {
        &self.modes
    }

    /// Find a mode by name, ignoring case
    pub fn find(&self, name: &str) -> Option<&Mode> {
        self.modes.iter().find(|mode| mode.matches(name))
    }

    /// The first mode; a registry is never empty
    pub fn first(&self) -> &Mode {
        &self.modes[0]
    }

    /// Whether `mode` belongs to this registry
    pub fn contains(&self, mode: &Mode) -> bool {
        self.modes.iter().any(|m| m == mode)
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let registry = ModeRegistry::builtin();
        let names: Vec<&str> = registry.list().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["LAB42", "TOP-TRADERS", "X-MANAGER", "AI-ASSISTANT"]);
        assert_eq!(registry.first().name, "LAB42");
    }

    #[test]
    fn test_find_any_case() {
        let registry = ModeRegistry::builtin();
        for mode in registry.list() {
            assert_eq!(registry.find(&mode.name), Some(mode));
            assert_eq!(registry.find(&mode.name.to_lowercase()), Some(mode));

            let mixed: String = mode
                .name
                .chars()
                .enumerate()
                .map(|(i, c)| if i % 2 == 0 { c.to_ascii_lowercase() } else { c })
                .collect();
            assert_eq!(registry.find(&mixed), Some(mode));
        }
    }

    #[test]
    fn test_find_missing() {
        let registry = ModeRegistry::builtin();
        assert_eq!(registry.find("nonexistent"), None);
        assert_eq!(registry.find(""), None);
        // Exact match only, no prefixes
        assert_eq!(registry.find("LAB"), None);
    }

    #[test]
    fn test_new_rejects_bad_catalogs() {
        assert!(matches!(ModeRegistry::new(Vec::new()), Err(ConfigError::EmptyRegistry)));

        let white = Color::WHITE;
        let dup = vec![Mode::new("A", "x", white), Mode::new("a", "y", white)];
        assert!(matches!(ModeRegistry::new(dup), Err(ConfigError::DuplicateMode(_))));

        let spaced = vec![Mode::new("TWO WORDS", "x", white)];
        assert!(matches!(ModeRegistry::new(spaced), Err(ConfigError::InvalidModeName(_))));
    }
}
