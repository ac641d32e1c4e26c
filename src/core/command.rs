//! Command interpreter
//!
//! Turns a submitted input line into an [`Action`]. Two commands exist,
//! `modes` and `switch <name>`; everything else is tolerated and just gets a
//! fresh prompt.

use thiserror::Error;

use super::registry::{Mode, ModeRegistry};

/// Errors reported inline to the user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("invalid mode")]
    InvalidMode { requested: String },
}

impl CommandError {
    /// Text shown on the surface
    pub fn user_message(&self) -> &'static str {
        match self {
            CommandError::InvalidMode { .. } => {
                "Invalid mode. Type \"modes\" to see available modes."
            }
        }
    }
}

/// Outcome of interpreting one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing to do beyond a fresh prompt
    Reprompt,
    /// List every mode, in registry order
    ListModes(Vec<Mode>),
    /// Change the current mode
    SwitchMode(Mode),
    /// Report an error and stay in the current mode
    Error(CommandError),
}

/// Interpret a submitted line against `registry`.
///
/// The line is trimmed and its keyword matched ignoring case. `modes` must be
/// the whole line. `switch` must be followed by a single space; the mode name
/// is the next space-delimited token, so any further tokens are ignored.
pub fn interpret(line: &str, registry: &ModeRegistry) -> Action {
    let trimmed = line.trim();
    let lowered = trimmed.to_lowercase();

    if lowered == "modes" {
        return Action::ListModes(registry.list().to_vec());
    }
    if !lowered.starts_with("switch ") {
        return Action::Reprompt;
    }

    // Empty when the keyword is followed by more than one space
    let name = trimmed.split(' ').nth(1).unwrap_or_default();
    match registry.find(name) {
        Some(mode) => Action::SwitchMode(mode.clone()),
        None => Action::Error(CommandError::InvalidMode {
            requested: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ModeRegistry {
        ModeRegistry::builtin()
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(interpret("", &registry()), Action::Reprompt);
        assert_eq!(interpret("   ", &registry()), Action::Reprompt);
        assert_eq!(interpret("\t ", &registry()), Action::Reprompt);
    }

    #[test]
    fn test_modes() {
        let registry = registry();
        let expected = Action::ListModes(registry.list().to_vec());

        assert_eq!(interpret("modes", &registry), expected);
        assert_eq!(interpret("MODES", &registry), expected);
        assert_eq!(interpret("  Modes  ", &registry), expected);
    }

    #[test]
    fn test_modes_must_be_whole_line() {
        let registry = registry();
        assert_eq!(interpret("modes please", &registry), Action::Reprompt);
        assert_eq!(interpret("modes\tall", &registry), Action::Reprompt);
    }

    #[test]
    fn test_modes_is_repeatable() {
        let registry = registry();
        assert_eq!(interpret("modes", &registry), interpret("modes", &registry));
    }

    #[test]
    fn test_switch() {
        let registry = registry();
        let lab = registry.find("LAB42").unwrap().clone();
        let manager = registry.find("X-MANAGER").unwrap().clone();

        assert_eq!(interpret("switch lab42", &registry), Action::SwitchMode(lab.clone()));
        assert_eq!(interpret("SWITCH LAB42", &registry), Action::SwitchMode(lab.clone()));
        assert_eq!(interpret("  switch Lab42  ", &registry), Action::SwitchMode(lab));
        assert_eq!(
            interpret("switch x-manager now", &registry),
            Action::SwitchMode(manager)
        );
    }

    #[test]
    fn test_switch_invalid() {
        let action = interpret("switch nope", &registry());
        assert_eq!(
            action,
            Action::Error(CommandError::InvalidMode {
                requested: "nope".to_string()
            })
        );
        if let Action::Error(err) = action {
            assert_eq!(err.to_string(), "invalid mode");
            assert!(err.user_message().starts_with("Invalid mode."));
        }
    }

    #[test]
    fn test_switch_splits_on_single_spaces() {
        let registry = registry();

        // The token after the first space is empty
        assert_eq!(
            interpret("switch  lab42", &registry),
            Action::Error(CommandError::InvalidMode {
                requested: String::new()
            })
        );
        // A tab does not separate the keyword
        assert_eq!(interpret("switch\tlab42", &registry), Action::Reprompt);
        assert_eq!(
            interpret("switch lab42\tnow", &registry),
            Action::Error(CommandError::InvalidMode {
                requested: "lab42\tnow".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_commands_reprompt() {
        let registry = registry();
        assert_eq!(interpret("help", &registry), Action::Reprompt);
        assert_eq!(interpret("switch", &registry), Action::Reprompt);
        assert_eq!(interpret("switchlab42", &registry), Action::Reprompt);
        assert_eq!(interpret("ls -la", &registry), Action::Reprompt);
    }
}
