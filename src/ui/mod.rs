//! Terminal-facing glue.
//!
//! - **renderer**: Terminal setup/teardown and the crossterm-backed surface
//! - **keymapper**: crossterm key events to session keys and host actions

pub mod keymapper;
pub mod renderer;

pub use keymapper::{HostInput, KeyMapper};
pub use renderer::{Renderer, TerminalSurface};
