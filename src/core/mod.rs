//! Core session engine.
//!
//! This module contains everything with state or timing, independent of any
//! real terminal:
//!
//! - **registry**: The fixed catalog of selectable modes
//! - **surface**: The output target the engine drives
//! - **writer**: Typewriter-paced output and the session liveness flag
//! - **command**: Interpreter for the `modes` / `switch <mode>` commands
//! - **session**: Session state machine (boot, input, mode switch, teardown)
//! - **runner**: Runs a session on its own thread, fed by host key events
//!
//! # Architecture
//!
//! ```text
//! SessionHandle (host side)
//! └── session thread
//!     └── SessionController
//!         ├── ModeRegistry
//!         ├── AnimatedWriter ── Liveness
//!         └── Surface
//! ```

pub mod command;
pub mod registry;
pub mod runner;
pub mod session;
pub mod surface;
pub mod writer;
