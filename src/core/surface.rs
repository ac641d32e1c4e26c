//! Output surface abstraction
//!
//! The session engine never talks to the terminal directly. Everything it
//! displays goes through a [`Surface`], which the host implements over a real
//! terminal (see `ui::renderer::TerminalSurface`) and tests implement over a
//! plain string buffer.

use std::io;

use crate::config::Color;

/// Line break written by the engine (raw mode needs the carriage return)
pub const LINE_BREAK: &str = "\r\n";

/// Erase the character left of the cursor
pub const ERASE_CHAR: &str = "\x08 \x08";

/// A text-rendering target
pub trait Surface {
    /// Append literal text at the cursor
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Append text rendered in `color`, then restore the default color
    fn write_styled(&mut self, text: &str, color: Color) -> io::Result<()>;

    /// Erase all visible content and move the cursor to the origin
    fn clear(&mut self) -> io::Result<()>;

    /// Current width in character cells. May be zero or negative when the
    /// width is unknown.
    fn columns(&self) -> i32;

    /// Set the default text color
    fn set_foreground(&mut self, _color: Color) -> io::Result<()> {
        Ok(())
    }

    /// Set the window title, where the host has one
    fn set_title(&mut self, _title: &str) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory surface for tests

    use super::*;

    /// A single recorded surface call
    #[derive(Debug, Clone, PartialEq)]
    pub enum SurfaceOp {
        Write(String),
        Styled(String, Color),
        Clear,
        Foreground(Color),
        Title(String),
    }

    /// Records every call; `output` holds all text written since the last clear
    #[derive(Debug, Clone)]
    pub struct RecordingSurface {
        pub ops: Vec<SurfaceOp>,
        pub output: String,
        pub columns: i32,
    }

    impl RecordingSurface {
        pub fn new(columns: i32) -> Self {
            Self {
                ops: Vec::new(),
                output: String::new(),
                columns,
            }
        }

        pub fn clear_count(&self) -> usize {
            self.ops.iter().filter(|op| **op == SurfaceOp::Clear).count()
        }

        /// Text written to the surface across all clears
        pub fn transcript(&self) -> String {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    SurfaceOp::Write(text) | SurfaceOp::Styled(text, _) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn styled(&self) -> Vec<(String, Color)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    SurfaceOp::Styled(text, color) => Some((text.clone(), *color)),
                    _ => None,
                })
                .collect()
        }

        pub fn reset(&mut self) {
            self.ops.clear();
            self.output.clear();
        }
    }

    impl Surface for RecordingSurface {
        fn write(&mut self, text: &str) -> io::Result<()> {
            self.output.push_str(text);
            self.ops.push(SurfaceOp::Write(text.to_string()));
            Ok(())
        }

        fn write_styled(&mut self, text: &str, color: Color) -> io::Result<()> {
            self.output.push_str(text);
            self.ops.push(SurfaceOp::Styled(text.to_string(), color));
            Ok(())
        }

        fn clear(&mut self) -> io::Result<()> {
            self.output.clear();
            self.ops.push(SurfaceOp::Clear);
            Ok(())
        }

        fn columns(&self) -> i32 {
            self.columns
        }

        fn set_foreground(&mut self, color: Color) -> io::Result<()> {
            self.ops.push(SurfaceOp::Foreground(color));
            Ok(())
        }

        fn set_title(&mut self, title: &str) -> io::Result<()> {
            self.ops.push(SurfaceOp::Title(title.to_string()));
            Ok(())
        }
    }
}
