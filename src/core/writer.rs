//! Typewriter-style output
//!
//! [`AnimatedWriter`] writes a string one character at a time with a fixed
//! delay between characters. Every character is gated on the session's
//! [`Liveness`]: once the session is disposed, emission stops before the next
//! character and any pending delay is cut short.

use std::io;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use unicode_width::UnicodeWidthStr;

use super::surface::{Surface, LINE_BREAK};

/// Shared session liveness flag with a cancellable sleep
#[derive(Clone, Debug)]
pub struct Liveness {
    inner: Arc<LivenessInner>,
}

#[derive(Debug)]
struct LivenessInner {
    active: Mutex<bool>,
    wake: Condvar,
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    /// Create an active flag
    pub fn new() -> Self {
        Self {
            inner: Arc::new(LivenessInner {
                active: Mutex::new(true),
                wake: Condvar::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        // A panicking holder cannot leave the flag half-written
        self.inner.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Check if the session is still alive
    pub fn is_active(&self) -> bool {
        *self.lock()
    }

    /// Mark the session as torn down and wake every pending [`pause`](Self::pause)
    pub fn dispose(&self) {
        let mut active = self.lock();
        *active = false;
        self.inner.wake.notify_all();
    }

    /// Sleep for `duration` unless disposed first.
    ///
    /// Returns `true` if the session is still active afterwards.
    pub fn pause(&self, duration: Duration) -> bool {
        if duration.is_zero() {
            return self.is_active();
        }

        let deadline = Instant::now() + duration;
        let mut active = self.lock();
        loop {
            if !*active {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            active = match self.inner.wake.wait_timeout(active, deadline - now) {
                Ok((guard, _)) => guard,
                Err(e) => e.into_inner().0,
            };
        }
    }
}

/// Result of an [`AnimatedWriter::emit`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emitted {
    /// Every character and the trailing line break were written
    Complete,
    /// The session was disposed part way through
    Aborted,
}

/// Character-by-character writer
#[derive(Clone, Debug)]
pub struct AnimatedWriter {
    liveness: Liveness,
}

impl AnimatedWriter {
    pub fn new(liveness: Liveness) -> Self {
        Self { liveness }
    }

    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    /// Write `text` followed by a line break, pausing `delay` after each
    /// character. With `center`, the text is left-padded to sit in the middle
    /// of the surface.
    pub fn emit<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        text: &str,
        delay: Duration,
        center: bool,
    ) -> io::Result<Emitted> {
        let padding = if center {
            center_padding(surface.columns(), text)
        } else {
            0
        };

        let mut buf = [0u8; 4];
        let chars = std::iter::repeat(' ').take(padding).chain(text.chars());
        for ch in chars {
            if !self.liveness.is_active() {
                return Ok(Emitted::Aborted);
            }
            surface.write(ch.encode_utf8(&mut buf))?;
            if !self.liveness.pause(delay) {
                return Ok(Emitted::Aborted);
            }
        }

        if !self.liveness.is_active() {
            return Ok(Emitted::Aborted);
        }
        surface.write(LINE_BREAK)?;
        Ok(Emitted::Complete)
    }
}

/// Number of spaces that centers `text` in `columns` cells.
///
/// Unknown or negative widths count as zero; text wider than the surface gets
/// no padding and is never truncated.
pub fn center_padding(columns: i32, text: &str) -> usize {
    let columns = usize::try_from(columns).unwrap_or(0);
    columns.saturating_sub(text.width()) / 2
}
