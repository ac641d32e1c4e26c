//! Session thread
//!
//! Runs a [`SessionController`] on its own thread so that banner animation
//! and switch pauses never block the host's event loop. The host forwards
//! keys through a channel and tears the session down through the shared
//! [`Liveness`] flag, which also cuts any pending pause short.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, error, info};

use super::session::{KeyInput, SessionController, SessionState};
use super::surface::Surface;
use super::writer::Liveness;

/// Events delivered to the session thread
#[derive(Debug, Clone, Copy)]
pub enum SessionEvent {
    /// A key and the moment it was typed
    Key(KeyInput, Instant),
}

/// Host-side handle to a running session
pub struct SessionHandle<S: Surface + Send + 'static> {
    tx: Option<Sender<SessionEvent>>,
    liveness: Liveness,
    thread: Option<JoinHandle<io::Result<S>>>,
}

impl<S: Surface + Send + 'static> SessionHandle<S> {
    /// Boot `controller` on a new thread
    pub fn spawn(controller: SessionController<S>) -> io::Result<Self> {
        let liveness = controller.liveness().clone();
        let (tx, rx) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("session".to_string())
            .spawn(move || run_session(controller, rx))?;

        Ok(Self {
            tx: Some(tx),
            liveness,
            thread: Some(thread),
        })
    }

    /// Forward a key typed now. Returns `false` once the session has ended.
    pub fn send_key(&self, key: KeyInput) -> bool {
        match &self.tx {
            Some(tx) => tx.send(SessionEvent::Key(key, Instant::now())).is_ok(),
            None => false,
        }
    }

    /// Check if the session is still running
    pub fn is_running(&self) -> bool {
        self.liveness.is_active()
            && self
                .thread
                .as_ref()
                .map_or(false, |thread| !thread.is_finished())
    }

    /// Dispose the session and wait for its thread, returning the surface
    pub fn shutdown(mut self) -> io::Result<S> {
        self.stop()
    }

    fn stop(&mut self) -> io::Result<S> {
        self.liveness.dispose();
        self.tx = None;

        match self.thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "session thread panicked"))?,
            None => Err(io::Error::new(io::ErrorKind::Other, "session already stopped")),
        }
    }
}

impl<S: Surface + Send + 'static> Drop for SessionHandle<S> {
    fn drop(&mut self) {
        if self.thread.is_some() {
            let _ = self.stop();
        }
    }
}

fn run_session<S: Surface>(
    mut controller: SessionController<S>,
    rx: Receiver<SessionEvent>,
) -> io::Result<S> {
    if let Err(e) = drive(&mut controller, &rx) {
        error!("Session stopped on surface error: {}", e);
        controller.dispose();
        return Err(e);
    }
    info!("Session thread exiting");
    Ok(controller.into_surface())
}

fn drive<S: Surface>(
    controller: &mut SessionController<S>,
    rx: &Receiver<SessionEvent>,
) -> io::Result<()> {
    controller.boot()?;

    // Ends when the host drops its sender
    while let Ok(event) = rx.recv() {
        match event {
            SessionEvent::Key(key, typed_at) => {
                if controller.accepts(typed_at) {
                    controller.handle_key(key)?;
                } else {
                    debug!("Dropped {:?} typed during {:?}", key, controller.state());
                }
            }
        }
        if controller.state() == SessionState::Disposed {
            break;
        }
    }
    controller.dispose();
    Ok(())
}
