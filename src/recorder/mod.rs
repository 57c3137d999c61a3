//! Action recorder: captures live input into an ordered event sequence.
//!
//! A capture is started through [`Recorder::start_capture`], which grants at most
//! one outstanding [`CaptureHandle`] at a time. The handle owns the attached
//! input listener and the [`RecordingSession`]; both are released when the
//! capture stops, is cancelled, fails, or the handle is dropped.
//!
//! ```text
//! Recording --key/mouse--> Recording   (event appended, observer notified)
//! Recording --stop-------> Terminated  (sequence returned)
//! Recording --cancel-----> Terminated  (nothing returned)
//! ```

pub mod session;
pub mod source;
pub mod terminal;


pub use session::{RecordingSession, SessionState};
pub use source::{InputListener, InputSource, ScriptedSource, Signal};
pub use terminal::TerminalSource;

use crate::config::keybindings::{self, ControlAction, KeyBinding, RecorderKeybindings};
use crate::input::{InputEvent, RawInput};
use fs2::FileExt;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Errors that can occur while capturing input.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("A recording session is already active")]
    SessionActive,

    #[error("Recording session has already terminated")]
    Terminated,

    #[error("Input source closed before the recording was stopped")]
    SourceClosed,

    #[error("Input source error: {0}")]
    Source(String),

    #[error("Invalid recorder keybinding: {0}")]
    InvalidKeybinding(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a capture ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// User stopped the capture; events in recording order
    Stopped(Vec<InputEvent>),
    /// User cancelled; nothing is to be persisted
    Cancelled,
}

impl CaptureOutcome {
    /// Recorded events; empty when cancelled.
    pub fn into_events(self) -> Vec<InputEvent> {
        match self {
            CaptureOutcome::Stopped(events) => events,
            CaptureOutcome::Cancelled => Vec::new(),
        }
    }

    /// True when there is nothing worth persisting (cancelled or zero events).
    pub fn is_empty(&self) -> bool {
        match self {
            CaptureOutcome::Stopped(events) => events.is_empty(),
            CaptureOutcome::Cancelled => true,
        }
    }
}

/// Grants recording sessions, one at a time.
#[derive(Debug)]
pub struct Recorder {
    active: Arc<AtomicBool>,
    controls: HashMap<KeyBinding, ControlAction>,
    lock_path: Option<PathBuf>,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder {
    /// Recorder with the default stop/cancel chords and no cross-process lock.
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(false)),
            // The default chords are static and covered by the keybinding tests.
            controls: RecorderKeybindings::default()
                .build_action_map()
                .unwrap_or_default(),
            lock_path: None,
        }
    }

    /// Recorder whose stop/cancel chords come from configuration.
    pub fn with_keybindings(keybindings: &RecorderKeybindings) -> Result<Self, RecorderError> {
        let controls = keybindings
            .build_action_map()
            .map_err(RecorderError::InvalidKeybinding)?;
        Ok(Self {
            active: Arc::new(AtomicBool::new(false)),
            controls,
            lock_path: None,
        })
    }

    /// Also hold an exclusive advisory lock on `path` while a session is active,
    /// so separate processes cannot record at the same time.
    pub fn with_lock_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.lock_path = Some(path.into());
        self
    }

    /// True while a capture handle from this recorder is outstanding.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Begins a capture: takes the session gate, then attaches the input source.
    ///
    /// Fails with [`RecorderError::SessionActive`] if another capture is outstanding.
    pub fn start_capture<S: InputSource>(
        &self,
        source: &mut S,
    ) -> Result<CaptureHandle<S::Listener>, RecorderError> {
        let gate = SessionGate::acquire(&self.active, self.lock_path.as_deref())?;
        let listener = source.attach()?;
        info!("Recording started");

        Ok(CaptureHandle {
            session: RecordingSession::new(),
            listener: Some(listener),
            gate: Some(gate),
            controls: self.controls.clone(),
        })
    }
}

/// Active capture. Dropping it releases the listener and the session gate.
pub struct CaptureHandle<L: InputListener> {
    session: RecordingSession,
    listener: Option<L>,
    gate: Option<SessionGate>,
    controls: HashMap<KeyBinding, ControlAction>,
}

impl<L: InputListener> CaptureHandle<L> {
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Events captured so far.
    pub fn events(&self) -> &[InputEvent] {
        self.session.events()
    }

    /// Feeds one signal through the state machine.
    ///
    /// Returns `Some(outcome)` once the capture has terminated. Key presses that
    /// match a stop/cancel chord act as that control and are not recorded.
    pub fn handle_signal(&mut self, signal: Signal) -> Result<Option<CaptureOutcome>, RecorderError> {
        if !self.session.is_recording() {
            return Err(RecorderError::Terminated);
        }

        let control = match &signal {
            Signal::Stop => Some(ControlAction::Stop),
            Signal::Cancel => Some(ControlAction::Cancel),
            Signal::Input(raw) => self.control_for(raw),
        };

        match (control, signal) {
            (Some(ControlAction::Stop), _) => {
                let events = self.session.stop()?;
                self.release();
                info!("Recording stopped with {} event(s)", events.len());
                Ok(Some(CaptureOutcome::Stopped(events)))
            }
            (Some(ControlAction::Cancel), _) => {
                self.session.cancel()?;
                self.release();
                info!("Recording cancelled");
                Ok(Some(CaptureOutcome::Cancelled))
            }
            (None, Signal::Input(raw)) => {
                if let Some(event) = self.session.push_raw(raw)? {
                    debug!("Recorded {}", event);
                }
                Ok(None)
            }
            (None, _) => Ok(None),
        }
    }

    /// Ends the capture, keeping the events recorded so far.
    pub fn stop(mut self) -> Result<Vec<InputEvent>, RecorderError> {
        let outcome = self.handle_signal(Signal::Stop)?;
        Ok(outcome.map(CaptureOutcome::into_events).unwrap_or_default())
    }

    /// Ends the capture, discarding all events.
    pub fn cancel(mut self) -> Result<(), RecorderError> {
        self.handle_signal(Signal::Cancel)?;
        Ok(())
    }

    /// Pulls signals from the listener until the capture terminates.
    ///
    /// `observer` sees the running sequence after every recorded event.
    pub fn run<F>(mut self, mut observer: F) -> Result<CaptureOutcome, RecorderError>
    where
        F: FnMut(&[InputEvent]),
    {
        loop {
            let signal = match self.listener.as_mut() {
                Some(listener) => listener.next_signal()?,
                None => return Err(RecorderError::Terminated),
            };

            let recorded_before = self.session.events().len();
            if let Some(outcome) = self.handle_signal(signal)? {
                return Ok(outcome);
            }
            if self.session.events().len() != recorded_before {
                observer(self.session.events());
            }
        }
    }

    fn control_for(&self, raw: &RawInput) -> Option<ControlAction> {
        if self.controls.is_empty() {
            return None;
        }
        match InputEvent::from_raw(raw.clone()) {
            Some(InputEvent::Key(key)) => keybindings::control_action(&self.controls, &key),
            _ => None,
        }
    }

    fn release(&mut self) {
        // Listener first so input interception ends before the gate reopens.
        self.listener.take();
        self.gate.take();
    }
}

/// Holds the "one active session" slot; released on drop.
#[derive(Debug)]
struct SessionGate {
    active: Arc<AtomicBool>,
    lock: Option<(File, PathBuf)>,
}

impl SessionGate {
    fn acquire(active: &Arc<AtomicBool>, lock_path: Option<&Path>) -> Result<Self, RecorderError> {
        if active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(RecorderError::SessionActive);
        }

        let mut gate = SessionGate {
            active: Arc::clone(active),
            lock: None,
        };

        if let Some(path) = lock_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(path)?;
            if let Err(err) = file.try_lock_exclusive() {
                // Dropping `gate` here reopens the in-process slot.
                return Err(
                    if err.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                        debug!("Recording lock {} is held elsewhere", path.display());
                        RecorderError::SessionActive
                    } else {
                        RecorderError::Io(err)
                    },
                );
            }
            gate.lock = Some((file, path.to_path_buf()));
        }

        Ok(gate)
    }
}

impl Drop for SessionGate {
    fn drop(&mut self) {
        if let Some((file, path)) = self.lock.take() {
            FileExt::unlock(&file).unwrap_or_else(|err| {
                warn!("failed to unlock recording lock {}: {}", path.display(), err)
            });
        }
        self.active.store(false, Ordering::SeqCst);
    }
}
