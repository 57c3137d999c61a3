//! Input source abstraction.
//!
//! An [`InputSource`] hands out an [`InputListener`] when a capture starts. The
//! listener holds whatever interception the platform needs (raw terminal mode,
//! grabbed devices, registered callbacks) and gives it back when dropped, so the
//! release happens on stop, cancel and error paths alike.

use super::RecorderError;
use crate::input::RawInput;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Notification delivered by a listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// A key or mouse press to record
    Input(RawInput),
    /// The user asked to stop and keep the recording
    Stop,
    /// The user asked to discard the recording
    Cancel,
}

/// Something that can begin intercepting keyboard and mouse input.
pub trait InputSource {
    type Listener: InputListener;

    /// Starts intercepting input. Interception lasts until the listener is dropped.
    fn attach(&mut self) -> Result<Self::Listener, RecorderError>;
}

/// Active interception. Dropping it releases the interception.
pub trait InputListener {
    /// Blocks until the next notification is available.
    fn next_signal(&mut self) -> Result<Signal, RecorderError>;
}

/// Source that replays a fixed list of signals. Used for tests and for feeding
/// previously captured input through the recorder.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    signals: VecDeque<Signal>,
    attached: Arc<AtomicBool>,
}

impl ScriptedSource {
    pub fn new(signals: impl IntoIterator<Item = Signal>) -> Self {
        Self {
            signals: signals.into_iter().collect(),
            attached: Arc::new(AtomicBool::new(false)),
        }
    }

    /// True while a listener from this source is alive.
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    /// Shared flag mirroring [`Self::is_attached`], observable after the source moved.
    pub fn attached_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.attached)
    }
}

impl InputSource for ScriptedSource {
    type Listener = ScriptedListener;

    fn attach(&mut self) -> Result<Self::Listener, RecorderError> {
        if self.attached.swap(true, Ordering::SeqCst) {
            return Err(RecorderError::Source("scripted source already attached".into()));
        }
        Ok(ScriptedListener {
            signals: std::mem::take(&mut self.signals),
            attached: Arc::clone(&self.attached),
        })
    }
}

#[derive(Debug)]
pub struct ScriptedListener {
    signals: VecDeque<Signal>,
    attached: Arc<AtomicBool>,
}

impl InputListener for ScriptedListener {
    fn next_signal(&mut self) -> Result<Signal, RecorderError> {
        self.signals.pop_front().ok_or(RecorderError::SourceClosed)
    }
}

impl Drop for ScriptedListener {
    fn drop(&mut self) {
        self.attached.store(false, Ordering::SeqCst);
    }
}
