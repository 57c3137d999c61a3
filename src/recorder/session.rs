//! Recording session state machine.

use super::RecorderError;
use crate::input::{InputEvent, RawInput};

/// Lifecycle state of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting input events
    Recording,
    /// Stopped or cancelled; final
    Terminated,
}

/// Ordered event buffer for one capture.
///
/// Insertion order is the temporal order of the input. Nothing is filtered or
/// merged: auto-repeated key presses are recorded one by one.
#[derive(Debug)]
pub struct RecordingSession {
    state: SessionState,
    events: Vec<InputEvent>,
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Recording,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Events captured so far (for live display).
    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// Appends a normalized event.
    pub fn push(&mut self, event: InputEvent) -> Result<(), RecorderError> {
        if !self.is_recording() {
            return Err(RecorderError::Terminated);
        }
        self.events.push(event);
        Ok(())
    }

    /// Normalizes and appends a raw notification. Returns the recorded event, or
    /// `None` when the notification is not recordable (unknown mouse button).
    pub fn push_raw(&mut self, raw: RawInput) -> Result<Option<&InputEvent>, RecorderError> {
        if !self.is_recording() {
            return Err(RecorderError::Terminated);
        }
        match InputEvent::from_raw(raw) {
            Some(event) => {
                self.events.push(event);
                Ok(self.events.last())
            }
            None => Ok(None),
        }
    }

    /// Ends the session and hands over the accumulated sequence.
    pub fn stop(&mut self) -> Result<Vec<InputEvent>, RecorderError> {
        if !self.is_recording() {
            return Err(RecorderError::Terminated);
        }
        self.state = SessionState::Terminated;
        Ok(std::mem::take(&mut self.events))
    }

    /// Ends the session, discarding everything that was captured.
    pub fn cancel(&mut self) -> Result<(), RecorderError> {
        if !self.is_recording() {
            return Err(RecorderError::Terminated);
        }
        self.state = SessionState::Terminated;
        self.events.clear();
        Ok(())
    }
}
