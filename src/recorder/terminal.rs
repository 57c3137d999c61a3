//! Terminal input source backed by crossterm.
//!
//! Attaching puts the terminal in raw mode with mouse reporting enabled, so every
//! key press (including Ctrl+C) and every click inside the terminal window is
//! delivered to the recorder instead of the shell. SIGTERM and SIGHUP cancel
//! the capture.

use super::RecorderError;
use super::source::{InputListener, InputSource, Signal};
use crate::input::RawInput;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MediaKeyCode, ModifierKeyCode, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal;
use log::{debug, warn};
use signal_hook::SigId;
use signal_hook::consts::signal::{SIGHUP, SIGTERM};
use std::io::stdout;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Captures keyboard and mouse input from the controlling terminal.
#[derive(Debug, Clone)]
pub struct TerminalSource {
    poll_interval: Duration,
}

impl Default for TerminalSource {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl TerminalSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputSource for TerminalSource {
    type Listener = TerminalListener;

    fn attach(&mut self) -> Result<Self::Listener, RecorderError> {
        terminal::enable_raw_mode()?;
        // From here on the listener owns the terminal state; its Drop restores it.
        let mut listener = TerminalListener {
            poll_interval: self.poll_interval,
            terminate: Arc::new(AtomicBool::new(false)),
            signal_ids: Vec::new(),
            mouse_captured: false,
        };

        execute!(stdout(), EnableMouseCapture)?;
        listener.mouse_captured = true;

        for signal in [SIGTERM, SIGHUP] {
            let id = signal_hook::flag::register(signal, Arc::clone(&listener.terminate))?;
            listener.signal_ids.push(id);
        }

        debug!("Terminal input capture attached");
        Ok(listener)
    }
}

/// Raw-mode terminal capture; restored on drop.
pub struct TerminalListener {
    poll_interval: Duration,
    terminate: Arc<AtomicBool>,
    signal_ids: Vec<SigId>,
    mouse_captured: bool,
}

impl InputListener for TerminalListener {
    fn next_signal(&mut self) -> Result<Signal, RecorderError> {
        loop {
            if self.terminate.load(Ordering::SeqCst) {
                debug!("Termination signal received, cancelling capture");
                return Ok(Signal::Cancel);
            }

            if !event::poll(self.poll_interval)? {
                continue;
            }

            let raw = match event::read()? {
                Event::Key(key) => raw_from_key(&key),
                Event::Mouse(mouse) => raw_from_mouse(&mouse),
                _ => None,
            };

            if let Some(raw) = raw {
                return Ok(Signal::Input(raw));
            }
        }
    }
}

impl Drop for TerminalListener {
    fn drop(&mut self) {
        for id in self.signal_ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
        if self.mouse_captured
            && let Err(err) = execute!(stdout(), DisableMouseCapture)
        {
            warn!("Failed to disable mouse capture: {}", err);
        }
        if let Err(err) = terminal::disable_raw_mode() {
            warn!("Failed to restore terminal mode: {}", err);
        }
        debug!("Terminal input capture released");
    }
}

/// Maps a crossterm key event to a raw key-down notification.
///
/// Key names follow the DOM `KeyboardEvent.key` spelling (`Enter`, `ArrowUp`,
/// `" "`) so they share the script compiler's translation table with other
/// sources. Release events are ignored; repeats are kept.
pub fn raw_from_key(key: &KeyEvent) -> Option<RawInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let mut shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let name = match key.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Escape".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::BackTab => {
            shift = true;
            "Tab".into()
        }
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Insert => "Insert".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::Up => "ArrowUp".into(),
        KeyCode::Down => "ArrowDown".into(),
        KeyCode::Left => "ArrowLeft".into(),
        KeyCode::Right => "ArrowRight".into(),
        KeyCode::F(n) => format!("F{n}"),
        KeyCode::CapsLock => "CapsLock".into(),
        KeyCode::ScrollLock => "ScrollLock".into(),
        KeyCode::NumLock => "NumLock".into(),
        KeyCode::PrintScreen => "PrintScreen".into(),
        KeyCode::Pause => "Pause".into(),
        KeyCode::Menu => "ContextMenu".into(),
        KeyCode::KeypadBegin => "Clear".into(),
        KeyCode::Media(media) => media_key_name(media).into(),
        KeyCode::Modifier(modifier) => modifier_key_name(modifier).into(),
        KeyCode::Null => return None,
    };

    let code = physical_code(&name);
    Some(RawInput::KeyDown {
        key: name,
        code,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        shift,
        alt: key.modifiers.contains(KeyModifiers::ALT),
        meta: key
            .modifiers
            .intersects(KeyModifiers::SUPER | KeyModifiers::META),
    })
}

/// Maps a crossterm mouse event to a raw mouse-down notification.
pub fn raw_from_mouse(mouse: &MouseEvent) -> Option<RawInput> {
    match mouse.kind {
        MouseEventKind::Down(button) => Some(RawInput::MouseDown {
            ordinal: match button {
                MouseButton::Left => 0,
                MouseButton::Middle => 1,
                MouseButton::Right => 2,
            },
        }),
        _ => None,
    }
}

// Terminals do not report scan codes; derive the DOM `code` where it is unambiguous.
fn physical_code(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(' '), None) => "Space".into(),
        (Some(c), None) if c.is_ascii_alphabetic() => format!("Key{}", c.to_ascii_uppercase()),
        (Some(c), None) if c.is_ascii_digit() => format!("Digit{c}"),
        (Some(_), None) => String::new(),
        _ => name.to_string(),
    }
}

fn media_key_name(media: MediaKeyCode) -> &'static str {
    match media {
        MediaKeyCode::Play => "MediaPlay",
        MediaKeyCode::Pause => "MediaPause",
        MediaKeyCode::PlayPause => "MediaPlayPause",
        MediaKeyCode::Reverse => "MediaRewind",
        MediaKeyCode::Stop => "MediaStop",
        MediaKeyCode::FastForward => "MediaFastForward",
        MediaKeyCode::Rewind => "MediaRewind",
        MediaKeyCode::TrackNext => "MediaTrackNext",
        MediaKeyCode::TrackPrevious => "MediaTrackPrevious",
        MediaKeyCode::Record => "MediaRecord",
        MediaKeyCode::LowerVolume => "AudioVolumeDown",
        MediaKeyCode::RaiseVolume => "AudioVolumeUp",
        MediaKeyCode::MuteVolume => "AudioVolumeMute",
    }
}

fn modifier_key_name(modifier: ModifierKeyCode) -> &'static str {
    match modifier {
        ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => "Shift",
        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => "Control",
        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => "Alt",
        ModifierKeyCode::LeftSuper
        | ModifierKeyCode::RightSuper
        | ModifierKeyCode::LeftMeta
        | ModifierKeyCode::RightMeta => "Meta",
        ModifierKeyCode::LeftHyper | ModifierKeyCode::RightHyper => "Hyper",
        ModifierKeyCode::IsoLevel3Shift => "AltGraph",
        ModifierKeyCode::IsoLevel5Shift => "Level5Shift",
    }
}
