//! Input actor: a thread that turns crossterm events into [`InputEvent`]s.
//!
//! Only the events the views react to cross the channel. Key releases,
//! pastes and keys without a binding are dropped here.

use super::messages::{InputEvent, KeyCode, KeyModifiers, MouseEvent};
use crate::error::{Result, YearClockError};
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyEventKind, MouseEventKind};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Handle to the input thread.
pub struct InputActor {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Start polling; the thread checks for shutdown every `poll_timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn(sender: Sender<InputEvent>, poll_timeout: Duration) -> Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let handle = thread::Builder::new()
            .name("yearclock-input".to_string())
            .spawn(move || forward_events(&sender, &flag, poll_timeout))
            .map_err(YearClockError::Io)?;
        log::debug!("event=actor_spawn module=input status=ok poll_ms={}", poll_timeout.as_millis());

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Ask the thread to stop after its current poll.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Stop the thread and wait for it.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// One poll: `Ok(None)` when nothing arrived within `timeout`.
fn next_event(timeout: Duration) -> io::Result<Option<Event>> {
    if event::poll(timeout)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

fn forward_events(sender: &Sender<InputEvent>, shutdown: &AtomicBool, timeout: Duration) {
    while !shutdown.load(Ordering::Relaxed) {
        let message = match next_event(timeout) {
            Ok(Some(event)) => convert_event(event),
            Ok(None) => None,
            Err(err) => {
                log::warn!("event=input_read module=input status=error error={err}");
                Some(InputEvent::Error(err.to_string()))
            }
        };
        // A closed channel means the main loop is gone.
        if message.is_some_and(|message| sender.send(message).is_err()) {
            return;
        }
    }
    let _ = sender.send(InputEvent::Shutdown);
}

pub(crate) fn convert_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(InputEvent::Key {
            code: convert_key(key.code)?,
            modifiers: KeyModifiers {
                control: key.modifiers.contains(event::KeyModifiers::CONTROL),
                alt: key.modifiers.contains(event::KeyModifiers::ALT),
            },
        }),
        Event::Mouse(mouse) => convert_mouse(mouse),
        Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
        Event::FocusLost => Some(InputEvent::FocusLost),
        _ => None,
    }
}

fn convert_key(code: event::KeyCode) -> Option<KeyCode> {
    use event::KeyCode as Ct;
    let code = match code {
        Ct::Char(c) => KeyCode::Char(c),
        Ct::F(n) => KeyCode::F(n),
        Ct::Backspace => KeyCode::Backspace,
        Ct::Enter => KeyCode::Enter,
        Ct::Left => KeyCode::Left,
        Ct::Right => KeyCode::Right,
        Ct::Up => KeyCode::Up,
        Ct::Down => KeyCode::Down,
        Ct::PageUp => KeyCode::PageUp,
        Ct::PageDown => KeyCode::PageDown,
        Ct::Tab => KeyCode::Tab,
        Ct::BackTab => KeyCode::BackTab,
        Ct::Delete => KeyCode::Delete,
        Ct::Esc => KeyCode::Esc,
        _ => return None,
    };
    Some(code)
}

/// Left clicks, pointer motion and the wheel; other buttons are ignored.
fn convert_mouse(mouse: event::MouseEvent) -> Option<InputEvent> {
    let (x, y) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(event::MouseButton::Left) => Some(InputEvent::MouseDown(MouseEvent::left(x, y))),
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(InputEvent::MouseMove(MouseEvent::at(x, y))),
        MouseEventKind::ScrollUp => Some(InputEvent::MouseScroll { x, y, delta: 1 }),
        MouseEventKind::ScrollDown => Some(InputEvent::MouseScroll { x, y, delta: -1 }),
        _ => None,
    }
}
