use std::sync::mpsc;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyEvent};

use crate::timer::TickId;
use crate::tui::worker::BackendEvent;

/// Everything the Pomodoro screen reacts to, funnelled through one queue so
/// ticks, keys and backend answers are handled strictly one at a time.
pub enum AppEvent {
    /// A keyboard event.
    Key(KeyEvent),
    /// Terminal was resized.
    #[allow(dead_code)]
    Resize(u16, u16),
    /// One second elapsed on the given tick source.
    Tick(TickId),
    /// A backend call settled.
    Backend(BackendEvent),
}

/// Owns the event queue and the thread that feeds terminal input into it.
///
/// Other producers (tick sources, the backend worker) get their own handle
/// via `sender`.
pub struct EventHandler {
    tx: mpsc::Sender<AppEvent>,
    rx: mpsc::Receiver<AppEvent>,
    _handle: std::thread::JoinHandle<()>,
}

impl EventHandler {
    /// Start the terminal polling thread. `poll_rate` bounds how long a poll
    /// blocks before checking again.
    pub fn new(poll_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();

        let handle = std::thread::spawn(move || loop {
            if !event::poll(poll_rate).unwrap_or(false) {
                continue;
            }
            let forwarded = match event::read() {
                Ok(Event::Key(key)) => input_tx.send(AppEvent::Key(key)),
                Ok(Event::Resize(w, h)) => input_tx.send(AppEvent::Resize(w, h)),
                _ => Ok(()),
            };
            if forwarded.is_err() {
                return;
            }
        });

        Self {
            tx,
            rx,
            _handle: handle,
        }
    }

    pub fn sender(&self) -> mpsc::Sender<AppEvent> {
        self.tx.clone()
    }

    /// Receive the next event, blocking until one is available.
    pub fn next(&self) -> Result<AppEvent, mpsc::RecvError> {
        self.rx.recv()
    }
}
