//! Event source for the refresh loop: timer ticks, keys, resizes.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Events the refresh loop reacts to.
#[derive(Debug)]
pub enum Event {
    /// The refresh interval elapsed.
    Tick,
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Multiplexes crossterm input and a tick timer into one channel.
///
/// A single spawned thread polls for terminal events with whatever is left
/// of the current tick as the timeout, so a key never waits behind a timer
/// and the loop stays the only terminal writer.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());
                let ready = match event::poll(timeout) {
                    Ok(ready) => ready,
                    // Dropping the sender closes the channel; the consumer
                    // sees the error on its next recv and quits cleanly.
                    Err(_) => break,
                };
                if ready {
                    let send = match event::read() {
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            tx.send(Event::Key(key))
                        }
                        Ok(CrosstermEvent::Resize(w, h)) => tx.send(Event::Resize(w, h)),
                        Ok(_) => Ok(()),
                        Err(_) => break,
                    };
                    if send.is_err() {
                        break;
                    }
                }
                if last_tick.elapsed() >= tick_rate {
                    if tx.send(Event::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });
        Self { rx }
    }

    /// Blocks until the next event. Errors only if the event thread died.
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }

    /// Returns an already-queued event without blocking. Lets the consumer
    /// drain the backlog that piled up behind a slow refresh, so queued
    /// ticks collapse instead of each running their own cycle.
    pub fn try_next(&self) -> Option<Event> {
        self.rx.try_recv().ok()
    }

    #[cfg(test)]
    fn from_receiver(rx: mpsc::Receiver<Event>) -> Self {
        Self { rx }
    }
}
