//! Ticker Actor: Dedicated thread for periodic work.
//!
//! The shell runs two of these: one moves the today indicator, the other
//! polls due reminders. The thread waits on its shutdown channel between
//! ticks, so cancelling it takes effect immediately instead of after the
//! next interval.

use super::messages::Tick;
use crate::error::{Result, YearClockError};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Ticker actor that generates regular timing events.
pub struct TickerActor {
    /// Handle to the ticker thread.
    handle: Option<JoinHandle<()>>,
    /// Dropping or sending on this wakes the thread and stops it.
    shutdown_tx: Option<Sender<()>>,
    /// Receiver for tick events.
    tick_rx: Receiver<Tick>,
    name: String,
}

impl TickerActor {
    /// Spawn a ticker named `name` that fires every `interval`.
    ///
    /// The first tick arrives after one full interval.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn(name: &str, interval: Duration) -> Result<Self> {
        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
        // Ticks never queue up behind a slow receiver.
        let (tick_tx, tick_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name(format!("yearclock-{name}"))
            .spawn(move || {
                Self::run_loop(&tick_tx, &shutdown_rx, interval);
            })
            .map_err(YearClockError::Io)?;
        log::debug!(
            "event=actor_spawn module=ticker status=ok name={name} interval_ms={}",
            interval.as_millis()
        );

        Ok(Self {
            handle: Some(handle),
            shutdown_tx: Some(shutdown_tx),
            tick_rx,
            name: name.to_string(),
        })
    }

    /// Get a reference to the tick receiver, for use with `select!`.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Tick> {
        &self.tick_rx
    }

    /// Signal the ticker to shut down. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.try_send(());
            log::debug!("event=actor_shutdown module=ticker status=ok name={}", self.name);
        }
    }

    /// Shut down and wait for the thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(tick_tx: &Sender<Tick>, shutdown_rx: &Receiver<()>, interval: Duration) {
        let start = Instant::now();
        let mut count = 0u64;
        let mut next_tick = start + interval;

        loop {
            let wait = next_tick.saturating_duration_since(Instant::now());
            match shutdown_rx.recv_timeout(wait) {
                Err(RecvTimeoutError::Timeout) => {}
                // Explicit shutdown or the actor was dropped.
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }

            let now = Instant::now();
            let _ = tick_tx.try_send(Tick {
                count,
                elapsed: now - start,
            });
            count += 1;
            next_tick += interval;
            if next_tick < now {
                next_tick = now + interval;
            }
        }
    }
}

impl Drop for TickerActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_basic() {
        let ticker = TickerActor::spawn("test", Duration::from_millis(10)).unwrap();

        let tick = ticker.receiver().recv_timeout(Duration::from_millis(500));
        assert_eq!(tick.unwrap().count, 0);

        let tick2 = ticker.receiver().recv_timeout(Duration::from_millis(500));
        assert!(tick2.is_ok());

        ticker.join();
    }

    #[test]
    fn test_shutdown_is_immediate() {
        let ticker = TickerActor::spawn("slow", Duration::from_secs(60)).unwrap();
        let started = Instant::now();
        ticker.join();
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_drop_stops_thread() {
        let ticker = TickerActor::spawn("dropped", Duration::from_secs(60)).unwrap();
        let rx = ticker.receiver().clone();
        drop(ticker);
        // The sender side goes away once the thread exits.
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)),
            Err(RecvTimeoutError::Disconnected)
        );
    }
}
