//! Periodic tick source running on its own thread.
//!
//! Ticks are scheduled against absolute deadlines so callback time does not
//! accumulate as drift. The stop channel doubles as the sleep primitive:
//! `recv_deadline` returns early as soon as the owner stops or drops the
//! ticker.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{RecvTimeoutError, Sender, bounded};
use tracing::{debug, warn};

/// Ticks further behind than this are skipped instead of replayed in a burst.
pub const MAX_BEHIND: Duration = Duration::from_millis(250);

#[derive(Debug, thiserror::Error)]
pub enum TickerError {
    #[error("tick frequency must be at least 1 Hz")]
    ZeroFrequency,
    #[error("failed to spawn tick thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Fires a callback at a fixed frequency until stopped.
pub struct Ticker {
    stop_sender: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    period: Duration,
}

impl Ticker {
    /// Spawns the `warpfield-ticker` thread calling `callback` `hz` times a
    /// second.
    pub fn start<F>(hz: u32, mut callback: F) -> Result<Self, TickerError>
    where
        F: FnMut() + Send + 'static,
    {
        if hz == 0 {
            return Err(TickerError::ZeroFrequency);
        }
        let period = Duration::from_nanos(1_000_000_000 / u64::from(hz));
        let (stop_sender, stop_receiver) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("warpfield-ticker".into())
            .spawn(move || {
                let mut deadline = Instant::now() + period;
                loop {
                    match stop_receiver.recv_deadline(deadline) {
                        Err(RecvTimeoutError::Timeout) => {
                            callback();
                            deadline += period;
                            let now = Instant::now();
                            if now > deadline + MAX_BEHIND {
                                warn!(
                                    "tick thread {:.1}ms behind, skipping missed ticks",
                                    (now - deadline).as_secs_f64() * 1000.0
                                );
                                deadline = now + period;
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("tick thread exiting");
            })
            .map_err(TickerError::Spawn)?;

        debug!("ticker started at {hz} Hz");
        Ok(Self {
            stop_sender: Some(stop_sender),
            handle: Some(handle),
            period,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signals the thread and waits for it to exit. Idempotent.
    pub fn stop(&mut self) {
        if let Some(sender) = self.stop_sender.take() {
            // A full channel or a finished thread both mean the signal is moot.
            let _ = sender.try_send(());
        }
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("tick callback panicked");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_zero_frequency_rejected() {
        assert!(matches!(
            Ticker::start(0, || {}),
            Err(TickerError::ZeroFrequency)
        ));
    }

    #[test]
    fn test_period_from_frequency() {
        let ticker = Ticker::start(50, || {}).unwrap();
        assert_eq!(ticker.period(), Duration::from_millis(20));
    }

    #[test]
    fn test_ticks_arrive() {
        let count = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&count);
        let mut ticker = Ticker::start(200, move || {
            seen.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();

        let give_up = Instant::now() + Duration::from_secs(5);
        while count.load(Ordering::Relaxed) < 5 && Instant::now() < give_up {
            thread::sleep(Duration::from_millis(5));
        }
        ticker.stop();
        assert!(
            count.load(Ordering::Relaxed) >= 5,
            "only {} ticks in 5s",
            count.load(Ordering::Relaxed)
        );
    }

    #[test]
    fn test_stop_halts_ticks() {
        let count = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&count);
        let mut ticker = Ticker::start(500, move || {
            seen.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
        thread::sleep(Duration::from_millis(20));
        ticker.stop();
        assert!(!ticker.is_running());

        let after_stop = count.load(Ordering::Relaxed);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::Relaxed), after_stop);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut ticker = Ticker::start(10, || {}).unwrap();
        ticker.stop();
        ticker.stop();
    }

    #[test]
    fn test_drop_returns_promptly_with_slow_rate() {
        let ticker = Ticker::start(1, || {}).unwrap();
        let start = Instant::now();
        drop(ticker);
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_drives_session_counter() {
        use warpfield_starfield::init_session;

        let session = init_session(1152, 144, 8, 360).unwrap();
        let handle = session.tick_handle();
        let mut ticker = Ticker::start(500, move || handle.tick()).unwrap();

        let give_up = Instant::now() + Duration::from_secs(5);
        while session.phase().counter < 3 && Instant::now() < give_up {
            thread::sleep(Duration::from_millis(5));
        }
        ticker.stop();
        assert!(session.phase().counter >= 3);
    }
}
