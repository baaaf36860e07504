//! Generator rotation driven by an external periodic tick.
//!
//! The tick source runs in its own execution context at a fixed rate, so the
//! frame counter lives in an atomic shared through [`TickHandle`]. The render
//! loop is the only reader that resets it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::generators::Phase;

/// Cloneable, thread-safe handle that advances a scheduler's frame counter.
#[derive(Clone, Debug)]
pub struct TickHandle {
    counter: Arc<AtomicU32>,
}

impl TickHandle {
    pub fn tick(&self) {
        self.counter.fetch_add(1, Ordering::AcqRel);
    }
}

/// Rotates through `registry_len` generators, one per phase period.
#[derive(Debug)]
pub struct Scheduler {
    counter: Arc<AtomicU32>,
    active: Option<usize>,
    period: u32,
    registry_len: usize,
}

impl Scheduler {
    pub fn new(period: u32, registry_len: usize) -> Self {
        Self {
            counter: Arc::new(AtomicU32::new(0)),
            active: None,
            period,
            registry_len: registry_len.max(1),
        }
    }

    pub fn tick(&self) {
        self.counter.fetch_add(1, Ordering::AcqRel);
    }

    pub fn tick_handle(&self) -> TickHandle {
        TickHandle {
            counter: Arc::clone(&self.counter),
        }
    }

    /// Activates the first generator if none is active yet, and rotates to the
    /// next one once the counter has run past the phase period.
    ///
    /// Returns the active registry index.
    pub fn select_generator(&mut self) -> usize {
        let active = *self.active.get_or_insert(0);

        let period = self.period;
        let rotated = self
            .counter
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                (count > period).then_some(0)
            })
            .is_ok();

        if rotated {
            let next = (active + 1) % self.registry_len;
            self.active = Some(next);
            log::info!("starfield generator rotated: {active} -> {next}");
            next
        } else {
            active
        }
    }

    /// Index of the active generator; 0 before the first selection.
    pub fn active_index(&self) -> usize {
        self.active.unwrap_or(0)
    }

    pub fn frame_counter(&self) -> u32 {
        self.counter.load(Ordering::Acquire)
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    pub fn phase(&self) -> Phase {
        Phase::new(self.frame_counter(), self.period)
    }
}
