//! Latest-wins sync coalescing.
//!
//! Pointer drags and focus hops produce events far faster than the backend
//! can answer. A `Coalescer` holds a single pending slot: every `publish`
//! overwrites it, and every tick (at most once per `period`) takes whatever
//! is in the slot and hands it to the sync callback.
//!
//! Guarantees:
//! - At most one sync per tick, so at most one in-flight call per period
//! - The last value published before a quiet period is always synced
//! - A value superseded before its tick is never synced
//!
//! The slot is written by `publish` and drained by `tick`, both through
//! `&mut self`, so there is nothing to lock.

use std::time::{Duration, Instant};

/// Counters for one coalescer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoalescerStats {
    pub published: u64,
    pub flushed: u64,
    pub superseded: u64,
}

#[derive(Debug)]
pub struct Coalescer<T> {
    name: &'static str,
    period: Duration,
    pending: Option<T>,
    last_tick: Option<Instant>,
    stats: CoalescerStats,
}

impl<T> Coalescer<T> {
    pub fn new(name: &'static str, period: Duration) -> Self {
        Self {
            name,
            period,
            pending: None,
            last_tick: None,
            stats: CoalescerStats::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Overwrite the pending slot. Never blocks, never syncs.
    pub fn publish(&mut self, value: T) {
        if self.pending.replace(value).is_some() {
            self.stats.superseded += 1;
        }
        self.stats.published += 1;
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value without syncing it.
    pub fn discard(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn stats(&self) -> CoalescerStats {
        self.stats
    }

    /// True once a full period has passed since the last tick.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_tick {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.period,
        }
    }

    /// Run the tick handler if it is due. Returns true if `sync` was called.
    pub fn poll<F: FnOnce(T)>(&mut self, now: Instant, sync: F) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.last_tick = Some(now);
        self.tick(sync)
    }

    /// Tick handler: take-and-clear the slot, sync its value once.
    pub fn tick<F: FnOnce(T)>(&mut self, sync: F) -> bool {
        let Some(value) = self.pending.take() else {
            return false;
        };
        self.stats.flushed += 1;
        log::trace!(
            "{} coalescer flush (published={}, flushed={}, superseded={})",
            self.name,
            self.stats.published,
            self.stats.flushed,
            self.stats.superseded
        );
        sync(value);
        true
    }
}
