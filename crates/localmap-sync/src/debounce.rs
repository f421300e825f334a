//! Deterministic per-channel debounce timers.
//!
//! Each logical query channel owns one `DebounceChannel`. Arming a channel
//! bumps its generation and pushes its deadline out; only the latest
//! generation is considered current, which is how stale responses are
//! recognized after out-of-order completions. Time is passed in by the
//! caller, so the whole scheduler is deterministic under test.

use std::time::{Duration, Instant};

/// A single debounce timer with a monotonically increasing generation.
#[derive(Debug)]
pub struct DebounceChannel {
    deadline: Option<Instant>,
    generation: u64,
}

impl DebounceChannel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            deadline: None,
            generation: 0,
        }
    }

    /// Arms (or re-arms) the timer. A new event on the channel resets only
    /// this channel's deadline. Returns the new generation.
    pub fn arm(&mut self, now: Instant, delay: Duration) -> u64 {
        self.generation += 1;
        self.deadline = Some(now + delay);
        self.generation
    }

    /// Fires the timer if its deadline has passed, returning the generation
    /// to attach to the outbound request. Firing disarms the channel.
    pub fn fire(&mut self, now: Instant) -> Option<u64> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(self.generation)
            }
            _ => None,
        }
    }

    /// Issues a request immediately, bypassing the debounce window: clears
    /// any pending deadline and returns a fresh generation.
    pub fn issue(&mut self) -> u64 {
        self.deadline = None;
        self.generation += 1;
        self.generation
    }

    /// Disarms without firing. The generation advances unconditionally:
    /// a request that already fired leaves the channel disarmed but may
    /// still have a response in flight, and that response must be dropped
    /// as stale too.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.generation += 1;
    }

    /// `true` while a deadline is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Last request wins: a response is applied only if its generation is
    /// still the channel's current one.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Earliest instant at which [`DebounceChannel::fire`] can succeed.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl Default for DebounceChannel {
    fn default() -> Self {
        Self::new()
    }
}
