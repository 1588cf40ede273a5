//! Leading+trailing throttle for outbound draw-action emission.
//!
//! Continuous pointer movement can produce actions far faster than they
//! should hit the wire. The first action in an idle interval goes out
//! immediately (leading edge); the rest queue until the host's next flush
//! tick once the interval has elapsed (trailing edge). Nothing is dropped —
//! deferred actions are delivered in order, so peer logs stay complete. The
//! local optimistic apply never passes through here.

#[cfg(test)]
#[path = "throttle_test.rs"]
mod throttle_test;

use std::collections::VecDeque;

use wire::DrawAction;

/// Default minimum spacing between emission bursts, in milliseconds.
pub const DEFAULT_INTERVAL_MS: i64 = 50;

/// Leading+trailing emission throttle.
#[derive(Debug)]
pub struct EmitThrottle {
    interval_ms: i64,
    last_burst_ms: Option<i64>,
    pending: VecDeque<DrawAction>,
}

impl EmitThrottle {
    /// Throttle with the given minimum burst spacing.
    #[must_use]
    pub fn new(interval_ms: i64) -> Self {
        Self { interval_ms, last_burst_ms: None, pending: VecDeque::new() }
    }

    /// Offer an action for emission at `now_ms`.
    ///
    /// Returns the action when it should be emitted right now (leading
    /// edge); otherwise queues it for a later [`flush`](Self::flush).
    pub fn offer(&mut self, action: DrawAction, now_ms: i64) -> Option<DrawAction> {
        if self.pending.is_empty() && self.interval_elapsed(now_ms) {
            self.last_burst_ms = Some(now_ms);
            return Some(action);
        }
        self.pending.push_back(action);
        None
    }

    /// Release queued actions (trailing edge) once the interval has elapsed.
    ///
    /// Returns the actions to emit, in the order they were offered; empty
    /// when nothing is due yet. Hosts call this from their frame or timer
    /// tick.
    pub fn flush(&mut self, now_ms: i64) -> Vec<DrawAction> {
        if self.pending.is_empty() || !self.interval_elapsed(now_ms) {
            return Vec::new();
        }
        self.last_burst_ms = Some(now_ms);
        self.pending.drain(..).collect()
    }

    /// True when actions are queued awaiting the trailing edge.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drop queued actions and forget timing; used when leaving a room.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.last_burst_ms = None;
    }

    fn interval_elapsed(&self, now_ms: i64) -> bool {
        self.last_burst_ms.is_none_or(|last| now_ms - last >= self.interval_ms)
    }
}
