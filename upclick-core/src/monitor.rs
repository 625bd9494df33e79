//! Double-click detection and the click event queue.
//!
//! The raw button stream arrives on the mouse-hook thread (see [`crate::hook`]
//! on Windows); everything there must stay cheap, so this module is limited
//! to a tiny debounce state machine plus a non-blocking enqueue. Slow work
//! (UIA queries, key synthesis) happens on the worker that drains the queue.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use serde::Serialize;

/// Queue capacity. A human cannot produce anywhere near this many pending
/// double-clicks; the bound exists so a stalled worker can never grow the
/// queue without limit.
pub const QUEUE_CAPACITY: usize = 64;

/// One physical left-button-down.
#[derive(Debug, Clone, Copy)]
pub struct ClickEvent {
    pub x: i32,
    pub y: i32,
    pub at: Instant,
}

/// A confirmed double-click, located at the second click of the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DoubleClick {
    pub x: i32,
    pub y: i32,
}

/// Two-click debounce.
///
/// Policy: every click overwrites `last_down` with its own timestamp, except
/// that confirming a pair clears the state entirely -- so of three rapid
/// clicks only the first two form a double-click, and the third starts a
/// fresh pair. Click position is deliberately not part of the test: two
/// fast clicks far apart still qualify, and the emitted event carries the
/// second click's coordinates. Known approximation.
#[derive(Debug)]
pub struct ClickDebouncer {
    threshold: Duration,
    last_down: Option<Instant>,
}

impl ClickDebouncer {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last_down: None,
        }
    }

    /// Feed one button-down; returns the confirmed double-click, if any.
    pub fn register(&mut self, click: ClickEvent) -> Option<DoubleClick> {
        match self.last_down {
            Some(prev) if click.at.duration_since(prev) < self.threshold => {
                self.last_down = None;
                Some(DoubleClick {
                    x: click.x,
                    y: click.y,
                })
            }
            _ => {
                self.last_down = Some(click.at);
                None
            }
        }
    }
}

/// The channel between the hook thread and the worker: single producer,
/// single consumer, bounded.
pub fn click_channel() -> (Sender<DoubleClick>, Receiver<DoubleClick>) {
    crossbeam_channel::bounded(QUEUE_CAPACITY)
}

/// Enqueue without ever blocking the hook thread. When the queue is full the
/// oldest pending entry is discarded to make room; losing a stale
/// double-click beats lagging the physical mouse.
pub fn enqueue(tx: &Sender<DoubleClick>, rx: &Receiver<DoubleClick>, event: DoubleClick) {
    if let Err(TrySendError::Full(event)) = tx.try_send(event) {
        let _ = rx.try_recv();
        if tx.try_send(event).is_err() {
            log::warn!("click queue still full after evicting oldest entry; dropping event");
        }
    }
}
