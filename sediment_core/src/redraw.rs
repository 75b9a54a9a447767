// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fire-and-forget redraw requests.
//!
//! A display pass that runs out of budget must get another frame to finish
//! the backlog. The driver never re-enters itself for that; it posts the
//! owning window's id to a [`RedrawScheduler`] and returns. The surrounding
//! event loop decides when that frame actually happens.

use parking_lot::Mutex;

/// Identifies a window to the surrounding event loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

/// Receives redraw requests from display passes.
///
/// `request_redraw` must be non-blocking and safe to call repeatedly for
/// the same window without unbounded growth; the driver calls it once per
/// incomplete pass, which can mean every frame while a long backlog drains.
pub trait RedrawScheduler {
    /// Asks the event loop to schedule another frame for `window`.
    fn request_redraw(&self, window: WindowId);
}

/// A coalescing redraw queue for event loops that poll.
///
/// Duplicate requests for a window collapse into one pending entry, so a
/// slow consumer never accumulates more entries than it has windows.
#[derive(Debug, Default)]
pub struct RedrawRequests {
    pending: Mutex<Vec<WindowId>>,
}

impl RedrawRequests {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes all pending requests, leaving the queue empty.
    #[must_use]
    pub fn drain(&self) -> Vec<WindowId> {
        std::mem::take(&mut *self.pending.lock())
    }

    /// Number of distinct windows with a pending request.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// True iff no requests are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl RedrawScheduler for RedrawRequests {
    fn request_redraw(&self, window: WindowId) {
        let mut pending = self.pending.lock();
        if !pending.contains(&window) {
            pending.push(window);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RedrawRequests, RedrawScheduler, WindowId};

    #[test]
    fn requests_coalesce_per_window() {
        let queue = RedrawRequests::new();
        queue.request_redraw(WindowId(1));
        queue.request_redraw(WindowId(1));
        queue.request_redraw(WindowId(2));
        queue.request_redraw(WindowId(1));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain(), vec![WindowId(1), WindowId(2)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn drain_resets_coalescing() {
        let queue = RedrawRequests::new();
        queue.request_redraw(WindowId(3));
        assert_eq!(queue.drain(), vec![WindowId(3)]);

        queue.request_redraw(WindowId(3));
        assert_eq!(queue.drain(), vec![WindowId(3)]);
    }
}
