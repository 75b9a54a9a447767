// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared backlog of pending draw commands.
//!
//! A [`Backlog`] is a clone-able handle to one mutex-guarded queue of
//! commands plus the dirty flag. Event-dispatch threads mutate it through
//! their own clones while the render thread replays it inside
//! [`Canvas::display`](crate::canvas::Canvas::display); every operation here
//! is one atomic critical section, and the display pass holds the same lock
//! for its whole time-sliced chunk.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::command::DrawCommand;
use crate::queue::CursorQueue;

/// Guarded state: the command queue and the invalidation flag.
///
/// `dirty` means "the cache texture is stale and the queue must be rewalked
/// from the start on the next display". It lives under the same lock as the
/// queue so a mutation and its invalidation are observed together.
#[derive(Debug)]
pub(crate) struct BacklogState {
    pub(crate) queue: CursorQueue<Arc<DrawCommand>>,
    pub(crate) dirty: bool,
}

/// Handle to the pending-command queue of one canvas.
///
/// Clones share the same underlying state. A fresh backlog is dirty: the
/// first display after creation always runs a full pass.
#[derive(Clone, Debug)]
pub struct Backlog {
    inner: Arc<Mutex<BacklogState>>,
}

impl Backlog {
    /// Creates an empty, dirty backlog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(BacklogState {
                queue: CursorQueue::new(),
                dirty: true,
            })),
        }
    }

    /// Appends a command.
    ///
    /// Rewinds the cursor so the next pass includes the new command even if
    /// an earlier pass already drained the queue, and marks dirty.
    pub fn push(&self, command: Arc<DrawCommand>) {
        let mut state = self.inner.lock();
        state.queue.push(command);
        state.queue.rewind();
        state.dirty = true;
    }

    /// Removes the first command with the same id.
    ///
    /// Marks dirty unconditionally: removal can land mid-stream, and a full
    /// rewalk is the simple way to keep the texture consistent. A miss is
    /// not an error (the caller may be racing a concurrent [`clear`]); it is
    /// logged and reported as `false`.
    ///
    /// [`clear`]: Self::clear
    pub fn remove(&self, command: &DrawCommand) -> bool {
        let id = command.id();
        let mut state = self.inner.lock();
        state.dirty = true;
        if state.queue.remove_first(|c| c.id() == id).is_some() {
            true
        } else {
            tracing::debug!(id = id.as_u64(), "removal missed: command not in backlog");
            false
        }
    }

    /// True iff a command with the same id is queued. Linear scan; meant
    /// for diagnostics, not hot paths.
    #[must_use]
    pub fn contains(&self, command: &DrawCommand) -> bool {
        let id = command.id();
        self.inner.lock().queue.contains(|c| c.id() == id)
    }

    /// Discards every command and marks dirty.
    pub fn clear(&self) {
        let mut state = self.inner.lock();
        state.queue.clear();
        state.dirty = true;
    }

    /// Forces the next display into a full fresh pass.
    pub fn mark_dirty(&self) {
        self.inner.lock().dirty = true;
    }

    /// Current dirty flag. Diagnostic: the value can change as soon as the
    /// lock is released.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.inner.lock().dirty
    }

    /// Number of queued commands, visited and pending alike.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().queue.len()
    }

    /// True iff no commands are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().queue.is_empty()
    }

    /// Overwrites the dirty flag without touching the queue. Used by the
    /// texture escape hatch, where the caller vouches for the texture.
    pub(crate) fn set_dirty(&self, dirty: bool) {
        self.inner.lock().dirty = dirty;
    }

    /// Takes the guard for a whole display pass.
    pub(crate) fn lock(&self) -> MutexGuard<'_, BacklogState> {
        self.inner.lock()
    }
}

impl Default for Backlog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ops::ControlFlow;

    fn command() -> Arc<DrawCommand> {
        Arc::new(DrawCommand::new(|_| {}))
    }

    /// Drains the queue the way the display driver does, then clears dirty.
    fn run_full_pass(backlog: &Backlog) {
        let mut state = backlog.lock();
        if state.dirty {
            state.queue.rewind();
        }
        state.queue.advance(|_| ControlFlow::Continue(()));
        state.dirty = false;
    }

    #[test]
    fn new_backlog_is_dirty_and_empty() {
        let backlog = Backlog::new();
        assert!(backlog.is_dirty());
        assert!(backlog.is_empty());
        assert_eq!(backlog.len(), 0);
    }

    #[test]
    fn push_marks_dirty_and_rewinds() {
        let backlog = Backlog::new();
        let first = command();
        backlog.push(first.clone());
        run_full_pass(&backlog);
        assert!(!backlog.is_dirty());
        assert!(backlog.lock().queue.is_drained());

        backlog.push(command());
        assert!(backlog.is_dirty());
        assert_eq!(backlog.lock().queue.position(), 0);
        assert_eq!(backlog.len(), 2);
    }

    #[test]
    fn remove_present_command_returns_true_and_dirties() {
        let backlog = Backlog::new();
        let keep = command();
        let gone = command();
        backlog.push(keep.clone());
        backlog.push(gone.clone());
        run_full_pass(&backlog);

        assert!(backlog.remove(&gone));
        assert!(backlog.is_dirty());
        assert_eq!(backlog.len(), 1);
        assert!(backlog.contains(&keep));
        assert!(!backlog.contains(&gone));
    }

    #[test]
    fn remove_miss_still_dirties_but_returns_false() {
        let backlog = Backlog::new();
        backlog.push(command());
        run_full_pass(&backlog);
        assert!(!backlog.is_dirty());

        let never_added = command();
        assert!(!backlog.remove(&never_added));
        assert!(backlog.is_dirty());
        assert_eq!(backlog.len(), 1);
    }

    #[test]
    fn removing_twice_misses_the_second_time() {
        let backlog = Backlog::new();
        let cmd = command();
        backlog.push(cmd.clone());

        assert!(backlog.remove(&cmd));
        assert!(!backlog.remove(&cmd));
        assert!(backlog.is_empty());
    }

    #[test]
    fn clear_discards_and_dirties() {
        let backlog = Backlog::new();
        backlog.push(command());
        backlog.push(command());
        run_full_pass(&backlog);

        backlog.clear();
        assert!(backlog.is_empty());
        assert!(backlog.is_dirty());
    }

    #[test]
    fn mark_dirty_forces_rewalk_flag() {
        let backlog = Backlog::new();
        run_full_pass(&backlog);
        assert!(!backlog.is_dirty());

        backlog.mark_dirty();
        assert!(backlog.is_dirty());
    }

    #[test]
    fn clones_share_state_across_threads() {
        let backlog = Backlog::new();
        let writer = backlog.clone();
        let handle = std::thread::spawn(move || {
            for _ in 0..16 {
                writer.push(Arc::new(DrawCommand::new(|_| {})));
            }
        });
        handle.join().expect("writer thread panicked");

        assert_eq!(backlog.len(), 16);
        assert!(backlog.is_dirty());
    }
}
