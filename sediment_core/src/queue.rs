// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Append-only queue with a persistent iteration cursor.

use core::ops::ControlFlow;

/// Append-only sequence that can be drained in slices across several visits.
///
/// The cursor marks how far iteration has progressed. [`advance`] visits
/// items from the cursor onward and can be stopped by the visitor at any
/// item; the cursor stays where iteration stopped, so a later `advance`
/// resumes there instead of rescanning from the start. Appends are O(1) and
/// never disturb the cursor; [`rewind`] restarts iteration without
/// discarding contents.
///
/// [`advance`]: CursorQueue::advance
/// [`rewind`]: CursorQueue::rewind
#[derive(Debug, Clone)]
pub struct CursorQueue<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T> CursorQueue<T> {
    /// Creates an empty queue with the cursor at the start.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
        }
    }

    /// Appends an item at the tail. O(1), preserves insertion order.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Resets the cursor to the start without discarding contents.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Visits items from the cursor until the queue is exhausted or the
    /// visitor breaks.
    ///
    /// The cursor moves past every visited item, including the one the
    /// visitor breaks on: a break means "stop before starting the next
    /// item", not "undo this one".
    pub fn advance<F>(&mut self, mut visit: F)
    where
        F: FnMut(&T) -> ControlFlow<()>,
    {
        while self.cursor < self.items.len() {
            let flow = visit(&self.items[self.cursor]);
            self.cursor += 1;
            if flow.is_break() {
                break;
            }
        }
    }

    /// True iff the cursor has consumed the whole queue.
    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.cursor >= self.items.len()
    }

    /// Removes the first item matching `pred` and returns it.
    ///
    /// Returns `None` when nothing matches. Removing an item that sits
    /// before the cursor shifts the cursor back by one, so the set of
    /// not-yet-visited items is unchanged; removing one at or after the
    /// cursor simply excludes it from future visits.
    pub fn remove_first<F>(&mut self, mut pred: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        let index = self.items.iter().position(&mut pred)?;
        if index < self.cursor {
            self.cursor -= 1;
        }
        Some(self.items.remove(index))
    }

    /// True iff any item matches `pred`. Linear scan over the whole backing
    /// store, independent of the cursor.
    #[must_use]
    pub fn contains<F>(&self, pred: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.items.iter().any(pred)
    }

    /// Current item count (visited and pending alike).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True iff the queue holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items the cursor has not visited yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.items.len() - self.cursor
    }

    /// Cursor position, for diagnostics.
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Discards all items and rewinds the cursor.
    pub fn clear(&mut self) {
        self.items.clear();
        self.cursor = 0;
    }
}

impl<T> Default for CursorQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
