// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for display passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! the display driver calls at each stage. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! Event timestamps (`at` fields) are durations since the canvas epoch, so
//! recordings from one canvas share a timeline regardless of which clock
//! drives it.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates the per-command
//!   [`CommandRunEvent`] and the corresponding `TraceSink` method.

use std::time::Duration;

use crate::display::DisplayOutcome;
use crate::redraw::WindowId;

#[cfg(feature = "trace-rich")]
use crate::command::CommandId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Where a render pass picked up its work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassOrigin {
    /// The texture was invalidated; the pass starts from a rewound cursor.
    Fresh,
    /// An earlier pass yielded mid-stream; the pass continues at its cursor.
    Resumed,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a display call finds nothing to do: texture current, queue
/// drained.
#[derive(Clone, Copy, Debug)]
pub struct SkipEvent {
    /// Which window the display call targeted.
    pub window: WindowId,
    /// Monotonic display-call counter of the canvas.
    pub pass_index: u64,
    /// Time since the canvas epoch.
    pub at: Duration,
}

/// Emitted when a render pass starts replaying commands.
#[derive(Clone, Copy, Debug)]
pub struct PassBeginEvent {
    /// Which window the display call targeted.
    pub window: WindowId,
    /// Monotonic display-call counter of the canvas.
    pub pass_index: u64,
    /// Fresh start or continuation.
    pub origin: PassOrigin,
    /// Commands waiting at the cursor when the pass began.
    pub pending: usize,
    /// Time since the canvas epoch.
    pub at: Duration,
}

/// Emitted when a render pass stops, budget-bound or drained.
#[derive(Clone, Copy, Debug)]
pub struct PassEndEvent {
    /// Which window the display call targeted.
    pub window: WindowId,
    /// Monotonic display-call counter of the canvas.
    pub pass_index: u64,
    /// How the pass ended.
    pub outcome: DisplayOutcome,
    /// Commands whose actions ran.
    pub executed: usize,
    /// Commands skipped because they were disabled.
    pub skipped: usize,
    /// Commands still waiting at the cursor.
    pub remaining: usize,
    /// Wall-clock time the pass spent replaying.
    pub elapsed: Duration,
    /// Budget the pass was allowed.
    pub budget: Duration,
    /// Time since the canvas epoch, at the end of the pass.
    pub at: Duration,
}

/// Emitted when an incomplete pass asks for a follow-up frame.
#[derive(Clone, Copy, Debug)]
pub struct RedrawRequestEvent {
    /// Window whose event loop should schedule the frame.
    pub window: WindowId,
    /// Monotonic display-call counter of the canvas.
    pub pass_index: u64,
    /// Commands left for the follow-up frame.
    pub remaining: usize,
    /// Time since the canvas epoch.
    pub at: Duration,
}

/// Per-command record (requires the `trace-rich` feature).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct CommandRunEvent {
    /// Monotonic display-call counter of the canvas.
    pub pass_index: u64,
    /// Identity of the visited command.
    pub id: CommandId,
    /// True when the command was skipped as disabled.
    pub skipped: bool,
    /// Time since the canvas epoch, after the command ran.
    pub at: Duration,
    /// Time since pass start, after the command ran.
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from display passes.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a display call skips (texture current, queue drained).
    fn on_skip(&mut self, e: &SkipEvent) {
        _ = e;
    }

    /// Called when a render pass starts.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called when a render pass ends.
    fn on_pass_end(&mut self, e: &PassEndEvent) {
        _ = e;
    }

    /// Called when an incomplete pass requests a follow-up frame.
    fn on_redraw_request(&mut self, e: &RedrawRequestEvent) {
        _ = e;
    }

    /// Called after each visited command (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_command_run(&mut self, e: &CommandRunEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`SkipEvent`].
    #[inline]
    pub fn skip(&mut self, e: &SkipEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_skip(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassEndEvent`].
    #[inline]
    pub fn pass_end(&mut self, e: &PassEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RedrawRequestEvent`].
    #[inline]
    pub fn redraw_request(&mut self, e: &RedrawRequestEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_redraw_request(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CommandRunEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn command_run(&mut self, e: &CommandRunEvent) {
        if let Some(s) = &mut self.sink {
            s.on_command_run(e);
        }
    }
}
