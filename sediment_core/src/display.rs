// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The display driver: budgeted, resumable replay of the backlog.
//!
//! [`Canvas::display`] is the per-frame entry point. Each call either skips
//! (texture current, nothing pending), runs a fresh pass from the start of
//! the backlog, or resumes a pass that an earlier frame stopped on budget.
//! A pass that stops early requests a follow-up frame through the
//! [`RedrawScheduler`] and leaves the queue cursor where it halted.

use core::ops::ControlFlow;
use std::time::Duration;

use kurbo::Rect;

use crate::backend::{BlendMode, Blit, Painter};
use crate::canvas::Canvas;
use crate::redraw::{RedrawScheduler, WindowId};
use crate::trace::{
    PassBeginEvent, PassEndEvent, PassOrigin, RedrawRequestEvent, SkipEvent, Tracer,
};

#[cfg(feature = "trace-rich")]
use crate::trace::CommandRunEvent;

// ---------------------------------------------------------------------------
// DisplayOutcome
// ---------------------------------------------------------------------------

/// How a [`Canvas::display`] call ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplayOutcome {
    /// The texture was current and the backlog drained; nothing was drawn.
    Skipped,
    /// A fresh pass replayed the backlog from the start and drained it.
    Completed,
    /// A continuation pass drained the remainder of an earlier pass.
    Resumed,
    /// The pass stopped on budget with commands still pending; a follow-up
    /// frame was requested.
    Yielded,
}

// ---------------------------------------------------------------------------
// DisplayReport
// ---------------------------------------------------------------------------

/// Everything a [`Canvas::display`] call did, for pacing and tests.
#[derive(Clone, Debug)]
pub struct DisplayReport {
    /// How the call ended.
    pub outcome: DisplayOutcome,
    /// Texture-to-frame copies the caller must submit to the compositor.
    pub blits: Vec<Blit>,
    /// Commands whose actions ran during this call.
    pub executed: usize,
    /// Commands visited but skipped as disabled.
    pub skipped: usize,
    /// Commands still pending after this call.
    pub remaining: usize,
    /// Wall time spent inside the call, measured on the canvas clock.
    pub elapsed: Duration,
    /// The budget the pass ran under.
    pub budget: Duration,
}

// ---------------------------------------------------------------------------
// Canvas::display
// ---------------------------------------------------------------------------

impl Canvas {
    /// Runs one budgeted display pass and returns what happened.
    ///
    /// The pass picks one of three paths:
    ///
    /// - **Skip** — the backlog is clean and drained. The cached texture is
    ///   blitted as-is and no command runs.
    /// - **Fresh** — the backlog is dirty. The texture is released and
    ///   rebuilt, the cursor rewinds, and replay starts from the first
    ///   command.
    /// - **Resume** — the backlog is clean but commands are pending from an
    ///   earlier pass that stopped on budget. Replay continues at the cursor
    ///   against the existing texture.
    ///
    /// After each command the pass compares time spent against the budget
    /// and stops once the budget is spent. A stopped pass schedules a
    /// follow-up frame for `window` on `redraw` and reports
    /// [`DisplayOutcome::Yielded`]; the next call resumes where it halted.
    /// A single command is never split: one that overruns the whole budget
    /// extends its frame instead.
    ///
    /// The backlog lock is held for the entire call. Draw actions must not
    /// add, remove, or otherwise touch this canvas's backlog, or they will
    /// deadlock.
    ///
    /// # Panics
    ///
    /// Panics if the surface reports no texture after
    /// [`blit`](crate::backend::Surface::blit) even though a pass must run.
    /// That means the [`Surface`](crate::backend::Surface) implementation
    /// broke its contract, not that the caller misused the canvas.
    pub fn display(
        &mut self,
        window: WindowId,
        frame: Rect,
        painter: &mut dyn Painter,
        redraw: &dyn RedrawScheduler,
        tracer: &mut Tracer<'_>,
    ) -> DisplayReport {
        let pass_index = self.passes;
        self.passes += 1;

        let clock = self.clock.as_ref();
        let started = clock.now();
        let begin_at = started.duration_since(self.epoch);
        let budget = self.budget;

        // Held for the whole call, so edits from other threads land either
        // entirely before or entirely after this pass.
        let mut state = self.backlog.lock();
        let was_dirty = state.dirty;

        if was_dirty {
            self.surface.unload(painter);
        }
        let blits = self.surface.blit(painter, frame);

        if !was_dirty && state.queue.is_drained() {
            tracer.skip(&SkipEvent {
                window,
                pass_index,
                at: begin_at,
            });
            return DisplayReport {
                outcome: DisplayOutcome::Skipped,
                blits,
                executed: 0,
                skipped: 0,
                remaining: state.queue.remaining(),
                elapsed: clock.now().duration_since(started),
                budget,
            };
        }

        let Some(texture) = self.surface.texture() else {
            panic!("surface produced no cache texture after blit; replay has nowhere to draw");
        };

        let origin = if was_dirty {
            PassOrigin::Fresh
        } else {
            PassOrigin::Resumed
        };
        if was_dirty {
            state.queue.rewind();
        }
        tracer.pass_begin(&PassBeginEvent {
            window,
            pass_index,
            origin,
            pending: state.queue.remaining(),
            at: begin_at,
        });

        painter.push_target(texture);
        painter.set_blend_mode(BlendMode::SourceOver);

        let mut executed = 0_usize;
        let mut skipped = 0_usize;
        state.queue.advance(|command| {
            let disabled = command.is_disabled();
            if disabled {
                skipped += 1;
            } else {
                command.run(painter);
                executed += 1;
            }
            let elapsed = clock.now().duration_since(started);
            #[cfg(feature = "trace-rich")]
            tracer.command_run(&CommandRunEvent {
                pass_index,
                id: command.id(),
                skipped: disabled,
                at: begin_at + elapsed,
                elapsed,
            });
            if elapsed >= budget {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        painter.pop_target();
        state.dirty = false;

        let remaining = state.queue.remaining();
        let elapsed = clock.now().duration_since(started);

        if remaining > 0 {
            redraw.request_redraw(window);
            tracer.redraw_request(&RedrawRequestEvent {
                window,
                pass_index,
                remaining,
                at: begin_at + elapsed,
            });
        }

        let outcome = if remaining > 0 {
            DisplayOutcome::Yielded
        } else if origin == PassOrigin::Fresh {
            DisplayOutcome::Completed
        } else {
            DisplayOutcome::Resumed
        };
        tracer.pass_end(&PassEndEvent {
            window,
            pass_index,
            outcome,
            executed,
            skipped,
            remaining,
            elapsed,
            budget,
            at: begin_at + elapsed,
        });

        DisplayReport {
            outcome,
            blits,
            executed,
            skipped,
            remaining,
            elapsed,
            budget,
        }
    }
}
