// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resumable, time-budgeted drawing-command surface.
//!
//! `sediment_core` keeps a retained backlog of deferred draw commands and
//! replays them onto a cached texture under a per-frame time budget. When a
//! pass runs out of budget it parks a cursor mid-stream and resumes on a
//! later frame, so an arbitrarily long command list never stalls the event
//! loop or starves input handling.
//!
//! # Architecture
//!
//! ```text
//!   callers (any thread)              render thread (one call per frame)
//!       │                                 │
//!       ▼                                 ▼
//!   Canvas::add* ───► Backlog        Canvas::display()
//!                        │                │
//!                        └── Mutex[ CursorQueue + dirty ] ──┐
//!                                         │                 │
//!                    Surface::blit ──► Painter ◄── replay from cursor
//!                                         │
//!                    budget spent? ──► RedrawScheduler::request_redraw
//!                                         │
//!                                         ▼
//!                              DisplayReport (outcome + blits)
//! ```
//!
//! **[`queue`]** — [`CursorQueue`](queue::CursorQueue): append-only sequence
//! with a persistent iteration cursor that survives partial drains.
//!
//! **[`command`]** — [`DrawCommand`](command::DrawCommand): a named,
//! individually disable-able deferred draw closure with a process-unique id.
//!
//! **[`backlog`]** — [`Backlog`](backlog::Backlog): the mutex-guarded queue
//! of pending commands plus the dirty flag. Clone the handle to mutate from
//! event-dispatch threads while the render thread displays.
//!
//! **[`canvas`]** — [`Canvas`](canvas::Canvas): owns the surface, the
//! backlog, the frame budget, and the clock; the public add/remove/resize
//! surface plus the shape-recording helpers.
//!
//! **[`display`]** — the per-frame driver: skip when the cached texture is
//! current, otherwise replay commands onto it under the budget and schedule
//! a follow-up redraw for whatever did not fit.
//!
//! **[`backend`]** — the [`Painter`](backend::Painter) and
//! [`Surface`](backend::Surface) traits rendering backends implement, plus
//! the shared handle and color types.
//!
//! **[`redraw`]** — [`RedrawScheduler`](redraw::RedrawScheduler) trait and a
//! coalescing poll-able implementation.
//!
//! **[`geom`]** — physical pixel sizes and DPI-aware conversion.
//!
//! **[`clock`]** — [`Clock`](clock::Clock) seam over monotonic time, with a
//! manually advanced clock for deterministic budget tests.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! display-pass instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-command
//!   events.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod backend;
pub mod backlog;
pub mod canvas;
pub mod clock;
pub mod command;
pub mod display;
pub mod geom;
pub mod queue;
pub mod redraw;
pub mod trace;

#[cfg(test)]
mod test_support;
