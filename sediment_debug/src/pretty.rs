// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are printed as microseconds since the canvas epoch.

use std::io::Write;
use std::time::Duration;

use sediment_core::display::DisplayOutcome;
use sediment_core::trace::{
    CommandRunEvent, PassBeginEvent, PassEndEvent, PassOrigin, RedrawRequestEvent, SkipEvent,
    TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

fn us(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1000.0
}

fn origin_name(origin: PassOrigin) -> &'static str {
    match origin {
        PassOrigin::Fresh => "fresh",
        PassOrigin::Resumed => "resumed",
    }
}

fn outcome_name(outcome: DisplayOutcome) -> &'static str {
    match outcome {
        DisplayOutcome::Skipped => "skipped",
        DisplayOutcome::Completed => "completed",
        DisplayOutcome::Resumed => "resumed",
        DisplayOutcome::Yielded => "yielded",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_skip(&mut self, e: &SkipEvent) {
        let _ = writeln!(
            self.writer,
            "[skip] window={} pass={} at {:.1}µs",
            e.window.0,
            e.pass_index,
            us(e.at),
        );
    }

    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[pass:begin] window={} pass={} {} pending={} at {:.1}µs",
            e.window.0,
            e.pass_index,
            origin_name(e.origin),
            e.pending,
            us(e.at),
        );
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        let _ = writeln!(
            self.writer,
            "[pass:end] window={} pass={} {} executed={} skipped={} remaining={} \
             elapsed={:.1}µs budget={:.1}µs",
            e.window.0,
            e.pass_index,
            outcome_name(e.outcome),
            e.executed,
            e.skipped,
            e.remaining,
            us(e.elapsed),
            us(e.budget),
        );
    }

    fn on_redraw_request(&mut self, e: &RedrawRequestEvent) {
        let _ = writeln!(
            self.writer,
            "[redraw] window={} pass={} remaining={} at {:.1}µs",
            e.window.0,
            e.pass_index,
            e.remaining,
            us(e.at),
        );
    }

    fn on_command_run(&mut self, e: &CommandRunEvent) {
        let ran = if e.skipped { "skipped" } else { "ran" };
        let _ = writeln!(
            self.writer,
            "[command] pass={} id={} {ran} at {:.1}µs elapsed={:.1}µs",
            e.pass_index,
            e.id.as_u64(),
            us(e.at),
            us(e.elapsed),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sediment_core::redraw::WindowId;

    #[test]
    fn pretty_print_pass_end() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_pass_end(&PassEndEvent {
            window: WindowId(1),
            pass_index: 2,
            outcome: DisplayOutcome::Yielded,
            executed: 5,
            skipped: 0,
            remaining: 3,
            elapsed: Duration::from_micros(10_500),
            budget: Duration::from_millis(10),
            at: Duration::from_micros(31_000),
        });
        let output = String::from_utf8(sink.writer).unwrap();
        assert!(output.contains("[pass:end]"), "got: {output}");
        assert!(output.contains("pass=2"), "got: {output}");
        assert!(output.contains("yielded"), "got: {output}");
        assert!(output.contains("elapsed=10500.0µs"), "got: {output}");
    }

    #[test]
    fn pretty_print_pass_begin() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_pass_begin(&PassBeginEvent {
            window: WindowId(0),
            pass_index: 0,
            origin: PassOrigin::Fresh,
            pending: 9,
            at: Duration::ZERO,
        });
        let output = String::from_utf8(sink.writer).unwrap();
        assert!(output.contains("[pass:begin]"), "got: {output}");
        assert!(output.contains("fresh"), "got: {output}");
        assert!(output.contains("pending=9"), "got: {output}");
    }
}
