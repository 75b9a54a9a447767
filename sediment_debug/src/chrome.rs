// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};
use std::time::Duration;

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Render passes become begin/end pairs on the window's track; skips, redraw
/// requests, and per-command records become instant events. Timestamps are
/// microseconds since the canvas epoch.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Skip(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Skip",
                    "cat": "Display",
                    "ts": us(e.at),
                    "pid": e.window.0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "pass_index": e.pass_index,
                    }
                }));
            }
            RecordedEvent::PassBegin(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": "Pass",
                    "cat": "Display",
                    "ts": us(e.at),
                    "pid": e.window.0,
                    "tid": 0,
                    "args": {
                        "pass_index": e.pass_index,
                        "origin": format!("{:?}", e.origin),
                        "pending": e.pending,
                    }
                }));
            }
            RecordedEvent::PassEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": "Pass",
                    "cat": "Display",
                    "ts": us(e.at),
                    "pid": e.window.0,
                    "tid": 0,
                    "args": {
                        "pass_index": e.pass_index,
                        "outcome": format!("{:?}", e.outcome),
                        "executed": e.executed,
                        "skipped": e.skipped,
                        "remaining": e.remaining,
                        "elapsed_us": us(e.elapsed),
                        "budget_us": us(e.budget),
                    }
                }));
            }
            RecordedEvent::RedrawRequest(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "RedrawRequest",
                    "cat": "Display",
                    "ts": us(e.at),
                    "pid": e.window.0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "pass_index": e.pass_index,
                        "remaining": e.remaining,
                    }
                }));
            }
            RecordedEvent::CommandRun {
                pass_index,
                id,
                skipped,
                at,
                elapsed,
            } => {
                events.push(json!({
                    "ph": "i",
                    "name": "CommandRun",
                    "cat": "Rich",
                    "ts": us(at),
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "pass_index": pass_index,
                        "id": id,
                        "skipped": skipped,
                        "elapsed_us": us(elapsed),
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn us(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use sediment_core::display::DisplayOutcome;
    use sediment_core::redraw::WindowId;
    use sediment_core::trace::{
        PassBeginEvent, PassEndEvent, PassOrigin, RedrawRequestEvent, TraceSink,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_pass_begin(&PassBeginEvent {
            window: WindowId(1),
            pass_index: 0,
            origin: PassOrigin::Fresh,
            pending: 6,
            at: Duration::from_millis(1),
        });
        rec.on_pass_end(&PassEndEvent {
            window: WindowId(1),
            pass_index: 0,
            outcome: DisplayOutcome::Yielded,
            executed: 4,
            skipped: 0,
            remaining: 2,
            elapsed: Duration::from_millis(10),
            budget: Duration::from_millis(10),
            at: Duration::from_millis(11),
        });
        rec.on_redraw_request(&RedrawRequestEvent {
            window: WindowId(1),
            pass_index: 0,
            remaining: 2,
            at: Duration::from_millis(11),
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        // Should parse as a JSON array.
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        // First event opens the pass.
        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["name"], "Pass");
        assert_eq!(parsed[0]["ts"], 1000.0);

        // Second closes it with the outcome.
        assert_eq!(parsed[1]["ph"], "E");
        assert_eq!(parsed[1]["args"]["outcome"], "Yielded");

        // Third is the instant redraw request.
        assert_eq!(parsed[2]["ph"], "i");
        assert_eq!(parsed[2]["name"], "RedrawRequest");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
