// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Timestamps and durations are stored as whole nanoseconds, saturating at
//! `u64::MAX`; queue counts are capped at `u32::MAX`. Command ids decode as
//! raw `u64` values because fresh [`CommandId`](sediment_core::command::CommandId)s
//! are only minted at command creation.

use std::time::Duration;

use sediment_core::display::DisplayOutcome;
use sediment_core::redraw::WindowId;
use sediment_core::trace::{
    CommandRunEvent, PassBeginEvent, PassEndEvent, PassOrigin, RedrawRequestEvent, SkipEvent,
    TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_SKIP: u8 = 1;
const TAG_PASS_BEGIN: u8 = 2;
const TAG_PASS_END: u8 = 3;
const TAG_REDRAW_REQUEST: u8 = 4;
const TAG_COMMAND_RUN: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_duration(&mut self, d: Duration) {
        self.write_u64(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX));
    }

    fn write_count(&mut self, v: usize) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "queue counts are capped at u32::MAX for recording"
        )]
        self.write_u32(v.min(u32::MAX as usize) as u32);
    }

    fn write_origin(&mut self, o: PassOrigin) {
        self.write_u8(match o {
            PassOrigin::Fresh => 0,
            PassOrigin::Resumed => 1,
        });
    }

    fn write_outcome(&mut self, o: DisplayOutcome) {
        self.write_u8(match o {
            DisplayOutcome::Skipped => 0,
            DisplayOutcome::Completed => 1,
            DisplayOutcome::Resumed => 2,
            DisplayOutcome::Yielded => 3,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_skip(&mut self, e: &SkipEvent) {
        self.write_u8(TAG_SKIP);
        self.write_u32(e.window.0);
        self.write_u64(e.pass_index);
        self.write_duration(e.at);
    }

    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.write_u8(TAG_PASS_BEGIN);
        self.write_u32(e.window.0);
        self.write_u64(e.pass_index);
        self.write_origin(e.origin);
        self.write_count(e.pending);
        self.write_duration(e.at);
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        self.write_u8(TAG_PASS_END);
        self.write_u32(e.window.0);
        self.write_u64(e.pass_index);
        self.write_outcome(e.outcome);
        self.write_count(e.executed);
        self.write_count(e.skipped);
        self.write_count(e.remaining);
        self.write_duration(e.elapsed);
        self.write_duration(e.budget);
        self.write_duration(e.at);
    }

    fn on_redraw_request(&mut self, e: &RedrawRequestEvent) {
        self.write_u8(TAG_REDRAW_REQUEST);
        self.write_u32(e.window.0);
        self.write_u64(e.pass_index);
        self.write_count(e.remaining);
        self.write_duration(e.at);
    }

    fn on_command_run(&mut self, e: &CommandRunEvent) {
        self.write_u8(TAG_COMMAND_RUN);
        self.write_u64(e.pass_index);
        self.write_u64(e.id.as_u64());
        self.write_u8(u8::from(e.skipped));
        self.write_duration(e.at);
        self.write_duration(e.elapsed);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`SkipEvent`].
    Skip(SkipEvent),
    /// A [`PassBeginEvent`].
    PassBegin(PassBeginEvent),
    /// A [`PassEndEvent`].
    PassEnd(PassEndEvent),
    /// A [`RedrawRequestEvent`].
    RedrawRequest(RedrawRequestEvent),
    /// A [`CommandRunEvent`], with the command id as its raw value.
    CommandRun {
        /// Monotonic display-call counter of the canvas.
        pass_index: u64,
        /// Raw id of the visited command.
        id: u64,
        /// True when the command was skipped as disabled.
        skipped: bool,
        /// Time since the canvas epoch, after the command ran.
        at: Duration,
        /// Time since pass start, after the command ran.
        elapsed: Duration,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_duration(&mut self) -> Option<Duration> {
        self.read_u64().map(Duration::from_nanos)
    }

    fn read_count(&mut self) -> Option<usize> {
        self.read_u32().map(|v| v as usize)
    }

    fn read_origin(&mut self) -> Option<PassOrigin> {
        Some(match self.read_u8()? {
            0 => PassOrigin::Fresh,
            _ => PassOrigin::Resumed,
        })
    }

    fn read_outcome(&mut self) -> Option<DisplayOutcome> {
        Some(match self.read_u8()? {
            0 => DisplayOutcome::Skipped,
            1 => DisplayOutcome::Completed,
            2 => DisplayOutcome::Resumed,
            _ => DisplayOutcome::Yielded,
        })
    }

    fn decode_skip(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Skip(SkipEvent {
            window: WindowId(self.read_u32()?),
            pass_index: self.read_u64()?,
            at: self.read_duration()?,
        }))
    }

    fn decode_pass_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassBegin(PassBeginEvent {
            window: WindowId(self.read_u32()?),
            pass_index: self.read_u64()?,
            origin: self.read_origin()?,
            pending: self.read_count()?,
            at: self.read_duration()?,
        }))
    }

    fn decode_pass_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassEnd(PassEndEvent {
            window: WindowId(self.read_u32()?),
            pass_index: self.read_u64()?,
            outcome: self.read_outcome()?,
            executed: self.read_count()?,
            skipped: self.read_count()?,
            remaining: self.read_count()?,
            elapsed: self.read_duration()?,
            budget: self.read_duration()?,
            at: self.read_duration()?,
        }))
    }

    fn decode_redraw_request(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RedrawRequest(RedrawRequestEvent {
            window: WindowId(self.read_u32()?),
            pass_index: self.read_u64()?,
            remaining: self.read_count()?,
            at: self.read_duration()?,
        }))
    }

    fn decode_command_run(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::CommandRun {
            pass_index: self.read_u64()?,
            id: self.read_u64()?,
            skipped: self.read_u8()? != 0,
            at: self.read_duration()?,
            elapsed: self.read_duration()?,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_SKIP => self.decode_skip(),
            TAG_PASS_BEGIN => self.decode_pass_begin(),
            TAG_PASS_END => self.decode_pass_end(),
            TAG_REDRAW_REQUEST => self.decode_redraw_request(),
            TAG_COMMAND_RUN => self.decode_command_run(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
