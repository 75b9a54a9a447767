// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated frame loop that exercises the budgeted display pipeline end to
//! end on the software raster backend.
//!
//! Fills a canvas with draw commands of known manual-clock cost, then drains
//! the backlog by polling redraw requests the way an event loop would:
//! passes yield when the budget runs out and resume on the next synthetic
//! frame. Trace events go to both a
//! [`PrettyPrintSink`](sediment_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](sediment_debug::recorder::RecorderSink); the run finishes
//! with a pace report, a Chrome trace JSON file, and an ASCII dump of the
//! final texture.

use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;
use std::time::Duration;

use kurbo::{Point, Rect, Size};

use sediment_backend_raster::{Pixmap, RasterPainter, RasterSurface};
use sediment_core::backend::Rgba8;
use sediment_core::canvas::{Canvas, CanvasOptions};
use sediment_core::clock::ManualClock;
use sediment_core::geom::PhysicalSize;
use sediment_core::redraw::{RedrawRequests, RedrawScheduler, WindowId};
use sediment_core::trace::{
    CommandRunEvent, PassBeginEvent, PassEndEvent, RedrawRequestEvent, SkipEvent, TraceSink,
    Tracer,
};
use sediment_debug::pretty::PrettyPrintSink;
use sediment_debug::recorder::RecorderSink;
use sediment_pace_harness::{PaceReport, PaceTracker};

const WINDOW: WindowId = WindowId(1);
const WIDTH: f64 = 96.0;
const HEIGHT: f64 = 64.0;

/// Per-frame replay budget.
const BUDGET: Duration = Duration::from_millis(10);
/// Simulated cost of one tile circle.
const TILE_COST: Duration = Duration::from_millis(3);
/// Simulated cost of the hatch overlay; deliberately larger than the whole
/// budget to show that a single command is never split.
const HEAVY_COST: Duration = Duration::from_millis(25);
/// Event-loop idle time between synthetic frames.
const FRAME_GAP: Duration = Duration::from_millis(6);

fn main() {
    // -- canvas over the raster backend -------------------------------------
    let clock = Arc::new(ManualClock::new());
    let surface = RasterSurface::new(Size::new(WIDTH, HEIGHT), 1.0, Rgba8::WHITE);
    let mut canvas = Canvas::new(
        Box::new(surface),
        CanvasOptions {
            budget: BUDGET,
            clock: clock.clone(),
        },
    );
    let mut painter = RasterPainter::new(PhysicalSize::new(96, 64));
    let frame = Rect::new(0.0, 0.0, WIDTH, HEIGHT);

    // -- scripted backlog ----------------------------------------------------
    // A 5×3 grid of tiles, a translucent hatch overlay that blows the whole
    // budget on its own, and a watermark that stays disabled.
    let teal = Rgba8::opaque(32, 128, 128);
    let rust = Rgba8::opaque(192, 96, 32);
    for row in 0..3 {
        for col in 0..5 {
            let center = Point::new(12.0 + f64::from(col) * 18.0, 12.0 + f64::from(row) * 20.0);
            let color = if (row + col) % 2 == 0 { teal } else { rust };
            add_tile(&canvas, &clock, center, color);
        }
    }

    let hatch_clock = Arc::clone(&clock);
    let hatch = canvas.add_named("hatch", move |painter| {
        painter.set_color(Rgba8::new(0, 0, 0, 64));
        for i in 0..12 {
            let x = f64::from(i) * 8.0;
            painter.draw_line(Point::new(x, 0.0), Point::new(x + 32.0, HEIGHT - 1.0));
        }
        hatch_clock.advance(HEAVY_COST);
    });

    let watermark = canvas.add_named("watermark", |painter| {
        painter.set_color(Rgba8::new(0, 0, 0, 32));
        painter.fill_rect(Rect::new(72.0, 52.0, 96.0, 64.0));
    });
    watermark.disable();

    // -- sinks + pace tracker ------------------------------------------------
    let mut tee = TeeSink {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        recorder: RecorderSink::new(),
    };
    let mut tracker = PaceTracker::<32>::new(0.0);
    let redraw = RedrawRequests::new();

    // -- drain the backlog ---------------------------------------------------
    // The initial request stands in for the frame an event loop delivers when
    // the window is first mapped; every later one comes from a yielded pass.
    redraw.request_redraw(WINDOW);
    let pace = drain_backlog(
        &mut canvas,
        &mut painter,
        frame,
        &redraw,
        &mut tee,
        &mut tracker,
        &clock,
    );
    report_pace("initial drain", pace);

    // -- edit: drop the hatch overlay and re-render ---------------------------
    canvas.remove(&hatch);
    redraw.request_redraw(WINDOW);
    let pace = drain_backlog(
        &mut canvas,
        &mut painter,
        frame,
        &redraw,
        &mut tee,
        &mut tracker,
        &clock,
    );
    report_pace("after removing the hatch", pace);

    // -- one more display to show the skip path ------------------------------
    let mut tracer = Tracer::new(&mut tee);
    let report = canvas.display(WINDOW, frame, &mut painter, &redraw, &mut tracer);
    painter.compose(&report.blits);
    let pace = tracker.observe(&report);
    report_pace("final", Some(pace));
    println!("overrun history: [{}]", tracker.sparkline_ascii(0.0, 2.0));

    // -- export Chrome trace --------------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    sediment_debug::chrome::export(tee.recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");
    println!("Wrote {path} ({} display calls)", pace.total_passes);

    // -- ASCII dump of the final texture --------------------------------------
    println!("{}", dump_ascii(painter.frame()));
}

fn add_tile(canvas: &Canvas, clock: &Arc<ManualClock>, center: Point, color: Rgba8) {
    let clock = Arc::clone(clock);
    canvas.add(move |painter| {
        painter.set_color(color);
        painter.fill_circle(center, 7.0);
        clock.advance(TILE_COST);
    });
}

fn report_pace(label: &str, pace: Option<PaceReport>) {
    if let Some(p) = pace {
        println!(
            "{label}: grade={} passes={} yields={} skips={}",
            p.grade.as_str(),
            p.total_passes,
            p.yielded_passes,
            p.skipped_passes,
        );
    }
}

/// Polls and serves redraw requests until the backlog stops asking for more
/// frames, returning the last pace report.
fn drain_backlog(
    canvas: &mut Canvas,
    painter: &mut RasterPainter,
    frame: Rect,
    redraw: &RedrawRequests,
    tee: &mut TeeSink,
    tracker: &mut PaceTracker<32>,
    clock: &ManualClock,
) -> Option<PaceReport> {
    let mut last = None;
    loop {
        let windows = redraw.drain();
        if windows.is_empty() {
            break;
        }
        for window in windows {
            let mut tracer = Tracer::new(tee);
            let report = canvas.display(window, frame, painter, redraw, &mut tracer);
            painter.compose(&report.blits);
            last = Some(tracker.observe(&report));
            clock.advance(FRAME_GAP);
        }
    }
    last
}

/// Fans trace events out to both the pretty printer and the recorder.
struct TeeSink {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for TeeSink {
    fn on_skip(&mut self, e: &SkipEvent) {
        self.pretty.on_skip(e);
        self.recorder.on_skip(e);
    }

    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.pretty.on_pass_begin(e);
        self.recorder.on_pass_begin(e);
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        self.pretty.on_pass_end(e);
        self.recorder.on_pass_end(e);
    }

    fn on_redraw_request(&mut self, e: &RedrawRequestEvent) {
        self.pretty.on_redraw_request(e);
        self.recorder.on_redraw_request(e);
    }

    fn on_command_run(&mut self, e: &CommandRunEvent) {
        self.pretty.on_command_run(e);
        self.recorder.on_command_run(e);
    }
}

/// Renders the frame pixmap as ASCII, darker pixels as denser glyphs.
fn dump_ascii(pixmap: &Pixmap) -> String {
    const LEVELS: [u8; 10] = *b" .:-=+*#%@";
    let size = pixmap.size();
    let mut out = String::new();
    let mut y = 0;
    while y < size.height {
        let mut x = 0;
        while x < size.width {
            let Some(px) = pixmap.pixel(x, y) else { break };
            let lum = (u32::from(px.r) + u32::from(px.g) + u32::from(px.b)) / 3;
            let level = ((255 - lum) * 9 / 255) as usize;
            out.push(LEVELS[level] as char);
            x += 2;
        }
        out.push('\n');
        y += 4;
    }
    out
}
