// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable pass-pacing metrics and grading for demo harnesses.

#![no_std]

extern crate alloc;

use alloc::string::String;
use core::time::Duration;

use sediment_core::display::{DisplayOutcome, DisplayReport};

/// Letter grade for display-pass pacing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaceGrade {
    /// On budget with rare yields.
    A,
    /// Mild overruns or regular yielding.
    B,
    /// Sustained overruns; the backlog drains slowly.
    C,
    /// Pacing broken: heavy overruns or a backlog that never drains.
    D,
}

impl PaceGrade {
    /// Returns a short label for HUD rendering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

/// Aggregated report returned by [`PaceTracker::observe`].
#[derive(Clone, Copy, Debug)]
pub struct PaceReport {
    /// Current grade.
    pub grade: PaceGrade,
    /// Yielded passes per 1000 observed display calls.
    pub yield_rate_per_1000: f64,
    /// Skipped calls per 1000 observed display calls.
    pub skip_rate_per_1000: f64,
    /// Current call's elapsed time as a fraction of its budget.
    pub overrun_ratio: f64,
    /// Total display calls observed.
    pub total_passes: u64,
    /// Total calls that stopped on budget with work pending.
    pub yielded_passes: u64,
    /// Total calls that found nothing to do.
    pub skipped_passes: u64,
}

/// Rolling pace tracker with fixed-size overrun-ratio history.
#[derive(Debug)]
pub struct PaceTracker<const N: usize> {
    ratios: [f64; N],
    cursor: usize,
    total_passes: u64,
    yielded_passes: u64,
    skipped_passes: u64,
}

impl<const N: usize> Default for PaceTracker<N> {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<const N: usize> PaceTracker<N> {
    /// Creates a tracker with `seed_ratio` prefilled in the ring buffer.
    #[must_use]
    pub const fn new(seed_ratio: f64) -> Self {
        Self {
            ratios: [seed_ratio; N],
            cursor: 0,
            total_passes: 0,
            yielded_passes: 0,
            skipped_passes: 0,
        }
    }

    /// Observes one display call and returns an updated report.
    #[must_use]
    pub fn observe(&mut self, report: &DisplayReport) -> PaceReport {
        self.total_passes = self.total_passes.saturating_add(1);
        let ratio = overrun_ratio(report.elapsed, report.budget);
        self.ratios[self.cursor % N] = ratio;
        self.cursor = (self.cursor + 1) % N;

        match report.outcome {
            DisplayOutcome::Yielded => {
                self.yielded_passes = self.yielded_passes.saturating_add(1);
            }
            DisplayOutcome::Skipped => {
                self.skipped_passes = self.skipped_passes.saturating_add(1);
            }
            DisplayOutcome::Completed | DisplayOutcome::Resumed => {}
        }

        let yield_rate = per_1000(self.yielded_passes, self.total_passes);
        let skip_rate = per_1000(self.skipped_passes, self.total_passes);
        let grade = grade_for(ratio, yield_rate);

        PaceReport {
            grade,
            yield_rate_per_1000: yield_rate,
            skip_rate_per_1000: skip_rate,
            overrun_ratio: ratio,
            total_passes: self.total_passes,
            yielded_passes: self.yielded_passes,
            skipped_passes: self.skipped_passes,
        }
    }

    /// Returns ring-buffer overrun ratios oldest→newest.
    #[must_use]
    pub fn overrun_ratios(&self) -> [f64; N] {
        let mut out = [0.0; N];
        let mut i = 0;
        while i < N {
            let idx = (self.cursor + i) % N;
            out[i] = self.ratios[idx];
            i += 1;
        }
        out
    }

    /// Returns an ASCII sparkline over `overrun_ratios()`.
    #[must_use]
    pub fn sparkline_ascii(&self, min_ratio: f64, max_ratio: f64) -> String {
        const LEVELS: &[u8] = b" .:-=+*#%@";
        let mut out = String::with_capacity(N);
        let mut i = 0;
        while i < N {
            let idx = (self.cursor + i) % N;
            let v = self.ratios[idx].clamp(min_ratio, max_ratio);
            let t = (v - min_ratio) / (max_ratio - min_ratio);
            #[expect(
                clippy::cast_possible_truncation,
                reason = "index is clamped to ASCII level count"
            )]
            let level = (t * (LEVELS.len() as f64 - 1.0) + 0.5) as usize;
            out.push(LEVELS[level] as char);
            i += 1;
        }
        out
    }
}

fn overrun_ratio(elapsed: Duration, budget: Duration) -> f64 {
    if budget.is_zero() {
        return if elapsed.is_zero() { 0.0 } else { f64::INFINITY };
    }
    elapsed.as_secs_f64() / budget.as_secs_f64()
}

fn per_1000(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 1000.0 / total as f64
    }
}

fn grade_for(overrun_ratio: f64, yield_rate_per_1000: f64) -> PaceGrade {
    if overrun_ratio < 1.1 && yield_rate_per_1000 < 100.0 {
        PaceGrade::A
    } else if overrun_ratio < 1.5 && yield_rate_per_1000 < 400.0 {
        PaceGrade::B
    } else if overrun_ratio < 2.5 && yield_rate_per_1000 < 800.0 {
        PaceGrade::C
    } else {
        PaceGrade::D
    }
}
