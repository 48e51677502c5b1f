// SPDX-FileCopyrightText: 2026 The flexradio-rs Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
A bounded, time-indexed queue that smooths arrival jitter of binary
data-channel frames (panadapter bins, waterfall lines) and delivers
them at a steady display cadence. See §4.7 of the design spec.

The buffer never blocks: under pressure it drops the oldest frames
rather than growing without bound, and a display tick that finds no
frame old enough to deliver simply delivers nothing.
*/

use std::collections::VecDeque;
use std::time::Duration;

/// Tunables for one [`JitterBuffer`]. All fields have documented
/// defaults via [`Default`]; see §4.7 and the ambient-configuration
/// note in the design spec — this crate does not pull in a
/// configuration-file format, tunables are plain struct fields.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JitterConfig {
    /// How far behind "now" a frame must be before it is eligible for
    /// delivery, in milliseconds. Default 60ms.
    pub target_ms: u64,
    /// The maximum span, in milliseconds, between the oldest and
    /// newest buffered frame. Frames older than this are dropped.
    /// Default 120ms.
    pub max_queue_ms: u64,
    /// How often telemetry is recomputed and available via
    /// [`JitterBuffer::telemetry`]. Default 2s; informational only,
    /// the buffer does not spawn a timer itself (see §5 of the design
    /// spec: no internal thread/task pool), callers drive delivery
    /// and telemetry polling from their own display tick.
    pub telemetry_interval: Duration,
}

impl Default for JitterConfig {
    fn default() -> JitterConfig {
        JitterConfig { target_ms: 60, max_queue_ms: 120, telemetry_interval: Duration::from_secs(2) }
    }
}

/// One buffered frame, tagged with its arrival time on a monotonic
/// clock. `t_ms` is relative to an arbitrary epoch fixed at the first
/// [`JitterBuffer::push`] call (this crate never reads the wall
/// clock directly; see `DESIGN.md`), so callers supply `now_ms` into
/// every call rather than this buffer reading a clock itself.
#[derive(Clone, Debug)]
struct Frame<T> {
    t_ms: u64,
    value: T,
}

/// Point-in-time jitter/delivery telemetry, recomputed roughly every
/// [`JitterConfig::telemetry_interval`]. See §4.7 of the design spec.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JitterTelemetry {
    /// Span, in ms, between the oldest and newest buffered frame.
    pub queue_span_ms: u64,
    /// Running drop count; halved after every telemetry report so a
    /// burst of drops decays rather than accumulating forever.
    pub dropped_count: u64,
    /// Recent arrival rate, in frames per second.
    pub arrival_fps: f64,
    /// 95th percentile of inter-arrival delta, relative to the
    /// median inter-arrival delta (1.0 == no jitter).
    pub p95_jitter_ratio: f64,
}

/// A bounded time-indexed queue of frames of type `T`. See module docs
/// and §4.7 of the design spec.
pub struct JitterBuffer<T> {
    config: JitterConfig,
    frames: VecDeque<Frame<T>>,
    dropped_count: u64,
    arrivals: VecDeque<u64>,
    last_telemetry_ms: Option<u64>,
    telemetry: JitterTelemetry,
}

impl<T> JitterBuffer<T> {
    /// Builds a buffer with the given configuration.
    pub fn new(config: JitterConfig) -> JitterBuffer<T> {
        JitterBuffer {
            config,
            frames: VecDeque::new(),
            dropped_count: 0,
            arrivals: VecDeque::new(),
            last_telemetry_ms: None,
            telemetry: JitterTelemetry::default(),
        }
    }

    /// The configuration this buffer was built with.
    pub fn config(&self) -> &JitterConfig {
        &self.config
    }

    /// Pushes a frame that arrived at `now_ms` (monotonic,
    /// caller-supplied). Enforces the `max_queue_ms` span invariant by
    /// dropping frames from the front until it holds, and refreshes
    /// telemetry if `telemetry_interval` has elapsed since the last
    /// report.
    pub fn push(&mut self, value: T, now_ms: u64) {
        self.arrivals.push_back(now_ms);
        while self.arrivals.len() > 64 {
            self.arrivals.pop_front();
        }
        self.frames.push_back(Frame { t_ms: now_ms, value });
        self.enforce_span();
        self.maybe_report_telemetry(now_ms);
    }

    fn enforce_span(&mut self) {
        let Some(newest) = self.frames.back().map(|f| f.t_ms) else {
            return;
        };
        while let Some(oldest) = self.frames.front() {
            if newest.saturating_sub(oldest.t_ms) <= self.config.max_queue_ms {
                break;
            }
            self.frames.pop_front();
            self.dropped_count += 1;
        }
    }

    /// Delivers the newest frame with `t_ms <= now_ms - target_ms`, if
    /// any, discarding (not coalescing) any older buffered frames in
    /// the process — only the single most recent eligible frame is
    /// ever handed to the caller on one tick. Returns `None` if no
    /// frame is old enough yet.
    pub fn tick(&mut self, now_ms: u64) -> Option<T> {
        let deadline = now_ms.saturating_sub(self.config.target_ms);
        let mut deliver_index = None;
        for (i, frame) in self.frames.iter().enumerate() {
            if frame.t_ms <= deadline {
                deliver_index = Some(i);
            } else {
                break;
            }
        }
        let index = deliver_index?;
        // Discard everything up to and including the delivered frame;
        // frames older than it were never going to be delivered
        // (display cadence only wants the newest eligible one).
        let discarded = index;
        self.dropped_count += discarded as u64;
        for _ in 0..discarded {
            self.frames.pop_front();
        }
        self.frames.pop_front().map(|f| f.value)
    }

    /// Number of frames currently buffered.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the buffer currently holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Span, in ms, between the oldest and newest buffered frame (0 if
    /// fewer than two frames are buffered).
    pub fn span_ms(&self) -> u64 {
        match (self.frames.front(), self.frames.back()) {
            (Some(oldest), Some(newest)) => newest.t_ms.saturating_sub(oldest.t_ms),
            _ => 0,
        }
    }

    /// The most recently computed telemetry snapshot. Recomputed
    /// lazily inside [`JitterBuffer::push`] at most once per
    /// `telemetry_interval`.
    pub fn telemetry(&self) -> JitterTelemetry {
        self.telemetry
    }

    fn maybe_report_telemetry(&mut self, now_ms: u64) {
        let interval_ms = self.config.telemetry_interval.as_millis() as u64;
        if let Some(last) = self.last_telemetry_ms {
            if now_ms.saturating_sub(last) < interval_ms {
                return;
            }
        }
        self.last_telemetry_ms = Some(now_ms);

        let deltas: Vec<u64> = self.arrivals.make_contiguous().windows(2).map(|w| w[1].saturating_sub(w[0])).collect();
        let arrival_fps = match (self.arrivals.front(), self.arrivals.back(), self.arrivals.len()) {
            (Some(first), Some(last), n) if n > 1 && last > first => {
                (n as f64 - 1.0) / ((last - first) as f64 / 1000.0)
            }
            _ => 0.0,
        };
        let p95_jitter_ratio = percentile_ratio(&deltas);

        self.telemetry = JitterTelemetry {
            queue_span_ms: self.span_ms(),
            dropped_count: self.dropped_count,
            arrival_fps,
            p95_jitter_ratio,
        };
        // Decay: a quiet period should not leave old bursts of drops
        // looking like an ongoing problem (§4.7).
        self.dropped_count /= 2;
    }
}

/// The 95th-percentile inter-arrival delta, relative to the median
/// delta. Returns 1.0 (no observed jitter) if fewer than two deltas
/// are available or the median is zero.
fn percentile_ratio(deltas: &[u64]) -> f64 {
    if deltas.len() < 2 {
        return 1.0;
    }
    let mut sorted = deltas.to_vec();
    sorted.sort_unstable();
    let median = sorted[sorted.len() / 2] as f64;
    if median == 0.0 {
        return 1.0;
    }
    let p95_index = ((sorted.len() as f64) * 0.95).ceil() as usize;
    let p95 = sorted[p95_index.min(sorted.len() - 1)] as f64;
    p95 / median
}
