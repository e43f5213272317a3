use std::time::{Duration, Instant};

/// Longest step the simulation takes in one frame; stalls (window drags,
/// breakpoints) do not teleport the player.
pub const MAX_FRAME_DT: Duration = Duration::from_millis(100);
/// How often [`FrameClock::record`] produces a [`FrameReport`].
pub const REPORT_EVERY: Duration = Duration::from_secs(3);

/// Averages over one reporting window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub frames: usize,
    pub avg_ms: f64,
    pub fps: f64,
}

/// Per-frame delta time plus a rolling render-time average.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    last: Instant,
    /* benchmarking window */
    acc_time: Duration,
    acc_frames: usize,
    last_report: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::starting_at(Instant::now())
    }
}

impl FrameClock {
    pub fn starting_at(now: Instant) -> Self {
        Self {
            last: now,
            acc_time: Duration::ZERO,
            acc_frames: 0,
            last_report: now,
        }
    }

    /// Seconds since the previous tick, capped at [`MAX_FRAME_DT`].
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last).min(MAX_FRAME_DT);
        self.last = now;
        dt.as_secs_f32()
    }

    /// Add one frame's render time; every [`REPORT_EVERY`] returns the
    /// window's average and starts a new window.
    pub fn record(&mut self, frame_time: Duration) -> Option<FrameReport> {
        self.record_at(frame_time, Instant::now())
    }

    pub fn record_at(&mut self, frame_time: Duration, now: Instant) -> Option<FrameReport> {
        self.acc_time += frame_time;
        self.acc_frames += 1;
        if now.saturating_duration_since(self.last_report) < REPORT_EVERY {
            return None;
        }

        let avg_ms = self.acc_time.as_secs_f64() * 1000.0 / self.acc_frames as f64;
        let report = FrameReport {
            frames: self.acc_frames,
            avg_ms,
            fps: if avg_ms > 0.0 { 1000.0 / avg_ms } else { 0.0 },
        };
        self.acc_time = Duration::ZERO;
        self.acc_frames = 0;
        self.last_report = now;
        Some(report)
    }
}
