use std::time::{Duration, Instant};

/// Window over which the frames-per-second estimate is averaged.
const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,

    /// Frames per second averaged over the last completed window.
    pub fps: f32,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped to avoid pathological values when the application is
/// paused by the debugger, minimized, or stalls. The fps estimate uses the raw
/// (unclamped) frame durations.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
    fps: FpsCounter,
}

impl FrameClock {
    /// Creates a new clock with default clamps (0.1 ms to 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
            fps: FpsCounter::default(),
        }
    }

    /// Resets the clock baseline.
    ///
    /// Useful after surface reconfigure events or when resuming from suspension.
    pub fn reset(&mut self) {
        self.last = Instant::now();
        self.fps = FpsCounter::default();
    }

    /// Latest frames-per-second estimate; zero until the first window completes.
    pub fn fps(&self) -> f32 {
        self.fps.value
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let raw = now.saturating_duration_since(self.last);
        self.last = now;

        self.fps.record(raw);
        let dt = raw.clamp(self.dt_min, self.dt_max);

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
            fps: self.fps.value,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default)]
struct FpsCounter {
    frames: u32,
    elapsed: Duration,
    value: f32,
}

impl FpsCounter {
    fn record(&mut self, frame: Duration) {
        self.frames += 1;
        self.elapsed += frame;
        if self.elapsed >= FPS_WINDOW {
            self.value = self.frames as f32 / self.elapsed.as_secs_f32();
            self.frames = 0;
            self.elapsed = Duration::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_updates_once_per_window() {
        let mut c = FpsCounter::default();
        for _ in 0..29 {
            c.record(Duration::from_millis(10));
        }
        assert_eq!(c.value, 0.0);

        // 50 frames of 10 ms complete the first window
        for _ in 0..21 {
            c.record(Duration::from_millis(10));
        }
        assert!((c.value - 100.0).abs() < 0.01, "{}", c.value);
        assert_eq!(c.frames, 0);
    }

    #[test]
    fn tick_counts_frames_and_clamps_dt() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(2));
        let a = clock.tick();
        let b = clock.tick();
        assert_eq!(a.frame_index, 0);
        assert_eq!(b.frame_index, 1);
        assert!(b.dt >= 0.001 && b.dt <= 0.002);
    }
}
