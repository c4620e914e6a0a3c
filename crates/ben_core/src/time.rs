use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;

/// Per-frame clock with an FPS cap.
///
/// The main loop runs one update and one draw per frame. `begin_frame` measures
/// the wall-clock delta since the previous frame; `next_frame_at` tells the
/// event loop when the next frame may start so the loop never runs faster than
/// `max_fps`.
pub struct FrameTimer {
    pub max_fps: f32,
    pub real_dt: f64,
    pub frame_count: u64,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
    frame_start: Instant,
    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
}

impl FrameTimer {
    pub fn new(max_fps: f32) -> Self {
        Self::starting_at(max_fps, Instant::now())
    }

    pub fn starting_at(max_fps: f32, now: Instant) -> Self {
        let max_fps = if max_fps > 0.0 { max_fps } else { 60.0 };
        let target = 1.0 / max_fps as f64;
        Self {
            max_fps,
            real_dt: 0.0,
            frame_count: 0,
            smoothed_fps: max_fps as f64,
            smoothed_frame_time_ms: target * 1000.0,
            frame_start: now,
            fps_samples: [target; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
        }
    }

    pub fn target_frame_time(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.max_fps as f64)
    }

    pub fn begin_frame(&mut self) {
        self.begin_frame_at(Instant::now());
    }

    pub fn begin_frame_at(&mut self, now: Instant) {
        self.real_dt = now.duration_since(self.frame_start).as_secs_f64();
        self.frame_start = now;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    /// Earliest instant the next frame may begin.
    pub fn next_frame_at(&self) -> Instant {
        self.frame_start + self.target_frame_time()
    }

    pub fn is_frame_due(&self, now: Instant) -> bool {
        now >= self.next_frame_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_frame_measures_delta_since_previous_frame() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::starting_at(144.0, t0);
        timer.begin_frame_at(t0 + Duration::from_millis(10));
        assert!((timer.real_dt - 0.010).abs() < 1e-9);
        timer.begin_frame_at(t0 + Duration::from_millis(25));
        assert!((timer.real_dt - 0.015).abs() < 1e-9);
        assert_eq!(timer.frame_count, 2);
    }

    #[test]
    fn limiter_holds_frames_to_max_fps() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::starting_at(100.0, t0);
        timer.begin_frame_at(t0);
        assert!(!timer.is_frame_due(t0 + Duration::from_millis(5)));
        assert!(timer.is_frame_due(t0 + Duration::from_millis(10)));
        assert_eq!(timer.next_frame_at(), t0 + Duration::from_millis(10));
    }

    #[test]
    fn non_positive_max_fps_falls_back_to_sixty() {
        let timer = FrameTimer::new(0.0);
        assert_eq!(timer.max_fps, 60.0);
    }

    #[test]
    fn smoothed_fps_converges_to_steady_rate() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::starting_at(144.0, t0);
        let mut now = t0;
        for _ in 0..FPS_SAMPLE_COUNT {
            now += Duration::from_millis(20);
            timer.begin_frame_at(now);
        }
        assert!((timer.smoothed_fps - 50.0).abs() < 0.01);
        assert!((timer.smoothed_frame_time_ms - 20.0).abs() < 0.01);
    }
}
