use std::time::{Duration, Instant};

/// Throttles animation ticks to a playback rate.
///
/// Pacing only affects wall-clock playback, never the simulated state.
pub trait Pacer {
    /// Blocks until the next tick may start.
    fn wait(&mut self);
}

/// Runs ticks as fast as possible.
pub struct NoPacing;

impl Pacer for NoPacing {
    fn wait(&mut self) {}
}

/// Caps ticks at `rate` per second by sleeping off the rest of each period.
pub struct FramePacer {
    period: Duration,
    last: Option<Instant>,
}

impl FramePacer {
    pub fn new(rate: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / rate.max(1),
            last: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Pacer for FramePacer {
    fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.period {
                std::thread::sleep(self.period - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}
