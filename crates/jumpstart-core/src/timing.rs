//! Elapsed-time bookkeeping for the frame loop.

/// Timing state: last frame timestamp and the delta cap.
///
/// Timestamps are milliseconds on the host's monotonic clock.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<f64>,
    delta_cap: f64,
}

impl FrameClock {
    pub fn new(delta_cap: f64) -> Self {
        Self {
            last: None,
            delta_cap: delta_cap.max(0.0),
        }
    }

    /// Start counting from `now` without producing a delta.
    pub fn reset(&mut self, now: f64) {
        self.last = Some(now);
    }

    /// Timestamp of the last recorded frame, if any.
    pub fn last(&self) -> Option<f64> {
        self.last
    }

    pub fn delta_cap(&self) -> f64 {
        self.delta_cap
    }

    pub fn set_delta_cap(&mut self, cap_ms: f64) {
        self.delta_cap = cap_ms.max(0.0);
    }

    /// Raw time since the last recorded frame. Clock skew never goes negative.
    pub fn elapsed(&self, now: f64) -> f64 {
        match self.last {
            Some(last) => (now - last).max(0.0),
            None => 0.0,
        }
    }

    /// Capped delta since the last frame; records `now` as the new last frame.
    pub fn advance(&mut self, now: f64) -> f64 {
        let delta = self.elapsed(now).min(self.delta_cap);
        self.last = Some(now);
        delta
    }
}
