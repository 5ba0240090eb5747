//! Scene time management
//!
//! The host delivers absolute timestamps in milliseconds once per tick; the
//! clock latches the first one and reports scene time in seconds from there.

/// Milliseconds per second
pub const SECONDS_TO_MILLIS: f64 = 1000.0;

/// Clock converting host timestamps to scene seconds
#[derive(Debug, Clone, Default)]
pub struct SceneClock {
    t0: Option<f64>,
    time: f32,
    delta_time: f32,
    frame_count: u64,
}

impl SceneClock {
    /// Create a new clock that has not seen a timestamp yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock to a host timestamp (milliseconds)
    ///
    /// Returns the scene time in seconds since the first timestamp.
    pub fn update(&mut self, time_ms: f64) -> f32 {
        let t0 = *self.t0.get_or_insert(time_ms);
        #[allow(clippy::cast_possible_truncation)]
        let time = ((time_ms - t0) / SECONDS_TO_MILLIS) as f32;
        self.delta_time = time - self.time;
        self.time = time;
        self.frame_count += 1;
        time
    }

    /// Scene time in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Seconds between the last two updates
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Number of updates seen
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Whether a first timestamp has been latched
    pub fn is_started(&self) -> bool {
        self.t0.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_update_is_time_zero() {
        let mut clock = SceneClock::new();
        assert!(!clock.is_started());
        assert_relative_eq!(clock.update(123_456.0), 0.0);
        assert!(clock.is_started());
    }

    #[test]
    fn test_time_in_seconds_since_first_update() {
        let mut clock = SceneClock::new();
        clock.update(5_000.0);
        clock.update(5_500.0);
        assert_relative_eq!(clock.update(7_000.0), 2.0);
        assert_relative_eq!(clock.delta_time(), 1.5);
        assert_eq!(clock.frame_count(), 3);
    }
}
