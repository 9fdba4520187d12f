/// Tuning of a [`SnapshotInterpolator`](crate::snapshot::interpolation::SnapshotInterpolator).
/// All times are in seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct InterpolationConfig {
    /// Interval at which the sender produces snapshots
    pub send_interval: f64,
    /// Playback runs this many send intervals behind the newest arrival
    pub buffer_time_multiplier: f64,
    /// Buffered snapshots tolerated before playback speeds up
    pub catchup_threshold: usize,
    /// Extra playback speed per snapshot above the threshold
    pub catchup_multiplier: f64,
    /// Maximum number of buffered snapshots
    pub buffer_limit: usize,
    /// Derive the buffer multiplier from measured arrival jitter instead of
    /// `buffer_time_multiplier`
    pub dynamic_adjustment: bool,
    /// Send intervals added on top of the jitter-derived multiplier
    pub dynamic_adjustment_tolerance: f64,
    /// Samples averaged when measuring arrival jitter
    pub jitter_samples: usize,
}

impl InterpolationConfig {
    /// How far behind local time playback runs, using the fixed multiplier
    pub fn buffer_delay(&self) -> f64 {
        self.send_interval * self.buffer_time_multiplier
    }
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            send_interval: 1.0 / 30.0,
            buffer_time_multiplier: 2.0,
            catchup_threshold: 4,
            catchup_multiplier: 0.10,
            buffer_limit: 64,
            dynamic_adjustment: false,
            dynamic_adjustment_tolerance: 1.0,
            jitter_samples: 60,
        }
    }
}
