use log::{debug, trace};

use crate::{
    backends::Clock,
    snapshot::{
        interpolation_config::InterpolationConfig,
        moving_average::ExponentialMovingAverage,
        snapshot::{Interpolate, Snapshot},
        snapshot_buffer::{InsertOutcome, SnapshotBuffer},
    },
};

/// Playback position between the first two buffered snapshots
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InterpolationClock {
    /// Seconds elapsed since the first snapshot of the window
    pub time: f64,
    /// Catch-up applied during the last step, `0` when playing at normal speed
    pub catchup: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CatchupSettings {
    pub threshold: usize,
    pub multiplier: f64,
}

/// Extra playback speed for a buffer holding `buffer_len` snapshots:
/// `multiplier` for every snapshot above `threshold`
pub fn catchup(buffer_len: usize, threshold: usize, multiplier: f64) -> f64 {
    let excess = buffer_len.saturating_sub(threshold);
    excess as f64 * multiplier
}

/// Advances `clock` by one tick and returns the interpolated state.
///
/// Returns `None` while fewer than two snapshots arrived at or before
/// `local_time - buffer_delay`. Never extrapolates: if the window is exhausted
/// and no newer snapshot is old enough, the clock stops at the window's end.
pub fn compute<S: Snapshot + Interpolate>(
    buffer: &mut SnapshotBuffer<S>,
    clock: &mut InterpolationClock,
    local_time: f64,
    delta_time: f64,
    buffer_delay: f64,
    catchup_settings: &CatchupSettings,
) -> Option<S> {
    let threshold = local_time - buffer_delay;
    if !buffer.has_amount_older_than(threshold, 2) {
        return None;
    }

    let delta_time = if delta_time.is_finite() {
        delta_time.max(0.0)
    } else {
        0.0
    };

    clock.catchup = catchup(
        buffer.len(),
        catchup_settings.threshold,
        catchup_settings.multiplier,
    );
    clock.time += delta_time * (1.0 + clock.catchup);

    let mut distance = window_distance(buffer)?;

    // skip ahead as many windows as this tick covers
    while clock.time > distance && buffer.has_amount_older_than(threshold, 3) {
        clock.time -= distance;
        buffer.pop_front();
        distance = window_distance(buffer)?;
        trace!("Interpolation window advanced, {} left", buffer.len());
    }

    clock.time = clock.time.clamp(0.0, distance);

    let first = buffer.first()?;
    let second = buffer.second()?;
    Some(S::interpolate(first, second, clock.time / distance))
}

fn window_distance<S: Snapshot>(buffer: &SnapshotBuffer<S>) -> Option<f64> {
    let first = buffer.first()?;
    let second = buffer.second()?;
    Some(second.remote_time() - first.remote_time())
}

/// Read-only view of an interpolator's state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterpolationStats {
    pub buffer_size: usize,
    pub clock_time: f64,
    pub catchup: f64,
    pub buffer_delay: f64,
    /// No output yet, not enough old snapshots buffered
    pub warming_up: bool,
}

/// Per-entity snapshot interpolation: a [`SnapshotBuffer`], its
/// [`InterpolationClock`] and optional jitter-driven buffer sizing.
pub struct SnapshotInterpolator<S: Snapshot + Interpolate> {
    config: InterpolationConfig,
    buffer: SnapshotBuffer<S>,
    clock: InterpolationClock,
    arrival_intervals: ExponentialMovingAverage,
    last_arrival: Option<f64>,
    buffer_time_multiplier: f64,
    warming_up: bool,
}

impl<S: Snapshot + Interpolate> SnapshotInterpolator<S> {
    pub fn new(config: InterpolationConfig) -> Self {
        Self {
            buffer: SnapshotBuffer::new(config.buffer_limit),
            clock: InterpolationClock::default(),
            arrival_intervals: ExponentialMovingAverage::new(config.jitter_samples),
            last_arrival: None,
            buffer_time_multiplier: config.buffer_time_multiplier,
            warming_up: true,
            config,
        }
    }

    pub fn config(&self) -> &InterpolationConfig {
        &self.config
    }

    pub fn buffer(&self) -> &SnapshotBuffer<S> {
        &self.buffer
    }

    pub fn clock(&self) -> InterpolationClock {
        self.clock
    }

    /// Current playback delay behind local time
    pub fn buffer_delay(&self) -> f64 {
        self.config.send_interval * self.buffer_time_multiplier
    }

    pub fn insert(&mut self, snapshot: S) -> InsertOutcome {
        let arrival = snapshot.local_time();
        let outcome = self.buffer.insert(snapshot);

        if outcome.is_inserted() {
            if let Some(last_arrival) = self.last_arrival {
                self.arrival_intervals.add(arrival - last_arrival);
            }
            self.last_arrival = Some(arrival);

            if self.config.dynamic_adjustment {
                self.adjust_buffer_time();
            }
        }

        outcome
    }

    fn adjust_buffer_time(&mut self) {
        let multiplier = dynamic_adjustment(
            self.config.send_interval,
            self.arrival_intervals.std_dev(),
            self.config.dynamic_adjustment_tolerance,
        );
        if multiplier != self.buffer_time_multiplier {
            debug!(
                "Interpolation buffer multiplier adjusted from {:.3} to {:.3}",
                self.buffer_time_multiplier, multiplier
            );
            self.buffer_time_multiplier = multiplier;
        }
    }

    /// Advances playback by `delta_time` seconds at `local_time`
    pub fn compute(&mut self, local_time: f64, delta_time: f64) -> Option<S> {
        let catchup_settings = CatchupSettings {
            threshold: self.config.catchup_threshold,
            multiplier: self.config.catchup_multiplier,
        };
        let buffer_delay = self.buffer_delay();

        let output = compute(
            &mut self.buffer,
            &mut self.clock,
            local_time,
            delta_time,
            buffer_delay,
            &catchup_settings,
        );
        self.warming_up = output.is_none();
        output
    }

    /// [`compute`](Self::compute) reading local time from `clock`
    pub fn tick(&mut self, clock: &dyn Clock, delta_time: f64) -> Option<S> {
        self.compute(clock.now(), delta_time)
    }

    pub fn stats(&self) -> InterpolationStats {
        InterpolationStats {
            buffer_size: self.buffer.len(),
            clock_time: self.clock.time,
            catchup: self.clock.catchup,
            buffer_delay: self.buffer_delay(),
            warming_up: self.warming_up,
        }
    }

    /// Drops every buffered snapshot and restarts playback, e.g. after a
    /// teleport
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.clock = InterpolationClock::default();
        self.arrival_intervals.reset();
        self.last_arrival = None;
        self.buffer_time_multiplier = self.config.buffer_time_multiplier;
        self.warming_up = true;
    }
}

/// Buffer multiplier covering one send interval plus the measured jitter,
/// plus `tolerance` send intervals
pub fn dynamic_adjustment(send_interval: f64, jitter_std_dev: f64, tolerance: f64) -> f64 {
    if send_interval <= 0.0 {
        return tolerance;
    }
    let interval_with_jitter = send_interval + jitter_std_dev;
    interval_with_jitter / send_interval + tolerance
}
