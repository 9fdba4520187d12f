/// Exponential moving average with a running variance
#[derive(Clone, Debug, PartialEq)]
pub struct ExponentialMovingAverage {
    alpha: f64,
    value: f64,
    variance: f64,
    initialized: bool,
}

impl ExponentialMovingAverage {
    /// Weights recent samples like a simple average over `samples` would
    pub fn new(samples: usize) -> Self {
        Self {
            alpha: 2.0 / (samples.max(1) as f64 + 1.0),
            value: 0.0,
            variance: 0.0,
            initialized: false,
        }
    }

    pub fn add(&mut self, sample: f64) {
        if !sample.is_finite() {
            return;
        }

        if !self.initialized {
            self.value = sample;
            self.initialized = true;
            return;
        }

        let delta = sample - self.value;
        self.value += self.alpha * delta;
        self.variance = (1.0 - self.alpha) * (self.variance + self.alpha * delta * delta);
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
        self.variance = 0.0;
        self.initialized = false;
    }
}
