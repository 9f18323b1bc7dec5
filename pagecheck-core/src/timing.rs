// Load time is not measured; it comes from one of these sources.

use rand::Rng;

pub const SIMULATED_MIN_SECS: f64 = 0.5;
pub const SIMULATED_MAX_SECS: f64 = 3.5;

pub trait LoadTimeSource: Send + Sync {
    fn sample(&self) -> f64;
}

/// Uniform draw from `[0.5, 3.5)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedLoadTime;

impl LoadTimeSource for SimulatedLoadTime {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen_range(SIMULATED_MIN_SECS..SIMULATED_MAX_SECS)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedLoadTime(pub f64);

impl LoadTimeSource for FixedLoadTime {
    fn sample(&self) -> f64 {
        self.0
    }
}
