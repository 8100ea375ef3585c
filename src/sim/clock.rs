//! Monotonic session clock

use serde::{Deserialize, Serialize};

/// Elapsed time in seconds, advanced by the host loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    elapsed: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the clock was created
    #[inline]
    pub fn now(&self) -> f64 {
        self.elapsed
    }

    /// Advance by `dt` seconds. Negative or non-finite steps are dropped.
    pub fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        } else if dt != 0.0 {
            log::warn!("Ignoring invalid clock step: {}", dt);
        }
    }
}
