use serde::{Deserialize, Serialize};

use crate::consts::{START_TIME, START_TIME_SPEED};

/// Simulated time. One tick advances it by `time_speed`; orbital periods are
/// measured in the same units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    time: f64,
    time_speed: f64,
}

impl Default for SimClock {
    fn default() -> Self {
        SimClock {
            time: START_TIME,
            time_speed: START_TIME_SPEED,
        }
    }
}

impl SimClock {
    pub fn new(time: f64, time_speed: f64) -> Self {
        SimClock { time, time_speed }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn time_speed(&self) -> f64 {
        self.time_speed
    }

    pub fn advance(&mut self) -> f64 {
        self.time += self.time_speed;
        self.time
    }

    pub fn faster(&mut self) {
        self.time_speed *= 2.0;
    }

    pub fn slower(&mut self) {
        self.time_speed /= 2.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn test_ticks() {
        let mut clock = SimClock::default();
        assert_eq!(clock.time(), 2.552);
        assert_eq!(clock.time_speed(), 0.1);

        for _ in 0..10 {
            clock.advance();
        }
        assert_relative_eq!(clock.time(), 3.552, epsilon = 1e-12);

        clock.faster();
        assert_relative_eq!(clock.advance(), 3.752, epsilon = 1e-12);
        clock.slower();
        clock.slower();
        assert_eq!(clock.time_speed(), 0.05);
    }
}
