use crate::error::ConfigError;

/// Heights above the ground for a piece released at rest, bouncing
/// `phases` times. Semi-implicit Euler: velocity first, then position.
#[derive(Debug)]
struct Bounces {
    height: f64,
    velocity: f64,
    time_step: f64,
    gravity: f64,
    restitution: f64,
    phases_left: u32,
    started: bool,
    /// Highest point of the previous phase; no rebound may rise past it
    ceiling: f64,
    /// Highest point reached in the current phase
    phase_peak: f64,
}

impl Iterator for Bounces {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if !self.started {
            self.started = true;
            return Some(self.height);
        }
        while self.phases_left > 0 {
            let mut velocity = self.velocity - self.gravity * self.time_step;
            let mut height = self.height + velocity * self.time_step;
            if height > 0.0 {
                // Discrete steps can overshoot an elastic rebound; the rise
                // ends at the previous peak.
                if height > self.ceiling {
                    height = self.ceiling;
                    velocity = 0.0;
                }
                self.velocity = velocity;
                self.height = height;
                self.phase_peak = self.phase_peak.max(height);
                return Some(height);
            }
            // Impact: drop the sub-zero sample and rebound from the last
            // valid height.
            self.velocity = -self.restitution * velocity;
            self.phases_left -= 1;
            self.ceiling = self.phase_peak;
            self.phase_peak = self.height;
        }
        None
    }
}

/// Vertical positions of one falling piece, generated lazily.
///
/// Every value lies in `[rest_height, release_height]`. A trajectory is
/// consumed once; regenerate it for the next drop.
#[derive(Debug)]
pub struct Trajectory {
    bounces: Bounces,
    release_height: f64,
    rest_height: f64,
}

impl Trajectory {
    /// Build a trajectory from parameters already known to be valid.
    pub(crate) fn new(
        release_height: f64,
        rest_height: f64,
        bounce_count: u32,
        restitution: f64,
        time_step: f64,
        gravity: f64,
    ) -> Self {
        Trajectory {
            bounces: Bounces {
                height: release_height,
                velocity: 0.0,
                time_step,
                gravity,
                restitution,
                phases_left: bounce_count,
                started: false,
                ceiling: release_height,
                phase_peak: release_height,
            },
            release_height,
            rest_height,
        }
    }

    pub fn release_height(&self) -> f64 {
        self.release_height
    }

    pub fn rest_height(&self) -> f64 {
        self.rest_height
    }
}

impl Iterator for Trajectory {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        for height in self.bounces.by_ref() {
            let shifted = height + self.rest_height;
            if shifted <= self.release_height {
                return Some(shifted);
            }
        }
        None
    }
}

/// Simulate a piece dropped from `release_height` onto a stack whose top is
/// at `rest_height`, bouncing `bounce_count` times.
///
/// Rejects parameters that would make the simulation meaningless or never
/// terminate.
pub fn simulate_fall(
    release_height: f64,
    rest_height: f64,
    bounce_count: u32,
    restitution: f64,
    time_step: f64,
    gravity: f64,
) -> Result<Trajectory, ConfigError> {
    if !time_step.is_finite() || time_step <= 0.0 {
        return Err(ConfigError::Validation("time step must be > 0".into()));
    }
    if !gravity.is_finite() || gravity <= 0.0 {
        return Err(ConfigError::Validation("gravity must be > 0".into()));
    }
    if !(0.0..=1.0).contains(&restitution) {
        return Err(ConfigError::Validation(
            "restitution coefficient must be in [0, 1]".into(),
        ));
    }
    if !rest_height.is_finite() || rest_height < 0.0 {
        return Err(ConfigError::Validation("rest height must be >= 0".into()));
    }
    if !release_height.is_finite() || release_height < rest_height {
        return Err(ConfigError::Validation(
            "release height must be >= rest height".into(),
        ));
    }
    Ok(Trajectory::new(
        release_height,
        rest_height,
        bounce_count,
        restitution,
        time_step,
        gravity,
    ))
}
